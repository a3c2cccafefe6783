mod controller;
mod editor;
mod error;
mod mask;
mod normalize;
mod state;
mod validation;

pub use controller::{CommitTrigger, FieldController, FieldObserver, FocusState};
pub use editor::{EditorEvent, EditorOptions, MarkupEditor, MountedEditor, RichTextEditor};
pub use error::{EditorError, FieldError};
pub use mask::{MaskPattern, build_mask};
pub use normalize::normalize_case;
pub use state::{FormState, FormValues};
pub use validation::FieldValidator;
