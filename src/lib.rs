#![deny(rust_2018_idioms)]

mod app;
mod domain;
mod form;
mod io;
mod presentation;

pub use app::{FormUI, UiOptions};
pub use domain::{
    FieldConfig, FieldStyles, FormatSegment, RenderMode, SegmentKind, parse_field_configs,
};
pub use form::{
    CommitTrigger, EditorError, EditorEvent, EditorOptions, FieldController, FieldError,
    FieldObserver, FieldValidator, FocusState, FormState, FormValues, MarkupEditor, MaskPattern,
    MountedEditor, RichTextEditor, build_mask, normalize_case,
};
pub use io::{DocumentFormat, load_field_configs, load_field_configs_from_path, parse_document_str};

pub mod prelude {
    pub use super::{
        CommitTrigger, FieldConfig, FieldController, FieldObserver, FormState, FormUI,
        FormatSegment, UiOptions,
    };
}
