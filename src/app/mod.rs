mod form_ui;
mod history;
pub(crate) mod input;
mod options;
mod runtime;
mod status;
mod terminal;

pub use form_ui::FormUI;
pub use options::UiOptions;
