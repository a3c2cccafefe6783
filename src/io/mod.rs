mod format;
mod input;

pub use format::DocumentFormat;
pub use input::{load_field_configs, load_field_configs_from_path, parse_document_str};
