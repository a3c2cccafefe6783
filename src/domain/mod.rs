mod config;
mod parser;

pub use config::{FieldConfig, FieldStyles, FormatSegment, RenderMode, SegmentKind};
pub use parser::parse_field_configs;
