use thiserror::Error;

#[derive(Debug, Error)]
pub enum FieldError {
    #[error("field has an empty id")]
    EmptyId,
    #[error("duplicate field id '{0}'")]
    DuplicateField(String),
    #[error("{field}: invalid constraint: {message}")]
    InvalidConstraint { field: String, message: String },
    #[error("{field}: '{value}' is not a date and time (YYYY-MM-DD HH:MM)")]
    InvalidHistoryTrack { field: String, value: String },
    #[error("{field}: rich-text editor unavailable")]
    EditorUnavailable {
        field: String,
        #[source]
        source: EditorError,
    },
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EditorError {
    #[error("editor failed to load: {0}")]
    LoadFailed(String),
    #[error("editor is not mounted")]
    NotMounted,
}
