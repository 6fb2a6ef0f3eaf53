use thiserror::Error;

#[derive(Debug, Error)]
pub enum CoreError {
    #[error("invalid consultancy type: {0}")]
    InvalidConsultancyType(String),

    #[error("invalid strictness: {0}")]
    InvalidStrictness(String),

    #[error("missing required field: {0}")]
    MissingField(&'static str),

    #[error("field {field} exceeds {max} characters")]
    FieldTooLong { field: &'static str, max: usize },

    #[error("prompt rendering failed: {0}")]
    PromptRender(String),
}

impl From<tera::Error> for CoreError {
    fn from(e: tera::Error) -> Self {
        CoreError::PromptRender(e.to_string())
    }
}
