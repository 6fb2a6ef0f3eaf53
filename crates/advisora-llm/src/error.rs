use thiserror::Error;

#[derive(Debug, Error)]
pub enum LlmError {
    #[error("generative API not configured: {0}")]
    Config(String),

    #[error("request failed: {0}")]
    Invocation(String),

    #[error("request timed out")]
    Timeout,

    #[error("API returned {status}: {message}")]
    Status { status: u16, message: String },

    #[error("response parsing failed: {0}")]
    ResponseParse(String),

    #[error("failed after {attempts} attempts: {last}")]
    RetriesExhausted {
        attempts: u32,
        #[source]
        last: Box<LlmError>,
    },
}

impl From<reqwest::Error> for LlmError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            LlmError::Timeout
        } else {
            LlmError::Invocation(e.to_string())
        }
    }
}
