use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("PDF generation failed: {0}")]
    Pdf(String),

    #[error("nothing to render: generated text is empty")]
    EmptyDocument,

    #[error("no usable TrueType font family found (searched: {searched})")]
    FontsNotFound { searched: String },

    #[error("failed to read font {}: {source}", path.display())]
    FontRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid font {}: {message}", path.display())]
    InvalidFont { path: PathBuf, message: String },
}
