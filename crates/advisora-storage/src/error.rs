use thiserror::Error;

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("document not found: {name}")]
    NotFound { name: String },

    #[error("document already exists: {name}")]
    AlreadyExists { name: String },

    #[error("invalid document name: {name}")]
    InvalidName { name: String },

    #[error("failed to read {name}: {source}")]
    Read {
        name: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to write {name}: {source}")]
    Write {
        name: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to delete {name}: {source}")]
    Delete {
        name: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to list documents: {0}")]
    List(#[source] std::io::Error),

    #[error("failed to open document directory {path}: {source}")]
    Open {
        path: String,
        #[source]
        source: std::io::Error,
    },
}
