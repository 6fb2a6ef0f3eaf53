//! advisora-storage
//!
//! Generated document storage on the local filesystem.

pub mod documents;
pub mod error;
