//! advisora-core
//!
//! Pure domain types, prompt construction, and document naming conventions.
//! No HTTP or PDF dependency. This is the shared vocabulary of the service.

pub mod document_keys;
pub mod error;
pub mod models;
pub mod prompt;
