//! advisora-llm
//!
//! Generative text API invocation (OpenAI-compatible chat completions),
//! retry policy, and token accounting.

pub mod chat;
pub mod client;
pub mod error;
pub mod generator;
pub mod retry;
pub mod tokens;
