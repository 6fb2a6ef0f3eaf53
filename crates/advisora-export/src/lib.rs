//! advisora-export
//!
//! Generated text → classified blocks → styled genpdf elements → PDF bytes.

pub mod blocks;
pub mod error;
pub mod fonts;
pub mod inline;
pub mod pdf;
pub mod styles;
pub mod text;
