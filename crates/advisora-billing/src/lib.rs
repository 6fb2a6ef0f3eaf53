//! advisora-billing
//!
//! Stripe Checkout: one-off card payment per consultation report.

pub mod checkout;
pub mod client;
pub mod error;
pub mod metadata;
