pub mod downloads;
pub mod health;
pub mod index;
pub mod payments;
pub mod reports;
