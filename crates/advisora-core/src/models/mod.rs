pub mod consultancy;
pub mod focus;
pub mod request;
pub mod strictness;
