pub mod audit;
pub mod rate_limit;
