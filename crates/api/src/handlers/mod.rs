pub mod auth;
pub mod brickset;
pub mod like;
pub mod me;
pub mod metrics;
pub mod valuation;
