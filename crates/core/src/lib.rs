//! Pure domain logic for the bricks valuation backend.
//!
//! Nothing in this crate touches the database: it holds the shared id and
//! timestamp types, the domain error taxonomy, field bounds, and the
//! edit-eligibility rule that gates BrickSet mutations.

pub mod account;
pub mod brickset;
pub mod constraints;
pub mod editability;
pub mod error;
pub mod listing;
pub mod metrics;
pub mod types;
pub mod valuation;
