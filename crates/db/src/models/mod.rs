//! Domain model structs and DTOs.
//!
//! Each submodule contains:
//! - A `FromRow` + `Serialize` entity struct matching the database row
//! - A `Deserialize` create DTO for inserts
//! - Read models assembled for list and detail endpoints

pub mod brickset;
pub mod like;
pub mod system_metrics;
pub mod user;
pub mod valuation;
