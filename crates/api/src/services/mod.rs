//! Mutation services.
//!
//! Each service runs its checks and writes inside one transaction, so a
//! caller sees either the success value or exactly one error with nothing
//! written.
//!
//! - [`brickset`] -- update and delete a BrickSet under the edit-eligibility rule.
//! - [`likes`] -- like and unlike a valuation.
//! - [`likes_counter`] -- keeps `valuations.likes_count` and the metrics
//!   singleton in step with like writes.

pub mod brickset;
pub mod likes;
pub mod likes_counter;
