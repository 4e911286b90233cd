//! Shared query parameter types for API handlers.

use bricks_core::listing::{clamp_limit, clamp_offset, resolve_ordering, DEFAULT_LIMIT, MAX_LIMIT};
use serde::Deserialize;

/// Paging and ordering parameters (`?ordering=&limit=&offset=`).
///
/// Unknown orderings fall back to the default; limits are clamped to
/// `[1, MAX_LIMIT]` and offsets to non-negative.
#[derive(Debug, Default, Deserialize)]
pub struct ListParams {
    pub ordering: Option<String>,
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

impl ListParams {
    /// Resolve `(ordering, limit, offset)` against the allowed orderings.
    pub fn resolve(&self, allowed: &[&'static str]) -> (&'static str, i64, i64) {
        (
            resolve_ordering(self.ordering.as_deref(), allowed),
            clamp_limit(self.limit, DEFAULT_LIMIT, MAX_LIMIT),
            clamp_offset(self.offset),
        )
    }

    /// `(limit, offset)` for lists with a fixed order; `ordering` is ignored.
    pub fn page(&self) -> (i64, i64) {
        (
            clamp_limit(self.limit, DEFAULT_LIMIT, MAX_LIMIT),
            clamp_offset(self.offset),
        )
    }
}
