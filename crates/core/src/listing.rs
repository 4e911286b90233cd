//! Paging and ordering helpers shared by the list endpoints.

/// Default page size when `limit` is omitted.
pub const DEFAULT_LIMIT: i64 = 20;

/// Largest page size a client may request.
pub const MAX_LIMIT: i64 = 100;

/// Orderings accepted by the public and owned BrickSet lists.
pub const BRICKSET_ORDERINGS: &[&str] = &[
    "created_at",
    "-created_at",
    "number",
    "-number",
    "valuations_count",
    "-valuations_count",
    "total_likes",
    "-total_likes",
];

/// Orderings accepted by the owned valuation list.
pub const OWNED_VALUATION_ORDERINGS: &[&str] = &[
    "created_at",
    "-created_at",
    "likes_count",
    "-likes_count",
    "value",
    "-value",
];

pub const DEFAULT_ORDERING: &str = "-created_at";

/// Clamp a user-provided limit to `[1, max]`, defaulting when absent.
pub fn clamp_limit(limit: Option<i64>, default: i64, max: i64) -> i64 {
    limit.unwrap_or(default).max(1).min(max)
}

/// Clamp a user-provided offset to non-negative.
pub fn clamp_offset(offset: Option<i64>) -> i64 {
    offset.unwrap_or(0).max(0)
}

/// Pick the requested ordering if it is allowed, otherwise the default.
///
/// Unknown values are ignored rather than rejected.
pub fn resolve_ordering(requested: Option<&str>, allowed: &[&'static str]) -> &'static str {
    requested
        .and_then(|wanted| allowed.iter().copied().find(|candidate| *candidate == wanted))
        .unwrap_or(DEFAULT_ORDERING)
}

/// Split a resolved ordering into `(column, "ASC" | "DESC")`.
pub fn order_parts(ordering: &'static str) -> (&'static str, &'static str) {
    match ordering.strip_prefix('-') {
        Some(column) => (column, "DESC"),
        None => (ordering, "ASC"),
    }
}
