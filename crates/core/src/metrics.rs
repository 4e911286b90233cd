//! System metrics read model.
//!
//! The stored singleton holds three counters, all recomputed in full after
//! every like or unlike:
//!
//! - `total_sets`: number of BrickSets.
//! - `serviced_sets`: BrickSets that have a valuation from someone other
//!   than the owner, or whose owner's own valuation has at least one like.
//! - `active_users`: users owning at least one BrickSet or valuation.
//!
//! The ratios exposed by the API are derived here.

/// `numerator / denominator`, or `0.0` when the denominator is not positive.
pub fn ratio(numerator: i64, denominator: i64) -> f64 {
    if denominator <= 0 {
        return 0.0;
    }
    numerator as f64 / denominator as f64
}

/// Share of BrickSets that are serviced.
pub fn serviced_sets_ratio(serviced_sets: i64, total_sets: i64) -> f64 {
    ratio(serviced_sets, total_sets)
}

/// Share of registered users that are active.
pub fn active_users_ratio(active_users: i64, total_users: i64) -> f64 {
    ratio(active_users, total_users)
}
