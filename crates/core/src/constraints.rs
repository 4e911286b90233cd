//! Names of the storage-level constraints.
//!
//! Must match the DDL in `db/migrations`. Unique-violation errors are
//! classified by comparing the reported constraint name against these.

pub const UQ_USERS_USERNAME: &str = "uq_users_username";
pub const UQ_USERS_EMAIL: &str = "uq_users_email";
pub const UQ_BRICKSETS_GLOBAL_IDENTITY: &str = "uq_bricksets_global_identity";
pub const UQ_VALUATIONS_USER_BRICKSET: &str = "uq_valuations_user_brickset";
pub const UQ_LIKES_USER_VALUATION: &str = "uq_likes_user_valuation";

pub const CK_VALUATIONS_LIKES_NONNEGATIVE: &str = "ck_valuations_likes_nonnegative";

/// Every unique constraint the application translates into a domain error.
pub const KNOWN_UNIQUE_CONSTRAINTS: &[&str] = &[
    UQ_USERS_USERNAME,
    UQ_USERS_EMAIL,
    UQ_BRICKSETS_GLOBAL_IDENTITY,
    UQ_VALUATIONS_USER_BRICKSET,
    UQ_LIKES_USER_VALUATION,
];

/// Map a reported constraint name onto its `&'static` constant.
pub fn known_unique(name: &str) -> Option<&'static str> {
    KNOWN_UNIQUE_CONSTRAINTS
        .iter()
        .copied()
        .find(|known| *known == name)
}
