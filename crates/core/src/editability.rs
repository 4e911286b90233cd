//! Edit/delete eligibility of a BrickSet.
//!
//! A BrickSet is frozen for its owner as soon as it carries social weight:
//! another user has valued it, or the owner's own valuation has collected at
//! least one like. The rule is evaluated over the BrickSet's full valuation
//! list; callers load that list together with the BrickSet in one query.
//!
//! Two entry points share the same evaluation order:
//!
//! - [`is_editable`]: boolean form used for the `editable` flag on owned
//!   listings.
//! - [`authorize_mutation`]: raising form used on write paths. It checks
//!   ownership first so a non-owner always sees [`EditForbiddenReason::NotOwner`]
//!   and never learns anything about other users' valuations.

use std::fmt;

use serde::Serialize;

use crate::error::CoreError;
use crate::types::DbId;

/// Why a BrickSet mutation was refused.
///
/// The serialized form is the stable reason code clients branch on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum EditForbiddenReason {
    /// The requesting user does not own the BrickSet.
    NotOwner,
    /// At least one valuation was authored by someone other than the owner.
    OtherUsersValuationsExist,
    /// The owner's own valuation has one or more likes.
    OwnerValuationHasLikes,
}

impl EditForbiddenReason {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::NotOwner => "not_owner",
            Self::OtherUsersValuationsExist => "other_users_valuations_exist",
            Self::OwnerValuationHasLikes => "owner_valuation_has_likes",
        }
    }
}

impl fmt::Display for EditForbiddenReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<EditForbiddenReason> for CoreError {
    fn from(reason: EditForbiddenReason) -> Self {
        CoreError::EditForbidden { reason }
    }
}

/// The two facts the eligibility rule needs from a valuation.
///
/// Implemented by the persisted valuation row so the rule can run directly
/// over whatever the repository loaded.
pub trait ValuationStake {
    /// The user who authored the valuation.
    fn author_id(&self) -> DbId;
    /// Current denormalized like counter.
    fn likes_count(&self) -> i32;
}

/// Evaluate edit eligibility for a BrickSet owned by `owner_id`.
///
/// Other users' valuations take priority over likes on the owner's own
/// valuation when both conditions hold. An empty slice is always eligible.
pub fn check_editable<V: ValuationStake>(
    owner_id: DbId,
    valuations: &[V],
) -> Result<(), EditForbiddenReason> {
    let (owner_valuations, others): (Vec<&V>, Vec<&V>) = valuations
        .iter()
        .partition(|valuation| valuation.author_id() == owner_id);

    if !others.is_empty() {
        return Err(EditForbiddenReason::OtherUsersValuationsExist);
    }

    // At most one by the (user, brickset) uniqueness constraint.
    if owner_valuations
        .iter()
        .any(|valuation| valuation.likes_count() > 0)
    {
        return Err(EditForbiddenReason::OwnerValuationHasLikes);
    }

    Ok(())
}

/// Non-raising form of [`check_editable`].
pub fn is_editable<V: ValuationStake>(owner_id: DbId, valuations: &[V]) -> bool {
    check_editable(owner_id, valuations).is_ok()
}

/// Authorize `requesting_user_id` to update or delete a BrickSet.
///
/// Ownership is checked before any valuation is inspected.
pub fn authorize_mutation<V: ValuationStake>(
    owner_id: DbId,
    requesting_user_id: DbId,
    valuations: &[V],
) -> Result<(), CoreError> {
    if requesting_user_id != owner_id {
        return Err(EditForbiddenReason::NotOwner.into());
    }
    check_editable(owner_id, valuations)?;
    Ok(())
}
