use crate::editability::EditForbiddenReason;
use crate::types::DbId;

#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error("Entity not found: {entity} with id {id}")]
    NotFound { entity: &'static str, id: DbId },

    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Forbidden: {0}")]
    Forbidden(String),

    #[error("Internal error: {0}")]
    Internal(String),

    /// The BrickSet may not be edited or deleted (ownership or eligibility).
    #[error("BrickSet cannot be modified: {reason}")]
    EditForbidden { reason: EditForbiddenReason },

    /// A write collided with one of the known unique constraints.
    #[error("Duplicate value violates unique constraint: {constraint}")]
    Duplicate { constraint: &'static str },

    #[error("Cannot like own valuation {valuation_id}")]
    LikeOwnValuation { valuation_id: DbId },

    #[error("User {user_id} already liked valuation {valuation_id}")]
    LikeDuplicate { valuation_id: DbId, user_id: DbId },

    #[error("Like by user {user_id} on valuation {valuation_id} not found")]
    LikeNotFound { valuation_id: DbId, user_id: DbId },
}
