//! Engine errors.
//!
//! Business-rule rejections are not errors: they come back as
//! [`Outcome::Rejected`](crate::derivation::Outcome::Rejected) with the
//! unchanged snapshot. The variants here are contract violations, commit
//! preconditions, stale drafts and persistence failures.

use validator::ValidationErrors;

use crate::persistence::PersistenceError;

#[derive(Debug, thiserror::Error)]
pub enum StructureError {
    /// The intent names an unknown field or carries a value outside its domain.
    #[error("malformed intent: {0}")]
    MalformedIntent(String),

    /// A snapshot or record breaks one or more structure invariants.
    #[error("invariant violated: {}", .0.join("; "))]
    InvariantViolation(Vec<String>),

    /// A required structural choice has not been made yet.
    #[error("configuration incomplete: {0}")]
    Incomplete(String),

    #[error("invalid school profile: {0}")]
    InvalidProfile(#[from] ValidationErrors),

    /// The backend already holds a committed record for this school. The
    /// store has adopted it and is now locked.
    #[error("school {0:?} was already committed by another session")]
    Superseded(String),

    #[error(transparent)]
    Persistence(#[from] PersistenceError),
}

impl StructureError {
    pub(crate) fn malformed(message: impl Into<String>) -> Self {
        Self::MalformedIntent(message.into())
    }
}
