//! Error type returned by [`FactService`](crate::service::FactService).

use thiserror::Error;
use uuid::Uuid;

/// Failure modes of fact operations.
///
/// Lookups that simply find nothing are not errors; they return `None`.
#[derive(Debug, Error)]
pub enum FactError {
    /// An update or delete targeted an id with no stored fact.
    #[error("fact not found with id: {0}")]
    NotFound(Uuid),

    /// The submitted fact violates a field constraint.
    #[error("invalid fact: {0}")]
    Validation(String),

    /// The backing store failed. Never retried at this layer.
    #[error(transparent)]
    Store(#[from] anyhow::Error),
}

pub type FactResult<T> = Result<T, FactError>;
