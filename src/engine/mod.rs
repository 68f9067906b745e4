//! Interaction engines: toggles, reading status, and library mutations.

/// Owner-gated catalog mutations and account reads.
pub mod library;
/// Reading-status transitions.
pub mod status;
/// Optimistic relation toggles.
pub mod toggle;

use thiserror::Error;

use crate::catalog::CatalogError;

/// Typed failures surfaced to view code.
///
/// Engines never swallow errors: optimistic state is rolled back first,
/// then the error is returned for user-facing reporting. Failed
/// operations are not retried; a fresh user action is required.
#[derive(Debug, Error)]
pub enum SyncError {
    /// No signed-in session; callers route to sign-in.
    #[error("not signed in")]
    Unauthenticated,
    /// Owner acting on their own entity.
    #[error("cannot act on your own entity")]
    SelfInteractionForbidden,
    /// Non-owner attempting an owner-only mutation.
    #[error("not authorized")]
    Forbidden,
    /// A toggle for this entity and kind is already in flight.
    #[error("toggle already in flight")]
    ToggleInFlight,
    /// Entity missing or deleted server-side.
    #[error("entity not found")]
    NotFound,
    /// Input rejected before reaching the network.
    #[error("validation failed: {0}")]
    Validation(String),
    /// Transport failure or server-side error.
    #[error("network or server error: {0}")]
    Network(CatalogError),
}

impl From<CatalogError> for SyncError {
    fn from(value: CatalogError) -> Self {
        match value {
            CatalogError::Unauthenticated => Self::Unauthenticated,
            CatalogError::Forbidden => Self::Forbidden,
            CatalogError::NotFound => Self::NotFound,
            CatalogError::Validation(message) => Self::Validation(message),
            other => Self::Network(other),
        }
    }
}

/// Convenience alias for engine results.
pub type SyncResult<T> = Result<T, SyncError>;
