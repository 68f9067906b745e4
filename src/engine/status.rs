use std::sync::Arc;

use tracing::debug;

use super::{SyncError, SyncResult};
use crate::bus::{EntityUpdate, Patch, UpdateBus};
use crate::catalog::CatalogApi;
use crate::entity::BookPatch;
use crate::session::SessionStore;
use crate::types::{BookId, EntityId, ReadingStatus, UserId};

/// Owner-gated reading-status transitions.
///
/// Any status is reachable from any other, including back to
/// [`ReadingStatus::Unset`], but only by the book's owner. There is no
/// optimistic flip: the new status is broadcast only after the catalog
/// confirms it.
pub struct ReadingStatusMachine {
    catalog: Arc<dyn CatalogApi>,
    bus: Arc<UpdateBus>,
    session: SessionStore,
}

impl ReadingStatusMachine {
    /// Wires the machine to its collaborators.
    pub fn new(catalog: Arc<dyn CatalogApi>, bus: Arc<UpdateBus>, session: SessionStore) -> Self {
        Self {
            catalog,
            bus,
            session,
        }
    }

    /// Moves `book` from `current` to `next`, broadcasting on success.
    ///
    /// Returns `Ok(false)` without a network call when `next` equals
    /// `current`. Fails with [`SyncError::Unauthenticated`] when signed
    /// out and [`SyncError::Forbidden`] when the viewer is not `owner`.
    pub async fn set_status(
        &self,
        book: &BookId,
        owner: &UserId,
        current: ReadingStatus,
        next: ReadingStatus,
    ) -> SyncResult<bool> {
        let session = self.session.current().ok_or(SyncError::Unauthenticated)?;
        if session.user != *owner {
            return Err(SyncError::Forbidden);
        }
        if next == current {
            return Ok(false);
        }
        self.catalog.set_reading_status(book, next).await?;
        debug!(%book, status = next.as_str(), "reading status updated");
        self.bus.publish(&EntityUpdate {
            entity: EntityId::Book(book.clone()),
            patch: Patch::Book(BookPatch {
                reading_status: Some(next),
                ..BookPatch::default()
            }),
        });
        Ok(true)
    }
}
