use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use hashbrown::HashSet;
use tracing::{debug, warn};

use super::{SyncError, SyncResult};
use crate::bus::{EntityUpdate, Patch, UpdateBus};
use crate::catalog::{CatalogApi, ReviewInteraction};
use crate::entity::{BookPatch, ReviewPatch};
use crate::session::SessionStore;
use crate::types::{EntityId, ToggleKind, UserId};

/// Caller-supplied view of the entity being toggled.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToggleTarget {
    /// Entity the toggle applies to.
    pub entity: EntityId,
    /// Relation kind.
    pub kind: ToggleKind,
    /// Entity owner/author identity.
    pub owner: UserId,
    /// Current relation state as rendered by the calling view.
    pub active: bool,
}

/// Server-confirmed outcome of one toggle.
#[derive(Debug, Clone, PartialEq)]
pub struct Reconciliation {
    /// Entity that changed.
    pub entity: EntityId,
    /// Relation state after confirmation.
    pub active: bool,
    /// Patch that was broadcast to subscribed views.
    pub patch: Patch,
}

/// Optimistic relation toggles with per-key serialization.
///
/// Each toggle flips the relation flag locally, issues the catalog
/// call, and reconciles: on success the server's counters replace any
/// local value and the confirmed patch is broadcast; on failure the
/// flag is rolled back and counters are left untouched. Concurrent
/// toggles on the same `(entity, kind)` key are rejected with
/// [`SyncError::ToggleInFlight`] until the first resolves.
pub struct ToggleEngine {
    catalog: Arc<dyn CatalogApi>,
    bus: Arc<UpdateBus>,
    session: SessionStore,
    in_flight: Mutex<HashSet<(EntityId, ToggleKind)>>,
}

impl ToggleEngine {
    /// Wires the engine to its collaborators.
    pub fn new(catalog: Arc<dyn CatalogApi>, bus: Arc<UpdateBus>, session: SessionStore) -> Self {
        Self {
            catalog,
            bus,
            session,
            in_flight: Mutex::new(HashSet::new()),
        }
    }

    /// Flips the viewer's relation on `target` and reconciles against
    /// the catalog.
    ///
    /// Fails with [`SyncError::Unauthenticated`] when signed out, with
    /// [`SyncError::SelfInteractionForbidden`] when the viewer owns the
    /// entity and the kind is owner-guarded, and with
    /// [`SyncError::Validation`] for an upvote removal — all before any
    /// network traffic. Ownership pre-checks are a fast path only; a
    /// server rejection is authoritative and rolls back the same way as
    /// any other failure.
    pub async fn toggle(&self, target: &ToggleTarget) -> SyncResult<Reconciliation> {
        let session = self.session.current().ok_or(SyncError::Unauthenticated)?;
        if target.kind.owner_guarded() && session.user == target.owner {
            return Err(SyncError::SelfInteractionForbidden);
        }
        if target.kind == ToggleKind::Upvote && target.active {
            return Err(SyncError::Validation("already upvoted".to_string()));
        }
        if target.kind.targets_review() != matches!(target.entity, EntityId::Review(_)) {
            return Err(SyncError::Validation(
                "toggle kind does not match entity".to_string(),
            ));
        }
        let _claim = self.claim(target)?;

        let establish = !target.active;
        self.publish(target, flag_patch(target.kind, establish));
        debug!(kind = ?target.kind, establish, "toggle issued");

        match self.commit(target, establish).await {
            Ok(patch) => {
                self.publish(target, patch.clone());
                Ok(Reconciliation {
                    entity: target.entity.clone(),
                    active: establish,
                    patch,
                })
            }
            Err(err) => {
                warn!(kind = ?target.kind, error = %err, "toggle failed, rolling back");
                self.publish(target, flag_patch(target.kind, target.active));
                Err(err)
            }
        }
    }

    async fn commit(&self, target: &ToggleTarget, establish: bool) -> SyncResult<Patch> {
        match (&target.entity, target.kind) {
            (EntityId::Book(id), ToggleKind::Bookmark) => {
                self.catalog.set_bookmark(id, establish).await?;
                Ok(Patch::Book(BookPatch {
                    bookmarked: Some(establish),
                    ..BookPatch::default()
                }))
            }
            (EntityId::Book(id), ToggleKind::Like) => {
                let likes = self.catalog.set_book_like(id, establish).await?;
                Ok(Patch::Book(BookPatch {
                    liked: Some(establish),
                    likes: Some(likes),
                    ..BookPatch::default()
                }))
            }
            (EntityId::Book(id), ToggleKind::Upvote) => {
                let book = self.catalog.upvote_book(id).await?;
                Ok(Patch::Book(BookPatch {
                    upvoted: Some(true),
                    upvotes: Some(book.upvotes),
                    ..BookPatch::default()
                }))
            }
            (EntityId::Review(id), ToggleKind::ReviewLike) => {
                let state = self.catalog.like_review(id).await?;
                Ok(Patch::Review(interaction_patch(state)))
            }
            (EntityId::Review(id), ToggleKind::ReviewDislike) => {
                let state = self.catalog.dislike_review(id).await?;
                Ok(Patch::Review(interaction_patch(state)))
            }
            _ => Err(SyncError::Validation(
                "toggle kind does not match entity".to_string(),
            )),
        }
    }

    fn publish(&self, target: &ToggleTarget, patch: Patch) {
        self.bus.publish(&EntityUpdate {
            entity: target.entity.clone(),
            patch,
        });
    }

    fn claim(&self, target: &ToggleTarget) -> SyncResult<InFlightClaim<'_>> {
        let key = (target.entity.clone(), target.kind);
        if !self.lock().insert(key.clone()) {
            return Err(SyncError::ToggleInFlight);
        }
        Ok(InFlightClaim { engine: self, key })
    }

    fn lock(&self) -> MutexGuard<'_, HashSet<(EntityId, ToggleKind)>> {
        self.in_flight
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }
}

// Releases the in-flight key even when the toggle future is dropped.
struct InFlightClaim<'a> {
    engine: &'a ToggleEngine,
    key: (EntityId, ToggleKind),
}

impl Drop for InFlightClaim<'_> {
    fn drop(&mut self) {
        self.engine.lock().remove(&self.key);
    }
}

// Optimistic and rollback patches move the flag only; counters change
// solely on server confirmation.
fn flag_patch(kind: ToggleKind, active: bool) -> Patch {
    match kind {
        ToggleKind::Bookmark => Patch::Book(BookPatch {
            bookmarked: Some(active),
            ..BookPatch::default()
        }),
        ToggleKind::Like => Patch::Book(BookPatch {
            liked: Some(active),
            ..BookPatch::default()
        }),
        ToggleKind::Upvote => Patch::Book(BookPatch {
            upvoted: Some(active),
            ..BookPatch::default()
        }),
        ToggleKind::ReviewLike => Patch::Review(ReviewPatch {
            user_liked: Some(active),
            ..ReviewPatch::default()
        }),
        ToggleKind::ReviewDislike => Patch::Review(ReviewPatch {
            user_disliked: Some(active),
            ..ReviewPatch::default()
        }),
    }
}

fn interaction_patch(state: ReviewInteraction) -> ReviewPatch {
    ReviewPatch {
        likes: Some(state.likes),
        dislikes: Some(state.dislikes),
        user_liked: Some(state.user_liked),
        user_disliked: Some(state.user_disliked),
        ..ReviewPatch::default()
    }
}
