use std::sync::Arc;

use tracing::debug;

use super::{SyncError, SyncResult};
use crate::bus::{EntityUpdate, Patch, UpdateBus};
use crate::catalog::{CatalogApi, ReadingStats, ReviewPosted, UserProfile};
use crate::entity::{BookDraft, BookPatch, BookRecord, ReviewDraft, ReviewPatch, ReviewRecord};
use crate::session::{Session, SessionStore};
use crate::types::EntityId;

/// Owner-gated catalog mutations and account reads shared by the views.
///
/// Covers everything outside the toggle/status hot path: review
/// submission and editing, book creation/editing/deletion, and the
/// viewer's profile, stats, and relation lists. Mutations that change
/// data other views may be rendering are broadcast the same way toggle
/// reconciliations are.
pub struct LibraryOps {
    catalog: Arc<dyn CatalogApi>,
    bus: Arc<UpdateBus>,
    session: SessionStore,
}

impl LibraryOps {
    /// Wires the ops facade to its collaborators.
    pub fn new(catalog: Arc<dyn CatalogApi>, bus: Arc<UpdateBus>, session: SessionStore) -> Self {
        Self {
            catalog,
            bus,
            session,
        }
    }

    /// Validates and posts a review, broadcasting the book's new
    /// rating aggregates.
    pub async fn submit_review(
        &self,
        book: &BookRecord,
        draft: &ReviewDraft,
    ) -> SyncResult<ReviewPosted> {
        self.require_session()?;
        validate_review(draft)?;
        let posted = self.catalog.submit_review(&book.id, draft).await?;
        debug!(book = %book.id, review = %posted.review.id, "review posted");
        self.bus.publish(&EntityUpdate {
            entity: EntityId::Book(book.id.clone()),
            patch: Patch::Book(BookPatch {
                rating: Some(posted.average_rating),
                total_reviews: Some(posted.total_reviews),
                ..BookPatch::default()
            }),
        });
        Ok(posted)
    }

    /// Author-only review edit; broadcasts the new body and rating.
    pub async fn update_review(
        &self,
        review: &ReviewRecord,
        draft: &ReviewDraft,
    ) -> SyncResult<ReviewRecord> {
        let session = self.require_session()?;
        if session.user != review.author {
            return Err(SyncError::Forbidden);
        }
        validate_review(draft)?;
        let updated = self.catalog.update_review(&review.id, draft).await?;
        self.bus.publish(&EntityUpdate {
            entity: EntityId::Review(review.id.clone()),
            patch: Patch::Review(ReviewPatch {
                rating: Some(updated.rating),
                text: Some(updated.text.clone()),
                ..ReviewPatch::default()
            }),
        });
        Ok(updated)
    }

    /// Author-only review deletion; subscribed views drop the row.
    pub async fn delete_review(&self, review: &ReviewRecord) -> SyncResult<()> {
        let session = self.require_session()?;
        if session.user != review.author {
            return Err(SyncError::Forbidden);
        }
        self.catalog.delete_review(&review.id).await?;
        self.bus.publish(&EntityUpdate {
            entity: EntityId::Review(review.id.clone()),
            patch: Patch::Removed,
        });
        Ok(())
    }

    /// Creates a book owned by the viewer.
    pub async fn create_book(&self, draft: &BookDraft) -> SyncResult<BookRecord> {
        self.require_session()?;
        validate_book(draft)?;
        Ok(self.catalog.create_book(draft).await?)
    }

    /// Owner-only book edit; broadcasts the updated content fields.
    pub async fn update_book(
        &self,
        book: &BookRecord,
        draft: &BookDraft,
    ) -> SyncResult<BookRecord> {
        let session = self.require_session()?;
        if session.user != book.owner {
            return Err(SyncError::Forbidden);
        }
        validate_book(draft)?;
        let updated = self.catalog.update_book(&book.id, draft).await?;
        self.bus.publish(&EntityUpdate {
            entity: EntityId::Book(book.id.clone()),
            patch: Patch::Book(BookPatch::content_of(&updated)),
        });
        Ok(updated)
    }

    /// Owner-only book deletion; subscribed views drop the row.
    pub async fn delete_book(&self, book: &BookRecord) -> SyncResult<()> {
        let session = self.require_session()?;
        if session.user != book.owner {
            return Err(SyncError::Forbidden);
        }
        self.catalog.delete_book(&book.id).await?;
        debug!(book = %book.id, "book deleted");
        self.bus.publish(&EntityUpdate {
            entity: EntityId::Book(book.id.clone()),
            patch: Patch::Removed,
        });
        Ok(())
    }

    /// Books the viewer has bookmarked, for mount-time flag computation.
    pub async fn bookmarked_books(&self) -> SyncResult<Vec<BookRecord>> {
        self.require_session()?;
        Ok(self.catalog.bookmarked_books().await?)
    }

    /// Books the viewer has liked, for mount-time flag computation.
    pub async fn liked_books(&self) -> SyncResult<Vec<BookRecord>> {
        self.require_session()?;
        Ok(self.catalog.liked_books().await?)
    }

    /// Viewer profile document.
    pub async fn profile(&self) -> SyncResult<UserProfile> {
        self.require_session()?;
        Ok(self.catalog.profile().await?)
    }

    /// Updates the viewer profile; returns the stored document.
    pub async fn update_profile(&self, profile: &UserProfile) -> SyncResult<UserProfile> {
        self.require_session()?;
        if profile.name.trim().is_empty() {
            return Err(SyncError::Validation(
                "display name cannot be empty".to_string(),
            ));
        }
        Ok(self.catalog.update_profile(profile).await?)
    }

    /// Aggregate reading statistics for the viewer.
    pub async fn reading_stats(&self) -> SyncResult<ReadingStats> {
        self.require_session()?;
        Ok(self.catalog.reading_stats().await?)
    }

    fn require_session(&self) -> SyncResult<Session> {
        self.session.current().ok_or(SyncError::Unauthenticated)
    }
}

fn validate_review(draft: &ReviewDraft) -> SyncResult<()> {
    if draft.text.trim().is_empty() {
        return Err(SyncError::Validation("review cannot be empty".to_string()));
    }
    if !(1..=5).contains(&draft.rating) {
        return Err(SyncError::Validation(
            "rating must be between 1 and 5".to_string(),
        ));
    }
    Ok(())
}

fn validate_book(draft: &BookDraft) -> SyncResult<()> {
    if draft.title.trim().is_empty() {
        return Err(SyncError::Validation("title cannot be empty".to_string()));
    }
    if draft.author.trim().is_empty() {
        return Err(SyncError::Validation("author cannot be empty".to_string()));
    }
    Ok(())
}
