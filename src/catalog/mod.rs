//! Remote catalog boundary: contract trait, errors, and wire envelopes.

pub mod http;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::entity::{BookDraft, BookRecord, ReviewDraft, ReviewRecord};
use crate::types::{BookId, ReadingStatus, ReviewId, SortOrder, StatusFilter, UserId};

/// Errors surfaced by catalog implementations.
#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    /// Request requires a signed-in session.
    #[error("not signed in")]
    Unauthenticated,
    /// The service refused the operation for this viewer.
    #[error("forbidden")]
    Forbidden,
    /// Entity missing or deleted server-side.
    #[error("not found")]
    NotFound,
    /// The service rejected the request payload.
    #[error("invalid request: {0}")]
    Validation(String),
    /// The service reported a failure.
    #[error("server error (status {status}): {message}")]
    Server {
        /// HTTP status code.
        status: u16,
        /// Server-provided message, when one was decodable.
        message: String,
    },
    /// Connection, TLS, or timeout failure.
    #[error("transport: {0}")]
    Transport(#[from] reqwest::Error),
    /// Response body did not match the expected shape.
    #[error("malformed response: {0}")]
    Decode(String),
}

/// Convenience alias for catalog results.
pub type CatalogResult<T> = Result<T, CatalogError>;

/// Filters for the paginated book listing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BookQuery {
    /// 1-based page number.
    pub page: u32,
    /// Rows per page.
    pub limit: u32,
    /// Sort order.
    pub sort: SortOrder,
    /// Reading-status filter.
    pub status: StatusFilter,
    /// Category label; `None` means all categories.
    pub category: Option<String>,
    /// Restrict to one owner's books.
    pub owner: Option<UserId>,
}

impl Default for BookQuery {
    fn default() -> Self {
        Self {
            page: 1,
            limit: 12,
            sort: SortOrder::default(),
            status: StatusFilter::default(),
            category: None,
            owner: None,
        }
    }
}

/// One page of catalog books.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct BookPage {
    /// Page rows.
    pub books: Vec<BookRecord>,
    /// Total pages for the query.
    #[serde(rename = "totalPages", default)]
    pub total_pages: u32,
    /// Total matching books.
    #[serde(rename = "totalBooks", default)]
    pub total_books: u64,
}

/// Server-confirmed interaction state for one review.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
pub struct ReviewInteraction {
    /// Like count.
    #[serde(default)]
    pub likes: u64,
    /// Dislike count.
    #[serde(default)]
    pub dislikes: u64,
    /// True when the viewer likes the review.
    #[serde(rename = "userLiked", default)]
    pub user_liked: bool,
    /// True when the viewer dislikes the review.
    #[serde(rename = "userDisliked", default)]
    pub user_disliked: bool,
}

/// Ack for a posted review: the stored row plus recomputed aggregates.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ReviewPosted {
    /// Stored review row.
    pub review: ReviewRecord,
    /// New average rating for the parent book.
    #[serde(rename = "averageRating", default)]
    pub average_rating: f32,
    /// New review count for the parent book.
    #[serde(rename = "totalReviews", default)]
    pub total_reviews: u64,
}

/// Viewer profile document.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct UserProfile {
    /// Display name.
    #[serde(default)]
    pub name: String,
    /// Avatar reference.
    #[serde(rename = "profilePhoto", default)]
    pub photo: Option<String>,
    /// Free-text bio.
    #[serde(default)]
    pub bio: Option<String>,
}

/// Aggregate reading statistics for the viewer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
pub struct ReadingStats {
    /// Books owned by the viewer.
    #[serde(rename = "totalBooks", default)]
    pub total_books: u64,
    /// Books marked read.
    #[serde(rename = "booksRead", default)]
    pub books_read: u64,
    /// Books currently being read.
    #[serde(rename = "currentlyReading", default)]
    pub currently_reading: u64,
    /// Books shelved for later.
    #[serde(rename = "wantToRead", default)]
    pub want_to_read: u64,
    /// Reviews the viewer has written.
    #[serde(rename = "totalReviews", default)]
    pub total_reviews: u64,
    /// Upvotes received across the viewer's books.
    #[serde(rename = "totalUpvotes", default)]
    pub total_upvotes: u64,
}

/// Contract for the remote catalog/review service.
///
/// One implementation speaks HTTP ([`http::HttpCatalog`]); tests
/// substitute programmable fakes. Durable state lives entirely behind
/// this boundary.
#[async_trait]
pub trait CatalogApi: Send + Sync {
    /// Paginated, filtered book listing.
    async fn list_books(&self, query: &BookQuery) -> CatalogResult<BookPage>;

    /// Trending rail for the home view.
    async fn trending_books(&self) -> CatalogResult<Vec<BookRecord>>;

    /// Single book by id.
    async fn fetch_book(&self, book: &BookId) -> CatalogResult<BookRecord>;

    /// Reviews attached to one book.
    async fn fetch_reviews(&self, book: &BookId) -> CatalogResult<Vec<ReviewRecord>>;

    /// Free-text title/author search.
    async fn search_books(&self, query: &str) -> CatalogResult<Vec<BookRecord>>;

    /// Viewer's like/dislike state for one review.
    async fn review_status(&self, review: &ReviewId) -> CatalogResult<ReviewInteraction>;

    /// Establishes (`true`) or removes (`false`) the viewer's bookmark.
    async fn set_bookmark(&self, book: &BookId, establish: bool) -> CatalogResult<()>;

    /// Establishes or removes the viewer's like; returns the
    /// authoritative like count.
    async fn set_book_like(&self, book: &BookId, establish: bool) -> CatalogResult<u64>;

    /// Records the viewer's upvote; returns the updated book.
    async fn upvote_book(&self, book: &BookId) -> CatalogResult<BookRecord>;

    /// Toggles the viewer's like on a review; returns the full
    /// server-confirmed interaction state.
    async fn like_review(&self, review: &ReviewId) -> CatalogResult<ReviewInteraction>;

    /// Toggles the viewer's dislike on a review; returns the full
    /// server-confirmed interaction state.
    async fn dislike_review(&self, review: &ReviewId) -> CatalogResult<ReviewInteraction>;

    /// Owner-only reading-status update.
    async fn set_reading_status(&self, book: &BookId, status: ReadingStatus) -> CatalogResult<()>;

    /// Creates a book owned by the viewer.
    async fn create_book(&self, draft: &BookDraft) -> CatalogResult<BookRecord>;

    /// Owner-only book replacement.
    async fn update_book(&self, book: &BookId, draft: &BookDraft) -> CatalogResult<BookRecord>;

    /// Owner-only book deletion.
    async fn delete_book(&self, book: &BookId) -> CatalogResult<()>;

    /// Posts a review on `book`.
    async fn submit_review(
        &self,
        book: &BookId,
        draft: &ReviewDraft,
    ) -> CatalogResult<ReviewPosted>;

    /// Author-only review edit.
    async fn update_review(
        &self,
        review: &ReviewId,
        draft: &ReviewDraft,
    ) -> CatalogResult<ReviewRecord>;

    /// Author-only review deletion.
    async fn delete_review(&self, review: &ReviewId) -> CatalogResult<()>;

    /// Books the viewer has bookmarked.
    async fn bookmarked_books(&self) -> CatalogResult<Vec<BookRecord>>;

    /// Books the viewer has liked.
    async fn liked_books(&self) -> CatalogResult<Vec<BookRecord>>;

    /// Viewer profile document.
    async fn profile(&self) -> CatalogResult<UserProfile>;

    /// Updates the viewer profile; returns the stored document.
    async fn update_profile(&self, profile: &UserProfile) -> CatalogResult<UserProfile>;

    /// Aggregate reading statistics for the viewer.
    async fn reading_stats(&self) -> CatalogResult<ReadingStats>;
}
