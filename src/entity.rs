//! Book and review records, drafts, relation flags, and sparse patches.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::types::{BookId, ReadingStatus, ReviewId, UserId};

/// Fully materialized catalog book as returned by the service.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct BookRecord {
    /// Stable book identifier.
    #[serde(rename = "_id")]
    pub id: BookId,
    /// Title.
    #[serde(rename = "bookTitle")]
    pub title: String,
    /// Author name.
    #[serde(rename = "bookAuthor")]
    pub author: String,
    /// Category label.
    #[serde(rename = "bookCategory", default)]
    pub category: String,
    /// Cover image reference, when one was uploaded.
    #[serde(rename = "coverImage", default)]
    pub cover: Option<String>,
    /// Synopsis text.
    #[serde(rename = "bookOverview", default)]
    pub overview: String,
    /// Total page count.
    #[serde(rename = "totalPage", default)]
    pub total_pages: u32,
    /// Owner identity.
    #[serde(rename = "userEmail")]
    pub owner: UserId,
    /// Upvote count.
    #[serde(rename = "upvote", default)]
    pub upvotes: u64,
    /// Like count.
    #[serde(default)]
    pub likes: u64,
    /// Identities that upvoted this book.
    #[serde(rename = "upvotedBy", default)]
    pub upvoted_by: Vec<UserId>,
    /// Average review rating, 0 through 5.
    #[serde(default)]
    pub rating: f32,
    /// Total review count.
    #[serde(rename = "totalReviews", default)]
    pub total_reviews: u64,
    /// Owner's reading progress.
    #[serde(rename = "readingStatus", default)]
    pub reading_status: ReadingStatus,
    /// Creation timestamp.
    #[serde(rename = "createdAt", default)]
    pub created_at: Option<DateTime<Utc>>,
}

/// One review row as returned by the service.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ReviewRecord {
    /// Stable review identifier.
    #[serde(rename = "_id")]
    pub id: ReviewId,
    /// Parent book identifier.
    #[serde(rename = "bookId", default)]
    pub book_id: BookId,
    /// Author identity.
    #[serde(rename = "userEmail")]
    pub author: UserId,
    /// Author display name.
    #[serde(rename = "userName", default)]
    pub author_name: Option<String>,
    /// Author avatar reference.
    #[serde(rename = "userPhoto", default)]
    pub author_photo: Option<String>,
    /// Star rating, 1 through 5.
    #[serde(default)]
    pub rating: u8,
    /// Review body.
    #[serde(rename = "reviewText")]
    pub text: String,
    /// Like count.
    #[serde(default)]
    pub likes: u64,
    /// Dislike count.
    #[serde(default)]
    pub dislikes: u64,
    /// True when the current viewer liked this review.
    #[serde(rename = "userLiked", default)]
    pub user_liked: bool,
    /// True when the current viewer disliked this review.
    #[serde(rename = "userDisliked", default)]
    pub user_disliked: bool,
    /// Creation timestamp.
    #[serde(rename = "createdAt", default)]
    pub created_at: Option<DateTime<Utc>>,
}

/// Viewer-derived relation flags for one book.
///
/// These are a locally cached projection of the viewer's relation edges;
/// the edges behind the remote catalog remain the source of truth.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RelationFlags {
    /// Viewer bookmarked the book.
    pub bookmarked: bool,
    /// Viewer liked the book.
    pub liked: bool,
    /// Viewer upvoted the book.
    pub upvoted: bool,
}

impl RelationFlags {
    /// Computes mount-time flags from the viewer's relation lists.
    ///
    /// Returns all-false when no viewer is signed in.
    pub fn for_book(
        book: &BookRecord,
        viewer: Option<&str>,
        bookmarks: &[BookRecord],
        likes: &[BookRecord],
    ) -> Self {
        let Some(viewer) = viewer else {
            return Self::default();
        };
        Self {
            bookmarked: bookmarks.iter().any(|b| b.id == book.id),
            liked: likes.iter().any(|b| b.id == book.id),
            upvoted: book.upvoted_by.iter().any(|u| u == viewer),
        }
    }
}

/// A view's local copy of one book plus the viewer's relation flags.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct BookSnapshot {
    /// Book row.
    pub record: BookRecord,
    /// Viewer relation flags.
    pub flags: RelationFlags,
}

/// Payload for creating or replacing a book.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BookDraft {
    /// Title.
    #[serde(rename = "bookTitle")]
    pub title: String,
    /// Author name.
    #[serde(rename = "bookAuthor")]
    pub author: String,
    /// Category label.
    #[serde(rename = "bookCategory")]
    pub category: String,
    /// Cover image reference.
    #[serde(rename = "coverImage", skip_serializing_if = "Option::is_none")]
    pub cover: Option<String>,
    /// Synopsis text.
    #[serde(rename = "bookOverview")]
    pub overview: String,
    /// Total page count.
    #[serde(rename = "totalPage")]
    pub total_pages: u32,
    /// Initial reading progress.
    #[serde(rename = "readingStatus")]
    pub reading_status: ReadingStatus,
}

/// Review submission payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReviewDraft {
    /// Review body.
    #[serde(rename = "reviewText")]
    pub text: String,
    /// Star rating, 1 through 5.
    pub rating: u8,
}

/// Sparse book patch where each `Some` field overwrites the snapshot value.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct BookPatch {
    /// Replacement for the viewer's bookmarked flag.
    pub bookmarked: Option<bool>,
    /// Replacement for the viewer's liked flag.
    pub liked: Option<bool>,
    /// Replacement for the viewer's upvoted flag.
    pub upvoted: Option<bool>,
    /// Replacement like count.
    pub likes: Option<u64>,
    /// Replacement upvote count.
    pub upvotes: Option<u64>,
    /// Replacement average rating.
    pub rating: Option<f32>,
    /// Replacement review count.
    pub total_reviews: Option<u64>,
    /// Replacement reading status.
    pub reading_status: Option<ReadingStatus>,
    /// Replacement title.
    pub title: Option<String>,
    /// Replacement author name.
    pub author: Option<String>,
    /// Replacement category.
    pub category: Option<String>,
    /// Replacement cover reference.
    pub cover: Option<Option<String>>,
    /// Replacement synopsis.
    pub overview: Option<String>,
    /// Replacement page count.
    pub total_pages: Option<u32>,
}

impl BookPatch {
    /// Returns true when no fields are set.
    pub fn is_empty(&self) -> bool {
        self == &Self::default()
    }

    /// Applies this patch in place to `snap`.
    pub fn apply_to(&self, snap: &mut BookSnapshot) {
        if let Some(v) = self.bookmarked {
            snap.flags.bookmarked = v;
        }
        if let Some(v) = self.liked {
            snap.flags.liked = v;
        }
        if let Some(v) = self.upvoted {
            snap.flags.upvoted = v;
        }
        if let Some(v) = self.likes {
            snap.record.likes = v;
        }
        if let Some(v) = self.upvotes {
            snap.record.upvotes = v;
        }
        if let Some(v) = self.rating {
            snap.record.rating = v;
        }
        if let Some(v) = self.total_reviews {
            snap.record.total_reviews = v;
        }
        if let Some(v) = self.reading_status {
            snap.record.reading_status = v;
        }
        if let Some(v) = &self.title {
            snap.record.title = v.clone();
        }
        if let Some(v) = &self.author {
            snap.record.author = v.clone();
        }
        if let Some(v) = &self.category {
            snap.record.category = v.clone();
        }
        if let Some(v) = &self.cover {
            snap.record.cover = v.clone();
        }
        if let Some(v) = &self.overview {
            snap.record.overview = v.clone();
        }
        if let Some(v) = self.total_pages {
            snap.record.total_pages = v;
        }
    }

    /// Patch carrying the editable content fields of `record`.
    pub fn content_of(record: &BookRecord) -> Self {
        Self {
            title: Some(record.title.clone()),
            author: Some(record.author.clone()),
            category: Some(record.category.clone()),
            cover: Some(record.cover.clone()),
            overview: Some(record.overview.clone()),
            total_pages: Some(record.total_pages),
            reading_status: Some(record.reading_status),
            ..Self::default()
        }
    }
}

/// Sparse review patch where each `Some` field overwrites the row value.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ReviewPatch {
    /// Replacement like count.
    pub likes: Option<u64>,
    /// Replacement dislike count.
    pub dislikes: Option<u64>,
    /// Replacement for the viewer's liked flag.
    pub user_liked: Option<bool>,
    /// Replacement for the viewer's disliked flag.
    pub user_disliked: Option<bool>,
    /// Replacement rating.
    pub rating: Option<u8>,
    /// Replacement body.
    pub text: Option<String>,
}

impl ReviewPatch {
    /// Returns true when no fields are set.
    pub fn is_empty(&self) -> bool {
        self == &Self::default()
    }

    /// Applies this patch in place to `rec`.
    pub fn apply_to(&self, rec: &mut ReviewRecord) {
        if let Some(v) = self.likes {
            rec.likes = v;
        }
        if let Some(v) = self.dislikes {
            rec.dislikes = v;
        }
        if let Some(v) = self.user_liked {
            rec.user_liked = v;
        }
        if let Some(v) = self.user_disliked {
            rec.user_disliked = v;
        }
        if let Some(v) = self.rating {
            rec.rating = v;
        }
        if let Some(v) = &self.text {
            rec.text = v.clone();
        }
    }
}
