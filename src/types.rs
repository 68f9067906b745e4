//! Shared identifiers and interaction enums.

use serde::{Deserialize, Serialize};

/// Opaque catalog book identifier.
pub type BookId = String;
/// Opaque review identifier.
pub type ReviewId = String;
/// Viewer/owner identity as issued by the auth collaborator.
pub type UserId = String;

/// Target of a toggle or broadcast, keyed across both entity kinds.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EntityId {
    /// A book in the catalog.
    Book(BookId),
    /// A review attached to a book.
    Review(ReviewId),
}

/// Binary relation kinds managed by the toggle engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ToggleKind {
    /// Viewer bookmarked the book.
    Bookmark,
    /// Viewer liked the book.
    Like,
    /// Viewer upvoted the book.
    Upvote,
    /// Viewer liked the review.
    ReviewLike,
    /// Viewer disliked the review.
    ReviewDislike,
}

impl ToggleKind {
    /// True when the entity's owner/author may not establish this relation.
    pub fn owner_guarded(self) -> bool {
        !matches!(self, Self::Bookmark)
    }

    /// True when the kind targets a review rather than a book.
    pub fn targets_review(self) -> bool {
        matches!(self, Self::ReviewLike | Self::ReviewDislike)
    }
}

/// Per-owner reading progress for a book.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum ReadingStatus {
    /// No status recorded.
    #[default]
    Unset,
    /// Shelved for later.
    WantToRead,
    /// Currently being read.
    Reading,
    /// Finished.
    Read,
}

impl ReadingStatus {
    /// Wire string used by the catalog service.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Unset => "",
            Self::WantToRead => "Want-to-Read",
            Self::Reading => "Reading",
            Self::Read => "Completed",
        }
    }
}

impl From<String> for ReadingStatus {
    fn from(value: String) -> Self {
        match value.as_str() {
            "Want-to-Read" => Self::WantToRead,
            "Reading" => Self::Reading,
            "Completed" => Self::Read,
            _ => Self::Unset,
        }
    }
}

impl From<ReadingStatus> for String {
    fn from(value: ReadingStatus) -> Self {
        value.as_str().to_string()
    }
}

/// Sort orders accepted by the paginated book listing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortOrder {
    /// Newest first.
    #[default]
    Newest,
    /// Oldest first.
    Oldest,
    /// Most upvoted first.
    Popular,
    /// Highest rated first.
    Rating,
    /// Title ascending.
    TitleAsc,
    /// Title descending.
    TitleDesc,
}

impl SortOrder {
    /// Wire string for the `sort` query parameter.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Newest => "newest",
            Self::Oldest => "oldest",
            Self::Popular => "popular",
            Self::Rating => "rating",
            Self::TitleAsc => "title_asc",
            Self::TitleDesc => "title_desc",
        }
    }
}

/// Reading-status filter for the paginated book listing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StatusFilter {
    /// No status filtering.
    #[default]
    All,
    /// Currently-reading books only.
    Reading,
    /// Want-to-read books only.
    WantToRead,
    /// Finished books only.
    Completed,
}

impl StatusFilter {
    /// Wire string for the `status` query parameter.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::All => "all",
            Self::Reading => "reading",
            Self::WantToRead => "want_to_read",
            Self::Completed => "completed",
        }
    }
}
