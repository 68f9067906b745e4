#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};

use async_trait::async_trait;
use tokio::time::{Duration, sleep};

use shelfsync::catalog::{
    BookPage, BookQuery, CatalogApi, CatalogError, CatalogResult, ReadingStats, ReviewInteraction,
    ReviewPosted, UserProfile,
};
use shelfsync::entity::{
    BookDraft, BookRecord, BookSnapshot, RelationFlags, ReviewDraft, ReviewRecord,
};
use shelfsync::session::{Session, SessionStore};
use shelfsync::types::{BookId, ReadingStatus, ReviewId};

/// One recorded catalog call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    Bookmark { book: BookId, establish: bool },
    BookLike { book: BookId, establish: bool },
    Upvote { book: BookId },
    ReviewLike { review: ReviewId },
    ReviewDislike { review: ReviewId },
    Status { book: BookId, status: ReadingStatus },
    Search { query: String },
    SubmitReview { book: BookId },
    UpdateReview { review: ReviewId },
    DeleteReview { review: ReviewId },
    UpdateBook { book: BookId },
    DeleteBook { book: BookId },
}

/// Programmable in-memory catalog with a shared call log.
#[derive(Default)]
pub struct FakeCatalog {
    pub calls: Mutex<Vec<Call>>,
    pub fail_all: AtomicBool,
    pub delay_ms: AtomicU64,
    pub like_count: AtomicU64,
    pub upvote_ack: Mutex<Option<BookRecord>>,
    pub review_state: Mutex<ReviewInteraction>,
    pub search_results: Mutex<HashMap<String, Vec<BookRecord>>>,
    pub search_delays: Mutex<HashMap<String, u64>>,
    pub posted: Mutex<Option<ReviewPosted>>,
}

impl FakeCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    fn record(&self, call: Call) {
        self.calls.lock().unwrap().push(call);
    }

    async fn gate(&self) -> CatalogResult<()> {
        let delay = self.delay_ms.load(Ordering::SeqCst);
        if delay > 0 {
            sleep(Duration::from_millis(delay)).await;
        }
        if self.fail_all.load(Ordering::SeqCst) {
            return Err(CatalogError::Server {
                status: 503,
                message: "scripted failure".to_string(),
            });
        }
        Ok(())
    }
}

#[async_trait]
impl CatalogApi for FakeCatalog {
    async fn list_books(&self, _query: &BookQuery) -> CatalogResult<BookPage> {
        self.gate().await?;
        Ok(BookPage {
            books: vec![],
            total_pages: 0,
            total_books: 0,
        })
    }

    async fn trending_books(&self) -> CatalogResult<Vec<BookRecord>> {
        self.gate().await?;
        Ok(vec![])
    }

    async fn fetch_book(&self, _book: &BookId) -> CatalogResult<BookRecord> {
        self.gate().await?;
        Err(CatalogError::NotFound)
    }

    async fn fetch_reviews(&self, _book: &BookId) -> CatalogResult<Vec<ReviewRecord>> {
        self.gate().await?;
        Ok(vec![])
    }

    async fn search_books(&self, query: &str) -> CatalogResult<Vec<BookRecord>> {
        self.record(Call::Search {
            query: query.to_string(),
        });
        let delay = self
            .search_delays
            .lock()
            .unwrap()
            .get(query)
            .copied()
            .unwrap_or(0);
        if delay > 0 {
            sleep(Duration::from_millis(delay)).await;
        }
        self.gate().await?;
        Ok(self
            .search_results
            .lock()
            .unwrap()
            .get(query)
            .cloned()
            .unwrap_or_default())
    }

    async fn review_status(&self, _review: &ReviewId) -> CatalogResult<ReviewInteraction> {
        self.gate().await?;
        Ok(*self.review_state.lock().unwrap())
    }

    async fn set_bookmark(&self, book: &BookId, establish: bool) -> CatalogResult<()> {
        self.record(Call::Bookmark {
            book: book.clone(),
            establish,
        });
        self.gate().await
    }

    async fn set_book_like(&self, book: &BookId, establish: bool) -> CatalogResult<u64> {
        self.record(Call::BookLike {
            book: book.clone(),
            establish,
        });
        self.gate().await?;
        Ok(self.like_count.load(Ordering::SeqCst))
    }

    async fn upvote_book(&self, book: &BookId) -> CatalogResult<BookRecord> {
        self.record(Call::Upvote { book: book.clone() });
        self.gate().await?;
        Ok(self.upvote_ack.lock().unwrap().clone().unwrap_or_default())
    }

    async fn like_review(&self, review: &ReviewId) -> CatalogResult<ReviewInteraction> {
        self.record(Call::ReviewLike {
            review: review.clone(),
        });
        self.gate().await?;
        Ok(*self.review_state.lock().unwrap())
    }

    async fn dislike_review(&self, review: &ReviewId) -> CatalogResult<ReviewInteraction> {
        self.record(Call::ReviewDislike {
            review: review.clone(),
        });
        self.gate().await?;
        Ok(*self.review_state.lock().unwrap())
    }

    async fn set_reading_status(&self, book: &BookId, status: ReadingStatus) -> CatalogResult<()> {
        self.record(Call::Status {
            book: book.clone(),
            status,
        });
        self.gate().await
    }

    async fn create_book(&self, draft: &BookDraft) -> CatalogResult<BookRecord> {
        self.gate().await?;
        Ok(record_from_draft("created", draft))
    }

    async fn update_book(&self, book: &BookId, draft: &BookDraft) -> CatalogResult<BookRecord> {
        self.record(Call::UpdateBook { book: book.clone() });
        self.gate().await?;
        Ok(record_from_draft(book, draft))
    }

    async fn delete_book(&self, book: &BookId) -> CatalogResult<()> {
        self.record(Call::DeleteBook { book: book.clone() });
        self.gate().await
    }

    async fn submit_review(
        &self,
        book: &BookId,
        _draft: &ReviewDraft,
    ) -> CatalogResult<ReviewPosted> {
        self.record(Call::SubmitReview { book: book.clone() });
        self.gate().await?;
        Ok(self.posted.lock().unwrap().clone().unwrap_or(ReviewPosted {
            review: ReviewRecord::default(),
            average_rating: 0.0,
            total_reviews: 0,
        }))
    }

    async fn update_review(
        &self,
        review: &ReviewId,
        draft: &ReviewDraft,
    ) -> CatalogResult<ReviewRecord> {
        self.record(Call::UpdateReview {
            review: review.clone(),
        });
        self.gate().await?;
        Ok(ReviewRecord {
            id: review.clone(),
            text: draft.text.clone(),
            rating: draft.rating,
            ..ReviewRecord::default()
        })
    }

    async fn delete_review(&self, review: &ReviewId) -> CatalogResult<()> {
        self.record(Call::DeleteReview {
            review: review.clone(),
        });
        self.gate().await
    }

    async fn bookmarked_books(&self) -> CatalogResult<Vec<BookRecord>> {
        self.gate().await?;
        Ok(vec![])
    }

    async fn liked_books(&self) -> CatalogResult<Vec<BookRecord>> {
        self.gate().await?;
        Ok(vec![])
    }

    async fn profile(&self) -> CatalogResult<UserProfile> {
        self.gate().await?;
        Ok(UserProfile::default())
    }

    async fn update_profile(&self, profile: &UserProfile) -> CatalogResult<UserProfile> {
        self.gate().await?;
        Ok(profile.clone())
    }

    async fn reading_stats(&self) -> CatalogResult<ReadingStats> {
        self.gate().await?;
        Ok(ReadingStats::default())
    }
}

fn record_from_draft(id: &str, draft: &BookDraft) -> BookRecord {
    BookRecord {
        id: id.to_string(),
        title: draft.title.clone(),
        author: draft.author.clone(),
        category: draft.category.clone(),
        cover: draft.cover.clone(),
        overview: draft.overview.clone(),
        total_pages: draft.total_pages,
        reading_status: draft.reading_status,
        ..BookRecord::default()
    }
}

pub fn book(id: &str, owner: &str) -> BookRecord {
    BookRecord {
        id: id.to_string(),
        title: format!("Book {id}"),
        author: "Author".to_string(),
        owner: owner.to_string(),
        ..BookRecord::default()
    }
}

pub fn snapshot(id: &str, owner: &str) -> BookSnapshot {
    BookSnapshot {
        record: book(id, owner),
        flags: RelationFlags::default(),
    }
}

pub fn review(id: &str, author: &str) -> ReviewRecord {
    ReviewRecord {
        id: id.to_string(),
        book_id: "b1".to_string(),
        author: author.to_string(),
        rating: 4,
        text: "solid read".to_string(),
        ..ReviewRecord::default()
    }
}

pub fn book_draft(title: &str) -> BookDraft {
    BookDraft {
        title: title.to_string(),
        author: "Author".to_string(),
        category: "Fiction".to_string(),
        cover: None,
        overview: "overview".to_string(),
        total_pages: 320,
        reading_status: ReadingStatus::Unset,
    }
}

pub fn signed_in(user: &str) -> SessionStore {
    let store = SessionStore::new();
    store.sign_in(Session {
        user: user.to_string(),
        token: "opaque-token".to_string(),
    });
    store
}
