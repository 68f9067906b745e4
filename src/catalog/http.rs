//! reqwest-backed implementation of the catalog contract.

use async_trait::async_trait;
use reqwest::{Client, Method, RequestBuilder, Response, StatusCode};
use serde::Deserialize;
use serde::de::DeserializeOwned;
use tracing::debug;

use super::{
    BookPage, BookQuery, CatalogApi, CatalogError, CatalogResult, ReadingStats, ReviewInteraction,
    ReviewPosted, UserProfile,
};
use crate::entity::{BookDraft, BookRecord, ReviewDraft, ReviewRecord};
use crate::session::SessionStore;
use crate::types::{BookId, ReadingStatus, ReviewId};

/// HTTP client for the hosted catalog service.
pub struct HttpCatalog {
    http: Client,
    base_url: String,
    session: SessionStore,
}

impl HttpCatalog {
    /// Creates a client rooted at `base_url` (e.g. `https://host/api`).
    ///
    /// Bearer credentials are read from `session` per request, so a
    /// sign-in after construction is picked up without rebuilding.
    pub fn new(base_url: impl Into<String>, session: SessionStore) -> Self {
        let mut base_url = base_url.into();
        while base_url.ends_with('/') {
            base_url.pop();
        }
        Self {
            http: Client::new(),
            base_url,
            session,
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{path}", self.base_url)
    }

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        debug!(%method, path, "catalog request");
        self.http.request(method, self.url(path))
    }

    fn authed(&self, method: Method, path: &str) -> CatalogResult<RequestBuilder> {
        let token = self.session.token().ok_or(CatalogError::Unauthenticated)?;
        Ok(self.request(method, path).bearer_auth(token))
    }

    async fn check(response: Response) -> CatalogResult<Response> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let message = response
            .bytes()
            .await
            .ok()
            .and_then(|body| serde_json::from_slice::<ErrorBody>(&body).ok())
            .map(|body| body.message)
            .unwrap_or_else(|| {
                status
                    .canonical_reason()
                    .unwrap_or("request failed")
                    .to_string()
            });
        Err(match status {
            StatusCode::UNAUTHORIZED => CatalogError::Unauthenticated,
            StatusCode::FORBIDDEN => CatalogError::Forbidden,
            StatusCode::NOT_FOUND => CatalogError::NotFound,
            s if s.is_client_error() => CatalogError::Validation(message),
            s => CatalogError::Server {
                status: s.as_u16(),
                message,
            },
        })
    }

    async fn decode<T: DeserializeOwned>(response: Response) -> CatalogResult<T> {
        let response = Self::check(response).await?;
        let body = response.bytes().await?;
        serde_json::from_slice(&body).map_err(|err| CatalogError::Decode(err.to_string()))
    }

    async fn expect_ok(response: Response) -> CatalogResult<()> {
        Self::check(response).await.map(|_| ())
    }
}

#[derive(Deserialize)]
struct ErrorBody {
    message: String,
}

#[derive(Deserialize)]
struct BooksEnvelope {
    books: Vec<BookRecord>,
}

// The like ack nests the count under `book` on current deployments and
// carried it bare on older ones; accept both.
#[derive(Deserialize)]
struct LikeAck {
    book: Option<LikeCount>,
    likes: Option<u64>,
}

#[derive(Deserialize)]
struct LikeCount {
    likes: u64,
}

#[derive(Deserialize)]
struct UpvoteAck {
    book: BookRecord,
}

#[derive(Deserialize)]
struct ProfileEnvelope {
    user: UserProfile,
}

#[async_trait]
impl CatalogApi for HttpCatalog {
    async fn list_books(&self, query: &BookQuery) -> CatalogResult<BookPage> {
        let mut request = self.request(Method::GET, "books").query(&[
            ("page", query.page.to_string()),
            ("limit", query.limit.to_string()),
            ("sort", query.sort.as_str().to_string()),
            ("status", query.status.as_str().to_string()),
            ("category", query.category.clone().unwrap_or_default()),
        ]);
        if let Some(owner) = &query.owner {
            request = request.query(&[("userEmail", owner.as_str())]);
        }
        Self::decode(request.send().await?).await
    }

    async fn trending_books(&self) -> CatalogResult<Vec<BookRecord>> {
        Self::decode(self.request(Method::GET, "books/trending").send().await?).await
    }

    async fn fetch_book(&self, book: &BookId) -> CatalogResult<BookRecord> {
        Self::decode(
            self.request(Method::GET, &format!("books/{book}"))
                .send()
                .await?,
        )
        .await
    }

    async fn fetch_reviews(&self, book: &BookId) -> CatalogResult<Vec<ReviewRecord>> {
        Self::decode(
            self.request(Method::GET, &format!("books/{book}/reviews"))
                .send()
                .await?,
        )
        .await
    }

    async fn search_books(&self, query: &str) -> CatalogResult<Vec<BookRecord>> {
        let response = self
            .request(Method::GET, "books/search")
            .query(&[("q", query)])
            .send()
            .await?;
        Self::decode::<BooksEnvelope>(response)
            .await
            .map(|envelope| envelope.books)
    }

    async fn review_status(&self, review: &ReviewId) -> CatalogResult<ReviewInteraction> {
        let request = self.authed(Method::GET, &format!("reviews/{review}/status"))?;
        Self::decode(request.send().await?).await
    }

    async fn set_bookmark(&self, book: &BookId, establish: bool) -> CatalogResult<()> {
        let method = if establish {
            Method::POST
        } else {
            Method::DELETE
        };
        let request = self.authed(method, &format!("books/{book}/bookmark"))?;
        Self::expect_ok(request.send().await?).await
    }

    async fn set_book_like(&self, book: &BookId, establish: bool) -> CatalogResult<u64> {
        let method = if establish {
            Method::POST
        } else {
            Method::DELETE
        };
        let request = self.authed(method, &format!("books/{book}/like"))?;
        let ack: LikeAck = Self::decode(request.send().await?).await?;
        ack.book
            .map(|b| b.likes)
            .or(ack.likes)
            .ok_or_else(|| CatalogError::Decode("like ack carried no count".to_string()))
    }

    async fn upvote_book(&self, book: &BookId) -> CatalogResult<BookRecord> {
        let request = self.authed(Method::POST, &format!("books/{book}/upvote"))?;
        let ack: UpvoteAck = Self::decode(request.send().await?).await?;
        Ok(ack.book)
    }

    async fn like_review(&self, review: &ReviewId) -> CatalogResult<ReviewInteraction> {
        let request = self.authed(Method::POST, &format!("reviews/{review}/like"))?;
        Self::decode(request.send().await?).await
    }

    async fn dislike_review(&self, review: &ReviewId) -> CatalogResult<ReviewInteraction> {
        let request = self.authed(Method::POST, &format!("reviews/{review}/dislike"))?;
        Self::decode(request.send().await?).await
    }

    async fn set_reading_status(&self, book: &BookId, status: ReadingStatus) -> CatalogResult<()> {
        let request = self
            .authed(Method::PATCH, &format!("books/{book}"))?
            .json(&serde_json::json!({ "readingStatus": status }));
        Self::expect_ok(request.send().await?).await
    }

    async fn create_book(&self, draft: &BookDraft) -> CatalogResult<BookRecord> {
        let request = self.authed(Method::POST, "books")?.json(draft);
        Self::decode(request.send().await?).await
    }

    async fn update_book(&self, book: &BookId, draft: &BookDraft) -> CatalogResult<BookRecord> {
        let request = self
            .authed(Method::PATCH, &format!("books/{book}"))?
            .json(draft);
        Self::decode(request.send().await?).await
    }

    async fn delete_book(&self, book: &BookId) -> CatalogResult<()> {
        let request = self.authed(Method::DELETE, &format!("books/{book}"))?;
        Self::expect_ok(request.send().await?).await
    }

    async fn submit_review(
        &self,
        book: &BookId,
        draft: &ReviewDraft,
    ) -> CatalogResult<ReviewPosted> {
        let request = self
            .authed(Method::POST, &format!("books/{book}/reviews"))?
            .json(draft);
        Self::decode(request.send().await?).await
    }

    async fn update_review(
        &self,
        review: &ReviewId,
        draft: &ReviewDraft,
    ) -> CatalogResult<ReviewRecord> {
        let request = self
            .authed(Method::PATCH, &format!("reviews/{review}"))?
            .json(draft);
        Self::decode(request.send().await?).await
    }

    async fn delete_review(&self, review: &ReviewId) -> CatalogResult<()> {
        let request = self.authed(Method::DELETE, &format!("reviews/{review}"))?;
        Self::expect_ok(request.send().await?).await
    }

    async fn bookmarked_books(&self) -> CatalogResult<Vec<BookRecord>> {
        let request = self.authed(Method::GET, "users/bookmarks")?;
        Self::decode(request.send().await?).await
    }

    async fn liked_books(&self) -> CatalogResult<Vec<BookRecord>> {
        let request = self.authed(Method::GET, "users/likes")?;
        Self::decode(request.send().await?).await
    }

    async fn profile(&self) -> CatalogResult<UserProfile> {
        let request = self.authed(Method::GET, "users/profile")?;
        Self::decode::<ProfileEnvelope>(request.send().await?)
            .await
            .map(|envelope| envelope.user)
    }

    async fn update_profile(&self, profile: &UserProfile) -> CatalogResult<UserProfile> {
        let request = self.authed(Method::PATCH, "users/profile")?.json(profile);
        Self::decode(request.send().await?).await
    }

    async fn reading_stats(&self) -> CatalogResult<ReadingStats> {
        let request = self.authed(Method::GET, "users/stats")?;
        Self::decode(request.send().await?).await
    }
}
