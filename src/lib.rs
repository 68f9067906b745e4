//! Client-side interaction-state synchronization for a remote book catalog.
//!
//! Keeps a viewer's bookmark/like/upvote/reading-status state
//! consistent across every mounted view holding a copy of the same
//! entity, and turns free-text keystrokes into debounced, cancellable
//! catalog searches. Durable state lives behind the remote catalog;
//! this crate owns only the in-memory reconciliation logic.
//!
//! # Examples
//!
//! Views mount rows on a shared [`bus::UpdateBus`] and receive
//! reconciled patches:
//! ```
//! use std::sync::Arc;
//!
//! use shelfsync::{
//!     bus::{EntityUpdate, Patch, UpdateBus},
//!     entity::{BookPatch, BookRecord, BookSnapshot, RelationFlags},
//!     projection::ViewProjection,
//!     types::EntityId,
//! };
//!
//! let bus = Arc::new(UpdateBus::new());
//! let mut shelf = ViewProjection::new(Arc::clone(&bus));
//! shelf.mount_book(BookSnapshot {
//!     record: BookRecord {
//!         id: "b1".to_string(),
//!         title: "Dune".to_string(),
//!         upvotes: 3,
//!         ..BookRecord::default()
//!     },
//!     flags: RelationFlags::default(),
//! });
//!
//! bus.publish(&EntityUpdate {
//!     entity: EntityId::Book("b1".to_string()),
//!     patch: Patch::Book(BookPatch {
//!         upvoted: Some(true),
//!         upvotes: Some(4),
//!         ..BookPatch::default()
//!     }),
//! });
//!
//! assert_eq!(shelf.book(&"b1".to_string()).map(|b| b.record.upvotes), Some(4));
//! ```
//!
//! Wiring the toggle engine to a hosted catalog:
//! ```no_run
//! use std::sync::Arc;
//!
//! use shelfsync::{
//!     bus::UpdateBus,
//!     catalog::http::HttpCatalog,
//!     engine::toggle::{ToggleEngine, ToggleTarget},
//!     session::{Session, SessionStore},
//!     types::{EntityId, ToggleKind},
//! };
//!
//! # #[tokio::main]
//! # async fn main() {
//! let session = SessionStore::new();
//! session.sign_in(Session {
//!     user: "reader@example.com".to_string(),
//!     token: "opaque-bearer-token".to_string(),
//! });
//! let catalog = Arc::new(HttpCatalog::new("https://books.example.com/api", session.clone()));
//! let bus = Arc::new(UpdateBus::new());
//! let toggles = ToggleEngine::new(catalog, bus, session);
//!
//! let outcome = toggles
//!     .toggle(&ToggleTarget {
//!         entity: EntityId::Book("64aa10f2".to_string()),
//!         kind: ToggleKind::Bookmark,
//!         owner: "author@example.com".to_string(),
//!         active: false,
//!     })
//!     .await;
//! # let _ = outcome;
//! # }
//! ```
#![deny(missing_docs)]

/// Entity-keyed publish/subscribe for reconciled updates.
pub mod bus;
/// Remote catalog contract and HTTP implementation.
pub mod catalog;
/// Records, drafts, relation flags, and sparse patches.
pub mod entity;
/// Toggle, reading-status, and library-mutation engines.
pub mod engine;
/// View-local snapshot stores.
pub mod projection;
/// Debounced catalog search.
pub mod search;
/// Viewer identity slot.
pub mod session;
/// Shared identifiers and enums.
pub mod types;
