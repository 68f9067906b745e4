//! View-local snapshot stores kept consistent through bus subscriptions.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use hashbrown::HashMap;

use crate::bus::{EntityUpdate, Patch, Subscription, UpdateBus};
use crate::entity::BookSnapshot;
use crate::entity::ReviewRecord;
use crate::types::{BookId, EntityId, ReviewId};

#[derive(Default)]
struct Rows {
    books: HashMap<BookId, BookSnapshot>,
    book_order: Vec<BookId>,
    reviews: HashMap<ReviewId, ReviewRecord>,
    review_order: Vec<ReviewId>,
}

impl Rows {
    fn apply(&mut self, update: &EntityUpdate) {
        match (&update.entity, &update.patch) {
            (EntityId::Book(id), Patch::Book(patch)) => {
                if let Some(snap) = self.books.get_mut(id) {
                    patch.apply_to(snap);
                }
            }
            (EntityId::Book(id), Patch::Removed) => {
                if self.books.remove(id).is_some() {
                    self.book_order.retain(|b| b != id);
                }
            }
            (EntityId::Review(id), Patch::Review(patch)) => {
                if let Some(rec) = self.reviews.get_mut(id) {
                    patch.apply_to(rec);
                }
            }
            (EntityId::Review(id), Patch::Removed) => {
                if self.reviews.remove(id).is_some() {
                    self.review_order.retain(|r| r != id);
                }
            }
            _ => {}
        }
    }
}

/// One mounted view's rows, patched by bus broadcasts until dropped.
///
/// A projection never computes counters itself; every mutation arrives
/// as a reconciled patch through the bus. Mounting a row registers one
/// subscription for its entity id, and dropping the projection (or
/// unmounting the row) removes the registration, so an unmounted view
/// can no longer be written to.
pub struct ViewProjection {
    bus: Arc<UpdateBus>,
    rows: Arc<Mutex<Rows>>,
    subscriptions: HashMap<EntityId, Subscription>,
}

impl ViewProjection {
    /// Creates an empty projection over `bus`.
    pub fn new(bus: Arc<UpdateBus>) -> Self {
        Self {
            bus,
            rows: Arc::new(Mutex::new(Rows::default())),
            subscriptions: HashMap::new(),
        }
    }

    /// Mounts one book row; re-mounting an id replaces its snapshot.
    pub fn mount_book(&mut self, snapshot: BookSnapshot) {
        let id = snapshot.record.id.clone();
        {
            let mut rows = lock(&self.rows);
            if !rows.books.contains_key(&id) {
                rows.book_order.push(id.clone());
            }
            rows.books.insert(id.clone(), snapshot);
        }
        self.ensure_subscribed(EntityId::Book(id));
    }

    /// Mounts a batch of book rows in iteration order.
    pub fn mount_books(&mut self, snapshots: impl IntoIterator<Item = BookSnapshot>) {
        for snapshot in snapshots {
            self.mount_book(snapshot);
        }
    }

    /// Mounts one review row; re-mounting an id replaces it.
    pub fn mount_review(&mut self, review: ReviewRecord) {
        let id = review.id.clone();
        {
            let mut rows = lock(&self.rows);
            if !rows.reviews.contains_key(&id) {
                rows.review_order.push(id.clone());
            }
            rows.reviews.insert(id.clone(), review);
        }
        self.ensure_subscribed(EntityId::Review(id));
    }

    /// Mounts a batch of review rows in iteration order.
    pub fn mount_reviews(&mut self, reviews: impl IntoIterator<Item = ReviewRecord>) {
        for review in reviews {
            self.mount_review(review);
        }
    }

    /// Drops one book row and its subscription.
    pub fn unmount_book(&mut self, id: &BookId) {
        let mut rows = lock(&self.rows);
        if rows.books.remove(id).is_some() {
            rows.book_order.retain(|b| b != id);
        }
        drop(rows);
        self.subscriptions.remove(&EntityId::Book(id.clone()));
    }

    /// Drops one review row and its subscription.
    pub fn unmount_review(&mut self, id: &ReviewId) {
        let mut rows = lock(&self.rows);
        if rows.reviews.remove(id).is_some() {
            rows.review_order.retain(|r| r != id);
        }
        drop(rows);
        self.subscriptions.remove(&EntityId::Review(id.clone()));
    }

    /// Current snapshot for one book.
    pub fn book(&self, id: &BookId) -> Option<BookSnapshot> {
        lock(&self.rows).books.get(id).cloned()
    }

    /// All book rows in mount order.
    pub fn books(&self) -> Vec<BookSnapshot> {
        let rows = lock(&self.rows);
        rows.book_order
            .iter()
            .filter_map(|id| rows.books.get(id).cloned())
            .collect()
    }

    /// Current row for one review.
    pub fn review(&self, id: &ReviewId) -> Option<ReviewRecord> {
        lock(&self.rows).reviews.get(id).cloned()
    }

    /// All review rows in mount order.
    pub fn reviews(&self) -> Vec<ReviewRecord> {
        let rows = lock(&self.rows);
        rows.review_order
            .iter()
            .filter_map(|id| rows.reviews.get(id).cloned())
            .collect()
    }

    /// Number of mounted rows across both entity kinds.
    pub fn len(&self) -> usize {
        let rows = lock(&self.rows);
        rows.book_order.len() + rows.review_order.len()
    }

    /// True when nothing is mounted.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn ensure_subscribed(&mut self, entity: EntityId) {
        if self.subscriptions.contains_key(&entity) {
            return;
        }
        let rows = Arc::clone(&self.rows);
        let subscription = self
            .bus
            .subscribe(entity.clone(), move |update| lock(&rows).apply(update));
        self.subscriptions.insert(entity, subscription);
    }
}

fn lock(rows: &Arc<Mutex<Rows>>) -> MutexGuard<'_, Rows> {
    rows.lock().unwrap_or_else(PoisonError::into_inner)
}
