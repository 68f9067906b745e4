//! Entity-keyed publish/subscribe service for reconciled updates.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use hashbrown::HashMap;

use crate::entity::{BookPatch, ReviewPatch};
use crate::types::EntityId;

/// Patch payload carried by one [`EntityUpdate`].
#[derive(Debug, Clone, PartialEq)]
pub enum Patch {
    /// Sparse update to a book snapshot.
    Book(BookPatch),
    /// Sparse update to a review row.
    Review(ReviewPatch),
    /// The entity was deleted; holders drop the row.
    Removed,
}

/// A reconciled change to one entity, delivered to every subscriber.
#[derive(Debug, Clone, PartialEq)]
pub struct EntityUpdate {
    /// Entity the patch applies to.
    pub entity: EntityId,
    /// Patch payload.
    pub patch: Patch,
}

type Callback = dyn Fn(&EntityUpdate) + Send + Sync;

#[derive(Default)]
struct Registry {
    next_id: u64,
    subscribers: HashMap<EntityId, Vec<(u64, Arc<Callback>)>>,
}

/// Shared subscription point all mounted views register with.
///
/// Constructed once at the application root and passed by [`Arc`];
/// never ambient global state. Registration is scoped: dropping the
/// [`Subscription`] returned by [`UpdateBus::subscribe`] removes the
/// callback, so an unmounted view can no longer be patched.
#[derive(Default)]
pub struct UpdateBus {
    registry: Mutex<Registry>,
}

impl UpdateBus {
    /// Creates an empty bus.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `callback` for updates to `entity` until the returned
    /// guard is dropped.
    pub fn subscribe<F>(self: &Arc<Self>, entity: EntityId, callback: F) -> Subscription
    where
        F: Fn(&EntityUpdate) + Send + Sync + 'static,
    {
        let mut registry = self.lock();
        registry.next_id += 1;
        let id = registry.next_id;
        registry
            .subscribers
            .entry(entity.clone())
            .or_default()
            .push((id, Arc::new(callback)));
        drop(registry);
        Subscription {
            bus: Arc::clone(self),
            entity,
            id,
        }
    }

    /// Delivers `update` to every callback registered for its entity id.
    ///
    /// Callbacks run synchronously on the publishing task, after the
    /// registry lock is released.
    pub fn publish(&self, update: &EntityUpdate) {
        let matching: Vec<Arc<Callback>> = {
            let registry = self.lock();
            registry
                .subscribers
                .get(&update.entity)
                .map(|subs| subs.iter().map(|(_, cb)| Arc::clone(cb)).collect())
                .unwrap_or_default()
        };
        for callback in matching {
            callback(update);
        }
    }

    /// Number of live subscriptions for `entity`.
    pub fn subscriber_count(&self, entity: &EntityId) -> usize {
        self.lock()
            .subscribers
            .get(entity)
            .map(Vec::len)
            .unwrap_or(0)
    }

    fn unsubscribe(&self, entity: &EntityId, id: u64) {
        let mut registry = self.lock();
        if let Some(subs) = registry.subscribers.get_mut(entity) {
            subs.retain(|(sub_id, _)| *sub_id != id);
            if subs.is_empty() {
                registry.subscribers.remove(entity);
            }
        }
    }

    fn lock(&self) -> MutexGuard<'_, Registry> {
        self.registry.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Scoped registration; dropping it removes the callback from the bus.
pub struct Subscription {
    bus: Arc<UpdateBus>,
    entity: EntityId,
    id: u64,
}

impl Subscription {
    /// Entity this subscription is keyed by.
    pub fn entity(&self) -> &EntityId {
        &self.entity
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        self.bus.unsubscribe(&self.entity, self.id);
    }
}
