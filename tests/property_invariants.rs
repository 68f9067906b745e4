use std::collections::HashMap;
use std::sync::Arc;

use proptest::prelude::*;

use shelfsync::bus::{EntityUpdate, Patch, UpdateBus};
use shelfsync::entity::{BookPatch, BookRecord, BookSnapshot, RelationFlags};
use shelfsync::projection::ViewProjection;
use shelfsync::types::EntityId;

const IDS: usize = 8;

#[derive(Debug, Clone)]
enum Action {
    Likes { target: u8, value: u16 },
    Upvotes { target: u8, value: u16 },
    Bookmarked { target: u8, value: bool },
    Remove { target: u8 },
}

fn action_strategy() -> impl Strategy<Value = Action> {
    prop_oneof![
        (0u8..IDS as u8, any::<u16>()).prop_map(|(target, value)| Action::Likes { target, value }),
        (0u8..IDS as u8, any::<u16>())
            .prop_map(|(target, value)| Action::Upvotes { target, value }),
        (0u8..IDS as u8, any::<bool>())
            .prop_map(|(target, value)| Action::Bookmarked { target, value }),
        (0u8..IDS as u8).prop_map(|target| Action::Remove { target }),
    ]
}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
struct ModelRow {
    likes: u64,
    upvotes: u64,
    bookmarked: bool,
}

fn book_id(index: u8) -> String {
    format!("b{index}")
}

fn mounted_snapshot(index: u8) -> BookSnapshot {
    BookSnapshot {
        record: BookRecord {
            id: book_id(index),
            ..BookRecord::default()
        },
        flags: RelationFlags::default(),
    }
}

proptest! {
    // Any interleaving of published patches leaves every mounted view
    // equal to the model fold of the patches for its rows.
    #[test]
    fn routed_patches_match_model(actions in prop::collection::vec(action_strategy(), 1..150)) {
        let bus = Arc::new(UpdateBus::new());
        let mut evens = ViewProjection::new(Arc::clone(&bus));
        let mut all = ViewProjection::new(Arc::clone(&bus));
        let mut model: HashMap<u8, ModelRow> = HashMap::new();

        for index in 0..IDS as u8 {
            if index % 2 == 0 {
                evens.mount_book(mounted_snapshot(index));
            }
            all.mount_book(mounted_snapshot(index));
            model.insert(index, ModelRow::default());
        }

        for action in actions {
            let (target, patch) = match action {
                Action::Likes { target, value } => (target, Patch::Book(BookPatch {
                    likes: Some(u64::from(value)),
                    ..BookPatch::default()
                })),
                Action::Upvotes { target, value } => (target, Patch::Book(BookPatch {
                    upvotes: Some(u64::from(value)),
                    ..BookPatch::default()
                })),
                Action::Bookmarked { target, value } => (target, Patch::Book(BookPatch {
                    bookmarked: Some(value),
                    ..BookPatch::default()
                })),
                Action::Remove { target } => (target, Patch::Removed),
            };

            bus.publish(&EntityUpdate {
                entity: EntityId::Book(book_id(target)),
                patch: patch.clone(),
            });

            match patch {
                Patch::Book(book_patch) => {
                    if let Some(row) = model.get_mut(&target) {
                        if let Some(v) = book_patch.likes { row.likes = v; }
                        if let Some(v) = book_patch.upvotes { row.upvotes = v; }
                        if let Some(v) = book_patch.bookmarked { row.bookmarked = v; }
                    }
                }
                Patch::Removed => { model.remove(&target); }
                Patch::Review(_) => {}
            }
        }

        for index in 0..IDS as u8 {
            let id = book_id(index);
            match model.get(&index) {
                Some(expected) => {
                    let row = all.book(&id).expect("row survives in full view");
                    prop_assert_eq!(row.record.likes, expected.likes);
                    prop_assert_eq!(row.record.upvotes, expected.upvotes);
                    prop_assert_eq!(row.flags.bookmarked, expected.bookmarked);
                    if index % 2 == 0 {
                        let row = evens.book(&id).expect("row survives in even view");
                        prop_assert_eq!(row.record.likes, expected.likes);
                        prop_assert_eq!(row.record.upvotes, expected.upvotes);
                        prop_assert_eq!(row.flags.bookmarked, expected.bookmarked);
                    }
                }
                None => {
                    prop_assert!(all.book(&id).is_none());
                    prop_assert!(evens.book(&id).is_none());
                }
            }
        }
    }
}

#[test]
fn dropping_a_subscription_releases_the_registry_entry() {
    let bus = Arc::new(UpdateBus::new());
    let entity = EntityId::Book("b1".to_string());

    let subscription = bus.subscribe(entity.clone(), |_| {});
    assert_eq!(bus.subscriber_count(&entity), 1);

    drop(subscription);
    assert_eq!(bus.subscriber_count(&entity), 0);
}

#[test]
fn dropping_a_projection_unsubscribes_every_row() {
    let bus = Arc::new(UpdateBus::new());
    let mut view = ViewProjection::new(Arc::clone(&bus));
    for index in 0..3 {
        view.mount_book(mounted_snapshot(index));
    }
    for index in 0..3 {
        assert_eq!(bus.subscriber_count(&EntityId::Book(book_id(index))), 1);
    }

    drop(view);
    for index in 0..3 {
        assert_eq!(bus.subscriber_count(&EntityId::Book(book_id(index))), 0);
    }
}

#[test]
fn unmounting_a_row_unsubscribes_just_that_row() {
    let bus = Arc::new(UpdateBus::new());
    let mut view = ViewProjection::new(Arc::clone(&bus));
    view.mount_book(mounted_snapshot(0));
    view.mount_book(mounted_snapshot(1));

    view.unmount_book(&book_id(0));

    assert_eq!(bus.subscriber_count(&EntityId::Book(book_id(0))), 0);
    assert_eq!(bus.subscriber_count(&EntityId::Book(book_id(1))), 1);
    assert!(view.book(&book_id(0)).is_none());
    assert!(view.book(&book_id(1)).is_some());
}
