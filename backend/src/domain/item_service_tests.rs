//! Tests for the item service.

use std::sync::Arc;

use mockall::Sequence;
use rstest::rstest;

use super::*;
use crate::domain::ErrorCode;
use crate::domain::ports::{MockCounterStore, StoreError};

const ITEMS_KEY: &str = "board:b1:items";

fn board() -> BoardId {
    BoardId::new("b1").expect("fixture board id")
}

fn service(store: MockCounterStore) -> ItemService<MockCounterStore> {
    ItemService::new(Arc::new(store))
}

#[rstest]
#[case(0, 1)]
#[case(1, 2)]
#[tokio::test]
async fn increment_adds_one_atomically(#[case] before: i64, #[case] after: i64) {
    let mut store = MockCounterStore::new();
    store
        .expect_sorted_incr()
        .times(1)
        .withf(|key, member, delta| key == ITEMS_KEY && member == "apples" && *delta == 1)
        .return_once(move |_, _, _| Ok(before + 1));

    let item = service(store)
        .increment_item(&board(), "apples")
        .await
        .expect("incremented");

    assert_eq!(item, BoardItem::new("apples", after));
}

#[rstest]
#[case(5, 4)]
#[case(1, 0)]
#[tokio::test]
async fn decrement_above_floor_needs_no_clamp(#[case] before: i64, #[case] after: i64) {
    let mut store = MockCounterStore::new();
    store
        .expect_sorted_incr()
        .withf(|_, _, delta| *delta == -1)
        .return_once(move |_, _, _| Ok(before - 1));
    store.expect_sorted_raise_to().times(0);

    let item = service(store)
        .decrement_item(&board(), "apples")
        .await
        .expect("decremented");

    assert_eq!(item.value, after);
}

#[rstest]
#[tokio::test]
async fn decrement_below_floor_raises_back_to_zero() {
    let mut seq = Sequence::new();
    let mut store = MockCounterStore::new();
    store
        .expect_sorted_incr()
        .times(1)
        .in_sequence(&mut seq)
        .return_once(|_, _, _| Ok(-1));
    store
        .expect_sorted_raise_to()
        .times(1)
        .in_sequence(&mut seq)
        .withf(|key, member, floor| key == ITEMS_KEY && member == "apples" && *floor == 0)
        .return_once(|_, _, _| Ok(0));

    let item = service(store)
        .decrement_item(&board(), "apples")
        .await
        .expect("decremented");

    assert_eq!(item.value, 0);
}

#[rstest]
#[tokio::test]
async fn decrement_reports_concurrent_increment_seen_by_clamp() {
    let mut store = MockCounterStore::new();
    store.expect_sorted_incr().return_once(|_, _, _| Ok(-1));
    // Another caller incremented twice between our decrement and the clamp.
    store.expect_sorted_raise_to().return_once(|_, _, _| Ok(1));

    let item = service(store)
        .decrement_item(&board(), "apples")
        .await
        .expect("decremented");

    assert_eq!(item.value, 1);
}

#[rstest]
#[tokio::test]
async fn mutations_surface_store_errors() {
    let mut store = MockCounterStore::new();
    store
        .expect_sorted_incr()
        .return_once(|_, _, _| Err(StoreError::command("WRONGTYPE")));

    let err = service(store)
        .increment_item(&board(), "apples")
        .await
        .expect_err("store rejected");

    assert_eq!(err.code(), ErrorCode::ServiceUnavailable);
}

#[rstest]
#[tokio::test]
async fn mutations_reject_blank_item_names() {
    let mut store = MockCounterStore::new();
    store.expect_sorted_incr().times(0);

    let err = service(store)
        .decrement_item(&board(), " ")
        .await
        .expect_err("blank item");

    assert_eq!(err.code(), ErrorCode::InvalidRequest);
}

// One historical code path only moved the count when the read *failed*. The
// intended behaviour, pinned here, is to move it only when the item exists.
#[rstest]
#[tokio::test]
async fn rename_moves_count_when_source_exists() {
    let mut store = MockCounterStore::new();
    store
        .expect_sorted_rename()
        .times(1)
        .withf(|key, from, to| key == ITEMS_KEY && from == "old" && to == "new")
        .return_once(|_, _, _| Ok(Some(23)));

    let rename = service(store)
        .rename_item(&board(), "old", "new")
        .await
        .expect("renamed");

    assert!(rename.moved);
}

#[rstest]
#[tokio::test]
async fn rename_of_absent_source_is_a_no_op() {
    let mut store = MockCounterStore::new();
    store
        .expect_sorted_rename()
        .times(1)
        .return_once(|_, _, _| Ok(None));

    let rename = service(store)
        .rename_item(&board(), "old", "new")
        .await
        .expect("no-op");

    assert!(!rename.moved);
}

#[rstest]
#[tokio::test]
async fn rename_reports_names_as_stored() {
    let mut store = MockCounterStore::new();
    store
        .expect_sorted_rename()
        .withf(|_, from, to| from == "old" && to == "new")
        .return_once(|_, _, _| Ok(Some(1)));

    let rename = service(store)
        .rename_item(&board(), " old ", "\tnew ")
        .await
        .expect("renamed");

    assert_eq!(
        rename,
        ItemRename {
            from: "old".into(),
            to: "new".into(),
            moved: true,
        }
    );
}

#[rstest]
#[tokio::test]
async fn rename_onto_itself_touches_nothing() {
    let mut store = MockCounterStore::new();
    store.expect_sorted_rename().times(0);

    let rename = service(store)
        .rename_item(&board(), "same", " same ")
        .await
        .expect("no-op");

    assert!(!rename.moved);
    assert_eq!(rename.to, "same");
}

#[rstest]
#[tokio::test]
async fn rename_surfaces_store_errors() {
    let mut store = MockCounterStore::new();
    store
        .expect_sorted_rename()
        .return_once(|_, _, _| Err(StoreError::connection("refused")));

    let err = service(store)
        .rename_item(&board(), "old", "new")
        .await
        .expect_err("store offline");

    assert_eq!(err.code(), ErrorCode::ServiceUnavailable);
}

#[rstest]
#[tokio::test]
async fn list_items_maps_scored_members() {
    let mut store = MockCounterStore::new();
    store
        .expect_sorted_range()
        .withf(|key| key == ITEMS_KEY)
        .return_once(|_| Ok(vec![("new".into(), 0), ("apples".into(), 1)]));

    let items = service(store).list_items(&board()).await.expect("items");

    assert_eq!(
        items,
        vec![BoardItem::new("new", 0), BoardItem::new("apples", 1)]
    );
}

#[rstest]
#[tokio::test]
async fn list_items_of_unknown_board_is_empty() {
    let mut store = MockCounterStore::new();
    store.expect_sorted_range().return_once(|_| Ok(Vec::new()));

    let items = service(store).list_items(&board()).await.expect("items");

    assert!(items.is_empty());
}
