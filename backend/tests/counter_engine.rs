//! Behavioural tests for the counter state engine over the in-memory store.

mod support;

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use lovelio::domain::ports::{
    BoardCommand, BoardQuery, CounterStore, HashField, ItemCommand, ItemQuery, StoreError,
    WriteBatch,
};
use lovelio::domain::{BoardId, BoardItem, BoardService, ErrorCode, ItemService, keys};
use lovelio::outbound::store::InMemoryCounterStore;
use rstest::{fixture, rstest};
use support::Engine;

#[fixture]
fn engine() -> Engine {
    Engine::new()
}

fn item(name: &str, value: i64) -> BoardItem {
    BoardItem::new(name, value)
}

#[rstest]
#[tokio::test]
async fn fresh_boards_hold_one_empty_item(engine: Engine) {
    let board = engine
        .boards
        .create_board(&engine.user, None)
        .await
        .expect("create board");

    assert_eq!(board.name, "new");
    let items = engine.items.list_items(&board.board_id).await.expect("list");
    assert_eq!(items, [item("new", 0)]);
}

#[rstest]
#[tokio::test]
async fn increments_start_from_one(engine: Engine) {
    let board = engine
        .boards
        .create_board(&engine.user, None)
        .await
        .expect("create board");

    let first = engine.items.increment_item(&board.board_id, "apples").await;
    let second = engine.items.increment_item(&board.board_id, "apples").await;

    assert_eq!(first.expect("first increment"), item("apples", 1));
    assert_eq!(second.expect("second increment"), item("apples", 2));
}

#[rstest]
#[tokio::test]
async fn decrements_stop_at_zero(engine: Engine) {
    let board = engine
        .boards
        .create_board(&engine.user, None)
        .await
        .expect("create board");

    let decremented = engine
        .items
        .decrement_item(&board.board_id, "new")
        .await
        .expect("decrement");

    assert_eq!(decremented, item("new", 0));
    let items = engine.items.list_items(&board.board_id).await.expect("list");
    assert_eq!(items, [item("new", 0)]);
}

#[rstest]
#[case(1)]
#[case(2)]
#[case(5)]
#[tokio::test]
async fn decrements_from_positive_counts_subtract_one(engine: Engine, #[case] start: i64) {
    let board = engine
        .boards
        .create_board(&engine.user, None)
        .await
        .expect("create board");
    for _ in 0..start {
        engine
            .items
            .increment_item(&board.board_id, "pears")
            .await
            .expect("increment");
    }

    let decremented = engine
        .items
        .decrement_item(&board.board_id, "pears")
        .await
        .expect("decrement");

    assert_eq!(decremented.value, start - 1);
}

#[rstest]
#[tokio::test]
async fn renamed_boards_keep_their_id(engine: Engine) {
    let board = engine
        .boards
        .create_board(&engine.user, None)
        .await
        .expect("create board");

    engine
        .boards
        .rename_board(&board.board_id, "groceries")
        .await
        .expect("rename board");

    let listed = engine.boards.list_boards(&engine.user).await.expect("list");
    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0].board_id, board.board_id);
    assert_eq!(listed[0].name, "groceries");
}

#[rstest]
#[tokio::test]
async fn renamed_items_carry_their_count(engine: Engine) {
    let board = engine
        .boards
        .create_board(&engine.user, None)
        .await
        .expect("create board");
    for _ in 0..3 {
        engine
            .items
            .increment_item(&board.board_id, "apples")
            .await
            .expect("increment");
    }

    let rename = engine
        .items
        .rename_item(&board.board_id, "apples", "pears")
        .await
        .expect("rename item");

    assert!(rename.moved);
    let items = engine.items.list_items(&board.board_id).await.expect("list");
    assert!(items.contains(&item("pears", 3)));
    assert!(!items.iter().any(|entry| entry.name == "apples"));
}

#[rstest]
#[tokio::test]
async fn renaming_onto_an_existing_item_overwrites_it(engine: Engine) {
    let board = engine
        .boards
        .create_board(&engine.user, None)
        .await
        .expect("create board");
    for (name, count) in [("apples", 3), ("pears", 5)] {
        for _ in 0..count {
            engine
                .items
                .increment_item(&board.board_id, name)
                .await
                .expect("increment");
        }
    }

    let rename = engine
        .items
        .rename_item(&board.board_id, "apples", "pears")
        .await
        .expect("rename item");

    assert!(rename.moved);
    let items = engine.items.list_items(&board.board_id).await.expect("list");
    assert_eq!(items, [item("new", 0), item("pears", 3)]);
}

/// Store that lets one extra increment of `apples` land right after the
/// first call made once it is armed.
struct InterleavingStore {
    inner: Arc<InMemoryCounterStore>,
    board: BoardId,
    armed: AtomicBool,
}

impl InterleavingStore {
    async fn interleave(&self) {
        if self.armed.swap(false, Ordering::SeqCst) {
            self.inner
                .sorted_incr(&keys::items_key(&self.board), "apples", 1)
                .await
                .expect("interleaved increment");
        }
    }
}

#[async_trait]
impl CounterStore for InterleavingStore {
    async fn apply(&self, batch: WriteBatch) -> Result<(), StoreError> {
        let result = self.inner.apply(batch).await;
        self.interleave().await;
        result
    }

    async fn list_range(&self, key: &str) -> Result<Vec<String>, StoreError> {
        let result = self.inner.list_range(key).await;
        self.interleave().await;
        result
    }

    async fn hash_get_many(&self, fields: &[HashField]) -> Result<Vec<Option<String>>, StoreError> {
        let result = self.inner.hash_get_many(fields).await;
        self.interleave().await;
        result
    }

    async fn hash_set(&self, key: &str, field: &str, value: &str) -> Result<(), StoreError> {
        let result = self.inner.hash_set(key, field, value).await;
        self.interleave().await;
        result
    }

    async fn exists(&self, key: &str) -> Result<bool, StoreError> {
        let result = self.inner.exists(key).await;
        self.interleave().await;
        result
    }

    async fn sorted_incr(&self, key: &str, member: &str, delta: i64) -> Result<i64, StoreError> {
        let result = self.inner.sorted_incr(key, member, delta).await;
        self.interleave().await;
        result
    }

    async fn sorted_raise_to(
        &self,
        key: &str,
        member: &str,
        floor: i64,
    ) -> Result<i64, StoreError> {
        let result = self.inner.sorted_raise_to(key, member, floor).await;
        self.interleave().await;
        result
    }

    async fn sorted_rename(
        &self,
        key: &str,
        from: &str,
        to: &str,
    ) -> Result<Option<i64>, StoreError> {
        let result = self.inner.sorted_rename(key, from, to).await;
        self.interleave().await;
        result
    }

    async fn sorted_range(&self, key: &str) -> Result<Vec<(String, i64)>, StoreError> {
        let result = self.inner.sorted_range(key).await;
        self.interleave().await;
        result
    }
}

#[rstest]
#[tokio::test]
async fn concurrent_increment_during_rename_is_not_lost() {
    let inner = Arc::new(InMemoryCounterStore::new());
    let user = lovelio::domain::create_user();
    let board = BoardService::new(Arc::clone(&inner))
        .create_board(&user, None)
        .await
        .expect("create board");
    let store = Arc::new(InterleavingStore {
        inner: Arc::clone(&inner),
        board: board.board_id.clone(),
        armed: AtomicBool::new(false),
    });
    let items = ItemService::new(Arc::clone(&store));
    for _ in 0..3 {
        items
            .increment_item(&board.board_id, "apples")
            .await
            .expect("increment");
    }
    store.armed.store(true, Ordering::SeqCst);

    let rename = items
        .rename_item(&board.board_id, "apples", "pears")
        .await
        .expect("rename item");

    assert!(rename.moved);
    let counted: i64 = items
        .list_items(&board.board_id)
        .await
        .expect("list")
        .iter()
        .filter(|entry| entry.name != "new")
        .map(|entry| entry.value)
        .sum();
    assert_eq!(counted, 4, "every increment must survive the rename");
}

#[rstest]
#[tokio::test]
async fn renaming_a_missing_item_changes_nothing(engine: Engine) {
    let board = engine
        .boards
        .create_board(&engine.user, None)
        .await
        .expect("create board");

    let rename = engine
        .items
        .rename_item(&board.board_id, "ghost", "pears")
        .await
        .expect("rename item");

    assert!(!rename.moved);
    let items = engine.items.list_items(&board.board_id).await.expect("list");
    assert_eq!(items, [item("new", 0)]);
}

#[rstest]
#[tokio::test]
async fn apples_scenario(engine: Engine) {
    let board = engine
        .boards
        .create_board(&engine.user, None)
        .await
        .expect("create board");
    let id = &board.board_id;
    assert!(!id.as_str().is_empty());
    assert_eq!(board.name, "new");

    assert_eq!(engine.items.increment_item(id, "apples").await.expect("incr").value, 1);
    assert_eq!(engine.items.increment_item(id, "apples").await.expect("incr").value, 2);
    assert_eq!(engine.items.decrement_item(id, "apples").await.expect("decr").value, 1);

    let items = engine.items.list_items(id).await.expect("list");
    assert!(items.contains(&item("apples", 1)));
    assert!(items.contains(&item("new", 0)));
    assert_eq!(items.len(), 2);
}

#[rstest]
#[case(1)]
#[case(3)]
#[case(12)]
#[tokio::test]
async fn listing_boards_costs_two_round_trips(engine: Engine, #[case] count: usize) {
    let mut created = Vec::new();
    for index in 0..count {
        let name = format!("board {index}");
        let board = engine
            .boards
            .create_board(&engine.user, Some(&name))
            .await
            .expect("create board");
        created.push(board);
    }
    let before = engine.store.round_trips();

    let listed = engine.boards.list_boards(&engine.user).await.expect("list");

    assert_eq!(engine.store.round_trips() - before, 2);
    assert_eq!(listed, created);
}

#[rstest]
#[tokio::test]
async fn repeated_board_ids_are_listed_twice(engine: Engine) {
    let board = engine
        .boards
        .create_board(&engine.user, Some("groceries"))
        .await
        .expect("create board");
    engine
        .store
        .apply(WriteBatch::new().list_push(
            keys::user_boards_key(&engine.user),
            board.board_id.as_str(),
        ))
        .await
        .expect("push duplicate id");

    let listed = engine.boards.list_boards(&engine.user).await.expect("list");

    assert_eq!(listed, [board.clone(), board]);
}

#[rstest]
#[tokio::test]
async fn users_only_see_their_own_boards(engine: Engine) {
    let other = lovelio::domain::create_user();
    engine
        .boards
        .create_board(&other, Some("theirs"))
        .await
        .expect("create board");

    let listed = engine.boards.list_boards(&engine.user).await.expect("list");

    assert!(listed.is_empty());
    assert!(!engine.boards.user_exists(&engine.user).await.expect("exists"));
    assert!(engine.boards.user_exists(&other).await.expect("exists"));
}

#[rstest]
#[tokio::test]
async fn outages_surface_as_service_unavailable(engine: Engine) {
    engine.store.set_offline(true);

    let error = engine
        .boards
        .create_board(&engine.user, None)
        .await
        .expect_err("offline store");

    assert_eq!(error.code(), ErrorCode::ServiceUnavailable);
}
