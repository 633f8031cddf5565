//! Board use-cases: creation, batched listing and renaming.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::{debug, warn};

use crate::domain::ports::{BoardCommand, BoardQuery, CounterStore, HashField, WriteBatch};
use crate::domain::{
    BoardId, BoardName, DEFAULT_BOARD_NAME, Error, SEED_ITEM_COUNT, SEED_ITEM_NAME, UserId,
    board_name, keys, map_store_error,
};

/// Board service implementing the board driving ports.
pub struct BoardService<S: ?Sized> {
    store: Arc<S>,
}

impl<S: ?Sized> BoardService<S> {
    /// Create a board service over the given counter store.
    pub fn new(store: Arc<S>) -> Self {
        Self { store }
    }
}

impl<S: ?Sized> Clone for BoardService<S> {
    fn clone(&self) -> Self {
        Self::new(Arc::clone(&self.store))
    }
}

fn requested_name(name: Option<&str>) -> Result<String, Error> {
    match name.map(str::trim).filter(|raw| !raw.is_empty()) {
        Some(raw) => board_name(raw).map_err(|err| Error::invalid_request(err.to_string())),
        None => Ok(DEFAULT_BOARD_NAME.to_owned()),
    }
}

#[async_trait]
impl<S> BoardCommand for BoardService<S>
where
    S: CounterStore + ?Sized,
{
    async fn create_board(&self, user: &UserId, name: Option<&str>) -> Result<BoardName, Error> {
        let name = requested_name(name)?;
        let board = BoardId::random();
        let record = keys::board_key(&board);
        let items = keys::items_key(&board);

        // One round trip; not transactional, so readers must tolerate a board
        // listed before its name or seed item lands.
        let batch = WriteBatch::new()
            .list_push(keys::user_boards_key(user), board.as_str())
            .hash_set(record.as_str(), keys::NAME_FIELD, name.as_str())
            .hash_set(record, keys::ITEMS_FIELD, items.as_str())
            .sorted_add(items, SEED_ITEM_NAME, SEED_ITEM_COUNT);
        self.store.apply(batch).await.map_err(map_store_error)?;

        debug!(user_id = %user, board_id = %board, "board created");
        Ok(BoardName::new(board, name))
    }

    async fn rename_board(&self, board: &BoardId, name: &str) -> Result<BoardName, Error> {
        let name = board_name(name).map_err(|err| Error::invalid_request(err.to_string()))?;
        self.store
            .hash_set(&keys::board_key(board), keys::NAME_FIELD, &name)
            .await
            .map_err(map_store_error)?;
        Ok(BoardName::new(board.clone(), name))
    }
}

#[async_trait]
impl<S> BoardQuery for BoardService<S>
where
    S: CounterStore + ?Sized,
{
    async fn list_boards(&self, user: &UserId) -> Result<Vec<BoardName>, Error> {
        let raw_ids = self
            .store
            .list_range(&keys::user_boards_key(user))
            .await
            .map_err(map_store_error)?;

        let boards: Vec<BoardId> = raw_ids
            .into_iter()
            .filter_map(|raw| match BoardId::new(raw) {
                Ok(id) => Some(id),
                Err(err) => {
                    warn!(user_id = %user, error = %err, "skipping unusable board id");
                    None
                }
            })
            .collect();
        if boards.is_empty() {
            return Ok(Vec::new());
        }

        let fields: Vec<HashField> = boards
            .iter()
            .map(|board| HashField::new(keys::board_key(board), keys::NAME_FIELD))
            .collect();
        let mut names = self
            .store
            .hash_get_many(&fields)
            .await
            .map_err(map_store_error)?
            .into_iter();

        Ok(boards
            .into_iter()
            .map(|board| {
                let name = names.next().flatten().unwrap_or_else(|| {
                    debug!(board_id = %board, "board has no name yet; using default");
                    DEFAULT_BOARD_NAME.to_owned()
                });
                BoardName::new(board, name)
            })
            .collect())
    }

    async fn user_exists(&self, user: &UserId) -> Result<bool, Error> {
        self.store
            .exists(&keys::user_boards_key(user))
            .await
            .map_err(map_store_error)
    }
}

#[cfg(test)]
#[path = "board_service_tests.rs"]
mod tests;
