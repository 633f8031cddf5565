//! Item (counter) use-cases.
//!
//! Increments rely solely on the store's atomic increment. Decrements go
//! through the same primitive and then apply the zero floor with the store's
//! conditional raise, so an increment landing between the two steps is never
//! overwritten. Renames read and move a count in a single store operation, so
//! no concurrent increment of the old name can be dropped.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::debug;

use crate::domain::ports::{CounterStore, ItemCommand, ItemQuery};
use crate::domain::{BoardId, BoardItem, Error, ItemRename, item_name, keys, map_store_error};

/// Lowest value a counter may hold.
const FLOOR: i64 = 0;

/// Item service implementing the item driving ports.
pub struct ItemService<S: ?Sized> {
    store: Arc<S>,
}

impl<S: ?Sized> ItemService<S> {
    /// Create an item service over the given counter store.
    pub fn new(store: Arc<S>) -> Self {
        Self { store }
    }
}

impl<S: ?Sized> Clone for ItemService<S> {
    fn clone(&self) -> Self {
        Self::new(Arc::clone(&self.store))
    }
}

fn checked_item_name(raw: &str) -> Result<String, Error> {
    item_name(raw).map_err(|err| Error::invalid_request(err.to_string()))
}

#[async_trait]
impl<S> ItemCommand for ItemService<S>
where
    S: CounterStore + ?Sized,
{
    async fn increment_item(&self, board: &BoardId, item: &str) -> Result<BoardItem, Error> {
        let item = checked_item_name(item)?;
        let value = self
            .store
            .sorted_incr(&keys::items_key(board), &item, 1)
            .await
            .map_err(map_store_error)?;
        Ok(BoardItem::new(item, value))
    }

    async fn decrement_item(&self, board: &BoardId, item: &str) -> Result<BoardItem, Error> {
        let item = checked_item_name(item)?;
        let key = keys::items_key(board);
        let value = self
            .store
            .sorted_incr(&key, &item, -1)
            .await
            .map_err(map_store_error)?;
        if value >= FLOOR {
            return Ok(BoardItem::new(item, value));
        }

        let clamped = self
            .store
            .sorted_raise_to(&key, &item, FLOOR)
            .await
            .map_err(map_store_error)?;
        debug!(board_id = %board, item = %item, value, clamped, "decrement clamped at floor");
        Ok(BoardItem::new(item, clamped))
    }

    async fn rename_item(
        &self,
        board: &BoardId,
        from: &str,
        to: &str,
    ) -> Result<ItemRename, Error> {
        let from = checked_item_name(from)?;
        let to = checked_item_name(to)?;
        if from == to {
            return Ok(ItemRename {
                from,
                to,
                moved: false,
            });
        }

        // Read and move happen in one store step; last write wins on `to`.
        let moved = self
            .store
            .sorted_rename(&keys::items_key(board), &from, &to)
            .await
            .map_err(map_store_error)?;
        if moved.is_none() {
            debug!(board_id = %board, item = %from, "rename of absent item ignored");
        }
        Ok(ItemRename {
            from,
            to,
            moved: moved.is_some(),
        })
    }
}

#[async_trait]
impl<S> ItemQuery for ItemService<S>
where
    S: CounterStore + ?Sized,
{
    async fn list_items(&self, board: &BoardId) -> Result<Vec<BoardItem>, Error> {
        let pairs = self
            .store
            .sorted_range(&keys::items_key(board))
            .await
            .map_err(map_store_error)?;
        Ok(pairs
            .into_iter()
            .map(|(name, value)| BoardItem::new(name, value))
            .collect())
    }
}

#[cfg(test)]
#[path = "item_service_tests.rs"]
mod tests;
