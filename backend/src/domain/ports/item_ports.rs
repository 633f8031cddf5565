//! Driving ports for item (counter) use-cases.

use async_trait::async_trait;

use crate::domain::{BoardId, BoardItem, Error, ItemRename};

/// Counter mutations.
#[async_trait]
pub trait ItemCommand: Send + Sync {
    /// Add one to an item, creating it at 1 when absent.
    ///
    /// Returns the item under its stored name with the new count.
    async fn increment_item(&self, board: &BoardId, item: &str) -> Result<BoardItem, Error>;

    /// Subtract one from an item without going below zero.
    async fn decrement_item(&self, board: &BoardId, item: &str) -> Result<BoardItem, Error>;

    /// Move an item's count to a new name, overwriting any item already there.
    ///
    /// `moved` is `false` (and nothing is written) when the old item does not
    /// exist.
    async fn rename_item(&self, board: &BoardId, from: &str, to: &str)
        -> Result<ItemRename, Error>;
}

/// Counter reads.
#[async_trait]
pub trait ItemQuery: Send + Sync {
    /// List every item on a board; unknown boards list as empty.
    async fn list_items(&self, board: &BoardId) -> Result<Vec<BoardItem>, Error>;
}
