//! Driving ports for board use-cases.
//!
//! Inbound adapters depend on these traits rather than on the services, so
//! WebSocket and HTTP handlers can be exercised with test doubles.

use async_trait::async_trait;

use crate::domain::{BoardId, BoardName, Error, UserId};

/// Board mutations.
#[async_trait]
pub trait BoardCommand: Send + Sync {
    /// Create a board for `user`, seeded with one empty item.
    ///
    /// A missing or blank `name` falls back to the default board name.
    async fn create_board(&self, user: &UserId, name: Option<&str>) -> Result<BoardName, Error>;

    /// Overwrite a board's name. Renaming an unknown board is not an error.
    async fn rename_board(&self, board: &BoardId, name: &str) -> Result<BoardName, Error>;
}

/// Board reads.
#[async_trait]
pub trait BoardQuery: Send + Sync {
    /// List `(board_id, name)` pairs in creation order.
    async fn list_boards(&self, user: &UserId) -> Result<Vec<BoardName>, Error>;

    /// Whether `user` owns at least one board in the store.
    async fn user_exists(&self, user: &UserId) -> Result<bool, Error>;
}
