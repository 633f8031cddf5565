//! Shared helper utilities for backend integration tests.
//!
//! Integration tests compile as separate crates under `backend/tests/`, so
//! the in-memory wiring every suite needs lives here once.

use std::sync::Arc;

use lovelio::domain::{BoardService, ItemService, UserId, create_user};
use lovelio::inbound::ws::OriginPolicy;
use lovelio::inbound::ws::state::{WsPorts, WsState};
use lovelio::outbound::store::InMemoryCounterStore;

/// Services sharing one in-memory store.
pub struct Engine {
    pub store: Arc<InMemoryCounterStore>,
    pub boards: BoardService<InMemoryCounterStore>,
    pub items: ItemService<InMemoryCounterStore>,
    pub user: UserId,
}

impl Engine {
    /// Fresh store, services and user.
    pub fn new() -> Self {
        let store = Arc::new(InMemoryCounterStore::new());
        Self {
            boards: BoardService::new(store.clone()),
            items: ItemService::new(store.clone()),
            store,
            user: create_user(),
        }
    }

    /// WebSocket state over this engine's services.
    pub fn ws_state(&self, origins: OriginPolicy) -> WsState {
        WsState::new(
            WsPorts {
                boards: Arc::new(self.boards.clone()),
                boards_query: Arc::new(self.boards.clone()),
                items: Arc::new(self.items.clone()),
                items_query: Arc::new(self.items.clone()),
            },
            origins,
        )
    }
}
