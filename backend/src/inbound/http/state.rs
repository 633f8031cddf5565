//! Shared HTTP adapter state.
//!
//! HTTP handlers accept this state via `actix_web::web::Data` so they only
//! depend on domain ports (use-cases) and remain testable without I/O.

use std::sync::Arc;

use crate::domain::ports::{BoardCommand, BoardQuery};

/// Dependency bundle for HTTP handlers.
#[derive(Clone)]
pub struct HttpState {
    pub boards: Arc<dyn BoardCommand>,
    pub boards_query: Arc<dyn BoardQuery>,
}

impl HttpState {
    /// Construct state from the board ports.
    ///
    /// # Examples
    /// ```
    /// use std::sync::Arc;
    ///
    /// use lovelio::domain::BoardService;
    /// use lovelio::inbound::http::state::HttpState;
    /// use lovelio::outbound::store::InMemoryCounterStore;
    ///
    /// let service = BoardService::new(Arc::new(InMemoryCounterStore::new()));
    /// let state = HttpState::new(Arc::new(service.clone()), Arc::new(service));
    /// let _ = state.boards_query.clone();
    /// ```
    pub fn new(boards: Arc<dyn BoardCommand>, boards_query: Arc<dyn BoardQuery>) -> Self {
        Self {
            boards,
            boards_query,
        }
    }
}
