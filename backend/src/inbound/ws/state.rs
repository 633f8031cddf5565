//! Shared WebSocket adapter state.
//!
//! WebSocket entry points depend on domain ports (use-cases) instead of
//! constructing domain services directly, so connections can be exercised
//! against an in-memory store.

use std::sync::Arc;

use crate::domain::ports::{BoardCommand, BoardQuery, ItemCommand, ItemQuery};

use super::origin::OriginPolicy;

/// Port bundle used to build [`WsState`].
#[derive(Clone)]
pub struct WsPorts {
    pub boards: Arc<dyn BoardCommand>,
    pub boards_query: Arc<dyn BoardQuery>,
    pub items: Arc<dyn ItemCommand>,
    pub items_query: Arc<dyn ItemQuery>,
}

/// Dependency bundle for WebSocket handlers and sessions.
#[derive(Clone)]
pub struct WsState {
    pub ports: WsPorts,
    pub origins: OriginPolicy,
}

impl WsState {
    /// Construct state from explicit port implementations.
    pub fn new(ports: WsPorts, origins: OriginPolicy) -> Self {
        Self { ports, origins }
    }
}
