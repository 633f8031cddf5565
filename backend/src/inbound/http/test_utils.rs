//! Test helpers for inbound HTTP components.

use std::sync::Arc;

use actix_session::{SessionMiddleware, storage::CookieSessionStore};
use actix_web::cookie::Key;

use super::session::SESSION_COOKIE_NAME;
use super::state::HttpState;
use crate::domain::BoardService;
use crate::outbound::store::InMemoryCounterStore;

/// Build a session middleware configured for tests.
///
/// - Generates a fresh signing/encryption key per invocation.
/// - Uses the production cookie name and disables the `Secure` flag for
///   local HTTP tests.
pub fn test_session_middleware() -> SessionMiddleware<CookieSessionStore> {
    test_session_middleware_with_key(Key::generate())
}

/// Session middleware sharing `key`, for servers running several workers.
pub fn test_session_middleware_with_key(key: Key) -> SessionMiddleware<CookieSessionStore> {
    SessionMiddleware::builder(CookieSessionStore::default(), key)
        .cookie_name(SESSION_COOKIE_NAME.to_owned())
        .cookie_secure(false)
        .build()
}

/// HTTP state backed by a fresh in-memory store, returned alongside it.
pub fn in_memory_state() -> (Arc<InMemoryCounterStore>, HttpState) {
    let store = Arc::new(InMemoryCounterStore::new());
    let boards = BoardService::new(store.clone());
    let state = HttpState::new(Arc::new(boards.clone()), Arc::new(boards));
    (store, state)
}
