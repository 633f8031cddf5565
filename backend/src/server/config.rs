//! HTTP server configuration object and helpers.

use std::net::SocketAddr;
use std::sync::Arc;

use actix_web::cookie::{Key, SameSite};
use lovelio::domain::ports::CounterStore;
use lovelio::inbound::ws::OriginPolicy;

/// Builder-style configuration for creating the HTTP server.
pub struct ServerConfig {
    pub(crate) key: Key,
    pub(crate) cookie_secure: bool,
    pub(crate) same_site: SameSite,
    pub(crate) bind_addr: SocketAddr,
    pub(crate) store: Arc<dyn CounterStore>,
    pub(crate) origins: OriginPolicy,
}

impl ServerConfig {
    /// Construct a server configuration around a counter store.
    ///
    /// Origins default to [`OriginPolicy::any`].
    #[must_use]
    pub fn new(
        key: Key,
        cookie_secure: bool,
        same_site: SameSite,
        bind_addr: SocketAddr,
        store: Arc<dyn CounterStore>,
    ) -> Self {
        Self {
            key,
            cookie_secure,
            same_site,
            bind_addr,
            store,
            origins: OriginPolicy::any(),
        }
    }

    /// Restrict WebSocket upgrades to the given origin policy.
    #[must_use]
    pub fn with_origins(mut self, origins: OriginPolicy) -> Self {
        self.origins = origins;
        self
    }
}
