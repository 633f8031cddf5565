//! Lovelio entry-point: loads settings, connects the counter store and
//! serves the visitor API plus the WebSocket board protocol.

mod server;

use std::sync::Arc;

use actix_web::web;
use mockable::DefaultEnv;
use ortho_config::OrthoConfig;
use tracing::{error, info, warn};
use tracing_subscriber::{EnvFilter, fmt};

use lovelio::inbound::http::health::HealthState;
use lovelio::inbound::http::session_config::{BuildMode, session_settings_from_env};
use lovelio::outbound::store::{RedisCounterStore, RedisPool};
use lovelio::settings::AppSettings;
use server::{ServerConfig, create_server};

fn fatal(context: &str, error: impl std::fmt::Display) -> std::io::Error {
    error!(%error, "{context}");
    std::io::Error::other(format!("{context}: {error}"))
}

/// Application bootstrap.
#[actix_web::main]
async fn main() -> std::io::Result<()> {
    if let Err(e) = fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .json()
        .try_init()
    {
        warn!(error = %e, "tracing init failed");
    }

    let settings = AppSettings::load_from_iter(std::env::args_os())
        .map_err(|e| fatal("failed to load settings", e))?;
    let bind_addr = settings
        .bind_addr()
        .map_err(|e| fatal("invalid settings", e))?;
    let origins = settings
        .origin_policy()
        .map_err(|e| fatal("invalid settings", e))?;
    let pool_config = settings
        .pool_config()
        .map_err(|e| fatal("invalid settings", e))?;

    let session = session_settings_from_env(&DefaultEnv::new(), BuildMode::from_debug_assertions())
        .map_err(|e| fatal("invalid session configuration", e))?;

    let pool = RedisPool::connect(pool_config)
        .await
        .map_err(|e| fatal("counter store unavailable", e))?;
    info!(redis_url = settings.redis_url(), "connected to counter store");
    let store = Arc::new(RedisCounterStore::new(pool));

    let config = ServerConfig::new(
        session.key,
        session.cookie_secure,
        session.same_site,
        bind_addr,
        store,
    )
    .with_origins(origins);

    let health_state = web::Data::new(HealthState::new());
    let server = create_server(health_state.clone(), config)?;
    info!(%bind_addr, "listening");
    let result = server.await;
    health_state.mark_unhealthy();
    result
}
