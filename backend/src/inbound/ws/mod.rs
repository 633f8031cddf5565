//! WebSocket inbound adapter carrying the real-time board protocol.
//!
//! Responsibilities:
//! - validate upgrade requests (origin allow-list, visitor identity)
//! - spawn the per-connection session task
//! - keep WebSocket-specific concerns at the edge of the system

use actix_web::web::{self, Payload};
use actix_web::{HttpRequest, HttpResponse, get};
use tracing::error;

use crate::inbound::http::session::SessionContext;

mod dispatch;
mod origin;
mod session;

pub mod messages;
pub mod state;

pub use origin::OriginPolicy;

/// Handle WebSocket upgrade for the `/ws` endpoint.
///
/// The visitor id comes from the session cookie; upgrades without one are
/// refused with `401 Unauthorized`.
#[get("/ws")]
pub async fn ws_entry(
    state: web::Data<state::WsState>,
    visitor: SessionContext,
    req: HttpRequest,
    stream: Payload,
) -> actix_web::Result<HttpResponse> {
    state.origins.check(&req)?;
    let user = visitor.require_user_id()?;

    let (response, ws_session, messages) = actix_ws::handle(&req, stream).map_err(|error| {
        error!(error = %error, "WebSocket upgrade failed");
        actix_web::error::ErrorInternalServerError("WebSocket upgrade failed")
    })?;

    let dispatcher = dispatch::Dispatcher::new(state.ports.clone(), user);
    actix_web::rt::spawn(session::handle_ws_session(dispatcher, ws_session, messages));
    Ok(response)
}
