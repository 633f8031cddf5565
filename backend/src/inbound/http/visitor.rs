//! Visitor bootstrap and board listing handlers.
//!
//! ```text
//! GET  /api/v1/visitor
//! GET  /api/v1/boards
//! GET  /api/v1/adopt/{user_id}
//! POST /api/v1/forget
//! ```

use actix_web::{HttpResponse, get, post, web};
use serde::Serialize;
use tracing::info;

use crate::domain::{BoardName, Error, UserId, create_user};
use crate::inbound::http::ApiResult;
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;

/// Visitor identity plus the boards they own.
///
/// Example JSON:
/// `{"user_id":"3fa8...","boards":[{"board_id":"9c1e...","name":"new"}]}`
#[derive(Debug, Serialize)]
pub struct VisitorResponse {
    pub user_id: UserId,
    pub boards: Vec<BoardName>,
}

/// Return the session's visitor, creating one on first contact.
///
/// A new visitor gets a fresh user id and a default board before the id is
/// written to the session cookie.
#[get("/visitor")]
pub async fn visitor(
    state: web::Data<HttpState>,
    session: SessionContext,
) -> ApiResult<web::Json<VisitorResponse>> {
    let user_id = match session.user_id()? {
        Some(user_id) => user_id,
        None => {
            let user_id = create_user();
            state.boards.create_board(&user_id, None).await?;
            session.persist_user(&user_id)?;
            info!(user_id = %user_id, "issued new visitor identity");
            user_id
        }
    };
    let boards = state.boards_query.list_boards(&user_id).await?;
    Ok(web::Json(VisitorResponse { user_id, boards }))
}

/// List the session visitor's boards in creation order.
#[get("/boards")]
pub async fn list_boards(
    state: web::Data<HttpState>,
    session: SessionContext,
) -> ApiResult<web::Json<Vec<BoardName>>> {
    let user_id = session.require_user_id()?;
    let boards = state.boards_query.list_boards(&user_id).await?;
    Ok(web::Json(boards))
}

/// Switch the session to an existing identity taken from a shared link.
///
/// Unknown or malformed ids are reported as `404 Not Found` and leave the
/// session untouched.
#[get("/adopt/{user_id}")]
pub async fn adopt(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<String>,
) -> ApiResult<web::Json<VisitorResponse>> {
    let user_id = UserId::new(path.into_inner())
        .map_err(|_| Error::not_found("unknown user"))?;
    if !state.boards_query.user_exists(&user_id).await? {
        return Err(Error::not_found("unknown user"));
    }
    session.persist_user(&user_id)?;
    info!(user_id = %user_id, "adopted visitor identity");
    let boards = state.boards_query.list_boards(&user_id).await?;
    Ok(web::Json(VisitorResponse { user_id, boards }))
}

/// Drop the visitor identity from the session.
#[post("/forget")]
pub async fn forget(session: SessionContext) -> HttpResponse {
    session.forget();
    HttpResponse::NoContent().finish()
}
