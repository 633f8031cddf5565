//! Builders for the adapter state bundles sharing one counter store.

use std::sync::Arc;

use actix_web::web;

use lovelio::domain::ports::CounterStore;
use lovelio::domain::{BoardService, ItemService};
use lovelio::inbound::http::state::HttpState;
use lovelio::inbound::ws::OriginPolicy;
use lovelio::inbound::ws::state::{WsPorts, WsState};

/// HTTP and WebSocket state wired to the same services.
pub(super) struct AdapterStates {
    pub http: web::Data<HttpState>,
    pub ws: web::Data<WsState>,
}

pub(super) fn build_adapter_states(
    store: Arc<dyn CounterStore>,
    origins: OriginPolicy,
) -> AdapterStates {
    let boards = Arc::new(BoardService::new(store.clone()));
    let items = Arc::new(ItemService::new(store));

    let http = HttpState::new(boards.clone(), boards.clone());
    let ws = WsState::new(
        WsPorts {
            boards: boards.clone(),
            boards_query: boards,
            items: items.clone(),
            items_query: items,
        },
        origins,
    );

    AdapterStates {
        http: web::Data::new(http),
        ws: web::Data::new(ws),
    }
}
