//! Route decoded intents to the driving ports.
//!
//! Each intent produces exactly one reply. Domain failures become `error`
//! replies so a failing store never ends the connection.

use tracing::warn;

use super::messages::{ClientIntent, Delta, ItemMutated, ItemRenamed, ServerReply};
use super::state::WsPorts;
use crate::domain::{Error, UserId};

/// Per-connection dispatcher bound to the caller's identity.
pub(super) struct Dispatcher {
    ports: WsPorts,
    user: UserId,
}

impl Dispatcher {
    pub(super) fn new(ports: WsPorts, user: UserId) -> Self {
        Self { ports, user }
    }

    pub(super) fn user(&self) -> &UserId {
        &self.user
    }

    pub(super) async fn dispatch(&self, intent: ClientIntent) -> ServerReply {
        self.try_dispatch(intent).await.unwrap_or_else(|error| {
            warn!(user_id = %self.user, code = ?error.code(), error = %error, "intent failed");
            ServerReply::Error(error)
        })
    }

    async fn try_dispatch(&self, intent: ClientIntent) -> Result<ServerReply, Error> {
        let WsPorts {
            boards,
            boards_query,
            items,
            items_query,
        } = &self.ports;

        match intent {
            ClientIntent::NewBoard(request) => boards
                .create_board(&self.user, request.name.as_deref())
                .await
                .map(ServerReply::NewBoard),
            ClientIntent::GetBoardItems(request) => items_query
                .list_items(&request.board_id)
                .await
                .map(ServerReply::BoardItems),
            ClientIntent::MutateItem(request) => {
                let item = match request.delta {
                    Delta::Incr => {
                        items
                            .increment_item(&request.board_id, &request.item_name)
                            .await?
                    }
                    Delta::Decr => {
                        items
                            .decrement_item(&request.board_id, &request.item_name)
                            .await?
                    }
                };
                Ok(ServerReply::ItemMutated(ItemMutated {
                    board_id: request.board_id,
                    name: item.name,
                    value: item.value,
                }))
            }
            ClientIntent::ListBoards => boards_query
                .list_boards(&self.user)
                .await
                .map(ServerReply::Boards),
            ClientIntent::RenameBoard(request) => boards
                .rename_board(&request.board_id, &request.name)
                .await
                .map(ServerReply::BoardRenamed),
            ClientIntent::RenameItem(request) => {
                let rename = items
                    .rename_item(&request.board_id, &request.item_name, &request.new_name)
                    .await?;
                Ok(ServerReply::ItemRenamed(ItemRenamed {
                    board_id: request.board_id,
                    old_name: rename.from,
                    new_name: rename.to,
                    moved: rename.moved,
                }))
            }
        }
    }
}
