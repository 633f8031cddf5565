//! Counter state engine.
//!
//! Purpose: define the board/item data model, the store port the engine is
//! written against, and the services that enforce creation seeding and the
//! non-negative counter floor.
//!
//! Public surface:
//! - Error / ErrorCode: transport-agnostic failures.
//! - UserId / BoardId: opaque identifiers; `create_user` issues new users.
//! - BoardName / BoardItem: listing views.
//! - BoardService / ItemService: implementations of the driving ports in
//!   [`ports`].

pub mod board;
pub mod board_service;
pub mod error;
pub mod identity;
pub mod item_service;
pub mod keys;
pub mod ports;

pub use self::board::{
    BoardItem, BoardName, DEFAULT_BOARD_NAME, ItemRename, NAME_MAX, NameValidationError,
    SEED_ITEM_COUNT, SEED_ITEM_NAME, board_name, item_name,
};
pub use self::board_service::BoardService;
pub use self::error::{Error, ErrorCode};
pub use self::identity::{BoardId, IdentifierValidationError, UserId, create_user};
pub use self::item_service::ItemService;

use self::ports::StoreError;

/// Map store failures onto the domain error surfaced to adapters.
pub(crate) fn map_store_error(error: StoreError) -> Error {
    match error {
        StoreError::Connection { message } => {
            Error::service_unavailable(format!("counter store unavailable: {message}"))
        }
        StoreError::Command { message } => {
            Error::service_unavailable(format!("counter store error: {message}"))
        }
    }
}
