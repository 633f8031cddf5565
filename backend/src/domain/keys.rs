//! Store key layout.
//!
//! ```text
//! user:{user_id}:boards      list    board ids in creation order
//! board:{board_id}           hash    name, items
//! board:{board_id}:items     zset    item name -> count
//! ```
//!
//! The items key is a pure function of the board id, so no lookup is needed
//! to reach a board's counters.

use super::{BoardId, UserId};

/// Hash field holding a board's display name.
pub const NAME_FIELD: &str = "name";
/// Hash field recording the derived items key.
pub const ITEMS_FIELD: &str = "items";

/// Key of the ordered list of board ids owned by `user`.
pub fn user_boards_key(user: &UserId) -> String {
    format!("user:{user}:boards")
}

/// Key of the record holding a board's name.
pub fn board_key(board: &BoardId) -> String {
    format!("board:{board}")
}

/// Key of the scored item collection belonging to `board`.
///
/// # Examples
/// ```
/// use lovelio::domain::{BoardId, keys};
///
/// let board = BoardId::new("abc").expect("id");
/// assert_eq!(keys::items_key(&board), "board:abc:items");
/// ```
pub fn items_key(board: &BoardId) -> String {
    format!("{}:items", board_key(board))
}
