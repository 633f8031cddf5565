//! Board and item views plus naming rules.
//!
//! Boards and items are never materialised as aggregates; the store holds a
//! board record (name plus items key) and a scored item collection. These
//! types are the read models returned to adapters.

use serde::{Deserialize, Serialize};

use super::BoardId;

/// Name given to boards created without an explicit name.
pub const DEFAULT_BOARD_NAME: &str = "new";
/// Name of the item every new board is seeded with.
pub const SEED_ITEM_NAME: &str = "new";
/// Count of the seed item.
pub const SEED_ITEM_COUNT: i64 = 0;
/// Longest accepted board or item name, in characters.
pub const NAME_MAX: usize = 64;

/// `(board_id, name)` pair returned by board listings.
///
/// Serialised as `{"board_id": "...", "name": "..."}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BoardName {
    /// Opaque board identifier.
    pub board_id: BoardId,
    /// Current, non-unique board name.
    pub name: String,
}

impl BoardName {
    /// Pair a board id with its name.
    pub fn new(board_id: BoardId, name: impl Into<String>) -> Self {
        Self {
            board_id,
            name: name.into(),
        }
    }
}

/// `(name, value)` pair returned by item listings.
///
/// Serialised as `{"name": "...", "value": 3}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BoardItem {
    /// Item name, unique within its board.
    pub name: String,
    /// Counter value, never negative once the item component has run.
    pub value: i64,
}

impl BoardItem {
    /// Pair an item name with its count.
    pub fn new(name: impl Into<String>, value: i64) -> Self {
        Self {
            name: name.into(),
            value,
        }
    }
}

/// Outcome of an item rename, with both names as stored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ItemRename {
    /// Normalised source name.
    pub from: String,
    /// Normalised target name.
    pub to: String,
    /// Whether a count was moved; `false` when the source was absent.
    pub moved: bool,
}

/// Validation failures for board and item names.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum NameValidationError {
    /// Name was empty once trimmed.
    #[error("{kind} name must not be empty")]
    Empty {
        /// Board or item.
        kind: &'static str,
    },
    /// Name exceeded [`NAME_MAX`] characters.
    #[error("{kind} name must be at most {max} characters")]
    TooLong {
        /// Board or item.
        kind: &'static str,
        /// Maximum length.
        max: usize,
    },
}

fn normalise(kind: &'static str, raw: &str) -> Result<String, NameValidationError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(NameValidationError::Empty { kind });
    }
    if trimmed.chars().count() > NAME_MAX {
        return Err(NameValidationError::TooLong {
            kind,
            max: NAME_MAX,
        });
    }
    Ok(trimmed.to_owned())
}

/// Trim and validate a board name.
///
/// # Examples
/// ```
/// use lovelio::domain::board_name;
///
/// assert_eq!(board_name("  groceries ").as_deref(), Ok("groceries"));
/// assert!(board_name("   ").is_err());
/// ```
pub fn board_name(raw: &str) -> Result<String, NameValidationError> {
    normalise("board", raw)
}

/// Trim and validate an item name.
pub fn item_name(raw: &str) -> Result<String, NameValidationError> {
    normalise("item", raw)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use serde_json::json;

    #[rstest]
    fn board_name_serialises_with_snake_case_id() {
        let view = BoardName::new(BoardId::new("b1").expect("id"), "new");
        assert_eq!(
            serde_json::to_value(&view).expect("json"),
            json!({ "board_id": "b1", "name": "new" })
        );
    }

    #[rstest]
    fn board_item_serialises_name_and_value() {
        let item = BoardItem::new("apples", 2);
        assert_eq!(
            serde_json::to_value(&item).expect("json"),
            json!({ "name": "apples", "value": 2 })
        );
    }

    #[rstest]
    #[case("apples".to_owned(), Ok("apples".to_owned()))]
    #[case("  pears\t".to_owned(), Ok("pears".to_owned()))]
    #[case(String::new(), Err(NameValidationError::Empty { kind: "item" }))]
    #[case("x".repeat(NAME_MAX + 1), Err(NameValidationError::TooLong { kind: "item", max: NAME_MAX }))]
    fn item_names_are_trimmed_and_bounded(
        #[case] raw: String,
        #[case] expected: Result<String, NameValidationError>,
    ) {
        assert_eq!(item_name(&raw), expected);
    }

    #[rstest]
    fn names_may_use_the_full_length_budget() {
        let raw = "é".repeat(NAME_MAX);
        assert_eq!(board_name(&raw), Ok(raw.clone()));
    }
}
