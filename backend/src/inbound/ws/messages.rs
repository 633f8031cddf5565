//! Wire-level message definitions for the WebSocket adapter.
//!
//! Every frame is a JSON envelope `{"type": ..., "body": ...}`. Inbound
//! envelopes are decoded once into a [`ClientIntent`]; outbound payloads are
//! [`ServerReply`] values serialised with the same envelope shape.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::domain::{BoardId, BoardItem, BoardName, Error};

#[derive(Debug, Deserialize)]
struct Envelope {
    #[serde(rename = "type")]
    kind: String,
    #[serde(default)]
    body: Value,
}

/// Body of a `newBoard` request.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct NewBoardRequest {
    /// Optional display name; blank or missing names use the default.
    #[serde(default)]
    pub name: Option<String>,
}

/// Body of a `getBoardItems` request.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BoardItemsRequest {
    pub board_id: BoardId,
}

/// Direction of a counter mutation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Delta {
    Incr,
    Decr,
}

/// Body of a `mutateItem` request.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MutateItemRequest {
    pub board_id: BoardId,
    pub item_name: String,
    pub delta: Delta,
}

/// Body of a `renameBoard` request.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RenameBoardRequest {
    pub board_id: BoardId,
    pub name: String,
}

/// Body of a `renameItem` request.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RenameItemRequest {
    pub board_id: BoardId,
    pub item_name: String,
    pub new_name: String,
}

/// A decoded client request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClientIntent {
    NewBoard(NewBoardRequest),
    GetBoardItems(BoardItemsRequest),
    MutateItem(MutateItemRequest),
    ListBoards,
    RenameBoard(RenameBoardRequest),
    RenameItem(RenameItemRequest),
}

/// Result of decoding one text frame.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Inbound {
    /// A recognised request.
    Intent(ClientIntent),
    /// A well-formed envelope with an unrecognised `type`.
    Unknown(String),
}

/// Why a text frame could not be decoded.
#[derive(Debug, thiserror::Error)]
pub enum DecodeError {
    /// The frame was not a JSON object with a string `type`.
    #[error("malformed message envelope: {0}")]
    Envelope(#[source] serde_json::Error),
    /// The `type` was recognised but its body did not match.
    #[error("malformed {kind} body: {source}")]
    Body {
        kind: &'static str,
        #[source]
        source: serde_json::Error,
    },
}

fn body<T: DeserializeOwned>(kind: &'static str, body: Value) -> Result<T, DecodeError> {
    // An omitted body reads as an empty object so optional-only bodies decode.
    let body = if body.is_null() {
        Value::Object(Map::new())
    } else {
        body
    };
    serde_json::from_value(body).map_err(|source| DecodeError::Body { kind, source })
}

/// Decode one text frame.
///
/// # Examples
/// ```
/// use lovelio::inbound::ws::messages::{ClientIntent, Inbound, decode};
///
/// let frame = r#"{"type":"getBoardItems","body":{"boardId":"b1"}}"#;
/// let Ok(Inbound::Intent(ClientIntent::GetBoardItems(request))) = decode(frame) else {
///     panic!("expected getBoardItems");
/// };
/// assert_eq!(request.board_id.as_str(), "b1");
/// ```
pub fn decode(text: &str) -> Result<Inbound, DecodeError> {
    let Envelope { kind, body: raw } = serde_json::from_str(text).map_err(DecodeError::Envelope)?;
    let intent = match kind.as_str() {
        "newBoard" => ClientIntent::NewBoard(body("newBoard", raw)?),
        "getBoardItems" => ClientIntent::GetBoardItems(body("getBoardItems", raw)?),
        "mutateItem" => ClientIntent::MutateItem(body("mutateItem", raw)?),
        "listBoards" => ClientIntent::ListBoards,
        "renameBoard" => ClientIntent::RenameBoard(body("renameBoard", raw)?),
        "renameItem" => ClientIntent::RenameItem(body("renameItem", raw)?),
        _ => return Ok(Inbound::Unknown(kind)),
    };
    Ok(Inbound::Intent(intent))
}

/// Acknowledgement for a counter mutation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ItemMutated {
    pub board_id: BoardId,
    pub name: String,
    pub value: i64,
}

/// Acknowledgement for an item rename.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ItemRenamed {
    pub board_id: BoardId,
    pub old_name: String,
    pub new_name: String,
    /// `false` when the old item did not exist and nothing was written.
    pub moved: bool,
}

/// Outbound payload sent to the client.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", content = "body")]
pub enum ServerReply {
    /// Casing matches the deployed client.
    #[serde(rename = "NewBoard")]
    NewBoard(BoardName),
    #[serde(rename = "getBoardItems")]
    BoardItems(Vec<BoardItem>),
    #[serde(rename = "listBoards")]
    Boards(Vec<BoardName>),
    #[serde(rename = "itemMutated")]
    ItemMutated(ItemMutated),
    #[serde(rename = "boardRenamed")]
    BoardRenamed(BoardName),
    #[serde(rename = "itemRenamed")]
    ItemRenamed(ItemRenamed),
    #[serde(rename = "error")]
    Error(Error),
}

impl From<Error> for ServerReply {
    fn from(value: Error) -> Self {
        Self::Error(value)
    }
}
