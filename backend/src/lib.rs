//! Lovelio: anonymous counter boards served over HTTP and WebSocket.
//!
//! - [`domain`]: the counter state engine (boards, items, store port).
//! - [`inbound`]: cookie-session HTTP surface and the WebSocket protocol.
//! - [`outbound`]: Redis and in-memory counter stores.

pub mod domain;
pub mod inbound;
pub mod middleware;
pub mod outbound;
pub mod settings;

pub use middleware::Trace;
