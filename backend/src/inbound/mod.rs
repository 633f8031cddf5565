//! Inbound adapters that translate external requests into domain service
//! calls while keeping framework details at the edge.
//!
//! The cookie session and REST endpoints live under [`http`]; the real-time
//! board protocol lives under [`ws`] and reuses the HTTP session to identify
//! the visitor.

pub mod http;
pub mod ws;
