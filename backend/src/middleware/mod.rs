//! Request middleware.
//!
//! Purpose: attach a per-request trace identifier to logs and responses.

pub mod trace;

pub use trace::Trace;
