//! HTTP inbound adapter: visitor bootstrap, board listing and health probes.

pub mod error;
pub mod health;
pub mod session;
pub mod session_config;
pub mod state;
#[cfg(test)]
pub mod test_utils;
pub mod visitor;

pub use error::ApiResult;
