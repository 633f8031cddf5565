//! Outbound adapters implementing domain ports for external infrastructure.
//!
//! - **store**: Redis-backed and in-memory implementations of
//!   [`CounterStore`](crate::domain::ports::CounterStore).
//!
//! Adapters are thin translators between domain calls and store commands.
//! They contain no business logic.

pub mod store;
