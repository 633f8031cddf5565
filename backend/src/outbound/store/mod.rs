//! Counter store adapters.
//!
//! - [`RedisCounterStore`]: production adapter over a `bb8-redis` pool.
//! - [`InMemoryCounterStore`]: process-local adapter for tests and local runs.

mod memory_counter_store;
mod pool;
mod redis_counter_store;

pub use memory_counter_store::InMemoryCounterStore;
pub use pool::{PoolConfig, PoolError, RedisPool};
pub use redis_counter_store::RedisCounterStore;
