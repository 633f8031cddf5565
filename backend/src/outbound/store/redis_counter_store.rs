//! Redis-backed [`CounterStore`].
//!
//! Boards are hashes, board lists are lists, and item counters live in sorted
//! sets whose scores are always whole numbers. Every method checks out one
//! pooled connection and issues a single command, pipeline or script, so each
//! call is exactly one round trip.

use async_trait::async_trait;
use bb8_redis::redis::{self, RedisError};
use tracing::warn;

use super::pool::{PoolError, RedisPool};
use crate::domain::ports::{CounterStore, HashField, StoreError, WriteBatch, WriteOp};

// Raise ARGV[1] in KEYS[1] to ARGV[2] when its score is lower. A member removed
// since the caller's decrement reads as already at the floor.
const RAISE_TO_FLOOR: &str = r"
local score = redis.call('ZSCORE', KEYS[1], ARGV[1])
local floor = tonumber(ARGV[2])
if not score then
  return floor
end
score = tonumber(score)
if score < floor then
  redis.call('ZADD', KEYS[1], floor, ARGV[1])
  return floor
end
return score
";

// Move the score of ARGV[1] in KEYS[1] onto ARGV[2] and drop ARGV[1]. Returns
// nil without writing when ARGV[1] is absent.
const RENAME_MEMBER: &str = r"
local score = redis.call('ZSCORE', KEYS[1], ARGV[1])
if not score then
  return false
end
if ARGV[1] ~= ARGV[2] then
  redis.call('ZADD', KEYS[1], score, ARGV[2])
  redis.call('ZREM', KEYS[1], ARGV[1])
end
return tonumber(score)
";

fn map_redis_error(err: RedisError) -> StoreError {
    if err.is_io_error() || err.is_timeout() || err.is_connection_dropped() {
        StoreError::connection(err.to_string())
    } else {
        StoreError::command(err.to_string())
    }
}

fn map_pool_error(err: PoolError) -> StoreError {
    warn!(error = %err, "counter store checkout failed");
    StoreError::connection(err.to_string())
}

/// Counter store adapter over a pooled Redis client.
#[derive(Clone)]
pub struct RedisCounterStore {
    pool: RedisPool,
    raise_to_floor: redis::Script,
    rename_member: redis::Script,
}

impl RedisCounterStore {
    /// Wrap an already verified pool.
    pub fn new(pool: RedisPool) -> Self {
        Self {
            pool,
            raise_to_floor: redis::Script::new(RAISE_TO_FLOOR),
            rename_member: redis::Script::new(RENAME_MEMBER),
        }
    }
}

fn queue_write(pipe: &mut redis::Pipeline, op: &WriteOp) {
    match op {
        WriteOp::ListPush { key, value } => {
            pipe.cmd("RPUSH").arg(key).arg(value).ignore();
        }
        WriteOp::HashSet { key, field, value } => {
            pipe.cmd("HSET").arg(key).arg(field).arg(value).ignore();
        }
        WriteOp::SortedAdd { key, member, score } => {
            pipe.cmd("ZADD").arg(key).arg(*score).arg(member).ignore();
        }
    }
}

#[async_trait]
impl CounterStore for RedisCounterStore {
    async fn apply(&self, batch: WriteBatch) -> Result<(), StoreError> {
        if batch.is_empty() {
            return Ok(());
        }
        let mut pipe = redis::pipe();
        for op in batch.ops() {
            queue_write(&mut pipe, op);
        }
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let _: () = pipe.query_async(&mut *conn).await.map_err(map_redis_error)?;
        Ok(())
    }

    async fn list_range(&self, key: &str) -> Result<Vec<String>, StoreError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        redis::cmd("LRANGE")
            .arg(key)
            .arg(0)
            .arg(-1)
            .query_async(&mut *conn)
            .await
            .map_err(map_redis_error)
    }

    async fn hash_get_many(&self, fields: &[HashField]) -> Result<Vec<Option<String>>, StoreError> {
        if fields.is_empty() {
            return Ok(Vec::new());
        }
        let mut pipe = redis::pipe();
        for HashField { key, field } in fields {
            pipe.cmd("HGET").arg(key).arg(field);
        }
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        pipe.query_async(&mut *conn).await.map_err(map_redis_error)
    }

    async fn hash_set(&self, key: &str, field: &str, value: &str) -> Result<(), StoreError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let _: () = redis::cmd("HSET")
            .arg(key)
            .arg(field)
            .arg(value)
            .query_async(&mut *conn)
            .await
            .map_err(map_redis_error)?;
        Ok(())
    }

    async fn exists(&self, key: &str) -> Result<bool, StoreError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        redis::cmd("EXISTS")
            .arg(key)
            .query_async(&mut *conn)
            .await
            .map_err(map_redis_error)
    }

    async fn sorted_incr(&self, key: &str, member: &str, delta: i64) -> Result<i64, StoreError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        redis::cmd("ZINCRBY")
            .arg(key)
            .arg(delta)
            .arg(member)
            .query_async(&mut *conn)
            .await
            .map_err(map_redis_error)
    }

    async fn sorted_raise_to(
        &self,
        key: &str,
        member: &str,
        floor: i64,
    ) -> Result<i64, StoreError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        self.raise_to_floor
            .key(key)
            .arg(member)
            .arg(floor)
            .invoke_async(&mut *conn)
            .await
            .map_err(map_redis_error)
    }

    async fn sorted_rename(
        &self,
        key: &str,
        from: &str,
        to: &str,
    ) -> Result<Option<i64>, StoreError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        self.rename_member
            .key(key)
            .arg(from)
            .arg(to)
            .invoke_async(&mut *conn)
            .await
            .map_err(map_redis_error)
    }

    async fn sorted_range(&self, key: &str) -> Result<Vec<(String, i64)>, StoreError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        redis::cmd("ZRANGE")
            .arg(key)
            .arg(0)
            .arg(-1)
            .arg("WITHSCORES")
            .query_async(&mut *conn)
            .await
            .map_err(map_redis_error)
    }
}
