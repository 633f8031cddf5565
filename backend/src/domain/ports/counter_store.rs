//! Driven port for the persistent counter store.
//!
//! The board and item services are written entirely against this trait. Each
//! method costs exactly one store round trip; [`CounterStore::apply`] and
//! [`CounterStore::hash_get_many`] pipeline several commands into that single
//! round trip. Atomicity guarantees are noted per method and are the only
//! concurrency primitives the services rely on.

use async_trait::async_trait;

use super::define_port_error;

define_port_error! {
    /// Errors raised by counter store adapters.
    pub enum StoreError {
        /// The store could not be reached or no pooled connection was available.
        Connection { message: String } => "counter store connection failed: {message}",
        /// The store rejected a command or returned an unexpected reply.
        Command { message: String } => "counter store command failed: {message}",
    }
}

/// One write queued inside a [`WriteBatch`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WriteOp {
    /// Append `value` to the list at `key`, creating the list if needed.
    ListPush { key: String, value: String },
    /// Set `field` of the hash at `key`.
    HashSet {
        key: String,
        field: String,
        value: String,
    },
    /// Set `member` of the sorted collection at `key` to `score`.
    SortedAdd {
        key: String,
        member: String,
        score: i64,
    },
}

/// Ordered set of writes flushed to the store in one pipelined round trip.
///
/// Batches are not transactional: a failure part-way through may leave
/// earlier writes applied.
///
/// # Examples
/// ```
/// use lovelio::domain::ports::WriteBatch;
///
/// let batch = WriteBatch::new()
///     .list_push("user:u:boards", "b")
///     .hash_set("board:b", "name", "new");
/// assert_eq!(batch.len(), 2);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WriteBatch {
    ops: Vec<WriteOp>,
}

impl WriteBatch {
    /// Start an empty batch.
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a list append.
    #[must_use]
    pub fn list_push(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.ops.push(WriteOp::ListPush {
            key: key.into(),
            value: value.into(),
        });
        self
    }

    /// Queue a hash field write.
    #[must_use]
    pub fn hash_set(
        mut self,
        key: impl Into<String>,
        field: impl Into<String>,
        value: impl Into<String>,
    ) -> Self {
        self.ops.push(WriteOp::HashSet {
            key: key.into(),
            field: field.into(),
            value: value.into(),
        });
        self
    }

    /// Queue a sorted-collection member write.
    #[must_use]
    pub fn sorted_add(mut self, key: impl Into<String>, member: impl Into<String>, score: i64) -> Self {
        self.ops.push(WriteOp::SortedAdd {
            key: key.into(),
            member: member.into(),
            score,
        });
        self
    }

    /// Queued writes in submission order.
    pub fn ops(&self) -> &[WriteOp] {
        &self.ops
    }

    /// Number of queued writes.
    pub fn len(&self) -> usize {
        self.ops.len()
    }

    /// Whether nothing has been queued.
    pub fn is_empty(&self) -> bool {
        self.ops.is_empty()
    }
}

/// Address of a single hash field, used for batched reads.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HashField {
    /// Hash key.
    pub key: String,
    /// Field within the hash.
    pub field: String,
}

impl HashField {
    /// Address `field` within the hash at `key`.
    pub fn new(key: impl Into<String>, field: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            field: field.into(),
        }
    }
}

/// Store protocol required by the counter engine.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CounterStore: Send + Sync {
    /// Flush every queued write in one pipelined round trip.
    async fn apply(&self, batch: WriteBatch) -> Result<(), StoreError>;

    /// Read the full list at `key`; a missing key reads as empty.
    async fn list_range(&self, key: &str) -> Result<Vec<String>, StoreError>;

    /// Read many hash fields in one pipelined round trip.
    ///
    /// Replies are returned in submission order; absent fields are `None`.
    async fn hash_get_many(&self, fields: &[HashField]) -> Result<Vec<Option<String>>, StoreError>;

    /// Overwrite `field` of the hash at `key`.
    async fn hash_set(&self, key: &str, field: &str, value: &str) -> Result<(), StoreError>;

    /// Whether any value is stored at `key`.
    async fn exists(&self, key: &str) -> Result<bool, StoreError>;

    /// Atomically add `delta` to `member`, creating it at `delta` when absent.
    ///
    /// Returns the post-increment score.
    async fn sorted_incr(&self, key: &str, member: &str, delta: i64) -> Result<i64, StoreError>;

    /// Atomically raise `member` to `floor` if its score is below `floor`.
    ///
    /// Returns the score after the check: `floor` when the write happened,
    /// the current score otherwise, and `floor` without writing when the
    /// member has since disappeared.
    async fn sorted_raise_to(&self, key: &str, member: &str, floor: i64)
        -> Result<i64, StoreError>;

    /// Atomically move the score of `from` onto `to` and remove `from`.
    ///
    /// Returns the moved score, or `None` without writing when `from` is
    /// absent. An existing `to` is overwritten. Renaming a member onto itself
    /// leaves it in place.
    async fn sorted_rename(&self, key: &str, from: &str, to: &str)
        -> Result<Option<i64>, StoreError>;

    /// Read every `(member, score)` pair, ascending by score then member.
    async fn sorted_range(&self, key: &str) -> Result<Vec<(String, i64)>, StoreError>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    fn batch_preserves_submission_order() {
        let batch = WriteBatch::new()
            .list_push("l", "v")
            .hash_set("h", "f", "v")
            .sorted_add("z", "m", 0);

        assert_eq!(
            batch.ops(),
            &[
                WriteOp::ListPush {
                    key: "l".into(),
                    value: "v".into()
                },
                WriteOp::HashSet {
                    key: "h".into(),
                    field: "f".into(),
                    value: "v".into()
                },
                WriteOp::SortedAdd {
                    key: "z".into(),
                    member: "m".into(),
                    score: 0
                },
            ]
        );
    }

    #[rstest]
    fn empty_batch_reports_empty() {
        let batch = WriteBatch::new();
        assert!(batch.is_empty());
        assert_eq!(batch.len(), 0);
    }

    #[rstest]
    fn store_errors_render_their_cause() {
        assert_eq!(
            StoreError::connection("refused").to_string(),
            "counter store connection failed: refused"
        );
        assert_eq!(
            StoreError::command("WRONGTYPE").to_string(),
            "counter store command failed: WRONGTYPE"
        );
    }
}
