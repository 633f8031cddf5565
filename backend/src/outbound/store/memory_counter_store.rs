//! In-process [`CounterStore`] used by tests and local development.
//!
//! Mirrors the Redis adapter's semantics: missing keys read as empty, sorted
//! ranges order by score then member, and every trait call counts as one
//! round trip so callers can assert on batching.

use std::collections::{BTreeMap, HashMap};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Mutex, MutexGuard, PoisonError};

use async_trait::async_trait;

use crate::domain::ports::{CounterStore, HashField, StoreError, WriteBatch, WriteOp};

#[derive(Debug, Default)]
struct Keyspace {
    lists: HashMap<String, Vec<String>>,
    hashes: HashMap<String, BTreeMap<String, String>>,
    sorted: HashMap<String, HashMap<String, i64>>,
}

impl Keyspace {
    fn write(&mut self, op: WriteOp) {
        match op {
            WriteOp::ListPush { key, value } => self.lists.entry(key).or_default().push(value),
            WriteOp::HashSet { key, field, value } => {
                self.hashes.entry(key).or_default().insert(field, value);
            }
            WriteOp::SortedAdd { key, member, score } => {
                self.sorted.entry(key).or_default().insert(member, score);
            }
        }
    }

    fn hash_field(&self, key: &str, field: &str) -> Option<String> {
        self.hashes.get(key).and_then(|hash| hash.get(field)).cloned()
    }

    fn score(&self, key: &str, member: &str) -> Option<i64> {
        self.sorted.get(key).and_then(|set| set.get(member)).copied()
    }

    fn remove_member(&mut self, key: &str, member: &str) {
        if let Some(set) = self.sorted.get_mut(key) {
            set.remove(member);
            if set.is_empty() {
                self.sorted.remove(key);
            }
        }
    }
}

/// Mutex-guarded keyspace implementing the counter store port.
#[derive(Debug, Default)]
pub struct InMemoryCounterStore {
    keys: Mutex<Keyspace>,
    round_trips: AtomicUsize,
    offline: AtomicBool,
}

impl InMemoryCounterStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of store calls served so far.
    pub fn round_trips(&self) -> usize {
        self.round_trips.load(Ordering::SeqCst)
    }

    /// Make every subsequent call fail with a connection error, or recover.
    pub fn set_offline(&self, offline: bool) {
        self.offline.store(offline, Ordering::SeqCst);
    }

    fn begin(&self) -> Result<MutexGuard<'_, Keyspace>, StoreError> {
        self.round_trips.fetch_add(1, Ordering::SeqCst);
        if self.offline.load(Ordering::SeqCst) {
            return Err(StoreError::connection("in-memory store is offline"));
        }
        // A panicking writer leaves at most one op half-applied; keep serving.
        Ok(self.keys.lock().unwrap_or_else(PoisonError::into_inner))
    }
}

#[async_trait]
impl CounterStore for InMemoryCounterStore {
    async fn apply(&self, batch: WriteBatch) -> Result<(), StoreError> {
        let mut keys = self.begin()?;
        for op in batch.ops() {
            keys.write(op.clone());
        }
        Ok(())
    }

    async fn list_range(&self, key: &str) -> Result<Vec<String>, StoreError> {
        let keys = self.begin()?;
        Ok(keys.lists.get(key).cloned().unwrap_or_default())
    }

    async fn hash_get_many(&self, fields: &[HashField]) -> Result<Vec<Option<String>>, StoreError> {
        let keys = self.begin()?;
        Ok(fields
            .iter()
            .map(|HashField { key, field }| keys.hash_field(key, field))
            .collect())
    }

    async fn hash_set(&self, key: &str, field: &str, value: &str) -> Result<(), StoreError> {
        let mut keys = self.begin()?;
        keys.write(WriteOp::HashSet {
            key: key.to_owned(),
            field: field.to_owned(),
            value: value.to_owned(),
        });
        Ok(())
    }

    async fn exists(&self, key: &str) -> Result<bool, StoreError> {
        let keys = self.begin()?;
        Ok(keys.lists.contains_key(key)
            || keys.hashes.contains_key(key)
            || keys.sorted.contains_key(key))
    }

    async fn sorted_incr(&self, key: &str, member: &str, delta: i64) -> Result<i64, StoreError> {
        let mut keys = self.begin()?;
        let score = keys
            .sorted
            .entry(key.to_owned())
            .or_default()
            .entry(member.to_owned())
            .or_insert(0);
        *score += delta;
        Ok(*score)
    }

    async fn sorted_raise_to(
        &self,
        key: &str,
        member: &str,
        floor: i64,
    ) -> Result<i64, StoreError> {
        let mut keys = self.begin()?;
        let Some(score) = keys
            .sorted
            .get_mut(key)
            .and_then(|set| set.get_mut(member))
        else {
            return Ok(floor);
        };
        if *score < floor {
            *score = floor;
        }
        Ok(*score)
    }

    async fn sorted_rename(
        &self,
        key: &str,
        from: &str,
        to: &str,
    ) -> Result<Option<i64>, StoreError> {
        let mut keys = self.begin()?;
        let Some(score) = keys.score(key, from) else {
            return Ok(None);
        };
        if from != to {
            keys.write(WriteOp::SortedAdd {
                key: key.to_owned(),
                member: to.to_owned(),
                score,
            });
            keys.remove_member(key, from);
        }
        Ok(Some(score))
    }

    async fn sorted_range(&self, key: &str) -> Result<Vec<(String, i64)>, StoreError> {
        let keys = self.begin()?;
        let mut pairs: Vec<(String, i64)> = keys
            .sorted
            .get(key)
            .map(|set| set.iter().map(|(m, s)| (m.clone(), *s)).collect())
            .unwrap_or_default();
        pairs.sort_by(|(am, a), (bm, b)| a.cmp(b).then_with(|| am.cmp(bm)));
        Ok(pairs)
    }
}
