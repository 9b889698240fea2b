use crate::domain::ports::CodeStore;
use crate::domain::verification::VerificationRecord;
use chrono::{DateTime, Utc};
use parking_lot::RwLock;
use std::collections::HashMap;
use std::collections::hash_map::{DefaultHasher, Entry};
use std::hash::{Hash, Hasher};

/// Default number of lock stripes.
pub const DEFAULT_SHARDS: usize = 16;

/// A lock-striped in-memory code store.
///
/// Each subject hashes to one shard; each shard is its own
/// `RwLock<HashMap<..>>`. Subjects on different shards never contend, and
/// all operations on one subject are serialised by its shard lock.
pub struct ShardedCodeStore {
    shards: Vec<RwLock<HashMap<String, VerificationRecord>>>,
}

impl ShardedCodeStore {
    /// `shard_count` is clamped to at least one.
    pub fn new(shard_count: usize) -> Self {
        let shards = (0..shard_count.max(1))
            .map(|_| RwLock::new(HashMap::new()))
            .collect();
        Self { shards }
    }

    pub fn shard_count(&self) -> usize {
        self.shards.len()
    }

    fn shard(&self, subject: &str) -> &RwLock<HashMap<String, VerificationRecord>> {
        let mut hasher = DefaultHasher::new();
        subject.hash(&mut hasher);
        let idx = (hasher.finish() % self.shards.len() as u64) as usize;
        &self.shards[idx]
    }
}

impl Default for ShardedCodeStore {
    fn default() -> Self {
        Self::new(DEFAULT_SHARDS)
    }
}

impl CodeStore for ShardedCodeStore {
    fn get(&self, subject: &str) -> Option<VerificationRecord> {
        self.shard(subject).read().get(subject).cloned()
    }

    fn put(&self, record: VerificationRecord) {
        self.shard(&record.subject)
            .write()
            .insert(record.subject.clone(), record);
    }

    fn remove(&self, subject: &str) -> Option<VerificationRecord> {
        self.shard(subject).write().remove(subject)
    }

    fn remove_if(&self, subject: &str, predicate: &dyn Fn(&VerificationRecord) -> bool) -> bool {
        let mut shard = self.shard(subject).write();
        match shard.entry(subject.to_string()) {
            Entry::Occupied(entry) if predicate(entry.get()) => {
                entry.remove();
                true
            }
            _ => false,
        }
    }

    fn sweep_expired(&self, now: DateTime<Utc>) -> usize {
        self.shards
            .iter()
            .map(|shard| {
                let mut shard = shard.write();
                let before = shard.len();
                shard.retain(|_, record| !record.is_expired(now));
                before - shard.len()
            })
            .sum()
    }

    fn len(&self) -> usize {
        self.shards.iter().map(|shard| shard.read().len()).sum()
    }
}
