//! Per-region capture serialization.
//!
//! Two simultaneous capture attempts on the same region must not
//! interleave their read-modify-write of the region row; an interleaved
//! read-then-write would let both attackers win against stale strength.
//! In a single-process deployment a mutex keyed by region index is
//! enough. Character-scoped mutations need no entry here.

use std::sync::Arc;

use classquest_domain::RegionIndex;
use dashmap::DashMap;
use tokio::sync::{Mutex, OwnedMutexGuard};

/// Registry of per-region mutexes, created lazily on first contact.
pub struct RegionLockRegistry {
    locks: DashMap<RegionIndex, Arc<Mutex<()>>>,
}

impl RegionLockRegistry {
    pub fn new() -> Self {
        Self {
            locks: DashMap::new(),
        }
    }

    /// Acquire the lock for a region, waiting if another capture attempt
    /// holds it. The guard is owned so it can cross await points.
    pub async fn acquire(&self, index: RegionIndex) -> OwnedMutexGuard<()> {
        let lock = self
            .locks
            .entry(index)
            .or_insert_with(|| Arc::new(Mutex::new(())))
            .clone();
        lock.lock_owned().await
    }
}

impl Default for RegionLockRegistry {
    fn default() -> Self {
        Self::new()
    }
}
