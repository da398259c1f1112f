use std::{
    hash::Hash,
    sync::atomic::{AtomicU64, Ordering},
    time::Duration,
};

/// Read-through cache of committed rows.
///
/// A reader takes [`RowCache::epoch`] before its SELECT and hands it back to
/// [`RowCache::fill`]. Writers call [`RowCache::evict`] after committing,
/// which moves the epoch before evicting. A fill whose read overlapped an
/// eviction removes its own entry again, so a pre-commit row never outlives
/// the commit that replaced it.
pub(crate) struct RowCache<K, V> {
    entries: moka::sync::Cache<K, V>,
    epoch: AtomicU64,
}

impl<K, V> RowCache<K, V>
where
    K: Hash + Eq + Clone + Send + Sync + 'static,
    V: Clone + Send + Sync + 'static,
{
    pub(crate) fn new(capacity: u64, time_to_live: Duration) -> Self {
        Self {
            entries: moka::sync::Cache::builder()
                .max_capacity(capacity)
                .time_to_live(time_to_live)
                .build(),
            epoch: AtomicU64::new(0),
        }
    }

    pub(crate) fn get(&self, key: &K) -> Option<V> {
        self.entries.get(key)
    }

    pub(crate) fn epoch(&self) -> u64 {
        self.epoch.load(Ordering::SeqCst)
    }

    pub(crate) fn fill(&self, key: K, value: V, read_epoch: u64) {
        if self.epoch() != read_epoch {
            return;
        }
        self.entries.insert(key.clone(), value);
        if self.epoch() != read_epoch {
            // An eviction may have run between the check and the insert.
            self.entries.invalidate(&key);
        }
    }

    pub(crate) fn evict<'a>(&self, keys: impl IntoIterator<Item = &'a K>)
    where
        K: 'a,
    {
        self.epoch.fetch_add(1, Ordering::SeqCst);
        for key in keys {
            self.entries.invalidate(key);
        }
    }
}
