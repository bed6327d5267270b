//! Keyed Locks
//!
//! Mutual exclusion scoped to an arbitrary key (an account id, typically),
//! created on demand and reclaimed once nobody references the key any more.
//!
//! ```text
//!   acquire(k) ──▶ leases.entry(k) ──▶ refs += 1 ──▶ await RwLock
//!                    │ (vacant)
//!                    └── pool.pop() or new RwLock
//!
//!   release    ──▶ drop RwLock guard ──▶ refs -= 1 ──▶ refs == 0 ?
//!                                                       └── evict k, pool.push(lock)
//! ```
//!
//! The lease table is a [`DashMap`]. Get-or-create plus increment runs inside a
//! single `entry()` section and decrement plus evict inside a single
//! `remove_if_mut()` section, both under the same shard lock, so a lease can
//! never be evicted while another task is taking a reference to it.
//!
//! The reference count covers waiters as well as holders. A waiter whose
//! future is dropped (timeout, cancellation) gives its reference back from
//! [`KeyGuard`]'s `Drop`, so no stale count survives an aborted acquire.

use std::fmt;
use std::hash::Hash;
use std::sync::Arc;

use crossbeam_queue::ArrayQueue;
use dashmap::DashMap;
use tokio::sync::{OwnedRwLockReadGuard, OwnedRwLockWriteGuard, RwLock};

/// Default number of idle locks kept for reuse.
pub const DEFAULT_POOL_CAPACITY: usize = 1024;

type KeyLock = Arc<RwLock<()>>;

/// Live entry for a contended key.
struct Lease {
    lock: KeyLock,
    /// Waiters + holders. Only touched under the DashMap shard lock.
    refs: usize,
}

struct Inner<K: Eq + Hash> {
    leases: DashMap<K, Lease>,
    pool: ArrayQueue<KeyLock>,
}

impl<K: Eq + Hash + Clone> Inner<K> {
    /// Take a reference on `key`'s lease, creating it if absent.
    fn checkout(&self, key: &K) -> KeyLock {
        let mut lease = self.leases.entry(key.clone()).or_insert_with(|| Lease {
            lock: self
                .pool
                .pop()
                .unwrap_or_else(|| Arc::new(RwLock::new(()))),
            refs: 0,
        });
        lease.refs += 1;
        lease.lock.clone()
    }

    /// Give back a reference on `key`'s lease; evict and recycle at zero.
    fn checkin(&self, key: &K) {
        let evicted = self.leases.remove_if_mut(key, |_, lease| {
            lease.refs -= 1;
            lease.refs == 0
        });

        if let Some((_, lease)) = evicted {
            // A cancelled waiter may still be dropping its clone; such a lock is
            // simply not recycled.
            if Arc::strong_count(&lease.lock) == 1 {
                let _ = self.pool.push(lease.lock);
            }
        }
    }
}

/// Dynamic per-key lock manager.
///
/// Cheap to clone; clones share the same lease table. Construct one per
/// process (or per test) and hand it to whoever needs it.
pub struct KeyedLockManager<K: Eq + Hash> {
    inner: Arc<Inner<K>>,
}

impl<K: Eq + Hash> Clone for KeyedLockManager<K> {
    fn clone(&self) -> Self {
        Self {
            inner: self.inner.clone(),
        }
    }
}

impl<K> KeyedLockManager<K>
where
    K: Eq + Hash + Clone + Send + Sync + 'static,
{
    pub fn new() -> Self {
        Self::with_pool_capacity(DEFAULT_POOL_CAPACITY)
    }

    /// Create a manager keeping at most `capacity` idle locks for reuse.
    pub fn with_pool_capacity(capacity: usize) -> Self {
        Self {
            inner: Arc::new(Inner {
                leases: DashMap::new(),
                pool: ArrayQueue::new(capacity.max(1)),
            }),
        }
    }

    /// Wait until no other holder of `key` is active, then hold it exclusively.
    pub async fn acquire_exclusive(&self, key: K) -> KeyGuard<K> {
        let lock = self.inner.checkout(&key);
        // Built before awaiting: if this future is dropped mid-wait the guard's
        // Drop returns the reference taken above.
        let mut guard = KeyGuard::pending(self.inner.clone(), key);
        guard.held = Some(Held::Exclusive(lock.write_owned().await));
        guard
    }

    /// Wait until no exclusive holder of `key` is active, then hold it shared.
    pub async fn acquire_shared(&self, key: K) -> KeyGuard<K> {
        let lock = self.inner.checkout(&key);
        let mut guard = KeyGuard::pending(self.inner.clone(), key);
        guard.held = Some(Held::Shared(lock.read_owned().await));
        guard
    }

    /// Exclusively hold every key in `keys`.
    ///
    /// Keys are deduplicated and acquired in ascending order, so two callers
    /// locking overlapping sets can never wait on each other in a cycle.
    pub async fn acquire_exclusive_many<I>(&self, keys: I) -> KeyGuards<K>
    where
        I: IntoIterator<Item = K>,
        K: Ord,
    {
        let mut keys: Vec<K> = keys.into_iter().collect();
        keys.sort();
        keys.dedup();

        let mut guards = Vec::with_capacity(keys.len());
        for key in keys {
            guards.push(self.acquire_exclusive(key).await);
        }
        KeyGuards { guards }
    }

    /// Number of keys that currently have a live lease.
    pub fn active_keys(&self) -> usize {
        self.inner.leases.len()
    }

    /// Number of idle locks waiting in the recycling pool.
    pub fn pooled_locks(&self) -> usize {
        self.inner.pool.len()
    }
}

impl<K> Default for KeyedLockManager<K>
where
    K: Eq + Hash + Clone + Send + Sync + 'static,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<K: Eq + Hash> fmt::Debug for KeyedLockManager<K> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("KeyedLockManager")
            .field("active_keys", &self.inner.leases.len())
            .field("pooled_locks", &self.inner.pool.len())
            .finish()
    }
}

enum Held {
    Exclusive(OwnedRwLockWriteGuard<()>),
    Shared(OwnedRwLockReadGuard<()>),
}

/// Handle for one held key. Dropping it releases the key.
#[must_use = "the key is released as soon as the guard is dropped"]
pub struct KeyGuard<K: Eq + Hash + Clone> {
    inner: Arc<Inner<K>>,
    key: K,
    held: Option<Held>,
}

impl<K: Eq + Hash + Clone> KeyGuard<K> {
    fn pending(inner: Arc<Inner<K>>, key: K) -> Self {
        Self {
            inner,
            key,
            held: None,
        }
    }

    pub fn key(&self) -> &K {
        &self.key
    }

    pub fn is_exclusive(&self) -> bool {
        matches!(self.held, Some(Held::Exclusive(_)))
    }

    /// Release the key now instead of at end of scope.
    pub fn release(self) {}
}

impl<K: Eq + Hash + Clone> Drop for KeyGuard<K> {
    fn drop(&mut self) {
        // Unlock before giving the reference back, so a recycled lock is
        // always unlocked.
        self.held.take();
        self.inner.checkin(&self.key);
    }
}

impl<K: Eq + Hash + Clone + fmt::Debug> fmt::Debug for KeyGuard<K> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("KeyGuard")
            .field("key", &self.key)
            .field("exclusive", &self.is_exclusive())
            .finish()
    }
}

/// A set of exclusively held keys, acquired in canonical order.
#[must_use = "the keys are released as soon as the guards are dropped"]
pub struct KeyGuards<K: Eq + Hash + Clone> {
    guards: Vec<KeyGuard<K>>,
}

impl<K: Eq + Hash + Clone> KeyGuards<K> {
    /// Held keys, in acquisition order.
    pub fn keys(&self) -> impl Iterator<Item = &K> {
        self.guards.iter().map(|g| g.key())
    }

    pub fn len(&self) -> usize {
        self.guards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.guards.is_empty()
    }

    pub fn release(self) {}
}
