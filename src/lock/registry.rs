//! Account lock registry.
//!
//! Maps an account identifier to its canonical lock handle. One handle per
//! identifier, created lazily on first request, never evicted. Backed by a
//! DashMap so first-time creation for the same identifier from many threads
//! still produces a single handle (the entry API holds the shard write lock).

use dashmap::DashMap;
use parking_lot::{ReentrantMutex, ReentrantMutexGuard};
use std::sync::Arc;
use std::time::Duration;

use super::error::LockError;

/// Guard returned by [`LockHandle::lock`] / [`LockHandle::try_lock_for`].
/// Dropping it releases the lock.
pub type LockGuard<'a> = ReentrantMutexGuard<'a, ()>;

/// Exclusive lock for one account identifier.
///
/// Cloning is cheap and yields the same underlying lock. The lock is
/// re-entrant for the owning thread, so code already running under the
/// coordinator may call account operations that lock the same handle again.
#[derive(Debug, Clone)]
pub struct LockHandle {
    inner: Arc<ReentrantMutex<()>>,
}

impl LockHandle {
    fn new() -> Self {
        Self {
            inner: Arc::new(ReentrantMutex::new(())),
        }
    }

    /// Block until the lock is held.
    #[inline]
    pub fn lock(&self) -> LockGuard<'_> {
        self.inner.lock()
    }

    /// Try to take the lock, giving up after `timeout`.
    #[inline]
    pub fn try_lock_for(&self, timeout: Duration) -> Option<LockGuard<'_>> {
        self.inner.try_lock_for(timeout)
    }

    /// Whether any thread currently holds the lock
    #[inline]
    pub fn is_locked(&self) -> bool {
        self.inner.is_locked()
    }

    /// Identity comparison: `true` iff both handles wrap the same lock.
    #[inline]
    pub fn same_handle(&self, other: &LockHandle) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }
}

/// Identifier → lock handle map.
///
/// Constructed explicitly and shared through `Arc`; there is no global
/// instance, so separate registries are fully isolated from each other.
#[derive(Debug, Default)]
pub struct LockRegistry {
    locks: DashMap<String, LockHandle>,
}

impl LockRegistry {
    pub fn new() -> Self {
        Self {
            locks: DashMap::new(),
        }
    }

    /// Get the canonical lock handle for `account_id`, creating it on first use.
    ///
    /// # Errors
    /// `InvalidArgument` if the identifier is empty or whitespace-only.
    pub fn get_lock(&self, account_id: &str) -> Result<LockHandle, LockError> {
        if account_id.trim().is_empty() {
            return Err(LockError::InvalidArgument {
                param: "account_id",
            });
        }

        // Fast path: shard read lock only
        if let Some(handle) = self.locks.get(account_id) {
            return Ok(handle.clone());
        }

        let handle = self
            .locks
            .entry(account_id.to_string())
            .or_insert_with(LockHandle::new)
            .clone();
        Ok(handle)
    }

    /// Number of identifiers that have a handle
    pub fn len(&self) -> usize {
        self.locks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.locks.is_empty()
    }
}
