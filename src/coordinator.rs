use std::sync::{Arc, Mutex, PoisonError};

use crate::protocol::{Version, WriteRequest, WriteResponse};
use crate::VersionStore;

/// Anything a [`ReplicaClient`](crate::ReplicaClient) can send its writes to.
///
/// # Contract
///
/// Implementations must run each `apply` as one indivisible step: assign
/// the next version, store the payload, prune entries at or below the
/// request's baseline and build the response, with no other `apply`
/// interleaved. The version/GC invariants do not hold otherwise.
pub trait Coordinator<T> {
    /// Apply a write and return the surviving sibling payloads.
    fn apply(&mut self, request: WriteRequest<T>) -> WriteResponse<T>;
}

/// A [`VersionStore`] shared between threads.
///
/// Cloning the handle shares the same store. Every `apply` runs entirely
/// under one lock, so concurrent writers are serialised.
///
/// ```
/// use leaderless_register::prelude::*;
///
/// let shared: SharedStore<&str> = SharedStore::new();
/// let mut a = ReplicaClient::new("a");
/// let mut b = ReplicaClient::new("b");
///
/// std::thread::scope(|s| {
///     let mut ha = shared.clone();
///     let mut hb = shared.clone();
///     s.spawn(move || a.write(&mut ha, "milk"));
///     s.spawn(move || b.write(&mut hb, "eggs"));
/// });
///
/// assert_eq!(shared.current_version(), 2);
/// ```
#[derive(Debug)]
pub struct SharedStore<T: Ord + Clone> {
    inner: Arc<Mutex<VersionStore<T>>>,
}

impl<T: Ord + Clone> SharedStore<T> {
    /// Wrap a fresh, empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::from_store(VersionStore::new())
    }

    /// Wrap an existing store.
    #[must_use]
    pub fn from_store(store: VersionStore<T>) -> Self {
        Self {
            inner: Arc::new(Mutex::new(store)),
        }
    }

    /// Latest version issued by the shared store.
    #[must_use]
    pub fn current_version(&self) -> Version {
        self.with(|store| store.current_version())
    }

    /// Run a read-only closure against the store under the lock.
    pub fn with<R>(&self, f: impl FnOnce(&VersionStore<T>) -> R) -> R {
        // apply never panics midway, so a poisoned lock still guards a consistent store
        let guard = self.inner.lock().unwrap_or_else(PoisonError::into_inner);
        f(&guard)
    }
}

impl<T: Ord + Clone> Clone for SharedStore<T> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<T: Ord + Clone> Default for SharedStore<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Ord + Clone> Coordinator<T> for SharedStore<T> {
    fn apply(&mut self, request: WriteRequest<T>) -> WriteResponse<T> {
        let mut guard = self.inner.lock().unwrap_or_else(PoisonError::into_inner);
        guard.apply(request)
    }
}
