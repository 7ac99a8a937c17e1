use alloc::vec::Vec;

use tracing::{debug, warn};

use crate::coordinator::Coordinator;
use crate::error::StoreError;
use crate::protocol::{Version, WriteRequest, WriteResponse};

/// One version-tagged payload snapshot held by the store.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Entry<T> {
    version: Version,
    payload: Vec<T>,
}

impl<T> Entry<T> {
    /// Version the store assigned to this entry.
    #[must_use]
    pub fn version(&self) -> Version {
        self.version
    }

    /// Sorted payload, duplicates preserved.
    #[must_use]
    pub fn payload(&self) -> &[T] {
        &self.payload
    }
}

/// The single coordination point of the register.
///
/// Every write is stored as a new [`Entry`] under a fresh version. Entries
/// are pruned only when a writer's baseline shows it has already merged
/// them; entries written concurrently by other writers survive as
/// siblings and are handed back to the next writer for reconciliation.
///
/// # Example
///
/// ```
/// use leaderless_register::prelude::*;
///
/// let mut store = VersionStore::new();
///
/// let r1 = store.apply(WriteRequest::new(None, vec!["milk"]));
/// let r2 = store.apply(WriteRequest::new(None, vec!["eggs"]));
/// assert_eq!(r2.payloads, vec![vec!["milk"], vec!["eggs"]]);
///
/// // A writer that saw version 1 supersedes it, but not the sibling at 2.
/// let r3 = store.apply(WriteRequest::new(Some(r1.version), vec!["milk", "flour"]));
/// assert_eq!(r3.version, 3);
/// assert_eq!(r3.payloads, vec![vec!["eggs"], vec!["flour", "milk"]]);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VersionStore<T: Ord + Clone> {
    current_version: Version,
    /// Sorted ascending by version, versions unique.
    entries: Vec<Entry<T>>,
}

impl<T: Ord + Clone> VersionStore<T> {
    /// Create an empty store at version 0.
    #[must_use]
    pub fn new() -> Self {
        Self {
            current_version: 0,
            entries: Vec::new(),
        }
    }

    /// Store a write, prune what its baseline supersedes and return every
    /// surviving payload.
    ///
    /// Steps run in order: bump the version, append the sorted payload,
    /// drop the prefix of entries at or below the request's baseline, then
    /// answer with the new version and the remaining payloads. A request
    /// without a baseline prunes nothing.
    ///
    /// The baseline is trusted as-is. Use [`try_apply`](Self::try_apply) to
    /// reject baselines the store never issued.
    pub fn apply(&mut self, request: WriteRequest<T>) -> WriteResponse<T> {
        let WriteRequest {
            baseline,
            mut payload,
        } = request;
        payload.sort();

        self.current_version += 1;
        let version = self.current_version;
        self.entries.push(Entry { version, payload });

        let pruned = self.collect_garbage(baseline);

        debug!(
            version,
            baseline = ?baseline,
            pruned,
            siblings = self.entries.len(),
            "applied write"
        );

        self.response()
    }

    /// Like [`apply`](Self::apply), but refuses a baseline greater than the
    /// current version. The store is left untouched on rejection.
    pub fn try_apply(
        &mut self,
        request: WriteRequest<T>,
    ) -> Result<WriteResponse<T>, StoreError> {
        if let Some(baseline) = request.baseline {
            if baseline > self.current_version {
                warn!(
                    baseline,
                    current = self.current_version,
                    "rejected write with baseline ahead of store"
                );
                return Err(StoreError::BaselineAhead {
                    baseline,
                    current: self.current_version,
                });
            }
        }
        Ok(self.apply(request))
    }

    /// Latest version issued. Zero before the first write.
    #[must_use]
    pub fn current_version(&self) -> Version {
        self.current_version
    }

    /// Entries currently retained, oldest first.
    #[must_use]
    pub fn entries(&self) -> &[Entry<T>] {
        &self.entries
    }

    /// Number of retained entries.
    #[must_use]
    pub fn sibling_count(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` if the store holds no entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Remove the prefix of entries with `version <= baseline`.
    ///
    /// The newest entry belongs to the request being applied and is never
    /// pruned by it, even when a client reports a baseline from the future.
    fn collect_garbage(&mut self, baseline: Option<Version>) -> usize {
        let Some(baseline) = baseline else {
            return 0;
        };

        let older = self.entries.len().saturating_sub(1);
        let cut = self.entries[..older].partition_point(|e| e.version <= baseline);
        self.entries.drain(..cut);
        cut
    }

    fn response(&self) -> WriteResponse<T> {
        WriteResponse {
            version: self.current_version,
            payloads: self.entries.iter().map(|e| e.payload.clone()).collect(),
        }
    }
}

impl<T: Ord + Clone> Default for VersionStore<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Ord + Clone> Coordinator<T> for VersionStore<T> {
    fn apply(&mut self, request: WriteRequest<T>) -> WriteResponse<T> {
        VersionStore::apply(self, request)
    }
}
