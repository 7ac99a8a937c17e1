use alloc::collections::BTreeSet;
use alloc::string::String;
use alloc::vec::Vec;

use tracing::debug;

use crate::coordinator::Coordinator;
use crate::protocol::{Version, WriteRequest, WriteResponse};

/// A writer holding a merged local view of the register.
///
/// Each [`write`](Self::write) sends the whole view plus one new item,
/// tagged with the last version this client observed. The response
/// carries every sibling the store still holds; the client reconciles
/// them by plain set union.
///
/// The union does not encode quantity: adding an item that is already in
/// the view leaves the view unchanged, even though the store records the
/// duplicate.
///
/// # Example
///
/// ```
/// use leaderless_register::prelude::*;
///
/// let mut store = VersionStore::new();
/// let mut alice = ReplicaClient::new("alice");
/// let mut bob = ReplicaClient::new("bob");
///
/// alice.write(&mut store, "milk");
/// bob.write(&mut store, "eggs");
/// let outcome = alice.write(&mut store, "flour");
///
/// assert_eq!(outcome.baseline, 3);
/// assert_eq!(outcome.view, vec!["eggs", "flour", "milk"]);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ReplicaClient<T: Ord + Clone> {
    name: String,
    view: BTreeSet<T>,
    baseline: Option<Version>,
}

/// What a client holds after a completed write round-trip.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct WriteOutcome<T> {
    /// The client's new baseline (the version assigned to its write).
    pub baseline: Version,
    /// Merged view, sorted and deduplicated.
    pub view: Vec<T>,
    /// Number of sibling payloads that were merged.
    pub siblings: usize,
}

impl<T: Ord + Clone> ReplicaClient<T> {
    /// Create a client with an empty view that has not observed any version.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            view: BTreeSet::new(),
            baseline: None,
        }
    }

    /// The request this client would send to add `item`.
    ///
    /// The payload is the current view followed by `item`; it is not
    /// deduplicated.
    #[must_use]
    pub fn build_request(&self, item: T) -> WriteRequest<T> {
        let mut payload: Vec<T> = self.view.iter().cloned().collect();
        payload.push(item);
        WriteRequest::new(self.baseline, payload)
    }

    /// Add `item` through `coordinator` and merge the response.
    pub fn write<C>(&mut self, coordinator: &mut C, item: T) -> WriteOutcome<T>
    where
        C: Coordinator<T> + ?Sized,
    {
        let request = self.build_request(item);
        debug!(
            client = %self.name,
            baseline = ?request.baseline,
            payload_len = request.payload.len(),
            "sending write"
        );

        let response = coordinator.apply(request);
        self.merge(&response);

        WriteOutcome {
            baseline: response.version,
            view: self.view.iter().cloned().collect(),
            siblings: response.sibling_count(),
        }
    }

    /// Adopt the response's version as the new baseline and replace the
    /// view with the union of all returned payloads.
    ///
    /// Merging the same response again changes nothing.
    pub fn merge(&mut self, response: &WriteResponse<T>) {
        self.baseline = Some(response.version);
        self.view = response.payloads.iter().flatten().cloned().collect();

        debug!(
            client = %self.name,
            baseline = response.version,
            siblings = response.sibling_count(),
            view_len = self.view.len(),
            "merged response"
        );
    }

    /// Name used in logs and transcripts.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Last version this client observed, `None` before its first write.
    #[must_use]
    pub fn baseline(&self) -> Option<Version> {
        self.baseline
    }

    /// The merged local view.
    #[must_use]
    pub fn view(&self) -> &BTreeSet<T> {
        &self.view
    }

    /// Check if the local view contains an item.
    #[must_use]
    pub fn contains(&self, item: &T) -> bool {
        self.view.contains(item)
    }

    /// Number of distinct items in the local view.
    #[must_use]
    pub fn len(&self) -> usize {
        self.view.len()
    }

    /// Check if the local view is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.view.is_empty()
    }

    /// Iterate over the local view in sorted order.
    pub fn iter(&self) -> impl Iterator<Item = &T> {
        self.view.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::VersionStore;

    #[test]
    fn new_client_has_no_baseline() {
        let c = ReplicaClient::<String>::new("a");
        assert_eq!(c.name(), "a");
        assert_eq!(c.baseline(), None);
        assert!(c.is_empty());
    }

    #[test]
    fn first_request_has_null_baseline() {
        let c = ReplicaClient::new("a");
        let req = c.build_request("milk");
        assert_eq!(req, WriteRequest::new(None, vec!["milk"]));
    }

    #[test]
    fn request_carries_view_plus_item_without_dedup() {
        let mut c = ReplicaClient::new("a");
        c.merge(&WriteResponse {
            version: 4,
            payloads: vec![vec!["eggs", "milk"]],
        });

        let req = c.build_request("milk");
        assert_eq!(req.baseline, Some(4));
        assert_eq!(req.payload, vec!["eggs", "milk", "milk"]);
    }

    #[test]
    fn write_updates_baseline_and_view() {
        let mut store = VersionStore::new();
        let mut c = ReplicaClient::new("a");

        let outcome = c.write(&mut store, "milk");
        assert_eq!(outcome.baseline, 1);
        assert_eq!(outcome.view, vec!["milk"]);
        assert_eq!(outcome.siblings, 1);
        assert_eq!(c.baseline(), Some(1));
        assert!(c.contains(&"milk"));
    }

    #[test]
    fn merge_is_union_of_siblings() {
        let mut c = ReplicaClient::new("a");
        c.merge(&WriteResponse {
            version: 7,
            payloads: vec![vec!["eggs"], vec!["flour", "milk"], vec!["eggs", "ham"]],
        });
        let view: Vec<_> = c.iter().copied().collect();
        assert_eq!(view, vec!["eggs", "flour", "ham", "milk"]);
        assert_eq!(c.baseline(), Some(7));
    }

    #[test]
    fn merge_is_idempotent() {
        let response = WriteResponse {
            version: 3,
            payloads: vec![vec!["eggs"], vec!["flour", "milk"]],
        };

        let mut c = ReplicaClient::new("a");
        c.merge(&response);
        let after_first = c.clone();
        c.merge(&response);

        assert_eq!(c, after_first);
    }

    #[test]
    fn repeated_item_does_not_increase_count() {
        let mut store = VersionStore::new();
        let mut c = ReplicaClient::new("a");
        c.write(&mut store, "milk");

        let req = c.build_request("milk");
        assert_eq!(req.payload, vec!["milk", "milk"]);

        let outcome = c.write(&mut store, "milk");
        assert_eq!(store.entries().last().unwrap().payload(), &["milk", "milk"]);
        assert_eq!(outcome.view, vec!["milk"]);
        assert_eq!(c.len(), 1);
    }

    #[test]
    fn write_through_trait_object() {
        let mut store = VersionStore::new();
        let coordinator: &mut dyn Coordinator<&str> = &mut store;
        let mut c = ReplicaClient::new("a");
        let outcome = c.write(coordinator, "ham");
        assert_eq!(outcome.view, vec!["ham"]);
    }
}
