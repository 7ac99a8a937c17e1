//! Request/response shapes exchanged between a replica client and the store.
//!
//! With the `serde` feature enabled both types serialize to the plain shapes
//!
//! ```text
//! request:  { "baseline": u64 | null, "payload": [item, ...] }
//! response: { "version": u64, "payloads": [[item, ...], ...] }
//! ```
//!
//! where `payloads` is ordered by ascending source-entry version.

use alloc::vec::Vec;

/// Version number issued by the store. Starts at 1 for the first write.
pub type Version = u64;

/// A write sent by a client.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct WriteRequest<T> {
    /// Last version the writer has observed and merged; `None` on its first write.
    pub baseline: Option<Version>,
    /// Full cart contents to store, duplicates included.
    pub payload: Vec<T>,
}

impl<T> WriteRequest<T> {
    /// Build a request from a baseline and a payload.
    pub fn new(baseline: Option<Version>, payload: Vec<T>) -> Self {
        Self { baseline, payload }
    }
}

/// The store's answer to a write.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct WriteResponse<T> {
    /// Version assigned to the write that produced this response.
    pub version: Version,
    /// Payloads of every entry the store still holds, oldest first.
    pub payloads: Vec<Vec<T>>,
}

impl<T> WriteResponse<T> {
    /// Number of sibling payloads carried by the response.
    #[must_use]
    pub fn sibling_count(&self) -> usize {
        self.payloads.len()
    }

    /// Returns `true` if more than one entry survived garbage collection.
    #[must_use]
    pub fn is_conflicted(&self) -> bool {
        self.payloads.len() > 1
    }
}
