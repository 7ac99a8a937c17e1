//! # leaderless-register
//!
//! A leaderless, sibling-preserving replicated register.
//!
//! Several independent writers update one collection-valued record (think
//! of a shopping cart) through a single [`VersionStore`]. There is no
//! primary: every write is accepted, tagged with a fresh version, and kept
//! until some writer proves it has already merged it. Causality is tracked
//! with one scalar per writer, the *baseline*, instead of a full vector
//! clock.
//!
//! ## Quick Start
//!
//! ```
//! use leaderless_register::prelude::*;
//!
//! let mut store = VersionStore::new();
//! let mut a = ReplicaClient::new("a");
//! let mut b = ReplicaClient::new("b");
//!
//! a.write(&mut store, "milk");   // version 1
//! b.write(&mut store, "eggs");   // version 2, sees a's write as a sibling
//! a.write(&mut store, "flour");  // version 3, prunes version 1
//!
//! let view: Vec<_> = a.iter().copied().collect();
//! assert_eq!(view, vec!["eggs", "flour", "milk"]);
//! ```
//!
//! ## Protocol
//!
//! - A [`ReplicaClient`] sends its whole view plus the new item, along with
//!   its baseline (the last version it saw).
//! - The store appends the payload under the next version and removes the
//!   prefix of entries at or below that baseline. Entries written by other
//!   clients after the baseline survive as *siblings*.
//! - The client replaces its view with the union of all sibling payloads.
//!
//! ## Known limitation
//!
//! The merge is a set union, so item multiplicity is lost: adding an item
//! that is already in the cart does not increase its count. This is the
//! documented behaviour of the register, not something the merge tries to
//! repair.

#![warn(missing_docs)]

extern crate alloc;

mod coordinator;
mod error;
mod protocol;
mod replica_client;
mod version_store;

pub mod prelude;
pub mod simulation;

pub use coordinator::{Coordinator, SharedStore};
pub use error::{SimulationError, StoreError};
pub use protocol::{Version, WriteRequest, WriteResponse};
pub use replica_client::{ReplicaClient, WriteOutcome};
pub use simulation::{Simulation, StepRecord};
pub use version_store::{Entry, VersionStore};
