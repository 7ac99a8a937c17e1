//! Convenient re-exports for common usage.
//!
//! ```
//! use leaderless_register::prelude::*;
//! ```

pub use crate::Coordinator;
pub use crate::ReplicaClient;
pub use crate::SharedStore;
pub use crate::VersionStore;
pub use crate::WriteRequest;
pub use crate::WriteResponse;
