use thiserror::Error;

use crate::Version;

/// Errors returned by the validated store entry point.
///
/// The plain [`VersionStore::apply`](crate::VersionStore::apply) path never
/// fails; these only surface through
/// [`VersionStore::try_apply`](crate::VersionStore::try_apply).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    /// The writer claims to have observed a version the store never issued.
    #[error("baseline {baseline} is ahead of the store (current version {current})")]
    BaselineAhead {
        /// Baseline carried by the rejected request.
        baseline: Version,
        /// Store version at the time of rejection.
        current: Version,
    },
}

/// Errors raised while driving a [`Simulation`](crate::Simulation).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SimulationError {
    /// A scripted step names a client the simulation was not built with.
    #[error("unknown client '{0}'")]
    UnknownClient(String),
}
