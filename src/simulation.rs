//! Deterministic driver for a store shared by several named clients.
//!
//! The driver takes its workload as an explicit sequence of
//! `(client, item)` pairs, so runs are reproducible. Random workloads are
//! generated outside the library and fed in the same way.
//!
//! ```
//! use leaderless_register::Simulation;
//!
//! let mut sim = Simulation::new(["a", "b"]);
//! let transcript = sim
//!     .run([("a", "milk"), ("b", "eggs"), ("a", "flour")])
//!     .unwrap();
//!
//! assert_eq!(transcript.len(), 3);
//! assert_eq!(transcript[2].view, vec!["eggs", "flour", "milk"]);
//! // b has not written since a's last write, so its view is stale.
//! assert!(!sim.is_converged());
//! ```

use alloc::collections::BTreeSet;
use alloc::string::String;
use alloc::vec::Vec;

use tracing::info;

use crate::coordinator::Coordinator;
use crate::error::SimulationError;
use crate::protocol::{WriteRequest, WriteResponse};
use crate::{ReplicaClient, VersionStore};

/// Everything observed during one write round-trip.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct StepRecord<T> {
    /// 1-based position of the step within the simulation.
    pub step: usize,
    /// Client that issued the write.
    pub client: String,
    /// Item the client added.
    pub item: T,
    /// Request as sent to the store.
    pub request: WriteRequest<T>,
    /// Response as received from the store.
    pub response: WriteResponse<T>,
    /// Client view after merging the response.
    pub view: Vec<T>,
}

/// Passes writes through to the store and keeps a copy of the exchange.
struct Recorder<'a, T: Ord + Clone> {
    store: &'a mut VersionStore<T>,
    exchange: Option<(WriteRequest<T>, WriteResponse<T>)>,
}

impl<T: Ord + Clone> Coordinator<T> for Recorder<'_, T> {
    fn apply(&mut self, request: WriteRequest<T>) -> WriteResponse<T> {
        let response = self.store.apply(request.clone());
        self.exchange = Some((request, response.clone()));
        response
    }
}

/// One store and a fixed set of named clients bound to it.
#[derive(Debug, Clone)]
pub struct Simulation<T: Ord + Clone> {
    store: VersionStore<T>,
    clients: Vec<ReplicaClient<T>>,
    steps: usize,
}

impl<T: Ord + Clone> Simulation<T> {
    /// Build an empty store and one client per name.
    ///
    /// Repeated names refer to the same client.
    pub fn new<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut clients: Vec<ReplicaClient<T>> = Vec::new();
        for name in names {
            let name = name.into();
            if clients.iter().all(|c| c.name() != name) {
                clients.push(ReplicaClient::new(name));
            }
        }

        Self {
            store: VersionStore::new(),
            clients,
            steps: 0,
        }
    }

    /// Have `client` add `item` and record the exchange.
    ///
    /// Fails without touching the store if no client has that name.
    pub fn step(&mut self, client: &str, item: T) -> Result<StepRecord<T>, SimulationError> {
        let replica = self
            .clients
            .iter_mut()
            .find(|c| c.name() == client)
            .ok_or_else(|| SimulationError::UnknownClient(client.into()))?;

        let mut recorder = Recorder {
            store: &mut self.store,
            exchange: None,
        };
        let outcome = replica.write(&mut recorder, item.clone());

        // Recorder::apply runs exactly once per write.
        let Some((request, response)) = recorder.exchange else {
            unreachable!("write completed without reaching the store");
        };

        self.steps += 1;
        info!(
            step = self.steps,
            client,
            version = outcome.baseline,
            siblings = outcome.siblings,
            view_len = outcome.view.len(),
            "write applied"
        );

        Ok(StepRecord {
            step: self.steps,
            client: client.into(),
            item,
            request,
            response,
            view: outcome.view,
        })
    }

    /// Run a sequence of `(client, item)` steps and return their records.
    ///
    /// Stops at the first unknown client; steps before it stay applied.
    pub fn run<I, S>(&mut self, ops: I) -> Result<Vec<StepRecord<T>>, SimulationError>
    where
        I: IntoIterator<Item = (S, T)>,
        S: AsRef<str>,
    {
        ops.into_iter()
            .map(|(client, item)| self.step(client.as_ref(), item))
            .collect()
    }

    /// Look up a client by name.
    #[must_use]
    pub fn client(&self, name: &str) -> Option<&ReplicaClient<T>> {
        self.clients.iter().find(|c| c.name() == name)
    }

    /// All clients, in construction order.
    #[must_use]
    pub fn clients(&self) -> &[ReplicaClient<T>] {
        &self.clients
    }

    /// The shared store.
    #[must_use]
    pub fn store(&self) -> &VersionStore<T> {
        &self.store
    }

    /// Number of steps applied so far.
    #[must_use]
    pub fn steps_taken(&self) -> usize {
        self.steps
    }

    /// Returns `true` if every client holds the same view.
    #[must_use]
    pub fn is_converged(&self) -> bool {
        match self.clients.split_first() {
            Some((first, rest)) => rest.iter().all(|c| c.view() == first.view()),
            None => true,
        }
    }

    /// Union of the payloads of every entry the store still holds.
    #[must_use]
    pub fn union_of_entries(&self) -> BTreeSet<T> {
        self.store
            .entries()
            .iter()
            .flat_map(|e| e.payload().iter().cloned())
            .collect()
    }
}
