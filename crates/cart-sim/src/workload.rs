//! Workload generation: random picks for `run`, parsed scripts for `replay`.

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};

use crate::config::ConfigError;

/// A single scripted write: `(client, item)`.
pub type Op = (String, String);

/// Seeded generator when a seed is given, OS entropy otherwise.
pub fn rng_for(seed: Option<u64>) -> StdRng {
    match seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    }
}

/// Pick a random client and a random item `rounds` times.
///
/// Returns an empty workload if either list is empty.
pub fn random_workload<R: Rng + ?Sized>(
    rng: &mut R,
    clients: &[String],
    catalog: &[String],
    rounds: usize,
) -> Vec<Op> {
    let mut ops = Vec::with_capacity(rounds);
    for _ in 0..rounds {
        let (Some(client), Some(item)) = (clients.choose(rng), catalog.choose(rng)) else {
            break;
        };
        ops.push((client.clone(), item.clone()));
    }
    ops
}

/// Parse `client:item` arguments.
///
/// The item is everything after the first colon, so items may contain colons.
pub fn parse_script<S: AsRef<str>>(steps: &[S]) -> Result<Vec<Op>, ConfigError> {
    steps
        .iter()
        .map(|raw| {
            let raw = raw.as_ref();
            match raw.split_once(':') {
                Some((client, item)) if !client.is_empty() && !item.is_empty() => {
                    Ok((client.to_string(), item.to_string()))
                }
                _ => Err(ConfigError::InvalidStep(raw.to_string())),
            }
        })
        .collect()
}

/// Client names in the order they first appear in a script.
pub fn clients_in_order(ops: &[Op]) -> Vec<String> {
    let mut names: Vec<String> = Vec::new();
    for (client, _) in ops {
        if !names.contains(client) {
            names.push(client.clone());
        }
    }
    names
}
