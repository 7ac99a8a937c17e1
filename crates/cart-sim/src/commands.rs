use std::path::Path;

use anyhow::Context;
use leaderless_register::{Simulation, StepRecord};
use serde_json::json;
use tracing::info;

use crate::config::SimulationConfig;
use crate::workload::{self, Op};

type Result = anyhow::Result<()>;

/// Flags of `cart-sim run` that override the config file.
#[derive(Debug, Default)]
pub struct RunOverrides {
    pub clients: Option<usize>,
    pub rounds: Option<usize>,
    pub seed: Option<u64>,
    pub catalog: Option<Vec<String>>,
}

/// `cart-sim run` — Random workload against a fresh store.
pub fn run(config_path: Option<&Path>, overrides: RunOverrides, json: bool) -> Result {
    let mut config = match config_path {
        Some(path) => SimulationConfig::load(path)
            .with_context(|| format!("loading {}", path.display()))?,
        None => SimulationConfig::default(),
    };
    if let Some(clients) = overrides.clients {
        config.clients = clients;
    }
    if let Some(rounds) = overrides.rounds {
        config.rounds = rounds;
    }
    if let Some(catalog) = overrides.catalog {
        config.catalog = catalog;
    }
    if overrides.seed.is_some() {
        config.seed = overrides.seed;
    }
    config.validate()?;

    info!(
        clients = config.clients,
        rounds = config.rounds,
        seed = ?config.seed,
        "starting random workload"
    );

    let names = config.client_names();
    let mut rng = workload::rng_for(config.seed);
    let ops = workload::random_workload(&mut rng, &names, &config.catalog, config.rounds);

    execute(names, ops, json)
}

/// `cart-sim replay <client:item>...` — Scripted workload.
pub fn replay(steps: &[String], json: bool) -> Result {
    let ops = workload::parse_script(steps)?;
    let names = workload::clients_in_order(&ops);
    execute(names, ops, json)
}

fn execute(names: Vec<String>, ops: Vec<Op>, json: bool) -> Result {
    let mut sim = Simulation::new(names);
    let transcript = sim.run(ops).context("running workload")?;

    if json {
        print_json(&sim, &transcript)?;
    } else {
        print_transcript(&transcript);
        print_summary(&sim);
    }
    Ok(())
}

fn print_json(sim: &Simulation<String>, transcript: &[StepRecord<String>]) -> Result {
    let clients: Vec<_> = sim
        .clients()
        .iter()
        .map(|c| {
            json!({
                "name": c.name(),
                "baseline": c.baseline(),
                "view": c.view(),
            })
        })
        .collect();

    let output = json!({
        "steps": transcript,
        "clients": clients,
        "store": {
            "version": sim.store().current_version(),
            "entries": sim.store().entries(),
        },
        "converged": sim.is_converged(),
    });
    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}

fn print_transcript(transcript: &[StepRecord<String>]) {
    if transcript.is_empty() {
        println!("  (no writes)");
        return;
    }

    println!(
        "  {:>4}  {:<12} {:<10} {:>8} {:>7} {:>8}  {}",
        "Step", "Client", "Item", "Baseline", "Version", "Siblings", "View"
    );
    println!("  {}", "-".repeat(78));

    for record in transcript {
        let baseline = record
            .request
            .baseline
            .map_or_else(|| "-".to_string(), |b| b.to_string());
        println!(
            "  {:>4}  {:<12} {:<10} {:>8} {:>7} {:>8}  {}",
            record.step,
            truncate(&record.client, 12),
            truncate(&record.item, 10),
            baseline,
            record.response.version,
            record.response.sibling_count(),
            format_list(&record.view),
        );
    }
    println!();
}

fn print_summary(sim: &Simulation<String>) {
    let store = sim.store();
    println!(
        "Store: version {}, {} retained {}",
        store.current_version(),
        store.sibling_count(),
        if store.sibling_count() == 1 { "entry" } else { "entries" }
    );
    for entry in store.entries() {
        println!("  v{:<6} {}", entry.version(), format_list(entry.payload()));
    }
    println!();

    for client in sim.clients() {
        let baseline = client
            .baseline()
            .map_or_else(|| "-".to_string(), |b| b.to_string());
        println!(
            "  {:<12} baseline {:>6}  {}",
            truncate(client.name(), 12),
            baseline,
            format_list(client.iter())
        );
    }
    println!();

    if sim.is_converged() {
        println!("Converged: yes");
    } else {
        println!(
            "Converged: no (union of retained entries: {})",
            format_list(&sim.union_of_entries())
        );
    }
}

fn format_list<'a, I>(items: I) -> String
where
    I: IntoIterator<Item = &'a String>,
{
    let joined: Vec<&str> = items.into_iter().map(String::as_str).collect();
    format!("[{}]", joined.join(", "))
}

fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        s.to_string()
    } else {
        let kept: String = s.chars().take(max.saturating_sub(3)).collect();
        format!("{kept}...")
    }
}
