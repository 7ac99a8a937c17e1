use std::path::PathBuf;
use std::process;

use clap::{Parser, Subcommand};

mod commands;
mod config;
mod workload;

/// cart-sim: Drive shared shopping carts through a leaderless register.
///
/// Several clients add items to one cart through a single versioned store.
/// Concurrent writes are kept as siblings and merged by set union.
#[derive(Parser)]
#[command(name = "cart-sim", version, about, long_about = None)]
struct Cli {
    /// Increase log verbosity (-v debug, -vv trace). `RUST_LOG` takes precedence.
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run a random workload: random client, random product, N times.
    Run {
        /// TOML file with clients, rounds, catalog and seed.
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Number of clients.
        #[arg(long)]
        clients: Option<usize>,

        /// Number of writes.
        #[arg(short, long)]
        rounds: Option<usize>,

        /// Seed for a reproducible run.
        #[arg(short, long)]
        seed: Option<u64>,

        /// Comma-separated product catalog.
        #[arg(long, value_delimiter = ',')]
        catalog: Option<Vec<String>>,

        /// Print the transcript as JSON.
        #[arg(long)]
        json: bool,
    },

    /// Replay an explicit script of writes, e.g. `a:milk b:eggs a:flour`.
    Replay {
        /// Steps of the form <client>:<item>, applied in order.
        #[arg(required = true)]
        steps: Vec<String>,

        /// Print the transcript as JSON.
        #[arg(long)]
        json: bool,
    },
}

fn init_logging(verbose: u8) {
    let default = match verbose {
        0 => "info",
        1 => "debug",
        _ => "trace",
    };

    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default.into()),
        )
        .init();
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let result = match cli.command {
        Commands::Run {
            config,
            clients,
            rounds,
            seed,
            catalog,
            json,
        } => commands::run(
            config.as_deref(),
            commands::RunOverrides {
                clients,
                rounds,
                seed,
                catalog,
            },
            json,
        ),
        Commands::Replay { steps, json } => commands::replay(&steps, json),
    };

    if let Err(e) = result {
        eprintln!("error: {e:#}");
        process::exit(1);
    }
}
