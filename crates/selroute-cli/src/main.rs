//! `selroute` - inspection CLI for the SelRoute selectivity router.

use std::path::PathBuf;

use anyhow::Context;
use clap::{Parser, Subcommand};
use selroute_core::{Capability, RouterConfig};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod commands;
mod input;

/// SelRoute - pick Backend A or Backend B from query and world volumes
#[derive(Parser, Debug)]
#[command(name = "selroute")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// TOML configuration file (missing file means defaults)
    #[arg(short, long, global = true, env = "SELROUTE_CONFIG")]
    config: Option<PathBuf>,

    /// Selectivity threshold, overrides the configuration (clamped into (0, 1])
    #[arg(short, long, global = true, allow_negative_numbers = true)]
    threshold: Option<f32>,

    /// Treat Backend A as unavailable
    #[arg(long, global = true)]
    disable_backend_a: bool,

    /// Skip detection and use this capability (scalar, vector8, vector4)
    #[arg(short, long, global = true)]
    force: Option<Capability>,

    /// Print JSON instead of plain text
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Show the host capability and the kernel a router would use
    Detect,

    /// Route a single (query, world) volume pair
    Route {
        /// Expected result volume of the query
        #[arg(allow_negative_numbers = true)]
        query: f32,

        /// Total searchable volume
        #[arg(allow_negative_numbers = true)]
        world: f32,
    },

    /// Route every `query,world` line of a file as one batch ("-" reads stdin)
    Batch {
        /// Input file
        file: PathBuf,
    },

    /// Print the effective configuration as TOML
    Config,
}

impl Cli {
    fn router_config(&self) -> anyhow::Result<RouterConfig> {
        let mut config = RouterConfig::load(self.config.as_deref()).with_context(|| {
            match &self.config {
                Some(path) => format!("Failed to load configuration from {}", path.display()),
                None => "Failed to load configuration".to_string(),
            }
        })?;

        if let Some(threshold) = self.threshold {
            config = config.with_threshold(threshold);
        }
        if self.disable_backend_a {
            config = config.with_backend_a_available(false);
        }
        if self.force.is_some() {
            config = config.with_forced_capability(self.force);
        }
        Ok(config)
    }
}

fn main() -> anyhow::Result<()> {
    // Logs go to stderr so stdout stays machine-readable.
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "warn".into()),
        ))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();
    let config = cli.router_config()?;
    tracing::debug!(?config, "Effective configuration");

    let stdout = std::io::stdout();
    let mut out = stdout.lock();

    match &cli.command {
        Command::Detect => commands::detect(&mut out, config, cli.json),
        Command::Route { query, world } => {
            commands::route(&mut out, config, *query, *world, cli.json)
        }
        Command::Batch { file } => {
            let text = input::read_source(file)?;
            let pairs = input::parse_pairs(&text)
                .with_context(|| format!("Invalid batch input in {}", file.display()))?;
            commands::batch(&mut out, config, &pairs, cli.json)
        }
        Command::Config => commands::show_config(&mut out, config, cli.json),
    }
}
