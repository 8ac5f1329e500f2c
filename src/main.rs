// Main binary for the sirocco fan control CLI
use clap::Parser;
use color_eyre::eyre::Result;
use std::io::stderr;
use tracing_subscriber::{fmt, prelude::*, registry, EnvFilter};

mod cmd;
mod config;

use sirocco_bmc::FanMode;

// Define the command-line arguments
#[derive(Parser, Debug)]
#[command(author, version, about = "Parallel fan control for BMC-managed server nodes", long_about = None)]
struct Cli {
    /// Nodes to control: a single id ("3") or an inclusive range ("2-4")
    nodes: Option<String>,

    /// Fan duty percentage (0-100)
    rate: Option<String>,

    /// Switch the fan controller mode instead of setting a duty
    #[arg(long, conflicts_with = "status")]
    mode: Option<FanMode>,

    /// Print each node's fan readings instead of setting anything
    #[arg(long)]
    status: bool,

    /// Verbose output - shows more detailed logs
    #[arg(short, long, default_value_t = false)]
    verbose: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    color_eyre::install()?;

    let cli = Cli::parse();

    // --- Centralized Logging Initialization ---
    // Respect RUST_LOG, fallback to verbose/info for our crates
    let default_level = if cli.verbose { "debug" } else { "info" };
    let default_directives = format!(
        "sirocco={level},sirocco_bmc={level},reqwest=warn,hyper=warn,rustls=warn,mio=warn",
        level = default_level
    );
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directives));
    registry()
        .with(filter)
        .with(fmt::layer().with_writer(stderr))
        .init();

    let settings = config::Settings::from_env();

    if cli.nodes.is_none() && cli.rate.is_none() && cli.mode.is_none() && !cli.status {
        println!("Usage: sirocco <node_spec> [rate]");
        println!("Examples:");
        println!("  sirocco 1-5 30  # Set 30% fan speed on nodes 1-5");
        println!("  sirocco 1 20    # Set 20% fan speed on node 1");
        println!(
            "Using default: all nodes at {}% fan speed",
            config::DEFAULT_RATE
        );
    }

    let ids = config::select_nodes(cli.nodes.as_deref());
    let targets = settings.resolve(&ids);

    if cli.status {
        cmd::status::run(&settings, targets).await;
        return Ok(());
    }

    if let Some(mode) = cli.mode {
        cmd::mode::run(&settings, targets, mode).await;
        return Ok(());
    }

    let rate = config::select_rate(cli.rate.as_deref());
    println!("Setting fan rate to {rate}% for nodes: {ids:?}");
    cmd::fans::run(&settings, targets, rate).await;

    Ok(())
}
