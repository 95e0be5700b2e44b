//! Interactive front desk for the outpatient scheduler.

mod command;
mod config;
mod session;

use std::io;
use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use outpatient_core::SchedulingEngine;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::config::Overrides;
use crate::session::Session;

#[derive(Parser, Debug)]
#[command(name = "outpatient")]
#[command(about = "Outpatient appointment and triage scheduler")]
#[command(version)]
struct Args {
    /// JSON engine configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Routine queue capacity for doctors added without one
    #[arg(short, long)]
    queue_capacity: Option<usize>,

    /// Start with an empty engine instead of the demo data
    #[arg(long)]
    no_seed: bool,

    /// Log filter used when RUST_LOG is unset
    #[arg(long, default_value = "warn")]
    log_level: String,

    /// Print reports as JSON
    #[arg(long)]
    json: bool,
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    // Logs go to stderr so they never interleave with the menu.
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| args.log_level.clone()),
        ))
        .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
        .init();

    let overrides = Overrides {
        queue_capacity: args.queue_capacity,
        no_seed: args.no_seed,
    };
    let config = config::load(args.config.as_deref(), &overrides)?;
    info!(?config, "starting");

    let engine = SchedulingEngine::from_config(config).context("loading sample data")?;
    let mut session = Session::new(engine, args.json);

    let stdin = io::stdin();
    let mut stdout = io::stdout();
    session.run(stdin.lock(), &mut stdout)?;

    info!(
        served = session.engine().served_count(),
        pending = session.engine().pending_count(),
        "session ended"
    );
    Ok(())
}
