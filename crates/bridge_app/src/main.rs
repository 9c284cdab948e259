//! # bridge_app: Host
//!
//! Runs one host with a process-wide component registry, loads the requested
//! demo guests and drives the tick loop.
//!
//! ## Startup Sequence
//!
//! 1. Create the component registry.
//! 2. Load each `--guest` in order; a guest whose setup fails is skipped.
//! 3. Enter the fixed-timestep tick loop until `--max-ticks` or Ctrl-C.

use std::sync::Arc;

use anyhow::{Result, bail};
use bridge_component::Guest;
use bridge_host::{ComponentRegistry, Host, HostConfig};
use clap::Parser;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "bridge_app", about = "Host for guest-defined ECS systems")]
struct Args {
    /// Target ticks per second
    #[arg(long, default_value_t = 60.0)]
    tick_rate: f64,

    /// Stop after this many ticks (0 = run until interrupted)
    #[arg(long, default_value_t = 0)]
    max_ticks: u64,

    /// Accept component and system registration after setup
    #[arg(long)]
    allow_late_registration: bool,

    /// Guest to load: simple, motion or boa (repeatable)
    #[arg(short, long = "guest", default_values_t = ["simple".to_string()])]
    guests: Vec<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "bridge_app=info,bridge_host=info".into()),
        )
        .init();

    let args = Args::parse();
    info!(guests = ?args.guests, "host starting");

    let config = HostConfig::new()
        .with_tick_rate(args.tick_rate)
        .with_max_ticks(args.max_ticks)
        .with_late_registration(args.allow_late_registration);

    let registry = Arc::new(ComponentRegistry::new());
    let mut host = Host::new(Arc::clone(&registry), config);

    let mut loaded = 0usize;
    for name in &args.guests {
        let Some(guest) = demo_guests::by_name(name) else {
            bail!("unknown guest `{name}` (expected simple, motion or boa)");
        };
        let guest: Box<dyn Guest> = Box::new(guest);
        match host.load(guest) {
            Ok(id) => {
                loaded += 1;
                info!(guest = name.as_str(), %id, "guest ready");
            }
            Err(e) => error!(guest = name.as_str(), error = %e, "skipping guest"),
        }
    }
    if loaded == 0 {
        bail!("no guest loaded");
    }
    info!(
        components = registry.len(),
        systems = host.systems().len(),
        entities = host.world().entity_count(),
        "setup complete"
    );

    tokio::select! {
        () = host.run_async() => {}
        _ = tokio::signal::ctrl_c() => info!("interrupted"),
    }

    info!(ticks = host.tick_id(), "host shut down");
    Ok(())
}
