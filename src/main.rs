//! MargaNav - Indoor guidance daemon over external positioning
//!
//! Runs the guidance pipeline at a fixed tick rate: a positioning
//! bridge feeds planar fixes through the source, the filter tracks
//! the agent across a walkable surface, and the planner maintains a
//! path to the configured target, mirrored into a logging sink.

mod agent;
mod anchors;
mod bridges;
mod config;
mod core;
mod error;
mod frame;
mod planner;
mod readiness;
mod source;
mod surfaces;
mod tracking;
mod visualizer;

use std::env;
use std::path::Path;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

use crate::agent::GuidanceAgent;
use crate::bridges::create_bridge;
use crate::config::MargaConfig;
use crate::error::Result;
use crate::readiness::ReadinessState;
use crate::surfaces::create_surface;
use crate::visualizer::{LogSink, PathConsumer};

/// Parse config path from command line arguments.
///
/// Supports:
/// - `marga-nav <path>` (positional)
/// - `marga-nav --config <path>` (flag-based)
/// - `marga-nav -c <path>` (short flag)
///
/// Defaults to `marga.toml` if not specified.
fn parse_config_path() -> String {
    let args: Vec<String> = env::args().collect();

    // Look for --config or -c flag
    for i in 1..args.len() {
        if (args[i] == "--config" || args[i] == "-c") && i + 1 < args.len() {
            return args[i + 1].clone();
        }
    }

    // Fall back to first positional argument (if it doesn't start with -)
    if args.len() > 1 && !args[1].starts_with('-') {
        return args[1].clone();
    }

    // Default path
    "marga.toml".to_string()
}

fn main() -> Result<()> {
    // Initialize logger
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    log::info!("MargaNav v0.1.0 starting...");

    let config_path = parse_config_path();
    log::info!("Using config: {}", config_path);
    let config = MargaConfig::load(Path::new(&config_path))?;

    log::info!(
        "Source driver: {}, surface: {}",
        config.source.driver,
        config.surface.kind
    );

    let bridge = create_bridge(&config)?;
    let surface = create_surface(&config)?;

    // A missing anchor map leaves the source uninitialized; the
    // readiness gate reports the consequence.
    let anchor_json =
        match anchors::load_anchor_json(&config.source.anchor_dir, &config.source.anchor_map) {
            Ok(json) => Some(json),
            Err(err) => {
                log::warn!("Anchor map unavailable: {}", err);
                None
            }
        };

    let mut agent = GuidanceAgent::new(&config, bridge, surface, anchor_json);
    let mut consumer = PathConsumer::new(&config.visualizer);
    let mut sink = LogSink;

    // Set up shutdown signal handler
    let running = Arc::new(AtomicBool::new(true));
    let r = Arc::clone(&running);
    ctrlc::set_handler(move || {
        log::info!("Received shutdown signal");
        r.store(false, Ordering::Relaxed);
    })
    .map_err(|e| error::Error::Other(format!("Error setting Ctrl-C handler: {}", e)))?;

    let tick_hz = config.agent.tick_hz.max(1.0);
    let tick_period = Duration::from_secs_f32(1.0 / tick_hz);
    log::info!("MargaNav running at {:.0} Hz. Press Ctrl-C to stop.", tick_hz);

    let started = Instant::now();
    let mut last_us: u64 = 0;
    while running.load(Ordering::Relaxed) {
        let timestamp_us = started.elapsed().as_micros() as u64;
        let dt = timestamp_us.saturating_sub(last_us) as f32 / 1_000_000.0;
        last_us = timestamp_us;

        agent.tick(timestamp_us, dt);
        consumer.update(timestamp_us, agent.path(), agent.position().y, &mut sink);

        if let ReadinessState::Failed(reason) = agent.state() {
            log::error!("Guidance unavailable: {}", reason.description());
            break;
        }

        thread::sleep(tick_period);
    }

    // Shutdown
    log::info!(
        "Source: {} samples produced, {} payloads discarded",
        agent.source().samples_produced(),
        agent.source().payloads_discarded()
    );
    log::info!(
        "Tracking: {} accepted, {} rejected; {} path recomputations",
        agent.tracking().accepted_count(),
        agent.tracking().rejected_count(),
        agent.planner().recompute_count()
    );
    log::info!("MargaNav stopped");
    Ok(())
}
