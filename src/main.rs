mod clock;
mod config;
mod console;
mod control;
mod history;
mod models;
mod monitor;
mod plant;
mod scheduler;
mod simulation;
mod utils;

use std::sync::Arc;

use log::{error, info};
use rand::rngs::StdRng;
use rand::SeedableRng;
use tokio::sync::Mutex;

use clock::SystemClock;
use config::MonitorConfig;
use console::{run_console, spawn_stdin_reader};
use monitor::PlantMonitor;
use scheduler::TickScheduler;
use utils::{format_profile, format_reading};

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize logging
    env_logger::Builder::from_default_env()
        .filter_level(log::LevelFilter::Info)
        .format_timestamp_secs()
        .init();

    // Report panics through the logger instead of bare stderr
    std::panic::set_hook(Box::new(|info| error!("{}", info)));

    // Load configuration
    let config = match MonitorConfig::new() {
        Ok(config) => config,
        Err(e) => {
            error!("Failed to load configuration: {}", e);
            return Err(e.into());
        }
    };

    info!("Starting plant monitor");
    info!("Monitoring {}", format_profile(&config.plant));

    let rng = match config.rng_seed {
        Some(seed) => {
            info!("Using fixed random seed {}", seed);
            StdRng::seed_from_u64(seed)
        }
        None => StdRng::from_os_rng(),
    };

    let monitor = Arc::new(Mutex::new(PlantMonitor::new(
        config.plant.clone(),
        SystemClock::new(config.utc_offset),
        rng,
    )));

    let mut scheduler = TickScheduler::new(config.tick_interval);
    scheduler.start(monitor.clone());

    // Handle Ctrl+C gracefully
    let (tx, mut rx) = tokio::sync::oneshot::channel();
    tokio::spawn(async move {
        match tokio::signal::ctrl_c().await {
            Ok(()) => {
                let _ = tx.send(());
            }
            Err(e) => {
                error!("Failed to listen for Ctrl+C: {}", e);
                // Keep the sender alive so shutdown is not triggered
                std::future::pending::<()>().await;
            }
        }
    });

    // Run the operator console alongside the scheduler until a shutdown signal arrives
    let input = spawn_stdin_reader()?;
    let console_closed = tokio::select! {
        _ = run_console(monitor.clone(), input, config.refresh_on_control) => true,
        _ = &mut rx => false,
    };
    if console_closed {
        info!("Console closed, monitoring continues until Ctrl+C");
        let _ = rx.await;
    }
    info!("Program terminated by user. Exiting gracefully.");

    scheduler.stop();

    // Print summary
    let monitor = monitor.lock().await;
    let history = monitor.history();
    info!("Summary for {}:", monitor.plant_profile().name());
    info!("  Retained readings: {}", history.len());
    info!(
        "  Pump on in {} of them, light on in {}",
        history.iter().filter(|r| r.pump_on).count(),
        history.iter().filter(|r| r.light_on).count()
    );
    if let Some(reading) = monitor.current_reading() {
        info!("  Last reading: {}", format_reading(reading));
    }

    Ok(())
}
