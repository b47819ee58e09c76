/// Periodic driver for the update cycle
use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;

use log::{debug, info, warn};
use rand::Rng;
use tokio::sync::Mutex;
use tokio::task::JoinHandle;
use tokio::time::{self, Duration, MissedTickBehavior};

use crate::clock::Clock;
use crate::monitor::PlantMonitor;
use crate::utils::{format_reading, on_off};

pub type SharedMonitor<C, R> = Arc<Mutex<PlantMonitor<C, R>>>;

/// Start/stop handle around a tokio task that ticks the monitor every
/// `period`. The first tick fires immediately on start.
pub struct TickScheduler {
    period: Duration,
    task: Option<JoinHandle<()>>,
}

impl TickScheduler {
    pub fn new(period: Duration) -> Self {
        TickScheduler { period, task: None }
    }

    pub fn start<C, R>(&mut self, monitor: SharedMonitor<C, R>)
    where
        C: Clock + Send + 'static,
        R: Rng + Send + 'static,
    {
        if self.is_running() {
            warn!("Tick scheduler already running, ignoring start request");
            return;
        }

        let period = self.period;
        info!("Starting tick scheduler with a {}s period", period.as_secs_f64());

        self.task = Some(tokio::spawn(async move {
            let mut interval = time::interval(period);
            // A late tick is dropped rather than replayed in a burst
            interval.set_missed_tick_behavior(MissedTickBehavior::Skip);

            loop {
                interval.tick().await;
                run_tick(&monitor).await;
            }
        }));
    }

    /// Stop ticking. Safe to call at any time, any number of times.
    pub fn stop(&mut self) {
        if let Some(task) = self.task.take() {
            task.abort();
            info!("Tick scheduler stopped");
        }
    }

    pub fn is_running(&self) -> bool {
        self.task.as_ref().is_some_and(|task| !task.is_finished())
    }
}

impl Drop for TickScheduler {
    fn drop(&mut self) {
        self.stop();
    }
}

/// Run a single tick under the monitor lock
///
/// A panic inside the tick is caught so one bad tick never ends the cycle.
pub async fn run_tick<C: Clock, R: Rng>(monitor: &Mutex<PlantMonitor<C, R>>) {
    let mut monitor = monitor.lock().await;
    let before = monitor.current_reading().map(|r| r.actuators());

    let reading = match panic::catch_unwind(AssertUnwindSafe(|| monitor.tick())) {
        Ok(reading) => reading,
        Err(_) => {
            // The panic hook has already logged the payload
            warn!("Tick abandoned, waiting for next trigger");
            return;
        }
    };

    debug!("{}", format_reading(&reading));

    let after = reading.actuators();
    if before.map(|b| b.pump) != Some(after.pump) {
        info!(
            "Pump {} ({} mode, soil moisture {:.1}%)",
            on_off(after.pump),
            reading.mode,
            reading.soil_moisture
        );
    }
    if before.map(|b| b.light) != Some(after.light) {
        info!(
            "Grow light {} ({} mode)",
            on_off(after.light),
            reading.mode
        );
    }

    let outside = monitor.plant_profile().out_of_range(&reading);
    if !outside.is_empty() {
        warn!(
            "{} outside ideal range: {}",
            monitor.plant_profile().name(),
            outside.join(", ")
        );
    }
}
