/// Operator console: line commands on stdin that switch modes, toggle
/// actuators and print the monitor's read-only views
use std::fmt::Write as _;
use std::io::{self, BufRead};
use std::str::FromStr;
use std::thread;

use log::{debug, error, info};
use rand::Rng;
use tokio::sync::{mpsc, Mutex};

use crate::clock::Clock;
use crate::models::{Actuator, ControlMode};
use crate::monitor::PlantMonitor;
use crate::scheduler::{run_tick, SharedMonitor};
use crate::utils::{format_overrides, format_profile, format_reading};

const DEFAULT_HISTORY_ROWS: usize = 10;
const INPUT_QUEUE_DEPTH: usize = 16;

const HELP: &str = "Commands:
  auto | manual     switch control mode
  mode              toggle control mode
  pump | light      toggle a manual override (manual mode only)
  status            show current reading, mode and overrides
  history [n]       show the newest n readings (default 10)
  profile           show the plant profile
  help              show this text";

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum CommandError {
    #[error("unknown command '{0}', type 'help' for a list")]
    Unknown(String),

    #[error("invalid argument '{argument}' for {command}")]
    InvalidArgument {
        command: &'static str,
        argument: String,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    SetMode(ControlMode),
    ToggleMode,
    Toggle(Actuator),
    Status,
    History(usize),
    Profile,
    Help,
}

impl FromStr for Command {
    type Err = CommandError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut words = s.split_whitespace();
        let name = words.next().unwrap_or_default().to_ascii_lowercase();
        let argument = words.next();

        let command = match name.as_str() {
            "mode" => Command::ToggleMode,
            "status" => Command::Status,
            "history" => {
                let rows = match argument {
                    Some(arg) => arg
                        .parse::<usize>()
                        .ok()
                        .filter(|n| *n > 0)
                        .ok_or_else(|| CommandError::InvalidArgument {
                            command: "history",
                            argument: arg.to_string(),
                        })?,
                    None => DEFAULT_HISTORY_ROWS,
                };
                Command::History(rows)
            }
            "profile" => Command::Profile,
            "help" | "?" => Command::Help,
            other => {
                if let Ok(mode) = other.parse::<ControlMode>() {
                    Command::SetMode(mode)
                } else if let Ok(actuator) = other.parse::<Actuator>() {
                    Command::Toggle(actuator)
                } else {
                    return Err(CommandError::Unknown(s.trim().to_string()));
                }
            }
        };

        Ok(command)
    }
}

/// Apply `command` to the monitor and return the text to show the operator
///
/// With `refresh_on_control`, a mode or override change is followed by an
/// immediate extra tick instead of waiting for the scheduler.
pub async fn execute<C: Clock, R: Rng>(
    command: Command,
    monitor: &Mutex<PlantMonitor<C, R>>,
    refresh_on_control: bool,
) -> String {
    let (changed, reply) = {
        let mut monitor = monitor.lock().await;
        match command {
            Command::SetMode(mode) => {
                let changed = monitor.mode() != mode;
                monitor.set_mode(mode);
                (changed, format!("Mode: {}", mode))
            }
            Command::ToggleMode => {
                let mode = monitor.mode().toggled();
                monitor.set_mode(mode);
                (true, format!("Mode: {}", mode))
            }
            Command::Toggle(actuator) => {
                if monitor.request_toggle(actuator) {
                    let overrides = monitor.overrides();
                    (true, format!("Manual override: {}", format_overrides(&overrides)))
                } else {
                    (
                        false,
                        format!("Ignored: switch to manual mode before toggling the {}", actuator),
                    )
                }
            }
            Command::Status => (false, status(&*monitor)),
            Command::History(rows) => (false, history(&*monitor, rows)),
            Command::Profile => (false, format_profile(monitor.plant_profile())),
            Command::Help => (false, HELP.to_string()),
        }
    };

    if changed {
        info!("Operator command applied: {:?}", command);
        if refresh_on_control {
            run_tick(monitor).await;
        }
    }

    reply
}

fn status<C: Clock, R: Rng>(monitor: &PlantMonitor<C, R>) -> String {
    let current = match monitor.current_reading() {
        Some(reading) => format_reading(reading),
        None => "no reading yet".to_string(),
    };
    format!(
        "Current: {}\nMode: {}\nManual override: {}",
        current,
        monitor.mode(),
        format_overrides(&monitor.overrides())
    )
}

fn history<C: Clock, R: Rng>(monitor: &PlantMonitor<C, R>, rows: usize) -> String {
    let history = monitor.history();
    if history.is_empty() {
        return "History is empty".to_string();
    }

    let mut out = format!(
        "Newest {} of {} readings:",
        rows.min(history.len()),
        history.len()
    );
    for reading in history.recent(rows) {
        let _ = write!(out, "\n  {}", format_reading(reading));
    }
    out
}

/// Forward stdin lines over a channel from a dedicated thread
///
/// The thread is detached, so a read blocked on an idle terminal never
/// holds up runtime shutdown. The channel closes when stdin reaches EOF.
pub fn spawn_stdin_reader() -> io::Result<mpsc::Receiver<String>> {
    let (tx, rx) = mpsc::channel(INPUT_QUEUE_DEPTH);

    thread::Builder::new()
        .name("console-stdin".into())
        .spawn(move || {
            for line in io::stdin().lock().lines() {
                match line {
                    Ok(line) => {
                        if tx.blocking_send(line).is_err() {
                            break;
                        }
                    }
                    Err(e) => {
                        error!("Failed to read console input: {}", e);
                        break;
                    }
                }
            }
        })?;

    Ok(rx)
}

/// Execute operator commands from `input` until the channel closes
pub async fn run_console<C, R>(
    monitor: SharedMonitor<C, R>,
    mut input: mpsc::Receiver<String>,
    refresh_on_control: bool,
) where
    C: Clock,
    R: Rng,
{
    println!("{}", HELP);

    while let Some(line) = input.recv().await {
        if line.trim().is_empty() {
            continue;
        }
        debug!("Console input: '{}'", line.trim());

        match line.parse::<Command>() {
            Ok(command) => println!("{}", execute(command, &monitor, refresh_on_control).await),
            Err(e) => println!("{}", e),
        }
    }

    info!("Console input closed");
}
