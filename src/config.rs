use std::env;
use std::time::Duration;

use time::UtcOffset;

use crate::plant::{IdealRange, PlantProfile, ProfileError};

const DEFAULT_TICK_INTERVAL_SECS: u64 = 5;
const DEFAULT_PLANT_ID: &str = "p1";
const DEFAULT_PLANT_NAME: &str = "Monstera Deliciosa";
const DEFAULT_PLANT_SPECIES: &str = "Monstera";
const DEFAULT_IDEAL_TEMP: (f64, f64) = (18.0, 30.0);
const DEFAULT_IDEAL_HUMIDITY: (f64, f64) = (60.0, 80.0);
const DEFAULT_IDEAL_SOIL_MOISTURE: (f64, f64) = (40.0, 70.0);

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("invalid value '{value}' for {key}: {reason}")]
    InvalidValue {
        key: &'static str,
        value: String,
        reason: String,
    },

    #[error("invalid plant profile: {0}")]
    Profile(#[from] ProfileError),
}

#[derive(Debug, Clone)]
pub struct MonitorConfig {
    pub tick_interval: Duration,
    pub utc_offset: UtcOffset,
    pub rng_seed: Option<u64>,
    pub refresh_on_control: bool,
    pub plant: PlantProfile,
}

impl MonitorConfig {
    pub fn new() -> Result<Self, ConfigError> {
        // Load environment variables
        dotenv::dotenv().ok();

        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build the configuration from any key/value source; unset keys fall
    /// back to their defaults
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &'static str| {
            lookup(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };

        let tick_secs = match get("TICK_INTERVAL_SECS") {
            Some(v) => parse_tick_interval(&v)?,
            None => DEFAULT_TICK_INTERVAL_SECS,
        };

        let utc_offset = match get("UTC_OFFSET_HOURS") {
            Some(v) => parse_utc_offset(&v)?,
            None => UtcOffset::UTC,
        };

        let rng_seed = get("RNG_SEED")
            .map(|v| {
                v.parse::<u64>()
                    .map_err(|e| invalid("RNG_SEED", &v, e.to_string()))
            })
            .transpose()?;

        let refresh_on_control = match get("REFRESH_ON_CONTROL") {
            Some(v) => parse_bool("REFRESH_ON_CONTROL", &v)?,
            None => false,
        };

        let range = |key: &'static str,
                     field: &'static str,
                     default: (f64, f64)|
         -> Result<IdealRange, ConfigError> {
            let (low, high) = match get(key) {
                Some(v) => parse_range(key, &v)?,
                None => default,
            };
            IdealRange::new(field, low, high).map_err(ConfigError::from)
        };

        let plant = PlantProfile::new(
            get("PLANT_ID").unwrap_or_else(|| DEFAULT_PLANT_ID.to_string()),
            get("PLANT_NAME").unwrap_or_else(|| DEFAULT_PLANT_NAME.to_string()),
            get("PLANT_SPECIES").unwrap_or_else(|| DEFAULT_PLANT_SPECIES.to_string()),
            range("PLANT_IDEAL_TEMP", "temperature", DEFAULT_IDEAL_TEMP)?,
            range("PLANT_IDEAL_HUMIDITY", "humidity", DEFAULT_IDEAL_HUMIDITY)?,
            range(
                "PLANT_IDEAL_SOIL_MOISTURE",
                "soil moisture",
                DEFAULT_IDEAL_SOIL_MOISTURE,
            )?,
        )?;

        Ok(MonitorConfig {
            tick_interval: Duration::from_secs(tick_secs),
            utc_offset,
            rng_seed,
            refresh_on_control,
            plant,
        })
    }
}

fn invalid(key: &'static str, value: &str, reason: impl Into<String>) -> ConfigError {
    ConfigError::InvalidValue {
        key,
        value: value.to_string(),
        reason: reason.into(),
    }
}

fn parse_tick_interval(value: &str) -> Result<u64, ConfigError> {
    let secs = value
        .parse::<u64>()
        .map_err(|e| invalid("TICK_INTERVAL_SECS", value, e.to_string()))?;
    if secs == 0 {
        return Err(invalid("TICK_INTERVAL_SECS", value, "must be at least 1"));
    }
    Ok(secs)
}

fn parse_utc_offset(value: &str) -> Result<UtcOffset, ConfigError> {
    let hours = value
        .parse::<i8>()
        .map_err(|e| invalid("UTC_OFFSET_HOURS", value, e.to_string()))?;
    UtcOffset::from_hms(hours, 0, 0).map_err(|e| invalid("UTC_OFFSET_HOURS", value, e.to_string()))
}

fn parse_bool(key: &'static str, value: &str) -> Result<bool, ConfigError> {
    match value.to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        _ => Err(invalid(key, value, "expected true or false")),
    }
}

/// Parse a `low,high` pair
fn parse_range(key: &'static str, value: &str) -> Result<(f64, f64), ConfigError> {
    let (low, high) = value
        .split_once(',')
        .ok_or_else(|| invalid(key, value, "expected 'low,high'"))?;

    let parse = |part: &str| {
        part.trim()
            .parse::<f64>()
            .map_err(|e| invalid(key, value, e.to_string()))
    };

    Ok((parse(low)?, parse(high)?))
}
