use std::fmt;
use std::str::FromStr;

use time::OffsetDateTime;
use uuid::Uuid;

/// How actuator states are derived on each tick
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ControlMode {
    /// Pump and light follow the soil-moisture and day/night rules
    #[default]
    Auto,
    /// Pump and light follow the operator's override flags
    Manual,
}

impl ControlMode {
    pub fn toggled(self) -> Self {
        match self {
            ControlMode::Auto => ControlMode::Manual,
            ControlMode::Manual => ControlMode::Auto,
        }
    }
}

impl fmt::Display for ControlMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ControlMode::Auto => write!(f, "auto"),
            ControlMode::Manual => write!(f, "manual"),
        }
    }
}

impl FromStr for ControlMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "auto" => Ok(ControlMode::Auto),
            "manual" => Ok(ControlMode::Manual),
            other => Err(format!("unknown control mode '{}'", other)),
        }
    }
}

/// Operator intent for each actuator, only consulted in manual mode
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ManualOverride {
    pub pump_requested: bool,
    pub light_requested: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Actuator {
    Pump,
    Light,
}

impl fmt::Display for Actuator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Actuator::Pump => write!(f, "pump"),
            Actuator::Light => write!(f, "light"),
        }
    }
}

impl FromStr for Actuator {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "pump" => Ok(Actuator::Pump),
            "light" => Ok(Actuator::Light),
            other => Err(format!("unknown actuator '{}'", other)),
        }
    }
}

/// Sensor values proposed by the simulator before actuation is decided
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RawSample {
    pub temperature: f64,
    pub humidity: f64,
    pub soil_moisture: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ActuatorState {
    pub pump: bool,
    pub light: bool,
}

/// One tick's sensor and actuator snapshot
#[derive(Debug, Clone, PartialEq)]
pub struct SensorReading {
    pub id: Uuid,
    pub timestamp: OffsetDateTime,
    pub temperature: f64,
    pub humidity: f64,
    pub soil_moisture: f64,
    pub pump_on: bool,
    pub light_on: bool,
    pub mode: ControlMode,
    pub plant_id: String,
}

impl SensorReading {
    pub fn actuators(&self) -> ActuatorState {
        ActuatorState {
            pump: self.pump_on,
            light: self.light_on,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mode_toggle_and_parse() {
        assert_eq!(ControlMode::default(), ControlMode::Auto);
        assert_eq!(ControlMode::Auto.toggled(), ControlMode::Manual);
        assert_eq!(ControlMode::Manual.toggled(), ControlMode::Auto);
        assert_eq!(" Manual ".parse::<ControlMode>(), Ok(ControlMode::Manual));
        assert!("semi".parse::<ControlMode>().is_err());
    }

    #[test]
    fn test_actuator_parse() {
        assert_eq!("PUMP".parse::<Actuator>(), Ok(Actuator::Pump));
        assert_eq!("light".parse::<Actuator>(), Ok(Actuator::Light));
        assert!("fan".parse::<Actuator>().is_err());
        assert_eq!(Actuator::Light.to_string(), "light");
    }

    #[test]
    fn test_override_defaults_off() {
        let overrides = ManualOverride::default();
        assert!(!overrides.pump_requested);
        assert!(!overrides.light_requested);
    }
}
