/// Update cycle: state container and per-tick orchestration
use rand::Rng;

use crate::clock::Clock;
use crate::control::{apply_toggle, decide_actuation};
use crate::history::ReadingHistory;
use crate::models::{Actuator, ControlMode, ManualOverride, SensorReading};
use crate::plant::PlantProfile;
use crate::simulation::next_reading;

/// Mutable state carried between ticks
#[derive(Debug, Clone, Default)]
pub struct MonitorState {
    pub mode: ControlMode,
    pub overrides: ManualOverride,
    pub history: ReadingHistory,
}

/// Owns the plant profile, the monitor state and the injected clock and
/// random source. Every consumer-facing operation goes through here.
pub struct PlantMonitor<C, R> {
    profile: PlantProfile,
    state: MonitorState,
    clock: C,
    rng: R,
}

impl<C: Clock, R: Rng> PlantMonitor<C, R> {
    pub fn new(profile: PlantProfile, clock: C, rng: R) -> Self {
        PlantMonitor {
            profile,
            state: MonitorState::default(),
            clock,
            rng,
        }
    }

    /// Run one update cycle and return a copy of the reading it produced
    ///
    /// Mode and override changes made before this call are observed here.
    pub fn tick(&mut self) -> SensorReading {
        let previous = self.state.history.latest();
        let sample = next_reading(previous, &self.profile, &mut self.rng);

        let now = self.clock.now();
        // Keep history ordered even if the clock steps back
        let timestamp = match previous {
            Some(prev) if now < prev.timestamp => prev.timestamp,
            _ => now,
        };

        let actuators = decide_actuation(
            &sample,
            self.state.mode,
            self.state.overrides,
            &self.profile,
            now,
        );

        let reading = SensorReading {
            id: uuid::Builder::from_random_bytes(self.rng.random()).into_uuid(),
            timestamp,
            temperature: sample.temperature,
            humidity: sample.humidity,
            soil_moisture: sample.soil_moisture,
            pump_on: actuators.pump,
            light_on: actuators.light,
            mode: self.state.mode,
            plant_id: self.profile.id().to_string(),
        };

        self.state.history.push(reading.clone());
        reading
    }

    pub fn current_reading(&self) -> Option<&SensorReading> {
        self.state.history.latest()
    }

    pub fn history(&self) -> &ReadingHistory {
        &self.state.history
    }

    pub fn mode(&self) -> ControlMode {
        self.state.mode
    }

    /// Switch control mode; override flags are kept as they are
    pub fn set_mode(&mut self, mode: ControlMode) {
        self.state.mode = mode;
    }

    /// Flip the manual override for `actuator`; ignored in auto mode
    pub fn request_toggle(&mut self, actuator: Actuator) -> bool {
        apply_toggle(self.state.mode, &mut self.state.overrides, actuator)
    }

    pub fn overrides(&self) -> ManualOverride {
        self.state.overrides
    }

    pub fn plant_profile(&self) -> &PlantProfile {
        &self.profile
    }
}
