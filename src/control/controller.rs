/// Pump and grow-light decisions for each tick
use time::OffsetDateTime;

use crate::models::{Actuator, ActuatorState, ControlMode, ManualOverride, RawSample};
use crate::plant::PlantProfile;

// Night window: light on strictly after this hour or strictly before the
// morning hour, so 18:xx and 06:xx still count as daylight.
const NIGHT_AFTER_HOUR: u8 = 18;
const NIGHT_BEFORE_HOUR: u8 = 6;

/// Decide the actuator states for a new sample
///
/// In auto mode the pump runs while soil moisture is strictly below the
/// profile's ideal low bound and the light runs at night. In manual mode
/// both follow the operator's override flags and the sample is ignored.
///
/// # Arguments
/// * `sample` - Values proposed by the simulator for this tick
/// * `mode` - Control mode in effect for this tick
/// * `overrides` - Operator intent, only read in manual mode
/// * `profile` - Plant profile supplying the soil-moisture threshold
/// * `now` - Wall-clock time; its hour is read in its own offset
pub fn decide_actuation(
    sample: &RawSample,
    mode: ControlMode,
    overrides: ManualOverride,
    profile: &PlantProfile,
    now: OffsetDateTime,
) -> ActuatorState {
    match mode {
        ControlMode::Auto => ActuatorState {
            pump: sample.soil_moisture < profile.ideal_soil_moisture().low,
            light: is_night(now.hour()),
        },
        ControlMode::Manual => ActuatorState {
            pump: overrides.pump_requested,
            light: overrides.light_requested,
        },
    }
}

fn is_night(hour: u8) -> bool {
    hour > NIGHT_AFTER_HOUR || hour < NIGHT_BEFORE_HOUR
}

/// Flip the override flag for `actuator` if manual mode is active
///
/// Returns whether the flag changed. In auto mode this is a no-op, and the
/// flags are otherwise never reset, so switching back to manual restores
/// the operator's last intent.
pub fn apply_toggle(mode: ControlMode, overrides: &mut ManualOverride, actuator: Actuator) -> bool {
    if mode != ControlMode::Manual {
        return false;
    }

    match actuator {
        Actuator::Pump => overrides.pump_requested = !overrides.pump_requested,
        Actuator::Light => overrides.light_requested = !overrides.light_requested,
    }
    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::plant::IdealRange;
    use time::macros::{datetime, offset};

    fn profile() -> PlantProfile {
        PlantProfile::new(
            "p1",
            "Monstera Deliciosa",
            "Monstera",
            IdealRange::new("temperature", 18.0, 30.0).unwrap(),
            IdealRange::new("humidity", 60.0, 80.0).unwrap(),
            IdealRange::new("soil moisture", 40.0, 70.0).unwrap(),
        )
        .unwrap()
    }

    fn sample(soil_moisture: f64) -> RawSample {
        RawSample {
            temperature: 25.0,
            humidity: 70.0,
            soil_moisture,
        }
    }

    fn at_hour(hour: u8) -> OffsetDateTime {
        datetime!(2025-06-01 00:00 UTC).replace_hour(hour).unwrap()
    }

    fn auto(soil_moisture: f64, now: OffsetDateTime) -> ActuatorState {
        decide_actuation(
            &sample(soil_moisture),
            ControlMode::Auto,
            ManualOverride::default(),
            &profile(),
            now,
        )
    }

    #[test]
    fn test_auto_pump_threshold_is_strict() {
        let noon = at_hour(12);
        assert!(!auto(40.0, noon).pump);
        assert!(auto(40.0 - 1e-9, noon).pump);
        assert!(auto(39.5, noon).pump);
        assert!(!auto(45.0, noon).pump);
    }

    #[test]
    fn test_auto_light_window_boundaries() {
        assert!(!auto(50.0, at_hour(18)).light);
        assert!(auto(50.0, at_hour(19)).light);
        assert!(!auto(50.0, at_hour(6)).light);
        assert!(auto(50.0, at_hour(5)).light);
        assert!(auto(50.0, at_hour(0)).light);
        assert!(auto(50.0, at_hour(23)).light);
        assert!(!auto(50.0, at_hour(12)).light);
    }

    #[test]
    fn test_light_uses_clock_offset() {
        // 17:00 UTC is 20:00 at +03:00
        let now = datetime!(2025-06-01 17:00 UTC).to_offset(offset!(+3));
        assert!(auto(50.0, now).light);
    }

    #[test]
    fn test_manual_ignores_sample() {
        let overrides = ManualOverride {
            pump_requested: true,
            light_requested: false,
        };
        let state = decide_actuation(
            &sample(95.0),
            ControlMode::Manual,
            overrides,
            &profile(),
            at_hour(23),
        );
        assert_eq!(
            state,
            ActuatorState {
                pump: true,
                light: false
            }
        );

        let state = decide_actuation(
            &sample(5.0),
            ControlMode::Manual,
            ManualOverride::default(),
            &profile(),
            at_hour(12),
        );
        assert!(!state.pump);
    }

    #[test]
    fn test_toggle_ignored_in_auto() {
        let mut overrides = ManualOverride::default();
        assert!(!apply_toggle(ControlMode::Auto, &mut overrides, Actuator::Pump));
        assert!(!apply_toggle(ControlMode::Auto, &mut overrides, Actuator::Light));
        assert_eq!(overrides, ManualOverride::default());
    }

    #[test]
    fn test_toggle_flips_in_manual() {
        let mut overrides = ManualOverride::default();
        assert!(apply_toggle(ControlMode::Manual, &mut overrides, Actuator::Light));
        assert!(overrides.light_requested);
        assert!(!overrides.pump_requested);

        assert!(apply_toggle(ControlMode::Manual, &mut overrides, Actuator::Light));
        assert!(!overrides.light_requested);
    }
}
