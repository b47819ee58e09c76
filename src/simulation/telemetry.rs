/// Simulated sensor telemetry for the plant node
use rand::Rng;

use crate::models::{RawSample, SensorReading};
use crate::plant::PlantProfile;

// Ambient bands, independent of the plant profile
const TEMPERATURE_MIN: f64 = 24.0; // °C
const TEMPERATURE_MAX: f64 = 29.0; // °C, exclusive
const HUMIDITY_MIN: f64 = 65.0; // %
const HUMIDITY_MAX: f64 = 75.0; // %, exclusive

// Soil moisture dynamics
const SOIL_MOISTURE_SEED: f64 = 45.0; // % on the very first tick
const PUMP_FILL_RATE: f64 = 5.0; // % gained per tick while the pump ran
const EVAPORATION_RATE: f64 = 0.5; // % lost per tick while it did not
const SOIL_MOISTURE_MAX: f64 = 100.0;
const SOIL_MOISTURE_MIN: f64 = 0.0;

/// Propose the raw sensor values for the next tick
///
/// Temperature and humidity are ambient noise drawn uniformly from fixed
/// bands. Soil moisture carries state over from `previous`: it rises by
/// the fill rate if the pump was running during the previous reading and
/// evaporates otherwise, clamped to [0, 100]. Without a previous reading it
/// starts at the seed value.
///
/// # Arguments
/// * `previous` - The current reading, or None on the first tick
/// * `_plant` - Profile of the monitored plant (the bands do not depend on it)
/// * `rng` - Random source; temperature is drawn before humidity
///
/// # Returns
/// The proposed sample
pub fn next_reading<R: Rng>(
    previous: Option<&SensorReading>,
    _plant: &PlantProfile,
    rng: &mut R,
) -> RawSample {
    let temperature = rng.random_range(TEMPERATURE_MIN..TEMPERATURE_MAX);
    let humidity = rng.random_range(HUMIDITY_MIN..HUMIDITY_MAX);

    RawSample {
        temperature,
        humidity,
        soil_moisture: next_soil_moisture(previous),
    }
}

fn next_soil_moisture(previous: Option<&SensorReading>) -> f64 {
    match previous {
        Some(prev) if prev.pump_on => (prev.soil_moisture + PUMP_FILL_RATE).min(SOIL_MOISTURE_MAX),
        Some(prev) => (prev.soil_moisture - EVAPORATION_RATE).max(SOIL_MOISTURE_MIN),
        None => SOIL_MOISTURE_SEED,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ControlMode;
    use crate::plant::IdealRange;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use time::macros::datetime;
    use uuid::Uuid;

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

    fn previous(soil_moisture: f64, pump_on: bool) -> SensorReading {
        SensorReading {
            id: Uuid::nil(),
            timestamp: datetime!(2025-06-01 12:00 UTC),
            temperature: 25.0,
            humidity: 70.0,
            soil_moisture,
            pump_on,
            light_on: false,
            mode: ControlMode::Auto,
            plant_id: "p1".to_string(),
        }
    }

    #[test]
    fn test_first_tick_seeds_moisture() {
        let plant = profile();
        for seed in 0..20 {
            let mut rng = StdRng::seed_from_u64(seed);
            let sample = next_reading(None, &plant, &mut rng);
            assert_eq!(sample.soil_moisture, 45.0);
        }
    }

    #[test]
    fn test_pump_fills_with_cap() {
        let plant = profile();
        let mut rng = StdRng::seed_from_u64(7);

        for m in [0.0, 30.0, 42.5, 94.9, 95.0, 97.0, 100.0] {
            let sample = next_reading(Some(&previous(m, true)), &plant, &mut rng);
            assert_eq!(sample.soil_moisture, (m + 5.0).min(100.0), "from {}", m);
        }
    }

    #[test]
    fn test_evaporation_with_floor() {
        let plant = profile();
        let mut rng = StdRng::seed_from_u64(7);

        for m in [100.0, 45.0, 40.0, 0.5, 0.3, 0.0] {
            let sample = next_reading(Some(&previous(m, false)), &plant, &mut rng);
            assert_eq!(sample.soil_moisture, (m - 0.5).max(0.0), "from {}", m);
        }
    }

    #[test]
    fn test_ambient_values_stay_in_bands() {
        let plant = profile();
        let mut rng = StdRng::seed_from_u64(42);
        let prev = previous(50.0, false);

        for _ in 0..1000 {
            let sample = next_reading(Some(&prev), &plant, &mut rng);
            assert!((24.0..29.0).contains(&sample.temperature));
            assert!((65.0..75.0).contains(&sample.humidity));
        }
    }

    #[test]
    fn test_same_seed_same_sample() {
        let plant = profile();
        let a = next_reading(None, &plant, &mut StdRng::seed_from_u64(3));
        let b = next_reading(None, &plant, &mut StdRng::seed_from_u64(3));
        assert_eq!(a, b);
    }
}
