/// Plant profile: identity and ideal growing ranges
use std::fmt;

use crate::models::SensorReading;

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ProfileError {
    #[error("{field} range is inverted: low {low} > high {high}")]
    InvalidRange {
        field: &'static str,
        low: f64,
        high: f64,
    },

    #[error("{field} range has a non-finite bound")]
    NonFiniteBound { field: &'static str },

    #[error("plant {0} must not be blank")]
    MissingField(&'static str),
}

/// Inclusive `[low, high]` range
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct IdealRange {
    pub low: f64,
    pub high: f64,
}

impl IdealRange {
    pub fn new(field: &'static str, low: f64, high: f64) -> Result<Self, ProfileError> {
        if !low.is_finite() || !high.is_finite() {
            return Err(ProfileError::NonFiniteBound { field });
        }
        if low > high {
            return Err(ProfileError::InvalidRange { field, low, high });
        }
        Ok(IdealRange { low, high })
    }

    pub fn contains(&self, value: f64) -> bool {
        value >= self.low && value <= self.high
    }
}

impl fmt::Display for IdealRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} to {}", self.low, self.high)
    }
}

/// Static configuration of the monitored plant.
///
/// Only constructed through [`PlantProfile::new`], so every range held here
/// has already been validated.
#[derive(Debug, Clone, PartialEq)]
pub struct PlantProfile {
    id: String,
    name: String,
    species: String,
    ideal_temperature: IdealRange,
    ideal_humidity: IdealRange,
    ideal_soil_moisture: IdealRange,
}

impl PlantProfile {
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        species: impl Into<String>,
        ideal_temperature: IdealRange,
        ideal_humidity: IdealRange,
        ideal_soil_moisture: IdealRange,
    ) -> Result<Self, ProfileError> {
        let id = id.into();
        let name = name.into();
        if id.trim().is_empty() {
            return Err(ProfileError::MissingField("id"));
        }
        if name.trim().is_empty() {
            return Err(ProfileError::MissingField("name"));
        }

        Ok(PlantProfile {
            id,
            name,
            species: species.into(),
            ideal_temperature,
            ideal_humidity,
            ideal_soil_moisture,
        })
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn species(&self) -> &str {
        &self.species
    }

    pub fn ideal_temperature(&self) -> IdealRange {
        self.ideal_temperature
    }

    pub fn ideal_humidity(&self) -> IdealRange {
        self.ideal_humidity
    }

    pub fn ideal_soil_moisture(&self) -> IdealRange {
        self.ideal_soil_moisture
    }

    /// Names of the measured quantities in `reading` that fall outside this
    /// profile's ideal ranges
    pub fn out_of_range(&self, reading: &SensorReading) -> Vec<&'static str> {
        let checks = [
            ("temperature", self.ideal_temperature, reading.temperature),
            ("humidity", self.ideal_humidity, reading.humidity),
            ("soil moisture", self.ideal_soil_moisture, reading.soil_moisture),
        ];

        checks
            .iter()
            .filter(|(_, range, value)| !range.contains(*value))
            .map(|(label, _, _)| *label)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ControlMode;
    use time::macros::datetime;
    use uuid::Uuid;

    fn range(low: f64, high: f64) -> IdealRange {
        IdealRange::new("test", low, high).unwrap()
    }

    fn reading(temperature: f64, humidity: f64, soil_moisture: f64) -> SensorReading {
        SensorReading {
            id: Uuid::nil(),
            timestamp: datetime!(2025-06-01 12:00 UTC),
            temperature,
            humidity,
            soil_moisture,
            pump_on: false,
            light_on: false,
            mode: ControlMode::Auto,
            plant_id: "p1".to_string(),
        }
    }

    #[test]
    fn test_range_rejects_inverted_bounds() {
        let err = IdealRange::new("humidity", 80.0, 60.0).unwrap_err();
        assert_eq!(
            err,
            ProfileError::InvalidRange {
                field: "humidity",
                low: 80.0,
                high: 60.0
            }
        );
        assert!(matches!(
            IdealRange::new("temperature", f64::NAN, 10.0),
            Err(ProfileError::NonFiniteBound { field: "temperature" })
        ));
    }

    #[test]
    fn test_range_is_inclusive() {
        let r = range(40.0, 70.0);
        assert!(r.contains(40.0));
        assert!(r.contains(70.0));
        assert!(!r.contains(39.9));
        assert!(!r.contains(70.1));
        // Degenerate single-point ranges are allowed
        assert!(range(5.0, 5.0).contains(5.0));
    }

    #[test]
    fn test_profile_requires_id_and_name() {
        let err = PlantProfile::new(
            " ",
            "Fern",
            "Nephrolepis",
            range(18.0, 24.0),
            range(50.0, 80.0),
            range(40.0, 60.0),
        )
        .unwrap_err();
        assert_eq!(err, ProfileError::MissingField("id"));

        let err = PlantProfile::new(
            "f1",
            "",
            "Nephrolepis",
            range(18.0, 24.0),
            range(50.0, 80.0),
            range(40.0, 60.0),
        )
        .unwrap_err();
        assert_eq!(err, ProfileError::MissingField("name"));
    }

    #[test]
    fn test_out_of_range_lists_offending_quantities() {
        let profile = PlantProfile::new(
            "p1",
            "Monstera Deliciosa",
            "Monstera",
            range(18.0, 30.0),
            range(60.0, 80.0),
            range(40.0, 70.0),
        )
        .unwrap();

        assert!(profile.out_of_range(&reading(25.0, 70.0, 45.0)).is_empty());
        assert_eq!(
            profile.out_of_range(&reading(31.0, 70.0, 39.5)),
            vec!["temperature", "soil moisture"]
        );
    }
}
