/// Utility functions for formatting readings and profiles in logs and on the console
use time::macros::format_description;
use time::OffsetDateTime;

use crate::models::{ManualOverride, SensorReading};
use crate::plant::PlantProfile;

/// Format a timestamp for human-readable output
///
/// Converts an OffsetDateTime to DD.MM.YYYY - HH:MM:SS format.
/// Falls back to default string representation if formatting fails.
pub fn format_datetime(dt: &OffsetDateTime) -> String {
    let format = format_description!("[day].[month].[year] - [hour]:[minute]:[second]");
    dt.format(format).unwrap_or_else(|_| dt.to_string())
}

pub fn on_off(state: bool) -> &'static str {
    if state {
        "on"
    } else {
        "off"
    }
}

/// One-line summary of a reading
pub fn format_reading(reading: &SensorReading) -> String {
    format!(
        "{} [{}] temp={:.2}°C, humidity={:.2}%, soil={:.1}%, pump={}, light={}, mode={}",
        format_datetime(&reading.timestamp),
        reading.plant_id,
        reading.temperature,
        reading.humidity,
        reading.soil_moisture,
        on_off(reading.pump_on),
        on_off(reading.light_on),
        reading.mode
    )
}

pub fn format_overrides(overrides: &ManualOverride) -> String {
    format!(
        "pump={}, light={}",
        on_off(overrides.pump_requested),
        on_off(overrides.light_requested)
    )
}

/// Multi-line description of the plant profile
pub fn format_profile(profile: &PlantProfile) -> String {
    format!(
        "{} ({}), id {}\n  Ideal temperature: {} °C\n  Ideal humidity: {} %\n  Ideal soil moisture: {} %",
        profile.name(),
        profile.species(),
        profile.id(),
        profile.ideal_temperature(),
        profile.ideal_humidity(),
        profile.ideal_soil_moisture()
    )
}
