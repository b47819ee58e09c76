pub mod telemetry;

pub use telemetry::next_reading;
