pub mod controller;

pub use controller::{apply_toggle, decide_actuation};
