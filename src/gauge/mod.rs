//! Gauge race: the victory condition.

pub mod race;

pub use race::{GaugeRace, BACKGROUND_SIDE};
