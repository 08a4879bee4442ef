//! Core engine types: sides, RNG, configuration, errors.
//!
//! These are shared by every other module and carry no game rules.

pub mod config;
pub mod error;
pub mod rng;
pub mod side;

pub use config::{Difficulty, TierConfig};
pub use error::EngineError;
pub use rng::GameRng;
pub use side::{Side, SideMap};
