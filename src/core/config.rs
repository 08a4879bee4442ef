//! Difficulty tiers and fixed engine timings.
//!
//! A tier is selected once at round start and yields a `TierConfig`:
//! - `gauge_rate`: boss gauge background push, in percent per second
//! - `score_multiplier`: multiplier applied to the base reward
//! - `max_mistakes`: wrong "no combination" declarations before the session ends
//!
//! Everything else (fade window, thinking delay, watchdog) is a fixed constant.

use serde::{Deserialize, Serialize};
use std::ops::RangeInclusive;
use std::str::FromStr;

use super::error::EngineError;

/// Points awarded per reward before the tier multiplier.
pub const BASE_SCORE: u32 = 10;

/// Discrete gauge advance for a scoring event.
pub const SCORE_GAUGE_STEP: f64 = 20.0;

/// Gauge value that wins the race.
pub const GAUGE_MAX: f64 = 100.0;

/// Window between a successful clear and the board refresh.
pub const FADE_DELAY_MS: u64 = 600;

/// Notification auto-dismiss delay.
pub const NOTIFICATION_MS: u64 = 3_000;

/// Computer "thinking" delay, drawn uniformly.
pub const THINK_DELAY_MS: RangeInclusive<u64> = 10_000..=30_000;

/// Watchdog check period.
pub const WATCHDOG_INTERVAL_MS: u64 = 5_000;

/// Computer inactivity tolerated before the watchdog force-reschedules.
///
/// Must exceed the upper bound of `THINK_DELAY_MS`.
pub const WATCHDOG_THRESHOLD_MS: u64 = 40_000;

/// Delay between a player victory and the automatic new session.
pub const VICTORY_RESTART_MS: u64 = 2_000;

/// Difficulty tier.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    Easy,
    #[default]
    Normal,
    Hard,
}

impl Difficulty {
    /// All tiers, easiest first.
    pub const ALL: [Difficulty; 3] = [Difficulty::Easy, Difficulty::Normal, Difficulty::Hard];

    /// Tuning for this tier.
    #[must_use]
    pub const fn config(self) -> TierConfig {
        match self {
            Difficulty::Easy => TierConfig {
                gauge_rate: 0.2,
                score_multiplier: 1,
                max_mistakes: 5,
            },
            Difficulty::Normal => TierConfig {
                gauge_rate: 0.4,
                score_multiplier: 2,
                max_mistakes: 3,
            },
            Difficulty::Hard => TierConfig {
                gauge_rate: 1.0,
                score_multiplier: 3,
                max_mistakes: 1,
            },
        }
    }
}

impl std::fmt::Display for Difficulty {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Difficulty::Easy => "easy",
            Difficulty::Normal => "normal",
            Difficulty::Hard => "hard",
        };
        f.write_str(name)
    }
}

impl FromStr for Difficulty {
    type Err = EngineError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "easy" => Ok(Difficulty::Easy),
            "normal" => Ok(Difficulty::Normal),
            "hard" => Ok(Difficulty::Hard),
            _ => Err(EngineError::UnknownDifficulty(value.to_string())),
        }
    }
}

/// Per-tier tuning, fixed for the duration of a session.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct TierConfig {
    /// Boss gauge background push (percent per second).
    pub gauge_rate: f64,

    /// Multiplier on `BASE_SCORE` for every reward.
    pub score_multiplier: u32,

    /// Mistakes allowed before the session is lost.
    pub max_mistakes: u32,
}

impl TierConfig {
    /// Points for one reward at this tier.
    #[must_use]
    pub const fn reward(&self) -> u32 {
        BASE_SCORE * self.score_multiplier
    }
}

impl Default for TierConfig {
    fn default() -> Self {
        Difficulty::default().config()
    }
}
