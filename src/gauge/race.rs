//! Dual-gauge race.
//!
//! The boss gauge is pushed continuously by elapsed time (`tick`); either
//! gauge can also advance in discrete steps (`push`). After every update the
//! two gauges are collided: if their sum exceeds 100, the overlap is taken
//! from the side whose push in this update was weaker. Equal pushes leave the
//! player in possession of the contested region.
//!
//! ```
//! use trio_engine::core::Side;
//! use trio_engine::gauge::GaugeRace;
//!
//! let mut race = GaugeRace::new(1.0);
//! race.tick(30_000);
//! assert_eq!(race.value(Side::Boss), 30.0);
//!
//! race.push(Side::Player, 80.0);
//! assert_eq!(race.value(Side::Player), 80.0);
//! assert_eq!(race.value(Side::Boss), 20.0);
//! ```

use serde::Serialize;

use crate::core::config::GAUGE_MAX;
use crate::core::{Side, SideMap};

/// Side whose gauge advances with elapsed time.
pub const BACKGROUND_SIDE: Side = Side::Boss;

/// Gauge pair plus the most recent push per side.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct GaugeRace {
    gauges: SideMap<f64>,
    recent: SideMap<f64>,
    /// Background push, percent per second.
    rate: f64,
    winner: Option<Side>,
}

impl GaugeRace {
    /// Create an empty race with the given background rate.
    #[must_use]
    pub fn new(rate: f64) -> Self {
        Self {
            gauges: SideMap::with_value(0.0),
            recent: SideMap::with_value(0.0),
            rate,
            winner: None,
        }
    }

    /// Current gauge of a side, in `[0, 100]`.
    #[must_use]
    pub fn value(&self, side: Side) -> f64 {
        self.gauges[side]
    }

    /// Both gauges.
    #[must_use]
    pub fn gauges(&self) -> SideMap<f64> {
        self.gauges
    }

    /// Push applied to each side in the latest update.
    #[must_use]
    pub fn recent(&self) -> SideMap<f64> {
        self.recent
    }

    /// Side that reached 100 first, if any.
    #[must_use]
    pub fn winner(&self) -> Option<Side> {
        self.winner
    }

    /// Advance the background side by `rate * elapsed`.
    pub fn tick(&mut self, elapsed_ms: u64) -> Option<Side> {
        let mut deltas = SideMap::with_value(0.0);
        deltas[BACKGROUND_SIDE] = self.rate * elapsed_ms as f64 / 1000.0;
        self.apply(deltas)
    }

    /// Advance one side by a discrete amount.
    pub fn push(&mut self, side: Side, amount: f64) -> Option<Side> {
        let mut deltas = SideMap::with_value(0.0);
        deltas[side] = amount.max(0.0);
        self.apply(deltas)
    }

    /// Reconcile the gauges so their sum is at most 100.
    ///
    /// Returns the overlap that was removed (0 if none).
    pub fn resolve_collision(&mut self) -> f64 {
        let sum = self.gauges.player + self.gauges.boss;
        if sum <= GAUGE_MAX {
            return 0.0;
        }

        let overlap = sum - GAUGE_MAX;
        let loser = if self.recent.boss > self.recent.player {
            Side::Player
        } else {
            Side::Boss
        };
        self.gauges[loser] = (self.gauges[loser] - overlap).max(0.0);
        overlap
    }

    fn apply(&mut self, deltas: SideMap<f64>) -> Option<Side> {
        if self.winner.is_some() {
            return self.winner;
        }

        for side in Side::ALL {
            self.gauges[side] = (self.gauges[side] + deltas[side]).min(GAUGE_MAX);
        }
        self.recent = deltas;
        self.resolve_collision();

        self.winner = Side::ALL.into_iter().find(|&side| self.gauges[side] >= GAUGE_MAX);
        self.winner
    }
}
