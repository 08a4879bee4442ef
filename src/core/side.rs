//! The two competing sides and per-side data storage.
//!
//! ## Side
//!
//! `Player` is the human agent, `Boss` the autonomous computer agent.
//!
//! ## SideMap
//!
//! Fixed two-slot storage indexed by `Side`, used for scores, gauges
//! and mistake counters.

use serde::{Deserialize, Serialize};
use std::ops::{Index, IndexMut};

/// One of the two competing sides.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Side {
    /// Human agent, acts immediately on input.
    Player,
    /// Computer agent, acts after a randomized thinking delay.
    Boss,
}

impl Side {
    /// Both sides, player first.
    pub const ALL: [Side; 2] = [Side::Player, Side::Boss];

    /// The competing side.
    #[must_use]
    pub const fn opponent(self) -> Side {
        match self {
            Side::Player => Side::Boss,
            Side::Boss => Side::Player,
        }
    }
}

impl std::fmt::Display for Side {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Side::Player => write!(f, "player"),
            Side::Boss => write!(f, "boss"),
        }
    }
}

/// Per-side data storage with O(1) access.
///
/// ```
/// use trio_engine::core::{Side, SideMap};
///
/// let mut score: SideMap<u32> = SideMap::default();
/// score[Side::Boss] += 20;
///
/// assert_eq!(score[Side::Player], 0);
/// assert_eq!(score[Side::Boss], 20);
/// ```
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SideMap<T> {
    pub player: T,
    pub boss: T,
}

impl<T> SideMap<T> {
    /// Create a map with explicit values for each side.
    pub const fn new(player: T, boss: T) -> Self {
        Self { player, boss }
    }

    /// Create a map with the same value on both sides.
    pub fn with_value(value: T) -> Self
    where
        T: Clone,
    {
        Self {
            player: value.clone(),
            boss: value,
        }
    }

    /// Iterate over `(side, value)` pairs, player first.
    pub fn iter(&self) -> impl Iterator<Item = (Side, &T)> {
        [(Side::Player, &self.player), (Side::Boss, &self.boss)].into_iter()
    }

    /// Transform every value.
    pub fn map<U>(self, mut f: impl FnMut(Side, T) -> U) -> SideMap<U> {
        SideMap {
            player: f(Side::Player, self.player),
            boss: f(Side::Boss, self.boss),
        }
    }
}

impl<T> Index<Side> for SideMap<T> {
    type Output = T;

    fn index(&self, side: Side) -> &T {
        match side {
            Side::Player => &self.player,
            Side::Boss => &self.boss,
        }
    }
}

impl<T> IndexMut<Side> for SideMap<T> {
    fn index_mut(&mut self, side: Side) -> &mut T {
        match side {
            Side::Player => &mut self.player,
            Side::Boss => &mut self.boss,
        }
    }
}
