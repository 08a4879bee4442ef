//! Deck universe and the used-pool.
//!
//! Ids enter the used-pool when their card is cleared from the board and
//! stay out of future draws until too few alternatives remain, at which
//! point the draw ignores the pool (forward progress over freshness).

use im::OrdSet;
use rustc_hash::FxHashSet;
use serde::Serialize;
use tracing::warn;

use super::card::CardId;
use crate::core::GameRng;

/// Ids already consumed this session.
///
/// Backed by a persistent set so snapshots clone in O(1).
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct UsedPool {
    ids: OrdSet<CardId>,
}

impl UsedPool {
    /// Create an empty pool.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Record cleared ids.
    pub fn extend(&mut self, ids: impl IntoIterator<Item = CardId>) {
        for id in ids {
            self.ids.insert(id);
        }
    }

    /// Check whether an id was consumed.
    #[must_use]
    pub fn contains(&self, id: CardId) -> bool {
        self.ids.contains(&id)
    }

    /// Number of consumed ids.
    #[must_use]
    pub fn len(&self) -> usize {
        self.ids.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    /// Forget everything (new session).
    pub fn clear(&mut self) {
        self.ids = OrdSet::new();
    }

    /// Consumed ids, ascending.
    pub fn iter(&self) -> impl Iterator<Item = CardId> + '_ {
        self.ids.iter().copied()
    }
}

impl FromIterator<CardId> for UsedPool {
    fn from_iter<I: IntoIterator<Item = CardId>>(iter: I) -> Self {
        let mut pool = UsedPool::new();
        pool.extend(iter);
        pool
    }
}

/// Draw `count` distinct ids uniformly at random.
///
/// Eligible ids are `universe - used - exclude`. When fewer than `count`
/// are eligible the used-pool is ignored and the draw comes from
/// `universe - exclude`. The result is shorter than `count` only when
/// `exclude` itself leaves too few ids.
///
/// ```
/// use trio_engine::cards::{sample_unused, CardId, UsedPool};
/// use trio_engine::core::GameRng;
///
/// let mut rng = GameRng::new(3);
/// let used: UsedPool = (1..=20).map(CardId::new).collect();
///
/// let drawn = sample_unused(&mut rng, &used, 3, &[CardId::new(21)]);
/// assert_eq!(drawn.len(), 3);
/// assert!(drawn.iter().all(|id| id.raw() > 21));
/// ```
pub fn sample_unused(rng: &mut GameRng, used: &UsedPool, count: usize, exclude: &[CardId]) -> Vec<CardId> {
    let excluded: FxHashSet<CardId> = exclude.iter().copied().collect();

    let mut eligible: Vec<CardId> = CardId::all()
        .filter(|id| !used.contains(*id) && !excluded.contains(id))
        .collect();

    if eligible.len() < count {
        warn!(
            eligible = eligible.len(),
            count,
            used = used.len(),
            "used-pool exhausted, drawing from the full universe"
        );
        eligible = CardId::all().filter(|id| !excluded.contains(id)).collect();
    }

    rng.shuffle(&mut eligible);
    eligible.truncate(count);
    eligible
}
