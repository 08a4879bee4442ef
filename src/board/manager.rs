//! Board manager: the 3x3 grid and its two mutation entry points.
//!
//! `initialize_board` and `refresh_board` are pure functions over the
//! values the orchestrator passes in. Both end in the same postcondition
//! check, which repairs duplicate ids deterministically and fails only if
//! the repair itself could not restore distinct ids.

use rustc_hash::FxHashSet;
use serde::Serialize;
use smallvec::SmallVec;
use tracing::warn;

use crate::cards::{sample_unused, Card, CardId, UsedPool};
use crate::core::{EngineError, GameRng};

/// Cards on the board (3x3).
pub const BOARD_SIZE: usize = 9;

/// Ordered 3x3 grid of cards, row-major.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Board {
    cards: SmallVec<[Card; BOARD_SIZE]>,
}

impl Board {
    /// Build a board from explicit ids (puzzle setups, replays).
    ///
    /// Requires exactly 9 pairwise-distinct ids.
    pub fn from_ids(ids: &[CardId]) -> Result<Self, EngineError> {
        if ids.len() != BOARD_SIZE {
            return Err(EngineError::BoardSize(ids.len()));
        }
        let board = Self {
            cards: ids.iter().map(|&id| Card::from_id(id)).collect(),
        };
        let dups = board.duplicate_ids();
        if dups.is_empty() {
            Ok(board)
        } else {
            Err(EngineError::DuplicateIds(dups))
        }
    }

    /// Cards in slot order.
    #[must_use]
    pub fn cards(&self) -> &[Card] {
        &self.cards
    }

    /// Ids in slot order.
    pub fn ids(&self) -> impl Iterator<Item = CardId> + '_ {
        self.cards.iter().map(|c| c.id)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.cards.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    /// Card in a slot.
    #[must_use]
    pub fn get(&self, slot: usize) -> Option<&Card> {
        self.cards.get(slot)
    }

    /// Card with the given id, if present.
    #[must_use]
    pub fn find(&self, id: CardId) -> Option<&Card> {
        self.cards.iter().find(|c| c.id == id)
    }

    /// First slot holding `id`.
    #[must_use]
    pub fn position(&self, id: CardId) -> Option<usize> {
        self.cards.iter().position(|c| c.id == id)
    }

    #[must_use]
    pub fn contains(&self, id: CardId) -> bool {
        self.position(id).is_some()
    }

    /// Ids that occur more than once (each reported once, in slot order).
    #[must_use]
    pub fn duplicate_ids(&self) -> Vec<CardId> {
        let mut seen = FxHashSet::default();
        let mut dups = Vec::new();
        for id in self.ids() {
            if !seen.insert(id) && !dups.contains(&id) {
                dups.push(id);
            }
        }
        dups
    }

    /// Replace every repeated occurrence of an id after its first.
    ///
    /// The substitute is the lowest id not on the board and not used; if
    /// every such id is used, the lowest id not on the board. Returns the
    /// ids that were replaced. A board without duplicates is left untouched.
    pub fn repair_duplicates(&mut self, used: &UsedPool) -> SmallVec<[CardId; BOARD_SIZE]> {
        let mut replaced = SmallVec::new();
        let mut seen = FxHashSet::default();

        for slot in 0..self.cards.len() {
            let id = self.cards[slot].id;
            if seen.insert(id) {
                continue;
            }

            let present: FxHashSet<CardId> = self.ids().collect();
            let substitute = CardId::all()
                .find(|c| !present.contains(c) && !used.contains(*c))
                .or_else(|| CardId::all().find(|c| !present.contains(c)));

            if let Some(sub) = substitute {
                self.cards[slot] = Card::from_id(sub);
                seen.insert(sub);
                replaced.push(id);
            }
        }

        replaced
    }
}

/// Draw a fresh board of 9 distinct cards in random order.
///
/// Falls back to the full universe if fewer than 9 ids are unused.
pub fn initialize_board(rng: &mut GameRng, used: &UsedPool) -> Result<Board, EngineError> {
    let ids = sample_unused(rng, used, BOARD_SIZE, &[]);
    if ids.len() < BOARD_SIZE {
        return Err(EngineError::DeckExhausted {
            needed: BOARD_SIZE,
            drawn: ids.len(),
        });
    }

    let mut board = Board {
        cards: ids.into_iter().map(Card::from_id).collect(),
    };
    ensure_distinct(&mut board, used)?;
    Ok(board)
}

/// Replace the cards in `removed` with freshly drawn ones.
///
/// The draw excludes used ids and every id still on the board outside the
/// removed set. Untouched slots keep their position.
pub fn refresh_board(
    rng: &mut GameRng,
    board: &Board,
    removed: &[CardId],
    used: &UsedPool,
) -> Result<Board, EngineError> {
    let mut targets: SmallVec<[CardId; BOARD_SIZE]> = SmallVec::new();
    for &id in removed {
        if !targets.contains(&id) {
            targets.push(id);
        }
    }

    // Slots are resolved before mutation; a redrawn id may equal a later target.
    let slots = targets
        .iter()
        .map(|&id| board.position(id).ok_or(EngineError::CardNotOnBoard(id)))
        .collect::<Result<SmallVec<[usize; BOARD_SIZE]>, _>>()?;

    let keep: Vec<CardId> = board.ids().filter(|id| !targets.contains(id)).collect();
    let fresh = sample_unused(rng, used, targets.len(), &keep);
    if fresh.len() < targets.len() {
        return Err(EngineError::DeckExhausted {
            needed: targets.len(),
            drawn: fresh.len(),
        });
    }

    let mut next = board.clone();
    for (slot, id) in slots.into_iter().zip(fresh) {
        next.cards[slot] = Card::from_id(id);
    }

    ensure_distinct(&mut next, used)?;
    Ok(next)
}

fn ensure_distinct(board: &mut Board, used: &UsedPool) -> Result<(), EngineError> {
    let dups = board.duplicate_ids();
    if dups.is_empty() {
        return Ok(());
    }

    let replaced = board.repair_duplicates(used);
    warn!(?dups, ?replaced, "duplicate ids on board, repaired");

    let left = board.duplicate_ids();
    if left.is_empty() {
        Ok(())
    } else {
        Err(EngineError::DuplicateIds(left))
    }
}
