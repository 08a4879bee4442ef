//! Observable engine state: phase, notification, fading cards, snapshot.
//!
//! Everything here is plain data for the rendering layer. Only the
//! orchestrator mutates it.

use serde::Serialize;
use smallvec::SmallVec;

use crate::board::{Board, BOARD_SIZE};
use crate::cards::CardId;
use crate::core::{Difficulty, Side, SideMap};

/// Cards chosen by an agent (0..=3, order irrelevant).
pub type Selection = SmallVec<[CardId; 3]>;

/// Round state machine.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    /// No round.
    #[default]
    Idle,
    /// Board populated, both agents may act.
    RoundActive,
    /// Processing lock held: an outcome is being applied.
    Resolving,
    /// Round finished; see `RoundOverReason`.
    RoundOver,
}

/// Why a round ended.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RoundOverReason {
    /// The winner's gauge reached 100.
    GaugeFilled,
    /// The loser reached the tier's mistake limit.
    MistakeLimit,
}

/// Notification style.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum NotificationKind {
    #[default]
    Success,
    Error,
}

/// Most recent transient message.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct Notification {
    pub visible: bool,
    pub kind: NotificationKind,
    pub text: String,
}

/// How the pending cards are being cleared; styled differently.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ClearKind {
    /// Cleared by a valid triple.
    ValidPlay,
    /// Cleared by a correct "no combination" declaration.
    Declaration,
}

/// Ids inside the fade window, by clear kind.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct Fading {
    pub valid_play: SmallVec<[CardId; BOARD_SIZE]>,
    pub declaration: SmallVec<[CardId; BOARD_SIZE]>,
}

impl Fading {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.valid_play.is_empty() && self.declaration.is_empty()
    }

    #[must_use]
    pub fn contains(&self, id: CardId) -> bool {
        self.valid_play.contains(&id) || self.declaration.contains(&id)
    }

    pub fn clear(&mut self) {
        self.valid_play.clear();
        self.declaration.clear();
    }
}

/// Final result of a round.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct RoundResult {
    pub winner: Side,
    pub reason: RoundOverReason,
}

/// Everything the rendering layer needs for one frame.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Snapshot {
    pub phase: Phase,
    pub difficulty: Difficulty,
    pub now_ms: u64,
    pub board: Option<Board>,
    pub player_selection: Selection,
    pub computer_selection: Selection,
    pub fading: Fading,
    pub scores: SideMap<u32>,
    pub gauges: SideMap<f64>,
    pub mistakes: SideMap<u32>,
    pub used_cards: usize,
    pub computer_thinking: bool,
    pub paused: bool,
    pub notification: Notification,
    pub result: Option<RoundResult>,
}
