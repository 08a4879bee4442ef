//! Outbound event log.
//!
//! The orchestrator appends an `EngineEvent` for every observable
//! transition; the embedder drains them with `RoundEngine::drain_events`.

use serde::Serialize;
use smallvec::SmallVec;

use super::state::{ClearKind, RoundOverReason};
use crate::board::BOARD_SIZE;
use crate::cards::CardId;
use crate::core::{Difficulty, Side};

/// Something that happened inside the engine.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum EngineEvent {
    /// A fresh session began (scores, gauges and used-pool reset).
    SessionStarted { difficulty: Difficulty },
    /// A new board was dealt.
    RoundStarted { round: u32 },
    /// An agent committed three cards.
    TripleClaimed { side: Side, ids: [CardId; 3], valid: bool },
    /// An agent declared that no valid triple exists.
    Declared { side: Side, correct: bool },
    /// Cleared cards were replaced after the fade window.
    BoardRefreshed {
        kind: ClearKind,
        removed: SmallVec<[CardId; BOARD_SIZE]>,
    },
    /// The computer started thinking.
    DeliberationScheduled { delay_ms: u64 },
    /// The watchdog restarted a stalled computer agent.
    WatchdogFired { idle_ms: u64 },
    /// A fault while applying an outcome was recovered.
    Recovered { error: String },
    /// Paused or resumed the computer agent.
    PauseToggled { paused: bool },
    /// The round ended.
    RoundOver { winner: Side, reason: RoundOverReason },
}
