//! # trio-engine
//!
//! Real-time engine for a three-card combination race between a human and a
//! computer "boss" over a shared 3x3 board.
//!
//! ## Design Principles
//!
//! 1. **Single Owner**: `RoundEngine` owns every piece of session state.
//!    Agents only submit selections and declarations.
//!
//! 2. **Serialized Resolution**: One processing lock. Triggers arriving
//!    while it is held are dropped, never queued.
//!
//! 3. **Virtual Time**: No threads and no wall clock. The embedder calls
//!    `RoundEngine::tick(elapsed_ms)`; all deferred work is a cancellable
//!    timer on the engine's scheduler.
//!
//! 4. **Deterministic**: Every random choice derives from the seed passed to
//!    `RoundEngine::new`.
//!
//! ## Modules
//!
//! - `core`: Sides, RNG, difficulty tiers, constants, errors
//! - `cards`: The 27-card universe, attributes and the used-pool
//! - `board`: Board initialization and refresh
//! - `rules`: Combination validator
//! - `gauge`: Dual-gauge race
//! - `engine`: Round orchestrator, scheduler, events and snapshots

pub mod board;
pub mod cards;
pub mod core;
pub mod engine;
pub mod gauge;
pub mod rules;

// Re-export commonly used types
pub use crate::board::{initialize_board, refresh_board, Board, BOARD_SIZE};
pub use crate::cards::{Alignment, AttributeKind, Card, CardId, Job, Race, UsedPool};
pub use crate::core::{Difficulty, EngineError, GameRng, Side, SideMap, TierConfig};
pub use crate::engine::{EngineEvent, Phase, RoundEngine, Snapshot};
pub use crate::gauge::GaugeRace;
pub use crate::rules::{find_all_valid_triples, is_valid_triple, Validation};
