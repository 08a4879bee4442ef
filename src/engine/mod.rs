//! Round engine: state machine, processing lock, computer agent and timers.
//!
//! ## Key Types
//!
//! - `RoundEngine`: Owns one session and serializes every state change
//! - `Scheduler`: Virtual-clock timer queue driven by `RoundEngine::tick`
//! - `Snapshot`: Read-only view for rendering
//! - `EngineEvent`: Outbound log drained by the embedder

pub mod events;
pub mod orchestrator;
pub mod scheduler;
pub mod state;

pub use events::EngineEvent;
pub use orchestrator::RoundEngine;
pub use scheduler::{Scheduler, Task, TimerHandle};
pub use state::{
    ClearKind, Fading, Notification, NotificationKind, Phase, RoundOverReason, RoundResult, Selection, Snapshot,
};
