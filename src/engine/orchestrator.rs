//! Round engine: the turn orchestrator.
//!
//! `RoundEngine` is the single owner of the board, scores, gauges and
//! timers for one session. A human agent drives it through `select_card`,
//! `declare_no_combination` and `toggle_pause`; the computer agent is a
//! timer on the engine's own scheduler. Both funnel into the same
//! resolution path, serialized by the processing lock:
//!
//! ```text
//!   Idle --start_round--> RoundActive --triple / declaration--> Resolving
//!                             ^                                    |
//!                             +------- outcome applied ------------+
//!                                                                  |
//!   RoundOver <------------- gauge at 100 / mistake limit ---------+
//! ```
//!
//! A trigger that arrives while the lock is held is dropped, never queued.
//!
//! ## Example
//!
//! ```
//! use trio_engine::board::Board;
//! use trio_engine::cards::CardId;
//! use trio_engine::core::{Difficulty, Side};
//! use trio_engine::engine::{Phase, RoundEngine};
//!
//! let mut engine = RoundEngine::new(42);
//! engine.start_round(Difficulty::Normal);
//!
//! let ids = [1, 5, 9, 2, 4, 12, 16, 20, 27].map(CardId::new);
//! assert!(engine.load_board(Board::from_ids(&ids).unwrap()));
//!
//! for id in [1, 5, 9] {
//!     engine.select_card(CardId::new(id));
//! }
//! assert_eq!(engine.phase(), Phase::Resolving);
//! assert_eq!(engine.scores()[Side::Player], 20);
//!
//! engine.tick(600);
//! assert_eq!(engine.phase(), Phase::RoundActive);
//! assert!(!engine.board().unwrap().contains(CardId::new(5)));
//! ```

use smallvec::SmallVec;
use tracing::{debug, error, info, warn};

use super::events::EngineEvent;
use super::scheduler::{Scheduler, Task, TimerHandle};
use super::state::{
    ClearKind, Fading, Notification, NotificationKind, Phase, RoundOverReason, RoundResult, Selection, Snapshot,
};
use crate::board::{initialize_board, refresh_board, Board, BOARD_SIZE};
use crate::cards::{CardId, UsedPool};
use crate::core::config::{
    FADE_DELAY_MS, NOTIFICATION_MS, SCORE_GAUGE_STEP, THINK_DELAY_MS, VICTORY_RESTART_MS, WATCHDOG_INTERVAL_MS,
    WATCHDOG_THRESHOLD_MS,
};
use crate::core::{Difficulty, EngineError, GameRng, Side, SideMap, TierConfig};
use crate::gauge::GaugeRace;
use crate::rules::{find_all_valid_triples, is_valid_triple, Triple};

/// Cards waiting for the fade window to close.
#[derive(Clone, Debug)]
struct PendingClear {
    side: Side,
    kind: ClearKind,
    ids: SmallVec<[CardId; BOARD_SIZE]>,
}

/// Cancellation handles, one slot per kind of deferred work.
#[derive(Clone, Debug, Default)]
struct Timers {
    deliberation: Option<TimerHandle>,
    fade: Option<TimerHandle>,
    watchdog: Option<TimerHandle>,
    notification: Option<TimerHandle>,
    restart: Option<TimerHandle>,
}

/// One session of the card race.
#[derive(Clone, Debug)]
pub struct RoundEngine {
    root_rng: GameRng,
    rng: GameRng,
    scheduler: Scheduler,
    timers: Timers,

    phase: Phase,
    /// Processing lock; held exactly while `phase == Resolving`.
    processing: bool,
    difficulty: Difficulty,
    tier: TierConfig,
    round: u32,

    board: Option<Board>,
    used: UsedPool,
    player_selection: Selection,
    computer_selection: Selection,
    fading: Fading,
    pending: Option<PendingClear>,

    scores: SideMap<u32>,
    mistakes: SideMap<u32>,
    gauge: GaugeRace,
    gauge_clock_ms: u64,
    result: Option<RoundResult>,

    paused: bool,
    computer_thinking: bool,
    last_computer_activity_ms: u64,

    notification: Notification,
    events: Vec<EngineEvent>,
}

impl RoundEngine {
    /// Create an idle engine. Every random choice derives from `seed`.
    #[must_use]
    pub fn new(seed: u64) -> Self {
        let mut root_rng = GameRng::new(seed);
        let rng = root_rng.fork();
        let difficulty = Difficulty::default();
        let tier = difficulty.config();

        Self {
            root_rng,
            rng,
            scheduler: Scheduler::new(),
            timers: Timers::default(),
            phase: Phase::Idle,
            processing: false,
            difficulty,
            tier,
            round: 0,
            board: None,
            used: UsedPool::new(),
            player_selection: Selection::new(),
            computer_selection: Selection::new(),
            fading: Fading::default(),
            pending: None,
            scores: SideMap::default(),
            mistakes: SideMap::default(),
            gauge: GaugeRace::new(tier.gauge_rate),
            gauge_clock_ms: 0,
            result: None,
            paused: false,
            computer_thinking: false,
            last_computer_activity_ms: 0,
            notification: Notification::default(),
            events: Vec::new(),
        }
    }

    // === Inbound ===

    /// Start a new session at `difficulty` and deal its first board.
    ///
    /// Scores, gauges, mistakes and the used-pool start from zero. Any
    /// outstanding timer from a previous session is cancelled first.
    pub fn start_round(&mut self, difficulty: Difficulty) {
        self.cancel_round_timers();
        self.scheduler.cancel_slot(&mut self.timers.restart);

        self.difficulty = difficulty;
        self.tier = difficulty.config();
        self.rng = self.root_rng.fork();
        self.round = 0;
        self.used.clear();
        self.scores = SideMap::default();
        self.mistakes = SideMap::default();
        self.gauge = GaugeRace::new(self.tier.gauge_rate);
        self.gauge_clock_ms = self.scheduler.now();
        self.result = None;
        self.paused = false;

        info!(%difficulty, seed = self.rng.seed(), "session started");
        self.events.push(EngineEvent::SessionStarted { difficulty });
        self.begin_round();
    }

    /// Start a fresh session at the current difficulty.
    pub fn retry(&mut self) {
        self.start_round(self.difficulty);
    }

    /// Cancel every timer and return to `Idle`.
    pub fn dispose(&mut self) {
        self.scheduler.clear();
        self.timers = Timers::default();
        self.phase = Phase::Idle;
        self.processing = false;
        self.board = None;
        self.pending = None;
        self.fading.clear();
        self.player_selection.clear();
        self.computer_selection.clear();
        self.computer_thinking = false;
        self.result = None;
        self.notification.visible = false;
        debug!("engine disposed");
    }

    /// Toggle a card in the human selection.
    ///
    /// Returns `false` when the input was ignored: no active round, lock
    /// held, cards mid-fade, or the card is not on the board. Reaching three
    /// cards triggers validation immediately.
    pub fn select_card(&mut self, id: CardId) -> bool {
        if !self.accepts_input() || !self.board.as_ref().is_some_and(|b| b.contains(id)) {
            return false;
        }

        if let Some(pos) = self.player_selection.iter().position(|&c| c == id) {
            self.player_selection.remove(pos);
            return true;
        }

        self.player_selection.push(id);
        if let &[a, b, c] = self.player_selection.as_slice() {
            self.resolve_triple(Side::Player, [a, b, c]);
        }
        true
    }

    /// Human declares that the board holds no valid triple.
    pub fn declare_no_combination(&mut self) -> bool {
        self.declare(Side::Player)
    }

    /// Pause or resume the computer agent. Returns the new pause state.
    ///
    /// Pausing cancels the pending deliberation and freezes the background
    /// gauge. Resuming reschedules at once unless an outcome is resolving.
    /// Ignored outside a running round; a new session always starts unpaused.
    pub fn toggle_pause(&mut self) -> bool {
        if !self.round_running() {
            return self.paused;
        }
        self.paused = !self.paused;

        if self.paused {
            self.scheduler.cancel_slot(&mut self.timers.deliberation);
            self.computer_thinking = false;
        } else if self.phase == Phase::RoundActive && !self.processing {
            self.schedule_deliberation();
        }

        debug!(paused = self.paused, "pause toggled");
        self.events.push(EngineEvent::PauseToggled { paused: self.paused });
        self.paused
    }

    /// Replace the active board (puzzle setups, replays).
    ///
    /// Accepted only while a round is active and nothing is resolving.
    pub fn load_board(&mut self, board: Board) -> bool {
        if !self.accepts_input() {
            return false;
        }
        self.board = Some(board);
        self.player_selection.clear();
        true
    }

    /// Advance virtual time, firing due timers in order and pushing the
    /// background gauge by the elapsed delta between them.
    pub fn tick(&mut self, elapsed_ms: u64) {
        let target = self.scheduler.now() + elapsed_ms;

        while let Some((_, task)) = self.scheduler.pop_due(target) {
            self.advance_gauge(self.scheduler.now());
            // the gauge may have ended the round after this task was popped
            if task.is_round_scoped() && !self.round_running() {
                debug!(?task, phase = ?self.phase, "stale round timer skipped");
                continue;
            }
            self.run(task);
        }

        self.scheduler.advance_to(target);
        self.advance_gauge(target);
    }

    /// Take every event recorded since the last call.
    pub fn drain_events(&mut self) -> Vec<EngineEvent> {
        std::mem::take(&mut self.events)
    }

    // === Outbound ===

    #[must_use]
    pub fn phase(&self) -> Phase {
        self.phase
    }

    #[must_use]
    pub fn difficulty(&self) -> Difficulty {
        self.difficulty
    }

    /// Rounds dealt in this session.
    #[must_use]
    pub fn round(&self) -> u32 {
        self.round
    }

    #[must_use]
    pub fn now(&self) -> u64 {
        self.scheduler.now()
    }

    #[must_use]
    pub fn board(&self) -> Option<&Board> {
        self.board.as_ref()
    }

    #[must_use]
    pub fn player_selection(&self) -> &[CardId] {
        &self.player_selection
    }

    #[must_use]
    pub fn computer_selection(&self) -> &[CardId] {
        &self.computer_selection
    }

    #[must_use]
    pub fn fading(&self) -> &Fading {
        &self.fading
    }

    #[must_use]
    pub fn scores(&self) -> SideMap<u32> {
        self.scores
    }

    #[must_use]
    pub fn gauges(&self) -> SideMap<f64> {
        self.gauge.gauges()
    }

    #[must_use]
    pub fn mistakes(&self) -> SideMap<u32> {
        self.mistakes
    }

    #[must_use]
    pub fn used_pool(&self) -> &UsedPool {
        &self.used
    }

    #[must_use]
    pub fn is_locked(&self) -> bool {
        self.processing
    }

    #[must_use]
    pub fn is_computer_thinking(&self) -> bool {
        self.computer_thinking
    }

    #[must_use]
    pub fn is_paused(&self) -> bool {
        self.paused
    }

    #[must_use]
    pub fn notification(&self) -> &Notification {
        &self.notification
    }

    #[must_use]
    pub fn result(&self) -> Option<RoundResult> {
        self.result
    }

    /// Everything the rendering layer needs for one frame.
    #[must_use]
    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            phase: self.phase,
            difficulty: self.difficulty,
            now_ms: self.scheduler.now(),
            board: self.board.clone(),
            player_selection: self.player_selection.clone(),
            computer_selection: self.computer_selection.clone(),
            fading: self.fading.clone(),
            scores: self.scores,
            gauges: self.gauge.gauges(),
            mistakes: self.mistakes,
            used_cards: self.used.len(),
            computer_thinking: self.computer_thinking,
            paused: self.paused,
            notification: self.notification.clone(),
            result: self.result,
        }
    }

    // === Round lifecycle ===

    /// Deal a new board within the current session.
    fn begin_round(&mut self) {
        self.cancel_round_timers();
        self.pending = None;
        self.processing = false;
        self.fading.clear();
        self.player_selection.clear();
        self.computer_selection.clear();
        self.computer_thinking = false;

        match initialize_board(&mut self.rng, &self.used) {
            Ok(board) => self.board = Some(board),
            Err(err) => {
                error!(%err, "could not deal a board");
                self.events.push(EngineEvent::Recovered { error: err.to_string() });
                self.board = None;
                self.phase = Phase::Idle;
                return;
            }
        }

        self.round += 1;
        self.phase = Phase::RoundActive;
        debug!(round = self.round, used = self.used.len(), "round started");
        self.events.push(EngineEvent::RoundStarted { round: self.round });

        self.last_computer_activity_ms = self.scheduler.now();
        if !self.paused {
            self.schedule_deliberation();
        }
        self.timers.watchdog = Some(self.scheduler.schedule(WATCHDOG_INTERVAL_MS, Task::Watchdog));
    }

    fn end_round(&mut self, winner: Side, reason: RoundOverReason) {
        self.cancel_round_timers();
        self.pending = None;
        self.processing = false;
        self.fading.clear();
        self.player_selection.clear();
        self.computer_selection.clear();
        self.computer_thinking = false;
        self.phase = Phase::RoundOver;
        self.result = Some(RoundResult { winner, reason });

        info!(%winner, ?reason, scores = ?self.scores, "round over");
        self.events.push(EngineEvent::RoundOver { winner, reason });

        match (winner, reason) {
            (Side::Player, _) => {
                self.notify(NotificationKind::Success, "Victory! You filled your gauge first!");
                self.timers.restart = Some(self.scheduler.schedule(VICTORY_RESTART_MS, Task::RestartSession));
            }
            (Side::Boss, RoundOverReason::GaugeFilled) => {
                self.notify(NotificationKind::Error, "Defeat! The boss filled its gauge first!");
            }
            (Side::Boss, RoundOverReason::MistakeLimit) => {
                self.notify(NotificationKind::Error, "Too many mistakes. Game over.");
            }
        }
    }

    fn cancel_round_timers(&mut self) {
        self.scheduler.cancel_slot(&mut self.timers.deliberation);
        self.scheduler.cancel_slot(&mut self.timers.fade);
        self.scheduler.cancel_slot(&mut self.timers.watchdog);
    }

    fn round_running(&self) -> bool {
        matches!(self.phase, Phase::RoundActive | Phase::Resolving)
    }

    fn accepts_input(&self) -> bool {
        self.phase == Phase::RoundActive && !self.processing && self.fading.is_empty()
    }

    fn lock(&mut self) {
        debug_assert!(!self.processing, "processing lock already held");
        self.processing = true;
        self.phase = Phase::Resolving;
    }

    /// Release the lock and hand the board back to both agents.
    fn finish_resolution(&mut self) {
        self.scheduler.cancel_slot(&mut self.timers.fade);
        self.pending = None;
        self.processing = false;
        self.fading.clear();
        self.player_selection.clear();
        self.computer_selection.clear();
        if self.phase == Phase::Resolving {
            self.phase = Phase::RoundActive;
        }

        if !self.paused && self.phase == Phase::RoundActive {
            self.schedule_deliberation();
        }
    }

    /// Fault while applying an outcome: the board can't be trusted, deal a
    /// fresh one in the same session.
    fn recover(&mut self, err: EngineError) {
        error!(%err, round = self.round, "fault while applying outcome, dealing a fresh round");
        self.events.push(EngineEvent::Recovered { error: err.to_string() });
        self.processing = false;
        self.pending = None;
        self.fading.clear();
        self.player_selection.clear();
        self.computer_selection.clear();
        self.begin_round();
    }

    // === Resolution ===

    fn resolve_triple(&mut self, side: Side, ids: [CardId; 3]) {
        let triple = match self.lookup_triple(ids) {
            Ok(triple) => triple,
            Err(err) => {
                self.recover(err);
                return;
            }
        };

        self.lock();
        let validation = is_valid_triple(&triple);
        debug!(%side, ?ids, valid = validation.is_valid, "triple claimed");
        self.events.push(EngineEvent::TripleClaimed {
            side,
            ids,
            valid: validation.is_valid,
        });

        if !validation.is_valid {
            if side == Side::Boss {
                self.recover(EngineError::InvalidComputerTriple(ids));
                return;
            }
            self.notify(NotificationKind::Error, validation.message);
            self.finish_resolution();
            return;
        }

        self.reward(side);
        if self.phase == Phase::RoundOver {
            return;
        }

        let points = self.tier.reward();
        match side {
            Side::Player => self.notify(NotificationKind::Success, format!("Valid combination! +{points} points")),
            Side::Boss => self.notify(NotificationKind::Error, format!("The boss found a combination! +{points}")),
        }
        self.fading.valid_play = ids.into_iter().collect();
        self.begin_fade(PendingClear {
            side,
            kind: ClearKind::ValidPlay,
            ids: ids.into_iter().collect(),
        });
    }

    fn lookup_triple(&self, ids: [CardId; 3]) -> Result<Triple, EngineError> {
        let board = self.board.as_ref().ok_or(EngineError::BoardSize(0))?;
        let [a, b, c] = ids.map(|id| board.find(id).copied().ok_or(EngineError::CardNotOnBoard(id)));
        Ok([a?, b?, c?])
    }

    fn declare(&mut self, side: Side) -> bool {
        if !self.accepts_input() {
            return false;
        }
        let Some(board) = self.board.as_ref() else {
            return false;
        };
        let board_ids: SmallVec<[CardId; BOARD_SIZE]> = board.ids().collect();
        let correct = find_all_valid_triples(board.cards()).is_empty();

        self.lock();
        debug!(%side, correct, "no-combination declared");
        self.events.push(EngineEvent::Declared { side, correct });

        if correct {
            self.reward(side);
            if self.phase == Phase::RoundOver {
                return true;
            }

            let points = self.tier.reward();
            match side {
                Side::Player => self.notify(
                    NotificationKind::Success,
                    format!("Correct! No combination exists. +{points} points"),
                ),
                Side::Boss => self.notify(NotificationKind::Error, "The boss saw that no combination exists."),
            }
            self.fading.declaration = board_ids.clone();
            self.begin_fade(PendingClear {
                side,
                kind: ClearKind::Declaration,
                ids: board_ids,
            });
        } else {
            self.penalize(side);
            if self.phase == Phase::RoundOver {
                return true;
            }
            if side == Side::Player {
                self.notify(NotificationKind::Error, "A valid combination still exists!");
            }
            self.finish_resolution();
        }
        true
    }

    fn reward(&mut self, side: Side) {
        self.scores[side] += self.tier.reward();
        if let Some(winner) = self.gauge.push(side, SCORE_GAUGE_STEP) {
            self.end_round(winner, RoundOverReason::GaugeFilled);
        }
    }

    fn penalize(&mut self, side: Side) {
        self.mistakes[side] += 1;
        let over_limit = self.mistakes[side] >= self.tier.max_mistakes;

        if let Some(winner) = self.gauge.push(side.opponent(), self.tier.gauge_rate) {
            self.end_round(winner, RoundOverReason::GaugeFilled);
        } else if over_limit {
            self.end_round(side.opponent(), RoundOverReason::MistakeLimit);
        }
    }

    fn begin_fade(&mut self, pending: PendingClear) {
        self.pending = Some(pending);
        self.timers.fade = Some(self.scheduler.schedule(FADE_DELAY_MS, Task::FadeComplete));
    }

    fn apply_clear(&mut self, pending: &PendingClear) -> Result<(), EngineError> {
        let board = self.board.as_ref().ok_or(EngineError::BoardSize(0))?;
        self.used.extend(pending.ids.iter().copied());
        let next = refresh_board(&mut self.rng, board, &pending.ids, &self.used)?;
        self.board = Some(next);
        Ok(())
    }

    // === Timers ===

    fn run(&mut self, task: Task) {
        match task {
            Task::Deliberate => self.on_deliberate(),
            Task::FadeComplete => self.on_fade_complete(),
            Task::Watchdog => self.on_watchdog(),
            Task::DismissNotification => {
                self.timers.notification = None;
                self.notification.visible = false;
            }
            Task::RestartSession => {
                self.timers.restart = None;
                self.retry();
            }
        }
    }

    fn schedule_deliberation(&mut self) {
        self.scheduler.cancel_slot(&mut self.timers.deliberation);
        let delay_ms = self.rng.gen_range_u64(THINK_DELAY_MS);
        self.timers.deliberation = Some(self.scheduler.schedule(delay_ms, Task::Deliberate));
        self.computer_thinking = true;
        self.last_computer_activity_ms = self.scheduler.now();
        self.events.push(EngineEvent::DeliberationScheduled { delay_ms });
    }

    fn on_deliberate(&mut self) {
        self.timers.deliberation = None;
        self.computer_thinking = false;
        self.last_computer_activity_ms = self.scheduler.now();

        if self.paused || !self.accepts_input() {
            debug!(phase = ?self.phase, "deliberation dropped");
            return;
        }
        let Some(board) = self.board.as_ref() else {
            return;
        };

        let triples = find_all_valid_triples(board.cards());
        match self.rng.choose(&triples) {
            Some(triple) => {
                let ids = triple.map(|card| card.id);
                self.computer_selection = ids.into_iter().collect();
                self.resolve_triple(Side::Boss, ids);
            }
            None => {
                self.declare(Side::Boss);
            }
        }
    }

    fn on_fade_complete(&mut self) {
        self.timers.fade = None;
        let Some(pending) = self.pending.take() else {
            warn!("fade completed with nothing pending");
            self.finish_resolution();
            return;
        };

        let outcome = match self.apply_clear(&pending) {
            Ok(()) => Ok(()),
            Err(err) => {
                warn!(%err, "board refresh failed, retrying once");
                self.apply_clear(&pending)
            }
        };

        match outcome {
            Ok(()) => {
                debug!(side = %pending.side, kind = ?pending.kind, "board refreshed");
                self.events.push(EngineEvent::BoardRefreshed {
                    kind: pending.kind,
                    removed: pending.ids,
                });
                self.finish_resolution();
            }
            Err(err) => self.recover(err),
        }
    }

    fn on_watchdog(&mut self) {
        self.timers.watchdog = None;
        if !self.round_running() {
            return;
        }
        self.timers.watchdog = Some(self.scheduler.schedule(WATCHDOG_INTERVAL_MS, Task::Watchdog));

        let idle_ms = self.scheduler.now().saturating_sub(self.last_computer_activity_ms);
        let stalled = self.computer_thinking
            && !self.paused
            && self.phase == Phase::RoundActive
            && !self.processing
            && idle_ms > WATCHDOG_THRESHOLD_MS;

        if stalled {
            warn!(idle_ms, "computer agent stalled, rescheduling deliberation");
            self.events.push(EngineEvent::WatchdogFired { idle_ms });
            self.schedule_deliberation();
        }
    }

    fn advance_gauge(&mut self, to_ms: u64) {
        let elapsed = to_ms.saturating_sub(self.gauge_clock_ms);
        self.gauge_clock_ms = self.gauge_clock_ms.max(to_ms);

        if elapsed == 0 || self.paused || !self.round_running() {
            return;
        }
        if let Some(winner) = self.gauge.tick(elapsed) {
            self.end_round(winner, RoundOverReason::GaugeFilled);
        }
    }

    fn notify(&mut self, kind: NotificationKind, text: impl Into<String>) {
        self.scheduler.cancel_slot(&mut self.timers.notification);
        self.notification = Notification {
            visible: true,
            kind,
            text: text.into(),
        };
        self.timers.notification = Some(self.scheduler.schedule(NOTIFICATION_MS, Task::DismissNotification));
    }
}
