//! Round engine integration tests, driven entirely through virtual time.

use trio_engine::board::Board;
use trio_engine::cards::CardId;
use trio_engine::core::{Difficulty, Side};
use trio_engine::engine::{EngineEvent, NotificationKind, Phase, RoundEngine, RoundOverReason};
use trio_engine::rules::find_all_valid_triples;

/// Holds the valid triple {1, 5, 9}; {1, 2, 4} is invalid.
const PLAY_BOARD: [u8; 9] = [1, 5, 9, 2, 4, 12, 16, 20, 27];
/// No valid triple at all.
const CAP_BOARD: [u8; 9] = [1, 11, 12, 13, 23, 24, 16, 26, 27];

fn board(raw: [u8; 9]) -> Board {
    Board::from_ids(&raw.map(CardId::new)).unwrap()
}

fn started(seed: u64, difficulty: Difficulty) -> RoundEngine {
    let mut engine = RoundEngine::new(seed);
    engine.start_round(difficulty);
    engine
}

fn select(engine: &mut RoundEngine, raw: &[u8]) {
    for &id in raw {
        assert!(engine.select_card(CardId::new(id)), "select {id}");
    }
}

fn boss_acted(events: &[EngineEvent]) -> bool {
    events.iter().any(|e| {
        matches!(
            e,
            EngineEvent::TripleClaimed { side: Side::Boss, .. } | EngineEvent::Declared { side: Side::Boss, .. }
        )
    })
}

// =============================================================================
// Round start
// =============================================================================

#[test]
fn test_start_round_deals_board_and_starts_thinking() {
    let mut engine = started(7, Difficulty::Normal);

    assert_eq!(engine.phase(), Phase::RoundActive);
    assert_eq!(engine.board().unwrap().len(), 9);
    assert!(engine.board().unwrap().duplicate_ids().is_empty());
    assert!(engine.is_computer_thinking());
    assert!(!engine.is_locked());

    let events = engine.drain_events();
    assert_eq!(events[0], EngineEvent::SessionStarted { difficulty: Difficulty::Normal });
    assert_eq!(events[1], EngineEvent::RoundStarted { round: 1 });
    assert!(engine.drain_events().is_empty());
}

#[test]
fn test_same_seed_same_session() {
    let mut a = started(2024, Difficulty::Hard);
    let mut b = started(2024, Difficulty::Hard);
    for _ in 0..60 {
        a.tick(1_000);
        b.tick(1_000);
    }
    assert_eq!(a.snapshot(), b.snapshot());
    assert_eq!(a.drain_events(), b.drain_events());
}

#[test]
fn test_inputs_ignored_before_start() {
    let mut engine = RoundEngine::new(1);
    assert_eq!(engine.phase(), Phase::Idle);
    assert!(!engine.select_card(CardId::new(1)));
    assert!(!engine.declare_no_combination());
}

// =============================================================================
// Human plays
// =============================================================================

#[test]
fn test_valid_triple_scores_and_refreshes() {
    let mut engine = started(5, Difficulty::Normal);
    assert!(engine.load_board(board(PLAY_BOARD)));

    select(&mut engine, &[1, 5]);
    assert_eq!(engine.player_selection().len(), 2);
    select(&mut engine, &[9]);

    assert_eq!(engine.phase(), Phase::Resolving);
    assert!(engine.is_locked());
    assert_eq!(engine.scores()[Side::Player], 20);
    assert_eq!(engine.gauges()[Side::Player], 20.0);
    assert_eq!(engine.fading().valid_play.as_slice(), &[1, 5, 9].map(CardId::new));
    assert_eq!(engine.notification().kind, NotificationKind::Success);

    engine.tick(600);

    assert_eq!(engine.phase(), Phase::RoundActive);
    assert!(engine.fading().is_empty());
    assert!(engine.player_selection().is_empty());
    let next = engine.board().unwrap();
    assert!(next.duplicate_ids().is_empty());
    for id in [1, 5, 9] {
        assert!(!next.contains(CardId::new(id)));
        assert!(engine.used_pool().contains(CardId::new(id)));
    }
    for (slot, id) in PLAY_BOARD.iter().enumerate().skip(3) {
        assert_eq!(next.get(slot).unwrap().id, CardId::new(*id));
    }
}

#[test]
fn test_invalid_triple_shows_error_and_clears_selection() {
    let mut engine = started(6, Difficulty::Normal);
    assert!(engine.load_board(board(PLAY_BOARD)));

    select(&mut engine, &[1, 2, 4]);

    assert_eq!(engine.phase(), Phase::RoundActive);
    assert!(!engine.is_locked());
    assert!(engine.player_selection().is_empty());
    assert_eq!(engine.scores()[Side::Player], 0);
    assert_eq!(engine.notification().kind, NotificationKind::Error);
    assert_eq!(engine.notification().text, "Invalid combination.");
    assert_eq!(engine.board().unwrap(), &board(PLAY_BOARD));

    engine.tick(3_000);
    assert!(!engine.notification().visible);
}

#[test]
fn test_reselecting_a_card_deselects_it() {
    let mut engine = started(8, Difficulty::Normal);
    assert!(engine.load_board(board(PLAY_BOARD)));

    select(&mut engine, &[1, 1]);
    assert!(engine.player_selection().is_empty());

    assert!(!engine.select_card(CardId::new(3)), "not on the board");
}

#[test]
fn test_inputs_ignored_during_fade() {
    let mut engine = started(9, Difficulty::Normal);
    assert!(engine.load_board(board(PLAY_BOARD)));
    select(&mut engine, &[1, 5, 9]);

    assert!(!engine.select_card(CardId::new(2)));
    assert!(!engine.declare_no_combination());
    assert!(!engine.load_board(board(CAP_BOARD)));
    assert_eq!(engine.scores()[Side::Player], 20);

    engine.tick(600);
    assert!(engine.select_card(CardId::new(2)));
}

// =============================================================================
// Declarations
// =============================================================================

#[test]
fn test_correct_declaration_refreshes_whole_board() {
    let mut engine = started(10, Difficulty::Normal);
    assert!(engine.load_board(board(CAP_BOARD)));

    assert!(engine.declare_no_combination());
    assert_eq!(engine.phase(), Phase::Resolving);
    assert_eq!(engine.scores()[Side::Player], 20);
    assert_eq!(engine.fading().declaration.len(), 9);

    engine.tick(600);

    assert_eq!(engine.phase(), Phase::RoundActive);
    assert_eq!(engine.used_pool().len(), 9);
    let next = engine.board().unwrap();
    assert!(CAP_BOARD.iter().all(|&id| !next.contains(CardId::new(id))));
    assert!(next.duplicate_ids().is_empty());
}

#[test]
fn test_wrong_declaration_is_a_mistake() {
    let mut engine = started(11, Difficulty::Normal);
    assert!(engine.load_board(board(PLAY_BOARD)));

    assert!(engine.declare_no_combination());

    assert_eq!(engine.phase(), Phase::RoundActive);
    assert_eq!(engine.mistakes()[Side::Player], 1);
    assert_eq!(engine.scores()[Side::Player], 0);
    assert!(engine.gauges()[Side::Boss] >= 0.4);
    assert_eq!(engine.notification().kind, NotificationKind::Error);
    assert_eq!(engine.board().unwrap(), &board(PLAY_BOARD));
}

#[test]
fn test_mistake_limit_ends_round() {
    let mut engine = started(12, Difficulty::Hard);
    assert!(engine.load_board(board(PLAY_BOARD)));

    engine.declare_no_combination();

    assert_eq!(engine.phase(), Phase::RoundOver);
    let result = engine.result().unwrap();
    assert_eq!(result.winner, Side::Boss);
    assert_eq!(result.reason, RoundOverReason::MistakeLimit);
    assert!(!engine.is_computer_thinking());
    assert!(!engine.select_card(CardId::new(1)));
}

// =============================================================================
// Computer agent
// =============================================================================

#[test]
fn test_computer_acts_within_think_window() {
    for seed in 0..10 {
        let mut engine = started(seed, Difficulty::Normal);
        engine.drain_events();

        let mut acted = false;
        for _ in 0..31 {
            engine.tick(1_000);
            if boss_acted(&engine.drain_events()) {
                acted = true;
                break;
            }
        }
        assert!(acted, "seed {seed}");
        assert_eq!(engine.scores()[Side::Boss], 20);
    }
}

#[test]
fn test_pause_freezes_computer_and_gauge() {
    let mut engine = started(13, Difficulty::Normal);
    assert!(engine.toggle_pause());
    assert!(!engine.is_computer_thinking());
    engine.drain_events();

    for _ in 0..60 {
        engine.tick(1_000);
    }
    assert!(!boss_acted(&engine.drain_events()));
    assert_eq!(engine.gauges()[Side::Boss], 0.0);
    assert_eq!(engine.scores()[Side::Boss], 0);

    assert!(!engine.toggle_pause());
    assert!(engine.is_computer_thinking());
}

#[test]
fn test_resume_while_resolving_waits_for_outcome() {
    let mut engine = started(18, Difficulty::Normal);
    assert!(engine.load_board(board(PLAY_BOARD)));
    select(&mut engine, &[1, 5, 9]);
    assert_eq!(engine.phase(), Phase::Resolving);

    assert!(engine.toggle_pause());
    engine.drain_events();
    assert!(!engine.toggle_pause());

    let scheduled = |events: &[EngineEvent]| {
        events
            .iter()
            .filter(|e| matches!(e, EngineEvent::DeliberationScheduled { .. }))
            .count()
    };
    assert_eq!(scheduled(&engine.drain_events()), 0);
    assert!(!engine.is_computer_thinking());

    engine.tick(600);

    assert_eq!(engine.phase(), Phase::RoundActive);
    assert_eq!(scheduled(&engine.drain_events()), 1);
    assert!(engine.is_computer_thinking());
}

#[test]
fn test_pause_ignored_outside_running_round() {
    let mut idle = RoundEngine::new(19);
    assert!(!idle.toggle_pause());
    assert!(!idle.is_paused());

    let mut engine = started(19, Difficulty::Hard);
    assert!(engine.load_board(board(PLAY_BOARD)));
    engine.declare_no_combination();
    assert_eq!(engine.phase(), Phase::RoundOver);
    engine.drain_events();

    assert!(!engine.toggle_pause());
    assert!(!engine.is_paused());
    assert!(!engine
        .drain_events()
        .iter()
        .any(|e| matches!(e, EngineEvent::PauseToggled { .. })));
}

#[test]
fn test_boss_wins_on_hard_then_retry_resets() {
    let mut engine = started(14, Difficulty::Hard);

    for _ in 0..200 {
        engine.tick(1_000);
        if engine.phase() == Phase::RoundOver {
            break;
        }
    }

    let result = engine.result().unwrap();
    assert_eq!(result.winner, Side::Boss);
    assert_eq!(result.reason, RoundOverReason::GaugeFilled);
    assert_eq!(engine.gauges()[Side::Boss], 100.0);

    // no auto-restart after a defeat
    engine.tick(10_000);
    assert_eq!(engine.phase(), Phase::RoundOver);

    engine.retry();
    assert_eq!(engine.phase(), Phase::RoundActive);
    assert_eq!(engine.scores()[Side::Boss], 0);
    assert_eq!(engine.gauges()[Side::Boss], 0.0);
    assert_eq!(engine.used_pool().len(), 0);
    assert_eq!(engine.result(), None);
}

// =============================================================================
// Session flow
// =============================================================================

#[test]
fn test_player_victory_restarts_session() {
    let mut engine = started(15, Difficulty::Easy);

    for _ in 0..5 {
        assert!(engine.load_board(board(PLAY_BOARD)));
        select(&mut engine, &[1, 5, 9]);
        engine.tick(600);
    }

    assert_eq!(engine.phase(), Phase::RoundOver);
    assert_eq!(engine.result().unwrap().winner, Side::Player);
    assert_eq!(engine.gauges()[Side::Player], 100.0);
    assert_eq!(engine.scores()[Side::Player], 50);
    engine.drain_events();

    engine.tick(2_000);

    assert_eq!(engine.phase(), Phase::RoundActive);
    assert_eq!(engine.scores()[Side::Player], 0);
    assert_eq!(engine.difficulty(), Difficulty::Easy);
    assert!(engine
        .drain_events()
        .contains(&EngineEvent::SessionStarted { difficulty: Difficulty::Easy }));
}

#[test]
fn test_consecutive_plays_keep_board_distinct() {
    for seed in 0..20 {
        let mut engine = started(seed, Difficulty::Normal);

        for _ in 0..4 {
            let before = engine.board().unwrap().clone();
            let triples = find_all_valid_triples(before.cards());

            match triples.first() {
                Some(t) => {
                    let ids = t.map(|c| c.id);
                    for id in ids {
                        assert!(engine.select_card(id));
                    }
                    engine.tick(600);

                    let after = engine.board().unwrap();
                    assert!(after.duplicate_ids().is_empty());
                    for id in ids {
                        let slot = before.position(id).unwrap();
                        let replacement = after.get(slot).unwrap().id;
                        let kept = before.ids().filter(|k| !ids.contains(k));
                        assert!(kept.into_iter().all(|k| k != replacement));
                    }
                }
                None => {
                    assert!(engine.declare_no_combination());
                    engine.tick(600);
                    assert!(engine.board().unwrap().duplicate_ids().is_empty());
                }
            }
            assert_eq!(engine.phase(), Phase::RoundActive, "seed {seed}");
        }
    }
}

#[test]
fn test_dispose_stops_everything() {
    let mut engine = started(16, Difficulty::Normal);
    engine.dispose();

    assert_eq!(engine.phase(), Phase::Idle);
    assert!(engine.board().is_none());
    engine.drain_events();

    engine.tick(120_000);
    assert!(engine.drain_events().is_empty());
    assert_eq!(engine.phase(), Phase::Idle);
}

#[test]
fn test_snapshot_serializes() {
    let engine = started(17, Difficulty::Normal);
    let json = serde_json::to_value(engine.snapshot()).unwrap();

    assert_eq!(json["phase"], "round_active");
    assert_eq!(json["difficulty"], "normal");
    assert_eq!(json["board"].as_array().unwrap().len(), 9);
    assert_eq!(json["computer_thinking"], true);
}
