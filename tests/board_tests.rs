//! Board manager integration tests.

use std::collections::BTreeSet;

use proptest::prelude::*;
use trio_engine::board::{initialize_board, refresh_board, Board, BOARD_SIZE};
use trio_engine::cards::{CardId, UsedPool};
use trio_engine::core::GameRng;

fn distinct(board: &Board) -> bool {
    board.ids().collect::<BTreeSet<_>>().len() == BOARD_SIZE
}

fn used_strategy() -> impl Strategy<Value = UsedPool> {
    proptest::collection::btree_set(1u8..=27, 0..=27)
        .prop_map(|raw| raw.into_iter().map(CardId::new).collect())
}

#[test]
fn test_same_seed_same_board() {
    let used = UsedPool::new();
    let a = initialize_board(&mut GameRng::new(99), &used).unwrap();
    let b = initialize_board(&mut GameRng::new(99), &used).unwrap();
    assert_eq!(a, b);
}

#[test]
fn test_refresh_missing_card_is_an_error() {
    let mut rng = GameRng::new(3);
    let board = Board::from_ids(&[1, 2, 3, 4, 5, 6, 7, 8, 9].map(CardId::new)).unwrap();
    let used: UsedPool = [1, 2, 3].map(CardId::new).into_iter().collect();

    assert!(refresh_board(&mut rng, &board, &[CardId::new(10)], &used).is_err());
}

#[test]
fn test_session_of_refreshes_never_repeats_on_board_ids() {
    let mut rng = GameRng::new(11);
    let mut used = UsedPool::new();
    let mut board = initialize_board(&mut rng, &used).unwrap();

    for _ in 0..30 {
        let removed: Vec<CardId> = board.ids().take(3).collect();
        used.extend(removed.iter().copied());
        board = refresh_board(&mut rng, &board, &removed, &used).unwrap();
        assert!(distinct(&board));
    }
    assert_eq!(used.len(), 27);
}

proptest! {
    #[test]
    fn prop_initialize_is_distinct(seed in any::<u64>(), used in used_strategy()) {
        let board = initialize_board(&mut GameRng::new(seed), &used).unwrap();
        prop_assert_eq!(board.len(), BOARD_SIZE);
        prop_assert!(distinct(&board));

        // enough fresh ids means none of them is used
        if 27 - used.len() >= BOARD_SIZE {
            prop_assert!(board.ids().all(|id| !used.contains(id)));
        }
    }

    #[test]
    fn prop_refresh_keeps_slots_and_distinctness(
        seed in any::<u64>(),
        used in used_strategy(),
        slots in proptest::sample::subsequence((0..BOARD_SIZE).collect::<Vec<_>>(), 1..=BOARD_SIZE),
    ) {
        let mut rng = GameRng::new(seed);
        let board = initialize_board(&mut rng, &used).unwrap();
        let removed: Vec<CardId> = slots.iter().map(|&s| board.get(s).unwrap().id).collect();

        let mut used = used;
        used.extend(removed.iter().copied());
        let next = refresh_board(&mut rng, &board, &removed, &used).unwrap();

        prop_assert!(distinct(&next));
        let kept: Vec<CardId> = board.ids().filter(|id| !removed.contains(id)).collect();
        for slot in 0..BOARD_SIZE {
            let before = board.get(slot).unwrap().id;
            let after = next.get(slot).unwrap().id;
            if slots.contains(&slot) {
                prop_assert!(!kept.contains(&after));
            } else {
                prop_assert_eq!(before, after);
            }
        }

        let fresh = CardId::all().filter(|&id| !used.contains(id) && !kept.contains(&id)).count();
        if fresh >= removed.len() {
            for &slot in &slots {
                prop_assert!(!used.contains(next.get(slot).unwrap().id));
            }
        }
    }
}
