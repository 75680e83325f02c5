//! Property tests for the sweep kernel.
//!
//! Invariants covered:
//! - every tile ends a sweep inside the board, and each target cell is held
//!   by the last tile that moved into it;
//! - the sum of tile values is conserved once the sweep is finished;
//! - the score rises by exactly half the value created by merges;
//! - a sweep that reports no steps leaves the board untouched;
//! - no tile takes part in more than one merge per sweep.
use std::collections::{HashMap, HashSet};

use proptest::prelude::*;
use twenty48_core::engine::{self as GameEngine, BoardState, Move, Score};

fn arb_move() -> impl Strategy<Value = Move> {
    prop_oneof![
        Just(Move::Up),
        Just(Move::Down),
        Just(Move::Left),
        Just(Move::Right),
    ]
}

/// Square boards of size 1..=6 with small power-of-two values or holes.
fn arb_cells() -> impl Strategy<Value = Vec<u32>> {
    (1usize..=6).prop_flat_map(|size| {
        prop::collection::vec(
            prop_oneof![3 => Just(0u32), 5 => (1u32..=5).prop_map(|e| 1 << e)],
            size * size,
        )
    })
}

proptest! {
    #[test]
    fn tiles_stay_inside_the_board(cells in arb_cells(), mv in arb_move()) {
        let mut board = BoardState::from_values(&cells).unwrap();
        let mut score = Score::default();
        let steps = GameEngine::sweep(&mut board, &mut score, mv);
        for (i, step) in steps.iter().enumerate() {
            prop_assert!(step.to < board.cell_count());
            let (x, y) = board.coords(step.to);
            prop_assert!(x < board.size() && y < board.size());
            // A tile that slid into a cell can be merged into by a later step.
            let owner = match steps[i + 1..].iter().rev().find(|later| later.to == step.to) {
                Some(later) => {
                    prop_assert!(later.is_merge());
                    later.tile
                }
                None => step.tile,
            };
            prop_assert_eq!(board.id_at(step.to), Some(owner));
        }
    }

    #[test]
    fn finished_sweep_conserves_value_and_scores_merges(cells in arb_cells(), mv in arb_move()) {
        let mut board = BoardState::from_values(&cells).unwrap();
        let total_before: u64 = board.values().iter().map(|&v| u64::from(v)).sum();
        let tiles_before = board.tile_count();
        let values_before: HashMap<_, _> = board.tiles().map(|t| (t.id(), t.value())).collect();
        let mut score = Score::default();

        let steps = GameEngine::apply(&mut board, &mut score, mv);
        let merges: Vec<_> = steps.iter().filter(|s| s.is_merge()).collect();

        // Each merge creates a tile worth twice the absorbed one; the score
        // gains the absorbed value, i.e. half of what was created.
        let mut created = 0u64;
        for step in &merges {
            let absorbed = values_before[&step.absorbed.unwrap()];
            let survivor = board.tile(step.tile).unwrap().value();
            prop_assert_eq!(values_before[&step.tile], absorbed);
            prop_assert_eq!(survivor, absorbed * 2);
            created += u64::from(survivor);
        }

        let total_after: u64 = board.values().iter().map(|&v| u64::from(v)).sum();
        prop_assert_eq!(total_before, total_after);
        prop_assert_eq!(board.tile_count(), tiles_before - merges.len());
        prop_assert_eq!(score.value() * 2, created);
        prop_assert!(board.is_settled());
    }

    #[test]
    fn empty_sweep_is_a_no_op(cells in arb_cells(), mv in arb_move()) {
        let mut board = BoardState::from_values(&cells).unwrap();
        let before = board.values();
        let movable = GameEngine::can_move(&board, mv);
        let mut score = Score::default();
        let steps = GameEngine::sweep(&mut board, &mut score, mv);
        prop_assert_eq!(steps.is_empty(), !movable);
        if steps.is_empty() {
            prop_assert_eq!(board.values(), before);
            prop_assert_eq!(score.value(), 0);
        } else {
            prop_assert!(steps.iter().all(|s| s.from != s.to));
        }
    }

    #[test]
    fn each_tile_merges_at_most_once(cells in arb_cells(), mv in arb_move()) {
        let mut board = BoardState::from_values(&cells).unwrap();
        let mut score = Score::default();
        let steps = GameEngine::sweep(&mut board, &mut score, mv);
        let mut seen = HashSet::new();
        for step in steps.iter().filter(|s| s.is_merge()) {
            prop_assert!(seen.insert(step.tile));
            prop_assert!(seen.insert(step.absorbed.unwrap()));
        }
        let moved: HashSet<_> = steps.iter().map(|s| s.tile).collect();
        prop_assert_eq!(moved.len(), steps.len());
    }
}

#[test]
fn three_in_a_row_merges_one_pair() {
    for (mv, expected) in [
        (Move::Right, vec![0, 2, 4]),
        (Move::Left, vec![4, 2, 0]),
    ] {
        let mut board = BoardState::from_values(&[2, 2, 2, 0, 0, 0, 0, 0, 0]).unwrap();
        let mut score = Score::default();
        GameEngine::apply(&mut board, &mut score, mv);
        assert_eq!(&board.values()[..3], expected.as_slice());
        assert_eq!(score.value(), 2);
    }
}
