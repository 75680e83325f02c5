use crate::config::StrategyKind;
use rand::seq::SliceRandom;
use rand::Rng;
use twenty48_core::engine::{self as GameEngine, BoardState, Move, Score};

const CORNER_ORDER: [Move; 4] = [Move::Down, Move::Left, Move::Right, Move::Up];

/// Directions that would change `board`, in `Move::ALL` order.
pub(crate) fn legal_moves(board: &BoardState) -> Vec<Move> {
    Move::ALL
        .into_iter()
        .filter(|&mv| GameEngine::can_move(board, mv))
        .collect()
}

/// Pick the next direction, or `None` when nothing can move.
pub(crate) fn select_move<R: Rng + ?Sized>(kind: StrategyKind, board: &BoardState, rng: &mut R) -> Option<Move> {
    match kind {
        StrategyKind::Random => legal_moves(board).choose(rng).copied(),
        StrategyKind::Greedy => select_move_greedy(board, rng),
        StrategyKind::Corner => CORNER_ORDER
            .into_iter()
            .find(|&mv| GameEngine::can_move(board, mv)),
    }
}

fn select_move_greedy<R: Rng + ?Sized>(board: &BoardState, rng: &mut R) -> Option<Move> {
    let mut best: Vec<Move> = Vec::with_capacity(4);
    let mut best_gain = 0u64;
    for mv in legal_moves(board) {
        let mut preview = board.clone();
        let mut score = Score::default();
        GameEngine::apply(&mut preview, &mut score, mv);
        let gain = score.value();
        if best.is_empty() || gain > best_gain {
            best_gain = gain;
            best.clear();
            best.push(mv);
        } else if gain == best_gain {
            best.push(mv);
        }
    }
    best.choose(rng).copied()
}
