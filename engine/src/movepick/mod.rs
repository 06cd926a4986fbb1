//! Move ordering.
//!
//! Scoring policy, in priority buckets:
//!
//! 1. the PV move for the current ply (one-shot, while PV scoring is armed)
//! 2. captures, by MVV/LVA
//! 3. quiet promotions
//! 4. first killer, second killer
//! 5. history score

use chess::board::{Board, MoveList, MAX_MOVES};
use chess::core::{Move, Piece, PieceType};

use crate::search::SearchState;

/******************************************\
|==========================================|
|             Score Constants              |
|==========================================|
\******************************************/

pub const SCORE_PV: i32 = 20000;

pub const SCORE_CAPTURE_BASE: i32 = 10000;

pub const SCORE_PROMO_QUIET: i32 = 10000;

pub const SCORE_KILLER_1: i32 = 9000;

pub const SCORE_KILLER_2: i32 = 8000;

/******************************************\
|==========================================|
|                 MVV/LVA                  |
|==========================================|
\******************************************/

// [attacker][victim], indexed by Piece. Arranged so that the most valuable
// victim dominates and the least valuable attacker breaks ties:
// pawn-takes-queen (505) beats queen-takes-pawn (101).
#[rustfmt::skip]
pub const MVV_LVA: [[i32; Piece::NUM]; Piece::NUM] = [
    [105, 205, 305, 405, 505, 605,  105, 205, 305, 405, 505, 605],
    [104, 204, 304, 404, 504, 604,  104, 204, 304, 404, 504, 604],
    [103, 203, 303, 403, 503, 603,  103, 203, 303, 403, 503, 603],
    [102, 202, 302, 402, 502, 602,  102, 202, 302, 402, 502, 602],
    [101, 201, 301, 401, 501, 601,  101, 201, 301, 401, 501, 601],
    [100, 200, 300, 400, 500, 600,  100, 200, 300, 400, 500, 600],

    [105, 205, 305, 405, 505, 605,  105, 205, 305, 405, 505, 605],
    [104, 204, 304, 404, 504, 604,  104, 204, 304, 404, 504, 604],
    [103, 203, 303, 403, 503, 603,  103, 203, 303, 403, 503, 603],
    [102, 202, 302, 402, 502, 602,  102, 202, 302, 402, 502, 602],
    [101, 201, 301, 401, 501, 601,  101, 201, 301, 401, 501, 601],
    [100, 200, 300, 400, 500, 600,  100, 200, 300, 400, 500, 600],
];

/******************************************\
|==========================================|
|               Move Scoring               |
|==========================================|
\******************************************/

/// Scores a single move for ordering. Consumes the one-shot PV-scoring flag
/// when the PV move comes through.
pub fn score_move(state: &mut SearchState, board: &Board, m: Move) -> i32 {
    if state.score_pv && state.pv_move() == m {
        state.score_pv = false;
        return SCORE_PV;
    }

    if m.is_capture() {
        // Find the victim on the target square. The default covers en
        // passant, where the victim pawn is not on the target.
        let them = !board.stm();
        let mut victim = Piece::from_parts(them, PieceType::Pawn);

        for pt in PieceType::iter() {
            let candidate = Piece::from_parts(them, pt);
            if board.piece_bb(candidate).contains(m.to()) {
                victim = candidate;
                break;
            }
        }

        return SCORE_CAPTURE_BASE + MVV_LVA[m.piece().index()][victim.index()];
    }

    if m.promotion().is_some() {
        return SCORE_PROMO_QUIET;
    }

    if state.killers[0][state.ply] == m {
        return SCORE_KILLER_1;
    }

    if state.killers[1][state.ply] == m {
        return SCORE_KILLER_2;
    }

    state.history[m.piece().index()][m.to().index()]
}

/// Sorts `move_list` in place, descending by [`score_move`].
pub fn sort_moves(state: &mut SearchState, board: &Board, move_list: &mut MoveList) {
    let mut scores = [0i32; MAX_MOVES];

    for i in 0..move_list.len() {
        scores[i] = score_move(state, board, move_list[i]);
    }

    for i in 1..move_list.len() {
        let mut j = i;
        while j > 0 && scores[j - 1] < scores[j] {
            scores.swap(j, j - 1);
            move_list.swap(j, j - 1);
            j -= 1;
        }
    }
}

/******************************************\
|==========================================|
|                Unit Tests                |
|==========================================|
\******************************************/
