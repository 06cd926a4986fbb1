//! Pseudo-legal move generation.
//!
//! The generator enumerates every move that is legal in all respects except
//! that it may leave the mover's king in check; `Board::make_move` performs
//! that final test and rejects atomically. Iteration order is pawns, then
//! knights, bishops, rooks, queens, king, lsb-first within each piece
//! bitboard, with castling emitted last. The order is observable (it feeds
//! move ordering) but carries no semantics.

use super::lookup::{attacks, pawn_attack};
use super::move_list::MoveList;
use crate::board::Board;
use crate::core::*;

/// Promotion candidates, tried queen-first.
const PROMO_TYPES: [PieceType; 4] = [
    PieceType::Queen,
    PieceType::Rook,
    PieceType::Bishop,
    PieceType::Knight,
];

#[inline]
fn add_promo_moves(
    from: Square,
    to: Square,
    pawn: Piece,
    flag: MoveFlag,
    move_list: &mut MoveList,
) {
    let us = pawn.colour();
    for pt in PROMO_TYPES {
        let promo = Piece::from_parts(us, pt);
        move_list.add_move(Move::new(from, to, pawn, Some(promo), flag));
    }
}

/******************************************\
|==========================================|
|              Move Generation             |
|==========================================|
\******************************************/

pub(crate) fn generate_moves(board: &Board, move_list: &mut MoveList) {
    gen_pawn_moves(board, move_list);

    gen_piece_moves(board, PieceType::Knight, move_list);
    gen_piece_moves(board, PieceType::Bishop, move_list);
    gen_piece_moves(board, PieceType::Rook, move_list);
    gen_piece_moves(board, PieceType::Queen, move_list);
    gen_piece_moves(board, PieceType::King, move_list);

    gen_castling_moves(board, move_list);
}

/// Pawn pushes, double pushes, captures, promotions and en passant for the
/// side to move.
fn gen_pawn_moves(board: &Board, move_list: &mut MoveList) {
    let us = board.stm();
    let them = !us;

    let pawn = Piece::from_parts(us, PieceType::Pawn);
    let forward = us.forward();

    let empty = !board.all_occupied_bb();
    let enemy = board.occupied_bb(them);
    let start_rank = Bitboard::push_rank(us);
    let promo_rank = Bitboard::promo_rank(us);

    board.piece_bb(pawn).for_each(|from| {
        // single push, promoting from the rank before the back rank
        if let Ok(to) = from.add(forward) {
            if empty.contains(to) {
                if promo_rank.contains(from) {
                    add_promo_moves(from, to, pawn, MoveFlag::QUIET, move_list);
                } else {
                    move_list.add_move(Move::new(from, to, pawn, None, MoveFlag::QUIET));

                    // double push from the starting rank through an empty square
                    if start_rank.contains(from) {
                        let to2 = unsafe { from.add_unchecked(us.double_forward()) };
                        if empty.contains(to2) {
                            move_list.add_move(Move::new(
                                from,
                                to2,
                                pawn,
                                None,
                                MoveFlag::DOUBLE_PUSH,
                            ));
                        }
                    }
                }
            }
        }

        // captures
        (pawn_attack(us, from) & enemy).for_each(|to| {
            if promo_rank.contains(from) {
                add_promo_moves(from, to, pawn, MoveFlag::CAPTURE, move_list);
            } else {
                move_list.add_move(Move::new(from, to, pawn, None, MoveFlag::CAPTURE));
            }
        });

        // en passant
        if let Some(ep_sq) = board.ep() {
            if pawn_attack(us, from).contains(ep_sq) {
                move_list.add_move(Move::new(from, ep_sq, pawn, None, MoveFlag::EN_PASSANT));
            }
        }
    });
}

/// Moves of every non-pawn piece of the given type: mask own occupancy out of
/// the attack set, then emit quiet moves and captures.
fn gen_piece_moves(board: &Board, pt: PieceType, move_list: &mut MoveList) {
    let us = board.stm();
    let them = !us;

    let piece = Piece::from_parts(us, pt);
    let enemy = board.occupied_bb(them);
    let all_occ = board.all_occupied_bb();

    board.piece_bb(piece).for_each(|from| {
        let dest = attacks(us, pt, from, all_occ) & !board.occupied_bb(us);

        dest.for_each(|to| {
            let flag = if enemy.contains(to) {
                MoveFlag::CAPTURE
            } else {
                MoveFlag::QUIET
            };
            move_list.add_move(Move::new(from, to, piece, None, flag));
        });
    });
}

/// Castling for the side to move: the right must remain, the squares between
/// king and rook must be empty, and neither the king square nor the two
/// squares the king crosses may be attacked.
fn gen_castling_moves(board: &Board, move_list: &mut MoveList) {
    use Square::*;

    let us = board.stm();
    let them = !us;
    let occ = board.all_occupied_bb();

    match us {
        Colour::White => {
            let king = Piece::WhiteKing;

            if board.castling().has(Castling::WK)
                && !occ.contains(F1)
                && !occ.contains(G1)
                && !board.is_square_attacked(E1, them)
                && !board.is_square_attacked(F1, them)
                && !board.is_square_attacked(G1, them)
            {
                move_list.add_move(Move::new(E1, G1, king, None, MoveFlag::CASTLE));
            }

            if board.castling().has(Castling::WQ)
                && !occ.contains(B1)
                && !occ.contains(C1)
                && !occ.contains(D1)
                && !board.is_square_attacked(E1, them)
                && !board.is_square_attacked(D1, them)
                && !board.is_square_attacked(C1, them)
            {
                move_list.add_move(Move::new(E1, C1, king, None, MoveFlag::CASTLE));
            }
        }
        Colour::Black => {
            let king = Piece::BlackKing;

            if board.castling().has(Castling::BK)
                && !occ.contains(F8)
                && !occ.contains(G8)
                && !board.is_square_attacked(E8, them)
                && !board.is_square_attacked(F8, them)
                && !board.is_square_attacked(G8, them)
            {
                move_list.add_move(Move::new(E8, G8, king, None, MoveFlag::CASTLE));
            }

            if board.castling().has(Castling::BQ)
                && !occ.contains(B8)
                && !occ.contains(C8)
                && !occ.contains(D8)
                && !board.is_square_attacked(E8, them)
                && !board.is_square_attacked(D8, them)
                && !board.is_square_attacked(C8, them)
            {
                move_list.add_move(Move::new(E8, C8, king, None, MoveFlag::CASTLE));
            }
        }
    }
}

/******************************************\
|==========================================|
|                Unit Tests                |
|==========================================|
\******************************************/
