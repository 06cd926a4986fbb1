//! Make and unmake. `make_move` mutates the position incrementally, pushes a
//! state-history entry, and atomically rejects moves that leave the mover's
//! king in check; `undo_move` restores the previous state bit-exactly.

use super::zobrist::{castle_key, ep_key, piece_key, side_key};
use super::{Board, State, BOTH};
use crate::core::*;

/******************************************\
|==========================================|
|                Move Kinds                |
|==========================================|
\******************************************/

/// Filter for `make_move`: under `CapturesOnly` a non-capture is rejected
/// with no state change. `All` is the standard flag.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MoveKind {
    All,
    CapturesOnly,
}

/******************************************\
|==========================================|
|          Castling Rights Table           |
|==========================================|
\******************************************/

// Per-square masks AND-ed into the rights when a move touches the square.
// a8 clears black O-O-O, e8 both black rights, h8 black O-O; mirrored on
// rank 1 for White; every other square keeps all rights.
#[rustfmt::skip]
pub(crate) const CASTLING_RIGHTS: [u8; Square::NUM] = [
     7, 15, 15, 15,  3, 15, 15, 11,
    15, 15, 15, 15, 15, 15, 15, 15,
    15, 15, 15, 15, 15, 15, 15, 15,
    15, 15, 15, 15, 15, 15, 15, 15,
    15, 15, 15, 15, 15, 15, 15, 15,
    15, 15, 15, 15, 15, 15, 15, 15,
    15, 15, 15, 15, 15, 15, 15, 15,
    13, 15, 15, 15, 12, 15, 15, 14,
];

/******************************************\
|==========================================|
|              Piece Movement              |
|==========================================|
\******************************************/

impl Board {
    #[inline]
    pub(crate) fn add_piece(&mut self, piece: Piece, square: Square) {
        // the combined occupancy is stale inside make; check the colour
        // occupancies, which are maintained incrementally
        debug_assert!(
            !(self.occupied_bb(Colour::White) | self.occupied_bb(Colour::Black)).contains(square)
        );

        self.bitboards[piece.index()].set(square);
        self.occupancies[piece.colour().index()].set(square);
    }

    #[inline]
    pub(crate) fn remove_piece(&mut self, piece: Piece, square: Square) {
        debug_assert!(self.piece_bb(piece).contains(square));

        self.bitboards[piece.index()].clear(square);
        self.occupancies[piece.colour().index()].clear(square);
    }

    #[inline]
    pub(crate) fn move_piece(&mut self, piece: Piece, from: Square, to: Square) {
        debug_assert!(self.piece_bb(piece).contains(from));

        self.bitboards[piece.index()].clear(from);
        self.bitboards[piece.index()].set(to);

        self.occupancies[piece.colour().index()].clear(from);
        self.occupancies[piece.colour().index()].set(to);
    }

    /******************************************\
    |==========================================|
    |                   Make                   |
    |==========================================|
    \******************************************/

    /// Makes `m` on the board. Returns `false` and leaves the position
    /// unchanged if the move is illegal (leaves the mover's king in check)
    /// or if `kind` is `CapturesOnly` and `m` is not a capture.
    pub fn make_move(&mut self, m: Move, kind: MoveKind) -> bool {
        if kind == MoveKind::CapturesOnly && !m.is_capture() {
            return false;
        }

        self.history.push(State {
            captured: None,
            enpassant: self.enpassant,
            castle: self.castle,
            key: self.key,
        });

        let from = m.from();
        let to = m.to();
        let piece = m.piece();
        let us = self.stm;
        let them = !us;

        debug_assert!(piece.colour() == us, "moving piece must belong to the mover");

        // move the piece from source to target
        self.move_piece(piece, from, to);
        self.key ^= piece_key(piece, from) ^ piece_key(piece, to);

        // remove the captured piece, if any
        if m.is_en_passant() {
            // the victim sits behind the target square
            let cap_sq = unsafe { to.add_unchecked(us.backward()) };
            let captured = Piece::from_parts(them, PieceType::Pawn);

            self.remove_piece(captured, cap_sq);
            self.key ^= piece_key(captured, cap_sq);
            self.history.last_mut().unwrap().captured = Some(captured);
        } else if m.is_capture() {
            // scan the opponent's six piece bitboards for a bit on the target
            for pt in PieceType::iter() {
                let candidate = Piece::from_parts(them, pt);
                if self.piece_bb(candidate).contains(to) {
                    self.remove_piece(candidate, to);
                    self.key ^= piece_key(candidate, to);
                    self.history.last_mut().unwrap().captured = Some(candidate);
                    break;
                }
            }
        }

        // swap the pawn for the promoted piece
        if let Some(promo) = m.promotion() {
            debug_assert!(piece.pt() == PieceType::Pawn);

            self.remove_piece(piece, to);
            self.add_piece(promo, to);
            self.key ^= piece_key(piece, to) ^ piece_key(promo, to);
        }

        // the en-passant window closes after every move
        if let Some(ep_sq) = self.enpassant.take() {
            self.key ^= ep_key(ep_sq.file());
        }

        // a double push opens a new one behind the pawn
        if m.is_double_push() {
            let ep_sq = unsafe { to.add_unchecked(us.backward()) };
            self.enpassant = Some(ep_sq);
            self.key ^= ep_key(ep_sq.file());
        }

        // castling also moves the rook; the target square names the variant
        if m.is_castle() {
            use Square::*;

            let rook = Piece::from_parts(us, PieceType::Rook);
            let (rook_from, rook_to) = match to {
                G1 => (H1, F1),
                C1 => (A1, D1),
                G8 => (H8, F8),
                C8 => (A8, D8),
                _ => unreachable!(),
            };

            self.move_piece(rook, rook_from, rook_to);
            self.key ^= piece_key(rook, rook_from) ^ piece_key(rook, rook_to);
        }

        // castling rights only ever lose bits here
        self.key ^= castle_key(self.castle);
        self.castle
            .mask(Castling(CASTLING_RIGHTS[from.index()] & CASTLING_RIGHTS[to.index()]));
        self.key ^= castle_key(self.castle);

        self.occupancies[BOTH] =
            self.occupied_bb(Colour::White) | self.occupied_bb(Colour::Black);

        self.stm = them;
        self.key ^= side_key();

        // the mover may not leave their own king in check
        if self.is_square_attacked(self.ksq(us), self.stm) {
            self.undo_move(m);
            return false;
        }

        true
    }

    /******************************************\
    |==========================================|
    |                  Unmake                  |
    |==========================================|
    \******************************************/

    /// Reverses `m` using the top of the state-history stack. Calling it
    /// without a matching `make_move` is a precondition violation.
    pub fn undo_move(&mut self, m: Move) {
        self.stm = !self.stm;

        let from = m.from();
        let to = m.to();
        let piece = m.piece();
        let us = self.stm;

        let st = self.history.pop().unwrap();

        if let Some(promo) = m.promotion() {
            // take the promoted piece off and put the pawn back
            self.remove_piece(promo, to);
            self.add_piece(Piece::from_parts(us, PieceType::Pawn), from);
        } else if m.is_castle() {
            use Square::*;

            self.move_piece(piece, to, from);

            let rook = Piece::from_parts(us, PieceType::Rook);
            match to {
                G1 => self.move_piece(rook, F1, H1),
                C1 => self.move_piece(rook, D1, A1),
                G8 => self.move_piece(rook, F8, H8),
                C8 => self.move_piece(rook, D8, A8),
                _ => unreachable!(),
            }
        } else {
            self.move_piece(piece, to, from);
        }

        if let Some(captured) = st.captured {
            let cap_sq = if m.is_en_passant() {
                unsafe { to.add_unchecked(us.backward()) }
            } else {
                to
            };
            self.add_piece(captured, cap_sq);
        }

        self.occupancies[BOTH] =
            self.occupied_bb(Colour::White) | self.occupied_bb(Colour::Black);

        self.enpassant = st.enpassant;
        self.castle = st.castle;
        self.key = st.key;
    }
}

/******************************************\
|==========================================|
|                Unit Tests                |
|==========================================|
\******************************************/

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::fen::START_FEN;

    fn board_from(fen: &str) -> Board {
        let board = Board::from_fen(fen).expect("test FEN should be valid");
        assert_eq!(board.key(), board.calc_key(), "FEN key mismatch for {fen}");
        board
    }

    /// Makes the move, checks the incremental key, unmakes, and checks the
    /// position round-trips bit-exactly.
    fn test_make_undo(fen: &str, m: Move) {
        let mut board = board_from(fen);
        let before = board.clone();

        assert!(board.make_move(m, MoveKind::All), "{m} should be legal");
        assert_ne!(board, before);
        assert_eq!(
            board.key(),
            board.calc_key(),
            "incremental key diverged after {m}"
        );

        board.undo_move(m);
        assert_eq!(board, before, "round-trip failed for {m}");
    }

    #[test]
    fn test_quiet_move() {
        test_make_undo(
            START_FEN,
            Move::new(
                Square::G1,
                Square::F3,
                Piece::WhiteKnight,
                None,
                MoveFlag::QUIET,
            ),
        );
    }

    #[test]
    fn test_double_push_sets_ep() {
        let mut board = board_from(START_FEN);
        let m = Move::new(
            Square::E2,
            Square::E4,
            Piece::WhitePawn,
            None,
            MoveFlag::DOUBLE_PUSH,
        );

        assert!(board.make_move(m, MoveKind::All));
        assert_eq!(board.ep(), Some(Square::E3));
        assert_eq!(board.stm(), Colour::Black);

        board.undo_move(m);
        assert_eq!(board.ep(), None);
        assert_eq!(board.stm(), Colour::White);
    }

    #[test]
    fn test_black_double_push_sets_ep() {
        let mut board = board_from("rnbqkbnr/pppppppp/8/8/4P3/8/PPPP1PPP/RNBQKBNR b KQkq - 0 1");
        let m = Move::new(
            Square::D7,
            Square::D5,
            Piece::BlackPawn,
            None,
            MoveFlag::DOUBLE_PUSH,
        );

        assert!(board.make_move(m, MoveKind::All));
        assert_eq!(board.ep(), Some(Square::D6));
    }

    #[test]
    fn test_capture() {
        test_make_undo(
            "rnbqkbnr/ppp1pppp/8/3p4/4P3/8/PPPP1PPP/RNBQKBNR w KQkq d6 0 2",
            Move::new(
                Square::E4,
                Square::D5,
                Piece::WhitePawn,
                None,
                MoveFlag::CAPTURE,
            ),
        );
    }

    #[test]
    fn test_en_passant_capture_removes_one_pawn() {
        let mut board = board_from("rnbqkbnr/ppp1pppp/8/3pP3/8/8/PPPP1PPP/RNBQKBNR w KQkq d6 0 3");
        let before = board.clone();
        let m = Move::new(
            Square::E5,
            Square::D6,
            Piece::WhitePawn,
            None,
            MoveFlag::EN_PASSANT,
        );

        assert!(board.make_move(m, MoveKind::All));
        // captor landed on d6, victim vanished from d5
        assert_eq!(board.on(Square::D6), Some(Piece::WhitePawn));
        assert_eq!(board.on(Square::D5), None);
        assert_eq!(board.piece_bb(Piece::BlackPawn).count_bits(), 7);

        board.undo_move(m);
        assert_eq!(board, before);
    }

    #[test]
    fn test_black_en_passant_capture() {
        test_make_undo(
            "rnbqkbnr/ppppp1pp/8/8/4Pp2/8/PPPP1PPP/RNBQKBNR b KQkq e3 0 2",
            Move::new(
                Square::F4,
                Square::E3,
                Piece::BlackPawn,
                None,
                MoveFlag::EN_PASSANT,
            ),
        );
    }

    #[test]
    fn test_promotions() {
        test_make_undo(
            "r1bqkbnr/pPpppppp/8/8/8/8/1PPPPPPP/RNBQKBNR w KQkq - 0 6",
            Move::new(
                Square::B7,
                Square::B8,
                Piece::WhitePawn,
                Some(Piece::WhiteQueen),
                MoveFlag::QUIET,
            ),
        );

        test_make_undo(
            "r1bqkbnr/pPpppppp/8/8/8/8/1PPPPPPP/RNBQKBNR w KQkq - 0 6",
            Move::new(
                Square::B7,
                Square::A8,
                Piece::WhitePawn,
                Some(Piece::WhiteKnight),
                MoveFlag::CAPTURE,
            ),
        );
    }

    #[test]
    fn test_castling_moves_both_pieces() {
        let mut board = board_from("r3k2r/8/8/8/8/8/8/R3K2R w KQkq - 0 1");
        let before = board.clone();
        let m = Move::new(
            Square::E1,
            Square::G1,
            Piece::WhiteKing,
            None,
            MoveFlag::CASTLE,
        );

        assert!(board.make_move(m, MoveKind::All));
        assert_eq!(board.on(Square::G1), Some(Piece::WhiteKing));
        assert_eq!(board.on(Square::F1), Some(Piece::WhiteRook));
        assert_eq!(board.on(Square::H1), None);
        assert!(!board.castling().has(Castling::WHITE_CASTLING));
        assert!(board.castling().has(Castling::BLACK_CASTLING));

        board.undo_move(m);
        assert_eq!(board, before);
    }

    #[test]
    fn test_black_queenside_castle_round_trip() {
        test_make_undo(
            "r3k2r/8/8/8/8/8/8/R3K2R b KQkq - 0 1",
            Move::new(
                Square::E8,
                Square::C8,
                Piece::BlackKing,
                None,
                MoveFlag::CASTLE,
            ),
        );
    }

    #[test]
    fn test_rights_cleared_by_rook_moves_and_captures() {
        let mut board = board_from("r3k2r/8/8/8/8/8/8/R3K2R w KQkq - 0 1");
        let m = Move::new(
            Square::A1,
            Square::A8,
            Piece::WhiteRook,
            None,
            MoveFlag::CAPTURE,
        );

        assert!(board.make_move(m, MoveKind::All));
        // moving from a1 clears white O-O-O, capturing on a8 clears black O-O-O
        assert!(board.castling().has(Castling::WK));
        assert!(!board.castling().has(Castling::WQ));
        assert!(board.castling().has(Castling::BK));
        assert!(!board.castling().has(Castling::BQ));
    }

    #[test]
    fn test_illegal_move_leaves_position_unchanged() {
        // the e-file pawn is pinned by the rook on e8
        let mut board = board_from("3kr3/8/8/8/8/8/4P3/4K3 w - - 0 1");
        let before = board.clone();
        let m = Move::new(
            Square::E2,
            Square::E3,
            Piece::WhitePawn,
            None,
            MoveFlag::QUIET,
        );

        // pawn pushes stay legal here; pin only matters for non-line moves
        assert!(board.make_move(m, MoveKind::All));
        board.undo_move(m);
        assert_eq!(board, before);

        // moving the king adjacent to the enemy king is rejected
        let mut board = board_from("8/8/8/8/8/2k5/8/2K5 w - - 0 1");
        let before = board.clone();
        let m = Move::new(
            Square::C1,
            Square::C2,
            Piece::WhiteKing,
            None,
            MoveFlag::QUIET,
        );

        assert!(!board.make_move(m, MoveKind::All));
        assert_eq!(board, before, "failed make must not change the position");
    }

    #[test]
    fn test_captures_only_filter() {
        let mut board = board_from(START_FEN);
        let before = board.clone();
        let quiet = Move::new(
            Square::E2,
            Square::E3,
            Piece::WhitePawn,
            None,
            MoveFlag::QUIET,
        );

        assert!(!board.make_move(quiet, MoveKind::CapturesOnly));
        assert_eq!(board, before);

        let mut board =
            board_from("rnbqkbnr/ppp1pppp/8/3p4/4P3/8/PPPP1PPP/RNBQKBNR w KQkq d6 0 2");
        let capture = Move::new(
            Square::E4,
            Square::D5,
            Piece::WhitePawn,
            None,
            MoveFlag::CAPTURE,
        );
        assert!(board.make_move(capture, MoveKind::CapturesOnly));
    }

    #[test]
    fn test_history_grows_and_shrinks() {
        let mut board = board_from(START_FEN);
        assert_eq!(board.ply(), 0);

        let m = Move::new(
            Square::G1,
            Square::F3,
            Piece::WhiteKnight,
            None,
            MoveFlag::QUIET,
        );
        board.make_move(m, MoveKind::All);
        assert_eq!(board.ply(), 1);

        board.undo_move(m);
        assert_eq!(board.ply(), 0);
    }
}
