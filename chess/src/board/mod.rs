//! # Module: `board`
//!
//! The position representation and everything that mutates it: twelve piece
//! bitboards plus three occupancies, the side to move, en-passant square and
//! castling rights, a Zobrist key, and the state-history stack that makes
//! unmake exact. Move generation lives in [`movegen`], make/unmake in
//! [`movement`], FEN handling in [`fen`].

pub mod fen;
pub mod movegen;
pub mod movement;
pub mod zobrist;

pub use fen::{FenParseError, START_FEN, TRICKY_FEN};
pub use movegen::{
    attacks, bishop_attacks, init_attack_tables, king_attack, knight_attack, pawn_attack,
    queen_attacks, rook_attacks, MoveList,
};
pub use movement::MoveKind;
pub use zobrist::Key;

use crate::core::*;

/******************************************\
|==========================================|
|                Constants                 |
|==========================================|
\******************************************/

/// Upper bound on the number of moves in any legal chess position.
pub const MAX_MOVES: usize = 256;

/// Index of the combined occupancy in `Board::occupancies`.
pub(crate) const BOTH: usize = 2;

/******************************************\
|==========================================|
|               Board State                |
|==========================================|
\******************************************/

/// One state-history entry. Captures the fields a move destroys
/// irreversibly; everything else is undone arithmetically by `undo_move`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct State {
    /// Piece captured by the move leading away from this state, if any.
    pub(crate) captured: Option<Piece>,
    /// En-passant square before the move.
    pub(crate) enpassant: Option<Square>,
    /// Castling rights before the move.
    pub(crate) castle: Castling,
    /// Zobrist key before the move.
    pub(crate) key: Key,
}

/******************************************\
|==========================================|
|                  Board                   |
|==========================================|
\******************************************/

/// # Chess position
///
/// Invariants after any completed make or unmake:
/// 1. `occupancies[White]` is the union of the six white piece bitboards,
///    likewise for Black, and `occupancies[BOTH]` is their union.
/// 2. No square is set in more than one piece bitboard.
/// 3. Exactly one king of each colour is present.
/// 4. The en-passant square, when set, is on rank 6 with White to move or
///    rank 3 with Black to move.
/// 5. Make only ever clears castling-rights bits; they are set again only by
///    setup or unmake.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Board {
    /// One bitboard per piece kind, indexed by `Piece`.
    pub(crate) bitboards: [Bitboard; Piece::NUM],

    /// White, black and combined occupancy.
    pub(crate) occupancies: [Bitboard; 3],

    /// Side to move.
    pub(crate) stm: Colour,

    /// En-passant target square, if a double push just happened.
    pub(crate) enpassant: Option<Square>,

    /// Remaining castling rights.
    pub(crate) castle: Castling,

    /// Incrementally maintained Zobrist key.
    pub(crate) key: Key,

    /// State-history stack; grows on make, shrinks on unmake.
    pub(crate) history: Vec<State>,
}

/******************************************\
|==========================================|
|           Basic Implementation           |
|==========================================|
\******************************************/

impl Default for Board {
    /// The standard starting position.
    fn default() -> Board {
        let mut board = Board::new();
        board.set(START_FEN).unwrap();
        board
    }
}

impl Board {
    /// An empty board with no rights and White to move.
    pub fn new() -> Board {
        Board {
            bitboards: [Bitboard::EMPTY; Piece::NUM],
            occupancies: [Bitboard::EMPTY; 3],
            stm: Colour::White,
            enpassant: None,
            castle: Castling::NONE,
            key: 0,
            history: Vec::with_capacity(MAX_MOVES),
        }
    }

    /// The bitboard of one piece kind.
    #[inline]
    pub fn piece_bb(&self, piece: Piece) -> Bitboard {
        unsafe { *self.bitboards.get_unchecked(piece.index()) }
    }

    /// The bitboard of a colour/piece-type pair.
    #[inline]
    pub fn piece_type_bb(&self, col: Colour, pt: PieceType) -> Bitboard {
        self.piece_bb(Piece::from_parts(col, pt))
    }

    /// All pieces of one colour.
    #[inline]
    pub fn occupied_bb(&self, colour: Colour) -> Bitboard {
        unsafe { *self.occupancies.get_unchecked(colour.index()) }
    }

    /// All pieces of both colours.
    #[inline]
    pub fn all_occupied_bb(&self) -> Bitboard {
        unsafe { *self.occupancies.get_unchecked(BOTH) }
    }

    /// The piece on `square`, scanning the twelve piece bitboards.
    pub fn on(&self, square: Square) -> Option<Piece> {
        if !self.all_occupied_bb().contains(square) {
            return None;
        }
        Piece::iter().find(|p| self.piece_bb(*p).contains(square))
    }

    /// The side to move.
    #[inline]
    pub fn stm(&self) -> Colour {
        self.stm
    }

    /// The en-passant target square, if any.
    #[inline]
    pub fn ep(&self) -> Option<Square> {
        self.enpassant
    }

    /// The remaining castling rights.
    #[inline]
    pub fn castling(&self) -> Castling {
        self.castle
    }

    /// The Zobrist key of the position.
    #[inline]
    pub fn key(&self) -> Key {
        self.key
    }

    /// Number of plies currently on the state-history stack.
    #[inline]
    pub fn ply(&self) -> usize {
        self.history.len()
    }

    /// The king square of `col`. Exactly one king per side is a position
    /// invariant.
    #[inline]
    pub fn ksq(&self, col: Colour) -> Square {
        let kings = self.piece_type_bb(col, PieceType::King);
        debug_assert!(kings.is_singleton(), "exactly one {col:?} king expected");
        kings.lsb_unchecked()
    }

    /// Whether the side to move's king is attacked.
    #[inline]
    pub fn in_check(&self) -> bool {
        self.is_square_attacked(self.ksq(self.stm), !self.stm)
    }

    /******************************************\
    |==========================================|
    |               Attack Query               |
    |==========================================|
    \******************************************/

    /// True iff any piece of `by` attacks `square` under the current
    /// combined occupancy. Pawns use attack symmetry: a square is attacked
    /// by a white pawn iff the black pawn-attack pattern from that square
    /// intersects the white pawn bitboard. Short-circuits on the first hit.
    pub fn is_square_attacked(&self, square: Square, by: Colour) -> bool {
        if (pawn_attack(!by, square) & self.piece_type_bb(by, PieceType::Pawn)).is_occupied() {
            return true;
        }

        if (knight_attack(square) & self.piece_type_bb(by, PieceType::Knight)).is_occupied() {
            return true;
        }

        if (king_attack(square) & self.piece_type_bb(by, PieceType::King)).is_occupied() {
            return true;
        }

        let occ = self.all_occupied_bb();
        let queens = self.piece_type_bb(by, PieceType::Queen);

        if (bishop_attacks(square, occ) & (self.piece_type_bb(by, PieceType::Bishop) | queens))
            .is_occupied()
        {
            return true;
        }

        if (rook_attacks(square, occ) & (self.piece_type_bb(by, PieceType::Rook) | queens))
            .is_occupied()
        {
            return true;
        }

        false
    }
}

/******************************************\
|==========================================|
|                 Display                  |
|==========================================|
\******************************************/

impl std::fmt::Display for Board {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        const SEPARATOR: &str = "\n     +---+---+---+---+---+---+---+---+";

        writeln!(f, "{}", SEPARATOR)?;

        for rank in Rank::iter() {
            write!(f, " {}   |", rank)?;

            for file in File::iter() {
                let square = Square::from_parts(file, rank);
                let cell = match self.on(square) {
                    Some(piece) => piece.to_string(),
                    None => " ".to_string(),
                };
                write!(f, " {} |", cell)?;
            }

            writeln!(f, "{}", SEPARATOR)?;
        }

        writeln!(f)?;
        writeln!(f, "       A   B   C   D   E   F   G   H")?;
        writeln!(f)?;
        writeln!(f, "Side to move: {:?}", self.stm())?;
        writeln!(f, "Castling: {}", self.castle)?;
        writeln!(
            f,
            "En passant: {}",
            match self.enpassant {
                Some(square) => square.to_string(),
                None => "-".to_string(),
            }
        )?;
        writeln!(f, "Key: {:#018x}", self.key)
    }
}

/******************************************\
|==========================================|
|                Unit Tests                |
|==========================================|
\******************************************/
