//! Zobrist hashing. The key table is built at compile time from the crate
//! PRNG; the board maintains its key incrementally on the same events as the
//! piece/state mutations and restores it from the state-history stack on
//! unmake.

use super::Board;
use crate::core::*;
use crate::utils::Prng32;

/// A 64-bit Zobrist key.
pub type Key = u64;

/******************************************\
|==========================================|
|              Zobrist Table               |
|==========================================|
\******************************************/

#[derive(Debug)]
pub struct ZobristTable {
    /// Keys for each piece on each square.
    pub pieces: [[Key; Square::NUM]; Piece::NUM],
    /// XOR-ed in when Black is to move.
    pub side_to_move: Key,
    /// Keys for each castling-rights mask.
    pub castling: [Key; Castling::NUM],
    /// Keys for each en-passant file.
    pub enpassant: [Key; File::NUM],
}

pub const ZOBRIST: ZobristTable = init_zobrist_table();

const ZOBRIST_SEED: u32 = 0x5EED_1E55;

const fn init_zobrist_table() -> ZobristTable {
    let mut rng = Prng32::new(ZOBRIST_SEED);

    let mut pieces = [[0; Square::NUM]; Piece::NUM];
    let mut castling = [0; Castling::NUM];
    let mut enpassant = [0; File::NUM];

    let mut i = 0;
    while i < Piece::NUM {
        let mut j = 0;
        while j < Square::NUM {
            pieces[i][j] = rng.rand_u64();
            j += 1;
        }
        i += 1;
    }

    let mut i = 0;
    while i < Castling::NUM {
        castling[i] = rng.rand_u64();
        i += 1;
    }

    let mut i = 0;
    while i < File::NUM {
        enpassant[i] = rng.rand_u64();
        i += 1;
    }

    ZobristTable {
        pieces,
        side_to_move: rng.rand_u64(),
        castling,
        enpassant,
    }
}

/******************************************\
|==========================================|
|               Key Lookups                |
|==========================================|
\******************************************/

#[inline]
pub fn piece_key(piece: Piece, sq: Square) -> Key {
    ZOBRIST.pieces[piece.index()][sq.index()]
}

#[inline]
pub fn castle_key(castle: Castling) -> Key {
    ZOBRIST.castling[castle.0 as usize]
}

#[inline]
pub fn ep_key(file: File) -> Key {
    ZOBRIST.enpassant[file.index()]
}

#[inline]
pub fn side_key() -> Key {
    ZOBRIST.side_to_move
}

/******************************************\
|==========================================|
|              Full Recompute              |
|==========================================|
\******************************************/

impl Board {
    /// Recomputes the Zobrist key from scratch. Setup code seeds the
    /// incremental key with this; tests use it to validate every make.
    pub fn calc_key(&self) -> Key {
        let mut key = 0;

        for piece in Piece::iter() {
            self.piece_bb(piece).for_each(|sq| {
                key ^= piece_key(piece, sq);
            });
        }

        if let Some(ep_sq) = self.ep() {
            key ^= ep_key(ep_sq.file());
        }

        key ^= castle_key(self.castling());

        if self.stm() == Colour::Black {
            key ^= side_key();
        }

        key
    }
}

/******************************************\
|==========================================|
|                Unit Tests                |
|==========================================|
\******************************************/
