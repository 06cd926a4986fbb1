//! FEN (Forsyth-Edwards Notation) parsing for the `Board`. The parser sets
//! the piece bitboards, occupancies, side to move, en-passant square and
//! castling rights, seeds the Zobrist key, and clears the state-history
//! stack. The halfmove/fullmove clocks are validated but not modelled by
//! this core.

use thiserror::Error;

use super::{Board, BOTH};
use crate::core::*;

/******************************************\
|==========================================|
|            Useful fen strings            |
|==========================================|
\******************************************/

/// The standard starting position.
pub const START_FEN: &str = "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1";
/// "Kiwipete", the classic move-generator torture position.
pub const TRICKY_FEN: &str = "r3k2r/p1ppqpb1/bn2pnp1/3PN3/1p2P3/2N2Q1p/PPPBBPPP/R3K2R w KQkq - 0 1";

/******************************************\
|==========================================|
|                Parse Fen                 |
|==========================================|
\******************************************/

impl Board {
    pub const FEN_SECTIONS: usize = 6;

    /// Resets the board to the position described by `fen`.
    ///
    /// ## Errors
    /// Returns `FenParseError` if the string does not have six fields, any
    /// field is malformed, the en-passant square is on an impossible rank,
    /// or either side does not have exactly one king.
    pub fn set(&mut self, fen: &str) -> Result<(), FenParseError> {
        let parts: Vec<&str> = fen.split_whitespace().take(Self::FEN_SECTIONS).collect();

        if parts.len() != Self::FEN_SECTIONS {
            return Err(FenParseError::InvalidNumberOfFields);
        }

        *self = Board::new();

        // --- 1. Piece placement ---
        //
        // FEN reads rank 8 to rank 1, file a to file h: exactly the order of
        // square indices in this orientation.

        let mut file: u8 = 0;
        let mut row: u8 = 0;

        for token in parts[0].chars() {
            match token {
                '/' => {
                    if file != 8 {
                        return Err(FenParseError::InvalidRankFormat(
                            "rank ended prematurely before '/'".to_string(),
                        ));
                    }
                    if row == 7 {
                        return Err(FenParseError::InvalidRankFormat(
                            "too many rank separators".to_string(),
                        ));
                    }

                    file = 0;
                    row += 1;
                }
                '1'..='8' => {
                    file += token.to_digit(10).unwrap() as u8;
                    if file > 8 {
                        return Err(FenParseError::InvalidRankFormat(format!(
                            "skip digit '{token}' runs past file h"
                        )));
                    }
                }
                _ => {
                    if file >= 8 {
                        return Err(FenParseError::InvalidRankFormat(format!(
                            "piece '{token}' placed beyond file h"
                        )));
                    }

                    let square = Square::from_unchecked(row * 8 + file);
                    let piece = token
                        .to_string()
                        .parse::<Piece>()
                        .map_err(|_| FenParseError::InvalidPiecePlacementChar(token))?;
                    self.add_piece(piece, square);
                    file += 1;
                }
            }
        }

        if file != 8 || row != 7 {
            return Err(FenParseError::InvalidRankFormat(
                "placement does not cover all 64 squares".to_string(),
            ));
        }

        for colour in Colour::iter() {
            if !self.piece_type_bb(colour, PieceType::King).is_singleton() {
                return Err(FenParseError::InvalidKingCount);
            }
        }

        // --- 2. Side to move ---
        match parts[1] {
            "w" => self.stm = Colour::White,
            "b" => self.stm = Colour::Black,
            _ => return Err(FenParseError::InvalidSideToMove(parts[1].to_string())),
        };

        // --- 3. Castling rights ---
        self.castle = parse_castling(parts[2])?;

        // --- 4. En passant square ---
        match parts[3] {
            "-" => self.enpassant = None,
            _ => {
                let ep_sq: Square = parts[3]
                    .parse()
                    .map_err(|_| FenParseError::InvalidEnPassantSquare(parts[3].to_string()))?;

                // rank 6 with White to move, rank 3 with Black to move
                let expected = match self.stm {
                    Colour::White => Rank::Rank6,
                    Colour::Black => Rank::Rank3,
                };
                if ep_sq.rank() != expected {
                    return Err(FenParseError::InvalidEnPassantSquare(format!(
                        "{ep_sq} is not on the en-passant rank for the side to move"
                    )));
                }

                self.enpassant = Some(ep_sq);
            }
        }

        // --- 5./6. Clocks: validated, not modelled ---
        parts[4]
            .parse::<u32>()
            .map_err(|_| FenParseError::InvalidHalfmoveClock(parts[4].to_string()))?;

        let full_move: u32 = parts[5]
            .parse()
            .map_err(|_| FenParseError::InvalidFullmoveNumber(parts[5].to_string()))?;
        if full_move == 0 {
            return Err(FenParseError::InvalidFullmoveNumber(parts[5].to_string()));
        }

        self.occupancies[BOTH] =
            self.occupied_bb(Colour::White) | self.occupied_bb(Colour::Black);

        self.key = self.calc_key();
        self.history.clear();

        Ok(())
    }

    /// Creates a board from a FEN string.
    ///
    /// ## Examples
    ///
    /// ```
    /// use chess::board::{Board, START_FEN};
    /// use chess::core::{Colour, Square, Piece};
    ///
    /// let board = Board::from_fen(START_FEN).unwrap();
    /// assert_eq!(board.stm(), Colour::White);
    /// assert_eq!(board.on(Square::D8), Some(Piece::BlackQueen));
    /// ```
    pub fn from_fen(fen: &str) -> Result<Self, FenParseError> {
        let mut board = Board::new();
        board.set(fen)?;
        Ok(board)
    }
}

fn parse_castling(field: &str) -> Result<Castling, FenParseError> {
    if field == "-" {
        return Ok(Castling::NONE);
    }

    if field.is_empty() || field.len() > 4 {
        return Err(FenParseError::InvalidCastlingRights(field.to_string()));
    }

    let mut castle = Castling::NONE;
    for c in field.chars() {
        let right = match c {
            'K' => Castling::WK,
            'Q' => Castling::WQ,
            'k' => Castling::BK,
            'q' => Castling::BQ,
            _ => return Err(FenParseError::InvalidCastlingRights(field.to_string())),
        };

        if castle.has(right) {
            return Err(FenParseError::InvalidCastlingRights(field.to_string()));
        }
        castle.set(right);
    }

    Ok(castle)
}

/******************************************\
|==========================================|
|             Fen Parse Error              |
|==========================================|
\******************************************/

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FenParseError {
    #[error("FEN must have exactly 6 whitespace-separated fields")]
    InvalidNumberOfFields,
    #[error("Invalid rank format: {0}")]
    InvalidRankFormat(String),
    #[error("Invalid piece placement character: '{0}'")]
    InvalidPiecePlacementChar(char),
    #[error("Each side must have exactly one king")]
    InvalidKingCount,
    #[error("Invalid side to move: '{0}', expected 'w' or 'b'")]
    InvalidSideToMove(String),
    #[error("Invalid castling rights: '{0}'")]
    InvalidCastlingRights(String),
    #[error("Invalid en passant square: '{0}'")]
    InvalidEnPassantSquare(String),
    #[error("Invalid halfmove clock: '{0}'")]
    InvalidHalfmoveClock(String),
    #[error("Invalid fullmove number: '{0}'")]
    InvalidFullmoveNumber(String),
}

/******************************************\
|==========================================|
|                Unit Tests                |
|==========================================|
\******************************************/
