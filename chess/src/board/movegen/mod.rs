/******************************************\
|==========================================|
|         Module import and exports        |
|==========================================|
\******************************************/

pub mod r#gen;
pub mod lookup;
pub mod magic;
pub mod move_list;

pub(crate) use r#gen::generate_moves;
pub use lookup::{
    attacks, bishop_attacks, king_attack, knight_attack, pawn_attack, queen_attacks, rook_attacks,
};
pub use magic::{
    find_magic_number, init_attack_tables, BISHOP_MAGIC_NUMBERS, BISHOP_RELEVANT_BITS,
    ROOK_MAGIC_NUMBERS, ROOK_RELEVANT_BITS,
};
pub use move_list::MoveList;

use super::Board;

impl Board {
    /// Appends every pseudo-legal move for the side to move onto `move_list`.
    /// Legality (king left in check) is confirmed by `make_move`.
    #[inline]
    pub fn generate_moves(&self, move_list: &mut MoveList) {
        generate_moves(self, move_list);
    }
}
