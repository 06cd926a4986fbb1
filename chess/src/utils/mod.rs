pub mod perft;
pub mod prng;

pub use perft::{divide, perft, perft_bench};
pub use prng::Prng32;
