//! Search scaffolding for the Riposte engine: the state an alpha-beta
//! driver owns (killers, history, principal-variation table, node counter)
//! and the move-ordering policy that consumes it.
pub mod movepick;
pub mod search;

pub use movepick::*;
pub use search::*;
