pub mod board;
pub mod error;
pub mod game_state;
pub mod move_gen;
pub mod perft;
pub mod sfen;
pub mod types;

pub use board::*;
pub use error::{DropViolation, EngineResult, Rejection};
pub use game_state::*;
pub use move_gen::*;
pub use perft::{perft, perft_detailed, perft_divide, PerftResults};
pub use sfen::{positions, SfenError};
pub use types::*;
