//! Rejections returned by the turn engine.
//!
//! Every rejection leaves the game exactly as it was; callers re-prompt.

use crate::types::{PieceKind, Side, Square};

/// Why a drop target is not allowed.
#[derive(Clone, Copy, Debug, Eq, PartialEq, thiserror::Error)]
pub enum DropViolation {
    #[error("the square is occupied")]
    Occupied,

    #[error("the file already holds an unpromoted pawn of the same side")]
    SecondPawnOnFile,

    #[error("the piece would have no legal move from there")]
    NoFurtherMove,
}

/// Reasons the engine refuses an operation.
#[derive(Clone, Copy, Debug, Eq, PartialEq, thiserror::Error)]
pub enum Rejection {
    /// Destination unreachable, or the move leaves the mover's king attacked.
    #[error("illegal move from {from} to {to}")]
    IllegalMove { from: Square, to: Square },

    #[error("{0} is occupied by an allied piece")]
    OccupiedByAlly(Square),

    #[error("cannot drop on {to}: {reason}")]
    InvalidDrop { to: Square, reason: DropViolation },

    #[error("it is {acting}'s turn")]
    NotYourTurn { acting: Side },

    #[error("no piece is selected")]
    NoSelection,

    /// A board operation was attempted with a hand selection or the reverse.
    #[error("the selected piece cannot be used this way")]
    WrongSelectionKind,

    #[error("{0} does not hold a piece of the acting side")]
    NotOwnPiece(Square),

    #[error("hand slot {0} is empty")]
    EmptyHandSlot(usize),

    #[error("no {0:?} in hand")]
    NotInHand(PieceKind),

    #[error("a promotion decision must be made first")]
    PromotionPending,

    #[error("no promotion decision is pending")]
    NoPendingPromotion,

    #[error("the game is over, {winner} won")]
    GameOver { winner: Side },
}

/// Result type alias for engine operations.
pub type EngineResult<T> = Result<T, Rejection>;
