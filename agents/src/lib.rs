pub mod heuristic;
pub mod random;

use shogi_core::{Action, EngineResult, GameState, MoveOutcome, Rejection};
use tracing::debug;

/// Core trait for shogi agents
pub trait Agent {
    /// Pick an action for the side to move, or None if it has no legal action
    fn best_action(&mut self, state: &GameState) -> Option<Action>;

    /// Get the agent's name
    fn name(&self) -> &str;
}

/// Result of letting an agent take its turn.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum AiTurn {
    Played(MoveOutcome),
    /// The side had nothing to play and passed.
    NoLegalMoves,
}

/// Lets `agent` act for the side to move. Optional promotions are always accepted.
/// With no legal action the turn is passed.
pub fn play_turn<A: Agent + ?Sized>(agent: &mut A, state: &mut GameState) -> EngineResult<AiTurn> {
    if let Some(winner) = state.winner() {
        return Err(Rejection::GameOver { winner });
    }

    let side = state.turn();
    match agent.best_action(state) {
        Some(action) => state.play_action(side, action, true).map(AiTurn::Played),
        None => {
            debug!(agent = agent.name(), %side, "no legal moves, passing");
            state.pass_turn()?;
            Ok(AiTurn::NoLegalMoves)
        }
    }
}

pub use heuristic::{HeuristicAgent, HeuristicConfig};
pub use random::RandomAgent;
