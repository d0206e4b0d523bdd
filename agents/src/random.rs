use crate::Agent;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use shogi_core::{generate_legal_actions, Action, GameState};

/// Uniform choice over every legal move and drop.
pub struct RandomAgent {
    name: String,
    rng: StdRng,
}

impl RandomAgent {
    pub fn new() -> Self {
        RandomAgent {
            name: "Random".to_string(),
            rng: StdRng::from_entropy(),
        }
    }

    pub fn with_seed(seed: u64) -> Self {
        RandomAgent {
            name: "Random".to_string(),
            rng: StdRng::seed_from_u64(seed),
        }
    }
}

impl Default for RandomAgent {
    fn default() -> Self {
        Self::new()
    }
}

impl Agent for RandomAgent {
    fn best_action(&mut self, state: &GameState) -> Option<Action> {
        let actions = generate_legal_actions(state, state.turn());
        actions.choose(&mut self.rng).copied()
    }

    fn name(&self) -> &str {
        &self.name
    }
}
