use crate::game_state::GameState;
use crate::move_gen::generate_legal_actions;
use crate::types::Action;

/// Perft (performance test) results at each depth.
#[derive(Debug, Default, Eq, PartialEq)]
pub struct PerftResults {
    pub nodes: u64,
    pub captures: u64,
    pub drops: u64,
    pub promotions: u64,
    pub checks: u64,
    pub king_captures: u64,
}

impl PerftResults {
    /// Combines results from child nodes.
    pub fn add(&mut self, other: &Self) {
        self.nodes += other.nodes;
        self.captures += other.captures;
        self.drops += other.drops;
        self.promotions += other.promotions;
        self.checks += other.checks;
        self.king_captures += other.king_captures;
    }
}

/// Legal actions of the side to move, or none once a King has fallen.
fn actions(state: &GameState) -> Vec<Action> {
    if state.is_game_over() {
        return Vec::new();
    }
    generate_legal_actions(state, state.turn())
}

/// Plays `action` on a copy of `state`, accepting any promotion offer.
fn child(state: &GameState, action: Action) -> Option<GameState> {
    let mut next = state.clone();
    next.play_action(state.turn(), action, true).ok()?;
    Some(next)
}

/// Counts leaf nodes of the legal action tree to the given depth.
/// Optional promotions are always taken, so each action is one edge.
pub fn perft(state: &GameState, depth: u8) -> u64 {
    if depth == 0 {
        return 1;
    }

    let actions = actions(state);
    if depth == 1 {
        return actions.len() as u64;
    }

    actions
        .into_iter()
        .filter_map(|action| child(state, action))
        .map(|next| perft(&next, depth - 1))
        .sum()
}

/// Node count below each root action.
pub fn perft_divide(state: &GameState, depth: u8) -> Vec<(Action, u64)> {
    actions(state)
        .into_iter()
        .filter_map(|action| {
            let next = child(state, action)?;
            let nodes = if depth <= 1 {
                1
            } else {
                perft(&next, depth - 1)
            };
            Some((action, nodes))
        })
        .collect()
}

/// Performs perft with a breakdown of the leaf actions.
pub fn perft_detailed(state: &GameState, depth: u8) -> PerftResults {
    let mut results = PerftResults::default();

    if depth == 0 {
        results.nodes = 1;
        return results;
    }

    for action in actions(state) {
        let mut next = state.clone();
        let Ok(outcome) = next.play_action(state.turn(), action, true) else {
            continue;
        };

        if depth == 1 {
            results.nodes += 1;
            if outcome.captured.is_some() {
                results.captures += 1;
            }
            if matches!(action, Action::Drop { .. }) {
                results.drops += 1;
            }
            if outcome.promoted {
                results.promotions += 1;
            }
            if outcome.winner.is_some() {
                results.king_captures += 1;
            } else if next.is_in_check(next.turn()) {
                results.checks += 1;
            }
        } else {
            results.add(&perft_detailed(&next, depth - 1));
        }
    }

    results
}

/// Known node counts.
pub mod positions {
    /// Starting position perft values.
    pub const STARTING_POSITION: &[(u8, u64)] = &[(1, 30), (2, 900)];
}
