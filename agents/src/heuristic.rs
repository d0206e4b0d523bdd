use crate::{play_turn, Agent, AiTurn};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use shogi_core::{
    drop_targets, legal_moves_from, Action, EngineResult, GameState, Piece, PieceKind, Rejection,
    Side, Square,
};
use tracing::debug;

/// Scoring weights for the one-ply greedy chooser.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct HeuristicConfig {
    /// How many of the best candidates the final pick is sampled from.
    pub top_n: usize,
    /// Multiplier for the value of a captured piece.
    pub capture_weight: u32,
    pub promotion_bonus: u32,
    /// Bonus for a non-King move that gets closer to the enemy King.
    pub approach_bonus: u32,
    pub drop_base: u32,
    /// Drops score `drop_base + max(0, drop_reach - distance to the enemy King)`.
    pub drop_reach: u32,
}

impl Default for HeuristicConfig {
    fn default() -> Self {
        HeuristicConfig {
            top_n: 3,
            capture_weight: 10,
            promotion_bonus: 5,
            approach_bonus: 3,
            drop_base: 2,
            drop_reach: 9,
        }
    }
}

/// A scored legal action.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct Candidate {
    pub action: Action,
    pub score: u32,
}

pub struct HeuristicAgent {
    name: String,
    config: HeuristicConfig,
    rng: StdRng,
}

impl HeuristicAgent {
    pub fn new(config: HeuristicConfig) -> Self {
        HeuristicAgent {
            name: format!("Heuristic(top={})", config.top_n),
            config,
            rng: StdRng::from_entropy(),
        }
    }

    /// Reproducible agent for tests and replays.
    pub fn with_seed(config: HeuristicConfig, seed: u64) -> Self {
        HeuristicAgent {
            rng: StdRng::seed_from_u64(seed),
            ..Self::new(config)
        }
    }

    pub fn config(&self) -> &HeuristicConfig {
        &self.config
    }

    /// Every legal move and drop of `side`, scored, best first.
    /// Ties keep enumeration order: board pieces row by row, then the hand.
    pub fn candidates(&self, state: &GameState, side: Side) -> Vec<Candidate> {
        let board = state.board();
        let enemy_king = board.king_square(side.opponent());
        let mut scratch = board.clone();
        let mut candidates = Vec::new();

        for (from, piece) in board.pieces(side) {
            for to in legal_moves_from(&mut scratch, from) {
                candidates.push(Candidate {
                    action: Action::Move { from, to },
                    score: self.score_move(piece, from, to, board.at(to), enemy_king),
                });
            }
        }

        // Duplicates in hand each get their own candidates.
        for piece in state.hand(side).iter() {
            for to in drop_targets(board, piece) {
                candidates.push(Candidate {
                    action: Action::Drop {
                        kind: piece.kind,
                        to,
                    },
                    score: self.score_drop(to, enemy_king),
                });
            }
        }

        candidates.sort_by(|a, b| b.score.cmp(&a.score));
        candidates
    }

    fn score_move(
        &self,
        piece: Piece,
        from: Square,
        to: Square,
        captured: Option<Piece>,
        enemy_king: Option<Square>,
    ) -> u32 {
        let mut score = 0;

        if let Some(captured) = captured {
            score += self.config.capture_weight * captured.value();
        }
        if piece.can_promote(from.y(), to.y()) || piece.must_promote(to.y()) {
            score += self.config.promotion_bonus;
        }
        if let Some(king) = enemy_king {
            if piece.kind != PieceKind::King && to.manhattan(king) < from.manhattan(king) {
                score += self.config.approach_bonus;
            }
        }

        score
    }

    fn score_drop(&self, to: Square, enemy_king: Option<Square>) -> u32 {
        let reach = enemy_king.map_or(0, |king| {
            self.config
                .drop_reach
                .saturating_sub(u32::from(to.manhattan(king)))
        });
        self.config.drop_base + reach
    }

    /// Samples one of the best `top_n` candidates.
    pub fn choose(&mut self, state: &GameState, side: Side) -> Option<Action> {
        let candidates = self.candidates(state, side);
        let top = &candidates[..candidates.len().min(self.config.top_n.max(1))];
        let pick = top.choose(&mut self.rng)?;

        debug!(
            %side,
            action = %pick.action,
            score = pick.score,
            candidates = candidates.len(),
            "heuristic choice"
        );
        Some(pick.action)
    }

    /// Chooses and plays an action for `side`, or passes if it has none.
    pub fn choose_ai_move(&mut self, state: &mut GameState, side: Side) -> EngineResult<AiTurn> {
        if side != state.turn() && !state.is_game_over() {
            return Err(Rejection::NotYourTurn {
                acting: state.turn(),
            });
        }
        play_turn(self, state)
    }
}

impl Default for HeuristicAgent {
    fn default() -> Self {
        Self::new(HeuristicConfig::default())
    }
}

impl Agent for HeuristicAgent {
    fn best_action(&mut self, state: &GameState) -> Option<Action> {
        self.choose(state, state.turn())
    }

    fn name(&self) -> &str {
        &self.name
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use shogi_core::{Board, Hand, Phase};
    use std::collections::HashSet;

    fn sq(x: u8, y: u8) -> Square {
        Square::new(x, y).unwrap()
    }

    fn position(pieces: &[(u8, u8, PieceKind, Side)], turn: Side) -> GameState {
        let mut board = Board::empty();
        for &(x, y, kind, side) in pieces {
            board.place(sq(x, y), Piece::new(kind, side));
        }
        GameState::from_position(board, [Hand::new(), Hand::new()], turn)
    }

    #[test]
    fn test_takes_only_legal_capture() {
        // The Sente King's other escapes are covered by the Lance.
        let mut state = position(
            &[
                (0, 8, PieceKind::King, Side::Sente),
                (0, 7, PieceKind::Pawn, Side::Gote),
                (1, 0, PieceKind::Lance, Side::Gote),
                (8, 0, PieceKind::King, Side::Gote),
            ],
            Side::Sente,
        );
        let mut agent = HeuristicAgent::with_seed(HeuristicConfig::default(), 7);

        assert_eq!(agent.candidates(&state, Side::Sente).len(), 1);
        let turn = agent.choose_ai_move(&mut state, Side::Sente).unwrap();

        let AiTurn::Played(outcome) = turn else {
            panic!("expected a move, got {turn:?}");
        };
        assert_eq!(
            outcome.action,
            Action::Move {
                from: sq(0, 8),
                to: sq(0, 7)
            }
        );
        assert_eq!(outcome.captured, Some(Piece::new(PieceKind::Pawn, Side::Gote)));
        assert_eq!(state.turn(), Side::Gote);
        assert_eq!(state.score(Side::Sente), 1);
    }

    #[test]
    fn test_no_legal_moves_passes() {
        let mut state = position(
            &[
                (0, 8, PieceKind::King, Side::Sente),
                (1, 0, PieceKind::Lance, Side::Gote),
                (8, 7, PieceKind::Rook, Side::Gote),
                (8, 0, PieceKind::King, Side::Gote),
            ],
            Side::Sente,
        );
        let mut agent = HeuristicAgent::with_seed(HeuristicConfig::default(), 1);

        let turn = agent.choose_ai_move(&mut state, Side::Sente).unwrap();
        assert_eq!(turn, AiTurn::NoLegalMoves);
        assert_eq!(state.turn(), Side::Gote);
        assert_eq!(state.phase(), Phase::AwaitingSelection);
    }

    #[test]
    fn test_best_capture_wins_with_top_one() {
        let mut state = position(
            &[
                (4, 8, PieceKind::King, Side::Sente),
                (4, 4, PieceKind::Rook, Side::Sente),
                (0, 6, PieceKind::Pawn, Side::Sente),
                (4, 1, PieceKind::Gold, Side::Gote),
                (8, 0, PieceKind::King, Side::Gote),
            ],
            Side::Sente,
        );
        let config = HeuristicConfig {
            top_n: 1,
            ..HeuristicConfig::default()
        };
        let mut agent = HeuristicAgent::with_seed(config, 3);

        let best = agent.candidates(&state, Side::Sente)[0];
        // Gold captured, promotion, closer to the King.
        assert_eq!(best.score, 60 + 5 + 3);

        let AiTurn::Played(outcome) = agent.choose_ai_move(&mut state, Side::Sente).unwrap() else {
            panic!("expected a move");
        };
        assert_eq!(outcome.action.to(), sq(4, 1));
        assert!(outcome.promoted);
        assert_eq!(state.hand(Side::Sente).count(PieceKind::Gold), 1);
    }

    #[test]
    fn test_default_samples_among_top_three() {
        let state = position(
            &[
                (4, 8, PieceKind::King, Side::Sente),
                (4, 4, PieceKind::Rook, Side::Sente),
                (0, 6, PieceKind::Pawn, Side::Sente),
                (4, 1, PieceKind::Gold, Side::Gote),
                (6, 4, PieceKind::Silver, Side::Gote),
                (8, 0, PieceKind::King, Side::Gote),
            ],
            Side::Sente,
        );
        let candidates = HeuristicAgent::default().candidates(&state, Side::Sente);
        let scores: Vec<u32> = candidates.iter().take(4).map(|c| c.score).collect();
        // Gold capture, Silver capture, promoting advance, then plain approaches.
        assert_eq!(scores, vec![68, 53, 8, 3]);

        let top: HashSet<Action> = candidates[..3].iter().map(|c| c.action).collect();
        let mut picked = HashSet::new();
        for seed in 0..64 {
            let mut agent = HeuristicAgent::with_seed(HeuristicConfig::default(), seed);
            let action = agent.choose(&state, Side::Sente).unwrap();
            assert!(top.contains(&action), "seed {seed} picked {action}");
            picked.insert(action);
        }
        assert_eq!(picked, top);
    }

    #[test]
    fn test_drop_scores() {
        let agent = HeuristicAgent::default();
        let king = Some(sq(4, 0));

        assert_eq!(agent.score_drop(sq(4, 1), king), 2 + 8);
        assert_eq!(agent.score_drop(sq(0, 8), king), 2);
        assert_eq!(agent.score_drop(sq(0, 8), None), 2);
    }

    #[test]
    fn test_hand_duplicates_each_score() {
        let mut board = Board::empty();
        board.place(sq(0, 8), Piece::new(PieceKind::King, Side::Sente));
        board.place(sq(8, 0), Piece::new(PieceKind::King, Side::Gote));
        let mut hand = Hand::new();
        hand.push(Piece::new(PieceKind::Gold, Side::Sente));
        hand.push(Piece::new(PieceKind::Gold, Side::Sente));
        let state = GameState::from_position(board, [hand, Hand::new()], Side::Sente);

        let agent = HeuristicAgent::default();
        let drops = agent
            .candidates(&state, Side::Sente)
            .into_iter()
            .filter(|c| matches!(c.action, Action::Drop { .. }))
            .count();
        assert_eq!(drops, 2 * 79);
    }

    #[test]
    fn test_king_does_not_earn_approach_bonus() {
        let agent = HeuristicAgent::default();
        let king = Piece::new(PieceKind::King, Side::Sente);
        let gold = Piece::new(PieceKind::Gold, Side::Sente);
        let target = Some(sq(4, 0));

        assert_eq!(agent.score_move(king, sq(4, 8), sq(4, 7), None, target), 0);
        assert_eq!(agent.score_move(gold, sq(4, 8), sq(4, 7), None, target), 3);
    }

    #[test]
    fn test_wrong_side_is_rejected() {
        let mut state = GameState::new();
        let mut agent = HeuristicAgent::with_seed(HeuristicConfig::default(), 0);
        assert_eq!(
            agent.choose_ai_move(&mut state, Side::Gote),
            Err(Rejection::NotYourTurn {
                acting: Side::Sente
            })
        );
    }
}
