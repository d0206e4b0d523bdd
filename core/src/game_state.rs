/// Turn engine: selection, moves, drops, promotion decisions and turn handoff.
/// This module is the only owner of the board, the hands and the scores.
use crate::board::*;
use crate::error::{EngineResult, Rejection};
use crate::move_gen::{check_drop, drop_targets, is_in_check, is_legal, legal_moves_from};
use crate::types::*;
use tracing::{debug, trace};

/// Where the engine is in the current turn.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Phase {
    AwaitingSelection,
    PieceSelectedOnBoard(Square),
    PieceSelectedInHand(usize),
    AwaitingPromotionChoice(PendingPromotion),
    GameOver { winner: Side },
}

/// A move that has been applied and waits for the mover's promotion decision.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct PendingPromotion {
    /// Square the moved piece now stands on.
    pub square: Square,
    outcome: MoveOutcome,
}

/// What a successful select operation picked up.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Selection {
    Board { square: Square, piece: Piece },
    Hand { index: usize, piece: Piece },
}

/// Report of an applied move or drop.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct MoveOutcome {
    pub action: Action,
    pub mover: Side,
    /// The moved or dropped piece as it now stands.
    pub piece: Piece,
    /// The captured piece as it was on the board before the capture.
    pub captured: Option<Piece>,
    /// True if the piece was promoted by this move, forced or chosen.
    pub promoted: bool,
    /// True while the engine waits for [`GameState::resolve_promotion`].
    pub promotion_pending: bool,
    pub winner: Option<Side>,
}

/// Complete state of a game.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct GameState {
    pub(crate) board: Board,
    pub(crate) hands: [Hand; 2],
    pub(crate) scores: [u32; 2],
    pub(crate) turn: Side,
    pub(crate) phase: Phase,
    /// Starts at 1, incremented on every turn handoff.
    pub(crate) move_number: u32,
}

impl GameState {
    /// Creates a new game in the starting position, Sente to move.
    pub fn new() -> Self {
        Self::from_position(Board::starting_position(), [Hand::new(), Hand::new()], Side::Sente)
    }

    /// Creates a game from an arbitrary position with zero scores.
    /// A position with a missing King starts out finished.
    pub fn from_position(board: Board, hands: [Hand; 2], turn: Side) -> Self {
        let mut state = Self {
            board,
            hands,
            scores: [0; 2],
            turn,
            phase: Phase::AwaitingSelection,
            move_number: 1,
        };
        if let Some(winner) = state.check_game_over() {
            state.phase = Phase::GameOver { winner };
        }
        state
    }

    /// Restarts from the initial layout with empty hands and zero scores.
    pub fn reset(&mut self) {
        *self = Self::new();
        debug!("game reset");
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn hand(&self, side: Side) -> &Hand {
        &self.hands[side.index()]
    }

    pub fn score(&self, side: Side) -> u32 {
        self.scores[side.index()]
    }

    /// Returns the side to act.
    pub fn turn(&self) -> Side {
        self.turn
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn move_number(&self) -> u32 {
        self.move_number
    }

    pub fn winner(&self) -> Option<Side> {
        match self.phase {
            Phase::GameOver { winner } => Some(winner),
            _ => None,
        }
    }

    pub fn is_game_over(&self) -> bool {
        self.winner().is_some()
    }

    /// Returns true if the given side's King is attacked.
    pub fn is_in_check(&self, side: Side) -> bool {
        is_in_check(&self.board, side)
    }

    /// Returns the current selection, if any.
    pub fn selection(&self) -> Option<Selection> {
        match self.phase {
            Phase::PieceSelectedOnBoard(square) => self
                .board
                .at(square)
                .map(|piece| Selection::Board { square, piece }),
            Phase::PieceSelectedInHand(index) => self
                .hand(self.turn)
                .get(index)
                .map(|piece| Selection::Hand { index, piece }),
            _ => None,
        }
    }

    /// Legal destinations for the current selection, for highlighting.
    pub fn selected_targets(&self) -> Vec<Square> {
        match self.selection() {
            Some(Selection::Board { square, .. }) => {
                legal_moves_from(&mut self.board.clone(), square)
            }
            Some(Selection::Hand { piece, .. }) => drop_targets(&self.board, piece),
            None => Vec::new(),
        }
    }

    /// Returns the winner if either King is missing from the board.
    /// Sente's King is examined first.
    pub fn check_game_over(&self) -> Option<Side> {
        if self.board.king_square(Side::Sente).is_none() {
            Some(Side::Gote)
        } else if self.board.king_square(Side::Gote).is_none() {
            Some(Side::Sente)
        } else {
            None
        }
    }

    /// Rejects operations by the wrong side, after the game ended, or while a
    /// promotion decision is outstanding.
    fn ensure_can_select(&self, side: Side) -> EngineResult<()> {
        match self.phase {
            Phase::GameOver { winner } => Err(Rejection::GameOver { winner }),
            _ if side != self.turn => Err(Rejection::NotYourTurn { acting: self.turn }),
            Phase::AwaitingPromotionChoice(_) => Err(Rejection::PromotionPending),
            _ => Ok(()),
        }
    }

    /// Selects the piece on `square`. An earlier selection is replaced.
    pub fn select(&mut self, side: Side, square: Square) -> EngineResult<Selection> {
        self.ensure_can_select(side)?;

        match self.board.at(square) {
            Some(piece) if piece.side == side => {
                self.phase = Phase::PieceSelectedOnBoard(square);
                trace!(%square, "selected board piece");
                Ok(Selection::Board { square, piece })
            }
            _ => Err(Rejection::NotOwnPiece(square)),
        }
    }

    /// Selects the hand piece at `index`. An earlier selection is replaced.
    pub fn select_from_hand(&mut self, side: Side, index: usize) -> EngineResult<Selection> {
        self.ensure_can_select(side)?;

        let piece = self
            .hand(side)
            .get(index)
            .ok_or(Rejection::EmptyHandSlot(index))?;
        self.phase = Phase::PieceSelectedInHand(index);
        trace!(index, "selected hand piece");
        Ok(Selection::Hand { index, piece })
    }

    /// Drops the current selection, if there is one.
    pub fn deselect(&mut self) {
        if matches!(
            self.phase,
            Phase::PieceSelectedOnBoard(_) | Phase::PieceSelectedInHand(_)
        ) {
            self.phase = Phase::AwaitingSelection;
        }
    }

    /// Rejection for an operation that needs a selection the phase does not have.
    fn phase_rejection(&self) -> Rejection {
        match self.phase {
            Phase::GameOver { winner } => Rejection::GameOver { winner },
            Phase::AwaitingPromotionChoice(_) => Rejection::PromotionPending,
            Phase::AwaitingSelection => Rejection::NoSelection,
            Phase::PieceSelectedOnBoard(_) | Phase::PieceSelectedInHand(_) => {
                Rejection::WrongSelectionKind
            }
        }
    }

    /// Moves the selected board piece to `to`.
    pub fn attempt_move(&mut self, to: Square) -> EngineResult<MoveOutcome> {
        let Phase::PieceSelectedOnBoard(from) = self.phase else {
            return Err(self.phase_rejection());
        };
        let mover = self.turn;

        if self.board.is_side(to, mover) {
            return Err(Rejection::OccupiedByAlly(to));
        }
        let piece = self.board.at(from).ok_or(Rejection::NoSelection)?;
        if !is_legal(&mut self.board, from, to) {
            trace!(%from, %to, "illegal move rejected");
            return Err(Rejection::IllegalMove { from, to });
        }

        let captured = self.board.remove(to);
        if let Some(taken) = captured {
            self.capture(mover, taken);
        }
        self.board.remove(from);
        self.board.place(to, piece);

        let mut outcome = MoveOutcome {
            action: Action::Move { from, to },
            mover,
            piece,
            captured,
            promoted: false,
            promotion_pending: false,
            winner: None,
        };

        if piece.must_promote(to.y()) {
            outcome.piece = piece.promote();
            outcome.promoted = true;
            self.board.place(to, outcome.piece);
            debug!(%from, %to, "forced promotion");
            outcome.winner = self.hand_off();
        } else if piece.can_promote(from.y(), to.y()) {
            outcome.promotion_pending = true;
            self.phase = Phase::AwaitingPromotionChoice(PendingPromotion {
                square: to,
                outcome,
            });
        } else {
            outcome.winner = self.hand_off();
        }

        debug!(%mover, action = %outcome.action, "move applied");
        Ok(outcome)
    }

    /// Moves a captured piece into the captor's hand and credits its value.
    fn capture(&mut self, captor: Side, taken: Piece) {
        let value = taken.value();
        self.hands[captor.index()].push(taken.captured_by(captor));
        self.scores[captor.index()] += value;
        debug!(%captor, piece = %taken, value, "captured");
    }

    /// Applies or declines the pending promotion, then hands the turn over.
    pub fn resolve_promotion(&mut self, promote: bool) -> EngineResult<MoveOutcome> {
        let Phase::AwaitingPromotionChoice(pending) = self.phase else {
            return Err(match self.phase {
                Phase::GameOver { winner } => Rejection::GameOver { winner },
                _ => Rejection::NoPendingPromotion,
            });
        };

        let mut outcome = pending.outcome;
        outcome.promotion_pending = false;
        if promote {
            if let Some(piece) = self.board.at(pending.square) {
                outcome.piece = piece.promote();
                outcome.promoted = true;
                self.board.place(pending.square, outcome.piece);
            }
        }
        debug!(square = %pending.square, promote, "promotion resolved");
        outcome.winner = self.hand_off();
        Ok(outcome)
    }

    /// Drops the selected hand piece on `to`. Drops never promote.
    pub fn attempt_drop(&mut self, to: Square) -> EngineResult<MoveOutcome> {
        let Phase::PieceSelectedInHand(index) = self.phase else {
            return Err(self.phase_rejection());
        };
        let mover = self.turn;
        let hand = &mut self.hands[mover.index()];

        let piece = hand.get(index).ok_or(Rejection::EmptyHandSlot(index))?;
        check_drop(&self.board, piece, to).map_err(|reason| {
            trace!(%to, %reason, "drop rejected");
            Rejection::InvalidDrop { to, reason }
        })?;

        hand.take(index);
        self.board.place(to, piece);

        let mut outcome = MoveOutcome {
            action: Action::Drop {
                kind: piece.kind,
                to,
            },
            mover,
            piece,
            captured: None,
            promoted: false,
            promotion_pending: false,
            winner: None,
        };
        debug!(%mover, action = %outcome.action, "drop applied");
        outcome.winner = self.hand_off();
        Ok(outcome)
    }

    /// Gives the turn away without moving. A pending promotion is declined.
    /// Callers use this when the side has no legal action or its clock ran out.
    pub fn pass_turn(&mut self) -> EngineResult<()> {
        if let Phase::GameOver { winner } = self.phase {
            return Err(Rejection::GameOver { winner });
        }
        debug!(side = %self.turn, "turn passed");
        self.hand_off();
        Ok(())
    }

    /// Selects, moves or drops, and answers any promotion question in one step.
    /// On rejection the state is left as it was, including the selection.
    pub fn play_action(
        &mut self,
        side: Side,
        action: Action,
        accept_promotion: bool,
    ) -> EngineResult<MoveOutcome> {
        let saved = self.phase;
        let result = self.try_play_action(side, action, accept_promotion);
        if result.is_err() {
            self.phase = saved;
        }
        result
    }

    fn try_play_action(
        &mut self,
        side: Side,
        action: Action,
        accept_promotion: bool,
    ) -> EngineResult<MoveOutcome> {
        let outcome = match action {
            Action::Move { from, to } => {
                self.select(side, from)?;
                self.attempt_move(to)?
            }
            Action::Drop { kind, to } => {
                self.ensure_can_select(side)?;
                let index = self
                    .hand(side)
                    .position(kind)
                    .ok_or(Rejection::NotInHand(kind))?;
                self.select_from_hand(side, index)?;
                self.attempt_drop(to)?
            }
        };

        if outcome.promotion_pending {
            self.resolve_promotion(accept_promotion)
        } else {
            Ok(outcome)
        }
    }

    /// Flips the acting side, clears the selection and checks for a missing King.
    fn hand_off(&mut self) -> Option<Side> {
        self.turn = self.turn.opponent();
        self.move_number += 1;

        let winner = self.check_game_over();
        self.phase = match winner {
            Some(winner) => {
                debug!(%winner, "game over");
                Phase::GameOver { winner }
            }
            None => Phase::AwaitingSelection,
        };
        winner
    }
}

impl Default for GameState {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::DropViolation;

    fn sq(x: u8, y: u8) -> Square {
        Square::new(x, y).unwrap()
    }

    /// Kings on 9i (Sente) and 1a (Gote) plus the given pieces.
    fn position(pieces: &[(u8, u8, Piece)], turn: Side) -> GameState {
        let mut board = Board::empty();
        board.place(sq(0, 8), Piece::new(PieceKind::King, Side::Sente));
        board.place(sq(8, 0), Piece::new(PieceKind::King, Side::Gote));
        for &(x, y, piece) in pieces {
            board.place(sq(x, y), piece);
        }
        GameState::from_position(board, [Hand::new(), Hand::new()], turn)
    }

    fn sente(kind: PieceKind) -> Piece {
        Piece::new(kind, Side::Sente)
    }

    fn gote(kind: PieceKind) -> Piece {
        Piece::new(kind, Side::Gote)
    }

    #[test]
    fn test_starting_state() {
        let state = GameState::new();
        assert_eq!(state.turn(), Side::Sente);
        assert_eq!(state.phase(), Phase::AwaitingSelection);
        assert_eq!(state.move_number(), 1);
        assert!(state.hand(Side::Sente).is_empty());
        assert_eq!(state.score(Side::Gote), 0);
        assert_eq!(state.check_game_over(), None);
    }

    #[test]
    fn test_opening_pawn_push() {
        let mut state = GameState::new();

        // Pawn in front of the King's file.
        let selection = state.select(Side::Sente, sq(4, 6)).unwrap();
        assert_eq!(
            selection,
            Selection::Board {
                square: sq(4, 6),
                piece: sente(PieceKind::Pawn)
            }
        );
        assert_eq!(state.selected_targets(), vec![sq(4, 5)]);

        let outcome = state.attempt_move(sq(4, 5)).unwrap();
        assert_eq!(outcome.captured, None);
        assert!(!outcome.promoted);
        assert!(!outcome.promotion_pending);
        assert_eq!(outcome.winner, None);

        assert_eq!(state.turn(), Side::Gote);
        assert_eq!(state.phase(), Phase::AwaitingSelection);
        assert_eq!(state.move_number(), 2);
        assert!(state.board().is_empty(sq(4, 6)));
        assert_eq!(state.board().at(sq(4, 5)), Some(sente(PieceKind::Pawn)));
    }

    #[test]
    fn test_selection_rejections() {
        let mut state = GameState::new();

        assert_eq!(
            state.select(Side::Gote, sq(4, 2)),
            Err(Rejection::NotYourTurn { acting: Side::Sente })
        );
        assert_eq!(
            state.select(Side::Sente, sq(4, 4)),
            Err(Rejection::NotOwnPiece(sq(4, 4)))
        );
        assert_eq!(
            state.select(Side::Sente, sq(4, 2)),
            Err(Rejection::NotOwnPiece(sq(4, 2)))
        );
        assert_eq!(
            state.select_from_hand(Side::Sente, 0),
            Err(Rejection::EmptyHandSlot(0))
        );
        assert_eq!(state.attempt_move(sq(4, 5)), Err(Rejection::NoSelection));
        assert_eq!(state.attempt_drop(sq(4, 5)), Err(Rejection::NoSelection));
        assert_eq!(state.resolve_promotion(true), Err(Rejection::NoPendingPromotion));
        assert_eq!(state, GameState::new());
    }

    #[test]
    fn test_reselect_and_deselect() {
        let mut state = GameState::new();
        state.select(Side::Sente, sq(4, 6)).unwrap();
        state.select(Side::Sente, sq(7, 7)).unwrap();
        assert_eq!(state.phase(), Phase::PieceSelectedOnBoard(sq(7, 7)));

        // A failed selection keeps the previous one.
        assert!(state.select(Side::Sente, sq(4, 4)).is_err());
        assert_eq!(state.phase(), Phase::PieceSelectedOnBoard(sq(7, 7)));

        assert_eq!(state.attempt_drop(sq(4, 4)), Err(Rejection::WrongSelectionKind));

        state.deselect();
        assert_eq!(state.phase(), Phase::AwaitingSelection);
        assert!(state.selected_targets().is_empty());
    }

    #[test]
    fn test_rejected_move_changes_nothing() {
        let mut state = GameState::new();
        state.select(Side::Sente, sq(4, 6)).unwrap();
        let before = state.clone();

        assert_eq!(
            state.attempt_move(sq(4, 4)),
            Err(Rejection::IllegalMove {
                from: sq(4, 6),
                to: sq(4, 4)
            })
        );
        assert_eq!(state.attempt_move(sq(4, 8)), Err(Rejection::OccupiedByAlly(sq(4, 8))));
        assert_eq!(state, before);
    }

    #[test]
    fn test_self_check_is_rejected() {
        let mut state = position(
            &[
                (0, 6, sente(PieceKind::Gold)),
                (0, 2, gote(PieceKind::Lance)),
            ],
            Side::Sente,
        );
        state.select(Side::Sente, sq(0, 6)).unwrap();
        assert_eq!(
            state.attempt_move(sq(1, 6)),
            Err(Rejection::IllegalMove {
                from: sq(0, 6),
                to: sq(1, 6)
            })
        );
        assert!(state.attempt_move(sq(0, 5)).is_ok());
    }

    #[test]
    fn test_capture_round_trip() {
        let mut state = position(
            &[
                (4, 5, sente(PieceKind::Rook)),
                (4, 3, Piece::new_promoted(PieceKind::Silver, Side::Gote)),
            ],
            Side::Sente,
        );

        state.select(Side::Sente, sq(4, 5)).unwrap();
        let outcome = state.attempt_move(sq(4, 3)).unwrap();

        assert_eq!(
            outcome.captured,
            Some(Piece::new_promoted(PieceKind::Silver, Side::Gote))
        );
        assert_eq!(state.score(Side::Sente), 7);
        assert_eq!(state.hand(Side::Sente).get(0), Some(sente(PieceKind::Silver)));
        assert!(state.hand(Side::Gote).is_empty());

        // The original owner cannot use it.
        assert_eq!(
            state.select_from_hand(Side::Gote, 0),
            Err(Rejection::EmptyHandSlot(0))
        );
        state.pass_turn().unwrap();

        state.select_from_hand(Side::Sente, 0).unwrap();
        let drop = state.attempt_drop(sq(6, 4)).unwrap();
        assert_eq!(drop.piece, sente(PieceKind::Silver));
        assert_eq!(state.board().at(sq(6, 4)), Some(sente(PieceKind::Silver)));
        assert!(state.hand(Side::Sente).is_empty());
        assert_eq!(state.turn(), Side::Gote);
    }

    #[test]
    fn test_forced_promotions() {
        let cases = [
            (sente(PieceKind::Pawn), sq(2, 1), sq(2, 0)),
            (sente(PieceKind::Lance), sq(6, 4), sq(6, 0)),
            (sente(PieceKind::Knight), sq(3, 3), sq(2, 1)),
            (gote(PieceKind::Knight), sq(3, 5), sq(4, 7)),
            (gote(PieceKind::Pawn), sq(5, 7), sq(5, 8)),
        ];

        for (piece, from, to) in cases {
            let mut state = position(&[(from.x(), from.y(), piece)], piece.side);
            let outcome = state.play_action(piece.side, Action::Move { from, to }, false).unwrap();

            assert!(outcome.promoted, "{piece} to {to} should promote");
            assert!(!outcome.promotion_pending);
            assert_eq!(state.board().at(to), Some(piece.promote()));
            assert_eq!(state.turn(), piece.side.opponent());
        }
    }

    #[test]
    fn test_optional_promotion() {
        let mut state = position(&[(4, 3, sente(PieceKind::Silver))], Side::Sente);
        state.select(Side::Sente, sq(4, 3)).unwrap();
        let outcome = state.attempt_move(sq(4, 2)).unwrap();

        assert!(outcome.promotion_pending);
        assert_eq!(state.turn(), Side::Sente);
        assert!(matches!(state.phase(), Phase::AwaitingPromotionChoice(_)));
        assert_eq!(state.select(Side::Sente, sq(4, 2)), Err(Rejection::PromotionPending));
        assert_eq!(state.attempt_move(sq(4, 1)), Err(Rejection::PromotionPending));

        let resolved = state.resolve_promotion(true).unwrap();
        assert!(resolved.promoted);
        assert!(!resolved.promotion_pending);
        assert_eq!(
            state.board().at(sq(4, 2)),
            Some(Piece::new_promoted(PieceKind::Silver, Side::Sente))
        );
        assert_eq!(state.turn(), Side::Gote);
    }

    #[test]
    fn test_declined_promotion_leaving_zone() {
        let mut state = position(&[(4, 2, sente(PieceKind::Silver))], Side::Sente);
        state.select(Side::Sente, sq(4, 2)).unwrap();
        assert!(state.attempt_move(sq(3, 3)).unwrap().promotion_pending);

        let resolved = state.resolve_promotion(false).unwrap();
        assert!(!resolved.promoted);
        assert_eq!(state.board().at(sq(3, 3)), Some(sente(PieceKind::Silver)));
        assert_eq!(state.turn(), Side::Gote);
    }

    #[test]
    fn test_pawn_drop_restrictions() {
        let mut state = position(&[(2, 6, sente(PieceKind::Pawn))], Side::Sente);
        state.hands[Side::Sente.index()].push(sente(PieceKind::Pawn));
        state.select_from_hand(Side::Sente, 0).unwrap();
        let before = state.clone();

        assert_eq!(
            state.attempt_drop(sq(2, 3)),
            Err(Rejection::InvalidDrop {
                to: sq(2, 3),
                reason: DropViolation::SecondPawnOnFile
            })
        );
        assert_eq!(
            state.attempt_drop(sq(3, 0)),
            Err(Rejection::InvalidDrop {
                to: sq(3, 0),
                reason: DropViolation::NoFurtherMove
            })
        );
        assert_eq!(
            state.attempt_drop(sq(8, 0)),
            Err(Rejection::InvalidDrop {
                to: sq(8, 0),
                reason: DropViolation::Occupied
            })
        );
        assert_eq!(state.attempt_move(sq(3, 3)), Err(Rejection::WrongSelectionKind));
        assert_eq!(state, before);

        // Inside the promotion zone, still no promotion.
        let outcome = state.attempt_drop(sq(3, 1)).unwrap();
        assert!(!outcome.promoted);
        assert!(!outcome.promotion_pending);
        assert_eq!(state.board().at(sq(3, 1)), Some(sente(PieceKind::Pawn)));
    }

    #[test]
    fn test_play_action_drop_by_kind() {
        let mut state = position(&[], Side::Gote);
        state.hands[Side::Gote.index()].push(gote(PieceKind::Gold));
        state.hands[Side::Gote.index()].push(gote(PieceKind::Knight));

        assert_eq!(
            state.play_action(
                Side::Gote,
                Action::Drop {
                    kind: PieceKind::Rook,
                    to: sq(4, 4)
                },
                true
            ),
            Err(Rejection::NotInHand(PieceKind::Rook))
        );

        let outcome = state
            .play_action(
                Side::Gote,
                Action::Drop {
                    kind: PieceKind::Knight,
                    to: sq(4, 4),
                },
                true,
            )
            .unwrap();
        assert_eq!(outcome.piece, gote(PieceKind::Knight));
        assert_eq!(state.hand(Side::Gote).len(), 1);
    }

    #[test]
    fn test_play_action_restores_selection() {
        let mut state = GameState::new();
        state.select(Side::Sente, sq(7, 7)).unwrap();
        let before = state.clone();

        let result = state.play_action(
            Side::Sente,
            Action::Move {
                from: sq(4, 6),
                to: sq(4, 3),
            },
            true,
        );
        assert!(result.is_err());
        assert_eq!(state, before);
    }

    #[test]
    fn test_king_capture_ends_game() {
        let mut state = position(&[(8, 1, sente(PieceKind::Gold))], Side::Sente);
        state.select(Side::Sente, sq(8, 1)).unwrap();
        let outcome = state.attempt_move(sq(8, 0)).unwrap();

        assert_eq!(outcome.winner, Some(Side::Sente));
        assert_eq!(state.winner(), Some(Side::Sente));
        assert_eq!(state.score(Side::Sente), 100);
        assert_eq!(
            state.select(Side::Gote, sq(0, 8)),
            Err(Rejection::GameOver {
                winner: Side::Sente
            })
        );
        assert_eq!(
            state.pass_turn(),
            Err(Rejection::GameOver {
                winner: Side::Sente
            })
        );
    }

    #[test]
    fn test_removed_king_is_detected() {
        let mut state = GameState::new();
        state.board.remove(sq(4, 0));
        assert_eq!(state.check_game_over(), Some(Side::Sente));

        let mut state = GameState::new();
        state.board.remove(sq(4, 8));
        assert_eq!(state.check_game_over(), Some(Side::Gote));

        let state = GameState::from_position(state.board.clone(), Default::default(), Side::Sente);
        assert_eq!(state.winner(), Some(Side::Gote));
    }

    #[test]
    fn test_pass_turn_declines_pending_promotion() {
        let mut state = position(&[(4, 3, sente(PieceKind::Bishop))], Side::Sente);
        state.select(Side::Sente, sq(4, 3)).unwrap();
        assert!(state.attempt_move(sq(5, 2)).unwrap().promotion_pending);

        state.pass_turn().unwrap();
        assert_eq!(state.turn(), Side::Gote);
        assert_eq!(state.phase(), Phase::AwaitingSelection);
        assert_eq!(state.board().at(sq(5, 2)), Some(sente(PieceKind::Bishop)));
    }

    #[test]
    fn test_reset() {
        let mut state = GameState::new();
        state
            .play_action(
                Side::Sente,
                Action::Move {
                    from: sq(2, 6),
                    to: sq(2, 5),
                },
                false,
            )
            .unwrap();
        state.reset();
        assert_eq!(state, GameState::new());
    }
}
