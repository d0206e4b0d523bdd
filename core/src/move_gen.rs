use crate::board::Board;
use crate::error::DropViolation;
use crate::game_state::GameState;
use crate::types::{Action, Piece, PieceKind, Side, Square};

/// Generates the squares `piece` could reach from `from`, ignoring king safety.
///
/// Rays run first, then single steps. Squares holding an ally are never included.
pub fn pseudo_legal_moves(board: &Board, piece: Piece, from: Square) -> Vec<Square> {
    let mut moves = Vec::new();
    generate_sliding_moves(board, piece, from, &mut moves);
    generate_step_moves(board, piece, from, &mut moves);
    moves
}

/// Generates moves along each ray until the board edge or the first piece.
/// The first piece is included only if it is an enemy.
fn generate_sliding_moves(board: &Board, piece: Piece, from: Square, moves: &mut Vec<Square>) {
    for (dx, dy) in piece.slide_directions() {
        let mut current = from;

        while let Some(to) = current.offset(dx, dy) {
            match board.at(to) {
                None => moves.push(to),
                Some(occupant) => {
                    if occupant.side != piece.side {
                        moves.push(to);
                    }
                    break;
                }
            }
            current = to;
        }
    }
}

/// Generates single-step moves from the piece's offset table.
fn generate_step_moves(board: &Board, piece: Piece, from: Square, moves: &mut Vec<Square>) {
    for (dx, dy) in piece.movement_offsets() {
        if let Some(to) = from.offset(dx, dy) {
            if !board.is_side(to, piece.side) {
                moves.push(to);
            }
        }
    }
}

/// Returns true if any piece of `attacker` has `target` among its pseudo-legal moves.
pub fn is_attacked_by(board: &Board, target: Square, attacker: Side) -> bool {
    board
        .pieces(attacker)
        .any(|(square, piece)| pseudo_legal_moves(board, piece, square).contains(&target))
}

/// Returns true if the side's king is on the board and attacked.
pub fn is_in_check(board: &Board, side: Side) -> bool {
    board
        .king_square(side)
        .is_some_and(|king| is_attacked_by(board, king, side.opponent()))
}

/// Checks that moving the piece on `from` to `to` is reachable and does not leave
/// the mover's own king attacked.
///
/// The board is used as scratch space for the hypothetical move and is restored
/// before returning.
pub fn is_legal(board: &mut Board, from: Square, to: Square) -> bool {
    let Some(piece) = board.at(from) else {
        return false;
    };
    if board.is_side(to, piece.side) {
        return false;
    }
    if !pseudo_legal_moves(board, piece, from).contains(&to) {
        return false;
    }

    leaves_king_safe(board, from, to, piece.side)
}

/// Applies the move, rescans every enemy reply against the king, and undoes it.
fn leaves_king_safe(board: &mut Board, from: Square, to: Square, side: Side) -> bool {
    let Some(probe) = board.apply_probe(from, to) else {
        return false;
    };

    // Without a king there is nothing to expose.
    let safe = match board.king_square(side) {
        Some(king) => !is_attacked_by(board, king, side.opponent()),
        None => true,
    };

    board.undo_probe(probe);
    safe
}

/// Legal destinations for the piece on `from`.
pub fn legal_moves_from(board: &mut Board, from: Square) -> Vec<Square> {
    let Some(piece) = board.at(from) else {
        return Vec::new();
    };

    pseudo_legal_moves(board, piece, from)
        .into_iter()
        .filter(|&to| leaves_king_safe(board, from, to, piece.side))
        .collect()
}

/// Checks whether `piece` may be dropped on `to`.
pub fn check_drop(board: &Board, piece: Piece, to: Square) -> Result<(), DropViolation> {
    if !board.is_empty(to) {
        return Err(DropViolation::Occupied);
    }

    if piece.side.rows_to_far_edge(to.y()) < piece.kind.dead_rows() {
        return Err(DropViolation::NoFurtherMove);
    }

    if piece.kind == PieceKind::Pawn && board.has_unpromoted_pawn_on_file(to.x(), piece.side) {
        return Err(DropViolation::SecondPawnOnFile);
    }

    Ok(())
}

/// Every empty square where `piece` may be dropped, row by row.
pub fn drop_targets(board: &Board, piece: Piece) -> Vec<Square> {
    Square::all()
        .filter(|&to| check_drop(board, piece, to).is_ok())
        .collect()
}

/// Generates every legal action for `side`: board moves in board order, then drops,
/// one set per distinct kind in hand.
pub fn generate_legal_actions(state: &GameState, side: Side) -> Vec<Action> {
    let mut board = state.board().clone();
    let mut actions = Vec::new();

    let own: Vec<Square> = board.pieces(side).map(|(square, _)| square).collect();
    for from in own {
        for to in legal_moves_from(&mut board, from) {
            actions.push(Action::Move { from, to });
        }
    }

    for kind in PieceKind::ALL {
        if state.hand(side).count(kind) == 0 {
            continue;
        }
        for to in drop_targets(&board, Piece::new(kind, side)) {
            actions.push(Action::Drop { kind, to });
        }
    }

    actions
}
