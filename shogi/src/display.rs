use shogi_core::{GameState, Hand, Piece, Side, Square, BOARD_SIZE};
use std::fmt::Write;

/// Three-column cell for a piece or an empty square.
pub fn cell(piece: Option<Piece>) -> String {
    match piece {
        Some(piece) => format!("{:>3}", piece.symbol()),
        None => "  .".to_string(),
    }
}

/// Hand contents in capture order, e.g. `P P S`.
pub fn hand_line(hand: &Hand) -> String {
    if hand.is_empty() {
        return "-".to_string();
    }
    hand.iter()
        .map(|p| p.kind.letter().to_string())
        .collect::<Vec<_>>()
        .join(" ")
}

/// Text board with Gote at the top, file numbers above and rank letters on the right.
pub fn render_board(state: &GameState) -> String {
    let mut out = String::new();

    let _ = writeln!(out, "Gote hand: {}", hand_line(state.hand(Side::Gote)));
    out.push(' ');
    for x in 0..BOARD_SIZE {
        let _ = write!(out, "{:>3}", BOARD_SIZE - x);
    }
    out.push('\n');

    for y in 0..BOARD_SIZE {
        out.push(' ');
        for square in (0..BOARD_SIZE).filter_map(|x| Square::new(x, y)) {
            out.push_str(&cell(state.board().at(square)));
        }
        let _ = writeln!(out, "  {}", char::from(b'a' + y));
    }

    let _ = writeln!(out, "Sente hand: {}", hand_line(state.hand(Side::Sente)));
    out
}

/// One-line status: move number, side to move, scores and check.
pub fn status_line(state: &GameState) -> String {
    let mut line = format!(
        "Move {} | Sente {} - Gote {}",
        state.move_number(),
        state.score(Side::Sente),
        state.score(Side::Gote)
    );

    match state.winner() {
        Some(winner) => {
            let _ = write!(line, " | {winner} wins");
        }
        None => {
            let _ = write!(line, " | {} to move", state.turn());
            if state.is_in_check(state.turn()) {
                line.push_str(" | Check!");
            }
        }
    }
    line
}
