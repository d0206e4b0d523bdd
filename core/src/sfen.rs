use crate::board::{Board, Hand};
use crate::game_state::GameState;
use crate::types::{Piece, PieceKind, Side, Square, BOARD_SIZE};

/// SFEN-style position notation: `<board> <b|w> <hands|-> [move number]`.
/// Rows are listed from the top of the board (Gote's side) down, uppercase letters
/// are Sente, `+` marks a promoted piece and digits count empty squares.
#[derive(Clone, Debug, Eq, PartialEq, thiserror::Error)]
pub enum SfenError {
    #[error("expected 3 or 4 fields, got {0}")]
    FieldCount(usize),

    #[error("expected 9 rows, got {0}")]
    RowCount(usize),

    #[error("row {row} covers {width} squares, expected 9")]
    RowWidth { row: usize, width: usize },

    #[error("invalid piece character: '{0}'")]
    InvalidPiece(char),

    #[error("invalid side to move: {0}")]
    InvalidSide(String),

    #[error("invalid hand: {0}")]
    InvalidHand(String),

    #[error("invalid move number: {0}")]
    InvalidNumber(String),
}

/// Hand pieces are written in this order, Sente's first.
const HAND_ORDER: [PieceKind; 7] = [
    PieceKind::Rook,
    PieceKind::Bishop,
    PieceKind::Gold,
    PieceKind::Silver,
    PieceKind::Knight,
    PieceKind::Lance,
    PieceKind::Pawn,
];

impl GameState {
    /// Parses a position. The move number defaults to 1 when omitted.
    pub fn from_sfen(sfen: &str) -> Result<Self, SfenError> {
        let parts: Vec<&str> = sfen.split_whitespace().collect();
        if !(3..=4).contains(&parts.len()) {
            return Err(SfenError::FieldCount(parts.len()));
        }

        let board = parse_board(parts[0])?;
        let turn = match parts[1] {
            "b" => Side::Sente,
            "w" => Side::Gote,
            other => return Err(SfenError::InvalidSide(other.to_string())),
        };
        let hands = parse_hands(parts[2])?;
        let move_number = match parts.get(3) {
            Some(field) => field
                .parse::<u32>()
                .ok()
                .filter(|&n| n > 0)
                .ok_or_else(|| SfenError::InvalidNumber(field.to_string()))?,
            None => 1,
        };

        let mut state = GameState::from_position(board, hands, turn);
        state.move_number = move_number;
        Ok(state)
    }

    /// Serializes the position. Scores are not part of the notation.
    pub fn to_sfen(&self) -> String {
        format!(
            "{} {} {} {}",
            board_to_sfen(&self.board),
            match self.turn {
                Side::Sente => "b",
                Side::Gote => "w",
            },
            hands_to_sfen(&self.hands),
            self.move_number
        )
    }
}

fn parse_board(board_str: &str) -> Result<Board, SfenError> {
    let rows: Vec<&str> = board_str.split('/').collect();
    if rows.len() != BOARD_SIZE as usize {
        return Err(SfenError::RowCount(rows.len()));
    }

    let mut board = Board::empty();
    for (y, row) in (0u8..).zip(&rows) {
        let mut x = 0usize;
        let mut promoted = false;

        for ch in row.chars() {
            if let Some(run) = ch.to_digit(10).filter(|_| !promoted) {
                x += run as usize;
                continue;
            }
            if ch == '+' && !promoted {
                promoted = true;
                continue;
            }

            let piece = piece_from_char(ch, promoted)?;
            promoted = false;
            let square = u8::try_from(x)
                .ok()
                .and_then(|x| Square::new(x, y))
                .ok_or(SfenError::RowWidth {
                    row: y as usize,
                    width: x + 1,
                })?;
            board.place(square, piece);
            x += 1;
        }

        if promoted {
            return Err(SfenError::InvalidPiece('+'));
        }
        if x != BOARD_SIZE as usize {
            return Err(SfenError::RowWidth {
                row: y as usize,
                width: x,
            });
        }
    }

    Ok(board)
}

fn piece_from_char(ch: char, promoted: bool) -> Result<Piece, SfenError> {
    let kind = PieceKind::from_letter(ch).ok_or(SfenError::InvalidPiece(ch))?;
    if promoted && !kind.is_promotable() {
        return Err(SfenError::InvalidPiece(ch));
    }
    let side = if ch.is_ascii_uppercase() {
        Side::Sente
    } else {
        Side::Gote
    };
    Ok(Piece {
        kind,
        side,
        promoted,
    })
}

fn board_to_sfen(board: &Board) -> String {
    let mut rows = Vec::with_capacity(BOARD_SIZE as usize);

    for y in 0..BOARD_SIZE {
        let mut row = String::new();
        let mut empty = 0;

        for square in (0..BOARD_SIZE).filter_map(|x| Square::new(x, y)) {
            match board.at(square) {
                Some(piece) => {
                    if empty > 0 {
                        row.push_str(&empty.to_string());
                        empty = 0;
                    }
                    row.push_str(&piece.symbol());
                }
                None => empty += 1,
            }
        }
        if empty > 0 {
            row.push_str(&empty.to_string());
        }
        rows.push(row);
    }

    rows.join("/")
}

/// Parses `-` or runs like `2Pb` (two Sente pawns, one Gote bishop).
fn parse_hands(hands_str: &str) -> Result<[Hand; 2], SfenError> {
    let mut hands = [Hand::new(), Hand::new()];
    if hands_str == "-" {
        return Ok(hands);
    }

    let invalid = || SfenError::InvalidHand(hands_str.to_string());
    let mut count: Option<usize> = None;

    for ch in hands_str.chars() {
        if let Some(digit) = ch.to_digit(10) {
            let next = count
                .unwrap_or(0)
                .checked_mul(10)
                .and_then(|c| c.checked_add(digit as usize))
                .ok_or_else(invalid)?;
            count = Some(next);
            continue;
        }

        let piece = piece_from_char(ch, false).map_err(|_| invalid())?;
        if piece.kind == PieceKind::King {
            return Err(invalid());
        }
        let run = count.take().unwrap_or(1);
        // Both hands together never hold more than a full set of one kind.
        let held = hands[0].count(piece.kind) + hands[1].count(piece.kind);
        if run == 0 || held + run > piece.kind.set_count() {
            return Err(invalid());
        }
        for _ in 0..run {
            hands[piece.side.index()].push(piece);
        }
    }

    if count.is_some() {
        return Err(invalid());
    }
    Ok(hands)
}

fn hands_to_sfen(hands: &[Hand; 2]) -> String {
    let mut out = String::new();

    for side in Side::ALL {
        for kind in HAND_ORDER {
            let piece = Piece::new(kind, side);
            match hands[side.index()].count(kind) {
                0 => {}
                1 => out.push_str(&piece.symbol()),
                n => out.push_str(&format!("{n}{}", piece.symbol())),
            }
        }
    }

    if out.is_empty() {
        "-".to_string()
    } else {
        out
    }
}

/// Positions used in tests and by the command line.
pub mod positions {
    /// Starting position.
    pub const STARTING: &str =
        "lnsgkgsnl/1r5b1/ppppppppp/9/9/9/PPPPPPPPP/1B5R1/LNSGKGSNL b - 1";

    /// Sente Rook facing a promoted Gote Silver, with pieces in both hands.
    pub const HANDS_MIDGAME: &str = "8k/9/4+s4/9/4R4/9/9/9/K8 b G2Pn 12";
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sq(x: u8, y: u8) -> Square {
        Square::new(x, y).unwrap()
    }

    #[test]
    fn test_parse_starting_position() {
        let state = GameState::from_sfen(positions::STARTING).unwrap();
        assert_eq!(state, GameState::new());
        assert_eq!(state.turn(), Side::Sente);
        assert_eq!(state.move_number(), 1);
    }

    #[test]
    fn test_round_trip() {
        assert_eq!(GameState::new().to_sfen(), positions::STARTING);

        let state = GameState::from_sfen(positions::HANDS_MIDGAME).unwrap();
        assert_eq!(state.to_sfen(), positions::HANDS_MIDGAME);
    }

    #[test]
    fn test_parse_hands_and_promotion() {
        let state = GameState::from_sfen(positions::HANDS_MIDGAME).unwrap();

        assert_eq!(
            state.board().at(sq(4, 2)),
            Some(Piece::new_promoted(PieceKind::Silver, Side::Gote))
        );
        assert_eq!(state.hand(Side::Sente).count(PieceKind::Pawn), 2);
        assert_eq!(state.hand(Side::Sente).count(PieceKind::Gold), 1);
        assert_eq!(state.hand(Side::Gote).count(PieceKind::Knight), 1);
        assert_eq!(state.move_number(), 12);

        // Every pawn of the set split across both hands.
        let state = GameState::from_sfen("8k/9/9/9/9/9/9/9/K8 b 2R10P8p").unwrap();
        assert_eq!(state.hand(Side::Sente).count(PieceKind::Pawn), 10);
        assert_eq!(state.hand(Side::Gote).count(PieceKind::Pawn), 8);
        assert_eq!(state.hand(Side::Sente).count(PieceKind::Rook), 2);
    }

    #[test]
    fn test_move_number_is_optional() {
        let state = GameState::from_sfen("8k/9/9/9/9/9/9/9/K8 w -").unwrap();
        assert_eq!(state.turn(), Side::Gote);
        assert_eq!(state.move_number(), 1);
    }

    #[test]
    fn test_missing_king_parses_as_finished() {
        let state = GameState::from_sfen("9/9/9/9/9/9/9/9/K8 b - 1").unwrap();
        assert_eq!(state.winner(), Some(Side::Sente));
    }

    #[test]
    fn test_invalid_sfen() {
        assert_eq!(GameState::from_sfen("invalid"), Err(SfenError::FieldCount(1)));
        assert_eq!(
            GameState::from_sfen("9/9/9/9/9/9/9/K8 b -"),
            Err(SfenError::RowCount(8))
        );
        assert_eq!(
            GameState::from_sfen("8k/9/9/9/9/9/9/9/K7 b -"),
            Err(SfenError::RowWidth { row: 8, width: 8 })
        );
        assert_eq!(
            GameState::from_sfen("8k/9/9/9/9/9/9/9/K9 b -"),
            Err(SfenError::RowWidth { row: 8, width: 10 })
        );
        assert_eq!(
            GameState::from_sfen("8k/9/9/9/9/9/9/9/+K8 b -"),
            Err(SfenError::InvalidPiece('K'))
        );
        assert_eq!(
            GameState::from_sfen("8k/9/9/9/9/9/9/9/X8 b -"),
            Err(SfenError::InvalidPiece('X'))
        );
        assert_eq!(
            GameState::from_sfen("8k/9/9/9/9/9/9/9/K8 x -"),
            Err(SfenError::InvalidSide("x".to_string()))
        );
        assert!(matches!(
            GameState::from_sfen("8k/9/9/9/9/9/9/9/K8 b 2K"),
            Err(SfenError::InvalidHand(_))
        ));
        for hands in [
            "99999999999999999999999P",
            "1000000000P",
            "19P",
            "10P9p",
            "3R",
            "0P",
            "P0",
            "2",
        ] {
            let sfen = format!("8k/9/9/9/9/9/9/9/K8 b {hands}");
            assert_eq!(
                GameState::from_sfen(&sfen),
                Err(SfenError::InvalidHand(hands.to_string())),
                "{hands}"
            );
        }
        assert!(matches!(
            GameState::from_sfen("8k/9/9/9/9/9/9/9/K8 b - 0"),
            Err(SfenError::InvalidNumber(_))
        ));
    }
}
