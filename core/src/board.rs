/// Board and hand containers.
/// Neither knows any rules beyond where pieces are.
use crate::types::*;

/// Array-based 9x9 board.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Board {
    /// 81 squares, indexed by Square::index()
    squares: [Option<Piece>; Square::COUNT],
}

/// Back rank from left to right, identical for both sides.
const BACK_RANK: [PieceKind; 9] = [
    PieceKind::Lance,
    PieceKind::Knight,
    PieceKind::Silver,
    PieceKind::Gold,
    PieceKind::King,
    PieceKind::Gold,
    PieceKind::Silver,
    PieceKind::Knight,
    PieceKind::Lance,
];

impl Board {
    /// Creates an empty board.
    pub const fn empty() -> Self {
        Self {
            squares: [None; Square::COUNT],
        }
    }

    /// Creates the standard starting position.
    pub fn starting_position() -> Self {
        let mut board = Self::empty();

        for (x, kind) in (0u8..).zip(BACK_RANK) {
            board.put(x, 0, Piece::new(kind, Side::Gote));
            board.put(x, 8, Piece::new(kind, Side::Sente));
            board.put(x, 2, Piece::new(PieceKind::Pawn, Side::Gote));
            board.put(x, 6, Piece::new(PieceKind::Pawn, Side::Sente));
        }

        // Each Rook sits on its owner's right-hand side.
        board.put(1, 1, Piece::new(PieceKind::Rook, Side::Gote));
        board.put(7, 1, Piece::new(PieceKind::Bishop, Side::Gote));
        board.put(1, 7, Piece::new(PieceKind::Bishop, Side::Sente));
        board.put(7, 7, Piece::new(PieceKind::Rook, Side::Sente));

        board
    }

    fn put(&mut self, x: u8, y: u8, piece: Piece) {
        if let Some(square) = Square::new(x, y) {
            self.place(square, piece);
        }
    }

    /// Gets the piece at the given square.
    pub fn at(&self, square: Square) -> Option<Piece> {
        self.squares[square.index()]
    }

    /// Places a piece, returning whatever occupied the square before.
    pub fn place(&mut self, square: Square, piece: Piece) -> Option<Piece> {
        self.squares[square.index()].replace(piece)
    }

    /// Empties a square, returning its occupant.
    pub fn remove(&mut self, square: Square) -> Option<Piece> {
        self.squares[square.index()].take()
    }

    /// Returns true if signed coordinates lie on the board.
    pub const fn is_in_bounds(x: i8, y: i8) -> bool {
        Square::is_in_bounds(x, y)
    }

    /// Returns true if the given square is empty.
    pub fn is_empty(&self, square: Square) -> bool {
        self.at(square).is_none()
    }

    /// Returns true if the given square holds a piece of the given side.
    pub fn is_side(&self, square: Square, side: Side) -> bool {
        self.at(square).is_some_and(|p| p.side == side)
    }

    /// Finds the king of the given side, scanning from the top-left corner.
    pub fn king_square(&self, side: Side) -> Option<Square> {
        Square::all().find(|&square| {
            self.at(square)
                .is_some_and(|p| p.kind == PieceKind::King && p.side == side)
        })
    }

    /// Iterates occupied squares row by row.
    pub fn occupied(&self) -> impl Iterator<Item = (Square, Piece)> + '_ {
        Square::all().filter_map(|square| self.at(square).map(|piece| (square, piece)))
    }

    /// Iterates the pieces of one side row by row.
    pub fn pieces(&self, side: Side) -> impl Iterator<Item = (Square, Piece)> + '_ {
        self.occupied().filter(move |(_, piece)| piece.side == side)
    }

    /// Returns true if column `x` holds an unpromoted pawn of `side`.
    pub fn has_unpromoted_pawn_on_file(&self, x: u8, side: Side) -> bool {
        (0..BOARD_SIZE)
            .filter_map(|y| Square::new(x, y))
            .filter_map(|square| self.at(square))
            .any(|p| p.kind == PieceKind::Pawn && p.side == side && !p.promoted)
    }

    /// Moves the piece on `from` to `to` without any rule checks and returns the
    /// record needed by [`Board::undo_probe`]. Returns None if `from` is empty.
    pub fn apply_probe(&mut self, from: Square, to: Square) -> Option<Probe> {
        let moving = self.remove(from)?;
        let captured = self.place(to, moving);
        Some(Probe {
            from,
            to,
            moving,
            captured,
        })
    }

    /// Restores exactly the state before the matching [`Board::apply_probe`].
    pub fn undo_probe(&mut self, probe: Probe) {
        match probe.captured {
            Some(piece) => self.place(probe.to, piece),
            None => self.remove(probe.to),
        };
        self.place(probe.from, probe.moving);
    }
}

impl Default for Board {
    fn default() -> Self {
        Self::starting_position()
    }
}

/// Undo record for a hypothetical move.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
#[must_use]
pub struct Probe {
    from: Square,
    to: Square,
    moving: Piece,
    captured: Option<Piece>,
}

/// Captured pieces a side may drop, kept in capture order.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct Hand {
    pieces: Vec<Piece>,
}

impl Hand {
    pub const fn new() -> Self {
        Self { pieces: Vec::new() }
    }

    pub fn len(&self) -> usize {
        self.pieces.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pieces.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<Piece> {
        self.pieces.get(index).copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = Piece> + '_ {
        self.pieces.iter().copied()
    }

    /// Adds a piece to the end of the hand.
    pub fn push(&mut self, piece: Piece) {
        self.pieces.push(piece);
    }

    /// Removes and returns the piece at `index`, keeping the order of the rest.
    pub fn take(&mut self, index: usize) -> Option<Piece> {
        (index < self.pieces.len()).then(|| self.pieces.remove(index))
    }

    /// Index of the first piece of the given kind.
    pub fn position(&self, kind: PieceKind) -> Option<usize> {
        self.pieces.iter().position(|p| p.kind == kind)
    }

    /// Number of pieces of the given kind.
    pub fn count(&self, kind: PieceKind) -> usize {
        self.pieces.iter().filter(|p| p.kind == kind).count()
    }
}
