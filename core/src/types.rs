use std::fmt;

/// Width and height of the board.
pub const BOARD_SIZE: u8 = 9;

/// Number of rows at each end of the board that form a promotion zone.
pub const PROMOTION_ZONE_DEPTH: u8 = 3;

/// Represents one of the two players.
///
/// Sente moves first and starts on the bottom rows (6-8), moving towards row 0.
/// Gote starts on the top rows (0-2) and moves towards row 8.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub enum Side {
    Sente,
    Gote,
}

impl Side {
    pub const ALL: [Side; 2] = [Side::Sente, Side::Gote];

    /// Returns the opposite side.
    pub const fn opponent(self) -> Self {
        match self {
            Side::Sente => Side::Gote,
            Side::Gote => Side::Sente,
        }
    }

    /// Returns the row delta of one step forward for this side.
    pub const fn forward(self) -> i8 {
        match self {
            Side::Sente => -1,
            Side::Gote => 1,
        }
    }

    /// Turns a row delta written from Sente's point of view into this side's.
    pub const fn orient(self, dy: i8) -> i8 {
        match self {
            Side::Sente => dy,
            Side::Gote => -dy,
        }
    }

    /// Returns the row farthest from this side's own camp.
    pub const fn farthest_row(self) -> u8 {
        match self {
            Side::Sente => 0,
            Side::Gote => BOARD_SIZE - 1,
        }
    }

    /// Number of rows between `y` and the farthest row (0 on the farthest row itself).
    pub const fn rows_to_far_edge(self, y: u8) -> u8 {
        match self {
            Side::Sente => y,
            Side::Gote => BOARD_SIZE - 1 - y,
        }
    }

    /// Returns true if row `y` lies in this side's promotion zone.
    pub const fn in_promotion_zone(self, y: u8) -> bool {
        y < BOARD_SIZE && self.rows_to_far_edge(y) < PROMOTION_ZONE_DEPTH
    }

    /// Index used for per-side arrays.
    pub const fn index(self) -> usize {
        match self {
            Side::Sente => 0,
            Side::Gote => 1,
        }
    }
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Side::Sente => write!(f, "Sente"),
            Side::Gote => write!(f, "Gote"),
        }
    }
}

// Step and slide tables, written from Sente's point of view (forward is dy = -1).
const KING_STEPS: [(i8, i8); 8] = [
    (-1, -1),
    (0, -1),
    (1, -1),
    (-1, 0),
    (1, 0),
    (-1, 1),
    (0, 1),
    (1, 1),
];
const GOLD_STEPS: [(i8, i8); 6] = [(-1, -1), (0, -1), (1, -1), (-1, 0), (1, 0), (0, 1)];
const SILVER_STEPS: [(i8, i8); 5] = [(-1, -1), (0, -1), (1, -1), (-1, 1), (1, 1)];
const KNIGHT_STEPS: [(i8, i8); 2] = [(-1, -2), (1, -2)];
const PAWN_STEPS: [(i8, i8); 1] = [(0, -1)];
const ORTHOGONALS: [(i8, i8); 4] = [(0, -1), (1, 0), (0, 1), (-1, 0)];
const DIAGONALS: [(i8, i8); 4] = [(-1, -1), (1, -1), (1, 1), (-1, 1)];
const LANCE_RAY: [(i8, i8); 1] = [(0, -1)];

/// The eight kinds of shogi pieces.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub enum PieceKind {
    King,
    Rook,
    Bishop,
    Gold,
    Silver,
    Knight,
    Lance,
    Pawn,
}

impl PieceKind {
    pub const ALL: [PieceKind; 8] = [
        PieceKind::King,
        PieceKind::Rook,
        PieceKind::Bishop,
        PieceKind::Gold,
        PieceKind::Silver,
        PieceKind::Knight,
        PieceKind::Lance,
        PieceKind::Pawn,
    ];

    /// Capture value of an unpromoted piece of this kind.
    pub const fn value(self) -> u32 {
        match self {
            PieceKind::Pawn => 1,
            PieceKind::Lance => 3,
            PieceKind::Knight => 3,
            PieceKind::Silver => 5,
            PieceKind::Gold => 6,
            PieceKind::Bishop => 8,
            PieceKind::Rook => 10,
            PieceKind::King => 100,
        }
    }

    /// How many pieces of this kind a full set holds, both sides together.
    pub const fn set_count(self) -> usize {
        match self {
            PieceKind::Pawn => 18,
            PieceKind::Lance | PieceKind::Knight | PieceKind::Silver | PieceKind::Gold => 4,
            PieceKind::Rook | PieceKind::Bishop | PieceKind::King => 2,
        }
    }

    /// Returns false only for King and Gold.
    pub const fn is_promotable(self) -> bool {
        !matches!(self, PieceKind::King | PieceKind::Gold)
    }

    /// Number of rows nearest the far edge on which an unpromoted piece of this
    /// kind would have no move left: 1 for Pawn and Lance, 2 for Knight.
    pub const fn dead_rows(self) -> u8 {
        match self {
            PieceKind::Pawn | PieceKind::Lance => 1,
            PieceKind::Knight => 2,
            _ => 0,
        }
    }

    /// Step offsets in Sente orientation.
    fn step_table(self, promoted: bool) -> &'static [(i8, i8)] {
        match (self, promoted) {
            (PieceKind::King, _) => &KING_STEPS,
            (PieceKind::Gold, _) => &GOLD_STEPS,
            (PieceKind::Rook, true) => &DIAGONALS,
            (PieceKind::Bishop, true) => &ORTHOGONALS,
            (PieceKind::Rook | PieceKind::Bishop, false) => &[],
            (_, true) => &GOLD_STEPS,
            (PieceKind::Silver, false) => &SILVER_STEPS,
            (PieceKind::Knight, false) => &KNIGHT_STEPS,
            (PieceKind::Pawn, false) => &PAWN_STEPS,
            (PieceKind::Lance, false) => &[],
        }
    }

    /// Ray directions in Sente orientation.
    fn slide_table(self, promoted: bool) -> &'static [(i8, i8)] {
        match (self, promoted) {
            (PieceKind::Rook, _) => &ORTHOGONALS,
            (PieceKind::Bishop, _) => &DIAGONALS,
            (PieceKind::Lance, false) => &LANCE_RAY,
            _ => &[],
        }
    }

    /// Single-step offsets for a piece of this kind, oriented for `side`.
    pub fn movement_offsets(
        self,
        promoted: bool,
        side: Side,
    ) -> impl Iterator<Item = (i8, i8)> {
        self.step_table(promoted)
            .iter()
            .map(move |&(dx, dy)| (dx, side.orient(dy)))
    }

    /// Ray directions for a piece of this kind, oriented for `side`.
    pub fn slide_directions(
        self,
        promoted: bool,
        side: Side,
    ) -> impl Iterator<Item = (i8, i8)> {
        self.slide_table(promoted)
            .iter()
            .map(move |&(dx, dy)| (dx, side.orient(dy)))
    }

    /// Returns the notation letter (uppercase).
    pub const fn letter(self) -> char {
        match self {
            PieceKind::King => 'K',
            PieceKind::Rook => 'R',
            PieceKind::Bishop => 'B',
            PieceKind::Gold => 'G',
            PieceKind::Silver => 'S',
            PieceKind::Knight => 'N',
            PieceKind::Lance => 'L',
            PieceKind::Pawn => 'P',
        }
    }

    /// Parses a notation letter in either case.
    pub const fn from_letter(c: char) -> Option<Self> {
        match c.to_ascii_uppercase() {
            'K' => Some(PieceKind::King),
            'R' => Some(PieceKind::Rook),
            'B' => Some(PieceKind::Bishop),
            'G' => Some(PieceKind::Gold),
            'S' => Some(PieceKind::Silver),
            'N' => Some(PieceKind::Knight),
            'L' => Some(PieceKind::Lance),
            'P' => Some(PieceKind::Pawn),
            _ => None,
        }
    }

    /// English name, with the traditional name of the promoted form.
    pub const fn name(self, promoted: bool) -> &'static str {
        match (self, promoted) {
            (PieceKind::King, _) => "King",
            (PieceKind::Gold, _) => "Gold",
            (PieceKind::Rook, false) => "Rook",
            (PieceKind::Rook, true) => "Dragon",
            (PieceKind::Bishop, false) => "Bishop",
            (PieceKind::Bishop, true) => "Horse",
            (PieceKind::Silver, false) => "Silver",
            (PieceKind::Silver, true) => "Promoted Silver",
            (PieceKind::Knight, false) => "Knight",
            (PieceKind::Knight, true) => "Promoted Knight",
            (PieceKind::Lance, false) => "Lance",
            (PieceKind::Lance, true) => "Promoted Lance",
            (PieceKind::Pawn, false) => "Pawn",
            (PieceKind::Pawn, true) => "Tokin",
        }
    }
}

/// A shogi piece: kind, owner and promotion state.
/// Pieces carry no position; that is implied by where they sit.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub struct Piece {
    pub kind: PieceKind,
    pub side: Side,
    pub promoted: bool,
}

impl Piece {
    /// Creates an unpromoted piece.
    pub const fn new(kind: PieceKind, side: Side) -> Self {
        Self {
            kind,
            side,
            promoted: false,
        }
    }

    /// Creates a promoted piece. Kings and Golds stay unpromoted.
    pub const fn new_promoted(kind: PieceKind, side: Side) -> Self {
        Self {
            kind,
            side,
            promoted: kind.is_promotable(),
        }
    }

    /// Capture value, +2 while promoted.
    pub const fn value(self) -> u32 {
        if self.promoted {
            self.kind.value() + 2
        } else {
            self.kind.value()
        }
    }

    pub fn movement_offsets(self) -> impl Iterator<Item = (i8, i8)> {
        self.kind.movement_offsets(self.promoted, self.side)
    }

    pub fn slide_directions(self) -> impl Iterator<Item = (i8, i8)> {
        self.kind.slide_directions(self.promoted, self.side)
    }

    /// Returns true if a move between these rows may be followed by promotion.
    pub const fn can_promote(self, from_y: u8, to_y: u8) -> bool {
        self.kind.is_promotable()
            && !self.promoted
            && (self.side.in_promotion_zone(from_y) || self.side.in_promotion_zone(to_y))
    }

    /// Returns true if arriving on row `to_y` forces promotion.
    pub const fn must_promote(self, to_y: u8) -> bool {
        !self.promoted && self.side.rows_to_far_edge(to_y) < self.kind.dead_rows()
    }

    /// Returns this piece promoted. No effect on King and Gold.
    pub const fn promote(self) -> Self {
        Self {
            promoted: self.kind.is_promotable(),
            ..self
        }
    }

    /// Returns the piece as it enters `captor`'s hand.
    pub const fn captured_by(self, captor: Side) -> Self {
        Self::new(self.kind, captor)
    }

    /// Notation symbol: uppercase for Sente, lowercase for Gote, `+` when promoted.
    pub fn symbol(self) -> String {
        let letter = match self.side {
            Side::Sente => self.kind.letter(),
            Side::Gote => self.kind.letter().to_ascii_lowercase(),
        };
        if self.promoted {
            format!("+{letter}")
        } else {
            letter.to_string()
        }
    }
}

impl fmt::Display for Piece {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.side, self.kind.name(self.promoted))
    }
}

/// A square on the board, stored as `y * 9 + x`.
/// `x` is the column from the left, `y` the row from the top (Gote's back rank).
#[derive(Clone, Copy, Debug, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub struct Square(u8);

impl Square {
    /// Number of squares on the board.
    pub const COUNT: usize = (BOARD_SIZE as usize) * (BOARD_SIZE as usize);

    /// Creates a square from column and row. Returns None if out of range.
    pub const fn new(x: u8, y: u8) -> Option<Self> {
        if x < BOARD_SIZE && y < BOARD_SIZE {
            Some(Square(y * BOARD_SIZE + x))
        } else {
            None
        }
    }

    /// Creates a square from index (0-80).
    pub const fn from_index(index: u8) -> Option<Self> {
        if (index as usize) < Self::COUNT {
            Some(Square(index))
        } else {
            None
        }
    }

    /// Iterates all squares row by row from the top-left corner.
    pub fn all() -> impl Iterator<Item = Square> {
        (0..Self::COUNT as u8).map(Square)
    }

    pub const fn x(self) -> u8 {
        self.0 % BOARD_SIZE
    }

    pub const fn y(self) -> u8 {
        self.0 / BOARD_SIZE
    }

    pub const fn index(self) -> usize {
        self.0 as usize
    }

    /// Returns true if signed coordinates lie on the board.
    pub const fn is_in_bounds(x: i8, y: i8) -> bool {
        x >= 0 && y >= 0 && x < BOARD_SIZE as i8 && y < BOARD_SIZE as i8
    }

    /// Returns the square displaced by `(dx, dy)`, if it is on the board.
    pub const fn offset(self, dx: i8, dy: i8) -> Option<Self> {
        let x = self.x() as i8 + dx;
        let y = self.y() as i8 + dy;
        if Self::is_in_bounds(x, y) {
            Square::new(x as u8, y as u8)
        } else {
            None
        }
    }

    /// Manhattan distance to another square.
    pub const fn manhattan(self, other: Square) -> u8 {
        self.x().abs_diff(other.x()) + self.y().abs_diff(other.y())
    }

    /// Parses the two-character form used by [`Display`](fmt::Display), e.g. `7g`.
    pub fn parse(s: &str) -> Option<Self> {
        let mut chars = s.chars();
        let file = chars.next()?.to_digit(10)? as u8;
        let rank = chars.next()?;
        if chars.next().is_some() || !(1..=BOARD_SIZE).contains(&file) {
            return None;
        }
        if !rank.is_ascii_lowercase() {
            return None;
        }
        let y = rank as u8 - b'a';
        Square::new(BOARD_SIZE - file, y)
    }
}

/// Squares print as file digit then rank letter: file 9 is the leftmost column,
/// rank `a` the top row.
impl fmt::Display for Square {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}{}",
            BOARD_SIZE - self.x(),
            (b'a' + self.y()) as char
        )
    }
}

/// Something a side can do on its turn.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub enum Action {
    /// Move a piece already on the board.
    Move { from: Square, to: Square },
    /// Drop a piece of this kind from the hand onto an empty square.
    Drop { kind: PieceKind, to: Square },
}

impl Action {
    pub const fn to(self) -> Square {
        match self {
            Action::Move { to, .. } | Action::Drop { to, .. } => to,
        }
    }

    /// Parses `7g7f` or `P*5e`.
    pub fn parse(s: &str) -> Option<Self> {
        let s = s.trim();
        if let Some((kind, to)) = s.split_once('*') {
            let mut letters = kind.chars();
            let kind = PieceKind::from_letter(letters.next()?)?;
            if letters.next().is_some() {
                return None;
            }
            return Some(Action::Drop {
                kind,
                to: Square::parse(to)?,
            });
        }
        if s.len() != 4 || !s.is_ascii() {
            return None;
        }
        Some(Action::Move {
            from: Square::parse(&s[..2])?,
            to: Square::parse(&s[2..])?,
        })
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Action::Move { from, to } => write!(f, "{from}{to}"),
            Action::Drop { kind, to } => write!(f, "{}*{to}", kind.letter()),
        }
    }
}
