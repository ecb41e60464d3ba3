//! Chess piece representation.

use crate::geometry;
use crate::{Color, Square};

/// The six types of chess pieces.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum PieceKind {
    Pawn = 0,
    Knight = 1,
    Bishop = 2,
    Rook = 3,
    Queen = 4,
    King = 5,
}

impl PieceKind {
    /// All piece types in order.
    pub const ALL: [PieceKind; 6] = [
        PieceKind::Pawn,
        PieceKind::Knight,
        PieceKind::Bishop,
        PieceKind::Rook,
        PieceKind::Queen,
        PieceKind::King,
    ];

    /// Returns the index of this piece type (0-5).
    #[inline]
    pub const fn index(self) -> usize {
        self as usize
    }

    /// Letter used in algebraic notation. Pawns have none.
    pub const fn notation_letter(self) -> Option<char> {
        match self {
            PieceKind::Pawn => None,
            PieceKind::Knight => Some('N'),
            PieceKind::Bishop => Some('B'),
            PieceKind::Rook => Some('R'),
            PieceKind::Queen => Some('Q'),
            PieceKind::King => Some('K'),
        }
    }

    /// One-character label used by text renderers (`p` for pawns).
    pub const fn short_name(self) -> char {
        match self.notation_letter() {
            Some(c) => c,
            None => 'p',
        }
    }

    /// Returns true if this piece is a sliding piece (bishop, rook, or queen).
    #[inline]
    pub const fn is_slider(self) -> bool {
        matches!(self, PieceKind::Bishop | PieceKind::Rook | PieceKind::Queen)
    }

    /// Returns true if this piece ignores blockers on its path.
    #[inline]
    pub fn may_jump(self) -> bool {
        geometry::generator(self).may_jump
    }

    /// Returns true if a pawn may promote to this kind.
    #[inline]
    pub const fn is_promotion_choice(self) -> bool {
        !matches!(self, PieceKind::Pawn | PieceKind::King)
    }
}

impl std::fmt::Display for PieceKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            PieceKind::Pawn => "Pawn",
            PieceKind::Knight => "Knight",
            PieceKind::Bishop => "Bishop",
            PieceKind::Rook => "Rook",
            PieceKind::Queen => "Queen",
            PieceKind::King => "King",
        };
        write!(f, "{}", name)
    }
}

/// A pawn's right to capture in passing on the next ply.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EnPassant {
    /// Square the capturing pawn moves to.
    pub target: Square,
    /// Square of the pawn that gets removed.
    pub victim: Square,
}

/// Kind-specific state carried by a piece.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Kind {
    Pawn { en_passant: Option<EnPassant> },
    Knight,
    Bishop,
    Rook,
    Queen,
    King { castle_targets: [Square; 2] },
}

/// A piece in play: its kind, owner, where it started and how often it moved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Piece {
    kind: Kind,
    color: Color,
    home: Square,
    move_count: u32,
}

impl Piece {
    /// Creates an unmoved piece standing on its home square.
    pub fn new(kind: PieceKind, color: Color, home: Square) -> Self {
        let kind = match kind {
            PieceKind::Pawn => Kind::Pawn { en_passant: None },
            PieceKind::Knight => Kind::Knight,
            PieceKind::Bishop => Kind::Bishop,
            PieceKind::Rook => Kind::Rook,
            PieceKind::Queen => Kind::Queen,
            PieceKind::King => Kind::King {
                castle_targets: castle_targets(home),
            },
        };
        Piece {
            kind,
            color,
            home,
            move_count: 0,
        }
    }

    /// Builds the piece that replaces this one after promotion on `square`.
    ///
    /// Color and move count carry over; kind-specific state starts fresh.
    pub fn promote_to(&self, kind: PieceKind, square: Square) -> Piece {
        let mut piece = Piece::new(kind, self.color, square);
        piece.move_count = self.move_count;
        piece
    }

    /// Returns the piece type.
    #[inline]
    pub const fn kind(&self) -> PieceKind {
        match self.kind {
            Kind::Pawn { .. } => PieceKind::Pawn,
            Kind::Knight => PieceKind::Knight,
            Kind::Bishop => PieceKind::Bishop,
            Kind::Rook => PieceKind::Rook,
            Kind::Queen => PieceKind::Queen,
            Kind::King { .. } => PieceKind::King,
        }
    }

    #[inline]
    pub const fn color(&self) -> Color {
        self.color
    }

    /// Square the piece was created on.
    #[inline]
    pub const fn home(&self) -> Square {
        self.home
    }

    /// Number of completed moves.
    #[inline]
    pub const fn move_count(&self) -> u32 {
        self.move_count
    }

    #[inline]
    pub const fn has_moved(&self) -> bool {
        self.move_count > 0
    }

    /// Bumps the move counter after a completed move.
    pub fn record_move(&mut self) {
        self.move_count += 1;
    }

    /// En-passant right of a pawn, if it has one this ply.
    pub const fn en_passant(&self) -> Option<EnPassant> {
        match self.kind {
            Kind::Pawn { en_passant } => en_passant,
            _ => None,
        }
    }

    /// Grants or revokes an en-passant right. Ignored for non-pawns.
    pub fn set_en_passant(&mut self, right: Option<EnPassant>) {
        if let Kind::Pawn { en_passant } = &mut self.kind {
            *en_passant = right;
        }
    }

    /// The king's two castle destinations (queenside first).
    pub const fn castle_targets(&self) -> Option<[Square; 2]> {
        match self.kind {
            Kind::King { castle_targets } => Some(castle_targets),
            _ => None,
        }
    }

    /// Non-capturing destinations from `pos`.
    pub fn valid_moves(&self, pos: Square) -> Vec<Square> {
        (geometry::generator(self.kind()).moves)(self, pos)
    }

    /// Squares threatened for capture from `pos`.
    pub fn valid_capture_moves(&self, pos: Square) -> Vec<Square> {
        (geometry::generator(self.kind()).captures)(self, pos)
    }

    /// Double steps, en-passant and castle destinations from `pos`.
    pub fn specialty_moves(&self, pos: Square) -> Vec<Square> {
        (geometry::generator(self.kind()).specialty)(self, pos)
    }

    #[inline]
    pub fn may_jump(&self) -> bool {
        self.kind().may_jump()
    }
}

fn castle_targets(home: Square) -> [Square; 2] {
    let row = home.row();
    [
        Square::new(row, 2).unwrap_or(home),
        Square::new(row, 6).unwrap_or(home),
    ]
}
