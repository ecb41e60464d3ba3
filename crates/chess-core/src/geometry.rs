//! Per-kind move geometry.
//!
//! Every generator is a pure function of a piece's intrinsic state and the
//! square it stands on. Nothing here looks at the board: sliding pieces list
//! their full rays and the board truncates them at the first blocker.

use crate::{Piece, PieceKind, Square};

/// Geometry callbacks for one piece kind.
pub struct MoveGenerator {
    /// Non-capturing destinations.
    pub moves: fn(&Piece, Square) -> Vec<Square>,
    /// Squares threatened for capture.
    pub captures: fn(&Piece, Square) -> Vec<Square>,
    /// Kind-specific extras (double step, en passant, castling).
    pub specialty: fn(&Piece, Square) -> Vec<Square>,
    /// Whether blockers on the path are ignored.
    pub may_jump: bool,
}

/// Generator table indexed by [`PieceKind::index`].
static GENERATORS: [MoveGenerator; 6] = [
    // Pawn
    MoveGenerator {
        moves: pawn_moves,
        captures: pawn_captures,
        specialty: pawn_specialty,
        may_jump: false,
    },
    // Knight
    MoveGenerator {
        moves: knight_moves,
        captures: knight_moves,
        specialty: no_moves,
        may_jump: true,
    },
    // Bishop
    MoveGenerator {
        moves: bishop_moves,
        captures: bishop_moves,
        specialty: no_moves,
        may_jump: false,
    },
    // Rook
    MoveGenerator {
        moves: rook_moves,
        captures: rook_moves,
        specialty: no_moves,
        may_jump: false,
    },
    // Queen
    MoveGenerator {
        moves: queen_moves,
        captures: queen_moves,
        specialty: no_moves,
        may_jump: false,
    },
    // King
    MoveGenerator {
        moves: king_moves,
        captures: king_moves,
        specialty: king_specialty,
        may_jump: false,
    },
];

const ORTHOGONAL: [(i8, i8); 4] = [(1, 0), (-1, 0), (0, 1), (0, -1)];
const DIAGONAL: [(i8, i8); 4] = [(1, 1), (1, -1), (-1, 1), (-1, -1)];
const KNIGHT_JUMPS: [(i8, i8); 8] = [
    (2, 1),
    (2, -1),
    (-2, 1),
    (-2, -1),
    (1, 2),
    (1, -2),
    (-1, 2),
    (-1, -2),
];

/// Returns the generator for a piece kind.
#[inline]
pub fn generator(kind: PieceKind) -> &'static MoveGenerator {
    &GENERATORS[kind.index()]
}

fn no_moves(_piece: &Piece, _pos: Square) -> Vec<Square> {
    Vec::new()
}

fn steps(pos: Square, deltas: &[(i8, i8)]) -> Vec<Square> {
    deltas
        .iter()
        .filter_map(|&(d_row, d_col)| pos.offset(d_row, d_col))
        .collect()
}

fn rays(pos: Square, directions: &[(i8, i8)]) -> Vec<Square> {
    let mut squares = Vec::new();
    for &(d_row, d_col) in directions {
        let mut current = pos.offset(d_row, d_col);
        while let Some(sq) = current {
            squares.push(sq);
            current = sq.offset(d_row, d_col);
        }
    }
    squares
}

fn pawn_moves(piece: &Piece, pos: Square) -> Vec<Square> {
    let dir = piece.color().pawn_direction();
    pos.offset(dir, 0).into_iter().collect()
}

fn pawn_captures(piece: &Piece, pos: Square) -> Vec<Square> {
    let dir = piece.color().pawn_direction();
    steps(pos, &[(dir, -1), (dir, 1)])
}

fn pawn_specialty(piece: &Piece, pos: Square) -> Vec<Square> {
    let color = piece.color();
    let mut squares = Vec::new();
    if pos.row() == color.pawn_rank() {
        squares.extend(pos.offset(2 * color.pawn_direction(), 0));
    }
    if let Some(right) = piece.en_passant() {
        squares.push(right.target);
    }
    squares
}

fn knight_moves(_piece: &Piece, pos: Square) -> Vec<Square> {
    steps(pos, &KNIGHT_JUMPS)
}

fn bishop_moves(_piece: &Piece, pos: Square) -> Vec<Square> {
    rays(pos, &DIAGONAL)
}

fn rook_moves(_piece: &Piece, pos: Square) -> Vec<Square> {
    rays(pos, &ORTHOGONAL)
}

fn queen_moves(_piece: &Piece, pos: Square) -> Vec<Square> {
    let mut squares = rays(pos, &ORTHOGONAL);
    squares.extend(rays(pos, &DIAGONAL));
    squares
}

fn king_moves(_piece: &Piece, pos: Square) -> Vec<Square> {
    let mut squares = steps(pos, &ORTHOGONAL);
    squares.extend(steps(pos, &DIAGONAL));
    squares
}

fn king_specialty(piece: &Piece, _pos: Square) -> Vec<Square> {
    match piece.castle_targets() {
        Some(targets) if !piece.has_moved() => targets.to_vec(),
        _ => Vec::new(),
    }
}
