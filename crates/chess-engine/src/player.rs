//! Per-side rosters of active and captured pieces.

use crate::board::{Board, PieceId};
use chess_core::{Color, Piece, PieceKind, Square};

/// Back-rank columns for each non-pawn kind, in setup order.
const BACK_RANK: [(PieceKind, &[u8]); 5] = [
    (PieceKind::Rook, &[0, 7]),
    (PieceKind::Knight, &[1, 6]),
    (PieceKind::Bishop, &[2, 5]),
    (PieceKind::King, &[4]),
    (PieceKind::Queen, &[3]),
];

/// One side of the game.
///
/// A player only tracks which pieces it owns. Where they stand and what they
/// may do is the board's business.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Player {
    color: Color,
    active: Vec<PieceId>,
    captured: Vec<PieceId>,
}

impl Player {
    pub fn new(color: Color) -> Self {
        Player {
            color,
            active: Vec::with_capacity(16),
            captured: Vec::new(),
        }
    }

    /// Creates this side's 16 pieces and places them on their home squares.
    pub fn setup(&mut self, board: &mut Board) {
        let color = self.color;
        for col in 0..8 {
            if let Some(home) = Square::new(color.pawn_rank(), col) {
                self.place(board, PieceKind::Pawn, home);
            }
        }
        for (kind, cols) in BACK_RANK {
            for &col in cols {
                if let Some(home) = Square::new(color.back_rank(), col) {
                    self.place(board, kind, home);
                }
            }
        }
    }

    fn place(&mut self, board: &mut Board, kind: PieceKind, home: Square) {
        let id = board.add_piece(Piece::new(kind, self.color, home), home);
        self.add(id);
    }

    #[inline]
    pub fn color(&self) -> Color {
        self.color
    }

    /// Pieces still in play.
    #[inline]
    pub fn active(&self) -> &[PieceId] {
        &self.active
    }

    /// Opponent pieces this player has taken.
    #[inline]
    pub fn captured(&self) -> &[PieceId] {
        &self.captured
    }

    pub fn add(&mut self, id: PieceId) {
        if !self.active.contains(&id) {
            self.active.push(id);
        }
    }

    /// Drops a piece from the active roster. Returns false if it was not there.
    pub fn remove(&mut self, id: PieceId) -> bool {
        match self.active.iter().position(|&p| p == id) {
            Some(index) => {
                self.active.remove(index);
                true
            }
            None => false,
        }
    }

    pub fn record_capture(&mut self, id: PieceId) {
        self.captured.push(id);
    }

    #[inline]
    pub fn contains(&self, id: PieceId) -> bool {
        self.active.contains(&id)
    }
}
