//! Algebraic notation for moves played on a [`Board`].
//!
//! Examples: "e4", "Nf3", "Bxc6", "exd6", "Nbd2", "R1e1", "O-O".
//! Promotion (`=Q`) and check (`+`, `#`) suffixes are appended by the game
//! once they are known.

use crate::board::{Board, CheckStatus, MovePlan};
use chess_core::{PieceKind, Square};

/// Describes a move before it is applied.
///
/// The board must be in the state BEFORE the move and the move must be legal.
pub(crate) fn describe(board: &Board, from: Square, to: Square, plan: MovePlan) -> String {
    if let MovePlan::Castle(castle) = plan {
        return castle.side.notation().to_string();
    }

    let Some(piece) = board.piece_at(from) else {
        return String::new();
    };
    let kind = piece.kind();
    let mut text = String::new();

    if let Some(letter) = kind.notation_letter() {
        text.push(letter);
        text.push_str(&disambiguation(board, from, to, kind));
    }

    let is_capture =
        board.piece_at(to).is_some() || matches!(plan, MovePlan::EnPassant { .. });
    if is_capture {
        if kind == PieceKind::Pawn {
            text.push(from.file_char());
        }
        text.push('x');
    }

    text.push_str(&to.to_algebraic());
    text
}

/// File, rank or both of `from` when another piece of the same kind and
/// color could also legally reach `to`.
fn disambiguation(board: &Board, from: Square, to: Square, kind: PieceKind) -> String {
    let Some(color) = board.piece_at(from).map(|p| p.color()) else {
        return String::new();
    };

    let same_dest: Vec<Square> = board
        .pieces_of(color)
        .map(|(sq, _)| sq)
        .filter(|&sq| board.piece_at(sq).is_some_and(|p| p.kind() == kind))
        .filter(|&sq| sq == from || board.legal_move(color, sq, to, true))
        .collect();

    if same_dest.len() <= 1 {
        return String::new();
    }

    let same_file = same_dest.iter().filter(|sq| sq.col() == from.col()).count();
    if same_file == 1 {
        return from.file_char().to_string();
    }

    let same_rank = same_dest.iter().filter(|sq| sq.row() == from.row()).count();
    if same_rank == 1 {
        return from.rank_char().to_string();
    }

    from.to_algebraic()
}

/// `=X` marker for a finalized promotion.
pub fn promotion_suffix(kind: PieceKind) -> String {
    format!("={}", kind.short_name())
}

/// `+` for check, `#` for checkmate.
pub fn check_suffix(status: CheckStatus) -> Option<char> {
    match status {
        CheckStatus {
            checkmate: true, ..
        } => Some('#'),
        CheckStatus { check: true, .. } => Some('+'),
        _ => None,
    }
}
