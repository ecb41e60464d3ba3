//! Mailbox board with legality checking and check detection.
//!
//! The [`Board`] owns every piece in an arena and keeps a 64-entry grid of
//! [`PieceId`] handles. All legality queries take `&self`; the self-check
//! simulation works on a copy of the grid, so a hypothetical position is
//! never visible through the board itself.

use crate::notation;
use chess_core::{Color, EnPassant, Piece, PieceKind, Shade, Square, SquareSet};
use tracing::{debug, trace};

/// Handle of a piece in the board's arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PieceId(usize);

impl PieceId {
    /// Returns the arena index.
    #[inline]
    pub const fn index(self) -> usize {
        self.0
    }
}

/// Read-only view of one board square.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Cell {
    pub shade: Shade,
    pub occupant: Option<PieceId>,
}

impl Cell {
    #[inline]
    pub const fn is_occupied(&self) -> bool {
        self.occupant.is_some()
    }
}

/// Which wing a castling move goes to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CastleSide {
    Kingside,
    Queenside,
}

impl CastleSide {
    /// Notation marker for this castle (`O-O` or `O-O-O`).
    pub const fn notation(self) -> &'static str {
        match self {
            CastleSide::Kingside => "O-O",
            CastleSide::Queenside => "O-O-O",
        }
    }
}

/// The rook half of a castling move.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CastleMove {
    pub side: CastleSide,
    pub rook_from: Square,
    pub rook_to: Square,
}

/// How a legal move is carried out.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum MovePlan {
    Normal,
    DoubleStep,
    EnPassant { victim: Square },
    Castle(CastleMove),
}

/// Everything that happened when a move was applied.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MoveRecord {
    pub from: Square,
    pub to: Square,
    /// The piece that moved.
    pub piece: PieceId,
    pub kind: PieceKind,
    pub captured: Option<PieceId>,
    /// Where the captured piece stood. Differs from `to` for en passant.
    pub captured_square: Option<Square>,
    pub castle: Option<CastleMove>,
    pub en_passant: bool,
    /// The moved pawn reached the last rank and awaits a promotion choice.
    pub promotion_pending: bool,
    /// Algebraic notation without check or promotion suffixes.
    pub notation: String,
}

/// A pawn on the last rank waiting to be replaced.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PendingPromotion {
    pub pawn: PieceId,
    pub square: Square,
    pub color: Color,
    /// Tentative choice shown to the player before finalizing.
    pub choice: Option<PieceKind>,
}

/// Result of finalizing a promotion.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Promotion {
    /// The retired pawn.
    pub pawn: PieceId,
    /// The newly created piece.
    pub piece: PieceId,
    pub square: Square,
    pub kind: PieceKind,
}

/// Check state of one side.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CheckStatus {
    pub check: bool,
    pub checkmate: bool,
}

type Grid = [Option<PieceId>; 64];

/// Occupancy grid plus the arena it points into.
#[derive(Clone, Copy)]
struct Layout<'a> {
    grid: &'a Grid,
    pieces: &'a [Piece],
}

impl<'a> Layout<'a> {
    #[inline]
    fn piece_at(self, sq: Square) -> Option<&'a Piece> {
        self.grid[sq.index() as usize].map(|id| &self.pieces[id.0])
    }

    fn path_clear(self, from: Square, to: Square) -> bool {
        from.between(to)
            .into_iter()
            .all(|sq| self.grid[sq.index() as usize].is_none())
    }

    /// Capture geometry of the piece on `from`, truncated at blockers.
    fn attacks_from(self, from: Square) -> SquareSet {
        let Some(piece) = self.piece_at(from) else {
            return SquareSet::EMPTY;
        };
        piece
            .valid_capture_moves(from)
            .into_iter()
            .filter(|&to| piece.may_jump() || self.path_clear(from, to))
            .collect()
    }

    fn under_attack_by(self, color: Color) -> SquareSet {
        let mut attacked = SquareSet::EMPTY;
        for sq in Square::all() {
            if self.piece_at(sq).is_some_and(|p| p.color() == color) {
                attacked |= self.attacks_from(sq);
            }
        }
        attacked
    }
}

/// An 8×8 chess board.
#[derive(Debug, Clone)]
pub struct Board {
    grid: Grid,
    pieces: Vec<Piece>,
    king_positions: [Option<Square>; 2],
    en_passant_pawns: Vec<PieceId>,
    pending_promotion: Option<PendingPromotion>,
}

impl Default for Board {
    fn default() -> Self {
        Self::new()
    }
}

impl Board {
    /// Creates an empty board.
    pub fn new() -> Self {
        Board {
            grid: [None; 64],
            pieces: Vec::with_capacity(32),
            king_positions: [None; 2],
            en_passant_pawns: Vec::new(),
            pending_promotion: None,
        }
    }

    #[inline]
    fn layout(&self) -> Layout<'_> {
        Layout {
            grid: &self.grid,
            pieces: &self.pieces,
        }
    }

    /// Returns the square's shade and occupant.
    #[inline]
    pub fn get(&self, sq: Square) -> Cell {
        Cell {
            shade: sq.shade(),
            occupant: self.grid[sq.index() as usize],
        }
    }

    /// Places `occupant` on `sq` (or empties it), keeping the king cache in sync.
    ///
    /// This is the only place the grid is written, so the cache can never
    /// drift from the actual king squares. Placing a piece that already
    /// stands elsewhere moves it: its previous square is emptied.
    pub fn set(&mut self, occupant: Option<PieceId>, sq: Square) {
        let slot = sq.index() as usize;
        if let Some(id) = occupant {
            if let Some(old) = self.grid.iter().position(|&held| held == Some(id)) {
                self.grid[old] = None;
            }
        }
        if let Some(previous) = self.grid[slot] {
            let piece = &self.pieces[previous.0];
            let color = piece.color().index();
            if piece.kind() == PieceKind::King && self.king_positions[color] == Some(sq) {
                self.king_positions[color] = None;
            }
        }

        self.grid[slot] = occupant;

        if let Some(id) = occupant {
            let piece = &self.pieces[id.0];
            if piece.kind() == PieceKind::King {
                self.king_positions[piece.color().index()] = Some(sq);
            }
        }
    }

    /// Registers a new piece in the arena and places it on `sq`.
    pub fn add_piece(&mut self, piece: Piece, sq: Square) -> PieceId {
        let id = PieceId(self.pieces.len());
        self.pieces.push(piece);
        self.set(Some(id), sq);
        id
    }

    /// Returns the piece behind a handle.
    ///
    /// # Panics
    ///
    /// Panics if `id` was not issued by this board.
    #[inline]
    pub fn piece(&self, id: PieceId) -> &Piece {
        &self.pieces[id.0]
    }

    #[inline]
    pub fn occupant(&self, sq: Square) -> Option<PieceId> {
        self.grid[sq.index() as usize]
    }

    #[inline]
    pub fn piece_at(&self, sq: Square) -> Option<&Piece> {
        self.layout().piece_at(sq)
    }

    /// Squares and handles of every piece of `color` on the board.
    pub fn pieces_of(&self, color: Color) -> impl Iterator<Item = (Square, PieceId)> + '_ {
        Square::all().filter_map(move |sq| {
            self.occupant(sq)
                .filter(|&id| self.pieces[id.0].color() == color)
                .map(|id| (sq, id))
        })
    }

    /// Number of pieces currently on the board.
    pub fn piece_count(&self) -> usize {
        self.grid.iter().filter(|slot| slot.is_some()).count()
    }

    #[inline]
    pub fn king_position(&self, color: Color) -> Option<Square> {
        self.king_positions[color.index()]
    }

    /// King squares indexed by [`Color::index`].
    #[inline]
    pub fn king_positions(&self) -> [Option<Square>; 2] {
        self.king_positions
    }

    #[inline]
    pub fn pending_promotion(&self) -> Option<&PendingPromotion> {
        self.pending_promotion.as_ref()
    }

    /// Pawns that may capture en passant on this ply.
    #[inline]
    pub fn en_passant_pawns(&self) -> &[PieceId] {
        &self.en_passant_pawns
    }

    /// Returns true if `color` may move the piece on `from` to `to`.
    ///
    /// With `verify_self_check` the move is also rejected when it would
    /// leave the mover's own king attacked.
    pub fn legal_move(
        &self,
        color: Color,
        from: Square,
        to: Square,
        verify_self_check: bool,
    ) -> bool {
        self.plan_move(color, from, to, verify_self_check).is_some()
    }

    pub(crate) fn plan_move(
        &self,
        color: Color,
        from: Square,
        to: Square,
        verify_self_check: bool,
    ) -> Option<MovePlan> {
        if from == to {
            return None;
        }
        let mover = self.piece_at(from).filter(|p| p.color() == color)?;
        let target = self.piece_at(to);
        if target.is_some_and(|t| t.color() == color) {
            return None;
        }

        let geometric = match target {
            Some(_) => mover.valid_capture_moves(from),
            None => mover.valid_moves(from),
        };
        let plan = if geometric.contains(&to) {
            MovePlan::Normal
        } else if target.is_none() && mover.specialty_moves(from).contains(&to) {
            self.specialty_plan(mover, from, to)?
        } else {
            return None;
        };

        if !mover.may_jump() && !self.layout().path_clear(from, to) {
            return None;
        }
        if verify_self_check && self.exposes_king(color, from, to, plan) {
            return None;
        }
        Some(plan)
    }

    fn specialty_plan(&self, mover: &Piece, from: Square, to: Square) -> Option<MovePlan> {
        let color = mover.color();
        match mover.kind() {
            PieceKind::King => self.may_castle(color, from, to).map(MovePlan::Castle),
            PieceKind::Pawn => match mover.en_passant() {
                Some(right) if right.target == to => {
                    let victim = self.piece_at(right.victim)?;
                    (victim.kind() == PieceKind::Pawn && victim.color() != color)
                        .then_some(MovePlan::EnPassant {
                            victim: right.victim,
                        })
                }
                _ => (from.offset(2 * color.pawn_direction(), 0) == Some(to))
                    .then_some(MovePlan::DoubleStep),
            },
            _ => None,
        }
    }

    /// Castling rules for a king on `from` heading to `to`.
    ///
    /// The corner rook on the destination side must be an unmoved rook of
    /// the same color, everything between king and rook must be empty, and
    /// no square the king stands on or crosses may be attacked.
    fn may_castle(&self, color: Color, from: Square, to: Square) -> Option<CastleMove> {
        if from.row() != color.back_rank() || from.col() != 4 || from.row() != to.row() {
            return None;
        }
        let row = from.row();
        let (side, rook_from, rook_to) = if to.col() > from.col() {
            (
                CastleSide::Kingside,
                Square::new(row, 7)?,
                Square::new(row, to.col() - 1)?,
            )
        } else {
            (
                CastleSide::Queenside,
                Square::new(row, 0)?,
                Square::new(row, to.col() + 1)?,
            )
        };

        let rook = self.piece_at(rook_from)?;
        if rook.kind() != PieceKind::Rook || rook.color() != color || rook.has_moved() {
            return None;
        }
        if !self.layout().path_clear(from, rook_from) {
            return None;
        }

        let attacked = self.under_attack_by(color.opposite());
        let mut king_path = from.between(to);
        king_path.push(from);
        king_path.push(to);
        if king_path.into_iter().any(|sq| attacked.contains(sq)) {
            debug!(%from, %to, "castling blocked by attacked square");
            return None;
        }

        Some(CastleMove {
            side,
            rook_from,
            rook_to,
        })
    }

    /// Plays the move on a copy of the grid and reports whether the mover's
    /// king ends up attacked.
    fn exposes_king(&self, color: Color, from: Square, to: Square, plan: MovePlan) -> bool {
        let mut grid = self.grid;
        grid[to.index() as usize] = grid[from.index() as usize].take();
        match plan {
            MovePlan::EnPassant { victim } => grid[victim.index() as usize] = None,
            MovePlan::Castle(castle) => {
                grid[castle.rook_to.index() as usize] =
                    grid[castle.rook_from.index() as usize].take();
            }
            MovePlan::Normal | MovePlan::DoubleStep => {}
        }

        let moving_king = self
            .piece_at(from)
            .is_some_and(|p| p.kind() == PieceKind::King);
        let king_square = if moving_king {
            Some(to)
        } else {
            self.king_position(color)
        };
        let Some(king_square) = king_square else {
            return false;
        };

        let hypothetical = Layout {
            grid: &grid,
            pieces: &self.pieces,
        };
        hypothetical
            .under_attack_by(color.opposite())
            .contains(king_square)
    }

    /// Every square threatened by a piece of `color`.
    ///
    /// Squares holding `color`'s own pieces count as attacked (they are
    /// defended), and pawns threaten their diagonals whether or not an
    /// enemy stands there.
    pub fn under_attack_by(&self, color: Color) -> SquareSet {
        let attacked = self.layout().under_attack_by(color);
        trace!(%color, squares = attacked.len(), "computed attack set");
        attacked
    }

    /// Returns true if any piece of `by` threatens `sq`.
    pub fn is_attacked(&self, sq: Square, by: Color) -> bool {
        self.pieces_of(by)
            .any(|(from, _)| self.layout().attacks_from(from).contains(sq))
    }

    /// Squares of the pieces of `by` that threaten `sq`.
    pub fn attackers_of(&self, sq: Square, by: Color) -> Vec<Square> {
        self.pieces_of(by)
            .map(|(from, _)| from)
            .filter(|&from| self.layout().attacks_from(from).contains(sq))
            .collect()
    }

    /// Legal non-capturing and special destinations of the piece on `from`.
    ///
    /// Captures by pieces other than pawns also show up here because their
    /// capture geometry equals their move geometry.
    pub fn legal_moves(&self, from: Square, verify_self_check: bool) -> Vec<Square> {
        let Some(piece) = self.piece_at(from) else {
            return Vec::new();
        };
        let mut candidates = piece.valid_moves(from);
        candidates.extend(piece.specialty_moves(from));
        self.filter_legal(piece.color(), from, candidates, verify_self_check)
    }

    /// Legal capture destinations of the piece on `from`.
    pub fn legal_capture_moves(&self, from: Square, verify_self_check: bool) -> Vec<Square> {
        let Some(piece) = self.piece_at(from) else {
            return Vec::new();
        };
        let candidates = piece.valid_capture_moves(from);
        self.filter_legal(piece.color(), from, candidates, verify_self_check)
    }

    fn filter_legal(
        &self,
        color: Color,
        from: Square,
        candidates: Vec<Square>,
        verify_self_check: bool,
    ) -> Vec<Square> {
        candidates
            .into_iter()
            .filter(|&to| self.legal_move(color, from, to, verify_self_check))
            .collect::<SquareSet>()
            .iter()
            .collect()
    }

    /// Returns true if `color` has at least one verified legal move.
    pub fn has_legal_move(&self, color: Color) -> bool {
        self.pieces_of(color).any(|(from, _)| {
            !self.legal_moves(from, true).is_empty()
                || !self.legal_capture_moves(from, true).is_empty()
        })
    }

    /// Reports whether `color` is in check and whether it is checkmated.
    ///
    /// The king's own verified moves decide whether it can step out of
    /// check, whatever the number of attackers. Capturing or blocking is
    /// only considered against a single attacker.
    pub fn check_or_mate(&self, color: Color) -> CheckStatus {
        let Some(king_square) = self.king_position(color) else {
            return CheckStatus::default();
        };
        let attackers = self.attackers_of(king_square, color.opposite());
        if attackers.is_empty() {
            return CheckStatus::default();
        }

        let escaped = !self.legal_moves(king_square, true).is_empty()
            || !self.legal_capture_moves(king_square, true).is_empty();
        let resolved = escaped
            || match attackers[..] {
                [attacker] => {
                    self.ally_can_capture(color, attacker, king_square)
                        || self.ally_can_interpose(color, attacker, king_square)
                }
                _ => false,
            };

        CheckStatus {
            check: true,
            checkmate: !resolved,
        }
    }

    fn allies(&self, color: Color, king_square: Square) -> impl Iterator<Item = Square> + '_ {
        self.pieces_of(color)
            .map(|(sq, _)| sq)
            .filter(move |&sq| sq != king_square)
    }

    fn ally_can_capture(&self, color: Color, attacker: Square, king_square: Square) -> bool {
        self.allies(color, king_square).any(|sq| {
            if self.legal_move(color, sq, attacker, true) {
                return true;
            }
            // A checking pawn that just double-stepped can be taken in passing.
            self.piece_at(sq)
                .and_then(Piece::en_passant)
                .is_some_and(|right| {
                    right.victim == attacker && self.legal_move(color, sq, right.target, true)
                })
        })
    }

    fn ally_can_interpose(&self, color: Color, attacker: Square, king_square: Square) -> bool {
        if self.piece_at(attacker).is_some_and(Piece::may_jump) {
            return false;
        }
        let gaps = attacker.between(king_square);
        self.allies(color, king_square).any(|sq| {
            gaps.iter()
                .any(|&gap| self.legal_move(color, sq, gap, true))
        })
    }

    /// Applies a move for `color`, returning what happened, or `None` if the
    /// move is illegal. A rejected move leaves the board untouched.
    pub fn make_move(&mut self, color: Color, from: Square, to: Square) -> Option<MoveRecord> {
        if let Some(pending) = self.pending_promotion {
            debug!(square = %pending.square, "move rejected: promotion pending");
            return None;
        }
        let Some(plan) = self.plan_move(color, from, to, true) else {
            debug!(%color, %from, %to, "illegal move rejected");
            return None;
        };
        let mover = self.occupant(from)?;
        let kind = self.pieces[mover.0].kind();
        let notation = notation::describe(self, from, to, plan);

        self.clear_en_passant();

        let captured_square = match plan {
            MovePlan::EnPassant { victim } => Some(victim),
            _ => self.occupant(to).map(|_| to),
        };
        let captured = captured_square.and_then(|sq| self.occupant(sq));
        if let MovePlan::EnPassant { victim } = plan {
            debug!(%from, %to, %victim, "en passant capture");
            self.set(None, victim);
        }

        self.set(None, from);
        self.set(Some(mover), to);
        self.pieces[mover.0].record_move();

        let castle = match plan {
            MovePlan::Castle(castle) => {
                let rook = self.occupant(castle.rook_from);
                self.set(None, castle.rook_from);
                self.set(rook, castle.rook_to);
                if let Some(rook) = rook {
                    self.pieces[rook.0].record_move();
                }
                debug!(%color, side = castle.side.notation(), "castled");
                Some(castle)
            }
            _ => None,
        };

        if plan == MovePlan::DoubleStep {
            self.mark_en_passant(color, from, to);
        }

        let promotion_pending =
            kind == PieceKind::Pawn && to.row() == color.promotion_rank();
        if promotion_pending {
            debug!(%color, square = %to, "pawn awaits promotion");
            self.pending_promotion = Some(PendingPromotion {
                pawn: mover,
                square: to,
                color,
                choice: None,
            });
        }

        Some(MoveRecord {
            from,
            to,
            piece: mover,
            kind,
            captured,
            captured_square,
            castle,
            en_passant: matches!(plan, MovePlan::EnPassant { .. }),
            promotion_pending,
            notation,
        })
    }

    fn clear_en_passant(&mut self) {
        for id in self.en_passant_pawns.drain(..) {
            self.pieces[id.0].set_en_passant(None);
        }
    }

    /// Grants opposing pawns beside the double-stepped pawn the right to
    /// capture it in passing on the next ply.
    fn mark_en_passant(&mut self, color: Color, from: Square, to: Square) {
        let Some(passed) = from.offset(color.pawn_direction(), 0) else {
            return;
        };
        for d_col in [-1, 1] {
            let Some(side) = to.offset(0, d_col) else {
                continue;
            };
            let Some(id) = self.occupant(side) else {
                continue;
            };
            let neighbour = &mut self.pieces[id.0];
            if neighbour.kind() == PieceKind::Pawn && neighbour.color() != color {
                neighbour.set_en_passant(Some(EnPassant {
                    target: passed,
                    victim: to,
                }));
                self.en_passant_pawns.push(id);
            }
        }
    }

    /// Records a tentative promotion choice. Returns false when no promotion
    /// is pending or `kind` is not a valid choice.
    pub fn set_promotion_choice(&mut self, kind: PieceKind) -> bool {
        match &mut self.pending_promotion {
            Some(pending) if kind.is_promotion_choice() => {
                pending.choice = Some(kind);
                true
            }
            _ => false,
        }
    }

    /// Replaces the pending pawn with a new piece of `kind`.
    pub fn promote(&mut self, kind: PieceKind) -> Option<Promotion> {
        if !kind.is_promotion_choice() {
            return None;
        }
        let pending = self.pending_promotion.take()?;
        let piece = self.pieces[pending.pawn.0].promote_to(kind, pending.square);
        let id = self.add_piece(piece, pending.square);
        debug!(color = %pending.color, square = %pending.square, %kind, "pawn promoted");
        Some(Promotion {
            pawn: pending.pawn,
            piece: id,
            square: pending.square,
            kind,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sq(s: &str) -> Square {
        Square::from_algebraic(s).unwrap()
    }

    fn place(board: &mut Board, kind: PieceKind, color: Color, at: &str) -> PieceId {
        board.add_piece(Piece::new(kind, color, sq(at)), sq(at))
    }

    /// Kings on e1/e8 plus the given pieces.
    fn with_kings(extra: &[(PieceKind, Color, &str)]) -> Board {
        let mut board = Board::new();
        place(&mut board, PieceKind::King, Color::White, "e1");
        place(&mut board, PieceKind::King, Color::Black, "e8");
        for &(kind, color, at) in extra {
            place(&mut board, kind, color, at);
        }
        board
    }

    #[test]
    fn cells_have_shades() {
        let board = Board::new();
        assert_eq!(board.get(Square::A1).shade, Shade::Dark);
        assert_eq!(board.get(Square::H1).shade, Shade::Light);
        assert!(!board.get(Square::A1).is_occupied());
    }

    #[test]
    fn set_keeps_king_cache_in_sync() {
        let mut board = Board::new();
        let king = place(&mut board, PieceKind::King, Color::White, "e1");
        assert_eq!(board.king_position(Color::White), Some(Square::E1));

        board.set(None, Square::E1);
        assert_eq!(board.king_position(Color::White), None);

        board.set(Some(king), Square::F1);
        assert_eq!(board.king_position(Color::White), Some(Square::F1));
        assert_eq!(board.king_positions(), [Some(Square::F1), None]);
    }

    #[test]
    fn set_moves_a_piece_already_on_the_board() {
        let mut board = Board::new();
        let king = place(&mut board, PieceKind::King, Color::White, "e1");

        board.set(Some(king), Square::F1);
        assert!(board.occupant(Square::E1).is_none());
        assert_eq!(board.occupant(Square::F1), Some(king));
        assert_eq!(board.piece_count(), 1);
        assert_eq!(board.king_position(Color::White), Some(Square::F1));

        // Putting it back on the same square is a no-op.
        board.set(Some(king), Square::F1);
        assert_eq!(board.piece_count(), 1);
        assert_eq!(board.king_position(Color::White), Some(Square::F1));
    }

    #[test]
    fn same_color_target_rejected() {
        let board = with_kings(&[
            (PieceKind::Rook, Color::White, "a1"),
            (PieceKind::Pawn, Color::White, "a2"),
        ]);
        assert!(!board.legal_move(Color::White, Square::A1, sq("a2"), true));
    }

    #[test]
    fn wrong_color_or_empty_origin_rejected() {
        let board = with_kings(&[(PieceKind::Rook, Color::White, "a1")]);
        assert!(!board.legal_move(Color::Black, Square::A1, sq("a4"), true));
        assert!(!board.legal_move(Color::White, sq("b1"), sq("b4"), true));
        assert!(!board.legal_move(Color::White, Square::A1, Square::A1, true));
    }

    #[test]
    fn sliders_stop_at_blockers() {
        let board = with_kings(&[
            (PieceKind::Rook, Color::White, "a1"),
            (PieceKind::Pawn, Color::Black, "a4"),
        ]);
        assert!(board.legal_move(Color::White, Square::A1, sq("a3"), true));
        assert!(board.legal_move(Color::White, Square::A1, sq("a4"), true));
        assert!(!board.legal_move(Color::White, Square::A1, sq("a5"), true));
        let reach = board.legal_capture_moves(Square::A1, true);
        assert!(reach.contains(&sq("a4")));
        assert!(!reach.contains(&sq("a5")));
        assert!(!reach.contains(&Square::E1));
    }

    #[test]
    fn knight_jumps_over_pieces() {
        let board = with_kings(&[
            (PieceKind::Knight, Color::White, "b1"),
            (PieceKind::Pawn, Color::White, "b2"),
            (PieceKind::Pawn, Color::White, "c2"),
        ]);
        assert!(board.legal_move(Color::White, sq("b1"), sq("c3"), true));
    }

    #[test]
    fn pawn_cannot_push_into_piece_or_capture_forward() {
        let board = with_kings(&[
            (PieceKind::Pawn, Color::White, "d2"),
            (PieceKind::Knight, Color::Black, "d3"),
        ]);
        assert!(!board.legal_move(Color::White, sq("d2"), sq("d3"), true));
        assert!(!board.legal_move(Color::White, sq("d2"), sq("d4"), true));

        let board = with_kings(&[
            (PieceKind::Pawn, Color::White, "d2"),
            (PieceKind::Knight, Color::Black, "d4"),
        ]);
        assert!(!board.legal_move(Color::White, sq("d2"), sq("d4"), true));
        assert!(board.legal_move(Color::White, sq("d2"), sq("d3"), true));
    }

    #[test]
    fn pawn_captures_only_diagonally_onto_enemies() {
        let board = with_kings(&[
            (PieceKind::Pawn, Color::White, "d4"),
            (PieceKind::Pawn, Color::Black, "e5"),
        ]);
        assert!(board.legal_move(Color::White, sq("d4"), sq("e5"), true));
        assert!(!board.legal_move(Color::White, sq("d4"), sq("c5"), true));
    }

    #[test]
    fn pinned_piece_cannot_expose_king() {
        let board = with_kings(&[
            (PieceKind::Bishop, Color::White, "e2"),
            (PieceKind::Rook, Color::Black, "e7"),
        ]);
        assert!(!board.legal_move(Color::White, sq("e2"), sq("d3"), true));
        assert!(board.legal_move(Color::White, sq("e2"), sq("d3"), false));
        // The simulation never touches the real board.
        assert_eq!(board.piece_at(sq("e2")).map(Piece::kind), Some(PieceKind::Bishop));
        assert_eq!(board.king_position(Color::White), Some(Square::E1));
    }

    #[test]
    fn king_cannot_step_onto_defended_piece() {
        let board = with_kings(&[
            (PieceKind::Pawn, Color::Black, "e2"),
            (PieceKind::Rook, Color::Black, "e6"),
        ]);
        assert!(!board.legal_move(Color::White, Square::E1, sq("e2"), true));
    }

    #[test]
    fn attack_set_includes_pawn_diagonals_and_defended_squares() {
        let board = with_kings(&[
            (PieceKind::Pawn, Color::Black, "d5"),
            (PieceKind::Knight, Color::Black, "e6"),
            (PieceKind::Pawn, Color::Black, "f7"),
        ]);
        let attacked = board.under_attack_by(Color::Black);
        assert!(attacked.contains(sq("c4")));
        assert!(attacked.contains(sq("e4")));
        assert!(attacked.contains(sq("d4")));
        assert!(!attacked.contains(sq("d3")));
        assert!(!attacked.contains(sq("d5")));
        // f7 guards the knight.
        assert!(attacked.contains(sq("e6")));
        assert!(board.is_attacked(sq("e6"), Color::Black));
        assert_eq!(board.attackers_of(sq("d4"), Color::Black), vec![sq("e6")]);
    }

    #[test]
    fn castle_moves_rook_and_reports_side() {
        let mut board = with_kings(&[
            (PieceKind::Rook, Color::White, "h1"),
            (PieceKind::Rook, Color::White, "a1"),
        ]);
        let record = board.make_move(Color::White, Square::E1, Square::G1).unwrap();
        assert_eq!(record.notation, "O-O");
        assert_eq!(
            record.castle,
            Some(CastleMove {
                side: CastleSide::Kingside,
                rook_from: Square::H1,
                rook_to: Square::F1,
            })
        );
        assert_eq!(board.piece_at(Square::F1).map(Piece::kind), Some(PieceKind::Rook));
        assert!(board.piece_at(Square::H1).is_none());
        assert_eq!(board.king_position(Color::White), Some(Square::G1));
        assert_eq!(board.piece_at(Square::F1).map(Piece::move_count), Some(1));
    }

    #[test]
    fn queenside_castle_needs_empty_b_file() {
        let mut board = with_kings(&[
            (PieceKind::Rook, Color::White, "a1"),
            (PieceKind::Knight, Color::White, "b1"),
        ]);
        assert!(!board.legal_move(Color::White, Square::E1, Square::C1, true));
        board.set(None, sq("b1"));
        let record = board.make_move(Color::White, Square::E1, Square::C1).unwrap();
        assert_eq!(record.notation, "O-O-O");
        assert_eq!(board.piece_at(Square::D1).map(Piece::kind), Some(PieceKind::Rook));
    }

    #[test]
    fn castle_rejected_through_attacked_square() {
        let mut board = with_kings(&[
            (PieceKind::Rook, Color::White, "h1"),
            (PieceKind::Rook, Color::Black, "f8"),
        ]);
        assert!(board.make_move(Color::White, Square::E1, Square::G1).is_none());
        assert_eq!(board.king_position(Color::White), Some(Square::E1));
        assert!(board.piece_at(Square::H1).is_some());
    }

    #[test]
    fn castle_rejected_out_of_check() {
        let board = with_kings(&[
            (PieceKind::Rook, Color::White, "h1"),
            (PieceKind::Rook, Color::Black, "e5"),
        ]);
        assert!(!board.legal_move(Color::White, Square::E1, Square::G1, true));
    }

    #[test]
    fn castle_rejected_after_rook_moved() {
        let mut board = with_kings(&[
            (PieceKind::Rook, Color::White, "h1"),
            (PieceKind::Pawn, Color::Black, "a7"),
        ]);
        board.make_move(Color::White, Square::H1, sq("h2")).unwrap();
        board.make_move(Color::Black, sq("a7"), sq("a6")).unwrap();
        board.make_move(Color::White, sq("h2"), Square::H1).unwrap();
        board.make_move(Color::Black, sq("a6"), sq("a5")).unwrap();
        assert!(!board.legal_move(Color::White, Square::E1, Square::G1, true));
    }

    #[test]
    fn double_step_grants_en_passant_for_one_ply() {
        let mut board = with_kings(&[
            (PieceKind::Pawn, Color::White, "e5"),
            (PieceKind::Pawn, Color::Black, "d7"),
            (PieceKind::Pawn, Color::Black, "h7"),
        ]);
        board.make_move(Color::Black, sq("d7"), sq("d5")).unwrap();
        assert_eq!(board.en_passant_pawns().len(), 1);
        assert!(board.legal_move(Color::White, sq("e5"), sq("d6"), true));

        let before = board.piece_count();
        let record = board.make_move(Color::White, sq("e5"), sq("d6")).unwrap();
        assert!(record.en_passant);
        assert_eq!(record.captured_square, Some(sq("d5")));
        assert!(record.captured.is_some());
        assert!(board.piece_at(sq("d5")).is_none());
        assert_eq!(board.piece_count(), before - 1);
        assert_eq!(record.notation, "exd6");
        assert!(board.en_passant_pawns().is_empty());
    }

    #[test]
    fn en_passant_expires_after_one_ply() {
        let mut board = with_kings(&[
            (PieceKind::Pawn, Color::White, "e5"),
            (PieceKind::Pawn, Color::White, "a2"),
            (PieceKind::Pawn, Color::Black, "d7"),
            (PieceKind::Pawn, Color::Black, "h7"),
        ]);
        board.make_move(Color::Black, sq("d7"), sq("d5")).unwrap();
        board.make_move(Color::White, sq("a2"), sq("a3")).unwrap();
        board.make_move(Color::Black, sq("h7"), sq("h6")).unwrap();
        assert!(!board.legal_move(Color::White, sq("e5"), sq("d6"), true));
        assert!(board.piece_at(sq("e5")).and_then(Piece::en_passant).is_none());
    }

    #[test]
    fn promotion_blocks_further_moves_until_finalized() {
        let mut board = with_kings(&[
            (PieceKind::Pawn, Color::White, "a7"),
            (PieceKind::Rook, Color::Black, "d8"),
            (PieceKind::Pawn, Color::Black, "h7"),
        ]);
        let record = board.make_move(Color::White, sq("a7"), Square::A8).unwrap();
        assert!(record.promotion_pending);
        assert!(board.make_move(Color::Black, sq("h7"), sq("h6")).is_none());

        assert!(!board.set_promotion_choice(PieceKind::King));
        assert!(board.set_promotion_choice(PieceKind::Rook));
        assert_eq!(board.pending_promotion().and_then(|p| p.choice), Some(PieceKind::Rook));

        let count = board.piece_count();
        assert!(board.promote(PieceKind::Pawn).is_none());
        let promotion = board.promote(PieceKind::Queen).unwrap();
        assert_eq!(promotion.square, Square::A8);
        assert_eq!(board.piece_at(Square::A8).map(Piece::kind), Some(PieceKind::Queen));
        assert_eq!(board.piece_count(), count);
        assert!(board.pending_promotion().is_none());
        assert!(board.make_move(Color::Black, sq("h7"), sq("h6")).is_some());
    }

    #[test]
    fn back_rank_mate_detected() {
        let board = with_kings(&[
            (PieceKind::Pawn, Color::Black, "d7"),
            (PieceKind::Pawn, Color::Black, "e7"),
            (PieceKind::Pawn, Color::Black, "f7"),
            (PieceKind::Rook, Color::White, "a8"),
        ]);
        let status = board.check_or_mate(Color::Black);
        assert!(status.check);
        assert!(status.checkmate);
        assert!(!board.has_legal_move(Color::Black));
    }

    #[test]
    fn check_resolved_by_interposition() {
        let board = with_kings(&[
            (PieceKind::Pawn, Color::Black, "d7"),
            (PieceKind::Pawn, Color::Black, "e7"),
            (PieceKind::Pawn, Color::Black, "f7"),
            (PieceKind::Rook, Color::Black, "b6"),
            (PieceKind::Rook, Color::White, "a8"),
        ]);
        assert_eq!(
            board.check_or_mate(Color::Black),
            CheckStatus {
                check: true,
                checkmate: false
            }
        );
    }

    #[test]
    fn check_resolved_by_capturing_attacker() {
        let board = with_kings(&[
            (PieceKind::Pawn, Color::Black, "d7"),
            (PieceKind::Pawn, Color::Black, "e7"),
            (PieceKind::Pawn, Color::Black, "f7"),
            (PieceKind::Knight, Color::Black, "b6"),
            (PieceKind::Rook, Color::White, "a8"),
        ]);
        let status = board.check_or_mate(Color::Black);
        assert!(status.check);
        assert!(!status.checkmate);
    }

    #[test]
    fn double_check_forces_king_move() {
        // Rook on the e-file and knight on d6 both check. Taking the knight
        // with the b6 rook would still leave the king attacked.
        let board = with_kings(&[
            (PieceKind::Pawn, Color::Black, "d7"),
            (PieceKind::Pawn, Color::Black, "f7"),
            (PieceKind::Bishop, Color::Black, "d8"),
            (PieceKind::Bishop, Color::Black, "f8"),
            (PieceKind::Rook, Color::Black, "b6"),
            (PieceKind::Rook, Color::White, "e2"),
            (PieceKind::Knight, Color::White, "d6"),
        ]);
        assert_eq!(board.attackers_of(Square::E8, Color::White).len(), 2);
        let status = board.check_or_mate(Color::Black);
        assert!(status.check);
        // e7 is covered by the rook on e2, so the king is stuck.
        assert!(status.checkmate);
    }

    #[test]
    fn double_check_with_free_square_is_not_mate() {
        // As above but f8 is open, and neither checker covers it.
        let board = with_kings(&[
            (PieceKind::Pawn, Color::Black, "d7"),
            (PieceKind::Pawn, Color::Black, "f7"),
            (PieceKind::Bishop, Color::Black, "d8"),
            (PieceKind::Rook, Color::Black, "b6"),
            (PieceKind::Rook, Color::White, "e2"),
            (PieceKind::Knight, Color::White, "d6"),
        ]);
        assert_eq!(board.attackers_of(Square::E8, Color::White).len(), 2);
        assert_eq!(
            board.check_or_mate(Color::Black),
            CheckStatus {
                check: true,
                checkmate: false
            }
        );
        assert_eq!(board.legal_moves(Square::E8, true), vec![Square::F8]);

        // Capturing the knight or blocking the rook answers only one checker.
        assert!(!board.legal_move(Color::Black, sq("b6"), sq("d6"), true));
        assert!(!board.legal_move(Color::Black, sq("d8"), sq("e7"), true));
        for (from, _) in board.pieces_of(Color::Black) {
            if from == Square::E8 {
                continue;
            }
            assert!(board.legal_moves(from, true).is_empty(), "{}", from);
            assert!(board.legal_capture_moves(from, true).is_empty(), "{}", from);
        }
    }

    #[test]
    fn en_passant_resolves_check_by_pawn() {
        let mut board = Board::new();
        for (kind, color, at) in [
            (PieceKind::King, Color::White, "a4"),
            (PieceKind::Pawn, Color::White, "a3"),
            (PieceKind::Pawn, Color::White, "b3"),
            (PieceKind::Knight, Color::White, "b4"),
            (PieceKind::Pawn, Color::White, "a5"),
            (PieceKind::King, Color::Black, "h8"),
            (PieceKind::Pawn, Color::Black, "b7"),
            (PieceKind::Knight, Color::Black, "d6"),
        ] {
            place(&mut board, kind, color, at);
        }

        board.make_move(Color::Black, sq("b7"), sq("b5")).unwrap();

        // The king is boxed in by its own pieces and cannot take the
        // knight-guarded pawn, so taking it in passing is the only answer.
        assert_eq!(
            board.check_or_mate(Color::White),
            CheckStatus {
                check: true,
                checkmate: false
            }
        );
        assert!(board.legal_moves(sq("a4"), true).is_empty());
        assert!(board.legal_capture_moves(sq("a4"), true).is_empty());
        assert!(board.has_legal_move(Color::White));

        let record = board.make_move(Color::White, sq("a5"), sq("b6")).unwrap();
        assert!(record.en_passant);
        assert_eq!(record.captured_square, Some(sq("b5")));
        assert!(board.piece_at(sq("b5")).is_none());
        assert_eq!(board.check_or_mate(Color::White), CheckStatus::default());
    }

    #[test]
    fn no_check_without_attackers() {
        let board = with_kings(&[(PieceKind::Rook, Color::White, "a1")]);
        assert_eq!(board.check_or_mate(Color::Black), CheckStatus::default());
    }

    #[test]
    fn rejected_move_leaves_board_unchanged() {
        let mut board = with_kings(&[(PieceKind::Rook, Color::White, "a1")]);
        let before = format!("{:?}", board);
        assert!(board.make_move(Color::White, Square::A1, sq("b2")).is_none());
        assert_eq!(format!("{:?}", board), before);
    }
}
