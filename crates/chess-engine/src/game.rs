//! Turn-based game management.
//!
//! The [`Game`] struct owns the board and both players and drives turns:
//! - Alternating moves between White and Black
//! - Capture bookkeeping on the players' rosters
//! - Pausing for and completing pawn promotion
//! - Check, checkmate and stalemate detection
//! - Move notation history

use crate::board::{Board, PieceId};
use crate::config::GameConfig;
use crate::notation;
use crate::player::Player;
use chess_core::{Color, PieceKind, Square, SquareSet};
use thiserror::Error;
use tracing::{debug, info};

/// Where the game stands after the last completed action.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameState {
    /// The side to move is not in check and has moves.
    Ongoing,
    /// The side to move is in check but can get out of it.
    Check,
    /// The side to move is in check with no way out. The game is over.
    Checkmate,
    /// The side to move is not in check but has no legal move. The game is over.
    Stalemate,
    /// A pawn reached the last rank and the mover must pick its new kind.
    PendingPromotion,
}

impl GameState {
    /// Returns true for checkmate and stalemate.
    #[inline]
    pub const fn is_over(self) -> bool {
        matches!(self, GameState::Checkmate | GameState::Stalemate)
    }
}

/// Error type for game operations.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GameError {
    /// The move is not legal for the side to move.
    #[error("illegal move: {from} to {to}")]
    IllegalMove { from: Square, to: Square },
    /// A promotion choice must be made before the next move.
    #[error("a promotion choice is pending")]
    PromotionPending,
    /// The game has already ended.
    #[error("game has already ended")]
    GameOver,
    #[error("no promotion is pending")]
    NoPendingPromotion,
    /// Pawns may not promote to pawns or kings.
    #[error("cannot promote to {0}")]
    InvalidPromotion(PieceKind),
}

/// A chess game between two players on one board.
#[derive(Debug, Clone)]
pub struct Game {
    board: Board,
    /// Indexed by [`Color::index`].
    players: [Player; 2],
    current: Color,
    ply: usize,
    fullmove: u32,
    /// Notation of every completed move.
    notation: Vec<String>,
    state: GameState,
    config: GameConfig,
    /// Notation of a promoting move waiting for its `=X` suffix.
    pending_notation: Option<String>,
}

impl Default for Game {
    fn default() -> Self {
        Self::new()
    }
}

impl Game {
    /// Creates a new game with the standard starting position.
    pub fn new() -> Self {
        Self::with_config(GameConfig::default())
    }

    /// Creates a new game with the standard starting position and custom settings.
    pub fn with_config(config: GameConfig) -> Self {
        let mut board = Board::new();
        let mut white = Player::new(Color::White);
        let mut black = Player::new(Color::Black);
        white.setup(&mut board);
        black.setup(&mut board);
        Game {
            board,
            players: [white, black],
            current: Color::White,
            ply: 0,
            fullmove: 1,
            notation: Vec::new(),
            state: GameState::Ongoing,
            config,
            pending_notation: None,
        }
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    /// The side to move.
    pub fn current_player(&self) -> Color {
        self.current
    }

    pub fn player(&self, color: Color) -> &Player {
        &self.players[color.index()]
    }

    pub fn state(&self) -> GameState {
        self.state
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    /// Returns true once the game ended in checkmate or stalemate.
    pub fn is_over(&self) -> bool {
        self.state.is_over()
    }

    /// Number of half-moves completed.
    pub fn ply_count(&self) -> usize {
        self.ply
    }

    /// Current full move number, starting at 1 and bumped after Black moves.
    pub fn fullmove_number(&self) -> u32 {
        self.fullmove
    }

    /// Notation of every completed move, in order.
    pub fn notation(&self) -> &[String] {
        &self.notation
    }

    /// Verified destinations of the current player's piece on `from`.
    ///
    /// Empty when the square is empty, holds an opponent piece, or the game
    /// is not waiting for a move.
    pub fn legal_destinations(&self, from: Square) -> Vec<Square> {
        if self.state.is_over() || self.state == GameState::PendingPromotion {
            return Vec::new();
        }
        if !self
            .board
            .piece_at(from)
            .is_some_and(|p| p.color() == self.current)
        {
            return Vec::new();
        }
        let mut reach: SquareSet = self.board.legal_moves(from, true).into_iter().collect();
        reach |= self
            .board
            .legal_capture_moves(from, true)
            .into_iter()
            .collect::<SquareSet>();
        reach.iter().collect()
    }

    /// Makes a move for the side to move.
    ///
    /// Returns the state after the move. A rejected move changes nothing.
    pub fn make_move(&mut self, from: Square, to: Square) -> Result<GameState, GameError> {
        if self.state.is_over() {
            return Err(GameError::GameOver);
        }
        if self.state == GameState::PendingPromotion {
            return Err(GameError::PromotionPending);
        }

        let mover = self.current;
        let record = self
            .board
            .make_move(mover, from, to)
            .ok_or(GameError::IllegalMove { from, to })?;

        if let Some(captured) = record.captured {
            self.transfer_capture(mover, captured);
        }

        if record.promotion_pending {
            self.pending_notation = Some(record.notation);
            return match self.config.auto_promote {
                Some(choice) => self.finalize_promotion(choice.into()),
                None => {
                    self.state = GameState::PendingPromotion;
                    Ok(self.state)
                }
            };
        }

        Ok(self.finish_turn(record.notation))
    }

    /// Picks the kind for a pending promotion.
    ///
    /// With `finalize == false` the choice is only recorded on the board for
    /// display and the game keeps waiting. With `finalize == true` the pawn
    /// is replaced and the turn completes.
    pub fn choose_promotion(
        &mut self,
        kind: PieceKind,
        finalize: bool,
    ) -> Result<GameState, GameError> {
        if self.state != GameState::PendingPromotion || self.board.pending_promotion().is_none() {
            return Err(GameError::NoPendingPromotion);
        }
        if !kind.is_promotion_choice() {
            return Err(GameError::InvalidPromotion(kind));
        }

        if finalize {
            self.finalize_promotion(kind)
        } else {
            self.board.set_promotion_choice(kind);
            Ok(self.state)
        }
    }

    fn transfer_capture(&mut self, mover: Color, captured: PieceId) {
        self.players[mover.opposite().index()].remove(captured);
        self.players[mover.index()].record_capture(captured);
    }

    fn finalize_promotion(&mut self, kind: PieceKind) -> Result<GameState, GameError> {
        let promotion = self
            .board
            .promote(kind)
            .ok_or(GameError::NoPendingPromotion)?;

        let roster = &mut self.players[self.current.index()];
        roster.remove(promotion.pawn);
        roster.add(promotion.piece);

        let mut text = self.pending_notation.take().unwrap_or_default();
        text.push_str(&notation::promotion_suffix(kind));
        Ok(self.finish_turn(text))
    }

    /// Hands the move to the other side and evaluates its position.
    fn finish_turn(&mut self, mut text: String) -> GameState {
        self.current = self.current.opposite();
        self.ply += 1;
        if self.current == Color::White {
            self.fullmove += 1;
        }

        let status = self.board.check_or_mate(self.current);
        self.state = if status.checkmate {
            GameState::Checkmate
        } else if status.check {
            GameState::Check
        } else if !self.board.has_legal_move(self.current) {
            GameState::Stalemate
        } else {
            GameState::Ongoing
        };

        if self.config.check_suffixes {
            text.extend(notation::check_suffix(status));
        }
        debug!(ply = self.ply, notation = %text, state = ?self.state, "move completed");
        self.notation.push(text);

        match self.state {
            GameState::Checkmate => {
                info!(winner = %self.current.opposite(), ply = self.ply, "checkmate")
            }
            GameState::Stalemate => info!(ply = self.ply, "stalemate"),
            _ => {}
        }
        self.state
    }
}
