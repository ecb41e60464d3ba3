//! Two-player chess rules engine.
//!
//! This crate provides:
//! - [`Board`] - 8×8 mailbox board with move legality, attack sets and check detection
//! - [`Player`] - Per-side rosters of active and captured pieces
//! - [`Game`] - Turn state machine with promotion handling and move notation
//! - [`GameConfig`] - TOML-loaded settings
//!
//! # Architecture
//!
//! Pieces live in an arena owned by the board and are addressed by
//! [`PieceId`]. Geometry comes from `chess_core`'s per-kind generator table;
//! the board truncates it at blockers, applies the special moves (double
//! step, en passant, castling) and rejects moves that leave the mover's king
//! attacked.
//!
//! # Example
//!
//! ```
//! use chess_engine::{Game, GameState};
//! use chess_core::Square;
//!
//! let sq = |s| Square::from_algebraic(s).unwrap();
//! let mut game = Game::new();
//! game.make_move(sq("f2"), sq("f3")).unwrap();
//! game.make_move(sq("e7"), sq("e5")).unwrap();
//! game.make_move(sq("g2"), sq("g4")).unwrap();
//! assert_eq!(game.make_move(sq("d8"), sq("h4")), Ok(GameState::Checkmate));
//! assert_eq!(game.notation().last().map(String::as_str), Some("Qh4#"));
//! ```

mod board;
mod config;
mod game;
pub mod notation;
mod player;

pub use board::{
    Board, CastleMove, CastleSide, Cell, CheckStatus, MoveRecord, PendingPromotion, PieceId,
    Promotion,
};
pub use config::{ConfigError, GameConfig, PromotionChoice};
pub use game::{Game, GameError, GameState};
pub use player::Player;
