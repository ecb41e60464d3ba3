//! Core types for chess.
//!
//! This crate provides the fundamental types used by the rules engine:
//! - [`Color`] for the two sides
//! - [`Square`], [`Shade`] and [`SquareSet`] for board coordinates
//! - [`PieceKind`] and [`Piece`] for piece identity and intrinsic state
//! - [`geometry`] for the per-kind move-geometry table

mod color;
pub mod geometry;
mod piece;
mod square;
mod square_set;

pub use color::{Color, ColorError};
pub use geometry::MoveGenerator;
pub use piece::{EnPassant, Piece, PieceKind};
pub use square::{Shade, Square};
pub use square_set::{SquareSet, SquareSetIter};
