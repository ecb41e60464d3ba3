//! Game configuration loaded from TOML.
//!
//! ```toml
//! auto_promote = "queen"
//! check_suffixes = true
//! ```

use chess_core::PieceKind;
use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

/// Errors that can occur when loading or parsing configuration.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Failed to read the configuration file from disk.
    #[error("Failed to read config file: {0}")]
    ReadError(#[from] std::io::Error),
    /// Failed to parse the configuration as valid TOML.
    #[error("Failed to parse config: {0}")]
    ParseError(#[from] toml::de::Error),
}

/// Piece a pawn may be promoted to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum PromotionChoice {
    Queen,
    Rook,
    Bishop,
    Knight,
}

impl From<PromotionChoice> for PieceKind {
    fn from(choice: PromotionChoice) -> Self {
        match choice {
            PromotionChoice::Queen => PieceKind::Queen,
            PromotionChoice::Rook => PieceKind::Rook,
            PromotionChoice::Bishop => PieceKind::Bishop,
            PromotionChoice::Knight => PieceKind::Knight,
        }
    }
}

/// Settings that change how a [`Game`](crate::Game) drives a match.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct GameConfig {
    /// Promote immediately to this piece instead of pausing for a choice.
    /// Defaults to none (the game waits in `PendingPromotion`).
    #[serde(default)]
    pub auto_promote: Option<PromotionChoice>,
    /// Append `+`/`#` to recorded moves. Defaults to true.
    #[serde(default = "default_check_suffixes")]
    pub check_suffixes: bool,
}

fn default_check_suffixes() -> bool {
    true
}

impl Default for GameConfig {
    fn default() -> Self {
        GameConfig {
            auto_promote: None,
            check_suffixes: default_check_suffixes(),
        }
    }
}

impl GameConfig {
    /// Parses a configuration from TOML text.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::ParseError`] if the text is not valid TOML or
    /// has a field of the wrong type.
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(content)?)
    }

    /// Loads the configuration at `path`, or the defaults if the file does
    /// not exist.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::ReadError`] if the file exists but cannot be read,
    /// or [`ConfigError::ParseError`] if the file contains invalid TOML.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        if path.exists() {
            let content = std::fs::read_to_string(path)?;
            Self::from_toml_str(&content)
        } else {
            Ok(Self::default())
        }
    }
}
