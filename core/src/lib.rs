//! Minesweeper board engine.
//!
//! A [`Board`] is a plain single-threaded state machine: it places mines, numbers the grid,
//! and applies reveal, chord and flag moves. [`Session`] wraps one board for a host that
//! wants restart, input modes and a frozen clock once the game ends.

use serde::{Deserialize, Serialize};

pub use board::*;
pub use cell::*;
pub use error::*;
pub use generator::*;
pub use session::*;
pub use types::*;

mod board;
mod cell;
mod error;
mod generator;
mod session;
mod types;

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct BoardConfig {
    pub height: Coord,
    pub width: Coord,
    pub mines: CellCount,
}

impl BoardConfig {
    pub fn new(height: Coord, width: Coord, mines: CellCount) -> Result<Self> {
        if height == 0 || width == 0 {
            return Err(BoardError::InvalidConstruction("dimensions must be positive"));
        }
        if mines == 0 {
            return Err(BoardError::InvalidConstruction("at least one mine is required"));
        }
        if mines >= mult(height, width) {
            return Err(BoardError::InvalidConstruction(
                "mines must leave at least one safe cell",
            ));
        }
        Ok(Self {
            height,
            width,
            mines,
        })
    }

    pub const fn size(&self) -> Coord2 {
        (self.height, self.width)
    }

    pub const fn total_cells(&self) -> CellCount {
        mult(self.height, self.width)
    }

    pub const fn safe_cells(&self) -> CellCount {
        self.total_cells() - self.mines
    }
}

/// Preset board sizes offered by the game menu.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Difficulty {
    #[default]
    Easy,
    Medium,
    Hard,
}

impl Difficulty {
    pub const fn config(self) -> BoardConfig {
        let (height, width, mines) = match self {
            Self::Easy => (8, 8, 10),
            Self::Medium => (16, 16, 40),
            Self::Hard => (30, 16, 99),
        };
        BoardConfig {
            height,
            width,
            mines,
        }
    }
}

/// Result of [`Board::game_over_check`].
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameStatus {
    InProgress,
    Won,
    Lost,
}

impl GameStatus {
    pub const fn is_finished(self) -> bool {
        matches!(self, Self::Won | Self::Lost)
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum MarkOutcome {
    NoChange,
    Placed,
    Removed,
}

impl MarkOutcome {
    pub const fn has_update(self) -> bool {
        !matches!(self, Self::NoChange)
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum RevealOutcome {
    NoChange,
    /// Number of cells that became visible.
    Revealed(CellCount),
}

impl RevealOutcome {
    pub(crate) const fn from_count(count: CellCount) -> Self {
        if count == 0 {
            Self::NoChange
        } else {
            Self::Revealed(count)
        }
    }

    pub const fn has_update(self) -> bool {
        matches!(self, Self::Revealed(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_rejects_empty_dimensions() {
        assert!(matches!(
            BoardConfig::new(0, 5, 1),
            Err(BoardError::InvalidConstruction(_))
        ));
        assert!(matches!(
            BoardConfig::new(5, 0, 1),
            Err(BoardError::InvalidConstruction(_))
        ));
    }

    #[test]
    fn config_rejects_mine_count_outside_open_range() {
        assert!(BoardConfig::new(2, 2, 0).is_err());
        assert!(BoardConfig::new(2, 2, 4).is_err());
        assert!(BoardConfig::new(2, 2, 5).is_err());
        assert!(BoardConfig::new(2, 2, 3).is_ok());
    }

    #[test]
    fn config_counts_cells() {
        let config = BoardConfig::new(30, 16, 99).unwrap();
        assert_eq!(config.total_cells(), 480);
        assert_eq!(config.safe_cells(), 381);
        assert_eq!(config.size(), (30, 16));
    }

    #[test]
    fn presets_are_valid_configs() {
        for difficulty in [Difficulty::Easy, Difficulty::Medium, Difficulty::Hard] {
            let preset = difficulty.config();
            assert_eq!(
                BoardConfig::new(preset.height, preset.width, preset.mines),
                Ok(preset)
            );
        }
    }

    #[test]
    fn default_difficulty_is_easy() {
        assert_eq!(Difficulty::default(), Difficulty::Easy);
    }

    #[test]
    fn config_roundtrips_through_json() {
        let config = Difficulty::Medium.config();
        let json = serde_json::to_string(&config).unwrap();
        assert_eq!(json, r#"{"height":16,"width":16,"mines":40}"#);
        assert_eq!(serde_json::from_str::<BoardConfig>(&json).unwrap(), config);
    }

    #[test]
    fn outcomes_report_updates() {
        assert!(!MarkOutcome::NoChange.has_update());
        assert!(MarkOutcome::Placed.has_update());
        assert_eq!(RevealOutcome::from_count(0), RevealOutcome::NoChange);
        assert!(RevealOutcome::from_count(3).has_update());
    }
}
