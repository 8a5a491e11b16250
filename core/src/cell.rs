use serde::{Deserialize, Serialize};

/// Adjacency value reported for a cell that holds a mine.
pub const MINE: i8 = -1;

/// One grid position. Only the owning board mutates it.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cell {
    pub(crate) is_mine: bool,
    pub(crate) adjacent: i8,
    pub(crate) visible: bool,
    pub(crate) flagged: bool,
}

impl Cell {
    pub const fn is_mine(self) -> bool {
        self.is_mine
    }

    /// Mine-neighbor count, or [`MINE`] for a mine cell.
    pub const fn value(self) -> i8 {
        self.adjacent
    }

    pub const fn is_visible(self) -> bool {
        self.visible
    }

    pub const fn is_flagged(self) -> bool {
        self.flagged
    }

    /// Hidden, not flagged: the only cells automatic expansion may open.
    pub(crate) const fn is_expandable(self) -> bool {
        !self.visible && !self.flagged
    }
}
