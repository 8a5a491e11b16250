use core::fmt;

use chrono::{DateTime, Utc};
use ndarray::Array2;
use serde::{Deserialize, Serialize};

use crate::*;

/// Grid of cells with hidden mines, owned by one game.
///
/// The board never locks itself after a win or loss; callers decide when to stop sending
/// moves (see [`Session`]). It has no interior synchronization either, so a host sharing it
/// between a render loop and an input handler must serialize access itself.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "BoardData")]
pub struct Board {
    config: BoardConfig,
    cells: Array2<Cell>,
    flags_remaining: i32,
    first_move_taken: bool,
    started_at: DateTime<Utc>,
}

/// Unchecked wire shape of [`Board`]; only reachable through `TryFrom`.
#[derive(Deserialize)]
struct BoardData {
    config: BoardConfig,
    cells: Array2<Cell>,
    flags_remaining: i32,
    first_move_taken: bool,
    started_at: DateTime<Utc>,
}

impl TryFrom<BoardData> for Board {
    type Error = BoardError;

    fn try_from(data: BoardData) -> Result<Self> {
        let config = BoardConfig::new(data.config.height, data.config.width, data.config.mines)?;
        if data.cells.dim() != (usize::from(config.height), usize::from(config.width)) {
            return Err(BoardError::InvalidConstruction("cells do not match board size"));
        }
        let mines = data.cells.iter().filter(|cell| cell.is_mine).count();
        if mines != usize::from(config.mines) {
            return Err(BoardError::InvalidConstruction("cells hold the wrong number of mines"));
        }
        if data.cells.iter().any(|cell| cell.visible && cell.flagged) {
            return Err(BoardError::InvalidConstruction("visible cell carries a flag"));
        }
        let flags = data.cells.iter().filter(|cell| cell.flagged).count() as i32;
        if data.flags_remaining != i32::from(config.mines) - flags {
            return Err(BoardError::InvalidConstruction("flag count does not match cells"));
        }

        let mut board = Self {
            config,
            cells: data.cells,
            flags_remaining: data.flags_remaining,
            first_move_taken: data.first_move_taken,
            started_at: data.started_at,
        };
        let stored = board.cells.clone();
        board.compute_numbers();
        if board.cells != stored {
            return Err(BoardError::InvalidConstruction("cell values do not match mines"));
        }
        Ok(board)
    }
}

impl Board {
    /// Random layout from OS entropy.
    pub fn new(config: BoardConfig) -> Result<Self> {
        Self::with_placement(config, StreamingPlacement::from_entropy())
    }

    /// Random layout, reproducible from `seed`.
    pub fn with_seed(config: BoardConfig, seed: u64) -> Result<Self> {
        Self::with_placement(config, StreamingPlacement::from_seed(seed))
    }

    /// Board with mines exactly at `mines`; duplicates count once.
    pub fn from_mine_coords(height: Coord, width: Coord, mines: &[Coord2]) -> Result<Self> {
        if height == 0 || width == 0 {
            return Err(BoardError::InvalidConstruction("dimensions must be positive"));
        }
        if let Some(&(row, col)) = mines.iter().find(|&&(row, col)| row >= height || col >= width)
        {
            return Err(BoardError::OutOfRange { row, col });
        }

        let mut unique = mines.to_vec();
        unique.sort_unstable();
        unique.dedup();
        let mine_count = CellCount::try_from(unique.len())
            .map_err(|_| BoardError::InvalidConstruction("too many mines"))?;

        let config = BoardConfig::new(height, width, mine_count)?;
        Self::with_placement(config, FixedPlacement::new(&unique))
    }

    pub fn with_placement(config: BoardConfig, placement: impl MinePlacement) -> Result<Self> {
        let config = BoardConfig::new(config.height, config.width, config.mines)?;

        let mask = placement.place(config);
        if mask.dim() != (usize::from(config.height), usize::from(config.width)) {
            return Err(BoardError::InvalidConstruction(
                "placement does not match board size",
            ));
        }
        let placed = mask.iter().filter(|&&is_mine| is_mine).count();
        if placed != usize::from(config.mines) {
            log::warn!(
                "Placement mine count mismatch, actual: {}, requested: {}",
                placed,
                config.mines
            );
            return Err(BoardError::InvalidConstruction(
                "placement produced the wrong number of mines",
            ));
        }

        let mut board = Self {
            config,
            cells: mask.mapv(|is_mine| Cell {
                is_mine,
                ..Default::default()
            }),
            flags_remaining: i32::from(config.mines),
            first_move_taken: false,
            started_at: Utc::now(),
        };
        board.compute_numbers();

        log::debug!(
            "Generated {}x{} board with {} mines",
            config.height,
            config.width,
            config.mines
        );
        board.debug_dump();
        Ok(board)
    }

    pub fn config(&self) -> BoardConfig {
        self.config
    }

    pub fn height(&self) -> Coord {
        self.config.height
    }

    pub fn width(&self) -> Coord {
        self.config.width
    }

    pub fn size(&self) -> Coord2 {
        self.config.size()
    }

    pub fn total_mines(&self) -> CellCount {
        self.config.mines
    }

    /// Non-mine cells that must be visible to win.
    pub fn target_safe_count(&self) -> CellCount {
        self.config.safe_cells()
    }

    /// Total mines minus placed flags; negative when over-flagged.
    pub fn flags_remaining(&self) -> i32 {
        self.flags_remaining
    }

    pub fn first_move_taken(&self) -> bool {
        self.first_move_taken
    }

    /// Construction time, replaced by the time of the first reveal.
    pub fn started_at(&self) -> DateTime<Utc> {
        self.started_at
    }

    pub fn elapsed_secs(&self) -> u32 {
        self.elapsed_secs_at(Utc::now())
    }

    pub fn elapsed_secs_at(&self, now: DateTime<Utc>) -> u32 {
        (now - self.started_at)
            .num_seconds()
            .clamp(0, i64::from(u32::MAX)) as u32
    }

    pub fn cell_at(&self, coords: Coord2) -> Result<Cell> {
        let coords = self.check_bounds(coords)?;
        Ok(self.cell(coords))
    }

    /// Adjacent mine count, or [`MINE`].
    pub fn value_at(&self, coords: Coord2) -> Result<i8> {
        self.cell_at(coords).map(Cell::value)
    }

    pub fn is_visible(&self, coords: Coord2) -> Result<bool> {
        self.cell_at(coords).map(Cell::is_visible)
    }

    pub fn is_flagged(&self, coords: Coord2) -> Result<bool> {
        self.cell_at(coords).map(Cell::is_flagged)
    }

    pub fn visible_count(&self) -> CellCount {
        // bounded by the cell count, which fits `CellCount`
        self.cells.iter().filter(|cell| cell.visible).count() as CellCount
    }

    /// Flags or unflags a hidden cell. Visible cells are left alone.
    pub fn toggle_flag(&mut self, coords: Coord2) -> Result<MarkOutcome> {
        let coords = self.check_bounds(coords)?;
        let cell = &mut self.cells[coords.to_nd_index()];
        if cell.visible {
            return Ok(MarkOutcome::NoChange);
        }

        cell.flagged = !cell.flagged;
        Ok(if cell.flagged {
            self.flags_remaining -= 1;
            MarkOutcome::Placed
        } else {
            self.flags_remaining += 1;
            MarkOutcome::Removed
        })
    }

    /// Reveals a cell, flood-filling from it when it has no mine neighbors.
    ///
    /// The very first reveal on a board never lands on a mine: a mine under it is moved to
    /// the first safe cell in row-major order (row 0 first) and the grid is renumbered.
    /// An explicit reveal succeeds on a flagged cell and removes the flag; only the
    /// automatic expansion stops at flags.
    pub fn reveal(&mut self, coords: Coord2) -> Result<RevealOutcome> {
        let coords = self.check_bounds(coords)?;

        if !self.first_move_taken {
            self.take_first_move(coords);
        }

        let mut opened = self.uncover(coords);
        if self.cell(coords).adjacent == 0 {
            opened += self.flood_from(coords);
        }
        Ok(RevealOutcome::from_count(opened))
    }

    /// Opens every hidden, unflagged neighbor when the flagged neighbor count equals the
    /// cell's value; otherwise does nothing.
    pub fn chord_reveal(&mut self, coords: Coord2) -> Result<RevealOutcome> {
        let coords = self.check_bounds(coords)?;

        let flagged = self.count_neighbors(coords, Cell::is_flagged);
        if flagged as i8 != self.cell(coords).adjacent {
            return Ok(RevealOutcome::NoChange);
        }

        let mut opened = 0;
        for next in self.cells.neighbors(coords) {
            let cell = &mut self.cells[next.to_nd_index()];
            if !cell.is_expandable() {
                continue;
            }
            cell.visible = true;
            opened += 1;
            if cell.adjacent == 0 {
                opened += self.flood_from(next);
            }
        }
        log::debug!("Chord at {:?} opened {} cells", coords, opened);
        Ok(RevealOutcome::from_count(opened))
    }

    /// Lost if any mine is visible, won once every safe cell is visible.
    pub fn game_over_check(&self) -> GameStatus {
        let mut visible: CellCount = 0;
        for cell in self.cells.iter().filter(|cell| cell.visible) {
            if cell.is_mine {
                return GameStatus::Lost;
            }
            visible += 1;
        }

        if visible == self.target_safe_count() {
            GameStatus::Won
        } else {
            GameStatus::InProgress
        }
    }

    /// Logs the full layout at trace level.
    pub fn debug_dump(&self) {
        log::trace!("Board layout:\n{}", self);
    }

    fn check_bounds(&self, (row, col): Coord2) -> Result<Coord2> {
        if row < self.config.height && col < self.config.width {
            Ok((row, col))
        } else {
            Err(BoardError::OutOfRange { row, col })
        }
    }

    fn cell(&self, coords: Coord2) -> Cell {
        self.cells[coords.to_nd_index()]
    }

    fn count_neighbors(&self, coords: Coord2, predicate: impl Fn(Cell) -> bool) -> u8 {
        // at most 8 neighbors
        self.cells
            .neighbors(coords)
            .filter(|&pos| predicate(self.cell(pos)))
            .count() as u8
    }

    fn compute_numbers(&mut self) {
        let (height, width) = self.size();
        for row in 0..height {
            for col in 0..width {
                let coords = (row, col);
                let adjacent = if self.cell(coords).is_mine {
                    MINE
                } else {
                    self.count_neighbors(coords, Cell::is_mine) as i8
                };
                self.cells[coords.to_nd_index()].adjacent = adjacent;
            }
        }
    }

    fn take_first_move(&mut self, coords: Coord2) {
        self.first_move_taken = true;
        self.started_at = Utc::now();
        log::debug!("First move at {:?}, clock started at {}", coords, self.started_at);

        if self.cell(coords).is_mine {
            self.relocate_mine(coords);
        }
    }

    fn relocate_mine(&mut self, from: Coord2) {
        let Some(((row, col), _)) = self.cells.indexed_iter().find(|(_, cell)| !cell.is_mine)
        else {
            log::warn!("No safe cell to move the mine at {:?} to", from);
            return;
        };
        // indices come from the grid, so they fit `Coord`
        let to = (row as Coord, col as Coord);

        self.cells[from.to_nd_index()].is_mine = false;
        self.cells[to.to_nd_index()].is_mine = true;
        log::debug!("Moved mine from first move {:?} to {:?}", from, to);
        self.compute_numbers();
    }

    /// Makes one cell visible, dropping any flag on it. Returns 1 if it was hidden.
    fn uncover(&mut self, coords: Coord2) -> CellCount {
        let cell = &mut self.cells[coords.to_nd_index()];
        if cell.flagged {
            cell.flagged = false;
            self.flags_remaining += 1;
        }
        if cell.visible {
            0
        } else {
            cell.visible = true;
            1
        }
    }

    /// Opens the zero region around `origin` plus its numbered border, stopping at flags.
    fn flood_from(&mut self, origin: Coord2) -> CellCount {
        let mut opened = 0;
        let mut pending = vec![origin];

        while let Some(pos) = pending.pop() {
            for next in self.cells.neighbors(pos) {
                let cell = &mut self.cells[next.to_nd_index()];
                if !cell.is_expandable() {
                    continue;
                }
                cell.visible = true;
                opened += 1;
                log::trace!("Flood opened {:?}, value: {}", next, cell.adjacent);

                if cell.adjacent == 0 {
                    pending.push(next);
                }
            }
        }
        opened
    }
}

impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in self.cells.rows() {
            for cell in row {
                match cell.adjacent {
                    MINE => write!(f, "*")?,
                    count => write!(f, "{count}")?,
                }
            }
            writeln!(f)?;
        }
        Ok(())
    }
}
