use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::*;

/// What a single tap does.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum InputMode {
    #[default]
    Reveal,
    Flag,
}

impl InputMode {
    pub const fn toggled(self) -> Self {
        match self {
            Self::Reveal => Self::Flag,
            Self::Flag => Self::Reveal,
        }
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Action {
    Reveal(Coord2),
    Chord(Coord2),
    ToggleFlag(Coord2),
}

/// Sole owner of the current board.
///
/// Every move goes through `&mut self`, and once a move ends the game further moves fail
/// with [`BoardError::AlreadyEnded`] until [`Session::restart`]. Hosts that poll from a
/// render thread keep the session behind a single mutex.
#[derive(Clone, Debug)]
pub struct Session {
    board: Board,
    mode: InputMode,
    seed: Option<u64>,
    status: GameStatus,
    ended_at: Option<DateTime<Utc>>,
}

impl Session {
    pub fn new(config: BoardConfig) -> Result<Self> {
        Ok(Self::from_board(Board::new(config)?))
    }

    /// Seeded session; each restart advances the seed by one.
    pub fn with_seed(config: BoardConfig, seed: u64) -> Result<Self> {
        let mut session = Self::from_board(Board::with_seed(config, seed)?);
        session.seed = Some(seed);
        Ok(session)
    }

    pub fn from_difficulty(difficulty: Difficulty) -> Result<Self> {
        Self::new(difficulty.config())
    }

    /// Wraps an existing board; a board that is already won or lost starts frozen.
    pub fn from_board(board: Board) -> Self {
        let status = board.game_over_check();
        Self {
            board,
            mode: InputMode::default(),
            seed: None,
            status,
            ended_at: status.is_finished().then(Utc::now),
        }
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn config(&self) -> BoardConfig {
        self.board.config()
    }

    pub fn status(&self) -> GameStatus {
        self.status
    }

    pub fn mode(&self) -> InputMode {
        self.mode
    }

    pub fn set_mode(&mut self, mode: InputMode) {
        self.mode = mode;
    }

    pub fn toggle_mode(&mut self) -> InputMode {
        self.mode = self.mode.toggled();
        self.mode
    }

    pub fn flags_remaining(&self) -> i32 {
        self.board.flags_remaining()
    }

    pub fn ended_at(&self) -> Option<DateTime<Utc>> {
        self.ended_at
    }

    /// Seconds of play; stops counting once the game has ended.
    pub fn elapsed_secs(&self) -> u32 {
        self.elapsed_secs_at(Utc::now())
    }

    pub fn elapsed_secs_at(&self, now: DateTime<Utc>) -> u32 {
        self.board.elapsed_secs_at(self.ended_at.unwrap_or(now))
    }

    pub fn apply(&mut self, action: Action) -> Result<GameStatus> {
        if self.status.is_finished() {
            return Err(BoardError::AlreadyEnded);
        }

        match action {
            Action::Reveal(coords) => {
                self.board.reveal(coords)?;
            }
            Action::Chord(coords) => {
                self.board.chord_reveal(coords)?;
            }
            Action::ToggleFlag(coords) => {
                self.board.toggle_flag(coords)?;
            }
        }

        self.status = self.board.game_over_check();
        if self.status.is_finished() {
            let now = Utc::now();
            self.ended_at = Some(now);
            log::debug!("Game ended with {:?} at {}", self.status, now);
        }
        Ok(self.status)
    }

    /// Single tap: reveal or flag depending on the current mode.
    pub fn tap(&mut self, coords: Coord2) -> Result<GameStatus> {
        match self.mode {
            InputMode::Reveal => self.apply(Action::Reveal(coords)),
            InputMode::Flag => self.apply(Action::ToggleFlag(coords)),
        }
    }

    /// Double tap: chord reveal.
    pub fn double_tap(&mut self, coords: Coord2) -> Result<GameStatus> {
        self.apply(Action::Chord(coords))
    }

    /// Replaces the board with a fresh one of the same size, keeping the input mode.
    pub fn restart(&mut self) -> Result<()> {
        let config = self.config();
        self.board = match self.seed.as_mut() {
            Some(seed) => {
                *seed = seed.wrapping_add(1);
                Board::with_seed(config, *seed)?
            }
            None => Board::new(config)?,
        };
        self.status = GameStatus::InProgress;
        self.ended_at = None;
        log::debug!("Session restarted with {:?}", config);
        Ok(())
    }
}
