use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

use super::*;

/// Single sweep in row-major order: each cell becomes a mine with probability
/// `mines_left / cells_left`, which places exactly `config.mines` mines uniformly.
#[derive(Clone, Debug)]
pub struct StreamingPlacement<R> {
    rng: R,
}

impl<R: Rng> StreamingPlacement<R> {
    pub fn new(rng: R) -> Self {
        Self { rng }
    }
}

impl StreamingPlacement<SmallRng> {
    pub fn from_seed(seed: u64) -> Self {
        Self::new(SmallRng::seed_from_u64(seed))
    }

    pub fn from_entropy() -> Self {
        Self::new(SmallRng::from_os_rng())
    }
}

impl<R: Rng> MinePlacement for StreamingPlacement<R> {
    fn place(mut self, config: BoardConfig) -> Array2<bool> {
        let mut mines_left = u32::from(config.mines);
        let mut cells_left = u32::from(config.total_cells());

        let mask = Array2::from_shape_fn(config.size().to_nd_index(), |_| {
            // the closure runs exactly once per cell, so `cells_left` never hits zero here
            let is_mine = mines_left > 0 && self.rng.random_ratio(mines_left, cells_left);
            cells_left -= 1;
            if is_mine {
                mines_left -= 1;
            }
            is_mine
        });

        if mines_left != 0 {
            log::warn!("Streaming placement left {} mines unplaced", mines_left);
        }
        mask
    }
}
