use ndarray::Array2;

use crate::*;
pub use fixed::*;
pub use streaming::*;

mod fixed;
mod streaming;

/// Decides where the mines of a fresh board go.
///
/// Implementations return a mask shaped `(height, width)`; the board rejects masks whose
/// shape or mine count disagree with the config.
pub trait MinePlacement {
    fn place(self, config: BoardConfig) -> Array2<bool>;
}
