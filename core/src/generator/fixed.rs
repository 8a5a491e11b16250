use super::*;

/// Places mines at explicit coordinates, for replays and hand-built boards.
#[derive(Clone, Debug, PartialEq)]
pub struct FixedPlacement {
    mines: Vec<Coord2>,
}

impl FixedPlacement {
    pub fn new(mines: &[Coord2]) -> Self {
        Self {
            mines: mines.to_vec(),
        }
    }
}

impl MinePlacement for FixedPlacement {
    fn place(self, config: BoardConfig) -> Array2<bool> {
        let size = config.size();
        let mut mask: Array2<bool> = Array2::default(size.to_nd_index());
        for coords in self.mines {
            if coords.0 < size.0 && coords.1 < size.1 {
                mask[coords.to_nd_index()] = true;
            } else {
                log::warn!("Ignoring mine outside the board at {:?}", coords);
            }
        }
        mask
    }
}
