use alloc::vec::Vec;

use super::*;

/// Uniform placement: a partial Fisher–Yates shuffle over the row-major cell indices, driven by a seeded RNG so the
/// same seed always yields the same board.
#[derive(Clone, Debug, PartialEq)]
pub struct RandomMinefieldGenerator {
    seed: u64,
}

impl RandomMinefieldGenerator {
    pub fn new(seed: u64) -> Self {
        Self { seed }
    }
}

impl MinefieldGenerator for RandomMinefieldGenerator {
    fn generate(self, config: GameConfig) -> Result<MineLayout> {
        use rand::prelude::*;

        let config = GameConfig::new(config.size, config.mines)?;
        let mut mines: Array2<bool> = Array2::default(config.size.to_nd_index());
        let mut cells: Vec<Coord2> = iter_coords(config.size).collect();
        let mut rng = SmallRng::seed_from_u64(self.seed);

        for i in 0..usize::from(config.mines) {
            let j = rng.random_range(i..cells.len());
            cells.swap(i, j);
            mines[cells[i].to_nd_index()] = true;
        }

        log::debug!(
            "generated {}x{} minefield with {} mines (seed {})",
            config.size.0,
            config.size.1,
            config.mines,
            self.seed
        );
        MineLayout::from_mine_mask(mines)
    }
}
