#![no_std]

extern crate alloc;

use alloc::vec::Vec;
use core::ops::Index;
use ndarray::Array2;
use serde::{Deserialize, Serialize};

pub use cell::*;
pub use engine::*;
pub use error::*;
pub use generator::*;
pub use glyph::*;
pub use session::*;
pub use types::*;

mod cell;
mod engine;
mod error;
mod generator;
mod glyph;
mod session;
mod types;

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameConfig {
    pub size: Coord2,
    pub mines: CellCount,
}

impl GameConfig {
    /// The fixed 10×10 board with 10 mines.
    pub const CLASSIC: Self = Self::new_unchecked((10, 10), 10);

    pub const fn new_unchecked(size: Coord2, mines: CellCount) -> Self {
        Self { size, mines }
    }

    /// Validates that at least one cell stays free of mines.
    pub fn new(size: Coord2, mines: CellCount) -> Result<Self> {
        let config = Self::new_unchecked(size, mines);
        if mines >= config.total_cells() {
            return Err(GameError::TooManyMines);
        }
        Ok(config)
    }

    pub fn square(size: Coord, mines: CellCount) -> Result<Self> {
        Self::new((size, size), mines)
    }

    pub const fn total_cells(&self) -> CellCount {
        mult(self.size.0, self.size.1)
    }

    pub const fn safe_cells(&self) -> CellCount {
        self.total_cells().saturating_sub(self.mines)
    }
}

impl Default for GameConfig {
    fn default() -> Self {
        Self::CLASSIC
    }
}

/// Hidden part of a round: where the mines are and how many touch each cell.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "MineMaskData")]
pub struct MineLayout {
    size: Coord2,
    mine_mask: Array2<bool>,
    adjacent: Array2<u8>,
    mine_count: CellCount,
}

/// Serialized form of a layout, everything else is derived from the mask again.
#[derive(Deserialize)]
struct MineMaskData {
    mine_mask: Array2<bool>,
}

impl TryFrom<MineMaskData> for MineLayout {
    type Error = GameError;

    fn try_from(data: MineMaskData) -> Result<Self> {
        Self::from_mine_mask(data.mine_mask)
    }
}

impl MineLayout {
    /// Fails with `InvalidBoardShape` when a side does not fit in a [`Coord`].
    pub fn from_mine_mask(mine_mask: Array2<bool>) -> Result<Self> {
        let (rows, cols) = mine_mask.dim();
        let size: Coord2 = (
            rows.try_into().map_err(|_| GameError::InvalidBoardShape)?,
            cols.try_into().map_err(|_| GameError::InvalidBoardShape)?,
        );

        let mut mine_count: CellCount = 0;
        let mut adjacent = Array2::zeros(mine_mask.dim());
        for coords in iter_coords(size) {
            if mine_mask[coords.to_nd_index()] {
                mine_count += 1;
                continue;
            }
            adjacent[coords.to_nd_index()] = neighbors(coords, size)
                .filter(|&pos| mine_mask[pos.to_nd_index()])
                .fold(0u8, |count, _| count + 1);
        }

        Ok(Self {
            size,
            mine_mask,
            adjacent,
            mine_count,
        })
    }

    pub fn from_mine_coords(size: Coord2, mine_coords: &[Coord2]) -> Result<Self> {
        let mut mine_mask: Array2<bool> = Array2::default(size.to_nd_index());

        for &coords in mine_coords {
            if coords.0 >= size.0 || coords.1 >= size.1 {
                return Err(GameError::InvalidCoords);
            }
            mine_mask[coords.to_nd_index()] = true;
        }

        Self::from_mine_mask(mine_mask)
    }

    pub fn game_config(&self) -> GameConfig {
        GameConfig::new_unchecked(self.size, self.mine_count)
    }

    pub fn validate_coords(&self, coords: Coord2) -> Result<Coord2> {
        if coords.0 < self.size.0 && coords.1 < self.size.1 {
            Ok(coords)
        } else {
            Err(GameError::InvalidCoords)
        }
    }

    pub fn size(&self) -> Coord2 {
        self.size
    }

    pub fn safe_cell_count(&self) -> CellCount {
        self.total_cells() - self.mine_count
    }

    pub fn total_cells(&self) -> CellCount {
        mult(self.size.0, self.size.1)
    }

    pub fn mine_count(&self) -> CellCount {
        self.mine_count
    }

    pub fn contains_mine(&self, coords: Coord2) -> bool {
        self[coords]
    }

    /// Mines among the neighbors of `coords`; always zero for a mine cell itself.
    pub fn adjacent_mine_count(&self, coords: Coord2) -> u8 {
        self.adjacent[coords.to_nd_index()]
    }

    /// All mine coordinates in row-major order.
    pub fn mine_coords(&self) -> Vec<Coord2> {
        iter_coords(self.size)
            .filter(|&coords| self[coords])
            .collect()
    }

    pub(crate) fn iter_neighbors(&self, coords: Coord2) -> impl Iterator<Item = Coord2> + use<> {
        neighbors(coords, self.size)
    }
}

impl Index<Coord2> for MineLayout {
    type Output = bool;

    fn index(&self, coords: Coord2) -> &Self::Output {
        &self.mine_mask[coords.to_nd_index()]
    }
}

/// Result of a flag toggle.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum MarkOutcome {
    NoChange,
    Flagged,
    Unflagged,
}

impl MarkOutcome {
    pub const fn has_update(self) -> bool {
        !matches!(self, Self::NoChange)
    }
}

/// Result of revealing a cell.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum RevealOutcome {
    NoChange,
    Revealed,
    HitMine,
    Won,
}
