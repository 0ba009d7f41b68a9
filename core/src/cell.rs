use serde::{Deserialize, Serialize};

/// Player-visible state of a single cell.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum CellState {
    #[default]
    Unrevealed,
    Revealed,
    Flagged,
}

/// Full description of a cell, combining the hidden layout with the player-visible state.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cell {
    pub is_mine: bool,
    /// Number of mines among the up to 8 surrounding cells.
    pub adjacent_count: u8,
    pub state: CellState,
}
