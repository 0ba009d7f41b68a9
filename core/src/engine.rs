use alloc::collections::{BTreeSet, VecDeque};
use alloc::vec::Vec;
use ndarray::Array2;
use serde::{Deserialize, Serialize};

use crate::*;

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameOutcome {
    #[default]
    InProgress,
    Won,
    Lost,
}

impl GameOutcome {
    pub const fn is_finished(self) -> bool {
        matches!(self, Self::Won | Self::Lost)
    }
}

/// One round of play: the mine layout plus everything the player has done to it.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "BoardData")]
pub struct Board {
    mine_layout: MineLayout,
    states: Array2<CellState>,
    revealed_count: CellCount,
    flag_count: CellCount,
    outcome: GameOutcome,
    triggered_mine: Option<Coord2>,
}

/// Serialized form of a board, the counters are recomputed from `states` on load.
#[derive(Deserialize)]
struct BoardData {
    mine_layout: MineLayout,
    states: Array2<CellState>,
    outcome: GameOutcome,
    triggered_mine: Option<Coord2>,
}

impl TryFrom<BoardData> for Board {
    type Error = GameError;

    fn try_from(data: BoardData) -> Result<Self> {
        let BoardData {
            mine_layout,
            states,
            outcome,
            triggered_mine,
        } = data;

        if states.dim() != (usize::from(mine_layout.size().0), usize::from(mine_layout.size().1)) {
            return Err(GameError::InvalidBoardShape);
        }

        let mut revealed_count: CellCount = 0;
        let mut flag_count: CellCount = 0;
        for coords in iter_coords(mine_layout.size()) {
            match states[coords.to_nd_index()] {
                CellState::Revealed if mine_layout.contains_mine(coords) => {
                    return Err(GameError::InvalidSnapshot);
                }
                CellState::Revealed => revealed_count += 1,
                CellState::Flagged => flag_count += 1,
                CellState::Unrevealed => {}
            }
        }
        if flag_count > mine_layout.mine_count() {
            return Err(GameError::InvalidSnapshot);
        }

        let expected_outcome = match triggered_mine {
            Some(coords) => {
                let coords = mine_layout.validate_coords(coords)?;
                if !mine_layout.contains_mine(coords) {
                    return Err(GameError::InvalidSnapshot);
                }
                GameOutcome::Lost
            }
            None if revealed_count == mine_layout.safe_cell_count() => GameOutcome::Won,
            None => GameOutcome::InProgress,
        };
        if outcome != expected_outcome {
            return Err(GameError::InvalidSnapshot);
        }

        Ok(Self {
            mine_layout,
            states,
            revealed_count,
            flag_count,
            outcome,
            triggered_mine,
        })
    }
}

impl Board {
    pub fn new(mine_layout: MineLayout) -> Self {
        let size = mine_layout.size();
        Self {
            mine_layout,
            states: Array2::default(size.to_nd_index()),
            revealed_count: 0,
            flag_count: 0,
            outcome: Default::default(),
            triggered_mine: None,
        }
    }

    /// Creates a fresh board with randomly placed mines.
    pub fn generate(config: GameConfig, seed: u64) -> Result<Self> {
        RandomMinefieldGenerator::new(seed)
            .generate(config)
            .map(Self::new)
    }

    pub fn outcome(&self) -> GameOutcome {
        self.outcome
    }

    pub fn is_over(&self) -> bool {
        self.outcome.is_finished()
    }

    pub fn size(&self) -> Coord2 {
        self.mine_layout.size()
    }

    pub fn mine_total(&self) -> CellCount {
        self.mine_layout.mine_count()
    }

    pub fn flag_count(&self) -> CellCount {
        self.flag_count
    }

    pub fn revealed_count(&self) -> CellCount {
        self.revealed_count
    }

    pub fn mines_left(&self) -> CellCount {
        self.mine_total() - self.flag_count
    }

    pub fn triggered_mine(&self) -> Option<Coord2> {
        self.triggered_mine
    }

    pub fn mine_layout(&self) -> &MineLayout {
        &self.mine_layout
    }

    pub fn mine_coords(&self) -> Vec<Coord2> {
        self.mine_layout.mine_coords()
    }

    pub fn state_at(&self, coords: Coord2) -> CellState {
        self.states[coords.to_nd_index()]
    }

    pub fn cell(&self, coords: Coord2) -> Result<Cell> {
        let coords = self.mine_layout.validate_coords(coords)?;
        Ok(Cell {
            is_mine: self.mine_layout.contains_mine(coords),
            adjacent_count: self.mine_layout.adjacent_mine_count(coords),
            state: self.state_at(coords),
        })
    }

    /// Iterates all coordinates in row-major order.
    pub fn iter_coords(&self) -> impl Iterator<Item = Coord2> + use<> {
        iter_coords(self.size())
    }

    pub fn toggle_flag(&mut self, coords: Coord2) -> Result<MarkOutcome> {
        let coords = self.mine_layout.validate_coords(coords)?;
        self.check_not_finished()?;

        Ok(match self.states[coords.to_nd_index()] {
            CellState::Unrevealed if self.flag_count >= self.mine_total() => {
                log::debug!("flag refused at {:?}, all {} flags placed", coords, self.flag_count);
                MarkOutcome::NoChange
            }
            CellState::Unrevealed => {
                self.states[coords.to_nd_index()] = CellState::Flagged;
                self.flag_count += 1;
                MarkOutcome::Flagged
            }
            CellState::Flagged => {
                self.states[coords.to_nd_index()] = CellState::Unrevealed;
                self.flag_count -= 1;
                MarkOutcome::Unflagged
            }
            CellState::Revealed => MarkOutcome::NoChange,
        })
    }

    pub fn reveal(&mut self, coords: Coord2) -> Result<RevealOutcome> {
        self.reveal_into(coords, &mut Vec::new())
    }

    /// Reveals `coords`, appending every cell opened by this move to `opened`.
    pub fn reveal_into(&mut self, coords: Coord2, opened: &mut Vec<Coord2>) -> Result<RevealOutcome> {
        let coords = self.mine_layout.validate_coords(coords)?;
        self.check_not_finished()?;

        if self.states[coords.to_nd_index()] != CellState::Unrevealed {
            return Ok(RevealOutcome::NoChange);
        }

        if self.mine_layout[coords] {
            log::debug!("mine hit at {:?}", coords);
            self.triggered_mine = Some(coords);
            self.outcome = GameOutcome::Lost;
            return Ok(RevealOutcome::HitMine);
        }

        self.open_cell(coords, opened);

        if self.mine_layout.adjacent_mine_count(coords) == 0 {
            self.flood_from(coords, opened);
        }

        if self.revealed_count == self.mine_layout.safe_cell_count() {
            log::debug!("all {} safe cells revealed", self.revealed_count);
            self.outcome = GameOutcome::Won;
            Ok(RevealOutcome::Won)
        } else {
            Ok(RevealOutcome::Revealed)
        }
    }

    fn open_cell(&mut self, coords: Coord2, opened: &mut Vec<Coord2>) {
        self.states[coords.to_nd_index()] = CellState::Revealed;
        self.revealed_count += 1;
        opened.push(coords);
    }

    /// Opens the connected zero region around `start` and its non-zero border.
    fn flood_from(&mut self, start: Coord2, opened: &mut Vec<Coord2>) {
        let mut visited = BTreeSet::from([start]);
        let mut to_visit: VecDeque<_> = self.hidden_neighbors(start).collect();

        while let Some(visit_coords) = to_visit.pop_front() {
            if !visited.insert(visit_coords) {
                continue;
            }

            // flags stay put, mines are never adjacent to a zero cell
            if self.states[visit_coords.to_nd_index()] != CellState::Unrevealed {
                continue;
            }

            self.open_cell(visit_coords, opened);

            if self.mine_layout.adjacent_mine_count(visit_coords) == 0 {
                log::trace!("flood continues through {:?}", visit_coords);
                to_visit.extend(
                    self.hidden_neighbors(visit_coords)
                        .filter(|pos| !visited.contains(pos)),
                );
            }
        }
    }

    fn hidden_neighbors(&self, coords: Coord2) -> impl Iterator<Item = Coord2> + use<'_> {
        self.mine_layout
            .iter_neighbors(coords)
            .filter(|&pos| self.states[pos.to_nd_index()] == CellState::Unrevealed)
    }

    fn check_not_finished(&self) -> Result<()> {
        if self.outcome.is_finished() {
            Err(GameError::AlreadyEnded)
        } else {
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::string::ToString;

    fn board(size: Coord2, mines: &[Coord2]) -> Board {
        Board::new(MineLayout::from_mine_coords(size, mines).unwrap())
    }

    #[test]
    fn zero_cell_floods_whole_board_and_wins() {
        let mut board = board((3, 3), &[(0, 0)]);

        let mut opened = Vec::new();
        let outcome = board.reveal_into((2, 2), &mut opened).unwrap();

        assert_eq!(outcome, RevealOutcome::Won);
        assert_eq!(board.outcome(), GameOutcome::Won);
        assert_eq!(opened.len(), 8);
        assert_eq!(board.revealed_count(), 8);
        assert_eq!(board.state_at((0, 0)), CellState::Unrevealed);
        for coords in board.iter_coords().filter(|&c| c != (0, 0)) {
            assert_eq!(board.state_at(coords), CellState::Revealed, "{coords:?}");
        }
    }

    #[test]
    fn numbered_cell_does_not_flood() {
        let mut board = board((3, 3), &[(0, 0), (2, 2)]);

        assert_eq!(board.cell((1, 1)).unwrap().adjacent_count, 2);
        let outcome = board.reveal((1, 1)).unwrap();

        assert_eq!(outcome, RevealOutcome::Revealed);
        assert_eq!(board.outcome(), GameOutcome::InProgress);
        assert_eq!(board.revealed_count(), 1);
        assert_eq!(board.state_at((0, 1)), CellState::Unrevealed);
    }

    #[test]
    fn flood_stops_at_numbered_border() {
        // column 3 holds the mines, column 2 is the numbered border
        let mines = [(0, 3), (1, 3), (2, 3), (3, 3)];
        let mut board = board((4, 5), &mines);

        let outcome = board.reveal((0, 0)).unwrap();

        assert_eq!(outcome, RevealOutcome::Revealed);
        for row in 0..4 {
            assert_eq!(board.state_at((row, 0)), CellState::Revealed);
            assert_eq!(board.state_at((row, 1)), CellState::Revealed);
            assert_eq!(board.state_at((row, 2)), CellState::Revealed);
            assert_ne!(board.cell((row, 2)).unwrap().adjacent_count, 0);
            assert_eq!(board.state_at((row, 4)), CellState::Unrevealed);
        }
        assert_eq!(board.revealed_count(), 12);
    }

    #[test]
    fn flood_skips_flagged_cells() {
        let mut board = board((3, 3), &[(0, 0)]);
        board.toggle_flag((1, 2)).unwrap();

        let outcome = board.reveal((2, 2)).unwrap();

        assert_eq!(outcome, RevealOutcome::Revealed);
        assert_eq!(board.state_at((1, 2)), CellState::Flagged);
        assert_eq!(board.state_at((0, 2)), CellState::Unrevealed);
        assert_eq!(board.revealed_count(), 5);

        board.toggle_flag((1, 2)).unwrap();
        assert_eq!(board.reveal((1, 2)).unwrap(), RevealOutcome::Won);
    }

    #[test]
    fn revealing_mine_loses() {
        let mut board = board((3, 3), &[(1, 1)]);
        board.reveal((0, 0)).unwrap();

        assert_eq!(board.reveal((1, 1)).unwrap(), RevealOutcome::HitMine);
        assert_eq!(board.outcome(), GameOutcome::Lost);
        assert_eq!(board.triggered_mine(), Some((1, 1)));
        assert_eq!(board.reveal((2, 2)), Err(GameError::AlreadyEnded));
        assert_eq!(board.toggle_flag((2, 2)), Err(GameError::AlreadyEnded));
    }

    #[test]
    fn flagged_cell_cannot_be_revealed() {
        let mut board = board((2, 2), &[(0, 0)]);

        assert_eq!(board.toggle_flag((0, 0)).unwrap(), MarkOutcome::Flagged);
        assert_eq!(board.reveal((0, 0)).unwrap(), RevealOutcome::NoChange);
        assert_eq!(board.outcome(), GameOutcome::InProgress);
    }

    #[test]
    fn revealed_cell_reveal_is_noop() {
        let mut board = board((2, 3), &[(0, 0)]);

        assert_eq!(board.reveal((1, 1)).unwrap(), RevealOutcome::Revealed);
        assert_eq!(board.reveal((1, 1)).unwrap(), RevealOutcome::NoChange);
        assert_eq!(board.revealed_count(), 1);
    }

    #[test]
    fn revealing_last_safe_cell_wins() {
        let mut board = board((2, 2), &[(0, 0), (0, 1), (1, 0)]);

        assert_eq!(board.reveal((1, 1)).unwrap(), RevealOutcome::Won);
        assert!(board.is_over());
    }

    #[test]
    fn toggle_twice_restores_unrevealed() {
        let mut board = board((3, 3), &[(0, 0)]);

        assert_eq!(board.toggle_flag((2, 2)).unwrap(), MarkOutcome::Flagged);
        assert_eq!(board.flag_count(), 1);
        assert_eq!(board.toggle_flag((2, 2)).unwrap(), MarkOutcome::Unflagged);
        assert_eq!(board.flag_count(), 0);
        assert_eq!(board.state_at((2, 2)), CellState::Unrevealed);
    }

    #[test]
    fn flag_count_capped_at_mine_total() {
        let mut board = board((3, 3), &[(0, 0), (2, 2)]);

        assert_eq!(board.toggle_flag((0, 1)).unwrap(), MarkOutcome::Flagged);
        assert_eq!(board.toggle_flag((0, 2)).unwrap(), MarkOutcome::Flagged);
        assert_eq!(board.toggle_flag((1, 0)).unwrap(), MarkOutcome::NoChange);
        assert_eq!(board.state_at((1, 0)), CellState::Unrevealed);
        assert_eq!(board.flag_count(), 2);
        assert_eq!(board.mines_left(), 0);

        // clearing still works at the cap
        assert_eq!(board.toggle_flag((0, 1)).unwrap(), MarkOutcome::Unflagged);
        assert_eq!(board.toggle_flag((1, 0)).unwrap(), MarkOutcome::Flagged);
    }

    #[test]
    fn cannot_flag_revealed_cell() {
        let mut board = board((2, 3), &[(0, 0)]);
        board.reveal((1, 2)).unwrap();

        assert_eq!(board.toggle_flag((1, 2)).unwrap(), MarkOutcome::NoChange);
        assert_eq!(board.flag_count(), 0);
    }

    #[test]
    fn invalid_coords_are_reported() {
        let mut board = board((3, 3), &[(0, 0)]);

        assert_eq!(board.reveal((3, 0)), Err(GameError::InvalidCoords));
        assert_eq!(board.toggle_flag((0, 3)), Err(GameError::InvalidCoords));
        assert_eq!(board.cell((9, 9)), Err(GameError::InvalidCoords));
        assert_eq!(board.outcome(), GameOutcome::InProgress);
    }

    #[test]
    fn generated_board_respects_config() {
        let board = Board::generate(GameConfig::CLASSIC, 3).unwrap();

        assert_eq!(board.size(), (10, 10));
        assert_eq!(board.mine_total(), 10);
        assert_eq!(board.mine_coords().len(), 10);
        assert_eq!(
            Board::generate(GameConfig::new_unchecked((10, 10), 100), 3),
            Err(GameError::TooManyMines)
        );
    }

    #[test]
    fn mine_always_loses_on_generated_boards() {
        for seed in 0..20 {
            let mut board = Board::generate(GameConfig::CLASSIC, seed).unwrap();
            let safe: Vec<_> = board
                .iter_coords()
                .filter(|&c| !board.mine_layout().contains_mine(c))
                .take(5)
                .collect();
            for coords in safe {
                if board.is_over() {
                    break;
                }
                board.reveal(coords).unwrap();
            }
            if board.is_over() {
                continue;
            }
            let mine = board.mine_coords()[0];
            assert_eq!(board.reveal(mine).unwrap(), RevealOutcome::HitMine, "seed {seed}");
        }
    }

    #[test]
    fn snapshot_round_trips_mid_game() {
        let mut board = board((4, 4), &[(0, 0), (3, 3)]);
        assert_eq!(board.reveal((1, 1)).unwrap(), RevealOutcome::Revealed);
        board.toggle_flag((0, 0)).unwrap();

        let json = serde_json::to_string(&board).unwrap();
        let mut restored: Board = serde_json::from_str(&json).unwrap();

        assert_eq!(restored, board);
        assert_eq!(restored.reveal((3, 3)).unwrap(), RevealOutcome::HitMine);
    }

    fn tampered(board: &Board, edit: impl FnOnce(&mut serde_json::Value)) -> serde_json::Result<Board> {
        let mut value = serde_json::to_value(board).unwrap();
        edit(&mut value);
        serde_json::from_value(value)
    }

    #[test]
    fn snapshot_with_mismatched_states_is_rejected() {
        let board = board((3, 3), &[(0, 0)]);
        let small = serde_json::to_value(Array2::<CellState>::default((2, 2))).unwrap();

        let err = tampered(&board, |value| value["states"] = small).unwrap_err();

        assert!(err.to_string().contains("shape"), "{err}");
    }

    #[test]
    fn snapshot_counters_are_recomputed() {
        let mut board = board((3, 3), &[(0, 0)]);
        board.toggle_flag((0, 0)).unwrap();
        board.reveal((1, 1)).unwrap();

        let restored = tampered(&board, |value| {
            value["flag_count"] = 5.into();
            value["revealed_count"] = 40.into();
        })
        .unwrap();

        assert_eq!(restored.flag_count(), 1);
        assert_eq!(restored.revealed_count(), 1);
        assert_eq!(restored.mines_left(), 0);
    }

    #[test]
    fn snapshot_with_too_many_flags_is_rejected() {
        let board = board((2, 2), &[(0, 0)]);
        let flagged = serde_json::to_value(Array2::from_elem((2, 2), CellState::Flagged)).unwrap();

        assert!(tampered(&board, |value| value["states"] = flagged).is_err());
    }

    #[test]
    fn snapshot_with_wrong_outcome_is_rejected() {
        let board = board((2, 2), &[(0, 0)]);

        assert!(tampered(&board, |value| value["outcome"] = "Won".into()).is_err());
        assert!(tampered(&board, |value| value["triggered_mine"] = serde_json::json!([1, 1])).is_err());
    }
}
