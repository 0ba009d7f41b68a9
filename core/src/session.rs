use alloc::string::String;
use alloc::vec::Vec;
use alloc::format;
use rand::prelude::*;

use crate::*;

/// End-of-round message the shell shows before starting the next round.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Notice {
    Won,
    Lost,
}

impl Notice {
    pub const fn message(self) -> &'static str {
        match self {
            Self::Won => "Congratulations, you won!",
            Self::Lost => "You hit a mine! Game over!",
        }
    }
}

/// What a shell has to redraw after one call into the session.
#[derive(Clone, Debug, PartialEq)]
pub struct Update {
    pub changed: Vec<Coord2>,
    pub outcome: GameOutcome,
    pub notice: Option<Notice>,
}

impl Update {
    fn unchanged(outcome: GameOutcome) -> Self {
        Self {
            changed: Vec::new(),
            outcome,
            notice: None,
        }
    }

    pub fn has_update(&self) -> bool {
        !self.changed.is_empty()
    }
}

/// How a single cell should be drawn.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum CellView {
    Hidden,
    Flagged,
    Open(u8),
    Mine,
    TriggeredMine,
}

/// Owns the current round and hands out fresh boards, the surface a UI shell drives.
///
/// A finished board is kept as-is until [`Session::new_game`] is called, so the shell can show the final layout next to
/// the notice before resetting.
#[derive(Clone, Debug)]
pub struct Session {
    config: GameConfig,
    rng: SmallRng,
    board: Board,
    round: u32,
}

impl Session {
    pub fn new(config: GameConfig, seed: u64) -> Result<Self> {
        let config = GameConfig::new(config.size, config.mines)?;
        let mut rng = SmallRng::seed_from_u64(seed);
        let board = Board::generate(config, rng.random())?;
        log::debug!("session started with {:?}", config);
        Ok(Self {
            config,
            rng,
            board,
            round: 1,
        })
    }

    /// Starts from a prepared board, later rounds use the same size and mine count.
    pub fn from_board(board: Board, seed: u64) -> Self {
        Self {
            config: board.mine_layout().game_config(),
            rng: SmallRng::seed_from_u64(seed),
            board,
            round: 1,
        }
    }

    pub fn config(&self) -> GameConfig {
        self.config
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn outcome(&self) -> GameOutcome {
        self.board.outcome()
    }

    pub fn round(&self) -> u32 {
        self.round
    }

    pub fn mine_counter_text(&self) -> String {
        format!("Mines: {}", self.board.mines_left())
    }

    pub fn new_game(&mut self) -> Result<Update> {
        self.board = Board::generate(self.config, self.rng.random())?;
        self.round += 1;
        log::debug!("round {} started", self.round);
        Ok(Update {
            changed: self.board.iter_coords().collect(),
            outcome: self.board.outcome(),
            notice: None,
        })
    }

    pub fn reveal(&mut self, coords: Coord2) -> Update {
        if self.board.is_over() {
            log::debug!("round over, ignoring reveal at {:?}", coords);
            return Update::unchanged(self.board.outcome());
        }

        let mut changed = Vec::new();
        let notice = match self.board.reveal_into(coords, &mut changed) {
            Ok(RevealOutcome::HitMine) => {
                changed.extend(self.board.mine_coords());
                Some(Notice::Lost)
            }
            Ok(RevealOutcome::Won) => Some(Notice::Won),
            Ok(_) => None,
            Err(err) => {
                log::warn!("ignoring reveal at {:?}: {}", coords, err);
                None
            }
        };
        if let Some(notice) = notice {
            log::debug!("round {} ended: {:?}", self.round, notice);
        }

        Update {
            changed,
            outcome: self.board.outcome(),
            notice,
        }
    }

    pub fn toggle_flag(&mut self, coords: Coord2) -> Update {
        if self.board.is_over() {
            log::debug!("round over, ignoring flag at {:?}", coords);
            return Update::unchanged(self.board.outcome());
        }

        match self.board.toggle_flag(coords) {
            Ok(outcome) if outcome.has_update() => Update {
                changed: Vec::from([coords]),
                outcome: self.board.outcome(),
                notice: None,
            },
            Ok(_) => Update::unchanged(self.board.outcome()),
            Err(err) => {
                log::warn!("ignoring flag at {:?}: {}", coords, err);
                Update::unchanged(self.board.outcome())
            }
        }
    }

    pub fn view_at(&self, coords: Coord2) -> Result<CellView> {
        let cell = self.board.cell(coords)?;
        let lost = self.board.outcome() == GameOutcome::Lost;

        Ok(match cell.state {
            _ if lost && self.board.triggered_mine() == Some(coords) => CellView::TriggeredMine,
            _ if lost && cell.is_mine => CellView::Mine,
            CellState::Unrevealed => CellView::Hidden,
            CellState::Flagged => CellView::Flagged,
            CellState::Revealed => CellView::Open(cell.adjacent_count),
        })
    }
}
