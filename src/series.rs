//! Best-of series across several rounds
//!
//! First side to `rounds_to_win` round wins takes the series. Draws are
//! replayed without awarding anything.

use serde::{Deserialize, Serialize};

use crate::consts::ROUNDS_TO_WIN;
use crate::controller::MatchController;
use crate::error::ConfigResult;
use crate::sim::{Outcome, Side};

/// Running tally of a series
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Series {
    pub rounds_to_win: u32,
    /// Round wins, indexed by `Side::index`
    pub wins: [u32; 2],
    pub draws: u32,
    /// 1-based number of the round being played
    pub current_round: u32,
}

impl Default for Series {
    fn default() -> Self {
        Self::new(ROUNDS_TO_WIN)
    }
}

impl Series {
    pub fn new(rounds_to_win: u32) -> Self {
        Self {
            rounds_to_win: rounds_to_win.max(1),
            wins: [0; 2],
            draws: 0,
            current_round: 1,
        }
    }

    pub fn wins(&self, side: Side) -> u32 {
        self.wins[side.index()]
    }

    /// Side that has reached the target, if any
    pub fn winner(&self) -> Option<Side> {
        Side::BOTH
            .into_iter()
            .find(|s| self.wins[s.index()] >= self.rounds_to_win)
    }

    pub fn is_decided(&self) -> bool {
        self.winner().is_some()
    }

    /// Tally a finished round, returning the series winner once decided
    ///
    /// Outcomes recorded after the series is decided are ignored.
    pub fn record(&mut self, outcome: Outcome) -> Option<Side> {
        if let Some(winner) = self.winner() {
            return Some(winner);
        }
        match outcome {
            Outcome::Winner(side) => self.wins[side.index()] += 1,
            Outcome::Draw => self.draws += 1,
        }
        log::info!(
            "Round {} result: {:?} (score {}-{})",
            self.current_round,
            outcome,
            self.wins[0],
            self.wins[1]
        );

        let winner = self.winner();
        if let Some(side) = winner {
            log::info!("{} takes the series", side.label());
        }
        winner
    }

    /// Start the next round on `controller` unless the series is over
    ///
    /// Returns `Ok(false)` when there is nothing left to play.
    pub fn next_round(&mut self, controller: &mut MatchController) -> ConfigResult<bool> {
        if self.is_decided() {
            return Ok(false);
        }
        self.current_round += 1;
        controller.reset()?;
        Ok(true)
    }
}
