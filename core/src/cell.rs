use serde::{Deserialize, Serialize};

use crate::*;

/// Lifecycle of a single window.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum CellState {
    Closed,
    Opening,
    Open,
    Closing,
    Blasting,
    Completed,
}

impl Default for CellState {
    fn default() -> Self {
        Self::Closed
    }
}

/// Handle to the one animation a cell may have in flight.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub(crate) struct Animation {
    pub timer: TimerId,
    pub then: Completion,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Cell {
    coords: Coord2,
    reward: Option<RewardId>,
    pub(crate) state: CellState,
    pub(crate) frame: u8,
    pub(crate) blast_frame: u8,
    pub(crate) animation: Option<Animation>,
}

impl Cell {
    pub(crate) fn new(coords: Coord2) -> Self {
        Self {
            coords,
            reward: None,
            state: CellState::Closed,
            frame: 0,
            blast_frame: 0,
            animation: None,
        }
    }

    pub fn coords(&self) -> Coord2 {
        self.coords
    }

    pub fn reward(&self) -> Option<RewardId> {
        self.reward
    }

    pub fn has_reward(&self) -> bool {
        self.reward.is_some()
    }

    pub fn state(&self) -> CellState {
        self.state
    }

    pub fn frame(&self) -> u8 {
        self.frame
    }

    pub fn blast_frame(&self) -> u8 {
        self.blast_frame
    }

    /// An empty window that was opened by the player.
    pub fn is_wrong(&self) -> bool {
        self.state == CellState::Completed && self.reward.is_none()
    }

    pub fn is_animating(&self) -> bool {
        self.animation.is_some()
    }

    pub(crate) fn place_reward(&mut self, reward: RewardId) {
        self.reward = Some(reward);
    }
}
