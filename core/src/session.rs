use serde::{Deserialize, Serialize};

use crate::*;

/// Lives and progress of one playthrough.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    max_lives: u8,
    target: CellCount,
    lives_remaining: u8,
    rewards_found: CellCount,
}

impl Session {
    pub fn new(max_lives: u8, target: CellCount) -> Self {
        Self {
            max_lives,
            target,
            lives_remaining: max_lives,
            rewards_found: 0,
        }
    }

    pub fn lives_remaining(&self) -> u8 {
        self.lives_remaining
    }

    pub fn rewards_found(&self) -> CellCount {
        self.rewards_found
    }

    pub fn target(&self) -> CellCount {
        self.target
    }

    pub fn is_won(&self) -> bool {
        self.rewards_found >= self.target
    }

    pub fn is_out_of_lives(&self) -> bool {
        self.lives_remaining == 0
    }

    /// Counts a found reward; `true` only on the call that reaches the target.
    pub fn register_found(&mut self) -> bool {
        let was_won = self.is_won();
        self.rewards_found = self.rewards_found.saturating_add(1);
        !was_won && self.is_won()
    }

    /// Takes a life; `true` only on the call that reaches zero.
    pub fn lose_life(&mut self) -> bool {
        if self.lives_remaining == 0 {
            return false;
        }
        self.lives_remaining -= 1;
        self.lives_remaining == 0
    }

    pub fn reset(&mut self) {
        self.lives_remaining = self.max_lives;
        self.rewards_found = 0;
    }
}
