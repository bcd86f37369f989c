#![no_std]

extern crate alloc;

use serde::{Deserialize, Serialize};

pub use animator::*;
pub use cell::*;
pub use context::*;
pub use effect::*;
pub use error::*;
pub use grid::*;
pub use input::*;
pub use machine::*;
pub use reward::*;
pub use session::*;
pub use timer::*;
pub use types::*;

mod animator;
mod cell;
mod context;
mod effect;
mod error;
mod grid;
mod input;
mod machine;
mod reward;
mod session;
mod timer;
mod types;

/// Tunables of a game. Durations are in milliseconds of the game clock.
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    pub rows: Coord,
    pub cols: Coord,
    /// Rewards hidden per session, also the number needed to win.
    pub rewards: CellCount,
    pub max_lives: u8,
    /// Sprites in the window sequence, closed to fully open.
    pub window_frames: u8,
    pub blast_frames: u8,
    pub frame_interval_ms: Millis,
    pub blast_delay_ms: Millis,
    pub blast_interval_ms: Millis,
    pub countdown_secs: u8,
    pub reveal_secs: u8,
    /// Length of one countdown step.
    pub second_ms: Millis,
    /// Pause between the deciding move and the win/lose screen.
    pub end_delay_ms: Millis,
    /// Gap between cells, in pixels.
    pub spacing: f64,
}

impl GameConfig {
    pub const fn size(&self) -> Coord2 {
        (self.rows, self.cols)
    }

    pub const fn total_cells(&self) -> CellCount {
        mult(self.rows, self.cols)
    }

    pub fn validate(&self) -> Result<()> {
        if self.rows == 0 || self.cols == 0 {
            return Err(GameError::InvalidConfig("grid must have at least one cell"));
        }
        if self.rewards == 0 {
            return Err(GameError::InvalidConfig("rewards must be at least 1"));
        }
        if self.rewards > self.total_cells() {
            return Err(GameError::TooManyRewards);
        }
        if self.max_lives == 0 {
            return Err(GameError::InvalidConfig("max_lives must be at least 1"));
        }
        if self.window_frames < 2 {
            return Err(GameError::InvalidConfig("window_frames must be at least 2"));
        }
        if self.blast_frames == 0 {
            return Err(GameError::InvalidConfig("blast_frames must be at least 1"));
        }
        Ok(())
    }
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            rows: 5,
            cols: 4,
            rewards: 10,
            max_lives: 3,
            window_frames: 3,
            blast_frames: 3,
            frame_interval_ms: 300,
            blast_delay_ms: 400,
            blast_interval_ms: 300,
            countdown_secs: 3,
            reveal_secs: 5,
            second_ms: 1000,
            end_delay_ms: 1500,
            spacing: 3.0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        let config = GameConfig::default();
        assert_eq!(config.validate(), Ok(()));
        assert_eq!(config.total_cells(), 20);
    }

    #[test]
    fn invalid_configs_are_rejected() {
        let base = GameConfig::default();

        let too_many = GameConfig {
            rewards: 21,
            ..base
        };
        assert_eq!(too_many.validate(), Err(GameError::TooManyRewards));

        let no_rows = GameConfig { rows: 0, ..base };
        assert!(matches!(no_rows.validate(), Err(GameError::InvalidConfig(_))));

        let single_frame = GameConfig {
            window_frames: 1,
            ..base
        };
        assert!(matches!(
            single_frame.validate(),
            Err(GameError::InvalidConfig(_))
        ));
    }

    #[test]
    fn zero_rewards_could_never_be_won() {
        let config = GameConfig {
            rows: 1,
            cols: 2,
            rewards: 0,
            ..GameConfig::default()
        };

        assert_eq!(
            config.validate(),
            Err(GameError::InvalidConfig("rewards must be at least 1"))
        );
        assert!(GameMachine::new(config, RewardCatalog::default(), 0).is_err());
    }
}
