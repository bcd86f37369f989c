use serde::{Deserialize, Serialize};

use crate::*;

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum SoundKind {
    WindowOpen,
    Blast,
    WrongAnswer,
    WinLaugh,
    LoseLaugh,
    Click,
}

/// Side effect requested by the game, in the order it happened.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Effect {
    /// The cell changed and should be redrawn.
    Draw(Coord2),
    Sound(SoundKind),
    ShowRewardPopup(RewardId),
    /// A new screen was entered.
    Screen(GameState),
    Countdown(u8),
    RevealSeconds(u8),
    Hud { lives: u8, found: CellCount },
    VisitBrand,
}
