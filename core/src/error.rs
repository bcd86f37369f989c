use thiserror::Error;

use crate::RewardId;

#[derive(Error, Debug, Copy, Clone, PartialEq, Eq)]
pub enum GameError {
    #[error("Invalid coordinates")]
    InvalidCoords,
    #[error("Invalid configuration: {0}")]
    InvalidConfig(&'static str),
    #[error("Reward catalog has {available} entries but {required} are needed")]
    RewardCatalogExhausted { available: usize, required: usize },
    #[error("Too many rewards for the grid")]
    TooManyRewards,
    #[error("Reward id {0} appears more than once in the catalog")]
    DuplicateRewardId(RewardId),
}

pub type Result<T> = core::result::Result<T, GameError>;
