use alloc::collections::BTreeSet;
use alloc::string::String;
use alloc::vec::Vec;
use serde::{Deserialize, Serialize};

use crate::*;

pub type RewardId = u16;

/// A devil and the offer it unlocks.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Reward {
    pub id: RewardId,
    /// Devil sprite drawn inside the window.
    pub image: String,
    /// Offer artwork shown in the popup.
    pub offer_image: String,
    pub link: String,
}

/// Fixed set of rewards a session samples from.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RewardCatalog {
    rewards: Vec<Reward>,
}

impl RewardCatalog {
    pub fn new(rewards: Vec<Reward>) -> Result<Self> {
        let mut seen = BTreeSet::new();
        for reward in &rewards {
            if !seen.insert(reward.id) {
                return Err(GameError::DuplicateRewardId(reward.id));
            }
        }
        Ok(Self { rewards })
    }

    pub fn len(&self) -> usize {
        self.rewards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rewards.is_empty()
    }

    pub fn get(&self, id: RewardId) -> Option<&Reward> {
        self.rewards.iter().find(|reward| reward.id == id)
    }

    pub(crate) fn at(&self, index: usize) -> &Reward {
        &self.rewards[index]
    }

    pub fn iter(&self) -> impl Iterator<Item = &Reward> {
        self.rewards.iter()
    }

    /// Checks that `required` distinct rewards can be drawn.
    pub fn ensure_covers(&self, required: CellCount) -> Result<()> {
        let required = usize::from(required);
        if self.rewards.len() < required {
            return Err(GameError::RewardCatalogExhausted {
                available: self.rewards.len(),
                required,
            });
        }
        Ok(())
    }
}

#[cfg(test)]
pub(crate) fn sample_catalog(count: RewardId) -> RewardCatalog {
    use alloc::format;

    let rewards = (1..=count)
        .map(|id| Reward {
            id,
            image: format!("assets/D{id}.png"),
            offer_image: format!("assets/offer{id}.png"),
            link: format!("https://example.com/offer{id}"),
        })
        .collect();
    RewardCatalog::new(rewards).unwrap()
}
