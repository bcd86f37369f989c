use anyhow::Context;
use devilwin_core as game;
use serde::Deserialize;

const GAME_TOML: &str = include_str!("../game.toml");

/// Static configuration shipped with the page.
#[derive(Clone, Debug, PartialEq, Deserialize)]
pub(crate) struct GameFile {
    #[serde(default)]
    pub game: game::GameConfig,
    /// Where "visit brand" on the win screen leads.
    pub brand_link: String,
    pub rewards: Vec<game::Reward>,
}

impl GameFile {
    pub(crate) fn parse(text: &str) -> anyhow::Result<(Self, game::RewardCatalog)> {
        let file: Self = toml::from_str(text).context("could not parse game configuration")?;
        file.game.validate()?;
        let catalog = game::RewardCatalog::new(file.rewards.clone())?;
        catalog
            .ensure_covers(file.game.rewards)
            .context("reward catalog too small for the configured grid")?;
        Ok((file, catalog))
    }

    pub(crate) fn load() -> anyhow::Result<(Self, game::RewardCatalog)> {
        Self::parse(GAME_TOML)
    }
}
