use alloc::collections::BTreeMap;
use alloc::vec::Vec;
use rand::SeedableRng;
use rand::rngs::SmallRng;

use crate::*;

/// Everything a timer can wake up for.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub(crate) enum TimerEvent {
    Window(Coord2),
    BlastDelay(Coord2),
    Blast(Coord2),
    Countdown,
    Reveal,
    Transition(GameState),
}

/// What the state machine has to act on after a timer fired.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub(crate) enum Wake {
    Enter(GameState),
    CountdownTick,
    RevealTick,
}

/// Owned state shared by the state machine, the animator and the input router.
#[derive(Clone, Debug)]
pub struct GameContext {
    pub(crate) config: GameConfig,
    pub(crate) catalog: RewardCatalog,
    pub(crate) grid: Grid,
    pub(crate) session: Session,
    pub(crate) timers: Timers<TimerEvent>,
    pub(crate) bulks: BTreeMap<BulkId, Bulk>,
    pub(crate) next_bulk: u32,
    /// First of Win/Lose to be scheduled this session.
    pub(crate) pending_end: Option<GameState>,
    pub(crate) effects: Vec<Effect>,
    rng: SmallRng,
}

impl GameContext {
    pub fn new(config: GameConfig, catalog: RewardCatalog, seed: u64) -> Result<Self> {
        let mut rng = SmallRng::seed_from_u64(seed);
        let grid = Grid::setup(&config, &catalog, &mut rng)?;
        Ok(Self {
            session: Session::new(config.max_lives, config.rewards),
            config,
            catalog,
            grid,
            timers: Timers::new(),
            bulks: BTreeMap::new(),
            next_bulk: 0,
            pending_end: None,
            effects: Vec::new(),
            rng,
        })
    }

    /// Drops every pending timer and starts over with a new grid and full lives.
    ///
    /// The clock keeps running.
    pub fn reset(&mut self) -> Result<()> {
        self.grid = Grid::setup(&self.config, &self.catalog, &mut self.rng)?;
        self.timers.clear();
        self.bulks.clear();
        self.pending_end = None;
        self.session.reset();
        log::debug!("session reset at {}ms", self.timers.now());
        Ok(())
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn catalog(&self) -> &RewardCatalog {
        &self.catalog
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn now(&self) -> Millis {
        self.timers.now()
    }

    pub fn pending_end(&self) -> Option<GameState> {
        self.pending_end
    }

    pub fn drain_effects(&mut self) -> Vec<Effect> {
        core::mem::take(&mut self.effects)
    }

    pub(crate) fn emit(&mut self, effect: Effect) {
        self.effects.push(effect);
    }

    pub(crate) fn emit_hud(&mut self) {
        self.effects.push(Effect::Hud {
            lives: self.session.lives_remaining(),
            found: self.session.rewards_found(),
        });
    }

    /// Schedules the end screen unless one is already on its way.
    pub(crate) fn schedule_end(&mut self, state: GameState) -> bool {
        if self.pending_end.is_some() {
            log::debug!("ignoring {:?}, {:?} already pending", state, self.pending_end);
            return false;
        }
        log::debug!("{:?} in {}ms", state, self.config.end_delay_ms);
        self.pending_end = Some(state);
        self.timers
            .once(self.config.end_delay_ms, TimerEvent::Transition(state));
        true
    }

    /// Runs the animator part of a fired timer, handing anything else to the caller.
    pub(crate) fn on_timer(&mut self, id: TimerId, event: TimerEvent) -> Option<Wake> {
        match event {
            TimerEvent::Window(at) => match self.tick_window(id, at)? {
                Completion::Reveal => {
                    self.animate_blast(at);
                    None
                }
                Completion::Bulk(bulk) => self.finish_bulk_member(bulk).map(Wake::Enter),
                Completion::Settle => None,
            },
            TimerEvent::BlastDelay(at) => {
                self.start_blast(id, at);
                None
            }
            TimerEvent::Blast(at) => self.tick_blast(id, at).map(Wake::Enter),
            TimerEvent::Countdown => Some(Wake::CountdownTick),
            TimerEvent::Reveal => Some(Wake::RevealTick),
            TimerEvent::Transition(state) => Some(Wake::Enter(state)),
        }
    }
}

#[cfg(test)]
pub(crate) fn test_context(config: GameConfig) -> GameContext {
    GameContext::new(config, reward::sample_catalog(config.rewards.max(1)), 3).unwrap()
}
