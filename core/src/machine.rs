use alloc::vec::Vec;
use serde::{Deserialize, Serialize};

use crate::*;

/// Screens of the game, in play order.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameState {
    Title,
    Instructions1,
    CountdownOpen,
    RevealTimer,
    CloseAll,
    Instructions2,
    Playing,
    Popup,
    Win,
    Lose,
}

impl GameState {
    pub const fn is_finished(self) -> bool {
        matches!(self, Self::Win | Self::Lose)
    }

    pub const fn accepts_cell_clicks(self) -> bool {
        matches!(self, Self::Playing)
    }
}

impl Default for GameState {
    fn default() -> Self {
        Self::Title
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Button {
    Start,
    Understood,
    DismissPopup,
    PlayAgain,
    VisitBrand,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum ClickOutcome {
    Ignored,
    Advanced,
    Opening,
}

impl ClickOutcome {
    pub const fn has_update(self) -> bool {
        match self {
            Self::Ignored => false,
            Self::Advanced => true,
            Self::Opening => true,
        }
    }
}

/// Drives a game from the title screen through any number of replays.
///
/// Time only passes through [`GameMachine::advance_to`]; side effects for the host pile up
/// until [`GameMachine::drain_effects`].
#[derive(Clone, Debug)]
pub struct GameMachine {
    ctx: GameContext,
    router: InputRouter,
    state: GameState,
    assets_ready: bool,
    wants_to_play: bool,
    countdown: u8,
    reveal_remaining: u8,
    phase_timer: Option<TimerId>,
}

impl GameMachine {
    pub fn new(config: GameConfig, catalog: RewardCatalog, seed: u64) -> Result<Self> {
        let ctx = GameContext::new(config, catalog, seed)?;
        let geometry = GridGeometry::fit(0.0, 0.0, config.size(), config.spacing);
        let mut machine = Self {
            ctx,
            router: InputRouter::new(geometry),
            state: GameState::Title,
            assets_ready: false,
            wants_to_play: false,
            countdown: config.countdown_secs,
            reveal_remaining: config.reveal_secs,
            phase_timer: None,
        };
        machine.ctx.emit(Effect::Screen(GameState::Title));
        Ok(machine)
    }

    pub fn state(&self) -> GameState {
        self.state
    }

    pub fn context(&self) -> &GameContext {
        &self.ctx
    }

    pub fn grid(&self) -> &Grid {
        self.ctx.grid()
    }

    pub fn session(&self) -> &Session {
        self.ctx.session()
    }

    pub fn config(&self) -> &GameConfig {
        self.ctx.config()
    }

    pub fn catalog(&self) -> &RewardCatalog {
        self.ctx.catalog()
    }

    pub fn now(&self) -> Millis {
        self.ctx.now()
    }

    pub fn countdown_value(&self) -> u8 {
        self.countdown
    }

    pub fn reveal_seconds_remaining(&self) -> u8 {
        self.reveal_remaining
    }

    pub fn geometry(&self) -> &GridGeometry {
        self.router.geometry()
    }

    /// Whether rewards are shown behind the open windows.
    pub fn rewards_visible(&self) -> bool {
        match self.state {
            GameState::CountdownOpen => self.countdown == 0,
            GameState::RevealTimer => true,
            _ => false,
        }
    }

    pub fn drain_effects(&mut self) -> Vec<Effect> {
        self.ctx.drain_effects()
    }

    pub fn resize(&mut self, width: f64, height: f64) {
        let config = self.ctx.config;
        self.router
            .set_geometry(GridGeometry::fit(width, height, config.size(), config.spacing));
    }

    /// Everything the title screen waits for has loaded.
    pub fn assets_ready(&mut self) {
        if self.assets_ready {
            return;
        }
        log::debug!("assets ready");
        self.assets_ready = true;
        self.try_leave_title();
    }

    pub fn pointer_click(&mut self, x: f64, y: f64) -> ClickOutcome {
        match self.router.route(self.state, x, y) {
            Some(Action::IntentToPlay) => self.intent_to_play(),
            Some(Action::Press(button)) => self.press(button),
            Some(Action::Cell(coords)) => self.cell_clicked(coords),
            None => ClickOutcome::Ignored,
        }
    }

    /// First input on the title screen.
    pub fn intent_to_play(&mut self) -> ClickOutcome {
        if self.state != GameState::Title {
            return ClickOutcome::Ignored;
        }
        self.wants_to_play = true;
        self.ctx.emit(Effect::Sound(SoundKind::Click));
        if self.try_leave_title() {
            ClickOutcome::Advanced
        } else {
            ClickOutcome::Ignored
        }
    }

    pub fn press(&mut self, button: Button) -> ClickOutcome {
        use Button::*;
        use GameState::*;

        let advanced = match (self.state, button) {
            (Instructions1, Start) => self.set_state(CountdownOpen),
            (Instructions2, Understood) => self.set_state(Playing),
            (Popup, DismissPopup) => self.set_state(Playing),
            (Win | Lose, PlayAgain) => self.replay(),
            (Win, VisitBrand) => {
                self.ctx.emit(Effect::VisitBrand);
                true
            }
            (state, button) => {
                log::trace!("{:?} ignored in {:?}", button, state);
                false
            }
        };

        if advanced {
            self.ctx.emit(Effect::Sound(SoundKind::Click));
            ClickOutcome::Advanced
        } else {
            ClickOutcome::Ignored
        }
    }

    /// Opens a closed window while playing; anything else is ignored.
    pub fn cell_clicked(&mut self, coords: Coord2) -> ClickOutcome {
        if !self.state.accepts_cell_clicks() || self.ctx.pending_end.is_some() {
            return ClickOutcome::Ignored;
        }
        let Ok(coords) = self.ctx.grid.validate_coords(coords) else {
            return ClickOutcome::Ignored;
        };
        if self.ctx.grid[coords].state() != CellState::Closed {
            return ClickOutcome::Ignored;
        }

        log::debug!("open {:?}", coords);
        self.ctx.emit(Effect::Sound(SoundKind::WindowOpen));
        self.ctx.animate_window(coords, true, Completion::Reveal);
        ClickOutcome::Opening
    }

    /// Moves the clock to `now`, firing everything due on the way in order.
    pub fn advance_to(&mut self, now: Millis) {
        while let Some((id, event)) = self.ctx.timers.pop_due(now) {
            if let Some(wake) = self.ctx.on_timer(id, event) {
                self.wake(wake);
            }
        }
    }

    pub fn advance_by(&mut self, elapsed: Millis) {
        self.advance_to(self.now() + elapsed);
    }

    /// Enters `next` and runs its entry action; a no-op when already there.
    pub(crate) fn set_state(&mut self, next: GameState) -> bool {
        if self.state == next {
            log::trace!("already in {:?}", next);
            return false;
        }

        log::debug!("{:?} -> {:?} at {}ms", self.state, next, self.now());
        if let Some(timer) = self.phase_timer.take() {
            self.ctx.timers.cancel(timer);
        }
        self.state = next;
        self.ctx.emit(Effect::Screen(next));
        self.enter(next);
        true
    }

    fn enter(&mut self, state: GameState) {
        use GameState::*;

        match state {
            Title | Instructions1 | Instructions2 | Playing | Popup => {}
            CountdownOpen => {
                self.countdown = self.ctx.config.countdown_secs;
                self.ctx.emit(Effect::Countdown(self.countdown));
                self.ctx.emit_hud();
                if self.countdown == 0 {
                    self.open_all();
                } else {
                    self.start_phase_timer(TimerEvent::Countdown);
                }
            }
            RevealTimer => {
                self.reveal_remaining = self.ctx.config.reveal_secs;
                self.ctx.emit(Effect::RevealSeconds(self.reveal_remaining));
                if self.reveal_remaining == 0 {
                    self.set_state(CloseAll);
                } else {
                    self.start_phase_timer(TimerEvent::Reveal);
                }
            }
            CloseAll => {
                if let Some(next) = self.ctx.close_all_windows(Instructions2) {
                    self.set_state(next);
                }
            }
            Win => self.ctx.emit(Effect::Sound(SoundKind::WinLaugh)),
            Lose => self.ctx.emit(Effect::Sound(SoundKind::LoseLaugh)),
        }
    }

    fn wake(&mut self, wake: Wake) {
        match wake {
            Wake::Enter(next) => {
                self.set_state(next);
            }
            Wake::CountdownTick => self.tick_countdown(),
            Wake::RevealTick => self.tick_reveal(),
        }
    }

    fn tick_countdown(&mut self) {
        if self.state != GameState::CountdownOpen || self.countdown == 0 {
            return;
        }
        self.countdown -= 1;
        self.ctx.emit(Effect::Countdown(self.countdown));
        if self.countdown == 0 {
            self.stop_phase_timer();
            self.open_all();
        }
    }

    fn tick_reveal(&mut self) {
        if self.state != GameState::RevealTimer || self.reveal_remaining == 0 {
            return;
        }
        self.reveal_remaining -= 1;
        self.ctx.emit(Effect::RevealSeconds(self.reveal_remaining));
        if self.reveal_remaining == 0 {
            self.set_state(GameState::CloseAll);
        }
    }

    fn open_all(&mut self) {
        if let Some(next) = self.ctx.open_all_windows(GameState::RevealTimer) {
            self.set_state(next);
        }
    }

    fn start_phase_timer(&mut self, event: TimerEvent) {
        self.stop_phase_timer();
        self.phase_timer = Some(self.ctx.timers.every(self.ctx.config.second_ms, event));
    }

    fn stop_phase_timer(&mut self) {
        if let Some(timer) = self.phase_timer.take() {
            self.ctx.timers.cancel(timer);
        }
    }

    fn try_leave_title(&mut self) -> bool {
        if self.state == GameState::Title && self.assets_ready && self.wants_to_play {
            self.set_state(GameState::Instructions1)
        } else {
            false
        }
    }

    fn replay(&mut self) -> bool {
        if let Err(err) = self.ctx.reset() {
            log::error!("cannot set up a new grid: {}", err);
            return false;
        }
        self.phase_timer = None;
        for cell in self.ctx.grid.iter() {
            self.ctx.effects.push(Effect::Draw(cell.coords()));
        }
        self.set_state(GameState::CountdownOpen)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn machine(config: GameConfig) -> GameMachine {
        GameMachine::new(config, reward::sample_catalog(10), 11).unwrap()
    }

    fn screens(effects: &[Effect]) -> Vec<GameState> {
        effects
            .iter()
            .filter_map(|e| match e {
                Effect::Screen(state) => Some(*state),
                _ => None,
            })
            .collect()
    }

    fn to_instructions2(m: &mut GameMachine) {
        m.assets_ready();
        m.intent_to_play();
        m.press(Button::Start);
        m.advance_by(60_000);
        assert_eq!(m.state(), GameState::Instructions2);
    }

    #[test]
    fn title_needs_assets_and_intent() {
        let mut m = machine(GameConfig::default());

        assert_eq!(m.intent_to_play(), ClickOutcome::Ignored);
        assert_eq!(m.state(), GameState::Title);

        m.assets_ready();
        assert_eq!(m.state(), GameState::Instructions1);
    }

    #[test]
    fn intro_runs_countdown_reveal_and_close() {
        let mut m = machine(GameConfig::default());
        m.assets_ready();
        m.intent_to_play();
        assert_eq!(m.press(Button::Start), ClickOutcome::Advanced);
        assert_eq!(m.state(), GameState::CountdownOpen);
        assert_eq!(m.countdown_value(), 3);

        m.advance_to(2999);
        assert_eq!(m.countdown_value(), 1);
        assert!(m.grid().iter().all(|c| c.state() == CellState::Closed));

        m.advance_to(3000);
        assert_eq!(m.countdown_value(), 0);
        assert!(m.rewards_visible());
        assert_eq!(m.grid().count_in_state(CellState::Opening), 20);

        m.advance_to(3600);
        assert_eq!(m.state(), GameState::RevealTimer);
        assert_eq!(m.grid().count_in_state(CellState::Open), 20);

        m.advance_to(3600 + 4999);
        assert_eq!(m.reveal_seconds_remaining(), 1);
        m.advance_to(3600 + 5000);
        assert_eq!(m.state(), GameState::CloseAll);
        assert!(!m.rewards_visible());

        m.advance_to(3600 + 5600);
        assert_eq!(m.state(), GameState::Instructions2);
        assert!(m.grid().iter().all(|c| c.state() == CellState::Closed && c.frame() == 0));

        let effects = m.drain_effects();
        assert_eq!(
            screens(&effects),
            [
                GameState::Title,
                GameState::Instructions1,
                GameState::CountdownOpen,
                GameState::RevealTimer,
                GameState::CloseAll,
                GameState::Instructions2
            ]
        );
        assert!(m.context().timers.is_empty());
    }

    #[test]
    fn same_state_transition_has_no_side_effects() {
        let mut m = machine(GameConfig::default());
        to_instructions2(&mut m);
        m.press(Button::Understood);
        m.drain_effects();
        let timers = m.context().timers.len();

        assert!(!m.set_state(GameState::Playing));
        assert!(m.drain_effects().is_empty());
        assert_eq!(m.context().timers.len(), timers);
    }

    #[test]
    fn repeated_countdown_entry_does_not_double_the_timer() {
        let mut m = machine(GameConfig::default());
        m.assets_ready();
        m.intent_to_play();
        m.press(Button::Start);
        assert_eq!(m.context().timers.len(), 1);

        assert!(!m.set_state(GameState::CountdownOpen));
        assert_eq!(m.press(Button::Start), ClickOutcome::Ignored);
        assert_eq!(m.context().timers.len(), 1);
        m.advance_to(1000);
        assert_eq!(m.countdown_value(), 2);
    }

    #[test]
    fn zero_length_phases_chain_without_hanging() {
        let mut m = machine(GameConfig {
            countdown_secs: 0,
            reveal_secs: 0,
            ..GameConfig::default()
        });
        m.assets_ready();
        m.intent_to_play();
        m.press(Button::Start);
        assert_eq!(m.state(), GameState::CountdownOpen);

        m.advance_by(600);
        m.advance_by(600);
        assert_eq!(m.state(), GameState::Instructions2);
    }

    #[test]
    fn clicks_only_open_closed_cells_while_playing() {
        let mut m = machine(GameConfig::default());
        assert_eq!(m.cell_clicked((0, 0)), ClickOutcome::Ignored);

        to_instructions2(&mut m);
        assert_eq!(m.cell_clicked((0, 0)), ClickOutcome::Ignored);
        m.press(Button::Understood);

        assert_eq!(m.cell_clicked((0, 0)), ClickOutcome::Opening);
        assert_eq!(m.cell_clicked((0, 0)), ClickOutcome::Ignored);
        assert_eq!(m.cell_clicked((9, 9)), ClickOutcome::Ignored);
        assert_eq!(m.grid()[(0, 0)].state(), CellState::Opening);
    }

    #[test]
    fn found_reward_shows_popup_until_dismissed() {
        let mut m = machine(GameConfig::default());
        to_instructions2(&mut m);
        m.press(Button::Understood);
        let at = m.grid().iter().find(|c| c.has_reward()).unwrap().coords();
        let empty = m.grid().iter().find(|c| !c.has_reward()).unwrap().coords();

        m.cell_clicked(at);
        m.advance_by(5000);
        assert_eq!(m.state(), GameState::Popup);
        assert_eq!(m.cell_clicked(empty), ClickOutcome::Ignored);

        assert_eq!(m.press(Button::DismissPopup), ClickOutcome::Advanced);
        assert_eq!(m.state(), GameState::Playing);
        assert_eq!(m.cell_clicked(empty), ClickOutcome::Opening);
    }

    #[test]
    fn replay_resets_grid_and_session() {
        let mut m = machine(GameConfig {
            max_lives: 1,
            ..GameConfig::default()
        });
        to_instructions2(&mut m);
        m.press(Button::Understood);
        let empty = m.grid().iter().find(|c| !c.has_reward()).unwrap().coords();

        m.cell_clicked(empty);
        m.advance_by(600);
        assert_eq!(m.state(), GameState::Playing);
        assert_eq!(m.session().lives_remaining(), 0);
        assert_eq!(m.cell_clicked((4, 3)), ClickOutcome::Ignored);

        m.advance_by(1500);
        assert_eq!(m.state(), GameState::Lose);
        assert_eq!(m.press(Button::VisitBrand), ClickOutcome::Ignored);

        assert_eq!(m.press(Button::PlayAgain), ClickOutcome::Advanced);
        assert_eq!(m.state(), GameState::CountdownOpen);
        assert_eq!(m.session().lives_remaining(), 1);
        assert_eq!(m.session().rewards_found(), 0);
        assert!(m.grid().iter().all(|c| c.state() == CellState::Closed));
        assert_eq!(m.context().pending_end(), None);
    }

    #[test]
    fn pointer_clicks_are_routed_by_state() {
        let mut m = machine(GameConfig::default());
        m.resize(500.0, 514.0);
        m.assets_ready();

        assert_eq!(m.pointer_click(1.0, 1.0), ClickOutcome::Advanced);
        assert_eq!(m.state(), GameState::Instructions1);
        assert_eq!(m.pointer_click(1.0, 1.0), ClickOutcome::Advanced);
        assert_eq!(m.state(), GameState::CountdownOpen);
        assert_eq!(m.pointer_click(100.0, 100.0), ClickOutcome::Ignored);

        m.advance_by(60_000);
        assert_eq!(m.pointer_click(1.0, 1.0), ClickOutcome::Advanced);
        assert_eq!(m.state(), GameState::Playing);

        assert_eq!(m.pointer_click(1.0, 1.0), ClickOutcome::Ignored);
        assert_eq!(m.pointer_click(100.0, 100.0), ClickOutcome::Opening);
        assert_eq!(m.grid()[(0, 0)].state(), CellState::Opening);
    }
}
