use alloc::vec::Vec;

use crate::*;

/// What happens once a window animation reaches its last frame.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub(crate) enum Completion {
    /// The player opened this window, resolve what is behind it.
    Reveal,
    /// Member of an open-all or close-all.
    Bulk(BulkId),
    Settle,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub(crate) struct BulkId(u32);

/// Join counter of one open-all or close-all call.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub(crate) struct Bulk {
    remaining: CellCount,
    then: GameState,
}

impl GameContext {
    /// Starts the window sequence of a cell from its closed (or open) extreme.
    ///
    /// Any animation already running on the cell is cancelled first and its completion is
    /// dropped, so callers check the cell state before restarting.
    pub(crate) fn animate_window(&mut self, at: Coord2, opening: bool, then: Completion) {
        self.cancel_animation(at);

        let timer = self
            .timers
            .every(self.config.frame_interval_ms, TimerEvent::Window(at));
        let last = self.config.window_frames - 1;
        let cell = &mut self.grid[at];
        if opening {
            cell.state = CellState::Opening;
            cell.frame = 0;
        } else {
            cell.state = CellState::Closing;
            cell.frame = last;
        }
        cell.animation = Some(Animation { timer, then });
        log::trace!("{:?} {:?} started", at, cell.state);
        self.effects.push(Effect::Draw(at));
    }

    /// Moves the window cursor one frame, returning the continuation on the last one.
    pub(crate) fn tick_window(&mut self, timer: TimerId, at: Coord2) -> Option<Completion> {
        let last = self.config.window_frames - 1;
        if !self.owns_timer(at, timer) {
            return None;
        }

        let cell = &mut self.grid[at];
        let (finished, settled) = match cell.state {
            CellState::Opening => {
                cell.frame = (cell.frame + 1).min(last);
                (cell.frame == last, CellState::Open)
            }
            CellState::Closing => {
                cell.frame = cell.frame.saturating_sub(1);
                (cell.frame == 0, CellState::Closed)
            }
            state => {
                log::warn!("window tick on {:?} while {:?}", at, state);
                cell.animation = None;
                self.timers.cancel(timer);
                return None;
            }
        };
        log::trace!("{:?} frame {}", at, cell.frame);
        self.effects.push(Effect::Draw(at));

        if !finished {
            return None;
        }
        cell.state = settled;
        let animation = cell.animation.take()?;
        self.timers.cancel(animation.timer);
        Some(animation.then)
    }

    /// Resolves an opened window: blast the reward behind it, or cost a life if empty.
    pub(crate) fn animate_blast(&mut self, at: Coord2) {
        let cell = &self.grid[at];
        if cell.state != CellState::Open {
            log::warn!("cannot blast {:?} while {:?}", at, cell.state);
            return;
        }

        if cell.has_reward() {
            self.cancel_animation(at);
            let timer = self
                .timers
                .once(self.config.blast_delay_ms, TimerEvent::BlastDelay(at));
            self.grid[at].animation = Some(Animation {
                timer,
                then: Completion::Settle,
            });
            return;
        }

        self.grid[at].state = CellState::Completed;
        self.effects.push(Effect::Draw(at));
        self.effects.push(Effect::Sound(SoundKind::WrongAnswer));
        let out_of_lives = self.session.lose_life();
        log::debug!(
            "{:?} was empty, {} lives left",
            at,
            self.session.lives_remaining()
        );
        self.emit_hud();
        if out_of_lives {
            self.schedule_end(GameState::Lose);
        }
    }

    pub(crate) fn start_blast(&mut self, timer: TimerId, at: Coord2) {
        if !self.owns_timer(at, timer) {
            return;
        }

        let ticker = self
            .timers
            .every(self.config.blast_interval_ms, TimerEvent::Blast(at));
        let cell = &mut self.grid[at];
        cell.state = CellState::Blasting;
        cell.blast_frame = 0;
        cell.animation = Some(Animation {
            timer: ticker,
            then: Completion::Settle,
        });
        self.effects.push(Effect::Draw(at));
    }

    /// Advances a blast; once it has played out the reward counts as found.
    ///
    /// Returns [`GameState::Popup`] when the found reward should be presented.
    pub(crate) fn tick_blast(&mut self, timer: TimerId, at: Coord2) -> Option<GameState> {
        if !self.owns_timer(at, timer) {
            return None;
        }

        let frames = self.config.blast_frames;
        let cell = &mut self.grid[at];
        cell.blast_frame = cell.blast_frame.saturating_add(1);
        self.effects.push(Effect::Draw(at));
        if cell.blast_frame < frames {
            return None;
        }

        cell.animation = None;
        cell.state = CellState::Completed;
        let reward = cell.reward();
        self.timers.cancel(timer);
        self.effects.push(Effect::Sound(SoundKind::Blast));

        let won = self.session.register_found();
        log::debug!(
            "{:?} blasted, {}/{} found",
            at,
            self.session.rewards_found(),
            self.session.target()
        );
        self.emit_hud();

        if won {
            self.schedule_end(GameState::Win);
            return None;
        }
        if self.pending_end.is_some() {
            return None;
        }
        let reward = reward?;
        self.effects.push(Effect::ShowRewardPopup(reward));
        Some(GameState::Popup)
    }

    /// Opens every closed window at once; `then` is entered when the last one is open.
    ///
    /// Returns `then` right away when there is nothing to open.
    pub(crate) fn open_all_windows(&mut self, then: GameState) -> Option<GameState> {
        let members: Vec<_> = self.grid.coords_in_state(CellState::Closed).collect();
        if !members.is_empty() {
            self.effects.push(Effect::Sound(SoundKind::WindowOpen));
        }
        self.start_bulk(members, true, then)
    }

    /// Closes every open window at once; `then` is entered when the last one is closed.
    pub(crate) fn close_all_windows(&mut self, then: GameState) -> Option<GameState> {
        let members: Vec<_> = self.grid.coords_in_state(CellState::Open).collect();
        self.start_bulk(members, false, then)
    }

    pub(crate) fn finish_bulk_member(&mut self, id: BulkId) -> Option<GameState> {
        let bulk = self.bulks.get_mut(&id)?;
        bulk.remaining = bulk.remaining.saturating_sub(1);
        if bulk.remaining > 0 {
            return None;
        }
        let bulk = self.bulks.remove(&id)?;
        log::debug!("bulk {:?} complete", id);
        Some(bulk.then)
    }

    fn start_bulk(&mut self, members: Vec<Coord2>, opening: bool, then: GameState) -> Option<GameState> {
        if members.is_empty() {
            log::debug!("nothing to animate, entering {:?}", then);
            return Some(then);
        }

        let id = BulkId(self.next_bulk);
        self.next_bulk = self.next_bulk.wrapping_add(1);
        self.bulks.insert(
            id,
            Bulk {
                remaining: members.len() as CellCount,
                then,
            },
        );
        for at in members {
            self.animate_window(at, opening, Completion::Bulk(id));
        }
        None
    }

    fn cancel_animation(&mut self, at: Coord2) {
        if let Some(previous) = self.grid[at].animation.take() {
            log::warn!("{:?} superseded {:?}", at, previous);
            self.timers.cancel(previous.timer);
        }
    }

    fn owns_timer(&mut self, at: Coord2, timer: TimerId) -> bool {
        let owned = self.grid[at].animation.map(|a| a.timer) == Some(timer);
        if !owned {
            log::warn!("dropping stale timer {:?} for {:?}", timer, at);
            self.timers.cancel(timer);
        }
        owned
    }
}
