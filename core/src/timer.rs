use alloc::collections::BTreeMap;
use serde::{Deserialize, Serialize};

use crate::*;

/// Handle of a scheduled timer, unique for the lifetime of a queue.
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct TimerId(u32);

#[derive(Clone, Debug, PartialEq)]
struct Entry<E> {
    due: Millis,
    period: Option<Millis>,
    event: E,
}

/// One-shot and repeating timers on a virtual millisecond clock.
///
/// Nothing fires on its own: the owner advances the clock with [`Timers::pop_due`] and
/// handles each returned event before asking for the next one, so handlers may schedule or
/// cancel timers freely. Timers due at the same instant fire in creation order.
#[derive(Clone, Debug, PartialEq)]
pub struct Timers<E> {
    now: Millis,
    next_id: u32,
    entries: BTreeMap<TimerId, Entry<E>>,
}

impl<E: Clone> Timers<E> {
    pub fn new() -> Self {
        Self {
            now: 0,
            next_id: 0,
            entries: BTreeMap::new(),
        }
    }

    pub fn now(&self) -> Millis {
        self.now
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn is_pending(&self, id: TimerId) -> bool {
        self.entries.contains_key(&id)
    }

    /// Fires `event` once, `delay` ms from now.
    pub fn once(&mut self, delay: Millis, event: E) -> TimerId {
        self.insert(delay, None, event)
    }

    /// Fires `event` every `period` ms until cancelled. A zero period is treated as 1 ms.
    pub fn every(&mut self, period: Millis, event: E) -> TimerId {
        let period = period.max(1);
        self.insert(period, Some(period), event)
    }

    pub fn cancel(&mut self, id: TimerId) -> bool {
        self.entries.remove(&id).is_some()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// Pops the earliest timer due at or before `until`, moving the clock to its deadline.
    ///
    /// Repeating timers are rearmed one period later. When nothing else is due the clock is
    /// left at `until`.
    pub fn pop_due(&mut self, until: Millis) -> Option<(TimerId, E)> {
        let next = self
            .entries
            .iter()
            .filter(|(_, entry)| entry.due <= until)
            .min_by_key(|(id, entry)| (entry.due, **id))
            .map(|(&id, _)| id);

        let Some(id) = next else {
            self.now = self.now.max(until);
            return None;
        };

        let entry = self.entries.get_mut(&id)?;
        self.now = self.now.max(entry.due);
        let event = entry.event.clone();
        match entry.period {
            Some(period) => entry.due += period,
            None => {
                self.entries.remove(&id);
            }
        }
        Some((id, event))
    }

    fn insert(&mut self, delay: Millis, period: Option<Millis>, event: E) -> TimerId {
        let id = TimerId(self.next_id);
        self.next_id = self.next_id.wrapping_add(1);
        self.entries.insert(
            id,
            Entry {
                due: self.now + delay,
                period,
                event,
            },
        );
        id
    }
}

impl<E: Clone> Default for Timers<E> {
    fn default() -> Self {
        Self::new()
    }
}
