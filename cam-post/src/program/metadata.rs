//! Per-dispatch event metadata
//!
//! Listeners receive an [`EventMetadata`] pointing at the event being
//! dispatched, so they can look around it (what comes next, what happened
//! before) without holding on to program state.

use super::lookup;
use super::Event;

/// View of the loaded events relative to the event being dispatched
#[derive(Debug, Clone, Copy)]
pub struct EventMetadata<'a> {
    events: &'a [Event],
    index: usize,
}

impl<'a> EventMetadata<'a> {
    /// Metadata for the event at `index` of `events`
    pub fn new(events: &'a [Event], index: usize) -> Self {
        Self { events, index }
    }

    /// Metadata with no surrounding events, for manual triggers
    pub fn detached() -> Self {
        Self {
            events: &[],
            index: 0,
        }
    }

    /// Index of the dispatched event in the loaded sequence
    pub fn index(&self) -> usize {
        self.index
    }

    /// The dispatched event itself (None when detached)
    pub fn current(&self) -> Option<&'a Event> {
        self.events.get(self.index)
    }

    pub fn next(&self) -> Option<&'a Event> {
        lookup::next_event(self.events, self.index)
    }

    pub fn previous(&self) -> Option<&'a Event> {
        lookup::previous_event(self.events, self.index)
    }

    pub fn find_last_event(&self, name: &str) -> Option<&'a Event> {
        lookup::find_last_event(self.events, self.index, name)
    }

    pub fn find_nearest_event(&self, name: &str) -> Option<&'a Event> {
        lookup::find_nearest_event(self.events, self.index, name)
    }

    pub fn find_nth_next_event(&self, name: &str, n: usize) -> Option<&'a Event> {
        lookup::find_nth_next_event(self.events, self.index, name, n)
    }

    pub fn find_nth_previous_event(&self, name: &str, n: usize) -> Option<&'a Event> {
        lookup::find_nth_previous_event(self.events, self.index, name, n)
    }
}
