//! Listener registry
//!
//! Maps event names to the listeners registered for them, in registration
//! order.

use super::{Dispatch, EventMetadata};
use crate::types::Parameters;
use std::collections::HashMap;

/// A registered event handler
///
/// Errors are returned to whoever triggered the event, untouched.
pub type Listener =
    dyn Fn(&mut Dispatch<'_>, &Parameters, &EventMetadata<'_>) -> anyhow::Result<()>;

/// Handle returned by [`ListenerRegistry::on`], used to unregister
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListenerId(u64);

/// Event name → ordered listeners
#[derive(Default)]
pub struct ListenerRegistry {
    listeners: HashMap<String, Vec<(ListenerId, Box<Listener>)>>,
    next_id: u64,
}

impl ListenerRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `listener` for `name`, after any listener already registered
    pub fn on<F>(&mut self, name: &str, listener: F) -> ListenerId
    where
        F: Fn(&mut Dispatch<'_>, &Parameters, &EventMetadata<'_>) -> anyhow::Result<()> + 'static,
    {
        let id = ListenerId(self.next_id);
        self.next_id += 1;

        self.listeners
            .entry(name.to_string())
            .or_default()
            .push((id, Box::new(listener)));

        log::debug!("Registered listener {:?} for {}", id, name);
        id
    }

    /// Unregister a listener; unknown names or ids are ignored
    pub fn off(&mut self, name: &str, id: ListenerId) {
        let Some(list) = self.listeners.get_mut(name) else {
            log::trace!("No listeners registered for {}", name);
            return;
        };

        list.retain(|(registered, _)| *registered != id);
        if list.is_empty() {
            self.listeners.remove(name);
        }
    }

    /// Listeners for `name` in execution order
    pub fn listeners(&self, name: &str) -> impl Iterator<Item = &Listener> {
        self.listeners
            .get(name)
            .into_iter()
            .flat_map(|list| list.iter().map(|(_, listener)| &**listener))
    }

    /// Number of listeners registered for `name`
    pub fn count(&self, name: &str) -> usize {
        self.listeners.get(name).map_or(0, Vec::len)
    }

    /// Event names with at least one listener, sorted
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.listeners.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }
}

impl std::fmt::Debug for ListenerRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let counts: HashMap<&str, usize> = self
            .listeners
            .iter()
            .map(|(name, list)| (name.as_str(), list.len()))
            .collect();
        f.debug_struct("ListenerRegistry")
            .field("listeners", &counts)
            .finish()
    }
}
