//! Event dispatch engine
//!
//! A [`Program`] holds the loaded trace events, the registered listeners and
//! the [`Builder`] they write into. [`Program::process`] walks the events in
//! order and hands each one to its listeners, together with an
//! [`EventMetadata`] for looking at neighbouring events.
//!
//! Dispatch is synchronous. Listeners may trigger further events through the
//! [`Dispatch`] they receive; nested triggers share the same builder. The
//! first listener error stops the pass and is returned as-is.

pub mod lookup;
pub mod metadata;
pub mod registry;

pub use metadata::EventMetadata;
pub use registry::{Listener, ListenerId, ListenerRegistry};

use crate::builder::{Builder, GeneratedFile};
use crate::config::BuilderConfig;
use crate::parser::TraceParser;
use crate::types::{EventRecord, Parameters};
use std::ops::{Deref, DerefMut};

/// A loaded event, addressed by its position in the program
#[derive(Debug, Clone, PartialEq)]
pub struct Event {
    pub name: String,
    pub parameters: Parameters,
}

impl From<EventRecord> for Event {
    fn from(record: EventRecord) -> Self {
        Self {
            name: record.name,
            parameters: record.parameters,
        }
    }
}

/// What a listener gets to work with while an event is dispatched
///
/// Dereferences to the [`Builder`], so listeners call verbs on it directly.
pub struct Dispatch<'a> {
    builder: &'a mut Builder,
    registry: &'a ListenerRegistry,
}

impl<'a> Dispatch<'a> {
    pub fn builder(&mut self) -> &mut Builder {
        &mut *self.builder
    }

    /// Run every listener registered for `name`, in registration order
    pub fn trigger(
        &mut self,
        name: &str,
        params: &Parameters,
        meta: &EventMetadata<'_>,
    ) -> anyhow::Result<()> {
        let registry = self.registry;
        for listener in registry.listeners(name) {
            listener(&mut *self, params, meta)?;
        }
        Ok(())
    }
}

impl Deref for Dispatch<'_> {
    type Target = Builder;

    fn deref(&self) -> &Builder {
        &*self.builder
    }
}

impl DerefMut for Dispatch<'_> {
    fn deref_mut(&mut self) -> &mut Builder {
        &mut *self.builder
    }
}

/// Loaded events, registered listeners and the builder they drive
#[derive(Debug)]
pub struct Program {
    events: Vec<Event>,
    registry: ListenerRegistry,
    builder: Builder,
}

impl Program {
    /// Create an empty program writing through a builder with `config`
    pub fn new(config: BuilderConfig) -> Self {
        Self {
            events: Vec::new(),
            registry: ListenerRegistry::new(),
            builder: Builder::new(config),
        }
    }

    /// Append parsed records to the event list
    pub fn load_events<I>(&mut self, records: I)
    where
        I: IntoIterator<Item = EventRecord>,
    {
        let before = self.events.len();
        self.events.extend(records.into_iter().map(Event::from));
        log::info!("Loaded {} events", self.events.len() - before);
    }

    /// Parse trace text and load the resulting events
    pub fn load_trace(&mut self, text: &str) {
        self.load_events(TraceParser::parse(text));
    }

    /// Register a listener for `name`
    pub fn on<F>(&mut self, name: &str, listener: F) -> ListenerId
    where
        F: Fn(&mut Dispatch<'_>, &Parameters, &EventMetadata<'_>) -> anyhow::Result<()> + 'static,
    {
        self.registry.on(name, listener)
    }

    /// Unregister a listener; unknown names or ids are ignored
    pub fn off(&mut self, name: &str, id: ListenerId) {
        self.registry.off(name, id);
    }

    /// Fire `name` outside of [`Program::process`]
    pub fn trigger(
        &mut self,
        name: &str,
        params: &Parameters,
        meta: &EventMetadata<'_>,
    ) -> anyhow::Result<()> {
        let mut dispatch = Dispatch {
            builder: &mut self.builder,
            registry: &self.registry,
        };
        dispatch.trigger(name, params, meta)
    }

    /// Dispatch every loaded event in order
    pub fn process(&mut self) -> anyhow::Result<()> {
        log::info!("Processing {} events", self.events.len());

        let mut dispatch = Dispatch {
            builder: &mut self.builder,
            registry: &self.registry,
        };

        for (index, event) in self.events.iter().enumerate() {
            let listeners = self.registry.count(&event.name);
            if listeners == 0 {
                log::trace!("#{} {}: no listeners", index, event.name);
                continue;
            }

            log::debug!("#{} {} -> {} listener(s)", index, event.name, listeners);
            let meta = EventMetadata::new(&self.events, index);
            dispatch.trigger(&event.name, &event.parameters, &meta)?;
        }

        Ok(())
    }

    /// Flush pending lines and return the text of every file
    pub fn generate(&mut self) -> Vec<GeneratedFile> {
        self.builder.flush_all();
        self.builder.build()
    }

    /// Names of the loaded events, in load order
    pub fn list_events(&self) -> Vec<&str> {
        self.events.iter().map(|e| e.name.as_str()).collect()
    }

    pub fn events(&self) -> &[Event] {
        &self.events
    }

    pub fn registry(&self) -> &ListenerRegistry {
        &self.registry
    }

    pub fn builder(&self) -> &Builder {
        &self.builder
    }

    pub fn builder_mut(&mut self) -> &mut Builder {
        &mut self.builder
    }
}

impl Default for Program {
    fn default() -> Self {
        Self::new(BuilderConfig::default())
    }
}
