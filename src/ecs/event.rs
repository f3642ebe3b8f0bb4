//! Deferred, typed event bus.
//!
//! Events are queued while systems run and dispatched once per frame after the
//! last system, in queue order. Handlers for one event type run in the order they
//! were registered. What happens to events queued *by handlers* during dispatch is
//! decided by [`CascadePolicy`].

use std::any::{Any, TypeId};
use std::collections::HashMap;
use std::fmt;
use std::hash::{Hash, Hasher};

use serde::{Deserialize, Serialize};

use super::{Entity, World};

/// A notification produced during a frame.
pub trait Event: Any + fmt::Debug {
    /// Entity the event originates from, if any.
    fn entity(&self) -> Option<Entity> {
        None
    }
}

trait AnyEvent: fmt::Debug {
    fn as_any(&self) -> &dyn Any;
}

impl<E: Event> AnyEvent for E {
    fn as_any(&self) -> &dyn Any {
        self
    }
}

#[derive(Clone, Copy)]
pub struct EventType {
    id: TypeId,
    name: &'static str,
}

impl EventType {
    pub fn of<E: Event>() -> Self {
        Self {
            id: TypeId::of::<E>(),
            name: std::any::type_name::<E>(),
        }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }
}

impl PartialEq for EventType {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for EventType {}

impl Hash for EventType {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

impl fmt::Debug for EventType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name)
    }
}

/// A queued event: its type tag, originating entity and payload.
#[derive(Debug)]
pub struct EventRecord {
    event_type: EventType,
    entity: Option<Entity>,
    payload: Box<dyn AnyEvent>,
}

impl EventRecord {
    pub fn new<E: Event>(event: E) -> Self {
        Self {
            event_type: EventType::of::<E>(),
            entity: event.entity(),
            payload: Box::new(event),
        }
    }

    pub fn event_type(&self) -> EventType {
        self.event_type
    }

    pub fn entity(&self) -> Option<Entity> {
        self.entity
    }

    pub fn payload<E: Event>(&self) -> Option<&E> {
        self.payload.as_any().downcast_ref::<E>()
    }
}

/// Fate of events queued by handlers while the frame's events are dispatched.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum CascadePolicy {
    /// Dispatch them in further passes of the same frame, up to the pass limit.
    #[default]
    SamePass,
    /// Leave them queued; they are dispatched at the end of the next frame.
    NextFrame,
    /// Discard them, logging how many were lost.
    Drop,
}

pub(crate) type Handler = Box<dyn FnMut(&mut World, &EventRecord)>;

/// Outcome of one end-of-frame dispatch.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct EventPassReport {
    /// Events handed to handlers (including events with no handler).
    pub dispatched: usize,
    /// Snapshots taken from the queue.
    pub passes: usize,
    /// Events left queued for the next frame.
    pub deferred: usize,
    /// Events discarded.
    pub dropped: usize,
}

pub struct EventBus {
    pub(crate) queue: Vec<EventRecord>,
    pub(crate) handlers: HashMap<EventType, Vec<Handler>>,
    policy: CascadePolicy,
    max_passes: usize,
}

impl EventBus {
    pub const DEFAULT_MAX_PASSES: usize = 16;

    pub fn new(policy: CascadePolicy, max_passes: usize) -> Self {
        Self {
            queue: Vec::new(),
            handlers: HashMap::new(),
            policy,
            max_passes: max_passes.max(1),
        }
    }

    pub fn policy(&self) -> CascadePolicy {
        self.policy
    }

    pub fn max_passes(&self) -> usize {
        self.max_passes
    }

    pub fn queue<E: Event>(&mut self, event: E) {
        self.queue.push(EventRecord::new(event));
    }

    pub fn subscribe<E, F>(&mut self, mut handler: F)
    where
        E: Event,
        F: FnMut(&mut World, &E) + 'static,
    {
        let wrapped: Handler = Box::new(move |world: &mut World, record: &EventRecord| {
            if let Some(event) = record.payload::<E>() {
                handler(world, event);
            }
        });
        self.handlers
            .entry(EventType::of::<E>())
            .or_default()
            .push(wrapped);
    }

    pub fn pending(&self) -> usize {
        self.queue.len()
    }

    pub fn pending_types(&self) -> impl Iterator<Item = EventType> + '_ {
        self.queue.iter().map(EventRecord::event_type)
    }

    pub fn handler_count(&self, event_type: EventType) -> usize {
        self.handlers.get(&event_type).map_or(0, Vec::len)
    }

    /// Put back the handler table taken out for dispatch, keeping any handlers
    /// registered while it was out.
    pub(crate) fn restore_handlers(&mut self, handlers: HashMap<EventType, Vec<Handler>>) {
        let added = std::mem::replace(&mut self.handlers, handlers);
        for (event_type, mut list) in added {
            self.handlers.entry(event_type).or_default().append(&mut list);
        }
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new(CascadePolicy::default(), Self::DEFAULT_MAX_PASSES)
    }
}
