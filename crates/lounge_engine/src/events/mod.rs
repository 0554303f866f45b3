//! Event system following Game Engine Architecture Ch 16.8
//! Key principles:
//! - Key-value arguments (no order dependency)
//! - Handler returns bool (true = consumed, stops forwarding)
//! - Registration system (only notify interested handlers)
//! - Queuing support (immediate + deferred delivery)
//!
//! Events are targeted at an entity; the host routes them to the components
//! on that entity and to components listening on it.

use std::collections::HashMap;

use crate::ecs::Entity;
use crate::foundation::math::Vec3;

/// Event type identification
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventType {
    /// An object started overlapping a collider ("enter")
    HitStart,
    /// An object stopped overlapping a collider ("exit")
    HitEnd,
    /// Floor level found for an entity that should rest on it
    StayDown,
    /// A component finished attaching to its entity
    ComponentInitialized,
    /// An entity and everything attached under it finished attaching
    Loaded,
}

impl EventType {
    /// Declarative event name
    pub fn name(self) -> &'static str {
        match self {
            Self::HitStart => "hitstart",
            Self::HitEnd => "hitend",
            Self::StayDown => "staydown",
            Self::ComponentInitialized => "componentinitialized",
            Self::Loaded => "loaded",
        }
    }
}

/// Variant for type-safe event arguments
/// Uses key-value pairs to avoid order dependency problems
#[derive(Debug, Clone, PartialEq)]
pub enum EventArg {
    /// Another entity involved in the event
    Entity(Entity),
    /// World-space position
    Position(Vec3),
    /// Component or attribute name
    Name(String),
}

/// Argument key for the entity that caused the event
pub const ARG_SOURCE: &str = "source";
/// Argument key for a world-space position
pub const ARG_WORLD_POSITION: &str = "world_position";
/// Argument key for a component name
pub const ARG_NAME: &str = "name";

/// Event with type ID, target, and key-value arguments
#[derive(Debug, Clone)]
pub struct Event {
    /// Type of event
    pub event_type: EventType,
    /// Timestamp when event was created (host milliseconds)
    pub timestamp: f64,
    /// Entity the event is emitted on
    pub target: Option<Entity>,
    args: HashMap<&'static str, EventArg>,
}

impl Event {
    /// Create a new event with the given type and timestamp
    pub fn new(event_type: EventType, timestamp: f64) -> Self {
        Self {
            event_type,
            timestamp,
            target: None,
            args: HashMap::new(),
        }
    }

    /// Overlap began between `source`'s collider and `target`
    pub fn hit_start(target: Entity, source: Entity, timestamp: f64) -> Self {
        Self::new(EventType::HitStart, timestamp)
            .with_target(target)
            .with_arg(ARG_SOURCE, EventArg::Entity(source))
    }

    /// Overlap ended between `source`'s collider and `target`
    pub fn hit_end(target: Entity, source: Entity, timestamp: f64) -> Self {
        Self::new(EventType::HitEnd, timestamp)
            .with_target(target)
            .with_arg(ARG_SOURCE, EventArg::Entity(source))
    }

    /// Floor level for `target`, in world space
    pub fn stay_down(target: Entity, world_position: Vec3, timestamp: f64) -> Self {
        Self::new(EventType::StayDown, timestamp)
            .with_target(target)
            .with_arg(ARG_WORLD_POSITION, EventArg::Position(world_position))
    }

    /// Component `name` finished attaching to `target`
    pub fn component_initialized(target: Entity, name: &str, timestamp: f64) -> Self {
        Self::new(EventType::ComponentInitialized, timestamp)
            .with_target(target)
            .with_arg(ARG_NAME, EventArg::Name(name.to_string()))
    }

    /// `target` finished loading
    pub fn loaded(target: Entity, timestamp: f64) -> Self {
        Self::new(EventType::Loaded, timestamp).with_target(target)
    }

    /// Set the target entity (builder pattern)
    pub fn with_target(mut self, target: Entity) -> Self {
        self.target = Some(target);
        self
    }

    /// Add an argument to the event (builder pattern)
    pub fn with_arg(mut self, key: &'static str, value: EventArg) -> Self {
        self.args.insert(key, value);
        self
    }

    /// Get an argument by key
    pub fn get_arg(&self, key: &str) -> Option<&EventArg> {
        self.args.get(key)
    }

    /// Get source entity argument if present
    pub fn get_source(&self) -> Option<Entity> {
        if let Some(EventArg::Entity(entity)) = self.get_arg(ARG_SOURCE) {
            Some(*entity)
        } else {
            None
        }
    }

    /// Get world position argument if present
    pub fn get_world_position(&self) -> Option<Vec3> {
        if let Some(EventArg::Position(position)) = self.get_arg(ARG_WORLD_POSITION) {
            Some(*position)
        } else {
            None
        }
    }

    /// Get name argument if present
    pub fn get_name(&self) -> Option<&str> {
        if let Some(EventArg::Name(name)) = self.get_arg(ARG_NAME) {
            Some(name)
        } else {
            None
        }
    }
}

/// Fire-and-forget destination for emitted events
pub trait EventSink {
    /// Hand an event over for delivery
    fn emit(&mut self, event: Event);
}

impl EventSink for Vec<Event> {
    fn emit(&mut self, event: Event) {
        self.push(event);
    }
}

/// Event handler trait
/// Returns true if event was consumed (stops forwarding)
/// Returns false to allow forwarding to other handlers
pub trait EventHandler {
    /// Handle an event, return true if consumed
    fn on_event(&mut self, event: &Event) -> bool;
}

/// Event system with registration and queuing
/// Follows chain of responsibility pattern
pub struct EventSystem {
    immediate_queue: Vec<Event>,
    deferred_queue: Vec<(f64, Event)>,
    handlers: HashMap<EventType, Vec<Box<dyn EventHandler>>>,
    current_time: f64,
}

impl EventSystem {
    /// Create a new empty event system
    pub fn new() -> Self {
        Self {
            immediate_queue: Vec::new(),
            deferred_queue: Vec::new(),
            handlers: HashMap::new(),
            current_time: 0.0,
        }
    }

    /// Update current time (host milliseconds)
    pub fn update_time(&mut self, time: f64) {
        self.current_time = time;
    }

    /// Current time as last set by the host
    pub fn current_time(&self) -> f64 {
        self.current_time
    }

    /// Register a handler for a specific event type
    /// Only handlers registered for this type will be notified
    pub fn register_handler(&mut self, event_type: EventType, handler: Box<dyn EventHandler>) {
        self.handlers
            .entry(event_type)
            .or_default()
            .push(handler);
    }

    /// Send event for immediate handling this frame
    pub fn send(&mut self, event: Event) {
        self.immediate_queue.push(event);
    }

    /// Post event for deferred delivery at specified time
    pub fn post(&mut self, delivery_time: f64, event: Event) {
        self.deferred_queue.push((delivery_time, event));
    }

    /// Number of queued events, deferred ones included
    pub fn pending_count(&self) -> usize {
        self.immediate_queue.len() + self.deferred_queue.len()
    }

    /// Remove and return every event ready for delivery.
    /// Immediate events come first in send order, then due deferred events.
    pub fn drain_ready(&mut self) -> Vec<Event> {
        let mut ready = std::mem::take(&mut self.immediate_queue);

        let mut i = 0;
        while i < self.deferred_queue.len() {
            if self.deferred_queue[i].0 <= self.current_time {
                let (_, event) = self.deferred_queue.remove(i);
                ready.push(event);
            } else {
                i += 1;
            }
        }
        ready
    }

    /// Dispatch all pending events to registered handlers
    pub fn dispatch(&mut self) {
        for event in self.drain_ready() {
            self.dispatch_event(&event);
        }
    }

    /// Dispatch single event to registered handlers
    /// Stops on first handler that returns true (consumed)
    pub fn dispatch_event(&mut self, event: &Event) -> bool {
        if let Some(handlers) = self.handlers.get_mut(&event.event_type) {
            for handler in handlers.iter_mut() {
                if handler.on_event(event) {
                    // Event consumed, stop forwarding
                    return true;
                }
            }
        }
        false
    }

    /// Clear all queued events (useful for state transitions)
    pub fn clear(&mut self) {
        self.immediate_queue.clear();
        self.deferred_queue.clear();
    }
}

impl Default for EventSystem {
    fn default() -> Self {
        Self::new()
    }
}

impl EventSink for EventSystem {
    fn emit(&mut self, event: Event) {
        self.send(event);
    }
}
