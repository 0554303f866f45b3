//! Component trait and hook context
//!
//! Components are plugins attached to scene entities. The host drives them
//! through lifecycle hooks (attach, update, tick, event, detach); each hook
//! receives a [`ComponentContext`] giving access to the scene, the event
//! queue, and other entities' components.

use std::any::Any;
use std::collections::BTreeMap;

use crate::config::ConfigError;
use crate::ecs::Entity;
use crate::events::{Event, EventSink, EventSystem, EventType};
use crate::scene::{SceneError, SceneTree};

/// Components attached per entity, in attach order
pub(crate) type ComponentStore = BTreeMap<Entity, Vec<Box<dyn Component>>>;

/// Component errors
#[derive(thiserror::Error, Debug)]
pub enum ComponentError {
    /// Scene operation failed
    #[error("Scene error: {0}")]
    Scene(#[from] SceneError),

    /// Component options are invalid
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// A component with the same name is already attached
    #[error("Component `{name}` is already attached to {entity:?}")]
    AlreadyAttached {
        /// Target entity
        entity: Entity,
        /// Component name
        name: String,
    },

    /// No component with that name is attached
    #[error("Component `{name}` is not attached to {entity:?}")]
    NotAttached {
        /// Target entity
        entity: Entity,
        /// Component name
        name: String,
    },
}

/// Scene component driven by host lifecycle hooks
pub trait Component: Any {
    /// Attribute name, e.g. `lounge` or `lounge-wall__north` for multi-instance components
    fn name(&self) -> &str;

    /// Called once when the component is attached
    fn on_attach(&mut self, ctx: &mut ComponentContext<'_>) -> Result<(), ComponentError>;

    /// Called after attach and whenever the component's options change
    fn on_update(&mut self, _ctx: &mut ComponentContext<'_>) -> Result<(), ComponentError> {
        Ok(())
    }

    /// Called every frame with the host clock in milliseconds
    fn on_tick(&mut self, _ctx: &mut ComponentContext<'_>, _now_ms: f64) {}

    /// Called for events emitted on this entity or on an entity it listens to
    fn on_event(&mut self, _ctx: &mut ComponentContext<'_>, _event: &Event) {}

    /// Called when the component is removed; must not fail
    fn on_detach(&mut self, _ctx: &mut ComponentContext<'_>) {}

    /// Downcast support for reading another component's state
    fn as_any(&self) -> &dyn Any;

    /// Downcast support for mutating a component's options
    fn as_any_mut(&mut self) -> &mut dyn Any;
}

/// Check whether an attribute name refers to a component, allowing
/// `base__instance` names for multi-instance components
pub fn component_name_matches(attribute: &str, name: &str) -> bool {
    attribute == name
        || attribute
            .strip_prefix(name)
            .is_some_and(|rest| rest.starts_with("__"))
}

/// Work a hook asks the host to do once the hook returns
pub(crate) enum Command {
    Attach(Entity, Box<dyn Component>),
    Despawn(Entity),
    Listen {
        source: Entity,
        event_type: EventType,
        listener: Entity,
    },
}

/// Everything a hook may touch
pub struct ComponentContext<'a> {
    entity: Entity,
    scene: &'a mut SceneTree,
    events: &'a mut EventSystem,
    components: &'a ComponentStore,
    commands: &'a mut Vec<Command>,
}

impl<'a> ComponentContext<'a> {
    pub(crate) fn new(
        entity: Entity,
        scene: &'a mut SceneTree,
        events: &'a mut EventSystem,
        components: &'a ComponentStore,
        commands: &'a mut Vec<Command>,
    ) -> Self {
        Self {
            entity,
            scene,
            events,
            components,
            commands,
        }
    }

    /// Entity the running component is attached to
    pub fn entity(&self) -> Entity {
        self.entity
    }

    /// Host clock in milliseconds
    pub fn now(&self) -> f64 {
        self.events.current_time()
    }

    /// Read access to the scene
    pub fn scene(&self) -> &SceneTree {
        &*self.scene
    }

    /// Write access to the scene
    pub fn scene_mut(&mut self) -> &mut SceneTree {
        &mut *self.scene
    }

    /// Scene and event queue at once
    pub fn scene_and_events(&mut self) -> (&mut SceneTree, &mut EventSystem) {
        (&mut *self.scene, &mut *self.events)
    }

    /// Queue an event for delivery after the hook returns
    pub fn emit(&mut self, event: Event) {
        self.events.emit(event);
    }

    /// Attach a component to another entity once the hook returns
    pub fn attach(&mut self, entity: Entity, component: Box<dyn Component>) {
        self.commands.push(Command::Attach(entity, component));
    }

    /// Despawn an entity (and detach its components) once the hook returns
    pub fn despawn(&mut self, entity: Entity) {
        self.commands.push(Command::Despawn(entity));
    }

    /// Receive `event_type` events emitted on `source`
    pub fn listen(&mut self, source: Entity, event_type: EventType) {
        self.commands.push(Command::Listen {
            source,
            event_type,
            listener: self.entity,
        });
    }

    /// Read a component of type `T` on another entity.
    ///
    /// Components on the running component's own entity are not visible.
    pub fn component<T: Component>(&self, entity: Entity) -> Option<&T> {
        self.components
            .get(&entity)?
            .iter()
            .find_map(|component| component.as_any().downcast_ref::<T>())
    }
}
