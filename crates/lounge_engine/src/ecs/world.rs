//! ECS World implementation
//!
//! The host runtime: owns the scene tree, the event queue, and the component
//! instances attached to each entity, and drives their lifecycle hooks.

use std::collections::{HashMap, VecDeque};

use crate::events::{Event, EventSystem, EventType};
use crate::scene::{SceneError, SceneTree};
use super::component::{Command, Component, ComponentContext, ComponentError, ComponentStore};
use super::Entity;

/// Upper bound on event routing rounds per dispatch, guarding against
/// components that keep re-emitting in response to their own events
const MAX_DISPATCH_ROUNDS: usize = 64;

/// ECS World containing the scene, events, and attached components
pub struct World {
    scene: SceneTree,
    events: EventSystem,
    components: ComponentStore,
    listeners: HashMap<(Entity, EventType), Vec<Entity>>,
    commands: Vec<Command>,
}

impl World {
    /// Create a new world with an empty scene
    pub fn new() -> Self {
        Self {
            scene: SceneTree::new(),
            events: EventSystem::new(),
            components: ComponentStore::new(),
            listeners: HashMap::new(),
            commands: Vec::new(),
        }
    }

    /// The scene tree
    pub fn scene(&self) -> &SceneTree {
        &self.scene
    }

    /// Mutable scene tree
    pub fn scene_mut(&mut self) -> &mut SceneTree {
        &mut self.scene
    }

    /// The event system, e.g. to register global handlers
    pub fn events_mut(&mut self) -> &mut EventSystem {
        &mut self.events
    }

    /// Host clock of the last tick in milliseconds
    pub fn now(&self) -> f64 {
        self.events.current_time()
    }

    /// Attach a component, run its attach/update hooks, then load anything it
    /// attached in turn. Emits `ComponentInitialized` for every component and
    /// `Loaded` for `entity` once everything is in place.
    pub fn attach(&mut self, entity: Entity, component: Box<dyn Component>) -> Result<(), ComponentError> {
        self.attach_one(entity, component)?;
        self.apply_commands()?;
        let now = self.now();
        self.events.send(Event::loaded(entity, now));
        self.dispatch_events()
    }

    fn attach_one(&mut self, entity: Entity, mut component: Box<dyn Component>) -> Result<(), ComponentError> {
        if !self.scene.contains(entity) {
            return Err(SceneError::UnknownEntity(entity).into());
        }
        let name = component.name().to_string();
        let mut list = self.components.remove(&entity).unwrap_or_default();
        if list.iter().any(|c| c.name() == name) {
            self.components.insert(entity, list);
            return Err(ComponentError::AlreadyAttached { entity, name });
        }

        let result = {
            let mut ctx = ComponentContext::new(
                entity,
                &mut self.scene,
                &mut self.events,
                &self.components,
                &mut self.commands,
            );
            component
                .on_attach(&mut ctx)
                .and_then(|()| component.on_update(&mut ctx))
        };

        if let Err(err) = result {
            log::warn!("Component `{}` failed to attach to {:?}: {}", name, entity, err);
            let mut ctx = ComponentContext::new(
                entity,
                &mut self.scene,
                &mut self.events,
                &self.components,
                &mut self.commands,
            );
            component.on_detach(&mut ctx);
            if !list.is_empty() {
                self.components.insert(entity, list);
            }
            return Err(err);
        }

        list.push(component);
        self.components.insert(entity, list);
        self.scene.add_component_name(entity, &name)?;

        let now = self.now();
        self.events.send(Event::component_initialized(entity, &name, now));
        log::debug!("Attached `{}` to entity {}", name, entity.id());
        Ok(())
    }

    /// Detach a component by name, running its detach hook
    pub fn detach(&mut self, entity: Entity, name: &str) -> Result<(), ComponentError> {
        let mut list = self.components.remove(&entity).unwrap_or_default();
        let Some(index) = list.iter().position(|c| c.name() == name) else {
            if !list.is_empty() {
                self.components.insert(entity, list);
            }
            return Err(ComponentError::NotAttached {
                entity,
                name: name.to_string(),
            });
        };
        let mut component = list.remove(index);

        {
            let mut ctx = ComponentContext::new(
                entity,
                &mut self.scene,
                &mut self.events,
                &self.components,
                &mut self.commands,
            );
            component.on_detach(&mut ctx);
        }

        if list.is_empty() {
            self.listeners.values_mut().for_each(|l| l.retain(|&e| e != entity));
        } else {
            self.components.insert(entity, list);
        }
        if self.scene.contains(entity) {
            self.scene.remove_component_name(entity, name)?;
        }
        log::debug!("Detached `{}` from entity {}", name, entity.id());

        self.apply_commands()?;
        self.dispatch_events()
    }

    /// Update a component's options in place, then run its update hook
    pub fn update_component<T, F>(&mut self, entity: Entity, name: &str, change: F) -> Result<(), ComponentError>
    where
        T: Component,
        F: FnOnce(&mut T),
    {
        let not_attached = || ComponentError::NotAttached {
            entity,
            name: name.to_string(),
        };
        let mut list = self.components.remove(&entity).ok_or_else(not_attached)?;
        let result = match list
            .iter_mut()
            .find(|c| c.name() == name)
            .and_then(|c| c.as_any_mut().downcast_mut::<T>())
        {
            Some(component) => {
                change(component);
                let mut ctx = ComponentContext::new(
                    entity,
                    &mut self.scene,
                    &mut self.events,
                    &self.components,
                    &mut self.commands,
                );
                component.on_update(&mut ctx)
            }
            None => Err(not_attached()),
        };
        self.components.insert(entity, list);
        result?;

        self.apply_commands()?;
        self.dispatch_events()
    }

    /// Despawn an entity and its subtree, detaching every component on the way
    pub fn despawn(&mut self, entity: Entity) -> Result<(), ComponentError> {
        self.despawn_inner(entity)?;
        self.apply_commands()?;
        self.dispatch_events()
    }

    fn despawn_inner(&mut self, entity: Entity) -> Result<(), ComponentError> {
        let mut doomed = vec![entity];
        doomed.extend(self.scene.descendants(entity)?);

        for &node in doomed.iter().rev() {
            let names: Vec<String> = self
                .components
                .get(&node)
                .map(|list| list.iter().map(|c| c.name().to_string()).collect())
                .unwrap_or_default();
            for name in names {
                let mut list = self.components.remove(&node).unwrap_or_default();
                if let Some(index) = list.iter().position(|c| c.name() == name) {
                    let mut component = list.remove(index);
                    let mut ctx = ComponentContext::new(
                        node,
                        &mut self.scene,
                        &mut self.events,
                        &self.components,
                        &mut self.commands,
                    );
                    component.on_detach(&mut ctx);
                }
                if !list.is_empty() {
                    self.components.insert(node, list);
                }
            }
            self.listeners.values_mut().for_each(|l| l.retain(|&e| e != node));
            self.listeners.retain(|(source, _), _| *source != node);
        }

        if self.scene.contains(entity) {
            self.scene.despawn(entity)?;
        }
        Ok(())
    }

    /// Advance the host clock and run every component's tick hook
    pub fn tick(&mut self, now_ms: f64) -> Result<(), ComponentError> {
        self.events.update_time(now_ms);
        let entities: Vec<Entity> = self.components.keys().copied().collect();
        for entity in entities {
            self.run_hooks(entity, |component, ctx| component.on_tick(ctx, now_ms));
        }
        self.apply_commands()?;
        self.dispatch_events()
    }

    /// Route queued events to target entities and their listeners.
    ///
    /// Global handlers registered on the event system see each event first
    /// and may consume it.
    pub fn dispatch_events(&mut self) -> Result<(), ComponentError> {
        for _ in 0..MAX_DISPATCH_ROUNDS {
            let ready = self.events.drain_ready();
            if ready.is_empty() {
                return Ok(());
            }
            for event in ready {
                if self.events.dispatch_event(&event) {
                    continue;
                }
                let Some(target) = event.target else {
                    continue;
                };
                log::trace!("Routing `{}` on {:?}", event.event_type.name(), target);

                self.run_hooks(target, |component, ctx| component.on_event(ctx, &event));
                let listeners = self
                    .listeners
                    .get(&(target, event.event_type))
                    .cloned()
                    .unwrap_or_default();
                for listener in listeners.into_iter().filter(|&l| l != target) {
                    self.run_hooks(listener, |component, ctx| component.on_event(ctx, &event));
                }
                self.apply_commands()?;
            }
        }
        log::warn!(
            "Event dispatch stopped after {} rounds with {} events pending",
            MAX_DISPATCH_ROUNDS,
            self.events.pending_count()
        );
        Ok(())
    }

    fn run_hooks(&mut self, entity: Entity, mut hook: impl FnMut(&mut dyn Component, &mut ComponentContext<'_>)) {
        let Some(mut list) = self.components.remove(&entity) else {
            return;
        };
        {
            let mut ctx = ComponentContext::new(
                entity,
                &mut self.scene,
                &mut self.events,
                &self.components,
                &mut self.commands,
            );
            for component in &mut list {
                hook(component.as_mut(), &mut ctx);
            }
        }
        self.components.insert(entity, list);
    }

    fn apply_commands(&mut self) -> Result<(), ComponentError> {
        let mut queue: VecDeque<Command> = std::mem::take(&mut self.commands).into();
        while let Some(command) = queue.pop_front() {
            match command {
                Command::Attach(entity, component) => self.attach_one(entity, component)?,
                Command::Despawn(entity) => {
                    if self.scene.contains(entity) {
                        self.despawn_inner(entity)?;
                    } else {
                        log::trace!("Skipping despawn of missing {:?}", entity);
                    }
                }
                Command::Listen { source, event_type, listener } => {
                    let listeners = self.listeners.entry((source, event_type)).or_default();
                    if !listeners.contains(&listener) {
                        listeners.push(listener);
                    }
                }
            }
            queue.extend(self.commands.drain(..));
        }
        Ok(())
    }

    /// Read a component of type `T` attached to `entity`
    pub fn component<T: Component>(&self, entity: Entity) -> Option<&T> {
        self.components
            .get(&entity)?
            .iter()
            .find_map(|component| component.as_any().downcast_ref::<T>())
    }

    /// Names of components attached to `entity`, in attach order
    pub fn component_names(&self, entity: Entity) -> Vec<&str> {
        self.components
            .get(&entity)
            .map(|list| list.iter().map(|c| c.name()).collect())
            .unwrap_or_default()
    }

    /// Number of entities with at least one component
    pub fn entity_count(&self) -> usize {
        self.components.len()
    }
}

impl Default for World {
    fn default() -> Self {
        Self::new()
    }
}
