//! Entry point placement
//!
//! Moves its entity (usually the camera rig) to the entry point of a lounge
//! as soon as that lounge is initialised.

use std::any::Any;

use serde::{Deserialize, Serialize};

use crate::config::{Config, ConfigError};
use crate::ecs::{Component, ComponentContext, ComponentError, Entity};
use crate::events::{Event, EventType};
use crate::scene::{SceneError, SceneTree, Selector};
use super::room::Lounge;
use super::{ENTRY_POINT, LOUNGE};

/// Entry point options
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EntryPointConfig {
    /// Element id of the lounge; the first lounge in the scene is used when no node has it
    pub lounge_id: String,
}

impl Default for EntryPointConfig {
    fn default() -> Self {
        Self {
            lounge_id: LOUNGE.to_string(),
        }
    }
}

impl Config for EntryPointConfig {
    fn validate(&self) -> Result<(), ConfigError> {
        if self.lounge_id.chars().any(char::is_whitespace) {
            return Err(ConfigError::InvalidValue {
                field: "lounge_id",
                reason: format!("`{}` is not a valid element id", self.lounge_id),
            });
        }
        Ok(())
    }
}

/// Entry point component
pub struct EntryPoint {
    /// Options
    pub config: EntryPointConfig,
    lounge: Option<Entity>,
}

impl EntryPoint {
    /// Create an entry point component
    pub fn new(config: EntryPointConfig) -> Self {
        Self { config, lounge: None }
    }

    /// Lounge the entity is placed in, once found
    pub fn lounge(&self) -> Option<Entity> {
        self.lounge
    }

    fn find_lounge(&self, scene: &SceneTree) -> Result<Option<Entity>, SceneError> {
        if !self.config.lounge_id.is_empty() {
            if let Some(lounge) = scene.find_by_id(&self.config.lounge_id) {
                return Ok(Some(lounge));
            }
        }
        let first: Selector = "a-entity[lounge]".parse()?;
        Ok(scene.query_first(&first))
    }

    fn place(&self, ctx: &mut ComponentContext<'_>) -> Result<bool, SceneError> {
        let Some(lounge) = self.lounge else {
            return Ok(false);
        };
        let Some(component) = ctx.component::<Lounge>(lounge) else {
            return Ok(false);
        };
        let entity = ctx.entity();
        let point = component.entry_point(ctx.scene(), lounge)?;
        let local = ctx.scene().world_to_parent_local(entity, point)?;
        ctx.scene_mut().set_position(entity, local)?;
        log::debug!("{:?} placed at the entry point of {:?}", entity, lounge);
        Ok(true)
    }
}

impl Component for EntryPoint {
    fn name(&self) -> &str {
        ENTRY_POINT
    }

    fn on_attach(&mut self, ctx: &mut ComponentContext<'_>) -> Result<(), ComponentError> {
        self.config.validate()?;
        let entity = ctx.entity();
        log::info!("Entry point initialised on {:?}", entity);

        let Some(lounge) = self.find_lounge(ctx.scene())? else {
            log::warn!("No lounge `{}` in the scene; {:?} stays put", self.config.lounge_id, entity);
            return Ok(());
        };
        self.lounge = Some(lounge);

        if !self.place(ctx)? {
            ctx.listen(lounge, EventType::ComponentInitialized);
        }
        Ok(())
    }

    fn on_event(&mut self, ctx: &mut ComponentContext<'_>, event: &Event) {
        if event.event_type != EventType::ComponentInitialized
            || event.target.is_none()
            || event.target != self.lounge
            || event.get_name() != Some(LOUNGE)
        {
            return;
        }
        if let Err(err) = self.place(ctx) {
            log::warn!("Could not place {:?} at the entry point: {}", ctx.entity(), err);
        }
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ecs::World;
    use crate::foundation::math::Vec3;
    use crate::lounge::LoungeConfig;
    use crate::scene::SceneNode;
    use approx::assert_relative_eq;

    fn spawn_lounge_node(world: &mut World, id: &str) -> Entity {
        let root = world.scene().root();
        world
            .scene_mut()
            .spawn(root, SceneNode::entity().with_id(id).with_position(Vec3::new(0.0, 2.0, -5.0)))
            .unwrap()
    }

    fn spawn_rig(world: &mut World) -> Entity {
        let root = world.scene().root();
        world.scene_mut().spawn(root, SceneNode::entity().with_id("rig")).unwrap()
    }

    fn position(world: &World, entity: Entity) -> Vec3 {
        world.scene().node(entity).unwrap().transform().position
    }

    #[test]
    fn test_placed_when_lounge_already_initialised() {
        let mut world = World::new();
        let lounge = spawn_lounge_node(&mut world, "lounge");
        world.attach(lounge, Box::new(Lounge::new(LoungeConfig::default()))).unwrap();
        let rig = spawn_rig(&mut world);

        world.attach(rig, Box::new(EntryPoint::new(EntryPointConfig::default()))).unwrap();
        assert_relative_eq!(position(&world, rig), Vec3::new(0.0, 0.0, -3.25));
    }

    #[test]
    fn test_placed_once_lounge_initialises() {
        let mut world = World::new();
        let lounge = spawn_lounge_node(&mut world, "lounge");
        let rig = spawn_rig(&mut world);

        world.attach(rig, Box::new(EntryPoint::new(EntryPointConfig::default()))).unwrap();
        assert_eq!(position(&world, rig), Vec3::zeros());

        world.attach(lounge, Box::new(Lounge::new(LoungeConfig::default()))).unwrap();
        assert_relative_eq!(position(&world, rig), Vec3::new(0.0, 0.0, -3.25));
    }

    #[test]
    fn test_falls_back_to_first_lounge() {
        let mut world = World::new();
        let lounge = spawn_lounge_node(&mut world, "hall");
        world.attach(lounge, Box::new(Lounge::new(LoungeConfig::default()))).unwrap();
        let rig = spawn_rig(&mut world);

        world.attach(rig, Box::new(EntryPoint::new(EntryPointConfig::default()))).unwrap();
        assert_eq!(world.component::<EntryPoint>(rig).unwrap().lounge(), Some(lounge));
        assert_relative_eq!(position(&world, rig), Vec3::new(0.0, 0.0, -3.25));
    }

    #[test]
    fn test_position_is_in_parent_frame() {
        let mut world = World::new();
        let lounge = spawn_lounge_node(&mut world, "lounge");
        world.attach(lounge, Box::new(Lounge::new(LoungeConfig::default()))).unwrap();
        let root = world.scene().root();
        let carrier = world
            .scene_mut()
            .spawn(root, SceneNode::entity().with_position(Vec3::new(1.0, 0.0, 0.0)))
            .unwrap();
        let rig = world.scene_mut().spawn(carrier, SceneNode::entity()).unwrap();

        world.attach(rig, Box::new(EntryPoint::new(EntryPointConfig::default()))).unwrap();
        assert_relative_eq!(position(&world, rig), Vec3::new(-1.0, 0.0, -3.25));
        assert_relative_eq!(world.scene().world_position(rig).unwrap(), Vec3::new(0.0, 0.0, -3.25));
    }

    #[test]
    fn test_no_lounge_leaves_entity_in_place() {
        let mut world = World::new();
        let rig = spawn_rig(&mut world);
        let config = EntryPointConfig { lounge_id: "nowhere".to_string() };

        world.attach(rig, Box::new(EntryPoint::new(config))).unwrap();
        assert_eq!(world.component::<EntryPoint>(rig).unwrap().lounge(), None);
        assert_eq!(position(&world, rig), Vec3::zeros());
    }
}
