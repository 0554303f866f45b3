//! Plinth: a box that settles on the lounge floor when told where it is

use std::any::Any;

use serde::{Deserialize, Serialize};

use crate::config::{ensure_non_negative, Config, ConfigError};
use crate::ecs::{Component, ComponentContext, ComponentError, Entity};
use crate::events::{Event, EventType};
use crate::foundation::math::Vec3;
use crate::scene::{Geometry, Material, SceneError, SceneTree};
use super::PLINTH;

/// Plinth options
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlinthConfig {
    /// Size along X
    pub width: f32,
    /// Size along Z
    pub depth: f32,
    /// Size along Y
    pub height: f32,
    /// Surface color
    pub color: String,
}

impl Default for PlinthConfig {
    fn default() -> Self {
        Self {
            width: 1.0,
            depth: 1.0,
            height: 0.5,
            color: "#404040".to_string(),
        }
    }
}

impl Config for PlinthConfig {
    fn validate(&self) -> Result<(), ConfigError> {
        ensure_non_negative("width", f64::from(self.width))?;
        ensure_non_negative("depth", f64::from(self.depth))?;
        ensure_non_negative("height", f64::from(self.height))
    }
}

/// Plinth component
pub struct Plinth {
    /// Options; re-applied by `on_update`
    pub config: PlinthConfig,
}

impl Plinth {
    /// Create a plinth component
    pub fn new(config: PlinthConfig) -> Self {
        Self { config }
    }

    /// Move `entity` so its base rests at the height of `floor`, a world position
    pub fn rest_on(&self, scene: &mut SceneTree, entity: Entity, floor: Vec3) -> Result<(), SceneError> {
        let local = scene.world_to_parent_local(entity, floor)?;
        let mut position = scene.node(entity)?.transform().position;
        position.y = local.y + self.config.height / 2.0;
        scene.set_position(entity, position)
    }
}

impl Component for Plinth {
    fn name(&self) -> &str {
        PLINTH
    }

    fn on_attach(&mut self, ctx: &mut ComponentContext<'_>) -> Result<(), ComponentError> {
        log::info!("Plinth initialised on {:?}", ctx.entity());
        Ok(())
    }

    fn on_update(&mut self, ctx: &mut ComponentContext<'_>) -> Result<(), ComponentError> {
        self.config.validate()?;
        let entity = ctx.entity();
        let geometry = Geometry::Box {
            width: self.config.width,
            height: self.config.height,
            depth: self.config.depth,
        };
        let scene = ctx.scene_mut();
        scene.set_geometry(entity, Some(geometry))?;
        scene.set_material(entity, Some(Material::colored(self.config.color.clone())))?;
        Ok(())
    }

    fn on_event(&mut self, ctx: &mut ComponentContext<'_>, event: &Event) {
        if event.event_type != EventType::StayDown || event.target != Some(ctx.entity()) {
            return;
        }
        let Some(floor) = event.get_world_position() else {
            return;
        };
        let entity = ctx.entity();
        if let Err(err) = self.rest_on(ctx.scene_mut(), entity, floor) {
            log::warn!("Plinth on {:?} could not settle: {}", entity, err);
        }
    }

    fn on_detach(&mut self, ctx: &mut ComponentContext<'_>) {
        let entity = ctx.entity();
        let scene = ctx.scene_mut();
        if scene.contains(entity) {
            let cleared = scene
                .set_geometry(entity, None)
                .and_then(|()| scene.set_material(entity, None));
            if let Err(err) = cleared {
                log::warn!("Plinth on {:?} left its box behind: {}", entity, err);
            }
        }
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}
