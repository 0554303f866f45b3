//! Ceiling of a lounge: the floor's plane flipped to face down

use std::any::Any;

use serde::{Deserialize, Serialize};

use crate::config::{ensure_non_negative, Config, ConfigError};
use crate::ecs::{Component, ComponentContext, ComponentError, Entity};
use crate::foundation::math::{Transform, Vec3};
use crate::scene::{Geometry, Material, SceneNode, Side, PLANE_TAG};
use super::{CEILING, DEFAULT_SURFACE_COLOR};

/// Ceiling options
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CeilingConfig {
    /// Size along X
    pub width: f32,
    /// Size along Z
    pub depth: f32,
    /// Surface color
    pub color: String,
    /// Position of the plane relative to the ceiling entity
    pub position: Vec3,
}

impl Default for CeilingConfig {
    fn default() -> Self {
        Self {
            width: 10.0,
            depth: 7.0,
            color: DEFAULT_SURFACE_COLOR.to_string(),
            position: Vec3::zeros(),
        }
    }
}

impl Config for CeilingConfig {
    fn validate(&self) -> Result<(), ConfigError> {
        ensure_non_negative("width", f64::from(self.width))?;
        ensure_non_negative("depth", f64::from(self.depth))
    }
}

/// Ceiling component
pub struct Ceiling {
    /// Options; re-applied by `on_update`
    pub config: CeilingConfig,
    plane: Option<Entity>,
}

impl Ceiling {
    /// Create a ceiling component
    pub fn new(config: CeilingConfig) -> Self {
        Self { config, plane: None }
    }

    /// The plane node, once attached
    pub fn plane(&self) -> Option<Entity> {
        self.plane
    }
}

impl Component for Ceiling {
    fn name(&self) -> &str {
        CEILING
    }

    fn on_attach(&mut self, ctx: &mut ComponentContext<'_>) -> Result<(), ComponentError> {
        self.config.validate()?;
        let parent = ctx.entity();
        let plane = ctx
            .scene_mut()
            .spawn(parent, SceneNode::new(PLANE_TAG).with_class(CEILING))?;
        self.plane = Some(plane);
        log::info!("Ceiling initialised on {:?}", parent);
        Ok(())
    }

    fn on_update(&mut self, ctx: &mut ComponentContext<'_>) -> Result<(), ComponentError> {
        let Some(plane) = self.plane else {
            return Ok(());
        };
        self.config.validate()?;
        let material = Material {
            side: Side::Double,
            ..Material::colored(self.config.color.clone())
        };
        let transform =
            Transform::from_position(self.config.position).with_rotation_degrees(Vec3::new(90.0, 0.0, 0.0));

        let scene = ctx.scene_mut();
        scene.set_geometry(plane, Some(Geometry::Plane { width: self.config.width, height: self.config.depth }))?;
        scene.set_material(plane, Some(material))?;
        scene.set_transform(plane, transform)?;
        Ok(())
    }

    fn on_detach(&mut self, ctx: &mut ComponentContext<'_>) {
        if let Some(plane) = self.plane.take() {
            ctx.despawn(plane);
        }
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}
