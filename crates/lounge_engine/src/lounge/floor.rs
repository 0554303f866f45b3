//! Floor of a lounge: a double-sided plane lying in the XZ plane

use std::any::Any;

use serde::{Deserialize, Serialize};

use crate::config::{ensure_non_negative, Config, ConfigError};
use crate::ecs::{Component, ComponentContext, ComponentError, Entity};
use crate::foundation::math::{Transform, Vec3};
use crate::scene::{Geometry, Material, SceneError, SceneNode, SceneTree, Side, PLANE_TAG};
use super::{non_blank, DEFAULT_SURFACE_COLOR, FLOOR};

/// Floor options
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FloorConfig {
    /// Size along X
    pub width: f32,
    /// Size along Z
    pub depth: f32,
    /// Surface color; grey when neither color nor texture is set
    pub color: Option<String>,
    /// Texture asset reference
    pub texture: Option<String>,
    /// Position of the plane relative to the floor entity
    pub position: Vec3,
}

impl Default for FloorConfig {
    fn default() -> Self {
        Self {
            width: 10.0,
            depth: 7.0,
            color: None,
            texture: None,
            position: Vec3::zeros(),
        }
    }
}

impl Config for FloorConfig {
    fn validate(&self) -> Result<(), ConfigError> {
        ensure_non_negative("width", f64::from(self.width))?;
        ensure_non_negative("depth", f64::from(self.depth))
    }
}

impl FloorConfig {
    /// Material of the floor plane
    pub fn material(&self) -> Material {
        let texture = non_blank(&self.texture);
        let color = match (non_blank(&self.color), &texture) {
            (None, None) => Some(DEFAULT_SURFACE_COLOR.to_string()),
            (color, _) => color,
        };
        Material {
            color,
            texture,
            side: Side::Double,
            ..Default::default()
        }
    }

    fn transform(&self) -> Transform {
        Transform::from_position(self.position).with_rotation_degrees(Vec3::new(270.0, 0.0, 0.0))
    }
}

/// Floor component
pub struct Floor {
    /// Options; re-applied by `on_update`
    pub config: FloorConfig,
    plane: Option<Entity>,
}

impl Floor {
    /// Create a floor component
    pub fn new(config: FloorConfig) -> Self {
        Self { config, plane: None }
    }

    /// The plane node, once attached
    pub fn plane(&self) -> Option<Entity> {
        self.plane
    }

    /// World position of the floor surface for a floor attached to `entity`
    pub fn world_level(&self, scene: &SceneTree, entity: Entity) -> Result<Vec3, SceneError> {
        scene.local_to_world(entity, self.config.position)
    }
}

impl Component for Floor {
    fn name(&self) -> &str {
        FLOOR
    }

    fn on_attach(&mut self, ctx: &mut ComponentContext<'_>) -> Result<(), ComponentError> {
        self.config.validate()?;
        let parent = ctx.entity();
        let plane = ctx
            .scene_mut()
            .spawn(parent, SceneNode::new(PLANE_TAG).with_class(FLOOR))?;
        self.plane = Some(plane);
        log::info!("Floor initialised on {:?}", parent);
        Ok(())
    }

    fn on_update(&mut self, ctx: &mut ComponentContext<'_>) -> Result<(), ComponentError> {
        let Some(plane) = self.plane else {
            return Ok(());
        };
        self.config.validate()?;
        let scene = ctx.scene_mut();
        scene.set_geometry(plane, Some(Geometry::Plane { width: self.config.width, height: self.config.depth }))?;
        scene.set_material(plane, Some(self.config.material()))?;
        scene.set_transform(plane, self.config.transform())?;
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
