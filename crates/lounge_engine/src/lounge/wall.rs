//! Lounge walls
//!
//! A wall is a box child. Several walls can sit on one entity, one per
//! facing, as `lounge-wall__north`, `lounge-wall__east`, and so on.

use std::any::Any;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::config::{ensure_non_negative, Config, ConfigError};
use crate::ecs::{Component, ComponentContext, ComponentError, Entity};
use crate::foundation::math::{Transform, Vec3};
use crate::scene::{Geometry, Material, SceneNode, BOX_TAG};
use super::{non_blank, WALL};

/// Side of the room a wall closes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WallFacing {
    /// Towards -Z
    North,
    /// Towards +X
    East,
    /// Towards +Z
    South,
    /// Towards -X
    West,
}

impl WallFacing {
    /// Every facing, in layout order
    pub const ALL: [WallFacing; 4] = [Self::North, Self::East, Self::South, Self::West];

    /// Lowercase name, used as the component instance id
    pub fn as_str(self) -> &'static str {
        match self {
            Self::North => "north",
            Self::East => "east",
            Self::South => "south",
            Self::West => "west",
        }
    }

    /// Rotation about Y applied to the wall box
    pub fn yaw_degrees(self) -> f32 {
        match self {
            Self::North => 0.0,
            Self::East => 90.0,
            Self::South => 180.0,
            Self::West => 270.0,
        }
    }
}

impl fmt::Display for WallFacing {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Wall options
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WallConfig {
    /// Length of the wall
    pub width: f32,
    /// Size along Y
    pub height: f32,
    /// Thickness
    pub depth: f32,
    /// Surface color
    pub color: Option<String>,
    /// Center of the box relative to the wall entity
    pub position: Vec3,
    /// Below 1 the wall is see-through
    pub opacity: f32,
    /// Texture asset reference
    pub texture: Option<String>,
    /// Draw edges only
    pub wireframe: bool,
}

impl Default for WallConfig {
    fn default() -> Self {
        Self {
            width: 10.0,
            height: 4.0,
            depth: 0.3,
            color: None,
            position: Vec3::zeros(),
            opacity: 1.0,
            texture: None,
            wireframe: false,
        }
    }
}

impl Config for WallConfig {
    fn validate(&self) -> Result<(), ConfigError> {
        ensure_non_negative("width", f64::from(self.width))?;
        ensure_non_negative("height", f64::from(self.height))?;
        ensure_non_negative("depth", f64::from(self.depth))?;
        if !(0.0..=1.0).contains(&self.opacity) {
            return Err(ConfigError::InvalidValue {
                field: "opacity",
                reason: format!("expected a value in [0, 1], got {}", self.opacity),
            });
        }
        Ok(())
    }
}

impl WallConfig {
    /// Material of the wall box
    pub fn material(&self) -> Material {
        Material {
            color: non_blank(&self.color),
            texture: non_blank(&self.texture),
            opacity: self.opacity,
            transparent: self.opacity < 1.0,
            wireframe: self.wireframe,
            ..Default::default()
        }
    }
}

/// Wall component
pub struct Wall {
    /// Options; re-applied by `on_update`
    pub config: WallConfig,
    facing: Option<WallFacing>,
    name: String,
    wall: Option<Entity>,
}

impl Wall {
    /// A wall for one side of the room, named `lounge-wall__<facing>`
    pub fn new(facing: WallFacing, config: WallConfig) -> Self {
        Self {
            config,
            facing: Some(facing),
            name: format!("{WALL}__{facing}"),
            wall: None,
        }
    }

    /// A free-standing, unrotated wall named `lounge-wall`
    pub fn standalone(config: WallConfig) -> Self {
        Self {
            config,
            facing: None,
            name: WALL.to_string(),
            wall: None,
        }
    }

    /// Side of the room, if any
    pub fn facing(&self) -> Option<WallFacing> {
        self.facing
    }

    /// The box node, once attached
    pub fn wall(&self) -> Option<Entity> {
        self.wall
    }

    fn transform(&self) -> Transform {
        let yaw = self.facing.map_or(0.0, WallFacing::yaw_degrees);
        Transform::from_position(self.config.position).with_rotation_degrees(Vec3::new(0.0, yaw, 0.0))
    }
}

impl Component for Wall {
    fn name(&self) -> &str {
        &self.name
    }

    fn on_attach(&mut self, ctx: &mut ComponentContext<'_>) -> Result<(), ComponentError> {
        self.config.validate()?;
        let parent = ctx.entity();
        let wall = ctx.scene_mut().spawn(parent, SceneNode::new(BOX_TAG).with_class(WALL))?;
        self.wall = Some(wall);
        log::info!("Wall `{}` initialised on {:?}", self.name, parent);
        Ok(())
    }

    fn on_update(&mut self, ctx: &mut ComponentContext<'_>) -> Result<(), ComponentError> {
        let Some(wall) = self.wall else {
            return Ok(());
        };
        self.config.validate()?;
        log::debug!("Wall `{}` updated", self.name);

        let geometry = Geometry::Box {
            width: self.config.width,
            height: self.config.height,
            depth: self.config.depth,
        };
        let transform = self.transform();
        let scene = ctx.scene_mut();
        scene.set_geometry(wall, Some(geometry))?;
        scene.set_material(wall, Some(self.config.material()))?;
        scene.set_transform(wall, transform)?;
        Ok(())
    }

    fn on_detach(&mut self, ctx: &mut ComponentContext<'_>) {
        if let Some(wall) = self.wall.take() {
            ctx.despawn(wall);
        }
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}
