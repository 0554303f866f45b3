//! The lounge room
//!
//! [`LoungeConfig::layout`] turns the room options into floor, wall, and
//! ceiling options; the [`Lounge`] component attaches those to an inner
//! entity under its own.

use std::any::Any;

use serde::{Deserialize, Serialize};

use crate::config::{ensure_non_negative, Config, ConfigError};
use crate::ecs::{Component, ComponentContext, ComponentError, Entity};
use crate::foundation::math::Vec3;
use crate::scene::{SceneError, SceneNode, SceneTree};
use super::ceiling::{Ceiling, CeilingConfig};
use super::floor::{Floor, FloorConfig};
use super::wall::{Wall, WallConfig, WallFacing};
use super::{non_blank, DEFAULT_SURFACE_COLOR, LOUNGE};

/// What closes one side of the room
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WallKind {
    /// Full-height opaque wall
    #[default]
    Wall,
    /// Nothing
    Open,
    /// Low see-through wall
    Barrier,
    /// Full-height see-through wall
    Glass,
}

/// Room options
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoungeConfig {
    /// Size along X
    pub width: f32,
    /// Size along Y
    pub height: f32,
    /// Size along Z
    pub depth: f32,
    /// Floor color
    pub floor_color: Option<String>,
    /// Floor texture
    pub floor_texture: Option<String>,
    /// -Z side
    pub north: WallKind,
    /// +X side
    pub east: WallKind,
    /// +Z side
    pub south: WallKind,
    /// -X side
    pub west: WallKind,
    /// Wall color
    pub wall_color: Option<String>,
    /// Wall texture
    pub wall_texture: Option<String>,
    /// Opacity of glass and barrier walls
    pub glass_opacity: f32,
    /// Height of barrier walls
    pub barrier_height: f32,
    /// Whether the room is covered
    pub ceiling: bool,
    /// Ceiling color
    pub ceiling_color: Option<String>,
    /// Entry point in room coordinates; on the floor, a quarter depth south of center, when unset
    pub entry_point: Option<Vec3>,
}

impl Default for LoungeConfig {
    fn default() -> Self {
        Self {
            width: 10.0,
            height: 4.0,
            depth: 7.0,
            floor_color: None,
            floor_texture: None,
            north: WallKind::Wall,
            east: WallKind::Wall,
            south: WallKind::Wall,
            west: WallKind::Wall,
            wall_color: None,
            wall_texture: None,
            glass_opacity: 0.4,
            barrier_height: 1.4,
            ceiling: true,
            ceiling_color: None,
            entry_point: None,
        }
    }
}

impl Config for LoungeConfig {
    fn validate(&self) -> Result<(), ConfigError> {
        ensure_non_negative("width", f64::from(self.width))?;
        ensure_non_negative("height", f64::from(self.height))?;
        ensure_non_negative("depth", f64::from(self.depth))?;
        ensure_non_negative("barrier_height", f64::from(self.barrier_height))?;
        if !(0.0..=1.0).contains(&self.glass_opacity) {
            return Err(ConfigError::InvalidValue {
                field: "glass_opacity",
                reason: format!("expected a value in [0, 1], got {}", self.glass_opacity),
            });
        }
        Ok(())
    }
}

/// Options of every part of a room, in room coordinates
#[derive(Debug, Clone, PartialEq)]
pub struct LoungeLayout {
    /// Floor, at the bottom of the room
    pub floor: FloorConfig,
    /// Walls of the closed sides, north first, clockwise
    pub walls: Vec<(WallFacing, WallConfig)>,
    /// Ceiling, at the top of the room, if covered
    pub ceiling: Option<CeilingConfig>,
}

impl LoungeConfig {
    /// What closes the given side
    pub fn wall_kind(&self, facing: WallFacing) -> WallKind {
        match facing {
            WallFacing::North => self.north,
            WallFacing::East => self.east,
            WallFacing::South => self.south,
            WallFacing::West => self.west,
        }
    }

    /// Entry point in room coordinates
    pub fn local_entry_point(&self) -> Vec3 {
        self.entry_point
            .unwrap_or_else(|| Vec3::new(0.0, -self.height / 2.0, self.depth / 4.0))
    }

    /// Floor, wall, and ceiling options for this room
    pub fn layout(&self) -> LoungeLayout {
        let floor = FloorConfig {
            width: self.width,
            depth: self.depth,
            color: self.floor_color.clone(),
            texture: self.floor_texture.clone(),
            position: Vec3::new(0.0, -self.height / 2.0, 0.0),
        };

        let walls = WallFacing::ALL
            .into_iter()
            .filter_map(|facing| self.wall(facing).map(|wall| (facing, wall)))
            .collect();

        let ceiling = self.ceiling.then(|| CeilingConfig {
            width: self.width,
            depth: self.depth,
            color: non_blank(&self.ceiling_color).unwrap_or_else(|| DEFAULT_SURFACE_COLOR.to_string()),
            position: Vec3::new(0.0, self.height / 2.0, 0.0),
        });

        LoungeLayout { floor, walls, ceiling }
    }

    fn wall(&self, facing: WallFacing) -> Option<WallConfig> {
        let kind = self.wall_kind(facing);
        let (height, y) = match kind {
            WallKind::Open => return None,
            WallKind::Wall | WallKind::Glass => (self.height, 0.0),
            WallKind::Barrier => (self.barrier_height, (self.barrier_height - self.height) / 2.0),
        };
        let (x, z, width) = match facing {
            WallFacing::North => (0.0, -self.depth / 2.0, self.width),
            WallFacing::East => (self.width / 2.0, 0.0, self.depth),
            WallFacing::South => (0.0, self.depth / 2.0, self.width),
            WallFacing::West => (-self.width / 2.0, 0.0, self.depth),
        };
        let opacity = match kind {
            WallKind::Glass | WallKind::Barrier => self.glass_opacity,
            _ => 1.0,
        };

        Some(WallConfig {
            width,
            height,
            color: self.wall_color.clone(),
            position: Vec3::new(x, y, z),
            opacity,
            texture: self.wall_texture.clone(),
            ..Default::default()
        })
    }
}

/// Room component
pub struct Lounge {
    /// Options; the room is rebuilt by `on_update` when they change
    pub config: LoungeConfig,
    inner: Option<Entity>,
    built_from: Option<LoungeConfig>,
}

impl Lounge {
    /// Create a room component
    pub fn new(config: LoungeConfig) -> Self {
        Self {
            config,
            inner: None,
            built_from: None,
        }
    }

    /// Entity carrying the floor, wall, and ceiling components
    pub fn inner(&self) -> Option<Entity> {
        self.inner
    }

    /// World position of the entry point of a room attached to `entity`
    pub fn entry_point(&self, scene: &SceneTree, entity: Entity) -> Result<Vec3, SceneError> {
        scene.local_to_world(entity, self.config.local_entry_point())
    }

    fn build(&mut self, ctx: &mut ComponentContext<'_>) -> Result<(), ComponentError> {
        if let Some(previous) = self.inner.take() {
            log::debug!("Rebuilding lounge on {:?}", ctx.entity());
            ctx.despawn(previous);
        }

        let layout = self.config.layout();
        let parent = ctx.entity();
        let inner = ctx.scene_mut().spawn(parent, SceneNode::entity())?;

        ctx.attach(inner, Box::new(Floor::new(layout.floor)));
        for (facing, wall) in layout.walls {
            ctx.attach(inner, Box::new(Wall::new(facing, wall)));
        }
        if let Some(ceiling) = layout.ceiling {
            ctx.attach(inner, Box::new(Ceiling::new(ceiling)));
        }

        self.inner = Some(inner);
        self.built_from = Some(self.config.clone());
        Ok(())
    }
}

impl Component for Lounge {
    fn name(&self) -> &str {
        LOUNGE
    }

    fn on_attach(&mut self, ctx: &mut ComponentContext<'_>) -> Result<(), ComponentError> {
        self.config.validate()?;
        log::info!(
            "Lounge initialised on {:?} ({} x {} x {})",
            ctx.entity(),
            self.config.width,
            self.config.height,
            self.config.depth
        );
        Ok(())
    }

    fn on_update(&mut self, ctx: &mut ComponentContext<'_>) -> Result<(), ComponentError> {
        if self.built_from.as_ref() == Some(&self.config) {
            return Ok(());
        }
        self.config.validate()?;
        self.build(ctx)
    }

    fn on_detach(&mut self, ctx: &mut ComponentContext<'_>) {
        if let Some(inner) = self.inner.take() {
            ctx.despawn(inner);
        }
        self.built_from = None;
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}
