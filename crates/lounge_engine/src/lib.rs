//! # Lounge Engine
//!
//! Declarative scene components for building a virtual lounge: a walled room
//! with floor, ceiling, walls, an entry point, and proximity-based collision
//! events.
//!
//! ## Features
//!
//! - **Proximity Collider**: interval-throttled AABB overlap checks with
//!   enter/exit events
//! - **Lounge Components**: room layout, floor, walls, ceiling, plinths,
//!   stay-down markers, entry points
//! - **Host Runtime**: a small scene tree with mutation notifications and an
//!   entity-component world driving component lifecycles
//! - **Configuration**: every component's options load from TOML or RON
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use lounge_engine::prelude::*;
//!
//! fn main() -> Result<(), ComponentError> {
//!     let mut world = World::new();
//!     let root = world.scene().root();
//!     let room = world.scene_mut().spawn(root, SceneNode::entity().with_id("lounge"))?;
//!     world.attach(room, Box::new(Lounge::new(LoungeConfig::default())))?;
//!
//!     let rig = world.scene_mut().spawn(root, SceneNode::entity().with_geometry(
//!         Geometry::Box { width: 0.5, height: 1.8, depth: 0.5 },
//!     ))?;
//!     world.attach(rig, Box::new(EntryPoint::new(EntryPointConfig::default())))?;
//!     world.attach(rig, Box::new(ColliderComponent::new(ColliderConfig::default())?))?;
//!
//!     for frame in 0..60 {
//!         world.tick(f64::from(frame) * 16.0)?;
//!     }
//!     Ok(())
//! }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all, clippy::pedantic, clippy::nursery)]
#![allow(clippy::module_name_repetitions, clippy::similar_names, clippy::too_many_arguments)]

pub mod foundation;
pub mod config;
pub mod ecs;
pub mod events;
pub mod scene;
pub mod physics;
pub mod lounge;

/// Common imports for engine users
pub mod prelude {
    pub use crate::{
        config::{Config, ConfigError},
        ecs::{Component, ComponentContext, ComponentError, Entity, World},
        events::{Event, EventHandler, EventSink, EventSystem, EventType},
        foundation::math::{Transform, Vec3},
        lounge::{
            Ceiling, CeilingConfig, EntryPoint, EntryPointConfig, Floor, FloorConfig,
            Lounge, LoungeConfig, Plinth, PlinthConfig, StayDown, Wall, WallConfig,
            WallFacing, WallKind,
        },
        physics::{CheckReport, ColliderComponent, ColliderConfig, ProximityCollider},
        scene::{
            Geometry, Material, SceneError, SceneNode, SceneProvider, SceneTree,
            Selector, AABB,
        },
    };
}
