//! Physics module for proximity detection
//!
//! Provides interval-throttled AABB overlap checks with enter/exit events.
//! Not a physics engine: there is no response, no broad phase, no shapes
//! beyond world-space bounds.

pub mod proximity_collider;
pub mod collider_component;

pub use proximity_collider::{CheckReport, ColliderConfig, ProximityCollider, DEFAULT_CHECK_INTERVAL_MS};
pub use collider_component::{ColliderComponent, COLLIDER};
