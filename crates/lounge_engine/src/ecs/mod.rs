//! Entity-component runtime hosting the lounge components

pub mod entity;
pub mod component;
pub mod world;

pub use entity::Entity;
pub use component::{component_name_matches, Component, ComponentContext, ComponentError};
pub use world::World;
