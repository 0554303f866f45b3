//! Scene management
//!
//! The host side of the component model: a small scene tree, the selectors
//! used to query it, mutation notifications, and the [`SceneProvider`] trait
//! components consume.
//!
//! ## Architecture
//!
//! ```text
//! Components (lounge, collider, ...)
//!      ↓  SceneProvider
//! SceneTree ──publishes──> MutationBus ──> observers
//! ```

mod aabb;
mod mutation;
mod provider;
mod selector;
mod tree;

pub use aabb::AABB;
pub use mutation::{MutationBus, MutationCallback, MutationKinds, SceneMutation, Subscription};
pub use provider::SceneProvider;
pub use selector::{Combinator, ComplexSelector, CompoundSelector, Selector};
pub use tree::{
    Geometry, Material, SceneNode, SceneTree, Side,
    BOX_TAG, ENTITY_TAG, PLANE_TAG, SCENE_TAG,
};

use crate::ecs::Entity;

/// Scene errors
#[derive(thiserror::Error, Debug)]
pub enum SceneError {
    /// The entity does not exist (never spawned or already despawned)
    #[error("Unknown entity: {0:?}")]
    UnknownEntity(Entity),

    /// The scene root cannot be despawned
    #[error("The scene root cannot be removed")]
    CannotRemoveRoot,

    /// Selector text could not be parsed
    #[error("Invalid selector `{selector}`: {reason}")]
    InvalidSelector {
        /// Offending selector text
        selector: String,
        /// What went wrong
        reason: String,
    },

    /// The subscription is not registered with this scene
    #[error("Unknown mutation subscription: {0}")]
    UnknownSubscription(u64),

    /// The node's world transform cannot be inverted (zero scale)
    #[error("Singular world transform for entity {0:?}")]
    SingularTransform(Entity),
}
