//! Scene provider interface consumed by scene components
//!
//! Components never reach into ambient scene state; everything they read or
//! observe goes through this trait, so any host scene can back them.

use crate::ecs::Entity;
use super::aabb::AABB;
use super::mutation::{MutationCallback, MutationKinds, Subscription};
use super::selector::Selector;
use super::tree::SceneTree;
use super::SceneError;

/// Host scene as seen by a component
pub trait SceneProvider {
    /// Nodes matching `selector`, or the direct children of the scene root when `None`
    fn list_candidates(&self, selector: Option<&Selector>) -> Vec<Entity>;

    /// World-space bounds of a node, `None` if it has no world representation
    fn compute_world_aabb(&self, entity: Entity) -> Option<AABB>;

    /// Start observing scene mutations
    fn subscribe_mutations(&mut self, callback: MutationCallback) -> Subscription;

    /// Stop observing scene mutations
    fn unsubscribe(&mut self, subscription: Subscription) -> Result<(), SceneError>;
}

impl SceneProvider for SceneTree {
    fn list_candidates(&self, selector: Option<&Selector>) -> Vec<Entity> {
        match selector {
            Some(selector) => self.query_all(selector),
            None => self.children(self.root()).map(<[Entity]>::to_vec).unwrap_or_default(),
        }
    }

    fn compute_world_aabb(&self, entity: Entity) -> Option<AABB> {
        SceneTree::compute_world_aabb(self, entity).ok().flatten()
    }

    fn subscribe_mutations(&mut self, callback: MutationCallback) -> Subscription {
        self.bus().subscribe(MutationKinds::all(), callback)
    }

    fn unsubscribe(&mut self, subscription: Subscription) -> Result<(), SceneError> {
        self.bus().unsubscribe(subscription)
    }
}
