//! Collider component
//!
//! Attaches a [`ProximityCollider`] to an entity and drives it from the host
//! tick. Hit events are queued on the world's event system.

use std::any::Any;

use crate::config::ConfigError;
use crate::ecs::{Component, ComponentContext, ComponentError};
use super::proximity_collider::{ColliderConfig, ProximityCollider};

/// Component name of the collider
pub const COLLIDER: &str = "lounge-collider";

/// Proximity collider as a scene component
pub struct ColliderComponent {
    /// Options; re-applied by `on_update`
    pub config: ColliderConfig,
    collider: ProximityCollider,
}

impl ColliderComponent {
    /// Create the component; fails on invalid options
    pub fn new(config: ColliderConfig) -> Result<Self, ConfigError> {
        let collider = ProximityCollider::new(config.clone())?;
        Ok(Self { config, collider })
    }

    /// The wrapped collider
    pub fn collider(&self) -> &ProximityCollider {
        &self.collider
    }
}

impl Component for ColliderComponent {
    fn name(&self) -> &str {
        COLLIDER
    }

    fn on_attach(&mut self, ctx: &mut ComponentContext<'_>) -> Result<(), ComponentError> {
        let owner = ctx.entity();
        self.collider.on_attach(owner, ctx.scene_mut());
        log::info!("Collider initialised on {:?}", owner);
        Ok(())
    }

    fn on_update(&mut self, _ctx: &mut ComponentContext<'_>) -> Result<(), ComponentError> {
        if self.collider.config() != &self.config {
            self.collider.reconfigure(self.config.clone())?;
        }
        Ok(())
    }

    fn on_tick(&mut self, ctx: &mut ComponentContext<'_>, now_ms: f64) {
        let (scene, events) = ctx.scene_and_events();
        self.collider.on_tick(now_ms, &*scene, events);
    }

    fn on_detach(&mut self, ctx: &mut ComponentContext<'_>) {
        self.collider.on_detach(ctx.scene_mut());
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ecs::{Entity, World};
    use crate::events::{Event, EventHandler, EventType};
    use crate::foundation::math::Vec3;
    use crate::scene::{Geometry, SceneNode};
    use std::cell::RefCell;
    use std::rc::Rc;

    struct Recorder(Rc<RefCell<Vec<(EventType, Option<Entity>)>>>);

    impl EventHandler for Recorder {
        fn on_event(&mut self, event: &Event) -> bool {
            self.0.borrow_mut().push((event.event_type, event.target));
            false
        }
    }

    fn cube() -> Geometry {
        Geometry::Box { width: 1.0, height: 1.0, depth: 1.0 }
    }

    #[test]
    fn test_collider_drives_hit_events() {
        let mut world = World::new();
        let root = world.scene().root();
        let rig = world.scene_mut().spawn(root, SceneNode::entity().with_geometry(cube())).unwrap();
        let prop = world
            .scene_mut()
            .spawn(root, SceneNode::entity().with_position(Vec3::new(3.0, 0.0, 0.0)).with_geometry(cube()))
            .unwrap();

        let log = Rc::new(RefCell::new(Vec::new()));
        world.events_mut().register_handler(EventType::HitStart, Box::new(Recorder(Rc::clone(&log))));
        world.events_mut().register_handler(EventType::HitEnd, Box::new(Recorder(Rc::clone(&log))));

        let component = ColliderComponent::new(ColliderConfig::default()).unwrap();
        world.attach(rig, Box::new(component)).unwrap();

        world.tick(0.0).unwrap();
        assert!(log.borrow().is_empty());

        // Walk the rig into the prop, then past it
        world.scene_mut().set_position(rig, Vec3::new(3.0, 0.0, 0.0)).unwrap();
        world.tick(100.0).unwrap();
        world.scene_mut().set_position(rig, Vec3::new(6.0, 0.0, 0.0)).unwrap();
        world.tick(200.0).unwrap();

        assert_eq!(
            *log.borrow(),
            vec![(EventType::HitStart, Some(prop)), (EventType::HitEnd, Some(prop))]
        );
    }

    #[test]
    fn test_update_reconfigures() {
        let mut world = World::new();
        let root = world.scene().root();
        let rig = world.scene_mut().spawn(root, SceneNode::entity()).unwrap();
        world
            .attach(rig, Box::new(ColliderComponent::new(ColliderConfig::default()).unwrap()))
            .unwrap();

        world
            .update_component::<ColliderComponent, _>(rig, COLLIDER, |c| c.config.check_interval_ms = 250.0)
            .unwrap();
        let component = world.component::<ColliderComponent>(rig).unwrap();
        assert_eq!(component.collider().config().check_interval_ms, 250.0);

        let err = world
            .update_component::<ColliderComponent, _>(rig, COLLIDER, |c| c.config.check_interval_ms = -1.0)
            .unwrap_err();
        assert!(matches!(err, ComponentError::Config(_)));
    }

    #[test]
    fn test_detach_releases_observer() {
        let mut world = World::new();
        let root = world.scene().root();
        let rig = world.scene_mut().spawn(root, SceneNode::entity()).unwrap();
        world
            .attach(rig, Box::new(ColliderComponent::new(ColliderConfig::default()).unwrap()))
            .unwrap();
        assert_eq!(world.scene().bus().subscriber_count(), 1);

        world.detach(rig, COLLIDER).unwrap();
        assert_eq!(world.scene().bus().subscriber_count(), 0);
    }
}
