//! Stay-down marker
//!
//! Tells its entity where the floor of the enclosing lounge is, by emitting
//! a `StayDown` event carrying the floor's world position. Components on the
//! same entity (a plinth, for instance) react to it. The lounge may be
//! attached after the stay-down.

use std::any::Any;

use crate::ecs::{Component, ComponentContext, ComponentError, Entity};
use crate::events::{Event, EventType};
use crate::foundation::math::Vec3;
use crate::scene::Selector;
use super::floor::Floor;
use super::{FLOOR, LOUNGE, STAYDOWN};

/// Stay-down component
#[derive(Debug, Default)]
pub struct StayDown {
    lounge: Option<Entity>,
}

impl StayDown {
    /// Create a stay-down component
    pub fn new() -> Self {
        Self::default()
    }

    /// Enclosing lounge, once found
    pub fn lounge(&self) -> Option<Entity> {
        self.lounge
    }

    fn floor_level(&self, ctx: &ComponentContext<'_>) -> Option<Vec3> {
        let lounge = self.lounge?;
        let scene = ctx.scene();
        let floor_entity = scene
            .query_all_in(lounge, &Selector::component(FLOOR))
            .ok()?
            .into_iter()
            .next()?;
        let floor = ctx.component::<Floor>(floor_entity)?;
        floor.world_level(scene, floor_entity).ok()
    }

    /// Bind to the nearest lounge ancestor and report its floor, or wait
    /// for the lounge to finish loading
    fn resolve(&mut self, ctx: &mut ComponentContext<'_>) {
        let entity = ctx.entity();
        let lounge = match ctx.scene().closest_ancestor_with_component(entity, LOUNGE) {
            Ok(Some(lounge)) => lounge,
            Ok(None) => return,
            Err(err) => {
                log::warn!("Stay-down on {:?} could not find its lounge: {}", entity, err);
                return;
            }
        };
        self.lounge = Some(lounge);

        if !self.emit_floor_level(ctx) {
            ctx.listen(lounge, EventType::Loaded);
        }
    }

    fn emit_floor_level(&self, ctx: &mut ComponentContext<'_>) -> bool {
        let Some(level) = self.floor_level(ctx) else {
            return false;
        };
        let entity = ctx.entity();
        let now = ctx.now();
        log::debug!("Floor for {:?} is at y={}", entity, level.y);
        ctx.emit(Event::stay_down(entity, level, now));
        true
    }
}

impl Component for StayDown {
    fn name(&self) -> &str {
        STAYDOWN
    }

    fn on_attach(&mut self, ctx: &mut ComponentContext<'_>) -> Result<(), ComponentError> {
        let entity = ctx.entity();
        log::info!("Stay-down initialised on {:?}", entity);

        if ctx.scene().closest_ancestor_with_component(entity, LOUNGE)?.is_some() {
            self.resolve(ctx);
        } else {
            log::debug!("{:?} has no lounge ancestor yet; watching its ancestors", entity);
            let ancestors = ctx.scene().ancestors(entity)?;
            for ancestor in ancestors {
                ctx.listen(ancestor, EventType::ComponentInitialized);
            }
        }
        Ok(())
    }

    fn on_event(&mut self, ctx: &mut ComponentContext<'_>, event: &Event) {
        let Some(target) = event.target else {
            return;
        };
        match event.event_type {
            EventType::ComponentInitialized if self.lounge.is_none() && event.get_name() == Some(LOUNGE) => {
                self.resolve(ctx);
            }
            EventType::Loaded if self.lounge == Some(target) => {
                if !self.emit_floor_level(ctx) {
                    log::warn!("Lounge {:?} loaded without a floor", target);
                }
            }
            _ => {}
        }
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}
