//! Proximity collider
//!
//! Periodic AABB overlap checks between an owner entity and a set of
//! candidate entities, reported as enter (`HitStart`) and exit (`HitEnd`)
//! events. The candidate list is rebuilt lazily: scene mutations only raise a
//! dirty flag, and the next executed check does the rebuild.
//!
//! Candidate bounds are cached the first time they can be computed and never
//! refreshed, so a candidate that moves after its first check keeps colliding
//! at its old location. The owner's bounds are recomputed every check.

use std::cell::Cell;
use std::collections::HashMap;
use std::rc::Rc;

use serde::{Deserialize, Serialize};

use crate::config::{ensure_non_negative, Config, ConfigError};
use crate::ecs::Entity;
use crate::events::{Event, EventSink};
use crate::foundation::time::Throttle;
use crate::scene::{SceneProvider, Selector, Subscription, AABB};

/// Default minimum spacing between checks, in milliseconds
pub const DEFAULT_CHECK_INTERVAL_MS: f64 = 80.0;

/// Collider options
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ColliderConfig {
    /// Minimum time between two checks
    pub check_interval_ms: f64,
    /// Which entities are tested, as a selector such as `.room [lounge-plinth]`;
    /// `None` means the direct children of the scene root
    pub candidate_selector: Option<String>,
}

impl Default for ColliderConfig {
    fn default() -> Self {
        Self {
            check_interval_ms: DEFAULT_CHECK_INTERVAL_MS,
            candidate_selector: None,
        }
    }
}

impl ColliderConfig {
    fn parse_selector(&self) -> Result<Option<Selector>, ConfigError> {
        let Some(text) = self.candidate_selector.as_deref() else {
            return Ok(None);
        };
        Selector::parse_optional(text).map_err(|e| ConfigError::InvalidValue {
            field: "candidate_selector",
            reason: e.to_string(),
        })
    }
}

impl Config for ColliderConfig {
    fn validate(&self) -> Result<(), ConfigError> {
        ensure_non_negative("check_interval_ms", self.check_interval_ms)?;
        self.parse_selector().map(|_| ())
    }
}

/// Overlap changes produced by one executed check
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CheckReport {
    /// Candidates that started overlapping, in candidate order
    pub entered: Vec<Entity>,
    /// Candidates that stopped overlapping, in previous-check order
    pub exited: Vec<Entity>,
}

impl CheckReport {
    /// Whether the check changed nothing
    pub fn is_empty(&self) -> bool {
        self.entered.is_empty() && self.exited.is_empty()
    }
}

struct Attachment {
    owner: Entity,
    subscription: Subscription,
}

/// Interval-throttled AABB overlap detector for one owner entity
pub struct ProximityCollider {
    config: ColliderConfig,
    selector: Option<Selector>,
    throttle: Throttle,
    attachment: Option<Attachment>,
    dirty: Rc<Cell<bool>>,
    candidates: Vec<Entity>,
    aabb_cache: HashMap<Entity, AABB>,
    intersections: Vec<Entity>,
    checks_run: u64,
}

impl ProximityCollider {
    /// Create a detached collider; fails on invalid options
    pub fn new(config: ColliderConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        let selector = config.parse_selector()?;
        Ok(Self {
            throttle: Throttle::new(config.check_interval_ms),
            config,
            selector,
            attachment: None,
            dirty: Rc::new(Cell::new(true)),
            candidates: Vec::new(),
            aabb_cache: HashMap::new(),
            intersections: Vec::new(),
            checks_run: 0,
        })
    }

    /// Start tracking for `owner`: observe scene mutations and schedule a
    /// candidate rebuild. Does nothing if already attached.
    pub fn on_attach<P>(&mut self, owner: Entity, provider: &mut P)
    where
        P: SceneProvider + ?Sized,
    {
        if let Some(attachment) = &self.attachment {
            log::debug!("Collider already attached to {:?}", attachment.owner);
            return;
        }

        let dirty = Rc::clone(&self.dirty);
        let subscription = provider.subscribe_mutations(Box::new(move |_| dirty.set(true)));
        self.dirty.set(true);
        self.attachment = Some(Attachment { owner, subscription });
        log::debug!("Collider attached to {:?}", owner);
    }

    /// Stop tracking and discard all state. Safe to call when detached.
    pub fn on_detach<P>(&mut self, provider: &mut P)
    where
        P: SceneProvider + ?Sized,
    {
        let Some(Attachment { owner, subscription }) = self.attachment.take() else {
            return;
        };
        if let Err(err) = provider.unsubscribe(subscription) {
            log::warn!("Collider on {:?} could not unsubscribe cleanly: {}", owner, err);
        }

        self.candidates.clear();
        self.aabb_cache.clear();
        self.intersections.clear();
        self.throttle.reset();
        self.dirty.set(true);
        log::debug!("Collider detached from {:?}", owner);
    }

    /// Replace the options. The candidate list is rebuilt on the next check;
    /// cached bounds and current overlaps are kept.
    pub fn reconfigure(&mut self, config: ColliderConfig) -> Result<(), ConfigError> {
        config.validate()?;
        self.selector = config.parse_selector()?;
        self.throttle.set_interval_ms(config.check_interval_ms);
        self.config = config;
        self.dirty.set(true);
        Ok(())
    }

    /// Run a check if attached and the interval has elapsed.
    ///
    /// Exit events for every dropped candidate are emitted before enter
    /// events for new ones. Returns `None` when no check ran.
    pub fn on_tick<P, S>(&mut self, now_ms: f64, provider: &P, sink: &mut S) -> Option<CheckReport>
    where
        P: SceneProvider + ?Sized,
        S: EventSink + ?Sized,
    {
        let owner = self.attachment.as_ref()?.owner;
        if !now_ms.is_finite() {
            log::warn!("Collider on {:?} ignoring clock reading {}", owner, now_ms);
            return None;
        }
        if !self.throttle.try_fire(now_ms) {
            log::trace!("Collider on {:?} throttled at {}ms", owner, now_ms);
            return None;
        }

        if self.dirty.replace(false) {
            self.rebuild_candidates(owner, provider);
        }

        let current = match provider.compute_world_aabb(owner) {
            Some(owner_aabb) => self.overlapping(&owner_aabb, provider),
            None => {
                log::trace!("Collider owner {:?} has no bounds", owner);
                Vec::new()
            }
        };

        let report = CheckReport {
            exited: self
                .intersections
                .iter()
                .copied()
                .filter(|e| !current.contains(e))
                .collect(),
            entered: current
                .iter()
                .copied()
                .filter(|e| !self.intersections.contains(e))
                .collect(),
        };

        for &candidate in &report.exited {
            sink.emit(Event::hit_end(candidate, owner, now_ms));
        }
        for &candidate in &report.entered {
            sink.emit(Event::hit_start(candidate, owner, now_ms));
        }

        self.intersections = current;
        self.checks_run += 1;
        if !report.is_empty() {
            log::debug!(
                "Collider on {:?}: {} entered, {} exited",
                owner,
                report.entered.len(),
                report.exited.len()
            );
        }
        Some(report)
    }

    fn rebuild_candidates<P>(&mut self, owner: Entity, provider: &P)
    where
        P: SceneProvider + ?Sized,
    {
        self.candidates = provider
            .list_candidates(self.selector.as_ref())
            .into_iter()
            .filter(|&e| e != owner)
            .collect();
        log::trace!("Collider on {:?} tracks {} candidates", owner, self.candidates.len());
    }

    fn overlapping<P>(&mut self, owner_aabb: &AABB, provider: &P) -> Vec<Entity>
    where
        P: SceneProvider + ?Sized,
    {
        let mut current = Vec::new();
        for &candidate in &self.candidates {
            let aabb = match self.aabb_cache.get(&candidate) {
                Some(aabb) => *aabb,
                None => match provider.compute_world_aabb(candidate) {
                    Some(aabb) => *self.aabb_cache.entry(candidate).or_insert(aabb),
                    None => continue,
                },
            };
            if owner_aabb.intersects(&aabb) {
                current.push(candidate);
            }
        }
        current
    }

    /// Active options
    pub fn config(&self) -> &ColliderConfig {
        &self.config
    }

    /// Entity the collider is attached to
    pub fn owner(&self) -> Option<Entity> {
        self.attachment.as_ref().map(|a| a.owner)
    }

    /// Whether the collider is attached
    pub fn is_attached(&self) -> bool {
        self.attachment.is_some()
    }

    /// Whether the candidate list will be rebuilt on the next check
    pub fn is_dirty(&self) -> bool {
        self.dirty.get()
    }

    /// Candidate list as of the last rebuild
    pub fn candidates(&self) -> &[Entity] {
        &self.candidates
    }

    /// Candidates overlapping the owner as of the last check
    pub fn intersections(&self) -> &[Entity] {
        &self.intersections
    }

    /// Cached world bounds of a candidate
    pub fn cached_aabb(&self, entity: Entity) -> Option<&AABB> {
        self.aabb_cache.get(&entity)
    }

    /// Number of checks executed since creation
    pub fn checks_run(&self) -> u64 {
        self.checks_run
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::EventType;
    use crate::foundation::math::Vec3;
    use crate::scene::{Geometry, MutationBus, SceneMutation, SceneNode, SceneTree};

    fn cube(size: f32) -> Geometry {
        Geometry::Box { width: size, height: size, depth: size }
    }

    struct Fixture {
        scene: SceneTree,
        owner: Entity,
        a: Entity,
        b: Entity,
    }

    /// Owner spans [-1,1], A spans [0,2], B spans [5,6] on every axis
    fn fixture() -> Fixture {
        let mut scene = SceneTree::new();
        let root = scene.root();
        let owner = scene.spawn(root, SceneNode::entity().with_geometry(cube(2.0))).unwrap();
        let a = scene
            .spawn(root, SceneNode::entity().with_position(Vec3::new(1.0, 1.0, 1.0)).with_geometry(cube(2.0)))
            .unwrap();
        let b = scene
            .spawn(root, SceneNode::entity().with_position(Vec3::new(5.5, 5.5, 5.5)).with_geometry(cube(1.0)))
            .unwrap();
        Fixture { scene, owner, a, b }
    }

    fn collider(interval: f64) -> ProximityCollider {
        ProximityCollider::new(ColliderConfig {
            check_interval_ms: interval,
            ..Default::default()
        })
        .unwrap()
    }

    fn summary(events: &[Event]) -> Vec<(EventType, Entity)> {
        events.iter().map(|e| (e.event_type, e.target.unwrap())).collect()
    }

    #[test]
    fn test_defaults() {
        let config = ColliderConfig::default();
        assert_eq!(config.check_interval_ms, 80.0);
        assert_eq!(config.candidate_selector, None);

        let config = ColliderConfig::from_toml_str("candidate_selector = \".prop\"").unwrap();
        assert_eq!(config.check_interval_ms, 80.0);
        assert_eq!(config.candidate_selector.as_deref(), Some(".prop"));
    }

    #[test]
    fn test_invalid_options_rejected() {
        let negative = ColliderConfig { check_interval_ms: -1.0, ..Default::default() };
        assert!(matches!(
            ProximityCollider::new(negative),
            Err(ConfigError::InvalidValue { field: "check_interval_ms", .. })
        ));

        let nan = ColliderConfig { check_interval_ms: f64::NAN, ..Default::default() };
        assert!(ProximityCollider::new(nan).is_err());

        let malformed = ColliderConfig {
            candidate_selector: Some("a-scene ~ .prop".to_string()),
            ..Default::default()
        };
        assert!(matches!(
            ProximityCollider::new(malformed),
            Err(ConfigError::InvalidValue { field: "candidate_selector", .. })
        ));
    }

    #[test]
    fn test_enter_only_overlapping_candidate() {
        let mut f = fixture();
        let mut collider = collider(80.0);
        collider.on_attach(f.owner, &mut f.scene);

        let mut events: Vec<Event> = Vec::new();
        let report = collider.on_tick(0.0, &f.scene, &mut events).unwrap();

        assert_eq!(report.entered, vec![f.a]);
        assert!(report.exited.is_empty());
        assert_eq!(summary(&events), vec![(EventType::HitStart, f.a)]);
        assert_eq!(events[0].get_source(), Some(f.owner));
        assert_eq!(collider.intersections(), &[f.a]);
        assert!(collider.cached_aabb(f.b).is_some());
    }

    #[test]
    fn test_stale_candidate_bounds_are_kept() {
        let mut f = fixture();
        let mut collider = collider(80.0);
        collider.on_attach(f.owner, &mut f.scene);

        let mut events: Vec<Event> = Vec::new();
        collider.on_tick(0.0, &f.scene, &mut events);
        events.clear();

        // Moved to [10,12] but the cached bounds still say [0,2]
        f.scene.set_position(f.a, Vec3::new(11.0, 11.0, 11.0)).unwrap();
        assert!(collider.is_dirty());

        let report = collider.on_tick(100.0, &f.scene, &mut events).unwrap();
        assert!(report.is_empty());
        assert!(events.is_empty());
        assert_eq!(collider.intersections(), &[f.a]);
    }

    #[test]
    fn test_owner_bounds_recomputed_every_check() {
        let mut f = fixture();
        let mut collider = collider(0.0);
        collider.on_attach(f.owner, &mut f.scene);

        let mut events: Vec<Event> = Vec::new();
        collider.on_tick(0.0, &f.scene, &mut events);

        // Owner now spans [4.5,6.5]: leaves A, reaches B
        f.scene.set_position(f.owner, Vec3::new(5.5, 5.5, 5.5)).unwrap();
        events.clear();
        collider.on_tick(1.0, &f.scene, &mut events);

        assert_eq!(
            summary(&events),
            vec![(EventType::HitEnd, f.a), (EventType::HitStart, f.b)]
        );
    }

    #[test]
    fn test_exits_precede_enters() {
        let mut scene = SceneTree::new();
        let root = scene.root();
        let owner = scene.spawn(root, SceneNode::entity().with_geometry(cube(2.0))).unwrap();
        let near: Vec<Entity> = (0..2)
            .map(|_| scene.spawn(root, SceneNode::entity().with_geometry(cube(1.0))).unwrap())
            .collect();
        let far: Vec<Entity> = (0..2)
            .map(|_| {
                let node = SceneNode::entity().with_position(Vec3::new(20.0, 0.0, 0.0)).with_geometry(cube(1.0));
                scene.spawn(root, node).unwrap()
            })
            .collect();

        let mut collider = collider(0.0);
        collider.on_attach(owner, &mut scene);
        let mut events: Vec<Event> = Vec::new();
        collider.on_tick(0.0, &scene, &mut events);

        scene.set_position(owner, Vec3::new(20.0, 0.0, 0.0)).unwrap();
        events.clear();
        collider.on_tick(1.0, &scene, &mut events);

        assert_eq!(
            summary(&events),
            vec![
                (EventType::HitEnd, near[0]),
                (EventType::HitEnd, near[1]),
                (EventType::HitStart, far[0]),
                (EventType::HitStart, far[1]),
            ]
        );
    }

    #[test]
    fn test_throttle_skips_early_ticks() {
        let mut f = fixture();
        let mut collider = collider(80.0);
        collider.on_attach(f.owner, &mut f.scene);

        let mut events: Vec<Event> = Vec::new();
        assert!(collider.on_tick(1000.0, &f.scene, &mut events).is_some());
        assert!(collider.on_tick(1079.9, &f.scene, &mut events).is_none());
        assert!(collider.on_tick(1080.0, &f.scene, &mut events).is_some());
        assert!(collider.on_tick(1100.0, &f.scene, &mut events).is_none());
        assert_eq!(collider.checks_run(), 2);
    }

    #[test]
    fn test_bad_clock_reading_does_not_stall_checks() {
        let mut f = fixture();
        let mut collider = collider(80.0);
        collider.on_attach(f.owner, &mut f.scene);

        let mut events: Vec<Event> = Vec::new();
        assert!(collider.on_tick(f64::NAN, &f.scene, &mut events).is_none());
        assert_eq!(collider.checks_run(), 0);

        let report = collider.on_tick(1e9, &f.scene, &mut events).unwrap();
        assert_eq!(report.entered, vec![f.a]);
        assert_eq!(collider.checks_run(), 1);
    }

    #[test]
    fn test_skipped_tick_changes_nothing() {
        let mut f = fixture();
        let mut collider = collider(80.0);
        collider.on_attach(f.owner, &mut f.scene);

        let mut events: Vec<Event> = Vec::new();
        collider.on_tick(0.0, &f.scene, &mut events);
        f.scene.set_position(f.owner, Vec3::new(50.0, 0.0, 0.0)).unwrap();
        events.clear();

        assert!(collider.on_tick(40.0, &f.scene, &mut events).is_none());
        assert!(events.is_empty());
        assert!(collider.is_dirty());
        assert_eq!(collider.intersections(), &[f.a]);
    }

    #[test]
    fn test_owner_never_a_candidate() {
        let mut f = fixture();
        let mut collider = collider(0.0);
        collider.on_attach(f.owner, &mut f.scene);

        let mut events: Vec<Event> = Vec::new();
        collider.on_tick(0.0, &f.scene, &mut events);

        assert_eq!(collider.candidates(), &[f.a, f.b]);
        assert!(events.iter().all(|e| e.target != Some(f.owner)));
    }

    #[test]
    fn test_selector_limits_candidates() {
        let mut scene = SceneTree::new();
        let root = scene.root();
        let owner = scene.spawn(root, SceneNode::entity().with_geometry(cube(2.0))).unwrap();
        let group = scene.spawn(root, SceneNode::entity()).unwrap();
        let tagged = scene
            .spawn(group, SceneNode::entity().with_class("prop").with_geometry(cube(1.0)))
            .unwrap();
        scene.spawn(root, SceneNode::entity().with_geometry(cube(1.0))).unwrap();

        let mut collider = ProximityCollider::new(ColliderConfig {
            check_interval_ms: 0.0,
            candidate_selector: Some(".prop".to_string()),
        })
        .unwrap();
        collider.on_attach(owner, &mut scene);

        let mut events: Vec<Event> = Vec::new();
        collider.on_tick(0.0, &scene, &mut events);
        assert_eq!(collider.candidates(), &[tagged]);
        assert_eq!(summary(&events), vec![(EventType::HitStart, tagged)]);
    }

    #[test]
    fn test_descendant_selector_scopes_candidates() {
        let mut scene = SceneTree::new();
        let root = scene.root();
        let owner = scene.spawn(root, SceneNode::entity().with_geometry(cube(2.0))).unwrap();
        let room = scene.spawn(root, SceneNode::entity().with_class("room")).unwrap();
        let shelf = scene.spawn(room, SceneNode::entity()).unwrap();
        let inside = scene
            .spawn(shelf, SceneNode::entity().with_class("prop").with_geometry(cube(1.0)))
            .unwrap();
        scene
            .spawn(root, SceneNode::entity().with_class("prop").with_geometry(cube(1.0)))
            .unwrap();

        let mut collider = ProximityCollider::new(ColliderConfig {
            check_interval_ms: 0.0,
            candidate_selector: Some(".room .prop".to_string()),
        })
        .unwrap();
        collider.on_attach(owner, &mut scene);

        let mut events: Vec<Event> = Vec::new();
        collider.on_tick(0.0, &scene, &mut events);
        assert_eq!(collider.candidates(), &[inside]);
        assert_eq!(summary(&events), vec![(EventType::HitStart, inside)]);
    }

    #[test]
    fn test_candidate_without_bounds_is_retried() {
        let mut scene = SceneTree::new();
        let root = scene.root();
        let owner = scene.spawn(root, SceneNode::entity().with_geometry(cube(2.0))).unwrap();
        let empty = scene.spawn(root, SceneNode::entity()).unwrap();

        let mut collider = collider(0.0);
        collider.on_attach(owner, &mut scene);
        let mut events: Vec<Event> = Vec::new();
        collider.on_tick(0.0, &scene, &mut events);
        assert!(events.is_empty());
        assert!(collider.cached_aabb(empty).is_none());

        scene.set_geometry(empty, Some(cube(1.0))).unwrap();
        collider.on_tick(1.0, &scene, &mut events);
        assert_eq!(summary(&events), vec![(EventType::HitStart, empty)]);
        assert!(collider.cached_aabb(empty).is_some());
    }

    #[test]
    fn test_owner_without_bounds_intersects_nothing() {
        let mut f = fixture();
        let mut collider = collider(0.0);
        collider.on_attach(f.owner, &mut f.scene);

        let mut events: Vec<Event> = Vec::new();
        collider.on_tick(0.0, &f.scene, &mut events);
        f.scene.set_geometry(f.owner, None).unwrap();
        events.clear();
        collider.on_tick(1.0, &f.scene, &mut events);

        assert_eq!(summary(&events), vec![(EventType::HitEnd, f.a)]);
        assert!(collider.intersections().is_empty());
    }

    #[test]
    fn test_despawned_candidate_exits() {
        let mut f = fixture();
        let mut collider = collider(0.0);
        collider.on_attach(f.owner, &mut f.scene);

        let mut events: Vec<Event> = Vec::new();
        collider.on_tick(0.0, &f.scene, &mut events);
        f.scene.despawn(f.a).unwrap();
        events.clear();
        collider.on_tick(1.0, &f.scene, &mut events);

        assert_eq!(summary(&events), vec![(EventType::HitEnd, f.a)]);
        assert_eq!(collider.candidates(), &[f.b]);
    }

    /// Sink that mutates the scene while events are being emitted
    struct MutatingSink {
        bus: MutationBus,
        events: Vec<Event>,
    }

    impl EventSink for MutatingSink {
        fn emit(&mut self, event: Event) {
            self.bus.publish(&SceneMutation::Object3DSet { entity: Entity::default() });
            self.events.push(event);
        }
    }

    #[test]
    fn test_mutation_during_check_applies_next_cycle() {
        let mut f = fixture();
        let mut collider = collider(0.0);
        collider.on_attach(f.owner, &mut f.scene);

        let mut sink = MutatingSink { bus: f.scene.bus().clone(), events: Vec::new() };
        collider.on_tick(0.0, &f.scene, &mut sink);
        assert_eq!(sink.events.len(), 1);
        assert!(collider.is_dirty());

        collider.on_tick(1.0, &f.scene, &mut sink);
        assert!(!collider.is_dirty());
    }

    #[test]
    fn test_attach_and_detach_are_idempotent() {
        let mut f = fixture();
        let mut collider = collider(0.0);

        collider.on_attach(f.owner, &mut f.scene);
        collider.on_attach(f.a, &mut f.scene);
        assert_eq!(collider.owner(), Some(f.owner));
        assert_eq!(f.scene.bus().subscriber_count(), 1);

        let mut events: Vec<Event> = Vec::new();
        collider.on_tick(0.0, &f.scene, &mut events);

        collider.on_detach(&mut f.scene);
        collider.on_detach(&mut f.scene);
        assert!(!collider.is_attached());
        assert_eq!(f.scene.bus().subscriber_count(), 0);
        assert!(collider.candidates().is_empty());
        assert!(collider.intersections().is_empty());
        assert!(collider.cached_aabb(f.a).is_none());

        events.clear();
        assert!(collider.on_tick(500.0, &f.scene, &mut events).is_none());
        assert!(events.is_empty());
    }

    #[test]
    fn test_reattach_starts_fresh() {
        let mut f = fixture();
        let mut collider = collider(80.0);
        let mut events: Vec<Event> = Vec::new();

        collider.on_attach(f.owner, &mut f.scene);
        collider.on_tick(0.0, &f.scene, &mut events);
        collider.on_detach(&mut f.scene);
        collider.on_attach(f.owner, &mut f.scene);

        events.clear();
        assert!(collider.on_tick(10.0, &f.scene, &mut events).is_some());
        assert_eq!(summary(&events), vec![(EventType::HitStart, f.a)]);
    }

    #[test]
    fn test_dropping_collider_releases_observer() {
        let mut f = fixture();
        let mut collider = collider(80.0);
        collider.on_attach(f.owner, &mut f.scene);
        assert_eq!(f.scene.bus().subscriber_count(), 1);

        drop(collider);
        assert_eq!(f.scene.bus().subscriber_count(), 0);
    }

    #[test]
    fn test_reconfigure_keeps_overlaps() {
        let mut f = fixture();
        let mut collider = collider(0.0);
        collider.on_attach(f.owner, &mut f.scene);

        let mut events: Vec<Event> = Vec::new();
        collider.on_tick(0.0, &f.scene, &mut events);
        events.clear();

        collider
            .reconfigure(ColliderConfig { check_interval_ms: 10.0, candidate_selector: None })
            .unwrap();
        assert!(collider.is_dirty());
        collider.on_tick(10.0, &f.scene, &mut events);
        assert!(events.is_empty());
        assert_eq!(collider.intersections(), &[f.a]);

        let bad = ColliderConfig { check_interval_ms: -5.0, candidate_selector: None };
        assert!(collider.reconfigure(bad).is_err());
        assert_eq!(collider.config().check_interval_ms, 10.0);
    }
}
