//! Lounge demo application
//!
//! Builds a lounge with a plinth, drops a rig at the entry point, and walks
//! it across the room while the collider reports what it bumps into.
//!
//! Usage: `lounge_demo [lounge.toml | lounge.ron]`

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use lounge_engine::prelude::*;

/// Simulated frame length in milliseconds
const FRAME_MS: f64 = 16.0;
/// Frames the walk takes
const WALK_FRAMES: u32 = 150;

#[derive(thiserror::Error, Debug)]
enum DemoError {
    #[error("Component error: {0}")]
    Component(#[from] ComponentError),

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Scene error: {0}")]
    Scene(#[from] SceneError),
}

/// Logs hit events with readable names
struct HitLogger {
    labels: Rc<RefCell<HashMap<Entity, String>>>,
    hits: Rc<RefCell<u32>>,
}

impl HitLogger {
    fn label(&self, entity: Option<Entity>) -> String {
        entity
            .and_then(|e| self.labels.borrow().get(&e).cloned())
            .unwrap_or_else(|| format!("{entity:?}"))
    }
}

impl EventHandler for HitLogger {
    fn on_event(&mut self, event: &Event) -> bool {
        log::info!(
            "[{:>6.0}ms] {} -> {} ({})",
            event.timestamp,
            self.label(event.get_source()),
            self.label(event.target),
            event.event_type.name()
        );
        *self.hits.borrow_mut() += 1;
        false
    }
}

fn load_lounge_config() -> Result<LoungeConfig, ConfigError> {
    match std::env::args().nth(1) {
        Some(path) => {
            log::info!("Loading lounge options from {}", path);
            LoungeConfig::load_from_file(&path)
        }
        None => Ok(LoungeConfig {
            south: WallKind::Glass,
            west: WallKind::Barrier,
            ..Default::default()
        }),
    }
}

fn run() -> Result<u32, DemoError> {
    let lounge_config = load_lounge_config()?;
    let mut world = World::new();
    let root = world.scene().root();

    let labels = Rc::new(RefCell::new(HashMap::new()));
    let hits = Rc::new(RefCell::new(0));
    for event_type in [EventType::HitStart, EventType::HitEnd] {
        let logger = HitLogger {
            labels: Rc::clone(&labels),
            hits: Rc::clone(&hits),
        };
        world.events_mut().register_handler(event_type, Box::new(logger));
    }

    let room = world.scene_mut().spawn(root, SceneNode::entity().with_id("lounge"))?;
    world.attach(room, Box::new(Lounge::new(lounge_config)))?;

    let plinth = world.scene_mut().spawn(
        room,
        SceneNode::entity()
            .with_id("plinth")
            .with_position(Vec3::new(2.0, 0.0, -1.0)),
    )?;
    world.attach(plinth, Box::new(Plinth::new(PlinthConfig::default())))?;
    world.attach(plinth, Box::new(StayDown::new()))?;
    labels.borrow_mut().insert(plinth, "plinth".to_string());

    let rig = world.scene_mut().spawn(
        root,
        SceneNode::entity()
            .with_id("rig")
            .with_geometry(Geometry::Box { width: 0.5, height: 1.8, depth: 0.5 }),
    )?;
    world.attach(rig, Box::new(EntryPoint::new(EntryPointConfig::default())))?;
    let collider = ColliderConfig {
        candidate_selector: Some("[lounge-plinth]".to_string()),
        ..Default::default()
    };
    world.attach(rig, Box::new(ColliderComponent::new(collider)?))?;
    labels.borrow_mut().insert(rig, "rig".to_string());

    let start = world.scene().world_position(rig)?;
    let end = start + Vec3::new(4.0, 0.0, -4.75);
    log::info!("Rig enters at {:?}, walking to {:?}", start, end);

    for frame in 0..=WALK_FRAMES {
        let t = frame as f32 / WALK_FRAMES as f32;
        world.scene_mut().set_position(rig, start.lerp(&end, t))?;
        world.tick(f64::from(frame) * FRAME_MS)?;
    }

    let hits = *hits.borrow();
    Ok(hits)
}

fn main() {
    lounge_engine::foundation::logging::init_with_default("info");

    log::info!("Starting lounge demo");

    match run() {
        Ok(hits) => log::info!("Walk finished with {} hit events", hits),
        Err(err) => {
            log::error!("Demo failed: {}", err);
            std::process::exit(1);
        }
    }
}
