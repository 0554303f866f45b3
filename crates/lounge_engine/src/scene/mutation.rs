//! Scene mutation notifications
//!
//! Observers subscribe with a callback and get back a [`Subscription`] handle.
//! Dropping the handle releases the observer, so teardown cannot leak it even
//! when an explicit unsubscribe is skipped.

use std::cell::RefCell;
use std::fmt;
use std::rc::{Rc, Weak};

use bitflags::bitflags;

use crate::ecs::Entity;
use super::SceneError;

bitflags! {
    /// Categories of scene mutation an observer can ask for
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct MutationKinds: u8 {
        /// Nodes added to or removed from the tree
        const CHILD_LIST = 1 << 0;
        /// Declarative attributes changed (transform, geometry, classes, components)
        const ATTRIBUTES = 1 << 1;
        /// A node gained or lost its renderable object
        const OBJECT3D = 1 << 2;
    }
}

/// A single change to the scene
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SceneMutation {
    /// `child` was attached under `parent`
    ChildAdded {
        /// New parent
        parent: Entity,
        /// Added node
        child: Entity,
    },
    /// `child` (and its subtree) was removed from `parent`
    ChildRemoved {
        /// Former parent
        parent: Entity,
        /// Removed node
        child: Entity,
    },
    /// A declarative attribute of `entity` changed
    AttributeChanged {
        /// Changed node
        entity: Entity,
        /// Attribute name
        attribute: String,
    },
    /// `entity` received a renderable object (geometry)
    Object3DSet {
        /// Changed node
        entity: Entity,
    },
    /// `entity` lost its renderable object
    Object3DRemoved {
        /// Changed node
        entity: Entity,
    },
}

impl SceneMutation {
    /// Category this mutation belongs to
    pub fn kind(&self) -> MutationKinds {
        match self {
            Self::ChildAdded { .. } | Self::ChildRemoved { .. } => MutationKinds::CHILD_LIST,
            Self::AttributeChanged { .. } => MutationKinds::ATTRIBUTES,
            Self::Object3DSet { .. } | Self::Object3DRemoved { .. } => MutationKinds::OBJECT3D,
        }
    }
}

/// Observer callback invoked synchronously for each matching mutation
pub type MutationCallback = Box<dyn FnMut(&SceneMutation)>;

type SharedCallback = Rc<RefCell<MutationCallback>>;

struct Subscriber {
    id: u64,
    kinds: MutationKinds,
    callback: SharedCallback,
}

#[derive(Default)]
struct BusInner {
    next_id: u64,
    subscribers: Vec<Subscriber>,
}

impl BusInner {
    fn remove(&mut self, id: u64) -> bool {
        let before = self.subscribers.len();
        self.subscribers.retain(|s| s.id != id);
        self.subscribers.len() != before
    }
}

/// Handle to a registered observer; releases it when dropped
pub struct Subscription {
    id: u64,
    bus: Weak<RefCell<BusInner>>,
}

impl Subscription {
    /// Identifier of the registration
    pub fn id(&self) -> u64 {
        self.id
    }

    /// Whether the observer is still registered
    pub fn is_active(&self) -> bool {
        self.bus
            .upgrade()
            .is_some_and(|bus| bus.borrow().subscribers.iter().any(|s| s.id == self.id))
    }
}

impl fmt::Debug for Subscription {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Subscription")
            .field("id", &self.id)
            .field("active", &self.is_active())
            .finish()
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        if let Some(bus) = self.bus.upgrade() {
            if let Ok(mut inner) = bus.try_borrow_mut() {
                inner.remove(self.id);
            }
        }
    }
}

/// Synchronous fan-out of scene mutations to observers
#[derive(Clone, Default)]
pub struct MutationBus {
    inner: Rc<RefCell<BusInner>>,
}

impl MutationBus {
    /// Create a bus with no observers
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an observer for the given kinds of mutation
    pub fn subscribe(&self, kinds: MutationKinds, callback: MutationCallback) -> Subscription {
        let mut inner = self.inner.borrow_mut();
        inner.next_id += 1;
        let id = inner.next_id;
        inner.subscribers.push(Subscriber {
            id,
            kinds,
            callback: Rc::new(RefCell::new(callback)),
        });
        log::trace!("Mutation observer {} subscribed ({:?})", id, kinds);

        Subscription {
            id,
            bus: Rc::downgrade(&self.inner),
        }
    }

    /// Release an observer explicitly
    pub fn unsubscribe(&self, subscription: Subscription) -> Result<(), SceneError> {
        let id = subscription.id;
        if !Weak::ptr_eq(&subscription.bus, &Rc::downgrade(&self.inner)) {
            return Err(SceneError::UnknownSubscription(id));
        }
        let removed = self
            .inner
            .try_borrow_mut()
            .map_err(|_| SceneError::UnknownSubscription(id))?
            .remove(id);
        if removed {
            log::trace!("Mutation observer {} unsubscribed", id);
            Ok(())
        } else {
            Err(SceneError::UnknownSubscription(id))
        }
    }

    /// Number of registered observers
    pub fn subscriber_count(&self) -> usize {
        self.inner.borrow().subscribers.len()
    }

    /// Deliver a mutation to every observer interested in its kind.
    ///
    /// An observer that publishes from inside its own callback does not
    /// receive the nested mutation.
    pub fn publish(&self, mutation: &SceneMutation) {
        let kind = mutation.kind();
        let targets: Vec<(u64, SharedCallback)> = self
            .inner
            .borrow()
            .subscribers
            .iter()
            .filter(|s| s.kinds.intersects(kind))
            .map(|s| (s.id, Rc::clone(&s.callback)))
            .collect();

        for (id, callback) in targets {
            let still_registered = self.inner.borrow().subscribers.iter().any(|s| s.id == id);
            if !still_registered {
                continue;
            }
            match callback.try_borrow_mut() {
                Ok(mut callback) => (*callback)(mutation),
                Err(_) => log::trace!("Skipping re-entrant delivery to observer {}", id),
            }
        }
    }
}

impl fmt::Debug for MutationBus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MutationBus")
            .field("subscribers", &self.subscriber_count())
            .finish()
    }
}
