//! Entity implementation

use slotmap::Key;

slotmap::new_key_type! {
    /// Entity identifier
    ///
    /// Generational handle to a scene node. A despawned entity's handle never
    /// aliases a node spawned later.
    pub struct Entity;
}

impl Entity {
    /// Stable numeric form of the handle, for logging
    pub fn id(&self) -> u64 {
        self.data().as_ffi()
    }
}
