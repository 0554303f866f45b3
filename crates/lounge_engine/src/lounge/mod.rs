//! Lounge scene components
//!
//! A lounge is a walled room built from declarative options: the `lounge`
//! component creates an inner entity and attaches floor, wall, and ceiling
//! components to it. Plinths, stay-down markers, and entry points place
//! other entities relative to the room.
//!
//! ```text
//! [lounge]
//!   └─ a-entity  [lounge-floor] [lounge-wall__north] ... [lounge-ceiling]
//!        ├─ a-plane.lounge-floor
//!        ├─ a-box.lounge-wall
//!        └─ a-plane.lounge-ceiling
//! ```

mod ceiling;
mod entry_point;
mod floor;
mod plinth;
mod room;
mod staydown;
mod wall;

pub use ceiling::{Ceiling, CeilingConfig};
pub use entry_point::{EntryPoint, EntryPointConfig};
pub use floor::{Floor, FloorConfig};
pub use plinth::{Plinth, PlinthConfig};
pub use room::{Lounge, LoungeConfig, LoungeLayout, WallKind};
pub use staydown::StayDown;
pub use wall::{Wall, WallConfig, WallFacing};

/// Component name of the room
pub const LOUNGE: &str = "lounge";
/// Component name of the floor
pub const FLOOR: &str = "lounge-floor";
/// Component name of the ceiling
pub const CEILING: &str = "lounge-ceiling";
/// Base component name of walls; instances are `lounge-wall__<facing>`
pub const WALL: &str = "lounge-wall";
/// Component name of plinths
pub const PLINTH: &str = "lounge-plinth";
/// Component name of the stay-down marker
pub const STAYDOWN: &str = "lounge-staydown";
/// Component name of the entry point
pub const ENTRY_POINT: &str = "lounge-entry-point";

/// Surface color used when nothing else is configured
pub const DEFAULT_SURFACE_COLOR: &str = "#808080";

/// `None` for missing or blank option strings
pub(crate) fn non_blank(value: &Option<String>) -> Option<String> {
    value.as_deref().filter(|v| !v.trim().is_empty()).map(str::to_string)
}
