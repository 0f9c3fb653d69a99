//! Process-wide world for callers that want a single shared instance.
//!
//! Nothing in this crate depends on it; an explicitly owned [`World`] is the
//! primary way to use the library.

use std::sync::OnceLock;

use parking_lot::{Mutex, MutexGuard};

use crate::world::World;

static WORLD: OnceLock<Mutex<World>> = OnceLock::new();

/// Lock the shared world, creating it with the default configuration on first use.
pub fn world() -> MutexGuard<'static, World> {
    WORLD.get_or_init(|| Mutex::new(World::new())).lock()
}
