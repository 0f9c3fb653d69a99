//! Tessera ECS - Entity/component storage
//!
//! Dense per-type component stores indexed by generational entity handles,
//! archetype bitmasks recording which types each entity owns, and lazy
//! multi-type queries that filter entities with a single mask comparison.
//!
//! All operations are single-threaded and synchronous. Storage order inside a
//! component store is not stable: destroying a component moves the last one
//! into its slot.

mod archetype;
mod builder;
mod comp_ref;
mod component;
mod entity;
mod error;
pub mod global;
mod query;
mod world;

pub use archetype::{ComponentBit, ComponentMask, MAX_COMPONENT_TYPES};
pub use builder::EntityBuilder;
pub use comp_ref::CompRef;
pub use component::{Component, ComponentStore};
pub use entity::Entity;
pub use error::EcsError;
pub use query::{ComponentSet, EntitiesWith, EntityRef, Query};
pub use tessera_core::{ComponentId, DuplicatePolicy, WorldConfig};
pub use world::World;
