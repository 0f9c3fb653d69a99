use std::fmt;
use std::hash::{Hash, Hasher};
use std::marker::PhantomData;

use crate::component::Component;
use crate::entity::Entity;
use crate::world::World;

/// A weak, typed reference to the `T` owned by some entity.
///
/// Only the owner's handle is stored. Every dereference looks the component up
/// again, so once the component or its owner is destroyed the reference
/// resolves to `None`; a reused entity slot carries a new generation and is not
/// mistaken for the old owner. Equality compares targets only.
pub struct CompRef<T> {
    target: Option<Entity>,
    _marker: PhantomData<fn() -> T>,
}

impl<T> CompRef<T> {
    pub fn new(target: Entity) -> Self {
        Self {
            target: Some(target),
            _marker: PhantomData,
        }
    }

    /// A reference that points at nothing.
    pub fn unset() -> Self {
        Self {
            target: None,
            _marker: PhantomData,
        }
    }

    pub fn target(&self) -> Option<Entity> {
        self.target
    }

    pub fn is_set(&self) -> bool {
        self.target.is_some()
    }

    pub fn set(&mut self, target: Entity) {
        self.target = Some(target);
    }

    pub fn reset(&mut self) {
        self.target = None;
    }
}

impl<T: Component> CompRef<T> {
    /// Resolve the reference against `world`.
    pub fn get<'w>(&self, world: &'w World) -> Option<&'w T> {
        world.get::<T>(self.target?)
    }

    pub fn get_mut<'w>(&self, world: &'w mut World) -> Option<&'w mut T> {
        world.get_mut::<T>(self.target?)
    }

    /// Whether the referenced component currently exists.
    pub fn is_live(&self, world: &World) -> bool {
        self.target.is_some_and(|e| world.has::<T>(e))
    }
}

impl<T> Default for CompRef<T> {
    fn default() -> Self {
        Self::unset()
    }
}

impl<T> From<Entity> for CompRef<T> {
    fn from(target: Entity) -> Self {
        Self::new(target)
    }
}

impl<T> Clone for CompRef<T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for CompRef<T> {}

impl<T> PartialEq for CompRef<T> {
    fn eq(&self, other: &Self) -> bool {
        self.target == other.target
    }
}

impl<T> Eq for CompRef<T> {}

impl<T> PartialEq<Entity> for CompRef<T> {
    fn eq(&self, other: &Entity) -> bool {
        self.target == Some(*other)
    }
}

impl<T> Hash for CompRef<T> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.target.hash(state);
    }
}

impl<T> fmt::Debug for CompRef<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.target {
            Some(target) => write!(f, "CompRef<{}>({})", std::any::type_name::<T>(), target),
            None => write!(f, "CompRef<{}>(unset)", std::any::type_name::<T>()),
        }
    }
}
