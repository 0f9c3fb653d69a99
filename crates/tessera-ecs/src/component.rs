use std::any::Any;

use tessera_core::ComponentId;

use crate::entity::Entity;

/// Marker trait for types that can be stored as components.
pub trait Component: 'static + Send + Sync {}

/// Blanket implementation: any `'static + Send + Sync` type is a valid component.
impl<T: 'static + Send + Sync> Component for T {}

/// Type-erased view of a [`ComponentStore`], used where the concrete type is
/// only known by its archetype bit (entity deletion, clears, diagnostics).
pub(crate) trait ComponentStorage: Any + Send + Sync {
    fn as_any(&self) -> &dyn Any;
    fn as_any_mut(&mut self) -> &mut dyn Any;
    fn remove(&mut self, entity: Entity) -> bool;
    fn clear(&mut self);
    fn owners(&self) -> &[Entity];
    fn len(&self) -> usize;
    fn id_map_len(&self) -> usize;
}

/// Dense storage for one component type.
///
/// Values live contiguously in insertion order until a removal, which moves the
/// last value into the vacated slot. Slot positions and iteration order are
/// therefore not stable across removals.
pub struct ComponentStore<T> {
    /// Maps entity index to dense slot. `None` means the entity owns no `T`.
    sparse: Vec<Option<u32>>,
    dense: Vec<T>,
    /// Owning entity of each dense slot, including its generation.
    owners: Vec<Entity>,
    ids: Vec<ComponentId>,
}

impl<T: Component> ComponentStore<T> {
    pub(crate) fn with_capacity(capacity: usize) -> Self {
        Self {
            sparse: Vec::new(),
            dense: Vec::with_capacity(capacity),
            owners: Vec::with_capacity(capacity),
            ids: Vec::with_capacity(capacity),
        }
    }

    fn slot_of(&self, entity: Entity) -> Option<usize> {
        let slot = (*self.sparse.get(entity.index as usize)?)? as usize;
        (self.owners[slot] == entity).then_some(slot)
    }

    /// Append a value for an entity that does not own a `T` yet.
    pub(crate) fn push(&mut self, entity: Entity, id: ComponentId, value: T) {
        let idx = entity.index as usize;
        if idx >= self.sparse.len() {
            self.sparse.resize(idx + 1, None);
        }
        debug_assert!(self.sparse[idx].is_none(), "slot for {entity:?} already mapped");
        self.sparse[idx] = Some(self.dense.len() as u32);
        self.dense.push(value);
        self.owners.push(entity);
        self.ids.push(id);
    }

    /// Overwrite the value an entity already owns. Returns the previous value.
    pub(crate) fn replace(&mut self, entity: Entity, id: ComponentId, value: T) -> Option<T> {
        let slot = self.slot_of(entity)?;
        self.ids[slot] = id;
        Some(std::mem::replace(&mut self.dense[slot], value))
    }

    /// Remove and return the value owned by `entity`, swapping the last value
    /// into its slot.
    pub(crate) fn take(&mut self, entity: Entity) -> Option<T> {
        let slot = self.slot_of(entity)?;
        self.sparse[entity.index as usize] = None;

        let last = self.dense.len() - 1;
        if slot != last {
            let moved = self.owners[last];
            self.sparse[moved.index as usize] = Some(slot as u32);
        }
        self.owners.swap_remove(slot);
        self.ids.swap_remove(slot);
        Some(self.dense.swap_remove(slot))
    }

    pub fn contains(&self, entity: Entity) -> bool {
        self.slot_of(entity).is_some()
    }

    pub fn get(&self, entity: Entity) -> Option<&T> {
        self.slot_of(entity).map(|slot| &self.dense[slot])
    }

    pub fn get_mut(&mut self, entity: Entity) -> Option<&mut T> {
        self.slot_of(entity).map(|slot| &mut self.dense[slot])
    }

    /// The identity issued to the value `entity` currently owns.
    pub fn component_id(&self, entity: Entity) -> Option<ComponentId> {
        self.slot_of(entity).map(|slot| self.ids[slot])
    }

    /// All values in current storage order.
    pub fn as_slice(&self) -> &[T] {
        &self.dense
    }

    pub fn as_mut_slice(&mut self) -> &mut [T] {
        &mut self.dense
    }

    /// Iterate over all (owner, &component) pairs in storage order.
    pub fn iter(&self) -> impl Iterator<Item = (Entity, &T)> {
        self.owners.iter().copied().zip(self.dense.iter())
    }

    /// Iterate over all (owner, &mut component) pairs in storage order.
    pub fn iter_mut(&mut self) -> impl Iterator<Item = (Entity, &mut T)> {
        self.owners.iter().copied().zip(self.dense.iter_mut())
    }

    /// Number of components stored.
    pub fn len(&self) -> usize {
        self.dense.len()
    }

    pub fn is_empty(&self) -> bool {
        self.dense.is_empty()
    }
}

impl<T: Component> ComponentStorage for ComponentStore<T> {
    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }

    fn remove(&mut self, entity: Entity) -> bool {
        self.take(entity).is_some()
    }

    fn clear(&mut self) {
        for owner in &self.owners {
            self.sparse[owner.index as usize] = None;
        }
        self.dense.clear();
        self.owners.clear();
        self.ids.clear();
    }

    fn owners(&self) -> &[Entity] {
        &self.owners
    }

    fn len(&self) -> usize {
        self.dense.len()
    }

    /// Counted from the sparse map itself so a leaked entry shows up.
    fn id_map_len(&self) -> usize {
        self.sparse.iter().filter(|s| s.is_some()).count()
    }
}
