use std::any::type_name;

use tessera_core::{ComponentId, DuplicatePolicy, IdAllocator, WorldConfig};
use tracing::{debug, warn};

use crate::archetype::{ComponentBit, ComponentBits, ComponentMask};
use crate::builder::EntityBuilder;
use crate::component::{Component, ComponentStorage, ComponentStore};
use crate::entity::{Entity, EntityRegistry};
use crate::error::EcsError;
use crate::query::{ComponentSet, EntitiesWith, EntityRef, Query};

/// The central container. Owns entity identities, their archetype masks and one
/// dense store per component type.
///
/// Bit `i` of an entity's mask is set exactly when the store assigned bit `i`
/// holds a component owned by that entity.
pub struct World {
    config: WorldConfig,
    pub(crate) entities: EntityRegistry,
    pub(crate) bits: ComponentBits,
    /// Indexed by `ComponentBit`.
    storages: Vec<Box<dyn ComponentStorage>>,
    component_ids: IdAllocator,
}

fn downcast<T: Component>(storage: &dyn ComponentStorage) -> &ComponentStore<T> {
    storage
        .as_any()
        .downcast_ref::<ComponentStore<T>>()
        .expect("component type mismatch")
}

fn downcast_mut<T: Component>(storage: &mut dyn ComponentStorage) -> &mut ComponentStore<T> {
    storage
        .as_any_mut()
        .downcast_mut::<ComponentStore<T>>()
        .expect("component type mismatch")
}

impl World {
    pub fn new() -> Self {
        Self::with_config(WorldConfig::default())
    }

    pub fn with_config(config: WorldConfig) -> Self {
        Self {
            entities: EntityRegistry::with_capacity(config.entity_capacity),
            bits: ComponentBits::new(),
            storages: Vec::new(),
            component_ids: IdAllocator::new(),
            config,
        }
    }

    pub fn config(&self) -> &WorldConfig {
        &self.config
    }

    // ---- Entity management ----

    /// Allocate a fresh entity with an empty mask and return a builder for it.
    pub fn new_entity(&mut self) -> EntityBuilder<'_> {
        let entity = self.entities.allocate();
        EntityBuilder::new(self, entity)
    }

    /// Delete an entity, destroying every component its mask records.
    ///
    /// Deleting an entity that is not alive (including a second delete of the
    /// same handle) is reported as [`EcsError::NoSuchEntity`].
    pub fn delete_entity(&mut self, entity: Entity) -> Result<(), EcsError> {
        let Some(mask) = self.entities.archetype(entity) else {
            warn!("Attempted to delete dead entity {}", entity);
            return Err(EcsError::NoSuchEntity(entity));
        };
        for bit in mask.iter() {
            if let Some(storage) = self.storages.get_mut(bit.index()) {
                storage.remove(entity);
            }
        }
        self.entities.release(entity);
        debug!("Deleted entity {} ({} components)", entity, mask.len());
        Ok(())
    }

    /// Check whether an entity is alive.
    pub fn is_alive(&self, entity: Entity) -> bool {
        self.entities.is_alive(entity)
    }

    /// Number of alive entities.
    pub fn entity_count(&self) -> usize {
        self.entities.len()
    }

    /// The entity's current archetype mask, or `None` if it is not alive.
    pub fn archetype_bits(&self, entity: Entity) -> Option<ComponentMask> {
        self.entities.archetype(entity)
    }

    /// The bit assigned to `T`, if `T` has ever been attached in this world.
    pub fn component_bit<T: Component>(&self) -> Option<ComponentBit> {
        self.bits.of::<T>()
    }

    /// Number of component types that have been assigned a bit.
    pub fn component_type_count(&self) -> usize {
        self.bits.len()
    }

    // ---- Component management ----

    fn register<T: Component>(&mut self) -> Result<ComponentBit, EcsError> {
        if let Some(bit) = self.bits.of::<T>() {
            return Ok(bit);
        }
        let bit = self
            .bits
            .register::<T>()
            .ok_or(EcsError::TooManyComponentTypes(type_name::<T>()))?;
        debug_assert_eq!(bit.index(), self.storages.len());
        self.storages
            .push(Box::new(ComponentStore::<T>::with_capacity(self.config.component_capacity)));
        debug!("Registered component `{}` as bit {}", type_name::<T>(), bit.index());
        Ok(bit)
    }

    /// Read-only access to the store for `T`.
    pub fn store<T: Component>(&self) -> Option<&ComponentStore<T>> {
        let bit = self.bits.of::<T>()?;
        Some(downcast::<T>(self.storages[bit.index()].as_ref()))
    }

    fn store_mut<T: Component>(&mut self) -> Option<&mut ComponentStore<T>> {
        let bit = self.bits.of::<T>()?;
        Some(downcast_mut::<T>(self.storages[bit.index()].as_mut()))
    }

    /// Attach a component and return its owner.
    ///
    /// With `owner == None` a fresh entity is allocated to own the value. A
    /// second `T` for the same owner follows the configured [`DuplicatePolicy`].
    pub fn add_component<T: Component>(
        &mut self,
        owner: Option<Entity>,
        value: T,
    ) -> Result<Entity, EcsError> {
        if let Some(entity) = owner.filter(|e| !self.entities.is_alive(*e)) {
            warn!("Cannot add `{}` to dead entity {}", type_name::<T>(), entity);
            return Err(EcsError::NoSuchEntity(entity));
        }
        let bit = self.register::<T>()?;
        let entity = match owner {
            Some(entity) => entity,
            None => self.entities.allocate(),
        };

        let store = downcast_mut::<T>(self.storages[bit.index()].as_mut());
        if store.contains(entity) {
            match self.config.duplicate_policy {
                DuplicatePolicy::Reject => {
                    warn!("Rejected duplicate `{}` on entity {}", type_name::<T>(), entity);
                    return Err(EcsError::DuplicateComponent {
                        entity,
                        component: type_name::<T>(),
                    });
                }
                DuplicatePolicy::Replace => {
                    store.replace(entity, self.component_ids.next_id(), value);
                }
            }
        } else {
            store.push(entity, self.component_ids.next_id(), value);
            self.entities.set_bit(entity, bit);
        }
        Ok(entity)
    }

    /// Get an immutable reference to a component on an entity.
    pub fn get<T: Component>(&self, entity: Entity) -> Option<&T> {
        self.store::<T>()?.get(entity)
    }

    /// Get a mutable reference to a component on an entity.
    pub fn get_mut<T: Component>(&mut self, entity: Entity) -> Option<&mut T> {
        self.store_mut::<T>()?.get_mut(entity)
    }

    /// Check whether an entity has a component of the given type.
    pub fn has<T: Component>(&self, entity: Entity) -> bool {
        self.store::<T>().is_some_and(|s| s.contains(entity))
    }

    /// Identity of the `T` instance an entity currently owns.
    pub fn component_id<T: Component>(&self, entity: Entity) -> Option<ComponentId> {
        self.store::<T>()?.component_id(entity)
    }

    /// Every live `T` in storage order. The order changes whenever a `T` is
    /// destroyed, so positions must not be remembered across mutations.
    pub fn components<T: Component>(&self) -> &[T] {
        match self.store::<T>() {
            Some(store) => store.as_slice(),
            None => &[],
        }
    }

    /// Mutable view of every live `T`. The borrow on the world rules out adding
    /// or destroying components while the slice is held.
    pub fn components_mut<T: Component>(&mut self) -> &mut [T] {
        match self.store_mut::<T>() {
            Some(store) => store.as_mut_slice(),
            None => &mut [],
        }
    }

    /// Number of live `T` instances.
    pub fn count<T: Component>(&self) -> usize {
        self.store::<T>().map_or(0, |s| s.len())
    }

    /// Remove and return the `T` owned by an entity.
    pub fn take_component<T: Component>(&mut self, entity: Entity) -> Option<T> {
        let bit = self.bits.of::<T>()?;
        let value = downcast_mut::<T>(self.storages[bit.index()].as_mut()).take(entity)?;
        self.entities.unset_bit(entity, bit);
        Some(value)
    }

    /// Destroy the `T` owned by an entity. Returns `true` if one was removed.
    pub fn destroy_component<T: Component>(&mut self, entity: Entity) -> bool {
        self.take_component::<T>(entity).is_some()
    }

    /// Remove every `T` and clear its bit on the former owners.
    pub fn clear<T: Component>(&mut self) {
        let Some(bit) = self.bits.of::<T>() else {
            return;
        };
        let storage = &mut self.storages[bit.index()];
        let cleared = storage.len();
        for owner in storage.owners() {
            self.entities.unset_bit(*owner, bit);
        }
        storage.clear();
        debug!("Cleared {} `{}` components", cleared, type_name::<T>());
    }

    /// Total identity-map entries across every component type. Equals the sum
    /// of all per-type counts; zero once every type has been cleared.
    pub fn id_map_count(&self) -> usize {
        self.storages.iter().map(|s| s.id_map_len()).sum()
    }

    // ---- Queries ----

    /// Lazily yield every live entity owning all component types in `Q`.
    ///
    /// # Example
    /// ```ignore
    /// for entity in world.entities_with::<(Position, Velocity)>() {
    ///     let (pos, vel) = entity.components::<(Position, Velocity)>();
    /// }
    /// ```
    pub fn entities_with<Q: ComponentSet>(&self) -> EntitiesWith<'_> {
        Query::<Q>::new().iter(self)
    }

    /// A view of a single live entity.
    pub fn entity(&self, entity: Entity) -> Option<EntityRef<'_>> {
        self.is_alive(entity).then(|| EntityRef::new(self, entity))
    }
}

impl Default for World {
    fn default() -> Self {
        Self::new()
    }
}
