use std::fmt;

use tracing::debug;

use crate::archetype::{ComponentBit, ComponentMask};

/// A generational entity handle.
///
/// Slots are recycled after deletion, but each reuse bumps the generation, so a
/// handle captured before deletion never resolves against the slot's next owner.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Entity {
    pub(crate) index: u32,
    pub(crate) generation: u32,
}

impl Entity {
    /// Create an entity from raw parts (mainly for testing).
    pub fn from_raw(index: u32, generation: u32) -> Self {
        Self { index, generation }
    }

    /// The slot index of this entity.
    pub fn index(&self) -> u32 {
        self.index
    }

    /// The generation of this entity (incremented on reuse).
    pub fn generation(&self) -> u32 {
        self.generation
    }
}

impl fmt::Debug for Entity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Entity({}v{})", self.index, self.generation)
    }
}

impl fmt::Display for Entity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}v{}", self.index, self.generation)
    }
}

struct Slot {
    generation: u32,
    /// `None` while the slot is free.
    archetype: Option<ComponentMask>,
}

/// Owns entity identities and the archetype mask of each live entity.
pub(crate) struct EntityRegistry {
    slots: Vec<Slot>,
    free_list: Vec<u32>,
    live: usize,
}

impl EntityRegistry {
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            slots: Vec::with_capacity(capacity),
            free_list: Vec::new(),
            live: 0,
        }
    }

    /// Allocate an entity with an empty mask, reusing a freed slot if available.
    pub fn allocate(&mut self) -> Entity {
        self.live += 1;
        if let Some(index) = self.free_list.pop() {
            let slot = &mut self.slots[index as usize];
            slot.archetype = Some(ComponentMask::EMPTY);
            Entity {
                index,
                generation: slot.generation,
            }
        } else {
            let index = self.slots.len() as u32;
            self.slots.push(Slot {
                generation: 0,
                archetype: Some(ComponentMask::EMPTY),
            });
            Entity {
                index,
                generation: 0,
            }
        }
    }

    /// Release an entity, returning the mask it held. `None` if it was not alive.
    ///
    /// A slot whose generation is exhausted is retired instead of recycled, so a
    /// generation value is never handed out twice for the same index.
    pub fn release(&mut self, entity: Entity) -> Option<ComponentMask> {
        let slot = self.live_slot_mut(entity)?;
        let mask = slot.archetype.take();
        let next_generation = slot.generation.checked_add(1);
        if let Some(next) = next_generation {
            slot.generation = next;
        }
        self.live -= 1;
        match next_generation {
            Some(_) => {
                self.free_list.push(entity.index);
            }
            None => debug!("Retiring entity slot {} after final generation", entity.index),
        }
        mask
    }

    pub fn is_alive(&self, entity: Entity) -> bool {
        self.archetype(entity).is_some()
    }

    pub fn archetype(&self, entity: Entity) -> Option<ComponentMask> {
        self.slots
            .get(entity.index as usize)
            .filter(|slot| slot.generation == entity.generation)
            .and_then(|slot| slot.archetype)
    }

    pub fn set_bit(&mut self, entity: Entity, bit: ComponentBit) -> bool {
        match self.live_slot_mut(entity).and_then(|s| s.archetype.as_mut()) {
            Some(mask) => {
                mask.set(bit);
                true
            }
            None => false,
        }
    }

    pub fn unset_bit(&mut self, entity: Entity, bit: ComponentBit) {
        if let Some(mask) = self.live_slot_mut(entity).and_then(|s| s.archetype.as_mut()) {
            mask.unset(bit);
        }
    }

    /// The live entity at a slot index, if any.
    pub fn live_at(&self, index: u32) -> Option<(Entity, ComponentMask)> {
        let slot = self.slots.get(index as usize)?;
        let mask = slot.archetype?;
        Some((
            Entity {
                index,
                generation: slot.generation,
            },
            mask,
        ))
    }

    /// Upper bound (exclusive) of slot indices ever handed out.
    pub fn slot_count(&self) -> u32 {
        self.slots.len() as u32
    }

    pub fn len(&self) -> usize {
        self.live
    }

    fn live_slot_mut(&mut self, entity: Entity) -> Option<&mut Slot> {
        self.slots
            .get_mut(entity.index as usize)
            .filter(|slot| slot.generation == entity.generation && slot.archetype.is_some())
    }
}

impl Default for EntityRegistry {
    fn default() -> Self {
        Self::with_capacity(0)
    }
}
