use std::marker::PhantomData;

use crate::archetype::ComponentMask;
use crate::component::Component;
use crate::entity::Entity;
use crate::world::World;

/// A set of component types, written as a tuple: `(Position,)`,
/// `(Position, Velocity)`, up to eight types.
pub trait ComponentSet: 'static {
    /// One `Option<&T>` per type in the set.
    type Refs<'w>;

    /// OR of the bits of every type in the set. `None` if some type has never
    /// been attached in `world`, in which case nothing can match.
    fn required_mask(world: &World) -> Option<ComponentMask>;

    fn fetch(world: &World, entity: Entity) -> Self::Refs<'_>;
}

macro_rules! impl_component_set_tuple {
    ($($name:ident),+) => {
        impl<$($name: Component),+> ComponentSet for ($($name,)+) {
            type Refs<'w> = ($(Option<&'w $name>,)+);

            fn required_mask(world: &World) -> Option<ComponentMask> {
                let mut mask = ComponentMask::EMPTY;
                $(mask.set(world.bits.of::<$name>()?);)+
                Some(mask)
            }

            fn fetch(world: &World, entity: Entity) -> Self::Refs<'_> {
                ($(world.get::<$name>(entity),)+)
            }
        }
    };
}

impl_component_set_tuple!(A);
impl_component_set_tuple!(A, B);
impl_component_set_tuple!(A, B, C);
impl_component_set_tuple!(A, B, C, D);
impl_component_set_tuple!(A, B, C, D, E);
impl_component_set_tuple!(A, B, C, D, E, F);
impl_component_set_tuple!(A, B, C, D, E, F, G);
impl_component_set_tuple!(A, B, C, D, E, F, G, H);

/// A reusable query description that holds no borrow of the world.
///
/// Every call to [`Query::iter`] recomputes the required mask and rescans the
/// live entities, so entities created between two iterations are seen by the
/// second one.
pub struct Query<Q: ComponentSet> {
    _marker: PhantomData<fn() -> Q>,
}

impl<Q: ComponentSet> Query<Q> {
    pub fn new() -> Self {
        Self {
            _marker: PhantomData,
        }
    }

    /// Start a fresh scan of `world`.
    pub fn iter<'w>(&self, world: &'w World) -> EntitiesWith<'w> {
        EntitiesWith {
            world,
            required: Q::required_mask(world),
            next_index: 0,
        }
    }

    /// Number of entities currently matching.
    pub fn count(&self, world: &World) -> usize {
        self.iter(world).count()
    }

    /// Whether a single entity currently matches.
    pub fn matches(&self, world: &World, entity: Entity) -> bool {
        match (Q::required_mask(world), world.archetype_bits(entity)) {
            (Some(required), Some(mask)) => mask.contains_all(&required),
            _ => false,
        }
    }
}

impl<Q: ComponentSet> Default for Query<Q> {
    fn default() -> Self {
        Self::new()
    }
}

impl<Q: ComponentSet> Clone for Query<Q> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<Q: ComponentSet> Copy for Query<Q> {}

/// Iterator over live entities whose mask is a superset of the required mask.
///
/// Cost is linear in the number of entity slots; each slot is tested with a
/// single mask comparison.
pub struct EntitiesWith<'w> {
    world: &'w World,
    required: Option<ComponentMask>,
    next_index: u32,
}

impl<'w> Iterator for EntitiesWith<'w> {
    type Item = EntityRef<'w>;

    fn next(&mut self) -> Option<Self::Item> {
        let required = self.required?;
        let end = self.world.entities.slot_count();
        while self.next_index < end {
            let index = self.next_index;
            self.next_index += 1;
            if let Some((entity, mask)) = self.world.entities.live_at(index) {
                if mask.contains_all(&required) {
                    return Some(EntityRef::new(self.world, entity));
                }
            }
        }
        None
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        match self.required {
            Some(_) => {
                let remaining = self.world.entities.slot_count() - self.next_index;
                (0, Some(remaining as usize))
            }
            None => (0, Some(0)),
        }
    }
}

/// A live entity paired with the world it belongs to.
#[derive(Clone, Copy)]
pub struct EntityRef<'w> {
    world: &'w World,
    entity: Entity,
}

impl<'w> EntityRef<'w> {
    pub(crate) fn new(world: &'w World, entity: Entity) -> Self {
        Self { world, entity }
    }

    pub fn id(&self) -> Entity {
        self.entity
    }

    pub fn archetype_bits(&self) -> ComponentMask {
        self.world.archetype_bits(self.entity).unwrap_or_default()
    }

    /// Resolve several component types at once. Each element is `None` if the
    /// entity does not own that type.
    pub fn components<Q: ComponentSet>(&self) -> Q::Refs<'w> {
        Q::fetch(self.world, self.entity)
    }

    pub fn get<T: Component>(&self) -> Option<&'w T> {
        self.world.get::<T>(self.entity)
    }

    pub fn has<T: Component>(&self) -> bool {
        self.world.has::<T>(self.entity)
    }
}

impl std::fmt::Debug for EntityRef<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EntityRef")
            .field("entity", &self.entity)
            .field("archetype", &self.archetype_bits())
            .finish()
    }
}
