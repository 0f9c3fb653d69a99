use crate::archetype::ComponentMask;
use crate::component::Component;
use crate::entity::Entity;
use crate::error::EcsError;
use crate::world::World;

/// Fluent constructor for a freshly allocated entity.
///
/// Each `add_component` call commits immediately: the value is stored and the
/// type's bit is folded into the entity's mask before the call returns, so
/// there is no separate finalize step.
pub struct EntityBuilder<'w> {
    world: &'w mut World,
    entity: Entity,
}

impl<'w> EntityBuilder<'w> {
    pub(crate) fn new(world: &'w mut World, entity: Entity) -> Self {
        Self { world, entity }
    }

    /// Attach a component to the entity under construction.
    pub fn add_component<T: Component>(&mut self, value: T) -> Result<&mut Self, EcsError> {
        self.world.add_component(Some(self.entity), value)?;
        Ok(self)
    }

    /// The entity being built.
    pub fn id(&self) -> Entity {
        self.entity
    }

    /// The entity's mask as of the last `add_component`.
    pub fn archetype_bits(&self) -> ComponentMask {
        self.world.archetype_bits(self.entity).unwrap_or_default()
    }
}
