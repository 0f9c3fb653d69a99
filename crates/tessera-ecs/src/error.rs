use crate::entity::Entity;

/// Errors returned by world operations that indicate caller mistakes.
///
/// Plain absence (an entity without the requested component, a destroy of a
/// missing component) is reported through `Option`/`bool` instead.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum EcsError {
    #[error("entity {0} is not alive")]
    NoSuchEntity(Entity),

    #[error("entity {entity} already owns a `{component}` component")]
    DuplicateComponent {
        entity: Entity,
        component: &'static str,
    },

    #[error("cannot register `{0}`: component type limit reached")]
    TooManyComponentTypes(&'static str),
}
