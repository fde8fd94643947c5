//! Entity trait: identity + continuity across state changes.

/// Entity marker + minimal interface.
///
/// Parts, movements and categories are all entities: two records with the same
/// id are the same record, whatever their other fields say.
pub trait Entity {
    /// Strongly-typed entity identifier.
    type Id: Copy + Eq + core::hash::Hash + core::fmt::Debug;

    /// Returns the entity identifier.
    fn id(&self) -> &Self::Id;
}

/// Find an entity by id in a slice.
pub fn find_by_id<'a, E: Entity>(items: &'a [E], id: &E::Id) -> Option<&'a E> {
    items.iter().find(|e| e.id() == id)
}

/// Position of an entity by id in a slice.
pub fn position_by_id<E: Entity>(items: &[E], id: &E::Id) -> Option<usize> {
    items.iter().position(|e| e.id() == id)
}
