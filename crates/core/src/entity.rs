//! Entity trait: identity that survives state changes.

/// An object tracked by identity rather than by its field values.
///
/// Two loans to the same borrower with the same amounts are still distinct
/// records; callers address them through `id()`, never through their position
/// in a collection.
pub trait Entity {
    /// Strongly-typed entity identifier.
    type Id: Clone + Eq + core::hash::Hash + core::fmt::Debug;

    /// Returns the entity identifier.
    fn id(&self) -> &Self::Id;

    /// Whether `other` refers to the same record, regardless of field values.
    fn is_same(&self, other: &Self) -> bool
    where
        Self: Sized,
    {
        self.id() == other.id()
    }
}
