//! Entity trait: identity + continuity across refetches.

/// Entity marker + minimal interface.
///
/// Two snapshots of the same product fetched at different times are the same
/// entity when their identifiers match, even if price or stock changed.
pub trait Entity {
    /// Strongly-typed entity identifier.
    type Id: Clone + Eq + core::hash::Hash + core::fmt::Debug;

    /// Returns the entity identifier.
    fn id(&self) -> &Self::Id;

    /// Whether `other` refers to the same entity.
    fn same_identity_as(&self, other: &Self) -> bool {
        self.id() == other.id()
    }
}
