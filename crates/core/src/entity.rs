//! Entity trait: identity + continuity across state changes.

/// Entity marker + minimal interface.
///
/// Recorded transactions and adjustments are entities: they are deleted by id,
/// and two records with identical contents are still distinct records.
pub trait Entity {
    /// Strongly-typed entity identifier.
    type Id: Copy + Eq + core::hash::Hash + core::fmt::Debug;

    /// Returns the entity identifier.
    fn id(&self) -> &Self::Id;
}
