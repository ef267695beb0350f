//! Entity trait: identity + continuity across state changes.

/// Entity marker + minimal interface.
///
/// Stock cards and their line items are entities: a line item whose quantity
/// is corrected is still the same movement.
pub trait Entity {
    /// Strongly-typed entity identifier.
    type Id: Clone + Eq + core::hash::Hash + core::fmt::Debug;

    /// Returns the entity identifier.
    fn id(&self) -> &Self::Id;
}
