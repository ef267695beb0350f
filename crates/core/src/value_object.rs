//! Value object trait: equality by value, not identity.

/// Marker trait for value objects.
///
/// Value objects are **immutable** and **compared by value**. Reasons and
/// movement directions are value objects: two reasons with the same name,
/// type and category are interchangeable.
///
/// ```ignore
/// #[derive(Debug, Clone, PartialEq, Eq)]
/// enum Direction { Credit, Debit }
///
/// impl ValueObject for Direction {}
/// ```
pub trait ValueObject: Clone + PartialEq + core::fmt::Debug {}
