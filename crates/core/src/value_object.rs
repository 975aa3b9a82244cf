//! Value object trait: equality by value, not identity.

/// Marker trait for value objects.
///
/// Value objects have **no identity**: they are defined entirely by their
/// attribute values and are immutable once built. To "change" one, build a
/// new value.
///
/// ```ignore
/// #[derive(Debug, Clone, Copy, PartialEq, Eq)]
/// struct Term { value: u32, unit: TermUnit }
///
/// impl ValueObject for Term {}
///
/// // Two terms of "3 month" are interchangeable.
/// assert_eq!(Term::months(3), Term::months(3));
/// ```
pub trait ValueObject: Clone + PartialEq + core::fmt::Debug {}
