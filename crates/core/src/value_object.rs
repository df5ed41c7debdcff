//! Value object trait: equality by value, not identity.

/// Marker trait for value objects.
///
/// Value objects are immutable and compared entirely by their attribute
/// values; identity does not exist for them. A `PeriodBucket` covering
/// March 2026 is the same bucket wherever it was built, unlike a record,
/// which is the same record only when the ids match.
///
/// To "modify" a value object, build a new one with the new values.
pub trait ValueObject: Clone + PartialEq + core::fmt::Debug {}
