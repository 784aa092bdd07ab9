//! Value object trait: equality by value, not identity.

/// Marker trait for value objects.
///
/// Value objects are immutable and compared by their attribute values. Filter
/// criteria, price ranges and result pages are value objects: to "change" one,
/// build a new value.
///
/// ```ignore
/// let narrowed = criteria.apply(CriteriaCommand::ToggleSize("M".into()));
/// assert_ne!(narrowed, criteria);
/// ```
pub trait ValueObject: Clone + PartialEq + core::fmt::Debug {}
