//! Value object trait: equality by value, not identity.
//!
//! Value objects have **no identity**; they are defined entirely by their
//! attribute values. Every derived bookkeeping output (balances, journal lines,
//! totals, statements) is a value object: it is recomputed from the records on
//! every read and two results with the same values are interchangeable.

/// Marker trait for value objects.
///
/// ## Value Object vs Entity
///
/// - **Value Object**: no identity (two `Amount`s of 100.00 are equal)
/// - **Entity**: has identity (two transactions with the same contents but
///   different ids are different records)
///
/// ## Usage Pattern
///
/// ```ignore
/// #[derive(Debug, Clone, PartialEq, Eq)]
/// struct Totals {
///     total_assets: Decimal,
///     total_liabilities: Decimal,
/// }
///
/// impl ValueObject for Totals {}
/// ```
pub trait ValueObject: Clone + PartialEq + core::fmt::Debug {}
