//! Entity trait: identity + continuity across state changes.

/// Entity marker + minimal interface.
///
/// Master records (companies, workers, job descriptions) and invoices are all
/// entities: two values with the same id are the same record, even if their
/// attributes differ.
pub trait Entity {
    /// Strongly-typed entity identifier.
    type Id: Clone + Eq + core::hash::Hash + core::fmt::Debug;

    /// Returns the entity identifier.
    fn id(&self) -> &Self::Id;
}
