//! Infrastructure layer: the storage boundary used by the import engine.

pub mod unit_of_work;

pub use unit_of_work::{
    CommitSummary, ImportLogEntry, InMemoryUnitOfWork, SourceKind, StoreError, UnitOfWork,
};
