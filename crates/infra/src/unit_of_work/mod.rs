//! Unit-of-work storage boundary.
//!
//! Master records and invoices are *queued* with `add_*` and only become
//! visible to lookups once `commit` succeeds. Import audit log entries are
//! written directly.

pub mod import_log;
pub mod in_memory;
pub mod r#trait;

pub use import_log::{ImportLogEntry, SourceKind};
pub use in_memory::InMemoryUnitOfWork;
pub use r#trait::{CommitSummary, StoreError, UnitOfWork};
