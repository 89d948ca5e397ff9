//! Invoice batch import engine.
//!
//! Reads invoice headers and lines from a spreadsheet or delimited text,
//! resolves (finds or creates) the companies, workers and job descriptions
//! they reference, assembles invoices with their VAT and totals, and reports
//! a per-record outcome.
//!
//! Storage is reached only through [`tagihan_infra::UnitOfWork`].

pub mod assembler;
pub mod batch;
pub mod coerce;
pub mod delimited;
pub mod error;
pub mod options;
pub mod parser;
pub mod records;
pub mod report;
pub mod resolver;
pub mod service;
pub mod source;

pub use batch::{BatchState, ImportBatch, ImportRecordError};
pub use error::{EntityKind, ErrorField, ImportError};
pub use options::ImportOptions;
pub use records::{ImportInvoiceHeader, ImportInvoiceLine};
pub use report::{ImportResult, ImportedInvoice};
pub use resolver::EntityResolver;
pub use service::{ImportService, import_invoices};
pub use source::{ImportSource, MemoryWorkbook, MemoryWorksheet, Workbook, Worksheet};
pub use tagihan_infra::SourceKind;
