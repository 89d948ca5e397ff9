//! Invoicing domain module.
//!
//! This crate contains business rules for invoices (line assembly, VAT and
//! total calculation), implemented purely as deterministic domain logic
//! (no IO, no storage).

pub mod invoice;
pub mod rounding;
pub mod totals;

pub use invoice::{Invoice, InvoiceId, InvoiceLine, InvoiceStatus, IssueInvoice};
pub use rounding::{DEFAULT_VAT_PERCENTAGE, domain_round, round_vat};
pub use totals::InvoiceTotals;
