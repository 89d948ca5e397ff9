//! Parties domain module (invoiced companies and the workers billed on their
//! invoices).
//!
//! This crate contains business rules for the party master records,
//! implemented purely as deterministic domain logic (no IO, no storage).

pub mod company;
pub mod worker;

pub use company::{Company, CompanyId, PLACEHOLDER_ADDRESS};
pub use worker::{Gender, IMPORTED_DIVISION, Worker, WorkerId};
