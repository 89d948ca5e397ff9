//! Intermediate records produced by the parser.
//!
//! These live only for the duration of one batch run; nothing here is
//! persisted.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Header worksheet columns (1-based).
pub mod header_column {
    pub const INVOICE_NUMBER: u32 = 1;
    pub const COMPANY_NAME: u32 = 2;
    pub const COMPANY_TAX_ID: u32 = 3;
    pub const INVOICE_DATE: u32 = 4;
    pub const DUE_DATE: u32 = 5;
    pub const NOTES: u32 = 6;
    pub const VAT_PERCENTAGE: u32 = 7;
}

/// Line worksheet columns (1-based).
pub mod line_column {
    pub const INVOICE_NUMBER: u32 = 1;
    pub const SEQUENCE: u32 = 2;
    pub const WORKER_NAME: u32 = 3;
    pub const WORKER_PASSPORT: u32 = 4;
    pub const JOB_NAME: u32 = 5;
    pub const JOB_DESCRIPTION: u32 = 6;
    pub const QUANTITY: u32 = 7;
    pub const UNIT_PRICE: u32 = 8;
    pub const LINE_TOTAL: u32 = 9;
}

/// One parsed invoice header, before any entity is resolved.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImportInvoiceHeader {
    /// Source row, used in error reports.
    pub row: u32,
    pub invoice_number: String,
    pub company_name: String,
    pub company_tax_id: String,
    pub invoice_date: NaiveDate,
    pub due_date: Option<NaiveDate>,
    pub notes: Option<String>,
    pub vat_percentage: Decimal,
}

/// One parsed invoice line, before any entity is resolved.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImportInvoiceLine {
    pub row: u32,
    pub invoice_number: String,
    /// Position within the invoice ("Baris").
    pub sequence: i64,
    pub worker_name: String,
    pub worker_passport: String,
    pub job_name: String,
    pub job_description: String,
    pub quantity: i64,
    pub unit_price: Decimal,
    pub line_total: Decimal,
}
