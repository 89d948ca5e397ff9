//! Record parser.
//!
//! Turns the header and line worksheets into [`ImportInvoiceHeader`] and
//! [`ImportInvoiceLine`] records. Parsing never fails on cell content: every
//! scalar goes through [`crate::coerce`] and degrades to its default. Only the
//! structural check in [`validate_structure`] can reject a source.

use chrono::NaiveDate;
use rust_decimal::Decimal;

use tagihan_invoicing::DEFAULT_VAT_PERCENTAGE;

use crate::coerce;
use crate::error::ImportError;
use crate::records::{ImportInvoiceHeader, ImportInvoiceLine, header_column, line_column};
use crate::source::{Workbook, Worksheet};

pub const HEADER_SHEET: usize = 0;
pub const LINE_SHEET: usize = 1;

const DEFAULT_QUANTITY: i64 = 1;
const DEFAULT_SEQUENCE: i64 = 1;

/// Check that the workbook can be imported at all and return its header
/// worksheet.
///
/// Requires a header worksheet holding at least one data row with an invoice
/// number. The line worksheet is optional.
pub fn validate_structure(workbook: &dyn Workbook) -> Result<&dyn Worksheet, ImportError> {
    if workbook.worksheet_count() == 0 {
        return Err(ImportError::InvalidStructure(
            "workbook contains no worksheets".to_string(),
        ));
    }

    let headers = workbook
        .worksheet(HEADER_SHEET)
        .ok_or_else(|| ImportError::InvalidStructure("header worksheet is missing".to_string()))?;

    if data_rows(headers, header_column::INVOICE_NUMBER).next().is_none() {
        return Err(ImportError::InvalidStructure(format!(
            "worksheet '{}' contains no invoice rows",
            headers.name()
        )));
    }

    Ok(headers)
}

/// Parse every header row; `today` is the invoice date used when the cell is
/// blank or unreadable.
pub fn parse_headers(sheet: &dyn Worksheet, today: NaiveDate) -> Vec<ImportInvoiceHeader> {
    data_rows(sheet, header_column::INVOICE_NUMBER)
        .map(|row| {
            let cell = |column| sheet.cell(row, column);
            ImportInvoiceHeader {
                row,
                invoice_number: coerce::text(cell(header_column::INVOICE_NUMBER)),
                company_name: coerce::text(cell(header_column::COMPANY_NAME)),
                company_tax_id: coerce::text(cell(header_column::COMPANY_TAX_ID)),
                invoice_date: coerce::date_or(cell(header_column::INVOICE_DATE), today),
                due_date: coerce::optional_date(cell(header_column::DUE_DATE)),
                notes: coerce::optional_text(cell(header_column::NOTES)),
                vat_percentage: coerce::decimal_or(
                    cell(header_column::VAT_PERCENTAGE),
                    DEFAULT_VAT_PERCENTAGE,
                ),
            }
        })
        .collect()
}

pub fn parse_lines(sheet: &dyn Worksheet) -> Vec<ImportInvoiceLine> {
    data_rows(sheet, line_column::INVOICE_NUMBER)
        .map(|row| {
            let cell = |column| sheet.cell(row, column);
            ImportInvoiceLine {
                row,
                invoice_number: coerce::text(cell(line_column::INVOICE_NUMBER)),
                sequence: coerce::integer_or(cell(line_column::SEQUENCE), DEFAULT_SEQUENCE),
                worker_name: coerce::text(cell(line_column::WORKER_NAME)),
                worker_passport: coerce::text(cell(line_column::WORKER_PASSPORT)),
                job_name: coerce::text(cell(line_column::JOB_NAME)),
                job_description: coerce::text(cell(line_column::JOB_DESCRIPTION)),
                quantity: coerce::integer_or(cell(line_column::QUANTITY), DEFAULT_QUANTITY),
                unit_price: coerce::decimal_or(cell(line_column::UNIT_PRICE), Decimal::ZERO),
                line_total: coerce::decimal_or(cell(line_column::LINE_TOTAL), Decimal::ZERO),
            }
        })
        .collect()
}

/// Parse the lines worksheet when present; an absent sheet means no lines.
pub fn parse_workbook_lines(workbook: &dyn Workbook) -> Vec<ImportInvoiceLine> {
    workbook
        .worksheet(LINE_SHEET)
        .map(parse_lines)
        .unwrap_or_default()
}

/// Data row numbers whose key cell is non-blank.
fn data_rows(sheet: &dyn Worksheet, key_column: u32) -> impl Iterator<Item = u32> + '_ {
    (sheet.first_data_row()..=sheet.last_row()).filter(move |&row| {
        sheet
            .cell(row, key_column)
            .is_some_and(|text| !text.trim().is_empty())
    })
}
