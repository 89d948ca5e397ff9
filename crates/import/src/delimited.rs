//! Delimited text reader.
//!
//! A delimited file carries headers and lines in one table. The first column
//! of each record is a record-type tag, `H` for an invoice header and `L` for
//! an invoice line (case-insensitive); the remaining columns follow the
//! worksheet column order. Records with any other tag are ignored.
//!
//! The text is split into a two-sheet [`MemoryWorkbook`] so it goes through the
//! same parser and assembly as a spreadsheet. Row numbers are source line
//! numbers.

use csv::{ReaderBuilder, Trim};

use crate::error::ImportError;
use crate::source::{MemoryWorkbook, MemoryWorksheet};

const HEADER_TAG: &str = "H";
const LINE_TAG: &str = "L";

pub fn read_delimited(
    data: &[u8],
    delimiter: u8,
    has_header: bool,
) -> Result<MemoryWorkbook, ImportError> {
    let mut reader = ReaderBuilder::new()
        .delimiter(delimiter)
        .has_headers(false)
        .flexible(true)
        .trim(Trim::All)
        .from_reader(data);

    let mut headers = MemoryWorksheet::new("Invoices").with_first_data_row(1);
    let mut lines = MemoryWorksheet::new("Lines").with_first_data_row(1);
    let mut skipped = 0usize;

    for (idx, record) in reader.records().enumerate() {
        let record = record?;
        if has_header && idx == 0 {
            continue;
        }

        let row = record
            .position()
            .map(|pos| pos.line() as u32)
            .unwrap_or(idx as u32 + 1);
        let tag = record.get(0).unwrap_or_default();
        let cells = record.iter().skip(1);

        if tag.eq_ignore_ascii_case(HEADER_TAG) {
            headers.set_row(row, cells);
        } else if tag.eq_ignore_ascii_case(LINE_TAG) {
            lines.set_row(row, cells);
        } else {
            skipped += 1;
        }
    }

    tracing::debug!(
        headers = headers.row_count(),
        lines = lines.row_count(),
        skipped,
        "delimited text split into worksheets"
    );

    Ok(MemoryWorkbook::new(vec![headers, lines]))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::Workbook;

    const SAMPLE: &str = "\
Type,InvoiceNumber,Company,TaxId
H,INV-1,PT Maju,01.234
l,INV-1,1,Budi,A1
X,ignored
L,INV-1,2,Sari,B2
";

    #[test]
    fn records_are_routed_by_tag() {
        let workbook = read_delimited(SAMPLE.as_bytes(), b',', true).unwrap();
        assert_eq!(workbook.worksheet_count(), 2);

        let headers = workbook.worksheet(0).unwrap();
        assert_eq!(headers.first_data_row(), 1);
        assert_eq!(headers.cell(2, 1), Some("INV-1"));
        assert_eq!(headers.cell(2, 3), Some("01.234"));

        let lines = workbook.worksheet(1).unwrap();
        assert_eq!(lines.cell(3, 3), Some("Budi"));
        assert_eq!(lines.cell(5, 4), Some("B2"));
        assert_eq!(lines.cell(4, 1), None);
        assert_eq!(lines.last_row(), 5);
    }

    #[test]
    fn header_row_is_kept_when_disabled() {
        let text = "H;INV-9;PT Maju;01.234\n";
        let workbook = read_delimited(text.as_bytes(), b';', false).unwrap();
        let headers = workbook.worksheet(0).unwrap();
        assert_eq!(headers.cell(1, 1), Some("INV-9"));
    }

    #[test]
    fn cells_are_trimmed() {
        let text = "H , INV-1 ,  PT Maju \n";
        let workbook = read_delimited(text.as_bytes(), b',', false).unwrap();
        assert_eq!(workbook.worksheet(0).unwrap().cell(1, 2), Some("PT Maju"));
    }

    #[test]
    fn invalid_utf8_is_fatal() {
        let data = [b'H', b',', 0xff, 0xfe, b'\n'];
        let err = read_delimited(&data, b',', false).unwrap_err();
        assert!(matches!(err, ImportError::Csv(_)));
        assert!(err.is_fatal());
    }
}
