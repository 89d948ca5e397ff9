//! Tabular source model.
//!
//! The engine does not open files itself: callers hand it an already-opened
//! workbook (anything implementing [`Workbook`]) or the raw bytes of a
//! delimited file. Rows and columns are 1-based, as in a spreadsheet.

use std::collections::BTreeMap;

use tagihan_infra::SourceKind;

/// One worksheet of an opened workbook.
pub trait Worksheet {
    fn name(&self) -> &str;

    /// Cell text at `row`/`column` (1-based). `None` when the cell is empty or
    /// outside the populated range.
    fn cell(&self, row: u32, column: u32) -> Option<&str>;

    /// Last populated row number, 0 for an empty sheet.
    fn last_row(&self) -> u32;

    /// First row holding data. Row 1 of a spreadsheet is the label row.
    fn first_data_row(&self) -> u32 {
        2
    }
}

/// An opened workbook.
pub trait Workbook {
    fn worksheet_count(&self) -> usize;

    fn worksheet(&self, index: usize) -> Option<&dyn Worksheet>;
}

/// Worksheet held in memory, keyed by row number.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MemoryWorksheet {
    name: String,
    rows: BTreeMap<u32, Vec<String>>,
    first_data_row: u32,
}

impl MemoryWorksheet {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            rows: BTreeMap::new(),
            first_data_row: 2,
        }
    }

    /// Sheet whose rows are numbered from 1 in iteration order; the first row
    /// is the label row.
    pub fn from_rows<R, C, S>(name: impl Into<String>, rows: R) -> Self
    where
        R: IntoIterator<Item = C>,
        C: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut sheet = Self::new(name);
        for (idx, cells) in rows.into_iter().enumerate() {
            sheet.set_row(idx as u32 + 1, cells);
        }
        sheet
    }

    pub fn with_first_data_row(mut self, row: u32) -> Self {
        self.first_data_row = row;
        self
    }

    pub fn set_row<C, S>(&mut self, row: u32, cells: C)
    where
        C: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.rows
            .insert(row, cells.into_iter().map(Into::into).collect());
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }
}

impl Worksheet for MemoryWorksheet {
    fn name(&self) -> &str {
        &self.name
    }

    fn cell(&self, row: u32, column: u32) -> Option<&str> {
        if column == 0 {
            return None;
        }
        self.rows
            .get(&row)
            .and_then(|cells| cells.get(column as usize - 1))
            .map(String::as_str)
            .filter(|text| !text.trim().is_empty())
    }

    fn last_row(&self) -> u32 {
        self.rows.keys().next_back().copied().unwrap_or(0)
    }

    fn first_data_row(&self) -> u32 {
        self.first_data_row
    }
}

/// Workbook held in memory.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MemoryWorkbook {
    sheets: Vec<MemoryWorksheet>,
}

impl MemoryWorkbook {
    pub fn new(sheets: Vec<MemoryWorksheet>) -> Self {
        Self { sheets }
    }
}

impl Workbook for MemoryWorkbook {
    fn worksheet_count(&self) -> usize {
        self.sheets.len()
    }

    fn worksheet(&self, index: usize) -> Option<&dyn Worksheet> {
        self.sheets.get(index).map(|s| s as &dyn Worksheet)
    }
}

/// Input handed to the engine.
pub enum ImportSource<'a> {
    Spreadsheet {
        file_name: String,
        workbook: &'a dyn Workbook,
    },
    DelimitedText {
        file_name: String,
        data: Vec<u8>,
    },
}

impl<'a> ImportSource<'a> {
    pub fn spreadsheet(file_name: impl Into<String>, workbook: &'a dyn Workbook) -> Self {
        Self::Spreadsheet {
            file_name: file_name.into(),
            workbook,
        }
    }

    /// Raw bytes of a delimited file; they must be UTF-8.
    pub fn delimited_text(file_name: impl Into<String>, data: impl Into<Vec<u8>>) -> Self {
        Self::DelimitedText {
            file_name: file_name.into(),
            data: data.into(),
        }
    }

    pub fn file_name(&self) -> &str {
        match self {
            ImportSource::Spreadsheet { file_name, .. }
            | ImportSource::DelimitedText { file_name, .. } => file_name,
        }
    }

    pub fn kind(&self) -> SourceKind {
        match self {
            ImportSource::Spreadsheet { .. } => SourceKind::Spreadsheet,
            ImportSource::DelimitedText { .. } => SourceKind::DelimitedText,
        }
    }
}
