use serde::{Deserialize, Serialize};

/// Caller-supplied import settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImportOptions {
    /// Create companies, workers and job descriptions that are not found.
    /// When `false` a missing entity fails the invoice that references it.
    pub create_missing_entities: bool,
    /// Store imported invoices as drafts instead of issued invoices.
    pub import_as_draft: bool,
    /// Field delimiter for delimited text sources.
    pub delimiter: u8,
    /// Whether the first record of a delimited text source is a label row.
    pub has_header: bool,
}

impl Default for ImportOptions {
    fn default() -> Self {
        Self {
            create_missing_entities: true,
            import_as_draft: false,
            delimiter: b',',
            has_header: true,
        }
    }
}
