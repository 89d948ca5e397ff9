use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use tagihan_core::{BatchId, EntityId, UserId};

/// Kind of file an import was read from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SourceKind {
    Spreadsheet,
    DelimitedText,
}

impl core::fmt::Display for SourceKind {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            SourceKind::Spreadsheet => f.write_str("spreadsheet"),
            SourceKind::DelimitedText => f.write_str("delimited_text"),
        }
    }
}

/// Persisted audit record of one import run.
///
/// `error_summary` is a JSON array holding at most the first
/// [`ImportLogEntry::MAX_LOGGED_ERRORS`] record errors; the full list only
/// travels in the import result.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImportLogEntry {
    pub id: EntityId,
    pub batch_id: BatchId,
    pub file_name: String,
    pub source_kind: SourceKind,
    pub initiated_by: UserId,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
    pub total_records: usize,
    pub succeeded: usize,
    pub failed: usize,
    pub success: bool,
    pub error_summary: String,
}

impl ImportLogEntry {
    pub const MAX_LOGGED_ERRORS: usize = 10;
}
