//! Import batch state.
//!
//! ## State Machine
//!
//! ```text
//! Running ──finish()──▶ Finished
//! ```
//!
//! Counters and errors only change while the batch is `Running`; once
//! finished the batch is turned into an [`crate::ImportResult`].

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use tagihan_core::{BatchId, DomainError, DomainResult, UserId};
use tagihan_infra::SourceKind;

use crate::error::{ErrorField, ImportError};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BatchState {
    Running,
    Finished,
}

/// One failed record (or the single batch-level error of a fatal run).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImportRecordError {
    /// Source row, 0 for batch-level errors.
    pub row: u32,
    pub field: ErrorField,
    pub message: String,
    /// Offending value, usually the invoice number.
    pub value: Option<String>,
}

impl ImportRecordError {
    pub fn from_error(row: u32, error: &ImportError, value: Option<String>) -> Self {
        Self {
            row,
            field: error.field(),
            message: error.to_string(),
            value,
        }
    }
}

/// A single import run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImportBatch {
    id: BatchId,
    file_name: String,
    source_kind: SourceKind,
    initiated_by: UserId,
    started_at: DateTime<Utc>,
    finished_at: Option<DateTime<Utc>>,
    total: usize,
    succeeded: usize,
    failed: usize,
    errors: Vec<ImportRecordError>,
    state: BatchState,
}

impl ImportBatch {
    pub fn start(
        file_name: impl Into<String>,
        source_kind: SourceKind,
        initiated_by: UserId,
        started_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id: BatchId::new(),
            file_name: file_name.into(),
            source_kind,
            initiated_by,
            started_at,
            finished_at: None,
            total: 0,
            succeeded: 0,
            failed: 0,
            errors: Vec::new(),
            state: BatchState::Running,
        }
    }

    pub fn id(&self) -> BatchId {
        self.id
    }

    pub fn file_name(&self) -> &str {
        &self.file_name
    }

    pub fn source_kind(&self) -> SourceKind {
        self.source_kind
    }

    pub fn initiated_by(&self) -> UserId {
        self.initiated_by
    }

    pub fn started_at(&self) -> DateTime<Utc> {
        self.started_at
    }

    pub fn finished_at(&self) -> Option<DateTime<Utc>> {
        self.finished_at
    }

    pub fn total(&self) -> usize {
        self.total
    }

    pub fn succeeded(&self) -> usize {
        self.succeeded
    }

    pub fn failed(&self) -> usize {
        self.failed
    }

    pub fn errors(&self) -> &[ImportRecordError] {
        &self.errors
    }

    pub fn state(&self) -> BatchState {
        self.state
    }

    /// A batch succeeds when nothing failed, fatal errors included.
    pub fn is_success(&self) -> bool {
        self.failed == 0 && self.errors.is_empty()
    }

    pub fn record_success(&mut self) {
        debug_assert_eq!(self.state, BatchState::Running);
        self.total += 1;
        self.succeeded += 1;
    }

    pub fn record_failure(&mut self, error: ImportRecordError) {
        debug_assert_eq!(self.state, BatchState::Running);
        self.total += 1;
        self.failed += 1;
        self.errors.push(error);
    }

    /// Record a batch-level error. No record is counted.
    pub fn record_fatal(&mut self, error: ImportRecordError) {
        debug_assert_eq!(self.state, BatchState::Running);
        self.errors.push(error);
    }

    /// Turn successes into failures after a failed commit, one per error.
    pub fn revoke_successes(&mut self, errors: Vec<ImportRecordError>) {
        debug_assert_eq!(self.state, BatchState::Running);
        let revoked = errors.len().min(self.succeeded);
        self.succeeded -= revoked;
        self.failed += revoked;
        self.errors.extend(errors);
    }

    /// Freeze the batch. Fails when it is already finished.
    pub fn finish(&mut self, finished_at: DateTime<Utc>) -> DomainResult<()> {
        if self.state != BatchState::Running {
            return Err(DomainError::invariant(format!(
                "batch {} is already finished",
                self.id
            )));
        }
        self.finished_at = Some(finished_at);
        self.state = BatchState::Finished;
        Ok(())
    }
}
