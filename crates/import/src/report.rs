//! Import result and audit log entry.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use tagihan_core::{BatchId, EntityId, UserId};
use tagihan_infra::{ImportLogEntry, SourceKind};
use tagihan_invoicing::{Invoice, InvoiceId, InvoiceStatus};
use tagihan_parties::CompanyId;

use crate::batch::{ImportBatch, ImportRecordError};

/// Summary of one invoice queued by the batch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImportedInvoice {
    pub row: u32,
    pub invoice_id: InvoiceId,
    pub invoice_number: String,
    pub company_id: CompanyId,
    pub status: InvoiceStatus,
    pub line_count: usize,
    pub subtotal: Decimal,
    pub vat_amount: Decimal,
    pub total_amount: Decimal,
}

impl ImportedInvoice {
    pub fn new(row: u32, invoice: &Invoice) -> Self {
        Self {
            row,
            invoice_id: invoice.id_typed(),
            invoice_number: invoice.invoice_number().to_string(),
            company_id: invoice.company_id(),
            status: invoice.status(),
            line_count: invoice.lines().len(),
            subtotal: invoice.subtotal(),
            vat_amount: invoice.vat_amount(),
            total_amount: invoice.total_amount(),
        }
    }
}

/// Outcome of one import run.
///
/// `invoices` lists what was persisted; it is empty when the commit failed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImportResult {
    pub batch_id: BatchId,
    pub file_name: String,
    pub source_kind: SourceKind,
    pub initiated_by: UserId,
    pub total_records: usize,
    pub succeeded: usize,
    pub failed: usize,
    pub errors: Vec<ImportRecordError>,
    pub invoices: Vec<ImportedInvoice>,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
    pub success: bool,
}

impl ImportResult {
    pub fn from_batch(batch: &ImportBatch, invoices: Vec<ImportedInvoice>) -> Self {
        Self {
            batch_id: batch.id(),
            file_name: batch.file_name().to_string(),
            source_kind: batch.source_kind(),
            initiated_by: batch.initiated_by(),
            total_records: batch.total(),
            succeeded: batch.succeeded(),
            failed: batch.failed(),
            errors: batch.errors().to_vec(),
            invoices,
            started_at: batch.started_at(),
            finished_at: batch.finished_at().unwrap_or_else(Utc::now),
            success: batch.is_success(),
        }
    }

    /// Audit record for this run. Only the first
    /// [`ImportLogEntry::MAX_LOGGED_ERRORS`] errors are kept.
    pub fn to_log_entry(&self) -> ImportLogEntry {
        let logged = &self.errors[..self.errors.len().min(ImportLogEntry::MAX_LOGGED_ERRORS)];
        let error_summary = serde_json::to_string(logged).unwrap_or_else(|err| {
            tracing::warn!(error = %err, batch_id = %self.batch_id, "failed to serialize error summary");
            "[]".to_string()
        });

        ImportLogEntry {
            id: EntityId::new(),
            batch_id: self.batch_id,
            file_name: self.file_name.clone(),
            source_kind: self.source_kind,
            initiated_by: self.initiated_by,
            started_at: self.started_at,
            finished_at: self.finished_at,
            total_records: self.total_records,
            succeeded: self.succeeded,
            failed: self.failed,
            success: self.success,
            error_summary,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ImportError;

    fn result_with_errors(count: usize) -> ImportResult {
        let mut batch =
            ImportBatch::start("batch.csv", SourceKind::DelimitedText, UserId::new(), Utc::now());
        for idx in 0..count {
            let number = format!("INV-{idx}");
            let err = ImportError::NoLines(number.clone());
            batch
                .record_failure(ImportRecordError::from_error(idx as u32 + 2, &err, Some(number)));
        }
        batch.finish(Utc::now()).unwrap();
        ImportResult::from_batch(&batch, Vec::new())
    }

    #[test]
    fn log_entry_keeps_first_ten_errors() {
        let result = result_with_errors(12);
        let entry = result.to_log_entry();

        let logged: Vec<ImportRecordError> = serde_json::from_str(&entry.error_summary).unwrap();
        assert_eq!(logged.len(), 10);
        assert_eq!(logged[0].row, 2);
        assert_eq!(result.errors.len(), 12);
        assert_eq!(entry.failed, 12);
        assert!(!entry.success);
        assert_eq!(entry.batch_id, result.batch_id);
    }

    #[test]
    fn clean_run_logs_empty_summary() {
        let entry = result_with_errors(0).to_log_entry();
        assert_eq!(entry.error_summary, "[]");
        assert!(entry.success);
    }

    #[test]
    fn result_serializes_to_json() {
        let json = serde_json::to_value(result_with_errors(1)).unwrap();
        assert_eq!(json["source_kind"], "delimited_text");
        assert_eq!(json["errors"][0]["field"], "Lines");
        assert_eq!(json["errors"][0]["value"], "INV-0");
    }
}
