//! Batch orchestration.
//!
//! ## Import Flow
//!
//! ```text
//! ImportSource
//!   ↓
//! 1. Open the source (delimited text is split into a two-sheet workbook)
//!   ↓
//! 2. Validate structure (failure ends the batch with one error)
//!   ↓
//! 3. Parse headers and lines once
//!   ↓
//! 4. Per header: check the invoice number, assemble + queue (failures are
//!    isolated to the header)
//!   ↓
//! 5. Single commit (skipped when nothing was queued)
//!   ↓
//! 6. One audit log entry
//!   ↓
//! ImportResult
//! ```
//!
//! ## Commit Outcome
//!
//! The commit result is authoritative. When the commit fails the queue is
//! rolled back and every header counted as succeeded is re-counted as failed
//! with a `Commit` error.
//!
//! ## Master Records Of Failed Headers
//!
//! A company, worker or job created while assembling a header that later
//! fails stays queued and is committed with the batch. Resolutions are
//! memoized, so later headers may already refer to it.

use std::collections::HashSet;

use chrono::Utc;

use tagihan_core::UserId;
use tagihan_infra::UnitOfWork;
use tagihan_invoicing::InvoiceStatus;

use crate::assembler::{AssemblyContext, assemble_invoice, group_lines};
use crate::batch::{ImportBatch, ImportRecordError};
use crate::delimited::read_delimited;
use crate::error::{ErrorField, ImportError};
use crate::options::ImportOptions;
use crate::parser::{parse_headers, parse_workbook_lines, validate_structure};
use crate::report::{ImportResult, ImportedInvoice};
use crate::resolver::EntityResolver;
use crate::source::{ImportSource, MemoryWorkbook, Workbook};

/// Runs import batches against a unit of work.
#[derive(Debug)]
pub struct ImportService<U> {
    uow: U,
}

impl<U> ImportService<U> {
    pub fn new(uow: U) -> Self {
        Self { uow }
    }

    pub fn uow(&self) -> &U {
        &self.uow
    }

    pub fn into_inner(self) -> U {
        self.uow
    }
}

impl<U> ImportService<U>
where
    U: UnitOfWork,
{
    /// Import one source file.
    ///
    /// Never fails: every problem is reported in the returned result.
    pub fn import_invoices(
        &mut self,
        source: ImportSource<'_>,
        initiated_by: UserId,
        options: &ImportOptions,
    ) -> ImportResult {
        let started_at = Utc::now();
        let mut batch = ImportBatch::start(source.file_name(), source.kind(), initiated_by, started_at);
        tracing::info!(
            batch_id = %batch.id(),
            file_name = batch.file_name(),
            source_kind = %batch.source_kind(),
            %initiated_by,
            "import started"
        );

        // 1) Open source
        let split: MemoryWorkbook;
        let workbook: &dyn Workbook = match &source {
            ImportSource::Spreadsheet { workbook, .. } => *workbook,
            ImportSource::DelimitedText { data, .. } => {
                match read_delimited(data, options.delimiter, options.has_header) {
                    Ok(read) => {
                        split = read;
                        &split
                    }
                    Err(err) => return self.finish_fatal(batch, err),
                }
            }
        };

        // 2) Validate structure
        let header_sheet = match validate_structure(workbook) {
            Ok(sheet) => sheet,
            Err(err) => return self.finish_fatal(batch, err),
        };

        // 3) Parse once
        let headers = parse_headers(header_sheet, started_at.date_naive());
        let lines = parse_workbook_lines(workbook);
        let groups = group_lines(&lines);
        tracing::debug!(
            batch_id = %batch.id(),
            headers = headers.len(),
            lines = lines.len(),
            "source parsed"
        );

        // 4) Assemble per header
        let ctx = AssemblyContext {
            batch_id: batch.id(),
            created_by: initiated_by,
            status: if options.import_as_draft {
                InvoiceStatus::Draft
            } else {
                InvoiceStatus::Issued
            },
            occurred_at: started_at,
        };
        let mut resolver = EntityResolver::new(options.create_missing_entities);
        let mut seen_numbers: HashSet<&str> = HashSet::new();
        let mut imported: Vec<ImportedInvoice> = Vec::new();

        for header in &headers {
            let outcome = self
                .check_invoice_number(&mut seen_numbers, &header.invoice_number)
                .and_then(|()| {
                    let group = groups
                        .get(header.invoice_number.as_str())
                        .map(Vec::as_slice)
                        .unwrap_or_default();
                    assemble_invoice(&mut self.uow, &mut resolver, header, group, &ctx)
                });

            match outcome {
                Ok(invoice) => {
                    batch.record_success();
                    imported.push(invoice);
                }
                Err(err) => {
                    tracing::warn!(
                        batch_id = %batch.id(),
                        row = header.row,
                        invoice_number = %header.invoice_number,
                        error = %err,
                        "invoice rejected"
                    );
                    batch.record_failure(ImportRecordError::from_error(
                        header.row,
                        &err,
                        Some(header.invoice_number.clone()),
                    ));
                }
            }
        }

        // 5) Single commit
        if imported.is_empty() && resolver.created().is_empty() {
            tracing::debug!(batch_id = %batch.id(), "nothing queued, commit skipped");
        } else {
            match self.uow.commit() {
                Ok(summary) => tracing::debug!(batch_id = %batch.id(), ?summary, "batch committed"),
                Err(err) => {
                    tracing::error!(batch_id = %batch.id(), error = %err, "commit failed, batch rolled back");
                    self.uow.rollback();
                    let message = ImportError::from(err).to_string();
                    let revoked = imported
                        .drain(..)
                        .map(|invoice| ImportRecordError {
                            row: invoice.row,
                            field: ErrorField::Commit,
                            message: message.clone(),
                            value: Some(invoice.invoice_number),
                        })
                        .collect();
                    batch.revoke_successes(revoked);
                }
            }
        }

        // 6) Audit log
        self.finish(batch, imported)
    }

    /// Reject a number already used earlier in the batch or already stored.
    fn check_invoice_number<'a>(
        &self,
        seen: &mut HashSet<&'a str>,
        number: &'a str,
    ) -> Result<(), ImportError> {
        if !seen.insert(number) {
            return Err(ImportError::DuplicateInvoiceNumber(number.to_string()));
        }
        if self.uow.find_invoice_by_number(number)?.is_some() {
            return Err(ImportError::InvoiceNumberExists(number.to_string()));
        }
        Ok(())
    }

    fn finish_fatal(&mut self, mut batch: ImportBatch, err: ImportError) -> ImportResult {
        tracing::error!(batch_id = %batch.id(), error = %err, "import source rejected");
        batch.record_fatal(ImportRecordError::from_error(0, &err, None));
        self.finish(batch, Vec::new())
    }

    fn finish(&mut self, mut batch: ImportBatch, imported: Vec<ImportedInvoice>) -> ImportResult {
        if let Err(err) = batch.finish(Utc::now()) {
            tracing::error!(batch_id = %batch.id(), error = %err, "batch finished twice");
        }
        let result = ImportResult::from_batch(&batch, imported);

        if let Err(err) = self.uow.add_import_log(result.to_log_entry()) {
            tracing::error!(batch_id = %result.batch_id, error = %err, "failed to write import log");
        }

        tracing::info!(
            batch_id = %result.batch_id,
            total = result.total_records,
            succeeded = result.succeeded,
            failed = result.failed,
            success = result.success,
            "import finished"
        );
        result
    }
}

/// Run one import batch against `uow`.
pub fn import_invoices<U>(
    uow: U,
    source: ImportSource<'_>,
    initiated_by: UserId,
    options: &ImportOptions,
) -> ImportResult
where
    U: UnitOfWork,
{
    ImportService::new(uow).import_invoices(source, initiated_by, options)
}
