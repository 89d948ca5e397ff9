//! Invoice assembler.
//!
//! Builds one [`Invoice`] per header: groups the header's lines, resolves the
//! company, then the worker and job of every line, and queues the invoice on
//! the unit of work. Any failure fails the whole header.

use std::collections::HashMap;

use chrono::{DateTime, Utc};

use tagihan_core::{BatchId, EntityId, UserId};
use tagihan_infra::UnitOfWork;
use tagihan_invoicing::{Invoice, InvoiceId, InvoiceLine, InvoiceStatus, IssueInvoice};

use crate::error::ImportError;
use crate::records::{ImportInvoiceHeader, ImportInvoiceLine};
use crate::report::ImportedInvoice;
use crate::resolver::EntityResolver;

/// Batch-wide values stamped on every assembled invoice.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AssemblyContext {
    pub batch_id: BatchId,
    pub created_by: UserId,
    pub status: InvoiceStatus,
    pub occurred_at: DateTime<Utc>,
}

/// Lines grouped by invoice number, each group in input order.
pub fn group_lines(lines: &[ImportInvoiceLine]) -> HashMap<&str, Vec<&ImportInvoiceLine>> {
    let mut groups: HashMap<&str, Vec<&ImportInvoiceLine>> = HashMap::new();
    for line in lines {
        groups
            .entry(line.invoice_number.as_str())
            .or_default()
            .push(line);
    }
    groups
}

/// Assemble and queue the invoice described by `header`.
///
/// Lines are ordered by their sequence number (stable for equal numbers) and
/// renumbered from 1.
pub fn assemble_invoice<U>(
    uow: &mut U,
    resolver: &mut EntityResolver,
    header: &ImportInvoiceHeader,
    lines: &[&ImportInvoiceLine],
    ctx: &AssemblyContext,
) -> Result<ImportedInvoice, ImportError>
where
    U: UnitOfWork + ?Sized,
{
    if lines.is_empty() {
        return Err(ImportError::NoLines(header.invoice_number.clone()));
    }

    let company = resolver.resolve_company(uow, header)?;
    let company_id = company.id_typed();

    let mut ordered = lines.to_vec();
    ordered.sort_by_key(|line| line.sequence);

    let mut invoice_lines = Vec::with_capacity(ordered.len());
    for (idx, line) in ordered.into_iter().enumerate() {
        let worker = resolver.resolve_worker(uow, line)?;
        let job = resolver.resolve_job(uow, company_id, line)?;

        invoice_lines.push(InvoiceLine {
            line_no: idx as u32 + 1,
            worker_id: worker.id_typed(),
            job_id: job.id_typed(),
            quantity: line.quantity,
            unit_price: line.unit_price,
            line_total: line.line_total,
            name_override: override_text(&line.job_name, job.name()),
            description_override: override_text(&line.job_description, job.description()),
        });
    }

    let invoice = Invoice::issue(IssueInvoice {
        invoice_id: InvoiceId::new(EntityId::new()),
        invoice_number: header.invoice_number.clone(),
        company_id,
        invoice_date: header.invoice_date,
        due_date: header.due_date,
        notes: header.notes.clone(),
        vat_percentage: header.vat_percentage,
        lines: invoice_lines,
        status: ctx.status,
        batch_id: Some(ctx.batch_id),
        created_by: ctx.created_by,
        occurred_at: ctx.occurred_at,
    })?;

    let imported = ImportedInvoice::new(header.row, &invoice);
    uow.add_invoice(invoice)?;
    Ok(imported)
}

/// Imported text is kept only when present and different (case-sensitive)
/// from the job's own text.
fn override_text(imported: &str, canonical: &str) -> Option<String> {
    (!imported.is_empty() && imported != canonical).then(|| imported.to_string())
}
