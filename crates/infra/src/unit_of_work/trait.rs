use thiserror::Error;

use tagihan_catalog::JobDescription;
use tagihan_invoicing::Invoice;
use tagihan_parties::{Company, CompanyId, Worker};

use super::import_log::ImportLogEntry;

/// Storage operation error.
///
/// These are **infrastructure errors** (constraint violations, backend
/// failures) as opposed to domain errors (validation, invariants).
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum StoreError {
    /// A uniqueness constraint rejected the write.
    #[error("constraint violation: {0}")]
    Conflict(String),

    /// The backend failed (connection lost, lock poisoned, ...).
    #[error("storage backend failure: {0}")]
    Backend(String),
}

/// Number of records persisted by one successful commit.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CommitSummary {
    pub companies: usize,
    pub workers: usize,
    pub jobs: usize,
    pub invoices: usize,
}

/// Unit of work over the master records and invoices.
///
/// ## Queue Semantics
///
/// `add_*` calls only queue a record. Queued records are **not** returned by
/// the `find_*` lookups until `commit` succeeds, so callers that need to see
/// their own additions must remember them (the import engine memoizes every
/// resolution for the duration of a batch).
///
/// ## Commit Semantics
///
/// `commit()` persists every queued record atomically (all or nothing) and
/// clears the queue. On error nothing is persisted and the queue is left as is;
/// call `rollback()` to discard it.
///
/// ## Audit Log
///
/// `add_import_log()` writes immediately and is independent of the queue.
///
/// ## Concurrency
///
/// Implementations are not required to coordinate concurrent units of work.
/// Duplicate natural keys created by concurrent batches must be rejected by
/// the backend's uniqueness constraints at commit time.
pub trait UnitOfWork {
    /// Company whose tax identifier equals `tax_id` exactly.
    fn find_company_by_tax_id(&self, tax_id: &str) -> Result<Option<Company>, StoreError>;

    /// Worker whose passport equals `passport` exactly.
    fn find_worker_by_passport(&self, passport: &str) -> Result<Option<Worker>, StoreError>;

    /// Job of `company_id` whose name equals `name` ignoring case.
    fn find_job_by_name_in_company(
        &self,
        company_id: CompanyId,
        name: &str,
    ) -> Result<Option<JobDescription>, StoreError>;

    /// Committed invoice whose number equals `number` exactly.
    fn find_invoice_by_number(&self, number: &str) -> Result<Option<Invoice>, StoreError>;

    fn add_company(&mut self, company: Company) -> Result<(), StoreError>;

    fn add_worker(&mut self, worker: Worker) -> Result<(), StoreError>;

    fn add_job(&mut self, job: JobDescription) -> Result<(), StoreError>;

    fn add_invoice(&mut self, invoice: Invoice) -> Result<(), StoreError>;

    /// Atomically persist everything queued since the last commit/rollback.
    fn commit(&mut self) -> Result<CommitSummary, StoreError>;

    /// Discard everything queued since the last commit.
    fn rollback(&mut self);

    fn add_import_log(&mut self, entry: ImportLogEntry) -> Result<(), StoreError>;
}

impl<U> UnitOfWork for &mut U
where
    U: UnitOfWork + ?Sized,
{
    fn find_company_by_tax_id(&self, tax_id: &str) -> Result<Option<Company>, StoreError> {
        (**self).find_company_by_tax_id(tax_id)
    }

    fn find_worker_by_passport(&self, passport: &str) -> Result<Option<Worker>, StoreError> {
        (**self).find_worker_by_passport(passport)
    }

    fn find_job_by_name_in_company(
        &self,
        company_id: CompanyId,
        name: &str,
    ) -> Result<Option<JobDescription>, StoreError> {
        (**self).find_job_by_name_in_company(company_id, name)
    }

    fn find_invoice_by_number(&self, number: &str) -> Result<Option<Invoice>, StoreError> {
        (**self).find_invoice_by_number(number)
    }

    fn add_company(&mut self, company: Company) -> Result<(), StoreError> {
        (**self).add_company(company)
    }

    fn add_worker(&mut self, worker: Worker) -> Result<(), StoreError> {
        (**self).add_worker(worker)
    }

    fn add_job(&mut self, job: JobDescription) -> Result<(), StoreError> {
        (**self).add_job(job)
    }

    fn add_invoice(&mut self, invoice: Invoice) -> Result<(), StoreError> {
        (**self).add_invoice(invoice)
    }

    fn commit(&mut self) -> Result<CommitSummary, StoreError> {
        (**self).commit()
    }

    fn rollback(&mut self) {
        (**self).rollback()
    }

    fn add_import_log(&mut self, entry: ImportLogEntry) -> Result<(), StoreError> {
        (**self).add_import_log(entry)
    }
}
