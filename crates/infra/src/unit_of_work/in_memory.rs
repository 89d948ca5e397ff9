use std::collections::{HashMap, HashSet};

use tagihan_catalog::{JobDescription, JobDescriptionId};
use tagihan_invoicing::{Invoice, InvoiceId};
use tagihan_parties::{Company, CompanyId, Worker, WorkerId};

use super::import_log::ImportLogEntry;
use super::r#trait::{CommitSummary, StoreError, UnitOfWork};

#[derive(Debug, Clone)]
enum Pending {
    Company(Company),
    Worker(Worker),
    Job(JobDescription),
    Invoice(Invoice),
}

/// In-memory unit of work.
///
/// Intended for tests/dev. Enforces the same uniqueness constraints a
/// relational backend would (tax id, passport, job name per company, invoice
/// number) at commit time.
#[derive(Debug, Default)]
pub struct InMemoryUnitOfWork {
    companies: HashMap<CompanyId, Company>,
    workers: HashMap<WorkerId, Worker>,
    jobs: HashMap<JobDescriptionId, JobDescription>,
    invoices: HashMap<InvoiceId, Invoice>,
    import_logs: Vec<ImportLogEntry>,
    pending: Vec<Pending>,
    fail_next_commit: Option<String>,
    commits: usize,
}

impl InMemoryUnitOfWork {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store pre-populated with committed master records.
    pub fn seeded(
        companies: impl IntoIterator<Item = Company>,
        workers: impl IntoIterator<Item = Worker>,
        jobs: impl IntoIterator<Item = JobDescription>,
    ) -> Self {
        let mut store = Self::new();
        for c in companies {
            store.companies.insert(c.id_typed(), c);
        }
        for w in workers {
            store.workers.insert(w.id_typed(), w);
        }
        for j in jobs {
            store.jobs.insert(j.id_typed(), j);
        }
        store
    }

    /// Make the next `commit` fail with a backend error (fault injection).
    pub fn fail_next_commit(&mut self, reason: impl Into<String>) {
        self.fail_next_commit = Some(reason.into());
    }

    pub fn companies(&self) -> Vec<&Company> {
        self.companies.values().collect()
    }

    pub fn workers(&self) -> Vec<&Worker> {
        self.workers.values().collect()
    }

    pub fn jobs(&self) -> Vec<&JobDescription> {
        self.jobs.values().collect()
    }

    /// Committed invoices ordered by invoice number.
    pub fn invoices(&self) -> Vec<&Invoice> {
        let mut invoices: Vec<&Invoice> = self.invoices.values().collect();
        invoices.sort_by(|a, b| a.invoice_number().cmp(b.invoice_number()));
        invoices
    }

    pub fn invoice_by_number(&self, number: &str) -> Option<&Invoice> {
        self.invoices.values().find(|i| i.invoice_number() == number)
    }

    pub fn import_logs(&self) -> &[ImportLogEntry] {
        &self.import_logs
    }

    pub fn pending_len(&self) -> usize {
        self.pending.len()
    }

    /// Number of successful commits so far.
    pub fn commit_count(&self) -> usize {
        self.commits
    }

    fn check_constraints(&self) -> Result<(), StoreError> {
        let mut tax_ids: HashSet<&str> = self.companies.values().map(|c| c.tax_id()).collect();
        let mut passports: HashSet<&str> =
            self.workers.values().map(|w| w.passport()).collect();
        let mut job_keys: HashSet<(CompanyId, String)> = self
            .jobs
            .values()
            .map(|j| (j.company_id(), j.name().to_lowercase()))
            .collect();
        let mut numbers: HashSet<&str> =
            self.invoices.values().map(|i| i.invoice_number()).collect();

        for change in &self.pending {
            let fresh = match change {
                Pending::Company(c) => tax_ids.insert(c.tax_id()),
                Pending::Worker(w) => passports.insert(w.passport()),
                Pending::Job(j) => job_keys.insert((j.company_id(), j.name().to_lowercase())),
                Pending::Invoice(i) => numbers.insert(i.invoice_number()),
            };
            if !fresh {
                return Err(StoreError::Conflict(Self::describe(change)));
            }
        }

        Ok(())
    }

    fn describe(change: &Pending) -> String {
        match change {
            Pending::Company(c) => format!("duplicate company tax id '{}'", c.tax_id()),
            Pending::Worker(w) => format!("duplicate worker passport '{}'", w.passport()),
            Pending::Job(j) => format!(
                "duplicate job '{}' for company {}",
                j.name(),
                j.company_id()
            ),
            Pending::Invoice(i) => format!("duplicate invoice number '{}'", i.invoice_number()),
        }
    }
}

impl UnitOfWork for InMemoryUnitOfWork {
    fn find_company_by_tax_id(&self, tax_id: &str) -> Result<Option<Company>, StoreError> {
        Ok(self.companies.values().find(|c| c.tax_id() == tax_id).cloned())
    }

    fn find_worker_by_passport(&self, passport: &str) -> Result<Option<Worker>, StoreError> {
        Ok(self
            .workers
            .values()
            .find(|w| w.passport() == passport)
            .cloned())
    }

    fn find_job_by_name_in_company(
        &self,
        company_id: CompanyId,
        name: &str,
    ) -> Result<Option<JobDescription>, StoreError> {
        Ok(self
            .jobs
            .values()
            .find(|j| j.matches_name(company_id, name))
            .cloned())
    }

    fn find_invoice_by_number(&self, number: &str) -> Result<Option<Invoice>, StoreError> {
        Ok(self.invoice_by_number(number).cloned())
    }

    fn add_company(&mut self, company: Company) -> Result<(), StoreError> {
        self.pending.push(Pending::Company(company));
        Ok(())
    }

    fn add_worker(&mut self, worker: Worker) -> Result<(), StoreError> {
        self.pending.push(Pending::Worker(worker));
        Ok(())
    }

    fn add_job(&mut self, job: JobDescription) -> Result<(), StoreError> {
        self.pending.push(Pending::Job(job));
        Ok(())
    }

    fn add_invoice(&mut self, invoice: Invoice) -> Result<(), StoreError> {
        self.pending.push(Pending::Invoice(invoice));
        Ok(())
    }

    fn commit(&mut self) -> Result<CommitSummary, StoreError> {
        if let Some(reason) = self.fail_next_commit.take() {
            return Err(StoreError::Backend(reason));
        }

        self.check_constraints()?;

        let mut summary = CommitSummary::default();
        for change in self.pending.drain(..) {
            match change {
                Pending::Company(c) => {
                    summary.companies += 1;
                    self.companies.insert(c.id_typed(), c);
                }
                Pending::Worker(w) => {
                    summary.workers += 1;
                    self.workers.insert(w.id_typed(), w);
                }
                Pending::Job(j) => {
                    summary.jobs += 1;
                    self.jobs.insert(j.id_typed(), j);
                }
                Pending::Invoice(i) => {
                    summary.invoices += 1;
                    self.invoices.insert(i.id_typed(), i);
                }
            }
        }

        self.commits += 1;
        tracing::debug!(?summary, "in-memory unit of work committed");
        Ok(summary)
    }

    fn rollback(&mut self) {
        self.pending.clear();
    }

    fn add_import_log(&mut self, entry: ImportLogEntry) -> Result<(), StoreError> {
        self.import_logs.push(entry);
        Ok(())
    }
}
