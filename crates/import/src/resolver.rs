//! Entity resolver.
//!
//! Finds each master record by its natural key, or creates it when the batch
//! allows creation.
//!
//! | entity           | natural key                         |
//! |------------------|-------------------------------------|
//! | company          | tax id (exact)                      |
//! | worker           | passport (exact)                    |
//! | job description  | (company, name) ignoring case       |
//!
//! ## Memoization
//!
//! Records queued with `add_*` stay invisible to lookups until the unit of
//! work commits, so every successful resolution is remembered for the rest of
//! the batch. A key seen twice resolves to the same record and is never
//! created twice. Failures are not remembered.

use std::collections::HashMap;

use serde::Serialize;

use tagihan_catalog::{JobDescription, JobDescriptionId};
use tagihan_core::EntityId;
use tagihan_infra::UnitOfWork;
use tagihan_parties::{Company, CompanyId, Worker, WorkerId};

use crate::error::{EntityKind, ImportError};
use crate::records::{ImportInvoiceHeader, ImportInvoiceLine};

/// Master records created during one batch.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct CreatedCounts {
    pub companies: usize,
    pub workers: usize,
    pub jobs: usize,
}

impl CreatedCounts {
    pub fn is_empty(&self) -> bool {
        self.companies + self.workers + self.jobs == 0
    }
}

/// Per-batch find-or-create resolver.
#[derive(Debug)]
pub struct EntityResolver {
    allow_create: bool,
    companies: HashMap<String, Company>,
    workers: HashMap<String, Worker>,
    jobs: HashMap<(CompanyId, String), JobDescription>,
    created: CreatedCounts,
}

impl EntityResolver {
    pub fn new(allow_create: bool) -> Self {
        Self {
            allow_create,
            companies: HashMap::new(),
            workers: HashMap::new(),
            jobs: HashMap::new(),
            created: CreatedCounts::default(),
        }
    }

    pub fn created(&self) -> CreatedCounts {
        self.created
    }

    pub fn resolve_company<U>(
        &mut self,
        uow: &mut U,
        header: &ImportInvoiceHeader,
    ) -> Result<Company, ImportError>
    where
        U: UnitOfWork + ?Sized,
    {
        let tax_id = require_key(EntityKind::Company, &header.company_tax_id)?;
        if let Some(company) = self.companies.get(tax_id) {
            return Ok(company.clone());
        }

        let company = match uow.find_company_by_tax_id(tax_id)? {
            Some(found) => found,
            None => {
                self.ensure_can_create(EntityKind::Company, tax_id)?;
                let company = Company::imported(
                    CompanyId::new(EntityId::new()),
                    header.company_name.as_str(),
                    tax_id,
                )
                .map_err(|source| ImportError::InvalidEntity {
                    entity: EntityKind::Company,
                    source,
                })?;
                uow.add_company(company.clone())?;
                self.created.companies += 1;
                tracing::debug!(company_id = %company.id_typed(), tax_id, "company created");
                company
            }
        };

        self.companies.insert(tax_id.to_string(), company.clone());
        Ok(company)
    }

    pub fn resolve_worker<U>(
        &mut self,
        uow: &mut U,
        line: &ImportInvoiceLine,
    ) -> Result<Worker, ImportError>
    where
        U: UnitOfWork + ?Sized,
    {
        let passport = require_key(EntityKind::Worker, &line.worker_passport)?;
        if let Some(worker) = self.workers.get(passport) {
            return Ok(worker.clone());
        }

        let worker = match uow.find_worker_by_passport(passport)? {
            Some(found) => found,
            None => {
                self.ensure_can_create(EntityKind::Worker, passport)?;
                let worker = Worker::imported(
                    WorkerId::new(EntityId::new()),
                    line.worker_name.as_str(),
                    passport,
                )
                .map_err(|source| ImportError::InvalidEntity {
                    entity: EntityKind::Worker,
                    source,
                })?;
                uow.add_worker(worker.clone())?;
                self.created.workers += 1;
                tracing::debug!(worker_id = %worker.id_typed(), passport, "worker created");
                worker
            }
        };

        self.workers.insert(passport.to_string(), worker.clone());
        Ok(worker)
    }

    /// Resolve the job named on `line` within `company_id`. A created job takes
    /// the line's unit price as its price.
    pub fn resolve_job<U>(
        &mut self,
        uow: &mut U,
        company_id: CompanyId,
        line: &ImportInvoiceLine,
    ) -> Result<JobDescription, ImportError>
    where
        U: UnitOfWork + ?Sized,
    {
        let name = require_key(EntityKind::JobDescription, &line.job_name)?;
        let key = (company_id, name.to_lowercase());
        if let Some(job) = self.jobs.get(&key) {
            return Ok(job.clone());
        }

        let job = match uow.find_job_by_name_in_company(company_id, name)? {
            Some(found) => found,
            None => {
                self.ensure_can_create(EntityKind::JobDescription, name)?;
                let job = JobDescription::imported(
                    JobDescriptionId::new(EntityId::new()),
                    company_id,
                    name,
                    line.job_description.as_str(),
                    line.unit_price,
                )
                .map_err(|source| ImportError::InvalidEntity {
                    entity: EntityKind::JobDescription,
                    source,
                })?;
                uow.add_job(job.clone())?;
                self.created.jobs += 1;
                tracing::debug!(job_id = %job.id_typed(), %company_id, name, "job description created");
                job
            }
        };

        self.jobs.insert(key, job.clone());
        Ok(job)
    }

    fn ensure_can_create(&self, entity: EntityKind, key: &str) -> Result<(), ImportError> {
        if self.allow_create {
            Ok(())
        } else {
            Err(ImportError::not_found(entity, key))
        }
    }
}

fn require_key(entity: EntityKind, key: &str) -> Result<&str, ImportError> {
    let key = key.trim();
    if key.is_empty() {
        return Err(ImportError::MissingKey { entity });
    }
    Ok(key)
}
