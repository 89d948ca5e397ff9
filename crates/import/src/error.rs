//! Import error model.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use tagihan_core::DomainError;
use tagihan_infra::StoreError;

/// Master entity kinds the resolver works with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EntityKind {
    Company,
    Worker,
    JobDescription,
}

impl core::fmt::Display for EntityKind {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            EntityKind::Company => f.write_str("company"),
            EntityKind::Worker => f.write_str("worker"),
            EntityKind::JobDescription => f.write_str("job description"),
        }
    }
}

/// Which part of a record an error is about.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ErrorField {
    General,
    Source,
    InvoiceNumber,
    Lines,
    Company,
    Worker,
    JobDescription,
    Commit,
}

impl From<EntityKind> for ErrorField {
    fn from(kind: EntityKind) -> Self {
        match kind {
            EntityKind::Company => ErrorField::Company,
            EntityKind::Worker => ErrorField::Worker,
            EntityKind::JobDescription => ErrorField::JobDescription,
        }
    }
}

/// Errors raised while importing.
///
/// `InvalidStructure` and `Csv` are batch-level (fatal); everything else is
/// caught per invoice and turned into an [`crate::ImportRecordError`].
#[derive(Debug, Error)]
pub enum ImportError {
    #[error("invalid import source: {0}")]
    InvalidStructure(String),

    #[error("failed to read delimited text: {0}")]
    Csv(#[from] csv::Error),

    #[error("no lines found for invoice '{0}'")]
    NoLines(String),

    #[error("duplicate invoice number '{0}' in batch")]
    DuplicateInvoiceNumber(String),

    #[error("invoice number '{0}' already exists")]
    InvoiceNumberExists(String),

    #[error("{entity} '{key}' not found")]
    NotFound { entity: EntityKind, key: String },

    #[error("{entity} identifier is empty")]
    MissingKey { entity: EntityKind },

    #[error("cannot create {entity}: {source}")]
    InvalidEntity {
        entity: EntityKind,
        #[source]
        source: DomainError,
    },

    #[error(transparent)]
    Domain(#[from] DomainError),

    #[error("storage error: {0}")]
    Store(#[from] StoreError),
}

impl ImportError {
    pub fn not_found(entity: EntityKind, key: impl Into<String>) -> Self {
        Self::NotFound {
            entity,
            key: key.into(),
        }
    }

    /// Whether this error aborts the whole batch rather than one record.
    pub fn is_fatal(&self) -> bool {
        matches!(self, ImportError::InvalidStructure(_) | ImportError::Csv(_))
    }

    /// Field tag reported with the record error.
    pub fn field(&self) -> ErrorField {
        match self {
            ImportError::InvalidStructure(_) | ImportError::Csv(_) => ErrorField::Source,
            ImportError::NoLines(_) => ErrorField::Lines,
            ImportError::DuplicateInvoiceNumber(_) | ImportError::InvoiceNumberExists(_) => {
                ErrorField::InvoiceNumber
            }
            ImportError::NotFound { entity, .. }
            | ImportError::MissingKey { entity }
            | ImportError::InvalidEntity { entity, .. } => (*entity).into(),
            ImportError::Domain(_) | ImportError::Store(_) => ErrorField::General,
        }
    }
}
