use serde::{Deserialize, Serialize};

use tagihan_core::{DomainError, DomainResult, Entity, EntityId};

/// Address stored on companies created without one (e.g. by an import).
pub const PLACEHOLDER_ADDRESS: &str = "-";

/// Company identifier.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CompanyId(pub EntityId);

impl CompanyId {
    pub fn new(id: EntityId) -> Self {
        Self(id)
    }
}

impl core::fmt::Display for CompanyId {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        core::fmt::Display::fmt(&self.0, f)
    }
}

/// Master record: a company that receives invoices.
///
/// The tax identifier is the natural key; lookups match it exactly.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Company {
    id: CompanyId,
    name: String,
    tax_id: String,
    /// Secondary tax identifier (e.g. the 16-digit form of the tax number).
    tax_id_alt: String,
    address: String,
    active: bool,
}

impl Company {
    pub fn new(
        id: CompanyId,
        name: impl Into<String>,
        tax_id: impl Into<String>,
        tax_id_alt: impl Into<String>,
        address: impl Into<String>,
    ) -> DomainResult<Self> {
        let name = name.into();
        let tax_id = tax_id.into();

        if name.trim().is_empty() {
            return Err(DomainError::validation("company name cannot be empty"));
        }
        if tax_id.trim().is_empty() {
            return Err(DomainError::validation("company tax id cannot be empty"));
        }

        Ok(Self {
            id,
            name,
            tax_id,
            tax_id_alt: tax_id_alt.into(),
            address: address.into(),
            active: true,
        })
    }

    /// Company created from imported data: the secondary tax id mirrors the
    /// primary one and the address is a placeholder.
    pub fn imported(
        id: CompanyId,
        name: impl Into<String>,
        tax_id: impl Into<String>,
    ) -> DomainResult<Self> {
        let tax_id = tax_id.into();
        Self::new(id, name, tax_id.clone(), tax_id, PLACEHOLDER_ADDRESS)
    }

    pub fn id_typed(&self) -> CompanyId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn tax_id(&self) -> &str {
        &self.tax_id
    }

    pub fn tax_id_alt(&self) -> &str {
        &self.tax_id_alt
    }

    pub fn address(&self) -> &str {
        &self.address
    }

    pub fn is_active(&self) -> bool {
        self.active
    }
}

impl Entity for Company {
    type Id = CompanyId;

    fn id(&self) -> &Self::Id {
        &self.id
    }
}
