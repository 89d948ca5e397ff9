use serde::{Deserialize, Serialize};

use tagihan_core::{DomainError, DomainResult, Entity, EntityId};

/// Division assigned to workers created by an import.
pub const IMPORTED_DIVISION: &str = "Imported";

/// Worker identifier.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct WorkerId(pub EntityId);

impl WorkerId {
    pub fn new(id: EntityId) -> Self {
        Self(id)
    }
}

impl core::fmt::Display for WorkerId {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        core::fmt::Display::fmt(&self.0, f)
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Gender {
    #[default]
    Male,
    Female,
}

/// Master record: a worker whose job is billed on invoice lines.
///
/// The passport number is the natural key; lookups match it exactly.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Worker {
    id: WorkerId,
    name: String,
    passport: String,
    division: String,
    gender: Gender,
    active: bool,
}

impl Worker {
    pub fn new(
        id: WorkerId,
        name: impl Into<String>,
        passport: impl Into<String>,
        division: impl Into<String>,
        gender: Gender,
    ) -> DomainResult<Self> {
        let name = name.into();
        let passport = passport.into();

        if name.trim().is_empty() {
            return Err(DomainError::validation("worker name cannot be empty"));
        }
        if passport.trim().is_empty() {
            return Err(DomainError::validation("worker passport cannot be empty"));
        }

        Ok(Self {
            id,
            name,
            passport,
            division: division.into(),
            gender,
            active: true,
        })
    }

    /// Worker created from imported data, tagged with [`IMPORTED_DIVISION`].
    pub fn imported(
        id: WorkerId,
        name: impl Into<String>,
        passport: impl Into<String>,
    ) -> DomainResult<Self> {
        Self::new(id, name, passport, IMPORTED_DIVISION, Gender::default())
    }

    pub fn id_typed(&self) -> WorkerId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn passport(&self) -> &str {
        &self.passport
    }

    pub fn division(&self) -> &str {
        &self.division
    }

    pub fn gender(&self) -> Gender {
        self.gender
    }

    pub fn is_active(&self) -> bool {
        self.active
    }
}

impl Entity for Worker {
    type Id = WorkerId;

    fn id(&self) -> &Self::Id {
        &self.id
    }
}
