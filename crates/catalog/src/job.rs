use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use tagihan_core::{DomainError, DomainResult, Entity, EntityId};
use tagihan_parties::CompanyId;

/// Sort position that places a job after every manually ordered entry.
pub const APPEND_SORT_ORDER: i32 = 9999;

/// Job description identifier.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct JobDescriptionId(pub EntityId);

impl JobDescriptionId {
    pub fn new(id: EntityId) -> Self {
        Self(id)
    }
}

impl core::fmt::Display for JobDescriptionId {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        core::fmt::Display::fmt(&self.0, f)
    }
}

/// Master record: a billable job template owned by one company.
///
/// The natural key is `(company_id, name)` with the name compared
/// case-insensitively (see [`JobDescription::matches_name`]).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JobDescription {
    id: JobDescriptionId,
    company_id: CompanyId,
    name: String,
    description: String,
    price: Decimal,
    sort_order: i32,
    active: bool,
}

impl JobDescription {
    pub fn new(
        id: JobDescriptionId,
        company_id: CompanyId,
        name: impl Into<String>,
        description: impl Into<String>,
        price: Decimal,
        sort_order: i32,
    ) -> DomainResult<Self> {
        let name = name.into();
        if name.trim().is_empty() {
            return Err(DomainError::validation("job name cannot be empty"));
        }
        if price.is_sign_negative() {
            return Err(DomainError::validation("job price cannot be negative"));
        }

        Ok(Self {
            id,
            company_id,
            name,
            description: description.into(),
            price,
            sort_order,
            active: true,
        })
    }

    /// Job created from imported data, appended after the existing ordering.
    pub fn imported(
        id: JobDescriptionId,
        company_id: CompanyId,
        name: impl Into<String>,
        description: impl Into<String>,
        price: Decimal,
    ) -> DomainResult<Self> {
        Self::new(id, company_id, name, description, price, APPEND_SORT_ORDER)
    }

    pub fn id_typed(&self) -> JobDescriptionId {
        self.id
    }

    pub fn company_id(&self) -> CompanyId {
        self.company_id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn price(&self) -> Decimal {
        self.price
    }

    pub fn sort_order(&self) -> i32 {
        self.sort_order
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    /// Natural-key comparison: same company, name equal ignoring case.
    pub fn matches_name(&self, company_id: CompanyId, name: &str) -> bool {
        self.company_id == company_id && self.name.to_lowercase() == name.to_lowercase()
    }
}

impl Entity for JobDescription {
    type Id = JobDescriptionId;

    fn id(&self) -> &Self::Id {
        &self.id
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn test_job_id() -> JobDescriptionId {
        JobDescriptionId::new(EntityId::new())
    }

    fn test_company_id() -> CompanyId {
        CompanyId::new(EntityId::new())
    }

    #[test]
    fn imported_job_is_appended_to_ordering() {
        let job = JobDescription::imported(
            test_job_id(),
            test_company_id(),
            "Welder",
            "Pipe welding",
            dec!(3000000),
        )
        .unwrap();

        assert_eq!(job.sort_order(), APPEND_SORT_ORDER);
        assert_eq!(job.price(), dec!(3000000));
        assert!(job.is_active());
    }

    #[test]
    fn name_match_ignores_case_but_not_company() {
        let company_id = test_company_id();
        let job =
            JobDescription::imported(test_job_id(), company_id, "Welder", "", dec!(0)).unwrap();

        assert!(job.matches_name(company_id, "WELDER"));
        assert!(job.matches_name(company_id, "welder"));
        assert!(!job.matches_name(test_company_id(), "Welder"));
        assert!(!job.matches_name(company_id, "Welder 2"));
    }

    #[test]
    fn rejects_negative_price() {
        let err = JobDescription::imported(
            test_job_id(),
            test_company_id(),
            "Welder",
            "",
            dec!(-1),
        )
        .unwrap_err();
        assert!(matches!(err, DomainError::Validation(_)));
    }
}
