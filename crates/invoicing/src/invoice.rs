use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use tagihan_catalog::JobDescriptionId;
use tagihan_core::{BatchId, DomainError, DomainResult, Entity, EntityId, UserId};
use tagihan_parties::{CompanyId, WorkerId};

use crate::totals::InvoiceTotals;

/// Invoice identifier.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct InvoiceId(pub EntityId);

impl InvoiceId {
    pub fn new(id: EntityId) -> Self {
        Self(id)
    }
}

impl core::fmt::Display for InvoiceId {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        core::fmt::Display::fmt(&self.0, f)
    }
}

/// Initial invoice status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InvoiceStatus {
    Draft,
    Issued,
}

/// Invoice line referencing a worker and a job template.
///
/// `name_override` / `description_override` are only set when the line's text
/// differs from the job template; otherwise the line inherits the template.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InvoiceLine {
    pub line_no: u32,
    pub worker_id: WorkerId,
    pub job_id: JobDescriptionId,
    pub quantity: i64,
    pub unit_price: Decimal,
    /// Line amount as supplied; never recomputed from quantity and price.
    pub line_total: Decimal,
    pub name_override: Option<String>,
    pub description_override: Option<String>,
}

/// Command: IssueInvoice.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IssueInvoice {
    pub invoice_id: InvoiceId,
    pub invoice_number: String,
    pub company_id: CompanyId,
    pub invoice_date: NaiveDate,
    pub due_date: Option<NaiveDate>,
    pub notes: Option<String>,
    pub vat_percentage: Decimal,
    pub lines: Vec<InvoiceLine>,
    pub status: InvoiceStatus,
    pub batch_id: Option<BatchId>,
    pub created_by: UserId,
    pub occurred_at: DateTime<Utc>,
}

/// Invoice issued from an import batch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Invoice {
    id: InvoiceId,
    invoice_number: String,
    company_id: CompanyId,
    invoice_date: NaiveDate,
    due_date: Option<NaiveDate>,
    notes: Option<String>,
    status: InvoiceStatus,
    lines: Vec<InvoiceLine>,
    totals: InvoiceTotals,
    batch_id: Option<BatchId>,
    created_by: UserId,
    created_at: DateTime<Utc>,
}

impl Invoice {
    /// Build an invoice from a command, computing its totals.
    ///
    /// Fails when the invoice has no lines, no number, or an out-of-range VAT
    /// percentage. Line totals are taken as given.
    pub fn issue(cmd: IssueInvoice) -> DomainResult<Self> {
        if cmd.invoice_number.trim().is_empty() {
            return Err(DomainError::validation("invoice number cannot be empty"));
        }
        if cmd.lines.is_empty() {
            return Err(DomainError::validation("cannot issue invoice without lines"));
        }

        let totals = InvoiceTotals::compute(
            cmd.lines.iter().map(|line| line.line_total),
            cmd.vat_percentage,
        )?;

        Ok(Self {
            id: cmd.invoice_id,
            invoice_number: cmd.invoice_number,
            company_id: cmd.company_id,
            invoice_date: cmd.invoice_date,
            due_date: cmd.due_date,
            notes: cmd.notes,
            status: cmd.status,
            lines: cmd.lines,
            totals,
            batch_id: cmd.batch_id,
            created_by: cmd.created_by,
            created_at: cmd.occurred_at,
        })
    }

    pub fn id_typed(&self) -> InvoiceId {
        self.id
    }

    pub fn invoice_number(&self) -> &str {
        &self.invoice_number
    }

    pub fn company_id(&self) -> CompanyId {
        self.company_id
    }

    pub fn invoice_date(&self) -> NaiveDate {
        self.invoice_date
    }

    pub fn due_date(&self) -> Option<NaiveDate> {
        self.due_date
    }

    pub fn notes(&self) -> Option<&str> {
        self.notes.as_deref()
    }

    pub fn status(&self) -> InvoiceStatus {
        self.status
    }

    pub fn lines(&self) -> &[InvoiceLine] {
        &self.lines
    }

    pub fn totals(&self) -> &InvoiceTotals {
        &self.totals
    }

    pub fn subtotal(&self) -> Decimal {
        self.totals.subtotal
    }

    pub fn vat_percentage(&self) -> Decimal {
        self.totals.vat_percentage
    }

    pub fn vat_amount(&self) -> Decimal {
        self.totals.vat_amount
    }

    pub fn total_amount(&self) -> Decimal {
        self.totals.total_amount
    }

    pub fn batch_id(&self) -> Option<BatchId> {
        self.batch_id
    }

    pub fn created_by(&self) -> UserId {
        self.created_by
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }
}

impl Entity for Invoice {
    type Id = InvoiceId;

    fn id(&self) -> &Self::Id {
        &self.id
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn test_date(day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 5, day).unwrap()
    }

    fn line(line_no: u32, total: Decimal) -> InvoiceLine {
        InvoiceLine {
            line_no,
            worker_id: WorkerId::new(EntityId::new()),
            job_id: JobDescriptionId::new(EntityId::new()),
            quantity: 1,
            unit_price: total,
            line_total: total,
            name_override: None,
            description_override: None,
        }
    }

    fn issue_cmd(lines: Vec<InvoiceLine>) -> IssueInvoice {
        IssueInvoice {
            invoice_id: InvoiceId::new(EntityId::new()),
            invoice_number: "INV-1".to_string(),
            company_id: CompanyId::new(EntityId::new()),
            invoice_date: test_date(1),
            due_date: Some(test_date(31)),
            notes: None,
            vat_percentage: dec!(11),
            lines,
            status: InvoiceStatus::Issued,
            batch_id: Some(BatchId::new()),
            created_by: UserId::new(),
            occurred_at: Utc::now(),
        }
    }

    #[test]
    fn issue_computes_totals_from_line_totals() {
        let cmd = issue_cmd(vec![line(1, dec!(3000000)), line(2, dec!(2000000))]);
        let batch_id = cmd.batch_id;

        let invoice = Invoice::issue(cmd).unwrap();

        assert_eq!(invoice.subtotal(), dec!(5000000));
        assert_eq!(invoice.vat_amount(), dec!(550000.00));
        assert_eq!(invoice.total_amount(), dec!(5550000));
        assert_eq!(invoice.batch_id(), batch_id);
        assert_eq!(invoice.lines().len(), 2);
    }

    #[test]
    fn line_total_is_not_recomputed() {
        let mut odd = line(1, dec!(1000));
        odd.quantity = 3;
        odd.unit_price = dec!(500);

        let invoice = Invoice::issue(issue_cmd(vec![odd])).unwrap();
        assert_eq!(invoice.subtotal(), dec!(1000));
    }

    #[test]
    fn cannot_issue_without_lines() {
        let err = Invoice::issue(issue_cmd(vec![])).unwrap_err();
        match err {
            DomainError::Validation(msg) if msg.contains("without lines") => {}
            _ => panic!("Expected Validation error for empty invoice"),
        }
    }

    #[test]
    fn cannot_issue_without_number() {
        let mut cmd = issue_cmd(vec![line(1, dec!(10))]);
        cmd.invoice_number = " ".to_string();

        assert!(matches!(
            Invoice::issue(cmd).unwrap_err(),
            DomainError::Validation(_)
        ));
    }

    #[test]
    fn serializes_status_lowercase() {
        let mut cmd = issue_cmd(vec![line(1, dec!(10))]);
        cmd.status = InvoiceStatus::Draft;
        let invoice = Invoice::issue(cmd).unwrap();

        let json = serde_json::to_value(&invoice).unwrap();
        assert_eq!(json["status"], "draft");
        assert_eq!(json["invoice_number"], "INV-1");
    }
}
