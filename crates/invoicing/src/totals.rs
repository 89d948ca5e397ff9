use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use tagihan_core::{DomainError, DomainResult, ValueObject};

use crate::rounding::{domain_round, round_vat};

/// Computed amounts of an invoice.
///
/// Invariants (enforced by [`InvoiceTotals::compute`]):
/// - `subtotal` is the exact sum of the line totals as given;
/// - `vat_amount = round(subtotal * vat_percentage / 100, 2)`;
/// - `total_amount = domain_round(subtotal + vat_amount)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct InvoiceTotals {
    pub subtotal: Decimal,
    pub vat_percentage: Decimal,
    pub vat_amount: Decimal,
    pub total_amount: Decimal,
}

impl ValueObject for InvoiceTotals {}

impl InvoiceTotals {
    pub fn compute(
        line_totals: impl IntoIterator<Item = Decimal>,
        vat_percentage: Decimal,
    ) -> DomainResult<Self> {
        if vat_percentage.is_sign_negative() || vat_percentage > Decimal::ONE_HUNDRED {
            return Err(DomainError::validation(format!(
                "vat percentage must be between 0 and 100 (got {vat_percentage})"
            )));
        }

        let mut subtotal = Decimal::ZERO;
        for amount in line_totals {
            subtotal = subtotal
                .checked_add(amount)
                .ok_or_else(|| DomainError::invariant("invoice subtotal overflow"))?;
        }

        let vat_amount = round_vat(subtotal, vat_percentage)
            .ok_or_else(|| DomainError::invariant("invoice vat amount overflow"))?;
        let total = subtotal
            .checked_add(vat_amount)
            .ok_or_else(|| DomainError::invariant("invoice total overflow"))?;

        Ok(Self {
            subtotal,
            vat_percentage,
            vat_amount,
            total_amount: domain_round(total),
        })
    }

    /// `subtotal + vat_amount` before whole-unit rounding.
    pub fn unrounded_total(&self) -> Decimal {
        self.subtotal + self.vat_amount
    }
}
