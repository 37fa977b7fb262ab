//! Invoice total computation.
//!
//! Turns an ordered sequence of line items plus discount/VAT parameters into
//! the amounts shown on a printed invoice:
//!
//! | Step | Amount |
//! |------|-----------------------------------------------------|
//! | 1    | subtotal = Σ (unit_cost × quantity) |
//! | 2    | discount_amount = subtotal × discount% / 100 |
//! | 3    | after_discount = subtotal − discount_amount |
//! | 4    | vat_amount = after_discount × VAT% / 100 (0 if VAT not applied) |
//! | 5    | total = after_discount + vat_amount |
//!
//! All inputs are validated before step 1 runs; nothing is computed for an
//! invalid invoice. Amounts stay unrounded until [`InvoiceTotals::rounded`]
//! is called at presentation time.
//!
//! # Example
//!
//! ```
//! use rust_decimal_macros::dec;
//! use invoice_core::calculations::{TotalsCalculator, TotalsInput};
//! use invoice_core::models::LineItem;
//!
//! let items = vec![
//!     LineItem::new("Design", dec!(100.00), 2),
//!     LineItem::new("Hosting", dec!(50.00), 1),
//! ];
//! let input = TotalsInput {
//!     discount_pct: dec!(10),
//!     apply_vat: true,
//!     vat_pct: dec!(20),
//! };
//!
//! let totals = TotalsCalculator::new(&items).calculate(&input).unwrap();
//!
//! assert_eq!(totals.subtotal, dec!(250.00));
//! assert_eq!(totals.discount_amount, dec!(25.00));
//! assert_eq!(totals.vat_amount, dec!(45.00));
//! assert_eq!(totals.total, dec!(270.00));
//! ```

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

use crate::calculations::common::{percent_of, round_half_up};
use crate::models::LineItem;

/// Errors that can occur during invoice total computation.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TotalsError {
    /// The invoice has no line items.
    #[error("invoice has no line items")]
    EmptyLineItems,

    /// A line item carries a negative unit cost. Lines are numbered from 1.
    #[error("negative unit cost {cost} on line {line}")]
    NegativeUnitCost { line: usize, cost: Decimal },

    /// A line item carries a negative quantity. Lines are numbered from 1.
    #[error("negative quantity {quantity} on line {line}")]
    NegativeQuantity { line: usize, quantity: i64 },

    /// The discount percentage is outside the [0, 100] range.
    #[error("discount percentage {0} outside 0-100")]
    DiscountOutOfRange(Decimal),

    /// The VAT percentage is outside the [0, 100] range.
    #[error("VAT percentage {0} outside 0-100")]
    VatOutOfRange(Decimal),

    /// A computed amount exceeded the representable decimal range.
    #[error("invoice amounts exceed the representable decimal range")]
    AmountOverflow,
}

/// Discount and VAT parameters applied on top of the line items.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TotalsInput {
    /// Discount percentage in [0, 100], applied to the subtotal.
    pub discount_pct: Decimal,

    /// Whether VAT is charged on this invoice. When false, `vat_pct` is
    /// still validated but contributes nothing.
    pub apply_vat: bool,

    /// VAT percentage in [0, 100], applied to the discounted subtotal.
    pub vat_pct: Decimal,
}

/// Computed invoice amounts, unrounded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InvoiceTotals {
    pub subtotal: Decimal,
    pub discount_amount: Decimal,
    pub vat_amount: Decimal,
    pub total: Decimal,
}

impl InvoiceTotals {
    /// Subtotal with the discount taken off, before VAT.
    pub fn after_discount(&self) -> Decimal {
        self.subtotal - self.discount_amount
    }

    /// Copy with every amount rounded half-up to two decimal places.
    ///
    /// This is the presentation step; callers that keep computing should
    /// stay on the unrounded values.
    pub fn rounded(&self) -> Self {
        Self {
            subtotal: round_half_up(self.subtotal),
            discount_amount: round_half_up(self.discount_amount),
            vat_amount: round_half_up(self.vat_amount),
            total: round_half_up(self.total),
        }
    }
}

/// Calculator for invoice totals.
///
/// Borrows the line items; [`calculate`](Self::calculate) is a pure function
/// of the items and the [`TotalsInput`].
#[derive(Debug, Clone)]
pub struct TotalsCalculator<'a> {
    line_items: &'a [LineItem],
}

impl<'a> TotalsCalculator<'a> {
    pub fn new(line_items: &'a [LineItem]) -> Self {
        Self { line_items }
    }

    /// Computes subtotal, discount amount, VAT amount and final total.
    ///
    /// # Errors
    ///
    /// Returns [`TotalsError`] if the line items are empty, a line carries a
    /// negative unit cost or quantity, a percentage is outside [0, 100], or
    /// an amount overflows the decimal range. No partial computation is
    /// performed on invalid input.
    pub fn calculate(
        &self,
        input: &TotalsInput,
    ) -> Result<InvoiceTotals, TotalsError> {
        self.validate(input)?;

        let subtotal = self.subtotal()?;
        let discount_amount =
            percent_of(subtotal, input.discount_pct).ok_or(TotalsError::AmountOverflow)?;
        let after_discount = subtotal - discount_amount;
        let vat_amount = if input.apply_vat {
            percent_of(after_discount, input.vat_pct).ok_or(TotalsError::AmountOverflow)?
        } else {
            Decimal::ZERO
        };
        let total = after_discount
            .checked_add(vat_amount)
            .ok_or(TotalsError::AmountOverflow)?;

        debug!(%subtotal, %discount_amount, %vat_amount, %total, "computed invoice totals");

        Ok(InvoiceTotals {
            subtotal,
            discount_amount,
            vat_amount,
            total,
        })
    }

    fn validate(
        &self,
        input: &TotalsInput,
    ) -> Result<(), TotalsError> {
        if self.line_items.is_empty() {
            return Err(TotalsError::EmptyLineItems);
        }

        for (idx, item) in self.line_items.iter().enumerate() {
            if item.unit_cost < Decimal::ZERO {
                return Err(TotalsError::NegativeUnitCost {
                    line: idx + 1,
                    cost: item.unit_cost,
                });
            }
            if item.quantity < 0 {
                return Err(TotalsError::NegativeQuantity {
                    line: idx + 1,
                    quantity: item.quantity,
                });
            }
        }

        if !pct_in_range(input.discount_pct) {
            return Err(TotalsError::DiscountOutOfRange(input.discount_pct));
        }
        if !pct_in_range(input.vat_pct) {
            return Err(TotalsError::VatOutOfRange(input.vat_pct));
        }

        Ok(())
    }

    fn subtotal(&self) -> Result<Decimal, TotalsError> {
        let mut subtotal = Decimal::ZERO;
        for item in self.line_items {
            let line_total = item
                .unit_cost
                .checked_mul(Decimal::from(item.quantity))
                .ok_or(TotalsError::AmountOverflow)?;
            subtotal = subtotal
                .checked_add(line_total)
                .ok_or(TotalsError::AmountOverflow)?;
        }
        Ok(subtotal)
    }
}

fn pct_in_range(pct: Decimal) -> bool {
    pct >= Decimal::ZERO && pct <= Decimal::ONE_HUNDRED
}
