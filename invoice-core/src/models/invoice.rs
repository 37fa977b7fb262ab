use chrono::{NaiveDate, NaiveDateTime};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::calculations::{InvoiceTotals, TotalsCalculator, TotalsError, TotalsInput};

use super::line_item::LineItem;

/// Invoice status label.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InvoiceState {
    Draft,
    Sent,
    Paid,
    Void,
}

impl InvoiceState {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Draft => "draft",
            Self::Sent => "sent",
            Self::Paid => "paid",
            Self::Void => "void",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "draft" => Some(Self::Draft),
            "sent" => Some(Self::Sent),
            "paid" => Some(Self::Paid),
            "void" => Some(Self::Void),
            _ => None,
        }
    }
}

/// An invoice: an ordered sequence of line items plus the discount and VAT
/// parameters that turn them into a payable amount.
///
/// Totals are never stored. They are recomputed from the line items and the
/// stored percentages via [`Invoice::totals`], so the same stored invoice
/// always yields the same amounts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Invoice {
    pub id: i64,
    /// Unique, timestamp-derived identifier (see [`generate_invoice_id`]).
    pub invoice_id: String,
    /// Human-facing number, chosen by the issuer (e.g. `INV-2026-007`).
    pub invoice_number: String,
    pub invoice_date: NaiveDate,
    pub client_id: i64,
    pub line_items: Vec<LineItem>,
    pub discount_pct: Decimal,
    pub apply_vat: bool,
    pub vat_pct: Decimal,
    pub currency: String,
    pub state: InvoiceState,
}

/// For creating new invoices (no id yet).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewInvoice {
    pub invoice_id: String,
    pub invoice_number: String,
    pub invoice_date: NaiveDate,
    pub client_id: i64,
    pub line_items: Vec<LineItem>,
    pub discount_pct: Decimal,
    pub apply_vat: bool,
    pub vat_pct: Decimal,
    pub currency: String,
    pub state: InvoiceState,
}

impl NewInvoice {
    /// Attach an id, producing a stored [`Invoice`].
    pub fn with_id(
        self,
        id: i64,
    ) -> Invoice {
        Invoice {
            id,
            invoice_id: self.invoice_id,
            invoice_number: self.invoice_number,
            invoice_date: self.invoice_date,
            client_id: self.client_id,
            line_items: self.line_items,
            discount_pct: self.discount_pct,
            apply_vat: self.apply_vat,
            vat_pct: self.vat_pct,
            currency: self.currency,
            state: self.state,
        }
    }
}

impl Invoice {
    /// Recompute subtotal, discount, VAT and final total from the stored
    /// line items.
    ///
    /// # Errors
    ///
    /// Returns [`TotalsError`] if the stored invoice fails validation
    /// (empty line items, negative amounts, out-of-range percentages).
    pub fn totals(&self) -> Result<InvoiceTotals, TotalsError> {
        let input = TotalsInput {
            discount_pct: self.discount_pct,
            apply_vat: self.apply_vat,
            vat_pct: self.vat_pct,
        };
        TotalsCalculator::new(&self.line_items).calculate(&input)
    }
}

/// Derives the unique invoice identifier from a creation timestamp, in the
/// `YYYYMMDDHHMMSS` form (e.g. `20260831142255`).
pub fn generate_invoice_id(at: NaiveDateTime) -> String {
    at.format("%Y%m%d%H%M%S").to_string()
}
