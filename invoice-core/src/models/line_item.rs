use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// One billable service entry on an invoice.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LineItem {
    pub description: String,
    pub unit_cost: Decimal,
    pub quantity: i64,
}

impl LineItem {
    pub fn new(
        description: impl Into<String>,
        unit_cost: Decimal,
        quantity: i64,
    ) -> Self {
        Self {
            description: description.into(),
            unit_cost,
            quantity,
        }
    }

    /// Derived line total (`unit_cost × quantity`).
    ///
    /// Does not validate sign or range; the totals calculator rejects
    /// negative and overflowing lines, so run it before rendering line
    /// totals.
    pub fn line_total(&self) -> Decimal {
        self.unit_cost * Decimal::from(self.quantity)
    }
}
