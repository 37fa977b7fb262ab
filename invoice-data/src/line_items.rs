//! Loader for standalone line-item CSV files.
//!
//! ## CSV Format
//!
//! | Column      | Required | Type    | Notes                          |
//! |-------------|----------|---------|--------------------------------|
//! | `service`   | yes      | string  | Description shown on the invoice |
//! | `unit_cost` | yes      | decimal | e.g. `100.00`                  |
//! | `quantity`  | yes      | integer | e.g. `2`                       |
//!
//! ### Example
//!
//! ```csv
//! service,unit_cost,quantity
//! Design,100.00,2
//! Hosting,50.00,1
//! ```

use std::io::Read;

use rust_decimal::Decimal;
use serde::Deserialize;
use thiserror::Error;

use invoice_core::LineItem;

/// Errors that can occur when loading line-item data.
#[derive(Debug, Error)]
pub enum LineItemCsvError {
    #[error("CSV parse error: {0}")]
    Parse(#[from] csv::Error),
}

#[derive(Debug, Deserialize)]
struct CsvRow {
    service: String,
    unit_cost: Decimal,
    quantity: i64,
}

/// Loader for line-item CSV files.
///
/// Sign and range validation is left to the totals calculator; the loader
/// only cares that cells parse.
pub struct LineItemCsvLoader;

impl LineItemCsvLoader {
    /// Parse line items from a CSV reader, preserving row order.
    pub fn parse<R: Read>(reader: R) -> Result<Vec<LineItem>, LineItemCsvError> {
        let mut csv_reader = csv::Reader::from_reader(reader);
        let mut items = Vec::new();

        for result in csv_reader.deserialize() {
            let row: CsvRow = result?;
            items.push(LineItem::new(row.service, row.unit_cost, row.quantity));
        }

        Ok(items)
    }
}
