//! Loader for invoice CSV files.
//!
//! Invoices arrive as two CSV files: a header file with one row per invoice
//! and a keyed line-items file joined by `invoice_number`.
//!
//! ## Invoice CSV Format
//!
//! | Column           | Required | Type    | Notes                                       |
//! |------------------|----------|---------|---------------------------------------------|
//! | `invoice_number` | yes      | string  | Join key; must be unique within the file    |
//! | `invoice_id`     | no       | string  | Unique id; derived from the date when empty |
//! | `invoice_date`   | yes      | date    | `YYYY-MM-DD`                                |
//! | `client`         | yes      | string  | Client display name or email                |
//! | `state`          | yes      | string  | `draft`, `sent`, `paid` or `void`           |
//! | `discount_pct`   | no       | decimal | Defaults to 0                               |
//! | `apply_vat`      | yes      | bool    | `true` / `false`                            |
//! | `vat_pct`        | no       | decimal | Defaults to the client's VAT rate           |
//! | `currency`       | no       | string  | Defaults to the client's currency, else EUR |
//!
//! ## Keyed Line-Items CSV Format
//!
//! | Column           | Required | Type    |
//! |------------------|----------|---------|
//! | `invoice_number` | yes      | string  |
//! | `service`        | yes      | string  |
//! | `unit_cost`      | yes      | decimal |
//! | `quantity`       | yes      | integer |
//!
//! ### Example
//!
//! ```csv
//! invoice_number,invoice_id,invoice_date,client,state,discount_pct,apply_vat,vat_pct,currency
//! INV-1,,2026-08-31,Acme GmbH,sent,10,true,20,EUR
//! ```

use std::collections::HashMap;
use std::io::Read;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::Deserialize;
use thiserror::Error;
use tracing::warn;

use invoice_core::calculations::{TotalsCalculator, TotalsError, TotalsInput};
use invoice_core::{
    Client, InvoiceRepository, InvoiceState, LineItem, NewInvoice, RepositoryError,
};

use crate::de::{optional_decimal, optional_text};

/// Errors that can occur when loading invoice data.
#[derive(Debug, Error)]
pub enum InvoiceCsvError {
    #[error("CSV parse error: {0}")]
    Parse(#[from] csv::Error),

    /// An `invoice_date` cell was not `YYYY-MM-DD`. `row` is 1-based.
    #[error("invalid date '{value}' on row {row}; use YYYY-MM-DD")]
    InvalidDate { value: String, row: usize },

    /// A `state` cell held an unknown status label. `row` is 1-based.
    #[error("unrecognised invoice state '{state}' on row {row}")]
    InvalidState { state: String, row: usize },

    /// An invoice referenced a client that is not in the store.
    #[error("client '{client}' not found for invoice '{invoice_number}'")]
    ClientNotFound {
        client: String,
        invoice_number: String,
    },

    /// An invoice had no rows in the line-items file.
    #[error("no line items for invoice '{0}'")]
    MissingLineItems(String),

    /// The invoice failed totals validation; nothing was inserted for it.
    #[error("invalid invoice '{invoice_number}': {source}")]
    InvalidTotals {
        invoice_number: String,
        source: TotalsError,
    },

    #[error("repository error: {0}")]
    Repository(#[from] RepositoryError),
}

#[derive(Debug, Deserialize)]
struct InvoiceCsvRow {
    invoice_number: String,
    #[serde(deserialize_with = "optional_text")]
    invoice_id: Option<String>,
    invoice_date: String,
    client: String,
    state: String,
    #[serde(deserialize_with = "optional_decimal")]
    discount_pct: Option<Decimal>,
    apply_vat: bool,
    #[serde(deserialize_with = "optional_decimal")]
    vat_pct: Option<Decimal>,
    #[serde(deserialize_with = "optional_text")]
    currency: Option<String>,
}

/// One parsed invoice header row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvoiceRecord {
    pub invoice_number: String,
    pub invoice_id: Option<String>,
    pub invoice_date: NaiveDate,
    pub client: String,
    pub state: InvoiceState,
    pub discount_pct: Decimal,
    pub apply_vat: bool,
    pub vat_pct: Option<Decimal>,
    pub currency: Option<String>,
}

#[derive(Debug, Deserialize)]
struct KeyedItemCsvRow {
    invoice_number: String,
    service: String,
    unit_cost: Decimal,
    quantity: i64,
}

/// One parsed keyed line-item row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyedLineItemRecord {
    pub invoice_number: String,
    pub item: LineItem,
}

fn convert_row(
    row: InvoiceCsvRow,
    row_number: usize,
) -> Result<InvoiceRecord, InvoiceCsvError> {
    let invoice_date = NaiveDate::parse_from_str(row.invoice_date.trim(), "%Y-%m-%d")
        .map_err(|_| InvoiceCsvError::InvalidDate {
            value: row.invoice_date.clone(),
            row: row_number,
        })?;

    let state =
        InvoiceState::parse(row.state.trim()).ok_or_else(|| InvoiceCsvError::InvalidState {
            state: row.state.clone(),
            row: row_number,
        })?;

    Ok(InvoiceRecord {
        invoice_number: row.invoice_number,
        invoice_id: row.invoice_id,
        invoice_date,
        client: row.client,
        state,
        discount_pct: row.discount_pct.unwrap_or(Decimal::ZERO),
        apply_vat: row.apply_vat,
        vat_pct: row.vat_pct,
        currency: row.currency,
    })
}

/// Finds the client an invoice row refers to, matching the display name
/// first and the email address second.
fn resolve_client<'a>(
    clients: &'a [Client],
    reference: &str,
) -> Option<&'a Client> {
    clients
        .iter()
        .find(|c| c.display_name() == reference)
        .or_else(|| {
            clients
                .iter()
                .find(|c| c.email.as_deref() == Some(reference))
        })
}

/// Loader for invoice CSV data.
pub struct InvoiceCsvLoader;

impl InvoiceCsvLoader {
    /// Parse invoice header records from a CSV reader.
    pub fn parse_invoices<R: Read>(reader: R) -> Result<Vec<InvoiceRecord>, InvoiceCsvError> {
        let mut csv_reader = csv::Reader::from_reader(reader);
        let mut records = Vec::new();

        for (idx, result) in csv_reader.deserialize().enumerate() {
            let row: InvoiceCsvRow = result?;
            records.push(convert_row(row, idx + 1)?);
        }

        Ok(records)
    }

    /// Parse keyed line-item records from a CSV reader.
    pub fn parse_items<R: Read>(reader: R) -> Result<Vec<KeyedLineItemRecord>, InvoiceCsvError> {
        let mut csv_reader = csv::Reader::from_reader(reader);
        let mut records = Vec::new();

        for result in csv_reader.deserialize() {
            let row: KeyedItemCsvRow = result?;
            records.push(KeyedLineItemRecord {
                invoice_number: row.invoice_number,
                item: LineItem::new(row.service, row.unit_cost, row.quantity),
            });
        }

        Ok(records)
    }

    /// Insert parsed invoices through the repository, returning how many
    /// were created.
    ///
    /// Each invoice is validated with the totals calculator before it is
    /// inserted; one invalid invoice aborts the load. Clients must already
    /// be in the store. Missing `invoice_id` cells are derived from the
    /// invoice date and the 1-based row number.
    pub async fn load<R: InvoiceRepository + ?Sized>(
        repo: &R,
        invoices: Vec<InvoiceRecord>,
        items: Vec<KeyedLineItemRecord>,
    ) -> Result<usize, InvoiceCsvError> {
        let clients = repo.list_clients().await?;

        // Group line items by invoice number, preserving row order.
        let mut grouped: HashMap<String, Vec<LineItem>> = HashMap::new();
        for record in items {
            grouped
                .entry(record.invoice_number)
                .or_default()
                .push(record.item);
        }

        let mut inserted = 0;
        for (idx, record) in invoices.into_iter().enumerate() {
            let client = resolve_client(&clients, &record.client).ok_or_else(|| {
                InvoiceCsvError::ClientNotFound {
                    client: record.client.clone(),
                    invoice_number: record.invoice_number.clone(),
                }
            })?;

            let line_items = grouped
                .remove(&record.invoice_number)
                .ok_or_else(|| InvoiceCsvError::MissingLineItems(record.invoice_number.clone()))?;

            let discount_pct = record.discount_pct;
            let vat_pct = record.vat_pct.unwrap_or_else(|| client.default_vat_pct());
            let input = TotalsInput {
                discount_pct,
                apply_vat: record.apply_vat,
                vat_pct,
            };
            TotalsCalculator::new(&line_items)
                .calculate(&input)
                .map_err(|source| InvoiceCsvError::InvalidTotals {
                    invoice_number: record.invoice_number.clone(),
                    source,
                })?;

            let invoice_id = record.invoice_id.unwrap_or_else(|| {
                format!("{}{:06}", record.invoice_date.format("%Y%m%d"), idx + 1)
            });
            let currency = record
                .currency
                .or_else(|| client.currency.clone())
                .unwrap_or_else(|| "EUR".to_string());

            repo.create_invoice(NewInvoice {
                invoice_id,
                invoice_number: record.invoice_number,
                invoice_date: record.invoice_date,
                client_id: client.id,
                line_items,
                discount_pct,
                apply_vat: record.apply_vat,
                vat_pct,
                currency,
                state: record.state,
            })
            .await?;
            inserted += 1;
        }

        if !grouped.is_empty() {
            let mut orphans: Vec<_> = grouped.into_keys().collect();
            orphans.sort_unstable();
            warn!(?orphans, "line items referenced invoices that were not loaded");
        }

        Ok(inserted)
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;

    use super::*;

    const INVOICE_HEADER: &str =
        "invoice_number,invoice_id,invoice_date,client,state,discount_pct,apply_vat,vat_pct,currency";

    #[test]
    fn parse_invoices_full_row() {
        let csv = format!("{INVOICE_HEADER}\nINV-1,20260831000001,2026-08-31,Acme GmbH,sent,10,true,20,EUR");

        let records =
            InvoiceCsvLoader::parse_invoices(csv.as_bytes()).expect("failed to parse CSV");

        assert_eq!(records.len(), 1);
        let record = &records[0];
        assert_eq!(record.invoice_number, "INV-1");
        assert_eq!(record.invoice_id, Some("20260831000001".to_string()));
        assert_eq!(
            record.invoice_date,
            NaiveDate::from_ymd_opt(2026, 8, 31).unwrap()
        );
        assert_eq!(record.state, InvoiceState::Sent);
        assert_eq!(record.discount_pct, dec!(10));
        assert!(record.apply_vat);
        assert_eq!(record.vat_pct, Some(dec!(20)));
    }

    #[test]
    fn parse_invoices_defaults_discount_to_zero() {
        let csv = format!("{INVOICE_HEADER}\nINV-1,,2026-08-31,Acme,draft,,false,,");

        let records =
            InvoiceCsvLoader::parse_invoices(csv.as_bytes()).expect("failed to parse CSV");

        assert_eq!(records[0].discount_pct, dec!(0));
        assert_eq!(records[0].invoice_id, None);
        assert_eq!(records[0].vat_pct, None);
    }

    #[test]
    fn parse_invoices_rejects_bad_date_with_row_number() {
        let csv = format!("{INVOICE_HEADER}\nINV-1,,31/08/2026,Acme,draft,,false,,");

        match InvoiceCsvLoader::parse_invoices(csv.as_bytes()) {
            Err(InvoiceCsvError::InvalidDate { value, row }) => {
                assert_eq!(value, "31/08/2026");
                assert_eq!(row, 1);
            }
            other => panic!("expected InvalidDate, got {other:#?}"),
        }
    }

    #[test]
    fn parse_invoices_rejects_unknown_state() {
        let csv = format!("{INVOICE_HEADER}\nINV-1,,2026-08-31,Acme,archived,,false,,");

        match InvoiceCsvLoader::parse_invoices(csv.as_bytes()) {
            Err(InvoiceCsvError::InvalidState { state, row }) => {
                assert_eq!(state, "archived");
                assert_eq!(row, 1);
            }
            other => panic!("expected InvalidState, got {other:#?}"),
        }
    }

    #[test]
    fn parse_items_groups_nothing_by_itself() {
        let csv = "invoice_number,service,unit_cost,quantity\nINV-1,Design,100.00,2\nINV-2,Hosting,50.00,1\nINV-1,Support,25.00,4";

        let records = InvoiceCsvLoader::parse_items(csv.as_bytes()).expect("failed to parse CSV");

        assert_eq!(records.len(), 3);
        assert_eq!(records[2].invoice_number, "INV-1");
        assert_eq!(records[2].item, LineItem::new("Support", dec!(25.00), 4));
    }
}
