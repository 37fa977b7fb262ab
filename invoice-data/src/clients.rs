//! Loader for client CSV files.
//!
//! ## CSV Format
//!
//! One row per client. Every column is optional except that headers must be
//! present; leave cells empty for `None`.
//!
//! | Column           | Type    | Notes                                  |
//! |------------------|---------|----------------------------------------|
//! | `company_name`   | string  |                                        |
//! | `vat_number`     | string  | VAT identification number              |
//! | `vat_percentage` | decimal | Default VAT rate for new invoices      |
//! | `street`         | string  |                                        |
//! | `city`           | string  |                                        |
//! | `state`          | string  |                                        |
//! | `postal_code`    | string  |                                        |
//! | `country`        | string  |                                        |
//! | `first_name`     | string  |                                        |
//! | `last_name`      | string  |                                        |
//! | `email`          | string  |                                        |
//! | `phone`          | string  |                                        |
//! | `currency`       | string  | e.g. `EUR`                             |
//! | `language`       | string  | `en`, `fr` or `de`                     |
//! | `payment_terms`  | string  | Free text shown on rendered invoices   |
//!
//! ### Example
//!
//! ```csv
//! company_name,vat_number,vat_percentage,street,city,state,postal_code,country,first_name,last_name,email,phone,currency,language,payment_terms
//! Acme GmbH,DE123456789,19,Hauptstr. 1,Berlin,,10115,Germany,,,billing@acme.example,,EUR,de,Payable within 30 days
//! ```

use std::io::Read;

use rust_decimal::Decimal;
use serde::Deserialize;
use thiserror::Error;

use invoice_core::{
    Client, InvoiceRepository, LanguageCode, NewClient, RepositoryError,
};

use crate::de::{optional_decimal, optional_text};

/// Errors that can occur when loading client data.
#[derive(Debug, Error)]
pub enum ClientCsvError {
    #[error("CSV parse error: {0}")]
    Parse(#[from] csv::Error),

    /// A `language` cell held a code that is not `en`, `fr` or `de`.
    /// `row` is 1-based (header = row 0).
    #[error("unrecognised language '{language}' on row {row}")]
    InvalidLanguage { language: String, row: usize },

    #[error("repository error: {0}")]
    Repository(#[from] RepositoryError),
}

#[derive(Debug, Deserialize)]
struct CsvRow {
    #[serde(deserialize_with = "optional_text")]
    company_name: Option<String>,
    #[serde(deserialize_with = "optional_text")]
    vat_number: Option<String>,
    #[serde(deserialize_with = "optional_decimal")]
    vat_percentage: Option<Decimal>,
    #[serde(deserialize_with = "optional_text")]
    street: Option<String>,
    #[serde(deserialize_with = "optional_text")]
    city: Option<String>,
    #[serde(deserialize_with = "optional_text")]
    state: Option<String>,
    #[serde(deserialize_with = "optional_text")]
    postal_code: Option<String>,
    #[serde(deserialize_with = "optional_text")]
    country: Option<String>,
    #[serde(deserialize_with = "optional_text")]
    first_name: Option<String>,
    #[serde(deserialize_with = "optional_text")]
    last_name: Option<String>,
    #[serde(deserialize_with = "optional_text")]
    email: Option<String>,
    #[serde(deserialize_with = "optional_text")]
    phone: Option<String>,
    #[serde(deserialize_with = "optional_text")]
    currency: Option<String>,
    #[serde(deserialize_with = "optional_text")]
    language: Option<String>,
    #[serde(deserialize_with = "optional_text")]
    payment_terms: Option<String>,
}

fn convert_row(
    row: CsvRow,
    row_number: usize,
) -> Result<NewClient, ClientCsvError> {
    let language = match row.language {
        Some(code) => Some(LanguageCode::parse(&code).ok_or(
            ClientCsvError::InvalidLanguage {
                language: code,
                row: row_number,
            },
        )?),
        None => None,
    };

    Ok(NewClient {
        company_name: row.company_name,
        vat_number: row.vat_number,
        vat_percentage: row.vat_percentage,
        street: row.street,
        city: row.city,
        state: row.state,
        postal_code: row.postal_code,
        country: row.country,
        first_name: row.first_name,
        last_name: row.last_name,
        email: row.email,
        phone: row.phone,
        currency: row.currency,
        language,
        payment_terms: row.payment_terms,
    })
}

/// Loader for client CSV data.
pub struct ClientCsvLoader;

impl ClientCsvLoader {
    /// Parse client records from a CSV reader, preserving row order.
    pub fn parse<R: Read>(reader: R) -> Result<Vec<NewClient>, ClientCsvError> {
        let mut csv_reader = csv::Reader::from_reader(reader);
        let mut clients = Vec::new();

        for (idx, result) in csv_reader.deserialize().enumerate() {
            let row: CsvRow = result?;
            clients.push(convert_row(row, idx + 1)?);
        }

        Ok(clients)
    }

    /// Insert parsed clients through the repository, returning the stored
    /// clients (with ids) in input order.
    pub async fn load<R: InvoiceRepository + ?Sized>(
        repo: &R,
        clients: Vec<NewClient>,
    ) -> Result<Vec<Client>, ClientCsvError> {
        let mut stored = Vec::with_capacity(clients.len());
        for client in clients {
            stored.push(repo.create_client(client).await?);
        }
        Ok(stored)
    }
}
