use std::fs::File;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use chrono::{Local, NaiveDate};
use rust_decimal::Decimal;

use invoice_core::models::{
    Client, InvoiceState, LanguageCode, NewClient, NewInvoice, generate_invoice_id,
};
use invoice_data::{ClientCsvLoader, LineItemCsvLoader};
use invoice_render::{InvoiceDocument, PersonaCatalog};

/// Inputs for the `print` command.
#[derive(Debug, Clone)]
pub struct PrintOptions {
    pub items: PathBuf,
    pub clients: PathBuf,
    /// Client selector: display name or email address.
    pub client: String,
    pub number: String,
    /// Defaults to today.
    pub date: Option<NaiveDate>,
    pub discount_pct: Decimal,
    pub apply_vat: bool,
    /// Defaults to the client's stored VAT rate.
    pub vat_pct: Option<Decimal>,
    /// Defaults to the client's currency, then `EUR`.
    pub currency: Option<String>,
    /// Defaults to the client's preferred language.
    pub language: Option<String>,
    pub persona: Option<String>,
    pub personas_file: Option<PathBuf>,
}

/// Assemble and render a printable invoice from CSV inputs.
///
/// The invoice is a preview built from the given parameters; nothing is
/// stored.
pub fn run(opts: &PrintOptions) -> Result<String> {
    let items_file = File::open(&opts.items)
        .with_context(|| format!("failed to open: {}", opts.items.display()))?;
    let items = LineItemCsvLoader::parse(items_file)
        .with_context(|| format!("failed to parse CSV: {}", opts.items.display()))?;

    let clients_file = File::open(&opts.clients)
        .with_context(|| format!("failed to open: {}", opts.clients.display()))?;
    let clients = ClientCsvLoader::parse(clients_file)
        .with_context(|| format!("failed to parse CSV: {}", opts.clients.display()))?;
    let client = find_client(clients, &opts.client)?;

    let catalog = load_catalog(opts.personas_file.as_deref())?;
    let persona = match &opts.persona {
        Some(key) => catalog.get(key),
        None => catalog.get(catalog.default_key()),
    };

    let language = match &opts.language {
        Some(code) => LanguageCode::parse(code)
            .with_context(|| format!("unknown language '{code}' (expected en, fr or de)"))?,
        None => InvoiceDocument::language_for(&client),
    };

    let now = Local::now();
    // Preview only, never stored, so the row id is a placeholder.
    let invoice = NewInvoice {
        invoice_id: generate_invoice_id(now.naive_local()),
        invoice_number: opts.number.clone(),
        invoice_date: opts.date.unwrap_or_else(|| now.date_naive()),
        client_id: client.id,
        line_items: items,
        discount_pct: opts.discount_pct,
        apply_vat: opts.apply_vat,
        vat_pct: opts.vat_pct.unwrap_or_else(|| client.default_vat_pct()),
        currency: opts
            .currency
            .clone()
            .or_else(|| client.currency.clone())
            .unwrap_or_else(|| "EUR".to_string()),
        state: InvoiceState::Draft,
    }
    .with_id(0);

    let document = InvoiceDocument::assemble(&invoice, &client, persona, language)
        .context("invoice failed validation")?;

    Ok(document.to_string())
}

pub(crate) fn load_catalog(path: Option<&Path>) -> Result<PersonaCatalog> {
    match path {
        Some(path) => PersonaCatalog::from_path(path)
            .with_context(|| format!("failed to load personas from: {}", path.display())),
        None => Ok(PersonaCatalog::builtin()),
    }
}

/// Assigns row-order ids and selects the client whose display name or email
/// matches `needle`.
fn find_client(
    clients: Vec<NewClient>,
    needle: &str,
) -> Result<Client> {
    for (idx, new_client) in clients.into_iter().enumerate() {
        let client = new_client.with_id(idx as i64 + 1);
        if client.display_name() == needle || client.email.as_deref() == Some(needle) {
            return Ok(client);
        }
    }

    bail!("no client named '{needle}' in the clients file");
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    fn acme() -> NewClient {
        NewClient {
            company_name: Some("Acme GmbH".to_string()),
            email: Some("billing@acme.example".to_string()),
            ..Default::default()
        }
    }

    fn jane() -> NewClient {
        NewClient {
            first_name: Some("Jane".to_string()),
            last_name: Some("Smith".to_string()),
            email: Some("jane@example.com".to_string()),
            ..Default::default()
        }
    }

    #[test]
    fn finds_client_by_display_name() {
        let client = find_client(vec![acme(), jane()], "Jane Smith").unwrap();

        assert_eq!(client.id, 2);
        assert_eq!(client.display_name(), "Jane Smith");
    }

    #[test]
    fn finds_client_by_email() {
        let client = find_client(vec![acme(), jane()], "billing@acme.example").unwrap();

        assert_eq!(client.id, 1);
        assert_eq!(client.display_name(), "Acme GmbH");
    }

    #[test]
    fn unknown_client_is_an_error() {
        let result = find_client(vec![acme()], "Nobody");

        assert!(result.is_err());
    }
}
