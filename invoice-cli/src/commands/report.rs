use std::collections::BTreeMap;
use std::fs::File;
use std::path::Path;

use anyhow::{Context, Result};
use rust_decimal::Decimal;
use tracing::info;

use invoice_core::InvoiceRepository;
use invoice_data::{ClientCsvLoader, InvoiceCsvLoader};
use invoice_render::format_amount;

/// Load clients and invoices from CSV into the repository and summarise
/// invoiced amounts per client.
///
/// Totals are summed unrounded per currency; rounding happens once, on the
/// formatted sums.
pub async fn run(
    repo: &dyn InvoiceRepository,
    clients_path: &Path,
    invoices_path: &Path,
    items_path: &Path,
) -> Result<String> {
    let clients_file = File::open(clients_path)
        .with_context(|| format!("failed to open: {}", clients_path.display()))?;
    let clients = ClientCsvLoader::parse(clients_file)
        .with_context(|| format!("failed to parse CSV: {}", clients_path.display()))?;
    let stored_clients = ClientCsvLoader::load(repo, clients)
        .await
        .context("failed to load clients")?;

    let invoices_file = File::open(invoices_path)
        .with_context(|| format!("failed to open: {}", invoices_path.display()))?;
    let invoices = InvoiceCsvLoader::parse_invoices(invoices_file)
        .with_context(|| format!("failed to parse CSV: {}", invoices_path.display()))?;
    let items_file = File::open(items_path)
        .with_context(|| format!("failed to open: {}", items_path.display()))?;
    let items = InvoiceCsvLoader::parse_items(items_file)
        .with_context(|| format!("failed to parse CSV: {}", items_path.display()))?;
    let inserted = InvoiceCsvLoader::load(repo, invoices, items)
        .await
        .context("failed to load invoices")?;

    info!(
        clients = stored_clients.len(),
        invoices = inserted,
        "working set loaded"
    );

    summarise(repo).await
}

async fn summarise(repo: &dyn InvoiceRepository) -> Result<String> {
    let mut lines = Vec::new();
    let mut invoice_count = 0usize;

    let clients = repo.list_clients().await?;
    let client_count = clients.len();
    for client in clients {
        let invoices = repo.list_invoices_for_client(client.id).await?;
        invoice_count += invoices.len();

        // Unrounded sums, one bucket per currency.
        let mut by_currency: BTreeMap<String, Decimal> = BTreeMap::new();
        for invoice in &invoices {
            let totals = invoice.totals().with_context(|| {
                format!("invoice {} failed validation", invoice.invoice_number)
            })?;
            *by_currency.entry(invoice.currency.clone()).or_default() += totals.total;
        }

        let sums = by_currency
            .iter()
            .map(|(currency, total)| format!("{} {currency}", format_amount(*total)))
            .collect::<Vec<_>>()
            .join(", ");

        if invoices.is_empty() {
            lines.push(format!("{}: no invoices", client.display_name()));
        } else {
            lines.push(format!(
                "{}: {} invoice(s), {sums}",
                client.display_name(),
                invoices.len()
            ));
        }
    }

    lines.push(format!("{client_count} client(s), {invoice_count} invoice(s)"));

    Ok(lines.join("\n"))
}
