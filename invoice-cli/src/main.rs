use std::path::PathBuf;

use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use rust_decimal::Decimal;
use tracing::debug;
use tracing_subscriber::EnvFilter;

use invoice_cli::commands;
use invoice_cli::commands::print::PrintOptions;
use invoice_core::calculations::TotalsInput;
use invoice_core::store::StoreConfig;

// ─── CLI definition ──────────────────────────────────────────────────────────

/// Invoicing toolkit for small service businesses.
///
/// Computes invoice totals, renders printable invoices in English, French
/// or German, and summarises invoiced amounts per client.
#[derive(Debug, Parser)]
#[command(name = "invoice", version)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Compute totals for a line-item CSV file.
    Total {
        /// Path to a `service,unit_cost,quantity` CSV file.
        #[arg(long)]
        items: PathBuf,

        /// Discount percentage applied to the subtotal (0-100).
        #[arg(long, default_value = "0")]
        discount: Decimal,

        /// Charge VAT on the discounted subtotal.
        #[arg(long)]
        vat: bool,

        /// VAT percentage (0-100). Only charged together with `--vat`.
        #[arg(long, default_value = "0")]
        vat_pct: Decimal,
    },

    /// Render a printable invoice.
    Print {
        /// Path to a `service,unit_cost,quantity` CSV file.
        #[arg(long)]
        items: PathBuf,

        /// Path to the clients CSV file.
        #[arg(long)]
        clients: PathBuf,

        /// Client to bill: display name or email address.
        #[arg(long)]
        client: String,

        /// Human-facing invoice number (e.g. `INV-2026-007`).
        #[arg(long)]
        number: String,

        /// Invoice date (`YYYY-MM-DD`). Defaults to today.
        #[arg(long)]
        date: Option<NaiveDate>,

        /// Discount percentage applied to the subtotal (0-100).
        #[arg(long, default_value = "0")]
        discount: Decimal,

        /// Charge VAT on the discounted subtotal.
        #[arg(long)]
        vat: bool,

        /// VAT percentage (0-100). Defaults to the client's stored rate.
        #[arg(long)]
        vat_pct: Option<Decimal>,

        /// Currency code. Defaults to the client's currency, then `EUR`.
        #[arg(long)]
        currency: Option<String>,

        /// Invoice language: `en`, `fr` or `de`. Defaults to the client's
        /// preference.
        #[arg(long)]
        language: Option<String>,

        /// Issuer persona key. Unknown keys fall back to the default.
        #[arg(long)]
        persona: Option<String>,

        /// TOML file with custom personas. Defaults to the built-in catalog.
        #[arg(long)]
        personas_file: Option<PathBuf>,
    },

    /// Load clients and invoices from CSV and summarise invoiced amounts
    /// per client.
    Report {
        /// Path to the clients CSV file.
        #[arg(long)]
        clients: PathBuf,

        /// Path to the invoices CSV file.
        #[arg(long)]
        invoices: PathBuf,

        /// Path to the keyed line-items CSV file.
        #[arg(long)]
        items: PathBuf,

        /// Storage backend to use.
        #[arg(long, default_value = "memory")]
        backend: String,

        /// Backend-specific connection string. Ignored by `memory`.
        #[arg(long, default_value = "")]
        store: String,
    },

    /// List the available issuer personas.
    Personas {
        /// TOML file with custom personas. Defaults to the built-in catalog.
        #[arg(long)]
        personas_file: Option<PathBuf>,
    },
}

// ─── tracing ─────────────────────────────────────────────────────────────────

/// Initialise the tracing subscriber.
///
/// * Honours `RUST_LOG` when set.
/// * Falls back to `info` so normal runs are quiet.
/// * Strips timestamps and target names to keep CLI output clean.
fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::from("info"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .without_time()
        .with_target(false)
        .init();
}

// ─── entry point ─────────────────────────────────────────────────────────────

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_tracing();

    let cli = Cli::parse();

    let output = match cli.command {
        Command::Total {
            items,
            discount,
            vat,
            vat_pct,
        } => {
            let input = TotalsInput {
                discount_pct: discount,
                apply_vat: vat,
                vat_pct,
            };
            commands::total::run(&items, &input)?
        }

        Command::Print {
            items,
            clients,
            client,
            number,
            date,
            discount,
            vat,
            vat_pct,
            currency,
            language,
            persona,
            personas_file,
        } => {
            let opts = PrintOptions {
                items,
                clients,
                client,
                number,
                date,
                discount_pct: discount,
                apply_vat: vat,
                vat_pct,
                currency,
                language,
                persona,
                personas_file,
            };
            commands::print::run(&opts)?
        }

        Command::Report {
            clients,
            invoices,
            items,
            backend,
            store,
        } => {
            let config = StoreConfig {
                backend,
                connection_string: store,
            };

            debug!("connecting to {} backend", config.backend);
            let registry = invoice_cli::build_registry();
            let repo = registry.create(&config).await?;

            commands::report::run(&*repo, &clients, &invoices, &items).await?
        }

        Command::Personas { personas_file } => {
            commands::personas::run(personas_file.as_deref())?
        }
    };

    println!("{output}");

    Ok(())
}
