//! CSV loaders for invoicing data.
//!
//! Three input shapes are supported:
//!
//! - line items (`service,unit_cost,quantity`): direct calculator input,
//! - clients: one row per client, optional cells left empty,
//! - invoices: one header row per invoice, joined to a keyed line-items
//!   file by `invoice_number`.
//!
//! Loaders parse from any `Read` and insert through the
//! [`InvoiceRepository`](invoice_core::InvoiceRepository) trait, so they
//! work with any registered backend.

mod clients;
mod de;
mod invoices;
mod line_items;

pub use clients::{ClientCsvError, ClientCsvLoader};
pub use invoices::{InvoiceCsvError, InvoiceCsvLoader, InvoiceRecord, KeyedLineItemRecord};
pub use line_items::{LineItemCsvError, LineItemCsvLoader};
