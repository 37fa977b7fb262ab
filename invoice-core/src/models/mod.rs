mod client;
mod invoice;
mod language;
mod line_item;

pub use client::{Client, NewClient};
pub use invoice::{Invoice, InvoiceState, NewInvoice, generate_invoice_id};
pub use language::LanguageCode;
pub use line_item::LineItem;
