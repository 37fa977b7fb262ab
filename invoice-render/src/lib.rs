//! Printable invoice rendering.
//!
//! Combines a stored invoice, its client, an issuer persona and a locale
//! label set into a plain-text document. This is the only layer that rounds
//! amounts; everything upstream stays on exact decimals.

mod document;
mod locale;
mod persona;

pub use document::{DocumentLine, InvoiceDocument, format_amount};
pub use locale::Labels;
pub use persona::{BankInfo, Persona, PersonaAddress, PersonaCatalog, PersonaCatalogError};
