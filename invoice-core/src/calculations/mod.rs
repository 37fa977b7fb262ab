//! Invoice arithmetic.
//!
//! The totals calculator is the only place amounts are derived; everything
//! else (storage, rendering, CLI) treats its output as opaque.

pub mod common;
pub mod totals;

pub use totals::{InvoiceTotals, TotalsCalculator, TotalsError, TotalsInput};
