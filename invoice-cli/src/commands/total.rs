use std::fs::File;
use std::path::Path;

use anyhow::{Context, Result};

use invoice_core::calculations::{TotalsCalculator, TotalsInput};
use invoice_core::models::LineItem;
use invoice_data::LineItemCsvLoader;
use invoice_render::format_amount;

/// Compute and format invoice totals for a standalone line-item file.
pub fn run(
    items_path: &Path,
    input: &TotalsInput,
) -> Result<String> {
    let file = File::open(items_path)
        .with_context(|| format!("failed to open: {}", items_path.display()))?;
    let items = LineItemCsvLoader::parse(file)
        .with_context(|| format!("failed to parse CSV: {}", items_path.display()))?;

    compute(&items, input)
}

fn compute(
    items: &[LineItem],
    input: &TotalsInput,
) -> Result<String> {
    let totals = TotalsCalculator::new(items)
        .calculate(input)
        .context("invoice failed validation")?
        .rounded();

    let mut rows = vec![("Subtotal:".to_string(), totals.subtotal)];
    rows.push((
        format!("Discount ({}%):", input.discount_pct),
        totals.discount_amount,
    ));
    if input.apply_vat {
        rows.push((format!("VAT ({}%):", input.vat_pct), totals.vat_amount));
    }
    rows.push(("Total:".to_string(), totals.total));

    // Labels are padded to one width so the amount column lines up no
    // matter how many digits the percentages have.
    let lines = rows
        .into_iter()
        .map(|(label, amount)| format!("{label:<20}{:>14}", format_amount(amount)))
        .collect::<Vec<_>>();

    Ok(lines.join("\n"))
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;

    use super::*;

    fn test_items() -> Vec<LineItem> {
        vec![
            LineItem::new("Design", dec!(100.00), 2),
            LineItem::new("Hosting", dec!(50.00), 1),
        ]
    }

    #[test]
    fn computes_discounted_vat_totals() {
        let input = TotalsInput {
            discount_pct: dec!(10),
            apply_vat: true,
            vat_pct: dec!(20),
        };

        let output = compute(&test_items(), &input).unwrap();

        assert!(output.contains("250.00"));
        assert!(output.contains("Discount (10%)"));
        assert!(output.contains("45.00"));
        assert!(output.contains("270.00"));
    }

    #[test]
    fn omits_vat_line_when_vat_not_applied() {
        let input = TotalsInput {
            discount_pct: dec!(0),
            apply_vat: false,
            vat_pct: dec!(0),
        };

        let output = compute(&test_items(), &input).unwrap();

        assert!(!output.contains("VAT"));
        assert!(output.contains("250.00"));
    }

    #[test]
    fn amount_column_stays_aligned() {
        let input = TotalsInput {
            discount_pct: dec!(2.5),
            apply_vat: true,
            vat_pct: dec!(19),
        };

        let output = compute(&test_items(), &input).unwrap();

        let widths: Vec<usize> = output.lines().map(str::len).collect();
        assert_eq!(widths.len(), 4);
        assert!(
            widths.iter().all(|width| *width == widths[0]),
            "uneven rows:\n{output}"
        );
    }

    #[test]
    fn empty_items_fail_validation() {
        let input = TotalsInput {
            discount_pct: dec!(0),
            apply_vat: false,
            vat_pct: dec!(0),
        };

        let result = compute(&[], &input);

        assert_eq!(
            result.unwrap_err().root_cause().to_string(),
            "invoice has no line items"
        );
    }
}
