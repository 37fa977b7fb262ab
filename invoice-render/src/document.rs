use std::fmt;

use rust_decimal::Decimal;

use invoice_core::calculations::common::round_half_up;
use invoice_core::calculations::TotalsError;
use invoice_core::models::{Client, Invoice, LanguageCode};

use crate::locale::Labels;
use crate::persona::Persona;

/// Rounds half-up to two decimal places and formats with exactly two
/// decimals, e.g. `270.00`.
pub fn format_amount(value: Decimal) -> String {
    format!("{:.2}", round_half_up(value))
}

/// One service line, amounts already formatted for display.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocumentLine {
    pub description: String,
    pub unit_cost: String,
    pub quantity: i64,
    pub line_total: String,
}

/// A fully resolved printable invoice.
///
/// All lookups, total computation and rounding happen in
/// [`InvoiceDocument::assemble`]; the [`fmt::Display`] impl only lays the
/// resolved strings out.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvoiceDocument {
    pub language: LanguageCode,
    pub labels: &'static Labels,
    pub invoice_number: String,
    pub invoice_id: String,
    pub invoice_date: String,
    pub currency: String,
    pub client_name: String,
    pub client_address: Vec<String>,
    pub client_vat_number: Option<String>,
    pub payment_terms: Option<String>,
    pub persona: Persona,
    pub lines: Vec<DocumentLine>,
    pub discount_pct: Decimal,
    pub vat_pct: Decimal,
    pub apply_vat: bool,
    pub subtotal: String,
    pub discount_amount: String,
    pub vat_amount: String,
    pub total: String,
}

impl InvoiceDocument {
    /// Resolves an invoice, its client and an issuer persona into a
    /// printable document in the given language.
    ///
    /// Totals are recomputed from the stored line items, rounded half-up to
    /// two decimal places and formatted here. When `language` is not given,
    /// callers should pass the client's preferred language (defaulting to
    /// English).
    ///
    /// # Errors
    ///
    /// Returns [`TotalsError`] if the stored invoice fails totals
    /// validation.
    pub fn assemble(
        invoice: &Invoice,
        client: &Client,
        persona: &Persona,
        language: LanguageCode,
    ) -> Result<Self, TotalsError> {
        let totals = invoice.totals()?.rounded();

        let lines = invoice
            .line_items
            .iter()
            .map(|item| DocumentLine {
                description: item.description.clone(),
                unit_cost: format_amount(item.unit_cost),
                quantity: item.quantity,
                line_total: format_amount(item.line_total()),
            })
            .collect();

        Ok(Self {
            language,
            labels: Labels::for_language(language),
            invoice_number: invoice.invoice_number.clone(),
            invoice_id: invoice.invoice_id.clone(),
            invoice_date: invoice.invoice_date.format("%Y-%m-%d").to_string(),
            currency: invoice.currency.clone(),
            client_name: client.display_name(),
            client_address: client.address_lines(),
            client_vat_number: client.vat_number.clone(),
            payment_terms: client.payment_terms.clone(),
            persona: persona.clone(),
            lines,
            discount_pct: invoice.discount_pct,
            vat_pct: invoice.vat_pct,
            apply_vat: invoice.apply_vat,
            subtotal: format_amount(totals.subtotal),
            discount_amount: format_amount(totals.discount_amount),
            vat_amount: format_amount(totals.vat_amount),
            total: format_amount(totals.total),
        })
    }

    /// Language chosen for a client: their stored preference, or English.
    pub fn language_for(client: &Client) -> LanguageCode {
        client.language.unwrap_or_default()
    }
}

impl fmt::Display for InvoiceDocument {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        let l = self.labels;

        writeln!(f, "{} {} ({})", l.invoice, self.invoice_number, self.invoice_id)?;
        writeln!(f, "{}: {}", l.invoice_date, self.invoice_date)?;
        writeln!(f, "{}: {}", l.currency, self.currency)?;
        writeln!(f)?;

        writeln!(f, "{}", l.issued_by)?;
        writeln!(f, "{}", self.persona.full_name())?;
        for line in self.persona.address.lines() {
            writeln!(f, "{line}")?;
        }
        writeln!(f, "Tel: {}", self.persona.tel)?;
        writeln!(f, "Email: {}", self.persona.email)?;
        writeln!(f, "{}: {}", l.vat_number, self.persona.vat_number)?;
        writeln!(f)?;

        writeln!(f, "{}", l.client)?;
        writeln!(f, "{}", self.client_name)?;
        for line in &self.client_address {
            writeln!(f, "{line}")?;
        }
        if let Some(vat_number) = &self.client_vat_number {
            writeln!(f, "{}: {}", l.vat_number, vat_number)?;
        }
        writeln!(f)?;

        writeln!(f, "{}", l.services)?;
        writeln!(
            f,
            "{:<30} {:>12} {:>8} {:>12}",
            l.service, l.unit_cost, l.quantity, l.line_total
        )?;
        for line in &self.lines {
            writeln!(
                f,
                "{:<30} {:>12} {:>8} {:>12}",
                line.description, line.unit_cost, line.quantity, line.line_total
            )?;
        }
        writeln!(f)?;

        writeln!(f, "{}", l.summary)?;
        writeln!(f, "{}: {} {}", l.subtotal, self.subtotal, self.currency)?;
        writeln!(
            f,
            "{} ({}%): {} {}",
            l.discount, self.discount_pct, self.discount_amount, self.currency
        )?;
        if self.apply_vat {
            writeln!(
                f,
                "{} ({}%): {} {}",
                l.vat, self.vat_pct, self.vat_amount, self.currency
            )?;
        }
        writeln!(f, "{}: {} {}", l.final_total, self.total, self.currency)?;
        writeln!(f)?;

        writeln!(
            f,
            "{}: {} / IBAN {} / BIC {}",
            l.bank,
            self.persona.bank_info.bank_name,
            self.persona.bank_info.iban,
            self.persona.bank_info.bic
        )?;
        if let Some(terms) = &self.payment_terms {
            writeln!(f, "{}: {}", l.payment_terms, terms)?;
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;

    use invoice_core::models::{InvoiceState, LineItem, NewClient, NewInvoice};

    use crate::persona::PersonaCatalog;

    use super::*;

    fn test_client() -> Client {
        let mut client = NewClient::default().with_id(1);
        client.company_name = Some("Acme GmbH".to_string());
        client.vat_number = Some("DE123456789".to_string());
        client.street = Some("Hauptstr. 1".to_string());
        client.postal_code = Some("10115".to_string());
        client.city = Some("Berlin".to_string());
        client.country = Some("Germany".to_string());
        client.language = Some(LanguageCode::De);
        client.payment_terms = Some("Payable within 30 days".to_string());
        client
    }

    fn test_invoice() -> Invoice {
        NewInvoice {
            invoice_id: "20260831142255".to_string(),
            invoice_number: "INV-7".to_string(),
            invoice_date: NaiveDate::from_ymd_opt(2026, 8, 31).unwrap(),
            client_id: 1,
            line_items: vec![
                LineItem::new("Design", dec!(100.00), 2),
                LineItem::new("Hosting", dec!(50.00), 1),
            ],
            discount_pct: dec!(10),
            apply_vat: true,
            vat_pct: dec!(20),
            currency: "EUR".to_string(),
            state: InvoiceState::Sent,
        }
        .with_id(1)
    }

    fn assemble(language: LanguageCode) -> InvoiceDocument {
        let catalog = PersonaCatalog::builtin();
        InvoiceDocument::assemble(
            &test_invoice(),
            &test_client(),
            catalog.get("persona1"),
            language,
        )
        .unwrap()
    }

    #[test]
    fn assembles_rounded_formatted_totals() {
        let doc = assemble(LanguageCode::En);

        assert_eq!(doc.subtotal, "250.00");
        assert_eq!(doc.discount_amount, "25.00");
        assert_eq!(doc.vat_amount, "45.00");
        assert_eq!(doc.total, "270.00");
    }

    #[test]
    fn assembles_formatted_lines() {
        let doc = assemble(LanguageCode::En);

        assert_eq!(
            doc.lines,
            vec![
                DocumentLine {
                    description: "Design".to_string(),
                    unit_cost: "100.00".to_string(),
                    quantity: 2,
                    line_total: "200.00".to_string(),
                },
                DocumentLine {
                    description: "Hosting".to_string(),
                    unit_cost: "50.00".to_string(),
                    quantity: 1,
                    line_total: "50.00".to_string(),
                },
            ]
        );
    }

    #[test]
    fn fractional_amounts_round_half_up_at_formatting() {
        assert_eq!(format_amount(dec!(0.995)), "1.00");
        assert_eq!(format_amount(dec!(0.994)), "0.99");
        assert_eq!(format_amount(dec!(45)), "45.00");
    }

    #[test]
    fn rendered_text_uses_english_labels() {
        let text = assemble(LanguageCode::En).to_string();

        assert!(text.contains("Invoice INV-7 (20260831142255)"));
        assert!(text.contains("Subtotal: 250.00 EUR"));
        assert!(text.contains("Discount (10%): 25.00 EUR"));
        assert!(text.contains("VAT (20%): 45.00 EUR"));
        assert!(text.contains("Final Total: 270.00 EUR"));
    }

    #[test]
    fn rendered_text_uses_french_labels() {
        let text = assemble(LanguageCode::Fr).to_string();

        assert!(text.contains("Facture INV-7"));
        assert!(text.contains("Sous-total: 250.00 EUR"));
        assert!(text.contains("TVA (20%): 45.00 EUR"));
        assert!(text.contains("Total Final: 270.00 EUR"));
    }

    #[test]
    fn rendered_text_uses_german_labels() {
        let text = assemble(LanguageCode::De).to_string();

        assert!(text.contains("Rechnung INV-7"));
        assert!(text.contains("Zwischensumme: 250.00 EUR"));
        assert!(text.contains("USt (20%): 45.00 EUR"));
        assert!(text.contains("Endbetrag: 270.00 EUR"));
    }

    #[test]
    fn vat_line_is_omitted_when_vat_not_applied() {
        let mut invoice = test_invoice();
        invoice.apply_vat = false;
        let catalog = PersonaCatalog::builtin();

        let doc = InvoiceDocument::assemble(
            &invoice,
            &test_client(),
            catalog.get("persona1"),
            LanguageCode::En,
        )
        .unwrap();
        let text = doc.to_string();

        assert_eq!(doc.vat_amount, "0.00");
        assert!(!text.contains("VAT (20%)"));
        assert!(text.contains("Final Total: 225.00 EUR"));
    }

    #[test]
    fn rendered_text_includes_parties_and_bank_details() {
        let text = assemble(LanguageCode::En).to_string();

        assert!(text.contains("Issued by\nMr. John Doe Jr.\n123 Main St"));
        assert!(text.contains("Client\nAcme GmbH\nHauptstr. 1\n10115 Berlin\nGermany"));
        assert!(text.contains("VAT Number: DE123456789"));
        assert!(text.contains("Bank: Bank of America / IBAN US12345678901234567890 / BIC BOFAUS3N"));
        assert!(text.contains("Payment Terms: Payable within 30 days"));
    }

    #[test]
    fn language_for_prefers_client_preference() {
        let client = test_client();

        assert_eq!(InvoiceDocument::language_for(&client), LanguageCode::De);
        assert_eq!(
            InvoiceDocument::language_for(&NewClient::default().with_id(2)),
            LanguageCode::En
        );
    }

    #[test]
    fn invalid_invoice_fails_assembly() {
        let mut invoice = test_invoice();
        invoice.line_items.clear();
        let catalog = PersonaCatalog::builtin();

        let result = InvoiceDocument::assemble(
            &invoice,
            &test_client(),
            catalog.get("persona1"),
            LanguageCode::En,
        );

        assert_eq!(result, Err(TotalsError::EmptyLineItems));
    }
}
