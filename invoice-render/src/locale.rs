use invoice_core::LanguageCode;

/// Static label set for one supported language.
///
/// Every field is present in every language, so a rendered invoice never
/// mixes languages mid-document.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Labels {
    pub invoice: &'static str,
    pub invoice_date: &'static str,
    pub client: &'static str,
    pub currency: &'static str,
    pub services: &'static str,
    pub service: &'static str,
    pub unit_cost: &'static str,
    pub quantity: &'static str,
    pub line_total: &'static str,
    pub summary: &'static str,
    pub subtotal: &'static str,
    pub discount: &'static str,
    pub vat: &'static str,
    pub vat_amount: &'static str,
    pub final_total: &'static str,
    pub issued_by: &'static str,
    pub vat_number: &'static str,
    pub bank: &'static str,
    pub payment_terms: &'static str,
}

pub(crate) const EN: Labels = Labels {
    invoice: "Invoice",
    invoice_date: "Invoice Date",
    client: "Client",
    currency: "Currency",
    services: "Services",
    service: "Service",
    unit_cost: "Unit Cost",
    quantity: "Quantity",
    line_total: "Line Total",
    summary: "Summary",
    subtotal: "Subtotal",
    discount: "Discount",
    vat: "VAT",
    vat_amount: "VAT Amount",
    final_total: "Final Total",
    issued_by: "Issued by",
    vat_number: "VAT Number",
    bank: "Bank",
    payment_terms: "Payment Terms",
};

pub(crate) const FR: Labels = Labels {
    invoice: "Facture",
    invoice_date: "Date de Facture",
    client: "Client",
    currency: "Devise",
    services: "Services",
    service: "Service",
    unit_cost: "Coût Unitaire",
    quantity: "Quantité",
    line_total: "Total de la Ligne",
    summary: "Résumé",
    subtotal: "Sous-total",
    discount: "Remise",
    vat: "TVA",
    vat_amount: "Montant TVA",
    final_total: "Total Final",
    issued_by: "Émis par",
    vat_number: "Numéro de TVA",
    bank: "Banque",
    payment_terms: "Conditions de Paiement",
};

pub(crate) const DE: Labels = Labels {
    invoice: "Rechnung",
    invoice_date: "Rechnungsdatum",
    client: "Kunde",
    currency: "Währung",
    services: "Dienstleistungen",
    service: "Dienstleistung",
    unit_cost: "Einzelpreis",
    quantity: "Menge",
    line_total: "Gesamtbetrag",
    summary: "Zusammenfassung",
    subtotal: "Zwischensumme",
    discount: "Rabatt",
    vat: "USt",
    vat_amount: "USt-Betrag",
    final_total: "Endbetrag",
    issued_by: "Ausgestellt von",
    vat_number: "USt-IdNr.",
    bank: "Bank",
    payment_terms: "Zahlungsbedingungen",
};

impl Labels {
    /// Label set for a language code.
    pub fn for_language(language: LanguageCode) -> &'static Labels {
        match language {
            LanguageCode::En => &EN,
            LanguageCode::Fr => &FR,
            LanguageCode::De => &DE,
        }
    }
}
