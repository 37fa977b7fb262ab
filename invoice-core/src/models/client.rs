use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::language::LanguageCode;

/// Contact and billing profile for a client.
///
/// Every field except `id` is optional: clients are often created from a
/// half-filled form and completed later. `vat_percentage` is the default
/// VAT rate pre-filled when a new invoice is created for this client.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Client {
    pub id: i64,
    pub company_name: Option<String>,
    pub vat_number: Option<String>,
    pub vat_percentage: Option<Decimal>,
    pub street: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub postal_code: Option<String>,
    pub country: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub currency: Option<String>,
    pub language: Option<LanguageCode>,
    pub payment_terms: Option<String>,
}

/// For creating new clients (no id yet).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewClient {
    pub company_name: Option<String>,
    pub vat_number: Option<String>,
    pub vat_percentage: Option<Decimal>,
    pub street: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub postal_code: Option<String>,
    pub country: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub currency: Option<String>,
    pub language: Option<LanguageCode>,
    pub payment_terms: Option<String>,
}

impl NewClient {
    /// Attach an id, producing a stored [`Client`].
    pub fn with_id(
        self,
        id: i64,
    ) -> Client {
        Client {
            id,
            company_name: self.company_name,
            vat_number: self.vat_number,
            vat_percentage: self.vat_percentage,
            street: self.street,
            city: self.city,
            state: self.state,
            postal_code: self.postal_code,
            country: self.country,
            first_name: self.first_name,
            last_name: self.last_name,
            email: self.email,
            phone: self.phone,
            currency: self.currency,
            language: self.language,
            payment_terms: self.payment_terms,
        }
    }
}

impl Client {
    /// Name shown on lists and rendered invoices: the company name when
    /// present, otherwise the personal name, otherwise a numbered fallback.
    pub fn display_name(&self) -> String {
        if let Some(company) = non_blank(self.company_name.as_deref()) {
            return company.to_string();
        }

        let personal = [self.first_name.as_deref(), self.last_name.as_deref()]
            .into_iter()
            .filter_map(non_blank)
            .collect::<Vec<_>>()
            .join(" ");
        if !personal.is_empty() {
            return personal;
        }

        format!("client #{}", self.id)
    }

    /// Default VAT rate used to pre-fill a new invoice for this client.
    pub fn default_vat_pct(&self) -> Decimal {
        self.vat_percentage.unwrap_or(Decimal::ZERO)
    }

    /// Postal address as display lines, skipping blank components.
    pub fn address_lines(&self) -> Vec<String> {
        let mut lines = Vec::new();

        if let Some(street) = non_blank(self.street.as_deref()) {
            lines.push(street.to_string());
        }

        let locality = [self.postal_code.as_deref(), self.city.as_deref()]
            .into_iter()
            .filter_map(non_blank)
            .collect::<Vec<_>>()
            .join(" ");
        if !locality.is_empty() {
            lines.push(locality);
        }

        if let Some(state) = non_blank(self.state.as_deref()) {
            lines.push(state.to_string());
        }
        if let Some(country) = non_blank(self.country.as_deref()) {
            lines.push(country.to_string());
        }

        lines
    }
}

fn non_blank(s: Option<&str>) -> Option<&str> {
    s.map(str::trim).filter(|s| !s.is_empty())
}
