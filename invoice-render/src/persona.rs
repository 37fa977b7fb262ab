use std::collections::BTreeMap;
use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::warn;

/// Errors raised while loading a persona catalog.
#[derive(Debug, Error)]
pub enum PersonaCatalogError {
    #[error("cannot read persona file '{path}': {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },

    #[error("invalid persona file: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("persona catalog has no personas")]
    Empty,

    #[error("default persona '{0}' is not in the catalog")]
    UnknownDefault(String),
}

/// Postal address of an issuer persona.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PersonaAddress {
    pub street: String,
    pub city: String,
    pub postal_code: String,
    pub state: String,
    pub country: String,
}

impl PersonaAddress {
    /// Address as display lines, in `street / postal city / state / country`
    /// order.
    pub fn lines(&self) -> Vec<String> {
        let mut lines = vec![self.street.clone()];
        lines.push(format!("{} {}", self.postal_code, self.city));
        if !self.state.is_empty() {
            lines.push(self.state.clone());
        }
        lines.push(self.country.clone());
        lines
    }
}

/// Bank coordinates printed on the invoice footer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BankInfo {
    pub bank_name: String,
    pub iban: String,
    pub bic: String,
}

/// An issuer identity: the name, address and bank details printed in the
/// invoice header and footer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Persona {
    #[serde(default)]
    pub prefix: String,
    pub first_name: String,
    pub last_name: String,
    #[serde(default)]
    pub suffix: String,
    pub address: PersonaAddress,
    pub tel: String,
    pub email: String,
    pub vat_number: String,
    pub bank_info: BankInfo,
}

impl Persona {
    /// Full display name, skipping blank prefix and suffix.
    pub fn full_name(&self) -> String {
        [
            self.prefix.as_str(),
            self.first_name.as_str(),
            self.last_name.as_str(),
            self.suffix.as_str(),
        ]
        .into_iter()
        .filter(|part| !part.trim().is_empty())
        .collect::<Vec<_>>()
        .join(" ")
    }
}

#[derive(Debug, Deserialize)]
struct CatalogFile {
    default: Option<String>,
    #[serde(default)]
    personas: BTreeMap<String, Persona>,
}

/// Named set of issuer personas with a designated default.
///
/// An unknown persona key falls back to the default rather than failing the
/// render; a printable invoice with the wrong letterhead beats no invoice.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PersonaCatalog {
    default_key: String,
    personas: BTreeMap<String, Persona>,
}

impl PersonaCatalog {
    /// The two personas shipped with the application.
    pub fn builtin() -> Self {
        let mut personas = BTreeMap::new();
        personas.insert(
            "persona1".to_string(),
            Persona {
                prefix: "Mr.".to_string(),
                first_name: "John".to_string(),
                last_name: "Doe".to_string(),
                suffix: "Jr.".to_string(),
                address: PersonaAddress {
                    street: "123 Main St".to_string(),
                    city: "Anytown".to_string(),
                    postal_code: "12345".to_string(),
                    state: "CA".to_string(),
                    country: "USA".to_string(),
                },
                tel: "123-456-7890".to_string(),
                email: "john.doe@example.com".to_string(),
                vat_number: "US123456789".to_string(),
                bank_info: BankInfo {
                    bank_name: "Bank of America".to_string(),
                    iban: "US12345678901234567890".to_string(),
                    bic: "BOFAUS3N".to_string(),
                },
            },
        );
        personas.insert(
            "persona2".to_string(),
            Persona {
                prefix: "Ms.".to_string(),
                first_name: "Jane".to_string(),
                last_name: "Smith".to_string(),
                suffix: String::new(),
                address: PersonaAddress {
                    street: "456 Elm St".to_string(),
                    city: "Othertown".to_string(),
                    postal_code: "67890".to_string(),
                    state: "NY".to_string(),
                    country: "USA".to_string(),
                },
                tel: "987-654-3210".to_string(),
                email: "jane.smith@example.com".to_string(),
                vat_number: "US987654321".to_string(),
                bank_info: BankInfo {
                    bank_name: "Chase Bank".to_string(),
                    iban: "US09876543210987654321".to_string(),
                    bic: "CHASUS33".to_string(),
                },
            },
        );

        Self {
            default_key: "persona1".to_string(),
            personas,
        }
    }

    /// Parses a catalog from TOML text.
    ///
    /// Expected shape:
    ///
    /// ```toml
    /// default = "studio"
    ///
    /// [personas.studio]
    /// first_name = "Ada"
    /// last_name = "Lovelace"
    /// tel = "555-0100"
    /// email = "ada@example.com"
    /// vat_number = "GB123456789"
    ///
    /// [personas.studio.address]
    /// street = "1 Analytical Way"
    /// city = "London"
    /// postal_code = "SW1A 1AA"
    /// state = ""
    /// country = "UK"
    ///
    /// [personas.studio.bank_info]
    /// bank_name = "Example Bank"
    /// iban = "GB33BUKB20201555555555"
    /// bic = "BUKBGB22"
    /// ```
    ///
    /// When `default` is omitted, the first key in sorted order is used.
    pub fn from_toml_str(text: &str) -> Result<Self, PersonaCatalogError> {
        let file: CatalogFile = toml::from_str(text)?;
        let first_key = file
            .personas
            .keys()
            .next()
            .cloned()
            .ok_or(PersonaCatalogError::Empty)?;

        let default_key = file.default.unwrap_or(first_key);
        if !file.personas.contains_key(&default_key) {
            return Err(PersonaCatalogError::UnknownDefault(default_key));
        }

        Ok(Self {
            default_key,
            personas: file.personas,
        })
    }

    /// Reads and parses a catalog from a TOML file on disk.
    pub fn from_path(path: &Path) -> Result<Self, PersonaCatalogError> {
        let text = std::fs::read_to_string(path).map_err(|source| PersonaCatalogError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_toml_str(&text)
    }

    pub fn default_key(&self) -> &str {
        &self.default_key
    }

    /// Persona keys in sorted order.
    pub fn keys(&self) -> Vec<&str> {
        self.personas.keys().map(String::as_str).collect()
    }

    pub fn find(
        &self,
        key: &str,
    ) -> Option<&Persona> {
        self.personas.get(key)
    }

    /// Persona for `key`, falling back to the default persona when the key
    /// is unknown.
    pub fn get(
        &self,
        key: &str,
    ) -> &Persona {
        if let Some(persona) = self.personas.get(key) {
            return persona;
        }

        warn!(
            requested = key,
            fallback = %self.default_key,
            "unknown persona key, using default"
        );
        &self.personas[&self.default_key]
    }
}

impl Default for PersonaCatalog {
    fn default() -> Self {
        Self::builtin()
    }
}
