use serde::{Deserialize, Serialize};

/// Language an invoice is rendered in.
///
/// Unknown codes are treated as English by callers; `parse` returns `None`
/// so the caller can decide whether to fall back or reject.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LanguageCode {
    #[default]
    En,
    Fr,
    De,
}

impl LanguageCode {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::En => "en",
            Self::Fr => "fr",
            Self::De => "de",
        }
    }

    /// Case-insensitive, so CSV exports with `EN` or `De` still load.
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_ascii_lowercase().as_str() {
            "en" => Some(Self::En),
            "fr" => Some(Self::Fr),
            "de" => Some(Self::De),
            _ => None,
        }
    }
}
