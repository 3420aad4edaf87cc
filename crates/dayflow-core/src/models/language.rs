//! Output language selection.

use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Language of the generation prompt and of the model's reply.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    #[default]
    Vi,
    En,
}

impl FromStr for Language {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "vi" | "vietnamese" | "tiếng việt" => Ok(Language::Vi),
            "en" | "english" => Ok(Language::En),
            _ => Err(format!("Unsupported language: {s}")),
        }
    }
}

impl Language {
    pub fn as_str(&self) -> &'static str {
        match self {
            Language::Vi => "vi",
            Language::En => "en",
        }
    }
}
