//! # Localization
//!
//! Flat `"dotted.key" = "text"` tables embedded from `data/locales/`.
//! `t()` never fails: a missing key renders as the key itself.

use std::collections::{BTreeSet, HashMap};
use std::fmt;
use std::str::FromStr;

use log::warn;
use serde::{Deserialize, Serialize};

use crate::core::error::{CoreError, Result};

const LOCALE_ES: &str = include_str!("../../data/locales/es.toml");
const LOCALE_EN: &str = include_str!("../../data/locales/en.toml");

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    #[default]
    Es,
    En,
}

impl Language {
    pub const ALL: [Language; 2] = [Language::Es, Language::En];

    pub fn code(self) -> &'static str {
        match self {
            Language::Es => "es",
            Language::En => "en",
        }
    }

    pub fn other(self) -> Self {
        match self {
            Language::Es => Language::En,
            Language::En => Language::Es,
        }
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for Language {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "es" => Ok(Language::Es),
            "en" => Ok(Language::En),
            other => Err(format!("unsupported language '{other}' (expected es or en)")),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Translator {
    tables: HashMap<Language, HashMap<String, String>>,
    language: Language,
}

impl Translator {
    /// Load both embedded locales and check they define the same keys.
    pub fn embedded(language: Language) -> Result<Self> {
        Self::from_sources(language, &[(Language::Es, LOCALE_ES), (Language::En, LOCALE_EN)])
    }

    pub fn from_sources(language: Language, sources: &[(Language, &str)]) -> Result<Self> {
        let mut tables = HashMap::new();
        for (lang, source) in sources {
            let table: HashMap<String, String> = toml::from_str(source).map_err(|e| {
                CoreError::DatasetIntegrity(format!("locale '{lang}' parse error: {e}"))
            })?;
            tables.insert(*lang, table);
        }

        let translator = Self { tables, language };
        if let Some(missing) = translator.key_mismatches().into_iter().next() {
            return Err(CoreError::DatasetIntegrity(format!(
                "locale key '{}' is missing from '{}'",
                missing.1, missing.0
            )));
        }
        Ok(translator)
    }

    pub fn language(&self) -> Language {
        self.language
    }

    pub fn set_language(&mut self, language: Language) {
        self.language = language;
    }

    pub fn has_key(&self, language: Language, key: &str) -> bool {
        self.tables
            .get(&language)
            .is_some_and(|table| table.contains_key(key))
    }

    /// Translate `key` in the active language, substituting `{name}`
    /// placeholders from `params`.
    pub fn t(&self, key: &str, params: &[(&str, &str)]) -> String {
        let Some(text) = self
            .tables
            .get(&self.language)
            .and_then(|table| table.get(key))
        else {
            warn!("Missing translation for '{}' in '{}'", key, self.language);
            return key.to_string();
        };

        let mut text = text.clone();
        for (name, value) in params {
            text = text.replace(&format!("{{{name}}}"), value);
        }
        text
    }

    /// `(language, key)` pairs where `key` exists in another locale but not in `language`.
    fn key_mismatches(&self) -> Vec<(Language, String)> {
        let all: BTreeSet<&String> = self.tables.values().flat_map(|t| t.keys()).collect();
        let mut missing = Vec::new();
        for (lang, table) in &self.tables {
            for key in &all {
                if !table.contains_key(*key) {
                    missing.push((*lang, (*key).clone()));
                }
            }
        }
        missing.sort();
        missing
    }
}
