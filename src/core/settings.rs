//! # Settings Persistence
//!
//! UI preferences (theme, language) saved to `~/.neuroref/settings.json`.
//!
//! The record is versioned. Files written before versioning existed
//! (`{"isDarkMode": true, "language": "en"}`) are migrated on load; files
//! from a newer version are rejected and defaults are used instead.
//!
//! Writes use atomic rename (write `.tmp`, then `rename()`).

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use log::{debug, info, warn};
use serde::{Deserialize, Serialize};

use crate::core::error::SettingsError;
use crate::core::i18n::Language;
use crate::core::notify::{SubscriberId, Subscribers};

pub const SETTINGS_VERSION: u32 = 1;

#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq)]
pub struct Settings {
    pub version: u32,
    pub dark_mode: bool,
    pub language: Language,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            version: SETTINGS_VERSION,
            dark_mode: false,
            language: Language::Es,
        }
    }
}

/// Shape of the unversioned record.
#[derive(Deserialize)]
struct LegacySettings {
    #[serde(rename = "isDarkMode", default)]
    is_dark_mode: bool,
    #[serde(default)]
    language: Language,
}

impl From<LegacySettings> for Settings {
    fn from(legacy: LegacySettings) -> Self {
        Self {
            version: SETTINGS_VERSION,
            dark_mode: legacy.is_dark_mode,
            language: legacy.language,
        }
    }
}

/// Returns `~/.neuroref/settings.json`.
pub fn settings_path() -> Option<PathBuf> {
    dirs::home_dir().map(|h| h.join(".neuroref").join("settings.json"))
}

/// Parse a stored record, migrating the legacy shape.
pub fn parse_settings(json: &str) -> Result<Settings, SettingsError> {
    let value: serde_json::Value = serde_json::from_str(json)?;
    match value.get("version").and_then(serde_json::Value::as_u64) {
        None => {
            let legacy: LegacySettings = serde_json::from_value(value)?;
            info!("Migrating unversioned settings record to version {SETTINGS_VERSION}");
            Ok(legacy.into())
        }
        Some(v) if v == u64::from(SETTINGS_VERSION) => Ok(serde_json::from_value(value)?),
        Some(v) => Err(SettingsError::UnsupportedVersion(
            u32::try_from(v).unwrap_or(u32::MAX),
        )),
    }
}

/// Read settings from `path`. A missing file is `Ok(None)`.
pub fn load_settings(path: &Path) -> Result<Option<Settings>, SettingsError> {
    match fs::read_to_string(path) {
        Ok(contents) => parse_settings(&contents).map(Some),
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
        Err(e) => Err(e.into()),
    }
}

/// Atomically write `settings` as JSON to `path` (via `.tmp` + rename).
pub fn save_settings(path: &Path, settings: &Settings) -> Result<(), SettingsError> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let tmp_path = path.with_extension("tmp");
    let json = serde_json::to_string_pretty(settings)?;
    fs::write(&tmp_path, json)?;
    fs::rename(&tmp_path, path)?;
    debug!("Saved settings to {}", path.display());
    Ok(())
}

/// Owner of the live settings record.
#[derive(Debug)]
pub struct SettingsStore {
    settings: Settings,
    /// `None` disables persistence.
    path: Option<PathBuf>,
    subscribers: Subscribers<Settings>,
}

impl SettingsStore {
    pub fn new(settings: Settings, path: Option<PathBuf>) -> Self {
        Self {
            settings,
            path,
            subscribers: Subscribers::new(),
        }
    }

    /// Load from `path`, falling back to `fallback` when the file is missing
    /// or unusable. Returns whether a stored record was found.
    pub fn load(path: Option<PathBuf>, fallback: Settings) -> (Self, bool) {
        let stored = match path.as_deref().map(load_settings) {
            Some(Ok(found)) => found,
            Some(Err(e)) => {
                warn!("Ignoring settings file: {}", e);
                None
            }
            None => None,
        };
        let found = stored.is_some();
        (Self::new(stored.unwrap_or(fallback), path), found)
    }

    pub fn settings(&self) -> Settings {
        self.settings
    }

    pub fn dark_mode(&self) -> bool {
        self.settings.dark_mode
    }

    pub fn language(&self) -> Language {
        self.settings.language
    }

    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    pub fn toggle_dark_mode(&mut self) {
        self.settings.dark_mode = !self.settings.dark_mode;
        self.subscribers.notify(&self.settings);
    }

    pub fn set_dark_mode(&mut self, dark_mode: bool) {
        self.settings.dark_mode = dark_mode;
        self.subscribers.notify(&self.settings);
    }

    pub fn set_language(&mut self, language: Language) {
        self.settings.language = language;
        self.subscribers.notify(&self.settings);
    }

    pub fn toggle_language(&mut self) {
        self.set_language(self.settings.language.other());
    }

    /// Write the record to the configured path, if any.
    pub fn persist(&self) -> Result<(), SettingsError> {
        match &self.path {
            Some(path) => save_settings(path, &self.settings),
            None => Ok(()),
        }
    }

    pub fn subscribe(&mut self, listener: impl FnMut(&Settings) + 'static) -> SubscriberId {
        self.subscribers.subscribe(listener)
    }

    pub fn unsubscribe(&mut self, id: SubscriberId) -> bool {
        self.subscribers.unsubscribe(id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    #[test]
    fn test_default_settings() {
        let s = Settings::default();
        assert_eq!(s.version, 1);
        assert!(!s.dark_mode);
        assert_eq!(s.language, Language::Es);
    }

    #[test]
    fn test_parse_current_version() {
        let s = parse_settings(r#"{"version":1,"dark_mode":true,"language":"en"}"#).unwrap();
        assert!(s.dark_mode);
        assert_eq!(s.language, Language::En);
    }

    #[test]
    fn test_legacy_record_is_migrated() {
        let s = parse_settings(r#"{"isDarkMode":true,"language":"en"}"#).unwrap();
        assert_eq!(
            s,
            Settings {
                version: 1,
                dark_mode: true,
                language: Language::En
            }
        );
    }

    #[test]
    fn test_legacy_record_with_missing_fields() {
        let s = parse_settings(r#"{"language":"en"}"#).unwrap();
        assert!(!s.dark_mode);
        assert_eq!(s.language, Language::En);
    }

    #[test]
    fn test_future_version_rejected() {
        let err = parse_settings(r#"{"version":7,"dark_mode":true,"language":"en"}"#).unwrap_err();
        assert!(matches!(err, SettingsError::UnsupportedVersion(7)));
    }

    #[test]
    fn test_garbage_is_json_error() {
        assert!(matches!(parse_settings("not json"), Err(SettingsError::Json(_))));
    }

    #[test]
    fn test_save_and_load_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("settings.json");
        let settings = Settings {
            dark_mode: true,
            language: Language::En,
            ..Settings::default()
        };

        save_settings(&path, &settings).unwrap();
        assert!(!path.with_extension("tmp").exists());
        assert_eq!(load_settings(&path).unwrap(), Some(settings));
    }

    #[test]
    fn test_load_missing_file_is_none() {
        let dir = tempfile::tempdir().unwrap();
        assert_eq!(load_settings(&dir.path().join("absent.json")).unwrap(), None);
    }

    #[test]
    fn test_store_load_falls_back_on_bad_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.json");
        fs::write(&path, r#"{"version":99}"#).unwrap();

        let fallback = Settings {
            dark_mode: true,
            ..Settings::default()
        };
        let (store, found) = SettingsStore::load(Some(path), fallback);
        assert!(!found);
        assert_eq!(store.settings(), fallback);
    }

    #[test]
    fn test_store_mutations_notify_and_persist() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.json");
        let seen = Rc::new(RefCell::new(Vec::new()));

        let mut store = SettingsStore::new(Settings::default(), Some(path.clone()));
        let sink = seen.clone();
        store.subscribe(move |s: &Settings| sink.borrow_mut().push(*s));

        store.toggle_dark_mode();
        store.toggle_language();
        store.persist().unwrap();

        assert_eq!(seen.borrow().len(), 2);
        assert!(seen.borrow()[0].dark_mode);
        assert_eq!(seen.borrow()[1].language, Language::En);

        let (reloaded, found) = SettingsStore::load(Some(path), Settings::default());
        assert!(found);
        assert!(reloaded.dark_mode());
        assert_eq!(reloaded.language(), Language::En);
    }

    #[test]
    fn test_persist_without_path_is_noop() {
        let store = SettingsStore::new(Settings::default(), None);
        assert!(store.persist().is_ok());
    }
}
