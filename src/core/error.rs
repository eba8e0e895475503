//! # Core Errors
//!
//! Everything here is a programmer or data error: there is no network or
//! user input that can legitimately fail. Most of these surface at startup
//! when `App::new` validates the catalog, the menu and the locales.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum CoreError {
    /// Navigation requested to a section id absent from the menu.
    #[error("invalid section: {0}")]
    InvalidSection(String),

    /// Subsection id that does not belong to the named parent section.
    #[error("subsection '{subsection}' does not belong to section '{section}'")]
    InvalidSubsection { section: String, subsection: String },

    /// A section tag with no registered renderer.
    #[error("unknown section: {0}")]
    UnknownSection(String),

    /// Duplicate nerve ids, empty partitions, menu drift, broken locale files.
    #[error("dataset integrity error: {0}")]
    DatasetIntegrity(String),

    #[error("settings error: {0}")]
    Settings(#[from] SettingsError),
}

#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("settings I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("settings JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("unsupported settings version {0}")]
    UnsupportedVersion(u32),
}

pub type Result<T> = std::result::Result<T, CoreError>;
