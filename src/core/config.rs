//! # Configuration
//!
//! Centralizes startup settings with a clear override hierarchy:
//! defaults → config file → env vars → CLI flags.
//!
//! Config lives at `~/.neuroref/config.toml`. If missing on first run, a
//! commented-out default is generated so users can discover all options.
//!
//! Language and theme here are *starting* values. Once the user toggles
//! either in the UI, the persisted settings record (see `settings.rs`)
//! wins on later runs, unless an env var or CLI flag names one explicitly.

use log::{debug, info, warn};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use crate::core::i18n::Language;
use crate::core::settings::settings_path;

// ============================================================================
// Config Structs (all fields Option<T> for sparse TOML)
// ============================================================================

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct NeurorefConfig {
    #[serde(default)]
    pub general: GeneralConfig,
}

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct GeneralConfig {
    pub language: Option<Language>,
    pub theme: Option<Theme>,
    pub log_file: Option<String>,
    pub start_location: Option<String>,
    pub persist_settings: Option<bool>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    #[default]
    Light,
    Dark,
}

impl Theme {
    pub fn is_dark(self) -> bool {
        matches!(self, Theme::Dark)
    }
}

impl FromStr for Theme {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "light" => Ok(Theme::Light),
            "dark" => Ok(Theme::Dark),
            other => Err(format!("unsupported theme '{other}' (expected light or dark)")),
        }
    }
}

/// Values given on the command line. `None` = flag not passed.
#[derive(Debug, Default, Clone)]
pub struct CliOverrides {
    pub language: Option<Language>,
    pub theme: Option<Theme>,
    pub location: Option<String>,
    pub log_file: Option<PathBuf>,
}

// ============================================================================
// Defaults
// ============================================================================

pub const DEFAULT_LOG_FILE: &str = "neuroref.log";
pub const ENV_LANG: &str = "NEUROREF_LANG";
pub const ENV_THEME: &str = "NEUROREF_THEME";

// ============================================================================
// Resolved Config (concrete values, no Options)
// ============================================================================

#[derive(Debug, Clone)]
pub struct ResolvedConfig {
    pub language: Language,
    pub dark_mode: bool,
    /// Set when an env var or CLI flag named the language; beats persisted settings.
    pub language_explicit: bool,
    pub theme_explicit: bool,
    /// `None` when persistence is disabled or there is no home directory.
    pub settings_path: Option<PathBuf>,
    pub log_file: PathBuf,
    pub start_location: Option<String>,
    pub persist_settings: bool,
}

// ============================================================================
// Error Type
// ============================================================================

#[derive(Debug)]
pub enum ConfigError {
    Io(std::io::Error),
    Parse(toml::de::Error),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Io(e) => write!(f, "config I/O error: {e}"),
            ConfigError::Parse(e) => write!(f, "config parse error: {e}"),
        }
    }
}

impl std::error::Error for ConfigError {}

// ============================================================================
// Loading
// ============================================================================

/// Returns the path to `~/.neuroref/config.toml`.
pub fn config_path() -> Option<PathBuf> {
    dirs::home_dir().map(|h| h.join(".neuroref").join("config.toml"))
}

/// Load config from `~/.neuroref/config.toml`.
///
/// If the file doesn't exist, generates a commented-out default and
/// returns `NeurorefConfig::default()`. If it exists but is malformed,
/// returns `ConfigError::Parse`.
pub fn load_config() -> Result<NeurorefConfig, ConfigError> {
    let path = match config_path() {
        Some(p) => p,
        None => {
            warn!("Could not determine home directory, using default config");
            return Ok(NeurorefConfig::default());
        }
    };
    load_config_from(&path)
}

pub fn load_config_from(path: &Path) -> Result<NeurorefConfig, ConfigError> {
    if !path.exists() {
        info!("No config file found, generating default at {}", path.display());
        generate_default_config(path);
        return Ok(NeurorefConfig::default());
    }

    let contents = fs::read_to_string(path).map_err(ConfigError::Io)?;
    let config: NeurorefConfig = toml::from_str(&contents).map_err(ConfigError::Parse)?;
    info!("Loaded config from {}", path.display());
    debug!("Config: {:?}", config);
    Ok(config)
}

const DEFAULT_CONFIG_TEMPLATE: &str = r#"# NeuroRef Configuration
# All settings are optional. Defaults are used for anything not specified.
# Override hierarchy: defaults -> this file -> env vars -> CLI flags.

# [general]
# language = "es"                        # "es" or "en" (or NEUROREF_LANG)
# theme = "light"                        # "light" or "dark" (or NEUROREF_THEME)
# log_file = "neuroref.log"
# start_location = "nerves/upper-limb-nerves"
# persist_settings = true                # Save theme/language to ~/.neuroref/settings.json
"#;

/// Generates a commented-out default config file at the given path.
fn generate_default_config(path: &Path) {
    if let Some(parent) = path.parent() {
        if let Err(e) = fs::create_dir_all(parent) {
            warn!("Failed to create config directory: {}", e);
            return;
        }
    }
    if let Err(e) = fs::write(path, DEFAULT_CONFIG_TEMPLATE) {
        warn!("Failed to write default config: {}", e);
    }
}

// ============================================================================
// Resolution
// ============================================================================

/// Resolve the final config by collapsing: defaults → config file → env vars → CLI.
pub fn resolve(config: &NeurorefConfig, cli: &CliOverrides) -> ResolvedConfig {
    resolve_with_env(config, cli, |name| std::env::var(name).ok())
}

/// Same as [`resolve`], with env lookups routed through `env`.
pub fn resolve_with_env(
    config: &NeurorefConfig,
    cli: &CliOverrides,
    env: impl Fn(&str) -> Option<String>,
) -> ResolvedConfig {
    let env_language = parse_env::<Language>(&env, ENV_LANG);
    let env_theme = parse_env::<Theme>(&env, ENV_THEME);

    // Language: CLI → env → config → default
    let explicit_language = cli.language.or(env_language);
    let language = explicit_language
        .or(config.general.language)
        .unwrap_or_default();

    // Theme: CLI → env → config → default
    let explicit_theme = cli.theme.or(env_theme);
    let theme = explicit_theme.or(config.general.theme).unwrap_or_default();

    let persist_settings = config.general.persist_settings.unwrap_or(true);
    let settings_path = if persist_settings { settings_path() } else { None };

    let log_file = cli
        .log_file
        .clone()
        .or_else(|| config.general.log_file.as_ref().map(PathBuf::from))
        .unwrap_or_else(|| PathBuf::from(DEFAULT_LOG_FILE));

    let start_location = cli
        .location
        .clone()
        .or_else(|| config.general.start_location.clone());

    ResolvedConfig {
        language,
        dark_mode: theme.is_dark(),
        language_explicit: explicit_language.is_some(),
        theme_explicit: explicit_theme.is_some(),
        settings_path,
        log_file,
        start_location,
        persist_settings,
    }
}

fn parse_env<T: FromStr<Err = String>>(env: &impl Fn(&str) -> Option<String>, name: &str) -> Option<T> {
    let raw = env(name)?;
    match raw.parse() {
        Ok(value) => Some(value),
        Err(e) => {
            warn!("Ignoring {}: {}", name, e);
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn no_env(_: &str) -> Option<String> {
        None
    }

    #[test]
    fn test_default_config_parses() {
        let config = NeurorefConfig::default();
        assert!(config.general.language.is_none());
        assert!(config.general.theme.is_none());
    }

    #[test]
    fn test_resolve_uses_defaults_when_empty() {
        let resolved = resolve_with_env(&NeurorefConfig::default(), &CliOverrides::default(), no_env);
        assert_eq!(resolved.language, Language::Es);
        assert!(!resolved.dark_mode);
        assert!(!resolved.language_explicit);
        assert!(!resolved.theme_explicit);
        assert!(resolved.persist_settings);
        assert_eq!(resolved.log_file, PathBuf::from(DEFAULT_LOG_FILE));
        assert!(resolved.start_location.is_none());
    }

    #[test]
    fn test_resolve_config_values_override_defaults() {
        let config = NeurorefConfig {
            general: GeneralConfig {
                language: Some(Language::En),
                theme: Some(Theme::Dark),
                log_file: Some("/tmp/nr.log".to_string()),
                start_location: Some("reference".to_string()),
                persist_settings: Some(false),
            },
        };
        let resolved = resolve_with_env(&config, &CliOverrides::default(), no_env);
        assert_eq!(resolved.language, Language::En);
        assert!(resolved.dark_mode);
        assert!(!resolved.language_explicit);
        assert_eq!(resolved.log_file, PathBuf::from("/tmp/nr.log"));
        assert_eq!(resolved.start_location.as_deref(), Some("reference"));
        assert!(!resolved.persist_settings);
        assert!(resolved.settings_path.is_none());
    }

    #[test]
    fn test_env_overrides_config() {
        let config = NeurorefConfig {
            general: GeneralConfig {
                language: Some(Language::Es),
                ..Default::default()
            },
        };
        let env = |name: &str| match name {
            ENV_LANG => Some("en".to_string()),
            ENV_THEME => Some("dark".to_string()),
            _ => None,
        };
        let resolved = resolve_with_env(&config, &CliOverrides::default(), env);
        assert_eq!(resolved.language, Language::En);
        assert!(resolved.dark_mode);
        assert!(resolved.language_explicit);
        assert!(resolved.theme_explicit);
    }

    #[test]
    fn test_invalid_env_is_ignored() {
        let env = |name: &str| (name == ENV_LANG).then(|| "klingon".to_string());
        let resolved = resolve_with_env(&NeurorefConfig::default(), &CliOverrides::default(), env);
        assert_eq!(resolved.language, Language::Es);
        assert!(!resolved.language_explicit);
    }

    #[test]
    fn test_resolve_cli_wins() {
        let env = |name: &str| (name == ENV_THEME).then(|| "dark".to_string());
        let cli = CliOverrides {
            language: Some(Language::En),
            theme: Some(Theme::Light),
            location: Some("nerves".to_string()),
            log_file: Some(PathBuf::from("cli.log")),
        };
        let config = NeurorefConfig {
            general: GeneralConfig {
                start_location: Some("reference".to_string()),
                ..Default::default()
            },
        };
        let resolved = resolve_with_env(&config, &cli, env);
        assert_eq!(resolved.language, Language::En);
        assert!(!resolved.dark_mode);
        assert_eq!(resolved.start_location.as_deref(), Some("nerves"));
        assert_eq!(resolved.log_file, PathBuf::from("cli.log"));
    }

    #[test]
    fn test_sparse_toml_parses() {
        let toml_str = r#"
[general]
theme = "dark"
"#;
        let config: NeurorefConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(config.general.theme, Some(Theme::Dark));
        assert!(config.general.language.is_none());
        assert!(config.general.persist_settings.is_none());
    }

    #[test]
    fn test_bad_value_is_parse_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "[general]\nlanguage = \"fr\"\n").unwrap();
        assert!(matches!(load_config_from(&path), Err(ConfigError::Parse(_))));
    }

    #[test]
    fn test_missing_file_generates_template() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("sub").join("config.toml");
        let config = load_config_from(&path).unwrap();
        assert!(config.general.language.is_none());

        let written = fs::read_to_string(&path).unwrap();
        assert!(written.starts_with("# NeuroRef Configuration"));
        // Everything is commented out, so it parses to defaults.
        let reparsed: NeurorefConfig = toml::from_str(&written).unwrap();
        assert!(reparsed.general.theme.is_none());
    }

    #[test]
    fn test_theme_parse() {
        assert_eq!("DARK".parse::<Theme>().unwrap(), Theme::Dark);
        assert!("sepia".parse::<Theme>().is_err());
    }
}
