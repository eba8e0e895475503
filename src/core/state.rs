//! # Application State
//!
//! Core business state for NeuroRef. This module contains domain logic only -
//! no TUI-specific types. Presentation state lives in the `tui` module.
//!
//! ```text
//! App
//! ├── catalog: Arc<NerveCatalog>    // immutable nerve dataset
//! ├── navigator: Navigator          // section/subsection state machine
//! ├── search: SearchEngine          // query + matching nerve indices
//! ├── resolver: ContentResolver     // navigation → content unit
//! ├── settings: SettingsStore       // theme + language, persisted
//! ├── translator: Translator        // active-language lookups
//! └── status_message: String        // status bar text
//! ```
//!
//! State changes only happen through `update(state, action)` in action.rs.
//! This keeps things predictable, so no surprise mutations.

use std::collections::BTreeSet;
use std::sync::Arc;

use log::{info, warn};

use crate::core::catalog::NerveCatalog;
use crate::core::config::ResolvedConfig;
use crate::core::content::{ContentResolver, ContentUnit};
use crate::core::error::{CoreError, Result};
use crate::core::i18n::{Language, Translator};
use crate::core::navigation::{NavigationState, Navigator, Section, menu, parse_location, verify_menu};
use crate::core::search::SearchEngine;
use crate::core::settings::{Settings, SettingsStore};

pub struct App {
    pub catalog: Arc<NerveCatalog>,
    pub navigator: Navigator,
    pub search: SearchEngine,
    pub resolver: ContentResolver,
    pub settings: SettingsStore,
    pub translator: Translator,
    pub status_message: String,
}

impl App {
    /// Build the app from the embedded dataset and run every startup
    /// integrity check. Any failure here is fatal.
    pub fn new(settings: SettingsStore) -> Result<Self> {
        let catalog = Arc::new(NerveCatalog::embedded()?);
        let sections = menu();
        verify_menu(&sections)?;

        let resolver = ContentResolver::new(Arc::clone(&catalog));
        resolver.verify(&sections)?;

        let translator = Translator::embedded(settings.language())?;
        verify_locale_coverage(&resolver, &translator, &sections)?;

        info!(
            "Catalog loaded: {} nerves, {} sections",
            catalog.len(),
            sections.len()
        );

        let status_message = translator.t("app.title", &[]);
        Ok(Self {
            search: SearchEngine::new(Arc::clone(&catalog)),
            navigator: Navigator::new(sections),
            catalog,
            resolver,
            settings,
            translator,
            status_message,
        })
    }

    /// Load persisted settings per `config`, apply explicit overrides and
    /// the start location.
    pub fn from_config(config: &ResolvedConfig) -> Result<Self> {
        let fallback = Settings {
            dark_mode: config.dark_mode,
            language: config.language,
            ..Settings::default()
        };
        let (mut store, found) = SettingsStore::load(config.settings_path.clone(), fallback);
        if found {
            info!("Restored settings: {:?}", store.settings());
        }
        if config.language_explicit {
            store.set_language(config.language);
        }
        if config.theme_explicit {
            store.set_dark_mode(config.dark_mode);
        }

        let mut app = Self::new(store)?;
        if let Some(raw) = &config.start_location {
            let result = parse_location(raw).and_then(|loc| app.navigator.navigate_to_location(loc));
            if let Err(e) = result {
                warn!("Ignoring start location '{}': {}", raw, e);
                app.status_message = app
                    .translator
                    .t("status.navigationFailed", &[("error", &e.to_string())]);
            }
        }
        Ok(app)
    }

    pub fn navigation(&self) -> &NavigationState {
        self.navigator.state()
    }

    pub fn language(&self) -> Language {
        self.settings.language()
    }

    pub fn dark_mode(&self) -> bool {
        self.settings.dark_mode()
    }

    /// Content for the current location.
    pub fn content(&self, selected_nerve: Option<&str>) -> ContentUnit<'_> {
        self.resolver.resolve(self.navigator.state(), selected_nerve)
    }

    /// Shorthand for `translator.t`.
    pub fn t(&self, key: &str, params: &[(&str, &str)]) -> String {
        self.translator.t(key, params)
    }
}

/// Every key referenced by any reachable content unit exists in every locale.
fn verify_locale_coverage(
    resolver: &ContentResolver,
    translator: &Translator,
    sections: &[Section],
) -> Result<()> {
    let mut keys: BTreeSet<String> = BTreeSet::new();
    let mut collect = |state: &NavigationState, selected: Option<&str>| {
        keys.extend(resolver.resolve(state, selected).keys());
    };

    let mut state = NavigationState::new(sections.to_vec());
    collect(&state, None);
    for section in sections {
        state.active_section = Some(section.id);
        state.active_subsection = None;
        collect(&state, None);
        for &sub in &section.subsections {
            state.active_subsection = Some(sub);
            collect(&state, None);
            if let Some(region) = sub.region() {
                for nerve in resolver.catalog().get_by_region(region) {
                    collect(&state, Some(&nerve.id));
                }
            }
        }
    }
    keys.extend(resolver.resolve_location("#missing", None).keys());

    for key in &keys {
        for lang in Language::ALL {
            if !translator.has_key(lang, key) {
                return Err(CoreError::DatasetIntegrity(format!(
                    "translation key '{key}' is missing from locale '{lang}'"
                )));
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::config::{CliOverrides, NeurorefConfig, resolve_with_env};
    use crate::core::navigation::{Location, SectionId, SubsectionId};

    fn config(cli: CliOverrides) -> ResolvedConfig {
        let mut resolved = resolve_with_env(&NeurorefConfig::default(), &cli, |_| None);
        resolved.settings_path = None;
        resolved
    }

    #[test]
    fn test_app_new_defaults() {
        let app = App::new(SettingsStore::new(Settings::default(), None)).unwrap();
        assert_eq!(app.status_message, "NeuroRef ENMG");
        assert_eq!(app.language(), Language::Es);
        assert!(!app.dark_mode());
        assert!(app.navigation().is_home());
        assert_eq!(app.search.query(), "");
        assert_eq!(app.catalog.len(), 18);
    }

    #[test]
    fn test_from_config_applies_start_location() {
        let app = App::from_config(&config(CliOverrides {
            location: Some("nerves/lower-limb-nerves".to_string()),
            ..Default::default()
        }))
        .unwrap();
        assert_eq!(
            app.navigator.location(),
            Location {
                section: Some(SectionId::Nerves),
                subsection: Some(SubsectionId::LowerLimbNerves),
            }
        );
    }

    #[test]
    fn test_from_config_bad_start_location_stays_home() {
        let app = App::from_config(&config(CliOverrides {
            location: Some("nerves/carpal-tunnel".to_string()),
            ..Default::default()
        }))
        .unwrap();
        assert!(app.navigation().is_home());
        assert!(app.status_message.contains("carpal-tunnel"));
    }

    #[test]
    fn test_explicit_language_beats_persisted_settings() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.json");
        crate::core::settings::save_settings(
            &path,
            &Settings {
                dark_mode: true,
                language: Language::Es,
                ..Settings::default()
            },
        )
        .unwrap();

        let mut resolved = config(CliOverrides {
            language: Some(Language::En),
            ..Default::default()
        });
        resolved.settings_path = Some(path);

        let app = App::from_config(&resolved).unwrap();
        assert_eq!(app.language(), Language::En);
        // Theme was not named explicitly, so the stored value wins.
        assert!(app.dark_mode());
        assert_eq!(app.translator.language(), Language::En);
    }

    #[test]
    fn test_locale_coverage_passes_for_embedded_data() {
        let catalog = Arc::new(NerveCatalog::embedded().unwrap());
        let resolver = ContentResolver::new(catalog);
        let translator = Translator::embedded(Language::En).unwrap();
        assert!(verify_locale_coverage(&resolver, &translator, &menu()).is_ok());
    }
}
