//! # Actions
//!
//! Everything that can happen in NeuroRef becomes an `Action`.
//! User picks a menu entry? That's `Action::Navigate(location)`.
//! User presses `t`? That's `Action::ToggleTheme`.
//!
//! The `update()` function takes the current state and an action,
//! mutates the state, and returns an `Effect` describing any I/O the
//! runtime must perform. No side effects here. I/O happens elsewhere.
//!
//! ```text
//! State + Action  →  update()  →  New State + Effect
//! ```
//!
//! Failed navigation never panics: the error is logged and shown in
//! `App.status_message`, and the previous location stays active.

use log::{debug, warn};

use crate::core::navigation::{Location, SectionId};
use crate::core::state::App;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    /// Jump to a section and optional subsection.
    Navigate(Location),
    /// Open a section's overview (clears the subsection).
    SelectSection(SectionId),
    GoHome,
    SetQuery(String),
    ClearQuery,
    ToggleTheme,
    ToggleLanguage,
    /// The runtime could not write the settings record.
    SettingsPersistFailed(String),
    Quit,
}

/// Work for the runtime after an `update()`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Effect {
    None,
    PersistSettings,
    Quit,
}

pub fn update(app: &mut App, action: Action) -> Effect {
    debug!("Action: {:?}", action);
    match action {
        Action::Navigate(location) => {
            let result = app.navigator.navigate_to_location(location);
            report_navigation(app, result);
            Effect::None
        }
        Action::SelectSection(section) => {
            let result = app.navigator.set_active_section(section);
            report_navigation(app, result);
            Effect::None
        }
        Action::GoHome => {
            app.navigator.go_home();
            app.status_message = app.t("app.title", &[]);
            Effect::None
        }
        Action::SetQuery(query) => {
            app.search.set_query(query);
            Effect::None
        }
        Action::ClearQuery => {
            app.search.clear();
            Effect::None
        }
        Action::ToggleTheme => {
            app.settings.toggle_dark_mode();
            let theme_key = if app.settings.dark_mode() {
                "ui.theme.dark"
            } else {
                "ui.theme.light"
            };
            let theme = app.t(theme_key, &[]);
            app.status_message = app.t("status.theme", &[("theme", &theme)]);
            Effect::PersistSettings
        }
        Action::ToggleLanguage => {
            app.settings.toggle_language();
            app.translator.set_language(app.settings.language());
            let code = app.settings.language().code().to_uppercase();
            app.status_message = app.t("status.language", &[("language", &code)]);
            Effect::PersistSettings
        }
        Action::SettingsPersistFailed(error) => {
            warn!("Settings were not saved: {}", error);
            app.status_message = app.t("status.settingsSaveFailed", &[("error", &error)]);
            Effect::None
        }
        Action::Quit => Effect::Quit,
    }
}

fn report_navigation(app: &mut App, result: crate::core::error::Result<()>) {
    match result {
        Ok(()) => app.status_message = app.t("app.title", &[]),
        Err(e) => {
            warn!("Navigation failed: {}", e);
            app.status_message = app.t("status.navigationFailed", &[("error", &e.to_string())]);
        }
    }
}
