//! Frame layout: wires `App` + `TuiState` into the components.
//!
//! ```text
//! ┌──────────────── title bar (1) ─────────────────┐
//! │ menu (32)    │ content (rest)                  │
//! │              │                                 │
//! ├──────────────── search bar (3) ────────────────┤
//! └──────────────── help line (1) ─────────────────┘
//! ```
//!
//! The search results overlay is drawn last, over the body, whenever the
//! query is non-blank.

use ratatui::Frame;
use ratatui::layout::{Constraint, Layout};
use ratatui::text::Line;
use ratatui::widgets::Block;

use crate::core::state::App;
use crate::tui::component::Component;
use crate::tui::components::{
    ContentView, NavigationMenu, SearchBar, SearchResults, TitleBar,
};
use crate::tui::theme::Palette;
use crate::tui::{Focus, TuiState};

const MENU_WIDTH: u16 = 32;

pub fn draw_ui(frame: &mut Frame, app: &App, tui: &mut TuiState) {
    use Constraint::{Length, Min};
    let palette = Palette::for_mode(app.dark_mode());
    frame.render_widget(Block::default().style(palette.base()), frame.area());

    let [title_area, body_area, search_area, help_area] =
        Layout::vertical([Length(1), Min(0), Length(3), Length(1)]).areas(frame.area());
    let [menu_area, content_area] =
        Layout::horizontal([Length(MENU_WIDTH), Min(0)]).areas(body_area);

    let theme_key = if app.dark_mode() { "ui.theme.dark" } else { "ui.theme.light" };
    TitleBar::new(
        app.t("app.title", &[]),
        app.language().code().to_uppercase(),
        app.t(theme_key, &[]),
        app.status_message.clone(),
        palette,
    )
    .render(frame, title_area);

    NavigationMenu::new(
        &mut tui.menu,
        app.navigation(),
        &app.translator,
        palette,
        tui.focus == Focus::Menu,
    )
    .render(frame, menu_area);

    let unit = app.content(tui.content.selected_nerve.as_deref());
    ContentView::new(
        &mut tui.content,
        &unit,
        &app.translator,
        palette,
        tui.focus == Focus::Content,
    )
    .render(frame, content_area);

    let query = app.search.query();
    let has_query = !query.trim().is_empty();
    let result_label = if has_query {
        let count = app.search.result_count().to_string();
        app.t("search.resultCount", &[("count", &count)])
    } else {
        String::new()
    };
    SearchBar {
        title: app.t("ui.search", &[]),
        query: query.to_string(),
        placeholder: app.t("search.placeholder", &[]),
        result_label,
        focused: tui.focus == Focus::Search,
        palette,
    }
    .render(frame, search_area);

    frame.render_widget(
        Line::styled(app.t("ui.help", &[]), palette.dim()),
        help_area,
    );

    if has_query {
        SearchResults::new(
            &mut tui.search_results,
            app.search.results(),
            &app.translator,
            palette,
        )
        .render(frame, body_area);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::action::{Action, update};
    use crate::core::navigation::parse_location;
    use crate::core::settings::{Settings, SettingsStore};
    use ratatui::Terminal;
    use ratatui::backend::TestBackend;

    fn test_app() -> App {
        App::new(SettingsStore::new(Settings::default(), None)).unwrap()
    }

    fn draw(app: &App, tui: &mut TuiState) -> String {
        let backend = TestBackend::new(120, 40);
        let mut terminal = Terminal::new(backend).unwrap();
        terminal
            .draw(|f| {
                draw_ui(f, app, tui);
            })
            .unwrap();
        terminal
            .backend()
            .buffer()
            .content()
            .iter()
            .map(|c| c.symbol())
            .collect::<String>()
    }

    #[test]
    fn test_draw_home() {
        let app = test_app();
        let mut tui = TuiState::new(&app);
        let text = draw(&app, &mut tui);

        assert!(text.contains("NeuroRef ENMG | ES | Claro"));
        assert!(text.contains("Bienvenida/o a NeuroRef ENMG"));
        assert!(text.contains("Navegación"));
        assert!(text.contains("Buscar"));
    }

    #[test]
    fn test_draw_search_overlay() {
        let mut app = test_app();
        update(&mut app, Action::SetQuery("muneca".to_string()));
        let mut tui = TuiState::new(&app);
        let text = draw(&app, &mut tui);

        assert!(text.contains("Nervio Mediano"));
        assert!(text.contains("Nervio Ulnar"));
        assert_eq!(tui.search_results.count, 2);
    }

    #[test]
    fn test_draw_every_location_without_raw_keys() {
        let mut app = test_app();
        update(&mut app, Action::ToggleLanguage);
        for section in app.navigation().sections.clone() {
            for sub in section.subsections {
                let location = parse_location(&format!("{}/{}", section.id, sub)).unwrap();
                update(&mut app, Action::Navigate(location));
                let mut tui = TuiState::new(&app);
                let text = draw(&app, &mut tui);
                for prefix in ["sections.", "subsections.", "nerves.", "content.", "ui."] {
                    assert!(!text.contains(prefix), "raw key {prefix} at {location}");
                }
            }
        }
    }

    #[test]
    fn test_dark_theme_title() {
        let mut app = test_app();
        update(&mut app, Action::ToggleTheme);
        let mut tui = TuiState::new(&app);
        let text = draw(&app, &mut tui);
        assert!(text.contains("Oscuro"));
    }
}
