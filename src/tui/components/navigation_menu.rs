//! # Navigation Menu Component
//!
//! Left-hand tree: a Home row, one row per section, and the active
//! section's subsections indented beneath it.
//!
//! Follows the persistent state + transient wrapper pattern:
//! - `NavigationMenuState` lives in `TuiState` and owns the cursor
//! - `NavigationMenu` is created each frame with borrowed state and props

use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::Style;
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, List, ListItem, ListState, Padding};

use crate::core::i18n::Translator;
use crate::core::navigation::{Location, NavigationState, SectionId, SubsectionId};
use crate::tui::component::{Component, EventHandler};
use crate::tui::event::TuiEvent;
use crate::tui::theme::Palette;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuRow {
    Home,
    Section(SectionId),
    Subsection(SubsectionId),
}

impl MenuRow {
    pub fn location(self) -> Location {
        match self {
            MenuRow::Home => Location::HOME,
            MenuRow::Section(section) => Location {
                section: Some(section),
                subsection: None,
            },
            MenuRow::Subsection(sub) => Location {
                section: Some(sub.parent()),
                subsection: Some(sub),
            },
        }
    }
}

/// Visible rows for `nav`: only the active section is expanded.
pub fn menu_rows(nav: &NavigationState) -> Vec<MenuRow> {
    let mut rows = vec![MenuRow::Home];
    for section in &nav.sections {
        rows.push(MenuRow::Section(section.id));
        if nav.active_section == Some(section.id) {
            rows.extend(section.subsections.iter().map(|&s| MenuRow::Subsection(s)));
        }
    }
    rows
}

/// Row that represents the current location.
fn active_row(nav: &NavigationState) -> MenuRow {
    match (nav.active_section, nav.active_subsection) {
        (None, _) => MenuRow::Home,
        (Some(section), None) => MenuRow::Section(section),
        (Some(_), Some(sub)) => MenuRow::Subsection(sub),
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuEvent {
    Open(MenuRow),
}

/// Persistent cursor state for the menu.
#[derive(Debug, Default)]
pub struct NavigationMenuState {
    /// Rows as of the last `sync`.
    pub rows: Vec<MenuRow>,
    pub selected: usize,
    pub list_state: ListState,
}

impl NavigationMenuState {
    pub fn new(nav: &NavigationState) -> Self {
        let mut state = Self::default();
        state.sync(nav);
        state
    }

    /// Rebuild rows after a navigation change and put the cursor on the
    /// active location.
    pub fn sync(&mut self, nav: &NavigationState) {
        self.rows = menu_rows(nav);
        let active = active_row(nav);
        self.selected = self.rows.iter().position(|r| *r == active).unwrap_or(0);
        self.list_state.select(Some(self.selected));
    }

    pub fn selected_row(&self) -> Option<MenuRow> {
        self.rows.get(self.selected).copied()
    }
}

impl EventHandler for NavigationMenuState {
    type Event = MenuEvent;

    fn handle_event(&mut self, event: &TuiEvent) -> Option<MenuEvent> {
        match event {
            TuiEvent::CursorUp => {
                self.selected = self.selected.saturating_sub(1);
                self.list_state.select(Some(self.selected));
                None
            }
            TuiEvent::CursorDown => {
                if !self.rows.is_empty() {
                    self.selected = (self.selected + 1).min(self.rows.len() - 1);
                    self.list_state.select(Some(self.selected));
                }
                None
            }
            TuiEvent::Submit => self.selected_row().map(MenuEvent::Open),
            _ => None,
        }
    }
}

/// Transient render wrapper for the menu.
pub struct NavigationMenu<'a> {
    state: &'a mut NavigationMenuState,
    nav: &'a NavigationState,
    translator: &'a Translator,
    palette: Palette,
    focused: bool,
}

impl<'a> NavigationMenu<'a> {
    pub fn new(
        state: &'a mut NavigationMenuState,
        nav: &'a NavigationState,
        translator: &'a Translator,
        palette: Palette,
        focused: bool,
    ) -> Self {
        Self {
            state,
            nav,
            translator,
            palette,
            focused,
        }
    }

    fn row_line(&self, row: MenuRow, is_selected: bool) -> Line<'static> {
        let active = active_row(self.nav) == row;
        let (indent, label) = match row {
            MenuRow::Home => ("", self.translator.t("ui.home", &[])),
            MenuRow::Section(section) => {
                let marker = if self.nav.active_section == Some(section) { "▾ " } else { "▸ " };
                (marker, self.translator.t(&section.label_key(), &[]))
            }
            MenuRow::Subsection(sub) => ("    ", self.translator.t(&sub.label_key(), &[])),
        };

        let style = if is_selected && self.focused {
            self.palette.selected()
        } else if active {
            self.palette.heading()
        } else {
            Style::default().fg(self.palette.fg)
        };
        Line::from(vec![
            Span::styled(indent, style),
            Span::styled(label, style),
        ])
    }
}

impl Component for NavigationMenu<'_> {
    fn render(&mut self, frame: &mut Frame, area: Rect) {
        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(self.palette.border(self.focused))
            .title(format!(" {} ", self.translator.t("ui.navigation", &[])))
            .padding(Padding::horizontal(1))
            .style(self.palette.base());

        let items: Vec<ListItem> = self
            .state
            .rows
            .iter()
            .enumerate()
            .map(|(i, &row)| ListItem::new(self.row_line(row, i == self.state.selected)))
            .collect();

        let list = List::new(items).block(block);
        frame.render_stateful_widget(list, area, &mut self.state.list_state);
    }
}
