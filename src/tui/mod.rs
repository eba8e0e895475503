//! # TUI Adapter
//!
//! The ratatui-specific layer. Handles terminal I/O, renders the UI,
//! and translates keyboard events into core::Action values.
//!
//! This is the only module that knows about ratatui and crossterm.
//!
//! ## Redraw Strategy
//!
//! Nothing animates, so the loop sleeps up to 250ms waiting for input and
//! only redraws after an event or a terminal resize. All pending events are
//! drained before the next draw.
//!
//! ## Focus
//!
//! Exactly one pane owns the keyboard: the menu, the content pane or the
//! search bar. Global keys (`q`, `/`, `t`, `l`, `h`, Tab) apply in the
//! menu and content panes; in the search bar every printable key is text.
//!
//! ## Store subscriptions
//!
//! The runtime subscribes to the navigator and the search engine. A
//! navigation change resets the content pane and re-syncs the menu cursor;
//! a query change resets the results cursor.

mod component;
mod components;
mod event;
mod theme;
mod ui;

use log::{debug, info, warn};
use std::cell::Cell;
use std::io::stdout;
use std::rc::Rc;
use std::time::Duration;

use crossterm::event::{
    DisableMouseCapture, EnableMouseCapture, KeyboardEnhancementFlags,
    PopKeyboardEnhancementFlags, PushKeyboardEnhancementFlags,
};
use crossterm::execute;
use ratatui::DefaultTerminal;

use crate::core::action::{Action, Effect, update};
use crate::core::navigation::{Location, SectionId, SubsectionId};
use crate::core::state::App;
use crate::tui::component::EventHandler;
use crate::tui::components::{
    ContentEvent, ContentTarget, ContentViewState, MenuEvent, MenuRow, NavigationMenuState,
    SearchResultsEvent, SearchResultsState,
};
use crate::tui::event::{TuiEvent, poll_event_immediate, poll_event_timeout};

const IDLE_POLL: Duration = Duration::from_millis(250);

/// Which pane receives keyboard input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Focus {
    Menu,
    Content,
    Search,
}

/// TUI-specific presentation state (not part of core business logic)
pub struct TuiState {
    pub focus: Focus,
    /// Where focus returns when the search bar closes.
    pub focus_before_search: Focus,
    // Persistent component states
    pub menu: NavigationMenuState,
    pub content: ContentViewState,
    pub search_results: SearchResultsState,
    // Set by store subscriptions, consumed after each dispatch
    nav_changed: Rc<Cell<bool>>,
    query_changed: Rc<Cell<bool>>,
}

impl TuiState {
    pub fn new(app: &App) -> Self {
        Self {
            focus: Focus::Menu,
            focus_before_search: Focus::Menu,
            menu: NavigationMenuState::new(app.navigation()),
            content: ContentViewState::new(),
            search_results: SearchResultsState::default(),
            nav_changed: Rc::new(Cell::new(false)),
            query_changed: Rc::new(Cell::new(false)),
        }
    }

    /// Subscribe to the app's navigation and search stores.
    pub fn attach(&self, app: &mut App) {
        let nav_changed = Rc::clone(&self.nav_changed);
        app.navigator.subscribe(move |_| nav_changed.set(true));
        let query_changed = Rc::clone(&self.query_changed);
        app.search.subscribe(move |_| query_changed.set(true));
    }

    /// Apply store notifications collected since the last call.
    fn sync(&mut self, app: &App) {
        if self.nav_changed.replace(false) {
            self.content.reset();
            self.menu.sync(app.navigation());
        }
        if self.query_changed.replace(false) {
            self.search_results.reset(app.search.result_count());
        }
    }
}

struct TerminalModeGuard;

impl TerminalModeGuard {
    fn new() -> std::io::Result<Self> {
        // Unsupported terminals ignore the enhancement flags.
        execute!(
            stdout(),
            EnableMouseCapture,
            PushKeyboardEnhancementFlags(KeyboardEnhancementFlags::DISAMBIGUATE_ESCAPE_CODES)
        )?;
        info!("Terminal modes enabled (mouse, keyboard enhancement)");
        Ok(Self)
    }
}

impl Drop for TerminalModeGuard {
    fn drop(&mut self) {
        let _ = execute!(stdout(), PopKeyboardEnhancementFlags, DisableMouseCapture);
    }
}

pub fn run(mut app: App) -> std::io::Result<()> {
    let mut tui = TuiState::new(&app);
    tui.attach(&mut app);

    let mut terminal = ratatui::init();
    let guard = match TerminalModeGuard::new() {
        Ok(guard) => Some(guard),
        Err(e) => {
            warn!("Failed to enable terminal modes: {}", e);
            None
        }
    };

    let result = event_loop(&mut terminal, &mut app, &mut tui);

    drop(guard);
    ratatui::restore();
    info!("NeuroRef shutting down");
    result
}

fn event_loop(terminal: &mut DefaultTerminal, app: &mut App, tui: &mut TuiState) -> std::io::Result<()> {
    let mut needs_redraw = true; // Force first frame
    loop {
        if needs_redraw {
            terminal.draw(|f| ui::draw_ui(f, app, tui))?;
            needs_redraw = false;
        }

        let first_event = poll_event_timeout(IDLE_POLL);
        if first_event.is_some() {
            needs_redraw = true;
        }
        for event in first_event
            .into_iter()
            .chain(std::iter::from_fn(poll_event_immediate))
        {
            if handle_event(app, tui, event) {
                return Ok(());
            }
        }
    }
}

/// Run one action through the reducer and perform its effect.
/// Returns true when the app should quit.
fn dispatch(app: &mut App, tui: &mut TuiState, action: Action) -> bool {
    let effect = update(app, action);
    let quit = match effect {
        Effect::None => false,
        Effect::Quit => true,
        Effect::PersistSettings => {
            if let Err(e) = app.settings.persist() {
                update(app, Action::SettingsPersistFailed(e.to_string()));
            }
            false
        }
    };
    tui.sync(app);
    quit
}

/// Route one input event. Returns true when the app should quit.
pub fn handle_event(app: &mut App, tui: &mut TuiState, event: TuiEvent) -> bool {
    match event {
        TuiEvent::ForceQuit => return dispatch(app, tui, Action::Quit),
        TuiEvent::Resize => return false,
        _ => {}
    }
    if tui.focus == Focus::Search {
        return handle_search_event(app, tui, event);
    }

    match event {
        TuiEvent::InputChar('q') => return dispatch(app, tui, Action::Quit),
        TuiEvent::InputChar('/') => {
            tui.focus_before_search = tui.focus;
            tui.focus = Focus::Search;
            return false;
        }
        TuiEvent::InputChar('t') => return dispatch(app, tui, Action::ToggleTheme),
        TuiEvent::InputChar('l') => return dispatch(app, tui, Action::ToggleLanguage),
        TuiEvent::InputChar('h') => {
            tui.focus = Focus::Menu;
            return dispatch(app, tui, Action::GoHome);
        }
        TuiEvent::FocusNext => {
            tui.focus = match tui.focus {
                Focus::Menu => Focus::Content,
                _ => Focus::Menu,
            };
            return false;
        }
        TuiEvent::FocusLeft => {
            tui.focus = Focus::Menu;
            return false;
        }
        TuiEvent::FocusRight => {
            tui.focus = Focus::Content;
            return false;
        }
        _ => {}
    }

    match tui.focus {
        Focus::Menu => match event {
            TuiEvent::Escape => go_back(app, tui),
            _ => match tui.menu.handle_event(&event) {
                Some(MenuEvent::Open(row)) => open_menu_row(app, tui, row),
                None => false,
            },
        },
        Focus::Content => match tui.content.handle_event(&event) {
            Some(ContentEvent::Open(ContentTarget::Nerve(id))) => {
                debug!("Opening nerve detail: {}", id);
                tui.content.open_nerve(id);
                false
            }
            Some(ContentEvent::Open(ContentTarget::Location(location))) => {
                dispatch(app, tui, Action::Navigate(location))
            }
            Some(ContentEvent::Back) => go_back(app, tui),
            None => false,
        },
        Focus::Search => false,
    }
}

fn handle_search_event(app: &mut App, tui: &mut TuiState, event: TuiEvent) -> bool {
    match event {
        TuiEvent::InputChar(c) => {
            let mut query = app.search.query().to_string();
            query.push(c);
            dispatch(app, tui, Action::SetQuery(query))
        }
        TuiEvent::Backspace => {
            let mut query = app.search.query().to_string();
            if query.pop().is_none() {
                return false;
            }
            dispatch(app, tui, Action::SetQuery(query))
        }
        _ => match tui.search_results.handle_event(&event) {
            Some(SearchResultsEvent::Open(index)) => open_search_result(app, tui, index),
            Some(SearchResultsEvent::Dismiss) => {
                tui.focus = tui.focus_before_search;
                dispatch(app, tui, Action::ClearQuery)
            }
            None => false,
        },
    }
}

/// Jump to the result's region list and open its detail view.
fn open_search_result(app: &mut App, tui: &mut TuiState, index: usize) -> bool {
    let Some(nerve) = app.search.result(index) else {
        return false;
    };
    let id = nerve.id.clone();
    let location = Location {
        section: Some(SectionId::Nerves),
        subsection: Some(SubsectionId::for_region(nerve.region)),
    };
    info!("Opening search result {} at {}", id, location);

    let quit = dispatch(app, tui, Action::Navigate(location));
    tui.content.open_nerve(id);
    tui.focus = Focus::Content;
    quit || dispatch(app, tui, Action::ClearQuery)
}

fn open_menu_row(app: &mut App, tui: &mut TuiState, row: MenuRow) -> bool {
    match row {
        MenuRow::Home => dispatch(app, tui, Action::GoHome),
        MenuRow::Section(section) => dispatch(app, tui, Action::SelectSection(section)),
        MenuRow::Subsection(_) => {
            tui.focus = Focus::Content;
            dispatch(app, tui, Action::Navigate(row.location()))
        }
    }
}

/// Esc outside search: close the detail view, else step up one level.
fn go_back(app: &mut App, tui: &mut TuiState) -> bool {
    if tui.content.close_nerve() {
        return false;
    }
    let nav = app.navigation();
    match (nav.active_section, nav.active_subsection) {
        (Some(section), Some(_)) => dispatch(app, tui, Action::SelectSection(section)),
        (Some(_), None) => {
            tui.focus = Focus::Menu;
            dispatch(app, tui, Action::GoHome)
        }
        (None, _) => false,
    }
}
