//! # Search Results Overlay
//!
//! Centered popup listing the nerves that match the current query. Shown
//! whenever the query is non-blank.
//!
//! Follows the persistent state + transient wrapper pattern:
//! - `SearchResultsState` lives in `TuiState`
//! - `SearchResults` is created each frame with borrowed state

use ratatui::Frame;
use ratatui::layout::{Alignment, Constraint, Layout, Rect};
use ratatui::style::Style;
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, List, ListItem, ListState, Padding, Paragraph};
use unicode_width::UnicodeWidthStr;

use crate::core::catalog::NerveRecord;
use crate::core::i18n::Translator;
use crate::tui::component::{Component, EventHandler};
use crate::tui::event::TuiEvent;
use crate::tui::theme::Palette;

/// Persistent state for the results overlay.
#[derive(Debug, Default)]
pub struct SearchResultsState {
    pub selected: usize,
    /// Result count as of the last render, for clamping the cursor.
    pub count: usize,
    pub list_state: ListState,
}

impl SearchResultsState {
    /// Reset the cursor after the query changes.
    pub fn reset(&mut self, count: usize) {
        self.count = count;
        self.selected = 0;
        self.list_state.select((count > 0).then_some(0));
    }
}

/// Events emitted by the results overlay.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchResultsEvent {
    /// Open the result at this index.
    Open(usize),
    Dismiss,
}

impl EventHandler for SearchResultsState {
    type Event = SearchResultsEvent;

    fn handle_event(&mut self, event: &TuiEvent) -> Option<SearchResultsEvent> {
        match event {
            TuiEvent::Escape => Some(SearchResultsEvent::Dismiss),
            TuiEvent::CursorUp => {
                if self.count > 0 {
                    self.selected = self.selected.saturating_sub(1);
                    self.list_state.select(Some(self.selected));
                }
                None
            }
            TuiEvent::CursorDown => {
                if self.count > 0 {
                    self.selected = (self.selected + 1).min(self.count - 1);
                    self.list_state.select(Some(self.selected));
                }
                None
            }
            TuiEvent::Submit => (self.selected < self.count).then_some(SearchResultsEvent::Open(self.selected)),
            _ => None,
        }
    }
}

/// Transient render wrapper for the results overlay.
pub struct SearchResults<'a> {
    state: &'a mut SearchResultsState,
    results: Vec<&'a NerveRecord>,
    translator: &'a Translator,
    palette: Palette,
}

impl<'a> SearchResults<'a> {
    pub fn new(
        state: &'a mut SearchResultsState,
        results: Vec<&'a NerveRecord>,
        translator: &'a Translator,
        palette: Palette,
    ) -> Self {
        Self {
            state,
            results,
            translator,
            palette,
        }
    }
}

impl Component for SearchResults<'_> {
    fn render(&mut self, frame: &mut Frame, area: Rect) {
        let overlay = centered_rect(70, 60, area);
        frame.render_widget(Clear, overlay);

        self.state.count = self.results.len();
        if self.state.selected >= self.state.count {
            self.state.selected = self.state.count.saturating_sub(1);
        }
        self.state
            .list_state
            .select((self.state.count > 0).then_some(self.state.selected));

        let count = self.results.len().to_string();
        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(self.palette.border(true))
            .title(format!(" {} ", self.translator.t("search.results", &[])))
            .title_top(
                Line::from(format!(
                    " {} ",
                    self.translator.t("search.resultCount", &[("count", &count)])
                ))
                .right_aligned(),
            )
            .title_bottom(Line::from(self.translator.t("ui.searchHelp", &[])).centered())
            .padding(Padding::horizontal(1))
            .style(self.palette.base());

        if self.results.is_empty() {
            let empty = Paragraph::new(self.translator.t("search.noResults", &[]))
                .style(self.palette.dim())
                .alignment(Alignment::Center)
                .block(block);
            frame.render_widget(empty, overlay);
            return;
        }

        let inner_width = overlay.width.saturating_sub(4) as usize; // borders + padding
        let items: Vec<ListItem> = self
            .results
            .iter()
            .enumerate()
            .map(|(i, nerve)| {
                let region = self.translator.t(&format!("regions.{}", nerve.region), &[]);
                let detail = match &nerve.specific_region {
                    Some(specific) => format!("  {region} · {specific}"),
                    None => format!("  {region}"),
                };
                let name_width = inner_width.saturating_sub(detail.width());
                let name = truncate_str(&nerve.common_name, name_width);
                let padded_name = format!("{:<width$}", name, width = name_width);

                let (name_style, detail_style) = if i == self.state.selected {
                    (self.palette.selected(), self.palette.selected())
                } else {
                    (Style::default().fg(self.palette.fg), self.palette.dim())
                };
                ListItem::new(Line::from(vec![
                    Span::styled(padded_name, name_style),
                    Span::styled(detail, detail_style),
                ]))
            })
            .collect();

        let list = List::new(items).block(block);
        frame.render_stateful_widget(list, overlay, &mut self.state.list_state);
    }
}

/// Truncate a string to fit within `max_width` columns, adding "..." if needed.
pub fn truncate_str(s: &str, max_width: usize) -> String {
    if s.width() <= max_width {
        return s.to_string();
    }
    if max_width <= 3 {
        return ".".repeat(max_width);
    }
    let mut out = String::new();
    for c in s.chars() {
        if (out.as_str().width() + 1) > max_width - 3 {
            break;
        }
        out.push(c);
    }
    out.push_str("...");
    out
}

/// Compute a centered rect using percentage of the outer rect.
pub fn centered_rect(percent_x: u16, percent_y: u16, outer: Rect) -> Rect {
    let [_, center_v, _] = Layout::vertical([
        Constraint::Percentage((100 - percent_y) / 2),
        Constraint::Percentage(percent_y),
        Constraint::Percentage((100 - percent_y) / 2),
    ])
    .areas(outer);
    let [_, center, _] = Layout::horizontal([
        Constraint::Percentage((100 - percent_x) / 2),
        Constraint::Percentage(percent_x),
        Constraint::Percentage((100 - percent_x) / 2),
    ])
    .areas(center_v);
    center
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::catalog::NerveCatalog;
    use crate::core::i18n::Language;
    use ratatui::Terminal;
    use ratatui::backend::TestBackend;

    #[test]
    fn test_truncate_str() {
        assert_eq!(truncate_str("Nervio Sural", 20), "Nervio Sural");
        assert_eq!(truncate_str("Nervio Mediano", 9), "Nervio...");
        assert_eq!(truncate_str("Muñeca", 2), "..");
    }

    #[test]
    fn test_centered_rect_is_inside() {
        let outer = Rect::new(0, 0, 100, 50);
        let inner = centered_rect(70, 60, outer);
        assert_eq!(inner.width, 70);
        assert_eq!(inner.height, 30);
        assert_eq!(inner.x, 15);
    }

    #[test]
    fn test_cursor_clamps_and_opens() {
        let mut state = SearchResultsState::default();
        state.reset(2);
        state.handle_event(&TuiEvent::CursorDown);
        state.handle_event(&TuiEvent::CursorDown);
        assert_eq!(state.selected, 1);
        assert_eq!(state.handle_event(&TuiEvent::Submit), Some(SearchResultsEvent::Open(1)));
        assert_eq!(state.handle_event(&TuiEvent::Escape), Some(SearchResultsEvent::Dismiss));
    }

    #[test]
    fn test_submit_without_results_is_noop() {
        let mut state = SearchResultsState::default();
        state.reset(0);
        assert_eq!(state.handle_event(&TuiEvent::Submit), None);
    }

    fn render(results: Vec<&NerveRecord>, state: &mut SearchResultsState) -> String {
        let translator = Translator::embedded(Language::En).unwrap();
        let backend = TestBackend::new(80, 24);
        let mut terminal = Terminal::new(backend).unwrap();
        terminal
            .draw(|f| {
                SearchResults::new(state, results, &translator, Palette::DARK).render(f, f.area());
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
    fn test_render_results() {
        let catalog = NerveCatalog::embedded().unwrap();
        let results = vec![
            catalog.get_by_id("median-wrist").unwrap(),
            catalog.get_by_id("ulnar-wrist").unwrap(),
        ];
        let mut state = SearchResultsState::default();
        let text = render(results, &mut state);
        assert!(text.contains("Nervio Mediano"));
        assert!(text.contains("Nervio Ulnar"));
        assert!(text.contains("Upper limb"));
        assert!(text.contains("2 results"));
        assert_eq!(state.count, 2);
    }

    #[test]
    fn test_render_no_results() {
        let mut state = SearchResultsState::default();
        let text = render(Vec::new(), &mut state);
        assert!(text.contains("No results found"));
    }
}
