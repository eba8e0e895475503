//! # SearchBar Component
//!
//! Bottom input line. The query itself lives in the core `SearchEngine`; the
//! bar only displays it, so it is stateless like `TitleBar`.

use ratatui::Frame;
use ratatui::layout::{Position, Rect};
use ratatui::style::Style;
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Padding, Paragraph};
use unicode_width::UnicodeWidthStr;

use crate::tui::component::Component;
use crate::tui::theme::Palette;

pub struct SearchBar {
    pub title: String,
    pub query: String,
    pub placeholder: String,
    /// e.g. "3 results", empty when the query is blank.
    pub result_label: String,
    pub focused: bool,
    pub palette: Palette,
}

impl Component for SearchBar {
    fn render(&mut self, frame: &mut Frame, area: Rect) {
        let mut block = Block::default()
            .borders(Borders::ALL)
            .border_style(self.palette.border(self.focused))
            .title(format!(" {} ", self.title))
            .padding(Padding::horizontal(1))
            .style(self.palette.base());
        if !self.result_label.is_empty() {
            block = block.title_top(Line::from(format!(" {} ", self.result_label)).right_aligned());
        }

        let line = if self.query.is_empty() {
            Line::from(Span::styled(self.placeholder.clone(), self.palette.dim()))
        } else {
            Line::from(Span::styled(self.query.clone(), Style::default().fg(self.palette.fg)))
        };
        let inner = block.inner(area);
        let query_width = self.query.width() as u16;
        let hidden = hidden_columns(query_width, inner.width);
        frame.render_widget(Paragraph::new(line).block(block).scroll((0, hidden)), area);

        if self.focused && inner.width > 0 {
            frame.set_cursor_position(Position::new(inner.x + query_width - hidden, inner.y));
        }
    }
}

/// Columns scrolled off the left so the query end and cursor stay visible.
fn hidden_columns(query_width: u16, inner_width: u16) -> u16 {
    query_width.saturating_sub(inner_width.saturating_sub(1))
}
