//! # TitleBar Component
//!
//! Top status bar: application name, active language, theme and the
//! current status message.
//!
//! TitleBar is purely presentational. It receives all data as props and has
//! no internal state:
//!
//! ```rust,ignore
//! let mut title_bar = TitleBar::new(
//!     app.t("app.title", &[]),
//!     app.language().code().to_uppercase(),
//!     app.t("ui.theme.dark", &[]),
//!     app.status_message.clone(),
//!     palette,
//! );
//! title_bar.render(frame, area);
//! ```
//!
//! The status message is dropped when it equals the title, so the default
//! state reads `NeuroRef ENMG | ES | Light`.

use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::Style;
use ratatui::text::{Line, Span};

use crate::tui::component::Component;
use crate::tui::theme::Palette;

pub struct TitleBar {
    pub title: String,
    /// Upper-case language code, e.g. "ES".
    pub language: String,
    /// Translated theme name.
    pub theme: String,
    pub status_message: String,
    pub palette: Palette,
}

impl TitleBar {
    pub fn new(
        title: String,
        language: String,
        theme: String,
        status_message: String,
        palette: Palette,
    ) -> Self {
        Self {
            title,
            language,
            theme,
            status_message,
            palette,
        }
    }
}

impl Component for TitleBar {
    fn render(&mut self, frame: &mut Frame, area: Rect) {
        let separator = Span::styled(" | ", self.palette.dim());
        let mut spans = vec![
            Span::styled(format!(" {}", self.title), self.palette.heading()),
            separator.clone(),
            Span::styled(self.language.clone(), Style::default().fg(self.palette.fg)),
            separator.clone(),
            Span::styled(self.theme.clone(), Style::default().fg(self.palette.fg)),
        ];
        if !self.status_message.is_empty() && self.status_message != self.title {
            spans.push(separator);
            spans.push(Span::styled(
                self.status_message.clone(),
                Style::default().fg(self.palette.warning),
            ));
        }

        frame.render_widget(Line::from(spans).style(self.palette.base()), area);
    }
}
