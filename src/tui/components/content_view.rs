//! # ContentView Component
//!
//! Scrollable right-hand pane that renders a resolved `ContentUnit`.
//!
//! ## Architecture
//!
//! `ContentView` is a transient component (created each frame) that wraps
//! `&'a mut ContentViewState` (persistent state) and the unit to render
//! (props). Like the message list it lays content out as a stack of chunks,
//! caching each chunk's wrapped height so the cursor row can be scrolled
//! into view.
//!
//! Some chunks are *targets*: featured shortcuts, subsection links and nerve
//! rows. Up/Down move between targets, Enter opens the one under the cursor.
//! Units without targets (articles, nerve detail) scroll line by line.

use ratatui::Frame;
use ratatui::layout::{Position, Rect, Size};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Padding, Paragraph, Wrap};
use tui_scrollview::{ScrollView, ScrollViewState, ScrollbarVisibility};

use crate::core::catalog::{NerveRecord, ReferenceValue};
use crate::core::content::{Article, Block as ArticleBlock, ContentUnit};
use crate::core::i18n::Translator;
use crate::core::navigation::Location;
use crate::tui::component::{Component, EventHandler};
use crate::tui::event::TuiEvent;
use crate::tui::theme::Palette;

/// Something Enter can open from the content pane.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ContentTarget {
    Nerve(String),
    Location(Location),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ContentEvent {
    Open(ContentTarget),
    /// Esc: close the detail view or step up one level.
    Back,
}

/// Scroll and cursor state for the content pane.
/// Must be persisted in the parent TuiState.
#[derive(Debug, Default)]
pub struct ContentViewState {
    pub scroll_state: ScrollViewState,
    /// Nerve shown in detail inside a region list, if any.
    pub selected_nerve: Option<String>,
    /// Index into `targets`.
    pub cursor: usize,
    /// Cursor to restore when the detail view closes.
    list_cursor: usize,
    /// Targets of the last rendered unit, in display order.
    pub targets: Vec<ContentTarget>,
    /// `(top, bottom)` content rows of each target, from the last render.
    target_spans: Vec<(u16, u16)>,
    /// Scroll the cursor row into view on the next render.
    follow_cursor: bool,
    pub viewport_height: u16,
    pub content_height: u16,
}

impl ContentViewState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Back to the top after a navigation change.
    pub fn reset(&mut self) {
        self.selected_nerve = None;
        self.cursor = 0;
        self.list_cursor = 0;
        self.targets.clear();
        self.target_spans.clear();
        self.scroll_state.scroll_to_top();
    }

    pub fn open_nerve(&mut self, id: impl Into<String>) {
        self.list_cursor = self.cursor;
        self.selected_nerve = Some(id.into());
        self.cursor = 0;
        self.scroll_state.scroll_to_top();
    }

    /// Returns false when no detail view was open.
    pub fn close_nerve(&mut self) -> bool {
        if self.selected_nerve.take().is_none() {
            return false;
        }
        self.cursor = self.list_cursor;
        self.follow_cursor = true;
        self.scroll_state.scroll_to_top();
        true
    }

    fn move_cursor(&mut self, down: bool) {
        if self.targets.is_empty() {
            if down {
                self.scroll_state.scroll_down();
            } else {
                self.scroll_state.scroll_up();
            }
            return;
        }
        self.cursor = if down {
            (self.cursor + 1).min(self.targets.len() - 1)
        } else {
            self.cursor.saturating_sub(1)
        };
        self.follow_cursor = true;
    }

    /// Scroll so the cursor's target is fully visible.
    fn scroll_to_cursor(&mut self) {
        let Some(&(top, bottom)) = self.target_spans.get(self.cursor) else {
            return;
        };
        let offset_y = self.scroll_state.offset().y;
        if top < offset_y {
            self.scroll_state.set_offset(Position { x: 0, y: top });
        } else if bottom > offset_y + self.viewport_height {
            let new_y = bottom.saturating_sub(self.viewport_height);
            self.scroll_state.set_offset(Position { x: 0, y: new_y });
        }
    }

    /// Clamp scroll offset so it never exceeds the content bounds.
    fn clamp_scroll(&mut self) {
        let max_y = self.content_height.saturating_sub(self.viewport_height);
        let current = self.scroll_state.offset();
        if current.y > max_y {
            self.scroll_state.set_offset(Position {
                x: current.x,
                y: max_y,
            });
        }
    }
}

impl EventHandler for ContentViewState {
    type Event = ContentEvent;

    fn handle_event(&mut self, event: &TuiEvent) -> Option<ContentEvent> {
        match event {
            TuiEvent::CursorUp => self.move_cursor(false),
            TuiEvent::CursorDown => self.move_cursor(true),
            TuiEvent::ScrollUp => self.scroll_state.scroll_up(),
            TuiEvent::ScrollDown => self.scroll_state.scroll_down(),
            TuiEvent::ScrollPageUp => self.scroll_state.scroll_page_up(),
            TuiEvent::ScrollPageDown => self.scroll_state.scroll_page_down(),
            TuiEvent::Submit => {
                return self.targets.get(self.cursor).cloned().map(ContentEvent::Open);
            }
            TuiEvent::Escape => return Some(ContentEvent::Back),
            _ => {}
        }
        None
    }
}

// ============================================================================
// Layout: ContentUnit → chunks
// ============================================================================

/// A run of lines rendered as one wrapped paragraph.
struct Chunk {
    lines: Vec<Line<'static>>,
    /// Index into the target list when this chunk is selectable.
    target: Option<usize>,
}

/// Builds chunks for one unit. Translation happens here, at render time.
struct Layouter<'a> {
    tr: &'a Translator,
    palette: Palette,
    cursor: usize,
    chunks: Vec<Chunk>,
    targets: Vec<ContentTarget>,
}

impl<'a> Layouter<'a> {
    fn new(tr: &'a Translator, palette: Palette, cursor: usize) -> Self {
        Self {
            tr,
            palette,
            cursor,
            chunks: Vec::new(),
            targets: Vec::new(),
        }
    }

    fn t(&self, key: &str) -> String {
        self.tr.t(key, &[])
    }

    fn push(&mut self, lines: Vec<Line<'static>>) {
        self.chunks.push(Chunk {
            lines,
            target: None,
        });
    }

    fn blank(&mut self) {
        self.push(vec![Line::default()]);
    }

    fn title(&mut self, text: String) {
        let style = self.palette.heading().add_modifier(Modifier::UNDERLINED);
        self.push(vec![Line::styled(text, style)]);
    }

    fn heading(&mut self, text: String) {
        self.blank();
        self.push(vec![Line::styled(text, self.palette.heading())]);
    }

    fn subheading(&mut self, text: String) {
        let style = Style::default()
            .fg(self.palette.fg)
            .add_modifier(Modifier::BOLD);
        self.push(vec![Line::styled(text, style)]);
    }

    /// Plain text; embedded newlines become separate lines.
    fn text(&mut self, text: String) {
        let style = Style::default().fg(self.palette.fg);
        self.push(text.lines().map(|l| Line::styled(l.to_string(), style)).collect());
    }

    fn dim(&mut self, text: String) {
        let style = self.palette.dim();
        self.push(vec![Line::styled(text, style)]);
    }

    fn warning(&mut self, text: String) {
        let style = Style::default()
            .fg(self.palette.warning)
            .add_modifier(Modifier::BOLD);
        self.push(vec![Line::styled(text, style)]);
    }

    /// `label: value` with a bold label.
    fn field(&mut self, label: String, value: String) {
        self.push(vec![Line::from(vec![
            Span::styled(
                format!("{label}: "),
                Style::default()
                    .fg(self.palette.fg)
                    .add_modifier(Modifier::BOLD),
            ),
            Span::styled(value, Style::default().fg(self.palette.fg)),
        ])]);
    }

    /// A selectable row: `title` plus an optional dim second line.
    fn target(&mut self, target: ContentTarget, title: String, detail: Option<String>) {
        let index = self.targets.len();
        let selected = index == self.cursor;
        let (marker, title_style, detail_style) = if selected {
            ("▶ ", self.palette.selected(), self.palette.selected())
        } else {
            ("  ", Style::default().fg(self.palette.accent), self.palette.dim())
        };
        let mut lines = vec![Line::from(vec![
            Span::styled(marker, title_style),
            Span::styled(title, title_style),
        ])];
        if let Some(detail) = detail {
            lines.push(Line::from(Span::styled(format!("  {detail}"), detail_style)));
        }
        self.targets.push(target);
        self.chunks.push(Chunk {
            lines,
            target: Some(index),
        });
    }

    fn unit(&mut self, unit: &ContentUnit<'_>) {
        match unit {
            ContentUnit::Welcome { featured } => {
                self.title(self.t("welcome.title"));
                self.text(self.t("welcome.description"));
                self.heading(self.t("welcome.howToUse"));
                self.text(self.t("welcome.instructions"));
                self.heading(self.t("welcome.featured"));
                for entry in featured {
                    let title = format!(
                        "{} › {}",
                        self.t(&entry.title_key()),
                        self.t(&entry.subsection.label_key())
                    );
                    let detail = self.t(entry.description_key());
                    self.target(ContentTarget::Location(entry.location()), title, Some(detail));
                }
            }
            ContentUnit::SectionOverview {
                section,
                subsections,
            } => {
                self.title(self.t(&section.label_key()));
                self.text(self.t(section.feature_key()));
                self.heading(self.t("overview.subsections"));
                for &sub in subsections {
                    let location = Location {
                        section: Some(*section),
                        subsection: Some(sub),
                    };
                    self.target(ContentTarget::Location(location), self.t(&sub.label_key()), None);
                }
                self.blank();
                self.dim(self.t("overview.selectSubsection"));
            }
            ContentUnit::NerveList {
                subsection,
                region,
                nerves,
            } => {
                self.title(self.t(&subsection.label_key()));
                let count = nerves.len().to_string();
                self.dim(format!(
                    "{} · {}",
                    self.t(&format!("regions.{region}")),
                    self.tr.t("nerves.count", &[("count", &count)])
                ));
                self.text(self.t("nerves.selectNerveDescription"));
                self.blank();
                for nerve in nerves {
                    self.target(
                        ContentTarget::Nerve(nerve.id.clone()),
                        nerve.common_name.clone(),
                        nerve.specific_region.clone(),
                    );
                }
            }
            ContentUnit::NerveDetail { subsection, nerve } => {
                self.nerve_detail(&self.t(&subsection.label_key()), nerve);
            }
            ContentUnit::Article(article) => self.article(article),
            ContentUnit::Placeholder {
                section,
                subsection,
            } => {
                self.title(self.t(&subsection.label_key()));
                self.dim(self.t(&section.label_key()));
                self.blank();
                self.text(self.t("content.inDevelopment"));
            }
            ContentUnit::NotFound { location } => {
                self.title(self.t("content.notFound.title"));
                self.text(self.tr.t("content.notFound.description", &[("location", location)]));
            }
        }
    }

    fn reference_value(&mut self, label_key: &str, value: &ReferenceValue) {
        self.subheading(format!("  {}", self.t(label_key)));
        self.push(vec![Line::from(vec![
            Span::styled(
                format!("    {}: ", self.t("nerves.referenceRange")),
                self.palette.dim(),
            ),
            Span::styled(value.range.clone(), Style::default().fg(self.palette.fg)),
            Span::styled(format!("   {}: ", self.t("nerves.unit")), self.palette.dim()),
            Span::styled(value.unit.clone(), Style::default().fg(self.palette.fg)),
        ])]);
        if let Some(notes) = &value.notes {
            self.dim(format!("    {}: {}", self.t("nerves.notes"), notes));
        }
    }

    fn nerve_detail(&mut self, breadcrumb: &str, nerve: &NerveRecord) {
        self.dim(format!("{breadcrumb} · {}", self.t("nerves.backToList")));
        self.title(nerve.common_name.clone());
        let region = self.t(&format!("regions.{}", nerve.region));
        match &nerve.specific_region {
            Some(specific) => self.dim(format!("{region} · {specific}")),
            None => self.dim(region),
        }

        if !nerve.has_conduction_values() {
            self.blank();
            self.warning(self.t("nerves.noConductionValues"));
        }

        if let Some(motor) = &nerve.motor {
            self.heading(self.t("nerves.motorConduction"));
            self.reference_value("nerves.distalLatency", &motor.distal_latency);
            self.reference_value("nerves.amplitude", &motor.amplitude);
            if let Some(cv) = &motor.conduction_velocity {
                self.reference_value("nerves.conductionVelocity", cv);
            }
            if let Some(f_wave) = &motor.f_wave {
                self.reference_value("nerves.fWave", f_wave);
            }
            if let Some(h_reflex) = &motor.h_reflex {
                self.reference_value("nerves.hReflex", h_reflex);
            }
        }

        if let Some(sensory) = &nerve.sensory {
            self.heading(self.t("nerves.sensoryConduction"));
            self.reference_value("nerves.peakLatency", &sensory.peak_latency);
            self.reference_value("nerves.amplitude", &sensory.amplitude);
            self.reference_value("nerves.conductionVelocity", &sensory.conduction_velocity);
        }

        let technique = &nerve.technique;
        self.heading(self.t("nerves.studyTechnique"));
        self.field(
            self.t("nerves.patientPositioning"),
            technique.patient_positioning.clone(),
        );
        self.field(
            self.t("nerves.electrodeLocation"),
            technique.electrode_location.clone(),
        );
        self.field(
            self.t("nerves.stimulationPoints"),
            technique.stimulation_points.clone(),
        );
        let considerations = technique
            .special_considerations
            .clone()
            .unwrap_or_else(|| self.t("nerves.noSpecialConsiderations"));
        self.field(self.t("nerves.specialConsiderations"), considerations);

        if let Some(adjustments) = &nerve.adjustments {
            self.heading(self.t("nerves.adjustmentVariables"));
            for range in &adjustments.age {
                let (min, max) = (range.min.to_string(), range.max.to_string());
                let label = format!(
                    "{} {}",
                    self.t("nerves.age"),
                    self.tr.t("nerves.ageRange", &[("min", &min), ("max", &max)])
                );
                self.field(label, range.adjustment.clone());
            }
            for range in &adjustments.height {
                let (min, max) = (range.min.to_string(), range.max.to_string());
                let label = format!(
                    "{} {}",
                    self.t("nerves.height"),
                    self.tr.t("nerves.heightRange", &[("min", &min), ("max", &max)])
                );
                self.field(label, range.adjustment.clone());
            }
            if let Some(gender) = &adjustments.gender {
                self.field(self.t("nerves.gender"), gender.clone());
            }
            if let Some(temperature) = &adjustments.temperature {
                self.field(self.t("nerves.temperature"), temperature.clone());
            }
        }

        if let Some(media) = &nerve.multimedia {
            self.blank();
            if let Some(url) = &media.technique_photo_url {
                let label = self
                    .tr
                    .t("nerves.studyTechniqueAlt", &[("nerve", &nerve.common_name)]);
                self.field(label, url.clone());
            }
            if let Some(url) = &media.anatomical_diagram_url {
                self.field(self.t("nerves.anatomicalDiagram"), url.clone());
            }
        }
    }

    fn article(&mut self, article: &Article) {
        self.title(self.t(&article.title));
        self.text(self.t(article.introduction));
        for block in &article.blocks {
            match block {
                ArticleBlock::Heading(key) => self.heading(self.t(key)),
                ArticleBlock::Subheading(key) => self.subheading(self.t(key)),
                ArticleBlock::Paragraph(key) => self.text(self.t(key)),
                ArticleBlock::Bullets(items) => {
                    let style = Style::default().fg(self.palette.fg);
                    let lines = items
                        .iter()
                        .map(|key| Line::styled(format!("• {}", self.t(key)), style))
                        .collect();
                    self.push(lines);
                }
                ArticleBlock::Table { header, rows } => {
                    if let Some([left, right]) = header {
                        self.subheading(format!("{} | {}", self.t(left), self.t(right)));
                    }
                    for [left, right] in rows {
                        self.field(self.t(left), self.t(right));
                    }
                }
                ArticleBlock::Link { label, url } => {
                    self.push(vec![Line::from(vec![
                        Span::styled(
                            format!("{}: ", self.t(label)),
                            Style::default().fg(self.palette.fg),
                        ),
                        Span::styled(
                            url.to_string(),
                            Style::default()
                                .fg(self.palette.accent)
                                .add_modifier(Modifier::UNDERLINED),
                        ),
                    ])]);
                }
            }
        }
    }
}

// ============================================================================
// Component
// ============================================================================

pub struct ContentView<'a> {
    state: &'a mut ContentViewState,
    unit: &'a ContentUnit<'a>,
    translator: &'a Translator,
    palette: Palette,
    focused: bool,
}

impl<'a> ContentView<'a> {
    pub fn new(
        state: &'a mut ContentViewState,
        unit: &'a ContentUnit<'a>,
        translator: &'a Translator,
        palette: Palette,
        focused: bool,
    ) -> Self {
        Self {
            state,
            unit,
            translator,
            palette,
            focused,
        }
    }
}

impl Component for ContentView<'_> {
    fn render(&mut self, frame: &mut Frame, area: Rect) {
        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(self.palette.border(self.focused))
            .title(format!(" {} ", self.translator.t("ui.content", &[])))
            .padding(Padding::horizontal(1))
            .style(self.palette.base());
        let inner = block.inner(area);
        frame.render_widget(block, area);

        // Clamp the cursor against this unit's targets before highlighting.
        let mut layouter = Layouter::new(self.translator, self.palette, self.state.cursor);
        layouter.unit(self.unit);
        let target_count = layouter.targets.len();
        if target_count > 0 && self.state.cursor >= target_count {
            self.state.cursor = target_count - 1;
            layouter = Layouter::new(self.translator, self.palette, self.state.cursor);
            layouter.unit(self.unit);
        }
        let Layouter { chunks, targets, .. } = layouter;

        // Leave one column for the scrollbar.
        let content_width = inner.width.saturating_sub(1);
        let mut paragraphs = Vec::with_capacity(chunks.len());
        let mut target_spans = vec![(0u16, 0u16); targets.len()];
        let mut y: u16 = 0;
        for chunk in chunks {
            let paragraph = Paragraph::new(chunk.lines).wrap(Wrap { trim: false });
            let height = paragraph.line_count(content_width).max(1) as u16;
            if let Some(index) = chunk.target {
                target_spans[index] = (y, y + height);
            }
            paragraphs.push((paragraph, y, height));
            y = y.saturating_add(height);
        }

        self.state.targets = targets;
        self.state.target_spans = target_spans;
        self.state.content_height = y;
        self.state.viewport_height = inner.height;
        if self.state.follow_cursor {
            self.state.scroll_to_cursor();
            self.state.follow_cursor = false;
        }
        self.state.clamp_scroll();

        let mut scroll_view = ScrollView::new(Size::new(content_width, y))
            .vertical_scrollbar_visibility(ScrollbarVisibility::Automatic)
            .horizontal_scrollbar_visibility(ScrollbarVisibility::Never);
        for (paragraph, top, height) in paragraphs {
            scroll_view.render_widget(
                paragraph.style(self.palette.base()),
                Rect::new(0, top, content_width, height),
            );
        }
        frame.render_stateful_widget(scroll_view, inner, &mut self.state.scroll_state);
    }
}
