use log::debug;
use ratatui::{
    Frame,
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::Paragraph,
};

use crate::content_index::ContentIndex;
use crate::scroll::SmoothScroll;
use crate::section_tracker::SectionTracker;
use crate::theme::Base16Palette;
use crate::viewport::TargetBounds;

/// Rows scrolled before the back-to-top affordance appears.
const SCROLL_TOP_HINT_AFTER: usize = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum LineKind {
    Heading,
    Body,
    Blank,
}

#[derive(Debug, Clone)]
struct RenderedLine {
    text: String,
    section_index: Option<usize>,
    kind: LineKind,
}

/// The article viewport: wrapped lines with per-section bounds, the
/// scroll offset every other component keys off, reading progress, and
/// the one-shot reveal styling.
pub struct ArticleReader {
    index: ContentIndex,
    lines: Vec<RenderedLine>,
    bounds: Vec<TargetBounds>,
    scroll_offset: usize,
    visible_height: usize,
    smooth: SmoothScroll,
}

impl ArticleReader {
    pub fn new(index: ContentIndex) -> Self {
        Self {
            index,
            lines: Vec::new(),
            bounds: Vec::new(),
            scroll_offset: 0,
            visible_height: 0,
            smooth: SmoothScroll::new(),
        }
    }

    /// Wrap every section to the given width and record line bounds.
    /// Called at startup and again when the terminal width changes.
    pub fn layout(&mut self, width: u16) {
        let wrap_width = (width.max(10) as usize).saturating_sub(2);
        self.lines.clear();
        self.bounds.clear();

        for (section_index, section) in self.index.sections().iter().enumerate() {
            let start_line = self.lines.len();
            self.lines.push(RenderedLine {
                text: section.title.clone(),
                section_index: Some(section_index),
                kind: LineKind::Heading,
            });
            self.lines.push(RenderedLine {
                text: String::new(),
                section_index: Some(section_index),
                kind: LineKind::Blank,
            });
            for wrapped in textwrap::wrap(&section.body, wrap_width) {
                self.lines.push(RenderedLine {
                    text: wrapped.into_owned(),
                    section_index: Some(section_index),
                    kind: LineKind::Body,
                });
            }
            let end_line = self.lines.len();
            self.bounds.push(TargetBounds {
                id: section.id.clone(),
                start_line,
                end_line,
            });
            // Gap between sections belongs to neither
            self.lines.push(RenderedLine {
                text: String::new(),
                section_index: None,
                kind: LineKind::Blank,
            });
        }

        self.scroll_offset = self.scroll_offset.min(self.max_scroll_offset());
    }

    /// Section line bounds for the intersection observers.
    pub fn section_bounds(&self) -> Vec<TargetBounds> {
        self.bounds.clone()
    }

    pub fn scroll_offset(&self) -> usize {
        self.scroll_offset
    }

    pub fn visible_height(&self) -> usize {
        self.visible_height
    }

    #[cfg(test)]
    pub fn set_viewport_height(&mut self, height: usize) {
        self.visible_height = height;
    }

    pub fn max_scroll_offset(&self) -> usize {
        self.lines.len().saturating_sub(self.visible_height)
    }

    pub fn scroll_up(&mut self) {
        self.smooth.cancel();
        self.scroll_offset = self.scroll_offset.saturating_sub(1);
    }

    pub fn scroll_down(&mut self) {
        self.smooth.cancel();
        self.scroll_offset = (self.scroll_offset + 1).min(self.max_scroll_offset());
    }

    pub fn scroll_half_screen_up(&mut self) {
        self.smooth.cancel();
        self.scroll_offset = self.scroll_offset.saturating_sub(self.visible_height / 2);
    }

    pub fn scroll_half_screen_down(&mut self) {
        self.smooth.cancel();
        self.scroll_offset =
            (self.scroll_offset + self.visible_height / 2).min(self.max_scroll_offset());
    }

    /// Smooth-scroll home, the back-to-top affordance.
    pub fn scroll_to_top(&mut self) {
        self.smooth.start(0);
    }

    pub fn jump_to_end(&mut self) {
        self.smooth.cancel();
        self.scroll_offset = self.max_scroll_offset();
    }

    /// Bring a section's first line to the top of the viewport with a
    /// smooth animation. Unknown ids no-op silently: a stale anchor is
    /// not worth an error.
    pub fn scroll_to_section(&mut self, section_id: &str) -> bool {
        let Some(bounds) = self.bounds.iter().find(|b| b.id == section_id) else {
            debug!("Ignoring navigation to unknown section {section_id:?}");
            return false;
        };
        let target = bounds.start_line.min(self.max_scroll_offset());
        self.smooth.start(target);
        true
    }

    pub fn is_animating(&self) -> bool {
        self.smooth.is_animating()
    }

    /// Advance the smooth-scroll animation one tick.
    pub fn tick(&mut self) {
        if let Some(next) = self.smooth.step(self.scroll_offset) {
            self.scroll_offset = next;
        }
    }

    /// Read progress through the article as 0..=100.
    pub fn progress_percent(&self) -> u16 {
        let max = self.max_scroll_offset();
        if max == 0 {
            return 0;
        }
        (self.scroll_offset * 100 / max) as u16
    }

    pub fn shows_scroll_top_hint(&self) -> bool {
        self.scroll_offset > SCROLL_TOP_HINT_AFTER
    }

    pub fn render(
        &mut self,
        f: &mut Frame,
        area: Rect,
        palette: &Base16Palette,
        tracker: &SectionTracker,
    ) {
        self.visible_height = area.height as usize;
        self.scroll_offset = self.scroll_offset.min(self.max_scroll_offset());

        let mut text_lines: Vec<Line> = Vec::with_capacity(self.visible_height);
        for line in self.lines.iter().skip(self.scroll_offset).take(self.visible_height) {
            let revealed = line
                .section_index
                .map(|i| {
                    self.bounds
                        .get(i)
                        .is_some_and(|b| tracker.is_revealed(&b.id))
                })
                .unwrap_or(true);

            let style = match (line.kind, revealed) {
                // Unrevealed sections sit dimmed until their one-shot
                // reveal transition fires
                (_, false) => Style::default().fg(palette.base_03),
                (LineKind::Heading, true) => Style::default()
                    .fg(palette.base_0d)
                    .add_modifier(Modifier::BOLD),
                (LineKind::Body, true) => Style::default().fg(palette.base_05),
                (LineKind::Blank, true) => Style::default(),
            };
            text_lines.push(Line::from(Span::styled(format!(" {}", line.text), style)));
        }

        f.render_widget(
            Paragraph::new(text_lines).style(Style::default().bg(palette.base_00)),
            area,
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::content_index::Section;

    fn reader() -> ArticleReader {
        let index = ContentIndex::new(vec![
            Section {
                id: "intro".to_string(),
                title: "Intro".to_string(),
                body: "word ".repeat(60).trim().to_string(),
            },
            Section {
                id: "outlook".to_string(),
                title: "Outlook".to_string(),
                body: "tail ".repeat(60).trim().to_string(),
            },
        ]);
        let mut reader = ArticleReader::new(index);
        reader.layout(40);
        reader.set_viewport_height(10);
        reader
    }

    #[test]
    fn test_layout_produces_ordered_bounds() {
        let reader = reader();
        let bounds = reader.section_bounds();
        assert_eq!(bounds.len(), 2);
        assert_eq!(bounds[0].id, "intro");
        assert!(bounds[0].start_line < bounds[0].end_line);
        // Second section starts after the first's gap line
        assert_eq!(bounds[1].start_line, bounds[0].end_line + 1);
    }

    #[test]
    fn test_scroll_to_unknown_section_is_a_noop() {
        // Scenario F
        let mut reader = reader();
        let before = reader.scroll_offset();
        assert!(!reader.scroll_to_section("missing"));
        assert!(!reader.is_animating());
        reader.tick();
        assert_eq!(reader.scroll_offset(), before);
    }

    #[test]
    fn test_scroll_to_section_animates_to_its_first_line() {
        let mut reader = reader();
        assert!(reader.scroll_to_section("outlook"));
        assert!(reader.is_animating());

        let target = reader
            .section_bounds()
            .into_iter()
            .find(|b| b.id == "outlook")
            .unwrap()
            .start_line
            .min(reader.max_scroll_offset());
        for _ in 0..1000 {
            reader.tick();
            if !reader.is_animating() {
                break;
            }
        }
        assert_eq!(reader.scroll_offset(), target);
    }

    #[test]
    fn test_progress_runs_from_zero_to_hundred() {
        let mut reader = reader();
        assert_eq!(reader.progress_percent(), 0);
        reader.jump_to_end();
        assert_eq!(reader.progress_percent(), 100);
    }

    #[test]
    fn test_manual_scroll_cancels_animation() {
        let mut reader = reader();
        reader.scroll_to_section("outlook");
        assert!(reader.is_animating());
        reader.scroll_up();
        assert!(!reader.is_animating());
    }

    #[test]
    fn test_scroll_top_hint_threshold() {
        let mut reader = reader();
        assert!(!reader.shows_scroll_top_hint());
        reader.jump_to_end();
        assert!(reader.shows_scroll_top_hint());
    }

    #[test]
    fn test_scroll_down_clamps_at_end() {
        let mut reader = reader();
        for _ in 0..1000 {
            reader.scroll_down();
        }
        assert_eq!(reader.scroll_offset(), reader.max_scroll_offset());
    }
}
