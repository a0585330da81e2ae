use std::time::Duration;

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers, MouseEvent, MouseEventKind};
use log::debug;
use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph},
};

use crate::debounce::Debouncer;
use crate::search_engine::{Excerpt, SearchEngine, SearchOutcome, SearchResult};
use crate::theme::Base16Palette;
use crate::widget::focus::FocusRing;

/// Quiet period after the last keystroke before the search runs.
const SEARCH_DEBOUNCE: Duration = Duration::from_millis(300);
/// Gap between closing the panel and scrolling to the chosen result,
/// so the close repaint lands first. A UX parameter, not a contract.
const JUMP_DELAY: Duration = Duration::from_millis(100);

/// Focus ring slots, in Tab order.
const FOCUS_INPUT: usize = 0;
const FOCUS_RESULTS: usize = 1;
const FOCUS_CLOSE: usize = 2;

pub enum SearchPanelAction {
    /// Scroll the reader to a section chosen from the results.
    Navigate { section_id: String },
    Close,
}

/// Lifecycle and input-debouncing wrapper around the search engine:
/// owns the query field, the rendered outcome, and the timers that must
/// die with the panel.
pub struct SearchPanel {
    active: bool,
    input: String,
    cursor_position: usize,

    outcome: Option<SearchOutcome>,
    selected_result: usize,
    scroll_offset: usize,

    engine: SearchEngine,
    debounce: Debouncer,
    pending_jump: Option<String>,
    jump_delay: Debouncer,
    focus: FocusRing,
    last_area: Option<Rect>,
}

impl SearchPanel {
    pub fn new(engine: SearchEngine) -> Self {
        Self {
            active: false,
            input: String::new(),
            cursor_position: 0,
            outcome: None,
            selected_result: 0,
            scroll_offset: 0,
            engine,
            debounce: Debouncer::new(SEARCH_DEBOUNCE),
            pending_jump: None,
            jump_delay: Debouncer::new(JUMP_DELAY),
            focus: FocusRing::new(3),
            last_area: None,
        }
    }

    /// Reveal the panel with focus in the query field. The previous
    /// close wiped all state, so every open starts fresh.
    pub fn open(&mut self) {
        self.active = true;
        self.focus.reset();
    }

    /// Hide the panel and discard everything tied to it: query text,
    /// rendered results, the input debounce, and any pending jump.
    /// Stale timers must never fire against a dismissed panel.
    pub fn close(&mut self) {
        self.active = false;
        self.input.clear();
        self.cursor_position = 0;
        self.outcome = None;
        self.selected_result = 0;
        self.scroll_offset = 0;
        self.debounce.cancel();
        self.jump_delay.cancel();
        self.pending_jump = None;
        self.last_area = None;
    }

    /// A click outside the panel's content area dismisses it, like
    /// clicking the page behind a modal.
    pub fn handle_mouse_event(&mut self, mouse: MouseEvent) -> Option<SearchPanelAction> {
        if !self.active {
            return None;
        }
        if let MouseEventKind::Down(_) = mouse.kind {
            let inside = self.last_area.is_some_and(|area| {
                area.contains(ratatui::layout::Position {
                    x: mouse.column,
                    y: mouse.row,
                })
            });
            if !inside {
                self.close();
                return Some(SearchPanelAction::Close);
            }
        }
        None
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    #[cfg(test)]
    pub fn query(&self) -> &str {
        &self.input
    }

    #[cfg(test)]
    pub fn outcome(&self) -> Option<&SearchOutcome> {
        self.outcome.as_ref()
    }

    #[cfg(test)]
    pub fn has_pending_timers(&self) -> bool {
        self.debounce.is_pending() || self.jump_delay.is_pending()
    }

    /// Timer-driven work, called once per event-loop tick.
    pub fn tick(&mut self) -> Option<SearchPanelAction> {
        if self.debounce.fire_if_ready() && self.active {
            self.run_search();
        }
        if self.jump_delay.fire_if_ready() {
            if let Some(section_id) = self.pending_jump.take() {
                return Some(SearchPanelAction::Navigate { section_id });
            }
        }
        None
    }

    pub fn handle_key_event(&mut self, key: KeyEvent) -> Option<SearchPanelAction> {
        match key.code {
            KeyCode::Esc => {
                self.close();
                return Some(SearchPanelAction::Close);
            }
            KeyCode::Tab => {
                self.focus.next();
                return None;
            }
            KeyCode::BackTab => {
                self.focus.prev();
                return None;
            }
            _ => {}
        }

        match self.focus.current() {
            FOCUS_INPUT => self.handle_input_key(key),
            FOCUS_RESULTS => self.handle_results_key(key),
            FOCUS_CLOSE => {
                if key.code == KeyCode::Enter {
                    self.close();
                    return Some(SearchPanelAction::Close);
                }
                None
            }
            _ => None,
        }
    }

    fn handle_input_key(&mut self, key: KeyEvent) -> Option<SearchPanelAction> {
        match key.code {
            KeyCode::Enter => {
                // Run immediately; the quiet period is for typing only
                self.debounce.cancel();
                self.run_search();
                if self.has_results() {
                    self.focus.set(FOCUS_RESULTS);
                }
            }
            KeyCode::Down => {
                if self.has_results() {
                    self.focus.set(FOCUS_RESULTS);
                }
            }
            KeyCode::Char('u') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                self.input.clear();
                self.cursor_position = 0;
                self.debounce.schedule();
            }
            KeyCode::Char(c) => {
                self.input.insert(self.byte_cursor(), c);
                self.cursor_position += 1;
                self.debounce.schedule();
            }
            KeyCode::Backspace => {
                if self.cursor_position > 0 {
                    self.cursor_position -= 1;
                    self.input.remove(self.byte_cursor());
                    self.debounce.schedule();
                }
            }
            KeyCode::Left => {
                self.cursor_position = self.cursor_position.saturating_sub(1);
            }
            KeyCode::Right => {
                self.cursor_position = (self.cursor_position + 1).min(self.input.chars().count());
            }
            _ => {}
        }
        None
    }

    fn handle_results_key(&mut self, key: KeyEvent) -> Option<SearchPanelAction> {
        match key.code {
            KeyCode::Enter => return self.select_current(),
            KeyCode::Char('j') | KeyCode::Down => self.move_selection_down(),
            KeyCode::Char('k') | KeyCode::Up => self.move_selection_up(),
            KeyCode::Char('g') => {
                self.selected_result = 0;
                self.scroll_offset = 0;
            }
            KeyCode::Char('G') => {
                if let Some(count) = self.result_count().checked_sub(1) {
                    self.selected_result = count;
                    self.update_scroll();
                }
            }
            _ => {}
        }
        None
    }

    fn run_search(&mut self) {
        let outcome = self.engine.search(&self.input);
        debug!("Search panel evaluated {:?}", self.input);
        self.outcome = Some(outcome);
        self.selected_result = 0;
        self.scroll_offset = 0;
    }

    /// Close first (wiping panel state and timers), then arm the
    /// delayed jump so the navigation survives the close.
    fn select_current(&mut self) -> Option<SearchPanelAction> {
        let section_id = self.results()?.get(self.selected_result)?.section_id.clone();
        self.close();
        self.pending_jump = Some(section_id);
        self.jump_delay.schedule();
        None
    }

    fn results(&self) -> Option<&[SearchResult]> {
        match self.outcome.as_ref()? {
            SearchOutcome::Results(results) => Some(results),
            SearchOutcome::InsufficientQuery => None,
        }
    }

    fn result_count(&self) -> usize {
        self.results().map_or(0, <[SearchResult]>::len)
    }

    fn has_results(&self) -> bool {
        self.result_count() > 0
    }

    fn byte_cursor(&self) -> usize {
        self.input
            .char_indices()
            .nth(self.cursor_position)
            .map_or(self.input.len(), |(i, _)| i)
    }

    fn move_selection_down(&mut self) {
        if self.selected_result + 1 < self.result_count() {
            self.selected_result += 1;
            self.update_scroll();
        }
    }

    fn move_selection_up(&mut self) {
        if self.selected_result > 0 {
            self.selected_result -= 1;
            self.update_scroll();
        }
    }

    fn update_scroll(&mut self) {
        if self.selected_result < self.scroll_offset {
            self.scroll_offset = self.selected_result;
        } else if self.selected_result > self.scroll_offset + 2 {
            self.scroll_offset = self.selected_result.saturating_sub(1);
        }
    }

    pub fn render(&mut self, f: &mut Frame, area: Rect, palette: &Base16Palette) {
        if !self.active {
            return;
        }

        let popup_width = ((area.width as f32 * 0.8) as u16).clamp(40.min(area.width), area.width);
        let popup_height = ((area.height as f32 * 0.7) as u16).clamp(10.min(area.height), area.height);
        let popup_area = Rect {
            x: (area.width - popup_width) / 2,
            y: (area.height - popup_height) / 2,
            width: popup_width,
            height: popup_height,
        };
        self.last_area = Some(popup_area);

        f.render_widget(Clear, popup_area);

        let block = Block::default()
            .title(" Search ")
            .borders(Borders::ALL)
            .style(Style::default().bg(palette.base_00).fg(palette.base_05));
        f.render_widget(block.clone(), popup_area);
        let inner = block.inner(popup_area);

        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(2),
                Constraint::Min(3),
                Constraint::Length(1),
            ])
            .split(inner);

        self.render_input(f, chunks[0], palette);
        self.render_results(f, chunks[1], palette);
        self.render_footer(f, chunks[2], palette);
    }

    fn render_input(&self, f: &mut Frame, area: Rect, palette: &Base16Palette) {
        let input_style = if self.focus.current() == FOCUS_INPUT {
            Style::default()
                .fg(palette.base_07)
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(palette.base_03)
        };

        let prompt = "Search: ";
        let input = Paragraph::new(Line::from(vec![
            Span::raw(prompt),
            Span::styled(self.input.as_str(), input_style),
        ]))
        .block(
            Block::default()
                .borders(Borders::BOTTOM)
                .style(Style::default().fg(palette.base_03)),
        );
        f.render_widget(input, area);

        if self.focus.current() == FOCUS_INPUT {
            f.set_cursor_position(ratatui::layout::Position {
                x: area.x + prompt.len() as u16 + self.cursor_position as u16,
                y: area.y,
            });
        }
    }

    fn render_results(&self, f: &mut Frame, area: Rect, palette: &Base16Palette) {
        let placeholder = |text: &str| {
            Paragraph::new(text.to_string())
                .style(Style::default().fg(palette.base_03))
                .alignment(Alignment::Center)
        };

        match self.outcome.as_ref() {
            None | Some(SearchOutcome::InsufficientQuery) => {
                f.render_widget(placeholder("Type at least 2 characters to search"), area);
            }
            Some(SearchOutcome::Results(results)) if results.is_empty() => {
                f.render_widget(placeholder("Nothing found"), area);
            }
            Some(SearchOutcome::Results(results)) => {
                let mut lines: Vec<Line> = Vec::new();
                let rows_per_result = 3;
                let visible = (area.height as usize / rows_per_result).max(1);
                for (i, result) in results
                    .iter()
                    .enumerate()
                    .skip(self.scroll_offset)
                    .take(visible)
                {
                    let is_selected =
                        i == self.selected_result && self.focus.current() == FOCUS_RESULTS;
                    let title_style = if is_selected {
                        Style::default()
                            .fg(palette.base_07)
                            .bg(palette.base_02)
                            .add_modifier(Modifier::BOLD)
                    } else {
                        Style::default().fg(palette.base_0d)
                    };
                    lines.push(Line::from(Span::styled(
                        format!(" {}", result.section_title),
                        title_style,
                    )));
                    lines.push(excerpt_line(&result.excerpt, palette, is_selected));
                    lines.push(Line::default());
                }
                f.render_widget(Paragraph::new(lines), area);
            }
        }
    }

    fn render_footer(&self, f: &mut Frame, area: Rect, palette: &Base16Palette) {
        let close_style = if self.focus.current() == FOCUS_CLOSE {
            Style::default()
                .fg(palette.base_07)
                .bg(palette.base_02)
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(palette.base_03)
        };

        let count_text = match self.outcome.as_ref() {
            Some(SearchOutcome::Results(results)) if !results.is_empty() => {
                format!("{} result(s)  ", results.len())
            }
            _ => String::new(),
        };

        let footer = Paragraph::new(Line::from(vec![
            Span::styled(count_text, Style::default().fg(palette.base_03)),
            Span::raw("Tab cycle  Enter select  "),
            Span::styled("[ Close (Esc) ]", close_style),
        ]))
        .alignment(Alignment::Right);
        f.render_widget(footer, area);
    }
}

/// Excerpt text as one styled line, match ranges emphasized.
fn excerpt_line<'a>(
    excerpt: &'a Excerpt,
    palette: &Base16Palette,
    is_selected: bool,
) -> Line<'a> {
    let (hl_fg, hl_bg) = palette.highlight_colors(is_selected);
    let base_style = Style::default().fg(palette.base_05);
    let hl_style = Style::default()
        .fg(hl_fg)
        .bg(hl_bg)
        .add_modifier(Modifier::BOLD);

    let mut spans = vec![Span::raw("   ")];
    let mut pos = 0;
    for &(start, end) in &excerpt.highlights {
        if start > pos {
            spans.push(Span::styled(&excerpt.text[pos..start], base_style));
        }
        spans.push(Span::styled(&excerpt.text[start..end], hl_style));
        pos = end;
    }
    if pos < excerpt.text.len() {
        spans.push(Span::styled(&excerpt.text[pos..], base_style));
    }
    Line::from(spans)
}
