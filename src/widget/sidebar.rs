use std::time::Duration;

use crossterm::event::{KeyCode, KeyEvent, MouseEvent, MouseEventKind};
use ratatui::{
    Frame,
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, List, ListItem, ListState},
};

use crate::content_index::ContentIndex;
use crate::debounce::Debouncer;
use crate::theme::Base16Palette;
use crate::widget::focus::FocusRing;

/// Gap between closing the sidebar and scrolling to the chosen section.
const CLOSE_SCROLL_DELAY: Duration = Duration::from_millis(300);
/// Quiet period after the last resize event before reacting to it.
const RESIZE_DEBOUNCE: Duration = Duration::from_millis(250);
/// Terminals at least this wide auto-close the sidebar overlay.
const WIDE_BREAKPOINT_COLS: u16 = 100;

const FOCUS_LIST: usize = 0;
const FOCUS_CLOSE: usize = 1;

pub enum SidebarAction {
    Navigate { section_id: String },
    Close,
}

#[derive(Debug, Clone)]
struct TocEntry {
    id: String,
    title: String,
}

/// Collapsible navigation sidebar: one TOC link per section, the link
/// matching the tracker's active section styled distinctly.
pub struct Sidebar {
    open: bool,
    entries: Vec<TocEntry>,
    selected: usize,
    focus: FocusRing,

    pending_jump: Option<String>,
    jump_delay: Debouncer,
    resize_debounce: Debouncer,
    pending_width: Option<u16>,
    last_area: Option<Rect>,
}

impl Sidebar {
    pub fn new(index: &ContentIndex) -> Self {
        let entries = index
            .sections()
            .iter()
            .map(|s| TocEntry {
                id: s.id.clone(),
                title: s.title.clone(),
            })
            .collect();
        Self {
            open: false,
            entries,
            selected: 0,
            focus: FocusRing::new(2),
            pending_jump: None,
            jump_delay: Debouncer::new(CLOSE_SCROLL_DELAY),
            resize_debounce: Debouncer::new(RESIZE_DEBOUNCE),
            pending_width: None,
            last_area: None,
        }
    }

    pub fn open(&mut self) {
        self.open = true;
        self.focus.reset();
    }

    /// Close and drop any pending scroll tied to a selection made just
    /// before; an explicitly dismissed sidebar must not scroll later.
    pub fn close(&mut self) {
        self.open = false;
        self.jump_delay.cancel();
        self.pending_jump = None;
        self.last_area = None;
    }

    /// A click on the content behind the panel dismisses it.
    pub fn handle_mouse_event(&mut self, mouse: MouseEvent) -> Option<SidebarAction> {
        if !self.open {
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
                return Some(SidebarAction::Close);
            }
        }
        None
    }

    pub fn toggle(&mut self) {
        if self.open {
            self.close();
        } else {
            self.open();
        }
    }

    pub fn is_open(&self) -> bool {
        self.open
    }

    /// Index of the entry that should carry the active style: the one
    /// matching the tracker's active section, or none.
    pub fn active_index(&self, active_section: Option<&str>) -> Option<usize> {
        let active = active_section?;
        self.entries.iter().position(|e| e.id == active)
    }

    pub fn on_resize(&mut self, width: u16) {
        self.pending_width = Some(width);
        self.resize_debounce.schedule();
    }

    pub fn tick(&mut self) -> Option<SidebarAction> {
        if self.resize_debounce.fire_if_ready() {
            if let Some(width) = self.pending_width.take() {
                if width >= WIDE_BREAKPOINT_COLS && self.open {
                    self.close();
                }
            }
        }
        if self.jump_delay.fire_if_ready() {
            if let Some(section_id) = self.pending_jump.take() {
                return Some(SidebarAction::Navigate { section_id });
            }
        }
        None
    }

    pub fn handle_key_event(&mut self, key: KeyEvent) -> Option<SidebarAction> {
        match key.code {
            KeyCode::Esc => {
                self.close();
                return Some(SidebarAction::Close);
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
            FOCUS_LIST => match key.code {
                KeyCode::Char('j') | KeyCode::Down => {
                    if self.selected + 1 < self.entries.len() {
                        self.selected += 1;
                    }
                }
                KeyCode::Char('k') | KeyCode::Up => {
                    self.selected = self.selected.saturating_sub(1);
                }
                KeyCode::Char('g') => self.selected = 0,
                KeyCode::Char('G') => {
                    self.selected = self.entries.len().saturating_sub(1);
                }
                KeyCode::Enter => return self.select_current(),
                _ => {}
            },
            FOCUS_CLOSE => {
                if key.code == KeyCode::Enter {
                    self.close();
                    return Some(SidebarAction::Close);
                }
            }
            _ => {}
        }
        None
    }

    fn select_current(&mut self) -> Option<SidebarAction> {
        let entry = self.entries.get(self.selected)?;
        let section_id = entry.id.clone();
        self.close();
        self.pending_jump = Some(section_id);
        self.jump_delay.schedule();
        None
    }

    pub fn render(
        &mut self,
        f: &mut Frame,
        area: Rect,
        palette: &Base16Palette,
        active_section: Option<&str>,
    ) {
        if !self.open {
            return;
        }

        let width = (area.width / 3).clamp(24.min(area.width), area.width);
        let panel_area = Rect {
            x: area.x,
            y: area.y,
            width,
            height: area.height,
        };
        self.last_area = Some(panel_area);
        f.render_widget(Clear, panel_area);

        let list_focused = self.focus.current() == FOCUS_LIST;
        let title = if self.focus.current() == FOCUS_CLOSE {
            " Contents [ Close (Esc) ] "
        } else {
            " Contents "
        };
        let block = Block::default()
            .title(title)
            .borders(Borders::ALL)
            .style(Style::default().bg(palette.base_00).fg(palette.base_05));

        let active_index = self.active_index(active_section);
        let items: Vec<ListItem> = self
            .entries
            .iter()
            .enumerate()
            .map(|(i, entry)| {
                let is_active = active_index == Some(i);
                let marker = if is_active { "> " } else { "  " };
                let style = if is_active {
                    Style::default()
                        .fg(palette.base_0d)
                        .add_modifier(Modifier::BOLD)
                } else {
                    Style::default().fg(palette.base_05)
                };
                ListItem::new(Line::from(vec![
                    Span::styled(marker, style),
                    Span::styled(entry.title.clone(), style),
                ]))
            })
            .collect();

        let highlight = if list_focused {
            Style::default().bg(palette.base_02).fg(palette.base_07)
        } else {
            Style::default().fg(palette.base_03)
        };
        let list = List::new(items).block(block).highlight_style(highlight);

        let mut state = ListState::default();
        state.select(Some(self.selected));
        f.render_stateful_widget(list, panel_area, &mut state);
    }
}
