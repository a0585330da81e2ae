use std::time::{Duration, Instant};

use anyhow::Result;
use crossterm::event::{Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers, MouseEvent, MouseEventKind};
use log::{debug, error, info};
use ratatui::{
    Frame, Terminal,
    backend::Backend,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Paragraph},
};

use crate::article::Article;
use crate::inputs::EventSource;
use crate::notification::{NotificationLevel, NotificationManager};
use crate::preferences::Preferences;
use crate::search_engine::SearchEngine;
use crate::section_tracker::SectionTracker;
use crate::share::{self, SharePlatform, ShareContext};
use crate::theme::Base16Palette;
use crate::widget::{
    ArticleReader, SearchPanel, SearchPanelAction, Sidebar, SidebarAction,
};

const TICK_INTERVAL: Duration = Duration::from_millis(50);
const HEADER_ROWS: u16 = 2;

pub struct App {
    article: Article,
    reader: ArticleReader,
    tracker: SectionTracker,
    sidebar: Sidebar,
    search: SearchPanel,
    notifications: NotificationManager,
    preferences: Preferences,

    opened_at: Instant,
    layout_width: Option<u16>,
    should_quit: bool,
}

impl App {
    pub fn new(article: Article, preferences: Preferences) -> Self {
        let reader = ArticleReader::new(article.index.clone());
        let sidebar = Sidebar::new(&article.index);
        let search = SearchPanel::new(SearchEngine::from_index(&article.index));
        Self {
            article,
            reader,
            tracker: SectionTracker::new(),
            sidebar,
            search,
            notifications: NotificationManager::new(),
            preferences,
            opened_at: Instant::now(),
            layout_width: None,
            should_quit: false,
        }
    }

    pub fn should_quit(&self) -> bool {
        self.should_quit
    }

    pub fn reading_seconds(&self) -> u64 {
        self.opened_at.elapsed().as_secs()
    }

    fn palette(&self) -> &'static Base16Palette {
        self.preferences.theme.palette()
    }

    pub fn handle_event(&mut self, event: Event) {
        match event {
            Event::Key(key) => self.handle_key_event(key),
            Event::Mouse(mouse) => self.handle_mouse_event(mouse),
            Event::Resize(width, _height) => {
                self.sidebar.on_resize(width);
                // The next render re-wraps against the new width
                self.layout_width = None;
            }
            _ => {}
        }
    }

    fn handle_mouse_event(&mut self, mouse: MouseEvent) {
        if self.search.is_active() {
            if let Some(action) = self.search.handle_mouse_event(mouse) {
                self.apply_search_action(action);
            }
            return;
        }
        if self.sidebar.is_open() {
            if let Some(action) = self.sidebar.handle_mouse_event(mouse) {
                self.apply_sidebar_action(action);
            }
            return;
        }
        match mouse.kind {
            MouseEventKind::ScrollDown => self.reader.scroll_down(),
            MouseEventKind::ScrollUp => self.reader.scroll_up(),
            _ => {}
        }
    }

    pub fn handle_key_event(&mut self, key: KeyEvent) {
        if key.kind != KeyEventKind::Press {
            return;
        }

        // Global shortcuts stay live while a modal is open
        match key.code {
            KeyCode::Char('k') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                self.search.open();
                return;
            }
            KeyCode::Char('b') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                self.sidebar.toggle();
                return;
            }
            _ => {}
        }

        // Modal routing: the search panel wins over the sidebar, so
        // Escape closes them in that priority order.
        if self.search.is_active() {
            if let Some(action) = self.search.handle_key_event(key) {
                self.apply_search_action(action);
            }
            return;
        }
        if self.sidebar.is_open() {
            if let Some(action) = self.sidebar.handle_key_event(key) {
                self.apply_sidebar_action(action);
            }
            return;
        }

        match key.code {
            KeyCode::Char('d') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                self.reader.scroll_half_screen_down();
            }
            KeyCode::Char('u') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                self.reader.scroll_half_screen_up();
            }
            KeyCode::Char('q') => self.should_quit = true,
            KeyCode::Char('j') | KeyCode::Down => self.reader.scroll_down(),
            KeyCode::Char('k') | KeyCode::Up => self.reader.scroll_up(),
            KeyCode::Char('g') => self.reader.scroll_to_top(),
            KeyCode::Char('G') => self.reader.jump_to_end(),
            KeyCode::Char('f') => self.follow_cross_reference(),
            KeyCode::Char('c') => self.copy_link(),
            KeyCode::Char('T') => self.share(SharePlatform::Twitter),
            KeyCode::Char('L') => self.share(SharePlatform::LinkedIn),
            KeyCode::Char('M') => self.share(SharePlatform::Telegram),
            KeyCode::Char('d') => self.toggle_theme(),
            _ => {}
        }
    }

    fn apply_search_action(&mut self, action: SearchPanelAction) {
        match action {
            SearchPanelAction::Navigate { section_id } => {
                self.reader.scroll_to_section(&section_id);
            }
            SearchPanelAction::Close => {}
        }
    }

    fn apply_sidebar_action(&mut self, action: SidebarAction) {
        match action {
            SidebarAction::Navigate { section_id } => {
                self.reader.scroll_to_section(&section_id);
            }
            SidebarAction::Close => {}
        }
    }

    /// Follow the first cross-reference of the active section. Stale
    /// targets fall through to the navigator's silent no-op.
    fn follow_cross_reference(&mut self) {
        let Some(active) = self.tracker.active_section() else {
            return;
        };
        let Some(cross_ref) = self.article.refs_from(active).next() else {
            return;
        };
        let target = cross_ref.target_id.clone();
        self.reader.scroll_to_section(&target);
    }

    fn copy_link(&mut self) {
        match ShareContext::new(self.article.url.as_deref(), &self.article.title)
            .and_then(|context| share::copy_link(&context))
        {
            Ok(()) => self.notifications.show_info("Link copied"),
            Err(e) => {
                error!("Copy link failed: {e}");
                self.notifications.show_error(e.to_string());
            }
        }
    }

    fn share(&mut self, platform: SharePlatform) {
        match ShareContext::new(self.article.url.as_deref(), &self.article.title)
            .and_then(|context| share::open_share(platform, &context))
        {
            Ok(()) => {
                info!("Opened {} share page", platform.label());
                self.notifications
                    .show_info(format!("Sharing to {}", platform.label()));
            }
            Err(e) => {
                error!("Share to {} failed: {e}", platform.label());
                self.notifications.show_error(e.to_string());
            }
        }
    }

    fn toggle_theme(&mut self) {
        self.preferences.theme = self.preferences.theme.toggled();
        if let Err(e) = self.preferences.save() {
            error!("Failed to persist theme preference: {e}");
        }
    }

    /// Timer and observer work, run once per event-loop tick.
    pub fn tick(&mut self) {
        if let Some(action) = self.search.tick() {
            self.apply_search_action(action);
        }
        if let Some(action) = self.sidebar.tick() {
            self.apply_sidebar_action(action);
        }
        self.reader.tick();

        let newly_revealed = self
            .tracker
            .update(self.reader.scroll_offset(), self.reader.visible_height() as u16);
        for id in newly_revealed {
            debug!("Section {id} revealed");
        }

        self.notifications.update();
    }

    pub fn render(&mut self, f: &mut Frame) {
        let palette = self.palette();
        let area = f.area();

        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(HEADER_ROWS),
                Constraint::Min(1),
                Constraint::Length(1),
            ])
            .split(area);

        let content = chunks[1];
        if self.layout_width != Some(content.width) {
            self.reader.layout(content.width);
            self.tracker.set_layout(self.reader.section_bounds());
            self.layout_width = Some(content.width);
        }

        self.render_header(f, chunks[0], palette);
        self.reader.render(f, content, palette, &self.tracker);
        self.render_status(f, chunks[2], palette);

        self.sidebar
            .render(f, content, palette, self.tracker.active_section());
        self.search.render(f, area, palette);
    }

    fn render_header(&self, f: &mut Frame, area: Rect, palette: &Base16Palette) {
        let rows = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(1), Constraint::Length(1)])
            .split(area);

        let percent = self.reader.progress_percent();
        let title = Paragraph::new(Line::from(vec![
            Span::styled(
                format!(" {}", self.article.title),
                Style::default()
                    .fg(palette.base_07)
                    .add_modifier(Modifier::BOLD),
            ),
            Span::styled(
                format!("  {percent:>3}% "),
                Style::default().fg(palette.base_03),
            ),
        ]))
        .block(Block::default().style(Style::default().bg(palette.base_01)));
        f.render_widget(title, rows[0]);

        // Reading-progress bar under the title
        let filled = (area.width as usize * percent as usize) / 100;
        let bar: String = "█".repeat(filled);
        f.render_widget(
            Paragraph::new(Span::styled(bar, Style::default().fg(palette.base_0b)))
                .block(Block::default().style(Style::default().bg(palette.base_01))),
            rows[1],
        );
    }

    fn render_status(&self, f: &mut Frame, area: Rect, palette: &Base16Palette) {
        if let Some(notification) = self.notifications.current() {
            let color = match notification.level {
                NotificationLevel::Info => palette.base_0b,
                NotificationLevel::Error => palette.base_0a,
            };
            f.render_widget(
                Paragraph::new(Span::styled(
                    format!(" {}", notification.message),
                    Style::default().fg(color).add_modifier(Modifier::BOLD),
                ))
                .block(Block::default().style(Style::default().bg(palette.base_01))),
                area,
            );
            return;
        }

        let active_title = self
            .tracker
            .active_section()
            .and_then(|id| self.article.index.get(id))
            .map(|s| s.title.as_str())
            .unwrap_or("");
        let mut hints = String::from("Ctrl+K search  Ctrl+B contents  q quit ");
        if self.reader.shows_scroll_top_hint() {
            hints.insert_str(0, "g top  ");
        }

        let status = Paragraph::new(Line::from(vec![
            Span::styled(
                format!(" {active_title}"),
                Style::default().fg(palette.base_0d),
            ),
            Span::styled(
                format!("{hints:>width$}", width = (area.width as usize).saturating_sub(active_title.len() + 2)),
                Style::default().fg(palette.base_03),
            ),
        ]))
        .alignment(Alignment::Left)
        .block(Block::default().style(Style::default().bg(palette.base_01)));
        f.render_widget(status, area);
    }
}

pub fn run_app_with_event_source<B: Backend>(
    terminal: &mut Terminal<B>,
    app: &mut App,
    event_source: &mut dyn EventSource,
) -> Result<()> {
    loop {
        terminal.draw(|f| app.render(f))?;

        if event_source.poll(TICK_INTERVAL)? {
            app.handle_event(event_source.read()?);
        }
        app.tick();

        if app.should_quit() {
            break;
        }
    }
    Ok(())
}
