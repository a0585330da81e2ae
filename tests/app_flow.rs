use std::time::Duration;

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::{Terminal, backend::TestBackend};

use articat::article::Article;
use articat::inputs::{EventSource, SimulatedEventSource};
use articat::main_app::{App, run_app_with_event_source};
use articat::preferences::Preferences;

fn fixture_markdown() -> String {
    let filler = "The ecosystem keeps moving and every month brings another wave \
of tools, benchmarks and workflows that teams evaluate against their own \
constraints. "
        .repeat(10);
    format!(
        "---\n\
title: Agentic Trends\n\
url: https://example.com/trends\n\
---\n\n\
## Introduction\n\n\
Hello world of agents. {filler}\n\n\
## Methodology\n\n\
We collected reports from practitioners over six months. {filler}\n\n\
## Outlook\n\n\
Closing thoughts: agents are here to stay.\n"
    )
}

fn test_app() -> App {
    let article = Article::from_markdown(&fixture_markdown()).unwrap();
    App::new(article, Preferences::ephemeral())
}

fn test_terminal(width: u16, height: u16) -> Terminal<TestBackend> {
    Terminal::new(TestBackend::new(width, height)).unwrap()
}

fn key(code: KeyCode) -> KeyEvent {
    KeyEvent::new(code, KeyModifiers::empty())
}

fn ctrl(c: char) -> KeyEvent {
    KeyEvent::new(KeyCode::Char(c), KeyModifiers::CONTROL)
}

fn type_str(app: &mut App, text: &str) {
    for c in text.chars() {
        app.handle_key_event(key(KeyCode::Char(c)));
    }
}

fn buffer_text(terminal: &Terminal<TestBackend>) -> String {
    let buffer = terminal.backend().buffer();
    let mut out = String::new();
    for y in 0..buffer.area.height {
        for x in 0..buffer.area.width {
            out.push_str(buffer.cell((x, y)).unwrap().symbol());
        }
        out.push('\n');
    }
    out
}

fn draw(terminal: &mut Terminal<TestBackend>, app: &mut App) -> String {
    terminal.draw(|f| app.render(f)).unwrap();
    buffer_text(terminal)
}

#[test]
fn test_renders_title_sections_and_hints() {
    let mut terminal = test_terminal(80, 24);
    let mut app = test_app();
    let screen = draw(&mut terminal, &mut app);

    assert!(screen.contains("Agentic Trends"));
    assert!(screen.contains("Introduction"));
    assert!(screen.contains("Ctrl+K search"));
}

#[test]
fn test_search_flow_from_open_to_navigation() {
    let mut terminal = test_terminal(80, 14);
    let mut app = test_app();
    draw(&mut terminal, &mut app);

    // The last section starts off-screen on a 14-row terminal
    let screen = draw(&mut terminal, &mut app);
    assert!(!screen.contains("Closing thoughts"));

    app.handle_key_event(ctrl('k'));
    let screen = draw(&mut terminal, &mut app);
    assert!(screen.contains("Search"));
    assert!(screen.contains("Type at least 2 characters"));

    type_str(&mut app, "closing");
    app.handle_key_event(key(KeyCode::Enter));
    let screen = draw(&mut terminal, &mut app);
    assert!(screen.contains("Outlook"), "result title should render");
    assert!(screen.contains("1 result(s)"));

    // Select the result: the panel closes now, the scroll happens
    // after the close delay
    app.handle_key_event(key(KeyCode::Enter));
    let screen = draw(&mut terminal, &mut app);
    assert!(!screen.contains("result(s)"));

    std::thread::sleep(Duration::from_millis(120));
    for _ in 0..200 {
        app.tick();
    }
    let screen = draw(&mut terminal, &mut app);
    assert!(
        screen.contains("Closing thoughts"),
        "viewport should have scrolled to the chosen section"
    );
}

#[test]
fn test_no_results_message() {
    let mut terminal = test_terminal(80, 14);
    let mut app = test_app();
    draw(&mut terminal, &mut app);

    app.handle_key_event(ctrl('k'));
    type_str(&mut app, "xyzzy");
    app.handle_key_event(key(KeyCode::Enter));
    let screen = draw(&mut terminal, &mut app);
    assert!(screen.contains("Nothing found"));
}

#[test]
fn test_escape_closes_search_before_sidebar() {
    let mut terminal = test_terminal(80, 24);
    let mut app = test_app();
    draw(&mut terminal, &mut app);

    app.handle_key_event(ctrl('b'));
    app.handle_key_event(ctrl('k'));
    let screen = draw(&mut terminal, &mut app);
    assert!(screen.contains("Search"));
    assert!(screen.contains("Contents"));

    app.handle_key_event(key(KeyCode::Esc));
    let screen = draw(&mut terminal, &mut app);
    assert!(!screen.contains("Type at least 2 characters"));
    assert!(screen.contains("Contents"));

    app.handle_key_event(key(KeyCode::Esc));
    let screen = draw(&mut terminal, &mut app);
    assert!(!screen.contains("Contents"));
}

#[test]
fn test_sidebar_marks_active_section() {
    let mut terminal = test_terminal(80, 24);
    let mut app = test_app();
    draw(&mut terminal, &mut app);

    // A tick after the first draw lets the tracker observe the viewport
    app.tick();
    app.handle_key_event(ctrl('b'));
    let screen = draw(&mut terminal, &mut app);
    assert!(screen.contains("> Introduction"));
    assert!(!screen.contains("> Outlook"));
}

#[test]
fn test_event_loop_quits_on_q() {
    let mut terminal = test_terminal(80, 24);
    let mut app = test_app();
    let mut events = SimulatedEventSource::new(vec![
        SimulatedEventSource::char_key('j'),
        SimulatedEventSource::char_key('q'),
    ]);

    run_app_with_event_source(&mut terminal, &mut app, &mut events).unwrap();
    assert!(app.should_quit());
    assert!(!events.poll(Duration::from_millis(0)).unwrap());
}
