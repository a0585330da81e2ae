use std::{env, fs::File, io::stdout, path::Path};

use anyhow::{Context, Result};
use crossterm::{
    event::{DisableMouseCapture, EnableMouseCapture},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use log::{error, info};
use ratatui::{Terminal, backend::CrosstermBackend};
use simplelog::{LevelFilter, WriteLogger};

// Use modules from the library crate
use articat::article::Article;
use articat::event_source::KeyboardEventSource;
use articat::main_app::{App, run_app_with_event_source};
use articat::panic_handler;
use articat::preferences::Preferences;

const PREFERENCES_FILE: &str = ".articat.json";

fn main() -> Result<()> {
    WriteLogger::init(
        LevelFilter::Debug,
        simplelog::ConfigBuilder::new()
            .set_max_level(LevelFilter::Debug)
            .build(),
        File::create("articat.log")?,
    )?;

    let args: Vec<String> = env::args().skip(1).collect();
    let article_path = args
        .first()
        .context("Usage: articat <path-to-markdown-article>")?;

    let article = Article::load(Path::new(article_path))?;
    info!(
        "Loaded {:?} with {} sections",
        article.title,
        article.index.len()
    );

    let preferences = Preferences::load_or_ephemeral(Some(PREFERENCES_FILE));

    panic_handler::initialize_panic_handler();

    info!("Starting articat");

    // Terminal initialization
    enable_raw_mode().map_err(|e| {
        error!("Failed to enable raw mode: {e}");
        anyhow::anyhow!(
            "Failed to initialize terminal: {e}\n\
             Make sure you are running articat in a terminal, not from a pipe or redirection."
        )
    })?;
    let mut stdout = stdout();

    execute!(stdout, EnterAlternateScreen, EnableMouseCapture).map_err(|e| {
        error!("Failed to setup terminal: {e}");
        let _ = disable_raw_mode();
        anyhow::anyhow!(
            "Failed to setup terminal: {e}\n\
             Make sure you are running articat in a proper terminal environment."
        )
    })?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    // Create app and run it
    let mut app = App::new(article, preferences);
    let mut event_source = KeyboardEventSource;
    let res = run_app_with_event_source(&mut terminal, &mut app, &mut event_source);

    // Restore terminal state
    let _ = disable_raw_mode();
    let _ = execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    );
    let _ = terminal.show_cursor();

    if let Err(err) = res {
        error!("Application error: {err:?}");
        println!("{err:?}");
    }

    info!(
        "Shutting down articat after {} seconds of reading",
        app.reading_seconds()
    );
    Ok(())
}
