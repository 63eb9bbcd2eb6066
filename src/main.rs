// src/main.rs

use clap::Parser;
use color_eyre::eyre::{Result, WrapErr};
use crossterm::{
    event::{self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers},
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
    ExecutableCommand,
};
use ratatui::prelude::*;
use std::io::{stdout, Stdout};
use std::time::Duration;
use tokio::sync::mpsc;
use tracing::info;

mod app;
mod config;
mod core;
mod logging;
mod ui;

use app::App;
use config::Config;
use crate::core::client::BackendClient;
use crate::core::controller::{SessionController, SessionEvent};
use crate::core::models::WizardStep;

#[tokio::main]
async fn main() -> Result<()> {
    color_eyre::install()?;
    let config = Config::parse();
    logging::initialize_logging()?;
    info!(?config, "Starting llm-scan-wizard.");

    let client = BackendClient::new(&config.backend_url, config.stream_url.as_deref(), config.request_timeout())
        .wrap_err("invalid backend configuration")?;
    let (tx, mut rx) = mpsc::unbounded_channel::<SessionEvent>();
    let mut app = App::new(SessionController::new(client, tx));
    app.controller.load_catalog();

    // --- Setup ---
    stdout().execute(EnterAlternateScreen)?;
    stdout().execute(EnableMouseCapture)?;
    enable_raw_mode()?;
    let mut terminal = Terminal::new(CrosstermBackend::new(stdout()))?;
    terminal.clear()?;

    let outcome = run(&mut terminal, &mut app, &mut rx);

    // Never leave a live channel behind.
    app.controller.reset();

    // --- Restore Terminal ---
    stdout().execute(LeaveAlternateScreen)?;
    stdout().execute(DisableMouseCapture)?;
    disable_raw_mode()?;
    info!("Exiting.");
    outcome
}

fn run(
    terminal: &mut Terminal<CrosstermBackend<Stdout>>,
    app: &mut App,
    rx: &mut mpsc::UnboundedReceiver<SessionEvent>,
) -> Result<()> {
    while !app.should_quit {
        terminal.draw(|frame| ui::render(app, frame))?;

        if event::poll(Duration::from_millis(100))? {
            handle_events(app)?;
        }

        // Apply every completion that arrived since the last frame, in order.
        while let Ok(session_event) = rx.try_recv() {
            app.controller.handle_event(session_event);
        }

        app.on_tick();
    }
    Ok(())
}

/// Single event entry point, dispatching by wizard step.
fn handle_events(app: &mut App) -> Result<()> {
    if let Event::Key(key) = event::read()? {
        if key.kind != KeyEventKind::Press {
            return Ok(());
        }
        if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
            app.quit();
            return Ok(());
        }
        if app.is_editing_directory() {
            handle_directory_input(app, key);
            return Ok(());
        }
        match app.controller.step() {
            WizardStep::SelectModel | WizardStep::SelectEnvironment => handle_selection_input(app, key.code),
            WizardStep::SelectTool => handle_tool_input(app, key.code),
            WizardStep::Running => handle_running_input(app, key.code),
        }
    }
    Ok(())
}

/// Model and environment steps.
fn handle_selection_input(app: &mut App, key_code: KeyCode) {
    match key_code {
        KeyCode::Char('q') | KeyCode::Esc => app.quit(),
        KeyCode::Char('r') => app.reload_catalog(),
        KeyCode::Up | KeyCode::Char('k') => app.cursor_up(),
        KeyCode::Down | KeyCode::Char('j') => app.cursor_down(),
        KeyCode::Enter | KeyCode::Char(' ') => app.select_current(),
        KeyCode::Right | KeyCode::Char('n') => app.next_step(),
        KeyCode::Left | KeyCode::Char('p') => app.previous_step(),
        _ => {}
    }
}

fn handle_tool_input(app: &mut App, key_code: KeyCode) {
    match key_code {
        KeyCode::Char('q') | KeyCode::Esc => app.quit(),
        KeyCode::Char('r') => app.reload_catalog(),
        KeyCode::Up | KeyCode::Char('k') => app.cursor_up(),
        KeyCode::Down | KeyCode::Char('j') => app.cursor_down(),
        KeyCode::Enter | KeyCode::Char(' ') => app.select_current(),
        KeyCode::Tab => app.toggle_tool_focus(),
        KeyCode::Char('s') => app.start_scan(),
        KeyCode::Left | KeyCode::Char('p') => app.previous_step(),
        _ => {}
    }
}

/// Promptmap directory field has focus: printable keys are text.
fn handle_directory_input(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Char(c) => app.push_directory_char(c),
        KeyCode::Backspace => app.pop_directory_char(),
        KeyCode::Tab | KeyCode::Esc => app.toggle_tool_focus(),
        KeyCode::Enter => app.start_scan(),
        _ => {}
    }
}

fn handle_running_input(app: &mut App, key_code: KeyCode) {
    match key_code {
        KeyCode::Char('q') | KeyCode::Esc => app.quit(),
        KeyCode::Char('n') => app.new_scan(),
        KeyCode::Up | KeyCode::Char('k') => app.scroll_output_up(),
        KeyCode::Down | KeyCode::Char('j') => app.scroll_output_down(),
        KeyCode::End | KeyCode::Char('G') => app.follow_output_tail(),
        KeyCode::Left | KeyCode::Char('p') => app.previous_step(),
        _ => {}
    }
}
