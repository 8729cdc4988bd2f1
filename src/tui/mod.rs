//! TUI module - live shipment timeline
//!
//! Watch mode renders one product's journey and keeps it fresh from the
//! background poller. Poll updates arrive over a channel and go through the
//! tracker, so a failed or stale refresh never blanks the display.

use crate::tracker::{PollUpdate, ShipmentTracker};
use crate::Result;
use crossterm::{
    event::{self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::{
    Terminal,
    backend::{Backend, CrosstermBackend},
};
use std::io;
use std::time::Duration;
use tokio::sync::mpsc;

pub mod app;
pub mod ui;

use app::App;

/// Run the TUI application
pub fn run(tracker: ShipmentTracker, update_receiver: mpsc::Receiver<PollUpdate>) -> Result<()> {
    // Setup terminal
    enable_raw_mode().map_err(|e| crate::Error::Tui(e.to_string()))?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)
        .map_err(|e| crate::Error::Tui(e.to_string()))?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend).map_err(|e| crate::Error::Tui(e.to_string()))?;

    // Create app and run
    let app = App::new(tracker);
    let res = run_app(&mut terminal, app, update_receiver);

    // Restore terminal
    disable_raw_mode().map_err(|e| crate::Error::Tui(e.to_string()))?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )
    .map_err(|e| crate::Error::Tui(e.to_string()))?;
    terminal
        .show_cursor()
        .map_err(|e| crate::Error::Tui(e.to_string()))?;

    res
}

fn run_app<B: Backend>(
    terminal: &mut Terminal<B>,
    mut app: App,
    mut update_receiver: mpsc::Receiver<PollUpdate>,
) -> Result<()> {
    loop {
        // Drain poll updates; the tracker discards stale ones
        while let Ok(update) = update_receiver.try_recv() {
            app.apply_update(update);
        }

        terminal
            .draw(|f| ui::draw(f, &mut app))
            .map_err(|e| crate::Error::Tui(e.to_string()))?;

        if event::poll(Duration::from_millis(100)).map_err(|e| crate::Error::Tui(e.to_string()))?
            && let Event::Key(key) = event::read().map_err(|e| crate::Error::Tui(e.to_string()))?
        {
            match key.code {
                KeyCode::Char('q') | KeyCode::Esc => {
                    app.quit();
                }
                KeyCode::Up => {
                    app.select_previous();
                }
                KeyCode::Down => {
                    app.select_next();
                }
                _ => {}
            }
        }

        if app.should_quit {
            // Dropping the receiver stops the poller; any in-flight fetch
            // result is discarded on arrival.
            return Ok(());
        }
    }
}
