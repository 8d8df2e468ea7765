use std::io::{self, Stdout};
use std::path::Path;
use std::time::Duration;

use anyhow::{Context, Result};
use crossterm::event::{Event, EventStream};
use crossterm::terminal::{
    disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen,
};
use futures::StreamExt;
use ratatui::backend::CrosstermBackend;
use ratatui::Terminal;
use tokio::sync::mpsc;
use tracing::{error, info};

use rickmorty_browser::app::{App, FetchOutcome};
use rickmorty_browser::config::Config;
use rickmorty_browser::logging;
use rickmorty_browser::ui;

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file (ignored when absent)
    let _ = dotenvy::dotenv();

    let config = Config::from_env()?;
    let _logger = logging::init_logging(config.log_dir.as_deref().map(Path::new))?;

    info!(api_url = %config.api_url, "starting character browser");

    let tick = Duration::from_millis(config.tick_ms);
    let (mut app, mut outcomes) = App::new(config)?;
    app.start();

    let mut terminal = setup_terminal()?;
    let result = run(&mut terminal, &mut app, &mut outcomes, tick).await;
    restore_terminal(&mut terminal)?;

    if let Err(error) = &result {
        error!(%error, "event loop failed");
    }
    result
}

/// Draw, check the sentinel, then sleep on whichever wakes first: a key
/// event, a finished fetch or the animation ticker.
async fn run(
    terminal: &mut Terminal<CrosstermBackend<Stdout>>,
    app: &mut App,
    outcomes: &mut mpsc::UnboundedReceiver<FetchOutcome>,
    tick: Duration,
) -> Result<()> {
    let mut events = EventStream::new();
    let mut ticker = tokio::time::interval(tick);

    loop {
        terminal.draw(|frame| ui::render(frame, app))?;

        // The renderer just measured the viewport, so the sentinel check
        // sees current geometry.
        app.check_sentinel();

        tokio::select! {
            _ = ticker.tick() => app.on_tick(),
            outcome = outcomes.recv() => {
                if let Some(outcome) = outcome {
                    app.on_fetch_outcome(outcome);
                }
            }
            event = events.next() => match event {
                Some(Ok(Event::Key(key))) => app.on_key(key),
                Some(Ok(_)) => {} // resize redraws on the next iteration
                Some(Err(error)) => return Err(error).context("terminal event stream failed"),
                None => break,
            },
        }

        if app.should_quit {
            break;
        }
    }

    Ok(())
}

fn setup_terminal() -> Result<Terminal<CrosstermBackend<Stdout>>> {
    enable_raw_mode().context("Failed to enable raw mode")?;
    let mut stdout = io::stdout();
    crossterm::execute!(stdout, EnterAlternateScreen)
        .context("Failed to enter alternate screen")?;
    Terminal::new(CrosstermBackend::new(stdout)).context("Failed to create terminal")
}

fn restore_terminal(terminal: &mut Terminal<CrosstermBackend<Stdout>>) -> Result<()> {
    disable_raw_mode().context("Failed to disable raw mode")?;
    crossterm::execute!(terminal.backend_mut(), LeaveAlternateScreen)
        .context("Failed to leave alternate screen")?;
    terminal.show_cursor().context("Failed to restore cursor")
}
