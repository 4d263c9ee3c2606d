//! livescroll-reader — a live-updating RSS feed reader for the terminal.
//!
//! ## Architecture overview
//!
//! ```text
//!                  Action                  Change
//! ┌──────────┐  (via main)  ┌───────────┐ (observer) ┌──────────┐  draw()  ┌──────────┐
//! │ input.rs │ ───────────► │ engine.rs │ ─────────► │  app.rs  │ ───────► │  ui.rs   │
//! └──────────┘              │ state.rs  │            │  (view)  │          │ (render) │
//!                           └───────────┘            └──────────┘          └──────────┘
//!                             ▲       │ spawn
//!                   EngineEvent│       ▼
//!                           ┌───────────┐
//!                           │  poll.rs  │──► source/ (proxy fetch + RSS parse)
//!                           └───────────┘
//! ```
//!
//! * **`source/`** — feed/post types, the proxy fetcher and the RSS parser.
//! * **`validate`** — checks a submitted URL before anything is fetched.
//! * **`state`** — the observable application state.
//! * **`engine`** — subscribes feeds, merges posts, runs the polling loop.
//! * **`poll`** — the concurrent polling cycle and its timer.
//! * **`app`** — the UI's copy of the state plus selection/focus/typing.
//! * **`ui`** — pure rendering: reads `App` state and draws widgets.
//! * **`input`** — maps key events to `App` changes and engine actions.
//! * **`main`** — wires everything together: parse args, set up logging and
//!   the terminal, and run the event loop.

mod app;
mod config;
mod engine;
mod error;
mod input;
mod logging;
mod poll;
mod source;
mod state;
mod ui;
mod validate;

use std::cell::RefCell;
use std::io;
use std::rc::Rc;
use std::sync::Arc;

use anyhow::Result;
use clap::Parser;
use crossterm::{
    event::{Event, EventStream, KeyEvent},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use futures::StreamExt;
use ratatui::backend::CrosstermBackend;
use ratatui::Terminal;
use tracing::{error, info};

use app::App;
use config::Config;
use engine::Engine;
use input::Action;
use source::{ProxyFetcher, RssParser};
use state::AddFeedStatus;

// ---------------------------------------------------------------------------
// RAII terminal guard — idiomatic cleanup even on panic
// ---------------------------------------------------------------------------

/// Manages terminal raw-mode and alternate-screen lifetime via [`Drop`].
///
/// Constructing this struct enters raw mode + alternate screen.  When the
/// value is dropped (normally or during stack unwinding) it restores the
/// terminal.
struct TerminalGuard {
    terminal: Terminal<CrosstermBackend<io::Stdout>>,
}

impl TerminalGuard {
    fn new() -> Result<Self> {
        enable_raw_mode()?;
        let mut stdout = io::stdout();
        execute!(stdout, EnterAlternateScreen)?;
        let backend = CrosstermBackend::new(stdout);
        let terminal = Terminal::new(backend)?;
        Ok(Self { terminal })
    }
}

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        let _ = disable_raw_mode();
        let _ = execute!(self.terminal.backend_mut(), LeaveAlternateScreen);
        let _ = self.terminal.show_cursor();
    }
}

/// Install a panic hook that restores the terminal before printing the
/// panic message.
fn install_panic_hook() {
    let original_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |info| {
        let _ = disable_raw_mode();
        let _ = execute!(io::stdout(), LeaveAlternateScreen);
        original_hook(info);
    }));
}

// ---------------------------------------------------------------------------
// Event loop
// ---------------------------------------------------------------------------

/// What woke the main loop.
enum Wake {
    Engine,
    Key(KeyEvent),
    OtherInput,
    InputClosed,
}

fn dispatch(engine: &mut Engine, action: Action) {
    match action {
        Action::Submit(url) => engine.add_feed(&url),
        Action::Open(guid) => {
            if let Err(err) = engine.open_post(&guid) {
                error!(%err, "cannot open post");
            }
        }
        Action::Close => engine.close_post(),
        Action::Refresh => engine.poll_all(),
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let config = Config::parse();
    logging::init(&config.log_file, &config.log_level)?;
    info!(proxy = %config.proxy, feeds = config.feeds.len(), "starting");

    // -- engine and view -----------------------------------------------------
    let fetcher = ProxyFetcher::new(&config.proxy)?;
    let mut engine = Engine::new(
        Arc::new(fetcher),
        Arc::new(RssParser::new()),
        config.poll_interval(),
    );

    let app = Rc::new(RefCell::new(App::new()));
    let view = Rc::clone(&app);
    engine.subscribe(move |change| view.borrow_mut().apply(change));

    // Feeds from the command line are submitted one at a time, as if typed.
    let mut startup = config.startup_feeds();

    // -- terminal setup (RAII — Drop restores on exit or panic) --------------
    install_panic_hook();
    let mut guard = TerminalGuard::new()?;
    let mut events = EventStream::new();

    engine.start_polling();

    loop {
        if engine.state().add_feed_status != AddFeedStatus::Sending {
            if let Some(url) = startup.pop_front() {
                engine.add_feed(&url);
            }
        }

        guard
            .terminal
            .draw(|f| ui::draw(&mut app.borrow_mut(), f))?;

        let wake = tokio::select! {
            () = engine.step() => Wake::Engine,
            event = events.next() => match event {
                Some(Ok(Event::Key(key))) => Wake::Key(key),
                Some(Ok(_)) => Wake::OtherInput,
                Some(Err(e)) => return Err(e.into()),
                None => Wake::InputClosed,
            },
        };

        match wake {
            Wake::Engine | Wake::OtherInput => {}
            Wake::Key(key) => {
                let action = input::handle_key_event(&mut app.borrow_mut(), key);
                if let Some(action) = action {
                    dispatch(&mut engine, action);
                }
            }
            Wake::InputClosed => break,
        }

        if app.borrow().quit {
            break;
        }
    }

    engine.stop_polling();
    info!("exiting");
    // `guard` is dropped here, restoring the terminal.
    Ok(())
}
