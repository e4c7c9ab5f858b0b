//! App — the message-driven update loop.
//!
//! Architecture:
//! - The main task exclusively owns the widget stack; one message is
//!   processed to completion before the next, so no two `update` calls
//!   ever overlap and the rendered state always matches the last message.
//! - A `tokio::mpsc` channel carries `Msg` values in from background tasks;
//!   completions land in completion order.
//! - Widgets return a `Transition`; effects are spawned with a clone of the
//!   sender and re-enter the loop as messages. Nothing awaits inside
//!   `update` or `render`.

use std::io;
use std::sync::Arc;
use std::time::Duration;

use ratatui::crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use ratatui::crossterm::execute;
use ratatui::crossterm::terminal::{
    disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen,
};
use ratatui::backend::CrosstermBackend;
use ratatui::Terminal;
use tokio::sync::mpsc;
use tokio::time::{interval, Interval, MissedTickBehavior};
use tracing::{debug, error, info};

use mal_core::config::Config;
use mal_core::session;

use crate::message::{effect, Effect, Msg};
use crate::widget::{Transition, WidgetStack};
use crate::widgets::init::InitScreen;
use crate::widgets::status_line::StatusLine;
use crate::widgets::watching::WatchingList;

type Tui = Terminal<CrosstermBackend<io::Stdout>>;

pub struct App {
    config: Config,
    stack: WidgetStack,
    should_quit: bool,
}

impl App {
    pub fn new(config: Config) -> Self {
        let mut stack = WidgetStack::new();
        // Root widget: stays at the bottom for the whole run, so the stack
        // is never empty.
        stack.push(Box::new(InitScreen));
        Self {
            config,
            stack,
            should_quit: false,
        }
    }

    pub async fn run(mut self) -> anyhow::Result<()> {
        debug!("enabling raw mode");
        enable_raw_mode()?;
        let mut stdout = io::stdout();
        execute!(stdout, EnterAlternateScreen)?;
        let backend = CrosstermBackend::new(stdout);
        let mut terminal = Terminal::new(backend)?;

        let (tx, rx) = mpsc::channel::<Msg>(1024);

        // ── Background task: keyboard events ──────────────────────────────
        let key_tx = tx.clone();
        tokio::task::spawn_blocking(move || loop {
            match event::read() {
                Ok(Event::Key(key)) if key.kind == KeyEventKind::Press => {
                    if key_tx.blocking_send(Msg::Key(key)).is_err() {
                        break;
                    }
                }
                Ok(_) => {}
                Err(_) => break,
            }
        });

        // ── Session bootstrap (token store, else the full OAuth flow) ─────
        let config = self.config.clone();
        spawn_effect(
            &tx,
            effect(async move {
                Msg::SessionReady(session::establish(&config).await.map(Arc::new))
            }),
        );

        // Spinner animation pulse.
        let mut tick = interval(Duration::from_millis(100));
        tick.set_missed_tick_behavior(MissedTickBehavior::Skip);

        let result = self.event_loop(&mut terminal, tx, rx, &mut tick).await;

        disable_raw_mode()?;
        execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
        terminal.show_cursor()?;

        result
    }

    async fn event_loop(
        &mut self,
        terminal: &mut Tui,
        tx: mpsc::Sender<Msg>,
        mut rx: mpsc::Receiver<Msg>,
        tick: &mut Interval,
    ) -> anyhow::Result<()> {
        loop {
            terminal.draw(|f| self.stack.render(f, f.area()))?;

            if self.should_quit {
                info!("quit requested");
                return Ok(());
            }

            let fatal = tokio::select! {
                Some(msg) = rx.recv() => self.handle_message(msg, &tx),
                _ = tick.tick() => self.handle_message(Msg::Tick, &tx),
            };

            if let Some(err) = fatal {
                error!("fatal: {err}");
                return Err(err.into());
            }
        }
    }

    /// Process one message. Returns the error that should take the process
    /// down, if any.
    fn handle_message(&mut self, msg: Msg, tx: &mpsc::Sender<Msg>) -> Option<mal_core::Error> {
        match msg {
            Msg::Key(key) if is_quit(&key) => {
                self.should_quit = true;
                None
            }
            Msg::SessionReady(Ok(client)) => {
                info!("session established, entering the watching list");
                self.stack
                    .push(Box::new(StatusLine::new(Box::new(WatchingList::new(client)))));
                let transition = self.stack.init();
                self.dispatch(transition, tx)
            }
            Msg::SessionReady(Err(e)) => Some(e),
            other => {
                let transition = self.stack.update(other);
                self.dispatch(transition, tx)
            }
        }
    }

    fn dispatch(&mut self, transition: Transition, tx: &mpsc::Sender<Msg>) -> Option<mal_core::Error> {
        match transition {
            Transition::Continue => None,
            Transition::Run(effect) => {
                spawn_effect(tx, effect);
                None
            }
            Transition::Fail(e) => Some(e),
        }
    }
}

fn spawn_effect(tx: &mpsc::Sender<Msg>, effect: Effect) {
    let tx = tx.clone();
    tokio::spawn(async move {
        let msg = effect.await;
        let _ = tx.send(msg).await;
    });
}

fn is_quit(key: &KeyEvent) -> bool {
    matches!(key.code, KeyCode::Char('q'))
        || (key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL))
}
