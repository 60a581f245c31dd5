use std::io;
use std::sync::Arc;

use anyhow::Context;
use client::{HttpTransport, TodoClient};
use crossterm::event::{self, Event};
use crossterm::execute;
use crossterm::terminal::{
    disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen,
};
use ratatui::backend::CrosstermBackend;
use ratatui::Terminal;
use tokio::sync::mpsc;
use tokio::time::{interval, Duration};

mod app;
mod ui;

use app::{App, UiMessage};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = shared::Config::from_env()
        .map_err(|e| anyhow::anyhow!("failed to load config: {e}"))?;
    shared::init_tracing(&config.log_file)
        .map_err(|e| anyhow::anyhow!("failed to init tracing: {e}"))?;

    tracing::info!(
        endpoint = %config.graphql_url,
        environment = %config.environment,
        "Starting todo-tui"
    );

    let transport = HttpTransport::new(&config.graphql_url);
    let client = TodoClient::new(Arc::new(transport));

    enable_raw_mode().context("failed to enable raw mode")?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen).context("failed to enter alternate screen")?;
    let mut terminal = Terminal::new(CrosstermBackend::new(stdout))?;

    let result = run(&mut terminal, client).await;

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    result
}

async fn run(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    client: TodoClient,
) -> anyhow::Result<()> {
    let (messages_tx, mut messages_rx) = mpsc::unbounded_channel::<UiMessage>();
    let mut watch_rx = client.watch_todos();
    let mut app = App::new(client, messages_tx);
    let mut input_rx = spawn_input_thread();
    let mut tick = interval(Duration::from_millis(100));

    loop {
        terminal.draw(|f| ui::render(f, &app))?;

        tokio::select! {
            maybe_event = input_rx.recv() => {
                let Some(event) = maybe_event else { break };
                app.handle_event(event);
            }
            changed = watch_rx.changed() => {
                if changed.is_err() {
                    break;
                }
                let state = watch_rx.borrow().clone();
                app.on_query_state(state);
            }
            maybe_message = messages_rx.recv() => {
                if let Some(message) = maybe_message {
                    app.on_message(message);
                }
            }
            _ = tick.tick() => app.on_tick(),
        }

        if app.should_quit {
            break;
        }
    }

    Ok(())
}

/// crosstermのブロッキングreadを専用スレッドで回し、チャネルへ転送する
fn spawn_input_thread() -> mpsc::UnboundedReceiver<Event> {
    let (tx, rx) = mpsc::unbounded_channel();
    std::thread::spawn(move || loop {
        match event::read() {
            Ok(event) => {
                if tx.send(event).is_err() {
                    break;
                }
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to read terminal event");
                break;
            }
        }
    });
    rx
}
