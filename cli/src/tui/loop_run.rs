use std::time::Duration;

use tasklist_core::api::{AppConfig, CliError, TaskApi, TaskClient};
use tasklist_plugins::factory::build_api;

use super::app::{Action, StatusLine, TuiApp};
use super::events::{InputEvent, InputReader};
use super::terminal::{check_tui_support, restore_terminal, setup_terminal, TuiTerminal};
use super::ui;

/// Interactive client against the configured store.
pub async fn run_tui(cfg: &AppConfig) -> Result<(), CliError> {
    check_tui_support().map_err(CliError::Tui)?;
    let api = build_api(&cfg.client).map_err(|e| CliError::Client(format!("{e:#}")))?;
    let mut client = TaskClient::new(api);
    let mut app = TuiApp::new(cfg.tui.clone());

    tracing::info!(base_url = %client.api().base_url(), "TUI starting");
    let mut terminal = setup_terminal().map_err(CliError::Tui)?;
    let result = run_on_terminal(&mut terminal, &mut app, &mut client).await;
    restore_terminal(&mut terminal);
    result
}

pub async fn run_on_terminal<A: TaskApi>(
    terminal: &mut TuiTerminal,
    app: &mut TuiApp,
    client: &mut TaskClient<A>,
) -> Result<(), CliError> {
    let (input_reader, mut input_rx) = InputReader::start();
    let mut tick = tokio::time::interval(Duration::from_millis(app.config.tick_ms.max(16)));

    // initial load; failure leaves an empty list and an error on the status line
    if let Err(e) = client.load().await {
        app.status = StatusLine::Error(format!("{e:#}"));
    }

    let result = loop {
        if let Err(e) = terminal.draw(|f| ui::draw(f, app, client)) {
            break Err(CliError::Tui(e.to_string()));
        }
        if app.should_quit {
            break Ok(());
        }

        tokio::select! {
            Some(input_event) = input_rx.recv() => {
                if let InputEvent::Key(key) = input_event {
                    let action = app.handle_key(key, client);
                    if action != Action::None {
                        tracing::debug!(?action, "TUI action");
                    }
                    app.perform(action, client).await;
                }
            }
            _ = tick.tick() => {}
        }
    };

    tracing::debug!("Exiting TUI loop");
    input_reader.stop();
    result
}
