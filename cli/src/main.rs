use clap::Parser;
use std::path::Path;
use std::sync::Arc;
use tasklist_cli::app;
use tasklist_cli::commands::cli;
use tasklist_core::api::{AppContext, CliError, LoggingConfig};
use tasklist_plugins::services::PluginRepositoryFactory;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

static LOG_GUARD: std::sync::OnceLock<tracing_appender::non_blocking::WorkerGuard> =
    std::sync::OnceLock::new();

#[tokio::main]
async fn main() {
    let exit = match real_main().await {
        Ok(code) => code,
        Err(e) => {
            eprintln!("{e}");
            exit_code_for_error(&e)
        }
    };

    std::process::exit(exit);
}

async fn real_main() -> Result<i32, CliError> {
    let args = cli::Args::parse();
    let cfg = tasklist_core::api::load(args.config.as_deref().map(Path::new))
        .map_err(|e| CliError::Config(format!("{e:#}")))?;

    // the TUI owns the screen, so console logging would corrupt it
    let console_allowed = !app::is_tui_command(args.command.as_ref());
    init_tracing(&cfg.logging, console_allowed).map_err(CliError::Config)?;

    let ctx = AppContext::new(cfg, Some(Arc::new(PluginRepositoryFactory)));
    app::run_app_with_config(args, &ctx).await
}

fn exit_code_for_error(e: &CliError) -> i32 {
    // 0: success
    // 11: config error
    // 20: server start / IO error
    // 30: task api error
    // 50: internal/uncategorized
    match e {
        CliError::Config(_) => 11,
        CliError::Server(_) => 20,
        CliError::Io(_) => 20,
        CliError::Client(_) => 30,
        CliError::Tui(_) => 50,
    }
}

fn init_tracing(logging: &LoggingConfig, console_allowed: bool) -> Result<(), String> {
    if !logging.enabled {
        return Ok(());
    }

    let filter = match std::env::var("RUST_LOG") {
        Ok(v) if !v.trim().is_empty() => EnvFilter::from_default_env(),
        _ => EnvFilter::try_new(logging.level.clone()).map_err(|e| e.to_string())?,
    };

    let mut maybe_writer = None;

    if logging.file {
        let dir = match logging
            .directory
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
        {
            Some(d) => std::path::PathBuf::from(d),
            None => std::env::temp_dir().join("tasklist"),
        };

        std::fs::create_dir_all(&dir).map_err(|e| format!("create log dir failed: {e}"))?;
        let appender = tracing_appender::rolling::daily(dir, "tasklist.log");
        let (non_blocking, guard) = tracing_appender::non_blocking(appender);
        let _ = LOG_GUARD.set(guard);
        maybe_writer = Some(non_blocking);
    }

    let console = logging.console && console_allowed;
    if !console && maybe_writer.is_none() {
        return Ok(());
    }

    let console_layer = console.then(|| {
        tracing_subscriber::fmt::layer()
            .with_writer(std::io::stderr)
            .with_ansi(atty::is(atty::Stream::Stderr))
    });

    let file_layer = maybe_writer.map(|w| {
        tracing_subscriber::fmt::layer()
            .with_writer(w)
            .with_ansi(false)
    });

    tracing_subscriber::registry()
        .with(filter)
        .with(console_layer)
        .with(file_layer)
        .init();

    Ok(())
}
