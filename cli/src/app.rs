//! CLI 应用装配层：把命令行覆盖项合并进配置，并在 serve / TUI / 单次命令之间分发。
use crate::commands::cli::{Args, Commands, ServeArgs, StoreKindArg};
use crate::commands::tasks;
use crate::{http, tui};
use tasklist_core::api as core_api;

/// 全局覆盖项：`--api-url` 优先于配置文件与环境变量
pub fn apply_global_overrides(cfg: &mut core_api::AppConfig, args: &Args) {
    if let Some(url) = args.api_url.as_deref().map(str::trim).filter(|s| !s.is_empty()) {
        cfg.client.base_url = url.to_string();
    }
}

pub fn apply_serve_overrides(cfg: &mut core_api::AppConfig, serve: &ServeArgs) {
    if let Some(host) = &serve.host {
        cfg.server.host = host.clone();
    }
    if let Some(port) = serve.port {
        cfg.server.port = port;
    }
    if let Some(kind) = serve.store {
        cfg.store.kind = match kind {
            StoreKindArg::File => core_api::StoreKind::File,
            StoreKindArg::Memory => core_api::StoreKind::Memory,
        };
    }
    if let Some(path) = &serve.store_path {
        cfg.store.path = path.clone();
    }
}

/// Whether the chosen command takes over the terminal.
pub fn is_tui_command(cmd: Option<&Commands>) -> bool {
    matches!(cmd, None | Some(Commands::Tui))
}

#[tracing::instrument(name = "cli.run_app", skip(args, ctx))]
pub async fn run_app_with_config(
    mut args: Args,
    ctx: &core_api::AppContext,
) -> Result<i32, core_api::CliError> {
    let mut cfg = ctx.cfg().clone();
    apply_global_overrides(&mut cfg, &args);

    let mut stdout = std::io::stdout();
    match args.command.take() {
        Some(Commands::Serve(serve)) => {
            apply_serve_overrides(&mut cfg, &serve);
            http::handle_serve(&ctx.with_config(cfg)).await?;
            Ok(0)
        }
        None | Some(Commands::Tui) => {
            tui::run_tui(&cfg).await?;
            Ok(0)
        }
        Some(Commands::List(list)) => {
            let mut client = tasks::connect(&cfg.client).await?;
            tasks::handle_list(&mut client, &list, &mut stdout)?;
            Ok(0)
        }
        Some(Commands::Add(add)) => {
            let mut client = tasks::connect(&cfg.client).await?;
            tasks::handle_add(&mut client, &add, &mut stdout).await?;
            Ok(0)
        }
        Some(Commands::Toggle(toggle)) => {
            let mut client = tasks::connect(&cfg.client).await?;
            tasks::handle_toggle(&mut client, &toggle, &mut stdout).await?;
            Ok(0)
        }
        Some(Commands::Rm(rm)) => {
            let mut client = tasks::connect(&cfg.client).await?;
            tasks::handle_rm(&mut client, &rm, &mut stdout).await?;
            Ok(0)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[test]
    fn test_api_url_override() {
        let args = Args::parse_from(["tasklist", "--api-url", " http://h:9 ", "list"]);
        let mut cfg = core_api::AppConfig::default();
        apply_global_overrides(&mut cfg, &args);
        assert_eq!(cfg.client.base_url, "http://h:9");
    }

    #[test]
    fn test_serve_overrides_only_touch_given_fields() {
        let mut cfg = core_api::AppConfig::default();
        let serve = ServeArgs {
            port: Some(7000),
            store: Some(StoreKindArg::Memory),
            ..Default::default()
        };
        apply_serve_overrides(&mut cfg, &serve);
        assert_eq!(cfg.server.port, 7000);
        assert_eq!(cfg.server.host, "127.0.0.1");
        assert_eq!(cfg.store.kind, core_api::StoreKind::Memory);
        assert_eq!(cfg.store.path, "~/.tasklist/tasks.json");
    }

    #[test]
    fn test_tui_is_default_command() {
        assert!(is_tui_command(None));
        assert!(is_tui_command(Some(&Commands::Tui)));
        assert!(!is_tui_command(Some(&Commands::Serve(ServeArgs::default()))));
    }
}
