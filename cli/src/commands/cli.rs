use clap::{Args as ClapArgs, Parser, Subcommand};

#[derive(clap::ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreKindArg {
    File,
    Memory,
}

#[derive(Parser, Debug)]
#[command(name = "tasklist", version, about = "Minimal task list: store server and client")]
pub struct Args {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Explicit config file; skips the default lookup order.
    #[arg(long, global = true)]
    pub config: Option<String>,

    /// Base URL of the task store (overrides `client.base_url`).
    #[arg(long, global = true)]
    pub api_url: Option<String>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Serve the task store over HTTP.
    Serve(ServeArgs),
    /// Interactive terminal client (the default when no command is given).
    Tui,
    /// Print the task list in render order.
    List(ListArgs),
    /// Create a task.
    Add(AddArgs),
    /// Flip the completion state of a task.
    Toggle(ToggleArgs),
    /// Delete one or more tasks.
    Rm(RmArgs),
}

#[derive(ClapArgs, Debug, Clone, Default)]
pub struct ServeArgs {
    #[arg(long)]
    pub host: Option<String>,

    #[arg(long)]
    pub port: Option<u16>,

    #[arg(long, value_enum)]
    pub store: Option<StoreKindArg>,

    #[arg(long)]
    pub store_path: Option<String>,
}

#[derive(ClapArgs, Debug, Clone)]
pub struct ListArgs {
    #[arg(long)]
    pub hide_completed: bool,
}

#[derive(ClapArgs, Debug, Clone)]
pub struct AddArgs {
    /// Words are joined with single spaces.
    #[arg(required = true, trailing_var_arg = true)]
    pub text: Vec<String>,
}

#[derive(ClapArgs, Debug, Clone)]
pub struct ToggleArgs {
    pub id: String,
}

#[derive(ClapArgs, Debug, Clone)]
pub struct RmArgs {
    #[arg(required = true)]
    pub ids: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_serve_overrides() {
        let args = Args::parse_from([
            "tasklist", "serve", "--port", "8081", "--store", "memory",
        ]);
        match args.command {
            Some(Commands::Serve(serve)) => {
                assert_eq!(serve.port, Some(8081));
                assert_eq!(serve.store, Some(StoreKindArg::Memory));
                assert!(serve.host.is_none());
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn test_parse_add_collects_words() {
        let args = Args::parse_from(["tasklist", "add", "buy", "milk"]);
        match args.command {
            Some(Commands::Add(add)) => assert_eq!(add.text, vec!["buy", "milk"]),
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn test_global_api_url_after_subcommand() {
        let args = Args::parse_from(["tasklist", "list", "--api-url", "http://x:1"]);
        assert_eq!(args.api_url.as_deref(), Some("http://x:1"));
        assert!(matches!(
            args.command,
            Some(Commands::List(ListArgs {
                hide_completed: false
            }))
        ));
    }

    #[test]
    fn test_no_command_defaults_to_none() {
        let args = Args::parse_from(["tasklist"]);
        assert!(args.command.is_none());
    }

    #[test]
    fn test_rm_requires_ids() {
        assert!(Args::try_parse_from(["tasklist", "rm"]).is_err());
    }
}
