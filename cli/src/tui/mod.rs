mod app;
mod events;
mod loop_run;
mod terminal;
mod ui;

pub use app::{Action, StatusLine, TuiApp};
pub use loop_run::{run_on_terminal, run_tui};
pub use terminal::{check_tui_support, restore_terminal, setup_terminal, TuiTerminal};
