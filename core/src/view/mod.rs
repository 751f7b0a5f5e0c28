//! Client-side derivations: render order, the hide-completed projection and
//! the edit-mode view state.

pub mod order;
pub mod state;

pub use order::{sort_incomplete_first, sorted_view, visible_tasks};
pub use state::{Mode, ViewError, ViewState};
