//! View state of the client: one structure with defined transitions instead of
//! independent `edit_mode` / `menu_open` / `selected` flags.
//!
//! Selection lives inside [`Mode::Editing`], so a non-empty selection outside
//! edit mode cannot be represented. Selection is keyed by [`TaskId`], never
//! by position, and is pruned to the visible set whenever what is visible
//! may have changed.

use std::collections::{BTreeSet, HashSet};

use thiserror::Error;

use super::order::visible_tasks;
use crate::model::{Task, TaskId};

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ViewError {
    #[error("selection requires edit mode")]
    NotEditing,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Mode {
    Normal { menu_open: bool },
    Editing { selected: BTreeSet<TaskId> },
}

impl Default for Mode {
    fn default() -> Self {
        Mode::Normal { menu_open: false }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ViewState {
    mode: Mode,
    hide_completed: bool,
}

impl ViewState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn mode(&self) -> &Mode {
        &self.mode
    }

    pub fn is_editing(&self) -> bool {
        matches!(self.mode, Mode::Editing { .. })
    }

    pub fn menu_open(&self) -> bool {
        matches!(self.mode, Mode::Normal { menu_open: true })
    }

    pub fn hide_completed(&self) -> bool {
        self.hide_completed
    }

    pub fn visible<'a>(&self, tasks: &'a [Task]) -> Vec<&'a Task> {
        visible_tasks(tasks, self.hide_completed)
    }

    pub fn toggle_menu(&mut self) {
        if let Mode::Normal { menu_open } = &mut self.mode {
            *menu_open = !*menu_open;
        }
    }

    pub fn close_menu(&mut self) {
        if let Mode::Normal { menu_open } = &mut self.mode {
            *menu_open = false;
        }
    }

    /// Normal → Editing with an empty selection.
    pub fn enter_edit(&mut self) {
        self.mode = Mode::Editing {
            selected: BTreeSet::new(),
        };
    }

    /// Editing → Normal, dropping the selection.
    pub fn cancel_edit(&mut self) {
        self.mode = Mode::default();
    }

    pub fn toggle_edit(&mut self) {
        if self.is_editing() {
            self.cancel_edit();
        } else {
            self.enter_edit();
        }
    }

    pub fn toggle_hide_completed(&mut self, tasks: &[Task]) {
        self.hide_completed = !self.hide_completed;
        self.close_menu();
        self.prune_selection(tasks);
    }

    pub fn selected(&self) -> Option<&BTreeSet<TaskId>> {
        match &self.mode {
            Mode::Editing { selected } => Some(selected),
            Mode::Normal { .. } => None,
        }
    }

    pub fn is_selected(&self, id: &TaskId) -> bool {
        self.selected().is_some_and(|s| s.contains(id))
    }

    /// Returns whether `id` is selected afterwards. Ids that are not visible
    /// are ignored and report `false`.
    pub fn toggle_select(&mut self, id: &TaskId, tasks: &[Task]) -> Result<bool, ViewError> {
        let visible = self.visible_ids(tasks);
        let Mode::Editing { selected } = &mut self.mode else {
            return Err(ViewError::NotEditing);
        };
        if !visible.contains(id) {
            return Ok(false);
        }
        if selected.remove(id) {
            Ok(false)
        } else {
            selected.insert(id.clone());
            Ok(true)
        }
    }

    /// Whether every visible task is selected (drives the Select/Deselect All label).
    pub fn all_selected(&self, tasks: &[Task]) -> bool {
        let visible = self.visible_ids(tasks);
        match &self.mode {
            Mode::Editing { selected } => visible.len() == selected.len()
                && selected.iter().all(|id| visible.contains(id)),
            Mode::Normal { .. } => false,
        }
    }

    /// Toggles between the empty set and every currently visible id.
    pub fn toggle_select_all(&mut self, tasks: &[Task]) -> Result<(), ViewError> {
        let all = self.all_selected(tasks);
        let visible = self.visible_ids(tasks);
        let Mode::Editing { selected } = &mut self.mode else {
            return Err(ViewError::NotEditing);
        };
        if all {
            selected.clear();
        } else {
            *selected = visible.into_iter().cloned().collect();
        }
        Ok(())
    }

    /// Drops selected ids that are no longer visible (deleted, filtered out).
    pub fn prune_selection(&mut self, tasks: &[Task]) {
        let visible: HashSet<TaskId> = self.visible_ids(tasks).into_iter().cloned().collect();
        if let Mode::Editing { selected } = &mut self.mode {
            selected.retain(|id| visible.contains(id));
        }
    }

    pub fn deselect(&mut self, id: &TaskId) {
        if let Mode::Editing { selected } = &mut self.mode {
            selected.remove(id);
        }
    }

    /// Empties the selection and hands it over; edit mode stays on.
    pub fn take_selection(&mut self) -> Result<Vec<TaskId>, ViewError> {
        match &mut self.mode {
            Mode::Editing { selected } => Ok(std::mem::take(selected).into_iter().collect()),
            Mode::Normal { .. } => Err(ViewError::NotEditing),
        }
    }

    fn visible_ids<'a>(&self, tasks: &'a [Task]) -> HashSet<&'a TaskId> {
        self.visible(tasks).into_iter().map(|t| &t.id).collect()
    }
}
