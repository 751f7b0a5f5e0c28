//! Task Client: a disposable cache of the store's task list plus view state.
//!
//! Write policy: every write is followed by a full `list()` resync instead of
//! patching the cache with the response. Single delete is the exception; the
//! record is dropped from the cache directly since nothing else can change.

use anyhow::Context;
use futures::future::join_all;
use thiserror::Error;

use super::r#trait::TaskApi;
use crate::error::TaskError;
use crate::model::{normalize_text, Task, TaskId};
use crate::view::ViewState;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AddOutcome {
    /// Blank input; nothing was sent.
    Rejected,
    Added(Task),
}

/// Why one delete of a bulk delete did not go through.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DeleteFailure {
    #[error("already deleted")]
    AlreadyDeleted,
    #[error("{0}")]
    Other(String),
}

impl DeleteFailure {
    /// A store-side `NotFound` anywhere in the chain means someone else got there first.
    pub fn from_error(err: &anyhow::Error) -> Self {
        let not_found = err
            .chain()
            .any(|cause| matches!(cause.downcast_ref::<TaskError>(), Some(TaskError::NotFound(_))));
        if not_found {
            Self::AlreadyDeleted
        } else {
            Self::Other(format!("{err:#}"))
        }
    }
}

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct BulkDeleteReport {
    pub deleted: Vec<TaskId>,
    pub failed: Vec<(TaskId, DeleteFailure)>,
}

impl BulkDeleteReport {
    pub fn is_clean(&self) -> bool {
        self.failed.is_empty()
    }

    pub fn already_deleted(&self) -> impl Iterator<Item = &TaskId> {
        self.failed
            .iter()
            .filter(|(_, why)| *why == DeleteFailure::AlreadyDeleted)
            .map(|(id, _)| id)
    }
}

pub struct TaskClient<A> {
    api: A,
    tasks: Vec<Task>,
    view: ViewState,
}

impl<A: TaskApi> TaskClient<A> {
    pub fn new(api: A) -> Self {
        Self {
            api,
            tasks: Vec::new(),
            view: ViewState::new(),
        }
    }

    pub fn api(&self) -> &A {
        &self.api
    }

    /// Cached records as last received from the store.
    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    pub fn view(&self) -> &ViewState {
        &self.view
    }

    /// Render order with the hide-completed projection applied.
    pub fn visible(&self) -> Vec<&Task> {
        self.view.visible(&self.tasks)
    }

    pub fn find(&self, id: &TaskId) -> Option<&Task> {
        self.tasks.iter().find(|t| &t.id == id)
    }

    pub async fn load(&mut self) -> anyhow::Result<()> {
        match self.api.list().await {
            Ok(tasks) => {
                tracing::debug!(target: "tasklist.client", stage = "load", count = tasks.len());
                self.tasks = tasks;
                self.view.prune_selection(&self.tasks);
                Ok(())
            }
            Err(e) => {
                tracing::warn!(target: "tasklist.client", stage = "load", error = %e, "Error fetching tasks");
                Err(e)
            }
        }
    }

    pub async fn add(&mut self, text: &str) -> anyhow::Result<AddOutcome> {
        let Some(text) = normalize_text(text) else {
            return Ok(AddOutcome::Rejected);
        };
        let task = self.api.create(text).await.inspect_err(|e| {
            tracing::warn!(target: "tasklist.client", stage = "add", error = %e, "Error adding task");
        })?;
        self.load()
            .await
            .with_context(|| format!("task {} created but resync failed", task.id))?;
        Ok(AddOutcome::Added(task))
    }

    /// Flips `completed` of a cached task on the store, then resyncs.
    pub async fn toggle(&mut self, id: &TaskId) -> anyhow::Result<Task> {
        let completed = self
            .find(id)
            .map(|t| t.completed)
            .with_context(|| format!("task {id} is not in the local list"))?;
        let updated = self.api.update(id, !completed).await.inspect_err(|e| {
            tracing::warn!(target: "tasklist.client", stage = "toggle", id = %id, error = %e, "Error updating task");
        })?;
        self.load()
            .await
            .with_context(|| format!("task {id} updated but resync failed"))?;
        Ok(updated)
    }

    pub async fn delete(&mut self, id: &TaskId) -> anyhow::Result<()> {
        self.api.delete(id).await.inspect_err(|e| {
            tracing::warn!(target: "tasklist.client", stage = "delete", id = %id, error = %e, "Error deleting task");
        })?;
        self.tasks.retain(|t| &t.id != id);
        self.view.deselect(id);
        Ok(())
    }

    /// Deletes every selected task, resyncs once and clears the selection.
    ///
    /// Deletes are issued concurrently; one failing does not stop the rest.
    pub async fn bulk_delete(&mut self) -> anyhow::Result<BulkDeleteReport> {
        let ids = self.view.take_selection()?;
        let api = &self.api;
        let results = join_all(ids.iter().map(|id| api.delete(id))).await;

        let mut report = BulkDeleteReport::default();
        for (id, res) in ids.into_iter().zip(results) {
            match res {
                Ok(()) => report.deleted.push(id),
                Err(e) => {
                    tracing::warn!(target: "tasklist.client", stage = "bulk_delete", id = %id, error = %e, "Error deleting task");
                    report.failed.push((id, DeleteFailure::from_error(&e)));
                }
            }
        }
        tracing::info!(
            target: "tasklist.client",
            stage = "bulk_delete",
            deleted = report.deleted.len(),
            failed = report.failed.len()
        );

        if let Err(e) = self.load().await {
            // the deleted ones are gone either way
            self.tasks.retain(|t| !report.deleted.contains(&t.id));
            return Err(e.context("bulk delete finished but resync failed"));
        }
        Ok(report)
    }

    pub fn toggle_menu(&mut self) {
        self.view.toggle_menu();
    }

    pub fn close_menu(&mut self) {
        self.view.close_menu();
    }

    pub fn enter_edit(&mut self) {
        self.view.enter_edit();
    }

    pub fn cancel_edit(&mut self) {
        self.view.cancel_edit();
    }

    pub fn toggle_edit(&mut self) {
        self.view.toggle_edit();
    }

    pub fn toggle_hide_completed(&mut self) {
        self.view.toggle_hide_completed(&self.tasks);
    }

    pub fn toggle_select(&mut self, id: &TaskId) -> anyhow::Result<bool> {
        Ok(self.view.toggle_select(id, &self.tasks)?)
    }

    pub fn toggle_select_all(&mut self) -> anyhow::Result<()> {
        Ok(self.view.toggle_select_all(&self.tasks)?)
    }

    pub fn all_selected(&self) -> bool {
        self.view.all_selected(&self.tasks)
    }
}
