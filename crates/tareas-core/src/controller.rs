//! The sync loop: every mutation goes to
//! the service first and is only visible
//! once a full reload brings it back.
//! Nothing is patched locally.

use std::cell::RefCell;

use tareas_shared::{
  Task,
  TaskId
};
use tracing::{
  debug,
  info,
  warn
};

use crate::error::ClientError;
use crate::remote::TaskRemote;
use crate::state::{
  AppState,
  Filter
};
use crate::view::{
  EMPTY_TITLE_MESSAGE,
  ViewModel
};

/// Where view models and blocking
/// notifications end up.
pub trait Surface {
  fn present(&self, view: ViewModel);

  fn alert(&self, message: &str);
}

pub struct SyncController<R, S> {
  remote:  R,
  surface: S,
  state:   RefCell<AppState>
}

impl<R, S> SyncController<R, S>
where
  R: TaskRemote,
  S: Surface
{
  pub fn new(
    remote: R,
    surface: S,
    api_base: impl Into<String>
  ) -> Self {
    Self {
      remote,
      surface,
      state: RefCell::new(
        AppState::new(api_base)
      )
    }
  }

  pub fn view(&self) -> ViewModel {
    ViewModel::project(
      &self.state.borrow()
    )
  }

  pub fn tasks(&self) -> Vec<Task> {
    self.state.borrow().tasks().to_vec()
  }

  pub fn filter(&self) -> Filter {
    self.state.borrow().filter
  }

  /// Maps a rendered row key back to
  /// the id of a cached task.
  pub fn resolve(
    &self,
    key: &str
  ) -> Option<TaskId> {
    self
      .state
      .borrow()
      .tasks()
      .iter()
      .find(|task| {
        task.id.to_string() == key
      })
      .map(|task| task.id.clone())
  }

  fn present(&self) {
    self.surface.present(self.view());
  }

  #[tracing::instrument(skip(self))]
  pub async fn reload(&self) {
    let ticket =
      self.state.borrow_mut().begin_reload();
    self.present();

    match self.remote.list().await {
      | Ok(tasks) => {
        let count = tasks.len();
        let applied = self
          .state
          .borrow_mut()
          .apply_snapshot(ticket, tasks);
        if applied {
          debug!(
            count,
            "task list replaced"
          );
        }
      }
      | Err(err) => {
        warn!(error = %err, "task list unavailable");
        self
          .state
          .borrow_mut()
          .fail_reload(ticket);
      }
    }

    self.present();
  }

  #[tracing::instrument(skip(self))]
  pub async fn create(
    &self,
    title: &str
  ) -> Result<(), ClientError> {
    self.state.borrow_mut().form_message =
      None;

    let title = title.trim();
    if title.is_empty() {
      let err = ClientError::Validation(
        EMPTY_TITLE_MESSAGE.to_string()
      );
      self.show_form_error(&err);
      return Err(err);
    }

    match self.remote.create(title).await
    {
      | Ok(task) => {
        info!(id = %task.id, "task created");
        self.reload().await;
        Ok(())
      }
      | Err(err) => {
        self.show_form_error(&err);
        Err(err)
      }
    }
  }

  fn show_form_error(
    &self,
    err: &ClientError
  ) {
    self.state.borrow_mut().form_message =
      Some(err.message().to_string());
    self.present();
  }

  /// Writes a new title unless it is
  /// blank or unchanged, then reloads
  /// whatever happened.
  #[tracing::instrument(skip(self))]
  pub async fn rename(
    &self,
    id: &TaskId,
    new_title: &str
  ) {
    let title = new_title.trim();
    let unchanged = self
      .state
      .borrow()
      .find(id)
      .is_some_and(|task| {
        task.titulo == title
      });

    if title.is_empty() || unchanged {
      debug!(%id, "rename skipped");
      self.reload().await;
      return;
    }

    match self
      .remote
      .update(id, title)
      .await
    {
      | Ok(_) => {
        info!(%id, "task renamed");
      }
      | Err(err) => {
        warn!(%id, error = %err, "rename failed");
        self.surface.alert(err.message());
      }
    }

    self.reload().await;
  }

  #[tracing::instrument(skip(self))]
  pub async fn toggle_completion(
    &self,
    id: &TaskId
  ) {
    match self.remote.toggle(id).await {
      | Ok(task) => {
        info!(
          %id,
          completada = task.completada,
          "task toggled"
        );
        self.reload().await;
      }
      | Err(err) => {
        self.report_failure(id, &err);
      }
    }
  }

  #[tracing::instrument(skip(self))]
  pub async fn delete(
    &self,
    id: &TaskId
  ) {
    match self.remote.delete(id).await {
      | Ok(()) => {
        info!(%id, "task deleted");
        self.reload().await;
      }
      | Err(err) => {
        self.report_failure(id, &err);
      }
    }
  }

  /// Toggle and delete failures leave the
  /// cache alone; presenting again puts
  /// controlled inputs back in line with
  /// it.
  fn report_failure(
    &self,
    id: &TaskId,
    err: &ClientError
  ) {
    warn!(%id, error = %err, "mutation failed");
    self.surface.alert(err.message());
    self.present();
  }

  pub fn set_filter(
    &self,
    filter: Filter
  ) {
    debug!(
      filter = filter.key(),
      "filter changed"
    );
    self.state.borrow_mut().filter =
      filter;
    self.present();
  }

  pub fn begin_edit(&self, id: TaskId) {
    {
      let mut state =
        self.state.borrow_mut();
      if state.find(&id).is_none() {
        debug!(%id, "edit requested for unknown task");
        return;
      }
      state.editing = Some(id);
    }
    self.present();
  }

  /// Leaves edit mode, then renames. Only
  /// the first commit of an edit counts,
  /// so Enter followed by blur writes
  /// once.
  pub async fn commit_edit(
    &self,
    id: &TaskId,
    draft: &str
  ) {
    if !self.take_edit(id) {
      return;
    }
    self.rename(id, draft).await;
  }

  pub async fn cancel_edit(
    &self,
    id: &TaskId
  ) {
    if !self.take_edit(id) {
      return;
    }
    self.reload().await;
  }

  fn take_edit(
    &self,
    id: &TaskId
  ) -> bool {
    let mut state =
      self.state.borrow_mut();
    if !state.is_editing(id) {
      return false;
    }
    state.editing = None;
    true
  }
}
