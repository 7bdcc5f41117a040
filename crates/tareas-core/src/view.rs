//! Pure projection of `AppState` into
//! what the page shows. Nothing here
//! touches a UI runtime; the web crate
//! reconciles a `ViewModel` onto the DOM.

use tareas_shared::{
  Task,
  TaskId
};

use crate::state::{
  AppState,
  Filter,
  Link
};

pub const LOADING_STATUS: &str =
  "Cargando...";
pub const ONBOARDING_STATUS: &str =
  "Aún no tienes tareas. Crea tu \
   primera tarea ✍️";
pub const EMPTY_FILTER_STATUS: &str =
  "No hay tareas en este filtro.";
pub const EMPTY_TITLE_MESSAGE: &str =
  "Escribe un título para la tarea.";

#[derive(Debug, Clone, PartialEq)]
pub struct RowView {
  pub id:        TaskId,
  /// `data-id` of the row; maps back to
  /// `id` through `ViewModel::row`.
  pub key:       String,
  pub dom_id:    String,
  pub title:     String,
  pub completed: bool,
  pub editing:   bool
}

#[derive(Debug, Clone, PartialEq)]
pub struct FilterChip {
  pub filter: Filter,
  pub label:  &'static str,
  pub active: bool
}

#[derive(Debug, Clone, PartialEq)]
pub struct ViewModel {
  pub rows:            Vec<RowView>,
  pub status:          Option<String>,
  pub pending:         usize,
  pub remaining_label: String,
  pub chips:           Vec<FilterChip>,
  pub form_message:    Option<String>
}

impl ViewModel {
  pub fn project(
    state: &AppState
  ) -> Self {
    let tasks = state.tasks();
    let rows: Vec<RowView> =
      visible(tasks, state.filter)
        .map(|task| {
          row_view(
            task,
            state.is_editing(&task.id)
          )
        })
        .collect();

    let pending = pending_count(tasks);
    let status = status_line(
      state,
      tasks.len(),
      rows.len()
    );

    let chips = Filter::ALL
      .into_iter()
      .map(|filter| {
        FilterChip {
          filter,
          label: filter.label(),
          active: filter == state.filter
        }
      })
      .collect();

    Self {
      rows,
      status,
      pending,
      remaining_label: remaining_label(
        pending
      ),
      chips,
      form_message: state
        .form_message
        .clone()
    }
  }

  pub fn row(
    &self,
    key: &str
  ) -> Option<&RowView> {
    self
      .rows
      .iter()
      .find(|row| row.key == key)
  }
}

pub fn visible(
  tasks: &[Task],
  filter: Filter
) -> impl Iterator<Item = &Task> {
  tasks
    .iter()
    .filter(move |task| {
      filter.matches(task)
    })
}

pub fn pending_count(
  tasks: &[Task]
) -> usize {
  tasks
    .iter()
    .filter(|task| !task.completada)
    .count()
}

pub fn remaining_label(
  pending: usize
) -> String {
  format!("{pending} artículos restantes")
}

pub fn unreachable_status(
  api_base: &str
) -> String {
  format!(
    "No se pudo conectar con la API. \
     Verifica que esté en {api_base}"
  )
}

fn status_line(
  state: &AppState,
  total: usize,
  shown: usize
) -> Option<String> {
  match state.link {
    | Link::Unreachable => {
      return Some(unreachable_status(
        state.api_base()
      ));
    }
    | Link::Loading => {
      return Some(
        LOADING_STATUS.to_string()
      );
    }
    | Link::Idle => {}
  }

  if total == 0 {
    Some(ONBOARDING_STATUS.to_string())
  } else if shown == 0 {
    Some(
      EMPTY_FILTER_STATUS.to_string()
    )
  } else {
    None
  }
}

fn row_view(
  task: &Task,
  editing: bool
) -> RowView {
  let key = task.id.to_string();
  RowView {
    id: task.id.clone(),
    dom_id: format!("tarea_{key}"),
    key,
    title: task.titulo.clone(),
    completed: task.completada,
    editing
  }
}
