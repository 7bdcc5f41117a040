use tareas_shared::{
  Task,
  TaskId
};
use tracing::debug;

#[derive(
  Debug,
  Clone,
  Copy,
  PartialEq,
  Eq,
  Default,
)]
pub enum Filter {
  #[default]
  All,
  Pending,
  Completed
}

impl Filter {
  pub const ALL: [Filter; 3] = [
    Filter::All,
    Filter::Pending,
    Filter::Completed
  ];

  pub fn matches(
    self,
    task: &Task
  ) -> bool {
    match self {
      | Filter::All => true,
      | Filter::Pending => {
        !task.completada
      }
      | Filter::Completed => {
        task.completada
      }
    }
  }

  pub fn label(self) -> &'static str {
    match self {
      | Filter::All => "Todas",
      | Filter::Pending => "Pendientes",
      | Filter::Completed => {
        "Completadas"
      }
    }
  }

  pub fn key(self) -> &'static str {
    match self {
      | Filter::All => "todas",
      | Filter::Pending => "pendientes",
      | Filter::Completed => {
        "completadas"
      }
    }
  }

  pub fn from_key(
    key: &str
  ) -> Option<Self> {
    Self::ALL
      .into_iter()
      .find(|filter| filter.key() == key)
  }
}

/// Connection state as seen by the
/// status line.
#[derive(
  Debug,
  Clone,
  Copy,
  PartialEq,
  Eq,
  Default,
)]
pub enum Link {
  #[default]
  Idle,
  Loading,
  Unreachable
}

/// Sequence number handed out per
/// reload.
#[derive(
  Debug,
  Clone,
  Copy,
  PartialEq,
  Eq,
  PartialOrd,
  Ord,
)]
pub struct Ticket(u64);

/// Everything the client knows. The task
/// list is only ever replaced as a whole
/// by `apply_snapshot`.
#[derive(Debug, Clone, Default)]
pub struct AppState {
  tasks:            Vec<Task>,
  pub filter:       Filter,
  pub link:         Link,
  pub form_message: Option<String>,
  pub editing:      Option<TaskId>,
  api_base:         String,
  issued:           u64,
  applied:          u64
}

impl AppState {
  pub fn new(
    api_base: impl Into<String>
  ) -> Self {
    Self {
      api_base: api_base.into(),
      ..Default::default()
    }
  }

  pub fn tasks(&self) -> &[Task] {
    &self.tasks
  }

  pub fn api_base(&self) -> &str {
    &self.api_base
  }

  pub fn find(
    &self,
    id: &TaskId
  ) -> Option<&Task> {
    self
      .tasks
      .iter()
      .find(|task| &task.id == id)
  }

  pub fn begin_reload(
    &mut self
  ) -> Ticket {
    self.issued += 1;
    self.link = Link::Loading;
    Ticket(self.issued)
  }

  /// Replaces the cache with a fetched
  /// list unless a newer reload already
  /// landed. Returns whether it applied.
  pub fn apply_snapshot(
    &mut self,
    ticket: Ticket,
    tasks: Vec<Task>
  ) -> bool {
    if ticket.0 <= self.applied {
      debug!(
        ticket = ticket.0,
        applied = self.applied,
        "dropping stale task list"
      );
      return false;
    }

    self.applied = ticket.0;
    self.tasks = tasks;
    self.editing = None;
    self.link = self.settled_link();
    true
  }

  /// Records a failed reload. The cache
  /// stays as it was.
  pub fn fail_reload(
    &mut self,
    ticket: Ticket
  ) -> bool {
    if ticket.0 <= self.applied {
      debug!(
        ticket = ticket.0,
        applied = self.applied,
        "ignoring failure of stale reload"
      );
      return false;
    }

    self.applied = ticket.0;
    self.link = Link::Unreachable;
    true
  }

  pub fn is_editing(
    &self,
    id: &TaskId
  ) -> bool {
    self.editing.as_ref() == Some(id)
  }

  fn settled_link(&self) -> Link {
    if self.issued > self.applied {
      Link::Loading
    } else {
      Link::Idle
    }
  }
}

#[cfg(test)]
mod tests {
  use tareas_shared::Task;

  use super::{
    AppState,
    Filter,
    Link
  };

  #[test]
  fn newer_reload_wins_over_late_older_response()
   {
    let mut state =
      AppState::new("http://x");
    let first = state.begin_reload();
    let second = state.begin_reload();

    assert!(state.apply_snapshot(
      second,
      vec![Task::new(1_u64, "new", false)]
    ));
    assert_eq!(state.link, Link::Idle);

    assert!(!state.apply_snapshot(
      first,
      vec![Task::new(1_u64, "old", false)]
    ));
    assert_eq!(
      state.tasks()[0].titulo,
      "new"
    );
  }

  #[test]
  fn in_order_responses_both_apply() {
    let mut state =
      AppState::new("http://x");
    let first = state.begin_reload();
    let second = state.begin_reload();

    assert!(
      state.apply_snapshot(first, vec![])
    );
    assert_eq!(
      state.link,
      Link::Loading
    );
    assert!(state.apply_snapshot(
      second,
      vec![Task::new(2_u64, "b", true)]
    ));
    assert_eq!(state.tasks().len(), 1);
    assert_eq!(state.link, Link::Idle);
  }

  #[test]
  fn stale_failure_does_not_degrade_status()
   {
    let mut state =
      AppState::new("http://x");
    let first = state.begin_reload();
    let second = state.begin_reload();
    state.apply_snapshot(second, vec![]);

    assert!(!state.fail_reload(first));
    assert_eq!(state.link, Link::Idle);
  }

  #[test]
  fn failure_keeps_previous_cache() {
    let mut state =
      AppState::new("http://x");
    let ticket = state.begin_reload();
    state.apply_snapshot(
      ticket,
      vec![Task::new(1_u64, "keep", false)]
    );

    let ticket = state.begin_reload();
    assert!(state.fail_reload(ticket));
    assert_eq!(
      state.link,
      Link::Unreachable
    );
    assert_eq!(
      state.tasks()[0].titulo,
      "keep"
    );
  }

  #[test]
  fn filter_keys_round_trip() {
    for filter in Filter::ALL {
      assert_eq!(
        Filter::from_key(filter.key()),
        Some(filter)
      );
    }
    assert_eq!(
      Filter::from_key("otra"),
      None
    );
  }
}
