//! Reconciliation of a `ViewModel` onto
//! the page. Row interactions are handled
//! by one listener per event type on the
//! list, dispatching on the `data-id` of
//! the enclosing row and the
//! `data-action` of the target.

use tareas_core::Filter;
use tareas_core::view::{
  FilterChip,
  RowView
};
use wasm_bindgen::JsCast;
use web_sys::{
  Element,
  Event,
  FocusEvent,
  HtmlInputElement,
  KeyboardEvent,
  MouseEvent,
  SubmitEvent
};
use yew::{
  Callback,
  Html,
  NodeRef,
  Properties,
  classes,
  function_component,
  html,
  use_effect_with,
  use_node_ref
};

/// What a row asked for, keyed by the
/// row's `data-id`.
#[derive(Debug, Clone, PartialEq)]
pub enum RowAction {
  Toggle(String),
  Delete(String),
  BeginEdit(String),
  Commit(String, String),
  Cancel(String)
}

impl RowAction {
  pub fn key(&self) -> &str {
    match self {
      | RowAction::Toggle(key)
      | RowAction::Delete(key)
      | RowAction::BeginEdit(key)
      | RowAction::Commit(key, _)
      | RowAction::Cancel(key) => key
    }
  }

  /// Maps a listener firing on an element
  /// tagged `data-action` to the row
  /// action it stands for. The draft is
  /// only read when a commit needs it.
  pub fn route(
    trigger: Trigger<'_>,
    action: &str,
    key: String,
    draft: impl FnOnce() -> String
  ) -> Option<RowAction> {
    match (trigger, action) {
      | (Trigger::Change, "toggle") => {
        Some(RowAction::Toggle(key))
      }
      | (Trigger::Click, "delete") => {
        Some(RowAction::Delete(key))
      }
      | (Trigger::DoubleClick, "edit") => {
        Some(RowAction::BeginEdit(key))
      }
      | (
        Trigger::KeyDown("Enter"),
        "draft"
      )
      | (Trigger::FocusOut, "draft") => {
        Some(RowAction::Commit(
          key,
          draft()
        ))
      }
      | (
        Trigger::KeyDown("Escape"),
        "draft"
      ) => Some(RowAction::Cancel(key)),
      | _ => None
    }
  }
}

/// Listener kinds installed on the list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Trigger<'a> {
  Change,
  Click,
  DoubleClick,
  KeyDown(&'a str),
  FocusOut
}

struct Hit {
  key:    String,
  action: String,
  target: Element
}

fn hit(event: &Event) -> Option<Hit> {
  let origin = event
    .target()?
    .dyn_into::<Element>()
    .ok()?;
  let target = origin
    .closest("[data-action]")
    .ok()
    .flatten()?;
  let row = target
    .closest("li[data-id]")
    .ok()
    .flatten()?;

  Some(Hit {
    key: row.get_attribute("data-id")?,
    action: target
      .get_attribute("data-action")?,
    target
  })
}

fn draft_of(hit: &Hit) -> String {
  hit
    .target
    .clone()
    .dyn_into::<HtmlInputElement>()
    .map(|input| input.value())
    .unwrap_or_default()
}

fn routed(
  event: &Event,
  trigger: Trigger<'_>
) -> Option<(Hit, RowAction)> {
  let hit = hit(event)?;
  let action = RowAction::route(
    trigger,
    &hit.action,
    hit.key.clone(),
    || draft_of(&hit)
  )?;
  Some((hit, action))
}

#[derive(Properties, PartialEq)]
pub struct TaskListProps {
  pub rows:      Vec<RowView>,
  pub on_action: Callback<RowAction>
}

#[function_component(TaskList)]
pub fn task_list(
  props: &TaskListProps
) -> Html {
  let onchange = {
    let on_action =
      props.on_action.clone();
    Callback::from(move |e: Event| {
      let Some((hit, action)) =
        routed(&e, Trigger::Change)
      else {
        return;
      };
      // The box shows the cached state
      // until a reload says otherwise.
      if let Ok(input) = hit
        .target
        .dyn_into::<HtmlInputElement>()
      {
        input.set_checked(
          !input.checked()
        );
      }
      on_action.emit(action);
    })
  };

  let onclick = {
    let on_action =
      props.on_action.clone();
    Callback::from(
      move |e: MouseEvent| {
        if let Some((_, action)) =
          routed(&e, Trigger::Click)
        {
          on_action.emit(action);
        }
      }
    )
  };

  let ondblclick = {
    let on_action =
      props.on_action.clone();
    Callback::from(
      move |e: MouseEvent| {
        if let Some((_, action)) = routed(
          &e,
          Trigger::DoubleClick
        ) {
          on_action.emit(action);
        }
      }
    )
  };

  let onkeydown = {
    let on_action =
      props.on_action.clone();
    Callback::from(
      move |e: KeyboardEvent| {
        let key = e.key();
        let Some((_, action)) = routed(
          &e,
          Trigger::KeyDown(&key)
        ) else {
          return;
        };
        if let RowAction::Commit(..) =
          action
        {
          e.prevent_default();
        }
        on_action.emit(action);
      }
    )
  };

  let onfocusout = {
    let on_action =
      props.on_action.clone();
    Callback::from(
      move |e: FocusEvent| {
        if let Some((_, action)) =
          routed(&e, Trigger::FocusOut)
        {
          on_action.emit(action);
        }
      }
    )
  };

  html! {
      <ul
          id="lista_tareas"
          class="lista_tareas"
          {onchange}
          {onclick}
          {ondblclick}
          {onkeydown}
          {onfocusout}
      >
          {
              for props.rows.iter().cloned().map(|row| {
                  let key = row.key.clone();
                  html! { <TaskRow key={key} row={row} /> }
              })
          }
      </ul>
  }
}

#[derive(Properties, PartialEq)]
pub struct TaskRowProps {
  pub row: RowView
}

#[function_component(TaskRow)]
pub fn task_row(
  props: &TaskRowProps
) -> Html {
  let row = &props.row;
  let text_class = classes!(
    "tarea_texto",
    row.completed.then_some("completada")
  );

  html! {
      <li class="tarea_item" id={row.dom_id.clone()} data-id={row.key.clone()}>
          <input
              type="checkbox"
              class="tarea_check"
              data-action="toggle"
              checked={row.completed}
              aria-label="Marcar como completada"
          />
          {
              if row.editing {
                  html! { <EditField title={row.title.clone()} /> }
              } else {
                  html! { <span class={text_class} data-action="edit">{ &row.title }</span> }
              }
          }
          <button
              type="button"
              class="tarea_eliminar"
              data-action="delete"
              aria-label="Eliminar tarea"
          >
              { "×" }
          </button>
      </li>
  }
}

#[derive(Properties, PartialEq)]
pub struct EditFieldProps {
  pub title: String
}

#[function_component(EditField)]
pub fn edit_field(
  props: &EditFieldProps
) -> Html {
  let input_ref = use_node_ref();

  {
    let input_ref = input_ref.clone();
    use_effect_with((), move |_| {
      if let Some(input) = input_ref
        .cast::<HtmlInputElement>()
      {
        let _ = input.focus();
        input.select();
      }
      || ()
    });
  }

  html! {
      <input
          ref={input_ref}
          type="text"
          class="tarea_editar_input"
          data-action="draft"
          value={props.title.clone()}
          aria-label="Editar título de la tarea"
      />
  }
}

#[derive(Properties, PartialEq)]
pub struct FilterBarProps {
  pub chips:     Vec<FilterChip>,
  pub on_select: Callback<Filter>
}

#[function_component(FilterBar)]
pub fn filter_bar(
  props: &FilterBarProps
) -> Html {
  let onclick = {
    let on_select =
      props.on_select.clone();
    Callback::from(
      move |e: MouseEvent| {
        let filter = e
          .target()
          .and_then(|target| {
            target
              .dyn_into::<Element>()
              .ok()
          })
          .and_then(|element| {
            element
              .closest("[data-filter]")
              .ok()
              .flatten()
          })
          .and_then(|chip| {
            chip.get_attribute(
              "data-filter"
            )
          })
          .and_then(|key| {
            Filter::from_key(&key)
          });

        if let Some(filter) = filter {
          on_select.emit(filter);
        }
      }
    )
  };

  html! {
      <div class="filtros" {onclick}>
          {
              for props.chips.iter().map(|chip| html! {
                  <button
                      type="button"
                      id={format!("filtro_{}", chip.filter.key())}
                      class={classes!("opcion", chip.active.then_some("opcion_activa"))}
                      data-filter={chip.filter.key()}
                  >
                      { chip.label }
                  </button>
              })
          }
      </div>
  }
}

#[derive(Properties, PartialEq)]
pub struct TaskFormProps {
  pub input_ref: NodeRef,
  pub message:   Option<String>,
  pub on_submit: Callback<String>
}

#[function_component(TaskForm)]
pub fn task_form(
  props: &TaskFormProps
) -> Html {
  let onsubmit = {
    let input_ref =
      props.input_ref.clone();
    let on_submit =
      props.on_submit.clone();
    Callback::from(
      move |e: SubmitEvent| {
        e.prevent_default();
        let title = input_ref
          .cast::<HtmlInputElement>()
          .map(|input| input.value())
          .unwrap_or_default();
        on_submit.emit(title);
      }
    )
  };

  html! {
      <form id="formulario_tarea" {onsubmit}>
          <input
              ref={props.input_ref.clone()}
              id="input_titulo"
              type="text"
              placeholder="¿Qué necesitas hacer?"
              aria-label="Título de la tarea"
          />
          <button type="submit" class="btn">{ "Agregar" }</button>
          <p id="mensaje_formulario" class="mensaje_formulario">
              { props.message.clone().unwrap_or_default() }
          </p>
      </form>
  }
}

#[cfg(test)]
mod tests {
  use tareas_core::state::AppState;
  use tareas_core::view::RowView;
  use tareas_shared::{
    Task,
    TaskId
  };
  use yew::{
    Callback,
    LocalServerRenderer
  };

  use super::{
    RowAction,
    TaskList,
    TaskListProps,
    Trigger
  };

  fn rows(tasks: Vec<Task>) -> Vec<RowView> {
    let mut state =
      AppState::new("http://localhost:3000");
    let ticket = state.begin_reload();
    state.apply_snapshot(ticket, tasks);
    tareas_core::ViewModel::project(&state)
      .rows
  }

  async fn render_list(
    rows: Vec<RowView>
  ) -> String {
    LocalServerRenderer::<TaskList>::with_props(
      TaskListProps {
        rows,
        on_action: Callback::noop()
      }
    )
    .hydratable(false)
    .render()
    .await
  }

  #[tokio::test]
  async fn list_renders_one_keyed_row_per_task()
   {
    let html = render_list(rows(vec![
      Task::new(1_u64, "uno", false),
      Task::new(TaskId::from("b-2"), "dos", true),
    ]))
    .await;

    let first = html
      .find(r#"id="tarea_1""#)
      .unwrap();
    let second = html
      .find(r#"id="tarea_b-2""#)
      .unwrap();
    assert!(first < second);
    assert!(html.contains(r#"data-id="1""#));
    assert!(
      html.contains(r#"data-id="b-2""#)
    );
    assert_eq!(
      html.matches("tarea_item").count(),
      2
    );
    assert_eq!(
      html
        .matches(r#"data-action="delete""#)
        .count(),
      2
    );
    assert_eq!(
      html
        .matches(r#"class="tarea_texto completada""#)
        .count(),
      1
    );
  }

  #[tokio::test]
  async fn empty_list_renders_no_rows() {
    let html = render_list(vec![]).await;
    assert!(html.contains("lista_tareas"));
    assert!(!html.contains("tarea_item"));
  }

  fn route(
    trigger: Trigger<'_>,
    action: &str
  ) -> Option<RowAction> {
    RowAction::route(
      trigger,
      action,
      "7".to_string(),
      || "  nuevo  ".to_string()
    )
  }

  #[test]
  fn checkbox_change_toggles_its_row() {
    assert_eq!(
      route(Trigger::Change, "toggle"),
      Some(RowAction::Toggle(
        "7".to_string()
      ))
    );
  }

  #[test]
  fn delete_button_click_deletes_its_row()
   {
    assert_eq!(
      route(Trigger::Click, "delete"),
      Some(RowAction::Delete(
        "7".to_string()
      ))
    );
  }

  #[test]
  fn title_double_click_begins_edit() {
    assert_eq!(
      route(
        Trigger::DoubleClick,
        "edit"
      ),
      Some(RowAction::BeginEdit(
        "7".to_string()
      ))
    );
  }

  #[test]
  fn enter_and_blur_commit_the_raw_draft()
   {
    let commit = Some(RowAction::Commit(
      "7".to_string(),
      "  nuevo  ".to_string()
    ));
    assert_eq!(
      route(
        Trigger::KeyDown("Enter"),
        "draft"
      ),
      commit
    );
    assert_eq!(
      route(Trigger::FocusOut, "draft"),
      commit
    );
  }

  #[test]
  fn escape_cancels_without_reading_draft()
   {
    let action = RowAction::route(
      Trigger::KeyDown("Escape"),
      "draft",
      "7".to_string(),
      || panic!("draft read on cancel")
    );
    assert_eq!(
      action,
      Some(RowAction::Cancel(
        "7".to_string()
      ))
    );
  }

  #[test]
  fn other_keys_in_the_draft_are_ignored()
   {
    assert_eq!(
      route(
        Trigger::KeyDown("a"),
        "draft"
      ),
      None
    );
  }

  #[test]
  fn listeners_ignore_foreign_targets() {
    // A click on the checkbox must not
    // delete, nor a blur on it commit.
    assert_eq!(
      route(Trigger::Click, "toggle"),
      None
    );
    assert_eq!(
      route(Trigger::FocusOut, "toggle"),
      None
    );
    assert_eq!(
      route(Trigger::Change, "draft"),
      None
    );
    assert_eq!(
      route(Trigger::Click, "edit"),
      None
    );
    assert_eq!(
      route(Trigger::DoubleClick, "delete"),
      None
    );
  }

  #[test]
  fn routed_actions_keep_the_row_key() {
    let action = route(
      Trigger::FocusOut,
      "draft"
    );
    assert_eq!(
      action.as_ref().map(RowAction::key),
      Some("7")
    );
  }
}
