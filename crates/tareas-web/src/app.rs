use gloo::console::log;
use tareas_core::config::Config;
use tareas_core::view::LOADING_STATUS;
use tareas_core::{
  ClientError,
  Filter,
  Surface,
  SyncController,
  ViewModel
};
use web_sys::HtmlInputElement;
use yew::{
  Callback,
  Html,
  UseStateSetter,
  function_component,
  html,
  use_effect_with,
  use_memo,
  use_node_ref,
  use_state
};

use crate::api::HttpRemote;
use crate::components::{
  FilterBar,
  RowAction,
  TaskForm,
  TaskList
};
use crate::settings::load_config;

type Controller =
  SyncController<HttpRemote, PageSurface>;

/// Hands view models to the root
/// component and shows blocking alerts.
pub struct PageSurface {
  view: UseStateSetter<Option<ViewModel>>
}

impl Surface for PageSurface {
  fn present(&self, view: ViewModel) {
    self.view.set(Some(view));
  }

  fn alert(&self, message: &str) {
    ui_debug("alert", message);
    gloo::dialogs::alert(message);
  }
}

fn build_controller(
  view: UseStateSetter<Option<ViewModel>>
) -> Controller {
  let cfg =
    load_config().unwrap_or_else(|err| {
      tracing::error!(
        error = %format!("{err:#}"),
        "using default config"
      );
      Config::default()
    });
  let base = cfg.api_base();
  tracing::info!(api_base = %base, "task service configured");

  SyncController::new(
    HttpRemote::new(base.clone()),
    PageSurface { view },
    base
  )
}

#[function_component(App)]
pub fn app() -> Html {
  let view =
    use_state(|| None::<ViewModel>);
  let title_ref = use_node_ref();

  let controller = {
    let setter = view.setter();
    use_memo((), move |_| {
      build_controller(setter)
    })
  };

  {
    let controller = controller.clone();
    use_effect_with((), move |_| {
      wasm_bindgen_futures::spawn_local(
        async move {
          controller.reload().await;
        }
      );
      || ()
    });
  }

  let on_submit = {
    let controller = controller.clone();
    let title_ref = title_ref.clone();
    Callback::from(move |title: String| {
      let controller =
        controller.clone();
      let title_ref = title_ref.clone();

      wasm_bindgen_futures::spawn_local(
        async move {
          let outcome =
            controller.create(&title).await;
          let Some(input) = title_ref
            .cast::<HtmlInputElement>()
          else {
            return;
          };
          match outcome {
            | Ok(()) => input.set_value(""),
            | Err(
              ClientError::Validation(_)
            ) if title.trim().is_empty() => {
              let _ = input.focus();
            }
            | Err(err) => {
              ui_debug(
                "create-failed",
                err.message()
              );
            }
          }
        }
      );
    })
  };

  let on_filter = {
    let controller = controller.clone();
    Callback::from(
      move |filter: Filter| {
        controller.set_filter(filter);
      }
    )
  };

  let on_row_action = {
    let controller = controller.clone();
    Callback::from(
      move |action: RowAction| {
        let Some(id) =
          controller.resolve(action.key())
        else {
          ui_debug(
            "unknown-row",
            action.key()
          );
          return;
        };

        if let RowAction::BeginEdit(_) =
          action
        {
          controller.begin_edit(id);
          return;
        }

        let controller =
          controller.clone();
        wasm_bindgen_futures::spawn_local(
          async move {
            match action {
              | RowAction::Toggle(_) => {
                controller
                  .toggle_completion(&id)
                  .await;
              }
              | RowAction::Delete(_) => {
                controller
                  .delete(&id)
                  .await;
              }
              | RowAction::Commit(
                _,
                draft
              ) => {
                controller
                  .commit_edit(&id, &draft)
                  .await;
              }
              | RowAction::Cancel(_) => {
                controller
                  .cancel_edit(&id)
                  .await;
              }
              | RowAction::BeginEdit(_) => {}
            }
          }
        );
      }
    )
  };

  let Some(model) = (*view).clone()
  else {
    return html! {
        <main class="app">
            <p id="estado" class="estado">{ LOADING_STATUS }</p>
        </main>
    };
  };

  html! {
      <main class="app">
          <h1>{ "Tareas" }</h1>
          <TaskForm
              input_ref={title_ref}
              message={model.form_message.clone()}
              on_submit={on_submit}
          />
          <FilterBar chips={model.chips.clone()} on_select={on_filter} />
          <p id="estado" class="estado">{ model.status.clone().unwrap_or_default() }</p>
          <TaskList rows={model.rows.clone()} on_action={on_row_action} />
          <footer class="pie">
              <span id="contador_pendientes">{ model.remaining_label.clone() }</span>
          </footer>
      </main>
  }
}

fn ui_debug(
  event: &str,
  detail: &str
) {
  tracing::debug!(
    event, detail, "ui-debug"
  );
  log!(format!(
    "[ui-debug] {event}: {detail}"
  ));
}
