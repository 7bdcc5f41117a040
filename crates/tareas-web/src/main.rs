mod api;
mod app;
mod components;
mod settings;

use web_sys::Element;
use yew::Renderer;

use crate::app::App;

const MOUNT_ID: &str = "app";

/// The host page's `#app` node, if the
/// page provides one.
fn mount_point() -> Option<Element> {
  web_sys::window()?
    .document()?
    .get_element_by_id(MOUNT_ID)
}

fn main() {
  console_error_panic_hook::set_once();
  wasm_tracing::set_as_global_default();

  tracing::info!(
    version = env!("CARGO_PKG_VERSION"),
    "tareas client booting"
  );

  match mount_point() {
    | Some(root) => {
      Renderer::<App>::with_root(root)
        .render();
    }
    | None => {
      tracing::warn!(
        mount = MOUNT_ID,
        "mount node absent, rendering into body"
      );
      Renderer::<App>::new().render();
    }
  }
}
