use anyhow::Context;
use tareas_core::config::Config;
use wasm_bindgen::JsCast;
use web_sys::Element;

const EMBEDDED_CONFIG: &str =
  include_str!("../tareas.toml");

/// Embedded `tareas.toml`, then every
/// `<meta name="rc.KEY" content="VALUE">`
/// in the host page.
pub fn load_config()
-> anyhow::Result<Config> {
  let mut cfg =
    Config::from_toml_str(
      EMBEDDED_CONFIG
    )
    .context(
      "embedded tareas.toml is invalid"
    )?;

  let overrides = meta_overrides();
  if !overrides.is_empty() {
    tracing::info!(
      count = overrides.len(),
      "applying page overrides"
    );
  }
  cfg.apply_overrides(overrides);
  cfg.validate().context(
    "page overrides produced an \
     invalid config"
  )?;

  Ok(cfg)
}

fn meta_overrides()
-> Vec<(String, String)> {
  let Some(document) = web_sys::window()
    .and_then(|window| {
      window.document()
    })
  else {
    return vec![];
  };

  let Ok(nodes) = document
    .query_selector_all(
      "meta[name^='rc.']"
    )
  else {
    return vec![];
  };

  (0..nodes.length())
    .filter_map(|index| nodes.item(index))
    .filter_map(|node| {
      node.dyn_into::<Element>().ok()
    })
    .filter_map(|meta| {
      let name =
        meta.get_attribute("name")?;
      let content =
        meta.get_attribute("content")?;
      Some((name, content))
    })
    .collect()
}
