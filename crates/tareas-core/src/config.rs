use std::collections::HashMap;

use anyhow::{
  Context,
  anyhow
};
use tracing::{
  debug,
  info,
  trace
};

pub const DEFAULT_API_BASE: &str =
  "http://localhost:3000";

const API_BASE_KEY: &str = "api.base";

#[derive(Debug, Clone)]
pub struct Config {
  map: HashMap<String, String>
}

impl Default for Config {
  fn default() -> Self {
    let mut map = HashMap::new();
    map.insert(
      API_BASE_KEY.to_string(),
      DEFAULT_API_BASE.to_string()
    );
    Self { map }
  }
}

impl Config {
  /// Defaults overlaid with a TOML
  /// document. Nested tables flatten
  /// into dotted keys, so `[api] base`
  /// becomes `api.base`.
  #[tracing::instrument(skip(text))]
  pub fn from_toml_str(
    text: &str
  ) -> anyhow::Result<Self> {
    let table: toml::Table = text
      .parse()
      .context(
        "failed to parse tareas config"
      )?;

    let mut cfg = Config::default();
    flatten_into(
      &mut cfg.map,
      "",
      &table
    );
    info!(
      keys = cfg.map.len(),
      "loaded tareas config"
    );
    cfg.validate()?;
    Ok(cfg)
  }

  #[tracing::instrument(skip(
    self, overrides
  ))]
  pub fn apply_overrides<I>(
    &mut self,
    overrides: I
  ) where
    I: IntoIterator<
      Item = (String, String)
    >
  {
    for (k, v) in overrides {
      let key = k
        .strip_prefix("rc.")
        .unwrap_or(&k)
        .to_string();
      debug!(key = %key, value = %v, "applying override");
      self.map.insert(key, v);
    }
  }

  pub fn get(
    &self,
    key: &str
  ) -> Option<String> {
    self.map.get(key).cloned()
  }

  /// Service base address without a
  /// trailing `/`.
  pub fn api_base(&self) -> String {
    self
      .map
      .get(API_BASE_KEY)
      .map(|value| {
        value
          .trim()
          .trim_end_matches('/')
          .to_string()
      })
      .unwrap_or_else(|| {
        DEFAULT_API_BASE.to_string()
      })
  }

  pub fn validate(
    &self
  ) -> anyhow::Result<()> {
    let base = self.api_base();
    if base.is_empty() {
      return Err(anyhow!(
        "{API_BASE_KEY} cannot be empty"
      ));
    }
    if !(base.starts_with("http://")
      || base.starts_with("https://"))
    {
      return Err(anyhow!(
        "{API_BASE_KEY} must be an \
         http(s) URL, got: {base}"
      ));
    }
    Ok(())
  }
}

fn flatten_into(
  map: &mut HashMap<String, String>,
  prefix: &str,
  table: &toml::Table
) {
  for (name, value) in table {
    let key = if prefix.is_empty() {
      name.clone()
    } else {
      format!("{prefix}.{name}")
    };

    match value {
      | toml::Value::Table(inner) => {
        flatten_into(map, &key, inner);
      }
      | toml::Value::String(text) => {
        trace!(key = %key, value = %text, "loaded config key");
        map.insert(key, text.clone());
      }
      | other => {
        trace!(key = %key, value = %other, "loaded config key");
        map.insert(key, other.to_string());
      }
    }
  }
}

#[cfg(test)]
mod tests {
  use super::{
    Config,
    DEFAULT_API_BASE
  };

  #[test]
  fn defaults_point_at_local_service()
  {
    let cfg = Config::default();
    assert_eq!(
      cfg.api_base(),
      DEFAULT_API_BASE
    );
    assert!(cfg.validate().is_ok());
  }

  #[test]
  fn toml_tables_flatten_and_trailing_slash_is_trimmed()
   {
    let cfg = Config::from_toml_str(
      "[api]\nbase = \"https://todo.example.org/\"\n"
    )
    .unwrap();
    assert_eq!(
      cfg.get("api.base").as_deref(),
      Some("https://todo.example.org/")
    );
    assert_eq!(
      cfg.api_base(),
      "https://todo.example.org"
    );
  }

  #[test]
  fn overrides_strip_rc_prefix_and_win()
  {
    let mut cfg = Config::default();
    cfg.apply_overrides(vec![(
      "rc.api.base".to_string(),
      "http://10.0.0.5:8080".to_string()
    )]);
    assert_eq!(
      cfg.api_base(),
      "http://10.0.0.5:8080"
    );
  }

  #[test]
  fn non_http_base_is_rejected() {
    assert!(
      Config::from_toml_str(
        "[api]\nbase = \"ftp://nope\"\n"
      )
      .is_err()
    );

    let mut cfg = Config::default();
    cfg.apply_overrides(vec![(
      "api.base".to_string(),
      "  ".to_string()
    )]);
    assert!(cfg.validate().is_err());
  }

  #[test]
  fn malformed_toml_is_an_error() {
    assert!(
      Config::from_toml_str("[api")
        .is_err()
    );
  }
}
