//! Contract with the remote task service.
//!
//! `TaskRemote` is the seam the controller
//! talks through; `Endpoint` pins down how
//! each of the five calls maps onto HTTP
//! and how a response status turns into a
//! `ClientError`. Transports only have to
//! perform the request and hand the status
//! and body back to `Endpoint::classify`.

use async_trait::async_trait;
use tareas_shared::{
  ErrorBody,
  Task,
  TaskId
};
use tracing::{
  debug,
  warn
};

use crate::error::ClientError;

pub const RESOURCE_PATH: &str =
  "/tareas";

const VALIDATION_FALLBACK: &str =
  "Validación fallida";

#[async_trait(?Send)]
pub trait TaskRemote {
  async fn list(
    &self
  ) -> Result<Vec<Task>, ClientError>;

  async fn create(
    &self,
    titulo: &str
  ) -> Result<Task, ClientError>;

  async fn toggle(
    &self,
    id: &TaskId
  ) -> Result<Task, ClientError>;

  async fn update(
    &self,
    id: &TaskId,
    titulo: &str
  ) -> Result<Task, ClientError>;

  async fn delete(
    &self,
    id: &TaskId
  ) -> Result<(), ClientError>;
}

#[derive(
  Debug, Clone, Copy, PartialEq, Eq,
)]
pub enum Method {
  Get,
  Post,
  Put,
  Delete
}

impl Method {
  pub fn as_str(self) -> &'static str {
    match self {
      | Method::Get => "GET",
      | Method::Post => "POST",
      | Method::Put => "PUT",
      | Method::Delete => "DELETE"
    }
  }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Endpoint<'a> {
  List,
  Create,
  Toggle(&'a TaskId),
  Update(&'a TaskId),
  Delete(&'a TaskId)
}

impl Endpoint<'_> {
  pub fn method(&self) -> Method {
    match self {
      | Endpoint::List => Method::Get,
      | Endpoint::Create
      | Endpoint::Toggle(_) => {
        Method::Post
      }
      | Endpoint::Update(_) => {
        Method::Put
      }
      | Endpoint::Delete(_) => {
        Method::Delete
      }
    }
  }

  /// Absolute URL below `base`, which
  /// must not end in `/`.
  pub fn url(
    &self,
    base: &str
  ) -> String {
    match self {
      | Endpoint::List
      | Endpoint::Create => {
        format!("{base}{RESOURCE_PATH}")
      }
      | Endpoint::Toggle(id) => {
        format!(
          "{base}{RESOURCE_PATH}/{id}/\
           toggle"
        )
      }
      | Endpoint::Update(id)
      | Endpoint::Delete(id) => {
        format!(
          "{base}{RESOURCE_PATH}/{id}"
        )
      }
    }
  }

  pub fn failure_message(
    &self
  ) -> &'static str {
    match self {
      | Endpoint::List => {
        "No se pudo listar tareas"
      }
      | Endpoint::Create => {
        "No se pudo crear tarea"
      }
      | Endpoint::Toggle(_) => {
        "No se pudo cambiar estado"
      }
      | Endpoint::Update(_) => {
        "No se pudo actualizar la tarea"
      }
      | Endpoint::Delete(_) => {
        "No se pudo eliminar"
      }
    }
  }

  /// Whether a 400 from this endpoint
  /// carries a `{ message }` body meant
  /// for the user.
  pub fn reports_validation(
    &self
  ) -> bool {
    matches!(
      self,
      Endpoint::Create
        | Endpoint::Update(_)
    )
  }

  pub fn transport_error(
    &self
  ) -> ClientError {
    ClientError::Transport(
      self.failure_message().to_string()
    )
  }

  /// Maps a response status (and, for a
  /// 400, its raw body) onto the error
  /// policy. `Ok(())` means the body can
  /// be decoded as the success payload.
  pub fn classify(
    &self,
    status: u16,
    body: Option<&str>
  ) -> Result<(), ClientError> {
    if (200..300).contains(&status) {
      return Ok(());
    }

    if status == 400
      && self.reports_validation()
    {
      let message = body
        .and_then(|text| {
          serde_json::from_str::<
            ErrorBody
          >(text)
          .ok()
        })
        .and_then(|parsed| {
          parsed.message
        })
        .filter(|msg| {
          !msg.trim().is_empty()
        })
        .unwrap_or_else(|| {
          VALIDATION_FALLBACK
            .to_string()
        });
      debug!(
        method = self.method().as_str(),
        reason = %message,
        "service rejected input"
      );
      return Err(
        ClientError::Validation(message)
      );
    }

    warn!(
      method = self.method().as_str(),
      status,
      "task service call failed"
    );
    Err(self.transport_error())
  }
}
