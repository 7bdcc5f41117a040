use std::fmt;

use serde::{
  Deserialize,
  Serialize
};
use serde_json::Number;

/// Server-assigned task identifier.
///
/// The service may hand out numeric or
/// textual ids; both are kept verbatim
/// (negative and fractional numbers
/// included) and rendered through
/// `Display` for URL paths and DOM keys.
#[derive(
  Debug,
  Clone,
  Serialize,
  Deserialize,
  PartialEq,
  Eq,
  Hash,
)]
#[serde(untagged)]
pub enum TaskId {
  Number(Number),
  Text(String)
}

impl fmt::Display for TaskId {
  fn fmt(
    &self,
    f: &mut fmt::Formatter<'_>
  ) -> fmt::Result {
    match self {
      | TaskId::Number(value) => {
        write!(f, "{value}")
      }
      | TaskId::Text(value) => {
        f.write_str(value)
      }
    }
  }
}

impl From<u64> for TaskId {
  fn from(value: u64) -> Self {
    TaskId::Number(Number::from(value))
  }
}

impl From<i64> for TaskId {
  fn from(value: i64) -> Self {
    TaskId::Number(Number::from(value))
  }
}

impl From<&str> for TaskId {
  fn from(value: &str) -> Self {
    TaskId::Text(value.to_string())
  }
}

#[derive(
  Debug,
  Clone,
  Serialize,
  Deserialize,
  PartialEq,
  Eq,
)]
pub struct Task {
  pub id:         TaskId,
  pub titulo:     String,
  #[serde(default)]
  pub completada: bool
}

impl Task {
  pub fn new(
    id: impl Into<TaskId>,
    titulo: impl Into<String>,
    completada: bool
  ) -> Self {
    Self {
      id: id.into(),
      titulo: titulo.into(),
      completada
    }
  }
}

/// Body of `POST /tareas` and
/// `PUT /tareas/{id}`.
#[derive(
  Debug, Clone, Serialize, Deserialize,
)]
pub struct TitleBody {
  pub titulo: String
}

/// Body the service attaches to a 400
/// response.
#[derive(
  Debug,
  Clone,
  Serialize,
  Deserialize,
  Default,
)]
pub struct ErrorBody {
  #[serde(default)]
  pub message: Option<String>
}

#[cfg(test)]
mod tests {
  use super::{
    ErrorBody,
    Task,
    TaskId
  };

  #[test]
  fn task_ids_decode_from_numbers_and_strings()
   {
    let tasks: Vec<Task> =
      serde_json::from_str(
        r#"[
          {"id": 7, "titulo": "a", "completada": true},
          {"id": "b-2", "titulo": "b", "completada": false}
        ]"#
      )
      .unwrap();

    assert_eq!(
      tasks[0].id,
      TaskId::from(7_u64)
    );
    assert_eq!(
      tasks[1].id,
      TaskId::Text("b-2".to_string())
    );
    assert_eq!(tasks[0].id.to_string(), "7");
    assert_eq!(
      tasks[1].id.to_string(),
      "b-2"
    );
  }

  #[test]
  fn signed_and_fractional_ids_stay_as_sent()
   {
    let tasks: Vec<Task> =
      serde_json::from_str(
        r#"[
          {"id": -3, "titulo": "a"},
          {"id": 1.5, "titulo": "b"}
        ]"#
      )
      .unwrap();

    assert_eq!(
      tasks[0].id,
      TaskId::from(-3_i64)
    );
    assert_eq!(
      tasks[0].id.to_string(),
      "-3"
    );
    assert_eq!(
      tasks[1].id.to_string(),
      "1.5"
    );
    assert!(matches!(
      tasks[1].id,
      TaskId::Number(_)
    ));

    let echoed =
      serde_json::to_string(&tasks[1].id)
        .unwrap();
    assert_eq!(echoed, "1.5");
  }

  #[test]
  fn missing_completion_flag_defaults_to_pending()
   {
    let task: Task = serde_json::from_str(
      r#"{"id": 1, "titulo": "x"}"#
    )
    .unwrap();
    assert!(!task.completada);
  }

  #[test]
  fn error_body_tolerates_missing_message()
   {
    let body: ErrorBody =
      serde_json::from_str("{}").unwrap();
    assert!(body.message.is_none());

    let body: ErrorBody =
      serde_json::from_str(
        r#"{"message": "Título muy largo", "statusCode": 400}"#
      )
      .unwrap();
    assert_eq!(
      body.message.as_deref(),
      Some("Título muy largo")
    );
  }
}
