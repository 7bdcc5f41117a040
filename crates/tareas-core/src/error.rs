use thiserror::Error;

/// Failure of a call against the task
/// service, already reduced to the text
/// a user gets to see.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ClientError {
  /// Rejected input: an empty title
  /// caught locally, or the `message` of
  /// an HTTP 400 response.
  #[error("{0}")]
  Validation(String),

  /// Network failure or any other
  /// non-2xx status.
  #[error("{0}")]
  Transport(String)
}

impl ClientError {
  pub fn message(&self) -> &str {
    match self {
      | ClientError::Validation(msg)
      | ClientError::Transport(msg) => {
        msg
      }
    }
  }

  pub fn is_validation(&self) -> bool {
    matches!(
      self,
      ClientError::Validation(_)
    )
  }
}
