use std::process::ExitCode;

use serde_json::{Value, json};
use songbook_core::CoreError;

/// Outcome class of a command, mirrored in the process exit status.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status {
  Ok,
  Created,
  NotFound,
  EditConflict,
  Unprocessable,
  ServerError,
}

impl Status {
  pub fn exit_code(self) -> ExitCode {
    match self {
      Status::Ok | Status::Created => ExitCode::SUCCESS,
      Status::ServerError => ExitCode::from(1),
      Status::Unprocessable => ExitCode::from(2),
      Status::NotFound => ExitCode::from(3),
      Status::EditConflict => ExitCode::from(4),
    }
  }
}

/// JSON document printed on stdout, plus its status.
#[derive(Debug, Clone, PartialEq)]
pub struct Response {
  pub status: Status,
  pub body: Value,
}

impl Response {
  pub fn ok(body: Value) -> Self {
    Response { status: Status::Ok, body }
  }

  pub fn created(body: Value) -> Self {
    Response { status: Status::Created, body }
  }

  pub fn failure(err: &CoreError) -> Self {
    match err {
      CoreError::NotFound => Response { status: Status::NotFound, body: error_body(err.to_string()) },
      CoreError::EditConflict => Response { status: Status::EditConflict, body: error_body(err.to_string()) },
      CoreError::Validation(errors) => Response { status: Status::Unprocessable, body: json!({ "error": errors }) },
      CoreError::AlreadyExists => {
        Response { status: Status::Unprocessable, body: json!({ "error": { "song": err.to_string() } }) }
      }
      CoreError::Timeout(_) | CoreError::Repository(_) => {
        tracing::error!(error = %err, "request failed");
        Response {
          status: Status::ServerError,
          body: error_body("the server encountered a problem and could not process your request"),
        }
      }
    }
  }
}

fn error_body(message: impl Into<String>) -> Value {
  json!({ "error": message.into() })
}

#[cfg(test)]
mod tests {
  use super::*;
  use songbook_core::Validator;

  #[test]
  fn server_errors_hide_details() {
    let response = Response::failure(&CoreError::Repository("disk I/O error".into()));

    assert_eq!(response.status, Status::ServerError);
    assert!(!response.body.to_string().contains("disk"));
  }

  #[test]
  fn duplicates_are_reported_on_the_song_field() {
    let response = Response::failure(&CoreError::AlreadyExists);

    assert_eq!(response.status, Status::Unprocessable);
    assert_eq!(response.body, json!({ "error": { "song": "a song of this group already exists" } }));
  }

  #[test]
  fn validation_errors_keep_every_field() {
    let mut v = Validator::new();
    v.add_error("page", "must be greater than zero");
    v.add_error("sort", "invalid sort value");
    let err = v.into_result().unwrap_err();

    let response = Response::failure(&err);
    assert_eq!(response.body, json!({ "error": { "page": "must be greater than zero", "sort": "invalid sort value" } }));
  }
}
