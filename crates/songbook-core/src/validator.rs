use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt;

use crate::errors::CoreError;

/// Field name → first failure message recorded for that field.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ValidationErrors(BTreeMap<String, String>);

impl ValidationErrors {
  pub fn single(field: &str, message: impl Into<String>) -> Self {
    let mut errors = BTreeMap::new();
    errors.insert(field.to_owned(), message.into());
    Self(errors)
  }

  pub fn get(&self, field: &str) -> Option<&str> {
    self.0.get(field).map(String::as_str)
  }

  pub fn contains(&self, field: &str) -> bool {
    self.0.contains_key(field)
  }

  pub fn len(&self) -> usize {
    self.0.len()
  }

  pub fn is_empty(&self) -> bool {
    self.0.is_empty()
  }
}

impl fmt::Display for ValidationErrors {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    let mut first = true;
    for (field, message) in &self.0 {
      if !first {
        write!(f, "; ")?;
      }
      write!(f, "{field}: {message}")?;
      first = false;
    }
    Ok(())
  }
}

/// Accumulates named validation failures for a single request.
///
/// Checks never short-circuit: callers run every rule and only then decide,
/// through [`Validator::valid`] or [`Validator::into_result`], whether to reject.
#[derive(Debug, Default)]
pub struct Validator {
  errors: ValidationErrors,
}

impl Validator {
  pub fn new() -> Self {
    Self::default()
  }

  pub fn valid(&self) -> bool {
    self.errors.is_empty()
  }

  /// Records `message` under `field` unless the field already failed.
  pub fn add_error(&mut self, field: &str, message: impl Into<String>) {
    self.errors.0.entry(field.to_owned()).or_insert_with(|| message.into());
  }

  pub fn check(&mut self, ok: bool, field: &str, message: impl Into<String>) {
    if !ok {
      self.add_error(field, message);
    }
  }

  pub fn errors(&self) -> &ValidationErrors {
    &self.errors
  }

  pub fn into_result(self) -> Result<(), CoreError> {
    if self.valid() { Ok(()) } else { Err(CoreError::Validation(self.errors)) }
  }
}
