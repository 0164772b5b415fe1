//! The uniform response envelope: `{success, data?, error?, details?}`.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::{executor::Outcome, validate::FieldError};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Envelope<T = Value> {
  pub success: bool,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub data:    Option<T>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub error:   Option<String>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub details: Option<Vec<FieldError>>,
}

impl<T> Envelope<T> {
  pub fn ok(data: T) -> Self {
    Self { success: true, data: Some(data), error: None, details: None }
  }

  pub fn err(message: impl Into<String>) -> Self {
    Self {
      success: false,
      data:    None,
      error:   Some(message.into()),
      details: None,
    }
  }
}

impl From<Outcome> for Envelope {
  fn from(outcome: Outcome) -> Self {
    match outcome {
      Ok(data) => Envelope::ok(data),
      Err(failure) => Envelope {
        success: false,
        data:    None,
        error:   Some(failure.message),
        details: (!failure.details.is_empty()).then_some(failure.details),
      },
    }
  }
}
