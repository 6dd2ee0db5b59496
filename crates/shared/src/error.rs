use serde_json::Value;
use thiserror::Error;

/// A non-2xx answer from the prediction service.
///
/// The message is the body's `detail` when it carries a meaningful value,
/// otherwise the whole body serialized back to JSON.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct ApiFailure {
    pub status: u16,
    pub message: String,
}

impl ApiFailure {
    pub fn new(status: u16, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
        }
    }

    pub fn from_body(status: u16, body: &Value) -> Self {
        let message = match body.get("detail") {
            Some(detail) if is_truthy(detail) => match detail {
                Value::String(text) => text.clone(),
                other => other.to_string(),
            },
            _ => body.to_string(),
        };
        Self { status, message }
    }
}

fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(flag) => *flag,
        Value::Number(number) => number.as_f64().is_some_and(|n| n != 0.0),
        Value::String(text) => !text.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}
