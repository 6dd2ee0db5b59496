use serde_json::Value;

use crate::error::ClientError;

/// What the result panel shows after a submit attempt.
#[derive(Debug, Clone, PartialEq)]
pub enum PredictionResult {
    /// Numeric prediction rounded to whole days.
    Estimate(i64),
    /// Non-numeric prediction, kept exactly as the server sent it.
    Raw(Value),
    Error(String),
}

impl PredictionResult {
    pub fn from_prediction(value: Value) -> Self {
        match value.as_f64().and_then(round_days) {
            Some(days) => PredictionResult::Estimate(days),
            None => PredictionResult::Raw(value),
        }
    }

    pub fn from_error(err: &ClientError) -> Self {
        PredictionResult::Error(err.to_string())
    }

    pub fn is_error(&self) -> bool {
        matches!(self, PredictionResult::Error(_))
    }

    pub fn display(&self) -> String {
        match self {
            PredictionResult::Estimate(days) => days.to_string(),
            PredictionResult::Raw(Value::String(text)) => text.clone(),
            PredictionResult::Raw(other) => other.to_string(),
            PredictionResult::Error(message) => format!("Error: {message}"),
        }
    }

    pub fn panel_text(&self) -> String {
        format!("Prediksi: {} Hari", self.display())
    }
}

/// Nearest whole day, halves away from zero. `None` when the result does not
/// fit in an `i64`.
fn round_days(days: f64) -> Option<i64> {
    let rounded = days.round();
    (rounded >= i64::MIN as f64 && rounded < i64::MAX as f64).then_some(rounded as i64)
}
