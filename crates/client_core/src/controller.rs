//! Form state machine: one schema load, then any number of submits.
//!
//! The controller is owned by a single thread (the UI thread in the GUI).
//! I/O can happen elsewhere: `begin_submit` hands out a ticket carrying a
//! sequence number and a snapshot of the form, and `complete_submit` only
//! accepts the outcome for the most recent ticket.

use chrono::{DateTime, Utc};
use serde_json::Value;
use shared::domain::FieldValue;
use tracing::{info, warn};

use crate::{
    error::ClientError, form::FormState, prediction::PredictionResult, schema::Schema,
    PredictionApi,
};

#[derive(Debug, Clone)]
pub struct SubmitTicket {
    pub seq: u64,
    pub form: FormState,
}

#[derive(Debug, Default)]
pub struct FormController {
    schema: Option<Schema>,
    form: FormState,
    result: Option<PredictionResult>,
    latest_seq: u64,
    in_flight: Option<u64>,
    result_updated_at: Option<DateTime<Utc>>,
}

impl FormController {
    pub fn new() -> Self {
        Self::default()
    }

    /// Installs the schema (or the empty fallback) and seeds the form.
    /// Returns `false` if a schema was already installed.
    pub fn apply_schema(&mut self, outcome: Result<Schema, ClientError>) -> bool {
        if self.schema.is_some() {
            warn!("schema already loaded; ignoring repeated delivery");
            return false;
        }

        let schema = match outcome {
            Ok(schema) => {
                info!(
                    categorical = schema.categorical.len(),
                    diagnosis_masuk = schema.diagnosis_masuk.len(),
                    diagnosis_primer = schema.diagnosis_primer.len(),
                    "schema loaded"
                );
                schema
            }
            Err(err) => {
                warn!("schema load failed, continuing with empty schema: {err}");
                Schema::empty()
            }
        };

        self.form = FormState::from_schema(&schema);
        self.schema = Some(schema);
        true
    }

    pub async fn load_schema<A>(&mut self, api: &A) -> bool
    where
        A: PredictionApi + ?Sized,
    {
        let outcome = api.fetch_schema().await;
        self.apply_schema(outcome)
    }

    pub fn set_field(&mut self, key: impl Into<String>, value: impl Into<FieldValue>) {
        self.form.set_field(key, value);
    }

    /// Clears the result and issues a new ticket. Any earlier ticket becomes
    /// stale.
    pub fn begin_submit(&mut self) -> SubmitTicket {
        self.result = None;
        self.latest_seq += 1;
        self.in_flight = Some(self.latest_seq);
        info!(seq = self.latest_seq, fields = self.form.len(), "submitting prediction");
        SubmitTicket {
            seq: self.latest_seq,
            form: self.form.clone(),
        }
    }

    /// Records the outcome for ticket `seq`. Returns `false` and leaves state
    /// untouched if a newer ticket has been issued since.
    pub fn complete_submit(&mut self, seq: u64, outcome: Result<Value, ClientError>) -> bool {
        if seq != self.latest_seq {
            warn!(seq, latest = self.latest_seq, "discarding stale prediction response");
            return false;
        }

        let result = match outcome {
            Ok(prediction) => PredictionResult::from_prediction(prediction),
            Err(err) => {
                warn!(seq, "prediction failed: {err}");
                PredictionResult::from_error(&err)
            }
        };
        info!(seq, result = %result.display(), "prediction completed");

        self.in_flight = None;
        self.result = Some(result);
        self.result_updated_at = Some(Utc::now());
        true
    }

    pub async fn submit<A>(&mut self, api: &A) -> Option<&PredictionResult>
    where
        A: PredictionApi + ?Sized,
    {
        let ticket = self.begin_submit();
        let outcome = api.predict(&ticket.form).await;
        self.complete_submit(ticket.seq, outcome);
        self.result.as_ref()
    }

    pub fn schema(&self) -> Option<&Schema> {
        self.schema.as_ref()
    }

    pub fn form(&self) -> &FormState {
        &self.form
    }

    pub fn result(&self) -> Option<&PredictionResult> {
        self.result.as_ref()
    }

    pub fn result_updated_at(&self) -> Option<DateTime<Utc>> {
        self.result_updated_at
    }

    pub fn is_loading(&self) -> bool {
        self.schema.is_none()
    }

    pub fn is_submitting(&self) -> bool {
        self.in_flight.is_some()
    }
}

#[cfg(test)]
#[path = "tests/controller_tests.rs"]
mod tests;
