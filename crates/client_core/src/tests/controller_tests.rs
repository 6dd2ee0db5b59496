use super::*;
use std::collections::VecDeque;

use async_trait::async_trait;
use serde_json::json;
use shared::{
    domain::{AGE_FIELD, DIAGNOSIS_MASUK_FIELD, DIAGNOSIS_PRIMER_FIELD},
    error::ApiFailure,
    protocol::ServiceIndex,
};
use tokio::sync::Mutex;

struct FakePredictionApi {
    schema: Mutex<Option<Result<Schema, ClientError>>>,
    predictions: Mutex<VecDeque<Result<Value, ClientError>>>,
    submitted: Mutex<Vec<FormState>>,
}

impl FakePredictionApi {
    fn new(schema: Result<Schema, ClientError>) -> Self {
        Self {
            schema: Mutex::new(Some(schema)),
            predictions: Mutex::new(VecDeque::new()),
            submitted: Mutex::new(Vec::new()),
        }
    }

    fn with_prediction(self, outcome: Result<Value, ClientError>) -> Self {
        self.predictions.try_lock().expect("unlocked").push_back(outcome);
        self
    }
}

#[async_trait]
impl PredictionApi for FakePredictionApi {
    async fn fetch_schema(&self) -> Result<Schema, ClientError> {
        self.schema
            .lock()
            .await
            .take()
            .unwrap_or_else(|| Err(ClientError::SchemaStatus(500)))
    }

    async fn predict(&self, form: &FormState) -> Result<Value, ClientError> {
        self.submitted.lock().await.push(form.clone());
        self.predictions
            .lock()
            .await
            .pop_front()
            .unwrap_or(Err(ClientError::MissingPrediction))
    }

    async fn service_index(&self) -> Result<ServiceIndex, ClientError> {
        Ok(ServiceIndex {
            message: "fake".into(),
            endpoints: Vec::new(),
        })
    }
}

fn schema(raw: Value) -> Schema {
    Schema::parse_json(raw.to_string().as_bytes()).expect("schema")
}

fn loaded_controller(raw: Value) -> FormController {
    let mut controller = FormController::new();
    assert!(controller.apply_schema(Ok(schema(raw))));
    controller
}

#[test]
fn starts_loading_with_no_result() {
    let controller = FormController::new();
    assert!(controller.is_loading());
    assert!(!controller.is_submitting());
    assert!(controller.result().is_none());
    assert!(controller.form().is_empty());
}

#[test]
fn schema_scenario_seeds_expected_form() {
    let controller = loaded_controller(json!({
        "categorical": {"Jenis Kelamin": ["L", "P"]},
        "diagnosis_masuk": {"A00": "Cholera"},
        "diagnosis_primer": {}
    }));
    assert!(!controller.is_loading());
    assert_eq!(
        serde_json::to_value(controller.form()).expect("serialize"),
        json!({
            "Umur": 30,
            "Jenis Kelamin": "L",
            "diagnosis_masuk": "",
            "diagnosis_primer": ""
        })
    );
}

#[test]
fn schema_failure_falls_back_to_empty_schema() {
    let mut controller = FormController::new();
    assert!(controller.apply_schema(Err(ClientError::SchemaStatus(502))));

    let schema = controller.schema().expect("schema installed");
    assert!(schema.categorical.is_empty());
    assert!(schema.render_order().is_empty());
    assert!(controller.form().contains(AGE_FIELD));
    assert!(controller.form().contains(DIAGNOSIS_MASUK_FIELD));
    assert!(controller.form().contains(DIAGNOSIS_PRIMER_FIELD));
}

#[test]
fn schema_is_applied_only_once() {
    let mut controller = loaded_controller(json!({"categorical": {"Jenis Kelamin": ["L"]}}));
    controller.set_field("Jenis Kelamin", "P");

    assert!(!controller.apply_schema(Ok(schema(json!({"categorical": {"Other": ["x"]}})))));
    assert_eq!(controller.form().text("Jenis Kelamin"), "P");
    assert!(!controller.form().contains("Other"));
}

#[test]
fn begin_submit_clears_previous_result() {
    let mut controller = loaded_controller(json!({}));
    let ticket = controller.begin_submit();
    assert!(controller.complete_submit(ticket.seq, Ok(json!(5))));
    assert!(controller.result().is_some());
    assert!(controller.result_updated_at().is_some());

    let ticket = controller.begin_submit();
    assert!(controller.result().is_none());
    assert!(controller.is_submitting());
    assert_eq!(ticket.seq, 2);
}

#[test]
fn ticket_snapshots_form_at_submit_time() {
    let mut controller = loaded_controller(json!({}));
    controller.set_field(DIAGNOSIS_PRIMER_FIELD, "A00 — Cholera");
    let ticket = controller.begin_submit();
    controller.set_field(DIAGNOSIS_PRIMER_FIELD, "changed later");

    assert_eq!(ticket.form.text(DIAGNOSIS_PRIMER_FIELD), "A00 — Cholera");
    assert_eq!(controller.form().text(DIAGNOSIS_PRIMER_FIELD), "changed later");
}

#[test]
fn stale_responses_are_discarded() {
    let mut controller = loaded_controller(json!({}));
    let first = controller.begin_submit();
    let second = controller.begin_submit();

    assert!(controller.complete_submit(second.seq, Ok(json!(3.2))));
    assert!(!controller.complete_submit(first.seq, Ok(json!(9.9))));
    assert_eq!(controller.result(), Some(&PredictionResult::Estimate(3)));
    assert!(!controller.is_submitting());
}

#[test]
fn stale_response_does_not_end_current_submit() {
    let mut controller = loaded_controller(json!({}));
    let first = controller.begin_submit();
    let _second = controller.begin_submit();

    assert!(!controller.complete_submit(first.seq, Ok(json!(1))));
    assert!(controller.is_submitting());
    assert!(controller.result().is_none());
}

#[tokio::test]
async fn load_schema_uses_api() {
    let api = FakePredictionApi::new(Ok(schema(json!({
        "categorical": {"Tingkat Pelayanan FKRTL": ["RITL", "RJTL"]}
    }))));
    let mut controller = FormController::new();
    assert!(controller.load_schema(&api).await);
    assert_eq!(controller.form().text("Tingkat Pelayanan FKRTL"), "RITL");
}

#[tokio::test]
async fn load_schema_swallows_api_failure() {
    let api = FakePredictionApi::new(Err(ClientError::InvalidSchema("not json".into())));
    let mut controller = FormController::new();
    assert!(controller.load_schema(&api).await);
    assert_eq!(controller.schema(), Some(&Schema::empty()));
    assert!(controller.result().is_none());
}

#[tokio::test]
async fn submit_rounds_numeric_predictions() {
    let api = FakePredictionApi::new(Ok(Schema::empty()))
        .with_prediction(Ok(json!(7.4)))
        .with_prediction(Ok(json!(7.5)));
    let mut controller = FormController::new();
    controller.load_schema(&api).await;

    assert_eq!(
        controller.submit(&api).await,
        Some(&PredictionResult::Estimate(7))
    );
    assert_eq!(
        controller.submit(&api).await,
        Some(&PredictionResult::Estimate(8))
    );
}

#[tokio::test]
async fn submit_keeps_non_numeric_prediction() {
    let api = FakePredictionApi::new(Ok(Schema::empty())).with_prediction(Ok(json!("N/A")));
    let mut controller = FormController::new();
    controller.load_schema(&api).await;

    let result = controller.submit(&api).await.expect("result");
    assert_eq!(result.display(), "N/A");
}

#[tokio::test]
async fn submit_surfaces_server_detail_as_error_text() {
    let api = FakePredictionApi::new(Ok(Schema::empty())).with_prediction(Err(
        ClientError::PredictionRequest(ApiFailure::new(422, "Umur out of range")),
    ));
    let mut controller = FormController::new();
    controller.load_schema(&api).await;

    let result = controller.submit(&api).await.expect("result");
    assert_eq!(result.display(), "Error: Umur out of range");
    assert!(!controller.is_submitting());
}

#[tokio::test]
async fn submit_sends_current_form_and_keeps_it_for_resubmission() {
    let api = FakePredictionApi::new(Ok(schema(json!({
        "categorical": {"Jenis Kelamin": ["L", "P"]}
    }))))
    .with_prediction(Ok(json!(2)))
    .with_prediction(Ok(json!(4)));
    let mut controller = FormController::new();
    controller.load_schema(&api).await;
    controller.set_field(AGE_FIELD, 61.0);

    controller.submit(&api).await;
    controller.submit(&api).await;

    let submitted = api.submitted.lock().await;
    assert_eq!(submitted.len(), 2);
    assert_eq!(submitted[0], submitted[1]);
    assert_eq!(submitted[0].age(), Some(61.0));
    assert_eq!(submitted[0].text("Jenis Kelamin"), "L");
}
