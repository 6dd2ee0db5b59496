use async_trait::async_trait;
use reqwest::Client;
use serde_json::Value;
use shared::{
    error::ApiFailure,
    protocol::{PredictRequest, PredictResponse, ServiceIndex},
};
use tracing::debug;

pub mod config;
pub mod controller;
pub mod error;
pub mod form;
pub mod prediction;
pub mod schema;

pub use config::{load_settings, ApiBase, Settings};
pub use controller::{FormController, SubmitTicket};
pub use error::ClientError;
pub use form::FormState;
pub use prediction::PredictionResult;
pub use schema::{CategoricalField, DiagnosisCatalog, DiagnosisEntry, Schema};

/// The two calls the form needs from the prediction service, plus a
/// reachability probe.
#[async_trait]
pub trait PredictionApi: Send + Sync {
    async fn fetch_schema(&self) -> Result<Schema, ClientError>;
    /// Posts `{"data": form}` and returns the raw `prediction` value.
    async fn predict(&self, form: &FormState) -> Result<Value, ClientError>;
    async fn service_index(&self) -> Result<ServiceIndex, ClientError>;
}

pub struct HttpPredictionApi {
    http: Client,
    api_base: ApiBase,
}

impl HttpPredictionApi {
    pub fn new(settings: &Settings) -> Result<Self, ClientError> {
        let api_base = settings.api_base()?;
        let mut builder = Client::builder();
        if let Some(timeout) = settings.request_timeout() {
            builder = builder.timeout(timeout);
        }
        Ok(Self::with_client(builder.build()?, api_base))
    }

    pub fn with_client(http: Client, api_base: ApiBase) -> Self {
        Self { http, api_base }
    }

    pub fn api_base(&self) -> &ApiBase {
        &self.api_base
    }
}

#[async_trait]
impl PredictionApi for HttpPredictionApi {
    async fn fetch_schema(&self) -> Result<Schema, ClientError> {
        let url = self.api_base.endpoint("schema")?;
        debug!(%url, "fetching schema");
        let response = self.http.get(url).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(ClientError::SchemaStatus(status.as_u16()));
        }
        let body = response.bytes().await?;
        Schema::parse_json(&body)
    }

    async fn predict(&self, form: &FormState) -> Result<Value, ClientError> {
        let url = self.api_base.endpoint("predict")?;
        debug!(%url, fields = form.len(), "posting prediction request");
        let response = self
            .http
            .post(url)
            .json(&PredictRequest { data: form })
            .send()
            .await?;

        // The body is JSON on success and failure alike.
        let status = response.status();
        let bytes = response.bytes().await?;
        let body: Value = serde_json::from_slice(&bytes)?;
        if !status.is_success() {
            return Err(ApiFailure::from_body(status.as_u16(), &body).into());
        }

        let parsed: PredictResponse = serde_json::from_value(body)?;
        parsed.prediction.ok_or(ClientError::MissingPrediction)
    }

    async fn service_index(&self) -> Result<ServiceIndex, ClientError> {
        let url = self.api_base.endpoint("")?;
        let index = self
            .http
            .get(url)
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;
        Ok(index)
    }
}

#[cfg(test)]
#[path = "tests/lib_tests.rs"]
mod tests;
