//! Runtime bridge between UI command queue and backend event intake.
//!
//! Commands are received on a plain thread and each one runs as its own task,
//! so a slow prediction never holds up the next command.

use std::{sync::Arc, thread};

use client_core::{HttpPredictionApi, PredictionApi};
use crossbeam_channel::{Receiver, Sender};

use crate::backend_bridge::commands::BackendCommand;
use crate::controller::events::{UiError, UiErrorContext, UiEvent};

pub fn launch(api: HttpPredictionApi, cmd_rx: Receiver<BackendCommand>, ui_tx: Sender<UiEvent>) {
    thread::spawn(move || {
        let runtime = match tokio::runtime::Builder::new_multi_thread()
            .enable_all()
            .build()
        {
            Ok(runtime) => runtime,
            Err(err) => {
                let _ = ui_tx.try_send(UiEvent::Error(UiError::from_message(
                    UiErrorContext::BackendStartup,
                    format!("backend worker startup failure: failed to build runtime: {err}"),
                )));
                tracing::error!("failed to build backend runtime: {err}");
                return;
            }
        };

        let api = Arc::new(api);
        let _ = ui_tx.try_send(UiEvent::Info(format!(
            "Backend worker ready ({})",
            api.api_base()
        )));

        while let Ok(cmd) = cmd_rx.recv() {
            let api = Arc::clone(&api);
            let ui_tx = ui_tx.clone();
            runtime.spawn(async move {
                let event = run_command(api.as_ref(), cmd).await;
                if ui_tx.send(event).is_err() {
                    tracing::debug!("ui event receiver dropped; discarding backend event");
                }
            });
        }

        tracing::info!("ui command queue closed; backend worker stopping");
    });
}

async fn run_command<A>(api: &A, cmd: BackendCommand) -> UiEvent
where
    A: PredictionApi + ?Sized,
{
    match cmd {
        BackendCommand::LoadSchema => {
            tracing::info!("backend: load_schema");
            UiEvent::SchemaLoaded(api.fetch_schema().await)
        }
        BackendCommand::Predict { ticket } => {
            tracing::info!(seq = ticket.seq, "backend: predict");
            let outcome = api.predict(&ticket.form).await;
            if let Err(err) = &outcome {
                tracing::error!(seq = ticket.seq, "backend: predict failed: {err}");
            }
            UiEvent::PredictionFinished {
                seq: ticket.seq,
                outcome,
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use async_trait::async_trait;
    use client_core::{ClientError, FormController, FormState, Schema};
    use serde_json::{json, Value};
    use shared::protocol::ServiceIndex;

    struct StubApi;

    #[async_trait]
    impl PredictionApi for StubApi {
        async fn fetch_schema(&self) -> Result<Schema, ClientError> {
            Ok(Schema::empty())
        }

        async fn predict(&self, form: &FormState) -> Result<Value, ClientError> {
            Ok(json!(form.age().unwrap_or_default() / 10.0))
        }

        async fn service_index(&self) -> Result<ServiceIndex, ClientError> {
            Ok(ServiceIndex {
                message: "ok".into(),
                endpoints: Vec::new(),
            })
        }
    }

    #[tokio::test]
    async fn load_schema_command_yields_schema_event() {
        let event = run_command(&StubApi, BackendCommand::LoadSchema).await;
        assert!(matches!(event, UiEvent::SchemaLoaded(Ok(schema)) if schema == Schema::empty()));
    }

    #[tokio::test]
    async fn predict_command_echoes_ticket_sequence() {
        let mut controller = FormController::new();
        controller.apply_schema(Ok(Schema::empty()));
        controller.begin_submit();
        let ticket = controller.begin_submit();

        let event = run_command(&StubApi, BackendCommand::Predict { ticket }).await;
        match event {
            UiEvent::PredictionFinished { seq, outcome } => {
                assert_eq!(seq, 2);
                assert_eq!(outcome.expect("prediction"), json!(3.0));
            }
            _ => panic!("unexpected event"),
        }
    }
}
