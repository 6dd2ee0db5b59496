//! Backend commands queued from UI to backend worker.

use client_core::SubmitTicket;

pub enum BackendCommand {
    LoadSchema,
    Predict { ticket: SubmitTicket },
}

impl BackendCommand {
    pub fn name(&self) -> &'static str {
        match self {
            BackendCommand::LoadSchema => "load_schema",
            BackendCommand::Predict { .. } => "predict",
        }
    }
}
