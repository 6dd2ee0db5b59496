//! UI/backend events and error modeling for the prediction form.

use client_core::{ClientError, Schema};
use serde_json::Value;

pub enum UiEvent {
    Info(String),
    Error(UiError),
    SchemaLoaded(Result<Schema, ClientError>),
    PredictionFinished {
        seq: u64,
        outcome: Result<Value, ClientError>,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UiErrorCategory {
    Transport,
    Configuration,
    Unknown,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UiErrorContext {
    BackendStartup,
    Dispatch,
}

/// Worker-level failure shown in the status banner. Prediction errors do not
/// go through here; they land in the result panel.
#[derive(Debug, Clone)]
pub struct UiError {
    category: UiErrorCategory,
    context: UiErrorContext,
    message: String,
}

impl UiError {
    pub fn from_message(context: UiErrorContext, message: impl Into<String>) -> Self {
        let message = message.into();
        let message_lower = message.to_ascii_lowercase();
        let category = if message_lower.contains("config")
            || message_lower.contains("api base")
            || message_lower.contains("invalid url")
        {
            UiErrorCategory::Configuration
        } else if message_lower.contains("runtime")
            || message_lower.contains("disconnect")
            || message_lower.contains("queue")
            || message_lower.contains("connection")
        {
            UiErrorCategory::Transport
        } else {
            UiErrorCategory::Unknown
        };

        Self {
            category,
            context,
            message,
        }
    }

    pub fn category(&self) -> UiErrorCategory {
        self.category
    }

    pub fn context(&self) -> UiErrorContext {
        self.context
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn banner_text(&self) -> String {
        let prefix = match self.context {
            UiErrorContext::BackendStartup => "Backend worker failed to start",
            UiErrorContext::Dispatch => "Could not reach backend worker",
        };
        format!("{prefix}: {}", self.message)
    }
}
