//! Worker thread that performs prediction-service I/O on behalf of the UI.

pub mod commands;
pub mod runtime;
