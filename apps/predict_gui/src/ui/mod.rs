pub mod app;

pub use app::{PredictionFormApp, StartupConfig};
