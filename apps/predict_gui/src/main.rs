mod backend_bridge;
mod controller;
mod ui;

use std::path::PathBuf;

use anyhow::{anyhow, Context, Result};
use clap::Parser;
use client_core::{load_settings, HttpPredictionApi};
use crossbeam_channel::bounded;
use eframe::egui;
use tracing_subscriber::EnvFilter;

use backend_bridge::commands::BackendCommand;
use controller::events::UiEvent;
use ui::{PredictionFormApp, StartupConfig};

#[derive(Parser, Debug)]
#[command(name = "predict_gui", about = "Length-of-stay prediction form")]
struct Args {
    /// Prediction service base URL; overrides config file and environment.
    #[arg(long)]
    api_base: Option<String>,
    /// Path to a TOML settings file (default: client.toml if present).
    #[arg(long)]
    config: Option<PathBuf>,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    let args = Args::parse();
    let mut settings = load_settings(args.config.as_deref())?;
    if let Some(api_base) = args.api_base {
        settings.api_base = api_base;
    }
    let api = HttpPredictionApi::new(&settings).context("invalid client settings")?;
    tracing::info!(api_base = %api.api_base(), "starting prediction form");

    let (cmd_tx, cmd_rx) = bounded::<BackendCommand>(256);
    let (ui_tx, ui_rx) = bounded::<UiEvent>(2048);
    backend_bridge::runtime::launch(api, cmd_rx, ui_tx);

    let startup = StartupConfig::default();
    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_title(startup.window_title.as_str())
            .with_inner_size([560.0, 760.0])
            .with_min_inner_size([420.0, 480.0]),
        ..Default::default()
    };
    eframe::run_native(
        "Prediksi Lama Rawat",
        options,
        Box::new(move |_cc| Ok(Box::new(PredictionFormApp::bootstrap(cmd_tx, ui_rx, startup)))),
    )
    .map_err(|err| anyhow!("failed to run prediction form: {err}"))
}
