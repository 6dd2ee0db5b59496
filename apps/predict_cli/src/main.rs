use std::{path::PathBuf, process::ExitCode};

use anyhow::{anyhow, Context, Result};
use clap::{Args, Parser, Subcommand};
use client_core::{
    load_settings, DiagnosisCatalog, FormController, HttpPredictionApi, PredictionApi, Schema,
};
use shared::{
    domain::{DiagnosisKind, AGE_FIELD},
    protocol::PredictRequest,
};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "predict", about = "Length-of-stay prediction client")]
struct Cli {
    /// Prediction service origin, e.g. http://localhost:8000
    #[arg(long, global = true)]
    api_base: Option<String>,
    /// Settings file; defaults to ./client.toml when present
    #[arg(long, global = true)]
    config: Option<PathBuf>,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print the form schema in display order
    Schema {
        #[arg(long)]
        json: bool,
    },
    /// Fill the form from defaults plus overrides and submit it once
    Predict(PredictArgs),
    /// Check that the service answers on its root endpoint
    Status,
}

#[derive(Args, Debug)]
struct PredictArgs {
    #[arg(long)]
    umur: Option<f64>,
    /// Categorical override as `Name=Value`; repeatable
    #[arg(long = "field", value_parser = parse_field_override)]
    fields: Vec<(String, String)>,
    /// Diagnosis text, or a bare code to pick its suggestion
    #[arg(long)]
    diagnosis_masuk: Option<String>,
    #[arg(long)]
    diagnosis_primer: Option<String>,
    /// Also print the request payload
    #[arg(long)]
    json: bool,
}

fn parse_field_override(raw: &str) -> Result<(String, String), String> {
    let (name, value) = raw
        .split_once('=')
        .ok_or_else(|| format!("expected Name=Value, got '{raw}'"))?;
    let name = name.trim();
    if name.is_empty() {
        return Err(format!("missing field name in '{raw}'"));
    }
    Ok((name.to_string(), value.trim().to_string()))
}

/// A bare code that exists in the catalog becomes its suggestion label, the
/// same value the GUI stores when the suggestion is picked.
fn resolve_diagnosis(catalog: &DiagnosisCatalog, input: &str) -> String {
    let input = input.trim();
    catalog
        .entries()
        .iter()
        .find(|entry| entry.code.eq_ignore_ascii_case(input))
        .map(|entry| entry.label())
        .unwrap_or_else(|| input.to_string())
}

fn print_schema(schema: &Schema) {
    if schema.categorical.is_empty() {
        println!("No categorical fields available.");
    }
    for field in schema.render_order() {
        println!("{}: {}", field.name, field.options.join(", "));
    }
    for kind in DiagnosisKind::ALL {
        let catalog = schema.diagnosis(kind);
        println!("{} ({} entries)", kind.label(), catalog.len());
        for entry in catalog.entries() {
            println!("  {}", entry.label());
        }
    }
}

async fn run_predict(api: &HttpPredictionApi, args: PredictArgs) -> Result<ExitCode> {
    let mut controller = FormController::new();
    controller.load_schema(api).await;
    let schema = controller.schema().cloned().unwrap_or_else(Schema::empty);

    if let Some(umur) = args.umur {
        controller.set_field(AGE_FIELD, umur);
    }
    for (name, value) in args.fields {
        match schema.categorical_field(&name) {
            None => tracing::warn!(field = %name, "field is not part of the schema"),
            Some(field) if !field.options.contains(&value) => {
                tracing::warn!(field = %name, value = %value, "value is not a listed option")
            }
            Some(_) => {}
        }
        controller.set_field(name, value);
    }
    let diagnoses = [
        (DiagnosisKind::Masuk, args.diagnosis_masuk),
        (DiagnosisKind::Primer, args.diagnosis_primer),
    ];
    for (kind, input) in diagnoses {
        if let Some(input) = input {
            let value = resolve_diagnosis(schema.diagnosis(kind), &input);
            controller.set_field(kind.field_name(), value);
        }
    }

    if args.json {
        let payload = PredictRequest {
            data: controller.form(),
        };
        println!("{}", serde_json::to_string_pretty(&payload)?);
    }

    let result = controller
        .submit(api)
        .await
        .cloned()
        .ok_or_else(|| anyhow!("prediction finished without a result"))?;
    println!("{}", result.panel_text());

    Ok(if result.is_error() {
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    })
}

#[tokio::main]
async fn main() -> Result<ExitCode> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();
    let cli = Cli::parse();

    let mut settings = load_settings(cli.config.as_deref())?;
    if let Some(api_base) = cli.api_base {
        settings.api_base = api_base;
    }
    let api = HttpPredictionApi::new(&settings).context("invalid client settings")?;
    tracing::info!(api_base = %api.api_base(), "prediction client ready");

    match cli.command {
        Command::Schema { json } => {
            let mut controller = FormController::new();
            controller.load_schema(&api).await;
            let schema = controller.schema().cloned().unwrap_or_else(Schema::empty);
            if json {
                println!("{}", serde_json::to_string_pretty(&schema.to_payload())?);
            } else {
                print_schema(&schema);
            }
            Ok(ExitCode::SUCCESS)
        }
        Command::Predict(args) => run_predict(&api, args).await,
        Command::Status => match api.service_index().await {
            Ok(index) => {
                println!("{}", index.message);
                for endpoint in index.endpoints {
                    println!("  {endpoint}");
                }
                Ok(ExitCode::SUCCESS)
            }
            Err(err) => {
                eprintln!("service unreachable at {}: {err}", api.api_base());
                Ok(ExitCode::FAILURE)
            }
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared::protocol::SchemaPayload;

    fn catalog() -> DiagnosisCatalog {
        let payload = SchemaPayload {
            diagnosis_masuk: vec![(
                "N20".to_string(),
                "Calculus of kidney and ureter".to_string(),
            )],
            ..SchemaPayload::default()
        };
        Schema::from(payload).diagnosis_masuk
    }

    #[test]
    fn parses_field_overrides() {
        assert_eq!(
            parse_field_override("Jenis Kelamin = LAKI-LAKI"),
            Ok(("Jenis Kelamin".to_string(), "LAKI-LAKI".to_string()))
        );
        assert!(parse_field_override("no-separator").is_err());
        assert!(parse_field_override("=value").is_err());
    }

    #[test]
    fn bare_code_resolves_to_suggestion_label() {
        assert_eq!(
            resolve_diagnosis(&catalog(), "n20"),
            "N20 — Calculus of kidney and ureter"
        );
    }

    #[test]
    fn free_text_diagnosis_is_kept() {
        assert_eq!(resolve_diagnosis(&catalog(), " kidney stone "), "kidney stone");
    }

    #[test]
    fn cli_accepts_repeated_fields() {
        let cli = Cli::try_parse_from([
            "predict",
            "--api-base",
            "http://127.0.0.1:9000",
            "predict",
            "--umur",
            "55",
            "--field",
            "Jenis Kelamin=LAKI-LAKI",
            "--field",
            "Segmentasi Peserta=PPU",
        ])
        .expect("parse");
        assert_eq!(cli.api_base.as_deref(), Some("http://127.0.0.1:9000"));
        match cli.command {
            Command::Predict(args) => {
                assert_eq!(args.umur, Some(55.0));
                assert_eq!(args.fields.len(), 2);
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }
}
