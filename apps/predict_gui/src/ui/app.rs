use chrono::Local;
use client_core::{ClientError, FormController, PredictionResult, Schema};
use crossbeam_channel::{Receiver, Sender};
use eframe::egui;
use shared::domain::{DiagnosisKind, AGE_FIELD, AGE_HINT_MAX, AGE_HINT_MIN, DEFAULT_AGE};

use crate::backend_bridge::commands::BackendCommand;
use crate::controller::events::{UiError, UiErrorCategory, UiEvent};
use crate::controller::orchestration::dispatch_backend_command;

const MAX_VISIBLE_SUGGESTIONS: usize = 8;
const DIAGNOSIS_HINT: &str = "ketik nama diagnosis atau pilih dari saran";
const STATUS_BAR_ID: &str = "status_bar";

#[derive(Debug, Clone)]
pub struct StartupConfig {
    pub window_title: String,
}

impl Default for StartupConfig {
    fn default() -> Self {
        Self {
            window_title: "Prediksi Lama Rawat".to_string(),
        }
    }
}

fn err_label(category: UiErrorCategory) -> &'static str {
    match category {
        UiErrorCategory::Transport => "Connection",
        UiErrorCategory::Configuration => "Configuration",
        UiErrorCategory::Unknown => "Error",
    }
}

pub struct PredictionFormApp {
    cmd_tx: Sender<BackendCommand>,
    ui_rx: Receiver<UiEvent>,

    title: String,
    controller: FormController,

    status: String,
    status_banner: Option<UiError>,

    /// Diagnosis input whose suggestion list is open.
    active_diagnosis: Option<DiagnosisKind>,
}

impl PredictionFormApp {
    pub fn bootstrap(
        cmd_tx: Sender<BackendCommand>,
        ui_rx: Receiver<UiEvent>,
        startup: StartupConfig,
    ) -> Self {
        let mut app = Self {
            cmd_tx,
            ui_rx,
            title: startup.window_title,
            controller: FormController::new(),
            status: "Loading schema".to_string(),
            status_banner: None,
            active_diagnosis: None,
        };
        app.dispatch(BackendCommand::LoadSchema);
        app
    }

    fn dispatch(&mut self, cmd: BackendCommand) -> bool {
        match dispatch_backend_command(&self.cmd_tx, cmd) {
            Ok(()) => true,
            Err(err) => {
                self.status = err.message().to_string();
                self.status_banner = Some(err);
                false
            }
        }
    }

    fn process_ui_events(&mut self) {
        while let Ok(event) = self.ui_rx.try_recv() {
            self.handle_event(event);
        }
    }

    fn handle_event(&mut self, event: UiEvent) {
        match event {
            UiEvent::Info(message) => {
                self.status = message;
            }
            UiEvent::Error(err) => {
                tracing::error!(context = ?err.context(), "{}", err.message());
                self.status = err.message().to_string();
                self.status_banner = Some(err);
            }
            UiEvent::SchemaLoaded(outcome) => {
                let failed = outcome.is_err();
                if self.controller.apply_schema(outcome) {
                    self.status = if failed {
                        "Schema unavailable; only the fixed fields are shown".to_string()
                    } else {
                        "Schema loaded".to_string()
                    };
                }
            }
            UiEvent::PredictionFinished { seq, outcome } => {
                if self.controller.complete_submit(seq, outcome) {
                    self.status = match self.controller.result() {
                        Some(result) if result.is_error() => "Prediction failed".to_string(),
                        _ => "Prediction received".to_string(),
                    };
                }
            }
        }
    }

    fn submit(&mut self) {
        if self.controller.is_submitting() {
            return;
        }
        self.active_diagnosis = None;
        let ticket = self.controller.begin_submit();
        let seq = ticket.seq;
        self.status = "Submitting".to_string();
        if !self.dispatch(BackendCommand::Predict { ticket }) {
            let reason = self.status.clone();
            self.controller
                .complete_submit(seq, Err(ClientError::BackendUnavailable(reason)));
        }
    }

    fn show_status_banner(&mut self, ui: &mut egui::Ui) {
        if let Some(banner) = self.status_banner.clone() {
            egui::Frame::NONE
                .fill(egui::Color32::from_rgb(111, 53, 53))
                .stroke(egui::Stroke::new(1.0, egui::Color32::from_rgb(175, 96, 96)))
                .corner_radius(8.0)
                .inner_margin(egui::Margin::symmetric(10, 8))
                .show(ui, |ui| {
                    ui.horizontal_wrapped(|ui| {
                        ui.label(
                            egui::RichText::new(format!(
                                "{}: {}",
                                err_label(banner.category()),
                                banner.banner_text()
                            ))
                            .color(egui::Color32::WHITE),
                        );
                        ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                            if ui.button("Dismiss").clicked() {
                                self.status_banner = None;
                            }
                        });
                    });
                });
            ui.add_space(8.0);
        }
    }

    fn show_age_field(&mut self, ui: &mut egui::Ui) {
        ui.label(egui::RichText::new(AGE_FIELD).strong());
        let mut age = self.controller.form().age().unwrap_or(DEFAULT_AGE);
        // Unclamped; the range below is only a hint.
        let response = ui.add(egui::DragValue::new(&mut age).speed(1.0).max_decimals(0));
        if response.changed() {
            self.controller.set_field(AGE_FIELD, age);
        }
        ui.small(format!(
            "Masukkan umur pasien (rentang disarankan {AGE_HINT_MIN}–{AGE_HINT_MAX})."
        ));
    }

    fn show_categorical_fields(&mut self, ui: &mut egui::Ui, schema: &Schema) {
        for field in schema.render_order() {
            ui.add_space(6.0);
            ui.label(egui::RichText::new(&field.name).strong());

            let current = self.controller.form().text(&field.name).to_string();
            let mut picked = None;
            egui::ComboBox::from_id_salt(("categorical", field.name.as_str()))
                .selected_text(current.as_str())
                .width(ui.available_width().min(360.0))
                .show_ui(ui, |ui| {
                    for option in &field.options {
                        if ui
                            .selectable_label(*option == current, option.as_str())
                            .clicked()
                        {
                            picked = Some(option.clone());
                        }
                    }
                });

            if let Some(value) = picked {
                self.controller.set_field(field.name.clone(), value);
            }
        }
    }

    fn show_diagnosis_field(&mut self, ui: &mut egui::Ui, schema: &Schema, kind: DiagnosisKind) {
        ui.add_space(6.0);
        ui.label(egui::RichText::new(kind.label()).strong());

        let mut text = self.controller.form().text(kind.field_name()).to_string();
        let response = ui.add(
            egui::TextEdit::singleline(&mut text)
                .id_salt(("diagnosis", kind.field_name()))
                .hint_text(DIAGNOSIS_HINT)
                .desired_width(f32::INFINITY),
        );
        if response.changed() {
            self.controller.set_field(kind.field_name(), text.clone());
        }
        if response.gained_focus() || response.changed() {
            self.active_diagnosis = Some(kind);
        }
        if response.has_focus() && ui.input(|i| i.key_pressed(egui::Key::Escape)) {
            self.active_diagnosis = None;
        }

        if self.active_diagnosis != Some(kind) {
            return;
        }

        let catalog = schema.diagnosis(kind);
        let mut picked = None;
        let mut shown = 0;
        egui::Frame::NONE
            .fill(ui.visuals().faint_bg_color)
            .corner_radius(6.0)
            .inner_margin(egui::Margin::symmetric(8, 6))
            .show(ui, |ui| {
                egui::ScrollArea::vertical()
                    .id_salt(("diagnosis_suggestions", kind.field_name()))
                    .max_height(180.0)
                    .show(ui, |ui| {
                        for entry in catalog.suggestions(&text).take(MAX_VISIBLE_SUGGESTIONS) {
                            shown += 1;
                            let label = entry.label();
                            if ui
                                .selectable_label(label == text, &label)
                                .on_hover_text(&entry.description)
                                .clicked()
                            {
                                picked = Some(label);
                            }
                        }
                        if shown == 0 {
                            ui.weak("Tidak ada saran");
                        }
                    });
            });

        if let Some(label) = picked {
            self.controller.set_field(kind.field_name(), label);
            self.active_diagnosis = None;
        }
    }

    fn show_result_panel(&self, ui: &mut egui::Ui) {
        let Some(result) = self.controller.result() else {
            return;
        };

        let fill = match result {
            PredictionResult::Error(_) => egui::Color32::from_rgb(111, 53, 53),
            _ => egui::Color32::from_rgb(40, 88, 64),
        };
        egui::Frame::NONE
            .fill(fill)
            .corner_radius(8.0)
            .inner_margin(egui::Margin::symmetric(12, 10))
            .show(ui, |ui| {
                ui.label(
                    egui::RichText::new(result.panel_text())
                        .size(18.0)
                        .strong()
                        .color(egui::Color32::WHITE),
                );
                if let Some(updated_at) = self.controller.result_updated_at() {
                    ui.small(
                        egui::RichText::new(format!(
                            "Diperbarui {}",
                            updated_at.with_timezone(&Local).format("%H:%M:%S")
                        ))
                        .color(egui::Color32::LIGHT_GRAY),
                    );
                }
            });
    }

    /// Draws the status bar and the form, returning the area the form got.
    fn show_form(&mut self, ctx: &egui::Context) -> egui::Rect {
        // Panels have to be added before the central panel.
        egui::TopBottomPanel::bottom(STATUS_BAR_ID).show(ctx, |ui| {
            ui.horizontal_wrapped(|ui| {
                ui.small("Status:");
                ui.small(egui::RichText::new(&self.status).weak());
            });
        });

        egui::CentralPanel::default().show(ctx, |ui| {
            ui.heading(self.title.as_str());
            ui.add_space(8.0);
            self.show_status_banner(ui);

            let Some(schema) = self.controller.schema().cloned() else {
                ui.heading("Loading schema...");
                return;
            };

            egui::ScrollArea::vertical().show(ui, |ui| {
                self.show_age_field(ui);
                self.show_categorical_fields(ui, &schema);
                for kind in DiagnosisKind::ALL {
                    self.show_diagnosis_field(ui, &schema, kind);
                }

                ui.add_space(16.0);
                let submitting = self.controller.is_submitting();
                let label = if submitting { "Submitting..." } else { "Submit" };
                if ui
                    .add_enabled(!submitting, egui::Button::new(label))
                    .clicked()
                {
                    self.submit();
                }

                ui.add_space(12.0);
                self.show_result_panel(ui);
            });
        })
        .response
        .rect
    }
}

impl eframe::App for PredictionFormApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.process_ui_events();
        self.show_form(ctx);

        if self.controller.is_loading() || self.controller.is_submitting() {
            ctx.request_repaint_after(std::time::Duration::from_millis(100));
        }
    }
}
