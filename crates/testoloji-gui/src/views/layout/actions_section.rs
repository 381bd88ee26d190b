use eframe::egui;
use testoloji_runtime::Command;
use tokio::sync::mpsc;

use super::state::LayoutViewState;
use crate::ui_components::labeled_drag_clamped;

pub fn show_source(ui: &mut egui::Ui, state: &LayoutViewState, command_tx: &mpsc::UnboundedSender<Command>) {
    if ui.button("📂 Load question bank...").clicked() {
        if let Some(path) = rfd::FileDialog::new()
            .add_filter("Question bank", &["json"])
            .pick_file()
        {
            let _ = command_tx.send(Command::ManifestLoad { path });
        }
    }

    match &state.manifest_path {
        Some(path) => {
            ui.label(format!("{} ({} questions)", path.display(), state.questions.len()));
        }
        None => {
            ui.label("No question bank loaded");
        }
    }
}

pub fn show_config_buttons(
    ui: &mut egui::Ui,
    state: &LayoutViewState,
    runtime: &tokio::runtime::Handle,
    command_tx: &mpsc::UnboundedSender<Command>,
) {
    ui.horizontal(|ui| {
        if ui.button("💾 Save Configuration").clicked() {
            if let Some(path) = rfd::FileDialog::new()
                .add_filter("JSON", &["json"])
                .set_file_name("layout_config.json")
                .save_file()
            {
                let options = state.options.clone();
                runtime.spawn(async move {
                    if let Err(e) = options.save(&path).await {
                        log::error!("Failed to save configuration: {}", e);
                    } else {
                        log::info!("Configuration saved to {}", path.display());
                    }
                });
            }
        }

        if ui.button("📂 Load Configuration").clicked() {
            if let Some(path) = rfd::FileDialog::new()
                .add_filter("JSON", &["json"])
                .pick_file()
            {
                let _ = command_tx.send(Command::LayoutLoadConfig { path });
            }
        }
    });
}

pub fn show_export(ui: &mut egui::Ui, state: &LayoutViewState, command_tx: &mpsc::UnboundedSender<Command>) {
    let validation = state.options.validate();
    if let Err(e) = &validation {
        ui.colored_label(ui.visuals().error_fg_color, e.to_string());
    }
    let can_export = !state.questions.is_empty() && validation.is_ok();

    if ui
        .add_enabled(can_export, egui::Button::new("📄 Export PDF..."))
        .clicked()
    {
        if let Some(path) = rfd::FileDialog::new()
            .add_filter("PDF", &["pdf"])
            .set_file_name("exam.pdf")
            .save_file()
        {
            log::info!("Exporting exam to {}", path.display());
            let _ = command_tx.send(Command::LayoutExport {
                questions: state.questions.clone(),
                options: state.options.clone(),
                output_path: path,
            });
        }
    }

    if ui
        .add_enabled(can_export, egui::Button::new("🔑 Export answer key..."))
        .clicked()
    {
        if let Some(path) = rfd::FileDialog::new()
            .add_filter("CSV", &["csv"])
            .set_file_name("answer_key.csv")
            .save_file()
        {
            let _ = command_tx.send(Command::AnswerKeyExport {
                questions: state.questions.clone(),
                options: state.options.clone(),
                output_path: path,
            });
        }
    }
}

pub fn show_timer(ui: &mut egui::Ui, state: &mut LayoutViewState, runtime: &tokio::runtime::Handle) {
    egui::CollapsingHeader::new("⏱ Exam timer")
        .default_open(false)
        .show(ui, |ui| {
            let timer = &mut state.timer;
            if timer.is_running() {
                if let Some(remaining) = timer.remaining {
                    let secs = remaining.as_secs();
                    ui.heading(format!("{:02}:{:02}", secs / 60, secs % 60));
                }
                if ui.button("⏹ Stop").clicked() {
                    timer.stop();
                }
            } else {
                labeled_drag_clamped(ui, "Duration:", &mut timer.minutes, 1..=300, " min");
                if ui.button("▶ Start").clicked() {
                    timer.start(runtime);
                }
                if timer.expired {
                    ui.colored_label(ui.visuals().warn_fg_color, "Time is up");
                }
            }
        });
}
