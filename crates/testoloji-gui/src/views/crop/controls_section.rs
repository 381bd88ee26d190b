use eframe::egui;
use testoloji_runtime::Command;
use tokio::sync::mpsc;

use super::state::{CropViewState, ZOOM_RANGE};
use crate::ui_components::{SliderBuilder, answer_picker, difficulty_picker, labeled_drag_clamped};

pub fn show(ui: &mut egui::Ui, state: &mut CropViewState, command_tx: &mpsc::UnboundedSender<Command>) {
    show_document(ui, state, command_tx);
    ui.add_space(10.0);
    ui.separator();

    egui::CollapsingHeader::new("🔍 View")
        .default_open(true)
        .show(ui, |ui| {
            let changed = SliderBuilder::new(&mut state.zoom, ZOOM_RANGE)
                .text("Zoom")
                .suffix("×")
                .step(0.05)
                .show(ui);
            if changed {
                state.zoom_changed();
            }
            if state.render_pending() {
                ui.label("Sharpening...");
            }
        });

    egui::CollapsingHeader::new("✂ Selection")
        .default_open(true)
        .show(ui, |ui| {
            let mut magnet = state.session.magnet();
            if ui
                .checkbox(&mut magnet, "🧲 Magnet")
                .on_hover_text("Snap selections to the surrounding ink")
                .changed()
            {
                state.session.set_magnet(magnet);
            }

            let mut magic = state.session.magic_mode();
            let scanning = state.session.pending_scan().is_some();
            if ui
                .add_enabled(!scanning, egui::Checkbox::new(&mut magic, "🪄 Find questions"))
                .on_hover_text("Drag over a region to detect the questions inside it")
                .changed()
            {
                state.session.set_magic_mode(magic);
            }
            if scanning {
                ui.horizontal(|ui| {
                    ui.spinner();
                    ui.label("Scanning...");
                });
            }

            let mut options = state.session.options().clone();
            if labeled_drag_clamped(ui, "Ignore drags under", &mut options.noise_threshold_px, 0.0..=50.0, " px") {
                state.session.set_options(options);
            }

            let detected = state.session.detected().len();
            if detected > 0 {
                ui.label(format!("{} detected, click one to select it", detected));
            }
        });

    egui::CollapsingHeader::new("📝 Question")
        .default_open(true)
        .show(ui, |ui| {
            let mut answer = state.session.answer();
            if answer_picker(ui, &mut answer) {
                state.session.set_answer(answer);
            }

            let mut difficulty = state.session.difficulty();
            if difficulty_picker(ui, &mut difficulty) {
                state.session.set_difficulty(difficulty);
            }

            let has_selection = state.session.selected_crop().is_some();
            if ui
                .add_enabled(has_selection, egui::Button::new("➕ Add to queue (Enter)"))
                .clicked()
            {
                if let Err(e) = state.session.add_to_queue() {
                    log::warn!("Could not queue selection: {}", e);
                }
            }
            if let Some(crop) = state.session.selected_crop() {
                ui.label(format!("{}×{} px at {},{}", crop.width, crop.height, crop.x, crop.y));
            }
        });
}

fn show_document(ui: &mut egui::Ui, state: &mut CropViewState, command_tx: &mpsc::UnboundedSender<Command>) {
    if ui.button("📂 Open PDF or page image...").clicked() {
        if let Some(path) = rfd::FileDialog::new()
            .add_filter("Documents", &["pdf", "png", "jpg", "jpeg"])
            .pick_file()
        {
            let _ = command_tx.send(Command::PageLoad { path });
        }
    }

    let Some((name, page_count)) = state
        .document
        .as_ref()
        .map(|d| (d.name.clone(), d.page_count))
    else {
        return;
    };

    ui.label(name);
    ui.horizontal(|ui| {
        let current = state.page_index;
        if ui
            .add_enabled(current > 0, egui::Button::new("◀"))
            .clicked()
        {
            state.go_to_page(current - 1, command_tx);
        }
        ui.label(format!("Page {} of {}", current + 1, page_count));
        if ui
            .add_enabled(current + 1 < page_count, egui::Button::new("▶"))
            .clicked()
        {
            state.go_to_page(current + 1, command_tx);
        }
    });
}
