mod canvas;
mod controls_section;
mod queue_section;
mod state;

pub use state::CropViewState;

use eframe::egui;
use testoloji_crop::{Key, KeyAction, KeyPress};
use testoloji_runtime::Command;
use tokio::sync::mpsc;

pub fn show_crop(ui: &mut egui::Ui, state: &mut CropViewState, command_tx: &mpsc::UnboundedSender<Command>) {
    state.poll_render_requests(command_tx);
    state.sync_thumbnails(ui.ctx());
    handle_keys(ui.ctx(), state);

    egui::SidePanel::left("crop_controls")
        .min_width(260.0)
        .show_inside(ui, |ui| {
            egui::ScrollArea::vertical().show(ui, |ui| {
                ui.heading("Crop Questions");
                ui.separator();
                controls_section::show(ui, state, command_tx);
            });
        });

    egui::SidePanel::right("crop_queue")
        .min_width(240.0)
        .show_inside(ui, |ui| {
            queue_section::show(ui, state, command_tx);
        });

    egui::CentralPanel::default().show_inside(ui, |ui| {
        if state.document.is_some() {
            canvas::show(ui, state, command_tx);
        } else {
            ui.centered_and_justified(|ui| {
                ui.vertical_centered(|ui| {
                    ui.heading("No Document");
                    ui.label("Open a PDF or drop one here to start cropping");
                });
            });
        }
    });

    if state.render_pending() {
        ui.ctx().request_repaint_after(std::time::Duration::from_millis(100));
    }
}

/// Enter queues the selection and Escape drops it, unless a text field has focus
fn handle_keys(ctx: &egui::Context, state: &mut CropViewState) {
    let key = ctx.input(|i| {
        if i.key_pressed(egui::Key::Enter) {
            Some(Key::Enter)
        } else if i.key_pressed(egui::Key::Escape) {
            Some(Key::Escape)
        } else {
            None
        }
    });
    let Some(key) = key else {
        return;
    };

    let press = KeyPress {
        key,
        text_input_focused: ctx.wants_keyboard_input(),
    };
    match state.session.handle_key(press) {
        KeyAction::Queued(id) => log::debug!("Enter queued {}", id),
        KeyAction::Cancelled => log::debug!("Selection cancelled"),
        KeyAction::Ignored => {}
    }
}
