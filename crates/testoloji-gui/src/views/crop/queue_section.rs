use eframe::egui;
use testoloji_crop::PendingId;
use testoloji_runtime::Command;
use tokio::sync::mpsc;

use super::state::CropViewState;

const THUMBNAIL_WIDTH: f32 = 120.0;

pub fn show(ui: &mut egui::Ui, state: &mut CropViewState, command_tx: &mpsc::UnboundedSender<Command>) {
    let queue_len = state.session.queue().len();
    ui.heading(format!("Queue ({})", queue_len));
    ui.separator();

    let mut to_remove: Option<PendingId> = None;

    egui::ScrollArea::vertical()
        .max_height(ui.available_height() - 110.0)
        .show(ui, |ui| {
            if queue_len == 0 {
                ui.label("Select a question and press Enter to queue it");
            }

            for pending in state.session.queue().iter() {
                ui.horizontal(|ui| {
                    if let Some(texture) = state.thumbnails.get(&pending.id) {
                        let size = texture.size_vec2();
                        let scale = THUMBNAIL_WIDTH / size.x.max(1.0);
                        ui.image((texture.id(), size * scale));
                    }
                    ui.vertical(|ui| {
                        ui.label(format!("{} · page {}", pending.id, pending.page));
                        let answer = pending
                            .answer
                            .map(|a| a.to_string())
                            .unwrap_or_else(|| "-".to_string());
                        let difficulty = pending
                            .difficulty
                            .map(|d| d.to_string())
                            .unwrap_or_else(|| "-".to_string());
                        ui.label(format!("Answer {} · difficulty {}", answer, difficulty));
                        if ui.small_button("✖ Remove").clicked() {
                            to_remove = Some(pending.id);
                        }
                    });
                });
                ui.separator();
            }
        });

    if let Some(id) = to_remove {
        state.session.remove_from_queue(id);
    }

    ui.add_space(6.0);
    ui.horizontal(|ui| {
        ui.label("Save to:");
        ui.text_edit_singleline(&mut state.output_dir);
        if ui.small_button("…").clicked() {
            if let Some(dir) = rfd::FileDialog::new().pick_folder() {
                state.output_dir = dir.display().to_string();
            }
        }
    });

    let can_upload = queue_len > 0 && !state.uploading && !state.output_dir.trim().is_empty();
    let label = if state.uploading {
        "Uploading...".to_string()
    } else {
        format!("⬆ Upload {} questions", queue_len)
    };
    if ui.add_enabled(can_upload, egui::Button::new(label)).clicked() {
        state.uploading = true;
        let _ = command_tx.send(Command::UploadBatch {
            batch: state.session.batch(),
            output_dir: state.output_path(),
        });
    }
}
