use eframe::egui;
use testoloji_crop::{DisplayPoint, DisplayRect, DraftOutcome};
use testoloji_runtime::Command;
use tokio::sync::mpsc;

use super::state::CropViewState;

const SELECTION: egui::Color32 = egui::Color32::from_rgb(34, 160, 90);
const DETECTED: egui::Color32 = egui::Color32::from_rgb(40, 110, 220);
const SCANNING: egui::Color32 = egui::Color32::from_rgb(230, 140, 20);

fn to_screen(origin: egui::Pos2, rect: DisplayRect) -> egui::Rect {
    egui::Rect::from_min_size(
        origin + egui::vec2(rect.x, rect.y),
        egui::vec2(rect.width, rect.height),
    )
}

/// Draw the page and turn pointer input into session transitions
pub fn show(ui: &mut egui::Ui, state: &mut CropViewState, command_tx: &mpsc::UnboundedSender<Command>) {
    let (Some(texture), Some(display)) = (&state.texture, state.display_size()) else {
        ui.centered_and_justified(|ui| {
            ui.spinner();
        });
        return;
    };
    let texture_id = texture.id();

    egui::ScrollArea::both().show(ui, |ui| {
        let (response, painter) = ui.allocate_painter(
            egui::vec2(display.width, display.height),
            egui::Sense::click_and_drag(),
        );
        let origin = response.rect.min;
        let local = |pos: egui::Pos2| DisplayPoint::new(pos.x - origin.x, pos.y - origin.y);

        painter.image(
            texture_id,
            response.rect,
            egui::Rect::from_min_max(egui::pos2(0.0, 0.0), egui::pos2(1.0, 1.0)),
            egui::Color32::WHITE,
        );

        // Pointer input
        if response.drag_started() {
            if let Some(pos) = response.interact_pointer_pos() {
                state.session.begin_draft(local(pos));
            }
        }
        if response.dragged() {
            if let Some(pos) = response.interact_pointer_pos() {
                state.session.update_draft(local(pos));
            }
        }
        if response.drag_stopped() {
            if let DraftOutcome::ScanRequested(request) = state.session.finish_draft() {
                if let Some(raster) = state.session.raster() {
                    let _ = command_tx.send(Command::Detect {
                        request,
                        raster: raster.clone(),
                        options: state.session.options().detector,
                    });
                }
            }
        }
        if response.clicked() {
            if let Some(pos) = response.interact_pointer_pos() {
                let point = local(pos);
                let hit = state
                    .session
                    .detected_display()
                    .iter()
                    .position(|r| r.contains(point));
                if let Some(index) = hit {
                    state.session.handle_rect_click(index);
                }
            }
        }

        // Overlays
        for rect in state.session.detected_display() {
            let rect = to_screen(origin, rect);
            painter.rect_filled(rect, 2.0, DETECTED.gamma_multiply(0.12));
            painter.rect_stroke(rect, 2.0, egui::Stroke::new(1.5, DETECTED), egui::StrokeKind::Inside);
        }

        if let (Some(scan), Some(canvas)) = (state.session.pending_scan(), state.session.canvas()) {
            let rect = to_screen(origin, canvas.to_display(scan.region));
            painter.rect_stroke(rect, 0.0, egui::Stroke::new(2.0, SCANNING), egui::StrokeKind::Inside);
            ui.ctx().request_repaint();
        }

        if let Some(draft) = state.session.draft_rect() {
            let color = if state.session.magic_mode() { SCANNING } else { SELECTION };
            painter.rect_stroke(
                to_screen(origin, draft),
                0.0,
                egui::Stroke::new(1.5, color),
                egui::StrokeKind::Inside,
            );
        }

        if let Some(selection) = state.session.selection_display() {
            let rect = to_screen(origin, selection);
            painter.rect_filled(rect, 0.0, SELECTION.gamma_multiply(0.15));
            painter.rect_stroke(rect, 0.0, egui::Stroke::new(2.0, SELECTION), egui::StrokeKind::Inside);
        }
    });
}
