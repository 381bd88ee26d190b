use eframe::egui;
use testoloji_layout::{ColumnCount, Template};

use super::state::LayoutViewState;
use crate::ui_components::{button_group, enum_selector, labeled_drag_clamped};

pub fn show(ui: &mut egui::Ui, state: &mut LayoutViewState) {
    egui::CollapsingHeader::new("📐 Layout")
        .default_open(true)
        .show(ui, |ui| {
            let options = &mut state.options;
            let mut changed = false;

            ui.label("Columns:");
            changed |= button_group(
                ui,
                &mut options.columns,
                &[(ColumnCount::One, "Single"), (ColumnCount::Two, "Two columns")],
            );

            changed |= labeled_drag_clamped(
                ui,
                "Question spacing:",
                &mut options.question_spacing_mm,
                0.0..=100.0,
                " mm",
            );

            let templates: Vec<(Template, &str)> =
                Template::ALL.iter().map(|t| (*t, t.name())).collect();
            changed |= enum_selector(ui, "template", "Template:", &mut options.template, &templates);

            if changed {
                state.options_changed();
            }
        });

    egui::CollapsingHeader::new("🏷 Header")
        .default_open(true)
        .show(ui, |ui| {
            let options = &mut state.options;
            ui.horizontal(|ui| {
                ui.label("Title:");
                ui.text_edit_singleline(&mut options.title);
            });

            let mut subtitle = options.subtitle.clone().unwrap_or_default();
            ui.horizontal(|ui| {
                ui.label("Subtitle:");
                if ui.text_edit_singleline(&mut subtitle).changed() {
                    options.subtitle = (!subtitle.trim().is_empty()).then_some(subtitle);
                }
            });
        });

    egui::CollapsingHeader::new("🔘 Annotations")
        .default_open(true)
        .show(ui, |ui| {
            let options = &mut state.options;
            ui.checkbox(&mut options.show_answer_bubbles, "Answer bubbles");
            ui.add_enabled(
                options.show_answer_bubbles,
                egui::Checkbox::new(&mut options.show_answers, "Fill correct answers"),
            );
            if !options.show_answer_bubbles {
                options.show_answers = false;
            }
            ui.checkbox(&mut options.show_difficulty, "Difficulty badges");
            ui.checkbox(&mut options.show_answer_key, "Answer key on last page");

            ui.separator();
            let mut watermark = options.divider_watermark.clone().unwrap_or_default();
            ui.horizontal(|ui| {
                ui.label("Divider watermark:");
                if ui.text_edit_singleline(&mut watermark).changed() {
                    options.divider_watermark = (!watermark.trim().is_empty()).then_some(watermark);
                }
            });
            ui.checkbox(&mut options.brand_watermark, "Brand watermark");
        });
}
