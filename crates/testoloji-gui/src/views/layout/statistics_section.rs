use eframe::egui;

use super::state::LayoutViewState;

pub fn show(ui: &mut egui::Ui, state: &LayoutViewState) {
    egui::CollapsingHeader::new("📊 Statistics")
        .default_open(true)
        .show(ui, |ui| {
            let Some(stats) = &state.stats else {
                ui.label("No statistics available");
                ui.label("Load a question bank to see statistics");
                return;
            };

            ui.label(format!("Questions: {}", stats.question_count));
            ui.label(format!("Pages: {}", stats.page_count));
            if stats.test_count > 1 {
                ui.label(format!("Tests: {}", stats.test_count));
            }
            ui.label(format!(
                "With answers: {} of {}",
                stats.answered_count, stats.question_count
            ));
            if let Some(difficulty) = stats.average_difficulty {
                ui.label(format!("Average difficulty: {:.1}", difficulty));
            }
            if stats.oversized_count > 0 {
                ui.colored_label(
                    ui.visuals().warn_fg_color,
                    format!("Taller than a column: {}", stats.oversized_count),
                );
            }
            ui.add(egui::ProgressBar::new(stats.fill_ratio).text(format!(
                "Column fill {:.0}%",
                stats.fill_ratio * 100.0
            )));
        });
}
