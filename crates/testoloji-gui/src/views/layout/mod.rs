mod actions_section;
mod settings_section;
mod state;
mod statistics_section;

pub use state::LayoutViewState;

use eframe::egui;
use testoloji_layout::{Column, Page};
use testoloji_runtime::Command;
use tokio::sync::mpsc;

pub fn show_layout(
    ui: &mut egui::Ui,
    state: &mut LayoutViewState,
    runtime: &tokio::runtime::Handle,
    command_tx: &mpsc::UnboundedSender<Command>,
) {
    if state.timer.poll() {
        log::info!("Exam time is up");
    }
    if state.timer.is_running() {
        ui.ctx().request_repaint_after(std::time::Duration::from_millis(250));
    }

    if state.needs_stats && !state.questions.is_empty() {
        state.needs_stats = false;
        let _ = command_tx.send(Command::LayoutCalculateStats {
            questions: state.questions.clone(),
            options: state.options.clone(),
        });
    }

    egui::SidePanel::left("layout_controls")
        .min_width(300.0)
        .show_inside(ui, |ui| {
            egui::ScrollArea::vertical().show(ui, |ui| {
                ui.heading("Exam Layout");
                ui.separator();

                actions_section::show_source(ui, state, command_tx);
                ui.add_space(10.0);
                ui.separator();
                ui.add_space(10.0);

                settings_section::show(ui, state);
                ui.add_space(10.0);
                ui.separator();
                ui.add_space(10.0);

                statistics_section::show(ui, state);
                ui.add_space(10.0);
                ui.separator();
                ui.add_space(10.0);

                actions_section::show_timer(ui, state, runtime);
                ui.add_space(10.0);
                ui.separator();
                ui.add_space(10.0);

                actions_section::show_config_buttons(ui, state, runtime, command_tx);
                ui.add_space(5.0);
                actions_section::show_export(ui, state, command_tx);
            });
        });

    egui::CentralPanel::default().show_inside(ui, |ui| {
        show_breakdown(ui, state);
    });
}

fn show_breakdown(ui: &mut egui::Ui, state: &mut LayoutViewState) {
    if state.questions.is_empty() {
        ui.centered_and_justified(|ui| {
            ui.vertical_centered(|ui| {
                ui.heading("No Questions");
                ui.label("Load a question bank to preview the page breakdown");
            });
        });
        return;
    }

    let config = state.options.pagination_config();
    let pages = state.cache.pages(&state.questions, &config);

    egui::ScrollArea::vertical().show(ui, |ui| {
        for (i, page) in pages.iter().enumerate() {
            let test = page
                .project_index
                .map(|p| format!(" · Test {}", p + 1))
                .unwrap_or_default();
            ui.strong(format!("Page {}{}", i + 1, test));

            ui.horizontal(|ui| {
                column_summary(ui, page, Column::Left, config.usable_height);
                if config.columns.count() == 2 {
                    column_summary(ui, page, Column::Right, config.usable_height);
                }
            });
            ui.separator();
        }
    });
}

fn column_summary(ui: &mut egui::Ui, page: &Page, column: Column, usable_height: f32) {
    ui.vertical(|ui| {
        ui.set_width(240.0);
        let numbers: Vec<String> = page
            .column(column)
            .iter()
            .map(|q| q.number().to_string())
            .collect();
        let label = match column {
            Column::Left => "Left",
            Column::Right => "Right",
        };
        if numbers.is_empty() {
            ui.label(format!("{label}: empty"));
        } else {
            ui.label(format!("{label}: {}", numbers.join(", ")));
        }
        let fill = (page.column_height(column) / usable_height.max(1.0)).min(1.0);
        ui.add(egui::ProgressBar::new(fill).desired_width(220.0));
    });
}
