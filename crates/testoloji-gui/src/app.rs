use eframe::egui;
use log::Level;
use testoloji_crop::{CropError, NoticeLevel};
use testoloji_runtime::{Command, Update};
use tokio::sync::mpsc;

use crate::logger::AppLogger;
use crate::views::{CropViewState, LayoutViewState, show_crop, show_layout};

#[derive(Default, PartialEq)]
enum Mode {
    #[default]
    Crop,
    Layout,
}

#[derive(Clone)]
struct ProgressState {
    operation: String,
    current: usize,
    total: usize,
}

pub struct TestolojiApp {
    mode: Mode,
    status: String,
    show_log: bool,
    logger: AppLogger,

    // Async infrastructure
    command_tx: mpsc::UnboundedSender<Command>,
    update_rx: mpsc::UnboundedReceiver<Update>,

    progress: Option<ProgressState>,

    crop: CropViewState,
    layout: LayoutViewState,

    tokio_handle: tokio::runtime::Handle,
}

impl TestolojiApp {
    pub fn new(_cc: &eframe::CreationContext<'_>, tokio_handle: tokio::runtime::Handle, logger: AppLogger) -> Self {
        let (command_tx, command_rx) = mpsc::unbounded_channel();
        let (update_tx, update_rx) = mpsc::unbounded_channel();

        tokio_handle.spawn(crate::worker::worker_task(command_rx, update_tx));

        Self {
            mode: Mode::default(),
            status: String::new(),
            show_log: false,
            logger,
            command_tx,
            update_rx,
            progress: None,
            crop: CropViewState::new(tokio_handle.clone()),
            layout: LayoutViewState::default(),
            tokio_handle,
        }
    }

    fn handle_update(&mut self, ctx: &egui::Context, update: Update) {
        match update {
            Update::Progress {
                operation,
                current,
                total,
            } => {
                self.progress = Some(ProgressState {
                    operation,
                    current,
                    total,
                });
                ctx.request_repaint();
            }
            Update::Error { message } => {
                log::error!("{}", message);
                self.status = format!("Error: {message}");
                self.progress = None;
                self.crop.uploading = false;
            }
            Update::PageLoaded {
                doc_id,
                name,
                page_count,
            } => {
                self.status = format!("Opened {} ({} pages)", name, page_count);
                self.mode = Mode::Crop;
                self.crop.document_loaded(doc_id, name, page_count, &self.command_tx);
            }
            Update::PageRendered {
                doc_id,
                page_index,
                scale,
                width,
                height,
                rgba_data,
            } => {
                self.crop
                    .page_rendered(ctx, doc_id, page_index, scale, width, height, rgba_data);
                self.progress = None;
            }
            Update::PageClosed { doc_id } => {
                self.crop.document_closed(doc_id);
            }
            Update::ScanFinished { ticket, result } => {
                self.crop.session.apply_scan_result(ticket, result);
            }
            Update::UploadFinished { ids, result } => {
                self.crop.uploading = false;
                self.progress = None;
                let result = result.map_err(CropError::Upload);
                if let Ok(count) = self.crop.session.finish_upload(&ids, result) {
                    log::info!("Saved {} questions to {}", count, self.crop.output_dir);
                }
            }
            Update::ManifestLoaded {
                path,
                title,
                questions,
            } => {
                self.status = format!("Loaded {} questions", questions.len());
                self.mode = Mode::Layout;
                self.layout.manifest_loaded(path, title, questions);
            }
            Update::LayoutConfigLoaded { options } => {
                self.layout.options = options;
                self.layout.options_changed();
                self.status = "Configuration loaded".to_string();
            }
            Update::LayoutStatsCalculated { stats } => {
                self.layout.stats = Some(stats);
            }
            Update::LayoutExported { path, page_count } => {
                self.status = format!("Exported {} pages → {}", page_count, path.display());
                self.progress = None;
            }
            Update::AnswerKeyExported { path, entry_count } => {
                self.status = format!("Answer key with {} entries → {}", entry_count, path.display());
            }
        }
    }

    fn show_status_bar(&mut self, ui: &mut egui::Ui) {
        ui.horizontal(|ui| {
            let latest = self.logger.latest();
            let (color, text) = match &latest {
                Some(entry) if self.status.is_empty() => (level_color(ui, entry.level), entry.message.as_str()),
                _ => (ui.visuals().text_color(), self.status.as_str()),
            };
            ui.colored_label(color, text);

            ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                ui.toggle_value(&mut self.show_log, "📜 Log");
            });
        });

        if self.show_log {
            ui.separator();
            egui::ScrollArea::vertical()
                .max_height(160.0)
                .stick_to_bottom(true)
                .show(ui, |ui| {
                    for entry in self.logger.recent(200) {
                        ui.colored_label(
                            level_color(ui, entry.level),
                            format!(
                                "{} {:<5} {}",
                                entry.timestamp.format("%H:%M:%S"),
                                entry.level,
                                entry.message
                            ),
                        );
                    }
                });
            if ui.small_button("Clear").clicked() {
                self.logger.clear();
            }
        }
    }
}

fn level_color(ui: &egui::Ui, level: Level) -> egui::Color32 {
    match level {
        Level::Error => ui.visuals().error_fg_color,
        Level::Warn => ui.visuals().warn_fg_color,
        _ => ui.visuals().text_color(),
    }
}

impl eframe::App for TestolojiApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // Drag-and-drop of PDFs and page images
        let dropped: Vec<_> = ctx.input(|i| {
            i.raw
                .dropped_files
                .iter()
                .filter_map(|f| f.path.clone())
                .collect()
        });
        if let Some(path) = dropped.into_iter().next() {
            self.status = format!("Opening {}...", path.display());
            let _ = self.command_tx.send(Command::PageLoad { path });
        }

        // Process all pending updates from worker
        while let Ok(update) = self.update_rx.try_recv() {
            self.handle_update(ctx, update);
        }

        // Session notices go to the status line
        for notice in self.crop.session.take_notices() {
            self.status = match notice.level {
                NoticeLevel::Info => notice.message,
                NoticeLevel::Warning | NoticeLevel::Error => format!("⚠ {}", notice.message),
            };
        }

        egui::TopBottomPanel::top("menu").show(ctx, |ui| {
            ui.horizontal(|ui| {
                ui.selectable_value(&mut self.mode, Mode::Crop, "✂ Crop");
                ui.selectable_value(&mut self.mode, Mode::Layout, "📄 Layout");
            });
        });

        egui::TopBottomPanel::bottom("status").show(ctx, |ui| {
            if let Some(progress) = &self.progress {
                ui.label(&progress.operation);
                ui.add(
                    egui::ProgressBar::new(progress.current as f32 / progress.total.max(1) as f32)
                        .show_percentage(),
                );
                ctx.request_repaint();
            }
            self.show_status_bar(ui);
        });

        egui::CentralPanel::default().show(ctx, |ui| match self.mode {
            Mode::Crop => show_crop(ui, &mut self.crop, &self.command_tx),
            Mode::Layout => show_layout(ui, &mut self.layout, &self.tokio_handle, &self.command_tx),
        });
    }
}
