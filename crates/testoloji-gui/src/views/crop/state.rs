use eframe::egui;
use image::RgbaImage;
use std::collections::HashMap;
use std::path::PathBuf;
use std::time::Duration;
use testoloji_crop::{CropSession, DisplaySize, PageSource, PendingId};
use testoloji_runtime::{Command, Debouncer, DocumentId};
use tokio::sync::mpsc;

/// Raster pixels per PDF point at 100% zoom
const BASE_RENDER_SCALE: f32 = 2.0;
const MAX_RENDER_SCALE: f32 = 6.0;
const RENDER_DEBOUNCE: Duration = Duration::from_millis(300);

pub const ZOOM_RANGE: std::ops::RangeInclusive<f32> = 0.25..=3.0;

pub struct OpenDocument {
    pub doc_id: DocumentId,
    pub name: String,
    pub page_count: usize,
}

/// Everything the crop tool shows. Zoom and render quality live here and
/// nowhere else.
pub struct CropViewState {
    pub session: CropSession,
    pub document: Option<OpenDocument>,
    pub page_index: usize,
    pub texture: Option<egui::TextureHandle>,
    pub zoom: f32,
    /// Scale of the raster currently shown
    pub render_scale: f32,
    /// Scale of the last render sent to the worker
    pub requested_scale: f32,
    pub output_dir: String,
    pub uploading: bool,
    pub thumbnails: HashMap<PendingId, egui::TextureHandle>,
    render_debouncer: Debouncer<f32>,
    render_rx: mpsc::UnboundedReceiver<f32>,
}

impl CropViewState {
    pub fn new(runtime: tokio::runtime::Handle) -> Self {
        let (render_tx, render_rx) = mpsc::unbounded_channel();
        Self {
            session: CropSession::default(),
            document: None,
            page_index: 0,
            texture: None,
            zoom: 1.0,
            render_scale: BASE_RENDER_SCALE,
            requested_scale: BASE_RENDER_SCALE,
            output_dir: "question-bank".to_string(),
            uploading: false,
            thumbnails: HashMap::new(),
            render_debouncer: Debouncer::with_handle(runtime, RENDER_DEBOUNCE, render_tx),
            render_rx,
        }
    }

    pub fn output_path(&self) -> PathBuf {
        PathBuf::from(self.output_dir.trim())
    }

    /// Render scale that keeps the page sharp at the current zoom, in
    /// half steps so small zoom changes reuse the raster
    pub fn target_scale(&self) -> f32 {
        let scale = (self.zoom * BASE_RENDER_SCALE).clamp(1.0, MAX_RENDER_SCALE);
        (scale * 2.0).ceil() / 2.0
    }

    /// Size the raster is drawn at for the current zoom
    pub fn display_size(&self) -> Option<DisplaySize> {
        let raster = self.session.raster()?;
        let factor = self.zoom / self.render_scale;
        Some(DisplaySize::new(
            raster.width() as f32 * factor,
            raster.height() as f32 * factor,
        ))
    }

    pub fn document_loaded(
        &mut self,
        doc_id: DocumentId,
        name: String,
        page_count: usize,
        command_tx: &mpsc::UnboundedSender<Command>,
    ) {
        if let Some(old) = self.document.take() {
            let _ = command_tx.send(Command::PageClose { doc_id: old.doc_id });
        }
        self.document = Some(OpenDocument {
            doc_id,
            name,
            page_count,
        });
        self.texture = None;
        self.go_to_page(0, command_tx);
    }

    pub fn go_to_page(&mut self, page_index: usize, command_tx: &mpsc::UnboundedSender<Command>) {
        let Some(doc) = &self.document else {
            return;
        };
        if page_index >= doc.page_count {
            return;
        }
        self.page_index = page_index;
        self.requested_scale = self.target_scale();
        let _ = command_tx.send(Command::PageRender {
            doc_id: doc.doc_id,
            page_index,
            scale: self.requested_scale,
        });
    }

    /// The zoom slider moved. The page is redrawn at once from the current
    /// raster; a sharper render follows once the zoom settles.
    pub fn zoom_changed(&mut self) {
        if let Some(display) = self.display_size() {
            self.session.resize_display(display);
        }
        let target = self.target_scale();
        if target != self.requested_scale {
            self.render_debouncer.schedule(target);
        } else {
            self.render_debouncer.cancel();
        }
    }

    /// Forward settled zoom levels to the worker
    pub fn poll_render_requests(&mut self, command_tx: &mpsc::UnboundedSender<Command>) {
        let mut latest = None;
        while let Ok(scale) = self.render_rx.try_recv() {
            latest = Some(scale);
        }
        let (Some(scale), Some(doc)) = (latest, &self.document) else {
            return;
        };
        log::debug!("Re-rendering page {} at {:.1}x", self.page_index + 1, scale);
        self.requested_scale = scale;
        let _ = command_tx.send(Command::PageRender {
            doc_id: doc.doc_id,
            page_index: self.page_index,
            scale,
        });
    }

    pub fn render_pending(&self) -> bool {
        self.render_debouncer.is_pending()
    }

    /// A rendered page arrived from the worker
    pub fn page_rendered(
        &mut self,
        ctx: &egui::Context,
        doc_id: DocumentId,
        page_index: usize,
        scale: f32,
        width: usize,
        height: usize,
        rgba_data: Vec<u8>,
    ) {
        let Some(doc) = &self.document else {
            return;
        };
        if doc.doc_id != doc_id || page_index != self.page_index {
            log::debug!("Ignoring render of a page that is no longer shown");
            return;
        }

        let color_image = egui::ColorImage::from_rgba_unmultiplied([width, height], &rgba_data);
        let Some(raster) = RgbaImage::from_raw(width as u32, height as u32, rgba_data) else {
            log::warn!("Rendered page has an unexpected buffer size");
            return;
        };

        let source = PageSource::new(doc.name.clone(), page_index as u32 + 1);
        let same_page = self.session.page() == Some(&source);
        let same_size = self
            .session
            .raster()
            .is_some_and(|r| r.dimensions() == raster.dimensions());

        // Image documents come back at their own size whatever the scale.
        // A render may arrive after a newer one was requested, so the raster
        // is sized by the scale it was made at.
        if same_page && !same_size {
            self.render_scale = scale;
            self.session.replace_raster(raster);
        } else if !same_page {
            self.render_scale = scale;
            let factor = self.zoom / self.render_scale;
            let display = DisplaySize::new(width as f32 * factor, height as f32 * factor);
            self.session.open_page(source, raster, display);
        }
        if let Some(display) = self.display_size() {
            self.session.resize_display(display);
        }

        match &mut self.texture {
            Some(texture) => texture.set(color_image, egui::TextureOptions::LINEAR),
            None => {
                self.texture = Some(ctx.load_texture("crop_page", color_image, egui::TextureOptions::LINEAR));
            }
        }
    }

    pub fn document_closed(&mut self, doc_id: DocumentId) {
        if self.document.as_ref().is_some_and(|d| d.doc_id == doc_id) {
            self.document = None;
            self.texture = None;
        }
    }

    /// Thumbnail textures for queued crops; dropped entries are pruned
    pub fn sync_thumbnails(&mut self, ctx: &egui::Context) {
        let queue = self.session.queue();
        self.thumbnails.retain(|id, _| queue.get(*id).is_some());

        for pending in queue.iter() {
            if self.thumbnails.contains_key(&pending.id) {
                continue;
            }
            let (w, h) = pending.preview.dimensions();
            let image = egui::ColorImage::from_rgba_unmultiplied(
                [w as usize, h as usize],
                pending.preview.as_raw(),
            );
            let texture = ctx.load_texture(
                format!("pending_{}", pending.id.0),
                image,
                egui::TextureOptions::LINEAR,
            );
            self.thumbnails.insert(pending.id, texture);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rgba(width: usize, height: usize) -> Vec<u8> {
        vec![255; width * height * 4]
    }

    #[test]
    fn test_late_render_uses_its_own_scale() {
        let runtime = tokio::runtime::Runtime::new().unwrap();
        let ctx = egui::Context::default();
        let (command_tx, _command_rx) = mpsc::unbounded_channel();

        let mut state = CropViewState::new(runtime.handle().clone());
        state.document_loaded(DocumentId(1), "deneme.pdf".to_string(), 3, &command_tx);
        assert_eq!(state.requested_scale, 2.0);

        // Zoomed in and a sharper render requested before the first arrives
        state.zoom = 2.0;
        state.requested_scale = 4.0;

        state.page_rendered(&ctx, DocumentId(1), 0, 2.0, 200, 100, rgba(200, 100));
        assert_eq!(state.render_scale, 2.0);
        assert_eq!(state.display_size(), Some(DisplaySize::new(200.0, 100.0)));

        state.page_rendered(&ctx, DocumentId(1), 0, 4.0, 400, 200, rgba(400, 200));
        assert_eq!(state.render_scale, 4.0);
        assert_eq!(state.display_size(), Some(DisplaySize::new(200.0, 100.0)));
        assert_eq!(state.session.raster().map(|r| r.dimensions()), Some((400, 200)));
    }

    #[test]
    fn test_render_for_another_page_is_ignored() {
        let runtime = tokio::runtime::Runtime::new().unwrap();
        let ctx = egui::Context::default();
        let (command_tx, _command_rx) = mpsc::unbounded_channel();

        let mut state = CropViewState::new(runtime.handle().clone());
        state.document_loaded(DocumentId(1), "deneme.pdf".to_string(), 3, &command_tx);
        state.go_to_page(1, &command_tx);

        state.page_rendered(&ctx, DocumentId(1), 0, 2.0, 200, 100, rgba(200, 100));
        assert!(state.session.raster().is_none());
        assert!(state.texture.is_none());
    }
}
