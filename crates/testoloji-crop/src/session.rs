//! Crop session state machine
//!
//! One [`CropSession`] lives as long as the crop tool is open. It owns the
//! active page raster, the selection, detected regions and the pending queue.
//! Everything it stores is in source pixels; display rectangles only come in
//! through pointer input and go out through the `*_display` accessors.
//!
//! Detection runs elsewhere. [`CropSession::finish_draft`] hands out a
//! [`ScanRequest`] tagged with the page epoch, and results for a page that is
//! no longer active are dropped by [`CropSession::apply_scan_result`].

use crate::detect::{DetectError, RectDetector};
use crate::geometry::{CanvasSnapshot, DisplayPoint, DisplayRect, DisplaySize, SourceRect};
use crate::options::CropOptions;
use crate::queue::{PendingId, PendingQueue, PendingQuestion};
use crate::snap::snap_to_content;
use crate::upload::QuestionUploader;
use crate::{CropError, Result};
use image::RgbaImage;
use std::collections::VecDeque;
use std::sync::Arc;
use testoloji_layout::{AnswerLetter, Difficulty};

/// Which document page is being cropped
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageSource {
    pub pdf_name: String,
    /// 1-based page number
    pub page: u32,
}

impl PageSource {
    pub fn new(pdf_name: impl Into<String>, page: u32) -> Self {
        Self {
            pdf_name: pdf_name.into(),
            page,
        }
    }
}

/// Identifies the page and request a scan was issued for
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScanTicket {
    pub epoch: u64,
    pub page: u32,
    pub sequence: u64,
}

/// A detection job for the host to run off the UI thread
#[derive(Debug, Clone, PartialEq)]
pub struct ScanRequest {
    pub ticket: ScanTicket,
    /// Region to search, in source pixels
    pub region: SourceRect,
}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum SelectionState {
    #[default]
    Idle,
    Drafting {
        start: DisplayPoint,
        current: DisplayPoint,
    },
    Selected {
        crop: SourceRect,
    },
}

#[derive(Debug, Clone, PartialEq)]
pub enum DraftOutcome {
    /// No draft, no page, or the draft was smaller than the noise threshold
    Ignored,
    Selected(SourceRect),
    ScanRequested(ScanRequest),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScanOutcome {
    /// The page changed or a newer scan was issued
    Stale,
    Found(usize),
    Empty,
    Failed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeLevel {
    Info,
    Warning,
    Error,
}

/// A transient message for the host UI
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub level: NoticeLevel,
    pub message: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    Enter,
    Escape,
    Other,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyPress {
    pub key: Key,
    /// A text field has keyboard focus; shortcuts must not fire
    pub text_input_focused: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyAction {
    Queued(PendingId),
    Cancelled,
    Ignored,
}

struct ActivePage {
    source: PageSource,
    raster: Arc<RgbaImage>,
    canvas: CanvasSnapshot,
}

pub struct CropSession {
    options: CropOptions,
    open: bool,
    page: Option<ActivePage>,
    epoch: u64,
    scan_sequence: u64,
    selection: SelectionState,
    magic_mode: bool,
    pending_scan: Option<ScanRequest>,
    detected: Vec<SourceRect>,
    answer: Option<AnswerLetter>,
    difficulty: Option<Difficulty>,
    queue: PendingQueue,
    notices: VecDeque<Notice>,
}

impl CropSession {
    pub fn new(options: CropOptions) -> Self {
        Self {
            options,
            open: true,
            page: None,
            epoch: 0,
            scan_sequence: 0,
            selection: SelectionState::Idle,
            magic_mode: false,
            pending_scan: None,
            detected: Vec::new(),
            answer: None,
            difficulty: None,
            queue: PendingQueue::new(),
            notices: VecDeque::new(),
        }
    }

    pub fn options(&self) -> &CropOptions {
        &self.options
    }

    pub fn set_options(&mut self, options: CropOptions) {
        self.options = options;
    }

    // =========================================================================
    // Tool and page lifecycle
    // =========================================================================

    pub fn is_open(&self) -> bool {
        self.open
    }

    pub fn open(&mut self) {
        self.open = true;
    }

    /// Close the tool. The page and everything tied to it is dropped; the
    /// queue survives so nothing unsent is lost.
    pub fn close(&mut self) {
        self.open = false;
        self.page = None;
        self.reset_page_state();
    }

    /// Show a new page. Any scan still running for the old page becomes stale.
    pub fn open_page(&mut self, source: PageSource, raster: RgbaImage, display: DisplaySize) {
        let (width, height) = raster.dimensions();
        log::debug!(
            "Opening {} page {} ({}x{} px)",
            source.pdf_name,
            source.page,
            width,
            height
        );

        self.page = Some(ActivePage {
            source,
            raster: Arc::new(raster),
            canvas: CanvasSnapshot::new(width, height, display),
        });
        self.reset_page_state();
    }

    fn reset_page_state(&mut self) {
        self.epoch += 1;
        self.selection = SelectionState::Idle;
        self.detected.clear();
        self.pending_scan = None;
        self.magic_mode = false;
    }

    /// The canvas was zoomed or resized. Stored rectangles stay valid; an
    /// unfinished drag is dropped since its points no longer line up.
    pub fn resize_display(&mut self, display: DisplaySize) {
        if let Some(page) = &mut self.page {
            page.canvas.display = display;
        }
        if matches!(self.selection, SelectionState::Drafting { .. }) {
            self.selection = SelectionState::Idle;
        }
    }

    /// Swap in a re-render of the same page at another resolution.
    ///
    /// Detected rectangles and the selection are rescaled to the new raster.
    /// A scan still running was issued in the old pixel space, so it is
    /// invalidated like on a page change.
    pub fn replace_raster(&mut self, raster: RgbaImage) -> bool {
        let Some(page) = &mut self.page else {
            return false;
        };
        let (old_width, old_height) = page.raster.dimensions();
        let (width, height) = raster.dimensions();
        if old_width == 0 || old_height == 0 {
            return false;
        }
        let sx = width as f32 / old_width as f32;
        let sy = height as f32 / old_height as f32;

        page.raster = Arc::new(raster);
        page.canvas = CanvasSnapshot::new(width, height, page.canvas.display);

        self.detected = self
            .detected
            .iter()
            .filter_map(|r| r.scaled(sx, sy).clamp_to(width, height))
            .collect();
        self.selection = match self.selection {
            SelectionState::Selected { crop } => crop
                .scaled(sx, sy)
                .clamp_to(width, height)
                .map_or(SelectionState::Idle, |crop| SelectionState::Selected { crop }),
            SelectionState::Drafting { .. } | SelectionState::Idle => SelectionState::Idle,
        };

        if self.pending_scan.take().is_some() {
            log::debug!("Dropping scan issued before the page was re-rendered");
        }
        self.epoch += 1;
        self.magic_mode = false;
        true
    }

    pub fn epoch(&self) -> u64 {
        self.epoch
    }

    pub fn page(&self) -> Option<&PageSource> {
        self.page.as_ref().map(|p| &p.source)
    }

    pub fn raster(&self) -> Option<&Arc<RgbaImage>> {
        self.page.as_ref().map(|p| &p.raster)
    }

    pub fn canvas(&self) -> Option<&CanvasSnapshot> {
        self.page.as_ref().map(|p| &p.canvas)
    }

    // =========================================================================
    // Modes and annotations
    // =========================================================================

    pub fn magnet(&self) -> bool {
        self.options.magnet
    }

    pub fn set_magnet(&mut self, magnet: bool) {
        self.options.magnet = magnet;
    }

    pub fn magic_mode(&self) -> bool {
        self.magic_mode
    }

    pub fn set_magic_mode(&mut self, on: bool) {
        self.magic_mode = on;
    }

    pub fn answer(&self) -> Option<AnswerLetter> {
        self.answer
    }

    pub fn set_answer(&mut self, answer: Option<AnswerLetter>) {
        self.answer = answer;
    }

    pub fn difficulty(&self) -> Option<Difficulty> {
        self.difficulty
    }

    pub fn set_difficulty(&mut self, difficulty: Option<Difficulty>) {
        self.difficulty = difficulty;
    }

    // =========================================================================
    // Selection
    // =========================================================================

    pub fn selection(&self) -> &SelectionState {
        &self.selection
    }

    pub fn selected_crop(&self) -> Option<SourceRect> {
        match self.selection {
            SelectionState::Selected { crop } => Some(crop),
            _ => None,
        }
    }

    pub fn begin_draft(&mut self, point: DisplayPoint) {
        if self.page.is_none() {
            return;
        }
        self.selection = SelectionState::Drafting {
            start: point,
            current: point,
        };
    }

    pub fn update_draft(&mut self, point: DisplayPoint) {
        if let SelectionState::Drafting { current, .. } = &mut self.selection {
            *current = point;
        }
    }

    /// The rectangle being dragged, in display pixels
    pub fn draft_rect(&self) -> Option<DisplayRect> {
        match self.selection {
            SelectionState::Drafting { start, current } => Some(DisplayRect::from_corners(start, current)),
            _ => None,
        }
    }

    /// Finish the drag: ignore noise, otherwise select (snapping if the
    /// magnet is on) or request a scan in magic mode
    pub fn finish_draft(&mut self) -> DraftOutcome {
        let Some(rect) = self.draft_rect() else {
            return DraftOutcome::Ignored;
        };
        self.selection = SelectionState::Idle;

        if rect.is_below(self.options.noise_threshold_px) {
            log::debug!(
                "Ignoring {:.1}x{:.1} draft below the noise threshold",
                rect.width,
                rect.height
            );
            return DraftOutcome::Ignored;
        }

        let Some(page) = &self.page else {
            return DraftOutcome::Ignored;
        };
        let (width, height) = page.raster.dimensions();
        let Some(source) = page.canvas.to_source(rect).clamp_to(width, height) else {
            log::debug!("Draft lies outside the page");
            return DraftOutcome::Ignored;
        };

        if self.magic_mode {
            self.scan_sequence += 1;
            let request = ScanRequest {
                ticket: ScanTicket {
                    epoch: self.epoch,
                    page: page.source.page,
                    sequence: self.scan_sequence,
                },
                region: source,
            };
            self.pending_scan = Some(request.clone());
            return DraftOutcome::ScanRequested(request);
        }

        let crop = if self.options.magnet {
            snap_to_content(&page.raster, source, &self.options.snap)
        } else {
            source
        };
        self.selection = SelectionState::Selected { crop };
        DraftOutcome::Selected(crop)
    }

    /// Drop the draft or selection
    pub fn cancel_selection(&mut self) -> bool {
        let had_selection = self.selection != SelectionState::Idle;
        self.selection = SelectionState::Idle;
        had_selection
    }

    /// The current selection as a canvas overlay
    pub fn selection_display(&self) -> Option<DisplayRect> {
        let canvas = self.canvas()?;
        self.selected_crop().map(|crop| canvas.to_display(crop))
    }

    // =========================================================================
    // Detection
    // =========================================================================

    pub fn pending_scan(&self) -> Option<&ScanRequest> {
        self.pending_scan.as_ref()
    }

    pub fn detected(&self) -> &[SourceRect] {
        &self.detected
    }

    pub fn detected_display(&self) -> Vec<DisplayRect> {
        match self.canvas() {
            Some(canvas) => self.detected.iter().map(|r| canvas.to_display(*r)).collect(),
            None => Vec::new(),
        }
    }

    /// Apply the result of a scan issued by [`Self::finish_draft`]
    pub fn apply_scan_result(
        &mut self,
        ticket: ScanTicket,
        result: std::result::Result<Vec<SourceRect>, DetectError>,
    ) -> ScanOutcome {
        let current = self.pending_scan.as_ref().map(|r| r.ticket);
        if current != Some(ticket) || ticket.epoch != self.epoch {
            log::debug!("Discarding stale scan result {:?}", ticket);
            return ScanOutcome::Stale;
        }

        self.pending_scan = None;
        self.magic_mode = false;
        self.selection = SelectionState::Idle;

        match result {
            Ok(rects) => {
                let (width, height) = self
                    .page
                    .as_ref()
                    .map(|p| p.raster.dimensions())
                    .unwrap_or_default();
                let found: Vec<SourceRect> = rects
                    .into_iter()
                    .filter_map(|r| r.clamp_to(width, height))
                    .collect();

                if found.is_empty() {
                    self.notify(NoticeLevel::Info, "No questions found in the selected region");
                    ScanOutcome::Empty
                } else {
                    let count = found.len();
                    self.detected.extend(found);
                    self.notify(NoticeLevel::Info, format!("Found {count} questions"));
                    ScanOutcome::Found(count)
                }
            }
            Err(e) => {
                self.notify(NoticeLevel::Warning, format!("Detection failed: {e}"));
                ScanOutcome::Failed
            }
        }
    }

    /// Run a scan synchronously on this thread
    pub fn run_scan(&mut self, detector: &dyn RectDetector, request: &ScanRequest) -> ScanOutcome {
        let result = match self.raster() {
            Some(raster) => detector.detect(raster, request.region),
            None => return ScanOutcome::Stale,
        };
        self.apply_scan_result(request.ticket, result)
    }

    /// Promote a detected rectangle to the selection
    pub fn handle_rect_click(&mut self, index: usize) -> Option<SourceRect> {
        if index >= self.detected.len() {
            return None;
        }
        let crop = self.detected.remove(index);
        self.selection = SelectionState::Selected { crop };
        Some(crop)
    }

    pub fn remove_detected(&mut self, index: usize) -> Option<SourceRect> {
        (index < self.detected.len()).then(|| self.detected.remove(index))
    }

    // =========================================================================
    // Queue
    // =========================================================================

    pub fn queue(&self) -> &PendingQueue {
        &self.queue
    }

    /// Crop the selection into the queue with the current answer and
    /// difficulty, then reset for the next question
    pub fn add_to_queue(&mut self) -> Result<PendingId> {
        let page = self.page.as_ref().ok_or(CropError::NoPage)?;
        let crop = self.selected_crop().ok_or(CropError::NoSelection)?;
        let (width, height) = page.raster.dimensions();
        let crop = crop.clamp_to(width, height).ok_or(CropError::NoSelection)?;

        let preview = image::imageops::crop_imm(&*page.raster, crop.x, crop.y, crop.width, crop.height)
            .to_image();

        let id = self.queue.allocate_id();
        self.queue.push(PendingQuestion {
            id,
            preview,
            page: page.source.page,
            pdf_name: page.source.pdf_name.clone(),
            rect: crop,
            answer: self.answer,
            difficulty: self.difficulty,
        });

        log::info!(
            "Queued {} from {} page {} at {}",
            id,
            page.source.pdf_name,
            page.source.page,
            crop
        );

        self.selection = SelectionState::Idle;
        self.answer = None;
        self.difficulty = None;
        Ok(id)
    }

    pub fn remove_from_queue(&mut self, id: PendingId) -> bool {
        self.queue.remove(id).is_some()
    }

    pub fn handle_key(&mut self, press: KeyPress) -> KeyAction {
        if !self.open || press.text_input_focused {
            return KeyAction::Ignored;
        }

        match press.key {
            Key::Enter if self.selected_crop().is_some() => match self.add_to_queue() {
                Ok(id) => KeyAction::Queued(id),
                Err(e) => {
                    log::warn!("Could not queue selection: {}", e);
                    KeyAction::Ignored
                }
            },
            Key::Escape if self.cancel_selection() => KeyAction::Cancelled,
            _ => KeyAction::Ignored,
        }
    }

    // =========================================================================
    // Upload
    // =========================================================================

    /// Snapshot of the queue for an upload running elsewhere
    pub fn batch(&self) -> Vec<PendingQuestion> {
        self.queue.as_slice().to_vec()
    }

    /// Settle an upload of `uploaded`. On success those entries leave the
    /// queue; on failure the queue is left as it was.
    pub fn finish_upload(&mut self, uploaded: &[PendingId], result: Result<usize>) -> Result<usize> {
        match result {
            Ok(count) => {
                self.queue.remove_all(uploaded);
                self.notify(NoticeLevel::Info, format!("Uploaded {count} questions"));
                Ok(count)
            }
            Err(e) => {
                self.notify(
                    NoticeLevel::Error,
                    format!("Upload failed, {} questions kept: {e}", self.queue.len()),
                );
                Err(e)
            }
        }
    }

    /// Upload the whole queue
    pub async fn upload_batch(&mut self, uploader: &impl QuestionUploader) -> Result<usize> {
        if self.queue.is_empty() {
            return Ok(0);
        }
        let batch = self.batch();
        let ids: Vec<PendingId> = batch.iter().map(|q| q.id).collect();
        let result = uploader.upload(&batch).await;
        self.finish_upload(&ids, result)
    }

    // =========================================================================
    // Notices
    // =========================================================================

    fn notify(&mut self, level: NoticeLevel, message: impl Into<String>) {
        let message = message.into();
        match level {
            NoticeLevel::Info => log::info!("{}", message),
            NoticeLevel::Warning => log::warn!("{}", message),
            NoticeLevel::Error => log::error!("{}", message),
        }
        self.notices.push_back(Notice { level, message });
    }

    /// Take all notices raised since the last call
    pub fn take_notices(&mut self) -> Vec<Notice> {
        self.notices.drain(..).collect()
    }
}

impl Default for CropSession {
    fn default() -> Self {
        Self::new(CropOptions::default())
    }
}
