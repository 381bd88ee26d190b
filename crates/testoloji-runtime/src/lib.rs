use image::RgbaImage;
use std::path::PathBuf;
use std::sync::Arc;

mod countdown;
mod debounce;

pub use countdown::{CountdownEvent, ExamCountdown};
pub use debounce::Debouncer;

// Re-export types from library crates
pub use testoloji_crop::{DetectError, DetectorOptions, PendingId, PendingQuestion, ScanRequest, ScanTicket, SourceRect};
pub use testoloji_layout::{LayoutOptions, LayoutStatistics, Question};

/// Commands sent from UI to worker
#[derive(Debug)]
pub enum Command {
    PageLoad {
        path: PathBuf,
    },
    /// Rasterise a page at `scale` times its size in points
    PageRender {
        doc_id: DocumentId,
        page_index: usize,
        scale: f32,
    },
    PageClose {
        doc_id: DocumentId,
    },
    Detect {
        request: ScanRequest,
        raster: Arc<RgbaImage>,
        options: DetectorOptions,
    },
    UploadBatch {
        batch: Vec<PendingQuestion>,
        output_dir: PathBuf,
    },
    ManifestLoad {
        path: PathBuf,
    },
    LayoutLoadConfig {
        path: PathBuf,
    },
    LayoutCalculateStats {
        questions: Vec<Question>,
        options: LayoutOptions,
    },
    LayoutExport {
        questions: Vec<Question>,
        options: LayoutOptions,
        output_path: PathBuf,
    },
    AnswerKeyExport {
        questions: Vec<Question>,
        options: LayoutOptions,
        output_path: PathBuf,
    },
}

/// Updates sent from worker to UI
#[derive(Debug, Clone)]
pub enum Update {
    Progress {
        operation: String,
        current: usize,
        total: usize,
    },
    Error {
        message: String,
    },
    PageLoaded {
        doc_id: DocumentId,
        name: String,
        page_count: usize,
    },
    PageRendered {
        doc_id: DocumentId,
        page_index: usize,
        /// Render scale the raster was produced at
        scale: f32,
        width: usize,
        height: usize,
        rgba_data: Vec<u8>,
    },
    PageClosed {
        doc_id: DocumentId,
    },
    ScanFinished {
        ticket: ScanTicket,
        result: Result<Vec<SourceRect>, DetectError>,
    },
    UploadFinished {
        ids: Vec<PendingId>,
        result: Result<usize, String>,
    },
    ManifestLoaded {
        path: PathBuf,
        title: Option<String>,
        questions: Vec<Question>,
    },
    LayoutConfigLoaded {
        options: LayoutOptions,
    },
    LayoutStatsCalculated {
        stats: LayoutStatistics,
    },
    LayoutExported {
        path: PathBuf,
        page_count: usize,
    },
    AnswerKeyExported {
        path: PathBuf,
        entry_count: usize,
    },
}

/// Handle to a loaded document
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct DocumentId(pub u64);
