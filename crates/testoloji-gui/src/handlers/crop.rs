use image::RgbaImage;
use std::path::PathBuf;
use std::sync::Arc;
use testoloji_crop::{DirectoryUploader, QuestionUploader, RectDetector, WhitespaceDetector};
use testoloji_runtime::{DetectError, DetectorOptions, PendingId, PendingQuestion, ScanRequest, Update};
use tokio::sync::mpsc;

/// Run region detection off the async threads. The result always goes back
/// with its ticket; the session decides whether it is still wanted.
pub async fn handle_detect(
    request: ScanRequest,
    raster: Arc<RgbaImage>,
    options: DetectorOptions,
    update_tx: &mpsc::UnboundedSender<Update>,
) {
    let ticket = request.ticket;
    let region = request.region;

    let result = tokio::task::spawn_blocking(move || WhitespaceDetector::new(options).detect(&raster, region))
        .await
        .unwrap_or_else(|e| Err(DetectError::Failed(format!("Detection task failed: {e}"))));

    if let Ok(rects) = &result {
        log::debug!("Detected {} regions in {}", rects.len(), region);
    }
    let _ = update_tx.send(Update::ScanFinished { ticket, result });
}

pub async fn handle_upload(
    batch: Vec<PendingQuestion>,
    output_dir: PathBuf,
    update_tx: &mpsc::UnboundedSender<Update>,
) {
    let ids: Vec<PendingId> = batch.iter().map(|q| q.id).collect();
    let total = batch.len();

    let _ = update_tx.send(Update::Progress {
        operation: format!("Saving {} questions...", total),
        current: 0,
        total,
    });

    let uploader = DirectoryUploader::new(output_dir);
    let result = uploader.upload(&batch).await.map_err(|e| e.to_string());
    let _ = update_tx.send(Update::UploadFinished { ids, result });
}
