use testoloji_runtime::{Command, Update};
use tokio::sync::mpsc;

use crate::handlers;
use crate::viewer::PageStore;

/// Async worker task that processes commands and sends updates
pub async fn worker_task(
    mut command_rx: mpsc::UnboundedReceiver<Command>,
    update_tx: mpsc::UnboundedSender<Update>,
) {
    let mut store = PageStore::new();

    while let Some(cmd) = command_rx.recv().await {
        process_command(cmd, &mut store, &mut command_rx, &update_tx).await;
    }

    log::debug!("Worker stopped: command channel closed");
}

async fn process_command(
    cmd: Command,
    store: &mut PageStore,
    command_rx: &mut mpsc::UnboundedReceiver<Command>,
    update_tx: &mpsc::UnboundedSender<Update>,
) {
    match cmd {
        Command::PageLoad { path } => {
            handlers::pages::handle_load(path, store, update_tx).await;
        }
        Command::PageRender {
            mut doc_id,
            mut page_index,
            mut scale,
        } => {
            // Only the most recent render matters; a newer page or zoom
            // level supersedes anything still queued
            while let Ok(next_cmd) = command_rx.try_recv() {
                if let Command::PageRender {
                    doc_id: new_doc_id,
                    page_index: new_page_index,
                    scale: new_scale,
                } = next_cmd
                {
                    log::debug!("Discarding queued page render, using newer request");
                    doc_id = new_doc_id;
                    page_index = new_page_index;
                    scale = new_scale;
                } else {
                    // Can't put it back, so run it before the render
                    Box::pin(process_command(next_cmd, store, command_rx, update_tx)).await;
                }
            }

            handlers::pages::handle_render_page(doc_id, page_index, scale, store, update_tx).await;
        }
        Command::PageClose { doc_id } => {
            handlers::pages::handle_close(doc_id, store, update_tx).await;
        }
        Command::Detect {
            request,
            raster,
            options,
        } => {
            handlers::crop::handle_detect(request, raster, options, update_tx).await;
        }
        Command::UploadBatch { batch, output_dir } => {
            handlers::crop::handle_upload(batch, output_dir, update_tx).await;
        }
        Command::ManifestLoad { path } => {
            handlers::layout::handle_load_manifest(path, update_tx).await;
        }
        Command::LayoutLoadConfig { path } => {
            handlers::layout::handle_load_config(path, update_tx).await;
        }
        Command::LayoutCalculateStats { questions, options } => {
            handlers::layout::handle_calculate_stats(questions, options, update_tx).await;
        }
        Command::LayoutExport {
            questions,
            options,
            output_path,
        } => {
            handlers::layout::handle_export(questions, options, output_path, update_tx).await;
        }
        Command::AnswerKeyExport {
            questions,
            options,
            output_path,
        } => {
            handlers::layout::handle_export_answer_key(questions, options, output_path, update_tx)
                .await;
        }
    }
}
