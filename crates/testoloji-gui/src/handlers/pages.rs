use anyhow::{Context, Result, bail};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use testoloji_runtime::{DocumentId, Update};
use tokio::sync::mpsc;

use crate::viewer::{CachedPage, DocumentSource, PageStore, page_key};

#[cfg(feature = "pdf-viewer")]
use crate::viewer::init_pdfium;
#[cfg(feature = "pdf-viewer")]
use pdfium_render::prelude::*;

pub async fn handle_load(path: PathBuf, store: &mut PageStore, update_tx: &mpsc::UnboundedSender<Update>) {
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string());

    match load_source(&path).await {
        Ok((source, page_count)) => {
            let doc_id = store.add_document(source);
            log::info!("Opened {} ({} pages)", name, page_count);
            let _ = update_tx.send(Update::PageLoaded {
                doc_id,
                name,
                page_count,
            });
        }
        Err(e) => {
            let _ = update_tx.send(Update::Error {
                message: format!("Failed to open {}: {:#}", name, e),
            });
        }
    }
}

async fn load_source(path: &Path) -> Result<(DocumentSource, usize)> {
    if DocumentSource::is_image_path(path) {
        let path = path.to_path_buf();
        let raster = tokio::task::spawn_blocking(move || image::open(&path).map(|img| img.to_rgba8()))
            .await?
            .context("decoding page image")?;
        return Ok((DocumentSource::Image(Arc::new(raster)), 1));
    }

    let page_count = pdf_page_count(path.to_path_buf()).await?;
    if page_count == 0 {
        bail!("document has no pages");
    }
    Ok((DocumentSource::Pdf(path.to_path_buf()), page_count))
}

#[cfg(feature = "pdf-viewer")]
async fn pdf_page_count(path: PathBuf) -> Result<usize> {
    let count = tokio::task::spawn_blocking(move || {
        let pdfium = init_pdfium()?;
        let document = pdfium.load_pdf_from_file(&path, None)?;
        Ok::<_, PdfiumError>(document.pages().len() as usize)
    })
    .await??;
    Ok(count)
}

#[cfg(not(feature = "pdf-viewer"))]
async fn pdf_page_count(_path: PathBuf) -> Result<usize> {
    bail!("PDF rendering not available (pdf-viewer feature disabled); open a page image instead")
}

pub async fn handle_render_page(
    doc_id: DocumentId,
    page_index: usize,
    scale: f32,
    store: &mut PageStore,
    update_tx: &mpsc::UnboundedSender<Update>,
) {
    let key = page_key(doc_id, page_index, scale);

    let page = match store.get_document(doc_id).cloned() {
        Some(DocumentSource::Image(raster)) => Ok(CachedPage {
            rgba_data: raster.as_raw().clone(),
            width: raster.width() as usize,
            height: raster.height() as usize,
        }),
        Some(DocumentSource::Pdf(path)) => match store.get_from_cache(&key) {
            Some(cached) => Ok(cached.clone()),
            None => match render_pdf_page(path, page_index, scale).await {
                Ok(page) => {
                    store.add_to_cache(key, page.clone());
                    Ok(page)
                }
                Err(e) => Err(e),
            },
        },
        None => Err(anyhow::anyhow!("Document not found: {:?}", doc_id)),
    };

    match page {
        Ok(page) => {
            let _ = update_tx.send(Update::PageRendered {
                doc_id,
                page_index,
                scale,
                width: page.width,
                height: page.height,
                rgba_data: page.rgba_data,
            });
        }
        Err(e) => {
            let _ = update_tx.send(Update::Error {
                message: format!("Failed to render page {}: {:#}", page_index + 1, e),
            });
        }
    }
}

/// Rasterise a page at `scale` pixels per point
#[cfg(feature = "pdf-viewer")]
async fn render_pdf_page(path: PathBuf, page_index: usize, scale: f32) -> Result<CachedPage> {
    let page = tokio::task::spawn_blocking(move || {
        let pdfium = init_pdfium()?;
        let document = pdfium.load_pdf_from_file(&path, None)?;
        let page = document.pages().get(page_index as u16)?;

        let target_width = (page.width().value * scale).round().max(1.0) as i32;
        let config = PdfRenderConfig::new().set_target_width(target_width);

        let bitmap = page.render_with_config(&config)?;
        Ok::<_, PdfiumError>(CachedPage {
            rgba_data: bitmap.as_rgba_bytes().to_vec(),
            width: bitmap.width() as usize,
            height: bitmap.height() as usize,
        })
    })
    .await??;

    log::debug!("Rendered page {} at {:.2}x ({}x{})", page_index + 1, scale, page.width, page.height);
    Ok(page)
}

#[cfg(not(feature = "pdf-viewer"))]
async fn render_pdf_page(_path: PathBuf, _page_index: usize, _scale: f32) -> Result<CachedPage> {
    bail!("PDF rendering not available (pdf-viewer feature disabled)")
}

pub async fn handle_close(doc_id: DocumentId, store: &mut PageStore, update_tx: &mpsc::UnboundedSender<Update>) {
    if store.remove_document(doc_id) {
        let _ = update_tx.send(Update::PageClosed { doc_id });
    }
}
