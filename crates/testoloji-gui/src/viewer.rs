use image::RgbaImage;
use std::collections::{HashMap, VecDeque};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use testoloji_runtime::DocumentId;

#[cfg(feature = "pdf-viewer")]
use pdfium_render::prelude::*;

/// Bind Pdfium, trying the vendored library first, then the system one
#[cfg(feature = "pdf-viewer")]
pub fn init_pdfium() -> Result<Pdfium, PdfiumError> {
    let vendor_path = std::env::current_dir().ok().and_then(|mut p| {
        p.push("vendor/pdfium/lib");
        if p.exists() { Some(p) } else { None }
    });

    if let Some(vendor_path) = vendor_path {
        if let Ok(binding) =
            Pdfium::bind_to_library(Pdfium::pdfium_platform_library_name_at_path(&vendor_path))
        {
            return Ok(Pdfium::new(binding));
        }
    }

    Pdfium::bind_to_system_library().map(Pdfium::new)
}

/// Where the pages of a loaded document come from
#[derive(Clone)]
pub enum DocumentSource {
    /// Rendered on demand through Pdfium
    Pdf(PathBuf),
    /// A scanned page image; a single page at its own resolution
    Image(Arc<RgbaImage>),
}

impl DocumentSource {
    pub fn is_image_path(path: &Path) -> bool {
        matches!(
            path.extension()
                .and_then(|e| e.to_str())
                .map(str::to_ascii_lowercase)
                .as_deref(),
            Some("png" | "jpg" | "jpeg")
        )
    }
}

#[derive(Clone)]
pub struct CachedPage {
    pub rgba_data: Vec<u8>,
    pub width: usize,
    pub height: usize,
}

/// Cache key: document, page and render scale in thousandths
pub type PageKey = (DocumentId, usize, u32);

pub fn page_key(doc_id: DocumentId, page_index: usize, scale: f32) -> PageKey {
    (doc_id, page_index, (scale * 1000.0).round() as u32)
}

/// Maximum number of rendered pages kept in memory
const MAX_CACHED_PAGES: usize = 50;

/// Documents open in the worker plus an LRU cache of rendered pages
pub struct PageStore {
    documents: HashMap<DocumentId, DocumentSource>,
    page_cache: HashMap<PageKey, CachedPage>,
    cache_order: VecDeque<PageKey>,
    next_doc_id: AtomicU64,
    capacity: usize,
}

impl PageStore {
    pub fn new() -> Self {
        Self::with_capacity(MAX_CACHED_PAGES)
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            documents: HashMap::new(),
            page_cache: HashMap::new(),
            cache_order: VecDeque::new(),
            next_doc_id: AtomicU64::new(0),
            capacity: capacity.max(1),
        }
    }

    pub fn add_document(&mut self, source: DocumentSource) -> DocumentId {
        let doc_id = DocumentId(self.next_doc_id.fetch_add(1, Ordering::SeqCst));
        self.documents.insert(doc_id, source);
        doc_id
    }

    pub fn get_document(&self, doc_id: DocumentId) -> Option<&DocumentSource> {
        self.documents.get(&doc_id)
    }

    pub fn add_to_cache(&mut self, key: PageKey, page: CachedPage) {
        if self.page_cache.contains_key(&key) {
            self.cache_order.retain(|k| k != &key);
        }

        while self.cache_order.len() >= self.capacity {
            if let Some(old_key) = self.cache_order.pop_front() {
                self.page_cache.remove(&old_key);
            }
        }

        self.page_cache.insert(key, page);
        self.cache_order.push_back(key);
    }

    pub fn get_from_cache(&mut self, key: &PageKey) -> Option<&CachedPage> {
        if self.page_cache.contains_key(key) {
            self.cache_order.retain(|k| k != key);
            self.cache_order.push_back(*key);
            self.page_cache.get(key)
        } else {
            None
        }
    }

    pub fn remove_document(&mut self, doc_id: DocumentId) -> bool {
        self.cache_order.retain(|(id, _, _)| *id != doc_id);
        self.page_cache.retain(|(id, _, _), _| *id != doc_id);
        self.documents.remove(&doc_id).is_some()
    }
}
