use crate::Result;
use crate::geometry::SourceRect;
use image::{ImageFormat, RgbaImage};
use std::io::Cursor;
use testoloji_layout::{AnswerLetter, Difficulty};

/// Local id of a queued crop, unique within a session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PendingId(pub u64);

impl std::fmt::Display for PendingId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// A cropped question waiting for upload
#[derive(Debug, Clone, PartialEq)]
pub struct PendingQuestion {
    pub id: PendingId,
    /// The cropped region at source resolution
    pub preview: RgbaImage,
    /// 1-based page number within the source document
    pub page: u32,
    pub pdf_name: String,
    pub rect: SourceRect,
    pub answer: Option<AnswerLetter>,
    pub difficulty: Option<Difficulty>,
}

impl PendingQuestion {
    pub fn encode_png(&self) -> Result<Vec<u8>> {
        let mut buffer = Cursor::new(Vec::new());
        self.preview.write_to(&mut buffer, ImageFormat::Png)?;
        Ok(buffer.into_inner())
    }
}

/// Ordered list of pending crops
#[derive(Debug, Clone, Default)]
pub struct PendingQueue {
    items: Vec<PendingQuestion>,
    next_id: u64,
}

impl PendingQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reserve the next id. Ids are never reused, even after removal.
    pub fn allocate_id(&mut self) -> PendingId {
        self.next_id += 1;
        PendingId(self.next_id)
    }

    pub fn push(&mut self, item: PendingQuestion) {
        self.items.push(item);
    }

    pub fn remove(&mut self, id: PendingId) -> Option<PendingQuestion> {
        let index = self.items.iter().position(|q| q.id == id)?;
        Some(self.items.remove(index))
    }

    /// Remove every listed id, keeping the rest in order
    pub fn remove_all(&mut self, ids: &[PendingId]) -> usize {
        let before = self.items.len();
        self.items.retain(|q| !ids.contains(&q.id));
        before - self.items.len()
    }

    pub fn get(&self, id: PendingId) -> Option<&PendingQuestion> {
        self.items.iter().find(|q| q.id == id)
    }

    pub fn get_mut(&mut self, id: PendingId) -> Option<&mut PendingQuestion> {
        self.items.iter_mut().find(|q| q.id == id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &PendingQuestion> {
        self.items.iter()
    }

    pub fn as_slice(&self) -> &[PendingQuestion] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn clear(&mut self) {
        self.items.clear();
    }
}
