//! Batch upload of pending crops

use crate::queue::PendingQuestion;
use crate::{CropError, Result};
use std::future::Future;

/// Receives a batch of pending crops.
///
/// Returns the number of questions stored. An error means nothing should be
/// considered uploaded, so the caller keeps its queue.
pub trait QuestionUploader {
    fn upload(&self, batch: &[PendingQuestion]) -> impl Future<Output = Result<usize>> + Send;
}

/// Writes crops as PNG files into a directory and appends them to the
/// `questions.json` manifest there, which the layout tools read back.
#[cfg(feature = "serde")]
#[derive(Debug, Clone)]
pub struct DirectoryUploader {
    dir: std::path::PathBuf,
}

#[cfg(feature = "serde")]
impl DirectoryUploader {
    pub const MANIFEST_NAME: &'static str = "questions.json";

    pub fn new(dir: impl Into<std::path::PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn manifest_path(&self) -> std::path::PathBuf {
        self.dir.join(Self::MANIFEST_NAME)
    }

    /// Read the manifest as stored, without resolving image paths
    async fn read_manifest(&self) -> Result<testoloji_layout::QuestionManifest> {
        let path = self.manifest_path();
        match tokio::fs::read(&path).await {
            Ok(bytes) => serde_json::from_slice(&bytes).map_err(|e| {
                CropError::Config(format!("Failed to parse {}: {}", path.display(), e))
            }),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(Default::default()),
            Err(e) => Err(e.into()),
        }
    }

    async fn store(&self, batch: &[PendingQuestion]) -> Result<usize> {
        use testoloji_layout::{Question, QuestionId};

        tokio::fs::create_dir_all(&self.dir).await?;
        let mut manifest = self.read_manifest().await?;

        let encoded = {
            let batch = batch.to_vec();
            tokio::task::spawn_blocking(move || {
                batch
                    .iter()
                    .map(PendingQuestion::encode_png)
                    .collect::<Result<Vec<_>>>()
            })
            .await??
        };

        for (item, png) in batch.iter().zip(encoded) {
            let id = unique_id(&manifest, &item.pdf_name, item.page);
            let file_name = format!("{id}.png");
            tokio::fs::write(self.dir.join(&file_name), png).await?;

            manifest.questions.push(Question {
                id: QuestionId::new(id),
                image: file_name,
                width: Some(item.preview.width()),
                height: Some(item.preview.height()),
                bottom_spacing_mm: None,
                difficulty: item.difficulty,
                correct_answer: item.answer,
                project_index: None,
            });
        }

        let json = serde_json::to_string_pretty(&manifest)
            .map_err(|e| CropError::Config(format!("Failed to serialize manifest: {}", e)))?;
        tokio::fs::write(self.manifest_path(), json).await?;

        log::info!(
            "Stored {} questions in {} ({} total)",
            batch.len(),
            self.dir.display(),
            manifest.questions.len()
        );
        Ok(batch.len())
    }
}

#[cfg(feature = "serde")]
impl QuestionUploader for DirectoryUploader {
    fn upload(&self, batch: &[PendingQuestion]) -> impl Future<Output = Result<usize>> + Send {
        async move {
            self.store(batch)
                .await
                .map_err(|e| CropError::Upload(e.to_string()))
        }
    }
}

/// `<pdf stem>-p<page>-<n>`, with the first free `n`
#[cfg(feature = "serde")]
fn unique_id(manifest: &testoloji_layout::QuestionManifest, pdf_name: &str, page: u32) -> String {
    let stem = std::path::Path::new(pdf_name)
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    let stem: String = stem
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() { c.to_ascii_lowercase() } else { '-' })
        .collect();
    let stem = if stem.trim_matches('-').is_empty() {
        "question".to_string()
    } else {
        stem.trim_matches('-').to_string()
    };

    (1..)
        .map(|n| format!("{stem}-p{page}-{n}"))
        .find(|id| !manifest.contains(id))
        .unwrap_or_else(|| format!("{stem}-p{page}"))
}

#[cfg(all(test, feature = "serde"))]
mod tests {
    use super::*;

    #[test]
    fn test_unique_id_skips_taken() {
        let mut manifest = testoloji_layout::QuestionManifest::default();
        assert_eq!(unique_id(&manifest, "Deneme 3.pdf", 2), "deneme-3-p2-1");

        manifest
            .questions
            .push(testoloji_layout::Question::new("deneme-3-p2-1", "a.png"));
        assert_eq!(unique_id(&manifest, "Deneme 3.pdf", 2), "deneme-3-p2-2");
        assert_eq!(unique_id(&manifest, "", 1), "question-p1-1");
    }
}
