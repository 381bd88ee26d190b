use crate::options::validate_spacing_mm;
use crate::types::Question;
use crate::{LayoutError, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::Path;

/// A question bank on disk: questions plus an optional document title
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct QuestionManifest {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default)]
    pub questions: Vec<Question>,
}

impl QuestionManifest {
    /// Load a manifest. Relative image paths are resolved against the
    /// manifest's directory.
    pub async fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let bytes = tokio::fs::read(path).await?;
        let mut manifest: Self = serde_json::from_slice(&bytes).map_err(|e| {
            LayoutError::Config(format!("Failed to parse {}: {}", path.display(), e))
        })?;

        if let Some(base) = path.parent() {
            manifest.resolve_images(base);
        }

        log::info!(
            "Loaded {} questions from {}",
            manifest.questions.len(),
            path.display()
        );
        Ok(manifest)
    }

    pub async fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let json = serde_json::to_string_pretty(self)
            .map_err(|e| LayoutError::Config(format!("Failed to serialize manifest: {}", e)))?;
        tokio::fs::write(path, json).await?;
        Ok(())
    }

    /// Make relative image paths absolute with respect to `base`
    pub fn resolve_images(&mut self, base: &Path) {
        for question in &mut self.questions {
            let image = Path::new(&question.image);
            if image.is_relative() && !question.image.contains("://") {
                question.image = base.join(image).to_string_lossy().into_owned();
            }
        }
    }

    /// Every question needs a unique, non-empty id and a usable spacing
    pub fn validate(&self) -> Result<()> {
        let mut seen = HashSet::new();
        for question in &self.questions {
            if question.id.as_str().trim().is_empty() {
                return Err(LayoutError::Config("Question with empty id".to_string()));
            }
            if !seen.insert(question.id.as_str()) {
                return Err(LayoutError::Config(format!(
                    "Duplicate question id '{}'",
                    question.id
                )));
            }
            if let Some(spacing_mm) = question.bottom_spacing_mm {
                validate_spacing_mm(spacing_mm, &format!("Spacing of question '{}'", question.id))?;
            }
        }
        Ok(())
    }

    pub fn contains(&self, id: &str) -> bool {
        self.questions.iter().any(|q| q.id.as_str() == id)
    }
}
