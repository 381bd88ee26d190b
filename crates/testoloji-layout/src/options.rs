use crate::constants::DEFAULT_QUESTION_SPACING_MM;
use crate::paginate::PaginationConfig;
use crate::skin::Template;
use crate::types::*;
use crate::{LayoutError, Result};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Document-wide layout and rendering settings
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize), serde(default))]
pub struct LayoutOptions {
    // Packing
    pub columns: ColumnCount,
    pub question_spacing_mm: f32,
    pub template: Template,

    // Header
    pub title: String,
    pub subtitle: Option<String>,

    // Question annotations
    pub show_answer_bubbles: bool,
    /// Fill the bubble of the correct answer
    pub show_answers: bool,
    pub show_difficulty: bool,

    // Answer key on the last page
    pub show_answer_key: bool,

    // Watermarks
    pub divider_watermark: Option<String>,
    /// Repeating brand watermark for free-tier documents
    pub brand_watermark: bool,
}

impl Default for LayoutOptions {
    fn default() -> Self {
        Self {
            columns: ColumnCount::Two,
            question_spacing_mm: DEFAULT_QUESTION_SPACING_MM,
            template: Template::Classic,
            title: String::new(),
            subtitle: None,
            show_answer_bubbles: false,
            show_answers: false,
            show_difficulty: false,
            show_answer_key: true,
            divider_watermark: None,
            brand_watermark: false,
        }
    }
}

impl LayoutOptions {
    /// Load options from JSON file
    #[cfg(feature = "serde")]
    pub async fn load(path: impl AsRef<std::path::Path>) -> Result<Self> {
        let bytes = tokio::fs::read(path).await?;
        let options: Self = serde_json::from_slice(&bytes)
            .map_err(|e| LayoutError::Config(format!("Failed to parse config: {}", e)))?;
        options.validate()?;
        Ok(options)
    }

    /// Save options to JSON file
    #[cfg(feature = "serde")]
    pub async fn save(&self, path: impl AsRef<std::path::Path>) -> Result<()> {
        let json = serde_json::to_string_pretty(self)
            .map_err(|e| LayoutError::Config(format!("Failed to serialize config: {}", e)))?;
        tokio::fs::write(path, json).await?;
        Ok(())
    }

    /// Validate the options
    pub fn validate(&self) -> Result<()> {
        validate_spacing_mm(self.question_spacing_mm, "Question spacing")?;

        if self.show_answers && !self.show_answer_bubbles {
            return Err(LayoutError::Config(
                "Showing answers requires answer bubbles".to_string(),
            ));
        }

        Ok(())
    }

    /// Packing parameters for the selected template and column count
    pub fn pagination_config(&self) -> PaginationConfig {
        PaginationConfig::for_template(self.template, self.columns, self.question_spacing_mm)
    }
}

/// Spacing below a question: finite, non-negative and at most 100mm
pub(crate) fn validate_spacing_mm(spacing_mm: f32, what: &str) -> Result<()> {
    if !spacing_mm.is_finite() || spacing_mm < 0.0 {
        return Err(LayoutError::Config(format!(
            "{} must be a non-negative number, got {}",
            what, spacing_mm
        )));
    }

    if spacing_mm > 100.0 {
        return Err(LayoutError::Config(format!(
            "{} larger than 100mm leaves no room for questions",
            what
        )));
    }

    Ok(())
}
