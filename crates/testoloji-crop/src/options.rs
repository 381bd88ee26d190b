use crate::{CropError, Result};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Magnet snap tuning (source pixels)
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize), serde(default))]
pub struct SnapOptions {
    /// Margin added around the ink after snapping
    pub padding_px: u32,
    /// How far each edge may grow outward while it still cuts through ink
    pub max_expand_px: u32,
    /// Pixels with luminance below this count as ink
    pub ink_threshold: u8,
}

impl Default for SnapOptions {
    fn default() -> Self {
        Self {
            padding_px: 6,
            max_expand_px: 80,
            ink_threshold: 200,
        }
    }
}

/// Whitespace band detector tuning (source pixels)
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize), serde(default))]
pub struct DetectorOptions {
    /// Blank rows needed to separate two questions
    pub min_gap_px: u32,
    /// Bands shorter than this are treated as noise
    pub min_height_px: u32,
    pub padding_px: u32,
    pub ink_threshold: u8,
}

impl Default for DetectorOptions {
    fn default() -> Self {
        Self {
            min_gap_px: 24,
            min_height_px: 20,
            padding_px: 6,
            ink_threshold: 200,
        }
    }
}

/// Settings of a crop session
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize), serde(default))]
pub struct CropOptions {
    /// Drafts smaller than this in either direction (display pixels) are
    /// ignored
    pub noise_threshold_px: f32,
    /// Snap finished drafts to the content underneath
    pub magnet: bool,
    pub snap: SnapOptions,
    pub detector: DetectorOptions,
}

impl Default for CropOptions {
    fn default() -> Self {
        Self {
            noise_threshold_px: 5.0,
            magnet: false,
            snap: SnapOptions::default(),
            detector: DetectorOptions::default(),
        }
    }
}

impl CropOptions {
    /// Load options from JSON file
    #[cfg(feature = "serde")]
    pub async fn load(path: impl AsRef<std::path::Path>) -> Result<Self> {
        let bytes = tokio::fs::read(path).await?;
        let options: Self = serde_json::from_slice(&bytes)
            .map_err(|e| CropError::Config(format!("Failed to parse config: {}", e)))?;
        options.validate()?;
        Ok(options)
    }

    /// Save options to JSON file
    #[cfg(feature = "serde")]
    pub async fn save(&self, path: impl AsRef<std::path::Path>) -> Result<()> {
        let json = serde_json::to_string_pretty(self)
            .map_err(|e| CropError::Config(format!("Failed to serialize config: {}", e)))?;
        tokio::fs::write(path, json).await?;
        Ok(())
    }

    pub fn validate(&self) -> Result<()> {
        if !self.noise_threshold_px.is_finite() || self.noise_threshold_px < 0.0 {
            return Err(CropError::Config(format!(
                "Noise threshold must be a non-negative number, got {}",
                self.noise_threshold_px
            )));
        }

        if self.detector.min_gap_px == 0 {
            return Err(CropError::Config(
                "Detector gap must be at least one pixel".to_string(),
            ));
        }

        Ok(())
    }
}
