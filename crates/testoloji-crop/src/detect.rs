//! Question region detection
//!
//! The session only depends on the [`RectDetector`] trait. The built-in
//! [`WhitespaceDetector`] splits a region into bands of ink separated by
//! blank rows, which is how questions on a typical exam page are laid out.

use crate::geometry::SourceRect;
use crate::options::DetectorOptions;
use crate::snap::{ink_bounds, pad, row_has_ink};
use image::RgbaImage;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum DetectError {
    #[error("Region {0} lies outside the page")]
    RegionOutOfBounds(SourceRect),
    #[error("Detection failed: {0}")]
    Failed(String),
}

/// Finds question rectangles inside a region of a page raster.
///
/// Returned rectangles are in the raster's source pixels.
pub trait RectDetector: Send + Sync {
    fn detect(&self, image: &RgbaImage, region: SourceRect) -> Result<Vec<SourceRect>, DetectError>;
}

#[derive(Debug, Clone, Default)]
pub struct WhitespaceDetector {
    options: DetectorOptions,
}

impl WhitespaceDetector {
    pub fn new(options: DetectorOptions) -> Self {
        Self { options }
    }

    /// Row ranges of ink separated by at least `min_gap_px` blank rows
    fn bands(&self, image: &RgbaImage, region: SourceRect) -> Vec<(u32, u32)> {
        let threshold = self.options.ink_threshold;
        let mut bands = Vec::new();
        let mut current: Option<(u32, u32)> = None;
        let mut blank_run = 0;

        for y in region.y..region.bottom() {
            if row_has_ink(image, y, region.x, region.right(), threshold) {
                blank_run = 0;
                current = match current {
                    Some((start, _)) => Some((start, y + 1)),
                    None => Some((y, y + 1)),
                };
            } else {
                blank_run += 1;
                if blank_run >= self.options.min_gap_px {
                    if let Some(band) = current.take() {
                        bands.push(band);
                    }
                }
            }
        }

        bands.extend(current);
        bands
    }
}

impl RectDetector for WhitespaceDetector {
    fn detect(&self, image: &RgbaImage, region: SourceRect) -> Result<Vec<SourceRect>, DetectError> {
        let (width, height) = image.dimensions();
        let region = region
            .clamp_to(width, height)
            .ok_or(DetectError::RegionOutOfBounds(region))?;

        let rects: Vec<SourceRect> = self
            .bands(image, region)
            .into_iter()
            .filter(|(top, bottom)| bottom - top >= self.options.min_height_px)
            .filter_map(|(top, bottom)| {
                let band = SourceRect::from_edges(region.x, top, region.right(), bottom);
                ink_bounds(image, band, self.options.ink_threshold)
            })
            .map(|ink| pad(ink, self.options.padding_px, width, height))
            .collect();

        log::debug!("Detected {} regions in {}", rects.len(), region);
        Ok(rects)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgba;

    fn page(blocks: &[SourceRect]) -> RgbaImage {
        RgbaImage::from_fn(300, 400, |x, y| {
            let inside = blocks
                .iter()
                .any(|b| x >= b.x && x < b.right() && y >= b.y && y < b.bottom());
            if inside {
                Rgba([0, 0, 0, 255])
            } else {
                Rgba([255, 255, 255, 255])
            }
        })
    }

    fn detector() -> WhitespaceDetector {
        WhitespaceDetector::new(DetectorOptions {
            min_gap_px: 20,
            min_height_px: 10,
            padding_px: 0,
            ink_threshold: 200,
        })
    }

    #[test]
    fn test_separates_questions_by_gaps() {
        let image = page(&[
            SourceRect::new(20, 20, 200, 60),
            // Same question: gap of 10 rows is below min_gap
            SourceRect::new(20, 90, 150, 30),
            SourceRect::new(30, 200, 100, 80),
        ]);
        let rects = detector().detect(&image, SourceRect::new(0, 0, 300, 400)).unwrap();
        assert_eq!(
            rects,
            vec![SourceRect::new(20, 20, 200, 100), SourceRect::new(30, 200, 100, 80)]
        );
    }

    #[test]
    fn test_drops_thin_bands() {
        let image = page(&[SourceRect::new(20, 20, 200, 4), SourceRect::new(20, 100, 200, 50)]);
        let rects = detector().detect(&image, SourceRect::new(0, 0, 300, 400)).unwrap();
        assert_eq!(rects, vec![SourceRect::new(20, 100, 200, 50)]);
    }

    #[test]
    fn test_only_looks_inside_region() {
        let image = page(&[SourceRect::new(20, 20, 200, 60), SourceRect::new(30, 200, 100, 80)]);
        let rects = detector().detect(&image, SourceRect::new(0, 150, 300, 200)).unwrap();
        assert_eq!(rects, vec![SourceRect::new(30, 200, 100, 80)]);
    }

    #[test]
    fn test_blank_region_is_empty_not_error() {
        let image = page(&[]);
        let rects = detector().detect(&image, SourceRect::new(0, 0, 300, 400)).unwrap();
        assert!(rects.is_empty());
    }

    #[test]
    fn test_region_outside_page() {
        let image = page(&[]);
        let result = detector().detect(&image, SourceRect::new(500, 500, 10, 10));
        assert!(matches!(result, Err(DetectError::RegionOutOfBounds(_))));
    }
}
