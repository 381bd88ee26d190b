//! Shared constants for exam layout
//!
//! This module centralizes the magic numbers used by pagination and
//! rendering.

// =============================================================================
// Unit Conversion
// =============================================================================

/// Conversion applied to question spacing. Pagination has always used the
/// rounded value, so page breaks depend on it.
pub const SPACING_PT_PER_MM: f32 = 2.83;

// =============================================================================
// Page
// =============================================================================

/// A4 width in points
pub const A4_WIDTH_PT: f32 = 595.28;

/// A4 height in points
pub const A4_HEIGHT_PT: f32 = 841.89;

// =============================================================================
// Questions
// =============================================================================

/// Image width assumed when a question has no dimensions
pub const DEFAULT_IMAGE_WIDTH_PX: f32 = 800.0;

/// Image height assumed when a question has no dimensions
pub const DEFAULT_IMAGE_HEIGHT_PX: f32 = 600.0;

/// Default spacing below each question (mm)
pub const DEFAULT_QUESTION_SPACING_MM: f32 = 20.0;

/// Fixed band above each question image holding its number label,
/// answer bubbles and difficulty badge (points)
pub const QUESTION_LABEL_BAND_PT: f32 = 15.0;

/// Font size of the question number label
pub const LABEL_FONT_SIZE: f32 = 9.0;

/// Radius of an answer bubble
pub const BUBBLE_RADIUS: f32 = 5.0;

/// Horizontal distance between bubble centers
pub const BUBBLE_SPACING: f32 = 13.0;

/// Font size of the letter inside an answer bubble
pub const BUBBLE_FONT_SIZE: f32 = 6.0;

/// Width of the difficulty badge
pub const DIFFICULTY_BADGE_WIDTH: f32 = 30.0;

// =============================================================================
// Header, Footer and Watermarks
// =============================================================================

/// Font size for the footer page number
pub const FOOTER_FONT_SIZE: f32 = 8.0;

/// Font size for the subtitle line
pub const SUBTITLE_FONT_SIZE: f32 = 9.0;

/// Font size of the rotated watermark on the column divider
pub const DIVIDER_WATERMARK_FONT_SIZE: f32 = 28.0;

/// Text of the repeating free-tier watermark
pub const BRAND_WATERMARK_TEXT: &str = "testoloji";

/// Font size of the repeating free-tier watermark
pub const BRAND_WATERMARK_FONT_SIZE: f32 = 36.0;

/// Fill opacity used by both watermarks
pub const WATERMARK_OPACITY: f32 = 0.08;

/// Distance between repeated brand watermarks (points)
pub const BRAND_WATERMARK_STEP: f32 = 180.0;

/// Approximate character width ratio for Helvetica
pub const HELVETICA_CHAR_WIDTH_RATIO: f32 = 0.5;

// =============================================================================
// Answer Key
// =============================================================================

/// Cells per answer-key row
pub const ANSWER_KEY_COLUMNS: usize = 10;

/// Height of one answer-key row
pub const ANSWER_KEY_ROW_HEIGHT: f32 = 16.0;

/// Height of the answer-key title band
pub const ANSWER_KEY_TITLE_HEIGHT: f32 = 22.0;

/// Font size of answer-key cells
pub const ANSWER_KEY_FONT_SIZE: f32 = 8.0;

// =============================================================================
// Bezier Curve Constants
// =============================================================================

/// Control point factor for approximating circles with Bezier curves.
/// This magic number comes from: 4 * (sqrt(2) - 1) / 3 ≈ 0.552284749831
pub const BEZIER_CIRCLE_FACTOR: f32 = 0.552284749831;
