//! Magnet snap: fit a rough selection to the content underneath it

use crate::geometry::SourceRect;
use crate::options::SnapOptions;
use image::{Rgba, RgbaImage};

/// A pixel counts as ink if it is opaque enough and darker than `threshold`
pub(crate) fn is_ink(pixel: &Rgba<u8>, threshold: u8) -> bool {
    let [r, g, b, a] = pixel.0;
    if a < 128 {
        return false;
    }
    let luma = (299 * u32::from(r) + 587 * u32::from(g) + 114 * u32::from(b)) / 1000;
    luma < u32::from(threshold)
}

pub(crate) fn row_has_ink(image: &RgbaImage, y: u32, x0: u32, x1: u32, threshold: u8) -> bool {
    (x0..x1).any(|x| is_ink(image.get_pixel(x, y), threshold))
}

pub(crate) fn column_has_ink(image: &RgbaImage, x: u32, y0: u32, y1: u32, threshold: u8) -> bool {
    (y0..y1).any(|y| is_ink(image.get_pixel(x, y), threshold))
}

/// Bounding box of the ink inside `rect`, if any
pub(crate) fn ink_bounds(image: &RgbaImage, rect: SourceRect, threshold: u8) -> Option<SourceRect> {
    let (x0, x1, y0, y1) = (rect.x, rect.right(), rect.y, rect.bottom());

    let top = (y0..y1).find(|&y| row_has_ink(image, y, x0, x1, threshold))?;
    let bottom = (y0..y1).rev().find(|&y| row_has_ink(image, y, x0, x1, threshold))? + 1;
    let left = (x0..x1).find(|&x| column_has_ink(image, x, top, bottom, threshold))?;
    let right = (x0..x1).rev().find(|&x| column_has_ink(image, x, top, bottom, threshold))? + 1;

    Some(SourceRect::from_edges(left, top, right, bottom))
}

/// Grow `rect` by `padding` on every side, staying inside the image
pub(crate) fn pad(rect: SourceRect, padding: u32, width: u32, height: u32) -> SourceRect {
    SourceRect::from_edges(
        rect.x.saturating_sub(padding),
        rect.y.saturating_sub(padding),
        rect.right().saturating_add(padding).min(width),
        rect.bottom().saturating_add(padding).min(height),
    )
}

/// Snap a selection to the content under it.
///
/// Each edge first moves outward while the line it sits on still cuts
/// through ink, so text clipped by a sloppy drag is included. The result is
/// then tightened to the ink bounding box and padded. A selection with no
/// ink is returned unchanged.
pub fn snap_to_content(image: &RgbaImage, rect: SourceRect, options: &SnapOptions) -> SourceRect {
    let (width, height) = image.dimensions();
    let Some(start) = rect.clamp_to(width, height) else {
        return rect;
    };
    let threshold = options.ink_threshold;

    let (mut left, mut top, mut right, mut bottom) = (start.x, start.y, start.right(), start.bottom());
    let min_left = left.saturating_sub(options.max_expand_px);
    let min_top = top.saturating_sub(options.max_expand_px);
    let max_right = right.saturating_add(options.max_expand_px).min(width);
    let max_bottom = bottom.saturating_add(options.max_expand_px).min(height);

    loop {
        let mut grew = false;

        if left > min_left && column_has_ink(image, left, top, bottom, threshold) {
            left -= 1;
            grew = true;
        }
        if right < max_right && column_has_ink(image, right - 1, top, bottom, threshold) {
            right += 1;
            grew = true;
        }
        if top > min_top && row_has_ink(image, top, left, right, threshold) {
            top -= 1;
            grew = true;
        }
        if bottom < max_bottom && row_has_ink(image, bottom - 1, left, right, threshold) {
            bottom += 1;
            grew = true;
        }

        if !grew {
            break;
        }
    }

    let expanded = SourceRect::from_edges(left, top, right, bottom);
    match ink_bounds(image, expanded, threshold) {
        Some(ink) => {
            let snapped = pad(ink, options.padding_px, width, height);
            log::debug!("Snapped {} to {}", rect, snapped);
            snapped
        }
        None => rect,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn page_with_block(width: u32, height: u32, block: SourceRect) -> RgbaImage {
        RgbaImage::from_fn(width, height, |x, y| {
            if x >= block.x && x < block.right() && y >= block.y && y < block.bottom() {
                Rgba([0, 0, 0, 255])
            } else {
                Rgba([255, 255, 255, 255])
            }
        })
    }

    fn options(padding_px: u32) -> SnapOptions {
        SnapOptions {
            padding_px,
            ..SnapOptions::default()
        }
    }

    #[test]
    fn test_contracts_to_ink() {
        let image = page_with_block(200, 200, SourceRect::new(50, 60, 40, 30));
        let snapped = snap_to_content(&image, SourceRect::new(20, 20, 150, 150), &options(0));
        assert_eq!(snapped, SourceRect::new(50, 60, 40, 30));
    }

    #[test]
    fn test_expands_over_clipped_ink() {
        let image = page_with_block(200, 200, SourceRect::new(50, 60, 40, 30));
        // Cuts through the block on the right and bottom
        let snapped = snap_to_content(&image, SourceRect::new(40, 50, 30, 20), &options(2));
        assert_eq!(snapped, SourceRect::new(48, 58, 44, 34));
    }

    #[test]
    fn test_padding_is_clamped_to_image() {
        let image = page_with_block(100, 100, SourceRect::new(0, 0, 10, 10));
        let snapped = snap_to_content(&image, SourceRect::new(0, 0, 30, 30), &options(5));
        assert_eq!(snapped, SourceRect::new(0, 0, 15, 15));
    }

    #[test]
    fn test_blank_selection_unchanged() {
        let image = page_with_block(100, 100, SourceRect::new(80, 80, 5, 5));
        let rect = SourceRect::new(10, 10, 30, 30);
        assert_eq!(snap_to_content(&image, rect, &options(4)), rect);
    }

    #[test]
    fn test_transparent_pixels_are_not_ink() {
        assert!(!is_ink(&Rgba([0, 0, 0, 0]), 200));
        assert!(is_ink(&Rgba([10, 10, 10, 255]), 200));
        assert!(!is_ink(&Rgba([250, 250, 250, 255]), 200));
    }
}
