//! Display and source coordinate spaces
//!
//! The canvas shows a page raster at some zoom. Pointer input arrives in
//! display pixels, while everything that is stored, detected or cropped is
//! in source pixels of the raster. The two spaces are separate types and
//! only [`CanvasSnapshot`] converts between them.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// A pointer position in display pixels
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct DisplayPoint {
    pub x: f32,
    pub y: f32,
}

impl DisplayPoint {
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

/// A rectangle in display pixels (origin top-left)
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct DisplayRect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl DisplayRect {
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Normalised rectangle spanned by two drag corners
    pub fn from_corners(a: DisplayPoint, b: DisplayPoint) -> Self {
        Self {
            x: a.x.min(b.x),
            y: a.y.min(b.y),
            width: (a.x - b.x).abs(),
            height: (a.y - b.y).abs(),
        }
    }

    pub fn right(&self) -> f32 {
        self.x + self.width
    }

    pub fn bottom(&self) -> f32 {
        self.y + self.height
    }

    /// True if either side is shorter than `threshold`
    pub fn is_below(&self, threshold: f32) -> bool {
        self.width < threshold || self.height < threshold
    }

    pub fn contains(&self, point: DisplayPoint) -> bool {
        point.x >= self.x && point.x <= self.right() && point.y >= self.y && point.y <= self.bottom()
    }
}

/// A rectangle in source pixels of the page raster
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct SourceRect {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

impl SourceRect {
    pub fn new(x: u32, y: u32, width: u32, height: u32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Rectangle covering `left..right` and `top..bottom`
    pub fn from_edges(left: u32, top: u32, right: u32, bottom: u32) -> Self {
        Self {
            x: left,
            y: top,
            width: right.saturating_sub(left),
            height: bottom.saturating_sub(top),
        }
    }

    /// Exclusive right edge
    pub fn right(&self) -> u32 {
        self.x.saturating_add(self.width)
    }

    /// Exclusive bottom edge
    pub fn bottom(&self) -> u32 {
        self.y.saturating_add(self.height)
    }

    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }

    /// The part of this rectangle inside a `width`×`height` image, or `None`
    /// if nothing is left
    pub fn clamp_to(&self, width: u32, height: u32) -> Option<SourceRect> {
        let clamped = SourceRect::from_edges(
            self.x.min(width),
            self.y.min(height),
            self.right().min(width),
            self.bottom().min(height),
        );
        (!clamped.is_empty()).then_some(clamped)
    }

    /// The same region in a raster resampled by `sx`×`sy`
    pub fn scaled(&self, sx: f32, sy: f32) -> SourceRect {
        let to_px = |v: u32, s: f32| (v as f32 * s).round().max(0.0) as u32;
        SourceRect::from_edges(
            to_px(self.x, sx),
            to_px(self.y, sy),
            to_px(self.right(), sx),
            to_px(self.bottom(), sy),
        )
    }
}

impl std::fmt::Display for SourceRect {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{},{},{},{}", self.x, self.y, self.width, self.height)
    }
}

impl std::str::FromStr for SourceRect {
    type Err = String;

    /// Parses `x,y,width,height`
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let parts: Vec<&str> = s.split(',').map(str::trim).collect();
        let [x, y, width, height] = parts.as_slice() else {
            return Err(format!("Expected x,y,width,height, got '{s}'"));
        };
        let parse = |v: &str| {
            v.parse::<u32>()
                .map_err(|_| format!("'{v}' is not a pixel value"))
        };
        Ok(SourceRect::new(parse(x)?, parse(y)?, parse(width)?, parse(height)?))
    }
}

/// Size of the canvas on screen
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct DisplaySize {
    pub width: f32,
    pub height: f32,
}

impl DisplaySize {
    pub fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    pub fn is_valid(&self) -> bool {
        self.width > 0.0 && self.height > 0.0 && self.width.is_finite() && self.height.is_finite()
    }
}

/// Native and displayed size of the canvas at one moment.
///
/// A display dimension that is zero or negative is treated as unscaled.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CanvasSnapshot {
    pub native_width: u32,
    pub native_height: u32,
    pub display: DisplaySize,
}

impl CanvasSnapshot {
    pub fn new(native_width: u32, native_height: u32, display: DisplaySize) -> Self {
        Self {
            native_width,
            native_height,
            display,
        }
    }

    /// Source pixels per display pixel, horizontally
    pub fn scale_x(&self) -> f32 {
        scale(self.native_width, self.display.width)
    }

    /// Source pixels per display pixel, vertically
    pub fn scale_y(&self) -> f32 {
        scale(self.native_height, self.display.height)
    }

    /// Display rectangle to whole source pixels, rounding each edge.
    ///
    /// Each edge moves by at most half a source pixel, so a round trip
    /// through `to_display` is within ±1 display px while the display is no
    /// more than twice the raster size. Beyond that the drift is bounded by
    /// one source pixel (`1 / scale` display px).
    pub fn to_source(&self, rect: DisplayRect) -> SourceRect {
        let (sx, sy) = (self.scale_x(), self.scale_y());
        let to_px = |v: f32| v.round().max(0.0) as u32;

        SourceRect::from_edges(
            to_px(rect.x * sx),
            to_px(rect.y * sy),
            to_px(rect.right() * sx),
            to_px(rect.bottom() * sy),
        )
    }

    pub fn to_display(&self, rect: SourceRect) -> DisplayRect {
        let (sx, sy) = (self.scale_x(), self.scale_y());
        DisplayRect {
            x: rect.x as f32 / sx,
            y: rect.y as f32 / sy,
            width: rect.width as f32 / sx,
            height: rect.height as f32 / sy,
        }
    }
}

fn scale(native: u32, display: f32) -> f32 {
    if display > 0.0 && display.is_finite() && native > 0 {
        native as f32 / display
    } else {
        1.0
    }
}
