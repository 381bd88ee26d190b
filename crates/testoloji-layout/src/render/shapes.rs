//! Vector shapes as content stream operations

use crate::constants::BEZIER_CIRCLE_FACTOR;

/// Path of a circle built from four Bezier curves (not painted)
pub fn circle_path(cx: f32, cy: f32, r: f32) -> String {
    let k = r * BEZIER_CIRCLE_FACTOR;
    let mut ops = String::new();
    ops.push_str(&format!("{} {} m\n", cx + r, cy));
    ops.push_str(&format!(
        "{} {} {} {} {} {} c\n",
        cx + r,
        cy + k,
        cx + k,
        cy + r,
        cx,
        cy + r
    ));
    ops.push_str(&format!(
        "{} {} {} {} {} {} c\n",
        cx - k,
        cy + r,
        cx - r,
        cy + k,
        cx - r,
        cy
    ));
    ops.push_str(&format!(
        "{} {} {} {} {} {} c\n",
        cx - r,
        cy - k,
        cx - k,
        cy - r,
        cx,
        cy - r
    ));
    ops.push_str(&format!(
        "{} {} {} {} {} {} c\n",
        cx + k,
        cy - r,
        cx + r,
        cy - k,
        cx + r,
        cy
    ));
    ops
}

pub fn stroke_circle(cx: f32, cy: f32, r: f32) -> String {
    format!("{}S\n", circle_path(cx, cy, r))
}

pub fn fill_circle(cx: f32, cy: f32, r: f32) -> String {
    format!("{}f\n", circle_path(cx, cy, r))
}

pub fn stroke_rect(x: f32, y: f32, width: f32, height: f32) -> String {
    format!("{} {} {} {} re S\n", x, y, width, height)
}

pub fn fill_rect(x: f32, y: f32, width: f32, height: f32) -> String {
    format!("{} {} {} {} re f\n", x, y, width, height)
}

pub fn line(x1: f32, y1: f32, x2: f32, y2: f32) -> String {
    format!("{} {} m {} {} l S\n", x1, y1, x2, y2)
}

pub fn line_width(width: f32) -> String {
    format!("{} w\n", width)
}
