//! Path drawing operators (rectangles and lines)
//!
//! All coordinates are PDF coordinates (origin at the bottom-left). Each
//! operator group is wrapped in `q`/`Q` so colors and line widths never leak
//! into the next drawing call.

use crate::canvas::Color;

/// Generate operators that fill a rectangle
///
/// # Arguments
/// * `x` - Left edge in points
/// * `y` - Bottom edge in points
/// * `width` - Rectangle width in points
/// * `height` - Rectangle height in points
/// * `color` - Fill color
pub fn fill_rect_operators(x: f64, y: f64, width: f64, height: f64, color: Color) -> Vec<u8> {
    format!(
        "q\n{} {} {} rg\n{x} {y} {width} {height} re\nf\nQ\n",
        color.r, color.g, color.b
    )
    .into_bytes()
}

/// Generate operators that stroke the outline of a rectangle
pub fn stroke_rect_operators(
    x: f64,
    y: f64,
    width: f64,
    height: f64,
    color: Color,
    line_width: f64,
) -> Vec<u8> {
    format!(
        "q\n{} {} {} RG\n{line_width} w\n{x} {y} {width} {height} re\nS\nQ\n",
        color.r, color.g, color.b
    )
    .into_bytes()
}

/// Generate operators that stroke a straight line
pub fn line_operators(
    from: (f64, f64),
    to: (f64, f64),
    color: Color,
    line_width: f64,
) -> Vec<u8> {
    format!(
        "q\n{} {} {} RG\n{line_width} w\n{} {} m\n{} {} l\nS\nQ\n",
        color.r, color.g, color.b, from.0, from.1, to.0, to.1
    )
    .into_bytes()
}
