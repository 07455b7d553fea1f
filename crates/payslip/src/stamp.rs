//! Stamp compositing: faint watermark and rotated seal
//!
//! Both marks come from the same RGBA bitmap. The watermark keeps the
//! stamp's colors and scales its alpha down; the seal is recolored to a
//! single brand color with its light background made transparent, then
//! rotated clockwise on an expanded canvas so no corner is clipped.

use crate::layout::{HexColor, Layout};
use crate::StampError;
use image::{Rgba, RgbaImage};
use pdf_core::{calculate_scaled_dimensions, ImageScaleMode};
use std::path::{Path, PathBuf};

/// A loaded stamp bitmap
#[derive(Debug, Clone)]
pub struct StampAsset {
    path: PathBuf,
    image: RgbaImage,
}

/// A bitmap placed on the page (top-origin points)
#[derive(Debug, Clone)]
pub struct StampOverlay {
    pub image: RgbaImage,
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl StampAsset {
    /// Read and decode a stamp image
    ///
    /// # Errors
    /// Returns [`StampError`] when the file is missing, cannot be decoded,
    /// or has no pixels. Callers skip stamping rather than failing.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, StampError> {
        let path = path.as_ref();
        let decoded = image::open(path).map_err(|e| StampError::Unreadable {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;
        Self::from_image(path, decoded.to_rgba8())
    }

    /// Wrap an already decoded bitmap
    pub fn from_image(path: impl Into<PathBuf>, image: RgbaImage) -> Result<Self, StampError> {
        let path = path.into();
        if image.width() == 0 || image.height() == 0 {
            return Err(StampError::Empty { path });
        }
        Ok(Self { path, image })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn image(&self) -> &RgbaImage {
        &self.image
    }

    /// Faint mark centered on the page, sized from the ledger width
    pub fn watermark(&self, layout: &Layout, table_width: f64) -> StampOverlay {
        let settings = &layout.watermark;
        let image = fade_alpha(&self.image, settings.opacity);

        let (width, height) = calculate_scaled_dimensions(
            image.width(),
            image.height(),
            table_width * settings.width_fraction,
            0.0,
            ImageScaleMode::FitWidth,
        );

        StampOverlay {
            image,
            x: (layout.page_width - width) / 2.0 + settings.offset_x,
            y: (layout.page_height - height) / 2.0 - settings.offset_y,
            width,
            height,
        }
    }

    /// Recolored, rotated seal centered on the signature line
    pub fn seal(&self, layout: &Layout) -> StampOverlay {
        let settings = &layout.seal;
        let recolored = recolor_seal(&self.image, settings.color, settings.threshold);
        let image = rotate_expanded(&recolored, settings.rotation_degrees);

        let (width, height) = calculate_scaled_dimensions(
            image.width(),
            image.height(),
            0.0,
            settings.height,
            ImageScaleMode::FitHeight,
        );
        let bottom = layout.from_bottom(settings.line_from_bottom - settings.image_drop);

        StampOverlay {
            image,
            x: settings.line_x + (settings.line_width - width) / 2.0,
            y: bottom - height,
            width,
            height,
        }
    }
}

/// Multiply every pixel's alpha by `factor`, truncating
pub fn fade_alpha(image: &RgbaImage, factor: f32) -> RgbaImage {
    let factor = factor.clamp(0.0, 1.0);
    let mut faded = image.clone();
    faded
        .pixels_mut()
        .for_each(|p| p.0[3] = (p.0[3] as f32 * factor) as u8);
    faded
}

/// Map dark pixels to `color` and make light pixels transparent
///
/// A visible pixel is ink when the mean of its RGB channels is below
/// `threshold`; ink keeps its alpha, background gets alpha 0.
pub fn recolor_seal(image: &RgbaImage, color: HexColor, threshold: u8) -> RgbaImage {
    let [r, g, b] = color.0;
    let mut recolored = image.clone();
    recolored.pixels_mut().for_each(|p| {
        let [pr, pg, pb, a] = p.0;
        if a == 0 {
            return;
        }
        let mean = (pr as u16 + pg as u16 + pb as u16) / 3;
        *p = if mean < threshold as u16 {
            Rgba([r, g, b, a])
        } else {
            Rgba([pr, pg, pb, 0])
        };
    });
    recolored
}

/// Rotate clockwise by `degrees`, growing the canvas to fit the result
///
/// Uses bilinear sampling on premultiplied alpha so transparent
/// neighbours do not darken edges. Area outside the source is transparent.
pub fn rotate_expanded(image: &RgbaImage, degrees: f64) -> RgbaImage {
    let (src_w, src_h) = (image.width() as f64, image.height() as f64);
    let (sin, cos) = degrees.to_radians().sin_cos();

    // Shave float noise so 90 degree turns do not gain a pixel
    let fit = |v: f64| ((v - 1e-6).ceil().max(1.0)) as u32;
    let dst_w = fit(src_w * cos.abs() + src_h * sin.abs());
    let dst_h = fit(src_w * sin.abs() + src_h * cos.abs());

    let (src_cx, src_cy) = (src_w / 2.0, src_h / 2.0);
    let (dst_cx, dst_cy) = (dst_w as f64 / 2.0, dst_h as f64 / 2.0);

    RgbaImage::from_fn(dst_w, dst_h, |x, y| {
        let dx = x as f64 + 0.5 - dst_cx;
        let dy = y as f64 + 0.5 - dst_cy;
        // Inverse of a clockwise turn in y-down coordinates
        let sx = src_cx + dx * cos + dy * sin;
        let sy = src_cy - dx * sin + dy * cos;
        sample_bilinear(image, sx - 0.5, sy - 0.5)
    })
}

fn sample_bilinear(image: &RgbaImage, fx: f64, fy: f64) -> Rgba<u8> {
    let x0 = fx.floor();
    let y0 = fy.floor();
    let tx = fx - x0;
    let ty = fy - y0;

    let mut acc = [0.0f64; 4];
    let taps = [
        (x0, y0, (1.0 - tx) * (1.0 - ty)),
        (x0 + 1.0, y0, tx * (1.0 - ty)),
        (x0, y0 + 1.0, (1.0 - tx) * ty),
        (x0 + 1.0, y0 + 1.0, tx * ty),
    ];

    for (px, py, weight) in taps {
        if weight <= 0.0
            || px < 0.0
            || py < 0.0
            || px >= image.width() as f64
            || py >= image.height() as f64
        {
            continue;
        }
        let [r, g, b, a] = image.get_pixel(px as u32, py as u32).0;
        let alpha = a as f64 * weight;
        acc[0] += r as f64 * alpha;
        acc[1] += g as f64 * alpha;
        acc[2] += b as f64 * alpha;
        acc[3] += alpha;
    }

    if acc[3] <= 0.0 {
        return Rgba([0, 0, 0, 0]);
    }

    let channel = |v: f64| v.round().clamp(0.0, 255.0) as u8;
    Rgba([
        channel(acc[0] / acc[3]),
        channel(acc[1] / acc[3]),
        channel(acc[2] / acc[3]),
        channel(acc[3]),
    ])
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    const BRAND: HexColor = HexColor::new(7, 54, 48);

    #[test]
    fn test_fade_alpha_truncates() {
        let image = RgbaImage::from_pixel(2, 2, Rgba([200, 10, 10, 255]));
        let faded = fade_alpha(&image, 0.08);

        // 255 * 0.08 = 20.4
        assert_eq!(faded.get_pixel(0, 0).0, [200, 10, 10, 20]);
    }

    #[test]
    fn test_recolor_seal() {
        let mut image = RgbaImage::new(3, 1);
        image.put_pixel(0, 0, Rgba([20, 20, 20, 180])); // ink
        image.put_pixel(1, 0, Rgba([240, 240, 240, 255])); // paper
        image.put_pixel(2, 0, Rgba([0, 0, 0, 0])); // transparent

        let recolored = recolor_seal(&image, BRAND, 128);

        assert_eq!(recolored.get_pixel(0, 0).0, [7, 54, 48, 180]);
        assert_eq!(recolored.get_pixel(1, 0).0[3], 0);
        assert_eq!(recolored.get_pixel(2, 0).0, [0, 0, 0, 0]);
    }

    #[test]
    fn test_recolor_threshold_boundary() {
        let image = RgbaImage::from_pixel(1, 1, Rgba([128, 128, 128, 255]));
        assert_eq!(recolor_seal(&image, BRAND, 128).get_pixel(0, 0).0[3], 0);

        let image = RgbaImage::from_pixel(1, 1, Rgba([127, 127, 127, 255]));
        assert_eq!(recolor_seal(&image, BRAND, 128).get_pixel(0, 0).0[3], 255);
    }

    #[test]
    fn test_rotate_zero_is_identity() {
        let mut image = RgbaImage::new(4, 3);
        for (x, y, p) in image.enumerate_pixels_mut() {
            *p = Rgba([(x * 60) as u8, (y * 80) as u8, 7, 255]);
        }
        assert_eq!(rotate_expanded(&image, 0.0), image);
    }

    #[test]
    fn test_rotate_quarter_turn_clockwise() {
        let mut image = RgbaImage::new(3, 1);
        image.put_pixel(0, 0, Rgba([255, 0, 0, 255]));
        image.put_pixel(1, 0, Rgba([0, 255, 0, 255]));
        image.put_pixel(2, 0, Rgba([0, 0, 255, 255]));

        let rotated = rotate_expanded(&image, 90.0);

        assert_eq!(rotated.dimensions(), (1, 3));
        // The left end swings to the top
        assert_eq!(rotated.get_pixel(0, 0).0, [255, 0, 0, 255]);
        assert_eq!(rotated.get_pixel(0, 2).0, [0, 0, 255, 255]);
    }

    #[test]
    fn test_rotate_expands_canvas() {
        let image = RgbaImage::from_pixel(100, 50, Rgba([7, 54, 48, 255]));
        let rotated = rotate_expanded(&image, 40.0);

        assert_eq!(rotated.dimensions(), (109, 103));
        // Corners fall outside the rotated source
        assert_eq!(rotated.get_pixel(0, 0).0[3], 0);
        // Center stays opaque ink
        assert_eq!(rotated.get_pixel(54, 51).0, [7, 54, 48, 255]);
    }

    #[test]
    fn test_empty_image_rejected() {
        let result = StampAsset::from_image("empty.png", RgbaImage::new(0, 0));
        assert!(matches!(result, Err(StampError::Empty { .. })));
    }

    #[test]
    fn test_missing_file_is_unreadable() {
        let result = StampAsset::load("/nonexistent/stamp.png");
        assert!(matches!(result, Err(StampError::Unreadable { .. })));
    }

    #[test]
    fn test_watermark_placement() {
        let stamp =
            StampAsset::from_image("stamp.png", RgbaImage::from_pixel(200, 100, Rgba([0, 0, 0, 255])))
                .unwrap();
        let layout = Layout::default();
        let overlay = stamp.watermark(&layout, 500.0);

        assert_eq!((overlay.width, overlay.height), (300.0, 150.0));
        assert!((overlay.x - ((layout.page_width - 300.0) / 2.0 + 20.0)).abs() < 1e-9);
        assert!((overlay.y - ((layout.page_height - 150.0) / 2.0 - 12.0)).abs() < 1e-9);
        assert_eq!(overlay.image.get_pixel(0, 0).0[3], 20);
    }

    #[test]
    fn test_seal_placement() {
        let stamp =
            StampAsset::from_image("stamp.png", RgbaImage::from_pixel(60, 60, Rgba([0, 0, 0, 255])))
                .unwrap();
        let layout = Layout::default();
        let overlay = stamp.seal(&layout);

        assert_eq!(overlay.height, 90.0);
        let aspect = overlay.image.width() as f64 / overlay.image.height() as f64;
        assert!((overlay.width - 90.0 * aspect).abs() < 1e-9);

        // Centered on the 120pt line starting at x=50
        assert!((overlay.x + overlay.width / 2.0 - 110.0).abs() < 1e-9);
        // Bottom edge 95pt above the page bottom
        assert!((overlay.y + overlay.height - (layout.page_height - 95.0)).abs() < 1e-9);
    }
}
