//! Raster images as PDF image XObjects

use crate::{PdfError, Result};
use image::RgbaImage;
use lopdf::{Dictionary, Object, Stream};
use std::io::Write;

/// How an image is sized against the box passed to `insert_image`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ImageScaleMode {
    /// Fill the box exactly, ignoring the image's aspect ratio
    #[default]
    Stretch,
    /// Use the box width; height follows the aspect ratio
    FitWidth,
    /// Use the box height; width follows the aspect ratio
    FitHeight,
}

/// Size in points an image of `pixel_width` x `pixel_height` occupies
///
/// The dimension a mode does not use is ignored. An image with no pixels
/// occupies nothing.
pub fn calculate_scaled_dimensions(
    pixel_width: u32,
    pixel_height: u32,
    box_width: f64,
    box_height: f64,
    mode: ImageScaleMode,
) -> (f64, f64) {
    if pixel_width == 0 || pixel_height == 0 {
        return (0.0, 0.0);
    }

    let ratio = pixel_width as f64 / pixel_height as f64;
    match mode {
        ImageScaleMode::Stretch => (box_width, box_height),
        ImageScaleMode::FitWidth => (box_width, box_width / ratio),
        ImageScaleMode::FitHeight => (box_height * ratio, box_height),
    }
}

/// An RGBA bitmap prepared for embedding
///
/// Color samples and the alpha channel are stored separately: the alpha
/// channel becomes a DeviceGray soft mask (`/SMask`) so translucent pixels
/// blend with whatever is already drawn underneath.
#[derive(Debug, Clone)]
pub struct ImageXObject {
    pub width: u32,
    pub height: u32,
    /// Zlib-compressed RGB samples
    pub data: Vec<u8>,
    /// Zlib-compressed alpha samples, `None` when the image is fully opaque
    pub alpha: Option<Vec<u8>>,
}

impl ImageXObject {
    /// Split and compress the color and alpha samples of `image`
    ///
    /// A bitmap with no pixels cannot be embedded and is rejected.
    pub fn from_rgba(image: &RgbaImage) -> Result<Self> {
        let (width, height) = image.dimensions();
        if width == 0 || height == 0 {
            return Err(PdfError::Image(format!("{width}x{height} bitmap has no pixels")));
        }
        let pixel_count = (width as usize) * (height as usize);

        let mut rgb = Vec::with_capacity(pixel_count * 3);
        let mut alpha = Vec::with_capacity(pixel_count);
        for pixel in image.pixels() {
            rgb.extend_from_slice(&pixel.0[..3]);
            alpha.push(pixel.0[3]);
        }

        let opaque = alpha.iter().all(|&a| a == u8::MAX);

        Ok(Self {
            width,
            height,
            data: deflate(&rgb)?,
            alpha: if opaque { None } else { Some(deflate(&alpha)?) },
        })
    }

    /// The DeviceRGB image stream
    ///
    /// `smask` is the object id of the stream returned by
    /// [`ImageXObject::to_smask_stream`], when the image has one.
    pub fn to_pdf_stream(&self, smask: Option<lopdf::ObjectId>) -> Stream {
        let mut dict = image_dictionary(self.width, self.height, "DeviceRGB");
        if let Some(id) = smask {
            dict.set("SMask", Object::Reference(id));
        }
        dict.set("Length", self.data.len() as i64);

        Stream::new(dict, self.data.clone())
    }

    /// Convert the alpha channel to a soft mask stream
    pub fn to_smask_stream(&self) -> Option<Stream> {
        self.alpha.as_ref().map(|alpha| {
            let mut dict = image_dictionary(self.width, self.height, "DeviceGray");
            dict.set("Length", alpha.len() as i64);
            Stream::new(dict, alpha.clone())
        })
    }
}

fn image_dictionary(width: u32, height: u32, color_space: &str) -> Dictionary {
    let mut dict = Dictionary::new();
    dict.set("Type", Object::Name(b"XObject".to_vec()));
    dict.set("Subtype", Object::Name(b"Image".to_vec()));
    dict.set("Width", width as i64);
    dict.set("Height", height as i64);
    dict.set("ColorSpace", Object::Name(color_space.as_bytes().to_vec()));
    dict.set("BitsPerComponent", 8i64);
    dict.set("Filter", Object::Name(b"FlateDecode".to_vec()));
    dict
}

fn deflate(raw: &[u8]) -> Result<Vec<u8>> {
    let mut encoder =
        flate2::write::ZlibEncoder::new(Vec::new(), flate2::Compression::default());
    encoder.write_all(raw)?;
    Ok(encoder.finish()?)
}

/// Operators that paint image resource `name` into a rectangle
///
/// `x`/`y` is the bottom-left corner in PDF coordinates.
pub fn generate_image_operators(name: &str, x: f64, y: f64, width: f64, height: f64) -> Vec<u8> {
    format!("q\n{width} 0 0 {height} {x} {y} cm\n/{name} Do\nQ\n").into_bytes()
}
