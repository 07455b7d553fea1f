//! Single-page PDF canvas

use crate::graphics::{fill_rect_operators, line_operators, stroke_rect_operators};
use crate::image::{
    calculate_scaled_dimensions, generate_image_operators, ImageScaleMode, ImageXObject,
};
use crate::text::{generate_text_operators, TextRenderContext};
use crate::{Align, Result, StandardFont};
use image::RgbaImage;
use lopdf::{Dictionary, Document, Object, ObjectId, Stream};
use std::collections::BTreeMap;

/// DeviceRGB color with components in `0.0..=1.0`
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Color {
    pub r: f32,
    pub g: f32,
    pub b: f32,
}

impl Color {
    pub const BLACK: Color = Color { r: 0.0, g: 0.0, b: 0.0 };
    pub const WHITE: Color = Color { r: 1.0, g: 1.0, b: 1.0 };

    pub fn rgb(r: f32, g: f32, b: f32) -> Self {
        Self { r, g, b }
    }

    /// From 8-bit channels, as written in `#rrggbb`
    pub fn from_rgb(r: u8, g: u8, b: u8) -> Self {
        let unit = |c: u8| f32::from(c) / 255.0;
        Self::rgb(unit(r), unit(g), unit(b))
    }

    pub fn black() -> Self {
        Self::BLACK
    }

    pub fn white() -> Self {
        Self::WHITE
    }
}

/// A single blank page that drawing operations are appended to
///
/// Coordinates passed to every drawing method are in points with the origin
/// at the top-left corner of the page (y grows downward); they are converted
/// to PDF bottom-origin coordinates internally. Text `y` is the baseline.
///
/// Content operators are buffered and written as one content stream when the
/// canvas is finished.
pub struct PageCanvas {
    width: f64,
    height: f64,
    font: StandardFont,
    font_size: f32,
    /// Used for text as well as filled shapes
    fill_color: Color,
    stroke_color: Color,
    line_width: f64,
    /// Font -> resource name, numbered by first use
    font_resources: BTreeMap<StandardFont, String>,
    /// Resource name, color stream and optional soft mask
    images: Vec<(String, Stream, Option<Stream>)>,
    content: Vec<u8>,
}

impl PageCanvas {
    /// Create a blank page of the given size in points
    pub fn new(width: f64, height: f64) -> Self {
        Self {
            width,
            height,
            font: StandardFont::default(),
            font_size: 10.0,
            fill_color: Color::default(),
            stroke_color: Color::default(),
            line_width: 1.0,
            font_resources: BTreeMap::new(),
            images: Vec::new(),
            content: Vec::new(),
        }
    }

    /// Page width in points
    pub fn width(&self) -> f64 {
        self.width
    }

    /// Page height in points
    pub fn height(&self) -> f64 {
        self.height
    }

    /// Set the current font and size
    pub fn set_font(&mut self, font: StandardFont, size: f32) {
        self.font = font;
        self.font_size = size;
    }

    /// Set the fill color, used for text and filled shapes
    pub fn set_fill_color(&mut self, color: Color) {
        self.fill_color = color;
    }

    /// Set the stroke color, used for outlines and lines
    pub fn set_stroke_color(&mut self, color: Color) {
        self.stroke_color = color;
    }

    /// Set the stroke width in points
    pub fn set_line_width(&mut self, width: f64) {
        self.line_width = width;
    }

    /// Width of `text` in the current font and size, in points
    pub fn text_width(&self, text: &str) -> f64 {
        self.font
            .text_width_points(text, self.font_size)
    }

    /// Draw `text` with its baseline `y` points below the top edge
    ///
    /// `align` decides whether `x` is the left edge, the middle or the right
    /// edge of the run. Empty strings draw nothing.
    pub fn insert_text(&mut self, text: &str, x: f64, y: f64, align: Align) {
        if text.is_empty() {
            return;
        }
        let ctx = TextRenderContext {
            font_name: self.font_resource(self.font),
            font_size: self.font_size,
            text_width: self.text_width(text),
            color: self.fill_color,
        };
        let literal = self.font.encode_literal(text);
        let operators = generate_text_operators(&literal, x, self.height - y, align, &ctx);
        self.content.extend_from_slice(&operators);
    }

    /// Fill a rectangle whose top-left corner is at (`x`, `y`)
    pub fn fill_rect(&mut self, x: f64, y: f64, width: f64, height: f64) {
        let operators = fill_rect_operators(x, self.height - y - height, width, height, self.fill_color);
        self.content.extend_from_slice(&operators);
    }

    /// Stroke the outline of a rectangle whose top-left corner is at (`x`, `y`)
    pub fn stroke_rect(&mut self, x: f64, y: f64, width: f64, height: f64) {
        let operators = stroke_rect_operators(
            x,
            self.height - y - height,
            width,
            height,
            self.stroke_color,
            self.line_width,
        );
        self.content.extend_from_slice(&operators);
    }

    /// Stroke a straight line between two points
    pub fn line(&mut self, from: (f64, f64), to: (f64, f64)) {
        let operators = line_operators(
            (from.0, self.height - from.1),
            (to.0, self.height - to.1),
            self.stroke_color,
            self.line_width,
        );
        self.content.extend_from_slice(&operators);
    }

    /// Place an RGBA bitmap with its top-left corner at (`x`, `y`)
    ///
    /// Translucent pixels stay translucent: the alpha channel becomes the
    /// image's soft mask. `width`/`height` are interpreted per `mode`, and the
    /// size actually drawn is returned.
    pub fn insert_image(
        &mut self,
        image: &RgbaImage,
        x: f64,
        y: f64,
        width: f64,
        height: f64,
        mode: ImageScaleMode,
    ) -> Result<(f64, f64)> {
        let (drawn_width, drawn_height) =
            calculate_scaled_dimensions(image.width(), image.height(), width, height, mode);

        let xobject = ImageXObject::from_rgba(image)?;
        let resource_name = format!("Im{}", self.images.len() + 1);
        self.images.push((
            resource_name.clone(),
            xobject.to_pdf_stream(None),
            xobject.to_smask_stream(),
        ));

        let pdf_y = self.height - y - drawn_height;
        let operators = generate_image_operators(&resource_name, x, pdf_y, drawn_width, drawn_height);
        self.content.extend_from_slice(&operators);

        Ok((drawn_width, drawn_height))
    }

    /// Get or assign the resource name (e.g., "F1") for a font
    fn font_resource(&mut self, font: StandardFont) -> String {
        let next = self.font_resources.len() + 1;
        self.font_resources
            .entry(font)
            .or_insert_with(|| format!("F{next}"))
            .clone()
    }

    /// Raw content operators buffered so far
    pub fn content(&self) -> &[u8] {
        &self.content
    }

    /// Write the buffered content into a new one-page document
    pub fn finish(self) -> Result<Document> {
        let mut doc = Document::with_version("1.5");
        let pages_id = doc.new_object_id();

        let mut font_dict = Dictionary::new();
        for (font, resource_name) in &self.font_resources {
            let font_id = doc.add_object(font.to_pdf_dictionary());
            font_dict.set(resource_name.as_bytes(), Object::Reference(font_id));
        }

        let mut xobject_dict = Dictionary::new();
        for (resource_name, stream, smask) in self.images {
            let smask_id = smask.map(|s| doc.add_object(s));
            let mut stream = stream;
            if let Some(id) = smask_id {
                stream.dict.set("SMask", Object::Reference(id));
            }
            let image_id = doc.add_object(stream);
            xobject_dict.set(resource_name.as_bytes(), Object::Reference(image_id));
        }

        let mut resources = Dictionary::new();
        if !font_dict.is_empty() {
            resources.set("Font", Object::Dictionary(font_dict));
        }
        if !xobject_dict.is_empty() {
            resources.set("XObject", Object::Dictionary(xobject_dict));
        }

        let contents_id = doc.add_object(Stream::new(Dictionary::new(), self.content));

        let mut page = Dictionary::new();
        page.set("Type", Object::Name(b"Page".to_vec()));
        page.set("Parent", Object::Reference(pages_id));
        page.set(
            "MediaBox",
            Object::Array(vec![
                Object::Integer(0),
                Object::Integer(0),
                (self.width as f32).into(),
                (self.height as f32).into(),
            ]),
        );
        page.set("Resources", Object::Dictionary(resources));
        page.set("Contents", Object::Reference(contents_id));
        let page_id: ObjectId = doc.add_object(page);

        let mut pages = Dictionary::new();
        pages.set("Type", Object::Name(b"Pages".to_vec()));
        pages.set("Kids", Object::Array(vec![Object::Reference(page_id)]));
        pages.set("Count", 1i64);
        doc.objects.insert(pages_id, Object::Dictionary(pages));

        let mut catalog = Dictionary::new();
        catalog.set("Type", Object::Name(b"Catalog".to_vec()));
        catalog.set("Pages", Object::Reference(pages_id));
        let catalog_id = doc.add_object(catalog);
        doc.trailer.set("Root", Object::Reference(catalog_id));

        Ok(doc)
    }

    /// Finish the page and serialize it to bytes
    pub fn to_bytes(self) -> Result<Vec<u8>> {
        let mut doc = self.finish()?;
        crate::merge::document_bytes(&mut doc)
    }
}
