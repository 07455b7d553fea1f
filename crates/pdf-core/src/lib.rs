//! Single-page PDF drawing on top of lopdf
//!
//! A [`PageCanvas`] records text, rules, rectangles and RGBA images using
//! top-left coordinates. The finished page can be stamped over the first
//! page of a letterhead with [`overlay_page`].
//!
//! # Example
//!
//! ```ignore
//! use pdf_core::{Align, Color, PageCanvas, StandardFont};
//!
//! let mut canvas = PageCanvas::new(595.28, 841.89);
//! canvas.set_font(StandardFont::HelveticaBold, 18.0);
//! canvas.set_fill_color(Color::black());
//! canvas.insert_text("SALARY SLIP", 50.0, 190.0, Align::Left);
//! let content = canvas.finish()?;
//!
//! let mut template = lopdf::Document::load("letterhead.pdf")?;
//! pdf_core::overlay_page(&mut template, &content)?;
//! template.save("out.pdf")?;
//! ```

mod canvas;
mod font;
mod graphics;
mod image;
mod merge;
mod text;

pub use canvas::{Color, PageCanvas};
pub use font::StandardFont;
pub use graphics::{fill_rect_operators, line_operators, stroke_rect_operators};
pub use image::{calculate_scaled_dimensions, ImageScaleMode, ImageXObject};
pub use merge::{document_bytes, first_page_size, overlay_page};
pub use text::{generate_text_operators, TextRenderContext};

use thiserror::Error;

/// Failures while building, loading or merging pages
#[derive(Debug, Error)]
pub enum PdfError {
    #[error("Cannot open PDF: {0}")]
    Open(String),

    #[error("Cannot serialize PDF: {0}")]
    Save(String),

    #[error("Document has no pages")]
    EmptyDocument,

    #[error("Cannot embed image: {0}")]
    Image(String),

    #[error("Malformed PDF: {0}")]
    Malformed(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Lopdf(#[from] lopdf::Error),
}

pub type Result<T> = std::result::Result<T, PdfError>;

/// Which edge of a text run sits on the anchor x coordinate
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Align {
    #[default]
    Left,
    Center,
    Right,
}

/// A4 in points
pub const A4_WIDTH: f64 = 595.28;
pub const A4_HEIGHT: f64 = 841.89;
