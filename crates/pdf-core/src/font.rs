//! Standard Type1 fonts for PDF documents
//!
//! The content page only needs Helvetica and Helvetica-Bold, both of which
//! every PDF reader provides, so nothing is embedded. Widths come from the
//! Adobe font metrics and are used for right/center alignment.

use lopdf::{Dictionary, Object};

/// Advance widths (1/1000 em) for Helvetica, ASCII 32..=126
const HELVETICA_WIDTHS: [u16; 95] = [
    278, 278, 355, 556, 556, 889, 667, 191, 333, 333, 389, 584, 278, 333, 278, 278, // ' '..'/'
    556, 556, 556, 556, 556, 556, 556, 556, 556, 556, // '0'..'9'
    278, 278, 584, 584, 584, 556, 1015, // ':'..'@'
    667, 667, 722, 722, 667, 611, 778, 722, 278, 500, 667, 556, 833, // 'A'..'M'
    722, 778, 667, 778, 722, 667, 611, 722, 667, 944, 667, 667, 611, // 'N'..'Z'
    278, 278, 278, 469, 556, 333, // '['..'`'
    556, 556, 500, 556, 556, 278, 556, 556, 222, 222, 500, 222, 833, // 'a'..'m'
    556, 556, 556, 556, 333, 500, 278, 556, 500, 722, 500, 500, 500, // 'n'..'z'
    334, 260, 334, 584, // '{'..'~'
];

/// Advance widths (1/1000 em) for Helvetica-Bold, ASCII 32..=126
const HELVETICA_BOLD_WIDTHS: [u16; 95] = [
    278, 333, 474, 556, 556, 889, 722, 238, 333, 333, 389, 584, 278, 333, 278, 278, // ' '..'/'
    556, 556, 556, 556, 556, 556, 556, 556, 556, 556, // '0'..'9'
    333, 333, 584, 584, 584, 611, 975, // ':'..'@'
    722, 722, 722, 722, 667, 611, 778, 722, 278, 556, 722, 611, 833, // 'A'..'M'
    722, 778, 667, 778, 722, 667, 611, 722, 667, 944, 667, 667, 611, // 'N'..'Z'
    333, 278, 333, 584, 556, 333, // '['..'`'
    556, 611, 556, 611, 556, 333, 611, 611, 278, 278, 556, 278, 889, // 'a'..'m'
    611, 611, 611, 611, 389, 556, 333, 611, 556, 778, 556, 556, 500, // 'n'..'z'
    389, 280, 389, 584, // '{'..'~'
];

/// Width used for characters outside the ASCII table
const FALLBACK_WIDTH: u16 = 556;

/// WinAnsiEncoding bytes 0x80..=0x9F and the characters they stand for
const WIN_ANSI_HIGH: [(char, u8); 27] = [
    ('\u{20ac}', 0x80), // euro
    ('\u{201a}', 0x82),
    ('\u{0192}', 0x83),
    ('\u{201e}', 0x84),
    ('\u{2026}', 0x85), // ellipsis
    ('\u{2020}', 0x86),
    ('\u{2021}', 0x87),
    ('\u{02c6}', 0x88),
    ('\u{2030}', 0x89),
    ('\u{0160}', 0x8a),
    ('\u{2039}', 0x8b),
    ('\u{0152}', 0x8c),
    ('\u{017d}', 0x8e),
    ('\u{2018}', 0x91), // left single quote
    ('\u{2019}', 0x92), // apostrophe
    ('\u{201c}', 0x93),
    ('\u{201d}', 0x94),
    ('\u{2022}', 0x95), // bullet
    ('\u{2013}', 0x96), // en dash
    ('\u{2014}', 0x97),
    ('\u{02dc}', 0x98),
    ('\u{2122}', 0x99),
    ('\u{0161}', 0x9a),
    ('\u{203a}', 0x9b),
    ('\u{0153}', 0x9c),
    ('\u{017e}', 0x9e),
    ('\u{0178}', 0x9f),
];

/// WinAnsiEncoding byte for a character above ASCII, if it has one
fn win_ansi_byte(c: char) -> Option<u8> {
    match c {
        '\u{a0}'..='\u{ff}' => Some(c as u8),
        _ => WIN_ANSI_HIGH
            .iter()
            .find(|(mapped, _)| *mapped == c)
            .map(|(_, byte)| *byte),
    }
}

/// One of the PDF standard fonts used by the content page
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub enum StandardFont {
    #[default]
    Helvetica,
    HelveticaBold,
}

impl StandardFont {
    /// PostScript name written to the font dictionary
    pub fn base_font(&self) -> &'static str {
        match self {
            StandardFont::Helvetica => "Helvetica",
            StandardFont::HelveticaBold => "Helvetica-Bold",
        }
    }

    fn widths(&self) -> &'static [u16; 95] {
        match self {
            StandardFont::Helvetica => &HELVETICA_WIDTHS,
            StandardFont::HelveticaBold => &HELVETICA_BOLD_WIDTHS,
        }
    }

    /// Width of a single character in 1/1000 em
    fn char_width(&self, c: char) -> u16 {
        match c as u32 {
            code @ 32..=126 => self.widths()[(code - 32) as usize],
            _ => FALLBACK_WIDTH,
        }
    }

    /// Calculate text width in points
    pub fn text_width_points(&self, text: &str, font_size: f32) -> f64 {
        let units: u32 = text.chars().map(|c| self.char_width(c) as u32).sum();
        units as f64 * font_size as f64 / 1000.0
    }

    /// Encode text as a PDF literal string in WinAnsiEncoding
    ///
    /// Characters the encoding has no byte for become `?`. Parentheses and
    /// backslashes are escaped.
    pub fn encode_literal(&self, text: &str) -> String {
        let mut encoded = String::with_capacity(text.len() + 2);
        encoded.push('(');
        for c in text.chars() {
            match c {
                '(' | ')' | '\\' => {
                    encoded.push('\\');
                    encoded.push(c);
                }
                ' '..='~' => encoded.push(c),
                _ => match win_ansi_byte(c) {
                    Some(byte) => encoded.push_str(&format!("\\{byte:03o}")),
                    None => encoded.push('?'),
                },
            }
        }
        encoded.push(')');
        encoded
    }

    /// Build the font dictionary for the page Resources
    pub fn to_pdf_dictionary(&self) -> Dictionary {
        let mut dict = Dictionary::new();
        dict.set("Type", Object::Name(b"Font".to_vec()));
        dict.set("Subtype", Object::Name(b"Type1".to_vec()));
        dict.set("BaseFont", Object::Name(self.base_font().as_bytes().to_vec()));
        dict.set("Encoding", Object::Name(b"WinAnsiEncoding".to_vec()));
        dict
    }
}
