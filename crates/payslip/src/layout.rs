//! Page layout and theme
//!
//! Every block of the slip reads its geometry and colors from [`Layout`].
//! Coordinates are points with the origin at the top-left of the page (y
//! grows downward), except for the footer area which is anchored to the
//! page bottom and measured upward so it follows the page height.
//!
//! All structs deserialize with defaults, so a JSON layout only needs to
//! name what it overrides:
//!
//! ```json
//! { "palette": { "primary": "#1565c0" }, "seal": { "rotation_degrees": 30 } }
//! ```

use crate::{PayslipError, Result};
use chrono::format::{Item, StrftimeItems};
use chrono::NaiveDate;
use pdf_core::{Color, A4_HEIGHT, A4_WIDTH};
use serde::{Deserialize, Serialize};
use std::fmt::{self, Write};

/// RGB color written as `"#rrggbb"` in configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct HexColor(pub [u8; 3]);

impl HexColor {
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self([r, g, b])
    }

    /// Parse `#rrggbb` (the leading `#` is optional)
    pub fn parse(text: &str) -> Option<Self> {
        let hex = text.trim().trim_start_matches('#');
        if hex.len() != 6 || !hex.bytes().all(|b| b.is_ascii_hexdigit()) {
            return None;
        }
        let channel = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16).ok();
        Some(Self([channel(0)?, channel(2)?, channel(4)?]))
    }

    pub fn to_color(self) -> Color {
        Color::from_rgb(self.0[0], self.0[1], self.0[2])
    }
}

impl TryFrom<String> for HexColor {
    type Error = String;

    fn try_from(value: String) -> std::result::Result<Self, Self::Error> {
        HexColor::parse(&value).ok_or_else(|| format!("invalid color {value:?}, expected #rrggbb"))
    }
}

impl From<HexColor> for String {
    fn from(color: HexColor) -> Self {
        color.to_string()
    }
}

impl fmt::Display for HexColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02x}{:02x}{:02x}", self.0[0], self.0[1], self.0[2])
    }
}

/// Complete slip layout
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Layout {
    pub page_width: f64,
    pub page_height: f64,
    pub palette: Palette,
    pub title: TitleLayout,
    pub identity: IdentityLayout,
    pub ledger: LedgerLayout,
    pub banner: BannerLayout,
    pub watermark: WatermarkLayout,
    pub seal: SealLayout,
    pub footer: FooterLayout,
}

impl Default for Layout {
    fn default() -> Self {
        Self {
            page_width: A4_WIDTH,
            page_height: A4_HEIGHT,
            palette: Palette::default(),
            title: TitleLayout::default(),
            identity: IdentityLayout::default(),
            ledger: LedgerLayout::default(),
            banner: BannerLayout::default(),
            watermark: WatermarkLayout::default(),
            seal: SealLayout::default(),
            footer: FooterLayout::default(),
        }
    }
}

/// Brand colors
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Palette {
    /// Table header and net salary banner fill
    pub primary: HexColor,
    /// Table border
    pub dark: HexColor,
    /// Footer text
    pub text: HexColor,
    /// Title, identity block, table text, seal line and label
    pub ink: HexColor,
    /// Shaded (even) ledger rows
    pub shade: HexColor,
    /// Totals row fill
    pub totals: HexColor,
    /// Header and banner text, unshaded rows
    pub white: HexColor,
}

impl Default for Palette {
    fn default() -> Self {
        Self {
            primary: HexColor::new(0x0e, 0x82, 0x82),
            dark: HexColor::new(0x07, 0x36, 0x30),
            text: HexColor::new(0x21, 0x21, 0x21),
            ink: HexColor::new(0x00, 0x00, 0x00),
            shade: HexColor::new(0xf5, 0xf5, 0xf5),
            totals: HexColor::new(0xe0, 0xe0, 0xe0),
            white: HexColor::new(0xff, 0xff, 0xff),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TitleLayout {
    pub text: String,
    pub x: f64,
    /// Baseline
    pub y: f64,
    pub font_size: f32,
}

impl Default for TitleLayout {
    fn default() -> Self {
        Self {
            text: "SALARY SLIP".to_string(),
            x: 50.0,
            y: 190.0,
            font_size: 18.0,
        }
    }
}

/// Name, designation and period lines at the top right
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct IdentityLayout {
    pub label_x: f64,
    pub value_x: f64,
    /// Baseline of the first line
    pub top: f64,
    pub line_gap: f64,
    pub font_size: f32,
    /// Shown in place of a missing name or designation
    pub placeholder: String,
    /// Distance from the last line's baseline to the top of the ledger
    pub gap_after: f64,
}

impl Default for IdentityLayout {
    fn default() -> Self {
        Self {
            label_x: A4_WIDTH - 280.0,
            value_x: A4_WIDTH - 175.0,
            top: 190.0,
            line_gap: 20.0,
            font_size: 10.0,
            placeholder: "___________________".to_string(),
            gap_after: 35.0,
        }
    }
}

/// Earnings/deductions table geometry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LedgerLayout {
    pub x: f64,
    pub width: f64,
    pub header_height: f64,
    /// Height of data rows and of the totals row
    pub row_height: f64,
    /// Horizontal inset of labels and amounts inside a column
    pub padding: f64,
    /// Header text baseline below the header top
    pub header_baseline: f64,
    /// Row text baseline below the row top
    pub row_baseline: f64,
    pub header_font_size: f32,
    pub row_font_size: f32,
    pub border_width: f64,
    pub gap_after: f64,
    pub earnings_title: String,
    pub deductions_title: String,
    pub total_earnings_label: String,
    pub total_deductions_label: String,
}

impl Default for LedgerLayout {
    fn default() -> Self {
        Self {
            x: 50.0,
            width: A4_WIDTH - 100.0,
            header_height: 25.0,
            row_height: 22.0,
            padding: 10.0,
            header_baseline: 17.0,
            row_baseline: 15.0,
            header_font_size: 10.0,
            row_font_size: 9.0,
            border_width: 1.0,
            gap_after: 15.0,
            earnings_title: "Earnings".to_string(),
            deductions_title: "Deductions".to_string(),
            total_earnings_label: "Total Earnings".to_string(),
            total_deductions_label: "Total Deductions".to_string(),
        }
    }
}

/// Full-width net salary banner below the ledger
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BannerLayout {
    pub height: f64,
    pub padding: f64,
    pub baseline: f64,
    pub font_size: f32,
    pub label: String,
    pub gap_after: f64,
}

impl Default for BannerLayout {
    fn default() -> Self {
        Self {
            height: 30.0,
            padding: 15.0,
            baseline: 20.0,
            font_size: 12.0,
            label: "NET SALARY".to_string(),
            gap_after: 15.0,
        }
    }
}

/// Faint background mark centered on the page
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WatermarkLayout {
    /// Factor applied to the stamp's alpha channel
    pub opacity: f32,
    /// Mark width as a fraction of the ledger width
    pub width_fraction: f64,
    /// Shift right from the page center
    pub offset_x: f64,
    /// Shift up from the page center
    pub offset_y: f64,
}

impl Default for WatermarkLayout {
    fn default() -> Self {
        Self {
            opacity: 0.08,
            width_fraction: 0.6,
            offset_x: 20.0,
            offset_y: 12.0,
        }
    }
}

/// Rotated company seal on a signature line near the footer
///
/// Vertical positions are measured up from the page bottom.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SealLayout {
    pub color: HexColor,
    /// Pixels with mean RGB below this are ink, the rest background
    pub threshold: u8,
    /// Clockwise rotation
    pub rotation_degrees: f64,
    pub height: f64,
    pub line_x: f64,
    pub line_from_bottom: f64,
    pub line_width: f64,
    pub line_thickness: f64,
    pub label: String,
    pub label_offset_x: f64,
    /// Label baseline distance below the line
    pub label_drop: f64,
    pub label_font_size: f32,
    /// Seal image bottom distance below the line
    pub image_drop: f64,
}

impl Default for SealLayout {
    fn default() -> Self {
        Self {
            color: HexColor::new(0x07, 0x36, 0x30),
            threshold: 128,
            rotation_degrees: 40.0,
            height: 90.0,
            line_x: 50.0,
            line_from_bottom: 110.0,
            line_width: 120.0,
            line_thickness: 1.0,
            label: "Company Stamp".to_string(),
            label_offset_x: 15.0,
            label_drop: 12.0,
            label_font_size: 9.0,
            image_drop: 15.0,
        }
    }
}

/// Generation date line
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FooterLayout {
    pub prefix: String,
    /// `chrono` strftime pattern
    pub date_format: String,
    pub x: f64,
    /// Baseline distance above the page bottom
    pub from_bottom: f64,
    pub font_size: f32,
}

impl Default for FooterLayout {
    fn default() -> Self {
        Self {
            prefix: "Generated on: ".to_string(),
            date_format: "%B %d, %Y".to_string(),
            x: 50.0,
            from_bottom: 87.0,
            font_size: 8.0,
        }
    }
}

impl FooterLayout {
    /// Footer text for `date`
    ///
    /// Fails when the pattern does not parse or asks for fields a plain
    /// date does not have, such as `%H`.
    pub fn render_date(&self, date: NaiveDate) -> Result<String> {
        let invalid = || {
            PayslipError::Config(format!(
                "invalid footer date format {:?}",
                self.date_format
            ))
        };
        let items = StrftimeItems::new(&self.date_format);
        if items.clone().any(|item| matches!(item, Item::Error)) {
            return Err(invalid());
        }

        let mut text = self.prefix.clone();
        write!(text, "{}", date.format_with_items(items)).map_err(|_| invalid())?;
        Ok(text)
    }
}

impl Layout {
    /// Reject layouts that cannot be drawn
    pub fn validate(&self) -> Result<()> {
        if !(self.page_width > 0.0 && self.page_height > 0.0) {
            return Err(PayslipError::Config(format!(
                "page size must be positive, got {}x{}",
                self.page_width, self.page_height
            )));
        }
        let sample = NaiveDate::from_ymd_opt(2000, 1, 1).unwrap_or(NaiveDate::MIN);
        self.footer.render_date(sample)?;
        Ok(())
    }

    /// Top of the ledger, below the identity block's three lines
    pub fn ledger_top(&self) -> f64 {
        self.identity.top + 2.0 * self.identity.line_gap + self.identity.gap_after
    }

    /// Convert a distance from the page bottom to a top-origin y
    pub fn from_bottom(&self, distance: f64) -> f64 {
        self.page_height - distance
    }
}
