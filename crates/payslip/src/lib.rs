//! Payslip - salary statement generation
//!
//! This crate provides:
//! - Tolerant field resolution over loosely named spreadsheet columns
//! - Currency parsing and formatting
//! - The two-column earnings/deductions ledger and its geometry
//! - Watermark and seal compositing from a stamp bitmap
//! - Page composition and overlay onto a letterhead template
//! - Deterministic output file names
//! - Mail envelope preparation for a pluggable transport
//!
//! # Example
//!
//! ```ignore
//! use payslip::{GeneratorConfig, SheetData, SlipGenerator};
//!
//! let config = GeneratorConfig::from_json_file("payslip.json")?;
//! let sheet = SheetData::from_rows(rows);
//! let generator = SlipGenerator::new(config);
//! let report = generator.generate_batch(&sheet.records, "March 2025");
//! ```

pub mod amount;
mod composer;
pub mod fields;
mod filename;
mod generator;
mod layout;
pub mod ledger;
mod mail;
mod record;
mod sheet;
pub mod stamp;

pub use amount::{format_amount, parse_amount, Amount};
pub use composer::{compose, ComposedSlip};
pub use fields::Field;
pub use filename::{derive_filename, filename_from_parts};
pub use generator::{BatchReport, GeneratedSlip, GeneratorConfig, SlipGenerator};
pub use layout::{
    BannerLayout, FooterLayout, HexColor, IdentityLayout, Layout, LedgerLayout, Palette,
    SealLayout, TitleLayout, WatermarkLayout,
};
pub use ledger::{net_salary_figure, Column, Ledger, LedgerSection, LineItem, TableLayout};
pub use mail::{dispatch, prepare_envelope, DispatchReport, EnvelopeError, MailEnvelope, MailSink};
pub use record::{resolve, Record};
pub use sheet::{CompanyInfo, SheetData};
pub use stamp::{StampAsset, StampOverlay};

use std::path::PathBuf;
use thiserror::Error;

/// Errors that abort a generation call
#[derive(Debug, Error)]
pub enum PayslipError {
    #[error("Template not readable at {path}: {source}")]
    TemplateMissing {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to write output {path}: {source}")]
    Output {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("PDF error: {0}")]
    Pdf(#[from] pdf_core::PdfError),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Stamp problems that only skip the watermark and seal
#[derive(Debug, Error)]
pub enum StampError {
    #[error("Stamp image unreadable at {path}: {reason}")]
    Unreadable { path: PathBuf, reason: String },

    #[error("Stamp image at {path} has no pixels")]
    Empty { path: PathBuf },
}

/// Result type for payslip operations
pub type Result<T> = std::result::Result<T, PayslipError>;
