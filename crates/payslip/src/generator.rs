//! Slip generation: assets in, one merged PDF per record out

use crate::amount::Amount;
use crate::composer::compose;
use crate::filename::derive_filename;
use crate::layout::Layout;
use crate::record::Record;
use crate::stamp::StampAsset;
use crate::{PayslipError, Result, StampError};
use chrono::{Local, NaiveDate};
use log::{debug, info, warn};
use lopdf::Document;
use pdf_core::{document_bytes, overlay_page, PdfError};
use serde::{Deserialize, Serialize};
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

/// Where assets live and where slips are written
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeneratorConfig {
    /// Single-page letterhead PDF drawn beneath every slip
    pub template_path: PathBuf,

    /// Stamp bitmap for the watermark and seal; slips are unstamped without it
    #[serde(default)]
    pub stamp_path: Option<PathBuf>,

    #[serde(default = "default_output_dir")]
    pub output_dir: PathBuf,

    #[serde(default)]
    pub layout: Layout,
}

fn default_output_dir() -> PathBuf {
    PathBuf::from("pdfs")
}

impl GeneratorConfig {
    pub fn new(template_path: impl Into<PathBuf>) -> Self {
        Self {
            template_path: template_path.into(),
            stamp_path: None,
            output_dir: default_output_dir(),
            layout: Layout::default(),
        }
    }

    /// Parse a configuration from JSON
    pub fn from_json(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.layout.validate()?;
        Ok(config)
    }

    /// Read a JSON configuration file
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let json = fs::read_to_string(path).map_err(|e| {
            PayslipError::Config(format!("cannot read {}: {e}", path.display()))
        })?;
        Self::from_json(&json)
    }
}

/// Outcome of one successful generation
#[derive(Debug)]
pub struct GeneratedSlip {
    pub path: PathBuf,
    pub net_salary: Amount,
    /// Why the slip was generated without its stamp, if it was
    pub stamp_error: Option<StampError>,
}

/// Outcome of a batch; failures keep the record's index
#[derive(Debug, Default)]
pub struct BatchReport {
    pub generated: Vec<GeneratedSlip>,
    pub failed: Vec<(usize, PayslipError)>,
}

impl BatchReport {
    pub fn is_success(&self) -> bool {
        self.failed.is_empty()
    }
}

/// Generates slips for one configuration
#[derive(Debug, Clone)]
pub struct SlipGenerator {
    config: GeneratorConfig,
    generation_date: Option<NaiveDate>,
}

impl SlipGenerator {
    pub fn new(config: GeneratorConfig) -> Self {
        Self {
            config,
            generation_date: None,
        }
    }

    /// Fix the footer date instead of using today's local date
    pub fn with_generation_date(mut self, date: NaiveDate) -> Self {
        self.generation_date = Some(date);
        self
    }

    pub fn config(&self) -> &GeneratorConfig {
        &self.config
    }

    /// Where the slip for `record` is (or will be) written
    pub fn output_path(&self, record: &Record, period: &str) -> PathBuf {
        self.config.output_dir.join(derive_filename(record, period))
    }

    /// Generate and write the slip for one record
    ///
    /// A missing or unreadable stamp only drops the watermark and seal; the
    /// reason is returned in [`GeneratedSlip::stamp_error`].
    ///
    /// # Errors
    /// [`PayslipError::TemplateMissing`] when the template cannot be read
    /// (nothing is written), [`PayslipError::Output`] when the slip cannot be
    /// written. A failed write never leaves a partial file behind.
    pub fn generate(&self, record: &Record, period: &str) -> Result<GeneratedSlip> {
        let mut template = self.load_template()?;

        let (stamp, stamp_error) = match self.load_stamp() {
            Some(Ok(stamp)) => (Some(stamp), None),
            Some(Err(err)) => {
                warn!("Generating without stamp: {err}");
                (None, Some(err))
            }
            None => (None, None),
        };

        let date = self
            .generation_date
            .unwrap_or_else(|| Local::now().date_naive());
        let slip = compose(record, period, date, stamp.as_ref(), &self.config.layout)?;
        overlay_page(&mut template, &slip.document)?;

        let path = self.output_path(record, period);
        write_atomically(&mut template, &self.config.output_dir, &path)?;
        debug!("Wrote {}", path.display());

        Ok(GeneratedSlip {
            path,
            net_salary: slip.net_salary,
            stamp_error,
        })
    }

    /// Generate every record in order, collecting failures instead of stopping
    pub fn generate_batch(&self, records: &[Record], period: &str) -> BatchReport {
        let mut report = BatchReport::default();

        for (index, record) in records.iter().enumerate() {
            match self.generate(record, period) {
                Ok(slip) => report.generated.push(slip),
                Err(err) => {
                    warn!("Record {} failed: {err}", index + 1);
                    report.failed.push((index, err));
                }
            }
        }

        info!(
            "Generated {} of {} slips for {period}",
            report.generated.len(),
            records.len()
        );
        report
    }

    fn load_template(&self) -> Result<Document> {
        let path = &self.config.template_path;
        let bytes = fs::read(path).map_err(|source| PayslipError::TemplateMissing {
            path: path.clone(),
            source,
        })?;
        Document::load_mem(&bytes)
            .map_err(|e| PdfError::Open(format!("{}: {e}", path.display())).into())
    }

    fn load_stamp(&self) -> Option<std::result::Result<StampAsset, StampError>> {
        self.config.stamp_path.as_ref().map(StampAsset::load)
    }
}

/// Save `doc` to `path` through a temp file in `dir`
fn write_atomically(doc: &mut Document, dir: &Path, path: &Path) -> Result<()> {
    let output_error = |source: std::io::Error| PayslipError::Output {
        path: path.to_path_buf(),
        source,
    };

    let bytes = document_bytes(doc)?;

    fs::create_dir_all(dir).map_err(output_error)?;
    let mut file = tempfile::NamedTempFile::new_in(dir).map_err(output_error)?;
    file.write_all(&bytes).map_err(output_error)?;
    file.persist(path).map_err(|e| output_error(e.error))?;

    Ok(())
}
