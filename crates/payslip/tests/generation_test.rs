//! End-to-end slip generation against fixture assets on disk

use chrono::NaiveDate;
use image::{Rgba, RgbaImage};
use lopdf::{dictionary, Document, Object, Stream};
use payslip::{
    compose, Amount, GeneratorConfig, Layout, PayslipError, Record, SheetData, SlipGenerator,
    StampError,
};
use pretty_assertions::assert_eq;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

const PERIOD: &str = "March 2025";

/// Write a one-page A4 letterhead PDF
fn write_template(dir: &Path) -> PathBuf {
    let mut doc = Document::with_version("1.5");
    let font_id = doc.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => "Times-Bold",
    });
    let contents_id = doc.add_object(Stream::new(
        dictionary! {},
        b"BT /TB 20 Tf 50 780 Td (TECH EMULSION) Tj ET".to_vec(),
    ));
    let pages_id = doc.new_object_id();
    let page_id = doc.add_object(dictionary! {
        "Type" => "Page",
        "Parent" => pages_id,
        "MediaBox" => vec![0.into(), 0.into(), 595.28.into(), 841.89.into()],
        "Resources" => dictionary! { "Font" => dictionary! { "TB" => font_id } },
        "Contents" => contents_id,
    });
    doc.objects.insert(
        pages_id,
        Object::Dictionary(dictionary! {
            "Type" => "Pages",
            "Kids" => vec![page_id.into()],
            "Count" => 1,
        }),
    );
    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    doc.trailer.set("Root", catalog_id);

    let path = dir.join("letterhead.pdf");
    doc.save(&path).unwrap();
    path
}

/// Write a round dark stamp on a white background
fn write_stamp(dir: &Path) -> PathBuf {
    let image = RgbaImage::from_fn(64, 64, |x, y| {
        let (dx, dy) = (x as i32 - 32, y as i32 - 32);
        if dx * dx + dy * dy < 28 * 28 {
            Rgba([30, 30, 30, 255])
        } else {
            Rgba([250, 250, 250, 255])
        }
    });
    let path = dir.join("stamp.png");
    image.save(&path).unwrap();
    path
}

struct Fixture {
    dir: TempDir,
    config: GeneratorConfig,
}

impl Fixture {
    fn new() -> Self {
        let dir = tempfile::tempdir().unwrap();
        let mut config = GeneratorConfig::new(write_template(dir.path()));
        config.stamp_path = Some(write_stamp(dir.path()));
        config.output_dir = dir.path().join("pdfs");
        Self { dir, config }
    }

    fn generator(&self) -> SlipGenerator {
        SlipGenerator::new(self.config.clone())
            .with_generation_date(NaiveDate::from_ymd_opt(2025, 4, 1).unwrap())
    }

    fn output_files(&self) -> Vec<String> {
        let mut names: Vec<String> = match fs::read_dir(&self.config.output_dir) {
            Ok(entries) => entries
                .map(|e| e.unwrap().file_name().to_string_lossy().to_string())
                .collect(),
            Err(_) => Vec::new(),
        };
        names.sort();
        names
    }
}

fn record(pairs: &[(&str, &str)]) -> Record {
    pairs.iter().copied().collect()
}

/// Decompressed content of every non-image stream in the document
fn all_text(doc: &Document) -> String {
    let mut text = String::new();
    for stream in doc.objects.values().filter_map(|o| o.as_stream().ok()) {
        if is_image(stream) {
            continue;
        }
        let bytes = stream
            .decompressed_content()
            .unwrap_or_else(|_| stream.content.clone());
        text.push_str(&String::from_utf8_lossy(&bytes));
        text.push('\n');
    }
    text
}

fn is_image(stream: &Stream) -> bool {
    stream.dict.get(b"Subtype").and_then(Object::as_name).ok() == Some(b"Image".as_slice())
}

fn image_count(doc: &Document) -> usize {
    doc.objects
        .values()
        .filter_map(|o| o.as_stream().ok())
        .filter(|s| is_image(s))
        .count()
}

#[test]
fn scenario_a_single_earning() {
    let fixture = Fixture::new();
    let r = record(&[
        ("Name", "Ali Raza"),
        ("Basic Salary", "50,000"),
        ("Net Salary", "58,000"),
    ]);

    let slip = fixture.generator().generate(&r, PERIOD).unwrap();

    assert_eq!(
        slip.path,
        fixture.config.output_dir.join("March_2025_Ali_Raza.pdf")
    );
    assert_eq!(slip.net_salary, Amount::from_cents(5_800_000));
    assert!(slip.stamp_error.is_none());

    let doc = Document::load(&slip.path).unwrap();
    assert_eq!(doc.get_pages().len(), 1);

    let text = all_text(&doc);
    assert!(text.contains("(TECH EMULSION) Tj"));
    assert!(text.contains("(Basic Salary) Tj"));
    assert!(text.contains("(50,000.00) Tj"));
    assert!(text.contains("(58,000.00) Tj"));
    assert!(text.contains("(Total Deductions) Tj"));
    assert!(text.contains("(Generated on: April 01, 2025) Tj"));

    let composed = compose(
        &r,
        PERIOD,
        NaiveDate::from_ymd_opt(2025, 4, 1).unwrap(),
        None,
        &Layout::default(),
    )
    .unwrap();
    assert_eq!(composed.ledger.earnings.len(), 1);
    assert!(composed.ledger.deductions.is_empty());
    assert_eq!(composed.ledger.row_count(), 1);
}

#[test]
fn scenario_b_amount_paid_wins() {
    let fixture = Fixture::new();
    let r = record(&[
        ("Name", "Sara Khan"),
        ("Amout Paid", "60000"),
        ("Net Salary", "58000"),
    ]);

    let slip = fixture.generator().generate(&r, PERIOD).unwrap();
    assert_eq!(slip.net_salary, Amount::from_cents(6_000_000));

    let text = all_text(&Document::load(&slip.path).unwrap());
    assert!(text.contains("(60,000.00) Tj"));
    assert!(!text.contains("(58,000.00) Tj"));
    assert!(!text.contains("(118,000.00) Tj"));
}

#[test]
fn scenario_c_zero_earning_suppressed() {
    let fixture = Fixture::new();
    let r = record(&[("Name", "Omar"), ("Basic Salary", "0")]);

    let slip = fixture.generator().generate(&r, PERIOD).unwrap();
    let text = all_text(&Document::load(&slip.path).unwrap());

    assert!(!text.contains("(Basic Salary) Tj"));
    assert!(!text.contains("(0.00) Tj"));
    // Both totals and the banner render as a dash
    assert_eq!(text.matches("(-) Tj").count(), 3);
}

#[test]
fn scenario_d_missing_stamp_still_generates() {
    let mut fixture = Fixture::new();
    fixture.config.stamp_path = Some(fixture.dir.path().join("no-such-stamp.png"));
    let r = record(&[("Name", "Ali Raza"), ("Net Salary", "58,000")]);

    let slip = fixture.generator().generate(&r, PERIOD).unwrap();

    assert!(matches!(slip.stamp_error, Some(StampError::Unreadable { .. })));
    let doc = Document::load(&slip.path).unwrap();
    assert_eq!(image_count(&doc), 0);
    assert!(!all_text(&doc).contains("(Company Stamp) Tj"));
}

#[test]
fn scenario_e_missing_template_fails() {
    let mut fixture = Fixture::new();
    fixture.config.template_path = fixture.dir.path().join("no-such-letterhead.pdf");
    let r = record(&[("Name", "Ali Raza")]);

    let result = fixture.generator().generate(&r, PERIOD);

    match result {
        Err(PayslipError::TemplateMissing { path, .. }) => {
            assert_eq!(path, fixture.config.template_path);
        }
        other => panic!("expected TemplateMissing, got {other:?}"),
    }
    assert!(fixture.output_files().is_empty());
}

#[test]
fn stamped_slip_has_watermark_and_seal() {
    let fixture = Fixture::new();
    let r = record(&[("Name", "Ali Raza"), ("Net Salary", "58,000")]);

    let slip = fixture.generator().generate(&r, PERIOD).unwrap();
    let doc = Document::load(&slip.path).unwrap();

    // Watermark and seal, each with its soft mask
    assert_eq!(image_count(&doc), 4);
    assert!(all_text(&doc).contains("(Company Stamp) Tj"));
}

#[test]
fn regeneration_is_byte_identical() {
    let fixture = Fixture::new();
    let r = record(&[("Name", "Ali Raza"), ("CNIC", "35202-1"), ("Basic Salary", "50000")]);
    let generator = fixture.generator();

    let first = generator.generate(&r, PERIOD).unwrap();
    let first_bytes = fs::read(&first.path).unwrap();
    let second = generator.generate(&r, PERIOD).unwrap();

    assert_eq!(first.path, second.path);
    assert_eq!(fs::read(&second.path).unwrap(), first_bytes);
    assert_eq!(fixture.output_files(), vec!["March_2025_Ali_Raza_35202-1.pdf"]);
}

#[test]
fn batch_continues_after_failure() {
    let fixture = Fixture::new();
    let good = record(&[("Name", "Ali Raza")]);
    let blocked = record(&[("Name", "Blocked")]);
    let also_good = record(&[("Name", "Sara Khan")]);

    // A directory squatting on the output name makes the final rename fail
    fs::create_dir_all(fixture.config.output_dir.join("March_2025_Blocked.pdf")).unwrap();

    let report = fixture
        .generator()
        .generate_batch(&[good, blocked, also_good], PERIOD);

    assert_eq!(report.generated.len(), 2);
    assert_eq!(report.failed.len(), 1);
    assert_eq!(report.failed[0].0, 1);
    assert!(matches!(report.failed[0].1, PayslipError::Output { .. }));
    assert!(!report.is_success());

    // No temp files are left behind
    assert_eq!(
        fixture.output_files(),
        vec![
            "March_2025_Ali_Raza.pdf",
            "March_2025_Blocked.pdf",
            "March_2025_Sara_Khan.pdf",
        ]
    );
}

#[test]
fn sheet_rows_to_slips() {
    let fixture = Fixture::new();
    let rows: Vec<Vec<String>> = [
        vec!["TECH EMULSION"],
        vec!["Payroll"],
        vec!["Name", "Designation", "Basic Salary", "Net Salary"],
        vec!["Ali Raza", "Engineer", "50,000", "58,000"],
        vec!["", "", "", ""],
        vec!["Sara Khan", "Designer", "45,000", "45,000"],
    ]
    .into_iter()
    .map(|row| row.into_iter().map(String::from).collect())
    .collect();

    let sheet = SheetData::from_rows(&rows);
    let report = fixture.generator().generate_batch(&sheet.records, PERIOD);

    assert!(report.is_success());
    assert_eq!(
        fixture.output_files(),
        vec!["March_2025_Ali_Raza.pdf", "March_2025_Sara_Khan.pdf"]
    );
}
