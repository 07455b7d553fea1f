//! Deterministic output file names
//!
//! The mail step re-derives the attachment name from the same record rather
//! than being handed a path, so this must stay a pure function of its inputs.

use crate::fields::Field;
use crate::record::Record;

/// Characters that are unsafe in file names on common filesystems
const INVALID_CHARS: &[char] = &['<', '>', ':', '"', '/', '\\', '|', '?', '*'];

/// Name used when the record has no usable employee name
const FALLBACK_NAME: &str = "Employee";

/// File name for a record's slip: `<period>_<name>[_<cnic>].pdf`
pub fn derive_filename(record: &Record, period: &str) -> String {
    filename_from_parts(
        Field::EmployeeName.text(record),
        Field::Cnic.text(record),
        period,
    )
}

/// Build a slip file name from its identity parts
///
/// The name keeps alphanumerics, spaces, hyphens and underscores, with
/// spaces turned into underscores. The id keeps alphanumerics, hyphens and
/// underscores and is omitted when empty.
pub fn filename_from_parts(name: Option<&str>, id: Option<&str>, period: &str) -> String {
    let name = name
        .map(|n| {
            n.chars()
                .filter(|c| c.is_alphanumeric() || matches!(c, ' ' | '-' | '_'))
                .collect::<String>()
                .trim()
                .replace(' ', "_")
        })
        .filter(|n| !n.is_empty())
        .unwrap_or_else(|| FALLBACK_NAME.to_string());

    let id: String = id
        .unwrap_or_default()
        .chars()
        .filter(|c| c.is_alphanumeric() || matches!(c, '-' | '_'))
        .collect();

    let period = period.replace(' ', "_");

    let filename = if id.is_empty() {
        format!("{period}_{name}.pdf")
    } else {
        format!("{period}_{name}_{id}.pdf")
    };

    filename.replace(INVALID_CHARS, "_")
}
