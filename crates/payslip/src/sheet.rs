//! Spreadsheet rows to records
//!
//! A payroll sheet reserves its first two rows for the company and app
//! names (first cell of each), uses row 3 as the header row, and holds one
//! employee per row from row 4 on.

use crate::record::Record;
use serde::{Deserialize, Serialize};

/// Organization details read from the sheet's reserved rows
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompanyInfo {
    pub company_name: String,
    pub app_name: String,
}

/// Records and company details of one period's sheet
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SheetData {
    pub company: CompanyInfo,
    pub records: Vec<Record>,
}

const HEADER_ROW: usize = 2;

impl SheetData {
    /// Split raw sheet rows into company details and records
    ///
    /// Short rows are padded with blanks, columns with a blank header are
    /// dropped and rows with no non-blank cell are skipped. A sheet with
    /// fewer than four rows has no records.
    pub fn from_rows(rows: &[Vec<String>]) -> Self {
        let first_cell = |index: usize| {
            rows.get(index)
                .and_then(|row| row.first())
                .map(|cell| cell.trim().to_string())
                .unwrap_or_default()
        };
        let company = CompanyInfo {
            company_name: first_cell(0),
            app_name: first_cell(1),
        };

        let Some(headers) = rows.get(HEADER_ROW) else {
            return Self {
                company,
                records: Vec::new(),
            };
        };

        let records = rows
            .iter()
            .skip(HEADER_ROW + 1)
            .filter_map(|row| {
                let record: Record = headers
                    .iter()
                    .enumerate()
                    .filter(|(_, header)| !header.trim().is_empty())
                    .map(|(i, header)| {
                        let cell = row.get(i).map(String::as_str).unwrap_or("");
                        (header.as_str(), cell)
                    })
                    .collect();
                let has_values = record.iter().any(|(_, value)| !value.trim().is_empty());
                has_values.then_some(record)
            })
            .collect();

        Self { company, records }
    }
}
