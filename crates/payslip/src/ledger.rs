//! Earnings/deductions ledger and its table geometry

use crate::amount::Amount;
use crate::fields::{Field, LedgerConcept, DEDUCTIONS, EARNINGS};
use crate::layout::LedgerLayout;
use crate::record::Record;

/// One named, strictly positive figure shown in the ledger
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LineItem {
    pub label: String,
    pub amount: Amount,
}

/// Ordered line items and their total
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LedgerSection {
    pub items: Vec<LineItem>,
    pub total: Amount,
}

impl LedgerSection {
    /// Collect the positive amounts among `concepts`, in declaration order
    pub fn from_concepts(record: &Record, concepts: &[LedgerConcept]) -> Self {
        let items: Vec<LineItem> = concepts
            .iter()
            .filter_map(|concept| {
                let amount = concept.amount(record);
                amount.is_positive().then(|| LineItem {
                    label: concept.label.to_string(),
                    amount,
                })
            })
            .collect();
        let total = items.iter().map(|item| item.amount).sum();

        Self { items, total }
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

/// The two sections of a slip
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Ledger {
    pub earnings: LedgerSection,
    pub deductions: LedgerSection,
}

impl Ledger {
    pub fn from_record(record: &Record) -> Self {
        Self {
            earnings: LedgerSection::from_concepts(record, EARNINGS),
            deductions: LedgerSection::from_concepts(record, DEDUCTIONS),
        }
    }

    /// Data rows in the table: the longer section, at least one
    ///
    /// The shorter section leaves its extra rows blank.
    pub fn row_count(&self) -> usize {
        self.earnings.len().max(self.deductions.len()).max(1)
    }
}

/// Amount paid when positive, otherwise the net salary
pub fn net_salary_figure(record: &Record) -> Amount {
    let amount_paid = Field::AmountPaid.amount(record);
    if amount_paid.is_positive() {
        amount_paid
    } else {
        Field::NetSalary.amount(record)
    }
}

/// Which side of the table
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Column {
    Earnings,
    Deductions,
}

/// Resolved table geometry in top-origin points
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TableLayout {
    pub x: f64,
    pub top: f64,
    pub width: f64,
    pub rows: usize,
    pub header_height: f64,
    pub row_height: f64,
}

impl TableLayout {
    pub fn new(layout: &LedgerLayout, top: f64, rows: usize) -> Self {
        Self {
            x: layout.x,
            top,
            width: layout.width,
            rows: rows.max(1),
            header_height: layout.header_height,
            row_height: layout.row_height,
        }
    }

    /// Each section gets exactly half the table
    pub fn column_width(&self) -> f64 {
        self.width / 2.0
    }

    pub fn column_x(&self, column: Column) -> f64 {
        match column {
            Column::Earnings => self.x,
            Column::Deductions => self.x + self.column_width(),
        }
    }

    /// Header, data rows and the totals row
    pub fn height(&self) -> f64 {
        self.header_height + self.rows as f64 * self.row_height + self.row_height
    }

    pub fn bottom(&self) -> f64 {
        self.top + self.height()
    }

    /// Top edge of data row `index`
    pub fn row_top(&self, index: usize) -> f64 {
        self.top + self.header_height + index as f64 * self.row_height
    }

    pub fn totals_top(&self) -> f64 {
        self.row_top(self.rows)
    }

    /// Even rows are shaded
    pub fn is_shaded(index: usize) -> bool {
        index % 2 == 0
    }
}
