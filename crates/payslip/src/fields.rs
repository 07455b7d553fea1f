//! Canonical payroll fields and the column spellings accepted for each
//!
//! Spellings are matched exactly first and case-insensitively second (see
//! [`crate::resolve`]), so only genuinely different wordings need listing.

use crate::amount::{parse_amount, Amount};
use crate::record::{resolve, Record};

/// A canonical concept read from a record
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Field {
    EmployeeName,
    Designation,
    Cnic,
    NetSalary,
    AmountPaid,
    Email,
}

impl Field {
    /// Accepted column spellings, in priority order
    pub fn spellings(&self) -> &'static [&'static str] {
        match self {
            Field::EmployeeName => &["Name", "Employee Name"],
            Field::Designation => &["Designation"],
            Field::Cnic => &["CNIC"],
            Field::NetSalary => &["Net Salary"],
            // "Amout" is how the payroll sheet spells it
            Field::AmountPaid => &["Amout Paid", "Amount Paid"],
            Field::Email => &["Email Address", "Email", "E-mail"],
        }
    }

    /// Resolved text, `None` when absent or blank
    pub fn text<'a>(&self, record: &'a Record) -> Option<&'a str> {
        resolve(record, self.spellings())
    }

    /// Resolved amount, zero when absent or malformed
    pub fn amount(&self, record: &Record) -> Amount {
        self.text(record).map(parse_amount).unwrap_or(Amount::ZERO)
    }
}

/// A ledger line concept: accepted spellings and the label shown on the slip
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LedgerConcept {
    pub spellings: &'static [&'static str],
    pub label: &'static str,
}

impl LedgerConcept {
    const fn new(spellings: &'static [&'static str], label: &'static str) -> Self {
        Self { spellings, label }
    }

    /// Resolved amount, zero when absent or malformed
    pub fn amount(&self, record: &Record) -> Amount {
        resolve(record, self.spellings)
            .map(parse_amount)
            .unwrap_or(Amount::ZERO)
    }
}

/// Earnings concepts in display order
pub const EARNINGS: &[LedgerConcept] = &[
    LedgerConcept::new(&["Basic Salary"], "Basic Salary"),
    LedgerConcept::new(&["Food Allowance"], "Food Allowance"),
    LedgerConcept::new(&["Travel Allowance"], "Travel Allowance"),
    LedgerConcept::new(&["Medical Allowance"], "Medical Allowance"),
    LedgerConcept::new(&["Other (subscriptions)"], "Subscriptions"),
    LedgerConcept::new(&["Other (Overtime)"], "Overtime"),
    LedgerConcept::new(&["Other (Leave Encashment)"], "Leave Encashment"),
    LedgerConcept::new(&["Other (Commision)", "Commission"], "Commission"),
    LedgerConcept::new(&["Others"], "Others"),
];

/// Deduction concepts in display order
pub const DEDUCTIONS: &[LedgerConcept] = &[
    LedgerConcept::new(&["Tax Deductable", "Tax Deduction"], "Tax Deduction"),
    LedgerConcept::new(&["Other (Extra Leaves)"], "Extra Leaves"),
];

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_field_text() {
        let record: Record = [("employee name", "Sara Khan")].into_iter().collect();
        assert_eq!(Field::EmployeeName.text(&record), Some("Sara Khan"));
        assert_eq!(Field::Designation.text(&record), None);
    }

    #[test]
    fn test_amount_paid_misspelling() {
        let record: Record = [("Amout Paid", "60000")].into_iter().collect();
        assert_eq!(Field::AmountPaid.amount(&record), Amount::from_cents(6_000_000));
    }

    #[test]
    fn test_missing_amount_is_zero() {
        assert_eq!(Field::NetSalary.amount(&Record::new()), Amount::ZERO);
    }

    #[test]
    fn test_commission_alternate_spelling() {
        let record: Record = [("commission", "1,500")].into_iter().collect();
        let concept = EARNINGS.iter().find(|c| c.label == "Commission").unwrap();
        assert_eq!(concept.amount(&record), Amount::from_cents(150_000));
    }

    #[test]
    fn test_labels_are_unique() {
        let mut labels: Vec<_> = EARNINGS.iter().chain(DEDUCTIONS).map(|c| c.label).collect();
        let count = labels.len();
        labels.sort_unstable();
        labels.dedup();
        assert_eq!(labels.len(), count);
    }
}
