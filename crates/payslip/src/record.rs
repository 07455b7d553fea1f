//! Raw payroll records and tolerant key lookup

use serde::{Deserialize, Serialize};

/// One employee's row for one period: column header to cell text
///
/// Keys keep the order the data source supplied them in. Inserting an
/// existing key replaces its value in place, so duplicate headers resolve
/// to the last value written.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Vec<(String, String)>", into = "Vec<(String, String)>")]
pub struct Record {
    entries: Vec<(String, String)>,
}

impl Record {
    /// Create an empty record
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a cell, replacing any existing value under the same key
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) {
        let key = key.into();
        let value = value.into();
        match self.entries.iter_mut().find(|(k, _)| *k == key) {
            Some(entry) => entry.1 = value,
            None => self.entries.push((key, value)),
        }
    }

    /// Value stored under exactly `key`
    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    /// Iterate over (key, value) pairs in source order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Value whose trimmed, lower-cased key equals `folded`; later keys win
    fn get_folded(&self, folded: &str) -> Option<&str> {
        self.entries
            .iter()
            .rev()
            .find(|(k, _)| k.trim().to_lowercase() == folded)
            .map(|(_, v)| v.as_str())
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for Record {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut record = Record::new();
        for (key, value) in iter {
            record.insert(key, value);
        }
        record
    }
}

impl From<Vec<(String, String)>> for Record {
    fn from(entries: Vec<(String, String)>) -> Self {
        entries.into_iter().collect()
    }
}

impl From<Record> for Vec<(String, String)> {
    fn from(record: Record) -> Self {
        record.entries
    }
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

/// Resolve the first non-blank value among accepted key spellings
///
/// Each spelling is tried in order: first as an exact key, then against the
/// record's keys trimmed and lower-cased. Whitespace-only values count as
/// blank. The returned value is trimmed.
pub fn resolve<'a>(record: &'a Record, spellings: &[&str]) -> Option<&'a str> {
    spellings.iter().find_map(|spelling| {
        non_blank(record.get(spelling))
            .or_else(|| non_blank(record.get_folded(&spelling.trim().to_lowercase())))
    })
}
