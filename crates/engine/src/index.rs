//! Namespaced lookup index over a reference table.

use std::collections::HashMap;
use std::fmt;

use serde::Serialize;

use rollcall_table::Table;

use crate::config::ColumnMapping;
use crate::normalize::{normalize_email, normalize_name};

/// Derivation domain of an index key. Tagging the key with its domain keeps
/// an email-derived key from ever colliding with a name-derived key that
/// happens to share raw text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum KeyDomain {
    Email,
    Name,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct IndexKey {
    pub domain: KeyDomain,
    pub value: String,
}

impl IndexKey {
    pub fn email(raw: &str) -> Self {
        Self {
            domain: KeyDomain::Email,
            value: normalize_email(raw),
        }
    }

    pub fn name(first: &str, last: &str) -> Self {
        Self {
            domain: KeyDomain::Name,
            value: normalize_name(&format!("{first} {last}")),
        }
    }
}

impl fmt::Display for IndexKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.domain {
            KeyDomain::Email => write!(f, "email:{}", self.value),
            KeyDomain::Name => write!(f, "name:{}", self.value),
        }
    }
}

/// Build statistics surfaced in the run report.
#[derive(Debug, Clone, Default, Serialize)]
pub struct IndexStats {
    pub indexed_rows: usize,
    pub skipped_rows: usize,
    /// Keys inserted more than once. The later row shadowed the earlier one.
    pub collisions: Vec<IndexKey>,
}

/// Key → position in the reference table.
///
/// Insertion is last-write-wins: a duplicate reference row silently shadows
/// the earlier one under the same key. That is a documented limitation of
/// the source data contract, so collisions are counted and reported, never
/// rejected or deduplicated.
pub struct RecordIndex {
    entries: HashMap<IndexKey, usize>,
    pub stats: IndexStats,
}

impl RecordIndex {
    /// Index a reference table. Rows whose first or last name normalizes to
    /// empty are skipped; rows with a non-blank email get an email key too.
    pub fn build(reference: &Table, columns: &ColumnMapping) -> Self {
        let mut index = Self {
            entries: HashMap::new(),
            stats: IndexStats::default(),
        };

        for (pos, record) in reference.records.iter().enumerate() {
            let first = record.get(&columns.first_name).unwrap_or("");
            let last = record.get(&columns.last_name).unwrap_or("");
            if normalize_name(first).is_empty() || normalize_name(last).is_empty() {
                index.stats.skipped_rows += 1;
                continue;
            }

            index.insert(IndexKey::name(first, last), pos);

            if let Some(email_column) = &columns.email {
                let email = record.get(email_column).unwrap_or("");
                if !normalize_email(email).is_empty() {
                    index.insert(IndexKey::email(email), pos);
                }
            }

            index.stats.indexed_rows += 1;
        }

        index
    }

    fn insert(&mut self, key: IndexKey, pos: usize) {
        if self.entries.insert(key.clone(), pos).is_some() {
            self.stats.collisions.push(key);
        }
    }

    /// Exact lookup. Returns the reference table position.
    pub fn get(&self, key: &IndexKey) -> Option<usize> {
        self.entries.get(key).copied()
    }
}
