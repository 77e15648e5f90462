//! Resolution of input records against the reference index.

use std::fmt;

use serde::Serialize;

use rollcall_table::{RawRecord, Table};

use crate::config::ColumnMapping;
use crate::index::{IndexKey, RecordIndex};
use crate::matcher::names_match;
use crate::normalize::{normalize_email, normalize_name};

/// Which tier resolved an input record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchKind {
    Email,
    Name,
    Fuzzy,
    None,
}

impl fmt::Display for MatchKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Email => write!(f, "email"),
            Self::Name => write!(f, "name"),
            Self::Fuzzy => write!(f, "fuzzy"),
            Self::None => write!(f, "none"),
        }
    }
}

/// Outcome for one input record. Exactly one of these exists per input
/// record; unmatched records are results too, never dropped.
#[derive(Debug, Clone, Serialize)]
pub struct MatchResult {
    pub input: RawRecord,
    pub matched: bool,
    pub kind: MatchKind,
    pub matched_record: Option<RawRecord>,
}

/// Resolve every input record against the reference table.
///
/// Tier order per record: exact email key, exact name key, then a linear
/// scan applying the name matcher against each reference candidate's
/// forward and reversed name. The scan returns the first candidate in
/// reference order, not the best one — that ordering is part of the
/// contract.
pub fn link(
    reference: &Table,
    ref_columns: &ColumnMapping,
    index: &RecordIndex,
    input: &Table,
    input_columns: &ColumnMapping,
) -> Vec<MatchResult> {
    input
        .records
        .iter()
        .map(|record| resolve(reference, ref_columns, index, record, input_columns))
        .collect()
}

fn resolve(
    reference: &Table,
    ref_columns: &ColumnMapping,
    index: &RecordIndex,
    record: &RawRecord,
    input_columns: &ColumnMapping,
) -> MatchResult {
    let hit = |pos: usize, kind: MatchKind| MatchResult {
        input: record.clone(),
        matched: true,
        kind,
        matched_record: Some(reference.records[pos].clone()),
    };

    // Tier 1: exact email key
    if let Some(email_column) = &input_columns.email {
        let email = record.get(email_column).unwrap_or("");
        if !normalize_email(email).is_empty() {
            if let Some(pos) = index.get(&IndexKey::email(email)) {
                return hit(pos, MatchKind::Email);
            }
        }
    }

    let first = record.get(&input_columns.first_name).unwrap_or("");
    let last = record.get(&input_columns.last_name).unwrap_or("");

    // Tier 2: exact name key
    let name_key = IndexKey::name(first, last);
    if !name_key.value.is_empty() {
        if let Some(pos) = index.get(&name_key) {
            return hit(pos, MatchKind::Name);
        }
    }

    // Tier 3: fuzzy scan in reference order, first match wins
    let input_name = normalize_name(&format!("{first} {last}"));
    if !input_name.is_empty() {
        for (pos, candidate) in reference.records.iter().enumerate() {
            let cand_first = candidate.get(&ref_columns.first_name).unwrap_or("");
            let cand_last = candidate.get(&ref_columns.last_name).unwrap_or("");
            let forward = normalize_name(&format!("{cand_first} {cand_last}"));
            let reversed = normalize_name(&format!("{cand_last} {cand_first}"));
            if names_match(&input_name, &forward) || names_match(&input_name, &reversed) {
                return hit(pos, MatchKind::Fuzzy);
            }
        }
    }

    MatchResult {
        input: record.clone(),
        matched: false,
        kind: MatchKind::None,
        matched_record: None,
    }
}

/// Select matched results whose (input record, matched reference record)
/// pair satisfies an injected predicate. Unmatched results are never
/// offered to the predicate.
pub fn filter_matched<'a, F>(results: &'a [MatchResult], predicate: F) -> Vec<&'a MatchResult>
where
    F: Fn(&RawRecord, &RawRecord) -> bool,
{
    results
        .iter()
        .filter(|r| match &r.matched_record {
            Some(matched) => predicate(&r.input, matched),
            None => false,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rollcall_table::parse_table;

    fn mapping() -> ColumnMapping {
        ColumnMapping {
            first_name: "First".into(),
            last_name: "Last".into(),
            email: Some("Email".into()),
        }
    }

    fn link_tables(reference_csv: &str, input_csv: &str) -> Vec<MatchResult> {
        let reference = parse_table(reference_csv).unwrap();
        let input = parse_table(input_csv).unwrap();
        let index = RecordIndex::build(&reference, &mapping());
        link(&reference, &mapping(), &index, &input, &mapping())
    }

    #[test]
    fn email_tier_wins_over_name() {
        // Input email matches row 1 while its name matches row 2.
        let results = link_tables(
            "First,Last,Email\nAnn,Lee,a@x.com\nBea,Okoro,b@x.com\n",
            "First,Last,Email\nBea,Okoro,a@x.com\n",
        );
        assert_eq!(results.len(), 1);
        assert!(results[0].matched);
        assert_eq!(results[0].kind, MatchKind::Email);
        assert_eq!(
            results[0].matched_record.as_ref().unwrap().get("First"),
            Some("Ann")
        );
    }

    #[test]
    fn email_lookup_is_case_insensitive() {
        let results = link_tables(
            "First,Last,Email\nAnn,Lee,a@x.com\n",
            "First,Last,Email\nann,lee,A@X.COM\n",
        );
        assert_eq!(results[0].kind, MatchKind::Email);
    }

    #[test]
    fn name_tier_on_email_miss() {
        let results = link_tables(
            "First,Last,Email\nAnn,Lee,a@x.com\n",
            "First,Last,Email\nANN, lee ,unknown@x.com\n",
        );
        assert_eq!(results[0].kind, MatchKind::Name);
    }

    #[test]
    fn fuzzy_tier_reversed_name() {
        let results = link_tables(
            "First,Last,Email\nAnn Marie,Lee,\n",
            "First,Last,Email\nLee,Ann Marie,\n",
        );
        assert_eq!(results[0].kind, MatchKind::Fuzzy);
    }

    #[test]
    fn fuzzy_returns_first_reference_candidate() {
        // Both reference rows satisfy the matcher; the earlier row wins.
        let results = link_tables(
            "First,Last,Email\nJohn Michael,Doe,\nJohn,Doe Senior,\n",
            "First,Last,Email\nJohn M,Doe,\n",
        );
        assert_eq!(results[0].kind, MatchKind::Fuzzy);
        assert_eq!(
            results[0].matched_record.as_ref().unwrap().get("First"),
            Some("John Michael")
        );
    }

    #[test]
    fn unmatched_is_a_result_too() {
        let results = link_tables(
            "First,Last,Email\nAnn,Lee,a@x.com\n",
            "First,Last,Email\nZoe,Quist,z@x.com\nAnn,Lee,a@x.com\n",
        );
        assert_eq!(results.len(), 2);
        assert!(!results[0].matched);
        assert_eq!(results[0].kind, MatchKind::None);
        assert!(results[0].matched_record.is_none());
        assert!(results[1].matched);
    }

    #[test]
    fn filter_applies_only_to_matched() {
        let results = link_tables(
            "First,Last,Email,Camping\nAnn,Lee,a@x.com,Yes\nBea,Okoro,b@x.com,No\n",
            "First,Last,Email\nAnn,Lee,a@x.com\nBea,Okoro,b@x.com\nZoe,Quist,\n",
        );
        let camping = filter_matched(&results, |_, matched| {
            matched.get("Camping") == Some("Yes")
        });
        assert_eq!(camping.len(), 1);
        assert_eq!(camping[0].input.get("First"), Some("Ann"));
    }
}
