//! First-seen-wins deduplication into named partitions.

use std::collections::HashSet;

use serde::Serialize;

use rollcall_table::RawRecord;

/// One dropped duplicate: the 1-based source row number (header = row 1)
/// and a human-readable label for the report.
#[derive(Debug, Clone, Serialize)]
pub struct DuplicateEntry {
    pub source_row: usize,
    pub label: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct Partition {
    pub name: String,
    pub records: Vec<RawRecord>,
    pub duplicates: Vec<DuplicateEntry>,
}

impl Partition {
    fn new(name: String) -> Self {
        Self {
            name,
            records: Vec::new(),
            duplicates: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct PartitionOutput {
    pub partitions: Vec<Partition>,
    /// Records excluded entirely (blank dedup key). Not duplicates.
    pub skipped: usize,
}

/// Classify and deduplicate a record stream into mutually exclusive
/// partitions, preserving original record order within each partition.
///
/// `classify` names the target partition; `dedup_key` derives the
/// within-partition identity, or `None` to exclude the record entirely;
/// `label` renders the duplicate-report entry. Keys are scoped per
/// partition: the same key in two partitions keeps both records.
/// Partitions are emitted in `partition_names` order; a classification
/// naming an unlisted partition is appended after them.
pub fn partition_records<C, K, L>(
    records: &[RawRecord],
    partition_names: &[String],
    classify: C,
    dedup_key: K,
    label: L,
) -> PartitionOutput
where
    C: Fn(&RawRecord) -> String,
    K: Fn(&RawRecord) -> Option<String>,
    L: Fn(&RawRecord) -> String,
{
    let mut partitions: Vec<Partition> = partition_names
        .iter()
        .map(|n| Partition::new(n.clone()))
        .collect();
    let mut seen: Vec<HashSet<String>> = partitions.iter().map(|_| HashSet::new()).collect();
    let mut skipped = 0;

    for record in records {
        let Some(key) = dedup_key(record) else {
            skipped += 1;
            continue;
        };

        let name = classify(record);
        let idx = match partitions.iter().position(|p| p.name == name) {
            Some(idx) => idx,
            None => {
                partitions.push(Partition::new(name));
                seen.push(HashSet::new());
                partitions.len() - 1
            }
        };

        if seen[idx].insert(key) {
            partitions[idx].records.push(record.clone());
        } else {
            partitions[idx].duplicates.push(DuplicateEntry {
                source_row: record.source_row,
                label: label(record),
            });
        }
    }

    PartitionOutput {
        partitions,
        skipped,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::normalize::normalize_name;
    use rollcall_table::parse_table;

    fn name_key(record: &RawRecord) -> Option<String> {
        let first = normalize_name(record.get("First").unwrap_or(""));
        let last = normalize_name(record.get("Last").unwrap_or(""));
        if first.is_empty() || last.is_empty() {
            None
        } else {
            Some(format!("{first} {last}"))
        }
    }

    fn label(record: &RawRecord) -> String {
        format!(
            "{} {}",
            record.get("First").unwrap_or(""),
            record.get("Last").unwrap_or("")
        )
    }

    #[test]
    fn duplicate_dropped_with_source_row() {
        let table =
            parse_table("First,Last\nSam,Okoro\nsam, okoro \n").unwrap();
        let out = partition_records(
            &table.records,
            &["all".to_string()],
            |_| "all".into(),
            name_key,
            label,
        );

        assert_eq!(out.partitions.len(), 1);
        assert_eq!(out.partitions[0].records.len(), 1);
        assert_eq!(out.partitions[0].records[0].get("First"), Some("Sam"));
        assert_eq!(out.partitions[0].duplicates.len(), 1);
        // Header is row 1, so the second data row is row 3
        assert_eq!(out.partitions[0].duplicates[0].source_row, 3);
    }

    #[test]
    fn blank_names_excluded_not_counted_as_duplicates() {
        let table = parse_table("First,Last\n,Okoro\nSam,Okoro\n,Okoro\n").unwrap();
        let out = partition_records(
            &table.records,
            &["all".to_string()],
            |_| "all".into(),
            name_key,
            label,
        );
        assert_eq!(out.skipped, 2);
        assert_eq!(out.partitions[0].records.len(), 1);
        assert!(out.partitions[0].duplicates.is_empty());
    }

    #[test]
    fn keys_scoped_per_partition() {
        let table =
            parse_table("First,Last,Camp\nSam,Okoro,Yes\nSam,Okoro,No\n").unwrap();
        let out = partition_records(
            &table.records,
            &["camping".to_string(), "standard".to_string()],
            |r| {
                if r.get("Camp") == Some("Yes") {
                    "camping".into()
                } else {
                    "standard".into()
                }
            },
            name_key,
            label,
        );
        // Same key, different partitions: both survive
        assert_eq!(out.partitions[0].records.len(), 1);
        assert_eq!(out.partitions[1].records.len(), 1);
        assert!(out.partitions[0].duplicates.is_empty());
        assert!(out.partitions[1].duplicates.is_empty());
    }

    #[test]
    fn order_preserved_within_partition() {
        let table = parse_table("First,Last\nZoe,Quist\nAnn,Lee\nBea,Okoro\n").unwrap();
        let out = partition_records(
            &table.records,
            &["all".to_string()],
            |_| "all".into(),
            name_key,
            label,
        );
        let firsts: Vec<_> = out.partitions[0]
            .records
            .iter()
            .map(|r| r.get("First").unwrap())
            .collect();
        assert_eq!(firsts, vec!["Zoe", "Ann", "Bea"]);
    }

    #[test]
    fn unlisted_partition_appended() {
        let table = parse_table("First,Last\nSam,Okoro\n").unwrap();
        let out = partition_records(
            &table.records,
            &["expected".to_string()],
            |_| "surprise".into(),
            name_key,
            label,
        );
        assert_eq!(out.partitions.len(), 2);
        assert_eq!(out.partitions[1].name, "surprise");
        assert_eq!(out.partitions[1].records.len(), 1);
    }
}
