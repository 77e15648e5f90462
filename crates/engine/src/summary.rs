//! Run summaries computed from results.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::dedup::PartitionOutput;
use crate::index::IndexStats;
use crate::linker::{MatchKind, MatchResult};

#[derive(Debug, Clone, Serialize)]
pub struct LinkSummary {
    pub total_input: usize,
    pub malformed_rows: usize,
    /// Malformed rows skipped while parsing the reference table. These
    /// shrink the match universe, so they are surfaced, not swallowed.
    pub reference_malformed_rows: usize,
    pub matched: usize,
    pub matched_by_kind: BTreeMap<String, usize>,
    pub unmatched: usize,
    pub index_collisions: usize,
}

/// Compute link summary statistics. Matched + unmatched always equals
/// total_input: every input record has exactly one result.
pub fn link_summary(
    results: &[MatchResult],
    malformed_rows: usize,
    reference_malformed_rows: usize,
    index_stats: &IndexStats,
) -> LinkSummary {
    let mut matched = 0;
    let mut unmatched = 0;
    let mut matched_by_kind: BTreeMap<String, usize> = BTreeMap::new();

    for result in results {
        if result.matched {
            matched += 1;
            *matched_by_kind.entry(result.kind.to_string()).or_insert(0) += 1;
        } else {
            unmatched += 1;
        }
    }

    LinkSummary {
        total_input: results.len(),
        malformed_rows,
        reference_malformed_rows,
        matched,
        matched_by_kind,
        unmatched,
        index_collisions: index_stats.collisions.len(),
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct PartitionCounts {
    pub name: String,
    pub output: usize,
    pub duplicates: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct PartitionSummary {
    pub total_input: usize,
    pub malformed_rows: usize,
    /// Blank-name records excluded before classification.
    pub skipped: usize,
    pub partitions: Vec<PartitionCounts>,
}

pub fn partition_summary(
    output: &PartitionOutput,
    total_input: usize,
    malformed_rows: usize,
) -> PartitionSummary {
    PartitionSummary {
        total_input,
        malformed_rows,
        skipped: output.skipped,
        partitions: output
            .partitions
            .iter()
            .map(|p| PartitionCounts {
                name: p.name.clone(),
                output: p.records.len(),
                duplicates: p.duplicates.len(),
            })
            .collect(),
    }
}
