//! Run entry points: pre-loaded tables in, structured results out.
//!
//! File IO stays at the outer boundary (the CLI); everything here is pure
//! and testable without a filesystem.

use serde::Serialize;

use rollcall_table::{RawRecord, Table};

use crate::config::{ColumnMapping, LinkConfig, PartitionConfig};
use crate::dedup::{partition_records, PartitionOutput};
use crate::error::LinkError;
use crate::index::{IndexStats, RecordIndex};
use crate::linker::{filter_matched, link, MatchResult};
use crate::normalize::normalize_name;
use crate::summary::{link_summary, partition_summary, LinkSummary, PartitionSummary};

#[derive(Debug, Clone, Serialize)]
pub struct RunMeta {
    pub config_name: String,
    pub engine_version: String,
    pub run_at: String,
}

impl RunMeta {
    fn new(config_name: &str) -> Self {
        Self {
            config_name: config_name.to_string(),
            engine_version: env!("CARGO_PKG_VERSION").to_string(),
            run_at: chrono::Utc::now().to_rfc3339(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct LinkResult {
    pub meta: RunMeta,
    pub summary: LinkSummary,
    pub results: Vec<MatchResult>,
    /// Matched results passing the config `[[filter]]` rules.
    /// `None` when the config declares no rules.
    pub filtered: Option<Vec<MatchResult>>,
    pub index: IndexStats,
}

fn check_column(table: &Table, table_name: &str, column: &str) -> Result<(), LinkError> {
    if table.has_column(column) {
        Ok(())
    } else {
        Err(LinkError::MissingColumn {
            table: table_name.to_string(),
            column: column.to_string(),
        })
    }
}

fn check_columns(table: &Table, table_name: &str, columns: &ColumnMapping) -> Result<(), LinkError> {
    check_column(table, table_name, &columns.first_name)?;
    check_column(table, table_name, &columns.last_name)?;
    if let Some(email) = &columns.email {
        check_column(table, table_name, email)?;
    }
    Ok(())
}

/// Link every input record against the reference table.
pub fn run_link(
    config: &LinkConfig,
    reference: &Table,
    input: &Table,
) -> Result<LinkResult, LinkError> {
    check_columns(reference, "reference", &config.reference.columns)?;
    check_columns(input, "input", &config.input.columns)?;
    for rule in &config.filter {
        check_column(reference, "reference", &rule.column)?;
    }

    let index = RecordIndex::build(reference, &config.reference.columns);
    let results = link(
        reference,
        &config.reference.columns,
        &index,
        input,
        &config.input.columns,
    );

    let filtered = if config.filter.is_empty() {
        None
    } else {
        let rules = &config.filter;
        Some(
            filter_matched(&results, |_, matched| {
                rules.iter().all(|rule| rule.matches(matched))
            })
            .into_iter()
            .cloned()
            .collect(),
        )
    };

    let summary = link_summary(
        &results,
        input.malformed.len(),
        reference.malformed.len(),
        &index.stats,
    );

    Ok(LinkResult {
        meta: RunMeta::new(&config.name),
        summary,
        results,
        filtered,
        index: index.stats,
    })
}

#[derive(Debug, Serialize)]
pub struct PartitionResult {
    pub meta: RunMeta,
    pub summary: PartitionSummary,
    pub output: PartitionOutput,
}

/// Classify and deduplicate the input table per the partition config.
pub fn run_partition(
    config: &PartitionConfig,
    input: &Table,
) -> Result<PartitionResult, LinkError> {
    let columns = &config.input.columns;
    check_columns(input, "input", columns)?;
    for rule in &config.rules {
        check_column(input, "input", &rule.column)?;
    }

    let classify = |record: &RawRecord| {
        config
            .rules
            .iter()
            .find(|rule| rule.matches(record))
            .map(|rule| rule.partition.clone())
            .unwrap_or_else(|| config.default_partition.clone())
    };

    let dedup_key = |record: &RawRecord| {
        let first = normalize_name(record.get(&columns.first_name).unwrap_or(""));
        let last = normalize_name(record.get(&columns.last_name).unwrap_or(""));
        if first.is_empty() || last.is_empty() {
            None
        } else {
            Some(format!("{first} {last}"))
        }
    };

    let label = |record: &RawRecord| {
        format!(
            "{} {}",
            record.get(&columns.first_name).unwrap_or("").trim(),
            record.get(&columns.last_name).unwrap_or("").trim()
        )
    };

    let output = partition_records(
        &input.records,
        &config.partition_names(),
        classify,
        dedup_key,
        label,
    );
    let summary = partition_summary(&output, input.records.len(), input.malformed.len());

    Ok(PartitionResult {
        meta: RunMeta::new(&config.name),
        summary,
        output,
    })
}
