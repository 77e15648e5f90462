//! `rollcall partition` — split and deduplicate a raw extraction table.

use std::path::{Path, PathBuf};

use serde::Serialize;

use rollcall_engine::{run_partition, PartitionConfig, PartitionResult};
use rollcall_table::{read_table, RawRecord};

use crate::artifacts::{
    artifact_file_names, report_artifacts, table_read_err, write_artifact, ArtifactStatus,
};
use crate::exit_codes::{EXIT_INVALID_CONFIG, EXIT_RUNTIME};
use crate::{cli_err, read_config, CliError};

#[derive(Serialize)]
struct PartitionReport<'a> {
    result: &'a PartitionResult,
    artifacts: &'a [ArtifactStatus],
}

pub fn cmd_partition(
    config_path: PathBuf,
    json_output: bool,
    output_file: Option<PathBuf>,
    out_dir: Option<PathBuf>,
    no_artifacts: bool,
) -> Result<(), CliError> {
    let config_str = read_config(&config_path)?;

    let kind = rollcall_engine::config_kind(&config_str);
    if kind != "partition" {
        return Err(CliError {
            code: EXIT_INVALID_CONFIG,
            message: format!("config kind is \"{kind}\", expected \"partition\""),
            hint: Some("use `rollcall link` for link configs".into()),
        });
    }

    let config = PartitionConfig::from_toml(&config_str)
        .map_err(|e| cli_err(EXIT_INVALID_CONFIG, e.to_string()))?;

    let base_dir = config_path
        .parent()
        .unwrap_or_else(|| Path::new("."))
        .to_path_buf();

    let input = read_table(&base_dir.join(&config.input.file)).map_err(table_read_err)?;

    let result = run_partition(&config, &input)
        .map_err(|e| cli_err(EXIT_RUNTIME, e.to_string()))?;

    let mut artifacts: Vec<ArtifactStatus> = Vec::new();
    if !no_artifacts {
        let dir = out_dir.unwrap_or(base_dir);
        let file_names = artifact_file_names(
            result.output.partitions.iter().map(|p| p.name.as_str()),
        );
        for (partition, file_name) in result.output.partitions.iter().zip(&file_names) {
            let rows: Vec<&RawRecord> = partition.records.iter().collect();
            artifacts.push(write_artifact(&dir, file_name, &input.headers, &rows));
        }
    }

    let report = PartitionReport {
        result: &result,
        artifacts: &artifacts,
    };
    let json_str = serde_json::to_string_pretty(&report)
        .map_err(|e| cli_err(EXIT_RUNTIME, format!("JSON serialization error: {e}")))?;

    if let Some(path) = &output_file {
        std::fs::write(path, &json_str)
            .map_err(|e| cli_err(EXIT_RUNTIME, format!("cannot write report: {e}")))?;
        eprintln!("wrote {}", path.display());
    }
    if json_output {
        println!("{json_str}");
    }

    // Human summary to stderr
    let s = &result.summary;
    eprintln!(
        "partition '{}': {} input row(s), {} malformed skipped, {} blank-name row(s) excluded",
        result.meta.config_name, s.total_input, s.malformed_rows, s.skipped,
    );
    for partition in &result.output.partitions {
        eprintln!(
            "  {}: {} row(s), {} duplicate(s)",
            partition.name,
            partition.records.len(),
            partition.duplicates.len(),
        );
        for duplicate in &partition.duplicates {
            eprintln!("    duplicate row {}: {}", duplicate.source_row, duplicate.label);
        }
    }

    report_artifacts(&artifacts)
}
