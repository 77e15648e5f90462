//! `rollcall link` — reconcile check-in records against a registration roster.

use std::path::{Path, PathBuf};

use serde::Serialize;

use rollcall_engine::{run_link, LinkConfig, LinkResult};
use rollcall_table::{read_table, RawRecord};

use crate::artifacts::{report_artifacts, table_read_err, write_artifact, ArtifactStatus};
use crate::exit_codes::{EXIT_INVALID_CONFIG, EXIT_RUNTIME};
use crate::{cli_err, read_config, CliError};

#[derive(Serialize)]
struct LinkReport<'a> {
    result: &'a LinkResult,
    artifacts: &'a [ArtifactStatus],
}

pub fn cmd_link(
    config_path: PathBuf,
    json_output: bool,
    output_file: Option<PathBuf>,
    out_dir: Option<PathBuf>,
    no_artifacts: bool,
) -> Result<(), CliError> {
    let config_str = read_config(&config_path)?;

    let kind = rollcall_engine::config_kind(&config_str);
    if kind != "link" {
        return Err(CliError {
            code: EXIT_INVALID_CONFIG,
            message: format!("config kind is \"{kind}\", expected \"link\""),
            hint: Some("use `rollcall partition` for partition configs".into()),
        });
    }

    let config = LinkConfig::from_toml(&config_str)
        .map_err(|e| cli_err(EXIT_INVALID_CONFIG, e.to_string()))?;

    // File paths resolve relative to the config file's directory
    let base_dir = config_path
        .parent()
        .unwrap_or_else(|| Path::new("."))
        .to_path_buf();

    let reference = read_table(&base_dir.join(&config.reference.file)).map_err(table_read_err)?;
    let input = read_table(&base_dir.join(&config.input.file)).map_err(table_read_err)?;

    let result =
        run_link(&config, &reference, &input).map_err(|e| cli_err(EXIT_RUNTIME, e.to_string()))?;

    let mut artifacts: Vec<ArtifactStatus> = Vec::new();
    if !no_artifacts {
        let dir = out_dir.unwrap_or(base_dir);

        let matched: Vec<&RawRecord> = result
            .results
            .iter()
            .filter(|r| r.matched)
            .map(|r| &r.input)
            .collect();
        artifacts.push(write_artifact(&dir, "matched.csv", &input.headers, &matched));

        let unmatched: Vec<&RawRecord> = result
            .results
            .iter()
            .filter(|r| !r.matched)
            .map(|r| &r.input)
            .collect();
        artifacts.push(write_artifact(&dir, "unmatched.csv", &input.headers, &unmatched));

        if let Some(filtered) = &result.filtered {
            let rows: Vec<&RawRecord> = filtered.iter().map(|r| &r.input).collect();
            artifacts.push(write_artifact(&dir, "filtered.csv", &input.headers, &rows));
        }
    }

    let report = LinkReport {
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
        "link '{}': {} input row(s), {} malformed skipped — {} matched, {} unmatched",
        result.meta.config_name, s.total_input, s.malformed_rows, s.matched, s.unmatched,
    );
    if s.reference_malformed_rows > 0 {
        eprintln!(
            "  reference rows malformed/skipped: {}",
            s.reference_malformed_rows
        );
    }
    for (kind, count) in &s.matched_by_kind {
        eprintln!("  matched via {kind}: {count}");
    }
    if let Some(filtered) = &result.filtered {
        eprintln!("  passing filter: {}", filtered.len());
    }
    if s.index_collisions > 0 {
        eprintln!(
            "  index key collisions (last write wins): {}",
            s.index_collisions
        );
    }

    report_artifacts(&artifacts)
}
