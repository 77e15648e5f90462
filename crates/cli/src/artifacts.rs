//! CSV artifact writing with per-artifact status.
//!
//! A write failure is fatal for that artifact only; the remaining
//! artifacts are still attempted and the statuses travel in the report.

use std::collections::HashSet;
use std::path::Path;

use serde::Serialize;

use rollcall_table::{write_table, RawRecord, TableError};

use crate::exit_codes::{EXIT_ARTIFACT_WRITE, EXIT_MISSING_INPUT, EXIT_RUNTIME};
use crate::{cli_err, CliError};

#[derive(Debug, Serialize)]
pub struct ArtifactStatus {
    pub path: String,
    pub ok: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Write one CSV artifact, converting the outcome into a status entry.
pub fn write_artifact(
    dir: &Path,
    file_name: &str,
    headers: &[String],
    records: &[&RawRecord],
) -> ArtifactStatus {
    let path = dir.join(file_name);
    match write_table(&path, headers, records) {
        Ok(()) => ArtifactStatus {
            path: path.display().to_string(),
            ok: true,
            error: None,
        },
        Err(e) => ArtifactStatus {
            path: path.display().to_string(),
            ok: false,
            error: Some(e.to_string()),
        },
    }
}

/// Print per-artifact outcomes and fail the run when any write failed.
pub fn report_artifacts(artifacts: &[ArtifactStatus]) -> Result<(), CliError> {
    for artifact in artifacts {
        match &artifact.error {
            None => eprintln!("wrote {}", artifact.path),
            Some(err) => eprintln!("failed {}: {err}", artifact.path),
        }
    }
    if artifacts.iter().any(|a| !a.ok) {
        return Err(cli_err(
            EXIT_ARTIFACT_WRITE,
            "one or more output artifacts failed to write",
        ));
    }
    Ok(())
}

/// A partition name is user-supplied config text; keep artifact file names
/// shell-safe. Sanitizing can fold distinct names together ("Main Hall" and
/// "main_hall"), so names are assigned as a batch and collisions get a
/// numeric suffix instead of overwriting an earlier artifact.
pub fn artifact_file_names<'a, I>(partitions: I) -> Vec<String>
where
    I: IntoIterator<Item = &'a str>,
{
    let mut used: HashSet<String> = HashSet::new();
    let mut names = Vec::new();
    for partition in partitions {
        let stem: String = partition
            .chars()
            .map(|c| if c.is_alphanumeric() { c.to_ascii_lowercase() } else { '_' })
            .collect();
        let mut file_name = format!("{stem}.csv");
        let mut n = 2;
        while !used.insert(file_name.clone()) {
            file_name = format!("{stem}_{n}.csv");
            n += 1;
        }
        names.push(file_name);
    }
    names
}

/// Map a table read failure to its exit code: absent/unreadable files are
/// the missing-input contract, dialect problems are runtime errors.
pub fn table_read_err(err: TableError) -> CliError {
    match err {
        TableError::Io(_) => cli_err(EXIT_MISSING_INPUT, err.to_string()),
        TableError::Empty | TableError::Csv(_) => cli_err(EXIT_RUNTIME, err.to_string()),
    }
}
