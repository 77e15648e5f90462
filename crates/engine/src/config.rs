//! TOML run configuration.
//!
//! Two config kinds share one file format, dispatched on a `kind` field:
//! `link` reconciles an input table against a reference table, `partition`
//! splits and deduplicates a single input table.

use serde::Deserialize;

use crate::error::LinkError;

/// Extract the `kind` field from a TOML string, defaulting to "link".
pub fn config_kind(config_str: &str) -> String {
    #[derive(Deserialize)]
    struct KindProbe {
        #[serde(default = "default_kind")]
        kind: String,
    }
    fn default_kind() -> String {
        "link".into()
    }

    toml::from_str::<KindProbe>(config_str)
        .map(|p| p.kind)
        .unwrap_or_else(|_| "link".into())
}

// ---------------------------------------------------------------------------
// Shared pieces
// ---------------------------------------------------------------------------

/// Which header fields carry the identity columns of a table.
#[derive(Debug, Clone, Deserialize)]
pub struct ColumnMapping {
    pub first_name: String,
    pub last_name: String,
    #[serde(default)]
    pub email: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SourceConfig {
    pub file: String,
    pub columns: ColumnMapping,
}

// ---------------------------------------------------------------------------
// Link config
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
pub struct LinkConfig {
    pub name: String,
    pub reference: SourceConfig,
    pub input: SourceConfig,
    /// Post-match filter over the matched reference record. Rules are
    /// conjunctive; values within a rule are alternatives.
    #[serde(default)]
    pub filter: Vec<FilterRule>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct FilterRule {
    pub column: String,
    pub values: Vec<String>,
}

impl FilterRule {
    /// True when the record's column value equals one of the rule values,
    /// ignoring surrounding whitespace and ASCII case.
    pub fn matches(&self, record: &rollcall_table::RawRecord) -> bool {
        let value = record.get(&self.column).unwrap_or("").trim();
        self.values.iter().any(|v| v.trim().eq_ignore_ascii_case(value))
    }
}

impl LinkConfig {
    pub fn from_toml(config_str: &str) -> Result<Self, LinkError> {
        let config: Self =
            toml::from_str(config_str).map_err(|e| LinkError::ConfigParse(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<(), LinkError> {
        if self.name.trim().is_empty() {
            return Err(LinkError::ConfigValidation("name must not be empty".into()));
        }
        for rule in &self.filter {
            if rule.column.trim().is_empty() {
                return Err(LinkError::ConfigValidation(
                    "filter rule has an empty column".into(),
                ));
            }
            if rule.values.is_empty() {
                return Err(LinkError::ConfigValidation(format!(
                    "filter rule for column '{}' has no values",
                    rule.column
                )));
            }
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Partition config
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
pub struct PartitionConfig {
    pub name: String,
    pub input: SourceConfig,
    /// Classification rules, evaluated in order; the first rule whose
    /// values contain the record's column value wins.
    #[serde(default)]
    pub rules: Vec<PartitionRule>,
    /// Partition for records no rule claims.
    pub default_partition: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PartitionRule {
    pub partition: String,
    pub column: String,
    pub values: Vec<String>,
}

impl PartitionRule {
    pub fn matches(&self, record: &rollcall_table::RawRecord) -> bool {
        let value = record.get(&self.column).unwrap_or("").trim();
        self.values.iter().any(|v| v.trim().eq_ignore_ascii_case(value))
    }
}

impl PartitionConfig {
    pub fn from_toml(config_str: &str) -> Result<Self, LinkError> {
        let config: Self =
            toml::from_str(config_str).map_err(|e| LinkError::ConfigParse(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<(), LinkError> {
        if self.name.trim().is_empty() {
            return Err(LinkError::ConfigValidation("name must not be empty".into()));
        }
        if self.default_partition.trim().is_empty() {
            return Err(LinkError::ConfigValidation(
                "default_partition must not be empty".into(),
            ));
        }
        for rule in &self.rules {
            if rule.partition.trim().is_empty() || rule.column.trim().is_empty() {
                return Err(LinkError::ConfigValidation(
                    "partition rule needs a partition and a column".into(),
                ));
            }
            if rule.values.is_empty() {
                return Err(LinkError::ConfigValidation(format!(
                    "partition rule '{}' has no values",
                    rule.partition
                )));
            }
        }
        Ok(())
    }

    /// Declared partition names in output order: rule partitions first (in
    /// rule order, deduplicated), then the default partition.
    pub fn partition_names(&self) -> Vec<String> {
        let mut names: Vec<String> = Vec::new();
        for rule in &self.rules {
            if !names.contains(&rule.partition) {
                names.push(rule.partition.clone());
            }
        }
        if !names.contains(&self.default_partition) {
            names.push(self.default_partition.clone());
        }
        names
    }
}
