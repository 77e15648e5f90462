use std::fmt;

#[derive(Debug)]
pub enum LinkError {
    /// TOML parse / deserialization error.
    ConfigParse(String),
    /// Config validation error (empty rule, missing partition, etc.).
    ConfigValidation(String),
    /// A mapped column does not exist in the loaded table.
    MissingColumn { table: String, column: String },
}

impl fmt::Display for LinkError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ConfigParse(msg) => write!(f, "config parse error: {msg}"),
            Self::ConfigValidation(msg) => write!(f, "config validation error: {msg}"),
            Self::MissingColumn { table, column } => {
                write!(f, "table '{table}': missing column '{column}'")
            }
        }
    }
}

impl std::error::Error for LinkError {}
