use std::fmt;

#[derive(Debug)]
pub enum TableError {
    /// Input has no header row.
    Empty,
    /// IO error (file open, read, write).
    Io(String),
    /// Underlying CSV reader/writer error.
    Csv(String),
}

impl fmt::Display for TableError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Empty => write!(f, "input has no header row"),
            Self::Io(msg) => write!(f, "IO error: {msg}"),
            Self::Csv(msg) => write!(f, "CSV error: {msg}"),
        }
    }
}

impl std::error::Error for TableError {}
