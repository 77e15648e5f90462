// CSV table import/export

use std::io::{Read, Write};
use std::path::Path;

use serde::Serialize;

use crate::error::TableError;

/// One parsed data row: ordered field-name → value pairs mirroring the
/// header, plus the 1-based source row number (the header counts as row 1).
#[derive(Debug, Clone, Serialize)]
pub struct RawRecord {
    pub fields: Vec<(String, String)>,
    pub source_row: usize,
}

impl RawRecord {
    /// Value of the named field, or `None` if the header lacks it.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|(field, _)| field == name)
            .map(|(_, value)| value.as_str())
    }
}

/// A fully parsed table. `malformed` lists the source row numbers of rows
/// skipped for having fewer fields than the header.
#[derive(Debug, Clone, Serialize)]
pub struct Table {
    pub headers: Vec<String>,
    pub records: Vec<RawRecord>,
    pub malformed: Vec<usize>,
}

impl Table {
    pub fn has_column(&self, name: &str) -> bool {
        self.headers.iter().any(|h| h == name)
    }
}

/// Read file and convert to UTF-8 if needed (handles Windows-1252, Latin-1, etc.)
pub fn read_file_as_utf8(path: &Path) -> Result<String, TableError> {
    let mut file = std::fs::File::open(path)
        .map_err(|e| TableError::Io(format!("cannot open {}: {e}", path.display())))?;
    let mut bytes = Vec::new();
    file.read_to_end(&mut bytes)
        .map_err(|e| TableError::Io(format!("cannot read {}: {e}", path.display())))?;

    // Try UTF-8 first; on failure, recover the buffer from the error
    match String::from_utf8(bytes) {
        Ok(s) => Ok(s),
        Err(e) => {
            let bytes = e.into_bytes();
            // Fall back to Windows-1252 (common for Excel-exported CSVs)
            let (decoded, _, _) = encoding_rs::WINDOWS_1252.decode(&bytes);
            Ok(decoded.into_owned())
        }
    }
}

/// Read and parse a header-first CSV file.
pub fn read_table(path: &Path) -> Result<Table, TableError> {
    let content = read_file_as_utf8(path)?;
    parse_table(&content)
}

/// Parse header-first CSV text into a [`Table`].
///
/// The first row defines field names in order; each data row is zipped with
/// the header. A data row with fewer fields than the header is skipped and
/// its source row number recorded — never padded, never written to output.
/// Extra trailing fields beyond the header are ignored.
///
/// Row numbers come from the reader's physical line positions, not the
/// record count: the csv reader swallows blank lines, but a blank line
/// still consumes its source row number and is counted as malformed
/// (field count below the header length).
pub fn parse_table(content: &str) -> Result<Table, TableError> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_reader(content.as_bytes());

    let mut headers: Vec<String> = Vec::new();
    let mut records = Vec::new();
    let mut malformed = Vec::new();

    // Physical line the next record should start on. A gap means the
    // reader skipped blank lines in between.
    let mut next_line: u64 = 1;

    for (idx, result) in reader.records().enumerate() {
        let record = result.map_err(|e| TableError::Csv(e.to_string()))?;
        let line = record
            .position()
            .map(|p| p.line())
            .unwrap_or(next_line);
        // A quoted field may span lines; the newlines it swallowed appear
        // verbatim in the parsed value.
        let span = 1 + record
            .iter()
            .map(|field| field.matches('\n').count())
            .sum::<usize>() as u64;

        if idx == 0 {
            headers = record.iter().map(|h| h.to_string()).collect();
            next_line = line + span;
            continue;
        }

        for blank in next_line..line {
            malformed.push(blank as usize);
        }
        next_line = line + span;

        if record.len() < headers.len() {
            malformed.push(line as usize);
            continue;
        }

        let fields = headers
            .iter()
            .enumerate()
            .map(|(i, h)| (h.clone(), record.get(i).unwrap_or("").to_string()))
            .collect();
        records.push(RawRecord {
            fields,
            source_row: line as usize,
        });
    }

    if headers.is_empty() {
        return Err(TableError::Empty);
    }

    // Trailing blank lines the reader consumed without producing a record
    let total_lines = content.lines().count() as u64;
    for blank in next_line..=total_lines {
        malformed.push(blank as usize);
    }

    Ok(Table {
        headers,
        records,
        malformed,
    })
}

/// Write records to a writer in header order.
///
/// Every field is quoted, whether or not the value requires it; embedded
/// quotes are doubled by the dialect. Fields a record lacks are written
/// empty.
pub fn write_table_to<W: Write>(
    writer: W,
    headers: &[String],
    records: &[&RawRecord],
) -> Result<(), TableError> {
    let mut out = csv::WriterBuilder::new()
        .quote_style(csv::QuoteStyle::Always)
        .from_writer(writer);

    out.write_record(headers)
        .map_err(|e| TableError::Csv(e.to_string()))?;

    for record in records {
        let row: Vec<&str> = headers
            .iter()
            .map(|h| record.get(h).unwrap_or(""))
            .collect();
        out.write_record(&row)
            .map_err(|e| TableError::Csv(e.to_string()))?;
    }

    out.flush().map_err(|e| TableError::Io(e.to_string()))?;
    Ok(())
}

/// Write records to a file path, creating or truncating it.
pub fn write_table(
    path: &Path,
    headers: &[String],
    records: &[&RawRecord],
) -> Result<(), TableError> {
    let file = std::fs::File::create(path)
        .map_err(|e| TableError::Io(format!("cannot create {}: {e}", path.display())))?;
    write_table_to(file, headers, records)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn parse_basic() {
        let table = parse_table("First,Last,Email\nAnn,Lee,a@x.com\nSam,Okoro,\n").unwrap();
        assert_eq!(table.headers, vec!["First", "Last", "Email"]);
        assert_eq!(table.records.len(), 2);
        assert_eq!(table.records[0].get("First"), Some("Ann"));
        assert_eq!(table.records[0].source_row, 2);
        assert_eq!(table.records[1].get("Email"), Some(""));
        assert_eq!(table.records[1].source_row, 3);
        assert!(table.malformed.is_empty());
    }

    #[test]
    fn quoted_field_keeps_delimiter() {
        let table = parse_table("Name,Address\n\"Doe, Jane\",\"12 Main St, Apt 4\"\n").unwrap();
        assert_eq!(table.records[0].get("Name"), Some("Doe, Jane"));
        assert_eq!(table.records[0].get("Address"), Some("12 Main St, Apt 4"));
    }

    #[test]
    fn doubled_quote_collapses() {
        let table = parse_table("Name\n\"Ann \"\"Red\"\" Lee\"\n").unwrap();
        assert_eq!(table.records[0].get("Name"), Some("Ann \"Red\" Lee"));
    }

    #[test]
    fn short_row_skipped_and_counted() {
        let table = parse_table("First,Last,Email\nAnn,Lee,a@x.com\nBob\nSam,Okoro,s@x.com\n").unwrap();
        assert_eq!(table.records.len(), 2);
        assert_eq!(table.malformed, vec![3]);
        // The skipped row still consumed its row number
        assert_eq!(table.records[1].source_row, 4);
    }

    #[test]
    fn blank_line_consumes_its_row_number() {
        let table = parse_table("First,Last\nAnn,Lee\n\nSam,Okoro\n").unwrap();
        let rows: Vec<usize> = table.records.iter().map(|r| r.source_row).collect();
        // Sam sits on physical row 4; the blank row 3 is skipped and counted
        assert_eq!(rows, vec![2, 4]);
        assert_eq!(table.malformed, vec![3]);
    }

    #[test]
    fn trailing_blank_line_counted_as_malformed() {
        let table = parse_table("First,Last\nAnn,Lee\n\n").unwrap();
        assert_eq!(table.records.len(), 1);
        assert_eq!(table.malformed, vec![3]);
    }

    #[test]
    fn multiline_quoted_field_does_not_shift_numbering() {
        let table = parse_table("Name,Note\nAnn,\"line one\nline two\"\nSam,ok\n").unwrap();
        let rows: Vec<usize> = table.records.iter().map(|r| r.source_row).collect();
        // Ann's record spans physical rows 2-3; Sam starts on row 4
        assert_eq!(rows, vec![2, 4]);
        assert!(table.malformed.is_empty());
    }

    #[test]
    fn long_row_truncated_to_header() {
        let table = parse_table("First,Last\nAnn,Lee,extra\n").unwrap();
        assert_eq!(table.records.len(), 1);
        assert_eq!(table.records[0].fields.len(), 2);
        assert!(table.malformed.is_empty());
    }

    #[test]
    fn empty_input_is_an_error() {
        assert!(matches!(parse_table(""), Err(TableError::Empty)));
    }

    #[test]
    fn write_then_parse_roundtrip() {
        let headers = vec!["Name".to_string(), "Note".to_string()];
        let record = RawRecord {
            fields: vec![
                ("Name".into(), "Doe, \"JD\" Jane".into()),
                ("Note".into(), "line one\nline two".into()),
            ],
            source_row: 2,
        };

        let mut buf = Vec::new();
        write_table_to(&mut buf, &headers, &[&record]).unwrap();
        let written = String::from_utf8(buf).unwrap();

        let reparsed = parse_table(&written).unwrap();
        assert_eq!(reparsed.headers, headers);
        assert_eq!(reparsed.records.len(), 1);
        assert_eq!(reparsed.records[0].get("Name"), Some("Doe, \"JD\" Jane"));
        assert_eq!(reparsed.records[0].get("Note"), Some("line one\nline two"));
    }

    #[test]
    fn every_field_is_quoted_on_write() {
        let headers = vec!["A".to_string(), "B".to_string()];
        let record = RawRecord {
            fields: vec![("A".into(), "plain".into()), ("B".into(), "1".into())],
            source_row: 2,
        };
        let mut buf = Vec::new();
        write_table_to(&mut buf, &headers, &[&record]).unwrap();
        let written = String::from_utf8(buf).unwrap();
        assert!(written.contains("\"plain\",\"1\""));
    }

    #[test]
    fn file_roundtrip_via_tempdir() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("out.csv");
        let headers = vec!["First".to_string(), "Last".to_string()];
        let record = RawRecord {
            fields: vec![("First".into(), "Ann".into()), ("Last".into(), "Lee".into())],
            source_row: 2,
        };
        write_table(&path, &headers, &[&record]).unwrap();

        let table = read_table(&path).unwrap();
        assert_eq!(table.records.len(), 1);
        assert_eq!(table.records[0].get("Last"), Some("Lee"));
    }

    #[test]
    fn missing_file_is_descriptive() {
        let err = read_table(Path::new("/nonexistent/users.csv")).unwrap_err();
        let msg = err.to_string();
        assert!(msg.contains("/nonexistent/users.csv"), "got: {msg}");
    }

    #[test]
    fn windows_1252_fallback() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("latin.csv");
        // "José" in Windows-1252: é = 0xE9, invalid as UTF-8
        std::fs::write(&path, b"Name\nJos\xE9\n").unwrap();
        let table = read_table(&path).unwrap();
        assert_eq!(table.records[0].get("Name"), Some("José"));
    }
}
