//! `rollcall-table` — delimited table reading and writing.
//!
//! Owns the on-disk CSV dialect: first row is the header, fields may be
//! double-quote enclosed, an embedded quote is doubled. Output always
//! quotes every field so written files re-parse without ambiguity.
//! No matching logic lives here.

pub mod error;
pub mod table;

pub use error::TableError;
pub use table::{parse_table, read_table, write_table, write_table_to, RawRecord, Table};
