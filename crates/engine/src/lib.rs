//! `rollcall-engine` — record linkage and deduplication over CSV-shaped tables.
//!
//! Pure engine crate: receives pre-loaded tables, returns linked or
//! partitioned results. No CLI or file IO dependencies.

pub mod config;
pub mod dedup;
pub mod error;
pub mod index;
pub mod linker;
pub mod matcher;
pub mod normalize;
pub mod run;
pub mod summary;

pub use config::{config_kind, LinkConfig, PartitionConfig};
pub use error::LinkError;
pub use linker::{MatchKind, MatchResult};
pub use run::{run_link, run_partition, LinkResult, PartitionResult, RunMeta};
