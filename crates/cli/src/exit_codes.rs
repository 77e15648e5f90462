//! CLI Exit Code Registry
//!
//! Single source of truth for all CLI exit codes. Exit codes are part of
//! the shell contract — scripts rely on them.
//!
//! | Code | Description                                        |
//! |------|----------------------------------------------------|
//! | 0    | Success                                            |
//! | 1    | General error (unspecified)                        |
//! | 2    | CLI usage error (bad args)                         |
//! | 3    | Invalid or unparseable config                      |
//! | 4    | Reference or input file missing/unreadable         |
//! | 5    | Engine/runtime error                               |
//! | 6    | One or more output artifacts failed to write       |

/// Success - command completed without errors.
pub const EXIT_SUCCESS: u8 = 0;

/// General error - unspecified failure.
/// Avoid using this; prefer a specific error code.
pub const EXIT_ERROR: u8 = 1;

/// Usage error - bad arguments, missing required options.
pub const EXIT_USAGE: u8 = 2;

/// Config file failed to parse or validate.
pub const EXIT_INVALID_CONFIG: u8 = 3;

/// A reference or input data file is absent or unreadable.
pub const EXIT_MISSING_INPUT: u8 = 4;

/// The engine reported an error (missing column, bad table).
pub const EXIT_RUNTIME: u8 = 5;

/// At least one output artifact could not be written. Remaining artifacts
/// were still attempted; per-artifact status is in the report.
pub const EXIT_ARTIFACT_WRITE: u8 = 6;
