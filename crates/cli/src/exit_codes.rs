//! CLI Exit Code Registry
//!
//! This is the single source of truth for all CLI exit codes.
//! Scripts rely on these values.
//!
//! | Code | Meaning                                              |
//! |------|------------------------------------------------------|
//! | 0    | Success (duplicates found or not)                    |
//! | 2    | Usage error (bad arguments)                          |
//! | 3    | Input file not found                                 |
//! | 4    | Invalid configuration (file or overrides)            |
//! | 5    | Roster could not be read or parsed                   |
//! | 6    | Output could not be written                          |

/// Success - command completed without errors.
pub const EXIT_SUCCESS: u8 = 0;

/// Usage error - bad arguments, missing required options.
pub const EXIT_USAGE: u8 = 2;

/// Input path does not exist. Checked before any processing.
pub const EXIT_MISSING_INPUT: u8 = 3;

/// Config file unreadable, malformed, or values out of range.
pub const EXIT_CONFIG: u8 = 4;

/// Roster unreadable, not CSV, or missing a required column.
pub const EXIT_INPUT_PARSE: u8 = 5;

/// Workbook or JSON report could not be written.
pub const EXIT_EXPORT: u8 = 6;
