//! `rollcall-dedup` - duplicate-student detection engine.
//!
//! Pure engine crate: receives pre-loaded roster rows, returns labeled rows
//! and consolidated duplicate groups. No CSV or spreadsheet dependencies.

pub mod classify;
pub mod config;
pub mod engine;
pub mod error;
pub mod finder;
pub mod matcher;
pub mod merge;
pub mod model;
pub mod normalize;
pub mod similarity;
pub mod summary;

pub use config::{DedupConfig, FuzzyConfig, IdentityMode, MergeStrategy};
pub use engine::run;
pub use error::DedupError;
pub use model::{DedupResult, DuplicateCause, LabeledRecord, RawRecord, Record};
