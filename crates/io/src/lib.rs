// Roster import and report export

pub mod csv;
pub mod error;
pub mod json;
pub mod xlsx;

pub use error::IoError;
