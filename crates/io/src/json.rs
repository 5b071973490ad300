// JSON run report

use std::fs::File;
use std::io::BufWriter;
use std::path::Path;

use rollcall_dedup::DedupResult;

use crate::error::IoError;

/// Write the run report (meta, summary, groups) as pretty-printed JSON.
/// Labeled rows are not part of the report.
pub fn export(result: &DedupResult, path: &Path) -> Result<(), IoError> {
    let file = File::create(path).map_err(|source| IoError::Write {
        path: path.to_path_buf(),
        source,
    })?;
    let writer = BufWriter::new(file);
    serde_json::to_writer_pretty(writer, result)?;
    Ok(())
}
