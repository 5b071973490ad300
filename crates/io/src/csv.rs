// Roster CSV import

use std::path::Path;

use log::{debug, warn};
use rollcall_dedup::RawRecord;

use crate::error::IoError;

/// Field separator of roster exports.
pub const ROSTER_DELIMITER: u8 = b';';

/// Required columns, in output order.
pub const ROSTER_COLUMNS: [&str; 4] = ["matricule", "nom", "prenom", "sexe"];

const UTF8_BOM: &[u8] = b"\xEF\xBB\xBF";

/// Cell values read as missing.
const NULL_SENTINELS: [&str; 3] = ["NULL", "", " "];

pub fn import_roster(path: &Path) -> Result<Vec<RawRecord>, IoError> {
    let content = read_file_as_utf8(path)?;
    let rows = parse_roster(&content)?;
    debug!("{}: {} roster row(s)", path.display(), rows.len());
    Ok(rows)
}

/// Read file and convert to UTF-8 if needed. A leading byte-order mark is
/// dropped; bytes that are not valid UTF-8 are decoded as Windows-1252.
pub fn read_file_as_utf8(path: &Path) -> Result<String, IoError> {
    let bytes = std::fs::read(path).map_err(|source| IoError::Read {
        path: path.to_path_buf(),
        source,
    })?;

    let bytes = if bytes.starts_with(UTF8_BOM) {
        bytes[UTF8_BOM.len()..].to_vec()
    } else {
        bytes
    };

    // Try UTF-8 first; on failure, recover the buffer from the error
    match String::from_utf8(bytes) {
        Ok(s) => Ok(s),
        Err(e) => {
            warn!("{} is not valid UTF-8, decoding as Windows-1252", path.display());
            let bytes = e.into_bytes();
            let (decoded, _, _) = encoding_rs::WINDOWS_1252.decode(&bytes);
            Ok(decoded.into_owned())
        }
    }
}

/// Parse `;`-separated roster text. Header names are matched after trimming,
/// ignoring case; extra columns are ignored. Short rows read their missing
/// trailing fields as missing values. Rows made only of separators are kept
/// with every field missing; only truly empty lines are skipped.
pub fn parse_roster(content: &str) -> Result<Vec<RawRecord>, IoError> {
    let mut reader = csv::ReaderBuilder::new()
        .delimiter(ROSTER_DELIMITER)
        .has_headers(true)
        .flexible(true)
        .from_reader(content.as_bytes());

    let headers = reader.headers()?.clone();
    let [matricule, nom, prenom, sexe] = column_indices(&headers)?;

    let mut rows = Vec::new();
    for result in reader.records() {
        let record = result?;
        rows.push(RawRecord {
            matricule: field(&record, matricule),
            nom: field(&record, nom),
            prenom: field(&record, prenom),
            sexe: field(&record, sexe),
        });
    }
    Ok(rows)
}

fn column_indices(headers: &csv::StringRecord) -> Result<[usize; 4], IoError> {
    let mut indices = [0usize; 4];
    for (slot, name) in indices.iter_mut().zip(ROSTER_COLUMNS) {
        *slot = headers
            .iter()
            .position(|h| h.trim().eq_ignore_ascii_case(name))
            .ok_or(IoError::MissingColumn(name))?;
    }
    Ok(indices)
}

fn field(record: &csv::StringRecord, index: usize) -> Option<String> {
    record
        .get(index)
        .filter(|value| !NULL_SENTINELS.contains(value))
        .map(str::to_string)
}
