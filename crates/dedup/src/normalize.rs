use std::sync::LazyLock;

use regex::Regex;
use unicode_normalization::char::is_combining_mark;
use unicode_normalization::UnicodeNormalization;

use crate::model::{RawRecord, Record};

/// Separator between last and first name in an identity key.
pub const IDENTITY_SEPARATOR: &str = " | ";

/// `-ANNULE` / `–ANNULE` and everything after it, any case.
static CANCELLATION_SUFFIX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)[-–]ANNULE.*$").expect("cancellation pattern is valid"));

/// Canonical form of a matricule: cancellation suffix removed, trimmed,
/// uppercased. A missing value becomes the empty string.
pub fn clean_id(raw: Option<&str>) -> String {
    let raw = raw.unwrap_or("");
    CANCELLATION_SUFFIX.replace(raw, "").trim().to_uppercase()
}

/// Canonical form of a name: trimmed, uppercased, diacritics removed.
pub fn clean_name(raw: Option<&str>) -> String {
    strip_diacritics(&raw.unwrap_or("").trim().to_uppercase())
}

/// Drop combining marks after canonical decomposition ("É" -> "E").
pub fn strip_diacritics(s: &str) -> String {
    s.nfd().filter(|c| !is_combining_mark(*c)).collect()
}

pub fn identity_key(cleaned_last: &str, cleaned_first: &str) -> String {
    format!("{cleaned_last}{IDENTITY_SEPARATOR}{cleaned_first}")
}

/// Derive comparison keys for one row. Never fails.
pub fn normalize(raw: RawRecord) -> Record {
    let cleaned_id = clean_id(raw.matricule.as_deref());
    let cleaned_last = clean_name(raw.nom.as_deref());
    let cleaned_first = clean_name(raw.prenom.as_deref());
    let identity_key = identity_key(&cleaned_last, &cleaned_first);

    Record {
        raw,
        cleaned_id,
        cleaned_last,
        cleaned_first,
        identity_key,
    }
}

pub fn normalize_all(rows: Vec<RawRecord>) -> Vec<Record> {
    rows.into_iter().map(normalize).collect()
}
