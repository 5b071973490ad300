use log::{debug, info};

use crate::classify::{group_reports, label_records};
use crate::config::DedupConfig;
use crate::error::DedupError;
use crate::finder::find_id_duplicates;
use crate::matcher::find_identity_duplicates;
use crate::merge::merge_candidates;
use crate::model::{DedupMeta, DedupResult, RawRecord};
use crate::normalize::normalize_all;
use crate::summary::compute_summary;

/// Run duplicate detection per config. Returns labeled rows, groups and
/// summary.
pub fn run(config: &DedupConfig, rows: Vec<RawRecord>) -> Result<DedupResult, DedupError> {
    config.validate()?;

    let records = normalize_all(rows);
    let total_rows = records.len();
    debug!("normalized {total_rows} row(s)");

    let id_groups = find_id_duplicates(&records, config.group_blank_ids);
    let identity_groups = find_identity_duplicates(&records, config);

    // ID-based candidates first: they claim the low group numbers.
    let consolidated = merge_candidates(
        id_groups.iter().chain(identity_groups.iter()),
        config.merge_strategy,
    );

    let summary = compute_summary(
        total_rows,
        &id_groups,
        &identity_groups,
        &consolidated,
        config.identity_mode,
    );
    let rows = label_records(
        records,
        id_groups.iter().chain(identity_groups.iter()),
        &consolidated,
    );
    let groups = group_reports(&consolidated, &rows);

    info!(
        "{} row(s): {} duplicate group(s) covering {} row(s) ({} repeated matricule(s), {} multi-matricule student(s))",
        summary.total_rows,
        summary.groups,
        summary.flagged_rows,
        summary.id_duplicate_groups,
        summary.multi_id_person_groups,
    );

    Ok(DedupResult {
        meta: DedupMeta {
            engine_version: env!("CARGO_PKG_VERSION").to_string(),
            run_at: chrono::Utc::now().to_rfc3339(),
            config: config.clone(),
        },
        summary,
        groups,
        rows,
    })
}
