use crate::config::IdentityMode;
use crate::model::{CandidateGroup, ConsolidatedGroups, DedupSummary};

/// Compute run statistics from the candidate and consolidated groups.
pub fn compute_summary(
    total_rows: usize,
    id_groups: &[CandidateGroup],
    identity_groups: &[CandidateGroup],
    consolidated: &ConsolidatedGroups,
    identity_mode: IdentityMode,
) -> DedupSummary {
    DedupSummary {
        total_rows,
        flagged_rows: consolidated.flagged_positions().len(),
        groups: consolidated.len(),
        id_duplicate_groups: id_groups.len(),
        multi_id_person_groups: identity_groups.len(),
        identity_mode,
    }
}
