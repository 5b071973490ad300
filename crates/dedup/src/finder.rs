use std::collections::BTreeMap;

use log::debug;

use crate::model::{CandidateGroup, Record, Signal};

/// Group positions sharing a cleaned ID. Only IDs held by two or more rows
/// produce a group; groups come out ordered by ID.
///
/// Rows with an empty cleaned ID collide with each other unless
/// `group_blank_ids` is false, in which case they are never ID-grouped.
pub fn find_id_duplicates(records: &[Record], group_blank_ids: bool) -> Vec<CandidateGroup> {
    let mut by_id: BTreeMap<&str, Vec<usize>> = BTreeMap::new();
    for (pos, record) in records.iter().enumerate() {
        if record.cleaned_id.is_empty() && !group_blank_ids {
            continue;
        }
        by_id.entry(&record.cleaned_id).or_default().push(pos);
    }

    let groups: Vec<CandidateGroup> = by_id
        .into_iter()
        .filter(|(_, positions)| positions.len() > 1)
        .map(|(id, positions)| CandidateGroup {
            signal: Signal::Id,
            key: id.to_string(),
            positions,
        })
        .collect();

    debug!("id finder: {} repeated matricule(s)", groups.len());
    groups
}
