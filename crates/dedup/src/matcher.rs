use std::collections::{BTreeMap, HashSet};

use log::debug;

use crate::config::{DedupConfig, FuzzyConfig, IdentityMode};
use crate::model::{CandidateGroup, Record, Signal};
use crate::similarity::ratio;

/// Find people listed under more than one matricule, using the configured
/// identity mode.
pub fn find_identity_duplicates(records: &[Record], config: &DedupConfig) -> Vec<CandidateGroup> {
    let groups = match config.identity_mode {
        IdentityMode::Exact => match_exact_identity(records),
        IdentityMode::Fuzzy => match_fuzzy_identity(records, &config.fuzzy),
    };
    debug!(
        "identity matcher ({}): {} multi-matricule group(s)",
        config.identity_mode,
        groups.len()
    );
    groups
}

/// Group by identical identity key, keeping groups that span two or more
/// distinct cleaned IDs. Groups are keyed and ordered by identity key.
pub fn match_exact_identity(records: &[Record]) -> Vec<CandidateGroup> {
    let mut by_key: BTreeMap<&str, Vec<usize>> = BTreeMap::new();
    for (pos, record) in records.iter().enumerate() {
        by_key.entry(&record.identity_key).or_default().push(pos);
    }

    by_key
        .into_iter()
        .filter(|(_, positions)| spans_multiple_ids(records, positions))
        .map(|(key, positions)| CandidateGroup {
            signal: Signal::Identity,
            key: key.to_string(),
            positions,
        })
        .collect()
}

/// Windowed greedy clustering over identity keys.
///
/// Rows are sorted by identity key. Each unvisited row becomes an anchor and
/// is compared with the next `window` sorted rows that are not yet visited;
/// every row whose similarity to the anchor is above `threshold` joins the
/// anchor's group and is marked visited, even if the group is later dropped
/// for using a single matricule. Rows further apart than the window are never
/// compared, so this trades completeness for a linear number of comparisons.
///
/// Groups are keyed `ETU_1`, `ETU_2`, ... in discovery order.
pub fn match_fuzzy_identity(records: &[Record], fuzzy: &FuzzyConfig) -> Vec<CandidateGroup> {
    let mut sorted: Vec<usize> = (0..records.len()).collect();
    sorted.sort_by(|&a, &b| records[a].identity_key.cmp(&records[b].identity_key));

    let mut visited = vec![false; sorted.len()];
    let mut groups = Vec::new();
    let mut comparisons: usize = 0;

    for slot in 0..sorted.len() {
        if visited[slot] {
            continue;
        }
        visited[slot] = true;

        let anchor = &records[sorted[slot]].identity_key;
        let mut members = vec![sorted[slot]];

        let end = sorted.len().min(slot.saturating_add(1).saturating_add(fuzzy.window));
        for other in (slot + 1)..end {
            if visited[other] {
                continue;
            }
            comparisons += 1;
            if ratio(anchor, &records[sorted[other]].identity_key) > fuzzy.threshold {
                members.push(sorted[other]);
                visited[other] = true;
            }
        }

        if members.len() > 1 && spans_multiple_ids(records, &members) {
            members.sort_unstable();
            groups.push(CandidateGroup {
                signal: Signal::Identity,
                key: format!("ETU_{}", groups.len() + 1),
                positions: members,
            });
        }
    }

    debug!(
        "fuzzy matcher: {} comparison(s) over {} row(s), window {}",
        comparisons,
        records.len(),
        fuzzy.window
    );
    groups
}

fn spans_multiple_ids(records: &[Record], positions: &[usize]) -> bool {
    let ids: HashSet<&str> = positions
        .iter()
        .map(|&pos| records[pos].cleaned_id.as_str())
        .collect();
    ids.len() > 1
}
