use std::cmp::Ordering;
use std::collections::{BTreeSet, HashMap};

use crate::model::{
    CandidateGroup, ConsolidatedGroups, DuplicateCause, GroupReport, LabeledRecord, Record, Signal,
};

/// Label every record and return them in presentation order.
///
/// Grouped rows get `IdDuplicated` if they sit in an ID-based candidate,
/// `MultiIdPerson` if they sit in an identity-based candidate, and `Generic`
/// if neither signal was tracked for them. Ungrouped rows get no label.
pub fn label_records<'a, I>(
    records: Vec<Record>,
    candidates: I,
    consolidated: &ConsolidatedGroups,
) -> Vec<LabeledRecord>
where
    I: IntoIterator<Item = &'a CandidateGroup>,
{
    let signals = signals_by_position(candidates);
    let group_of = consolidated.group_index();

    let mut rows: Vec<LabeledRecord> = records
        .into_iter()
        .enumerate()
        .map(|(position, record)| {
            let group = group_of.get(&position).copied();
            let causes = match group {
                Some(_) => causes_for(signals.get(&position)),
                None => BTreeSet::new(),
            };
            LabeledRecord {
                position,
                record,
                group,
                causes,
            }
        })
        .collect();

    sort_rows(&mut rows);
    rows
}

fn signals_by_position<'a, I>(candidates: I) -> HashMap<usize, BTreeSet<DuplicateCause>>
where
    I: IntoIterator<Item = &'a CandidateGroup>,
{
    let mut signals: HashMap<usize, BTreeSet<DuplicateCause>> = HashMap::new();
    for candidate in candidates {
        let cause = match candidate.signal {
            Signal::Id => DuplicateCause::IdDuplicated,
            Signal::Identity => DuplicateCause::MultiIdPerson,
        };
        for &position in &candidate.positions {
            signals.entry(position).or_default().insert(cause);
        }
    }
    signals
}

fn causes_for(tracked: Option<&BTreeSet<DuplicateCause>>) -> BTreeSet<DuplicateCause> {
    match tracked {
        Some(causes) if !causes.is_empty() => causes.clone(),
        _ => BTreeSet::from([DuplicateCause::Generic]),
    }
}

/// Presentation order: group ascending (ungrouped last), then cleaned last
/// name, cleaned first name, raw matricule (missing last). Full ties keep
/// input order.
///
/// Groups compare by number, so `G2` precedes `G10` and ungrouped rows trail.
/// Sorting on the rendered `Groupe` text would put blank rows first and `G10`
/// before `G2`; that ordering is intentionally not reproduced.
pub fn sort_rows(rows: &mut [LabeledRecord]) {
    rows.sort_by(|a, b| {
        (a.group.is_none(), a.group)
            .cmp(&(b.group.is_none(), b.group))
            .then_with(|| a.record.cleaned_last.cmp(&b.record.cleaned_last))
            .then_with(|| a.record.cleaned_first.cmp(&b.record.cleaned_first))
            .then_with(|| {
                missing_last(
                    a.record.raw.matricule.as_deref(),
                    b.record.raw.matricule.as_deref(),
                )
            })
    });
}

fn missing_last(a: Option<&str>, b: Option<&str>) -> Ordering {
    match (a, b) {
        (Some(a), Some(b)) => a.cmp(b),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

/// One report per consolidated group, with the union of its members' causes.
pub fn group_reports(consolidated: &ConsolidatedGroups, rows: &[LabeledRecord]) -> Vec<GroupReport> {
    consolidated
        .groups
        .iter()
        .map(|(&id, positions)| {
            let causes = rows
                .iter()
                .filter(|row| row.group == Some(id))
                .flat_map(|row| row.causes.iter().copied())
                .collect();
            GroupReport {
                id,
                label: format!("G{id}"),
                positions: positions.clone(),
                causes,
            }
        })
        .collect()
}
