use std::collections::{BTreeMap, BTreeSet, HashMap};

use serde::Serialize;

use crate::config::{DedupConfig, IdentityMode};

// ---------------------------------------------------------------------------
// Input
// ---------------------------------------------------------------------------

/// A single roster row as read from the source file. `None` marks a missing
/// value (absent column, empty cell or a null sentinel).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RawRecord {
    pub matricule: Option<String>,
    pub nom: Option<String>,
    pub prenom: Option<String>,
    pub sexe: Option<String>,
}

impl RawRecord {
    pub fn new(matricule: &str, nom: &str, prenom: &str, sexe: &str) -> Self {
        Self {
            matricule: Some(matricule.to_string()),
            nom: Some(nom.to_string()),
            prenom: Some(prenom.to_string()),
            sexe: Some(sexe.to_string()),
        }
    }
}

/// A roster row with its comparison keys derived. Read-only after
/// normalization.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Record {
    pub raw: RawRecord,
    pub cleaned_id: String,
    pub cleaned_last: String,
    pub cleaned_first: String,
    pub identity_key: String,
}

// ---------------------------------------------------------------------------
// Candidate groups
// ---------------------------------------------------------------------------

/// Which detector produced a candidate group.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Signal {
    /// Rows sharing a cleaned ID.
    Id,
    /// Rows naming the same person under more than one ID.
    Identity,
}

/// Positions believed duplicate under one signal. Positions are ascending.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CandidateGroup {
    pub signal: Signal,
    pub key: String,
    pub positions: Vec<usize>,
}

// ---------------------------------------------------------------------------
// Consolidated groups
// ---------------------------------------------------------------------------

pub type GroupId = u32;

/// Final duplicate groups keyed by group ID. Member positions are sorted and
/// unique.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConsolidatedGroups {
    pub groups: BTreeMap<GroupId, Vec<usize>>,
}

impl ConsolidatedGroups {
    pub fn len(&self) -> usize {
        self.groups.len()
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    /// Group of each flagged position. A position listed under several
    /// groups (possible with first-match merging) maps to the lowest ID.
    pub fn group_index(&self) -> HashMap<usize, GroupId> {
        let mut index = HashMap::new();
        for (&id, positions) in &self.groups {
            for &pos in positions {
                index.entry(pos).or_insert(id);
            }
        }
        index
    }

    /// Distinct positions across all groups.
    pub fn flagged_positions(&self) -> BTreeSet<usize> {
        self.groups.values().flatten().copied().collect()
    }
}

// ---------------------------------------------------------------------------
// Labels
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DuplicateCause {
    /// The row's cleaned ID is shared with another row.
    IdDuplicated,
    /// The row's name appears under more than one ID.
    MultiIdPerson,
    /// Grouped without a tracked signal.
    Generic,
}

impl DuplicateCause {
    /// Label written to the `Type_doublon` column.
    pub fn label(&self) -> &'static str {
        match self {
            Self::IdDuplicated => "MATRICULE DUPLIQUÉ",
            Self::MultiIdPerson => "ÉTUDIANT MULTI-MATRICULE",
            Self::Generic => "DOUBLON",
        }
    }
}

impl std::fmt::Display for DuplicateCause {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// Render a cause set the way the output column expects: labels sorted,
/// joined with `"; "`.
pub fn join_causes(causes: &BTreeSet<DuplicateCause>) -> String {
    let labels: BTreeSet<&str> = causes.iter().map(|c| c.label()).collect();
    labels.into_iter().collect::<Vec<_>>().join("; ")
}

/// One output row: the record plus its group and cause labels.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LabeledRecord {
    /// Position of the row in the input file (0-based, header excluded).
    pub position: usize,
    pub record: Record,
    pub group: Option<GroupId>,
    pub causes: BTreeSet<DuplicateCause>,
}

impl LabeledRecord {
    /// `Groupe` column: `G<id>` or empty.
    pub fn group_label(&self) -> String {
        self.group.map(|id| format!("G{id}")).unwrap_or_default()
    }

    /// `Type_doublon` column: joined cause labels or empty.
    pub fn cause_label(&self) -> String {
        join_causes(&self.causes)
    }
}

// ---------------------------------------------------------------------------
// Summary + Output
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DedupSummary {
    pub total_rows: usize,
    /// Rows that belong to a consolidated group.
    pub flagged_rows: usize,
    pub groups: usize,
    pub id_duplicate_groups: usize,
    pub multi_id_person_groups: usize,
    pub identity_mode: IdentityMode,
}

#[derive(Debug, Clone, Serialize)]
pub struct GroupReport {
    pub id: GroupId,
    pub label: String,
    pub positions: Vec<usize>,
    pub causes: BTreeSet<DuplicateCause>,
}

#[derive(Debug, Clone, Serialize)]
pub struct DedupMeta {
    pub engine_version: String,
    /// RFC 3339 timestamp of the run.
    pub run_at: String,
    /// Effective settings, flattened next to the version fields.
    #[serde(flatten)]
    pub config: DedupConfig,
}

#[derive(Debug, Clone, Serialize)]
pub struct DedupResult {
    pub meta: DedupMeta,
    pub summary: DedupSummary,
    pub groups: Vec<GroupReport>,
    /// Every input row in presentation order.
    #[serde(skip_serializing)]
    pub rows: Vec<LabeledRecord>,
}
