use std::collections::{BTreeMap, BTreeSet, HashMap};

use crate::config::MergeStrategy;
use crate::model::{CandidateGroup, ConsolidatedGroups, GroupId};

/// Consolidate candidate groups into numbered duplicate groups.
///
/// Candidates are consumed in order (ID-based first, then identity-based, by
/// convention of the caller). Group IDs start at 1 and are never reused.
pub fn merge_candidates<'a, I>(candidates: I, strategy: MergeStrategy) -> ConsolidatedGroups
where
    I: IntoIterator<Item = &'a CandidateGroup>,
{
    let mut merger = GroupMerger::new(strategy);
    for candidate in candidates {
        merger.add(&candidate.positions);
    }
    merger.finish()
}

/// Incremental merger. Owns the group-ID counter for one run.
pub struct GroupMerger {
    state: MergerState,
}

enum MergerState {
    FirstMatch(FirstMatchMerger),
    UnionFind(UnionFindMerger),
}

impl GroupMerger {
    pub fn new(strategy: MergeStrategy) -> Self {
        let state = match strategy {
            MergeStrategy::FirstMatch => MergerState::FirstMatch(FirstMatchMerger::new()),
            MergeStrategy::UnionFind => MergerState::UnionFind(UnionFindMerger::new()),
        };
        Self { state }
    }

    pub fn add(&mut self, positions: &[usize]) {
        match &mut self.state {
            MergerState::FirstMatch(m) => m.add(positions),
            MergerState::UnionFind(m) => m.add(positions),
        }
    }

    pub fn finish(self) -> ConsolidatedGroups {
        match self.state {
            MergerState::FirstMatch(m) => m.finish(),
            MergerState::UnionFind(m) => m.finish(),
        }
    }
}

// ---------------------------------------------------------------------------
// First-match
// ---------------------------------------------------------------------------

/// A candidate joins the lowest-numbered group it overlaps, or opens a new
/// group. Existing groups are never merged with each other, so a candidate
/// bridging two groups leaves the shared positions in both.
struct FirstMatchMerger {
    next_id: GroupId,
    groups: BTreeMap<GroupId, BTreeSet<usize>>,
}

impl FirstMatchMerger {
    fn new() -> Self {
        Self {
            next_id: 1,
            groups: BTreeMap::new(),
        }
    }

    fn add(&mut self, positions: &[usize]) {
        if positions.is_empty() {
            return;
        }

        let target = self
            .groups
            .iter()
            .find(|(_, members)| positions.iter().any(|pos| members.contains(pos)))
            .map(|(&id, _)| id);

        match target {
            Some(id) => {
                if let Some(members) = self.groups.get_mut(&id) {
                    members.extend(positions.iter().copied());
                }
            }
            None => {
                self.groups
                    .insert(self.next_id, positions.iter().copied().collect());
                self.next_id += 1;
            }
        }
    }

    fn finish(self) -> ConsolidatedGroups {
        ConsolidatedGroups {
            groups: self
                .groups
                .into_iter()
                .map(|(id, members)| (id, members.into_iter().collect()))
                .collect(),
        }
    }
}

// ---------------------------------------------------------------------------
// Union-find
// ---------------------------------------------------------------------------

/// Every candidate unions its positions; IDs are handed out at the end in the
/// order components were first seen, so runs without bridging candidates
/// number their groups exactly like first-match.
struct UnionFindMerger {
    sets: DisjointSet,
    /// Positions in first-seen order.
    seen: Vec<usize>,
    next_id: GroupId,
}

impl UnionFindMerger {
    fn new() -> Self {
        Self {
            sets: DisjointSet::default(),
            seen: Vec::new(),
            next_id: 1,
        }
    }

    fn add(&mut self, positions: &[usize]) {
        let Some(&first) = positions.first() else {
            return;
        };
        for &pos in positions {
            if self.sets.insert(pos) {
                self.seen.push(pos);
            }
            self.sets.union(first, pos);
        }
    }

    fn finish(mut self) -> ConsolidatedGroups {
        let mut id_of_root: HashMap<usize, GroupId> = HashMap::new();
        let mut groups: BTreeMap<GroupId, Vec<usize>> = BTreeMap::new();

        for &pos in &self.seen {
            let root = self.sets.find(pos);
            let id = *id_of_root.entry(root).or_insert_with(|| {
                let id = self.next_id;
                self.next_id += 1;
                id
            });
            groups.entry(id).or_default().push(pos);
        }

        for members in groups.values_mut() {
            members.sort_unstable();
        }

        ConsolidatedGroups { groups }
    }
}

/// Disjoint-set forest over sparse positions, with path compression and
/// union by rank.
#[derive(Debug, Default)]
pub struct DisjointSet {
    parent: HashMap<usize, usize>,
    rank: HashMap<usize, u8>,
}

impl DisjointSet {
    /// Add `x` as a singleton. Returns false if it was already present.
    pub fn insert(&mut self, x: usize) -> bool {
        if self.parent.contains_key(&x) {
            return false;
        }
        self.parent.insert(x, x);
        self.rank.insert(x, 0);
        true
    }

    /// Representative of `x`'s set. Unknown elements are inserted first.
    pub fn find(&mut self, x: usize) -> usize {
        self.insert(x);

        let mut root = x;
        while let Some(&parent) = self.parent.get(&root) {
            if parent == root {
                break;
            }
            root = parent;
        }

        let mut node = x;
        while node != root {
            let next = self.parent[&node];
            self.parent.insert(node, root);
            node = next;
        }

        root
    }

    pub fn union(&mut self, a: usize, b: usize) {
        let ra = self.find(a);
        let rb = self.find(b);
        if ra == rb {
            return;
        }

        let rank_a = self.rank[&ra];
        let rank_b = self.rank[&rb];
        if rank_a < rank_b {
            self.parent.insert(ra, rb);
        } else if rank_a > rank_b {
            self.parent.insert(rb, ra);
        } else {
            self.parent.insert(rb, ra);
            self.rank.insert(ra, rank_a + 1);
        }
    }
}
