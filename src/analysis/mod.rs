pub mod buckets;
pub mod diffstat;
pub mod exec;
pub mod finalize;
pub mod intern;
pub mod membership;

pub use diffstat::TreeDiffer;
pub use exec::exec;
pub use intern::IdentityStore;

use crate::model::{History, HistoryStats};
use std::collections::BTreeMap;
use std::fmt;

/// How one analysis phase went. The orchestrating caller decides what to do
/// with non-Ok outcomes; downstream phases always run with whatever partial
/// data exists.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PhaseOutcome {
    Ok,
    Partial(String),
    Failed(String),
}

impl PhaseOutcome {
    pub fn is_ok(&self) -> bool {
        matches!(self, PhaseOutcome::Ok)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Ingest,
    Membership,
    DiffAggregation,
    Finalize,
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Phase::Ingest => "ingest",
            Phase::Membership => "branch membership",
            Phase::DiffAggregation => "diff aggregation",
            Phase::Finalize => "finalize",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone)]
pub struct PhaseReport {
    pub phase: Phase,
    pub outcome: PhaseOutcome,
}

pub struct PipelineResult {
    pub stats: HistoryStats,
    pub phases: Vec<PhaseReport>,
}

/// Interns everything the backend reported. Tags are interned first (sorted
/// by ref name) so that a commit carrying several tags deterministically
/// keeps the lexicographically first one.
pub fn ingest(history: &History, store: &mut IdentityStore) -> PhaseOutcome {
    let mut skipped = 0usize;

    let mut sorted_tags: Vec<_> = history.tags.iter().collect();
    sorted_tags.sort_by(|a, b| a.name.cmp(&b.name));
    let mut tag_by_target: BTreeMap<&str, &str> = BTreeMap::new();
    for tag in &sorted_tags {
        if tag.name.is_empty() || tag.target_id.is_empty() {
            skipped += 1;
            continue;
        }
        store.intern_tag(&tag.name, &tag.target_id);
        tag_by_target.entry(&tag.target_id).or_insert(&tag.name);
    }

    for commit in &history.commits {
        if commit.id.is_empty() {
            skipped += 1;
            continue;
        }
        store.intern_committer(&commit.author_name, &commit.author_email);
        let record = store.intern_commit(commit.clone());
        if record.tag.is_none() {
            record.tag = tag_by_target.get(commit.id.as_str()).map(|t| t.to_string());
        }
    }

    for branch in &history.branches {
        if branch.name.is_empty() {
            skipped += 1;
            continue;
        }
        store.intern_branch(&branch.name, &branch.tip_id);
    }

    if skipped > 0 {
        PhaseOutcome::Partial(format!("{skipped} malformed entries skipped"))
    } else {
        PhaseOutcome::Ok
    }
}

/// Runs the whole pipeline: ingest, branch membership, diff aggregation,
/// finalize. Stages run strictly in order; each consumes the complete output
/// of the one before it.
pub fn run_pipeline(history: &History, differ: &dyn TreeDiffer) -> PipelineResult {
    let mut store = IdentityStore::new();
    let mut phases = Vec::with_capacity(4);

    let outcome = ingest(history, &mut store);
    phases.push(PhaseReport {
        phase: Phase::Ingest,
        outcome,
    });

    let outcome = membership::resolve(&mut store);
    phases.push(PhaseReport {
        phase: Phase::Membership,
        outcome,
    });

    let (totals, outcome) = diffstat::aggregate(&mut store, differ);
    phases.push(PhaseReport {
        phase: Phase::DiffAggregation,
        outcome,
    });

    let stats = finalize::finalize(store, totals);
    phases.push(PhaseReport {
        phase: Phase::Finalize,
        outcome: PhaseOutcome::Ok,
    });

    PipelineResult { stats, phases }
}
