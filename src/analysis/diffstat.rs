use super::intern::IdentityStore;
use super::PhaseOutcome;
use crate::error::Result;
use crate::model::DiffTotals;

/// Seam to the backend's tree diffing. `old` is `None` for a diff against the
/// empty tree. Rename detection is the implementor's responsibility.
pub trait TreeDiffer {
    fn diff(&self, old: Option<&str>, new: &str) -> Result<DiffTotals>;
}

/// Walks all known commits in chronological order and diffs each adjacent
/// pair, charging added/deleted lines and changed-file counts to the later
/// commit's committer. Returns the repository-wide totals, which accumulate
/// across pairs only.
///
/// Genesis policy: the first commit's initial content (a diff against
/// nothing) is charged to the *second* commit's committer and kept out of the
/// repository totals. A single-commit history diffs nothing and charges
/// nothing.
pub fn aggregate(store: &mut IdentityStore, differ: &dyn TreeDiffer) -> (DiffTotals, PhaseOutcome) {
    let mut ordered: Vec<(chrono::DateTime<chrono::Utc>, String, String)> = store
        .commit_ids()
        .iter()
        .filter_map(|id| store.commit(id))
        .map(|rec| {
            (
                rec.info.committed_at,
                rec.info.id.clone(),
                rec.info.author_email.clone(),
            )
        })
        .collect();
    // commit time ascending, id as the stable tie-break
    ordered.sort_by(|a, b| a.0.cmp(&b.0).then_with(|| a.1.cmp(&b.1)));

    let mut totals = DiffTotals::default();
    if ordered.len() < 2 {
        return (totals, PhaseOutcome::Ok);
    }

    let mut attempted = 0usize;
    let mut failed = 0usize;

    match differ.diff(None, &ordered[0].1) {
        Ok(genesis) => charge_genesis(store, &ordered[1].2, genesis),
        Err(_) => failed += 1,
    }
    attempted += 1;

    for pair in ordered.windows(2) {
        let (_, prev_id, _) = &pair[0];
        let (_, next_id, next_email) = &pair[1];
        attempted += 1;

        let delta = match differ.diff(Some(prev_id), next_id) {
            Ok(delta) => delta,
            Err(_) => {
                failed += 1;
                continue;
            }
        };

        if let Some(committer) = store.committer_mut(next_email) {
            committer.lines_added += delta.lines_added;
            committer.lines_deleted += delta.lines_deleted;
            committer.files_changed += delta.files_changed;
        }
        totals.lines_added += delta.lines_added;
        totals.lines_deleted += delta.lines_deleted;
        totals.files_changed += delta.files_changed;
    }

    let outcome = if failed == 0 {
        PhaseOutcome::Ok
    } else if failed == attempted {
        PhaseOutcome::Failed(format!("all {attempted} diffs failed"))
    } else {
        PhaseOutcome::Partial(format!("{failed} of {attempted} diffs failed"))
    };
    (totals, outcome)
}

/// Lines present at repository genesis, charged to whoever made the next
/// commit. Kept exactly as the historical behavior; see DESIGN.md.
fn charge_genesis(store: &mut IdentityStore, second_email: &str, genesis: DiffTotals) {
    if let Some(committer) = store.committer_mut(second_email) {
        committer.lines_added += genesis.lines_added;
    }
}
