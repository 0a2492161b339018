use super::buckets::{day_of, month_of, week_of, MonthKey, WeekKey};
use super::intern::IdentityStore;
use crate::model::{
    BranchStats, CommitDetail, CommitterShare, CommitterStats, DiffTotals, HistoryStats,
    RepoTotals, TagInfo,
};
use chrono::NaiveDate;
use std::collections::BTreeMap;

/// Percentage with the degenerate case pinned: a zero denominator is 0%,
/// never an error.
fn pct(part: u64, whole: u64) -> f64 {
    if whole == 0 {
        0.0
    } else {
        (part as f64 / whole as f64) * 100.0
    }
}

fn derive_week_month(
    days: &BTreeMap<NaiveDate, u64>,
) -> (BTreeMap<WeekKey, u64>, BTreeMap<MonthKey, u64>) {
    let mut weeks: BTreeMap<WeekKey, u64> = BTreeMap::new();
    let mut months: BTreeMap<MonthKey, u64> = BTreeMap::new();
    for (&day, &count) in days {
        *weeks.entry(week_of(day)).or_insert(0) += count;
        *months.entry(month_of(day)).or_insert(0) += count;
    }
    (weeks, months)
}

/// Consumes the fully-accumulated store and emits the immutable statistics
/// snapshot. All bucket maps and every percentage are derived here, after
/// accumulation has completely finished; running this once per pipeline is
/// what keeps finalization idempotent.
pub fn finalize(store: IdentityStore, diff_totals: DiffTotals) -> HistoryStats {
    let total_commits = store.commit_count() as u64;

    // repository-wide day buckets, week/month derived from days
    let mut repo_days: BTreeMap<NaiveDate, u64> = BTreeMap::new();
    for id in store.commit_ids() {
        if let Some(rec) = store.commit(id) {
            *repo_days.entry(day_of(&rec.info.committed_at)).or_insert(0) += 1;
        }
    }
    let (repo_weeks, repo_months) = derive_week_month(&repo_days);

    // per-committer commit counts and day buckets
    let mut per_committer: BTreeMap<String, (u64, BTreeMap<NaiveDate, u64>)> = BTreeMap::new();
    for id in store.commit_ids() {
        if let Some(rec) = store.commit(id) {
            let entry = per_committer
                .entry(rec.info.author_email.clone())
                .or_default();
            entry.0 += 1;
            *entry.1.entry(day_of(&rec.info.committed_at)).or_insert(0) += 1;
        }
    }

    let mut committers = Vec::with_capacity(store.committers().len());
    let mut emails: Vec<&String> = store.committers().keys().collect();
    emails.sort();
    for email in emails {
        let rec = &store.committers()[email];
        let (commit_count, days) = per_committer.remove(email).unwrap_or_default();

        // weeks and months come only from days this committer actually has
        let (weeks, months) = derive_week_month(&days);

        let day_pct: BTreeMap<NaiveDate, f64> = days
            .iter()
            .map(|(day, count)| (*day, pct(*count, repo_days.get(day).copied().unwrap_or(0))))
            .collect();
        let week_pct: BTreeMap<WeekKey, f64> = weeks
            .iter()
            .map(|(key, count)| (*key, pct(*count, repo_weeks.get(key).copied().unwrap_or(0))))
            .collect();
        let month_pct: BTreeMap<MonthKey, f64> = months
            .iter()
            .map(|(key, count)| (*key, pct(*count, repo_months.get(key).copied().unwrap_or(0))))
            .collect();

        committers.push(CommitterStats {
            name: rec.name.clone(),
            email: email.clone(),
            commits: commit_count,
            lines_added: rec.lines_added,
            lines_deleted: rec.lines_deleted,
            files_changed: rec.files_changed,
            commit_percentage: pct(commit_count, total_commits),
            lines_added_percentage: pct(rec.lines_added, diff_totals.lines_added),
            lines_deleted_percentage: pct(rec.lines_deleted, diff_totals.lines_deleted),
            files_changed_percentage: pct(rec.files_changed, diff_totals.files_changed),
            commits_per_day: days,
            commits_per_day_percentage: day_pct,
            commits_per_week: weeks,
            commits_per_week_percentage: week_pct,
            commits_per_month: months,
            commits_per_month_percentage: month_pct,
        });
    }

    // branch shares: the denominator is the sum of member counts over all
    // branches, so a commit on several branches counts once per branch
    let all_branch_members: u64 = store
        .branches()
        .values()
        .map(|b| b.member_ids.len() as u64)
        .sum();

    let mut branches = Vec::with_capacity(store.branches().len());
    for (name, branch) in store.branches() {
        let mut details = Vec::with_capacity(branch.member_ids.len());
        let mut counts: BTreeMap<String, u64> = BTreeMap::new();
        for id in &branch.member_ids {
            if let Some(rec) = store.commit(id) {
                *counts.entry(rec.info.author_email.clone()).or_insert(0) += 1;
                details.push(CommitDetail {
                    id: rec.info.id.clone(),
                    message: rec.info.message.clone(),
                    committed_at: rec.info.committed_at,
                    committer_email: rec.info.author_email.clone(),
                    tag: rec.tag.clone(),
                });
            }
        }

        let member_count = details.len() as u64;
        let committer_shares = counts
            .into_iter()
            .map(|(email, commits)| CommitterShare {
                email,
                commits,
                percentage: pct(commits, member_count),
            })
            .collect();

        branches.push(BranchStats {
            name: name.clone(),
            first_author_date: branch.first_author_date,
            last_commit_date: branch.last_commit_date,
            commit_percentage: pct(member_count, all_branch_members),
            commits: details,
            committer_shares,
        });
    }

    // tags whose target never resolved to a known commit are dropped
    let tags: Vec<TagInfo> = store
        .tags()
        .iter()
        .filter(|(_, target)| store.commit(target).is_some())
        .map(|(name, target)| TagInfo {
            name: name.clone(),
            commit_id: target.clone(),
        })
        .collect();

    let totals = RepoTotals {
        commits: total_commits,
        branches: branches.len() as u64,
        tags: tags.len() as u64,
        committers: committers.len() as u64,
        lines_added: diff_totals.lines_added,
        lines_deleted: diff_totals.lines_deleted,
        files_changed: diff_totals.files_changed,
    };

    HistoryStats {
        totals,
        committers,
        branches,
        tags,
        commits_per_day: repo_days,
        commits_per_week: repo_weeks,
        commits_per_month: repo_months,
    }
}
