use crate::analysis::buckets::{MonthKey, WeekKey};
use chrono::{DateTime, NaiveDate, Utc};
use serde::Serialize;
use std::collections::BTreeMap;

pub const SCHEMA_VERSION: u32 = 1;

/// One commit as reported by the backend, before any aggregation.
#[derive(Debug, Clone)]
pub struct CommitInfo {
    pub id: String,
    pub parent_ids: Vec<String>,
    pub author_name: String,
    pub author_email: String,
    pub authored_at: DateTime<Utc>,
    pub committed_at: DateTime<Utc>,
    pub message: String,
}

/// A branch ref with its peeled tip.
#[derive(Debug, Clone)]
pub struct BranchRef {
    pub name: String,
    pub tip_id: String,
}

/// A tag ref peeled to the commit it ultimately points at.
#[derive(Debug, Clone)]
pub struct TagRef {
    pub name: String,
    pub target_id: String,
}

/// Everything the backend yields for one analysis run.
#[derive(Debug, Clone, Default)]
pub struct History {
    pub branches: Vec<BranchRef>,
    pub commits: Vec<CommitInfo>,
    pub tags: Vec<TagRef>,
}

/// Summed outcome of diffing two snapshots.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DiffTotals {
    pub lines_added: u64,
    pub lines_deleted: u64,
    pub files_changed: u64,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct RepoTotals {
    pub commits: u64,
    pub branches: u64,
    pub tags: u64,
    pub committers: u64,
    pub lines_added: u64,
    pub lines_deleted: u64,
    pub files_changed: u64,
}

#[derive(Debug, Clone, Serialize)]
pub struct CommitterStats {
    pub name: String,
    pub email: String,
    pub commits: u64,
    pub lines_added: u64,
    pub lines_deleted: u64,
    pub files_changed: u64,
    pub commit_percentage: f64,
    pub lines_added_percentage: f64,
    pub lines_deleted_percentage: f64,
    pub files_changed_percentage: f64,
    pub commits_per_day: BTreeMap<NaiveDate, u64>,
    pub commits_per_day_percentage: BTreeMap<NaiveDate, f64>,
    pub commits_per_week: BTreeMap<WeekKey, u64>,
    pub commits_per_week_percentage: BTreeMap<WeekKey, f64>,
    pub commits_per_month: BTreeMap<MonthKey, u64>,
    pub commits_per_month_percentage: BTreeMap<MonthKey, f64>,
}

/// Per-commit detail as seen through a branch's member list.
#[derive(Debug, Clone, Serialize)]
pub struct CommitDetail {
    pub id: String,
    pub message: String,
    pub committed_at: DateTime<Utc>,
    pub committer_email: String,
    pub tag: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct CommitterShare {
    pub email: String,
    pub commits: u64,
    pub percentage: f64,
}

#[derive(Debug, Clone, Serialize)]
pub struct BranchStats {
    pub name: String,
    pub first_author_date: Option<DateTime<Utc>>,
    pub last_commit_date: Option<DateTime<Utc>>,
    pub commit_percentage: f64,
    pub commits: Vec<CommitDetail>,
    pub committer_shares: Vec<CommitterShare>,
}

#[derive(Debug, Clone, Serialize)]
pub struct TagInfo {
    pub name: String,
    pub commit_id: String,
}

/// The immutable result of a full history analysis.
#[derive(Debug, Clone, Serialize)]
pub struct HistoryStats {
    pub totals: RepoTotals,
    pub committers: Vec<CommitterStats>,
    pub branches: Vec<BranchStats>,
    pub tags: Vec<TagInfo>,
    pub commits_per_day: BTreeMap<NaiveDate, u64>,
    pub commits_per_week: BTreeMap<WeekKey, u64>,
    pub commits_per_month: BTreeMap<MonthKey, u64>,
}

/// Files and physical lines per extension in the working tree.
#[derive(Debug, Clone, Serialize)]
pub struct ExtensionStats {
    pub extension: String,
    pub files: u64,
    pub lines: u64,
}

#[derive(Debug, Clone, Serialize)]
pub struct AnalyzeOutput {
    pub version: u32,
    pub generated_at: DateTime<Utc>,
    pub repository_path: String,
    pub repository_name: String,
    pub stats: HistoryStats,
    pub files: Vec<ExtensionStats>,
    pub total_files: u64,
    pub total_lines: u64,
}

#[derive(Debug, Clone, Serialize)]
pub struct FilesOutput {
    pub version: u32,
    pub generated_at: DateTime<Utc>,
    pub repository_path: String,
    pub entries: Vec<ExtensionStats>,
    pub total_files: u64,
    pub total_lines: u64,
}
