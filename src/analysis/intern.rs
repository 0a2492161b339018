use crate::model::CommitInfo;
use chrono::{DateTime, Utc};
use std::collections::hash_map::Entry;
use std::collections::{BTreeMap, HashMap, HashSet};

/// A commit as held by the store: immutable backend data plus the one field
/// that may be attached later in the same pass, its tag.
#[derive(Debug, Clone)]
pub struct CommitRecord {
    pub info: CommitInfo,
    pub tag: Option<String>,
}

/// Mutable committer payload, keyed externally by email. The display name is
/// refreshed on every intern, so the last name seen for an email wins.
#[derive(Debug, Clone, Default)]
pub struct CommitterRecord {
    pub name: String,
    pub lines_added: u64,
    pub lines_deleted: u64,
    pub files_changed: u64,
}

/// Mutable branch payload, keyed externally by ref name. Members are kept in
/// discovery order; the set only ever grows.
#[derive(Debug, Clone)]
pub struct BranchRecord {
    pub tip_id: String,
    pub member_ids: Vec<String>,
    member_set: HashSet<String>,
    pub first_author_date: Option<DateTime<Utc>>,
    pub last_commit_date: Option<DateTime<Utc>>,
}

impl BranchRecord {
    fn new(tip_id: String) -> Self {
        Self {
            tip_id,
            member_ids: Vec::new(),
            member_set: HashSet::new(),
            first_author_date: None,
            last_commit_date: None,
        }
    }

    /// Records a member commit, keeping the earliest author date and latest
    /// commit date up to date as membership is discovered.
    pub fn record_member(&mut self, commit: &CommitInfo) {
        if !self.member_set.insert(commit.id.clone()) {
            return;
        }
        self.member_ids.push(commit.id.clone());

        match self.first_author_date {
            Some(d) if d <= commit.authored_at => {}
            _ => self.first_author_date = Some(commit.authored_at),
        }
        match self.last_commit_date {
            Some(d) if d >= commit.committed_at => {}
            _ => self.last_commit_date = Some(commit.committed_at),
        }
    }

    pub fn contains(&self, commit_id: &str) -> bool {
        self.member_set.contains(commit_id)
    }
}

/// Deduplicated registries of everything the backend reports. Interning is
/// the only way records come into existence: the identity field is the map
/// key itself, re-interning an existing key never creates a second record.
#[derive(Debug, Default)]
pub struct IdentityStore {
    commits: HashMap<String, CommitRecord>,
    commit_order: Vec<String>,
    committers: HashMap<String, CommitterRecord>,
    branches: BTreeMap<String, BranchRecord>,
    tags: BTreeMap<String, String>,
}

impl IdentityStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Interns a commit by hash. The first observation wins; a repeated hash
    /// is a no-op and the stored record is returned untouched.
    pub fn intern_commit(&mut self, info: CommitInfo) -> &mut CommitRecord {
        match self.commits.entry(info.id.clone()) {
            Entry::Occupied(entry) => entry.into_mut(),
            Entry::Vacant(entry) => {
                self.commit_order.push(info.id.clone());
                entry.insert(CommitRecord { info, tag: None })
            }
        }
    }

    /// Interns a committer by email, refreshing the display name.
    pub fn intern_committer(&mut self, name: &str, email: &str) -> &mut CommitterRecord {
        let rec = self.committers.entry(email.to_string()).or_default();
        rec.name = name.to_string();
        rec
    }

    pub fn intern_branch(&mut self, name: &str, tip_id: &str) -> &mut BranchRecord {
        self.branches
            .entry(name.to_string())
            .or_insert_with(|| BranchRecord::new(tip_id.to_string()))
    }

    /// Interns a tag by ref name; the target recorded first wins.
    pub fn intern_tag(&mut self, name: &str, target_id: &str) {
        self.tags
            .entry(name.to_string())
            .or_insert_with(|| target_id.to_string());
    }

    pub fn commit(&self, id: &str) -> Option<&CommitRecord> {
        self.commits.get(id)
    }

    pub fn commit_mut(&mut self, id: &str) -> Option<&mut CommitRecord> {
        self.commits.get_mut(id)
    }

    /// Commit ids in discovery order.
    pub fn commit_ids(&self) -> &[String] {
        &self.commit_order
    }

    pub fn commit_count(&self) -> usize {
        self.commit_order.len()
    }

    pub fn committer(&self, email: &str) -> Option<&CommitterRecord> {
        self.committers.get(email)
    }

    pub fn committer_mut(&mut self, email: &str) -> Option<&mut CommitterRecord> {
        self.committers.get_mut(email)
    }

    pub fn committers(&self) -> &HashMap<String, CommitterRecord> {
        &self.committers
    }

    pub fn branches(&self) -> &BTreeMap<String, BranchRecord> {
        &self.branches
    }

    pub fn branches_mut(&mut self) -> &mut BTreeMap<String, BranchRecord> {
        &mut self.branches
    }

    pub fn tags(&self) -> &BTreeMap<String, String> {
        &self.tags
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use chrono::Utc;

    fn commit(id: &str, t: i64) -> CommitInfo {
        CommitInfo {
            id: id.to_string(),
            parent_ids: vec![],
            author_name: "Ann".to_string(),
            author_email: "ann@example.com".to_string(),
            authored_at: Utc.timestamp_opt(t, 0).unwrap(),
            committed_at: Utc.timestamp_opt(t, 0).unwrap(),
            message: "m".to_string(),
        }
    }

    #[test]
    fn reinterning_a_commit_is_a_noop() {
        let mut store = IdentityStore::new();
        store.intern_commit(commit("a", 100)).tag = Some("v1".to_string());

        let mut second = commit("a", 999);
        second.message = "other".to_string();
        let rec = store.intern_commit(second);

        assert_eq!(rec.info.committed_at, Utc.timestamp_opt(100, 0).unwrap());
        assert_eq!(rec.info.message, "m");
        assert_eq!(rec.tag.as_deref(), Some("v1"));
        assert_eq!(store.commit_count(), 1);
    }

    #[test]
    fn committer_email_is_the_identity_and_last_name_wins() {
        let mut store = IdentityStore::new();
        store.intern_committer("Ann", "ann@example.com").lines_added = 7;
        store.intern_committer("Ann B.", "ann@example.com");

        assert_eq!(store.committers().len(), 1);
        let rec = store.committer("ann@example.com").unwrap();
        assert_eq!(rec.name, "Ann B.");
        // payload survives the re-intern
        assert_eq!(rec.lines_added, 7);
    }

    #[test]
    fn branch_members_grow_monotonically_and_track_dates() {
        let mut store = IdentityStore::new();
        let early = commit("a", 100);
        let late = commit("b", 200);

        let branch = store.intern_branch("refs/heads/main", "b");
        branch.record_member(&late);
        branch.record_member(&early);
        branch.record_member(&late);

        assert_eq!(branch.member_ids, vec!["b".to_string(), "a".to_string()]);
        assert_eq!(branch.first_author_date, Some(early.authored_at));
        assert_eq!(branch.last_commit_date, Some(late.committed_at));
    }

    #[test]
    fn first_tag_target_wins() {
        let mut store = IdentityStore::new();
        store.intern_tag("refs/tags/v1", "a");
        store.intern_tag("refs/tags/v1", "b");
        assert_eq!(store.tags().get("refs/tags/v1").map(String::as_str), Some("a"));
    }
}
