use crate::analysis::TreeDiffer;
use crate::error::{RepostatError, Result};
use crate::model::{BranchRef, CommitInfo, DiffTotals, History, TagRef};
use chrono::DateTime;
use gix::object::tree::diff::ChangeDetached;
use gix::{discover, ObjectId, Repository};
use indicatif::{ProgressBar, ProgressStyle};
use std::collections::{BTreeSet, HashSet, VecDeque};
use std::path::{Path, PathBuf};

pub struct GitRepo {
    repo: Repository,
    path: PathBuf,
}

impl GitRepo {
    /// Open a repository at `path`, or current dir if `None`
    pub fn open<P: AsRef<Path>>(path: Option<P>) -> Result<Self> {
        let repo_path = path
            .map(|p| p.as_ref().to_path_buf())
            .unwrap_or(std::env::current_dir()?);

        let repo = discover(&repo_path)?;
        let path = repo.workdir().unwrap_or_else(|| repo.path()).to_path_buf();

        Ok(Self { repo, path })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn name(&self) -> String {
        self.path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_else(|| self.path.to_string_lossy().to_string())
    }

    /// Everything one analysis run needs from the object database: branch
    /// tips, all reachable commits, and peeled tags.
    pub fn load_history(&self, progress: bool) -> Result<History> {
        let branches = self.list_branches()?;
        let tags = self.list_tags()?;
        let commits = self.collect_commits(&branches, &tags, progress)?;
        Ok(History {
            branches,
            commits,
            tags,
        })
    }

    fn list_branches(&self) -> Result<Vec<BranchRef>> {
        let platform = self
            .repo
            .references()
            .map_err(|e| RepostatError::GitRepo(format!("cannot enumerate references: {e}")))?;
        let iter = platform
            .local_branches()
            .map_err(|e| RepostatError::GitRepo(format!("cannot list branches: {e}")))?;

        let mut branches = Vec::new();
        for reference in iter.filter_map(std::result::Result::ok) {
            let mut reference = reference;
            // unpeelable refs are skipped, not fatal
            let Ok(tip) = reference.peel_to_id_in_place() else {
                continue;
            };
            branches.push(BranchRef {
                name: reference.name().as_bstr().to_string(),
                tip_id: tip.to_string(),
            });
        }
        branches.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(branches)
    }

    /// Tag refs peeled through annotated tag objects down to the commit they
    /// ultimately point at. Tags whose target is not a commit are skipped.
    fn list_tags(&self) -> Result<Vec<TagRef>> {
        let platform = self
            .repo
            .references()
            .map_err(|e| RepostatError::GitRepo(format!("cannot enumerate references: {e}")))?;
        let iter = platform
            .tags()
            .map_err(|e| RepostatError::GitRepo(format!("cannot list tags: {e}")))?;

        let mut tags = Vec::new();
        for reference in iter.filter_map(std::result::Result::ok) {
            let mut reference = reference;
            let Ok(target) = reference.peel_to_id_in_place() else {
                continue;
            };
            let Ok(object) = target.object() else {
                continue;
            };
            if object.kind != gix::object::Kind::Commit {
                continue;
            }
            tags.push(TagRef {
                name: reference.name().as_bstr().to_string(),
                target_id: target.to_string(),
            });
        }
        tags.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(tags)
    }

    /// Walks the commit graph from every branch tip, tag target, and HEAD
    /// with a seen-set, so each commit is reported exactly once no matter how
    /// many refs reach it.
    fn collect_commits(
        &self,
        branches: &[BranchRef],
        tags: &[TagRef],
        progress: bool,
    ) -> Result<Vec<CommitInfo>> {
        let mut seeds: BTreeSet<String> = branches.iter().map(|b| b.tip_id.clone()).collect();
        seeds.extend(tags.iter().map(|t| t.target_id.clone()));
        if let Ok(mut head) = self.repo.head() {
            if let Ok(commit) = head.peel_to_commit_in_place() {
                seeds.insert(commit.id.to_string());
            }
        }

        let pb = if progress {
            let pb = ProgressBar::new_spinner();
            pb.set_style(
                ProgressStyle::default_spinner()
                    .template("{spinner:.green} {msg}")
                    .unwrap_or_else(|_| ProgressStyle::default_spinner()),
            );
            pb.set_message("Collecting commits...");
            pb
        } else {
            ProgressBar::hidden()
        };

        let mut commits = Vec::new();
        let mut seen: HashSet<ObjectId> = HashSet::new();
        let mut queue: VecDeque<ObjectId> = VecDeque::new();
        for seed in seeds {
            if let Ok(oid) = ObjectId::from_hex(seed.as_bytes()) {
                queue.push_back(oid);
            }
        }

        while let Some(commit_id) = queue.pop_front() {
            if !seen.insert(commit_id) {
                continue;
            }

            // a commit that fails to resolve is dropped, the walk goes on
            let Ok(commit) = self.repo.find_commit(commit_id) else {
                continue;
            };
            let secs = commit.time()?.seconds;
            let committed_at = DateTime::from_timestamp(secs, 0)
                .ok_or_else(|| RepostatError::InvalidDate(format!("Invalid timestamp: {secs}")))?;

            let parents: Vec<ObjectId> = commit.parent_ids().map(|id| id.into()).collect();

            let author = commit.author()?;
            let authored_secs = author.time().map(|t| t.seconds).unwrap_or(secs);
            let authored_at = DateTime::from_timestamp(authored_secs, 0).unwrap_or(committed_at);
            let message = commit.message_raw_sloppy().to_string();

            commits.push(CommitInfo {
                id: commit_id.to_string(),
                parent_ids: parents.iter().map(|id| id.to_string()).collect(),
                author_name: author.name.to_string(),
                author_email: author.email.to_string(),
                authored_at,
                committed_at,
                message,
            });

            for pid in parents {
                queue.push_back(pid);
            }

            pb.inc(1);
        }

        pb.finish_and_clear();
        Ok(commits)
    }

    fn tree_of(&self, id: &str) -> Result<gix::Tree<'_>> {
        let oid = ObjectId::from_hex(id.as_bytes())
            .map_err(|e| RepostatError::Parse(format!("Invalid commit ID: {e}")))?;
        Ok(self.repo.find_commit(oid)?.tree()?)
    }

    fn fold_change(&self, change: ChangeDetached, totals: &mut DiffTotals) {
        match change {
            ChangeDetached::Addition { id, .. } => {
                if let Ok(obj) = self.repo.find_object(id) {
                    if !is_binary_object(&obj) {
                        totals.lines_added += count_lines(&obj);
                    }
                    totals.files_changed += 1;
                }
            }
            ChangeDetached::Deletion { id, .. } => {
                if let Ok(obj) = self.repo.find_object(id) {
                    if !is_binary_object(&obj) {
                        totals.lines_deleted += count_lines(&obj);
                    }
                    totals.files_changed += 1;
                }
            }
            ChangeDetached::Modification {
                previous_id, id, ..
            }
            | ChangeDetached::Rewrite {
                source_id: previous_id,
                id,
                ..
            } => {
                if let (Ok(old_obj), Ok(new_obj)) =
                    (self.repo.find_object(previous_id), self.repo.find_object(id))
                {
                    if !is_binary_object(&old_obj) && !is_binary_object(&new_obj) {
                        let (added, deleted) =
                            line_delta(old_obj.data.as_slice(), new_obj.data.as_slice());
                        totals.lines_added += added;
                        totals.lines_deleted += deleted;
                    }
                    totals.files_changed += 1;
                }
            }
        }
    }
}

impl TreeDiffer for GitRepo {
    /// Tree-level diff between two snapshots, `None` meaning the empty tree.
    /// Rewrite (rename/copy) changes surface per the repository's rename
    /// tracking configuration and count as a single changed file.
    fn diff(&self, old: Option<&str>, new: &str) -> Result<DiffTotals> {
        let old_tree = old.map(|id| self.tree_of(id)).transpose()?;
        let new_tree = self.tree_of(new)?;

        let changes: Vec<ChangeDetached> =
            self.repo
                .diff_tree_to_tree(old_tree.as_ref(), Some(&new_tree), None)?;

        let mut totals = DiffTotals::default();
        for change in changes {
            self.fold_change(change, &mut totals);
        }
        Ok(totals)
    }
}

fn is_binary_object(object: &gix::Object) -> bool {
    object.data.as_slice().iter().take(8192).any(|&b| b == 0)
}

fn count_lines(object: &gix::Object) -> u64 {
    std::str::from_utf8(object.data.as_slice())
        .map(|t| t.lines().count() as u64)
        .unwrap_or(0)
}

/// Cheap line-level delta between two blob versions: align on equal lines
/// with a short lookahead, charge the rest as one-for-one edits.
fn line_delta(old_data: &[u8], new_data: &[u8]) -> (u64, u64) {
    let old_text = std::str::from_utf8(old_data).unwrap_or("");
    let new_text = std::str::from_utf8(new_data).unwrap_or("");

    let old_lines: Vec<&str> = old_text.lines().collect();
    let new_lines: Vec<&str> = new_text.lines().collect();

    let mut added = 0usize;
    let mut deleted = 0usize;
    let (mut oi, mut ni) = (0usize, 0usize);

    while oi < old_lines.len() || ni < new_lines.len() {
        if oi >= old_lines.len() {
            added += new_lines.len() - ni;
            break;
        }
        if ni >= new_lines.len() {
            deleted += old_lines.len() - oi;
            break;
        }

        if old_lines[oi] == new_lines[ni] {
            oi += 1;
            ni += 1;
            continue;
        }

        let mut found = false;
        for look_ahead in 1..=3 {
            if oi + look_ahead < old_lines.len() && old_lines[oi + look_ahead] == new_lines[ni] {
                deleted += look_ahead;
                oi += look_ahead;
                found = true;
                break;
            }
            if ni + look_ahead < new_lines.len() && old_lines[oi] == new_lines[ni + look_ahead] {
                added += look_ahead;
                ni += look_ahead;
                found = true;
                break;
            }
        }

        if !found {
            deleted += 1;
            added += 1;
            oi += 1;
            ni += 1;
        }
    }

    (added as u64, deleted as u64)
}
