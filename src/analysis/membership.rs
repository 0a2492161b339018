use super::intern::IdentityStore;
use super::PhaseOutcome;
use std::collections::{HashSet, VecDeque};

/// Resolves branch membership: one reverse traversal per branch tip over the
/// parent edges, marking every reachable commit as a member. A merge commit
/// enqueues all of its parents; commits unreachable from every tip end up in
/// no branch but stay in the global index.
pub fn resolve(store: &mut IdentityStore) -> PhaseOutcome {
    let mut dangling_tips = 0usize;
    let mut missing_parents = 0usize;

    let names: Vec<String> = store.branches().keys().cloned().collect();
    for name in names {
        let tip_id = match store.branches().get(&name) {
            Some(branch) => branch.tip_id.clone(),
            None => continue,
        };
        if store.commit(&tip_id).is_none() {
            dangling_tips += 1;
            continue;
        }

        let mut seen: HashSet<String> = HashSet::new();
        let mut queue: VecDeque<String> = VecDeque::from([tip_id]);

        while let Some(id) = queue.pop_front() {
            if !seen.insert(id.clone()) {
                continue;
            }
            let info = match store.commit(&id) {
                Some(record) => record.info.clone(),
                None => {
                    // parent id the backend never listed; skip just that edge
                    missing_parents += 1;
                    continue;
                }
            };
            if let Some(branch) = store.branches_mut().get_mut(&name) {
                branch.record_member(&info);
            }
            for parent in info.parent_ids {
                queue.push_back(parent);
            }
        }
    }

    if dangling_tips > 0 || missing_parents > 0 {
        PhaseOutcome::Partial(format!(
            "{dangling_tips} dangling branch tip(s), {missing_parents} unknown parent(s) skipped"
        ))
    } else {
        PhaseOutcome::Ok
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::CommitInfo;
    use chrono::{TimeZone, Utc};

    fn commit(id: &str, parents: &[&str], t: i64) -> CommitInfo {
        CommitInfo {
            id: id.to_string(),
            parent_ids: parents.iter().map(|p| p.to_string()).collect(),
            author_name: "Ann".to_string(),
            author_email: "ann@example.com".to_string(),
            authored_at: Utc.timestamp_opt(t, 0).unwrap(),
            committed_at: Utc.timestamp_opt(t, 0).unwrap(),
            message: String::new(),
        }
    }

    fn store_with(commits: &[CommitInfo], branches: &[(&str, &str)]) -> IdentityStore {
        let mut store = IdentityStore::new();
        for c in commits {
            store.intern_commit(c.clone());
        }
        for (name, tip) in branches {
            store.intern_branch(name, tip);
        }
        store
    }

    #[test]
    fn linear_chain_is_fully_reachable_from_tip() {
        let commits = [
            commit("a", &[], 1),
            commit("b", &["a"], 2),
            commit("c", &["b"], 3),
        ];
        let mut store = store_with(&commits, &[("refs/heads/main", "c")]);

        assert!(matches!(resolve(&mut store), PhaseOutcome::Ok));
        let branch = &store.branches()["refs/heads/main"];
        assert_eq!(branch.member_ids.len(), 3);
        for id in ["a", "b", "c"] {
            assert!(branch.contains(id));
        }
    }

    #[test]
    fn merge_commit_pulls_in_both_parent_subgraphs() {
        let commits = [
            commit("root", &[], 1),
            commit("left", &["root"], 2),
            commit("right", &["root"], 3),
            commit("merge", &["left", "right"], 4),
        ];
        let mut store = store_with(&commits, &[("refs/heads/main", "merge")]);

        resolve(&mut store);
        let branch = &store.branches()["refs/heads/main"];
        assert_eq!(branch.member_ids.len(), 4);
        assert!(branch.contains("left"));
        assert!(branch.contains("right"));
    }

    #[test]
    fn orphan_commit_belongs_to_no_branch_but_stays_indexed() {
        let commits = [
            commit("a", &[], 1),
            commit("b", &["a"], 2),
            commit("orphan", &[], 3),
        ];
        let mut store = store_with(&commits, &[("refs/heads/main", "b")]);

        resolve(&mut store);
        assert!(!store.branches()["refs/heads/main"].contains("orphan"));
        assert_eq!(store.commit_count(), 3);
    }

    #[test]
    fn identical_tips_give_identical_membership() {
        let commits = [commit("a", &[], 1), commit("b", &["a"], 2)];
        let mut store = store_with(
            &commits,
            &[("refs/heads/main", "b"), ("refs/heads/dev", "b")],
        );

        resolve(&mut store);
        let main = &store.branches()["refs/heads/main"];
        let dev = &store.branches()["refs/heads/dev"];
        assert_eq!(main.member_ids, dev.member_ids);
    }

    #[test]
    fn dangling_tip_is_reported_as_partial() {
        let commits = [commit("a", &[], 1)];
        let mut store = store_with(
            &commits,
            &[("refs/heads/main", "a"), ("refs/heads/ghost", "nope")],
        );

        let outcome = resolve(&mut store);
        assert!(matches!(outcome, PhaseOutcome::Partial(_)));
        assert!(store.branches()["refs/heads/ghost"].member_ids.is_empty());
        assert_eq!(store.branches()["refs/heads/main"].member_ids.len(), 1);
    }

    #[test]
    fn branch_dates_span_member_commits() {
        let commits = [
            commit("a", &[], 100),
            commit("b", &["a"], 300),
            commit("c", &["b"], 200),
        ];
        let mut store = store_with(&commits, &[("refs/heads/main", "c")]);

        resolve(&mut store);
        let branch = &store.branches()["refs/heads/main"];
        assert_eq!(branch.first_author_date, Some(Utc.timestamp_opt(100, 0).unwrap()));
        assert_eq!(branch.last_commit_date, Some(Utc.timestamp_opt(300, 0).unwrap()));
    }
}
