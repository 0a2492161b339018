use assert_cmd::prelude::*;
use pretty_assertions::assert_eq;
use std::fs::{self, File};
use std::io::Write;
use std::path::Path;
use std::process::Command;
use tempfile::tempdir;

fn has_git() -> bool {
    Command::new("git").arg("--version").output().is_ok()
}

fn git(dir: &Path, args: &[&str]) {
    assert!(Command::new("git")
        .args(args)
        .current_dir(dir)
        .status()
        .unwrap()
        .success());
}

fn init_git_repo(dir: &Path) {
    git(dir, &["init"]);
    git(dir, &["config", "core.autocrlf", "false"]);
    git(dir, &["config", "core.safecrlf", "false"]);
    git(dir, &["config", "user.email", "you@example.com"]);
    git(dir, &["config", "user.name", "Your Name"]);
}

fn commit_file(dir: &Path, name: &str, content: &str) {
    let path = dir.join(name);
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).unwrap();
    }
    let mut f = File::create(&path).unwrap();
    f.write_all(content.as_bytes()).unwrap();
    f.sync_all().unwrap();
    git(dir, &["add", "."]);
    git(dir, &["commit", "-m", &format!("add {name}")]);
    git(dir, &["reset", "--hard"]);
}

fn analyze_json(dir: &Path) -> serde_json::Value {
    let mut cmd = Command::cargo_bin("repostat").unwrap();
    cmd.current_dir(dir)
        .arg("--repo")
        .arg(dir)
        .args(["analyze", "--json"]);
    let out = cmd.assert().success().get_output().stdout.clone();
    serde_json::from_slice(&out).unwrap()
}

#[test]
fn analyze_json_reports_committers_and_totals() {
    let dir = tempdir().unwrap();
    if !has_git() {
        return;
    }
    init_git_repo(dir.path());
    commit_file(dir.path(), "src/a.rs", "fn a(){}\n");
    commit_file(dir.path(), "src/b.rs", "fn b(){}\n");

    let v = analyze_json(dir.path());
    assert_eq!(v["stats"]["totals"]["commits"].as_u64(), Some(2));
    assert_eq!(v["stats"]["totals"]["committers"].as_u64(), Some(1));

    let committers = v["stats"]["committers"].as_array().unwrap();
    let share_sum: f64 = committers
        .iter()
        .map(|c| c["commit_percentage"].as_f64().unwrap())
        .sum();
    assert!((share_sum - 100.0).abs() < 1e-6);

    // one local branch holding both commits
    let branches = v["stats"]["branches"].as_array().unwrap();
    assert_eq!(branches.len(), 1);
    assert_eq!(branches[0]["commits"].as_array().unwrap().len(), 2);
}

#[test]
fn single_commit_repo_has_full_share_and_no_line_changes() {
    let dir = tempdir().unwrap();
    if !has_git() {
        return;
    }
    init_git_repo(dir.path());
    commit_file(dir.path(), "lib.rs", "pub fn hi(){}\n");

    let v = analyze_json(dir.path());
    assert_eq!(v["stats"]["totals"]["commits"].as_u64(), Some(1));
    let committer = &v["stats"]["committers"].as_array().unwrap()[0];
    assert!((committer["commit_percentage"].as_f64().unwrap() - 100.0).abs() < 1e-6);
    // no pair was ever diffed
    assert_eq!(committer["lines_added"].as_u64(), Some(0));
    assert_eq!(committer["lines_deleted"].as_u64(), Some(0));
}

#[test]
fn merge_membership_covers_both_parent_subgraphs() {
    let dir = tempdir().unwrap();
    if !has_git() {
        return;
    }
    init_git_repo(dir.path());
    commit_file(dir.path(), "file.txt", "a\n");

    git(dir.path(), &["checkout", "-b", "feat"]);
    commit_file(dir.path(), "feat.txt", "f1\n");
    git(dir.path(), &["checkout", "-"]);
    commit_file(dir.path(), "file.txt", "a\nc\n");
    git(dir.path(), &["merge", "--no-ff", "feat", "-m", "merge feat"]);

    let v = analyze_json(dir.path());
    assert_eq!(v["stats"]["totals"]["commits"].as_u64(), Some(4));

    // the merged-into branch reaches all four commits
    let branches = v["stats"]["branches"].as_array().unwrap();
    let max_members = branches
        .iter()
        .map(|b| b["commits"].as_array().unwrap().len())
        .max()
        .unwrap();
    assert_eq!(max_members, 4);
}

#[test]
fn tags_resolve_to_their_commit() {
    let dir = tempdir().unwrap();
    if !has_git() {
        return;
    }
    init_git_repo(dir.path());
    commit_file(dir.path(), "a.txt", "1\n");
    git(dir.path(), &["tag", "-a", "v1.0", "-m", "release"]);

    let v = analyze_json(dir.path());
    assert_eq!(v["stats"]["totals"]["tags"].as_u64(), Some(1));
    let tag = &v["stats"]["tags"].as_array().unwrap()[0];
    assert_eq!(tag["name"].as_str(), Some("refs/tags/v1.0"));
    assert!(!tag["commit_id"].as_str().unwrap().is_empty());
}

#[test]
fn files_json_tallies_extensions() {
    let dir = tempdir().unwrap();
    if !has_git() {
        return;
    }
    init_git_repo(dir.path());
    commit_file(dir.path(), "src/a.rs", "fn a(){}\nfn b(){}\n");
    commit_file(dir.path(), "notes", "no extension\n");

    let mut cmd = Command::cargo_bin("repostat").unwrap();
    cmd.current_dir(dir.path())
        .arg("--repo")
        .arg(dir.path())
        .args(["files", "--json"]);
    let out = cmd.assert().success().get_output().stdout.clone();
    let v: serde_json::Value = serde_json::from_slice(&out).unwrap();

    let entries = v["entries"].as_array().unwrap();
    assert!(entries.iter().any(|e| e["extension"] == "rs"));
    assert!(entries.iter().any(|e| e["extension"] == "other"));
    assert!(v["total_lines"].as_u64().unwrap() >= 3);
}

#[test]
fn analyze_runs_are_deterministic() {
    let dir = tempdir().unwrap();
    if !has_git() {
        return;
    }
    init_git_repo(dir.path());
    commit_file(dir.path(), "a.txt", "1\n");
    commit_file(dir.path(), "b.txt", "2\n");

    let first = analyze_json(dir.path());
    let second = analyze_json(dir.path());
    // everything except the generation timestamp matches exactly
    assert_eq!(first["stats"], second["stats"]);
    assert_eq!(first["files"], second["files"]);
}
