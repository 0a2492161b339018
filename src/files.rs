use crate::cli::CommonArgs;
use crate::error::Result;
use crate::git::GitRepo;
use crate::model::{ExtensionStats, FilesOutput, SCHEMA_VERSION};
use anyhow::Context;
use chrono::Utc;
use ignore::WalkBuilder;
use std::collections::BTreeMap;
use std::path::Path;

/// Working-tree census: files and physical lines grouped by extension.
#[derive(Debug, Clone, Default)]
pub struct Census {
    pub entries: Vec<ExtensionStats>,
    pub total_files: u64,
    pub total_lines: u64,
}

/// Walks the working tree (minus `.git` and ignore rules) and tallies files
/// and lines per extension. Files without an extension fall under "other";
/// unreadable files are skipped.
pub fn census(root: &Path) -> Result<Census> {
    let mut by_extension: BTreeMap<String, (u64, u64)> = BTreeMap::new();

    let walker = WalkBuilder::new(root)
        .hidden(false)
        .filter_entry(|entry| entry.file_name().to_str() != Some(".git"))
        .build();

    for entry in walker.filter_map(std::result::Result::ok) {
        if !entry.file_type().map(|t| t.is_file()).unwrap_or(false) {
            continue;
        }
        let Ok(lines) = count_file_lines(entry.path()) else {
            continue;
        };
        let extension = entry
            .path()
            .extension()
            .and_then(|s| s.to_str())
            .map(|s| s.to_lowercase())
            .unwrap_or_else(|| "other".to_string());

        let slot = by_extension.entry(extension).or_insert((0, 0));
        slot.0 += 1;
        slot.1 += lines;
    }

    let mut census = Census::default();
    for (extension, (files, lines)) in by_extension {
        census.total_files += files;
        census.total_lines += lines;
        census.entries.push(ExtensionStats {
            extension,
            files,
            lines,
        });
    }
    census.entries.sort_by(|a, b| b.lines.cmp(&a.lines).then_with(|| a.extension.cmp(&b.extension)));
    Ok(census)
}

/// Physical line count: newline bytes, plus one for an unterminated final
/// line.
fn count_file_lines(path: &Path) -> std::io::Result<u64> {
    let data = std::fs::read(path)?;
    let mut count = data.iter().filter(|&&b| b == b'\n').count() as u64;
    if data.last().is_some_and(|&b| b != b'\n') {
        count += 1;
    }
    Ok(count)
}

pub fn exec(common: CommonArgs, json: bool) -> anyhow::Result<()> {
    let repo = GitRepo::open(common.repo.as_ref()).context("Failed to open git repository")?;
    let census = census(repo.path()).context("Failed to walk working tree")?;

    let output = FilesOutput {
        version: SCHEMA_VERSION,
        generated_at: Utc::now(),
        repository_path: repo.path().to_string_lossy().to_string(),
        entries: census.entries,
        total_files: census.total_files,
        total_lines: census.total_lines,
    };

    if json {
        println!("{}", serde_json::to_string_pretty(&output)?);
    } else {
        crate::report::output_files_table(&output);
    }
    Ok(())
}
