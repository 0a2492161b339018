use crate::model::{AnalyzeOutput, FilesOutput};
use console::style;

pub fn output_json(output: &AnalyzeOutput) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(output)?);
    Ok(())
}

pub fn output_summary(output: &AnalyzeOutput) {
    let stats = &output.stats;

    println!(
        "{} {}",
        style("Repository statistics:").bold(),
        style(&output.repository_name).cyan()
    );
    println!("{}", "─".repeat(72));
    println!("Commits:    {}", style(stats.totals.commits).cyan());
    println!("Branches:   {}", style(stats.totals.branches).cyan());
    println!("Tags:       {}", style(stats.totals.tags).cyan());
    println!("Committers: {}", style(stats.totals.committers).cyan());
    println!("Files:      {}", style(output.total_files).cyan());
    println!("Lines:      {}", style(output.total_lines).cyan());
    println!(
        "Changes:    {} added, {} deleted, {} files touched",
        style(stats.totals.lines_added).green(),
        style(stats.totals.lines_deleted).red(),
        style(stats.totals.files_changed).cyan()
    );

    println!("\n{}", style("Committers").bold());
    println!(
        "{:<24} {:>8} {:>7} {:>9} {:>9} {:>7}",
        style("Name").bold(),
        style("Commits").bold(),
        style("Share").bold(),
        style("Added").bold(),
        style("Deleted").bold(),
        style("Files").bold()
    );
    println!("{}", "─".repeat(72));
    for committer in &stats.committers {
        println!(
            "{:<24} {:>8} {:>6.1}% {:>9} {:>9} {:>7}",
            truncated(&committer.name, 24),
            committer.commits,
            committer.commit_percentage,
            committer.lines_added,
            committer.lines_deleted,
            committer.files_changed
        );
    }

    println!("\n{}", style("Branches").bold());
    println!(
        "{:<28} {:>8} {:>7} {:>12} {:>12}",
        style("Name").bold(),
        style("Commits").bold(),
        style("Share").bold(),
        style("First").bold(),
        style("Last").bold()
    );
    println!("{}", "─".repeat(72));
    for branch in &stats.branches {
        let first = branch
            .first_author_date
            .map(|d| d.format("%Y-%m-%d").to_string())
            .unwrap_or_else(|| "-".to_string());
        let last = branch
            .last_commit_date
            .map(|d| d.format("%Y-%m-%d").to_string())
            .unwrap_or_else(|| "-".to_string());
        println!(
            "{:<28} {:>8} {:>6.1}% {:>12} {:>12}",
            truncated(short_ref(&branch.name), 28),
            branch.commits.len(),
            branch.commit_percentage,
            first,
            last
        );
    }

    if !stats.tags.is_empty() {
        println!("\n{}", style("Tags").bold());
        for tag in &stats.tags {
            println!(
                "  {} -> {}",
                short_ref(&tag.name),
                &tag.commit_id[..tag.commit_id.len().min(8)]
            );
        }
    }

    if !stats.commits_per_month.is_empty() {
        println!("\n{}", style("Monthly activity").bold());
        let max = stats.commits_per_month.values().max().copied().unwrap_or(1);
        for (month, count) in &stats.commits_per_month {
            let intensity = ((*count as f64 / max as f64) * 5.0) as u32;
            let bar = match intensity {
                0 => " ",
                1 => "▁",
                2 => "▃",
                3 => "▅",
                4 => "▇",
                _ => "█",
            };
            println!("{} {} {:>4}", month, style(bar).green(), count);
        }
    }

    if !output.files.is_empty() {
        println!("\n{}", style("File types").bold());
        for entry in output.files.iter().take(10) {
            println!(
                "  {:<12} {:>6} files {:>9} lines",
                entry.extension, entry.files, entry.lines
            );
        }
        if output.files.len() > 10 {
            println!("  ... and {} more types", output.files.len() - 10);
        }
    }
}

pub fn output_files_table(output: &FilesOutput) {
    println!(
        "{:<16} {:>8} {:>10}",
        style("Extension").bold(),
        style("Files").bold(),
        style("Lines").bold()
    );
    println!("{}", "─".repeat(36));
    for entry in &output.entries {
        println!("{:<16} {:>8} {:>10}", entry.extension, entry.files, entry.lines);
    }
    println!("{}", "─".repeat(36));
    println!(
        "{:<16} {:>8} {:>10}",
        "total", output.total_files, output.total_lines
    );
}

fn short_ref(name: &str) -> &str {
    name.strip_prefix("refs/heads/")
        .or_else(|| name.strip_prefix("refs/tags/"))
        .unwrap_or(name)
}

fn truncated(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        s.to_string()
    } else {
        let cut: String = s.chars().take(max.saturating_sub(1)).collect();
        format!("{cut}…")
    }
}
