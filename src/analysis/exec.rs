use super::{run_pipeline, PhaseOutcome};
use crate::cli::CommonArgs;
use crate::files;
use crate::git::GitRepo;
use crate::model::{AnalyzeOutput, SCHEMA_VERSION};
use crate::report;
use anyhow::Context;
use chrono::Utc;

pub fn exec(common: CommonArgs, json: bool) -> anyhow::Result<()> {
    let repo = GitRepo::open(common.repo.as_ref()).context("Failed to open git repository")?;

    // keep the spinner off when the output is meant to be parsed
    let history = repo
        .load_history(!json)
        .context("Failed to read repository history")?;

    let result = run_pipeline(&history, &repo);
    for phase in &result.phases {
        match &phase.outcome {
            PhaseOutcome::Ok => {}
            PhaseOutcome::Partial(reason) => {
                eprintln!("warning: {} phase incomplete: {reason}", phase.phase);
            }
            PhaseOutcome::Failed(reason) => {
                eprintln!("warning: {} phase failed: {reason}", phase.phase);
            }
        }
    }

    // census failure leaves the file sections empty, the rest still renders
    let census = match files::census(repo.path()) {
        Ok(census) => census,
        Err(e) => {
            eprintln!("warning: file census failed: {e}");
            files::Census::default()
        }
    };

    let output = AnalyzeOutput {
        version: SCHEMA_VERSION,
        generated_at: Utc::now(),
        repository_path: repo.path().to_string_lossy().to_string(),
        repository_name: repo.name(),
        stats: result.stats,
        files: census.entries,
        total_files: census.total_files,
        total_lines: census.total_lines,
    };

    if json {
        report::output_json(&output)?;
    } else {
        report::output_summary(&output);
    }
    Ok(())
}
