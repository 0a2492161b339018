use anyhow::Result;
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "repostat")]
#[command(about = "Git history statistics: committers, branches, and activity trends")]
#[command(version)]
pub struct Cli {
    #[clap(flatten)]
    pub common: CommonArgs,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Args, Clone)]
pub struct CommonArgs {
    #[arg(long, help = "Path to git repository")]
    pub repo: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Analyze the full history: committers, branches, tags, activity buckets
    Analyze {
        #[arg(long, help = "Output as JSON")]
        json: bool,
    },
    /// Tally working-tree files and lines per extension
    Files {
        #[arg(long, help = "Output as JSON")]
        json: bool,
    },
}

impl Cli {
    pub fn parse() -> Self {
        <Self as Parser>::parse()
    }

    pub fn execute(self) -> Result<()> {
        match self.command {
            Commands::Analyze { json } => crate::analysis::exec(self.common, json),
            Commands::Files { json } => crate::files::exec(self.common, json),
        }
    }
}
