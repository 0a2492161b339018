use anyhow::Result;
use clap::Parser;
use repostat::cli::Cli;

fn main() -> Result<()> {
    let cli = Cli::parse();
    cli.execute()
}
