use std::process::ExitCode;

use clap::Parser;
use job_scrapers::commands::{self, PostingArgs, PostingOutcome};


#[tokio::main]
async fn main() -> anyhow::Result<ExitCode> {
    let args = PostingArgs::parse();
    let config = commands::init()?;

    match commands::scrape_posting(&args, &config).await? {
        PostingOutcome::Saved(_) => Ok(ExitCode::SUCCESS),
        PostingOutcome::Unsupported => Ok(ExitCode::from(1))
    }
}
