//! The two command line front ends. The binaries only parse arguments, load
//! configuration and map outcomes to exit codes.

use std::path::PathBuf;

use anyhow::Context;
use clap::{ArgAction, Parser};
use tracing::{error, info};

use crate::{
    browser::BrowserSession,
    config::Config,
    llm::LlmClient,
    page_scrapers::{scrape_job, Platform, PLATFORM_HOSTS},
    startups_gallery::{save_to_csv, AccumulatedJobs, StartupJobScraper}
};


/// Scrape job postings from various platforms
#[derive(Debug, Parser)]
#[command(name = "job-scrape")]
pub struct PostingArgs {
    /// URL of the job posting to scrape
    pub url: String,
    /// Run browser in headless mode
    #[arg(long, default_value_t = true, action = ArgAction::Set)]
    pub headless: bool,
    /// Output file path
    #[arg(long, default_value = "job_data.json")]
    pub output: PathBuf
}


/// Scrape startup jobs from startups.gallery
#[derive(Debug, Parser)]
#[command(name = "startups-gallery")]
pub struct GalleryArgs {
    /// Number of times to click the "Load More" button
    #[arg(short = 'n', long = "num_clicks", default_value_t = 1)]
    pub num_clicks: u32,
    /// Output file path
    #[arg(long, default_value = "startup_jobs.csv")]
    pub output: PathBuf,
    /// Run browser in headless mode
    #[arg(long, default_value_t = true, action = ArgAction::Set)]
    pub headless: bool
}


#[derive(Debug, PartialEq, Eq)]
pub enum PostingOutcome {
    /// The result, structured data or an error object, was written to this path
    Saved(PathBuf),
    /// No scraper handles the URL's host and nothing was written
    Unsupported
}


/// Scrapes one job posting and writes the result as pretty-printed JSON.
pub async fn scrape_posting(args: &PostingArgs, config: &Config) -> anyhow::Result<PostingOutcome> {
    let Some(platform) = Platform::from_url(&args.url) else {
        error!("Unsupported job platform for URL: {}", args.url);
        println!("Error: Unsupported job platform for URL: {}", args.url);
        let supported: Vec<String> = PLATFORM_HOSTS
            .iter()
            .map(|(host, platform)| format!("{platform} ({host})"))
            .collect();
        println!("Supported platforms: {}", supported.join(", "));
        return Ok(PostingOutcome::Unsupported);
    };

    info!("Scraping {platform} job posting: {}", args.url);
    let llm = LlmClient::new(config);
    let headless = args.headless;
    let user_agent = config.user_agent.clone();
    let session = tokio_rayon::spawn(move || BrowserSession::launch(headless, &user_agent)).await?;

    let job_data = scrape_job(session.tab(), platform, &args.url, config.page_timeout(), &llm).await;

    let json = serde_json::to_string_pretty(&job_data)?;
    tokio::fs::write(&args.output, json)
        .await
        .with_context(|| format!("Failed to write {}", args.output.display()))?;
    info!("Job data saved to {}", args.output.display());

    println!("Successfully scraped {platform} job posting");
    println!("Data saved to {}", args.output.display());
    Ok(PostingOutcome::Saved(args.output.clone()))
}


/// Collects startups.gallery listings across `num_clicks` "Load More" presses and writes them as CSV.
///
/// Returns the number of jobs written.
pub async fn scrape_gallery(args: &GalleryArgs, config: &Config) -> anyhow::Result<usize> {
    println!("Starting job scraping with {} Load More clicks...", args.num_clicks);

    let headless = args.headless;
    let user_agent = config.user_agent.clone();
    let session = tokio_rayon::spawn(move || BrowserSession::launch(headless, &user_agent)).await?;

    let tab = session.tab();
    let num_clicks = args.num_clicks;
    let (page_timeout, load_timeout) = (config.page_timeout(), config.scraping_delay());
    let jobs = tokio_rayon::spawn(move || -> anyhow::Result<AccumulatedJobs> {
        let mut jobs = AccumulatedJobs::default();
        let clicks = StartupJobScraper::new(tab.as_ref(), page_timeout, load_timeout)
            .load_more_jobs(num_clicks, &mut jobs)?;
        info!("Finished after {clicks} of {num_clicks} Load More clicks");
        Ok(jobs)
    }).await?;
    drop(session);

    save_to_csv(&jobs, &args.output)?;
    println!("Data saved to {}", args.output.display());
    println!("Scraped {} jobs successfully!", jobs.len());
    Ok(jobs.len())
}


/// Shared start-up for both binaries: configuration first, then logging.
pub fn init() -> anyhow::Result<Config> {
    let config = Config::load()?;
    crate::logging::init(&config.log_level);
    if let Some(path) = &config.credentials_path {
        info!("Google credentials configured at {}", path.display());
    }
    Ok(config)
}
