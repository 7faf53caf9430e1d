use std::{fmt, sync::Arc, time::Duration};

use serde::Serialize;
use serde_json::{json, Value};
use tracing::{error, info};
use url::Url;

use crate::{browser::Page, error::ScrapeError, llm::LlmClient};

use self::{ashby::AshbyScraper, greenhouse::GreenhouseScraper, lever::LeverScraper};

mod ashby;
mod greenhouse;
mod lever;


/// Hostname fragments and the platform that serves them, checked in order.
pub const PLATFORM_HOSTS: [(&str, Platform); 3] = [
    (AshbyScraper::HOST, Platform::Ashby),
    (LeverScraper::HOST, Platform::Lever),
    (GreenhouseScraper::HOST, Platform::Greenhouse)
];


/// An applicant tracking system that hosts job postings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Platform {
    Ashby,
    Lever,
    Greenhouse
}


impl Platform {
    /// Picks the platform whose host fragment appears in the hostname of `url`.
    ///
    /// Returns None for unparseable URLs and hosts that no scraper handles.
    pub fn from_url(url: &str) -> Option<Self> {
        let url = Url::parse(url).ok()?;
        let host = url.host_str()?;
        PLATFORM_HOSTS
            .iter()
            .find(|(fragment, _)| host.contains(fragment))
            .map(|(_, platform)| *platform)
    }

    pub fn name(self) -> &'static str {
        match self {
            Self::Ashby => AshbyScraper::NAME,
            Self::Lever => LeverScraper::NAME,
            Self::Greenhouse => GreenhouseScraper::NAME
        }
    }

    /// Renders `url` in `page` and reads the posting with this platform's scraper.
    pub fn capture<P: Page + ?Sized>(self, page: &P, url: &str, timeout: Duration) -> Result<CapturedPosting, ScrapeError> {
        match self {
            Self::Ashby => AshbyScraper::capture(page, url, timeout),
            Self::Lever => LeverScraper::capture(page, url, timeout),
            Self::Greenhouse => GreenhouseScraper::capture(page, url, timeout)
        }
    }
}


impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}


/// What a scraper reads off a rendered job posting, before any structured extraction.
#[derive(Debug, Clone, Serialize)]
pub struct CapturedPosting {
    pub url: String,
    pub job_title: String,
    /// Every piece of visible text on the page
    pub full_text: String,
    pub platform: Platform
}


/// Reads job postings from one applicant tracking system.
pub(crate) trait PageScraper {
    const NAME: &'static str;
    /// Fragment that identifies this platform's hostnames
    const HOST: &'static str;
    const PLATFORM: Platform;

    /// Navigates `page` to `url`, waits for the posting to render, and captures its title and text.
    ///
    /// Fails if the page cannot be reached or an element the platform always renders is missing.
    fn capture<P: Page + ?Sized>(page: &P, url: &str, timeout: Duration) -> Result<CapturedPosting, ScrapeError>;

    fn posting(url: &str, job_title: String, full_text: String) -> CapturedPosting {
        CapturedPosting { url: url.to_string(), job_title, full_text, platform: Self::PLATFORM }
    }
}


/// Captures the posting at `url` and turns it into structured data.
///
/// Never fails: problems are reported as an object with an `error` key, so that
/// the caller always has something to write out.
pub async fn scrape_job<P>(page: Arc<P>, platform: Platform, url: &str, timeout: Duration, llm: &LlmClient) -> Value
where
    P: Page + Send + Sync + ?Sized + 'static
{
    info!("Scraping {platform} job: {url}");

    let target = url.to_string();
    let captured = tokio_rayon::spawn(move || platform.capture(page.as_ref(), &target, timeout)).await;

    match captured {
        Ok(posting) => llm.process_with_llm(&posting).await,
        Err(e) => {
            error!("Error scraping {platform} job: {e}");
            json!({ "error": e.to_string(), "url": url, "platform": platform.name() })
        }
    }
}
