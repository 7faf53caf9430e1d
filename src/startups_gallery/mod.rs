use std::time::Duration;

use tracing::{info, warn};
use url::Url;

use crate::{browser::{poll_until, Page}, error::ScrapeError};

pub use self::{
    accumulate::{AccumulatedJobs, JobRecord},
    export::{save_to_csv, write_csv},
    extract::{pull_listings, Listings, JOB_LINK_SELECTOR}
};

mod accumulate;
mod export;
mod extract;

pub const JOBS_URL: &str = "https://startups.gallery/jobs/";
pub const LOAD_MORE_XPATH: &str = "//p[contains(text(), 'Load More')]";


/// Presses "Load More" on the startups.gallery jobs page and collects every listing it reveals.
pub struct StartupJobScraper<'a, P: Page + ?Sized> {
    page: &'a P,
    base: Url,
    /// Upper bound on waiting for the first listings to render
    page_timeout: Duration,
    /// Upper bound on waiting for new listings after each press
    load_timeout: Duration
}


impl<'a, P: Page + ?Sized> StartupJobScraper<'a, P> {
    pub fn new(page: &'a P, page_timeout: Duration, load_timeout: Duration) -> Self {
        Self {
            page,
            base: Url::parse(JOBS_URL).expect("JOBS_URL is a valid URL"),
            page_timeout,
            load_timeout
        }
    }

    /// Opens the jobs page, collects what is shown, then presses "Load More" up to
    /// `num_clicks` times, collecting again after each press.
    ///
    /// Stops pressing early when the control is gone or the page can no longer be
    /// read; whatever was collected until then stays in `jobs`. Failing to open the
    /// page and inconsistent listings are returned as errors.
    ///
    /// Returns the number of presses that went through.
    pub fn load_more_jobs(&self, num_clicks: u32, jobs: &mut AccumulatedJobs) -> Result<u32, ScrapeError> {
        self.page.goto(JOBS_URL)?;
        if let Err(e) = self.page.wait_for(JOB_LINK_SELECTOR, self.page_timeout) {
            warn!("Job listings did not render: {e}");
        }
        self.pull_data(jobs)?;

        let mut clicks = 0;
        for i in 1..=num_clicks {
            let shown = self.page.count(JOB_LINK_SELECTOR);
            if let Err(e) = self.page.click_xpath(LOAD_MORE_XPATH) {
                info!("No more jobs to load after {clicks} clicks: {e}");
                break;
            }
            clicks = i;

            if !poll_until(self.load_timeout, || self.page.count(JOB_LINK_SELECTOR) > shown) {
                warn!("No new listings appeared after click {i}");
            }

            match self.pull_data(jobs) {
                Ok(_) => {}
                Err(e @ ScrapeError::PreconditionViolated(_)) => return Err(e),
                Err(e) => {
                    warn!("Error reading listings after click {i}: {e}");
                    break;
                }
            }
        }

        Ok(clicks)
    }

    /// Extracts the listings on the current page into `jobs`, returning how many were new.
    fn pull_data(&self, jobs: &mut AccumulatedJobs) -> Result<usize, ScrapeError> {
        let html = self.page.html()?;
        let added = jobs.merge(pull_listings(&html, &self.base))?;
        info!("Collected {added} new jobs ({} total)", jobs.len());
        Ok(added)
    }
}


#[cfg(test)]
mod tests {
    use super::*;
    use crate::browser::testing::StaticPage;

    fn snapshot(cards: &[(&str, &str, &str)]) -> String {
        let cards: String = cards
            .iter()
            .map(|(href, position, company)| format!(
                r#"<a class="framer-1fxtycr framer-1s7tguz" href="{href}">
                    <div data-framer-name="Company Name">{position}</div>
                    <div data-framer-name="Company Name">{company}</div>
                </a>"#
            ))
            .collect();
        format!(r#"<html><body><div class="framer-page">{cards}<p>Load More</p></div></body></html>"#)
    }

    fn scraper(page: &StaticPage) -> StartupJobScraper<'_, StaticPage> {
        StartupJobScraper::new(page, Duration::from_millis(10), Duration::from_millis(10))
    }

    #[test]
    fn stops_early_when_load_more_runs_out() {
        let page = StaticPage::with_snapshots(vec![
            snapshot(&[("/a", "Engineer", "Acme")]),
            snapshot(&[("/a", "Engineer", "Acme"), ("/b", "Designer", "Beta")]),
            snapshot(&[("/a", "Engineer", "Acme"), ("/b", "Designer", "Beta"), ("/c", "Analyst", "Gamma")]),
        ]);
        let mut jobs = AccumulatedJobs::default();

        let clicks = scraper(&page).load_more_jobs(5, &mut jobs).unwrap();

        assert_eq!(clicks, 2);
        assert_eq!(page.visited(), [JOBS_URL]);
        let urls: Vec<_> = jobs.iter().map(|job| job.url.as_str()).collect();
        assert_eq!(
            urls,
            ["https://startups.gallery/a", "https://startups.gallery/b", "https://startups.gallery/c"]
        );
    }

    #[test]
    fn zero_clicks_collects_the_first_page() {
        let page = StaticPage::with_snapshots(vec![
            snapshot(&[("/a", "Engineer", "Acme")]),
            snapshot(&[("/a", "Engineer", "Acme"), ("/b", "Designer", "Beta")]),
        ]);
        let mut jobs = AccumulatedJobs::default();

        assert_eq!(scraper(&page).load_more_jobs(0, &mut jobs).unwrap(), 0);
        assert_eq!(page.clicks(), 0);
        assert_eq!(jobs.len(), 1);
    }

    #[test]
    fn relabelled_cards_keep_their_first_title() {
        let page = StaticPage::with_snapshots(vec![
            snapshot(&[("/a", "Engineer", "Acme")]),
            snapshot(&[("/a", "Staff Engineer", "Acme Inc"), ("/b", "Designer", "Beta")]),
        ]);
        let mut jobs = AccumulatedJobs::default();

        scraper(&page).load_more_jobs(1, &mut jobs).unwrap();

        assert_eq!(jobs.get("https://startups.gallery/a").unwrap().title, "Engineer");
        assert_eq!(jobs.len(), 2);
    }

    #[test]
    fn unreachable_page_is_fatal() {
        let page = StaticPage::unreachable();
        let mut jobs = AccumulatedJobs::default();

        let err = scraper(&page).load_more_jobs(3, &mut jobs).unwrap_err();

        assert!(matches!(err, ScrapeError::NavigationFailed { .. }));
        assert!(jobs.is_empty());
    }

    #[test]
    fn odd_label_count_aborts() {
        let broken = r#"<html><body><div class="framer-page">
            <a class="framer-1fxtycr framer-1s7tguz" href="/a"><div data-framer-name="Company Name">Engineer</div></a>
        </div></body></html>"#;
        let page = StaticPage::new(broken);
        let mut jobs = AccumulatedJobs::default();

        let err = scraper(&page).load_more_jobs(1, &mut jobs).unwrap_err();

        assert!(matches!(err, ScrapeError::PreconditionViolated(_)));
        assert!(jobs.is_empty());
    }

    #[test]
    fn empty_page_is_not_an_error() {
        let page = StaticPage::new("<html><body><p>Nothing here yet</p></body></html>");
        let mut jobs = AccumulatedJobs::default();

        assert_eq!(scraper(&page).load_more_jobs(2, &mut jobs).unwrap(), 0);
        assert!(jobs.is_empty());
    }
}
