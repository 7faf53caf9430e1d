use std::time::Duration;

use crate::{browser::Page, error::ScrapeError};

use super::{CapturedPosting, PageScraper, Platform};

/// Only present once the posting body has rendered
const RIGHT_PANE: &str = "[class*='ashby-job-posting-right-pane']";
const TITLES: &str = "div[class*='_titles_']";


/// A scraper for Ashby job boards
pub(super) struct AshbyScraper;

impl PageScraper for AshbyScraper {
    const NAME: &'static str = "Ashby";
    const HOST: &'static str = "ashbyhq.com";
    const PLATFORM: Platform = Platform::Ashby;

    fn capture<P: Page + ?Sized>(page: &P, url: &str, timeout: Duration) -> Result<CapturedPosting, ScrapeError> {
        page.goto(url)?;
        page.wait_for(RIGHT_PANE, timeout)?;
        // The title block renders after the right pane
        page.wait_for(TITLES, timeout)?;

        let job_title = page.text_of(TITLES)?;
        let full_text = page.text_of("body")?;
        Ok(Self::posting(url, job_title, full_text))
    }
}


#[cfg(test)]
mod tests {
    use super::*;
    use crate::browser::testing::StaticPage;

    const POSTING: &str = r#"
        <html><body>
            <div class="_titles_ud4nd_1"><h1>Founding Engineer</h1></div>
            <div class="ashby-job-posting-right-pane">
                <p>We are hiring a founding engineer.</p>
                <p>Compensation: $150K - $200K</p>
            </div>
        </body></html>"#;

    #[test]
    fn captures_title_and_page_text() {
        let page = StaticPage::new(POSTING);
        let url = "https://jobs.ashbyhq.com/acme/123";

        let posting = AshbyScraper::capture(&page, url, Duration::from_millis(10)).unwrap();

        assert_eq!(page.visited(), vec![url.to_string()]);
        assert_eq!(posting.job_title, "Founding Engineer");
        assert!(posting.full_text.contains("Compensation: $150K - $200K"));
        assert_eq!(posting.platform, Platform::Ashby);
    }

    #[test]
    fn missing_right_pane_is_an_error() {
        let page = StaticPage::new("<html><body><div class=\"_titles_x\">Engineer</div></body></html>");
        let err = AshbyScraper::capture(&page, "https://jobs.ashbyhq.com/acme/1", Duration::from_millis(10)).unwrap_err();
        assert!(matches!(err, ScrapeError::ElementNotFound { ref selector, .. } if selector == RIGHT_PANE));
    }
}
