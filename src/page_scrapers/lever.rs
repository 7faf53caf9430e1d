use std::time::Duration;

use crate::{browser::Page, error::ScrapeError};

use super::{CapturedPosting, PageScraper, Platform};

const HEADLINE: &str = ".posting-headline";
const HEADLINE_TITLE: &str = ".posting-headline h2";


/// A scraper for Lever job boards
pub(super) struct LeverScraper;

impl PageScraper for LeverScraper {
    const NAME: &'static str = "Lever";
    const HOST: &'static str = "lever.co";
    const PLATFORM: Platform = Platform::Lever;

    fn capture<P: Page + ?Sized>(page: &P, url: &str, timeout: Duration) -> Result<CapturedPosting, ScrapeError> {
        page.goto(url)?;
        page.wait_for(HEADLINE, timeout)?;

        let job_title = page.text_of(HEADLINE_TITLE)?;
        let full_text = page.text_of("body")?;
        Ok(Self::posting(url, job_title, full_text))
    }
}


#[cfg(test)]
mod tests {
    use super::*;
    use crate::browser::testing::StaticPage;

    #[test]
    fn title_comes_from_headline() {
        let page = StaticPage::new(r#"
            <html><body>
                <div class="posting-headline"><h2>Data Engineer</h2><div>Remote</div></div>
                <div class="section">Responsibilities go here</div>
            </body></html>"#);

        let posting = LeverScraper::capture(&page, "https://jobs.lever.co/cardless/1", Duration::from_millis(10)).unwrap();

        assert_eq!(posting.job_title, "Data Engineer");
        assert!(posting.full_text.contains("Responsibilities go here"));
        assert_eq!(posting.platform, Platform::Lever);
    }

    #[test]
    fn headline_without_title_is_an_error() {
        let page = StaticPage::new("<html><body><div class=\"posting-headline\"></div></body></html>");
        let err = LeverScraper::capture(&page, "https://jobs.lever.co/cardless/1", Duration::from_millis(10)).unwrap_err();
        assert!(matches!(err, ScrapeError::ElementNotFound { ref selector, .. } if selector == HEADLINE_TITLE));
    }
}
