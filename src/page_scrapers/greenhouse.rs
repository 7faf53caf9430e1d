use std::time::Duration;

use crate::{browser::Page, error::ScrapeError};

use super::{CapturedPosting, PageScraper, Platform};

const TITLE_SEPARATOR: &str = " | ";


/// A scraper for Greenhouse job boards
///
/// Greenhouse puts the job title at the front of the document title, e.g.
/// `Backend Engineer | Acme`, so the DOM is only read for the page text.
pub(super) struct GreenhouseScraper;

impl PageScraper for GreenhouseScraper {
    const NAME: &'static str = "Greenhouse";
    const HOST: &'static str = "greenhouse.io";
    const PLATFORM: Platform = Platform::Greenhouse;

    fn capture<P: Page + ?Sized>(page: &P, url: &str, timeout: Duration) -> Result<CapturedPosting, ScrapeError> {
        page.goto(url)?;
        page.wait_for("body", timeout)?;

        let job_title = title_from_document_title(&page.title()?);
        let full_text = page.text_of("body")?;
        Ok(Self::posting(url, job_title, full_text))
    }
}


fn title_from_document_title(title: &str) -> String {
    match title.split_once(TITLE_SEPARATOR) {
        Some((job_title, _)) => job_title.to_string(),
        None => "Not found".to_string()
    }
}
