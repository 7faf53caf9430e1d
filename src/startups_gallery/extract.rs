use scraper::{ElementRef, Html, Selector};
use tracing::{debug, warn};
use url::Url;

use crate::browser::element_text;

/// Anchors wrapping a single job card
pub const JOB_LINK_SELECTOR: &str = "a[class*='framer-1fxtycr'][class*='framer-1s7tguz']";
const COMPANY_NAME_SELECTOR: &str = "div[data-framer-name='Company Name']";
const FRAMER_CLASS_PREFIX: &str = "framer-";


/// One extraction pass over the jobs page, as three parallel sequences.
///
/// Nothing guarantees the sequences line up. The page labels both the position
/// and the company with the same `Company Name` marker, so an odd number of
/// labels or a card without a link leaves them with different lengths, which
/// [`AccumulatedJobs::merge`](super::AccumulatedJobs::merge) rejects.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Listings {
    pub positions: Vec<String>,
    pub company_info: Vec<String>,
    pub links: Vec<String>
}


impl Listings {
    /// Splits `labels` by position (even indices are positions, odd indices are
    /// company labels) and pairs them with `links`.
    pub fn from_labels(labels: Vec<String>, links: Vec<String>) -> Self {
        let mut positions = Vec::with_capacity(labels.len() / 2 + 1);
        let mut company_info = Vec::with_capacity(labels.len() / 2);
        for (i, label) in labels.into_iter().enumerate() {
            if i % 2 == 0 {
                positions.push(label);
            } else {
                company_info.push(label);
            }
        }
        Self { positions, company_info, links }
    }

    pub fn is_empty(&self) -> bool {
        self.positions.is_empty() && self.company_info.is_empty() && self.links.is_empty()
    }
}


/// Pulls job listings out of the rendered startups.gallery jobs page.
///
/// Relative links are resolved against `base`. A page without job cards
/// yields empty listings.
pub fn pull_listings(html: &str, base: &Url) -> Listings {
    let document = Html::parse_document(html);
    let job_links = Selector::parse(JOB_LINK_SELECTOR).expect("job link selector is valid CSS");
    let company_names = Selector::parse(COMPANY_NAME_SELECTOR).expect("company name selector is valid CSS");

    let jobs: Vec<ElementRef> = document.select(&job_links).collect();
    let Some(first_job) = jobs.first() else {
        warn!("No job elements found");
        return Listings::default();
    };

    let labels: Vec<String> = match listing_container(*first_job) {
        Some(container) => container.select(&company_names).map(element_text).collect(),
        None => document.select(&company_names).map(element_text).collect()
    };
    debug!(labels = labels.len(), links = jobs.len(), "pulled job listings");

    let links = jobs
        .iter()
        .map(|job| {
            let href = job.value().attr("href").unwrap_or_default();
            base.join(href).map_or_else(|_| href.to_string(), String::from)
        })
        .collect();

    Listings::from_labels(labels, links)
}


/// The outermost Framer `div` wrapping `job`, which holds every card on the page.
fn listing_container(job: ElementRef<'_>) -> Option<ElementRef<'_>> {
    job.ancestors()
        .filter_map(ElementRef::wrap)
        .filter(|element| {
            let element = element.value();
            element.name() == "div"
                && element.attr("class").is_some_and(|class| class.contains(FRAMER_CLASS_PREFIX))
        })
        .last()
}
