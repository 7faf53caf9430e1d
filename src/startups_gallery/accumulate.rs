use fxhash::FxHashSet;
use serde::Serialize;

use crate::error::ScrapeError;

use super::Listings;


/// A job listing keyed by its application link.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct JobRecord {
    pub url: String,
    pub title: String,
    pub company_info: String
}


/// Every job seen during one run, in the order it was first seen.
///
/// Links are unique. The first title and company label captured for a link are
/// kept for the rest of the run.
#[derive(Debug, Default)]
pub struct AccumulatedJobs {
    records: Vec<JobRecord>,
    seen: FxHashSet<String>
}


impl AccumulatedJobs {
    /// Adds a record for every link not seen before and returns how many were added.
    ///
    /// The three sequences must be the same length; otherwise nothing is added.
    pub fn merge(&mut self, listings: Listings) -> Result<usize, ScrapeError> {
        let Listings { positions, company_info, links } = listings;
        if positions.len() != company_info.len() || positions.len() != links.len() {
            return Err(ScrapeError::PreconditionViolated(format!(
                "listings must have equal lengths, got {} positions, {} company labels and {} links",
                positions.len(),
                company_info.len(),
                links.len()
            )));
        }

        let before = self.records.len();
        for ((title, company_info), url) in positions.into_iter().zip(company_info).zip(links) {
            if self.seen.insert(url.clone()) {
                self.records.push(JobRecord { url, title, company_info });
            }
        }
        Ok(self.records.len() - before)
    }

    pub fn get(&self, url: &str) -> Option<&JobRecord> {
        if !self.seen.contains(url) {
            return None;
        }
        self.records.iter().find(|record| record.url == url)
    }

    pub fn iter(&self) -> impl Iterator<Item = &JobRecord> {
        self.records.iter()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}
