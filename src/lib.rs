//! Scrapers for job postings on applicant tracking systems (Ashby, Lever,
//! Greenhouse) and for the startups.gallery job board.
//!
//! Pages are rendered in headless Chrome. ATS postings are turned into
//! structured JSON by the Anthropic Messages API; startups.gallery listings
//! are collected across "Load More" presses and exported as CSV.

pub mod browser;
pub mod commands;
pub mod config;
pub mod error;
pub mod llm;
pub mod logging;
pub mod page_scrapers;
pub mod startups_gallery;

pub use config::Config;
pub use error::ScrapeError;
