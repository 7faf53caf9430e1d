use std::{sync::Arc, time::{Duration, Instant}};

use anyhow::Context;
use headless_chrome::{Browser, LaunchOptions, Tab};
use scraper::ElementRef;

use crate::error::ScrapeError;

const WINDOW_SIZE: (u32, u32) = (1920, 1080);
/// How often [`poll_until`] re-checks its condition.
pub const POLL_INTERVAL: Duration = Duration::from_millis(250);


/// The subset of browser behaviour the scrapers rely on.
///
/// Every method blocks until the browser answers. Selectors are CSS unless the
/// method says otherwise.
pub trait Page {
    /// Navigates to `url` and waits for the navigation to settle.
    fn goto(&self, url: &str) -> Result<(), ScrapeError>;

    /// Waits until an element matching `selector` exists, failing after `timeout`.
    fn wait_for(&self, selector: &str, timeout: Duration) -> Result<(), ScrapeError>;

    /// Visible text of the first element matching `selector`.
    fn text_of(&self, selector: &str) -> Result<String, ScrapeError>;

    /// The document title.
    fn title(&self) -> Result<String, ScrapeError>;

    /// Serialized HTML of the page as currently rendered.
    fn html(&self) -> Result<String, ScrapeError>;

    /// Number of elements currently matching `selector`. Zero when nothing matches.
    fn count(&self, selector: &str) -> usize;

    /// Clicks the first element matching an XPath expression.
    fn click_xpath(&self, xpath: &str) -> Result<(), ScrapeError>;
}


impl Page for Tab {
    fn goto(&self, url: &str) -> Result<(), ScrapeError> {
        self.navigate_to(url)
            .and_then(|tab| tab.wait_until_navigated())
            .map(|_| ())
            .map_err(|e| ScrapeError::navigation(url, e))
    }

    fn wait_for(&self, selector: &str, timeout: Duration) -> Result<(), ScrapeError> {
        self.wait_for_element_with_custom_timeout(selector, timeout)
            .map(|_| ())
            .map_err(|e| ScrapeError::element(selector, e))
    }

    fn text_of(&self, selector: &str) -> Result<String, ScrapeError> {
        self.find_element(selector)
            .and_then(|element| element.get_inner_text())
            .map_err(|e| ScrapeError::element(selector, e))
    }

    fn title(&self) -> Result<String, ScrapeError> {
        self.get_title().map_err(|e| ScrapeError::element("title", e))
    }

    fn html(&self) -> Result<String, ScrapeError> {
        self.get_content().map_err(|e| ScrapeError::navigation(&self.get_url(), e))
    }

    fn count(&self, selector: &str) -> usize {
        self.find_elements(selector).map(|elements| elements.len()).unwrap_or(0)
    }

    fn click_xpath(&self, xpath: &str) -> Result<(), ScrapeError> {
        self.find_element_by_xpath(xpath)
            .and_then(|element| element.click().map(|_| ()))
            .map_err(|e| ScrapeError::element(xpath, e))
    }
}


/// A running Chrome with a single tab.
///
/// Chrome is shut down when the session is dropped, so keep the session alive
/// for as long as its tab is in use.
pub struct BrowserSession {
    _browser: Browser,
    tab: Arc<Tab>
}


impl BrowserSession {
    pub fn launch(headless: bool, user_agent: &str) -> anyhow::Result<Self> {
        let options = LaunchOptions::default_builder()
            .headless(headless)
            .window_size(Some(WINDOW_SIZE))
            .idle_browser_timeout(Duration::from_secs(120))
            .build()
            .map_err(|e| anyhow::anyhow!("Invalid browser launch options: {e}"))?;

        let browser = Browser::new(options).context("Failed to launch Chrome. Is it installed?")?;
        let tab = browser.new_tab().context("Failed to open a browser tab")?;
        tab.set_user_agent(user_agent, None, None).context("Failed to set the browser user agent")?;
        tracing::debug!(headless, "browser session started");

        Ok(Self { _browser: browser, tab })
    }

    pub fn tab(&self) -> Arc<Tab> {
        self.tab.clone()
    }
}


/// Re-checks `condition` every [`POLL_INTERVAL`] until it holds or `timeout` elapses.
///
/// Returns whether the condition was met. The condition is always checked at least once.
pub fn poll_until(timeout: Duration, mut condition: impl FnMut() -> bool) -> bool {
    let deadline = Instant::now() + timeout;
    loop {
        if condition() {
            return true;
        }
        let now = Instant::now();
        if now >= deadline {
            return false;
        }
        std::thread::sleep(POLL_INTERVAL.min(deadline - now));
    }
}


/// Text content of a parsed element with runs of whitespace collapsed, roughly what a browser would show.
pub fn element_text(element: ElementRef<'_>) -> String {
    element
        .text()
        .flat_map(str::split_whitespace)
        .collect::<Vec<_>>()
        .join(" ")
}




#[cfg(test)]
mod tests {
    use std::cell::Cell;

    use scraper::{Html, Selector};

    use super::*;

    #[test]
    fn poll_until_returns_as_soon_as_condition_holds() {
        let calls = Cell::new(0);
        let met = poll_until(Duration::from_secs(5), || {
            calls.set(calls.get() + 1);
            calls.get() == 2
        });
        assert!(met);
        assert_eq!(calls.get(), 2);
    }

    #[test]
    fn poll_until_gives_up_after_timeout() {
        let started = Instant::now();
        assert!(!poll_until(Duration::from_millis(50), || false));
        assert!(started.elapsed() >= Duration::from_millis(50));
    }

    #[test]
    fn element_text_collapses_whitespace() {
        let html = Html::parse_fragment("<div>  Senior\n   Engineer <span>\tRemote </span></div>");
        let div = html.select(&Selector::parse("div").unwrap()).next().unwrap();
        assert_eq!(element_text(div), "Senior Engineer Remote");
    }
}
