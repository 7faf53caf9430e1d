use thiserror::Error;


/// Everything that can go wrong while driving a page or talking to the LLM.
#[derive(Debug, Error)]
pub enum ScrapeError {
    #[error("failed to navigate to {url}: {reason}")]
    NavigationFailed {
        url: String,
        reason: String
    },

    #[error("no element matching `{selector}`: {reason}")]
    ElementNotFound {
        selector: String,
        reason: String
    },

    /// The LLM could not be reached, either because no API key is set or
    /// because the request itself failed.
    #[error("{0}")]
    LlmUnavailable(String),

    /// The LLM answered but its reply was not a JSON object.
    #[error("{0}")]
    LlmParseFailed(String),

    /// A caller broke a contract, such as handing the accumulator sequences of different lengths.
    #[error("precondition violated: {0}")]
    PreconditionViolated(String)
}


impl ScrapeError {
    pub(crate) fn navigation(url: &str, reason: impl ToString) -> Self {
        Self::NavigationFailed { url: url.to_string(), reason: reason.to_string() }
    }

    pub(crate) fn element(selector: &str, reason: impl ToString) -> Self {
        Self::ElementNotFound { selector: selector.to_string(), reason: reason.to_string() }
    }
}
