use std::time::Duration;

use regex::Regex;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};
use tracing::{error, info, warn};

use crate::{config::Config, error::ScrapeError, page_scrapers::{CapturedPosting, Platform}};

const ANTHROPIC_VERSION: &str = "2023-06-01";
const REQUEST_TIMEOUT: Duration = Duration::from_secs(120);


#[derive(Serialize)]
struct MessagesRequest<'a> {
    model: &'a str,
    max_tokens: u32,
    temperature: f32,
    messages: [Message<'a>; 1]
}


#[derive(Serialize)]
struct Message<'a> {
    role: &'a str,
    content: &'a str
}


#[derive(Deserialize)]
struct MessagesResponse {
    content: Vec<ContentBlock>
}


#[derive(Deserialize)]
struct ContentBlock {
    #[serde(rename = "type")]
    kind: String,
    #[serde(default)]
    text: String
}


struct Connection {
    http: Client,
    api_key: String
}


struct ReplyPatterns {
    fenced_json: Regex
}


impl Default for ReplyPatterns {
    fn default() -> Self {
        Self {
            fenced_json: Regex::new(r"(?s)```json\n(.*?)\n```").unwrap()
        }
    }
}


/// Turns captured posting text into structured fields with the Anthropic Messages API.
pub struct LlmClient {
    connection: Option<Connection>,
    model: String,
    max_tokens: u32,
    endpoint: String,
    patterns: ReplyPatterns
}


impl LlmClient {
    /// Builds a client from `config`. Without an API key every request short-circuits to an error payload.
    pub fn new(config: &Config) -> Self {
        let connection = match config.api_key.as_deref() {
            Some(api_key) => match Client::builder().timeout(REQUEST_TIMEOUT).build() {
                Ok(http) => Some(Connection { http, api_key: api_key.to_string() }),
                Err(e) => {
                    error!("Failed to create HTTP client for the LLM: {e}");
                    None
                }
            },
            None => {
                warn!("ANTHROPIC_API_KEY not found in environment variables!");
                None
            }
        };

        Self {
            connection,
            model: config.llm.model.clone(),
            max_tokens: config.llm.max_tokens,
            endpoint: format!("{}/v1/messages", config.llm.base_url.trim_end_matches('/')),
            patterns: ReplyPatterns::default()
        }
    }

    pub fn is_configured(&self) -> bool {
        self.connection.is_some()
    }

    /// Extracts structured fields from `posting`.
    ///
    /// On failure the result is `{"error": <message>, "raw_data": <posting>}`.
    pub async fn process_with_llm(&self, posting: &CapturedPosting) -> Value {
        match self.extract(posting).await {
            Ok(fields) => Value::Object(fields),
            Err(e) => {
                match &e {
                    ScrapeError::LlmUnavailable(_) => error!("Anthropic API unavailable: {e}"),
                    _ => error!("Error processing with LLM: {e}")
                }
                json!({ "error": e.to_string(), "raw_data": posting })
            }
        }
    }

    async fn extract(&self, posting: &CapturedPosting) -> Result<Map<String, Value>, ScrapeError> {
        let Some(connection) = &self.connection else {
            return Err(ScrapeError::LlmUnavailable("LLM client not configured".to_string()));
        };

        let prompt = build_prompt(posting);
        let request = MessagesRequest {
            model: &self.model,
            max_tokens: self.max_tokens,
            temperature: 0.0,
            messages: [Message { role: "user", content: &prompt }]
        };

        info!("Sending {} posting to {}", posting.platform, self.model);
        let response = connection
            .http
            .post(&self.endpoint)
            .header("x-api-key", &connection.api_key)
            .header("anthropic-version", ANTHROPIC_VERSION)
            .json(&request)
            .send()
            .await
            .map_err(|e| ScrapeError::LlmUnavailable(format!("Failed to reach the Anthropic API: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ScrapeError::LlmUnavailable(format!("Anthropic API returned {status}: {body}")));
        }

        let reply: MessagesResponse = response
            .json()
            .await
            .map_err(|e| ScrapeError::LlmParseFailed(format!("Unexpected Anthropic API response: {e}")))?;

        let text = reply
            .content
            .into_iter()
            .find(|block| block.kind == "text")
            .map(|block| block.text)
            .ok_or_else(|| ScrapeError::LlmParseFailed("Anthropic API reply had no text".to_string()))?;

        self.parse_reply(&text, &posting.url, posting.platform)
    }

    /// Parses the model's reply into a JSON object.
    ///
    /// The body of the first ```` ```json ```` fence is used when there is one,
    /// otherwise the whole reply. `source_url` and `platform` are filled in when
    /// the model left them out.
    pub fn parse_reply(&self, text: &str, url: &str, platform: Platform) -> Result<Map<String, Value>, ScrapeError> {
        let json_text = self
            .patterns
            .fenced_json
            .captures(text)
            .and_then(|captures| captures.get(1))
            .map_or(text, |body| body.as_str())
            .trim();

        let mut fields: Map<String, Value> = serde_json::from_str(json_text)
            .map_err(|e| ScrapeError::LlmParseFailed(e.to_string()))?;

        fields.entry("source_url").or_insert_with(|| Value::String(url.to_string()));
        fields.entry("platform").or_insert_with(|| Value::String(platform.name().to_string()));
        Ok(fields)
    }
}


fn build_prompt(posting: &CapturedPosting) -> String {
    let CapturedPosting { url, full_text, platform, .. } = posting;
    format!(
        r#"Extract structured information from this {platform} job posting.

JOB POSTING CONTENT:
{full_text}

Return a JSON object with these fields:
- job_title: The exact title of the position
- company_name: Name of the hiring company
- location: Where the job is located (include if remote)
- employment_type: Full-time, Part-time, Contract, etc.
- department: Which department the role belongs to
- application_deadline: The deadline to apply if specified
- compensation: Salary range and compensation details
- required_skills: List of required skills
- experience_level: Junior, Mid, Senior, Lead, etc.
- job_description: A 2-3 sentence summary of the role
- responsibilities: List of key responsibilities
- qualifications: List of required qualifications
- benefits: List of benefits mentioned
- good_fit_indicators: List of traits that make someone a good fit
- poor_fit_indicators: List of traits that would make someone a poor fit
- application_instructions: How to apply
- source_url: {url}
- platform: {platform}

Only include fields where information is explicitly provided. Use null for missing information."#
    )
}
