use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

use crate::config::CliConfig;
use crate::error::{Result, SportsHubError};
use crate::http;

const DEFAULT_BASE_URL: &str = "https://openrouter.ai/api/v1";
pub const DEFAULT_MODEL: &str = "deepseek/deepseek-chat-v3.1:free";
/// Content beyond this many characters is cut before it is sent.
pub const MAX_CONTENT_CHARS: usize = 20_000;
const TRUNCATION_MARKER: &str = "...[truncated]";

const REFERER: &str = "https://sportshub.ai";
const TITLE: &str = "Sportshub CLI";

pub const WEBSITE_ANALYSIS_PROMPT: &str = "Please analyze the following website content and provide a summary in 3-5 bullet points about what this organization/business does. Focus on their main activities, target audience, and any sports/fitness related content. Keep each bullet point concise and under 20 words. Please also return in markdown format.";

pub const FILE_SUMMARY_PROMPT: &str = "Please analyze the following text content and provide a concise summary in bullet points (maximum 10 bullet points). Focus on the key points, main topics, and important information. Keep each bullet point clear and under 25 words. Format the response in markdown.";

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage>,
}

#[derive(Debug, Serialize, Deserialize)]
struct ChatMessage {
    role: String,
    #[serde(default)]
    content: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ChatMessage,
}

/// Client for OpenRouter chat completions, used to summarise lead material.
pub struct OpenRouterClient {
    http: reqwest::Client,
    api_key: String,
    base_url: String,
    model: String,
}

impl OpenRouterClient {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self::with_base_url(api_key, DEFAULT_BASE_URL)
    }

    pub fn with_base_url(api_key: impl Into<String>, base_url: impl Into<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            api_key: api_key.into(),
            base_url: base_url.into(),
            model: DEFAULT_MODEL.to_string(),
        }
    }

    pub fn from_config(config: &CliConfig) -> Self {
        Self::new(&config.open_router_api_token)
    }

    /// Ask the model to apply `prompt` to `content` and return its trimmed answer.
    #[instrument(skip(self, prompt, content), fields(model = %self.model, chars = content.len()))]
    pub async fn analyze(&self, prompt: &str, content: &str) -> Result<String> {
        let url = format!("{}/chat/completions", self.base_url);
        let body = ChatRequest {
            model: &self.model,
            messages: vec![ChatMessage {
                role: "user".to_string(),
                content: Some(build_prompt(prompt, content)),
            }],
        };

        let request = self
            .http
            .post(&url)
            .bearer_auth(&self.api_key)
            .header("HTTP-Referer", REFERER)
            .header("X-Title", TITLE)
            .json(&body);
        let response: ChatResponse = http::send_json(request, &url).await?;

        let summary = response
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .map(|text| text.trim().to_string())
            .filter(|text| !text.is_empty())
            .ok_or(SportsHubError::EmptyResponse(
                "No summary generated from OpenRouter API",
            ))?;

        debug!(chars = summary.len(), "received analysis");
        Ok(summary)
    }

    /// Three to five bullet points on what an organisation's website says it does.
    pub async fn analyze_website_content(&self, website_text: &str) -> Result<String> {
        self.analyze(WEBSITE_ANALYSIS_PROMPT, website_text).await
    }

    /// Up to ten bullet points summarising meeting notes or similar text.
    pub async fn summarize_file_content(&self, file_text: &str) -> Result<String> {
        self.analyze(FILE_SUMMARY_PROMPT, file_text).await
    }
}

/// The single user message sent for an analysis.
fn build_prompt(prompt: &str, content: &str) -> String {
    let mut text = format!("{prompt}\n\nContent to analyze:\n");
    match content.char_indices().nth(MAX_CONTENT_CHARS) {
        Some((cut, _)) => {
            text.push_str(&content[..cut]);
            text.push_str(TRUNCATION_MARKER);
        }
        None => text.push_str(content),
    }
    text
}
