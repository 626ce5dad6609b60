//! Chat client and suggestion generation.
//!
//! [`ChatClient`] is the seam between the suggestion engine and the model
//! backend: it takes a system instruction, a user instruction and a generation
//! count and returns that many independent candidate texts. The production
//! implementation talks to the OpenAI chat-completions API; a deterministic
//! mock backs tests and `SHAI_USE_MOCK=1` runs.

use crate::config::Config;
use crate::http_client::{HttpClient, ReqwestHttpClient};
use crate::parser;
use anyhow::{anyhow, Result};
use async_trait::async_trait;
use serde_json::json;
use tracing::{info, warn};

const DEFAULT_API_BASE: &str = "https://api.openai.com/v1";

#[async_trait]
pub trait ChatClient: Send + Sync {
    /// Requests `n` independent completions for one system/user message pair.
    async fn complete(&self, system: &str, user: &str, n: usize) -> Result<Vec<String>>;
}

pub struct OpenAiClient {
    http: Box<dyn HttpClient>,
    api_key: String,
    api_base: String,
    model: String,
    max_tokens: Option<u32>,
}

impl OpenAiClient {
    pub fn new(config: &Config, api_key: String) -> Self {
        Self::with_http_client(config, api_key, Box::new(ReqwestHttpClient::new()))
    }

    /// Creates a client with an injected transport (for testing).
    pub fn with_http_client(config: &Config, api_key: String, http: Box<dyn HttpClient>) -> Self {
        Self {
            http,
            api_key,
            api_base: config
                .api_base
                .clone()
                .unwrap_or_else(|| DEFAULT_API_BASE.to_string()),
            model: config.model.clone(),
            max_tokens: config.max_tokens,
        }
    }
}

#[async_trait]
impl ChatClient for OpenAiClient {
    async fn complete(&self, system: &str, user: &str, n: usize) -> Result<Vec<String>> {
        let url = format!("{}/chat/completions", self.api_base.trim_end_matches('/'));
        let mut body = json!({
            "model": self.model,
            "messages": [
                {"role": "system", "content": system},
                {"role": "user", "content": user},
            ],
            "n": n,
            "temperature": 0.7,
            "top_p": 1,
        });
        if let Some(max_tokens) = self.max_tokens {
            body["max_tokens"] = json!(max_tokens);
        }

        let auth = format!("Bearer {}", self.api_key);
        let response_text = self
            .http
            .post_json(
                &url,
                &[
                    ("authorization", auth.as_str()),
                    ("content-type", "application/json"),
                ],
                &body,
            )
            .await?;

        let response: serde_json::Value = serde_json::from_str(&response_text)
            .map_err(|_| anyhow!("Malformed response from chat API: {}", response_text))?;

        if let Some(message) = response
            .get("error")
            .and_then(|e| e.get("message"))
            .and_then(|m| m.as_str())
        {
            return Err(anyhow!("Chat API error: {}", message));
        }

        let choices = response
            .get("choices")
            .and_then(|c| c.as_array())
            .ok_or_else(|| anyhow!("Chat API response has no choices: {}", response_text))?;

        let texts: Vec<String> = choices
            .iter()
            .filter_map(|choice| {
                choice
                    .get("message")
                    .and_then(|m| m.get("content"))
                    .and_then(|c| c.as_str())
                    .map(|s| s.to_string())
            })
            .collect();

        if texts.is_empty() {
            return Err(anyhow!("Chat API returned no message content"));
        }
        Ok(texts)
    }
}

/// Canned client used in mock mode and tests.
///
/// Keyed off the user message so integration tests get stable commands; every
/// generation returns the same text `n` times, which also exercises the
/// dedup step downstream.
pub struct MockChatClient;

#[async_trait]
impl ChatClient for MockChatClient {
    async fn complete(&self, _system: &str, user: &str, n: usize) -> Result<Vec<String>> {
        info!("Using mock chat client (SHAI_USE_MOCK=1)");
        let command = if user.contains("list files") {
            r#"{"command": "ls -la"}"#
        } else if user.contains("disk") {
            r#"{"command": "df -h"}"#
        } else if user.contains("working directory") {
            r#"{"command": "pwd"}"#
        } else {
            r#"{"command": "echo 'hello from shai'"}"#
        };
        Ok(vec![command.to_string(); n])
    }
}

/// Builds prompts, queries the chat client and extracts candidate commands.
pub struct SuggestionEngine {
    client: Box<dyn ChatClient>,
    platform: String,
}

impl SuggestionEngine {
    pub fn new(client: Box<dyn ChatClient>) -> Self {
        Self {
            client,
            platform: crate::platform::description(),
        }
    }

    /// Generates up to `n` deduplicated candidate commands for the prompt.
    ///
    /// The returned list preserves first-seen order and contains no empty
    /// strings; it may be shorter than `n` or empty. Client failures
    /// propagate and abort the round.
    pub async fn generate(
        &self,
        prompt: &str,
        context: Option<&str>,
        n: usize,
    ) -> Result<Vec<String>> {
        let system = self.build_system_message(context);
        let user = format!("Here's what I'm trying to do: {}", prompt);

        let messages = self.client.complete(&system, &user, n).await?;

        let mut commands = Vec::new();
        for message in &messages {
            match parser::parse_command(message) {
                Some(payload) => {
                    let command = payload.into_command();
                    if !commands.contains(&command) {
                        commands.push(command);
                    }
                }
                None => warn!("Discarding empty suggestion from model"),
            }
        }
        Ok(commands)
    }

    fn build_system_message(&self, context: Option<&str>) -> String {
        format!(
            "You are an expert at using shell commands. I need you to provide a response \
             in the format `{{\"command\": \"your_shell_command_here\"}}`. {} Only provide \
             a single executable line of shell code as the value for the \"command\" key. \
             Never output any text outside the JSON structure. The command will be directly \
             executed in a shell. For example, if I ask to display the message 'Hello, World!', \
             you should respond with ```json\n{{\"command\": \"echo 'Hello, World!'\"}}```. \
             Between [], these are the last 1500 tokens from the previous command's output, \
             you can use them as context: [{}], if it's None, don't take it into consideration.",
            self.platform,
            context.unwrap_or("None"),
        )
    }
}
