//! HTTP transport abstraction for the LLM API.
//!
//! The chat client talks to the API through this trait so tests can inject a
//! canned transport instead of hitting the network.

use anyhow::Result;
use async_trait::async_trait;
use reqwest::Client;

/// Minimal HTTP surface needed by the chat client.
#[async_trait]
pub trait HttpClient: Send + Sync {
    /// Sends a POST request with a JSON body and returns the raw response text.
    ///
    /// Non-2xx responses are returned as text too; the caller decides how to
    /// interpret API-level error payloads.
    async fn post_json(
        &self,
        url: &str,
        headers: &[(&str, &str)],
        body: &serde_json::Value,
    ) -> Result<String>;
}

/// Production transport backed by reqwest.
pub struct ReqwestHttpClient {
    client: Client,
}

impl ReqwestHttpClient {
    pub fn new() -> Self {
        Self {
            client: Client::new(),
        }
    }
}

impl Default for ReqwestHttpClient {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl HttpClient for ReqwestHttpClient {
    async fn post_json(
        &self,
        url: &str,
        headers: &[(&str, &str)],
        body: &serde_json::Value,
    ) -> Result<String> {
        let mut request = self.client.post(url);
        for (key, value) in headers {
            request = request.header(*key, *value);
        }

        let response = request.json(body).send().await?;
        Ok(response.text().await?)
    }
}
