//! HTTP transport for the chat widget.
//!
//! Posts `{ "message": ... }` to a running server's `/api/chat` endpoint.
//! No retries and no timeout beyond reqwest's defaults; any failure is
//! returned to the widget, which shows its generic apology.

use anyhow::{Context, Result};
use async_trait::async_trait;

use crate::models::{ChatRequest, ChatResponse};
use crate::widget::ChatTransport;

pub struct HttpTransport {
    client: reqwest::Client,
    endpoint: String,
}

impl HttpTransport {
    /// `base_url` is the server root, e.g. `http://127.0.0.1:8787`.
    pub fn new(base_url: &str) -> Self {
        Self {
            client: reqwest::Client::new(),
            endpoint: format!("{}/api/chat", base_url.trim_end_matches('/')),
        }
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

#[async_trait]
impl ChatTransport for HttpTransport {
    async fn send(&self, message: &str) -> Result<ChatResponse> {
        let body = ChatRequest {
            message: message.to_string(),
        };
        let resp = self
            .client
            .post(&self.endpoint)
            .json(&body)
            .send()
            .await
            .with_context(|| format!("POST {} failed", self.endpoint))?
            .error_for_status()?;

        let reply = resp
            .json::<ChatResponse>()
            .await
            .context("invalid chat response body")?;
        Ok(reply)
    }
}
