use crate::domain::tts::SourceKind;
use crate::error::{TtsError, TtsResult};
use async_trait::async_trait;
use html2text::from_read;
use regex::Regex;
use std::sync::LazyLock;

static URL_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"https?://[^\s]+").expect("valid url pattern"));
static WHITESPACE_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s+").expect("valid whitespace pattern"));

/// Resolves a source identifier into the text to synthesize
#[async_trait]
pub trait TextSourceRepository: Send + Sync {
    async fn resolve(&self, identifier: &str, kind: SourceKind) -> TtsResult<String>;
}

/// Literal text, local files and web pages
pub struct DefaultTextSource {
    http_client: reqwest::Client,
}

impl DefaultTextSource {
    pub fn new() -> Self {
        Self {
            http_client: reqwest::Client::new(),
        }
    }

    pub fn with_http_client(http_client: reqwest::Client) -> Self {
        Self { http_client }
    }

    async fn read_path(&self, path: &str) -> TtsResult<String> {
        tokio::fs::read_to_string(path).await.map_err(|e| {
            tracing::error!(error = %e, path = path, "Failed to read text source file");
            TtsError::Source(format!("Failed to read {}: {}", path, e))
        })
    }

    async fn fetch_website(&self, url: &str) -> TtsResult<String> {
        let response = self
            .http_client
            .get(url)
            .send()
            .await
            .and_then(|response| response.error_for_status())
            .map_err(|e| {
                tracing::error!(error = %e, url = url, "Failed to fetch website source");
                TtsError::Source(format!("Failed to fetch {}: {}", url, e))
            })?;

        let html = response
            .text()
            .await
            .map_err(|e| TtsError::Source(format!("Failed to read body of {}: {}", url, e)))?;

        Ok(clean_html(&html))
    }
}

impl Default for DefaultTextSource {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl TextSourceRepository for DefaultTextSource {
    async fn resolve(&self, identifier: &str, kind: SourceKind) -> TtsResult<String> {
        let text = match kind {
            SourceKind::Text => identifier.to_string(),
            SourceKind::Path => self.read_path(identifier).await?,
            SourceKind::Website => self.fetch_website(identifier).await?,
        };

        tracing::debug!(
            source_kind = ?kind,
            text_length = text.len(),
            "Text source resolved"
        );

        Ok(text)
    }
}

/// Convert HTML to plain text, drop URLs and normalize whitespace
pub fn clean_html(html: &str) -> String {
    let plain_text = from_read(html.as_bytes(), usize::MAX);
    let without_urls = URL_PATTERN.replace_all(&plain_text, "");
    let normalized = WHITESPACE_PATTERN.replace_all(&without_urls, " ");
    normalized.trim().to_string()
}
