// Document loading for apirecon
// Fetches a Swagger/OpenAPI document over HTTP or reads it from disk, then
// decodes it as JSON with a YAML fallback

use crate::error::{ReconError, Result};
use crate::models::ApiDocument;
use log::debug;
use reqwest::Client;
use serde_json::Value;
use std::time::Duration;

pub const BROWSER_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/91.0.4472.124 Safari/537.36";

const FETCH_TIMEOUT: Duration = Duration::from_secs(10);

pub fn is_remote(source: &str) -> bool {
    source.starts_with("http://") || source.starts_with("https://")
}

/// Prepend `https://` to URLs given without a scheme.
pub fn normalize_url(url: &str) -> String {
    let url = url.trim();
    if is_remote(url) {
        url.to_string()
    } else {
        format!("https://{}", url)
    }
}

/// Decode raw document text: JSON first, YAML if that fails.
pub fn decode_document(text: &str, source_name: &str) -> Result<ApiDocument> {
    match serde_json::from_str::<Value>(text) {
        Ok(v) => Ok(ApiDocument::new(v)),
        Err(json_err) => {
            debug!("{} is not JSON ({}), trying YAML", source_name, json_err);
            serde_yaml::from_str::<Value>(text)
                .map(ApiDocument::new)
                .map_err(|_| ReconError::Decode {
                    source_name: source_name.to_string(),
                })
        }
    }
}

pub fn read_document(path: &str) -> Result<ApiDocument> {
    let text = std::fs::read_to_string(path).map_err(|source| ReconError::Io {
        path: path.to_string(),
        source,
    })?;
    decode_document(&text, path)
}

/// Fetches documents over HTTP(S).
///
/// Certificate validation is off: targets are frequently staging hosts with
/// self-signed certificates.
pub struct DocumentFetcher {
    client: Client,
}

impl DocumentFetcher {
    pub fn new() -> Result<Self> {
        let client = Client::builder()
            .user_agent(BROWSER_USER_AGENT)
            .timeout(FETCH_TIMEOUT)
            .danger_accept_invalid_certs(true)
            .build()?;
        Ok(Self { client })
    }

    pub async fn fetch(&self, url: &str) -> Result<ApiDocument> {
        debug!("fetching {}", url);
        let resp = self.client.get(url).send().await?;
        let status = resp.status();
        if !status.is_success() {
            return Err(ReconError::Status {
                url: url.to_string(),
                status,
            });
        }
        let text = resp.text().await?;
        decode_document(&text, url)
    }

    /// Fetch when `source` is a URL, read from disk otherwise.
    pub async fn load(&self, source: &str) -> Result<ApiDocument> {
        if is_remote(source) {
            self.fetch(source).await
        } else {
            read_document(source)
        }
    }
}
