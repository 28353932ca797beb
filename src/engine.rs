// Proxy replay for apirecon
// Sends rendered requests through an intercepting proxy (e.g. Burp Suite)

use crate::error::{ReconError, Result};
use crate::render::RenderedRequest;
use log::{info, warn};
use reqwest::{Client, Proxy};

/// Prepend `http://` to a bare `host:port` proxy address.
pub fn normalize_proxy(proxy: &str) -> String {
    if proxy.contains("://") {
        proxy.to_string()
    } else {
        format!("http://{}", proxy)
    }
}

pub struct ReplayEngine {
    pub client: Client,
    scheme: String,
}

impl ReplayEngine {
    pub fn new(proxy: &str, scheme: impl Into<String>) -> Result<Self> {
        let proxy_url = normalize_proxy(proxy);
        let proxy = Proxy::all(&proxy_url).map_err(|_| ReconError::InvalidProxy(proxy_url))?;
        let client = Client::builder()
            .proxy(proxy)
            .danger_accept_invalid_certs(true)
            .pool_max_idle_per_host(10)
            .build()?;
        Ok(Self {
            client,
            scheme: scheme.into(),
        })
    }

    pub fn url_for(&self, req: &RenderedRequest) -> String {
        format!("{}://{}{}", self.scheme, req.host, req.target)
    }

    /// Replay one request with exactly the rendered method, headers and body.
    pub async fn send(&self, req: &RenderedRequest) -> Result<reqwest::StatusCode> {
        let url = self.url_for(req);
        let method = reqwest::Method::from_bytes(req.method.as_str().as_bytes())
            .unwrap_or(reqwest::Method::GET);
        let mut builder = self.client.request(method, &url);
        for (name, value) in req.header_lines() {
            // reqwest computes these itself
            if name.eq_ignore_ascii_case("content-length") || name.eq_ignore_ascii_case("connection") {
                continue;
            }
            builder = builder.header(name, value);
        }
        if let Some(body) = &req.body {
            builder = builder.body(body.clone());
        }
        let resp = builder.send().await?;
        Ok(resp.status())
    }

    /// Replay and log the outcome; failures never propagate.
    pub async fn replay(&self, req: &RenderedRequest) -> bool {
        let url = self.url_for(req);
        match self.send(req).await {
            Ok(status) => {
                info!("sent {} {}, status code: {}", req.method, url, status.as_u16());
                true
            }
            Err(e) => {
                warn!("failed to send {} {}: {}", req.method, url, e);
                false
            }
        }
    }
}
