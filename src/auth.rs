// Authentication strategies for apirecon
// Each strategy contributes one header to generated and replayed requests

use crate::error::ReconError;
use base64::{engine::general_purpose, Engine as _};
use std::str::FromStr;

pub const DEFAULT_API_KEY_HEADER: &str = "X-API-Key";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthType {
    Bearer,
    ApiKey,
    Basic,
}

impl FromStr for AuthType {
    type Err = ReconError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "bearer" => Ok(AuthType::Bearer),
            "apiKey" | "apikey" | "api-key" => Ok(AuthType::ApiKey),
            "basic" => Ok(AuthType::Basic),
            other => Err(ReconError::UnknownAuthType(other.to_string())),
        }
    }
}

pub trait AuthStrategy {
    /// Header name and value to attach to every request.
    fn auth_header(&self) -> (String, String);
}

pub struct StaticTokenAuth {
    pub token: String,
}

impl AuthStrategy for StaticTokenAuth {
    fn auth_header(&self) -> (String, String) {
        ("Authorization".to_string(), format!("Bearer {}", self.token))
    }
}

pub struct ApiKeyAuth {
    pub header: String,
    pub key: String,
}

impl AuthStrategy for ApiKeyAuth {
    fn auth_header(&self) -> (String, String) {
        (self.header.clone(), self.key.clone())
    }
}

/// Basic auth; `credentials` is the raw `user:pass` pair.
pub struct BasicAuth {
    pub credentials: String,
}

impl AuthStrategy for BasicAuth {
    fn auth_header(&self) -> (String, String) {
        let encoded = general_purpose::STANDARD.encode(self.credentials.as_bytes());
        ("Authorization".to_string(), format!("Basic {}", encoded))
    }
}

pub fn build_auth(kind: AuthType, value: &str, api_key_header: &str) -> Box<dyn AuthStrategy> {
    match kind {
        AuthType::Bearer => Box::new(StaticTokenAuth {
            token: value.to_string(),
        }),
        AuthType::ApiKey => Box::new(ApiKeyAuth {
            header: api_key_header.to_string(),
            key: value.to_string(),
        }),
        AuthType::Basic => Box::new(BasicAuth {
            credentials: value.to_string(),
        }),
    }
}
