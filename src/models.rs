// Core data models for apirecon
// Wraps a decoded OpenAPI/Swagger tree and the operations extracted from it

use serde::Serialize;
use serde_json::{Map, Value};
use std::fmt;
use std::str::FromStr;

/// Supported HTTP methods
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Method {
    GET,
    POST,
    PUT,
    DELETE,
    PATCH,
    OPTIONS,
    HEAD,
}

impl Method {
    /// Methods that carry a request body in generated requests.
    pub fn allows_body(&self) -> bool {
        matches!(self, Method::POST | Method::PUT | Method::PATCH | Method::DELETE)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Method::GET => "GET",
            Method::POST => "POST",
            Method::PUT => "PUT",
            Method::DELETE => "DELETE",
            Method::PATCH => "PATCH",
            Method::OPTIONS => "OPTIONS",
            Method::HEAD => "HEAD",
        }
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Method {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_uppercase().as_str() {
            "GET" => Ok(Method::GET),
            "POST" => Ok(Method::POST),
            "PUT" => Ok(Method::PUT),
            "DELETE" => Ok(Method::DELETE),
            "PATCH" => Ok(Method::PATCH),
            "OPTIONS" => Ok(Method::OPTIONS),
            "HEAD" => Ok(Method::HEAD),
            other => Err(format!("unsupported HTTP method: {}", other)),
        }
    }
}

/// Parameter location in the request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParameterLocation {
    Path,
    Query,
    Body,
    Header,
    FormData,
    Cookie,
}

impl ParameterLocation {
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "path" => Some(ParameterLocation::Path),
            "query" => Some(ParameterLocation::Query),
            "body" => Some(ParameterLocation::Body),
            "header" => Some(ParameterLocation::Header),
            "formData" => Some(ParameterLocation::FormData),
            "cookie" => Some(ParameterLocation::Cookie),
            _ => None,
        }
    }
}

/// Represents a parameter of an operation.
///
/// `schema` holds the v3 `schema` object when present. For v2 non-body
/// parameters the parameter object itself is the schema (`type`, `default`,
/// `enum`, `items` live directly on it).
#[derive(Debug, Clone)]
pub struct Parameter {
    pub name: String,
    pub location: ParameterLocation,
    pub required: bool,
    pub schema: Value,
}

/// Media types a request body can be rendered as
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BodyEncoding {
    Json,
    FormUrlEncoded,
    Multipart,
}

impl BodyEncoding {
    pub fn content_type(&self) -> &'static str {
        match self {
            BodyEncoding::Json => "application/json",
            BodyEncoding::FormUrlEncoded => "application/x-www-form-urlencoded",
            BodyEncoding::Multipart => "multipart/form-data; boundary=boundary",
        }
    }
}

/// Request body schema selected for an operation
#[derive(Debug, Clone)]
pub struct RequestBody {
    pub encoding: BodyEncoding,
    pub schema: Value,
}

/// One HTTP method on one path
#[derive(Debug, Clone)]
pub struct Operation {
    pub method: Method,
    pub path: String,
    pub operation_id: Option<String>,
    pub summary: Option<String>,
    /// `None` inherits the global requirement, `Some(vec![])` disables auth.
    pub security: Option<Vec<Value>>,
    pub parameters: Vec<Parameter>,
    pub request_body: Option<RequestBody>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpecVersion {
    Swagger2,
    OpenApi3,
    Unknown,
}

/// A decoded OpenAPI (v3) or Swagger (v2) document.
///
/// The tree is kept as-is; accessors pick the v2 or v3 location of each
/// section so the rest of the crate never has to care which one it got.
#[derive(Debug, Clone)]
pub struct ApiDocument {
    root: Value,
}

impl ApiDocument {
    pub fn new(root: Value) -> Self {
        Self { root }
    }

    pub fn root(&self) -> &Value {
        &self.root
    }

    pub fn version(&self) -> SpecVersion {
        if self.root.get("swagger").is_some() {
            SpecVersion::Swagger2
        } else if self.root.get("openapi").is_some() {
            SpecVersion::OpenApi3
        } else {
            SpecVersion::Unknown
        }
    }

    pub fn paths(&self) -> Option<&Map<String, Value>> {
        self.root.get("paths").and_then(|p| p.as_object())
    }

    /// Top-level `security` requirement list, if declared.
    pub fn global_security(&self) -> Option<&Vec<Value>> {
        self.root.get("security").and_then(|s| s.as_array())
    }

    /// `securityDefinitions` (v2) or `components.securitySchemes` (v3).
    pub fn security_schemes(&self) -> Option<&Map<String, Value>> {
        self.root
            .get("securityDefinitions")
            .and_then(|s| s.as_object())
            .filter(|m| !m.is_empty())
            .or_else(|| {
                self.root
                    .get("components")
                    .and_then(|c| c.get("securitySchemes"))
                    .and_then(|s| s.as_object())
            })
    }

    /// Named schema definitions: `definitions` (v2) or `components.schemas` (v3).
    pub fn schema_registry(&self) -> Option<&Map<String, Value>> {
        self.root
            .get("definitions")
            .and_then(|d| d.as_object())
            .or_else(|| {
                self.root
                    .get("components")
                    .and_then(|c| c.get("schemas"))
                    .and_then(|s| s.as_object())
            })
    }

    /// Host the API is served from: v2 `host`, else host of `servers[0].url`.
    pub fn host(&self) -> Option<String> {
        if let Some(host) = self.root.get("host").and_then(|h| h.as_str()) {
            return Some(host.to_string());
        }
        let server = self.server_url()?;
        let host = server.host_str()?;
        Some(match server.port() {
            Some(port) => format!("{}:{}", host, port),
            None => host.to_string(),
        })
    }

    /// Path prefix for every operation: v2 `basePath`, else the path of `servers[0].url`.
    pub fn base_path(&self) -> String {
        if let Some(bp) = self.root.get("basePath").and_then(|b| b.as_str()) {
            return bp.to_string();
        }
        match self.server_url() {
            Some(u) => u.path().trim_end_matches('/').to_string(),
            // relative server urls such as "/api/v1"
            None => self
                .server_url_raw()
                .filter(|raw| raw.starts_with('/'))
                .map(|raw| raw.trim_end_matches('/').to_string())
                .unwrap_or_default(),
        }
    }

    /// Preferred scheme: first of v2 `schemes`, else the scheme of `servers[0].url`.
    pub fn scheme(&self) -> String {
        if let Some(first) = self
            .root
            .get("schemes")
            .and_then(|s| s.as_array())
            .and_then(|arr| arr.first())
            .and_then(|s| s.as_str())
        {
            return first.to_string();
        }
        self.server_url()
            .map(|u| u.scheme().to_string())
            .unwrap_or_else(|| "https".to_string())
    }

    fn server_url(&self) -> Option<url::Url> {
        url::Url::parse(&self.server_url_raw()?).ok()
    }

    // servers[0].url with `{var}` placeholders replaced by their defaults
    fn server_url_raw(&self) -> Option<String> {
        let server = self
            .root
            .get("servers")
            .and_then(|s| s.as_array())
            .and_then(|arr| arr.first())?;
        let mut raw = server.get("url")?.as_str()?.to_string();
        if let Some(vars) = server.get("variables").and_then(|v| v.as_object()) {
            for (k, v) in vars {
                if let Some(def) = v.get("default").and_then(|d| d.as_str()) {
                    raw = raw.replace(&format!("{{{}}}", k), def);
                }
            }
        }
        Some(raw)
    }
}

/// An operation reachable without authentication
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct PublicEndpoint {
    pub method: Method,
    pub path: String,
}

impl PublicEndpoint {
    pub fn new(method: Method, path: impl Into<String>) -> Self {
        Self { method, path: path.into() }
    }
}

impl fmt::Display for PublicEndpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.method, self.path)
    }
}
