// Raw HTTP request rendering for apirecon
// Turns an operation plus synthesized values into HTTP/1.1 request text

use crate::models::{BodyEncoding, Method, Operation, ParameterLocation};
use crate::synth::Synthesizer;
use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};
use serde_json::Value;
use url::form_urlencoded;

pub const USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36";
pub const MULTIPART_BOUNDARY: &str = "boundary";

const CRLF: &str = "\r\n";

// Everything but RFC 3986 unreserved characters is escaped inside a path segment
const PATH_SEGMENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'.')
    .remove(b'_')
    .remove(b'~');

/// A request ready to be written out or replayed
#[derive(Debug, Clone, PartialEq)]
pub struct RenderedRequest {
    pub method: Method,
    /// Path plus query string, as it appears on the request line
    pub target: String,
    pub host: String,
    /// Auth and header parameters, in the order they are emitted
    pub headers: Vec<(String, String)>,
    pub body: Option<String>,
    pub content_type: Option<String>,
}

impl RenderedRequest {
    /// Every header line except `Host`, in wire order.
    pub fn header_lines(&self) -> Vec<(String, String)> {
        let mut lines = self.headers.clone();
        lines.push(("User-Agent".to_string(), USER_AGENT.to_string()));
        lines.push(("Accept".to_string(), "application/json".to_string()));
        lines.push(("Connection".to_string(), "close".to_string()));
        if let Some(body) = &self.body {
            if let Some(ct) = &self.content_type {
                lines.push(("Content-Type".to_string(), ct.clone()));
            }
            lines.push(("Content-Length".to_string(), body.len().to_string()));
        }
        lines
    }

    /// Wire-format text with CRLF line endings.
    pub fn to_wire(&self) -> String {
        let mut out = format!("{} {} HTTP/1.1{}", self.method, self.target, CRLF);
        out.push_str(&format!("Host: {}{}", self.host, CRLF));
        for (name, value) in self.header_lines() {
            out.push_str(&format!("{}: {}{}", name, value, CRLF));
        }
        out.push_str(CRLF);
        if let Some(body) = &self.body {
            out.push_str(body);
        }
        out
    }
}

/// Renders operations of one document against a fixed host.
pub struct RequestRenderer<'a> {
    synth: Synthesizer<'a>,
    host: String,
    base_path: String,
    auth: Option<(String, String)>,
}

impl<'a> RequestRenderer<'a> {
    pub fn new(synth: Synthesizer<'a>, host: impl Into<String>, base_path: impl Into<String>) -> Self {
        Self {
            synth,
            host: host.into(),
            base_path: base_path.into(),
            auth: None,
        }
    }

    pub fn with_auth(mut self, header: (String, String)) -> Self {
        self.auth = Some(header);
        self
    }

    pub fn render(&self, op: &Operation) -> RenderedRequest {
        let mut path = collapse_slashes(&format!("{}{}", self.base_path, op.path));
        let mut query: Vec<(String, String)> = Vec::new();
        let mut headers: Vec<(String, String)> = Vec::new();
        let mut cookies: Vec<String> = Vec::new();

        if let Some(auth) = &self.auth {
            headers.push(auth.clone());
        }

        for param in &op.parameters {
            match param.location {
                ParameterLocation::Path => {
                    let value = value_to_text(&self.synth.example_value(&param.schema));
                    let segment = utf8_percent_encode(&value, PATH_SEGMENT).to_string();
                    path = path.replace(&format!("{{{}}}", param.name), &segment);
                }
                ParameterLocation::Query => {
                    let value = value_to_text(&self.synth.example_value(&param.schema));
                    query.push((param.name.clone(), value));
                }
                ParameterLocation::Header => {
                    if self.overridden_by_auth(&param.name) {
                        continue;
                    }
                    let value = header_safe(&value_to_text(&self.synth.example_value(&param.schema)));
                    headers.push((param.name.clone(), value));
                }
                ParameterLocation::Cookie => {
                    let value = header_safe(&value_to_text(&self.synth.example_value(&param.schema)));
                    cookies.push(format!("{}={}", param.name, value));
                }
                // rendered through the request body
                ParameterLocation::Body | ParameterLocation::FormData => {}
            }
        }
        if !cookies.is_empty() {
            headers.push(("Cookie".to_string(), cookies.join("; ")));
        }

        let target = if query.is_empty() {
            path
        } else {
            let encoded = form_urlencoded::Serializer::new(String::new())
                .extend_pairs(query.iter())
                .finish();
            format!("{}?{}", path, encoded)
        };

        let (body, content_type) = match &op.request_body {
            Some(rb) if op.method.allows_body() => {
                let required: Vec<String> = rb
                    .schema
                    .get("required")
                    .and_then(|r| r.as_array())
                    .map(|arr| arr.iter().filter_map(|r| r.as_str().map(String::from)).collect())
                    .unwrap_or_default();
                let sample = self.synth.sample_body(&rb.schema, &required);
                (
                    Some(encode_body(&sample, rb.encoding)),
                    Some(rb.encoding.content_type().to_string()),
                )
            }
            _ => (None, None),
        };

        RenderedRequest {
            method: op.method,
            target,
            host: self.host.clone(),
            headers,
            body,
            content_type,
        }
    }

    // A documented Authorization (or API key) header gives way to configured credentials
    fn overridden_by_auth(&self, name: &str) -> bool {
        match &self.auth {
            Some((auth_name, _)) => {
                name.eq_ignore_ascii_case("authorization") || name.eq_ignore_ascii_case(auth_name)
            }
            None => false,
        }
    }
}

pub fn collapse_slashes(path: &str) -> String {
    let mut out = path.to_string();
    while out.contains("//") {
        out = out.replace("//", "/");
    }
    out
}

/// Text form of a synthesized value for paths, queries, headers and form fields.
pub fn value_to_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Null => String::new(),
        Value::Array(items) => items.iter().map(value_to_text).collect::<Vec<_>>().join(","),
        other => other.to_string(),
    }
}

/// Drop CR and LF so document-supplied values cannot start new header lines.
pub fn header_safe(value: &str) -> String {
    value.chars().filter(|c| *c != '\r' && *c != '\n').collect()
}

fn form_fields(sample: &Value) -> Vec<(String, String)> {
    match sample {
        Value::Object(map) if !map.is_empty() => map
            .iter()
            .map(|(k, v)| (k.clone(), value_to_text(v)))
            .collect(),
        _ => vec![("example".to_string(), "data".to_string())],
    }
}

pub fn encode_body(sample: &Value, encoding: BodyEncoding) -> String {
    match encoding {
        BodyEncoding::Json => format!("{:#}", sample),
        BodyEncoding::FormUrlEncoded => form_urlencoded::Serializer::new(String::new())
            .extend_pairs(form_fields(sample).iter())
            .finish(),
        BodyEncoding::Multipart => {
            let mut out = String::new();
            for (name, value) in form_fields(sample) {
                out.push_str(&format!("--{}{}", MULTIPART_BOUNDARY, CRLF));
                out.push_str(&format!(
                    "Content-Disposition: form-data; name=\"{}\"{}{}",
                    name, CRLF, CRLF
                ));
                out.push_str(&value);
                out.push_str(CRLF);
            }
            out.push_str(&format!("--{}--{}", MULTIPART_BOUNDARY, CRLF));
            out
        }
    }
}
