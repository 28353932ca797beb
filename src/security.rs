// Security classification for apirecon
// Decides which operations are reachable without authentication

use crate::models::{ApiDocument, Operation, PublicEndpoint};
use crate::parsers::OpenApiParser;
use serde_json::Value;

/// Whether an operation requires authentication
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Exposure {
    Public,
    Protected,
}

/// Security declarations that apply document-wide.
///
/// Security counts as "live" when the document declares any security scheme
/// or a non-empty global requirement. Empty `securityDefinitions: {}` or
/// `security: []` at the top level declare nothing.
#[derive(Debug, Clone, Copy)]
pub struct SecurityContext<'a> {
    pub has_schemes: bool,
    pub global: Option<&'a [Value]>,
}

impl<'a> SecurityContext<'a> {
    pub fn from_document(doc: &'a ApiDocument) -> Self {
        Self {
            has_schemes: doc.security_schemes().map(|m| !m.is_empty()).unwrap_or(false),
            global: doc.global_security().map(|v| v.as_slice()),
        }
    }

    fn has_global(&self) -> bool {
        self.global.map(|g| !g.is_empty()).unwrap_or(false)
    }

    pub fn is_live(&self) -> bool {
        self.has_schemes || self.has_global()
    }

    /// Apply the inheritance rules to one operation's own `security` list.
    ///
    /// With security live: an explicit `security: []` is public, a non-empty
    /// list is protected, and an omitted list inherits the global requirement,
    /// which leaves the operation public only when there is no global
    /// requirement to inherit.
    pub fn exposure(&self, own: Option<&[Value]>) -> Exposure {
        if !self.is_live() {
            return Exposure::Public;
        }
        match own {
            Some(reqs) if reqs.is_empty() => Exposure::Public,
            Some(_) => Exposure::Protected,
            None if self.has_global() => Exposure::Protected,
            None => Exposure::Public,
        }
    }
}

pub fn operation_exposure(ctx: &SecurityContext<'_>, op: &Operation) -> Exposure {
    ctx.exposure(op.security.as_deref())
}

/// Classify every operation of `doc` and return the public ones.
///
/// Results follow document order (paths, then methods within a path). A
/// document without a `paths` object yields an empty list.
pub fn classify(doc: &ApiDocument) -> Vec<PublicEndpoint> {
    let ctx = SecurityContext::from_document(doc);
    let mut public: Vec<PublicEndpoint> = Vec::new();
    for op in OpenApiParser::operations(doc) {
        if operation_exposure(&ctx, &op) != Exposure::Public {
            continue;
        }
        let endpoint = PublicEndpoint::new(op.method, op.path);
        // "get" and "GET" on the same path are one endpoint
        if !public.contains(&endpoint) {
            public.push(endpoint);
        }
    }
    public
}

/// Classify a raw decoded tree; anything that is not an object yields nothing.
pub fn classify_value(root: &Value) -> Vec<PublicEndpoint> {
    if !root.is_object() {
        return Vec::new();
    }
    classify(&ApiDocument::new(root.clone()))
}
