//! The canonical request context passed to every bound handler.

use http::{Extensions, Method};
use serde_json::Value;
use smallvec::SmallVec;

/// Maximum number of path/query parameters stored inline before the
/// parameter vector spills to the heap.
pub const MAX_INLINE_PARAMS: usize = 8;

/// Parameter storage for path and query values.
pub type ParamVec = SmallVec<[(String, String); MAX_INLINE_PARAMS]>;

/// Everything a handler sees about one request, plus the response it writes.
///
/// The host constructs one context per request and hands it to the bound
/// invocation target selected by its router. Handlers read the request
/// fields and fill in [`Response`]; they never touch the dispatch table.
#[derive(Debug)]
pub struct RequestContext {
    pub method: Method,
    pub path: String,
    /// Path parameters extracted from the matched route pattern.
    pub path_params: ParamVec,
    /// Query string parameters, if the host parsed any.
    pub query_params: ParamVec,
    /// Request body parsed as JSON, if present.
    pub body: Option<Value>,
    /// Host-provided services (e.g. the published dispatch table handed out
    /// for introspection pages).
    pub extensions: Extensions,
    /// The response under construction.
    pub response: Response,
}

impl RequestContext {
    #[must_use]
    pub fn new(method: Method, path: impl Into<String>) -> Self {
        RequestContext {
            method,
            path: path.into(),
            path_params: ParamVec::new(),
            query_params: ParamVec::new(),
            body: None,
            extensions: Extensions::new(),
            response: Response::new(),
        }
    }

    #[must_use]
    pub fn with_body(mut self, body: Value) -> Self {
        self.body = Some(body);
        self
    }

    /// Get a path parameter by name.
    ///
    /// Last write wins: with duplicate parameter names at different path
    /// depths, the deepest occurrence is returned.
    #[inline]
    #[must_use]
    pub fn get_path_param(&self, name: &str) -> Option<&str> {
        self.path_params
            .iter()
            .rfind(|(k, _)| k == name)
            .map(|(_, v)| v.as_str())
    }

    /// Get a query parameter by name (last write wins).
    #[inline]
    #[must_use]
    pub fn get_query_param(&self, name: &str) -> Option<&str> {
        self.query_params
            .iter()
            .rfind(|(k, _)| k == name)
            .map(|(_, v)| v.as_str())
    }

    /// Look up a host-provided service by type.
    #[must_use]
    pub fn service<T: Send + Sync + 'static>(&self) -> Option<&T> {
        self.extensions.get::<T>()
    }
}

/// The response a handler writes into the request context.
#[derive(Debug, Clone)]
pub struct Response {
    pub status: u16,
    pub headers: Vec<(String, String)>,
    pub body: Value,
}

impl Response {
    #[must_use]
    pub fn new() -> Self {
        Response {
            status: 200,
            headers: Vec::new(),
            body: Value::Null,
        }
    }

    /// Set a JSON body with the given status.
    pub fn set_json(&mut self, status: u16, body: Value) {
        self.status = status;
        self.set_header("content-type", "application/json".to_string());
        self.body = body;
    }

    /// Set an HTML body with status 200.
    pub fn set_html(&mut self, html: impl Into<String>) {
        self.status = 200;
        self.set_header("content-type", "text/html".to_string());
        self.body = Value::String(html.into());
    }

    /// Set a plain-text body with the given status.
    pub fn set_text(&mut self, status: u16, text: impl Into<String>) {
        self.status = status;
        self.set_header("content-type", "text/plain".to_string());
        self.body = Value::String(text.into());
    }

    /// Add or replace a header (name comparison is case-insensitive).
    pub fn set_header(&mut self, name: &str, value: String) {
        self.headers.retain(|(k, _)| !k.eq_ignore_ascii_case(name));
        self.headers.push((name.to_string(), value));
    }

    #[must_use]
    pub fn get_header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }
}

impl Default for Response {
    fn default() -> Self {
        Self::new()
    }
}
