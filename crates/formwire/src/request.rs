// Copyright 2019-2026 Maravilla Labs, operated by SOLUTAS GmbH, Switzerland
// SPDX-License-Identifier: Apache-2.0
// SPDX-License-Identifier: MIT

//! HTTP request abstraction for form submissions.
//!
//! This module provides a platform-agnostic request type that HTTP adapters
//! build from their native request and hand to the [`Dispatcher`](crate::Dispatcher).

use std::collections::HashMap;

/// A platform-agnostic HTTP request.
///
/// Header names are stored lowercased so lookups are case-insensitive.
///
/// # Example
///
/// ```rust
/// use formwire::FormRequest;
///
/// let request = FormRequest::new("/", "POST")
///     .with_header("Content-Type", "application/x-www-form-urlencoded")
///     .with_query_string("/3f2a")
///     .with_body(b"title=Buy+milk".to_vec());
///
/// assert!(!request.is_json());
/// assert_eq!(request.action_query_ids(), vec!["3f2a"]);
/// ```
#[derive(Debug, Clone)]
pub struct FormRequest {
    /// The request path (e.g., "/todos")
    pub path: String,

    /// The HTTP method (e.g., "GET", "POST")
    pub method: String,

    /// HTTP headers, keyed by lowercased name
    pub headers: HashMap<String, String>,

    /// Request body (for POST/PUT/PATCH)
    pub body: Option<Vec<u8>>,

    /// Query parameters (parsed from URL)
    pub query: HashMap<String, String>,

    /// Cookies
    pub cookies: HashMap<String, String>,
}

impl FormRequest {
    /// Creates a new request with the given path and method.
    pub fn new(path: impl Into<String>, method: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            method: method.into().to_uppercase(),
            headers: HashMap::new(),
            body: None,
            query: HashMap::new(),
            cookies: HashMap::new(),
        }
    }

    /// Adds a single header.
    pub fn with_header(mut self, name: &str, value: impl Into<String>) -> Self {
        self.headers.insert(name.to_ascii_lowercase(), value.into());
        self
    }

    /// Replaces all headers.
    pub fn with_headers(mut self, headers: HashMap<String, String>) -> Self {
        self.headers = headers
            .into_iter()
            .map(|(k, v)| (k.to_ascii_lowercase(), v))
            .collect();
        self
    }

    /// Adds a body to the request.
    pub fn with_body(mut self, body: Vec<u8>) -> Self {
        self.body = Some(body);
        self
    }

    /// Parses a raw query string (without the leading `?`).
    pub fn with_query_string(mut self, query: &str) -> Self {
        self.query = form_urlencoded::parse(query.as_bytes())
            .map(|(k, v)| (k.into_owned(), v.into_owned()))
            .filter(|(k, _)| !k.is_empty())
            .collect();
        self
    }

    /// Parses cookies from a `Cookie` header value.
    pub fn with_cookie_header(mut self, header: &str) -> Self {
        self.cookies = header
            .split(';')
            .filter_map(|pair| {
                let (k, v) = pair.trim().split_once('=')?;
                Some((k.trim().to_string(), v.trim().to_string()))
            })
            .collect();
        self
    }

    /// Returns a header value by case-insensitive name.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .get(&name.to_ascii_lowercase())
            .map(|s| s.as_str())
    }

    /// Returns the body bytes, or an empty slice.
    pub fn body_bytes(&self) -> &[u8] {
        self.body.as_deref().unwrap_or_default()
    }

    /// Returns the Content-Type header, if present.
    pub fn content_type(&self) -> Option<&str> {
        self.header("content-type")
    }

    /// Returns the lowercased media type without parameters.
    pub fn media_type(&self) -> Option<String> {
        self.content_type()
            .and_then(|ct| ct.split(';').next())
            .map(|mt| mt.trim().to_ascii_lowercase())
    }

    /// Checks if this is a JSON request.
    pub fn is_json(&self) -> bool {
        self.media_type().as_deref() == Some("application/json")
    }

    /// Every action identifier carried by the query string (`?/<id>` -> `<id>`),
    /// sorted so callers see a stable order.
    pub fn action_query_ids(&self) -> Vec<&str> {
        let mut ids: Vec<&str> = self
            .query
            .keys()
            .filter_map(|k| k.strip_prefix('/'))
            .filter(|id| !id.is_empty())
            .collect();
        ids.sort_unstable();
        ids
    }
}
