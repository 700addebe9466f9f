// Copyright 2019-2026 Maravilla Labs, operated by SOLUTAS GmbH, Switzerland
// SPDX-License-Identifier: Apache-2.0
// SPDX-License-Identifier: MIT

//! HTTP response abstraction.
//!
//! The dispatcher and navigation controller describe their answers with
//! [`FormwireResponse`]; HTTP adapters convert it to their own response type.

use serde_json::Value as JsonValue;
use std::collections::HashMap;

/// A platform-agnostic HTTP response.
///
/// # Example
///
/// ```rust
/// use formwire::FormwireResponse;
///
/// let html = FormwireResponse::html(200, "<h1>Hello</h1>");
/// let json = FormwireResponse::json(200, serde_json::json!({"ok": true}));
/// let redirect = FormwireResponse::see_other("/");
///
/// assert_eq!(redirect.status(), 303);
/// ```
#[derive(Debug, Clone)]
pub enum FormwireResponse {
    /// HTML response (page re-render)
    Html {
        /// HTTP status code
        status: u16,
        /// HTTP headers
        headers: HashMap<String, String>,
        /// HTML body
        body: String,
    },

    /// JSON response (structured calls)
    Json {
        /// HTTP status code
        status: u16,
        /// HTTP headers
        headers: HashMap<String, String>,
        /// JSON body
        body: JsonValue,
    },

    /// Redirect response
    Redirect {
        /// HTTP status code (301, 302, 303, 307, 308)
        status: u16,
        /// Redirect location
        location: String,
        /// Extra headers (e.g. `Set-Cookie`)
        headers: HashMap<String, String>,
    },

    /// Error response
    Error {
        /// HTTP status code
        status: u16,
        /// Error message
        message: String,
    },
}

impl FormwireResponse {
    /// Creates an HTML response.
    pub fn html(status: u16, body: impl Into<String>) -> Self {
        Self::Html {
            status,
            headers: HashMap::new(),
            body: body.into(),
        }
    }

    /// Creates a JSON response.
    pub fn json(status: u16, body: JsonValue) -> Self {
        Self::Json {
            status,
            headers: HashMap::new(),
            body,
        }
    }

    /// Creates a `303 See Other` redirect.
    ///
    /// 303 forces the client to follow up with a GET regardless of the
    /// original method, so refreshing the landing page never resubmits a form.
    pub fn see_other(location: impl Into<String>) -> Self {
        Self::Redirect {
            status: 303,
            location: location.into(),
            headers: HashMap::new(),
        }
    }

    /// Creates an error response; adapters render `message` as an error page.
    pub fn error(status: u16, message: impl Into<String>) -> Self {
        Self::Error {
            status,
            message: message.into(),
        }
    }

    /// Returns the status code.
    pub fn status(&self) -> u16 {
        match self {
            Self::Html { status, .. } => *status,
            Self::Json { status, .. } => *status,
            Self::Redirect { status, .. } => *status,
            Self::Error { status, .. } => *status,
        }
    }

    /// Returns the headers, if the variant carries any.
    pub fn headers(&self) -> Option<&HashMap<String, String>> {
        match self {
            Self::Html { headers, .. } | Self::Json { headers, .. } | Self::Redirect { headers, .. } => {
                Some(headers)
            }
            Self::Error { .. } => None,
        }
    }

    /// Adds a header to the response (ignored for the Error variant).
    pub fn with_header(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        match &mut self {
            Self::Html { headers, .. } | Self::Json { headers, .. } | Self::Redirect { headers, .. } => {
                headers.insert(key.into(), value.into());
            }
            Self::Error { .. } => {}
        }
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_html_response() {
        let resp = FormwireResponse::html(200, "<h1>Hello</h1>");
        assert_eq!(resp.status(), 200);

        if let FormwireResponse::Html { body, .. } = resp {
            assert_eq!(body, "<h1>Hello</h1>");
        } else {
            panic!("Expected Html variant");
        }
    }

    #[test]
    fn test_see_other() {
        let resp = FormwireResponse::see_other("/");
        assert_eq!(resp.status(), 303);
        assert!(matches!(resp, FormwireResponse::Redirect { ref location, .. } if location == "/"));
    }

    #[test]
    fn test_error() {
        let resp = FormwireResponse::error(404, "Unknown action");
        assert_eq!(resp.status(), 404);
        assert!(resp.headers().is_none());
    }

    #[test]
    fn test_with_header_on_redirect() {
        let resp = FormwireResponse::see_other("/").with_header("set-cookie", "a=b");
        assert_eq!(
            resp.headers().and_then(|h| h.get("set-cookie")),
            Some(&"a=b".to_string())
        );
    }
}
