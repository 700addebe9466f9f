// Copyright 2019-2026 Maravilla Labs, operated by SOLUTAS GmbH, Switzerland
// SPDX-License-Identifier: Apache-2.0
// SPDX-License-Identifier: MIT

//! Conversion of axum requests into `FormRequest`.

use axum::body::Body;
use axum::http::Request;
use formwire::FormRequest;
use std::collections::HashMap;

/// Errors that can occur while reading a request.
#[derive(Debug, thiserror::Error)]
pub enum BodyReadError {
    /// Body exceeds the configured limit.
    #[error("Request body exceeds {0} bytes")]
    TooLarge(usize),
}

/// Reads the whole request into a [`FormRequest`].
///
/// Bodies longer than `max_body_bytes` are rejected without being buffered
/// past the limit.
pub async fn to_form_request(request: Request<Body>, max_body_bytes: usize) -> Result<FormRequest, BodyReadError> {
    let (parts, body) = request.into_parts();

    let headers: HashMap<String, String> = parts
        .headers
        .iter()
        .filter_map(|(k, v)| v.to_str().ok().map(|v| (k.to_string(), v.to_string())))
        .collect();
    let cookie_header = parts
        .headers
        .get_all(axum::http::header::COOKIE)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .collect::<Vec<_>>()
        .join("; ");

    let body_bytes = axum::body::to_bytes(body, max_body_bytes)
        .await
        .map_err(|_| BodyReadError::TooLarge(max_body_bytes))?;

    let mut form_request = FormRequest::new(parts.uri.path(), parts.method.as_str())
        .with_headers(headers)
        .with_query_string(parts.uri.query().unwrap_or_default())
        .with_cookie_header(&cookie_header);
    if !body_bytes.is_empty() {
        form_request = form_request.with_body(body_bytes.to_vec());
    }
    Ok(form_request)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_converts_request() {
        let request = Request::builder()
            .method("POST")
            .uri("/?/abc")
            .header("content-type", "application/x-www-form-urlencoded")
            .header("cookie", "formwire_session=s1")
            .body(Body::from("title=Buy+milk"))
            .unwrap();

        let form = to_form_request(request, 1024).await.unwrap();
        assert_eq!(form.method, "POST");
        assert_eq!(form.path, "/");
        assert_eq!(form.action_query_ids(), vec!["abc"]);
        assert_eq!(form.cookies.get("formwire_session").map(String::as_str), Some("s1"));
        assert_eq!(form.body_bytes(), b"title=Buy+milk");
    }

    #[tokio::test]
    async fn test_rejects_large_body() {
        let request = Request::builder()
            .method("POST")
            .uri("/")
            .body(Body::from(vec![b'a'; 64]))
            .unwrap();

        assert!(matches!(
            to_form_request(request, 16).await,
            Err(BodyReadError::TooLarge(16))
        ));
    }
}
