// Copyright 2019-2026 Maravilla Labs, operated by SOLUTAS GmbH, Switzerland
// SPDX-License-Identifier: Apache-2.0
// SPDX-License-Identifier: MIT

//! Request body parsing helpers shared by the submission adapters.

use serde_json::Value as JsonValue;

use crate::fields::{FileField, FormFields};

/// Errors that can occur while parsing a request body.
#[derive(Debug, thiserror::Error)]
pub enum BodyParseError {
    /// The body is not valid JSON.
    #[error("Invalid JSON: {0}")]
    InvalidJson(String),
    /// The multipart payload is structurally broken.
    #[error("Invalid multipart data: {0}")]
    InvalidMultipart(String),
}

/// Parses an `application/x-www-form-urlencoded` body.
///
/// Duplicate keys and their order are preserved.
pub fn parse_form_urlencoded(bytes: &[u8]) -> FormFields {
    form_urlencoded::parse(bytes)
        .map(|(k, v)| (k.into_owned(), v.into_owned()))
        .collect()
}

/// Parses a JSON body.
pub fn parse_json(bytes: &[u8]) -> Result<JsonValue, BodyParseError> {
    serde_json::from_slice(bytes).map_err(|e| BodyParseError::InvalidJson(e.to_string()))
}

/// Extracts the `boundary` parameter from a multipart content type.
pub fn multipart_boundary(content_type: &str) -> Option<&str> {
    content_type
        .split(';')
        .find_map(|s| s.trim().strip_prefix("boundary="))
        .map(|b| b.trim_matches('"'))
        .filter(|b| !b.is_empty())
}

/// Parses a `multipart/form-data` body.
///
/// Text parts become text values; parts carrying a `filename` become file
/// values with their raw bytes untouched.
pub fn parse_multipart(bytes: &[u8], content_type: &str) -> Result<FormFields, BodyParseError> {
    let boundary = multipart_boundary(content_type)
        .ok_or_else(|| BodyParseError::InvalidMultipart("Missing boundary".to_string()))?;

    let opening = format!("--{}", boundary);
    let separator = format!("\r\n--{}", boundary);

    let start = find(bytes, opening.as_bytes())
        .ok_or_else(|| BodyParseError::InvalidMultipart("Missing opening boundary".to_string()))?;
    let mut rest = &bytes[start + opening.len()..];
    let mut fields = FormFields::new();

    loop {
        if rest.starts_with(b"--") {
            break;
        }
        rest = rest
            .strip_prefix(b"\r\n")
            .ok_or_else(|| BodyParseError::InvalidMultipart("Expected CRLF after boundary".to_string()))?;

        let header_end = find(rest, b"\r\n\r\n")
            .ok_or_else(|| BodyParseError::InvalidMultipart("Unterminated part headers".to_string()))?;
        let headers = std::str::from_utf8(&rest[..header_end])
            .map_err(|_| BodyParseError::InvalidMultipart("Part headers are not UTF-8".to_string()))?;

        let content_start = header_end + 4;
        let content_len = find(&rest[content_start..], separator.as_bytes())
            .ok_or_else(|| BodyParseError::InvalidMultipart("Unterminated part".to_string()))?;
        let content = &rest[content_start..content_start + content_len];

        let part = PartHeaders::parse(headers)
            .ok_or_else(|| BodyParseError::InvalidMultipart("Part without a field name".to_string()))?;

        match part.filename {
            Some(filename) => {
                fields.push(part.name, FileField::new(filename, part.content_type, content.to_vec()));
            }
            None => {
                let text = String::from_utf8(content.to_vec()).map_err(|_| {
                    BodyParseError::InvalidMultipart(format!("Field '{}' is not UTF-8", part.name))
                })?;
                fields.push(part.name, text);
            }
        }

        rest = &rest[content_start + content_len + separator.len()..];
    }

    Ok(fields)
}

/// Headers of a single multipart part.
struct PartHeaders {
    name: String,
    filename: Option<String>,
    content_type: Option<String>,
}

impl PartHeaders {
    fn parse(headers: &str) -> Option<Self> {
        let mut name = None;
        let mut filename = None;
        let mut content_type = None;

        for line in headers.lines() {
            let Some((key, value)) = line.split_once(':') else {
                continue;
            };
            let key = key.trim().to_ascii_lowercase();

            if key == "content-disposition" {
                for param in value.split(';').skip(1) {
                    let Some((k, v)) = param.trim().split_once('=') else {
                        continue;
                    };
                    let v = v.trim().trim_matches('"').to_string();
                    match k.trim() {
                        "name" => name = Some(v),
                        "filename" => filename = Some(v),
                        _ => {}
                    }
                }
            } else if key == "content-type" {
                content_type = Some(value.trim().to_string());
            }
        }

        Some(Self {
            name: name?,
            filename,
            content_type,
        })
    }
}

fn find(haystack: &[u8], needle: &[u8]) -> Option<usize> {
    if needle.is_empty() || haystack.len() < needle.len() {
        return None;
    }
    haystack.windows(needle.len()).position(|w| w == needle)
}
