// Copyright 2019-2026 Maravilla Labs, operated by SOLUTAS GmbH, Switzerland
// SPDX-License-Identifier: Apache-2.0
// SPDX-License-Identifier: MIT

//! Session keys correlating a page render with the submission it issued.

use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

use crate::request::FormRequest;

/// Cookie carrying the session key.
pub const SESSION_COOKIE: &str = "formwire_session";

/// Header carrying the session key for scripted callers.
pub const SESSION_HEADER: &str = "x-formwire-session";

/// Longest key accepted from a client.
const MAX_KEY_LEN: usize = 128;

/// Opaque per-client key.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SessionKey(String);

impl SessionKey {
    /// Generates a fresh random key.
    pub fn generate() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    /// Wraps an existing key without checking it.
    pub fn new(key: impl Into<String>) -> Self {
        Self(key.into())
    }

    /// Reads the key from the session header or cookie.
    ///
    /// Keys that are empty, overlong, or contain anything outside
    /// `[A-Za-z0-9-_]` are ignored.
    pub fn from_request(request: &FormRequest) -> Option<Self> {
        request
            .header(SESSION_HEADER)
            .or_else(|| request.cookies.get(SESSION_COOKIE).map(String::as_str))
            .filter(|key| is_acceptable(key))
            .map(Self::new)
    }

    /// The key as a string.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// A `Set-Cookie` value that stores this key in the browser.
    pub fn set_cookie(&self) -> String {
        format!("{}={}; Path=/; HttpOnly; SameSite=Lax", SESSION_COOKIE, self.0)
    }
}

impl fmt::Display for SessionKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

fn is_acceptable(key: &str) -> bool {
    !key.is_empty()
        && key.len() <= MAX_KEY_LEN
        && key
            .bytes()
            .all(|b| b.is_ascii_alphanumeric() || b == b'-' || b == b'_')
}
