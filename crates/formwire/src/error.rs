// Copyright 2019-2026 Maravilla Labs, operated by SOLUTAS GmbH, Switzerland
// SPDX-License-Identifier: Apache-2.0
// SPDX-License-Identifier: MIT

//! Error types for formwire.
//!
//! These are the failures that end a request before any handler runs.
//! User-correctable validation problems and handler faults are *outcomes*
//! (see [`InvocationOutcome`](crate::actions::InvocationOutcome)), not errors.
//!
//! # Error Categories
//!
//! - **Client errors**: malformed submissions, unknown action identifiers,
//!   unsupported content types. Never retried.
//! - **Registration errors**: identifier collisions detected at startup.

use thiserror::Error;

use crate::actions::{ActionId, SourceLocation};
use crate::body::BodyParseError;

/// The main error type for formwire operations.
#[derive(Error, Debug)]
pub enum FormwireError {
    /// The submitted identifier does not belong to any registered action.
    ///
    /// Typically a page rendered by an older build of the application.
    #[error("Unresolved action: {0}")]
    UnresolvedAction(ActionId),

    /// The submission could not be understood (missing identifier, bad shape).
    #[error("Malformed request: {0}")]
    MalformedRequest(String),

    /// No submission adapter accepts the request's content type.
    #[error("Unsupported media type: {0}")]
    UnsupportedMediaType(String),

    /// Two different declarations hash to the same identifier.
    #[error("Action identifier collision: {id} is claimed by {existing} and {incoming}")]
    IdentifierCollision {
        /// The contested identifier.
        id: ActionId,
        /// The declaration registered first.
        existing: SourceLocation,
        /// The declaration that tried to register second.
        incoming: SourceLocation,
    },

    /// The request body could not be parsed.
    #[error("Body parse error: {0}")]
    Body(#[from] BodyParseError),
}

impl FormwireError {
    /// The HTTP status an adapter should answer with.
    pub fn status(&self) -> u16 {
        match self {
            FormwireError::UnresolvedAction(_) => 404,
            FormwireError::MalformedRequest(_) | FormwireError::Body(_) => 400,
            FormwireError::UnsupportedMediaType(_) => 415,
            FormwireError::IdentifierCollision { .. } => 500,
        }
    }

    /// Returns true for errors caused by the client's request.
    pub fn is_client_error(&self) -> bool {
        (400..500).contains(&self.status())
    }
}

/// Convenience type alias for Results with [`FormwireError`].
pub type Result<T> = std::result::Result<T, FormwireError>;
