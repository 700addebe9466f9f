// Copyright 2019-2026 Maravilla Labs, operated by SOLUTAS GmbH, Switzerland
// SPDX-License-Identifier: Apache-2.0
// SPDX-License-Identifier: MIT

//! Classified results of an invocation.

use serde::Serialize;
use serde_json::Value as JsonValue;
use std::error::Error as StdError;
use std::fmt;
use std::sync::Arc;

use crate::validate::Issue;

/// Message shown to clients when fault details are hidden.
pub const GENERIC_FAULT_MESSAGE: &str = "Something went wrong while processing the form.";

/// An unexpected failure.
///
/// `message` is safe to show to the client. `cause` is the raw error and
/// never leaves the server.
#[derive(Clone, Serialize)]
pub struct Fault {
    /// Client-safe message.
    pub message: String,
    #[serde(skip)]
    cause: Arc<dyn StdError + Send + Sync + 'static>,
}

impl Fault {
    /// Creates a fault from a client message and the raw cause.
    pub fn new(message: impl Into<String>, cause: Arc<dyn StdError + Send + Sync + 'static>) -> Self {
        Self {
            message: message.into(),
            cause,
        }
    }

    /// The raw cause.
    pub fn cause(&self) -> &(dyn StdError + Send + Sync + 'static) {
        self.cause.as_ref()
    }
}

impl fmt::Debug for Fault {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Fault")
            .field("message", &self.message)
            .field("cause", &self.cause.to_string())
            .finish()
    }
}

impl PartialEq for Fault {
    fn eq(&self, other: &Self) -> bool {
        self.message == other.message
    }
}

/// The result of one invocation.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum InvocationOutcome {
    /// The handler returned a value.
    Success {
        /// Handler output.
        value: JsonValue,
    },
    /// The handler asked for navigation.
    Redirect {
        /// Target location.
        location: String,
    },
    /// Input was rejected, by the validator or by the handler.
    ValidationFailure {
        /// Issues in the order they were reported.
        issues: Vec<Issue>,
    },
    /// Something unexpected happened.
    Fault(Fault),
}

impl InvocationOutcome {
    /// Returns true for `Redirect`.
    pub fn is_redirect(&self) -> bool {
        matches!(self, InvocationOutcome::Redirect { .. })
    }

    /// Short name used in logs.
    pub fn kind(&self) -> &'static str {
        match self {
            InvocationOutcome::Success { .. } => "success",
            InvocationOutcome::Redirect { .. } => "redirect",
            InvocationOutcome::ValidationFailure { .. } => "validation_failure",
            InvocationOutcome::Fault(_) => "fault",
        }
    }

    /// HTTP status for a re-rendered response carrying this outcome.
    pub fn status_code(&self) -> u16 {
        match self {
            InvocationOutcome::Success { .. } => 200,
            InvocationOutcome::Redirect { .. } => 303,
            InvocationOutcome::ValidationFailure { .. } => 400,
            InvocationOutcome::Fault(_) => 500,
        }
    }

    /// Issues, if this is a validation failure.
    pub fn issues(&self) -> &[Issue] {
        match self {
            InvocationOutcome::ValidationFailure { issues } => issues,
            _ => &[],
        }
    }
}
