// Copyright 2019-2026 Maravilla Labs, operated by SOLUTAS GmbH, Switzerland
// SPDX-License-Identifier: Apache-2.0
// SPDX-License-Identifier: MIT

//! Action handler trait and the control signals handlers can raise.

use async_trait::async_trait;
use serde_json::Value as JsonValue;
use std::error::Error as StdError;
use std::fmt;
use std::future::Future;
use std::sync::Arc;

use crate::validate::{Issue, ValidatedInput};

/// Boxed error carried by a fault.
pub type BoxError = Box<dyn StdError + Send + Sync + 'static>;

/// Non-success exits from a handler.
///
/// Any `std::error::Error` converts into [`ActionError::Fault`], so handlers
/// can use `?` on store calls directly.
pub enum ActionError {
    /// Navigate to `location`. A control signal, not a failure.
    Redirect(String),
    /// User-correctable problems found by the handler itself.
    Invalid(Vec<Issue>),
    /// Anything else. Logged in full, shown to the client only generically.
    Fault(BoxError),
}

impl ActionError {
    /// A fault with only a message.
    pub fn fault(message: impl Into<String>) -> Self {
        let message: String = message.into();
        ActionError::Fault(message.into())
    }
}

impl<E> From<E> for ActionError
where
    E: StdError + Send + Sync + 'static,
{
    fn from(err: E) -> Self {
        ActionError::Fault(Box::new(err))
    }
}

impl fmt::Debug for ActionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ActionError::Redirect(location) => f.debug_tuple("Redirect").field(location).finish(),
            ActionError::Invalid(issues) => f.debug_tuple("Invalid").field(issues).finish(),
            ActionError::Fault(cause) => f.debug_tuple("Fault").field(cause).finish(),
        }
    }
}

impl fmt::Display for ActionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ActionError::Redirect(location) => write!(f, "redirect to {}", location),
            ActionError::Invalid(issues) => write!(f, "{} validation issue(s)", issues.len()),
            ActionError::Fault(cause) => write!(f, "{}", cause),
        }
    }
}

/// Signals a redirect from inside a handler.
///
/// ```rust
/// use formwire::actions::{redirect, ActionResult};
///
/// async fn save() -> ActionResult {
///     // ... write to the store ...
///     Err(redirect("/"))
/// }
/// ```
pub fn redirect(location: impl Into<String>) -> ActionError {
    ActionError::Redirect(location.into())
}

/// Signals user-correctable issues from inside a handler.
pub fn invalid(issues: impl IntoIterator<Item = Issue>) -> ActionError {
    ActionError::Invalid(issues.into_iter().collect())
}

/// What a handler returns.
pub type ActionResult = Result<JsonValue, ActionError>;

/// A server function callable from a form.
///
/// `S` is the application state injected at startup (store handles and the
/// like). Plain `async fn(Arc<S>, ValidatedInput) -> ActionResult` functions
/// implement this trait automatically.
#[async_trait]
pub trait ActionHandler<S>: Send + Sync + 'static
where
    S: Send + Sync + 'static,
{
    /// Runs the action with validated input.
    async fn call(&self, state: Arc<S>, input: ValidatedInput) -> ActionResult;
}

#[async_trait]
impl<S, F, Fut> ActionHandler<S> for F
where
    S: Send + Sync + 'static,
    F: Fn(Arc<S>, ValidatedInput) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = ActionResult> + Send + 'static,
{
    async fn call(&self, state: Arc<S>, input: ValidatedInput) -> ActionResult {
        (self)(state, input).await
    }
}
