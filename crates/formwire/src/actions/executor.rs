// Copyright 2019-2026 Maravilla Labs, operated by SOLUTAS GmbH, Switzerland
// SPDX-License-Identifier: Apache-2.0
// SPDX-License-Identifier: MIT

//! Invocation executor: validate, run the handler, classify the result.

use futures_util::FutureExt;
use std::any::Any;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;
use tracing::{debug, error};

use super::handler::ActionError;
use super::outcome::{Fault, InvocationOutcome, GENERIC_FAULT_MESSAGE};
use super::registry::ActionDescriptor;
use crate::fields::FormFields;
use crate::validate::{SchemaValidator, Validator};

/// Executor settings.
#[derive(Debug, Clone, Default)]
pub struct ExecutorConfig {
    /// Show the raw fault message to clients. Off in production.
    pub expose_fault_details: bool,
}

#[derive(Debug, thiserror::Error)]
#[error("action handler panicked: {0}")]
struct HandlerPanic(String);

#[derive(Debug, thiserror::Error)]
#[error("invalid redirect location {0:?}")]
struct InvalidRedirect(String);

/// Runs registered actions against submitted fields.
///
/// Holds the application state handed to every handler and the validator
/// used to check input against each action's declared shape.
///
/// # Example
///
/// ```rust
/// use std::sync::Arc;
/// use formwire::actions::{redirect, ActionRegistry, ActionResult, InvocationExecutor, InvocationOutcome};
/// use formwire::validate::{FieldRule, InputShape, ValidatedInput};
/// use formwire::FormFields;
///
/// struct AppState;
///
/// async fn add_todo(_state: Arc<AppState>, _input: ValidatedInput) -> ActionResult {
///     Err(redirect("/"))
/// }
///
/// # tokio_test_block(async {
/// let mut registry = ActionRegistry::<AppState>::new();
/// let add = registry
///     .register(
///         formwire::action_location!("add_todo"),
///         add_todo,
///         InputShape::new().field("title", FieldRule::text().min_len(3)),
///     )
///     .unwrap();
///
/// let executor = InvocationExecutor::new(Arc::new(AppState));
/// let descriptor = registry.resolve(add.id()).unwrap();
///
/// let outcome = executor.invoke(&descriptor, &FormFields::new().with("title", "ab")).await;
/// assert!(matches!(outcome, InvocationOutcome::ValidationFailure { .. }));
///
/// let outcome = executor.invoke(&descriptor, &FormFields::new().with("title", "Buy milk")).await;
/// assert!(outcome.is_redirect());
/// # });
/// # fn tokio_test_block<F: std::future::Future>(f: F) -> F::Output {
/// #     tokio::runtime::Builder::new_current_thread().build().unwrap().block_on(f)
/// # }
/// ```
pub struct InvocationExecutor<S: Send + Sync + 'static> {
    state: Arc<S>,
    validator: Arc<dyn Validator>,
    config: ExecutorConfig,
}

impl<S: Send + Sync + 'static> InvocationExecutor<S> {
    /// Creates an executor using the built-in [`SchemaValidator`].
    pub fn new(state: Arc<S>) -> Self {
        Self {
            state,
            validator: Arc::new(SchemaValidator),
            config: ExecutorConfig::default(),
        }
    }

    /// Replaces the validator.
    pub fn with_validator(mut self, validator: impl Validator + 'static) -> Self {
        self.validator = Arc::new(validator);
        self
    }

    /// Replaces the settings.
    pub fn with_config(mut self, config: ExecutorConfig) -> Self {
        self.config = config;
        self
    }

    /// The application state handed to handlers.
    pub fn state(&self) -> &Arc<S> {
        &self.state
    }

    /// Validates `fields` and, if they pass, runs the handler once.
    ///
    /// Never fails: every exit of the handler, a panic included, is mapped to
    /// an [`InvocationOutcome`].
    pub async fn invoke(&self, descriptor: &ActionDescriptor<S>, fields: &FormFields) -> InvocationOutcome {
        let input = match self.validator.validate(descriptor.input_shape(), fields) {
            Ok(input) => input,
            Err(issues) => {
                debug!(action = %descriptor.id(), issues = issues.len(), "input rejected");
                return InvocationOutcome::ValidationFailure { issues };
            }
        };

        let call = descriptor.handler().call(Arc::clone(&self.state), input);
        let result = match AssertUnwindSafe(call).catch_unwind().await {
            Ok(result) => result,
            Err(payload) => {
                let cause = HandlerPanic(panic_message(payload.as_ref()));
                return self.fault(descriptor, Arc::new(cause));
            }
        };

        match result {
            Ok(value) => InvocationOutcome::Success { value },
            Err(ActionError::Redirect(location)) => {
                if is_valid_location(&location) {
                    InvocationOutcome::Redirect { location }
                } else {
                    self.fault(descriptor, Arc::new(InvalidRedirect(location)))
                }
            }
            Err(ActionError::Invalid(issues)) => InvocationOutcome::ValidationFailure { issues },
            Err(ActionError::Fault(cause)) => self.fault(descriptor, Arc::from(cause)),
        }
    }

    fn fault(
        &self,
        descriptor: &ActionDescriptor<S>,
        cause: Arc<dyn std::error::Error + Send + Sync + 'static>,
    ) -> InvocationOutcome {
        error!(
            action = %descriptor.id(),
            location = %descriptor.location(),
            error = %cause,
            "action failed"
        );
        let message = if self.config.expose_fault_details {
            cause.to_string()
        } else {
            GENERIC_FAULT_MESSAGE.to_string()
        };
        InvocationOutcome::Fault(Fault::new(message, cause))
    }
}

fn is_valid_location(location: &str) -> bool {
    !location.trim().is_empty() && !location.chars().any(char::is_control)
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic payload".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::actions::{invalid, redirect, ActionRegistry, ActionResult};
    use crate::validate::{FieldRule, InputShape, Issue, IssueCode, ValidatedInput};
    use serde_json::json;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[derive(Default)]
    struct Counter {
        calls: AtomicUsize,
    }

    async fn counted(state: Arc<Counter>, input: ValidatedInput) -> ActionResult {
        state.calls.fetch_add(1, Ordering::SeqCst);
        Ok(json!({ "title": input.str("title") }))
    }

    async fn boom(_state: Arc<Counter>, _input: ValidatedInput) -> ActionResult {
        Err(ActionError::fault("connection refused"))
    }

    async fn panics(_state: Arc<Counter>, _input: ValidatedInput) -> ActionResult {
        panic!("index out of bounds")
    }

    async fn goes_home(_state: Arc<Counter>, _input: ValidatedInput) -> ActionResult {
        Err(redirect("/"))
    }

    async fn bad_redirect(_state: Arc<Counter>, _input: ValidatedInput) -> ActionResult {
        Err(redirect("/\r\nSet-Cookie: x=1"))
    }

    async fn duplicate(_state: Arc<Counter>, _input: ValidatedInput) -> ActionResult {
        Err(invalid([Issue::custom("title", "Already exists")]))
    }

    fn setup<H>(handler: H) -> (InvocationExecutor<Counter>, Arc<ActionDescriptor<Counter>>)
    where
        H: crate::actions::ActionHandler<Counter>,
    {
        let mut registry = ActionRegistry::new();
        let shape = InputShape::new().field("title", FieldRule::text().trim().min_len(3));
        let reference = registry
            .register(crate::action_location!("probe"), handler, shape)
            .unwrap();
        let descriptor = registry.resolve(reference.id()).unwrap();
        (InvocationExecutor::new(Arc::new(Counter::default())), descriptor)
    }

    #[tokio::test]
    async fn test_rejected_input_never_runs_handler() {
        let (executor, descriptor) = setup(counted);
        let outcome = executor.invoke(&descriptor, &FormFields::new().with("title", "ab")).await;

        match outcome {
            InvocationOutcome::ValidationFailure { issues } => {
                assert_eq!(issues.len(), 1);
                assert_eq!(issues[0].path, "title");
                assert_eq!(issues[0].code, IssueCode::TooSmall);
            }
            other => panic!("expected validation failure, got {:?}", other),
        }
        assert_eq!(executor.state().calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_accepted_input_runs_handler_once() {
        let (executor, descriptor) = setup(counted);
        let outcome = executor
            .invoke(&descriptor, &FormFields::new().with("title", "  Buy milk "))
            .await;

        assert_eq!(outcome, InvocationOutcome::Success { value: json!({"title": "Buy milk"}) });
        assert_eq!(executor.state().calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_redirect_is_control_signal() {
        let (executor, descriptor) = setup(goes_home);
        let outcome = executor.invoke(&descriptor, &FormFields::new().with("title", "abc")).await;
        assert_eq!(outcome, InvocationOutcome::Redirect { location: "/".into() });
    }

    #[tokio::test]
    async fn test_redirect_with_control_characters_is_fault() {
        let (executor, descriptor) = setup(bad_redirect);
        let outcome = executor.invoke(&descriptor, &FormFields::new().with("title", "abc")).await;
        assert!(matches!(outcome, InvocationOutcome::Fault(_)));
    }

    #[tokio::test]
    async fn test_handler_issues_become_validation_failure() {
        let (executor, descriptor) = setup(duplicate);
        let outcome = executor.invoke(&descriptor, &FormFields::new().with("title", "abc")).await;
        assert_eq!(outcome.issues(), &[Issue::custom("title", "Already exists")]);
    }

    #[tokio::test]
    async fn test_fault_detail_hidden_by_default() {
        let (executor, descriptor) = setup(boom);
        let outcome = executor.invoke(&descriptor, &FormFields::new().with("title", "abc")).await;

        match outcome {
            InvocationOutcome::Fault(fault) => {
                assert_eq!(fault.message, GENERIC_FAULT_MESSAGE);
                assert_eq!(fault.cause().to_string(), "connection refused");
            }
            other => panic!("expected fault, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_fault_detail_exposed_when_configured() {
        let (executor, descriptor) = setup(boom);
        let executor = executor.with_config(ExecutorConfig { expose_fault_details: true });
        let outcome = executor.invoke(&descriptor, &FormFields::new().with("title", "abc")).await;

        match outcome {
            InvocationOutcome::Fault(fault) => assert_eq!(fault.message, "connection refused"),
            other => panic!("expected fault, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_panic_becomes_fault() {
        let (executor, descriptor) = setup(panics);
        let outcome = executor.invoke(&descriptor, &FormFields::new().with("title", "abc")).await;

        match outcome {
            InvocationOutcome::Fault(fault) => {
                assert_eq!(fault.message, GENERIC_FAULT_MESSAGE);
                assert!(fault.cause().to_string().contains("index out of bounds"));
            }
            other => panic!("expected fault, got {:?}", other),
        }

        // The executor stays usable.
        let outcome = executor.invoke(&descriptor, &FormFields::new().with("title", "ab")).await;
        assert!(matches!(outcome, InvocationOutcome::ValidationFailure { .. }));
    }

    #[tokio::test]
    async fn test_custom_validator() {
        struct RejectAll;

        impl Validator for RejectAll {
            fn validate(&self, _shape: &InputShape, _fields: &FormFields) -> Result<ValidatedInput, Vec<Issue>> {
                Err(vec![Issue::custom("form", "closed"), Issue::custom("form", "closed")])
            }
        }

        let (executor, descriptor) = setup(counted);
        let executor = executor.with_validator(RejectAll);
        let outcome = executor.invoke(&descriptor, &FormFields::new().with("title", "abc")).await;

        assert_eq!(outcome.issues().len(), 2);
        assert_eq!(executor.state().calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_custom_validator_can_accept() {
        struct Shout;

        impl Validator for Shout {
            fn validate(&self, _shape: &InputShape, fields: &FormFields) -> Result<ValidatedInput, Vec<Issue>> {
                let title = fields.text("title").unwrap_or_default().to_uppercase();
                let mut values = serde_json::Map::new();
                values.insert("title".to_string(), json!(title));
                Ok(ValidatedInput::from_values(values))
            }
        }

        let (executor, descriptor) = setup(counted);
        let executor = executor.with_validator(Shout);
        let outcome = executor.invoke(&descriptor, &FormFields::new().with("title", "ab")).await;

        assert_eq!(outcome, InvocationOutcome::Success { value: json!({"title": "AB"}) });
        assert_eq!(executor.state().calls.load(Ordering::SeqCst), 1);
    }
}
