// Copyright 2019-2026 Maravilla Labs, operated by SOLUTAS GmbH, Switzerland
// SPDX-License-Identifier: Apache-2.0
// SPDX-License-Identifier: MIT

//! Request dispatch: adapter, registry, executor, then navigation or channel.

use std::sync::Arc;
use tracing::{field, info, info_span, warn, Instrument, Span};

use crate::actions::{
    ActionId, ActionRegistry, ActionState, InvocationExecutor, NavigationDirective, RedirectController,
    ResultChannel,
};
use crate::adapter::{NativeFormAdapter, StructuredCallAdapter, SubmissionAdapter, SubmissionMode};
use crate::error::{FormwireError, Result};
use crate::render::RenderContext;
use crate::request::FormRequest;
use crate::session::SessionKey;

/// What the HTTP layer should do after a submission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Dispatch {
    /// Navigate away; nothing was stored.
    Navigate(NavigationDirective),
    /// Render again in this response. The outcome waits in the channel under
    /// `(action_id, session)`.
    Rerender {
        /// The action that ran.
        action_id: ActionId,
        /// How the client submitted.
        mode: SubmissionMode,
        /// Status for the re-rendered response.
        status: u16,
    },
}

/// Glue between an inbound request and the action machinery.
///
/// # Example
///
/// ```rust
/// use std::sync::Arc;
/// use formwire::actions::{redirect, ActionRegistry, ActionResult, InvocationExecutor, ResultChannel};
/// use formwire::validate::{FieldRule, InputShape, ValidatedInput};
/// use formwire::{Dispatch, Dispatcher, FormRequest, SessionKey};
///
/// struct AppState;
///
/// async fn add_todo(_state: Arc<AppState>, _input: ValidatedInput) -> ActionResult {
///     Err(redirect("/"))
/// }
///
/// let mut registry = ActionRegistry::<AppState>::new();
/// let add = registry
///     .register(formwire::action_location!("add_todo"), add_todo, InputShape::new().field("title", FieldRule::text()))
///     .unwrap();
///
/// let dispatcher = Dispatcher::new(
///     registry,
///     InvocationExecutor::new(Arc::new(AppState)),
///     ResultChannel::default(),
/// );
///
/// let request = FormRequest::new("/", "POST")
///     .with_header("content-type", "application/x-www-form-urlencoded")
///     .with_body(format!("%24ACTION_ID_{}=&title=Buy+milk", add.encode()).into_bytes());
///
/// # tokio::runtime::Builder::new_current_thread().build().unwrap().block_on(async {
/// let dispatch = dispatcher.dispatch(&request, &SessionKey::generate()).await.unwrap();
/// assert!(matches!(dispatch, Dispatch::Navigate(_)));
/// # });
/// ```
pub struct Dispatcher<S: Send + Sync + 'static> {
    registry: Arc<ActionRegistry<S>>,
    executor: InvocationExecutor<S>,
    channel: Arc<ResultChannel>,
    controller: RedirectController,
    adapters: Vec<Box<dyn SubmissionAdapter>>,
}

impl<S: Send + Sync + 'static> Dispatcher<S> {
    /// Creates a dispatcher with the native form and structured call adapters.
    pub fn new(registry: ActionRegistry<S>, executor: InvocationExecutor<S>, channel: ResultChannel) -> Self {
        Self {
            registry: Arc::new(registry),
            executor,
            channel: Arc::new(channel),
            controller: RedirectController,
            adapters: vec![Box::new(NativeFormAdapter), Box::new(StructuredCallAdapter)],
        }
    }

    /// Adds an adapter. It is consulted after the built-in ones.
    pub fn with_adapter(mut self, adapter: impl SubmissionAdapter + 'static) -> Self {
        self.adapters.push(Box::new(adapter));
        self
    }

    /// The frozen registry.
    pub fn registry(&self) -> &Arc<ActionRegistry<S>> {
        &self.registry
    }

    /// The result channel.
    pub fn channel(&self) -> &Arc<ResultChannel> {
        &self.channel
    }

    /// The application state shared with handlers.
    pub fn state(&self) -> &Arc<S> {
        self.executor.state()
    }

    /// A render context for `session`.
    pub fn render_context(&self, session: SessionKey) -> RenderContext {
        RenderContext::new(session, Arc::clone(&self.channel))
    }

    /// Consumes the state left by a [`Dispatch::Rerender`].
    pub fn take_state(&self, action_id: &ActionId, session: &SessionKey) -> Option<ActionState> {
        self.channel.consume(action_id, session)
    }

    /// Handles one submission.
    pub async fn dispatch(&self, request: &FormRequest, session: &SessionKey) -> Result<Dispatch> {
        let span = info_span!("dispatch", path = %request.path, action = field::Empty);
        let result = self.dispatch_inner(request, session).instrument(span).await;
        if let Err(err) = &result {
            warn!(path = %request.path, status = err.status(), error = %err, "submission rejected");
        }
        result
    }

    async fn dispatch_inner(&self, request: &FormRequest, session: &SessionKey) -> Result<Dispatch> {
        if request.method != "POST" {
            return Err(FormwireError::MalformedRequest(format!(
                "actions are invoked with POST, not {}",
                request.method
            )));
        }

        let adapter = self
            .adapters
            .iter()
            .find(|adapter| adapter.accepts(request))
            .ok_or_else(|| {
                FormwireError::UnsupportedMediaType(request.content_type().unwrap_or("none").to_string())
            })?;

        let inbound = adapter.parse(request)?;
        Span::current().record("action", field::display(&inbound.action_id));

        let descriptor = self.registry.resolve(&inbound.action_id)?;
        let outcome = self.executor.invoke(&descriptor, &inbound.fields).await;
        info!(
            adapter = adapter.name(),
            location = %descriptor.location(),
            outcome = outcome.kind(),
            "action invoked"
        );

        if let Some(directive) = self.controller.on_outcome(&outcome, inbound.mode) {
            return Ok(Dispatch::Navigate(directive));
        }

        let status = outcome.status_code();
        self.channel
            .publish(inbound.action_id.clone(), session.clone(), outcome, inbound.fields);
        Ok(Dispatch::Rerender {
            action_id: inbound.action_id,
            mode: inbound.mode,
            status,
        })
    }
}
