// Copyright 2019-2026 Maravilla Labs, operated by SOLUTAS GmbH, Switzerland
// SPDX-License-Identifier: Apache-2.0
// SPDX-License-Identifier: MIT

//! Server actions: functions a plain HTML form can call.
//!
//! The pieces, in the order a submission meets them:
//!
//! - [`ActionRegistry`] maps a stable [`ActionId`] to a handler and its
//!   declared [`InputShape`](crate::validate::InputShape)
//! - [`ActionRef`] embeds the identifier in a form (hidden field or
//!   `?/<id>` target)
//! - [`InvocationExecutor`] validates input, runs the handler and classifies
//!   the result as an [`InvocationOutcome`]
//! - [`RedirectController`] turns `Redirect` outcomes into navigation
//! - [`ResultChannel`] holds any other outcome until the page renders it
//!
//! # Example
//!
//! ```rust
//! use std::sync::Arc;
//! use formwire::actions::{redirect, ActionRegistry, ActionResult};
//! use formwire::validate::{FieldRule, InputShape, ValidatedInput};
//!
//! struct Todos;
//!
//! async fn add_todo(_todos: Arc<Todos>, input: ValidatedInput) -> ActionResult {
//!     let _title = input.str("title");
//!     Err(redirect("/"))
//! }
//!
//! let mut registry = ActionRegistry::<Todos>::new();
//! let add = registry
//!     .register(
//!         formwire::action_location!("add_todo"),
//!         add_todo,
//!         InputShape::new().field("title", FieldRule::text().trim().min_len(3)),
//!     )
//!     .unwrap();
//!
//! let html = format!(
//!     r#"<form method="post" action="{}"><input name="title" /></form>"#,
//!     add.form_target("/")
//! );
//! assert!(html.contains(add.encode()));
//! ```

mod channel;
mod encoder;
mod executor;
mod handler;
mod id;
mod navigation;
mod outcome;
mod registry;

pub use channel::{ActionState, ChannelConfig, ResultChannel};
pub use encoder::{ActionEncoder, ActionRef, ACTION_ID_FIELD, ACTION_ID_FIELD_PREFIX, RESERVED_FIELD_PREFIX};
pub use executor::{ExecutorConfig, InvocationExecutor};
pub use handler::{invalid, redirect, ActionError, ActionHandler, ActionResult, BoxError};
pub use id::{ActionId, SourceLocation};
pub use navigation::{NavigationDirective, NavigationKind, RedirectController, CLIENT_REDIRECT_HEADER};
pub use outcome::{Fault, InvocationOutcome, GENERIC_FAULT_MESSAGE};
pub use registry::{ActionDescriptor, ActionRegistry};
