// Copyright 2019-2026 Maravilla Labs, operated by SOLUTAS GmbH, Switzerland
// SPDX-License-Identifier: Apache-2.0
// SPDX-License-Identifier: MIT

// Warn on missing documentation for public items
#![warn(missing_docs)]

//! # formwire
//!
//! Server actions for plain HTML forms.
//!
//! A form rendered by the server names a server-side function through an
//! opaque, stable identifier. When the browser submits it, formwire resolves
//! the identifier, validates the fields against the action's declared shape,
//! runs the handler, and answers with either a `303 See Other` or a
//! re-rendered page carrying inline errors and the submitted values. The same
//! path serves scripted clients, which get machine-readable answers instead.
//!
//! ## Features
//!
//! - Identifiers derived from declaration coordinates, stable across restarts
//! - Native form posts (urlencoded and multipart) and JSON calls through one
//!   executor
//! - Validation failures as data, separate from faults
//! - Post/Redirect/Get navigation, never resubmitting on reload
//! - Single-use, expiring result storage per action and session
//!
//! ## Quick Start
//!
//! ```rust
//! use std::sync::Arc;
//! use formwire::actions::{redirect, ActionRegistry, ActionResult, InvocationExecutor, ResultChannel};
//! use formwire::validate::{FieldRule, InputShape, ValidatedInput};
//! use formwire::Dispatcher;
//!
//! struct Todos;
//!
//! async fn add_todo(_todos: Arc<Todos>, _input: ValidatedInput) -> ActionResult {
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
//! let dispatcher = Dispatcher::new(
//!     registry,
//!     InvocationExecutor::new(Arc::new(Todos)),
//!     ResultChannel::default(),
//! );
//! assert_eq!(dispatcher.registry().len(), 1);
//!
//! let form = format!(
//!     r#"<form method="post" action="{}"><input name="title" /></form>"#,
//!     add.form_target("/")
//! );
//! # let _ = form;
//! ```

/// Server actions: registry, encoder, executor, channel, navigation.
pub mod actions;
/// Submission adapters for native form posts and structured calls.
pub mod adapter;
/// Shared request body parsing helpers.
mod body;
/// Request dispatch.
pub mod dispatch;
/// Error types.
pub mod error;
/// Ordered form field multimap.
pub mod fields;
/// Render-time access to action state.
pub mod render;
/// HTTP request abstraction.
pub mod request;
/// HTTP response abstraction.
pub mod response;
/// Session keys.
pub mod session;
/// Input shapes and validation.
pub mod validate;

pub use body::BodyParseError;
pub use dispatch::{Dispatch, Dispatcher};
pub use error::{FormwireError, Result};
pub use fields::{FieldValue, FileField, FormFields};
pub use render::{escape_html, RenderContext};
pub use request::FormRequest;
pub use response::FormwireResponse;
pub use session::SessionKey;
