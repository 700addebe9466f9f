// Copyright 2019-2026 Maravilla Labs, operated by SOLUTAS GmbH, Switzerland
// SPDX-License-Identifier: Apache-2.0
// SPDX-License-Identifier: MIT

//! Embedding action references in rendered HTML.

use super::id::{ActionId, SourceLocation};
use crate::render::escape_html;

/// Every field name starting with this prefix is reserved for formwire and
/// never reaches a handler.
pub const RESERVED_FIELD_PREFIX: &str = "$ACTION_";

/// Field whose *name* carries the identifier: `$ACTION_ID_<id>`.
pub const ACTION_ID_FIELD_PREFIX: &str = "$ACTION_ID_";

/// Field whose *value* carries the identifier.
pub const ACTION_ID_FIELD: &str = "$ACTION_ID";

/// A handle to a registered action, as handed out by the registry.
///
/// # Example
///
/// ```rust
/// use formwire::actions::{ActionId, ActionRef, SourceLocation};
///
/// let location = SourceLocation::new("app::todos", "add_todo");
/// let reference = ActionRef::new(ActionId::for_location(&location), location);
///
/// let form = format!(
///     r#"<form method="post" action="{}">{}</form>"#,
///     reference.form_target("/"),
///     reference.hidden_input(),
/// );
/// assert!(form.contains(&format!("$ACTION_ID_{}", reference.encode())));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ActionRef {
    id: ActionId,
    location: SourceLocation,
}

impl ActionRef {
    /// Creates a reference.
    pub fn new(id: ActionId, location: SourceLocation) -> Self {
        Self { id, location }
    }

    /// The referenced identifier.
    pub fn id(&self) -> &ActionId {
        &self.id
    }

    /// The referenced declaration.
    pub fn location(&self) -> &SourceLocation {
        &self.location
    }

    /// The identifier string to embed.
    pub fn encode(&self) -> &str {
        self.id.as_str()
    }

    /// Name of the hidden field that carries the identifier.
    pub fn hidden_field_name(&self) -> String {
        format!("{}{}", ACTION_ID_FIELD_PREFIX, self.id)
    }

    /// A hidden `<input>` to place inside the form.
    pub fn hidden_input(&self) -> String {
        format!(
            r#"<input type="hidden" name="{}" />"#,
            escape_html(&self.hidden_field_name())
        )
    }

    /// A form `action` target that addresses this action through the query
    /// string (`/page?/<id>`).
    pub fn form_target(&self, page_path: &str) -> String {
        let separator = if page_path.contains('?') { '&' } else { '?' };
        format!("{}{}/{}", page_path, separator, self.id)
    }
}

/// Converts handler references into embeddable identifier strings.
#[derive(Debug, Clone, Copy, Default)]
pub struct ActionEncoder;

impl ActionEncoder {
    /// Returns the identifier for `reference`. Same input, same output.
    pub fn encode(&self, reference: &ActionRef) -> String {
        reference.encode().to_string()
    }
}
