// Copyright 2019-2026 Maravilla Labs, operated by SOLUTAS GmbH, Switzerland
// SPDX-License-Identifier: Apache-2.0
// SPDX-License-Identifier: MIT

//! What a page renderer needs from formwire.

use std::sync::Arc;

use crate::actions::{ActionRef, ActionState, ResultChannel};
use crate::session::SessionKey;

/// Per-render access to the result channel for one session.
///
/// A page that renders a form calls [`take_state`](Self::take_state) once per
/// action to pick up errors and submitted values from a failed submission.
#[derive(Clone)]
pub struct RenderContext {
    session: SessionKey,
    channel: Arc<ResultChannel>,
}

impl RenderContext {
    /// Creates a context for `session`.
    pub fn new(session: SessionKey, channel: Arc<ResultChannel>) -> Self {
        Self { session, channel }
    }

    /// The session being rendered for.
    pub fn session(&self) -> &SessionKey {
        &self.session
    }

    /// Takes the pending state of an action. A second call returns `None`.
    pub fn take_state(&self, action: &ActionRef) -> Option<ActionState> {
        self.channel.consume(action.id(), &self.session)
    }
}

/// Escapes text for HTML element content and quoted attribute values.
pub fn escape_html(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for c in input.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            c => out.push(c),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::actions::{ActionId, InvocationOutcome, SourceLocation};
    use crate::fields::FormFields;

    #[test]
    fn test_escape_html() {
        assert_eq!(
            escape_html(r#"<a href="x">Tom & 'Jerry'</a>"#),
            "&lt;a href=&quot;x&quot;&gt;Tom &amp; &#39;Jerry&#39;&lt;/a&gt;"
        );
        assert_eq!(escape_html("plain"), "plain");
    }

    #[test]
    fn test_take_state_once() {
        let location = SourceLocation::new("app", "add");
        let action = ActionRef::new(ActionId::for_location(&location), location);
        let channel = Arc::new(ResultChannel::default());
        let session = SessionKey::new("s1");

        channel.publish(
            action.id().clone(),
            session.clone(),
            InvocationOutcome::ValidationFailure { issues: vec![] },
            FormFields::new().with("title", "ab"),
        );

        let ctx = RenderContext::new(session, channel);
        assert_eq!(ctx.take_state(&action).unwrap().field_text("title"), Some("ab"));
        assert!(ctx.take_state(&action).is_none());
    }
}
