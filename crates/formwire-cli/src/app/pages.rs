// Copyright 2019-2026 Maravilla Labs, operated by SOLUTAS GmbH, Switzerland
// SPDX-License-Identifier: Apache-2.0
// SPDX-License-Identifier: MIT

//! Index page rendering.
//!
//! Pending action state is consumed through [`PendingStates`] before the
//! todo list is loaded.

use formwire::actions::{ActionRef, ActionState};
use formwire::{escape_html, RenderContext};

use super::TodoActions;
use crate::store::Todo;

/// Action state consumed for one render of the index page.
#[derive(Debug, Default)]
pub struct PendingStates {
    add: Option<ActionState>,
    others: Vec<ActionState>,
}

impl PendingStates {
    /// Consumes this session's state for every todo action.
    pub fn take(ctx: &RenderContext, actions: &TodoActions) -> Self {
        Self {
            add: ctx.take_state(&actions.add),
            others: [&actions.delete, &actions.toggle]
                .into_iter()
                .filter_map(|action| ctx.take_state(action))
                .collect(),
        }
    }

    /// Returns true if no action left state for this render.
    pub fn is_empty(&self) -> bool {
        self.add.is_none() && self.others.is_empty()
    }
}

/// Renders the todo list page.
///
/// A failed add shows its issues next to the input and keeps the typed
/// title; other failures show a banner.
pub fn render_index(project: &str, todos: &[Todo], actions: &TodoActions, pending: &PendingStates) -> String {
    let title = escape_html(project);
    let mut html = format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="utf-8">
    <title>{title}</title>
    <link rel="stylesheet" href="/static/app.css">
</head>
<body>
<main>
    <h1>{title}</h1>
"#
    );

    let banners = pending.add.iter().chain(pending.others.iter()).filter_map(banner_message);
    for message in banners {
        html.push_str(&format!("    <p class=\"error\" role=\"alert\">{}</p>\n", escape_html(&message)));
    }

    render_add_form(&mut html, &actions.add, pending.add.as_ref());

    if todos.is_empty() {
        html.push_str("    <p class=\"empty\">Nothing to do.</p>\n");
    } else {
        html.push_str("    <ul class=\"todos\">\n");
        for todo in todos {
            html.push_str(&render_item(todo, actions));
        }
        html.push_str("    </ul>\n");
    }

    html.push_str("</main>\n</body>\n</html>\n");
    html
}

fn render_add_form(html: &mut String, add: &ActionRef, state: Option<&ActionState>) {
    let title = state.and_then(|s| s.field_text("title")).unwrap_or_default();
    html.push_str(&format!(
        r#"    <form method="post" action="{target}">
        {hidden}
        <input name="title" value="{title}" placeholder="What needs doing?" autofocus>
        <button>Add</button>
"#,
        target = escape_html(&add.form_target("/")),
        hidden = add.hidden_input(),
        title = escape_html(title),
    ));
    for issue in state.into_iter().flat_map(|s| s.issues_for("title")) {
        html.push_str(&format!("        <p class=\"issue\">{}</p>\n", escape_html(&issue.message)));
    }
    html.push_str("    </form>\n");
}

fn render_item(todo: &Todo, actions: &TodoActions) -> String {
    format!(
        r#"        <li class="{class}">
            <form method="post" action="/">
                {toggle}
                <input type="hidden" name="id" value="{id}">
                <button>{mark}</button>
            </form>
            <span>{title}</span>
            <form method="post" action="/">
                {delete}
                <input type="hidden" name="id" value="{id}">
                <button>Delete</button>
            </form>
        </li>
"#,
        class = if todo.done { "done" } else { "open" },
        toggle = actions.toggle.hidden_input(),
        delete = actions.delete.hidden_input(),
        id = todo.id,
        mark = if todo.done { "Undo" } else { "Done" },
        title = escape_html(&todo.title),
    )
}

fn banner_message(state: &ActionState) -> Option<String> {
    if let Some(message) = state.fault_message() {
        return Some(message.to_string());
    }
    // Title issues are shown inline by the add form.
    let messages: Vec<&str> = state
        .issues()
        .iter()
        .filter(|issue| issue.path != "title")
        .map(|issue| issue.message.as_str())
        .collect();
    (!messages.is_empty()).then(|| messages.join(" "))
}
