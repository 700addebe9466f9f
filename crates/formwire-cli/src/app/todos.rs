// Copyright 2019-2026 Maravilla Labs, operated by SOLUTAS GmbH, Switzerland
// SPDX-License-Identifier: Apache-2.0
// SPDX-License-Identifier: MIT

//! Todo server actions.

use std::sync::Arc;

use formwire::actions::{redirect, ActionError, ActionRegistry, ActionResult};
use formwire::validate::{FieldRule, InputShape, ValidatedInput};
use formwire::Result;
use tracing::info;

use super::{TodoActions, TodoApp};

/// Inserts a todo, then sends the browser back to the list.
pub async fn add_todo(app: Arc<TodoApp>, input: ValidatedInput) -> ActionResult {
    let title = input.str("title").ok_or_else(|| ActionError::fault("title missing after validation"))?;
    let todo = app.store.insert(title).await?;
    info!(id = todo.id, "todo added");
    Err(redirect("/"))
}

/// Deletes a todo. Deleting one that does not exist is a no-op.
pub async fn delete_todo(app: Arc<TodoApp>, input: ValidatedInput) -> ActionResult {
    let id = input.i64("id").ok_or_else(|| ActionError::fault("id missing after validation"))?;
    if app.store.delete(id).await? {
        info!(id, "todo deleted");
    }
    Err(redirect("/"))
}

/// Flips a todo's done flag. Unknown ids are ignored.
pub async fn toggle_todo(app: Arc<TodoApp>, input: ValidatedInput) -> ActionResult {
    let id = input.i64("id").ok_or_else(|| ActionError::fault("id missing after validation"))?;
    if app.store.toggle(id).await? {
        info!(id, "todo toggled");
    }
    Err(redirect("/"))
}

/// Registers the todo actions.
pub fn register(registry: &mut ActionRegistry<TodoApp>) -> Result<TodoActions> {
    let add = registry.register(
        formwire::action_location!("add_todo"),
        add_todo,
        InputShape::new().field("title", FieldRule::text().trim().min_len(3).max_len(200)),
    )?;
    let delete = registry.register(
        formwire::action_location!("delete_todo"),
        delete_todo,
        InputShape::new().field("id", FieldRule::integer().min(1)),
    )?;
    let toggle = registry.register(
        formwire::action_location!("toggle_todo"),
        toggle_todo,
        InputShape::new().field("id", FieldRule::integer().min(1)),
    )?;

    Ok(TodoActions { add, delete, toggle })
}
