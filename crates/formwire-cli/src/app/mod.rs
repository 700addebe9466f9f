// Copyright 2019-2026 Maravilla Labs, operated by SOLUTAS GmbH, Switzerland
// SPDX-License-Identifier: Apache-2.0
// SPDX-License-Identifier: MIT

//! The reference todo application: state, actions, pages.

/// Index page rendering.
pub mod pages;
/// Todo server actions.
pub mod todos;

use std::sync::Arc;

use formwire::actions::{ActionRef, ActionRegistry, InvocationExecutor, ResultChannel};
use formwire::Dispatcher;

use crate::config::ActionsConfig;
use crate::store::TodoStore;

/// Application state handed to every todo action.
pub struct TodoApp {
    /// The todo store.
    pub store: TodoStore,
}

impl TodoApp {
    /// Creates the state around an opened store.
    pub fn new(store: TodoStore) -> Self {
        Self { store }
    }
}

/// References to the registered todo actions, for embedding in pages.
#[derive(Debug, Clone)]
pub struct TodoActions {
    /// Add a todo.
    pub add: ActionRef,
    /// Delete a todo.
    pub delete: ActionRef,
    /// Toggle a todo's done flag.
    pub toggle: ActionRef,
}

/// Registers every action and wires the dispatcher.
pub fn build(store: TodoStore, config: &ActionsConfig) -> formwire::Result<(Dispatcher<TodoApp>, TodoActions)> {
    let mut registry = ActionRegistry::new();
    let actions = todos::register(&mut registry)?;

    let executor = InvocationExecutor::new(Arc::new(TodoApp::new(store))).with_config(config.executor());
    let dispatcher = Dispatcher::new(registry, executor, ResultChannel::new(config.channel()));
    Ok((dispatcher, actions))
}

/// A registry with every action, for listing.
pub fn registry() -> formwire::Result<ActionRegistry<TodoApp>> {
    let mut registry = ActionRegistry::new();
    todos::register(&mut registry)?;
    Ok(registry)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_registers_all_actions() {
        let store = TodoStore::open_in_memory().unwrap();
        let (dispatcher, actions) = build(store, &ActionsConfig::default()).unwrap();

        assert_eq!(dispatcher.registry().len(), 3);
        for action in [&actions.add, &actions.delete, &actions.toggle] {
            assert!(dispatcher.registry().resolve(action.id()).is_ok());
        }
    }

    #[test]
    fn test_identifiers_match_listing_registry() {
        let store = TodoStore::open_in_memory().unwrap();
        let (_, actions) = build(store, &ActionsConfig::default()).unwrap();
        let listing = registry().unwrap();

        let ids: Vec<_> = listing.actions().map(|d| d.id().clone()).collect();
        assert_eq!(ids, vec![actions.add.id().clone(), actions.delete.id().clone(), actions.toggle.id().clone()]);
    }
}
