// Copyright 2019-2026 Maravilla Labs, operated by SOLUTAS GmbH, Switzerland
// SPDX-License-Identifier: Apache-2.0
// SPDX-License-Identifier: MIT

//! The action registry.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use tracing::debug;

use super::encoder::ActionRef;
use super::handler::ActionHandler;
use super::id::{ActionId, SourceLocation};
use crate::error::{FormwireError, Result};
use crate::validate::InputShape;

/// A registered server function.
///
/// Immutable once created; shared by reference for the lifetime of the
/// registry.
pub struct ActionDescriptor<S: Send + Sync + 'static> {
    id: ActionId,
    location: SourceLocation,
    handler: Arc<dyn ActionHandler<S>>,
    input_shape: InputShape,
}

impl<S: Send + Sync + 'static> ActionDescriptor<S> {
    /// The stable identifier.
    pub fn id(&self) -> &ActionId {
        &self.id
    }

    /// Where the action was declared.
    pub fn location(&self) -> &SourceLocation {
        &self.location
    }

    /// The handler to invoke.
    pub fn handler(&self) -> &dyn ActionHandler<S> {
        self.handler.as_ref()
    }

    /// The declared input contract.
    pub fn input_shape(&self) -> &InputShape {
        &self.input_shape
    }

    /// A reference suitable for embedding in rendered HTML.
    pub fn reference(&self) -> ActionRef {
        ActionRef::new(self.id.clone(), self.location.clone())
    }
}

impl<S: Send + Sync + 'static> fmt::Debug for ActionDescriptor<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ActionDescriptor")
            .field("id", &self.id)
            .field("location", &self.location)
            .field("input_shape", &self.input_shape)
            .finish_non_exhaustive()
    }
}

/// Maps action identifiers to registered server functions.
///
/// Registration happens at startup through `&mut self`; afterwards the
/// registry is shared behind an `Arc` and only read.
///
/// # Example
///
/// ```rust
/// use std::sync::Arc;
/// use formwire::actions::{redirect, ActionRegistry, ActionResult};
/// use formwire::validate::{FieldRule, InputShape, ValidatedInput};
///
/// struct AppState;
///
/// async fn add_todo(_state: Arc<AppState>, _input: ValidatedInput) -> ActionResult {
///     Err(redirect("/"))
/// }
///
/// let mut registry = ActionRegistry::<AppState>::new();
/// let add = registry
///     .register(
///         formwire::action_location!("add_todo"),
///         add_todo,
///         InputShape::new().field("title", FieldRule::text().min_len(3)),
///     )
///     .unwrap();
///
/// let descriptor = registry.resolve(add.id()).unwrap();
/// assert_eq!(descriptor.location().export, "add_todo");
/// ```
pub struct ActionRegistry<S: Send + Sync + 'static> {
    actions: HashMap<ActionId, Arc<ActionDescriptor<S>>>,
    order: Vec<ActionId>,
}

impl<S: Send + Sync + 'static> ActionRegistry<S> {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self {
            actions: HashMap::new(),
            order: Vec::new(),
        }
    }

    /// Registers a handler under the identifier derived from `location`.
    ///
    /// Registering the same location twice is a no-op that returns the
    /// existing reference; the first handler stays in place.
    pub fn register<H>(&mut self, location: SourceLocation, handler: H, input_shape: InputShape) -> Result<ActionRef>
    where
        H: ActionHandler<S>,
    {
        let id = ActionId::for_location(&location);

        if let Some(existing) = self.actions.get(&id) {
            if existing.location != location {
                return Err(FormwireError::IdentifierCollision {
                    id,
                    existing: existing.location.clone(),
                    incoming: location,
                });
            }
            debug!(action = %id, location = %location, "action already registered");
            return Ok(existing.reference());
        }

        debug!(action = %id, location = %location, "registered action");
        let descriptor = ActionDescriptor {
            id: id.clone(),
            location,
            handler: Arc::new(handler),
            input_shape,
        };
        let reference = descriptor.reference();
        self.actions.insert(id.clone(), Arc::new(descriptor));
        self.order.push(id);
        Ok(reference)
    }

    /// Looks up an action by identifier.
    pub fn resolve(&self, id: &ActionId) -> Result<Arc<ActionDescriptor<S>>> {
        self.actions
            .get(id)
            .cloned()
            .ok_or_else(|| FormwireError::UnresolvedAction(id.clone()))
    }

    /// Returns the reference for a declaration, if it is registered.
    pub fn reference(&self, location: &SourceLocation) -> Option<ActionRef> {
        self.actions
            .get(&ActionId::for_location(location))
            .filter(|d| d.location == *location)
            .map(|d| d.reference())
    }

    /// Iterates over registered actions in registration order.
    pub fn actions(&self) -> impl Iterator<Item = &ActionDescriptor<S>> {
        self.order
            .iter()
            .filter_map(|id| self.actions.get(id))
            .map(|d| d.as_ref())
    }

    /// Number of registered actions.
    pub fn len(&self) -> usize {
        self.actions.len()
    }

    /// Returns true if nothing is registered.
    pub fn is_empty(&self) -> bool {
        self.actions.is_empty()
    }
}

impl<S: Send + Sync + 'static> Default for ActionRegistry<S> {
    fn default() -> Self {
        Self::new()
    }
}
