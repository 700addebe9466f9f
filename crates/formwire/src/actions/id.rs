// Copyright 2019-2026 Maravilla Labs, operated by SOLUTAS GmbH, Switzerland
// SPDX-License-Identifier: Apache-2.0
// SPDX-License-Identifier: MIT

//! Stable action identifiers.

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::fmt;

/// Number of digest bytes kept in an identifier (24 hex characters).
const ID_BYTES: usize = 12;

/// The declaration coordinate of an action: module path plus exported name.
///
/// Use [`action_location!`](crate::action_location) to capture the calling
/// module's path.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SourceLocation {
    /// Rust module path, e.g. `todos::actions`.
    pub module: String,
    /// Exported handler name, e.g. `add_todo`.
    pub export: String,
}

impl SourceLocation {
    /// Creates a location from a module path and export name.
    pub fn new(module: impl Into<String>, export: impl Into<String>) -> Self {
        Self {
            module: module.into(),
            export: export.into(),
        }
    }
}

impl fmt::Display for SourceLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}#{}", self.module, self.export)
    }
}

/// Builds a [`SourceLocation`] for the current module.
///
/// ```rust
/// let location = formwire::action_location!("add_todo");
/// assert_eq!(location.export, "add_todo");
/// assert_eq!(location.module, module_path!());
/// ```
#[macro_export]
macro_rules! action_location {
    ($export:expr) => {
        $crate::actions::SourceLocation::new(module_path!(), $export)
    };
}

/// Opaque identifier of a registered action.
///
/// Derived from the [`SourceLocation`] alone, so the same declaration gets the
/// same identifier in every build and on every machine. Previously rendered
/// pages therefore keep resolving after a restart.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ActionId(String);

impl ActionId {
    /// Derives the identifier for a declaration.
    pub fn for_location(location: &SourceLocation) -> Self {
        let digest = Sha256::digest(location.to_string().as_bytes());
        let hex = digest[..ID_BYTES]
            .iter()
            .map(|b| format!("{:02x}", b))
            .collect::<String>();
        Self(hex)
    }

    /// The identifier as embedded in HTML.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Returns true if the string has the shape of a derived identifier.
    pub fn is_well_formed(&self) -> bool {
        self.0.len() == ID_BYTES * 2
            && self.0.bytes().all(|b| b.is_ascii_digit() || (b'a'..=b'f').contains(&b))
    }
}

impl From<&str> for ActionId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl From<String> for ActionId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl fmt::Display for ActionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_identifier_is_deterministic() {
        let a = ActionId::for_location(&SourceLocation::new("todos::actions", "add_todo"));
        let b = ActionId::for_location(&SourceLocation::new("todos::actions", "add_todo"));
        assert_eq!(a, b);
        assert!(a.is_well_formed());
    }

    #[test]
    fn test_identifier_depends_on_both_coordinates() {
        let base = ActionId::for_location(&SourceLocation::new("todos::actions", "add_todo"));
        let other_export = ActionId::for_location(&SourceLocation::new("todos::actions", "delete_todo"));
        let other_module = ActionId::for_location(&SourceLocation::new("notes::actions", "add_todo"));

        assert_ne!(base, other_export);
        assert_ne!(base, other_module);
    }

    #[test]
    fn test_identifier_shape() {
        let id = ActionId::for_location(&SourceLocation::new("m", "f"));
        assert_eq!(id.as_str().len(), 24);
        assert!(id.as_str().bytes().all(|b| b.is_ascii_hexdigit()));
    }

    #[test]
    fn test_macro_captures_module_path() {
        let location = crate::action_location!("probe");
        assert_eq!(location.module, "formwire::actions::id::tests");
        assert_eq!(location.to_string(), "formwire::actions::id::tests#probe");
    }

    #[test]
    fn test_well_formed() {
        assert!(!ActionId::from("not-an-id").is_well_formed());
        assert!(!ActionId::from("ABCDEF0123456789ABCDEF01").is_well_formed());
    }
}
