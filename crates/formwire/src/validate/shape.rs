// Copyright 2019-2026 Maravilla Labs, operated by SOLUTAS GmbH, Switzerland
// SPDX-License-Identifier: Apache-2.0
// SPDX-License-Identifier: MIT

//! Declared input contracts.

use regex::Regex;

/// The type a field is coerced to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    /// UTF-8 text.
    Text,
    /// A signed 64-bit integer written in decimal.
    Integer,
    /// A checkbox-style flag (`on`, `true`, `1` / `off`, `false`, `0`, empty).
    Boolean,
    /// An uploaded file.
    File,
}

/// Rules for a single field.
///
/// Length limits count characters for text and bytes for files; `min`/`max`
/// apply to integers.
#[derive(Debug, Clone)]
pub struct FieldRule {
    pub(crate) kind: FieldKind,
    pub(crate) required: bool,
    pub(crate) multiple: bool,
    pub(crate) trim: bool,
    pub(crate) min_len: Option<usize>,
    pub(crate) max_len: Option<usize>,
    pub(crate) min: Option<i64>,
    pub(crate) max: Option<i64>,
    pub(crate) pattern: Option<Regex>,
}

impl FieldRule {
    fn of(kind: FieldKind) -> Self {
        Self {
            kind,
            required: true,
            multiple: false,
            trim: false,
            min_len: None,
            max_len: None,
            min: None,
            max: None,
            pattern: None,
        }
    }

    /// A required text field.
    pub fn text() -> Self {
        Self::of(FieldKind::Text)
    }

    /// A required integer field.
    pub fn integer() -> Self {
        Self::of(FieldKind::Integer)
    }

    /// A checkbox flag. Absent checkboxes read as `false`, so it is optional.
    pub fn boolean() -> Self {
        Self::of(FieldKind::Boolean).optional()
    }

    /// A required file upload.
    pub fn file() -> Self {
        Self::of(FieldKind::File)
    }

    /// Allows the field to be absent.
    pub fn optional(mut self) -> Self {
        self.required = false;
        self
    }

    /// Collects every submitted value into a list instead of the first one.
    pub fn multiple(mut self) -> Self {
        self.multiple = true;
        self
    }

    /// Trims surrounding whitespace before checking and storing text.
    pub fn trim(mut self) -> Self {
        self.trim = true;
        self
    }

    /// Minimum length (characters for text, bytes for files).
    pub fn min_len(mut self, n: usize) -> Self {
        self.min_len = Some(n);
        self
    }

    /// Maximum length (characters for text, bytes for files).
    pub fn max_len(mut self, n: usize) -> Self {
        self.max_len = Some(n);
        self
    }

    /// Inclusive lower bound for integers.
    pub fn min(mut self, n: i64) -> Self {
        self.min = Some(n);
        self
    }

    /// Inclusive upper bound for integers.
    pub fn max(mut self, n: i64) -> Self {
        self.max = Some(n);
        self
    }

    /// Text must match `pattern`.
    pub fn pattern(mut self, pattern: Regex) -> Self {
        self.pattern = Some(pattern);
        self
    }

    /// The coercion target.
    pub fn kind(&self) -> FieldKind {
        self.kind
    }

    /// Whether the field must be present.
    pub fn is_required(&self) -> bool {
        self.required
    }
}

/// The declared field contract of an action.
///
/// Fields are checked in declaration order, which is also the order issues
/// are reported in. Undeclared fields are dropped from the validated input.
///
/// # Example
///
/// ```rust
/// use formwire::validate::{FieldRule, InputShape};
///
/// let shape = InputShape::new()
///     .field("title", FieldRule::text().trim().min_len(3).max_len(200))
///     .field("done", FieldRule::boolean());
///
/// assert_eq!(shape.fields().count(), 2);
/// ```
#[derive(Debug, Clone, Default)]
pub struct InputShape {
    fields: Vec<(String, FieldRule)>,
}

impl InputShape {
    /// Creates an empty shape that accepts anything and yields an empty input.
    pub fn new() -> Self {
        Self::default()
    }

    /// Declares a field. Redeclaring a name replaces the earlier rule.
    pub fn field(mut self, name: impl Into<String>, rule: FieldRule) -> Self {
        let name = name.into();
        match self.fields.iter_mut().find(|(n, _)| *n == name) {
            Some(slot) => slot.1 = rule,
            None => self.fields.push((name, rule)),
        }
        self
    }

    /// Iterates over declared fields in declaration order.
    pub fn fields(&self) -> impl Iterator<Item = (&str, &FieldRule)> {
        self.fields.iter().map(|(n, r)| (n.as_str(), r))
    }

    /// Looks up the rule for a field.
    pub fn rule(&self, name: &str) -> Option<&FieldRule> {
        self.fields.iter().find(|(n, _)| n == name).map(|(_, r)| r)
    }
}
