// Copyright 2019-2026 Maravilla Labs, operated by SOLUTAS GmbH, Switzerland
// SPDX-License-Identifier: Apache-2.0
// SPDX-License-Identifier: MIT

//! Input validation.
//!
//! The executor only talks to the [`Validator`] trait. [`SchemaValidator`] is
//! the built-in implementation that checks submitted fields against an
//! [`InputShape`]; applications can plug in their own.

mod shape;

pub use shape::{FieldKind, FieldRule, InputShape};

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value as JsonValue};

use crate::fields::{FieldValue, FileField, FormFields};

/// Machine-readable classification of an [`Issue`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IssueCode {
    /// A required field was not submitted.
    Required,
    /// The value could not be coerced to the declared kind.
    InvalidType,
    /// Below a minimum length or bound.
    TooSmall,
    /// Above a maximum length or bound.
    TooBig,
    /// Text did not match the declared pattern.
    InvalidString,
    /// Raised by a handler rather than the validator.
    Custom,
}

/// A single user-correctable problem with the submitted input.
///
/// Issues are the only failure payload that reaches the client verbatim.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Issue {
    /// The field the issue refers to (`title`, or `tags.1` for list items).
    pub path: String,
    /// Issue classification.
    pub code: IssueCode,
    /// Human-readable message.
    pub message: String,
}

impl Issue {
    /// Creates an issue.
    pub fn new(path: impl Into<String>, code: IssueCode, message: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            code,
            message: message.into(),
        }
    }

    /// Creates a handler-raised issue.
    pub fn custom(path: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(path, IssueCode::Custom, message)
    }
}

/// Input that passed validation, coerced to the declared kinds.
#[derive(Debug, Clone, Default)]
pub struct ValidatedInput {
    values: Map<String, JsonValue>,
    files: Vec<(String, FileField)>,
}

impl ValidatedInput {
    /// Builds an input directly from JSON values (useful for custom validators).
    pub fn from_values(values: Map<String, JsonValue>) -> Self {
        Self {
            values,
            files: Vec::new(),
        }
    }

    /// Returns the coerced value of a field.
    pub fn get(&self, name: &str) -> Option<&JsonValue> {
        self.values.get(name)
    }

    /// Returns a text field.
    pub fn str(&self, name: &str) -> Option<&str> {
        self.get(name).and_then(JsonValue::as_str)
    }

    /// Returns an integer field.
    pub fn i64(&self, name: &str) -> Option<i64> {
        self.get(name).and_then(JsonValue::as_i64)
    }

    /// Returns a boolean field.
    pub fn bool(&self, name: &str) -> Option<bool> {
        self.get(name).and_then(JsonValue::as_bool)
    }

    /// Returns the first uploaded file for a field.
    pub fn file(&self, name: &str) -> Option<&FileField> {
        self.files.iter().find(|(n, _)| n == name).map(|(_, f)| f)
    }

    /// Returns every uploaded file for a field.
    pub fn files<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a FileField> + 'a {
        self.files
            .iter()
            .filter(move |(n, _)| n == name)
            .map(|(_, f)| f)
    }

    /// The coerced values as a JSON object (files appear as metadata).
    pub fn values(&self) -> &Map<String, JsonValue> {
        &self.values
    }

    /// Deserializes the coerced values into a typed struct.
    pub fn deserialize<T: DeserializeOwned>(&self) -> Result<T, serde_json::Error> {
        serde_json::from_value(JsonValue::Object(self.values.clone()))
    }
}

/// Pluggable input validator.
pub trait Validator: Send + Sync {
    /// Checks `fields` against `shape`.
    ///
    /// On rejection, returns every issue found, in a stable order.
    fn validate(&self, shape: &InputShape, fields: &FormFields) -> Result<ValidatedInput, Vec<Issue>>;
}

/// The built-in shape validator.
///
/// Every declared field is checked and all issues are reported, not just the
/// first one. Optional text, integer and file fields submitted empty are
/// treated as absent, since browsers submit untouched inputs as `""`.
#[derive(Debug, Clone, Copy, Default)]
pub struct SchemaValidator;

impl Validator for SchemaValidator {
    fn validate(&self, shape: &InputShape, fields: &FormFields) -> Result<ValidatedInput, Vec<Issue>> {
        let mut issues = Vec::new();
        let mut input = ValidatedInput::default();

        for (name, rule) in shape.fields() {
            let values: Vec<&FieldValue> = fields
                .get_all(name)
                .filter(|v| rule.required || rule.kind == FieldKind::Boolean || !is_blank(v, rule))
                .collect();

            if values.is_empty() {
                match (rule.kind, rule.multiple) {
                    (_, true) if !rule.required => {
                        input.values.insert(name.to_string(), JsonValue::Array(Vec::new()));
                    }
                    (FieldKind::Boolean, false) => {
                        input.values.insert(name.to_string(), JsonValue::Bool(false));
                    }
                    _ if rule.required => {
                        issues.push(Issue::new(name, IssueCode::Required, "Required"));
                    }
                    _ => {}
                }
                continue;
            }

            if rule.multiple {
                let mut list = Vec::with_capacity(values.len());
                for (i, value) in values.iter().enumerate() {
                    let path = format!("{}.{}", name, i);
                    if let Some(v) = check_value(&path, name, rule, value, &mut issues, &mut input.files) {
                        list.push(v);
                    }
                }
                input.values.insert(name.to_string(), JsonValue::Array(list));
            } else if let Some(v) = check_value(name, name, rule, values[0], &mut issues, &mut input.files) {
                input.values.insert(name.to_string(), v);
            }
        }

        if issues.is_empty() {
            Ok(input)
        } else {
            Err(issues)
        }
    }
}

fn is_blank(value: &FieldValue, rule: &FieldRule) -> bool {
    match value {
        FieldValue::Text(s) => s.trim().is_empty(),
        FieldValue::File(f) => rule.kind == FieldKind::File && f.filename.is_empty() && f.bytes.is_empty(),
    }
}

fn check_value(
    path: &str,
    name: &str,
    rule: &FieldRule,
    value: &FieldValue,
    issues: &mut Vec<Issue>,
    files: &mut Vec<(String, FileField)>,
) -> Option<JsonValue> {
    let before = issues.len();

    let coerced = match rule.kind {
        FieldKind::Text => {
            let Some(raw) = value.as_text() else {
                issues.push(Issue::new(path, IssueCode::InvalidType, "Expected text, received file"));
                return None;
            };
            let text = if rule.trim { raw.trim() } else { raw };
            let len = text.chars().count();

            if let Some(min) = rule.min_len.filter(|min| len < *min) {
                issues.push(Issue::new(
                    path,
                    IssueCode::TooSmall,
                    format!("String must contain at least {} character(s)", min),
                ));
            }
            if let Some(max) = rule.max_len.filter(|max| len > *max) {
                issues.push(Issue::new(
                    path,
                    IssueCode::TooBig,
                    format!("String must contain at most {} character(s)", max),
                ));
            }
            if let Some(pattern) = rule.pattern.as_ref().filter(|p| !p.is_match(text)) {
                issues.push(Issue::new(
                    path,
                    IssueCode::InvalidString,
                    format!("Invalid format (expected to match {})", pattern.as_str()),
                ));
            }
            JsonValue::String(text.to_string())
        }

        FieldKind::Integer => {
            let Some(raw) = value.as_text() else {
                issues.push(Issue::new(path, IssueCode::InvalidType, "Expected integer, received file"));
                return None;
            };
            let Ok(n) = raw.trim().parse::<i64>() else {
                issues.push(Issue::new(
                    path,
                    IssueCode::InvalidType,
                    format!("Expected integer, received \"{}\"", raw),
                ));
                return None;
            };

            if let Some(min) = rule.min.filter(|min| n < *min) {
                issues.push(Issue::new(
                    path,
                    IssueCode::TooSmall,
                    format!("Number must be greater than or equal to {}", min),
                ));
            }
            if let Some(max) = rule.max.filter(|max| n > *max) {
                issues.push(Issue::new(
                    path,
                    IssueCode::TooBig,
                    format!("Number must be less than or equal to {}", max),
                ));
            }
            JsonValue::from(n)
        }

        FieldKind::Boolean => match value.as_text().map(|s| s.trim().to_ascii_lowercase()) {
            Some(s) if matches!(s.as_str(), "on" | "true" | "1" | "yes") => JsonValue::Bool(true),
            Some(s) if matches!(s.as_str(), "off" | "false" | "0" | "no" | "") => JsonValue::Bool(false),
            _ => {
                issues.push(Issue::new(path, IssueCode::InvalidType, "Expected boolean"));
                return None;
            }
        },

        FieldKind::File => {
            let Some(file) = value.as_file() else {
                issues.push(Issue::new(path, IssueCode::InvalidType, "Expected file, received text"));
                return None;
            };

            if let Some(min) = rule.min_len.filter(|min| file.size() < *min) {
                issues.push(Issue::new(
                    path,
                    IssueCode::TooSmall,
                    format!("File must be at least {} byte(s)", min),
                ));
            }
            if let Some(max) = rule.max_len.filter(|max| file.size() > *max) {
                issues.push(Issue::new(
                    path,
                    IssueCode::TooBig,
                    format!("File must be at most {} byte(s)", max),
                ));
            }
            if issues.len() == before {
                files.push((name.to_string(), file.clone()));
            }
            serde_json::to_value(file).unwrap_or(JsonValue::Null)
        }
    };

    (issues.len() == before).then_some(coerced)
}
