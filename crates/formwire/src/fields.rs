// Copyright 2019-2026 Maravilla Labs, operated by SOLUTAS GmbH, Switzerland
// SPDX-License-Identifier: Apache-2.0
// SPDX-License-Identifier: MIT

//! Submitted form fields.
//!
//! Browsers may send the same field name more than once (checkbox groups,
//! multi-selects) and the order matters to handlers, so fields are kept as an
//! ordered list of `(name, value)` pairs instead of a map.

use serde::ser::SerializeStruct;
use serde::{Serialize, Serializer};

/// An uploaded file from a `multipart/form-data` submission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileField {
    /// The client-supplied file name (may be empty when no file was chosen).
    pub filename: String,
    /// The part's declared content type, if any.
    pub content_type: Option<String>,
    /// Raw file contents.
    pub bytes: Vec<u8>,
}

impl FileField {
    /// Creates a new file value.
    pub fn new(filename: impl Into<String>, content_type: Option<String>, bytes: Vec<u8>) -> Self {
        Self {
            filename: filename.into(),
            content_type,
            bytes,
        }
    }

    /// Size of the file contents in bytes.
    pub fn size(&self) -> usize {
        self.bytes.len()
    }
}

// File contents never leave the server; clients only see the metadata.
impl Serialize for FileField {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut state = serializer.serialize_struct("FileField", 3)?;
        state.serialize_field("filename", &self.filename)?;
        state.serialize_field("content_type", &self.content_type)?;
        state.serialize_field("size", &self.size())?;
        state.end()
    }
}

/// A single submitted value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum FieldValue {
    /// A plain text value.
    Text(String),
    /// An uploaded file.
    File(FileField),
}

impl FieldValue {
    /// Returns the text content, or `None` for files.
    pub fn as_text(&self) -> Option<&str> {
        match self {
            FieldValue::Text(s) => Some(s),
            FieldValue::File(_) => None,
        }
    }

    /// Returns the file, or `None` for text values.
    pub fn as_file(&self) -> Option<&FileField> {
        match self {
            FieldValue::File(f) => Some(f),
            FieldValue::Text(_) => None,
        }
    }
}

impl From<String> for FieldValue {
    fn from(value: String) -> Self {
        FieldValue::Text(value)
    }
}

impl From<&str> for FieldValue {
    fn from(value: &str) -> Self {
        FieldValue::Text(value.to_string())
    }
}

impl From<FileField> for FieldValue {
    fn from(value: FileField) -> Self {
        FieldValue::File(value)
    }
}

/// Ordered, multi-valued form fields.
///
/// # Example
///
/// ```rust
/// use formwire::FormFields;
///
/// let mut fields = FormFields::new();
/// fields.push("tag", "a");
/// fields.push("tag", "b");
/// fields.push("title", "Buy milk");
///
/// assert_eq!(fields.text("title"), Some("Buy milk"));
/// assert_eq!(fields.get_all("tag").count(), 2);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct FormFields {
    entries: Vec<(String, FieldValue)>,
}

impl FormFields {
    /// Creates an empty field set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a value, keeping any existing values with the same name.
    pub fn push(&mut self, name: impl Into<String>, value: impl Into<FieldValue>) {
        self.entries.push((name.into(), value.into()));
    }

    /// Builder-style variant of [`FormFields::push`].
    pub fn with(mut self, name: impl Into<String>, value: impl Into<FieldValue>) -> Self {
        self.push(name, value);
        self
    }

    /// Returns the first value for `name`.
    pub fn get(&self, name: &str) -> Option<&FieldValue> {
        self.entries
            .iter()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v)
    }

    /// Returns every value for `name`, in submission order.
    pub fn get_all<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a FieldValue> + 'a {
        self.entries
            .iter()
            .filter(move |(k, _)| k == name)
            .map(|(_, v)| v)
    }

    /// Returns the first text value for `name`.
    pub fn text(&self, name: &str) -> Option<&str> {
        self.get(name).and_then(FieldValue::as_text)
    }

    /// Returns true if at least one value was submitted for `name`.
    pub fn contains(&self, name: &str) -> bool {
        self.entries.iter().any(|(k, _)| k == name)
    }

    /// Iterates over all `(name, value)` pairs in submission order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &FieldValue)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Keeps only the entries for which `keep` returns true.
    pub fn retain(&mut self, mut keep: impl FnMut(&str, &FieldValue) -> bool) {
        self.entries.retain(|(k, v)| keep(k, v));
    }

    /// Number of submitted values (not distinct names).
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if nothing was submitted.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<K, V> FromIterator<(K, V)> for FormFields
where
    K: Into<String>,
    V: Into<FieldValue>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            entries: iter.into_iter().map(|(k, v)| (k.into(), v.into())).collect(),
        }
    }
}

impl IntoIterator for FormFields {
    type Item = (String, FieldValue);
    type IntoIter = std::vec::IntoIter<(String, FieldValue)>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}
