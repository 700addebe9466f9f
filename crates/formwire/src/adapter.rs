// Copyright 2019-2026 Maravilla Labs, operated by SOLUTAS GmbH, Switzerland
// SPDX-License-Identifier: Apache-2.0
// SPDX-License-Identifier: MIT

//! Submission adapters: from an inbound request to an action identifier plus
//! fields.
//!
//! Two front-ends share one executor:
//!
//! - [`NativeFormAdapter`] handles what a browser sends without script
//!   (`application/x-www-form-urlencoded` and `multipart/form-data`)
//! - [`StructuredCallAdapter`] handles programmatic JSON calls

use serde::Serialize;
use serde_json::Value as JsonValue;

use crate::actions::{ActionId, ACTION_ID_FIELD, ACTION_ID_FIELD_PREFIX, RESERVED_FIELD_PREFIX};
use crate::body::{parse_form_urlencoded, parse_json, parse_multipart};
use crate::error::{FormwireError, Result};
use crate::fields::{FieldValue, FormFields};
use crate::request::FormRequest;

/// Header a script sets on a progressively enhanced form post.
pub const ENHANCED_HEADER: &str = "x-formwire-enhanced";

/// Whether the submitting client runs script.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SubmissionMode {
    /// A plain browser form post.
    Native,
    /// A scripted submission that expects a machine-readable answer.
    Enhanced,
}

/// A parsed submission, ready to resolve and invoke.
#[derive(Debug, Clone, PartialEq)]
pub struct InboundInvocation {
    /// The requested action.
    pub action_id: ActionId,
    /// Submitted fields with reserved entries removed.
    pub fields: FormFields,
    /// How the client submitted.
    pub mode: SubmissionMode,
}

/// A front-end that understands one family of request encodings.
pub trait SubmissionAdapter: Send + Sync {
    /// Name used in logs.
    fn name(&self) -> &'static str;

    /// Returns true if this adapter understands the request's encoding.
    fn accepts(&self, request: &FormRequest) -> bool;

    /// Extracts the identifier and fields.
    fn parse(&self, request: &FormRequest) -> Result<InboundInvocation>;
}

/// Adapter for native HTML form posts.
///
/// The identifier may arrive as the *name* of a hidden field
/// (`$ACTION_ID_<id>`), as the *value* of a `$ACTION_ID` field, or as a
/// `?/<id>` query key. Fields starting with `$ACTION_` are dropped; everything
/// else is kept in order, duplicates and files included.
#[derive(Debug, Clone, Copy, Default)]
pub struct NativeFormAdapter;

impl SubmissionAdapter for NativeFormAdapter {
    fn name(&self) -> &'static str {
        "native"
    }

    fn accepts(&self, request: &FormRequest) -> bool {
        matches!(
            request.media_type().as_deref(),
            Some("application/x-www-form-urlencoded") | Some("multipart/form-data")
        )
    }

    fn parse(&self, request: &FormRequest) -> Result<InboundInvocation> {
        let mut fields = if request.media_type().as_deref() == Some("multipart/form-data") {
            parse_multipart(request.body_bytes(), request.content_type().unwrap_or_default())?
        } else {
            parse_form_urlencoded(request.body_bytes())
        };

        let mut candidates = Vec::new();
        for (name, value) in fields.iter() {
            if let Some(id) = name.strip_prefix(ACTION_ID_FIELD_PREFIX) {
                candidates.push(id.to_string());
            } else if name == ACTION_ID_FIELD {
                match value.as_text() {
                    Some(id) => candidates.push(id.trim().to_string()),
                    None => {
                        return Err(FormwireError::MalformedRequest(format!(
                            "{} must be a text field",
                            ACTION_ID_FIELD
                        )))
                    }
                }
            }
        }
        candidates.extend(request.action_query_ids().into_iter().map(str::to_string));

        let action_id = single_identifier(candidates)?;
        strip_reserved(&mut fields);

        let mode = if is_enhanced(request) {
            SubmissionMode::Enhanced
        } else {
            SubmissionMode::Native
        };

        Ok(InboundInvocation {
            action_id,
            fields,
            mode,
        })
    }
}

/// Adapter for programmatic JSON calls.
///
/// Body: `{"action": "<id>", "fields": {...}}` where field values are
/// strings, numbers, booleans, or arrays of those; or
/// `{"action": "<id>", "fields": [["name", "value"], ...]}` to control order.
#[derive(Debug, Clone, Copy, Default)]
pub struct StructuredCallAdapter;

impl SubmissionAdapter for StructuredCallAdapter {
    fn name(&self) -> &'static str {
        "structured"
    }

    fn accepts(&self, request: &FormRequest) -> bool {
        request.is_json()
    }

    fn parse(&self, request: &FormRequest) -> Result<InboundInvocation> {
        let body = parse_json(request.body_bytes())?;
        let JsonValue::Object(mut body) = body else {
            return Err(malformed("call body must be a JSON object"));
        };

        let action = match body.remove("action") {
            Some(JsonValue::String(id)) => single_identifier(vec![id.trim().to_string()])?,
            Some(_) => return Err(malformed("\"action\" must be a string")),
            None => return Err(malformed("missing \"action\"")),
        };

        let mut fields = FormFields::new();
        match body.remove("fields") {
            None | Some(JsonValue::Null) => {}
            Some(JsonValue::Object(map)) => {
                for (name, value) in map {
                    match value {
                        JsonValue::Array(items) => {
                            for item in items {
                                fields.push(name.clone(), scalar_text(&name, item)?);
                            }
                        }
                        value => {
                            let text = scalar_text(&name, value)?;
                            fields.push(name, text);
                        }
                    }
                }
            }
            Some(JsonValue::Array(pairs)) => {
                for pair in pairs {
                    let (name, value) = match pair {
                        JsonValue::Array(mut pair) if pair.len() == 2 => {
                            let value = pair.remove(1);
                            match pair.remove(0) {
                                JsonValue::String(name) => (name, value),
                                _ => return Err(malformed("field names must be strings")),
                            }
                        }
                        _ => return Err(malformed("field pairs must be [name, value]")),
                    };
                    let text = scalar_text(&name, value)?;
                    fields.push(name, text);
                }
            }
            Some(_) => return Err(malformed("\"fields\" must be an object or a list of pairs")),
        }
        strip_reserved(&mut fields);

        Ok(InboundInvocation {
            action_id: action,
            fields,
            mode: SubmissionMode::Enhanced,
        })
    }
}

/// Returns true if a script marked the post as enhanced.
pub fn is_enhanced(request: &FormRequest) -> bool {
    matches!(request.header(ENHANCED_HEADER), Some("1") | Some("true"))
}

fn single_identifier(candidates: Vec<String>) -> Result<ActionId> {
    let mut distinct: Vec<String> = Vec::new();
    for candidate in candidates {
        if candidate.is_empty() {
            return Err(malformed("empty action identifier"));
        }
        if !distinct.contains(&candidate) {
            distinct.push(candidate);
        }
    }
    match distinct.len() {
        0 => Err(malformed("missing action identifier")),
        1 => {
            let id = ActionId::from(distinct.remove(0));
            if id.is_well_formed() {
                Ok(id)
            } else {
                Err(FormwireError::MalformedRequest(format!("{:?} is not an action identifier", id.as_str())))
            }
        }
        n => Err(FormwireError::MalformedRequest(format!(
            "{} different action identifiers in one submission",
            n
        ))),
    }
}

fn strip_reserved(fields: &mut FormFields) {
    fields.retain(|name, _| !name.starts_with(RESERVED_FIELD_PREFIX));
}

fn scalar_text(name: &str, value: JsonValue) -> Result<FieldValue> {
    match value {
        JsonValue::String(s) => Ok(FieldValue::Text(s)),
        JsonValue::Number(n) => Ok(FieldValue::Text(n.to_string())),
        JsonValue::Bool(b) => Ok(FieldValue::Text(if b { "on".into() } else { String::new() })),
        _ => Err(FormwireError::MalformedRequest(format!(
            "field {:?} must be a string, number or boolean",
            name
        ))),
    }
}

fn malformed(message: &str) -> FormwireError {
    FormwireError::MalformedRequest(message.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fields::FileField;

    const ID: &str = "0123456789abcdef01234567";

    fn form_post(body: &str) -> FormRequest {
        FormRequest::new("/", "POST")
            .with_header("Content-Type", "application/x-www-form-urlencoded")
            .with_body(body.as_bytes().to_vec())
    }

    fn json_call(body: &str) -> FormRequest {
        FormRequest::new("/_formwire/call", "POST")
            .with_header("Content-Type", "application/json")
            .with_body(body.as_bytes().to_vec())
    }

    #[test]
    fn test_hidden_field_name_carries_identifier() {
        let body = format!("%24ACTION_ID_{}=&title=Buy+milk", ID);
        let inbound = NativeFormAdapter.parse(&form_post(&body)).unwrap();

        assert_eq!(inbound.action_id.as_str(), ID);
        assert_eq!(inbound.mode, SubmissionMode::Native);
        assert_eq!(inbound.fields, FormFields::new().with("title", "Buy milk"));
    }

    #[test]
    fn test_field_value_carries_identifier() {
        let body = format!("%24ACTION_ID={}&%24ACTION_KEY=x&title=a", ID);
        let inbound = NativeFormAdapter.parse(&form_post(&body)).unwrap();

        assert_eq!(inbound.action_id.as_str(), ID);
        assert_eq!(inbound.fields.len(), 1);
    }

    #[test]
    fn test_query_carries_identifier() {
        let request = form_post("title=a").with_query_string(&format!("/{}", ID));
        let inbound = NativeFormAdapter.parse(&request).unwrap();
        assert_eq!(inbound.action_id.as_str(), ID);
    }

    #[test]
    fn test_same_identifier_twice_is_fine() {
        let body = format!("%24ACTION_ID_{}=&title=a", ID);
        let request = form_post(&body).with_query_string(&format!("/{}", ID));
        assert!(NativeFormAdapter.parse(&request).is_ok());
    }

    #[test]
    fn test_two_query_identifiers_are_malformed() {
        let query = format!("/{}&/{}", "a".repeat(24), "b".repeat(24));
        let request = form_post("title=x").with_query_string(&query);
        let err = NativeFormAdapter.parse(&request).unwrap_err();
        assert!(matches!(err, FormwireError::MalformedRequest(_)));
    }

    #[test]
    fn test_query_conflicting_with_hidden_field_is_malformed() {
        let body = format!("%24ACTION_ID_{}=&title=x", ID);
        let request = form_post(&body).with_query_string(&format!("/{}", "f".repeat(24)));
        let err = NativeFormAdapter.parse(&request).unwrap_err();
        assert!(matches!(err, FormwireError::MalformedRequest(_)));
    }

    #[test]
    fn test_garbage_identifier_is_malformed() {
        let err = NativeFormAdapter.parse(&form_post("%24ACTION_ID=..%2Fetc&title=x")).unwrap_err();
        assert!(matches!(err, FormwireError::MalformedRequest(_)));

        let err = StructuredCallAdapter
            .parse(&json_call(r#"{"action": "DROP TABLE", "fields": {}}"#))
            .unwrap_err();
        assert!(matches!(err, FormwireError::MalformedRequest(_)));
    }

    #[test]
    fn test_missing_identifier_is_malformed() {
        let err = NativeFormAdapter.parse(&form_post("title=Buy+milk")).unwrap_err();
        assert!(matches!(err, FormwireError::MalformedRequest(_)));
    }

    #[test]
    fn test_conflicting_identifiers_are_malformed() {
        let body = format!("%24ACTION_ID_{}=&%24ACTION_ID=ffffffffffffffffffffffff", ID);
        let err = NativeFormAdapter.parse(&form_post(&body)).unwrap_err();
        assert!(matches!(err, FormwireError::MalformedRequest(_)));
    }

    #[test]
    fn test_duplicates_and_order_preserved() {
        let body = format!("tag=b&%24ACTION_ID_{}=&tag=a&title=x", ID);
        let inbound = NativeFormAdapter.parse(&form_post(&body)).unwrap();
        let names: Vec<_> = inbound.fields.iter().map(|(n, v)| (n, v.as_text().unwrap())).collect();
        assert_eq!(names, vec![("tag", "b"), ("tag", "a"), ("title", "x")]);
    }

    #[test]
    fn test_multipart_keeps_files() {
        let body = format!(
            "--XyZ\r\n\
             Content-Disposition: form-data; name=\"$ACTION_ID_{}\"\r\n\r\n\
             \r\n\
             --XyZ\r\n\
             Content-Disposition: form-data; name=\"avatar\"; filename=\"a.png\"\r\n\
             Content-Type: image/png\r\n\r\n\
             \x01\x02\r\n\
             --XyZ--\r\n",
            ID
        );
        let request = FormRequest::new("/", "POST")
            .with_header("Content-Type", "multipart/form-data; boundary=XyZ")
            .with_body(body.into_bytes());
        let inbound = NativeFormAdapter.parse(&request).unwrap();

        assert_eq!(inbound.action_id.as_str(), ID);
        assert_eq!(
            inbound.fields.get("avatar").and_then(FieldValue::as_file),
            Some(&FileField::new("a.png", Some("image/png".into()), vec![1, 2]))
        );
    }

    #[test]
    fn test_enhanced_header() {
        let body = format!("%24ACTION_ID_{}=", ID);
        let request = form_post(&body).with_header(ENHANCED_HEADER, "1");
        assert_eq!(NativeFormAdapter.parse(&request).unwrap().mode, SubmissionMode::Enhanced);
    }

    #[test]
    fn test_accepts() {
        assert!(NativeFormAdapter.accepts(&form_post("")));
        let upper = FormRequest::new("/", "POST").with_header("Content-Type", "Multipart/Form-Data; boundary=x");
        assert!(NativeFormAdapter.accepts(&upper));
        let upper = FormRequest::new("/", "POST").with_header("Content-Type", "Application/JSON");
        assert!(StructuredCallAdapter.accepts(&upper));
        assert!(!NativeFormAdapter.accepts(&json_call("{}")));
        assert!(StructuredCallAdapter.accepts(&json_call("{}")));
        assert!(!StructuredCallAdapter.accepts(&FormRequest::new("/", "POST")));
    }

    #[test]
    fn test_structured_object_fields() {
        let body = format!(r#"{{"action": "{}", "fields": {{"title": "Buy milk", "id": 7, "done": true, "tags": ["a", "b"]}}}}"#, ID);
        let inbound = StructuredCallAdapter.parse(&json_call(&body)).unwrap();

        assert_eq!(inbound.mode, SubmissionMode::Enhanced);
        assert_eq!(inbound.fields.text("title"), Some("Buy milk"));
        assert_eq!(inbound.fields.text("id"), Some("7"));
        assert_eq!(inbound.fields.text("done"), Some("on"));
        assert_eq!(inbound.fields.get_all("tags").count(), 2);
    }

    #[test]
    fn test_structured_pair_fields() {
        let body = format!(r#"{{"action": "{}", "fields": [["b", "1"], ["a", "2"], ["b", "3"]]}}"#, ID);
        let inbound = StructuredCallAdapter.parse(&json_call(&body)).unwrap();
        let pairs: Vec<_> = inbound.fields.iter().map(|(n, v)| (n, v.as_text().unwrap())).collect();
        assert_eq!(pairs, vec![("b", "1"), ("a", "2"), ("b", "3")]);
    }

    #[test]
    fn test_structured_errors() {
        for body in [
            "not json",
            "[]",
            r#"{"fields": {}}"#,
            r#"{"action": ""}"#,
            r#"{"action": "x", "fields": {"a": {"nested": 1}}}"#,
            r#"{"action": "x", "fields": [["a"]]}"#,
        ] {
            let err = StructuredCallAdapter.parse(&json_call(body)).unwrap_err();
            assert!(err.is_client_error(), "{} -> {:?}", body, err);
        }
    }
}
