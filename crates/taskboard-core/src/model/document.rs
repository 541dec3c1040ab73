//! Task document decoding.
//!
//! The canonical shape is `{ "tasks": [...] }`. Older sources publish the
//! task array at the top level; both decode to the same list.

use serde_json::Value;

use crate::error::ErrorCode;
use crate::model::Task;

/// Errors raised while decoding a task document.
#[derive(Debug, thiserror::Error)]
pub enum DocumentError {
    /// The payload is not valid JSON.
    #[error("task document is not valid JSON: {0}")]
    Json(#[source] serde_json::Error),

    /// The top-level value is neither an object nor an array.
    #[error("task document must be an object or an array, found {found}")]
    UnexpectedShape { found: &'static str },

    /// The task array contains an entry that is not a task.
    #[error("task list contains an invalid entry: {0}")]
    InvalidTask(#[source] serde_json::Error),
}

impl DocumentError {
    #[must_use]
    pub const fn code(&self) -> ErrorCode {
        match self {
            Self::Json(_) | Self::UnexpectedShape { .. } | Self::InvalidTask(_) => {
                ErrorCode::MalformedDocument
            }
        }
    }
}

/// Decode raw bytes into the task list.
///
/// # Errors
///
/// Returns [`DocumentError`] if the bytes are not JSON or the JSON does not
/// have a supported shape.
pub fn parse_document(bytes: &[u8]) -> Result<Vec<Task>, DocumentError> {
    let value: Value = serde_json::from_slice(bytes).map_err(DocumentError::Json)?;
    tasks_from_value(value)
}

/// Extract the task list from an already-parsed document.
///
/// An object without `tasks` (or with `"tasks": null`) is an empty board.
///
/// # Errors
///
/// Returns [`DocumentError`] for unsupported top-level shapes or invalid
/// task entries.
pub fn tasks_from_value(value: Value) -> Result<Vec<Task>, DocumentError> {
    let list = match value {
        list @ Value::Array(_) => list,
        Value::Object(mut map) => match map.remove("tasks") {
            None | Some(Value::Null) => return Ok(Vec::new()),
            Some(tasks) => tasks,
        },
        other => {
            return Err(DocumentError::UnexpectedShape {
                found: json_type_name(&other),
            });
        }
    };

    serde_json::from_value(list).map_err(DocumentError::InvalidTask)
}

const fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bare_array_matches_wrapped_form() {
        let bare = parse_document(r#"[{"title":"A","day":"یکشنبه"}]"#.as_bytes())
            .expect("bare array parses");
        let wrapped = parse_document(r#"{"tasks":[{"title":"A","day":"یکشنبه"}]}"#.as_bytes())
            .expect("wrapped form parses");
        assert_eq!(bare, wrapped);
        assert_eq!(bare.len(), 1);
        assert_eq!(bare[0].title, "A");
    }

    #[test]
    fn missing_or_null_tasks_is_empty() {
        assert!(parse_document(b"{}").expect("empty object").is_empty());
        assert!(
            parse_document(br#"{"tasks":null,"updated":"x"}"#)
                .expect("null tasks")
                .is_empty()
        );
    }

    #[test]
    fn scalar_top_level_is_rejected() {
        let err = parse_document(b"42").expect_err("number is not a document");
        assert!(matches!(err, DocumentError::UnexpectedShape { found: "number" }));
        assert_eq!(err.code(), ErrorCode::MalformedDocument);
    }

    #[test]
    fn invalid_json_is_rejected() {
        let err = parse_document(b"{tasks:").expect_err("broken JSON");
        assert!(matches!(err, DocumentError::Json(_)));
    }

    #[test]
    fn non_array_tasks_field_is_rejected() {
        let err = parse_document(br#"{"tasks":"nope"}"#).expect_err("tasks must be an array");
        assert!(matches!(err, DocumentError::InvalidTask(_)));
    }

    #[test]
    fn unknown_fields_are_ignored() {
        let tasks = parse_document(br#"{"tasks":[{"title":"A","room":"204"}],"v":2}"#)
            .expect("extra fields are fine");
        assert_eq!(tasks[0].title, "A");
    }
}
