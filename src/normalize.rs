//! Normalization of raw upstream articles into display-ready records.
//!
//! Upstream articles are loosely shaped: any field may be missing, `null`,
//! empty or padded with whitespace, and the nested `source` object may be
//! missing entirely. [`normalize`] resolves each of the six display fields
//! independently against its own fallback from [`Field::default_value`].
//!
//! A record is only rejected when it is structurally unusable (not an object,
//! a field holding a non-string value, or a `source` that is not an object).
//! The fetcher skips rejected records without affecting the rest of the batch.

use crate::models::{Field, NormalizedRecord};
use serde_json::{Map, Value};
use thiserror::Error;

/// Why a raw article could not be normalized.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum NormalizeError {
    #[error("article is not a JSON object (found {0})")]
    NotAnObject(&'static str),
    #[error("field `{field}` holds a {found}, expected a string")]
    NotAString { field: &'static str, found: &'static str },
    #[error("`source` holds a {0}, expected an object")]
    SourceNotAnObject(&'static str),
}

/// Resolve one upstream value against its fallback.
///
/// Absent and `null` values resolve to `default`, as do empty and
/// whitespace-only strings. Other strings are returned trimmed. Any other
/// JSON type is passed back unchanged as the error.
pub fn resolve<'a>(value: Option<&'a Value>, default: &str) -> Result<String, &'a Value> {
    match value {
        None | Some(Value::Null) => Ok(default.to_string()),
        Some(Value::String(s)) => {
            let trimmed = s.trim();
            if trimmed.is_empty() {
                Ok(default.to_string())
            } else {
                Ok(trimmed.to_string())
            }
        }
        Some(other) => Err(other),
    }
}

/// Normalize one raw upstream article.
pub fn normalize(raw: &Value) -> Result<NormalizedRecord, NormalizeError> {
    let article = raw
        .as_object()
        .ok_or_else(|| NormalizeError::NotAnObject(json_type(raw)))?;
    let source = source_of(article)?;

    let field = |field: Field| {
        let container = match field {
            Field::SourceName => source,
            _ => Some(article),
        };
        let value = container.and_then(|map| map.get(field.key()));
        resolve(value, field.default_value()).map_err(|found| NormalizeError::NotAString {
            field: field.path(),
            found: json_type(found),
        })
    };

    Ok(NormalizedRecord {
        title: field(Field::Title)?,
        description: field(Field::Description)?,
        author: field(Field::Author)?,
        url: field(Field::Url)?,
        url_to_image: field(Field::UrlToImage)?,
        source_name: field(Field::SourceName)?,
    })
}

/// The nested `source` object; absent and `null` are both `None`.
fn source_of(article: &Map<String, Value>) -> Result<Option<&Map<String, Value>>, NormalizeError> {
    match article.get("source") {
        None | Some(Value::Null) => Ok(None),
        Some(Value::Object(map)) => Ok(Some(map)),
        Some(other) => Err(NormalizeError::SourceNotAnObject(json_type(other))),
    }
}

fn json_type(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
