//! Parameter marshalling: turning an arbitrary payload into either a JSON
//! body or a set of query-string pairs, depending on HTTP method class.

use serde::Serialize;
use serde_json::Value;

use crate::error::SenderError;

/// The payload passed to [`crate::Sender::send`].
///
/// Rust has no ambient reflection, so unlike a dynamically-typed host
/// language this is a closed enum rather than an arbitrary object: a
/// mapping, a serializable record (converted to [`Value`] once, up front),
/// or nothing at all.
#[derive(Debug, Clone)]
pub enum Params {
    /// No payload: an empty body for body-bearing methods, no query pairs
    /// for non-body methods.
    None,
    /// A string-keyed mapping of JSON values.
    Map(serde_json::Map<String, Value>),
    /// An arbitrary serializable record, already converted to a JSON value.
    Struct(Value),
}

impl Params {
    /// Builds a [`Params::Struct`] from any `Serialize` value.
    ///
    /// # Errors
    ///
    /// Returns [`SenderError::MarshalParams`] if `value` cannot be
    /// serialized to JSON at all (not to be confused with the query-mode
    /// shape restriction enforced later, in [`Self::to_query_pairs`]).
    pub fn from_struct<T: Serialize>(value: &T) -> Result<Self, SenderError> {
        serde_json::to_value(value)
            .map(Self::Struct)
            .map_err(|e| SenderError::MarshalParams(e.to_string()))
    }

    /// True for [`Params::None`].
    #[must_use]
    pub const fn is_none(&self) -> bool {
        matches!(self, Self::None)
    }

    /// Renders this payload as the canonical JSON encoding used for
    /// body-bearing methods. `None` renders as an empty byte string (the
    /// caller is responsible for sending that as an empty body rather than
    /// literal empty JSON).
    pub fn to_json_bytes(&self) -> Result<Vec<u8>, SenderError> {
        match self {
            Self::None => Ok(Vec::new()),
            Self::Map(map) => {
                serde_json::to_vec(map).map_err(|e| SenderError::MarshalParams(e.to_string()))
            }
            Self::Struct(value) => {
                serde_json::to_vec(value).map_err(|e| SenderError::MarshalParams(e.to_string()))
            }
        }
    }

    /// Renders this payload as query-string pairs for non-body methods.
    ///
    /// Only mappings and records whose members are scalars are supported;
    /// nested objects/arrays are a caller error (`MarshalParams`) rather
    /// than silently flattened. See `DESIGN.md` for why this crate picked
    /// rejection over a best-effort flatten.
    pub fn to_query_pairs(&self) -> Result<Vec<(String, String)>, SenderError> {
        match self {
            Self::None => Ok(Vec::new()),
            Self::Map(map) => map_to_pairs(map),
            Self::Struct(Value::Object(map)) => map_to_pairs(map),
            Self::Struct(_) => Err(SenderError::MarshalParams(
                "query-string params must be a mapping or record of scalar fields".to_string(),
            )),
        }
    }

    /// A `serde_json::Value` view of this payload, for the logger
    /// decorator's field masking. `None` has no value to mask.
    #[must_use]
    pub fn as_value(&self) -> Option<Value> {
        match self {
            Self::None => None,
            Self::Map(map) => Some(Value::Object(map.clone())),
            Self::Struct(value) => Some(value.clone()),
        }
    }
}

fn map_to_pairs(map: &serde_json::Map<String, Value>) -> Result<Vec<(String, String)>, SenderError> {
    let mut pairs = Vec::with_capacity(map.len());
    for (key, value) in map {
        if let Some(rendered) = scalar_to_string(value)? {
            pairs.push((key.clone(), rendered));
        }
    }
    Ok(pairs)
}

/// Converts a scalar JSON value to its query-string textual form.
/// `Null` is skipped entirely (returns `Ok(None)`); arrays/objects are an
/// error since query mode only supports scalar fields.
fn scalar_to_string(value: &Value) -> Result<Option<String>, SenderError> {
    match value {
        Value::Null => Ok(None),
        Value::Bool(b) => Ok(Some(b.to_string())),
        Value::Number(n) => Ok(Some(n.to_string())),
        Value::String(s) => Ok(Some(s.clone())),
        Value::Array(_) | Value::Object(_) => Err(SenderError::MarshalParams(
            "nested values are not supported in query-string mode".to_string(),
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Serialize;
    use serde_json::json;

    fn map(pairs: &[(&str, Value)]) -> Params {
        let mut m = serde_json::Map::new();
        for (k, v) in pairs {
            m.insert((*k).to_string(), v.clone());
        }
        Params::Map(m)
    }

    #[test]
    fn none_renders_empty_body_and_no_pairs() {
        assert_eq!(Params::None.to_json_bytes().unwrap(), Vec::<u8>::new());
        assert_eq!(Params::None.to_query_pairs().unwrap(), Vec::new());
    }

    #[test]
    fn map_renders_canonical_json() {
        let p = map(&[("event", json!("user.created"))]);
        assert_eq!(p.to_json_bytes().unwrap(), br#"{"event":"user.created"}"#);
    }

    #[test]
    fn map_renders_query_pairs_with_scalars() {
        let p = map(&[("term", json!("golang")), ("limit", json!(10))]);
        let mut pairs = p.to_query_pairs().unwrap();
        pairs.sort();
        assert_eq!(
            pairs,
            vec![
                ("limit".to_string(), "10".to_string()),
                ("term".to_string(), "golang".to_string()),
            ]
        );
    }

    #[test]
    fn null_field_contributes_no_pair() {
        let p = map(&[("a", json!(1)), ("b", Value::Null)]);
        let pairs = p.to_query_pairs().unwrap();
        assert_eq!(pairs, vec![("a".to_string(), "1".to_string())]);
    }

    #[test]
    fn nested_object_in_query_mode_is_an_error() {
        let p = map(&[("a", json!({"nested": true}))]);
        assert!(matches!(
            p.to_query_pairs(),
            Err(SenderError::MarshalParams(_))
        ));
    }

    #[test]
    fn nested_array_in_query_mode_is_an_error() {
        let p = map(&[("a", json!([1, 2, 3]))]);
        assert!(matches!(
            p.to_query_pairs(),
            Err(SenderError::MarshalParams(_))
        ));
    }

    #[derive(Serialize)]
    struct Record {
        #[serde(rename = "api_key")]
        key: String,
        count: u32,
    }

    #[test]
    fn struct_uses_serde_rename_for_field_names() {
        let p = Params::from_struct(&Record {
            key: "abc".to_string(),
            count: 3,
        })
        .unwrap();
        let mut pairs = p.to_query_pairs().unwrap();
        pairs.sort();
        assert_eq!(
            pairs,
            vec![
                ("api_key".to_string(), "abc".to_string()),
                ("count".to_string(), "3".to_string()),
            ]
        );
    }

    #[test]
    fn struct_scalar_top_level_is_rejected_for_query_mode() {
        let p = Params::from_struct(&"just a string").unwrap();
        assert!(matches!(
            p.to_query_pairs(),
            Err(SenderError::MarshalParams(_))
        ));
    }
}
