//! Field-level redaction used by the logger decorator.

use std::collections::HashSet;

use serde_json::Value;

/// Returns a copy of `value` with every top-level object field whose key is
/// in `fields` replaced by its masked rendering. Non-object values and
/// fields outside `fields` are returned unchanged.
///
/// Only object shapes are masked: masking is defined in terms of named
/// fields, which only mappings and records (both of which arrive here as a
/// [`Value::Object`] after [`crate::Params::as_value`]) have.
#[must_use]
pub fn mask_fields(value: &Value, fields: &HashSet<String>) -> Value {
    let Value::Object(map) = value else {
        return value.clone();
    };

    let masked = map
        .iter()
        .map(|(key, field_value)| {
            let rendered = if fields.contains(key) {
                mask_value(field_value)
            } else {
                field_value.clone()
            };
            (key.clone(), rendered)
        })
        .collect();

    Value::Object(masked)
}

/// Masks a single field's value, preserving its rough shape:
/// - strings: first/last character kept, interior replaced with `*`
/// - numbers: the literal `*****`
/// - booleans: unchanged (a masked boolean reveals nothing a 50/50 guess
///   wouldn't already give away, and callers rely on seeing flags like
///   `is_admin` in logs)
/// - anything else (null, array, object): its "empty" rendering
fn mask_value(value: &Value) -> Value {
    match value {
        Value::String(s) => Value::String(mask_string(s)),
        Value::Number(_) => Value::String("*****".to_string()),
        Value::Bool(b) => Value::Bool(*b),
        Value::Array(_) => Value::Array(Vec::new()),
        Value::Object(_) => Value::Object(serde_json::Map::new()),
        Value::Null => Value::Null,
    }
}

fn mask_string(s: &str) -> String {
    let chars: Vec<char> = s.chars().collect();
    match chars.len() {
        0 => String::new(),
        1 | 2 => "**".to_string(),
        len => {
            let first = chars[0];
            let last = chars[len - 1];
            let middle: String = std::iter::repeat('*').take(len - 2).collect();
            format!("{first}{middle}{last}")
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn fields(names: &[&str]) -> HashSet<String> {
        names.iter().map(|s| (*s).to_string()).collect()
    }

    #[test]
    fn empty_string_masks_to_empty() {
        assert_eq!(mask_string(""), "");
    }

    #[test]
    fn short_strings_mask_to_two_stars() {
        assert_eq!(mask_string("a"), "**");
        assert_eq!(mask_string("ab"), "**");
    }

    #[test]
    fn longer_strings_keep_first_and_last() {
        assert_eq!(mask_string("secret"), "s****t");
        assert_eq!(mask_string("abc"), "a*c");
    }

    #[test]
    fn masking_preserves_unmasked_fields_and_redacts_masked_ones() {
        let payload = json!({
            "api_key": "secret_api_key_123",
            "password": "very_secret_password",
            "username": "john_doe",
            "event": "user.created",
        });

        let masked = mask_fields(&payload, &fields(&["api_key", "password"]));

        assert_eq!(masked["username"], json!("john_doe"));
        assert_eq!(masked["event"], json!("user.created"));
        assert_eq!(masked["api_key"], json!("s*****************3"));
        assert_eq!(masked["password"], json!("v*******************d"));

        let rendered = masked.to_string();
        assert!(!rendered.contains("secret_api_key_123"));
        assert!(!rendered.contains("very_secret_password"));
    }

    #[test]
    fn numbers_mask_to_literal_stars() {
        let payload = json!({"pin": 1234});
        let masked = mask_fields(&payload, &fields(&["pin"]));
        assert_eq!(masked["pin"], json!("*****"));
    }

    #[test]
    fn booleans_are_not_masked() {
        let payload = json!({"is_admin": true});
        let masked = mask_fields(&payload, &fields(&["is_admin"]));
        assert_eq!(masked["is_admin"], json!(true));
    }

    #[test]
    fn non_object_values_pass_through_unchanged() {
        let payload = json!(["a", "b"]);
        let masked = mask_fields(&payload, &fields(&["a"]));
        assert_eq!(masked, payload);
    }
}
