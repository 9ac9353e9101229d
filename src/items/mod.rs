//! Item token parsing (RPC parameters vs HTTP headers).
//!
//! parse_items -> ParsedItems { params, headers }
//!
//! Separator precedence at the first `:` / `=` occurrence, left to right:
//!   key:=json    JSON-typed parameter (decoded before use)
//!   key=value    string parameter
//!   key:value    HTTP header
//!
//! A token with no separator, an empty key, or an empty value is rejected.
//! Same key twice: last write wins.

use serde_json::{Map, Value};

use crate::error::{CallError, Result};

/// Classified output of a positional item list.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct ParsedItems {
    /// RPC parameter tree. Keys are flat; dots are not expanded.
    pub params: Map<String, Value>,
    /// HTTP headers in first-seen order.
    pub headers: Vec<(String, String)>,
}

/// Which separator matched inside a token.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Separator {
    /// `:=` value is raw JSON
    Json,
    /// `=` value is a plain string
    Text,
    /// `:` value is an HTTP header
    Header,
}

/// Split a token at its first delimiter. Returns `(key, separator, value)`,
/// or `None` when the token carries no delimiter at all.
///
/// At a `:` immediately followed by `=`, the two-character `:=` form wins
/// over the header reading. Delimiter characters later in the token belong
/// to the value: `a=b:=c` is the string parameter `a` with value `b:=c`,
/// and `a:b=c` is the header `a` with value `b=c`.
fn split_token(token: &str) -> Option<(&str, Separator, &str)> {
    let idx = token.find([':', '='])?;
    let key = &token[..idx];
    match token.as_bytes()[idx] {
        b'=' => Some((key, Separator::Text, &token[idx + 1..])),
        b':' if token.as_bytes().get(idx + 1) == Some(&b'=') => {
            Some((key, Separator::Json, &token[idx + 2..]))
        }
        _ => Some((key, Separator::Header, &token[idx + 1..])),
    }
}

/// Classify every item into the parameter tree / header set.
///
/// Fails on the first offending token, naming it and its index; a `:=`
/// value that is not valid JSON is its own error class (no silent
/// fallback to string). Pure: no effects beyond the returned collections.
pub fn parse_items(items: &[String]) -> Result<ParsedItems> {
    let mut out = ParsedItems::default();

    for (index, token) in items.iter().enumerate() {
        let malformed = || CallError::MalformedItem {
            index,
            token: token.clone(),
        };

        let Some((key, separator, value)) = split_token(token) else {
            return Err(malformed());
        };
        if key.is_empty() || value.is_empty() {
            return Err(malformed());
        }

        match separator {
            Separator::Json => {
                let decoded: Value =
                    serde_json::from_str(value).map_err(|source| CallError::JsonValue {
                        key: key.to_string(),
                        raw: value.to_string(),
                        source,
                    })?;
                out.params.insert(key.to_string(), decoded);
            }
            Separator::Text => {
                out.params
                    .insert(key.to_string(), Value::String(value.to_string()));
            }
            Separator::Header => {
                if let Some(existing) = out.headers.iter_mut().find(|(name, _)| name == key) {
                    existing.1 = value.to_string();
                } else {
                    out.headers.push((key.to_string(), value.to_string()));
                }
            }
        }
    }

    Ok(out)
}

/* --------------------------------- Tests ---------------------------------- */

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn items(tokens: &[&str]) -> Vec<String> {
        tokens.iter().map(|t| t.to_string()).collect()
    }

    #[test]
    fn string_parameter() {
        let parsed = parse_items(&items(&["a=hello"])).unwrap();
        assert_eq!(parsed.params.get("a"), Some(&json!("hello")));
        assert!(parsed.headers.is_empty());
    }

    #[test]
    fn json_parameter_decodes() {
        let parsed = parse_items(&items(&[r#"a:={"x":1}"#])).unwrap();
        assert_eq!(parsed.params.get("a"), Some(&json!({"x": 1})));
    }

    #[test]
    fn json_parameter_scalar_forms() {
        let parsed = parse_items(&items(&[
            "n:=3",
            "f:=2.5",
            "b:=true",
            "z:=null",
            r#"s:="quoted""#,
            "arr:=[1,2]",
        ]))
        .unwrap();
        assert_eq!(parsed.params.get("n"), Some(&json!(3)));
        assert_eq!(parsed.params.get("f"), Some(&json!(2.5)));
        assert_eq!(parsed.params.get("b"), Some(&json!(true)));
        assert_eq!(parsed.params.get("z"), Some(&json!(null)));
        assert_eq!(parsed.params.get("s"), Some(&json!("quoted")));
        assert_eq!(parsed.params.get("arr"), Some(&json!([1, 2])));
    }

    #[test]
    fn header_is_not_a_parameter() {
        let parsed = parse_items(&items(&["X-Trace:abc"])).unwrap();
        assert!(parsed.params.is_empty());
        assert_eq!(parsed.headers, vec![("X-Trace".to_string(), "abc".to_string())]);
    }

    #[test]
    fn separator_precedence_scans_left_to_right() {
        // `=` comes first: the whole tail is the string value.
        let parsed = parse_items(&items(&["a=b:=c"])).unwrap();
        assert_eq!(parsed.params.get("a"), Some(&json!("b:=c")));

        // `:` comes first and is not followed by `=`: header.
        let parsed = parse_items(&items(&["a:b=c"])).unwrap();
        assert_eq!(parsed.headers, vec![("a".to_string(), "b=c".to_string())]);

        // `:` immediately followed by `=`: JSON assignment wins over header.
        let parsed = parse_items(&items(&["a:=1"])).unwrap();
        assert_eq!(parsed.params.get("a"), Some(&json!(1)));

        // Header value may itself start with `:`.
        let parsed = parse_items(&items(&["a::b"])).unwrap();
        assert_eq!(parsed.headers, vec![("a".to_string(), ":b".to_string())]);
    }

    #[test]
    fn no_separator_is_malformed_with_index() {
        let err = parse_items(&items(&["badtoken"])).unwrap_err();
        match err {
            CallError::MalformedItem { index, token } => {
                assert_eq!(index, 0);
                assert_eq!(token, "badtoken");
            }
            other => panic!("expected MalformedItem, got {other:?}"),
        }
    }

    #[test]
    fn malformed_index_points_at_offender() {
        let err = parse_items(&items(&["ok=1", "also:fine", "nope"])).unwrap_err();
        assert!(matches!(err, CallError::MalformedItem { index: 2, .. }));
    }

    #[test]
    fn empty_key_or_value_rejected() {
        for bad in ["=v", ":v", ":=1", "k=", "k:", "k:="] {
            let err = parse_items(&items(&[bad])).unwrap_err();
            assert!(
                matches!(err, CallError::MalformedItem { .. }),
                "expected MalformedItem for {bad:?}"
            );
        }
    }

    #[test]
    fn invalid_json_value_names_key_and_raw() {
        let err = parse_items(&items(&["cfg:={broken"])).unwrap_err();
        match err {
            CallError::JsonValue { key, raw, .. } => {
                assert_eq!(key, "cfg");
                assert_eq!(raw, "{broken");
            }
            other => panic!("expected JsonValue, got {other:?}"),
        }
    }

    #[test]
    fn last_write_wins_for_params_and_headers() {
        let parsed = parse_items(&items(&["a=first", "a=second", "H:1", "H:2"])).unwrap();
        assert_eq!(parsed.params.get("a"), Some(&json!("second")));
        assert_eq!(parsed.headers, vec![("H".to_string(), "2".to_string())]);
    }

    #[test]
    fn dotted_keys_stay_flat() {
        let parsed = parse_items(&items(&["message.role=user"])).unwrap();
        assert_eq!(parsed.params.get("message.role"), Some(&json!("user")));
        assert!(parsed.params.get("message").is_none());
    }

    #[test]
    fn json_tokens_round_trip() {
        let parsed = parse_items(&items(&[
            r#"message:={"role":"user","parts":[{"kind":"text","text":"hi"}]}"#,
            "count:=3",
            "label=plain",
        ]))
        .unwrap();

        // Re-serialize every parameter as a key:=json token and re-parse.
        let tokens: Vec<String> = parsed
            .params
            .iter()
            .map(|(k, v)| format!("{k}:={}", serde_json::to_string(v).unwrap()))
            .collect();
        let reparsed = parse_items(&tokens).unwrap();
        assert_eq!(reparsed.params, parsed.params);
    }
}
