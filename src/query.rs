use anyhow::{Context, Result, bail};
use regex::Regex;
use serde_json::{Value, json};
use std::sync::OnceLock;

/// Placeholder the input bars show for an empty query.
pub const EMPTY_QUERY: &str = "{}";

fn unquoted_key_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        // An unquoted key directly after `{` or `,`: `$lt`, `stock.store`, ...
        Regex::new(r#"([{,]\s*)([$A-Za-z_][\w$.]*)\s*:"#).expect("invalid key pattern")
    })
}

fn single_quoted_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r#"'([^']*)'"#).expect("invalid quote pattern"))
}

/// Parses the loosely-typed filter/sort text the input bars accept into the
/// JSON object the Dao expects. Accepts unquoted keys and single-quoted
/// strings; an empty input means "match everything". A parse failure leaves
/// the caller's browse state untouched.
pub fn parse_loose_query(text: &str) -> Result<Value> {
    let trimmed = text.trim();
    if trimmed.is_empty() || trimmed == EMPTY_QUERY {
        return Ok(json!({}));
    }

    let mut normalized = trimmed.to_string();
    if !normalized.starts_with('{') {
        normalized = format!("{{{normalized}}}");
    }
    let normalized = single_quoted_pattern().replace_all(&normalized, "\"$1\"");
    let normalized = unquoted_key_pattern().replace_all(&normalized, "$1\"$2\":");

    let value: Value = serde_json::from_str(&normalized)
        .with_context(|| format!("invalid query: {trimmed}"))?;
    if !value.is_object() {
        bail!("query must be a document, got: {trimmed}");
    }
    Ok(value)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_input_matches_everything() {
        assert_eq!(parse_loose_query("").unwrap(), json!({}));
        assert_eq!(parse_loose_query("  ").unwrap(), json!({}));
        assert_eq!(parse_loose_query("{}").unwrap(), json!({}));
    }

    #[test]
    fn test_strict_json_passes_through() {
        let parsed = parse_loose_query(r#"{"name": "mouse", "price": 19}"#).unwrap();
        assert_eq!(parsed, json!({ "name": "mouse", "price": 19 }));
    }

    #[test]
    fn test_unquoted_keys_are_normalized() {
        let parsed = parse_loose_query(r#"{ name: "mouse", price: { $lt: 20 } }"#).unwrap();
        assert_eq!(parsed, json!({ "name": "mouse", "price": { "$lt": 20 } }));
    }

    #[test]
    fn test_dotted_keys_and_single_quotes() {
        let parsed = parse_loose_query("{ stock.store: { $gte: 1 }, name: 'mouse' }").unwrap();
        assert_eq!(
            parsed,
            json!({ "stock.store": { "$gte": 1 }, "name": "mouse" })
        );
    }

    #[test]
    fn test_bare_pairs_get_braces() {
        let parsed = parse_loose_query("price: -1").unwrap();
        assert_eq!(parsed, json!({ "price": -1 }));
    }

    #[test]
    fn test_invalid_input_is_an_error() {
        assert!(parse_loose_query("{ name: }").is_err());
        assert!(parse_loose_query("[1, 2]").is_err());
        assert!(parse_loose_query("{ unterminated").is_err());
    }
}
