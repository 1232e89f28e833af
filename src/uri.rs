//! Connection-string query extraction.
//!
//! Only the query portion of `scheme://host/?key=value` is consumed here;
//! scheme, hosts, and inline credentials belong to the (stubbed) connection
//! layer. Keys and values are percent-decoded; a key that repeats
//! accumulates every occurrence.

use std::borrow::Cow;
use std::collections::BTreeMap;

use percent_encoding::percent_decode_str;
use serde::Serialize;

/// A query value: one occurrence, or every occurrence of a repeated key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub(crate) enum UriValue {
    One(String),
    Many(Vec<String>),
}

impl UriValue {
    /// The effective scalar occurrence: for repeated keys, the last one.
    pub(crate) fn last(&self) -> &str {
        match self {
            UriValue::One(value) => value,
            UriValue::Many(values) => values.last().map(String::as_str).unwrap_or(""),
        }
    }

    /// Every occurrence, in authored order.
    pub(crate) fn occurrences(&self) -> Vec<&str> {
        match self {
            UriValue::One(value) => vec![value.as_str()],
            UriValue::Many(values) => values.iter().map(String::as_str).collect(),
        }
    }

    fn push(&mut self, value: String) {
        match self {
            UriValue::One(first) => {
                *self = UriValue::Many(vec![std::mem::take(first), value]);
            }
            UriValue::Many(values) => values.push(value),
        }
    }

    pub(crate) fn render(&self) -> String {
        serde_json::to_string(self).unwrap_or_else(|_| "<opaque>".into())
    }
}

fn decode(raw: &str) -> String {
    match percent_decode_str(raw).decode_utf8() {
        Ok(Cow::Borrowed(s)) => s.to_string(),
        Ok(Cow::Owned(s)) => s,
        Err(_) => raw.to_string(),
    }
}

/// Extract the percent-decoded query map from a connection string.
/// Everything before the first `?` is ignored; empty pairs are skipped.
pub(crate) fn parse_query(connection_string: &str) -> BTreeMap<String, UriValue> {
    let mut query = BTreeMap::new();

    let Some((_, raw_query)) = connection_string.split_once('?') else {
        return query;
    };

    for pair in raw_query.split('&') {
        if pair.is_empty() {
            continue;
        }
        let (raw_key, raw_value) = pair.split_once('=').unwrap_or((pair, ""));
        let key = decode(raw_key);
        let value = decode(raw_value);
        query
            .entry(key)
            .and_modify(|existing: &mut UriValue| existing.push(value.clone()))
            .or_insert(UriValue::One(value));
    }

    query
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extracts_simple_pairs() {
        let query = parse_query("localhost/?ssl=true&journal=true");
        assert_eq!(query["ssl"], UriValue::One("true".into()));
        assert_eq!(query["journal"], UriValue::One("true".into()));
    }

    #[test]
    fn no_query_yields_empty_map() {
        assert!(parse_query("db://localhost:27017").is_empty());
        assert!(parse_query("").is_empty());
    }

    #[test]
    fn percent_decodes_keys_and_values() {
        let query = parse_query("h/?appName=my%20app");
        assert_eq!(query["appName"], UriValue::One("my app".into()));
    }

    #[test]
    fn repeated_key_accumulates() {
        let query = parse_query("h/?compressors=zlib&compressors=snappy");
        assert_eq!(
            query["compressors"],
            UriValue::Many(vec!["zlib".into(), "snappy".into()])
        );
        assert_eq!(query["compressors"].last(), "snappy");
        assert_eq!(query["compressors"].occurrences(), vec!["zlib", "snappy"]);
    }

    #[test]
    fn missing_value_becomes_empty_string() {
        let query = parse_query("h/?tls");
        assert_eq!(query["tls"], UriValue::One(String::new()));
    }

    #[test]
    fn renders_for_warnings() {
        assert_eq!(UriValue::One("yes".into()).render(), "\"yes\"");
        assert_eq!(
            UriValue::Many(vec!["a".into(), "b".into()]).render(),
            "[\"a\",\"b\"]"
        );
    }
}
