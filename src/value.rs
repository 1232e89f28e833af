//! The programmatic raw-input value.
//!
//! Connection-string values arrive as strings; programmatic options arrive
//! as [`OptionValue`]s — the richly-typed counterpart. Plain data variants
//! mirror what a TOML/JSON layer could carry; the remaining variants hold
//! the driver-only shapes (raw bytes, callables, factories) that no text
//! format can express.

use std::collections::BTreeMap;

use serde::{Serialize, Serializer};

use crate::types::{Callback, PkFactoryHandle, PromiseLibraryHandle};

/// A programmatic options map, keyed by authored option name.
pub type OptionsMap = BTreeMap<String, OptionValue>;

/// One raw programmatic value, prior to coercion.
#[derive(Debug, Clone, PartialEq)]
pub enum OptionValue {
    Bool(bool),
    Int(i64),
    String(String),
    Array(Vec<OptionValue>),
    Document(bson::Document),
    Bytes(Vec<u8>),
    Function(Callback),
    PkFactory(PkFactoryHandle),
    PromiseLibrary(PromiseLibraryHandle),
    Null,
}

impl OptionValue {
    /// JSON rendering for warning messages. Opaque variants render as
    /// placeholders rather than failing.
    pub(crate) fn render(&self) -> String {
        serde_json::to_string(self).unwrap_or_else(|_| "<opaque>".into())
    }
}

impl Serialize for OptionValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            OptionValue::Bool(b) => serializer.serialize_bool(*b),
            OptionValue::Int(n) => serializer.serialize_i64(*n),
            OptionValue::String(s) => serializer.serialize_str(s),
            OptionValue::Array(items) => items.serialize(serializer),
            OptionValue::Document(doc) => doc.serialize(serializer),
            OptionValue::Bytes(bytes) => {
                serializer.serialize_str(&format!("<buffer {} bytes>", bytes.len()))
            }
            OptionValue::Function(_) => serializer.serialize_str("<function>"),
            OptionValue::PkFactory(_) => serializer.serialize_str("<pkFactory>"),
            OptionValue::PromiseLibrary(_) => serializer.serialize_str("<promiseLibrary>"),
            OptionValue::Null => serializer.serialize_unit(),
        }
    }
}

impl From<bool> for OptionValue {
    fn from(value: bool) -> Self {
        OptionValue::Bool(value)
    }
}

impl From<i64> for OptionValue {
    fn from(value: i64) -> Self {
        OptionValue::Int(value)
    }
}

impl From<i32> for OptionValue {
    fn from(value: i32) -> Self {
        OptionValue::Int(value.into())
    }
}

impl From<&str> for OptionValue {
    fn from(value: &str) -> Self {
        OptionValue::String(value.to_string())
    }
}

impl From<String> for OptionValue {
    fn from(value: String) -> Self {
        OptionValue::String(value)
    }
}

impl From<bson::Document> for OptionValue {
    fn from(value: bson::Document) -> Self {
        OptionValue::Document(value)
    }
}

impl From<Vec<OptionValue>> for OptionValue {
    fn from(value: Vec<OptionValue>) -> Self {
        OptionValue::Array(value)
    }
}

impl From<Vec<&str>> for OptionValue {
    fn from(value: Vec<&str>) -> Self {
        OptionValue::Array(value.into_iter().map(OptionValue::from).collect())
    }
}

impl From<Callback> for OptionValue {
    fn from(value: Callback) -> Self {
        OptionValue::Function(value)
    }
}

impl From<PkFactoryHandle> for OptionValue {
    fn from(value: PkFactoryHandle) -> Self {
        OptionValue::PkFactory(value)
    }
}

impl From<PromiseLibraryHandle> for OptionValue {
    fn from(value: PromiseLibraryHandle) -> Self {
        OptionValue::PromiseLibrary(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bson::doc;

    #[test]
    fn renders_data_as_json() {
        assert_eq!(OptionValue::from(true).render(), "true");
        assert_eq!(OptionValue::from(42i64).render(), "42");
        assert_eq!(OptionValue::from("majority").render(), "\"majority\"");
        assert_eq!(
            OptionValue::from(vec!["zlib", "snappy"]).render(),
            "[\"zlib\",\"snappy\"]"
        );
        assert_eq!(
            OptionValue::from(doc! { "level": "local" }).render(),
            "{\"level\":\"local\"}"
        );
    }

    #[test]
    fn renders_opaque_as_placeholders() {
        assert_eq!(
            OptionValue::Function(Callback::noop()).render(),
            "\"<function>\""
        );
        assert_eq!(
            OptionValue::Bytes(vec![1, 2, 3]).render(),
            "\"<buffer 3 bytes>\""
        );
    }

    #[test]
    fn function_equality_is_by_pointer() {
        let cb = Callback::new(|| {});
        assert_eq!(
            OptionValue::Function(cb.clone()),
            OptionValue::Function(cb.clone())
        );
        assert_ne!(
            OptionValue::Function(cb),
            OptionValue::Function(Callback::new(|| {}))
        );
    }
}
