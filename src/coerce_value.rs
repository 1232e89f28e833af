//! Value-sourced coercion for programmatic options.
//!
//! Inputs are already typed [`OptionValue`]s, so most kinds reduce to
//! shape checks: a boolean must be a native boolean, a number a native
//! integer, and so on — there is no string parsing here except for the
//! `w` literal, which accepts `"majority"` and numeric strings for parity
//! with the string source.

use bson::Bson;

use crate::coerce::{CoerceSource, validate_keys};
use crate::types::{
    AddressFamily, Auth, AuthMechanismProperties, Callback, OptionEnum, PkFactoryHandle,
    PromiseLibraryHandle, ReadConcern, W,
};
use crate::value::OptionValue;
use crate::warning::{Diagnostics, Warning};

pub(crate) struct ValueCoercer;

impl ValueCoercer {
    fn incorrect_type(
        &self,
        diags: &mut Diagnostics,
        key: &str,
        raw: &OptionValue,
        expected: &'static str,
    ) {
        diags.push(Warning::IncorrectType {
            key: key.to_string(),
            value: raw.render(),
            expected,
        });
    }

    /// Coerce one string-valued sub-key of a structured fragment.
    fn sub_string(
        &self,
        diags: &mut Diagnostics,
        sub_key: &str,
        value: &Bson,
    ) -> Option<String> {
        match value {
            Bson::String(s) => Some(s.clone()),
            other => {
                diags.push(Warning::IncorrectType {
                    key: sub_key.to_string(),
                    value: other.to_string(),
                    expected: "string",
                });
                None
            }
        }
    }

    fn sub_boolean(&self, diags: &mut Diagnostics, sub_key: &str, value: &Bson) -> Option<bool> {
        match value {
            Bson::Boolean(b) => Some(*b),
            other => {
                diags.push(Warning::IncorrectType {
                    key: sub_key.to_string(),
                    value: other.to_string(),
                    expected: "boolean",
                });
                None
            }
        }
    }
}

impl CoerceSource for ValueCoercer {
    type Raw = OptionValue;

    fn boolean(&self, diags: &mut Diagnostics, key: &str, raw: &OptionValue) -> Option<bool> {
        match raw {
            OptionValue::Bool(b) => Some(*b),
            other => {
                self.incorrect_type(diags, key, other, "boolean");
                None
            }
        }
    }

    fn string(&self, diags: &mut Diagnostics, key: &str, raw: &OptionValue) -> Option<String> {
        match raw {
            OptionValue::String(s) => Some(s.clone()),
            other => {
                self.incorrect_type(diags, key, other, "string");
                None
            }
        }
    }

    fn number(&self, diags: &mut Diagnostics, key: &str, raw: &OptionValue) -> Option<i64> {
        match raw {
            OptionValue::Int(n) => Some(*n),
            other => {
                self.incorrect_type(diags, key, other, "number");
                None
            }
        }
    }

    fn enum_member<E: OptionEnum>(
        &self,
        diags: &mut Diagnostics,
        key: &str,
        raw: &OptionValue,
    ) -> Option<E> {
        if let OptionValue::String(name) = raw
            && let Some(member) = E::from_name(name)
        {
            return Some(member);
        }
        self.incorrect_type(diags, key, raw, E::NAME);
        None
    }

    fn enum_list<E: OptionEnum>(
        &self,
        diags: &mut Diagnostics,
        key: &str,
        raw: &OptionValue,
    ) -> Option<Vec<E>> {
        let OptionValue::Array(items) = raw else {
            self.incorrect_type(diags, key, raw, "Array");
            return None;
        };
        let mut members = Vec::new();
        for item in items {
            if let OptionValue::String(name) = item
                && let Some(member) = E::from_name(name)
            {
                members.push(member);
            } else {
                self.incorrect_type(diags, key, item, E::NAME);
            }
        }
        Some(members)
    }

    fn write_concern_w(&self, diags: &mut Diagnostics, key: &str, raw: &OptionValue) -> Option<W> {
        match raw {
            OptionValue::Int(n) => Some(W::Number(*n)),
            OptionValue::String(s) if s == "majority" => Some(W::Majority),
            OptionValue::String(s) => match s.parse::<i64>() {
                Ok(n) => Some(W::Number(n)),
                Err(_) => {
                    self.incorrect_type(diags, key, raw, "WriteConcern");
                    None
                }
            },
            other => {
                self.incorrect_type(diags, key, other, "WriteConcern");
                None
            }
        }
    }

    fn read_concern(
        &self,
        diags: &mut Diagnostics,
        key: &str,
        raw: &OptionValue,
    ) -> Option<ReadConcern> {
        let OptionValue::Document(doc) = raw else {
            self.incorrect_type(diags, key, raw, "readConcern");
            return None;
        };
        validate_keys(
            diags,
            key,
            "readConcern",
            &["level"],
            doc.keys().map(String::as_str),
        );
        let level = match doc.get("level") {
            Some(Bson::String(name)) => match crate::types::ReadConcernLevel::from_name(name) {
                Some(level) => Some(level),
                None => {
                    diags.push(Warning::IncorrectType {
                        key: "level".into(),
                        value: format!("\"{name}\""),
                        expected: "ReadConcernLevel",
                    });
                    None
                }
            },
            Some(other) => {
                diags.push(Warning::IncorrectType {
                    key: "level".into(),
                    value: other.to_string(),
                    expected: "ReadConcernLevel",
                });
                None
            }
            None => None,
        };
        Some(ReadConcern { level })
    }

    fn auth_mechanism_properties(
        &self,
        diags: &mut Diagnostics,
        key: &str,
        raw: &OptionValue,
    ) -> Option<AuthMechanismProperties> {
        let OptionValue::Document(doc) = raw else {
            self.incorrect_type(diags, key, raw, "authMechanismProperties");
            return None;
        };
        validate_keys(
            diags,
            key,
            "authMechanismProperties",
            &["SERVICE_NAME", "CANONICALIZE_HOST_NAME", "SERVICE_REALM"],
            doc.keys().map(String::as_str),
        );
        let mut fragment = AuthMechanismProperties::fragment();
        if let Some(value) = doc.get("SERVICE_NAME") {
            fragment.service_name = self.sub_string(diags, "SERVICE_NAME", value);
        }
        if let Some(value) = doc.get("CANONICALIZE_HOST_NAME") {
            fragment.canonicalize_host_name =
                self.sub_boolean(diags, "CANONICALIZE_HOST_NAME", value);
        }
        if let Some(value) = doc.get("SERVICE_REALM") {
            fragment.service_realm = self.sub_string(diags, "SERVICE_REALM", value);
        }
        Some(fragment)
    }

    fn auth(&self, diags: &mut Diagnostics, key: &str, raw: &OptionValue) -> Option<Auth> {
        let OptionValue::Document(doc) = raw else {
            self.incorrect_type(diags, key, raw, "auth");
            return None;
        };
        validate_keys(
            diags,
            key,
            "auth",
            &["user", "username", "pass", "password"],
            doc.keys().map(String::as_str),
        );
        // `user`/`pass` are the canonical spellings and win over the aliases
        let user = doc
            .get("user")
            .or_else(|| doc.get("username"))
            .and_then(|value| self.sub_string(diags, "user", value));
        let pass = doc
            .get("pass")
            .or_else(|| doc.get("password"))
            .and_then(|value| self.sub_string(diags, "pass", value));
        Some(Auth { user, pass })
    }

    fn bytes(&self, diags: &mut Diagnostics, key: &str, raw: &OptionValue) -> Option<Vec<u8>> {
        match raw {
            OptionValue::Bytes(bytes) => Some(bytes.clone()),
            other => {
                self.incorrect_type(diags, key, other, "buffer");
                None
            }
        }
    }

    fn function(&self, diags: &mut Diagnostics, key: &str, raw: &OptionValue) -> Option<Callback> {
        match raw {
            OptionValue::Function(callback) => Some(callback.clone()),
            other => {
                self.incorrect_type(diags, key, other, "function");
                None
            }
        }
    }

    fn address_family(
        &self,
        diags: &mut Diagnostics,
        key: &str,
        raw: &OptionValue,
    ) -> Option<Option<AddressFamily>> {
        match raw {
            OptionValue::Int(n) => match AddressFamily::from_i64(*n) {
                Some(family) => Some(Some(family)),
                None => {
                    self.incorrect_type(diags, key, raw, "family");
                    Some(None)
                }
            },
            OptionValue::Null => Some(None),
            other => {
                self.incorrect_type(diags, key, other, "family");
                Some(None)
            }
        }
    }

    fn pk_factory(
        &self,
        diags: &mut Diagnostics,
        key: &str,
        raw: &OptionValue,
    ) -> Option<PkFactoryHandle> {
        match raw {
            OptionValue::PkFactory(factory) => Some(factory.clone()),
            other => {
                self.incorrect_type(diags, key, other, "pkFactory");
                None
            }
        }
    }

    fn promise_library(
        &self,
        diags: &mut Diagnostics,
        key: &str,
        raw: &OptionValue,
    ) -> Option<PromiseLibraryHandle> {
        match raw {
            OptionValue::PromiseLibrary(library) => Some(library.clone()),
            other => {
                self.incorrect_type(diags, key, other, "promiseLibrary");
                None
            }
        }
    }

    fn read_preference_input(
        &self,
        diags: &mut Diagnostics,
        key: &str,
        raw: &OptionValue,
    ) -> Option<Bson> {
        match raw {
            OptionValue::String(mode) => Some(Bson::String(mode.clone())),
            OptionValue::Document(doc) => Some(Bson::Document(doc.clone())),
            other => {
                self.incorrect_type(diags, key, other, "readPreference");
                None
            }
        }
    }

    fn write_concern_input(
        &self,
        diags: &mut Diagnostics,
        key: &str,
        raw: &OptionValue,
    ) -> Option<Bson> {
        match raw {
            OptionValue::Document(doc) => Some(Bson::Document(doc.clone())),
            other => {
                self.incorrect_type(diags, key, other, "writeConcern");
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Compressor, ReadConcernLevel};
    use bson::doc;

    #[test]
    fn boolean_requires_native_bool() {
        let c = ValueCoercer;
        let mut diags = Diagnostics::new(false);
        assert_eq!(c.boolean(&mut diags, "tls", &OptionValue::Bool(true)), Some(true));
        assert_eq!(c.boolean(&mut diags, "tls", &OptionValue::from("true")), None);
        assert_eq!(diags.warnings().len(), 1);
    }

    #[test]
    fn number_requires_native_int() {
        let c = ValueCoercer;
        let mut diags = Diagnostics::new(false);
        assert_eq!(c.number(&mut diags, "poolSize", &OptionValue::Int(10)), Some(10));
        assert_eq!(c.number(&mut diags, "poolSize", &OptionValue::from("10")), None);
        assert_eq!(diags.warnings().len(), 1);
    }

    #[test]
    fn enum_list_keeps_valid_warns_invalid() {
        let c = ValueCoercer;
        let mut diags = Diagnostics::new(false);
        let raw = OptionValue::from(vec!["zlib", "lz4", "snappy"]);
        let list: Vec<Compressor> = c.enum_list(&mut diags, "compressors", &raw).unwrap();
        assert_eq!(list, vec![Compressor::Zlib, Compressor::Snappy]);
        assert_eq!(diags.warnings().len(), 1);
    }

    #[test]
    fn enum_list_rejects_non_array() {
        let c = ValueCoercer;
        let mut diags = Diagnostics::new(false);
        let list: Option<Vec<Compressor>> =
            c.enum_list(&mut diags, "compressors", &OptionValue::from("zlib"));
        assert!(list.is_none());
        assert_eq!(diags.warnings().len(), 1);
    }

    #[test]
    fn write_concern_w_accepts_int_and_majority() {
        let c = ValueCoercer;
        let mut diags = Diagnostics::new(false);
        assert_eq!(c.write_concern_w(&mut diags, "w", &OptionValue::Int(2)), Some(W::Number(2)));
        assert_eq!(
            c.write_concern_w(&mut diags, "w", &OptionValue::from("majority")),
            Some(W::Majority)
        );
        assert_eq!(
            c.write_concern_w(&mut diags, "w", &OptionValue::from("3")),
            Some(W::Number(3))
        );
        assert_eq!(c.write_concern_w(&mut diags, "w", &OptionValue::Bool(true)), None);
        assert_eq!(diags.warnings().len(), 1);
    }

    #[test]
    fn read_concern_extracts_level_only() {
        let c = ValueCoercer;
        let mut diags = Diagnostics::new(false);
        let fragment = c
            .read_concern(
                &mut diags,
                "readConcern",
                &OptionValue::from(doc! { "level": "majority" }),
            )
            .unwrap();
        assert_eq!(fragment.level, Some(ReadConcernLevel::Majority));
        assert!(diags.warnings().is_empty());
    }

    #[test]
    fn read_concern_unknown_property_warns() {
        let c = ValueCoercer;
        let mut diags = Diagnostics::new(false);
        let fragment = c
            .read_concern(
                &mut diags,
                "readConcern",
                &OptionValue::from(doc! { "level": "local", "bogus": 1 }),
            )
            .unwrap();
        assert_eq!(fragment.level, Some(ReadConcernLevel::Local));
        assert_eq!(diags.warnings().len(), 1);
    }

    #[test]
    fn auth_prefers_canonical_spellings() {
        let c = ValueCoercer;
        let mut diags = Diagnostics::new(false);
        let auth = c
            .auth(
                &mut diags,
                "auth",
                &OptionValue::from(doc! { "user": "a", "username": "b", "password": "pw" }),
            )
            .unwrap();
        assert_eq!(auth.user.as_deref(), Some("a"));
        assert_eq!(auth.pass.as_deref(), Some("pw"));
    }

    #[test]
    fn family_invalid_degrades_to_null() {
        let c = ValueCoercer;
        let mut diags = Diagnostics::new(false);
        assert_eq!(
            c.address_family(&mut diags, "family", &OptionValue::Int(4)),
            Some(Some(AddressFamily::V4))
        );
        assert_eq!(
            c.address_family(&mut diags, "family", &OptionValue::Null),
            Some(None)
        );
        assert_eq!(
            c.address_family(&mut diags, "family", &OptionValue::Int(5)),
            Some(None)
        );
        assert_eq!(diags.warnings().len(), 1);
    }

    #[test]
    fn mechanism_properties_type_checks_sub_keys() {
        let c = ValueCoercer;
        let mut diags = Diagnostics::new(false);
        let fragment = c
            .auth_mechanism_properties(
                &mut diags,
                "authMechanismProperties",
                &OptionValue::from(doc! {
                    "SERVICE_NAME": "kerberos",
                    "CANONICALIZE_HOST_NAME": "yes",
                }),
            )
            .unwrap();
        assert_eq!(fragment.service_name.as_deref(), Some("kerberos"));
        assert_eq!(fragment.canonicalize_host_name, None);
        assert_eq!(diags.warnings().len(), 1);
    }
}
