//! String-sourced coercion for connection-string values.
//!
//! Query values are text, so every kind parses. Booleans are the literal
//! `true`/`false` (case-sensitive), numbers are integral, list kinds split
//! comma-joined values and parse every element. For a key that was
//! repeated in the query, scalar kinds take the last occurrence and list
//! kinds take all of them.
//!
//! Kinds that a connection string cannot express (credentials, buffers,
//! callables, read concern) are rejected outright for this source.

use bson::Bson;

use crate::coerce::{CoerceSource, validate_keys};
use crate::types::{
    AddressFamily, Auth, AuthMechanismProperties, Callback, OptionEnum, PkFactoryHandle,
    PromiseLibraryHandle, ReadConcern, W,
};
use crate::uri::UriValue;
use crate::warning::{Diagnostics, Warning};

pub(crate) struct UriCoercer;

impl UriCoercer {
    fn incorrect_type(
        &self,
        diags: &mut Diagnostics,
        key: &str,
        raw: &UriValue,
        expected: &'static str,
    ) {
        diags.push(Warning::IncorrectType {
            key: key.to_string(),
            value: raw.render(),
            expected,
        });
    }

    fn invalid_for_source(&self, diags: &mut Diagnostics, key: &str, kind: &'static str) {
        diags.push(Warning::InvalidForSource {
            key: key.to_string(),
            kind,
        });
    }
}

impl CoerceSource for UriCoercer {
    type Raw = UriValue;

    fn boolean(&self, diags: &mut Diagnostics, key: &str, raw: &UriValue) -> Option<bool> {
        match raw.last() {
            "true" => Some(true),
            "false" => Some(false),
            _ => {
                self.incorrect_type(diags, key, raw, "boolean");
                None
            }
        }
    }

    fn string(&self, _diags: &mut Diagnostics, _key: &str, raw: &UriValue) -> Option<String> {
        // query values are already strings; pass through verbatim
        Some(raw.last().to_string())
    }

    fn number(&self, diags: &mut Diagnostics, key: &str, raw: &UriValue) -> Option<i64> {
        match raw.last().parse::<i64>() {
            Ok(n) => Some(n),
            Err(_) => {
                self.incorrect_type(diags, key, raw, "number");
                None
            }
        }
    }

    fn enum_member<E: OptionEnum>(
        &self,
        diags: &mut Diagnostics,
        key: &str,
        raw: &UriValue,
    ) -> Option<E> {
        match E::from_name(raw.last()) {
            Some(member) => Some(member),
            None => {
                self.incorrect_type(diags, key, raw, E::NAME);
                None
            }
        }
    }

    fn enum_list<E: OptionEnum>(
        &self,
        diags: &mut Diagnostics,
        key: &str,
        raw: &UriValue,
    ) -> Option<Vec<E>> {
        let mut members = Vec::new();
        for occurrence in raw.occurrences() {
            for element in occurrence.split(',') {
                match E::from_name(element) {
                    Some(member) => members.push(member),
                    None => diags.push(Warning::IncorrectType {
                        key: key.to_string(),
                        value: format!("\"{element}\""),
                        expected: E::NAME,
                    }),
                }
            }
        }
        Some(members)
    }

    fn write_concern_w(&self, diags: &mut Diagnostics, key: &str, raw: &UriValue) -> Option<W> {
        let value = raw.last();
        if value == "majority" {
            return Some(W::Majority);
        }
        match value.parse::<i64>() {
            Ok(n) => Some(W::Number(n)),
            Err(_) => {
                self.incorrect_type(diags, key, raw, "WriteConcern");
                None
            }
        }
    }

    fn read_concern(
        &self,
        diags: &mut Diagnostics,
        key: &str,
        _raw: &UriValue,
    ) -> Option<ReadConcern> {
        self.invalid_for_source(diags, key, "readConcern");
        None
    }

    fn auth_mechanism_properties(
        &self,
        diags: &mut Diagnostics,
        key: &str,
        raw: &UriValue,
    ) -> Option<AuthMechanismProperties> {
        // `KEY:value,KEY:value` pairs; an entry with no `:` is ignored
        let joined = raw.occurrences().join(",");
        let pairs: Vec<(&str, &str)> = joined
            .split(',')
            .filter_map(|pair| pair.split_once(':'))
            .collect();

        validate_keys(
            diags,
            key,
            "authMechanismProperties",
            &["SERVICE_NAME", "CANONICALIZE_HOST_NAME", "SERVICE_REALM"],
            pairs.iter().map(|(sub_key, _)| *sub_key),
        );

        let mut fragment = AuthMechanismProperties::fragment();
        for (sub_key, value) in pairs {
            match sub_key {
                "SERVICE_NAME" => fragment.service_name = Some(value.to_string()),
                "CANONICALIZE_HOST_NAME" => match value {
                    "true" => fragment.canonicalize_host_name = Some(true),
                    "false" => fragment.canonicalize_host_name = Some(false),
                    _ => diags.push(Warning::IncorrectType {
                        key: "CANONICALIZE_HOST_NAME".into(),
                        value: format!("\"{value}\""),
                        expected: "boolean",
                    }),
                },
                "SERVICE_REALM" => fragment.service_realm = Some(value.to_string()),
                _ => {}
            }
        }
        Some(fragment)
    }

    fn auth(&self, diags: &mut Diagnostics, key: &str, _raw: &UriValue) -> Option<Auth> {
        self.invalid_for_source(diags, key, "auth");
        None
    }

    fn bytes(&self, diags: &mut Diagnostics, key: &str, _raw: &UriValue) -> Option<Vec<u8>> {
        self.invalid_for_source(diags, key, "buffer");
        None
    }

    fn function(&self, diags: &mut Diagnostics, key: &str, _raw: &UriValue) -> Option<Callback> {
        self.invalid_for_source(diags, key, "function");
        None
    }

    fn address_family(
        &self,
        diags: &mut Diagnostics,
        key: &str,
        _raw: &UriValue,
    ) -> Option<Option<AddressFamily>> {
        self.invalid_for_source(diags, key, "family");
        None
    }

    fn pk_factory(
        &self,
        diags: &mut Diagnostics,
        key: &str,
        _raw: &UriValue,
    ) -> Option<PkFactoryHandle> {
        self.invalid_for_source(diags, key, "pkFactory");
        None
    }

    fn promise_library(
        &self,
        diags: &mut Diagnostics,
        key: &str,
        _raw: &UriValue,
    ) -> Option<PromiseLibraryHandle> {
        self.invalid_for_source(diags, key, "promiseLibrary");
        None
    }

    fn read_preference_input(
        &self,
        _diags: &mut Diagnostics,
        _key: &str,
        raw: &UriValue,
    ) -> Option<Bson> {
        // a connection string can only carry a bare mode
        Some(Bson::String(raw.last().to_string()))
    }

    fn write_concern_input(
        &self,
        diags: &mut Diagnostics,
        key: &str,
        _raw: &UriValue,
    ) -> Option<Bson> {
        self.invalid_for_source(diags, key, "writeConcern");
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Compressor;

    fn one(value: &str) -> UriValue {
        UriValue::One(value.into())
    }

    #[test]
    fn boolean_accepts_only_literals() {
        let c = UriCoercer;
        let mut diags = Diagnostics::new(false);
        assert_eq!(c.boolean(&mut diags, "tls", &one("true")), Some(true));
        assert_eq!(c.boolean(&mut diags, "tls", &one("false")), Some(false));
        assert!(diags.warnings().is_empty());

        assert_eq!(c.boolean(&mut diags, "tls", &one("TRUE")), None);
        assert_eq!(c.boolean(&mut diags, "tls", &one("1")), None);
        assert_eq!(diags.warnings().len(), 2);
    }

    #[test]
    fn number_rejects_non_numeric() {
        let c = UriCoercer;
        let mut diags = Diagnostics::new(false);
        assert_eq!(c.number(&mut diags, "connectTimeoutMS", &one("250")), Some(250));
        assert_eq!(c.number(&mut diags, "connectTimeoutMS", &one("soon")), None);
        assert_eq!(diags.warnings().len(), 1);
    }

    #[test]
    fn string_passes_through_verbatim() {
        let c = UriCoercer;
        let mut diags = Diagnostics::new(false);
        assert_eq!(
            c.string(&mut diags, "appName", &one("anything at all")),
            Some("anything at all".into())
        );
    }

    #[test]
    fn enum_list_parses_every_comma_element() {
        let c = UriCoercer;
        let mut diags = Diagnostics::new(false);
        let list: Vec<Compressor> = c
            .enum_list(&mut diags, "compressors", &one("zlib,snappy"))
            .unwrap();
        assert_eq!(list, vec![Compressor::Zlib, Compressor::Snappy]);
        assert!(diags.warnings().is_empty());
    }

    #[test]
    fn enum_list_warns_per_invalid_element() {
        let c = UriCoercer;
        let mut diags = Diagnostics::new(false);
        let list: Vec<Compressor> = c
            .enum_list(&mut diags, "compressors", &one("zlib,lz4,zstd"))
            .unwrap();
        assert_eq!(list, vec![Compressor::Zlib, Compressor::Zstd]);
        assert_eq!(diags.warnings().len(), 1);
    }

    #[test]
    fn enum_list_spans_repeated_keys() {
        let c = UriCoercer;
        let mut diags = Diagnostics::new(false);
        let raw = UriValue::Many(vec!["zlib".into(), "snappy,zstd".into()]);
        let list: Vec<Compressor> = c.enum_list(&mut diags, "compressors", &raw).unwrap();
        assert_eq!(
            list,
            vec![Compressor::Zlib, Compressor::Snappy, Compressor::Zstd]
        );
    }

    #[test]
    fn scalar_kind_takes_last_occurrence() {
        let c = UriCoercer;
        let mut diags = Diagnostics::new(false);
        let raw = UriValue::Many(vec!["100".into(), "200".into()]);
        assert_eq!(c.number(&mut diags, "maxPoolSize", &raw), Some(200));
    }

    #[test]
    fn write_concern_w_majority_or_number() {
        let c = UriCoercer;
        let mut diags = Diagnostics::new(false);
        assert_eq!(c.write_concern_w(&mut diags, "w", &one("majority")), Some(W::Majority));
        assert_eq!(c.write_concern_w(&mut diags, "w", &one("3")), Some(W::Number(3)));
        assert_eq!(c.write_concern_w(&mut diags, "w", &one("most")), None);
        assert_eq!(diags.warnings().len(), 1);
    }

    #[test]
    fn auth_mechanism_properties_parses_colon_pairs() {
        let c = UriCoercer;
        let mut diags = Diagnostics::new(false);
        let fragment = c
            .auth_mechanism_properties(
                &mut diags,
                "authMechanismProperties",
                &one("SERVICE_NAME:kerberos,CANONICALIZE_HOST_NAME:true"),
            )
            .unwrap();
        assert_eq!(fragment.service_name.as_deref(), Some("kerberos"));
        assert_eq!(fragment.canonicalize_host_name, Some(true));
        assert_eq!(fragment.service_realm, None);
        assert!(diags.warnings().is_empty());
    }

    #[test]
    fn auth_mechanism_properties_skips_entries_without_delimiter() {
        let c = UriCoercer;
        let mut diags = Diagnostics::new(false);
        let fragment = c
            .auth_mechanism_properties(
                &mut diags,
                "authMechanismProperties",
                &one("SERVICE_NAME,SERVICE_REALM:realm"),
            )
            .unwrap();
        assert_eq!(fragment.service_name, None);
        assert_eq!(fragment.service_realm.as_deref(), Some("realm"));
        assert!(diags.warnings().is_empty());
    }

    #[test]
    fn auth_mechanism_properties_unknown_key_warns_but_keeps_rest() {
        let c = UriCoercer;
        let mut diags = Diagnostics::new(false);
        let fragment = c
            .auth_mechanism_properties(
                &mut diags,
                "authMechanismProperties",
                &one("SERVICE_NAME:x,BOGUS:y"),
            )
            .unwrap();
        assert_eq!(fragment.service_name.as_deref(), Some("x"));
        assert_eq!(diags.warnings().len(), 1);
    }

    #[test]
    fn inexpressible_kinds_rejected() {
        let c = UriCoercer;
        let mut diags = Diagnostics::new(false);
        assert!(c.read_concern(&mut diags, "readConcern", &one("x")).is_none());
        assert!(c.auth(&mut diags, "auth", &one("x")).is_none());
        assert!(c.bytes(&mut diags, "sslCA", &one("x")).is_none());
        assert!(c.pk_factory(&mut diags, "pkFactory", &one("x")).is_none());
        assert_eq!(diags.warnings().len(), 4);
    }
}
