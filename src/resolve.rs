//! The binding interpreter.
//!
//! One generic walk serves both input sources: for each table entry whose
//! key is present in the input, claim the key, honor the favored-key skip,
//! run the kind's coercion, and apply. Input keys that no table claims are
//! reported as unrecognized. Because the walk follows table order, the
//! outcome is independent of how the caller ordered their input.

use std::collections::{BTreeMap, BTreeSet};

use crate::bindings::{Binding, Coerced, DRIVER_BINDINGS, Kind, URI_BINDINGS};
use crate::coerce::CoerceSource;
use crate::coerce_uri::UriCoercer;
use crate::coerce_value::ValueCoercer;
use crate::options::ConfigDraft;
use crate::uri::UriValue;
use crate::value::OptionValue;
use crate::warning::{Diagnostics, Warning};

fn coerce_kind<S: CoerceSource>(
    coercer: &S,
    kind: Kind,
    diags: &mut Diagnostics,
    key: &str,
    raw: &S::Raw,
) -> Option<Coerced> {
    match kind {
        Kind::Bool => coercer.boolean(diags, key, raw).map(Coerced::Bool),
        Kind::Str => coercer.string(diags, key, raw).map(Coerced::Str),
        Kind::Num => coercer.number(diags, key, raw).map(Coerced::Num),
        Kind::CompressorList => coercer.enum_list(diags, key, raw).map(Coerced::Compressors),
        Kind::CompressorOne => coercer.enum_member(diags, key, raw).map(Coerced::Compressor),
        Kind::ReadConcernLevelEnum => coercer
            .enum_member(diags, key, raw)
            .map(Coerced::ReadConcernLevel),
        Kind::AuthMechanismEnum => coercer
            .enum_member(diags, key, raw)
            .map(Coerced::AuthMechanism),
        Kind::LoggerLevelEnum => coercer.enum_member(diags, key, raw).map(Coerced::LoggerLevel),
        Kind::W => coercer.write_concern_w(diags, key, raw).map(Coerced::W),
        Kind::ReadConcernDoc => coercer.read_concern(diags, key, raw).map(Coerced::ReadConcern),
        Kind::AuthMechanismProps => coercer
            .auth_mechanism_properties(diags, key, raw)
            .map(Coerced::AuthMechanismProps),
        Kind::AuthDoc => coercer.auth(diags, key, raw).map(Coerced::Auth),
        Kind::Bytes => coercer.bytes(diags, key, raw).map(Coerced::Bytes),
        Kind::Function => coercer.function(diags, key, raw).map(Coerced::Function),
        Kind::Family => coercer.address_family(diags, key, raw).map(Coerced::Family),
        Kind::PkFactory => coercer.pk_factory(diags, key, raw).map(Coerced::PkFactory),
        Kind::PromiseLibrary => coercer
            .promise_library(diags, key, raw)
            .map(Coerced::PromiseLibrary),
        Kind::ReadPreferenceInput => coercer
            .read_preference_input(diags, key, raw)
            .map(Coerced::Viable),
        Kind::WriteConcernInput => coercer
            .write_concern_input(diags, key, raw)
            .map(Coerced::Viable),
        Kind::Unsupported => {
            diags.push(Warning::Unsupported {
                key: key.to_string(),
            });
            None
        }
    }
}

fn apply_bindings<S: CoerceSource>(
    coercer: &S,
    table: &[Binding],
    input: &BTreeMap<String, S::Raw>,
    draft: &mut ConfigDraft,
    diags: &mut Diagnostics,
    claimed: &mut BTreeSet<String>,
) {
    for binding in table {
        let Some(raw) = input.get(binding.key) else {
            continue;
        };
        claimed.insert(binding.key.to_string());

        // alias skipped when its canonical key was also authored
        if let Some(favored) = binding.favor
            && input.contains_key(favored)
        {
            continue;
        }

        if let Some(coerced) = coerce_kind(coercer, binding.kind, diags, binding.key, raw) {
            (binding.apply)(draft, coerced);
        }
    }
}

fn warn_unclaimed<V>(
    input: &BTreeMap<String, V>,
    claimed: &BTreeSet<String>,
    diags: &mut Diagnostics,
) {
    for key in input.keys() {
        if !claimed.contains(key) {
            diags.push(Warning::UnrecognizedKey { key: key.clone() });
        }
    }
}

/// Resolve a connection-string query against the connection-string table.
pub(crate) fn resolve_uri(
    query: &BTreeMap<String, UriValue>,
    draft: &mut ConfigDraft,
    diags: &mut Diagnostics,
) {
    let mut claimed = BTreeSet::new();
    apply_bindings(&UriCoercer, URI_BINDINGS, query, draft, diags, &mut claimed);
    warn_unclaimed(query, &claimed, diags);
}

/// Resolve programmatic options against both tables. Programmatic values
/// run after the connection string, so they override it field by field.
pub(crate) fn resolve_options(
    options: &BTreeMap<String, OptionValue>,
    draft: &mut ConfigDraft,
    diags: &mut Diagnostics,
) {
    let mut claimed = BTreeSet::new();
    apply_bindings(&ValueCoercer, URI_BINDINGS, options, draft, diags, &mut claimed);
    apply_bindings(&ValueCoercer, DRIVER_BINDINGS, options, draft, diags, &mut claimed);
    warn_unclaimed(options, &claimed, diags);
}
