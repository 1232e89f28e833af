//! The shared coercion contract.
//!
//! Two strategies implement one capability set: [`UriCoercer`] works on
//! connection-string values (everything starts as text) and
//! [`ValueCoercer`] works on programmatic [`OptionValue`]s (already typed,
//! so coercion is validation). The binding interpreter is generic over
//! [`CoerceSource`], which is what keeps the two tables' behavior in
//! lockstep — adding a kind here forces both strategies to decide how they
//! handle it.
//!
//! No coercion ever fails the whole resolution. A bad value produces a
//! [`Warning`] and an absent result; the target field keeps its default.
//!
//! [`UriCoercer`]: crate::coerce_uri::UriCoercer
//! [`ValueCoercer`]: crate::coerce_value::ValueCoercer
//! [`OptionValue`]: crate::value::OptionValue

use bson::Bson;

use crate::types::{
    AddressFamily, Auth, AuthMechanismProperties, Callback, OptionEnum, PkFactoryHandle,
    PromiseLibraryHandle, ReadConcern, W,
};
use crate::warning::{Diagnostics, Warning};

/// One coercion strategy: raw input of `Self::Raw`, validated output per
/// method. `None` always means "warned and degraded", except for
/// [`address_family`](Self::address_family), where the degraded result is
/// an explicit null (`Some(None)`).
pub(crate) trait CoerceSource {
    type Raw;

    fn boolean(&self, diags: &mut Diagnostics, key: &str, raw: &Self::Raw) -> Option<bool>;
    fn string(&self, diags: &mut Diagnostics, key: &str, raw: &Self::Raw) -> Option<String>;
    fn number(&self, diags: &mut Diagnostics, key: &str, raw: &Self::Raw) -> Option<i64>;

    fn enum_member<E: OptionEnum>(
        &self,
        diags: &mut Diagnostics,
        key: &str,
        raw: &Self::Raw,
    ) -> Option<E>;

    /// Coerce a sequence of enum members, warning per invalid element and
    /// keeping the valid ones.
    fn enum_list<E: OptionEnum>(
        &self,
        diags: &mut Diagnostics,
        key: &str,
        raw: &Self::Raw,
    ) -> Option<Vec<E>>;

    /// The `w` literal: a number, or the word `"majority"`.
    fn write_concern_w(&self, diags: &mut Diagnostics, key: &str, raw: &Self::Raw) -> Option<W>;

    /// A `{level}` fragment. Not expressible in a connection string.
    fn read_concern(
        &self,
        diags: &mut Diagnostics,
        key: &str,
        raw: &Self::Raw,
    ) -> Option<ReadConcern>;

    fn auth_mechanism_properties(
        &self,
        diags: &mut Diagnostics,
        key: &str,
        raw: &Self::Raw,
    ) -> Option<AuthMechanismProperties>;

    /// A credentials fragment. Not expressible in a connection string.
    fn auth(&self, diags: &mut Diagnostics, key: &str, raw: &Self::Raw) -> Option<Auth>;

    fn bytes(&self, diags: &mut Diagnostics, key: &str, raw: &Self::Raw) -> Option<Vec<u8>>;
    fn function(&self, diags: &mut Diagnostics, key: &str, raw: &Self::Raw) -> Option<Callback>;

    /// `4`, `6`, or null. Invalid input warns and resolves to null.
    fn address_family(
        &self,
        diags: &mut Diagnostics,
        key: &str,
        raw: &Self::Raw,
    ) -> Option<Option<AddressFamily>>;

    fn pk_factory(
        &self,
        diags: &mut Diagnostics,
        key: &str,
        raw: &Self::Raw,
    ) -> Option<PkFactoryHandle>;

    fn promise_library(
        &self,
        diags: &mut Diagnostics,
        key: &str,
        raw: &Self::Raw,
    ) -> Option<PromiseLibraryHandle>;

    /// A read-preference viable: a bare mode string or a structured
    /// fragment, passed through raw for the derived resolver to collapse.
    fn read_preference_input(
        &self,
        diags: &mut Diagnostics,
        key: &str,
        raw: &Self::Raw,
    ) -> Option<Bson>;

    /// A write-concern viable document, passed through raw.
    fn write_concern_input(
        &self,
        diags: &mut Diagnostics,
        key: &str,
        raw: &Self::Raw,
    ) -> Option<Bson>;
}

/// Warn about every sub-key of a structured fragment outside its declared
/// shape. Recognized sub-keys still apply; unknown ones only warn.
pub(crate) fn validate_keys<'a>(
    diags: &mut Diagnostics,
    key: &str,
    kind: &'static str,
    allowed: &[&str],
    present: impl IntoIterator<Item = &'a str>,
) {
    for sub_key in present {
        if !allowed.contains(&sub_key) {
            diags.push(Warning::UnrecognizedProperty {
                key: key.to_string(),
                kind,
                property: sub_key.to_string(),
            });
        }
    }
}
