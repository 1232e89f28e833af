//! The option vocabulary: enums, structured fragments, and the opaque
//! handle types for caller-supplied behavior (callbacks, factories).
//!
//! Enum spellings follow the wire vocabulary, not Rust conventions — an
//! authored `authMechanism=SCRAM-SHA-1` must round-trip through
//! [`OptionEnum::from_name`] and [`as_str`](AuthMechanism::as_str)
//! unchanged.

use std::fmt;
use std::sync::{Arc, LazyLock};

use bson::Bson;
use serde::Serialize;

/// An enum that can be named by an authored option value.
pub(crate) trait OptionEnum: Sized + Copy {
    /// Type name used in coercion warnings.
    const NAME: &'static str;

    fn from_name(name: &str) -> Option<Self>;
}

/// Wire compression algorithms.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Compressor {
    Snappy,
    Zlib,
    Zstd,
}

impl Compressor {
    pub fn as_str(self) -> &'static str {
        match self {
            Compressor::Snappy => "snappy",
            Compressor::Zlib => "zlib",
            Compressor::Zstd => "zstd",
        }
    }
}

impl OptionEnum for Compressor {
    const NAME: &'static str = "Compressor";

    fn from_name(name: &str) -> Option<Self> {
        match name {
            "snappy" => Some(Compressor::Snappy),
            "zlib" => Some(Compressor::Zlib),
            "zstd" => Some(Compressor::Zstd),
            _ => None,
        }
    }
}

/// Isolation level for read operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ReadConcernLevel {
    #[default]
    Local,
    Majority,
    Linearizable,
    Available,
}

impl ReadConcernLevel {
    pub fn as_str(self) -> &'static str {
        match self {
            ReadConcernLevel::Local => "local",
            ReadConcernLevel::Majority => "majority",
            ReadConcernLevel::Linearizable => "linearizable",
            ReadConcernLevel::Available => "available",
        }
    }
}

impl OptionEnum for ReadConcernLevel {
    const NAME: &'static str = "ReadConcernLevel";

    fn from_name(name: &str) -> Option<Self> {
        match name {
            "local" => Some(ReadConcernLevel::Local),
            "majority" => Some(ReadConcernLevel::Majority),
            "linearizable" => Some(ReadConcernLevel::Linearizable),
            "available" => Some(ReadConcernLevel::Available),
            _ => None,
        }
    }
}

/// Authentication mechanisms.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub enum AuthMechanism {
    #[serde(rename = "GSSAPI")]
    Gssapi,
    #[serde(rename = "MONGODB-AWS")]
    MongodbAws,
    #[serde(rename = "MONGODB-X509")]
    MongodbX509,
    #[serde(rename = "MONGODB-CR")]
    MongodbCr,
    #[serde(rename = "DEFAULT")]
    #[default]
    Default,
    #[serde(rename = "SCRAM-SHA-1")]
    ScramSha1,
    #[serde(rename = "SCRAM-SHA-256")]
    ScramSha256,
    #[serde(rename = "PLAIN")]
    Plain,
}

impl AuthMechanism {
    pub fn as_str(self) -> &'static str {
        match self {
            AuthMechanism::Gssapi => "GSSAPI",
            AuthMechanism::MongodbAws => "MONGODB-AWS",
            AuthMechanism::MongodbX509 => "MONGODB-X509",
            AuthMechanism::MongodbCr => "MONGODB-CR",
            AuthMechanism::Default => "DEFAULT",
            AuthMechanism::ScramSha1 => "SCRAM-SHA-1",
            AuthMechanism::ScramSha256 => "SCRAM-SHA-256",
            AuthMechanism::Plain => "PLAIN",
        }
    }

    /// Mechanisms that cannot authenticate without a username.
    pub fn requires_user(self) -> bool {
        matches!(
            self,
            AuthMechanism::Gssapi
                | AuthMechanism::MongodbCr
                | AuthMechanism::Plain
                | AuthMechanism::ScramSha1
                | AuthMechanism::ScramSha256
        )
    }
}

impl OptionEnum for AuthMechanism {
    const NAME: &'static str = "AuthMechanism";

    fn from_name(name: &str) -> Option<Self> {
        match name {
            "GSSAPI" => Some(AuthMechanism::Gssapi),
            "MONGODB-AWS" => Some(AuthMechanism::MongodbAws),
            "MONGODB-X509" => Some(AuthMechanism::MongodbX509),
            "MONGODB-CR" => Some(AuthMechanism::MongodbCr),
            "DEFAULT" => Some(AuthMechanism::Default),
            "SCRAM-SHA-1" => Some(AuthMechanism::ScramSha1),
            "SCRAM-SHA-256" => Some(AuthMechanism::ScramSha256),
            "PLAIN" => Some(AuthMechanism::Plain),
            _ => None,
        }
    }
}

/// Which replica members a read command may target.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum ReadPreferenceMode {
    #[default]
    Primary,
    PrimaryPreferred,
    Secondary,
    SecondaryPreferred,
    Nearest,
}

impl ReadPreferenceMode {
    pub fn as_str(self) -> &'static str {
        match self {
            ReadPreferenceMode::Primary => "primary",
            ReadPreferenceMode::PrimaryPreferred => "primaryPreferred",
            ReadPreferenceMode::Secondary => "secondary",
            ReadPreferenceMode::SecondaryPreferred => "secondaryPreferred",
            ReadPreferenceMode::Nearest => "nearest",
        }
    }
}

impl OptionEnum for ReadPreferenceMode {
    const NAME: &'static str = "ReadPreferenceMode";

    fn from_name(name: &str) -> Option<Self> {
        match name {
            "primary" => Some(ReadPreferenceMode::Primary),
            "primaryPreferred" => Some(ReadPreferenceMode::PrimaryPreferred),
            "secondary" => Some(ReadPreferenceMode::Secondary),
            "secondaryPreferred" => Some(ReadPreferenceMode::SecondaryPreferred),
            "nearest" => Some(ReadPreferenceMode::Nearest),
            _ => None,
        }
    }
}

/// Verbosity for the caller-supplied logger hook.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum LoggerLevel {
    #[default]
    Error,
    Warn,
    Info,
    Debug,
}

impl LoggerLevel {
    pub fn as_str(self) -> &'static str {
        match self {
            LoggerLevel::Error => "error",
            LoggerLevel::Warn => "warn",
            LoggerLevel::Info => "info",
            LoggerLevel::Debug => "debug",
        }
    }
}

impl OptionEnum for LoggerLevel {
    const NAME: &'static str = "LoggerLevel";

    fn from_name(name: &str) -> Option<Self> {
        match name {
            "error" => Some(LoggerLevel::Error),
            "warn" => Some(LoggerLevel::Warn),
            "info" => Some(LoggerLevel::Info),
            "debug" => Some(LoggerLevel::Debug),
            _ => None,
        }
    }
}

/// IP address family for socket creation. Absent means "either".
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AddressFamily {
    V4,
    V6,
}

impl AddressFamily {
    pub fn as_i64(self) -> i64 {
        match self {
            AddressFamily::V4 => 4,
            AddressFamily::V6 => 6,
        }
    }

    pub fn from_i64(value: i64) -> Option<Self> {
        match value {
            4 => Some(AddressFamily::V4),
            6 => Some(AddressFamily::V6),
            _ => None,
        }
    }
}

/// The `w` acknowledgment requirement: a member count or `"majority"`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum W {
    Number(i64),
    Majority,
}

impl W {
    pub(crate) fn to_bson(self) -> Bson {
        match self {
            W::Number(n) => Bson::Int64(n),
            W::Majority => Bson::String("majority".into()),
        }
    }
}

impl Default for W {
    fn default() -> Self {
        W::Number(1)
    }
}

impl Serialize for W {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            W::Number(n) => serializer.serialize_i64(*n),
            W::Majority => serializer.serialize_str("majority"),
        }
    }
}

/// Credentials supplied programmatically (never via the connection string).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Auth {
    pub user: Option<String>,
    pub pass: Option<String>,
}

impl Auth {
    pub fn is_empty(&self) -> bool {
        self.user.is_none() && self.pass.is_none()
    }
}

/// GSSAPI-related properties. A coerced fragment carries only the keys the
/// input actually supplied; merging overwrites nothing else.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthMechanismProperties {
    pub service_name: Option<String>,
    pub canonicalize_host_name: Option<bool>,
    pub service_realm: Option<String>,
}

impl Default for AuthMechanismProperties {
    fn default() -> Self {
        AuthMechanismProperties {
            service_name: None,
            canonicalize_host_name: Some(false),
            service_realm: None,
        }
    }
}

impl AuthMechanismProperties {
    /// Empty fragment, for accumulating coerced sub-keys.
    pub(crate) fn fragment() -> Self {
        AuthMechanismProperties {
            service_name: None,
            canonicalize_host_name: None,
            service_realm: None,
        }
    }

    /// Shallow-merge: only sub-keys present in `other` overwrite.
    pub(crate) fn merge(&mut self, other: AuthMechanismProperties) {
        if other.service_name.is_some() {
            self.service_name = other.service_name;
        }
        if other.canonicalize_host_name.is_some() {
            self.canonicalize_host_name = other.canonicalize_host_name;
        }
        if other.service_realm.is_some() {
            self.service_realm = other.service_realm;
        }
    }
}

/// A read-concern fragment; its `level` feeds the flat `readConcernLevel`
/// field rather than landing anywhere itself.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReadConcern {
    pub level: Option<ReadConcernLevel>,
}

/// A caller-supplied hook with no arguments (e.g. `checkServerIdentity`).
#[derive(Clone)]
pub struct Callback(Arc<dyn Fn() + Send + Sync>);

impl Callback {
    pub fn new(f: impl Fn() + Send + Sync + 'static) -> Self {
        Callback(Arc::new(f))
    }

    /// The shared do-nothing hook. Every call returns the same instance,
    /// so two defaulted configurations compare equal.
    pub fn noop() -> Self {
        static NOOP: LazyLock<Callback> = LazyLock::new(|| Callback(Arc::new(|| {})));
        NOOP.clone()
    }

    pub fn call(&self) {
        (self.0)()
    }
}

impl fmt::Debug for Callback {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Callback(<fn>)")
    }
}

impl PartialEq for Callback {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }
}

/// Generates custom primary keys for inserted documents.
pub trait PkFactory: Send + Sync {
    fn create_pk(&self) -> Bson;
}

/// Shared handle to a caller-supplied [`PkFactory`].
#[derive(Clone)]
pub struct PkFactoryHandle(Arc<dyn PkFactory>);

impl PkFactoryHandle {
    pub fn new(factory: impl PkFactory + 'static) -> Self {
        PkFactoryHandle(Arc::new(factory))
    }

    pub fn create_pk(&self) -> Bson {
        self.0.create_pk()
    }
}

impl fmt::Debug for PkFactoryHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("PkFactoryHandle(<factory>)")
    }
}

impl PartialEq for PkFactoryHandle {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }
}

/// A caller-supplied deferred-completion adapter: anything exposing a
/// then-like method that eventually runs the given continuation.
pub trait PromiseLibrary: Send + Sync {
    fn then(&self, complete: Box<dyn FnOnce() + Send>);
}

/// Shared handle to a caller-supplied [`PromiseLibrary`].
#[derive(Clone)]
pub struct PromiseLibraryHandle(Arc<dyn PromiseLibrary>);

impl PromiseLibraryHandle {
    pub fn new(library: impl PromiseLibrary + 'static) -> Self {
        PromiseLibraryHandle(Arc::new(library))
    }

    pub fn then(&self, complete: Box<dyn FnOnce() + Send>) {
        self.0.then(complete)
    }
}

impl fmt::Debug for PromiseLibraryHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("PromiseLibraryHandle(<library>)")
    }
}

impl PartialEq for PromiseLibraryHandle {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn enum_names_round_trip() {
        for name in ["snappy", "zlib", "zstd"] {
            assert_eq!(Compressor::from_name(name).unwrap().as_str(), name);
        }
        for name in ["local", "majority", "linearizable", "available"] {
            assert_eq!(ReadConcernLevel::from_name(name).unwrap().as_str(), name);
        }
        for name in [
            "primary",
            "primaryPreferred",
            "secondary",
            "secondaryPreferred",
            "nearest",
        ] {
            assert_eq!(ReadPreferenceMode::from_name(name).unwrap().as_str(), name);
        }
        for name in ["GSSAPI", "MONGODB-AWS", "SCRAM-SHA-256", "PLAIN"] {
            assert_eq!(AuthMechanism::from_name(name).unwrap().as_str(), name);
        }
    }

    #[test]
    fn unknown_enum_name_rejected() {
        assert!(Compressor::from_name("lz4").is_none());
        assert!(ReadPreferenceMode::from_name("Primary").is_none());
    }

    #[test]
    fn user_required_mechanisms() {
        assert!(AuthMechanism::Gssapi.requires_user());
        assert!(AuthMechanism::ScramSha256.requires_user());
        assert!(!AuthMechanism::Default.requires_user());
        assert!(!AuthMechanism::MongodbX509.requires_user());
    }

    #[test]
    fn address_family_values() {
        assert_eq!(AddressFamily::from_i64(4), Some(AddressFamily::V4));
        assert_eq!(AddressFamily::from_i64(6), Some(AddressFamily::V6));
        assert_eq!(AddressFamily::from_i64(5), None);
    }

    #[test]
    fn w_serializes_untagged() {
        assert_eq!(serde_json::to_string(&W::Number(3)).unwrap(), "3");
        assert_eq!(serde_json::to_string(&W::Majority).unwrap(), "\"majority\"");
    }

    #[test]
    fn mechanism_properties_merge_is_sparse() {
        let mut base = AuthMechanismProperties::default();
        let mut fragment = AuthMechanismProperties::fragment();
        fragment.service_name = Some("kerberos".into());
        base.merge(fragment);
        assert_eq!(base.service_name.as_deref(), Some("kerberos"));
        // untouched keys keep their previous values
        assert_eq!(base.canonicalize_host_name, Some(false));
    }
}
