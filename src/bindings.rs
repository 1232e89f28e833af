//! Declarative option-binding tables.
//!
//! Every recognized option is one [`Binding`]: its authored key, the
//! coercion [`Kind`] to run, an optional favored canonical key, and an
//! apply hook writing the coerced value into the draft. The interpreter in
//! [`resolve`](crate::resolve) walks these tables in declaration order, so
//! precedence between related options (`ssl` vs `tls`, `j` vs `journal`)
//! is a property of the table, never of input ordering.
//!
//! [`URI_BINDINGS`] covers the options a connection string may carry.
//! Programmatic options recognize those plus everything in
//! [`DRIVER_BINDINGS`].

use bson::Bson;

use crate::options::ConfigDraft;
use crate::types::{
    AddressFamily, Auth, AuthMechanism, AuthMechanismProperties, Callback, Compressor,
    LoggerLevel, PkFactoryHandle, PromiseLibraryHandle, ReadConcern, ReadConcernLevel, W,
};

/// Which coercion a binding runs. Mirrored one-to-one by [`Coerced`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Kind {
    Bool,
    Str,
    Num,
    CompressorList,
    CompressorOne,
    ReadConcernLevelEnum,
    AuthMechanismEnum,
    LoggerLevelEnum,
    W,
    ReadConcernDoc,
    AuthMechanismProps,
    AuthDoc,
    Bytes,
    Function,
    Family,
    PkFactory,
    PromiseLibrary,
    ReadPreferenceInput,
    WriteConcernInput,
    /// Recognized but deliberately not supported; warns and applies nothing.
    Unsupported,
}

/// A successfully coerced value, tagged with its kind.
#[derive(Debug, Clone)]
pub(crate) enum Coerced {
    Bool(bool),
    Str(String),
    Num(i64),
    Compressors(Vec<Compressor>),
    Compressor(Compressor),
    ReadConcernLevel(ReadConcernLevel),
    AuthMechanism(AuthMechanism),
    LoggerLevel(LoggerLevel),
    W(W),
    ReadConcern(ReadConcern),
    AuthMechanismProps(AuthMechanismProperties),
    Auth(Auth),
    Bytes(Vec<u8>),
    Function(Callback),
    Family(Option<AddressFamily>),
    PkFactory(PkFactoryHandle),
    PromiseLibrary(PromiseLibraryHandle),
    /// A raw read-preference or write-concern viable.
    Viable(Bson),
}

pub(crate) struct Binding {
    pub(crate) key: &'static str,
    pub(crate) kind: Kind,
    /// When the favored key is also present in the input, this binding is
    /// claimed but skipped. Canonical names win over their aliases.
    pub(crate) favor: Option<&'static str>,
    pub(crate) apply: fn(&mut ConfigDraft, Coerced),
}

impl Binding {
    const fn new(key: &'static str, kind: Kind, apply: fn(&mut ConfigDraft, Coerced)) -> Self {
        Binding { key, kind, favor: None, apply }
    }

    const fn favoring(
        key: &'static str,
        kind: Kind,
        favor: &'static str,
        apply: fn(&mut ConfigDraft, Coerced),
    ) -> Self {
        Binding { key, kind, favor: Some(favor), apply }
    }
}

fn no_apply(_: &mut ConfigDraft, _: Coerced) {}

/// Options a connection string may carry, in precedence order.
pub(crate) static URI_BINDINGS: &[Binding] = &[
    Binding::new("replicaSet", Kind::Str, |d, v| {
        if let Coerced::Str(s) = v {
            d.replica_set = Some(s);
        }
    }),
    Binding::favoring("ssl", Kind::Bool, "tls", |d, v| {
        if let Coerced::Bool(b) = v {
            d.tls = b;
        }
    }),
    Binding::new("tls", Kind::Bool, |d, v| {
        if let Coerced::Bool(b) = v {
            d.tls = b;
        }
    }),
    Binding::new("tlsCertificateKeyFile", Kind::Str, |d, v| {
        if let Coerced::Str(s) = v {
            d.tls_certificate_key_file = Some(s);
        }
    }),
    Binding::new("tlsCertificateKeyFilePassword", Kind::Str, |d, v| {
        if let Coerced::Str(s) = v {
            d.tls_certificate_key_file_password = Some(s);
        }
    }),
    Binding::new("tlsCAFile", Kind::Str, |d, v| {
        if let Coerced::Str(s) = v {
            d.tls_ca_file = Some(s);
        }
    }),
    Binding::new("tlsAllowInvalidCertificates", Kind::Bool, |d, v| {
        if let Coerced::Bool(b) = v {
            d.tls_allow_invalid_certificates = b;
        }
    }),
    Binding::new("tlsAllowInvalidHostnames", Kind::Bool, |d, v| {
        if let Coerced::Bool(b) = v {
            d.tls_allow_invalid_hostnames = b;
        }
    }),
    Binding::new("tlsInsecure", Kind::Bool, |d, v| {
        if let Coerced::Bool(b) = v {
            d.tls_insecure = b;
        }
    }),
    Binding::new("connectTimeoutMS", Kind::Num, |d, v| {
        if let Coerced::Num(n) = v {
            d.connect_timeout_ms = n;
        }
    }),
    Binding::new("socketTimeoutMS", Kind::Num, |d, v| {
        if let Coerced::Num(n) = v {
            d.socket_timeout_ms = n;
        }
    }),
    Binding::new("compressors", Kind::CompressorList, |d, v| {
        if let Coerced::Compressors(list) = v {
            d.compressors.extend(list);
        }
    }),
    Binding::new("zlibCompressionLevel", Kind::Num, |d, v| {
        if let Coerced::Num(n) = v {
            d.zlib_compression_level = n;
        }
    }),
    Binding::new("minPoolSize", Kind::Num, |d, v| {
        if let Coerced::Num(n) = v {
            d.min_pool_size = n;
        }
    }),
    Binding::new("maxPoolSize", Kind::Num, |d, v| {
        if let Coerced::Num(n) = v {
            d.max_pool_size = n;
        }
    }),
    Binding::new("maxIdleTimeMS", Kind::Num, |d, v| {
        if let Coerced::Num(n) = v {
            d.max_idle_time_ms = Some(n);
        }
    }),
    Binding::new("waitQueueMultiple", Kind::Num, |d, v| {
        if let Coerced::Num(n) = v {
            d.wait_queue_multiple = Some(n);
        }
    }),
    Binding::new("waitQueueTimeoutMS", Kind::Num, |d, v| {
        if let Coerced::Num(n) = v {
            d.wait_queue_timeout_ms = Some(n);
        }
    }),
    Binding::new("w", Kind::W, |d, v| {
        if let Coerced::W(w) = v {
            d.w = w;
        }
    }),
    Binding::new("wtimeoutMS", Kind::Num, |d, v| {
        if let Coerced::Num(n) = v {
            d.wtimeout_ms = Some(n);
        }
    }),
    Binding::new("journal", Kind::Bool, |d, v| {
        if let Coerced::Bool(b) = v {
            d.journal = Some(b);
        }
    }),
    Binding::new("readConcernLevel", Kind::ReadConcernLevelEnum, |d, v| {
        if let Coerced::ReadConcernLevel(level) = v {
            d.read_concern_level = level;
        }
    }),
    Binding::new("readPreference", Kind::ReadPreferenceInput, |d, v| {
        if let Coerced::Viable(viable) = v {
            d.read_preference = Some(viable);
        }
    }),
    Binding::new("maxStalenessSeconds", Kind::Num, |d, v| {
        if let Coerced::Num(n) = v {
            d.max_staleness_seconds = Some(n);
        }
    }),
    Binding::new("authSource", Kind::Str, |d, v| {
        if let Coerced::Str(s) = v {
            d.auth_source = Some(s);
        }
    }),
    Binding::new("authMechanism", Kind::AuthMechanismEnum, |d, v| {
        if let Coerced::AuthMechanism(mechanism) = v {
            d.auth_mechanism = mechanism;
        }
    }),
    Binding::new("authMechanismProperties", Kind::AuthMechanismProps, |d, v| {
        if let Coerced::AuthMechanismProps(fragment) = v {
            d.auth_mechanism_properties.merge(fragment);
        }
    }),
    Binding::new("gssapiServiceName", Kind::Str, |d, v| {
        if let Coerced::Str(s) = v {
            d.gssapi_service_name = Some(s);
        }
    }),
    Binding::new("localThresholdMS", Kind::Num, |d, v| {
        if let Coerced::Num(n) = v {
            d.local_threshold_ms = Some(n);
        }
    }),
    Binding::new("serverSelectionTimeoutMS", Kind::Num, |d, v| {
        if let Coerced::Num(n) = v {
            d.server_selection_timeout_ms = Some(n);
        }
    }),
    Binding::new("serverSelectionTryOnce", Kind::Bool, |d, v| {
        if let Coerced::Bool(b) = v {
            d.server_selection_try_once = b;
        }
    }),
    Binding::new("heartbeatFrequencyMS", Kind::Num, |d, v| {
        if let Coerced::Num(n) = v {
            d.heartbeat_frequency_ms = Some(n);
        }
    }),
    Binding::new("appName", Kind::Str, |d, v| {
        if let Coerced::Str(s) = v {
            d.app_name = Some(s);
        }
    }),
    Binding::new("retryWrites", Kind::Bool, |d, v| {
        if let Coerced::Bool(b) = v {
            d.retry_writes = b;
        }
    }),
    Binding::new("uuidRepresentation", Kind::Unsupported, no_apply),
    Binding::new("directConnection", Kind::Bool, |d, v| {
        if let Coerced::Bool(b) = v {
            d.direct_connection = b;
        }
    }),
];

/// Driver-only options, recognized for programmatic input after the
/// connection-string table has run.
pub(crate) static DRIVER_BINDINGS: &[Binding] = &[
    Binding::favoring("j", Kind::Bool, "journal", |d, v| {
        if let Coerced::Bool(b) = v {
            d.journal = Some(b);
        }
    }),
    Binding::new("autoReconnect", Kind::Bool, |d, v| {
        if let Coerced::Bool(b) = v {
            d.auto_reconnect = b;
        }
    }),
    Binding::favoring("auto_reconnect", Kind::Bool, "autoReconnect", |d, v| {
        if let Coerced::Bool(b) = v {
            d.auto_reconnect = b;
        }
    }),
    Binding::favoring("poolSize", Kind::Num, "maxPoolSize", |d, v| {
        if let Coerced::Num(n) = v {
            d.max_pool_size = n;
        }
    }),
    Binding::new("compression", Kind::CompressorOne, |d, v| {
        if let Coerced::Compressor(compressor) = v {
            d.compressors.push(compressor);
        }
    }),
    Binding::favoring("appname", Kind::Str, "appName", |d, v| {
        if let Coerced::Str(s) = v {
            d.app_name = Some(s);
        }
    }),
    Binding::new("readConcern", Kind::ReadConcernDoc, |d, v| {
        if let Coerced::ReadConcern(fragment) = v
            && let Some(level) = fragment.level
        {
            d.read_concern_level = level;
        }
    }),
    Binding::new("auth", Kind::AuthDoc, |d, v| {
        if let Coerced::Auth(auth) = v {
            d.auth = auth;
        }
    }),
    Binding::new("sslValidate", Kind::Bool, |d, v| {
        if let Coerced::Bool(b) = v {
            d.ssl_validate = b;
        }
    }),
    Binding::new("sslCA", Kind::Bytes, |d, v| {
        if let Coerced::Bytes(bytes) = v {
            d.ssl_ca = Some(bytes);
        }
    }),
    Binding::new("sslCert", Kind::Bytes, |d, v| {
        if let Coerced::Bytes(bytes) = v {
            d.ssl_cert = Some(bytes);
        }
    }),
    Binding::new("sslKey", Kind::Bytes, |d, v| {
        if let Coerced::Bytes(bytes) = v {
            d.ssl_key = Some(bytes);
        }
    }),
    Binding::new("sslPass", Kind::Bytes, |d, v| {
        if let Coerced::Bytes(bytes) = v {
            d.ssl_pass = Some(bytes);
        }
    }),
    Binding::new("sslCRL", Kind::Bytes, |d, v| {
        if let Coerced::Bytes(bytes) = v {
            d.ssl_crl = Some(bytes);
        }
    }),
    Binding::new("checkServerIdentity", Kind::Function, |d, v| {
        if let Coerced::Function(callback) = v {
            d.check_server_identity = callback;
        }
    }),
    Binding::new("noDelay", Kind::Bool, |d, v| {
        if let Coerced::Bool(b) = v {
            d.no_delay = b;
        }
    }),
    Binding::new("keepAlive", Kind::Bool, |d, v| {
        if let Coerced::Bool(b) = v {
            d.keep_alive = b;
        }
    }),
    Binding::new("keepAliveInitialDelay", Kind::Num, |d, v| {
        if let Coerced::Num(n) = v {
            d.keep_alive_initial_delay = n;
        }
    }),
    Binding::new("family", Kind::Family, |d, v| {
        if let Coerced::Family(family) = v {
            d.family = family;
        }
    }),
    Binding::new("reconnectTries", Kind::Num, |d, v| {
        if let Coerced::Num(n) = v {
            d.reconnect_tries = n;
        }
    }),
    Binding::new("reconnectInterval", Kind::Num, |d, v| {
        if let Coerced::Num(n) = v {
            d.reconnect_interval = n;
        }
    }),
    Binding::new("ha", Kind::Bool, |d, v| {
        if let Coerced::Bool(b) = v {
            d.ha = b;
        }
    }),
    Binding::new("haInterval", Kind::Num, |d, v| {
        if let Coerced::Num(n) = v {
            d.ha_interval = n;
        }
    }),
    Binding::new("secondaryAcceptableLatencyMS", Kind::Num, |d, v| {
        if let Coerced::Num(n) = v {
            d.secondary_acceptable_latency_ms = n;
        }
    }),
    Binding::new("acceptableLatencyMS", Kind::Num, |d, v| {
        if let Coerced::Num(n) = v {
            d.acceptable_latency_ms = n;
        }
    }),
    Binding::new("connectWithNoPrimary", Kind::Bool, |d, v| {
        if let Coerced::Bool(b) = v {
            d.connect_with_no_primary = b;
        }
    }),
    Binding::new("wtimeout", Kind::Num, |d, v| {
        if let Coerced::Num(n) = v {
            d.wtimeout = Some(n);
        }
    }),
    Binding::new("forceServerObjectId", Kind::Bool, |d, v| {
        if let Coerced::Bool(b) = v {
            d.force_server_object_id = b;
        }
    }),
    Binding::new("serializeFunctions", Kind::Bool, |d, v| {
        if let Coerced::Bool(b) = v {
            d.serialize_functions = b;
        }
    }),
    Binding::new("ignoreUndefined", Kind::Bool, |d, v| {
        if let Coerced::Bool(b) = v {
            d.ignore_undefined = b;
        }
    }),
    Binding::new("raw", Kind::Bool, |d, v| {
        if let Coerced::Bool(b) = v {
            d.raw = b;
        }
    }),
    Binding::new("bufferMaxEntries", Kind::Num, |d, v| {
        if let Coerced::Num(n) = v {
            d.buffer_max_entries = n;
        }
    }),
    Binding::new("pkFactory", Kind::PkFactory, |d, v| {
        if let Coerced::PkFactory(factory) = v {
            d.pk_factory = Some(factory);
        }
    }),
    Binding::new("promiseLibrary", Kind::PromiseLibrary, |d, v| {
        if let Coerced::PromiseLibrary(library) = v {
            d.promise_library = Some(library);
        }
    }),
    Binding::new("loggerLevel", Kind::LoggerLevelEnum, |d, v| {
        if let Coerced::LoggerLevel(level) = v {
            d.logger_level = level;
        }
    }),
    Binding::new("logger", Kind::Function, |d, v| {
        if let Coerced::Function(callback) = v {
            d.logger = Some(callback);
        }
    }),
    Binding::new("promoteValues", Kind::Bool, |d, v| {
        if let Coerced::Bool(b) = v {
            d.promote_values = b;
        }
    }),
    Binding::new("promoteBuffers", Kind::Bool, |d, v| {
        if let Coerced::Bool(b) = v {
            d.promote_buffers = b;
        }
    }),
    Binding::new("promoteLongs", Kind::Bool, |d, v| {
        if let Coerced::Bool(b) = v {
            d.promote_longs = b;
        }
    }),
    Binding::new("domainsEnabled", Kind::Bool, |d, v| {
        if let Coerced::Bool(b) = v {
            d.domains_enabled = b;
        }
    }),
    Binding::new("validateOptions", Kind::Bool, |d, v| {
        if let Coerced::Bool(b) = v {
            d.validate_options = b;
        }
    }),
    Binding::new("fsync", Kind::Bool, |d, v| {
        if let Coerced::Bool(b) = v {
            d.fsync = b;
        }
    }),
    Binding::new("numberOfRetries", Kind::Num, |d, v| {
        if let Coerced::Num(n) = v {
            d.number_of_retries = n;
        }
    }),
    Binding::new("monitorCommands", Kind::Bool, |d, v| {
        if let Coerced::Bool(b) = v {
            d.monitor_commands = b;
        }
    }),
    Binding::new("minSize", Kind::Num, |d, v| {
        if let Coerced::Num(n) = v {
            d.min_size = Some(n);
        }
    }),
    Binding::new("useNewUrlParser", Kind::Bool, |d, v| {
        if let Coerced::Bool(b) = v {
            d.use_new_url_parser = b;
        }
    }),
    Binding::new("useUnifiedTopology", Kind::Bool, |d, v| {
        if let Coerced::Bool(b) = v {
            d.use_unified_topology = b;
        }
    }),
    Binding::new("writeConcern", Kind::WriteConcernInput, |d, v| {
        if let Coerced::Viable(viable) = v {
            d.write_concern = Some(viable);
        }
    }),
];
