//! The mutable configuration under construction.
//!
//! [`ConfigDraft`] is the single write target for both binding tables. It
//! starts from the documented defaults, each binding's apply hook mutates
//! exactly the fields it owns, and finalization consumes the draft into the
//! frozen [`ClientConfig`](crate::config::ClientConfig). Nothing outside
//! the resolution pipeline ever sees a draft.
//!
//! Aliased options share one field here: `j` writes `journal`, `poolSize`
//! writes `max_pool_size`, `appname` writes `app_name`, `ssl` writes
//! `tls`, `auto_reconnect` writes `autoReconnect`'s field. The frozen
//! config re-exposes the alias spellings as read-only views.

use bson::Bson;

use crate::types::{
    AddressFamily, Auth, AuthMechanismProperties, AuthMechanism, Callback, Compressor,
    LoggerLevel, PkFactoryHandle, PromiseLibraryHandle, ReadConcernLevel, W,
};

#[derive(Debug, Clone, PartialEq)]
pub(crate) struct ConfigDraft {
    pub(crate) replica_set: Option<String>,
    pub(crate) tls: bool,
    pub(crate) tls_certificate_key_file: Option<String>,
    pub(crate) tls_certificate_key_file_password: Option<String>,
    pub(crate) tls_ca_file: Option<String>,
    pub(crate) tls_allow_invalid_certificates: bool,
    pub(crate) tls_allow_invalid_hostnames: bool,
    pub(crate) tls_insecure: bool,
    pub(crate) connect_timeout_ms: i64,
    pub(crate) socket_timeout_ms: i64,
    pub(crate) compressors: Vec<Compressor>,
    pub(crate) zlib_compression_level: i64,
    pub(crate) max_pool_size: i64,
    pub(crate) min_pool_size: i64,
    pub(crate) max_idle_time_ms: Option<i64>,
    pub(crate) wait_queue_multiple: Option<i64>,
    pub(crate) wait_queue_timeout_ms: Option<i64>,
    pub(crate) w: W,
    pub(crate) wtimeout_ms: Option<i64>,
    pub(crate) journal: Option<bool>,
    pub(crate) read_concern_level: ReadConcernLevel,
    /// Raw read-preference viable, collapsed at finalization.
    pub(crate) read_preference: Option<Bson>,
    pub(crate) max_staleness_seconds: Option<i64>,
    pub(crate) auth_source: Option<String>,
    pub(crate) auth_mechanism: AuthMechanism,
    pub(crate) auth_mechanism_properties: AuthMechanismProperties,
    pub(crate) gssapi_service_name: Option<String>,
    pub(crate) local_threshold_ms: Option<i64>,
    pub(crate) server_selection_timeout_ms: Option<i64>,
    pub(crate) server_selection_try_once: bool,
    pub(crate) heartbeat_frequency_ms: Option<i64>,
    pub(crate) app_name: Option<String>,
    pub(crate) retry_writes: bool,
    pub(crate) direct_connection: bool,

    pub(crate) ssl_validate: bool,
    pub(crate) ssl_ca: Option<Vec<u8>>,
    pub(crate) ssl_cert: Option<Vec<u8>>,
    pub(crate) ssl_key: Option<Vec<u8>>,
    pub(crate) ssl_pass: Option<Vec<u8>>,
    pub(crate) ssl_crl: Option<Vec<u8>>,
    pub(crate) check_server_identity: Callback,
    pub(crate) auto_reconnect: bool,
    pub(crate) no_delay: bool,
    pub(crate) keep_alive: bool,
    pub(crate) keep_alive_initial_delay: i64,
    pub(crate) family: Option<AddressFamily>,
    pub(crate) reconnect_tries: i64,
    pub(crate) reconnect_interval: i64,
    pub(crate) ha: bool,
    pub(crate) ha_interval: i64,
    pub(crate) secondary_acceptable_latency_ms: i64,
    pub(crate) acceptable_latency_ms: i64,
    pub(crate) connect_with_no_primary: bool,
    /// Driver-side write-concern timeout, distinct from `wtimeoutMS`.
    pub(crate) wtimeout: Option<i64>,
    pub(crate) force_server_object_id: bool,
    pub(crate) serialize_functions: bool,
    pub(crate) ignore_undefined: bool,
    pub(crate) raw: bool,
    pub(crate) buffer_max_entries: i64,
    pub(crate) pk_factory: Option<PkFactoryHandle>,
    pub(crate) promise_library: Option<PromiseLibraryHandle>,
    pub(crate) logger_level: LoggerLevel,
    pub(crate) logger: Option<Callback>,
    pub(crate) promote_values: bool,
    pub(crate) promote_buffers: bool,
    pub(crate) promote_longs: bool,
    pub(crate) domains_enabled: bool,
    pub(crate) validate_options: bool,
    pub(crate) auth: Auth,
    pub(crate) fsync: bool,
    pub(crate) number_of_retries: i64,
    pub(crate) monitor_commands: bool,
    pub(crate) min_size: Option<i64>,
    pub(crate) use_new_url_parser: bool,
    pub(crate) use_unified_topology: bool,
    /// Raw write-concern viable, collapsed at finalization.
    pub(crate) write_concern: Option<Bson>,
}

impl Default for ConfigDraft {
    fn default() -> Self {
        ConfigDraft {
            replica_set: None,
            tls: false,
            tls_certificate_key_file: None,
            tls_certificate_key_file_password: None,
            tls_ca_file: None,
            tls_allow_invalid_certificates: false,
            tls_allow_invalid_hostnames: false,
            tls_insecure: false,
            connect_timeout_ms: 10_000,
            socket_timeout_ms: 360_000,
            compressors: Vec::new(),
            zlib_compression_level: 0,
            max_pool_size: 5,
            min_pool_size: 0,
            max_idle_time_ms: None,
            wait_queue_multiple: None,
            wait_queue_timeout_ms: None,
            w: W::default(),
            wtimeout_ms: None,
            journal: None,
            read_concern_level: ReadConcernLevel::default(),
            read_preference: None,
            max_staleness_seconds: None,
            auth_source: None,
            auth_mechanism: AuthMechanism::default(),
            auth_mechanism_properties: AuthMechanismProperties::default(),
            gssapi_service_name: None,
            local_threshold_ms: None,
            server_selection_timeout_ms: None,
            server_selection_try_once: true,
            heartbeat_frequency_ms: None,
            app_name: None,
            retry_writes: true,
            direct_connection: true,
            ssl_validate: false,
            ssl_ca: None,
            ssl_cert: None,
            ssl_key: None,
            ssl_pass: None,
            ssl_crl: None,
            check_server_identity: Callback::noop(),
            auto_reconnect: true,
            no_delay: true,
            keep_alive: true,
            keep_alive_initial_delay: 30_000,
            family: None,
            reconnect_tries: 30,
            reconnect_interval: 1_000,
            ha: true,
            ha_interval: 10_000,
            secondary_acceptable_latency_ms: 15,
            acceptable_latency_ms: 15,
            connect_with_no_primary: false,
            wtimeout: None,
            force_server_object_id: false,
            serialize_functions: false,
            ignore_undefined: false,
            raw: false,
            buffer_max_entries: -1,
            pk_factory: None,
            promise_library: None,
            logger_level: LoggerLevel::default(),
            logger: None,
            promote_values: true,
            promote_buffers: false,
            promote_longs: true,
            domains_enabled: false,
            validate_options: false,
            auth: Auth::default(),
            fsync: false,
            number_of_retries: 5,
            monitor_commands: false,
            min_size: None,
            use_new_url_parser: true,
            use_unified_topology: false,
            write_concern: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_documented_values() {
        let draft = ConfigDraft::default();
        assert!(!draft.tls);
        assert_eq!(draft.connect_timeout_ms, 10_000);
        assert_eq!(draft.socket_timeout_ms, 360_000);
        assert_eq!(draft.max_pool_size, 5);
        assert_eq!(draft.min_pool_size, 0);
        assert_eq!(draft.w, W::Number(1));
        assert_eq!(draft.journal, None);
        assert_eq!(draft.read_concern_level, ReadConcernLevel::Local);
        assert_eq!(draft.auth_mechanism, AuthMechanism::Default);
        assert!(draft.retry_writes);
        assert!(draft.direct_connection);
        assert!(draft.server_selection_try_once);
        assert_eq!(draft.buffer_max_entries, -1);
        assert_eq!(draft.keep_alive_initial_delay, 30_000);
        assert_eq!(draft.reconnect_tries, 30);
        assert_eq!(draft.number_of_retries, 5);
        assert!(draft.use_new_url_parser);
        assert!(!draft.use_unified_topology);
        assert_eq!(
            draft.auth_mechanism_properties.canonicalize_host_name,
            Some(false)
        );
    }
}
