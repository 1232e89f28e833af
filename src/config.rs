//! Resolution of a frozen [`ClientConfig`].
//!
//! The pipeline is: parse the connection-string query, overlay the
//! programmatic options, then finalize — derive the effective read
//! preference and write concern, translate the TLS shorthands onto the
//! legacy ssl fields, and validate the auth selection. The result is
//! immutable by construction: every field is private and nothing offers
//! mutation, so sharing a config across the client hierarchy is safe.
//!
//! Resolution itself never fails; problems surface as [`Warning`]s on the
//! returned [`Resolution`]. The asynchronous variant additionally runs the
//! TLS-file and DNS phases before freezing, and those may fail.

use bson::{Bson, Document, doc};

use crate::builder::ConfigBuilder;
use crate::error::ClientError;
use crate::options::ConfigDraft;
use crate::read_preference::{ReadPreference, read_preference};
use crate::resolve::{resolve_options, resolve_uri};
use crate::types::{
    AddressFamily, Auth, AuthMechanism, AuthMechanismProperties, Callback, Compressor,
    LoggerLevel, PkFactoryHandle, PromiseLibraryHandle, ReadConcernLevel, W,
};
use crate::uri::parse_query;
use crate::value::{OptionValue, OptionsMap};
use crate::warning::{Diagnostics, Warning};
use crate::write_concern::{WriteConcern, write_concern};

/// A resolved configuration plus everything worth telling the caller about.
#[derive(Debug)]
pub struct Resolution {
    pub config: ClientConfig,
    pub warnings: Vec<Warning>,
}

/// The frozen client configuration.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    fields: ConfigDraft,
    read_preference: ReadPreference,
    write_concern: Option<WriteConcern>,
}

pub(crate) fn parse_parts(
    connection_string: Option<&str>,
    options: &OptionsMap,
    silent: bool,
) -> Resolution {
    let mut draft = ConfigDraft::default();
    let mut diags = Diagnostics::new(silent);

    if let Some(connection_string) = connection_string {
        resolve_uri(&parse_query(connection_string), &mut draft, &mut diags);
    }
    resolve_options(options, &mut draft, &mut diags);

    finalize(draft, diags)
}

pub(crate) async fn parse_parts_async(
    connection_string: Option<&str>,
    options: &OptionsMap,
    silent: bool,
) -> Result<Resolution, ClientError> {
    let mut draft = ConfigDraft::default();
    let mut diags = Diagnostics::new(silent);

    if let Some(connection_string) = connection_string {
        resolve_uri(&parse_query(connection_string), &mut draft, &mut diags);
    }
    resolve_options(options, &mut draft, &mut diags);

    // derive, translate, and validate first; the async phases then see
    // normalized fields, and nothing freezes until both complete
    let (read_preference, write_concern) = after_parse(&mut draft, &mut diags);
    resolve_tls_files(&draft).await?;
    dns_check(&draft).await?;

    Ok(freeze(draft, read_preference, write_concern, diags))
}

fn finalize(mut draft: ConfigDraft, mut diags: Diagnostics) -> Resolution {
    let (read_preference, write_concern) = after_parse(&mut draft, &mut diags);
    freeze(draft, read_preference, write_concern, diags)
}

fn after_parse(
    draft: &mut ConfigDraft,
    diags: &mut Diagnostics,
) -> (ReadPreference, Option<WriteConcern>) {
    let read_preference = read_preference(&Bson::Document(read_preference_viable(draft)));
    let write_concern = write_concern(&Bson::Document(write_concern_viable(draft)));

    translate_tls(draft);
    validate_auth(draft, diags);

    (read_preference, write_concern)
}

fn freeze(
    draft: ConfigDraft,
    read_preference: ReadPreference,
    write_concern: Option<WriteConcern>,
    diags: Diagnostics,
) -> Resolution {
    Resolution {
        config: ClientConfig {
            fields: draft,
            read_preference,
            write_concern,
        },
        warnings: diags.into_warnings(),
    }
}

fn read_preference_viable(draft: &ConfigDraft) -> Document {
    let mut viable = doc! {};
    if let Some(rp) = &draft.read_preference {
        viable.insert("readPreference", rp.clone());
    }
    if let Some(seconds) = draft.max_staleness_seconds {
        viable.insert("maxStalenessSeconds", seconds);
    }
    viable
}

fn write_concern_viable(draft: &ConfigDraft) -> Document {
    // `wtimeout` here is the driver field; `wtimeoutMS` stays out of the
    // derived concern and only travels through the flat option
    let mut viable = doc! { "w": draft.w.to_bson() };
    if let Some(journal) = draft.journal {
        viable.insert("journal", journal);
    }
    if let Some(wtimeout) = draft.wtimeout {
        viable.insert("wtimeout", wtimeout);
    }
    if let Some(nested) = &draft.write_concern {
        viable.insert("writeConcern", nested.clone());
    }
    viable
}

fn translate_tls(draft: &mut ConfigDraft) {
    if draft.tls_insecure {
        draft.check_server_identity = Callback::noop();
        draft.ssl_validate = false;
    } else {
        draft.ssl_validate = draft.tls_allow_invalid_certificates;
    }
}

fn validate_auth(draft: &ConfigDraft, diags: &mut Diagnostics) {
    if draft.auth_mechanism.requires_user() && draft.auth.user.is_none() {
        diags.push(Warning::MissingUser {
            mechanism: draft.auth_mechanism.as_str().to_string(),
        });
    }
}

async fn resolve_tls_files(draft: &ConfigDraft) -> Result<(), ClientError> {
    // placeholder for reading tlsCAFile / tlsCertificateKeyFile contents
    if let Some(path) = &draft.tls_ca_file {
        tracing::debug!(target: "docdb::config", path, "tls file resolution");
    }
    Ok(())
}

async fn dns_check(draft: &ConfigDraft) -> Result<(), ClientError> {
    // placeholder for SRV/hostname verification
    if let Some(replica_set) = &draft.replica_set {
        tracing::debug!(target: "docdb::config", replica_set, "dns check");
    }
    Ok(())
}

impl ClientConfig {
    pub fn builder() -> ConfigBuilder {
        ConfigBuilder::new()
    }

    /// Parse a connection string and programmatic options in one call.
    pub fn parse(connection_string: &str, options: OptionsMap) -> Resolution {
        parse_parts(Some(connection_string), &options, false)
    }

    // ----- derived values -----

    pub fn read_preference(&self) -> &ReadPreference {
        &self.read_preference
    }

    pub fn write_concern(&self) -> Option<&WriteConcern> {
        self.write_concern.as_ref()
    }

    // ----- connection-string options -----

    pub fn replica_set(&self) -> Option<&str> {
        self.fields.replica_set.as_deref()
    }

    pub fn tls(&self) -> bool {
        self.fields.tls
    }

    /// Alias view of [`tls`](Self::tls).
    pub fn ssl(&self) -> bool {
        self.fields.tls
    }

    pub fn tls_certificate_key_file(&self) -> Option<&str> {
        self.fields.tls_certificate_key_file.as_deref()
    }

    pub fn tls_certificate_key_file_password(&self) -> Option<&str> {
        self.fields.tls_certificate_key_file_password.as_deref()
    }

    pub fn tls_ca_file(&self) -> Option<&str> {
        self.fields.tls_ca_file.as_deref()
    }

    pub fn tls_allow_invalid_certificates(&self) -> bool {
        self.fields.tls_allow_invalid_certificates
    }

    pub fn tls_allow_invalid_hostnames(&self) -> bool {
        self.fields.tls_allow_invalid_hostnames
    }

    pub fn tls_insecure(&self) -> bool {
        self.fields.tls_insecure
    }

    pub fn connect_timeout_ms(&self) -> i64 {
        self.fields.connect_timeout_ms
    }

    pub fn socket_timeout_ms(&self) -> i64 {
        self.fields.socket_timeout_ms
    }

    pub fn compressors(&self) -> &[Compressor] {
        &self.fields.compressors
    }

    pub fn zlib_compression_level(&self) -> i64 {
        self.fields.zlib_compression_level
    }

    pub fn max_pool_size(&self) -> i64 {
        self.fields.max_pool_size
    }

    /// Alias view of [`max_pool_size`](Self::max_pool_size).
    pub fn pool_size(&self) -> i64 {
        self.fields.max_pool_size
    }

    pub fn min_pool_size(&self) -> i64 {
        self.fields.min_pool_size
    }

    pub fn max_idle_time_ms(&self) -> Option<i64> {
        self.fields.max_idle_time_ms
    }

    pub fn wait_queue_multiple(&self) -> Option<i64> {
        self.fields.wait_queue_multiple
    }

    pub fn wait_queue_timeout_ms(&self) -> Option<i64> {
        self.fields.wait_queue_timeout_ms
    }

    pub fn w(&self) -> W {
        self.fields.w
    }

    pub fn wtimeout_ms(&self) -> Option<i64> {
        self.fields.wtimeout_ms
    }

    pub fn journal(&self) -> Option<bool> {
        self.fields.journal
    }

    /// Alias view of [`journal`](Self::journal).
    pub fn j(&self) -> Option<bool> {
        self.fields.journal
    }

    pub fn read_concern_level(&self) -> ReadConcernLevel {
        self.fields.read_concern_level
    }

    pub fn max_staleness_seconds(&self) -> Option<i64> {
        self.fields.max_staleness_seconds
    }

    pub fn auth_source(&self) -> Option<&str> {
        self.fields.auth_source.as_deref()
    }

    pub fn auth_mechanism(&self) -> AuthMechanism {
        self.fields.auth_mechanism
    }

    pub fn auth_mechanism_properties(&self) -> &AuthMechanismProperties {
        &self.fields.auth_mechanism_properties
    }

    pub fn gssapi_service_name(&self) -> Option<&str> {
        self.fields.gssapi_service_name.as_deref()
    }

    pub fn local_threshold_ms(&self) -> Option<i64> {
        self.fields.local_threshold_ms
    }

    pub fn server_selection_timeout_ms(&self) -> Option<i64> {
        self.fields.server_selection_timeout_ms
    }

    pub fn server_selection_try_once(&self) -> bool {
        self.fields.server_selection_try_once
    }

    pub fn heartbeat_frequency_ms(&self) -> Option<i64> {
        self.fields.heartbeat_frequency_ms
    }

    pub fn app_name(&self) -> Option<&str> {
        self.fields.app_name.as_deref()
    }

    /// Alias view of [`app_name`](Self::app_name).
    pub fn appname(&self) -> Option<&str> {
        self.fields.app_name.as_deref()
    }

    pub fn retry_writes(&self) -> bool {
        self.fields.retry_writes
    }

    pub fn direct_connection(&self) -> bool {
        self.fields.direct_connection
    }

    // ----- driver options -----

    pub fn ssl_validate(&self) -> bool {
        self.fields.ssl_validate
    }

    pub fn ssl_ca(&self) -> Option<&[u8]> {
        self.fields.ssl_ca.as_deref()
    }

    pub fn ssl_cert(&self) -> Option<&[u8]> {
        self.fields.ssl_cert.as_deref()
    }

    pub fn ssl_key(&self) -> Option<&[u8]> {
        self.fields.ssl_key.as_deref()
    }

    pub fn ssl_pass(&self) -> Option<&[u8]> {
        self.fields.ssl_pass.as_deref()
    }

    pub fn ssl_crl(&self) -> Option<&[u8]> {
        self.fields.ssl_crl.as_deref()
    }

    pub fn check_server_identity(&self) -> &Callback {
        &self.fields.check_server_identity
    }

    pub fn auto_reconnect(&self) -> bool {
        self.fields.auto_reconnect
    }

    pub fn no_delay(&self) -> bool {
        self.fields.no_delay
    }

    pub fn keep_alive(&self) -> bool {
        self.fields.keep_alive
    }

    pub fn keep_alive_initial_delay(&self) -> i64 {
        self.fields.keep_alive_initial_delay
    }

    pub fn family(&self) -> Option<AddressFamily> {
        self.fields.family
    }

    pub fn reconnect_tries(&self) -> i64 {
        self.fields.reconnect_tries
    }

    pub fn reconnect_interval(&self) -> i64 {
        self.fields.reconnect_interval
    }

    pub fn ha(&self) -> bool {
        self.fields.ha
    }

    pub fn ha_interval(&self) -> i64 {
        self.fields.ha_interval
    }

    pub fn secondary_acceptable_latency_ms(&self) -> i64 {
        self.fields.secondary_acceptable_latency_ms
    }

    pub fn acceptable_latency_ms(&self) -> i64 {
        self.fields.acceptable_latency_ms
    }

    pub fn connect_with_no_primary(&self) -> bool {
        self.fields.connect_with_no_primary
    }

    pub fn wtimeout(&self) -> Option<i64> {
        self.fields.wtimeout
    }

    pub fn force_server_object_id(&self) -> bool {
        self.fields.force_server_object_id
    }

    pub fn serialize_functions(&self) -> bool {
        self.fields.serialize_functions
    }

    pub fn ignore_undefined(&self) -> bool {
        self.fields.ignore_undefined
    }

    pub fn raw(&self) -> bool {
        self.fields.raw
    }

    pub fn buffer_max_entries(&self) -> i64 {
        self.fields.buffer_max_entries
    }

    pub fn pk_factory(&self) -> Option<&PkFactoryHandle> {
        self.fields.pk_factory.as_ref()
    }

    pub fn promise_library(&self) -> Option<&PromiseLibraryHandle> {
        self.fields.promise_library.as_ref()
    }

    pub fn logger_level(&self) -> LoggerLevel {
        self.fields.logger_level
    }

    pub fn logger(&self) -> Option<&Callback> {
        self.fields.logger.as_ref()
    }

    pub fn promote_values(&self) -> bool {
        self.fields.promote_values
    }

    pub fn promote_buffers(&self) -> bool {
        self.fields.promote_buffers
    }

    pub fn promote_longs(&self) -> bool {
        self.fields.promote_longs
    }

    pub fn domains_enabled(&self) -> bool {
        self.fields.domains_enabled
    }

    pub fn validate_options(&self) -> bool {
        self.fields.validate_options
    }

    pub fn auth(&self) -> &Auth {
        &self.fields.auth
    }

    pub fn fsync(&self) -> bool {
        self.fields.fsync
    }

    pub fn number_of_retries(&self) -> i64 {
        self.fields.number_of_retries
    }

    pub fn monitor_commands(&self) -> bool {
        self.fields.monitor_commands
    }

    pub fn min_size(&self) -> Option<i64> {
        self.fields.min_size
    }

    pub fn use_new_url_parser(&self) -> bool {
        self.fields.use_new_url_parser
    }

    pub fn use_unified_topology(&self) -> bool {
        self.fields.use_unified_topology
    }

    /// Re-export every option under its canonical name, suitable for
    /// re-parsing. Alias spellings never appear; derived read preference
    /// and write concern appear in their resolved document forms.
    pub fn export(&self) -> OptionsMap {
        let f = &self.fields;
        let mut out = OptionsMap::new();

        if let Some(v) = &f.replica_set {
            out.insert("replicaSet".into(), v.clone().into());
        }
        out.insert("tls".into(), f.tls.into());
        if let Some(v) = &f.tls_certificate_key_file {
            out.insert("tlsCertificateKeyFile".into(), v.clone().into());
        }
        if let Some(v) = &f.tls_certificate_key_file_password {
            out.insert("tlsCertificateKeyFilePassword".into(), v.clone().into());
        }
        if let Some(v) = &f.tls_ca_file {
            out.insert("tlsCAFile".into(), v.clone().into());
        }
        out.insert(
            "tlsAllowInvalidCertificates".into(),
            f.tls_allow_invalid_certificates.into(),
        );
        out.insert(
            "tlsAllowInvalidHostnames".into(),
            f.tls_allow_invalid_hostnames.into(),
        );
        out.insert("tlsInsecure".into(), f.tls_insecure.into());
        out.insert("connectTimeoutMS".into(), f.connect_timeout_ms.into());
        out.insert("socketTimeoutMS".into(), f.socket_timeout_ms.into());
        out.insert(
            "compressors".into(),
            f.compressors
                .iter()
                .map(|c| OptionValue::from(c.as_str()))
                .collect::<Vec<_>>()
                .into(),
        );
        out.insert("zlibCompressionLevel".into(), f.zlib_compression_level.into());
        out.insert("maxPoolSize".into(), f.max_pool_size.into());
        out.insert("minPoolSize".into(), f.min_pool_size.into());
        if let Some(v) = f.max_idle_time_ms {
            out.insert("maxIdleTimeMS".into(), v.into());
        }
        if let Some(v) = f.wait_queue_multiple {
            out.insert("waitQueueMultiple".into(), v.into());
        }
        if let Some(v) = f.wait_queue_timeout_ms {
            out.insert("waitQueueTimeoutMS".into(), v.into());
        }
        out.insert(
            "w".into(),
            match f.w {
                W::Number(n) => n.into(),
                W::Majority => "majority".into(),
            },
        );
        if let Some(v) = f.wtimeout_ms {
            out.insert("wtimeoutMS".into(), v.into());
        }
        if let Some(v) = f.journal {
            out.insert("journal".into(), v.into());
        }
        out.insert(
            "readConcernLevel".into(),
            f.read_concern_level.as_str().into(),
        );
        out.insert(
            "readPreference".into(),
            self.read_preference.to_document().into(),
        );
        if let Some(v) = f.max_staleness_seconds {
            out.insert("maxStalenessSeconds".into(), v.into());
        }
        if let Some(v) = &f.auth_source {
            out.insert("authSource".into(), v.clone().into());
        }
        out.insert("authMechanism".into(), f.auth_mechanism.as_str().into());
        let mut mechanism_properties = doc! {};
        if let Some(v) = &f.auth_mechanism_properties.service_name {
            mechanism_properties.insert("SERVICE_NAME", v.clone());
        }
        if let Some(v) = f.auth_mechanism_properties.canonicalize_host_name {
            mechanism_properties.insert("CANONICALIZE_HOST_NAME", v);
        }
        if let Some(v) = &f.auth_mechanism_properties.service_realm {
            mechanism_properties.insert("SERVICE_REALM", v.clone());
        }
        out.insert(
            "authMechanismProperties".into(),
            mechanism_properties.into(),
        );
        if let Some(v) = &f.gssapi_service_name {
            out.insert("gssapiServiceName".into(), v.clone().into());
        }
        if let Some(v) = f.local_threshold_ms {
            out.insert("localThresholdMS".into(), v.into());
        }
        if let Some(v) = f.server_selection_timeout_ms {
            out.insert("serverSelectionTimeoutMS".into(), v.into());
        }
        out.insert(
            "serverSelectionTryOnce".into(),
            f.server_selection_try_once.into(),
        );
        if let Some(v) = f.heartbeat_frequency_ms {
            out.insert("heartbeatFrequencyMS".into(), v.into());
        }
        if let Some(v) = &f.app_name {
            out.insert("appName".into(), v.clone().into());
        }
        out.insert("retryWrites".into(), f.retry_writes.into());
        out.insert("directConnection".into(), f.direct_connection.into());

        out.insert("sslValidate".into(), f.ssl_validate.into());
        if let Some(v) = &f.ssl_ca {
            out.insert("sslCA".into(), OptionValue::Bytes(v.clone()));
        }
        if let Some(v) = &f.ssl_cert {
            out.insert("sslCert".into(), OptionValue::Bytes(v.clone()));
        }
        if let Some(v) = &f.ssl_key {
            out.insert("sslKey".into(), OptionValue::Bytes(v.clone()));
        }
        if let Some(v) = &f.ssl_pass {
            out.insert("sslPass".into(), OptionValue::Bytes(v.clone()));
        }
        if let Some(v) = &f.ssl_crl {
            out.insert("sslCRL".into(), OptionValue::Bytes(v.clone()));
        }
        out.insert(
            "checkServerIdentity".into(),
            f.check_server_identity.clone().into(),
        );
        out.insert("autoReconnect".into(), f.auto_reconnect.into());
        out.insert("noDelay".into(), f.no_delay.into());
        out.insert("keepAlive".into(), f.keep_alive.into());
        out.insert(
            "keepAliveInitialDelay".into(),
            f.keep_alive_initial_delay.into(),
        );
        if let Some(v) = f.family {
            out.insert("family".into(), v.as_i64().into());
        }
        out.insert("reconnectTries".into(), f.reconnect_tries.into());
        out.insert("reconnectInterval".into(), f.reconnect_interval.into());
        out.insert("ha".into(), f.ha.into());
        out.insert("haInterval".into(), f.ha_interval.into());
        out.insert(
            "secondaryAcceptableLatencyMS".into(),
            f.secondary_acceptable_latency_ms.into(),
        );
        out.insert("acceptableLatencyMS".into(), f.acceptable_latency_ms.into());
        out.insert(
            "connectWithNoPrimary".into(),
            f.connect_with_no_primary.into(),
        );
        if let Some(v) = f.wtimeout {
            out.insert("wtimeout".into(), v.into());
        }
        out.insert("forceServerObjectId".into(), f.force_server_object_id.into());
        out.insert("serializeFunctions".into(), f.serialize_functions.into());
        out.insert("ignoreUndefined".into(), f.ignore_undefined.into());
        out.insert("raw".into(), f.raw.into());
        out.insert("bufferMaxEntries".into(), f.buffer_max_entries.into());
        if let Some(v) = &f.pk_factory {
            out.insert("pkFactory".into(), v.clone().into());
        }
        if let Some(v) = &f.promise_library {
            out.insert("promiseLibrary".into(), v.clone().into());
        }
        out.insert("loggerLevel".into(), f.logger_level.as_str().into());
        if let Some(v) = &f.logger {
            out.insert("logger".into(), v.clone().into());
        }
        out.insert("promoteValues".into(), f.promote_values.into());
        out.insert("promoteBuffers".into(), f.promote_buffers.into());
        out.insert("promoteLongs".into(), f.promote_longs.into());
        out.insert("domainsEnabled".into(), f.domains_enabled.into());
        out.insert("validateOptions".into(), f.validate_options.into());
        if !f.auth.is_empty() {
            let mut auth = doc! {};
            if let Some(user) = &f.auth.user {
                auth.insert("user", user.clone());
            }
            if let Some(pass) = &f.auth.pass {
                auth.insert("pass", pass.clone());
            }
            out.insert("auth".into(), auth.into());
        }
        out.insert("fsync".into(), f.fsync.into());
        out.insert("numberOfRetries".into(), f.number_of_retries.into());
        out.insert("monitorCommands".into(), f.monitor_commands.into());
        if let Some(v) = f.min_size {
            out.insert("minSize".into(), v.into());
        }
        out.insert("useNewUrlParser".into(), f.use_new_url_parser.into());
        out.insert("useUnifiedTopology".into(), f.use_unified_topology.into());
        if let Some(wc) = &self.write_concern {
            out.insert("writeConcern".into(), wc.to_document().into());
        }

        out
    }

    /// Re-resolve with field overrides on top of this config's export.
    /// The receiving config is untouched.
    pub fn clone_with(&self, overrides: OptionsMap) -> Resolution {
        let mut merged = self.export();
        merged.extend(overrides);
        parse_parts(None, &merged, false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::ReadPreferenceMode;
    use bson::doc;

    fn parse(connection_string: &str, options: OptionsMap) -> Resolution {
        parse_parts(Some(connection_string), &options, false)
    }

    #[test]
    fn default_resolution_is_warning_free() {
        let resolution = parse_parts(None, &OptionsMap::new(), false);
        assert!(resolution.warnings.is_empty());
        let config = resolution.config;
        assert!(!config.tls());
        assert_eq!(config.max_pool_size(), 5);
        assert_eq!(config.read_preference().mode, ReadPreferenceMode::Primary);
        // the default w:1 always yields a concrete write concern
        assert_eq!(
            config.write_concern().and_then(|wc| wc.w),
            Some(W::Number(1))
        );
    }

    #[test]
    fn options_override_connection_string() {
        let mut options = OptionsMap::new();
        options.insert("maxPoolSize".into(), 50i64.into());
        let resolution = parse("h/?maxPoolSize=10", options);
        assert_eq!(resolution.config.max_pool_size(), 50);
    }

    #[test]
    fn derived_write_concern_combines_journal_and_w() {
        let mut options = OptionsMap::new();
        options.insert("w".into(), "majority".into());
        let resolution = parse("h/?journal=true", options);
        let wc = resolution.config.write_concern().cloned();
        assert_eq!(
            wc,
            Some(WriteConcern {
                w: Some(W::Majority),
                j: Some(true),
                wtimeout: None,
            })
        );
    }

    #[test]
    fn wtimeout_ms_stays_out_of_derived_write_concern() {
        let resolution = parse("h/?wtimeoutMS=250", OptionsMap::new());
        assert_eq!(resolution.config.wtimeout_ms(), Some(250));
        assert_eq!(
            resolution.config.write_concern().and_then(|wc| wc.wtimeout),
            None
        );
    }

    #[test]
    fn driver_wtimeout_feeds_derived_write_concern() {
        let mut options = OptionsMap::new();
        options.insert("wtimeout".into(), 250i64.into());
        let resolution = parse_parts(None, &options, false);
        assert_eq!(
            resolution.config.write_concern().and_then(|wc| wc.wtimeout),
            Some(250)
        );
    }

    #[test]
    fn nested_write_concern_wins_over_flat_fields() {
        let mut options = OptionsMap::new();
        options.insert("w".into(), 5i64.into());
        options.insert("writeConcern".into(), doc! { "w": 2 }.into());
        let resolution = parse_parts(None, &options, false);
        assert_eq!(
            resolution.config.write_concern().and_then(|wc| wc.w),
            Some(W::Number(2))
        );
    }

    #[test]
    fn nested_read_preference_option_resolves() {
        let mut options = OptionsMap::new();
        options.insert(
            "readPreference".into(),
            doc! { "readPreference": "secondary" }.into(),
        );
        let resolution = parse_parts(None, &options, false);
        assert_eq!(
            resolution.config.read_preference().mode,
            ReadPreferenceMode::Secondary
        );
    }

    #[test]
    fn nested_write_concern_option_resolves() {
        let mut options = OptionsMap::new();
        options.insert(
            "writeConcern".into(),
            doc! { "writeConcern": { "w": 2 } }.into(),
        );
        let resolution = parse_parts(None, &options, false);
        assert_eq!(
            resolution.config.write_concern().and_then(|wc| wc.w),
            Some(W::Number(2))
        );
    }

    #[test]
    fn read_preference_mode_string_resolves() {
        let mut options = OptionsMap::new();
        options.insert("readPreference".into(), "secondaryPreferred".into());
        let resolution = parse_parts(None, &options, false);
        assert_eq!(
            resolution.config.read_preference().mode,
            ReadPreferenceMode::SecondaryPreferred
        );
    }

    #[test]
    fn top_level_staleness_without_mode_degrades_to_primary() {
        let resolution = parse("h/?maxStalenessSeconds=90", OptionsMap::new());
        assert_eq!(resolution.config.max_staleness_seconds(), Some(90));
        assert_eq!(*resolution.config.read_preference(), ReadPreference::primary());
    }

    #[test]
    fn tls_insecure_translation() {
        let resolution = parse(
            "h/?tlsInsecure=true&tlsAllowInvalidCertificates=true",
            OptionsMap::new(),
        );
        assert!(!resolution.config.ssl_validate());
    }

    #[test]
    fn allow_invalid_certificates_copies_onto_ssl_validate() {
        let resolution = parse(
            "h/?tlsAllowInvalidCertificates=true",
            OptionsMap::new(),
        );
        assert!(resolution.config.ssl_validate());
    }

    #[test]
    fn user_required_mechanism_without_user_warns() {
        let resolution = parse("h/?authMechanism=SCRAM-SHA-256", OptionsMap::new());
        assert!(resolution.warnings.contains(&Warning::MissingUser {
            mechanism: "SCRAM-SHA-256".into()
        }));
    }

    #[test]
    fn user_required_mechanism_with_user_is_fine() {
        let mut options = OptionsMap::new();
        options.insert("auth".into(), doc! { "user": "app", "pass": "s3cret" }.into());
        let resolution = parse("h/?authMechanism=SCRAM-SHA-256", options);
        assert!(resolution.warnings.is_empty());
        assert_eq!(resolution.config.auth().user.as_deref(), Some("app"));
    }

    #[test]
    fn silent_suppresses_warnings_but_still_degrades() {
        let resolution = parse_parts(Some("h/?maxPoolSize=lots"), &OptionsMap::new(), true);
        assert!(resolution.warnings.is_empty());
        assert_eq!(resolution.config.max_pool_size(), 5);
    }

    #[test]
    fn alias_getters_mirror_canonical_fields() {
        let mut options = OptionsMap::new();
        options.insert("appname".into(), "svc".into());
        let resolution = parse("h/?ssl=true&journal=false", options);
        let config = resolution.config;
        assert_eq!(config.ssl(), config.tls());
        assert_eq!(config.j(), config.journal());
        assert_eq!(config.pool_size(), config.max_pool_size());
        assert_eq!(config.appname(), config.app_name());
        assert_eq!(config.appname(), Some("svc"));
    }

    #[test]
    fn export_uses_canonical_names_only() {
        let mut options = OptionsMap::new();
        options.insert("poolSize".into(), 30i64.into());
        let resolution = parse("h/?ssl=true", options);
        let export = resolution.config.export();
        assert!(!export.contains_key("ssl"));
        assert!(!export.contains_key("poolSize"));
        assert!(!export.contains_key("j"));
        assert!(!export.contains_key("appname"));
        assert_eq!(export.get("tls"), Some(&OptionValue::Bool(true)));
        assert_eq!(export.get("maxPoolSize"), Some(&OptionValue::Int(30)));
    }

    #[test]
    fn export_reparse_round_trips_without_warnings() {
        let mut options = OptionsMap::new();
        options.insert("w".into(), "majority".into());
        options.insert("readPreference".into(), "nearest".into());
        let first = parse("h/?journal=true&compressors=zlib", options);

        let second = parse_parts(None, &first.config.export(), false);
        assert!(second.warnings.is_empty());
        assert_eq!(second.config.export(), first.config.export());
    }

    #[test]
    fn clone_with_overrides_single_fields() {
        let resolution = parse("h/?maxPoolSize=10", OptionsMap::new());
        let mut overrides = OptionsMap::new();
        overrides.insert("readPreference".into(), "secondary".into());
        let cloned = resolution.config.clone_with(overrides);
        assert_eq!(cloned.config.max_pool_size(), 10);
        assert_eq!(
            cloned.config.read_preference().mode,
            ReadPreferenceMode::Secondary
        );
        // the source config is untouched
        assert_eq!(
            resolution.config.read_preference().mode,
            ReadPreferenceMode::Primary
        );
    }

    #[tokio::test]
    async fn async_parse_translates_and_validates_before_freezing() {
        let result = parse_parts_async(
            Some("h/?tlsAllowInvalidCertificates=true&authMechanism=PLAIN"),
            &OptionsMap::new(),
            false,
        )
        .await;
        assert!(result.is_ok());
        if let Ok(resolution) = result {
            assert!(resolution.config.ssl_validate());
            assert!(resolution.warnings.contains(&Warning::MissingUser {
                mechanism: "PLAIN".into()
            }));
        }
    }

    #[tokio::test]
    async fn async_parse_matches_sync_parse() {
        let mut options = OptionsMap::new();
        options.insert("w".into(), "majority".into());
        let sync = parse("h/?journal=true", options.clone());
        let result = parse_parts_async(Some("h/?journal=true"), &options, false).await;
        assert!(result.is_ok());
        if let Ok(resolution) = result {
            assert_eq!(resolution.config.export(), sync.config.export());
        }
    }
}
