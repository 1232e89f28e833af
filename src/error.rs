use thiserror::Error;

/// Fatal errors. Everything recoverable is a [`Warning`](crate::Warning)
/// instead — a bad option value degrades to its default and resolution
/// continues, so only two situations abort a caller outright: building a
/// findAndModify command with nothing to do, and a failure inside the
/// asynchronous finalization phase.
#[derive(Debug, Error)]
pub enum ClientError {
    #[error("findAndModify requires either an update document or remove")]
    MissingUpdateOrRemove,

    #[error("failed to resolve TLS file {path}: {reason}")]
    TlsFileResolution { path: String, reason: String },

    #[error("DNS check failed for {host}: {reason}")]
    DnsCheck { host: String, reason: String },
}
