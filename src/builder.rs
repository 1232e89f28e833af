//! Fluent construction of a [`ClientConfig`].

use crate::config::{Resolution, parse_parts, parse_parts_async};
use crate::error::ClientError;
use crate::value::{OptionValue, OptionsMap};

/// Accumulates a connection string and programmatic options, then resolves
/// them in one shot. The same builder drives both the synchronous and the
/// asynchronous finalization paths.
///
/// ```
/// use docdb::ClientConfig;
///
/// let resolution = ClientConfig::builder()
///     .connection_string("db://localhost/?ssl=true")
///     .option("maxPoolSize", 20i64)
///     .parse();
/// assert!(resolution.config.tls());
/// assert_eq!(resolution.config.max_pool_size(), 20);
/// ```
#[derive(Debug, Default)]
pub struct ConfigBuilder {
    connection_string: Option<String>,
    options: OptionsMap,
    silent: bool,
}

impl ConfigBuilder {
    pub fn new() -> Self {
        ConfigBuilder::default()
    }

    pub fn connection_string(mut self, connection_string: impl Into<String>) -> Self {
        self.connection_string = Some(connection_string.into());
        self
    }

    pub fn option(mut self, key: impl Into<String>, value: impl Into<OptionValue>) -> Self {
        self.options.insert(key.into(), value.into());
        self
    }

    pub fn options(mut self, options: OptionsMap) -> Self {
        self.options.extend(options);
        self
    }

    /// Suppress warning collection and reporting. Coercion failures still
    /// degrade to defaults.
    pub fn silent(mut self, silent: bool) -> Self {
        self.silent = silent;
        self
    }

    /// Resolve synchronously. Never fails; problems become warnings.
    pub fn parse(self) -> Resolution {
        parse_parts(self.connection_string.as_deref(), &self.options, self.silent)
    }

    /// Resolve with the asynchronous finalization phase (TLS file
    /// resolution, then the DNS check) run before the config freezes.
    pub async fn parse_async(self) -> Result<Resolution, ClientError> {
        parse_parts_async(self.connection_string.as_deref(), &self.options, self.silent).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ClientConfig;

    #[test]
    fn builder_combines_string_and_options() {
        let resolution = ClientConfig::builder()
            .connection_string("h/?journal=true")
            .option("w", "majority")
            .parse();
        assert_eq!(resolution.config.journal(), Some(true));
        assert!(resolution.warnings.is_empty());
    }

    #[test]
    fn later_option_calls_overwrite_earlier_ones() {
        let resolution = ClientConfig::builder()
            .option("maxPoolSize", 10i64)
            .option("maxPoolSize", 20i64)
            .parse();
        assert_eq!(resolution.config.max_pool_size(), 20);
    }

    #[test]
    fn silent_builder_reports_nothing() {
        let resolution = ClientConfig::builder()
            .connection_string("h/?bogusKey=1")
            .silent(true)
            .parse();
        assert!(resolution.warnings.is_empty());
    }

    #[tokio::test]
    async fn async_parse_equals_sync_parse() {
        let sync = ClientConfig::builder()
            .connection_string("h/?ssl=true")
            .option("w", 3i64)
            .parse();
        let result = ClientConfig::builder()
            .connection_string("h/?ssl=true")
            .option("w", 3i64)
            .parse_async()
            .await;
        assert!(result.is_ok());
        if let Ok(resolution) = result {
            assert_eq!(resolution.config.export(), sync.config.export());
        }
    }
}
