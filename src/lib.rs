//! Typed, immutable client configuration for a document database driver.
//! Parse a connection string, overlay programmatic options, and hand every
//! layer of the client a frozen config of its own.
//!
//! ```
//! use docdb::ClientConfig;
//!
//! let resolution = ClientConfig::builder()
//!     .connection_string("db://localhost/?ssl=true&journal=true")
//!     .option("w", "majority")
//!     .parse();
//!
//! let config = resolution.config;
//! assert!(config.tls());
//! assert_eq!(
//!     config.write_concern().and_then(|wc| wc.j),
//!     Some(true)
//! );
//! ```
//!
//! # Two sources, one vocabulary
//!
//! Options arrive from two places: the connection-string query (everything
//! is text) and the programmatic options map (values are already typed).
//! Both run through the same declarative binding tables, so a key means
//! the same thing from either source — only the coercion strategy differs.
//! A connection string parses `"true"`; the options map requires a real
//! boolean. Kinds a query string cannot express at all, like credentials
//! or callbacks, are rejected for that source with a warning.
//!
//! # Precedence
//!
//! ```text
//! Compiled defaults
//!        ↑ overridden by
//! Connection-string query options
//!        ↑ overridden by
//! Programmatic options
//! ```
//!
//! Within one source, precedence belongs to the binding tables, not to
//! input order: a canonical name (`tls`, `journal`, `maxPoolSize`) always
//! wins over its alias (`ssl`, `j`, `poolSize`) no matter which was
//! authored first.
//!
//! # Warnings, not errors
//!
//! Resolution never fails. A value that cannot be coerced leaves its field
//! at the default and adds a [`Warning`] to the [`Resolution`]; warnings
//! are also mirrored to `tracing` unless the parse runs silent. The only
//! fatal errors live in the async finalization phase and in command
//! building.
//!
//! # Frozen configs, cloned down the hierarchy
//!
//! A resolved [`ClientConfig`] has no mutating API. [`Client::db`] and
//! [`Db::collection`] derive child configs by re-resolving the parent's
//! exported options with overrides on top, so a collection can read from
//! secondaries while its client reads from the primary, and neither can
//! disturb the other.

mod bindings;
mod builder;
mod client;
mod coerce;
mod coerce_uri;
mod coerce_value;
mod command;
mod config;
mod error;
mod options;
mod read_preference;
mod resolve;
mod server;
mod types;
mod uri;
mod value;
mod warning;
mod write_concern;

pub use builder::ConfigBuilder;
pub use client::{Client, Collection, Db, FindAndModifyOptions};
pub use command::{Command, FindAndModifyCommand};
pub use config::{ClientConfig, Resolution};
pub use error::ClientError;
pub use read_preference::{Hedge, ReadPreference, read_preference};
pub use server::{Server, server_version_of, wire_version_of};
pub use types::{
    AddressFamily, Auth, AuthMechanism, AuthMechanismProperties, Callback, Compressor,
    LoggerLevel, PkFactory, PkFactoryHandle, PromiseLibrary, PromiseLibraryHandle, ReadConcern,
    ReadConcernLevel, ReadPreferenceMode, W,
};
pub use value::{OptionValue, OptionsMap};
pub use warning::Warning;
pub use write_concern::{WriteConcern, write_concern};
