//! The client hierarchy.
//!
//! A [`Client`] owns one frozen configuration. Each [`Db`] and
//! [`Collection`] below it re-resolves that configuration with its own
//! overrides, so every level holds a complete, immutable config of its
//! own and nothing ever mutates a parent. Overrides flow down, never up.

use std::sync::Arc;

use bson::{Bson, Document, doc};

use crate::command::{Command, FindAndModifyCommand};
use crate::config::{ClientConfig, parse_parts_async};
use crate::error::ClientError;
use crate::server::Server;
use crate::value::OptionsMap;

#[derive(Debug, Clone)]
pub struct Client {
    config: Arc<ClientConfig>,
}

impl Client {
    pub fn new(config: ClientConfig) -> Self {
        Client {
            config: Arc::new(config),
        }
    }

    /// Resolve the connection string and options with the full async
    /// finalization phase, then wrap the frozen config.
    pub async fn connect(
        connection_string: &str,
        options: OptionsMap,
    ) -> Result<Client, ClientError> {
        let resolution = parse_parts_async(Some(connection_string), &options, false).await?;
        Ok(Client::new(resolution.config))
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    pub fn db(&self, name: impl Into<String>, overrides: OptionsMap) -> Db {
        Db {
            name: name.into(),
            config: Arc::new(self.config.clone_with(overrides).config),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Db {
    name: String,
    config: Arc<ClientConfig>,
}

impl Db {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    pub fn collection(&self, name: impl Into<String>, overrides: OptionsMap) -> Collection {
        Collection {
            name: name.into(),
            db_name: self.name.clone(),
            config: Arc::new(self.config.clone_with(overrides).config),
        }
    }
}

/// Per-call options for [`Collection::find_and_modify`].
#[derive(Debug, Clone, Copy, Default)]
pub struct FindAndModifyOptions {
    pub remove: bool,
    pub new: bool,
}

#[derive(Debug, Clone)]
pub struct Collection {
    name: String,
    db_name: String,
    config: Arc<ClientConfig>,
}

impl Collection {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Build the findAndModify command for this collection. An absent
    /// update defaults to the empty document unless `remove` was asked
    /// for, in which case the command really removes.
    pub fn find_and_modify(
        &self,
        query: Option<Document>,
        sort: Option<Bson>,
        update: Option<Document>,
        options: FindAndModifyOptions,
    ) -> Result<Document, ClientError> {
        let update = match (update, options.remove) {
            (Some(update), _) => Some(update),
            (None, true) => None,
            (None, false) => Some(doc! {}),
        };

        let command = FindAndModifyCommand {
            collection: self.name.clone(),
            db: self.db_name.clone(),
            read_preference: self.config.read_preference().clone(),
            write_concern: self.config.write_concern().cloned(),
            query,
            sort: sort.unwrap_or_else(|| Bson::Array(vec![])),
            update,
            remove: options.remove,
            new: options.new,
        };

        command.build(&Server::new(8))
    }
}
