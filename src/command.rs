//! Wire command construction.
//!
//! A [`Command`] turns a fully-resolved configuration fragment into the
//! document actually sent to a server. Field presence follows authorship:
//! optional pieces appear only when they were supplied, and the read
//! preference and write concern arrive pre-resolved from the owning
//! configuration.

use bson::{Bson, Document, doc};

use crate::error::ClientError;
use crate::read_preference::ReadPreference;
use crate::server::Server;
use crate::write_concern::WriteConcern;

pub trait Command {
    /// Safe to retry after a transient failure.
    fn retryable(&self) -> bool;
    fn is_write(&self) -> bool;
    fn is_read(&self) -> bool;

    fn build(&self, server: &Server) -> Result<Document, ClientError>;
}

/// The findAndModify command: atomically select one document and update or
/// remove it.
#[derive(Debug, Clone)]
pub struct FindAndModifyCommand {
    pub collection: String,
    pub db: String,
    pub read_preference: ReadPreference,
    pub write_concern: Option<WriteConcern>,
    /// Selection filter. Held for the (stubbed) execution layer; the
    /// command document itself does not carry it.
    pub query: Option<Document>,
    pub sort: Bson,
    pub update: Option<Document>,
    pub remove: bool,
    pub new: bool,
}

impl Command for FindAndModifyCommand {
    fn retryable(&self) -> bool {
        true
    }

    fn is_write(&self) -> bool {
        true
    }

    fn is_read(&self) -> bool {
        true
    }

    fn build(&self, _server: &Server) -> Result<Document, ClientError> {
        let mut command = doc! {
            "findAndModify": self.collection.clone(),
            "$db": self.db.clone(),
            "sort": self.sort.clone(),
        };

        if let Some(update) = &self.update {
            command.insert("update", update.clone());
        } else if self.remove {
            command.insert("remove", true);
        } else {
            return Err(ClientError::MissingUpdateOrRemove);
        }

        if self.new {
            command.insert("new", true);
        }
        command.insert("$readPreference", self.read_preference.to_document());
        if let Some(wc) = &self.write_concern {
            command.insert("writeConcern", wc.to_document());
        }

        Ok(command)
    }
}
