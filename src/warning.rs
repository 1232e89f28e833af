//! Recoverable diagnostics produced while resolving options.
//!
//! Warnings never halt resolution: a value that fails coercion leaves its
//! field at the default and the pipeline moves on. The [`Diagnostics`] sink
//! collects them (and mirrors each one to `tracing`) unless silenced —
//! silencing suppresses the reports, not the value degradation.

use thiserror::Error;

/// A non-fatal problem found while coercing or matching an option.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Warning {
    /// A recognized key whose value has the wrong type or is unparseable.
    #[error("\"{key}\" with the value `{value}` is not of correct type \"{expected}\"")]
    IncorrectType {
        key: String,
        /// JSON rendering of the offending raw value.
        value: String,
        expected: &'static str,
    },

    /// A kind that the active source cannot express at all (e.g. auth
    /// credentials inside a connection string).
    #[error("\"{key}\" with the type of \"{kind}\" is not a valid option for this source")]
    InvalidForSource { key: String, kind: &'static str },

    /// A key outside the active table's vocabulary.
    #[error("\"{key}\" is not a valid option")]
    UnrecognizedKey { key: String },

    /// A key the vocabulary names but the driver does not implement.
    #[error("\"{key}\" is recognized but not supported")]
    Unsupported { key: String },

    /// A structured fragment carrying a sub-key outside its declared shape.
    #[error("\"{key}\" within the object type \"{kind}\" has an unrecognized property `{property}`")]
    UnrecognizedProperty {
        key: String,
        kind: &'static str,
        property: String,
    },

    /// An auth mechanism that requires credentials was selected without any.
    #[error("auth mechanism \"{mechanism}\" requires a username")]
    MissingUser { mechanism: String },
}

/// Accumulates warnings for one resolution run.
#[derive(Debug, Default)]
pub(crate) struct Diagnostics {
    silent: bool,
    warnings: Vec<Warning>,
}

impl Diagnostics {
    pub(crate) fn new(silent: bool) -> Self {
        Diagnostics {
            silent,
            warnings: Vec::new(),
        }
    }

    pub(crate) fn push(&mut self, warning: Warning) {
        if self.silent {
            return;
        }
        tracing::warn!(target: "docdb::config", "{warning}");
        self.warnings.push(warning);
    }

    pub(crate) fn into_warnings(self) -> Vec<Warning> {
        self.warnings
    }

    #[cfg(test)]
    pub(crate) fn warnings(&self) -> &[Warning] {
        &self.warnings
    }
}
