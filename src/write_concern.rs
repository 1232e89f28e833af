//! Derived write-concern resolution.
//!
//! A write-concern viable is a document carrying any of `w`, `j` (or its
//! `journal` spelling), and `wtimeout`, wrapped any number of times under
//! `writeConcern`. Resolution is sparse: only authored fields appear in
//! the result, and a viable with none of them resolves to nothing at all.

use bson::{Bson, Document, doc};
use serde::Serialize;

use crate::read_preference::as_i64;
use crate::types::W;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WriteConcern {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub w: Option<W>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub j: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub wtimeout: Option<i64>,
}

impl WriteConcern {
    pub fn to_document(&self) -> Document {
        let mut doc = doc! {};
        if let Some(w) = &self.w {
            doc.insert("w", w.to_bson());
        }
        if let Some(j) = self.j {
            doc.insert("j", j);
        }
        if let Some(wtimeout) = self.wtimeout {
            doc.insert("wtimeout", wtimeout);
        }
        doc
    }
}

fn w_of(value: &Bson) -> Option<W> {
    if let Some(n) = as_i64(value) {
        return Some(W::Number(n));
    }
    if let Bson::String(s) = value
        && s.to_ascii_lowercase().contains("majority")
    {
        // any spelling containing the word counts, as a lenient legacy rule
        return Some(W::Majority);
    }
    None
}

/// Resolve a write-concern viable, or `None` when it authors nothing.
pub fn write_concern(viable: &Bson) -> Option<WriteConcern> {
    let Bson::Document(doc) = viable else {
        return None;
    };
    if let Some(inner) = doc.get("writeConcern") {
        return write_concern(inner);
    }
    write_concern_flat(viable)
}

fn write_concern_flat(viable: &Bson) -> Option<WriteConcern> {
    let Bson::Document(doc) = viable else {
        return None;
    };

    let w = doc.get("w").and_then(w_of);
    let j = match doc.get("j") {
        Some(Bson::Boolean(b)) => Some(*b),
        _ => match doc.get("journal") {
            Some(Bson::Boolean(b)) => Some(*b),
            _ => None,
        },
    };
    let wtimeout = doc.get("wtimeout").and_then(as_i64);

    if w.is_none() && j.is_none() && wtimeout.is_none() {
        return None;
    }
    Some(WriteConcern { w, j, wtimeout })
}
