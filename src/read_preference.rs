//! Derived read-preference resolution.
//!
//! Read preference can be authored as a bare mode string, a structured
//! document, or wrapped any number of times under `readPreference` or
//! `$readPreference`. The resolver unwraps nesting all the way down and
//! collapses the innermost value into one [`ReadPreference`], falling back
//! to a bare `primary` whenever the input carries no usable mode.

use bson::{Bson, Document, doc};
use serde::Serialize;

use crate::types::{OptionEnum, ReadPreferenceMode};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Hedge {
    pub enabled: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReadPreference {
    pub mode: ReadPreferenceMode,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tags: Option<Vec<Document>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_staleness_seconds: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hedge: Option<Hedge>,
}

impl ReadPreference {
    pub fn primary() -> Self {
        ReadPreference {
            mode: ReadPreferenceMode::Primary,
            tags: None,
            max_staleness_seconds: None,
            hedge: None,
        }
    }

    pub fn to_document(&self) -> Document {
        let mut doc = doc! { "mode": self.mode.as_str() };
        if let Some(tags) = &self.tags {
            doc.insert(
                "tags",
                Bson::Array(tags.iter().cloned().map(Bson::Document).collect()),
            );
        }
        if let Some(seconds) = self.max_staleness_seconds {
            doc.insert("maxStalenessSeconds", seconds);
        }
        if let Some(hedge) = &self.hedge {
            doc.insert("hedge", doc! { "enabled": hedge.enabled });
        }
        doc
    }
}

impl Default for ReadPreference {
    fn default() -> Self {
        ReadPreference::primary()
    }
}

pub(crate) fn as_i64(value: &Bson) -> Option<i64> {
    match value {
        Bson::Int32(n) => Some(i64::from(*n)),
        Bson::Int64(n) => Some(*n),
        // whole-valued doubles only; a fractional value is dropped rather
        // than silently truncated
        Bson::Double(f) if f.fract() == 0.0 && f.is_finite() => Some(*f as i64),
        _ => None,
    }
}

fn mode_of(value: &Bson) -> Option<ReadPreferenceMode> {
    match value {
        Bson::String(name) => ReadPreferenceMode::from_name(name),
        Bson::Document(doc) => match doc.get("mode") {
            Some(Bson::String(name)) => ReadPreferenceMode::from_name(name),
            _ => None,
        },
        _ => None,
    }
}

/// Resolve a read-preference viable. Unusable input, including an
/// unparseable mode, degrades to the bare `primary` preference.
pub fn read_preference(viable: &Bson) -> ReadPreference {
    if let Bson::Document(doc) = viable {
        if let Some(inner) = doc.get("readPreference") {
            return read_preference(inner);
        }
        if let Some(inner) = doc.get("$readPreference") {
            return read_preference(inner);
        }
    }
    read_preference_flat(viable)
}

fn read_preference_flat(viable: &Bson) -> ReadPreference {
    let Some(mode) = mode_of(viable) else {
        return ReadPreference::primary();
    };
    if mode == ReadPreferenceMode::Primary {
        return ReadPreference::primary();
    }

    let Bson::Document(doc) = viable else {
        return ReadPreference {
            mode,
            tags: None,
            max_staleness_seconds: None,
            hedge: None,
        };
    };

    let tags = doc
        .get("tags")
        .or_else(|| doc.get("readPreferenceTags"))
        .and_then(|value| match value {
            Bson::Array(items) => Some(
                items
                    .iter()
                    .filter_map(|item| match item {
                        Bson::Document(tag) => Some(tag.clone()),
                        _ => None,
                    })
                    .collect::<Vec<_>>(),
            ),
            _ => None,
        });

    let max_staleness_seconds = doc.get("maxStalenessSeconds").and_then(as_i64);

    // hedge survives only when explicitly enabled
    let hedge = match doc.get("hedge") {
        Some(Bson::Document(hedge)) if hedge.get_bool("enabled") == Ok(true) => {
            Some(Hedge { enabled: true })
        }
        _ => None,
    };

    ReadPreference {
        mode,
        tags,
        max_staleness_seconds,
        hedge,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bare_mode_string() {
        let rp = read_preference(&Bson::String("secondary".into()));
        assert_eq!(rp.mode, ReadPreferenceMode::Secondary);
        assert_eq!(rp.tags, None);
    }

    #[test]
    fn unparseable_mode_degrades_to_primary() {
        let rp = read_preference(&Bson::String("nearest-ish".into()));
        assert_eq!(rp, ReadPreference::primary());
    }

    #[test]
    fn primary_mode_discards_extras() {
        let rp = read_preference(&Bson::Document(doc! {
            "mode": "primary",
            "maxStalenessSeconds": 90,
        }));
        assert_eq!(rp, ReadPreference::primary());
    }

    #[test]
    fn structured_document_with_all_fields() {
        let rp = read_preference(&Bson::Document(doc! {
            "mode": "secondaryPreferred",
            "tags": [{ "dc": "east" }],
            "maxStalenessSeconds": 120,
            "hedge": { "enabled": true },
        }));
        assert_eq!(rp.mode, ReadPreferenceMode::SecondaryPreferred);
        assert_eq!(rp.tags, Some(vec![doc! { "dc": "east" }]));
        assert_eq!(rp.max_staleness_seconds, Some(120));
        assert_eq!(rp.hedge, Some(Hedge { enabled: true }));
    }

    #[test]
    fn staleness_accepts_whole_doubles_and_drops_fractional_ones() {
        let rp = read_preference(&Bson::Document(doc! {
            "mode": "secondary",
            "maxStalenessSeconds": 90.0,
        }));
        assert_eq!(rp.max_staleness_seconds, Some(90));

        let rp = read_preference(&Bson::Document(doc! {
            "mode": "secondary",
            "maxStalenessSeconds": 90.5,
        }));
        assert_eq!(rp.max_staleness_seconds, None);
    }

    #[test]
    fn disabled_hedge_is_dropped() {
        let rp = read_preference(&Bson::Document(doc! {
            "mode": "nearest",
            "hedge": { "enabled": false },
        }));
        assert_eq!(rp.hedge, None);
    }

    #[test]
    fn nested_under_read_preference_key() {
        let rp = read_preference(&Bson::Document(doc! {
            "readPreference": "secondary",
        }));
        assert_eq!(rp.mode, ReadPreferenceMode::Secondary);
    }

    #[test]
    fn nested_under_dollar_key() {
        let rp = read_preference(&Bson::Document(doc! {
            "$readPreference": { "mode": "nearest" },
        }));
        assert_eq!(rp.mode, ReadPreferenceMode::Nearest);
    }

    #[test]
    fn nesting_unwraps_all_the_way_down() {
        let rp = read_preference(&Bson::Document(doc! {
            "readPreference": { "readPreference": "secondary" },
        }));
        assert_eq!(rp.mode, ReadPreferenceMode::Secondary);

        let rp = read_preference(&Bson::Document(doc! {
            "readPreference": { "$readPreference": { "mode": "nearest" } },
        }));
        assert_eq!(rp.mode, ReadPreferenceMode::Nearest);
    }

    #[test]
    fn legacy_tags_spelling_accepted() {
        let rp = read_preference(&Bson::Document(doc! {
            "mode": "secondary",
            "readPreferenceTags": [{ "rack": "a" }],
        }));
        assert_eq!(rp.tags, Some(vec![doc! { "rack": "a" }]));
    }

    #[test]
    fn to_document_emits_present_fields_only() {
        let rp = read_preference(&Bson::String("secondaryPreferred".into()));
        assert_eq!(rp.to_document(), doc! { "mode": "secondaryPreferred" });
    }
}
