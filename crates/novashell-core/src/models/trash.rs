use serde::{Deserialize, Deserializer, Serialize, de};
use serde_json::Value;

use super::{Node, NodeKind};
use crate::utils::format::{format_date_iso, format_human_size, parse_iso_millis};

// =============================================================================
// Trash Entry
// =============================================================================

/// A soft-deleted item held in the trash ledger.
///
/// `snapshot` is an independent copy of the deleted subtree. Entries are never
/// edited after creation, only removed.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TrashEntry {
    pub id: String,
    pub name: String,
    #[serde(rename = "type")]
    pub kind: NodeKind,
    #[serde(rename = "content")]
    pub snapshot: Node,
    pub original_path: String,
    /// Milliseconds since the Unix epoch. Read from either a number or an
    /// ISO-8601 string; always written as a number.
    #[serde(deserialize_with = "deserialize_timestamp")]
    pub deleted_at: u64,
}

fn deserialize_timestamp<'de, D: Deserializer<'de>>(deserializer: D) -> Result<u64, D::Error> {
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Stored {
        Millis(u64),
        Fractional(f64),
        Iso(String),
    }

    match Stored::deserialize(deserializer)? {
        Stored::Millis(millis) => Ok(millis),
        Stored::Fractional(millis) if millis.is_finite() && millis >= 0.0 => Ok(millis as u64),
        Stored::Fractional(millis) => Err(de::Error::custom(format!("invalid timestamp {millis}"))),
        Stored::Iso(text) => parse_iso_millis(&text)
            .ok_or_else(|| de::Error::custom(format!("invalid timestamp {text:?}"))),
    }
}

impl TrashEntry {
    /// Display row for the trash app.
    pub fn summary(&self) -> TrashSummary {
        let size = self.snapshot.size();
        TrashSummary {
            id: self.id.clone(),
            name: self.name.clone(),
            kind: self.kind,
            original_path: self.original_path.clone(),
            deleted_at: self.deleted_at,
            deleted_on: format_date_iso(self.deleted_at / 1000),
            size,
            size_label: format_human_size(size),
        }
    }
}

/// Persisted ledger layout: `{"items": [...]}`, most recent first.
///
/// Loading keeps every entry that parses and drops the rest with a warning.
#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(from = "StoredLedger")]
pub struct TrashLedger {
    pub items: Vec<TrashEntry>,
}

#[derive(Deserialize)]
struct StoredLedger {
    #[serde(default)]
    items: Vec<Value>,
}

impl From<StoredLedger> for TrashLedger {
    fn from(stored: StoredLedger) -> Self {
        let items = stored
            .items
            .into_iter()
            .filter_map(|raw| match serde_json::from_value::<TrashEntry>(raw) {
                Ok(entry) => Some(entry),
                Err(err) => {
                    log::warn!("dropping unreadable trash entry: {err}");
                    None
                }
            })
            .collect();
        Self { items }
    }
}

/// Trash entry as shown to the user, without the snapshot body.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TrashSummary {
    pub id: String,
    pub name: String,
    pub kind: NodeKind,
    pub original_path: String,
    pub deleted_at: u64,
    /// Deletion date as `YYYY-MM-DD`.
    pub deleted_on: String,
    pub size: u64,
    pub size_label: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_entry() -> TrashEntry {
        TrashEntry {
            id: "lq2x1c-abc123".to_string(),
            name: "notes.txt".to_string(),
            kind: NodeKind::File,
            snapshot: Node::file("x".repeat(1536)),
            original_path: "/home/notes.txt".to_string(),
            deleted_at: 1_704_067_200_000,
        }
    }

    #[test]
    fn test_entry_json_uses_original_field_names() {
        let json = serde_json::to_value(sample_entry()).unwrap();
        assert_eq!(json["type"], "file");
        assert_eq!(json["originalPath"], "/home/notes.txt");
        assert_eq!(json["deletedAt"], 1_704_067_200_000u64);
        assert_eq!(json["content"]["type"], "file");
    }

    #[test]
    fn test_summary() {
        let summary = sample_entry().summary();
        assert_eq!(summary.size, 1536);
        assert_eq!(summary.size_label, "1.50 KB");
        assert_eq!(summary.deleted_on, "2024-01-01");
        assert_eq!(summary.kind, NodeKind::File);
    }

    #[test]
    fn test_deleted_at_accepts_iso_string() {
        let raw = r#"{
            "id": "lqu5m2o0-abc123",
            "name": "a.txt",
            "type": "file",
            "content": {"type": "file", "content": "hi"},
            "originalPath": "/home/a.txt",
            "deletedAt": "2024-01-01T00:00:00.000Z"
        }"#;
        let entry: TrashEntry = serde_json::from_str(raw).unwrap();
        assert_eq!(entry.deleted_at, 1_704_067_200_000);

        // Saved back as a number.
        let json = serde_json::to_value(&entry).unwrap();
        assert_eq!(json["deletedAt"], 1_704_067_200_000u64);
    }

    #[test]
    fn test_deleted_at_rejects_bad_values() {
        let mut json = serde_json::to_value(sample_entry()).unwrap();
        json["deletedAt"] = "last tuesday".into();
        assert!(serde_json::from_value::<TrashEntry>(json.clone()).is_err());

        json["deletedAt"] = (-1.5).into();
        assert!(serde_json::from_value::<TrashEntry>(json).is_err());
    }

    #[test]
    fn test_ledger_drops_only_unreadable_entries() {
        let good = serde_json::to_value(sample_entry()).unwrap();
        let raw = serde_json::json!({
            "items": [good, {"id": "broken"}, 42]
        });
        let ledger: TrashLedger = serde_json::from_value(raw).unwrap();
        assert_eq!(ledger.items, vec![sample_entry()]);
    }

    #[test]
    fn test_ledger_defaults_to_empty() {
        let ledger: TrashLedger = serde_json::from_str("{}").unwrap();
        assert!(ledger.items.is_empty());
    }
}
