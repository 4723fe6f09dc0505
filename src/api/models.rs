use serde::de::{MapAccess, Visitor};
use serde::{Deserialize, Deserializer};
use std::fmt;

/// Metadata for one track as served by `/mediainfo`.
///
/// The backend sends a flat JSON object with no fixed schema. Keys keep the
/// order they arrived in; values are stored as display text, with `null`
/// becoming an empty string.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct MetadataRecord {
    fields: Vec<(String, String)>,
}

/// Most-recent-first list of records. Index 0 is the current track.
pub type MetadataHistory = Vec<MetadataRecord>;

impl MetadataRecord {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace a field, keeping the original position of an existing key.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) {
        let key = key.into();
        let value = value.into();
        match self.fields.iter_mut().find(|(existing, _)| *existing == key) {
            Some((_, slot)) => *slot = value,
            None => self.fields.push((key, value)),
        }
    }

    /// Raw value for `key`, including empty values.
    pub fn raw(&self, key: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|(existing, _)| existing == key)
            .map(|(_, value)| value.as_str())
    }

    /// Value for `key` when it is present and non-empty.
    pub fn field(&self, key: &str) -> Option<&str> {
        self.raw(key).filter(|value| !value.is_empty())
    }

    pub fn entries(&self) -> impl Iterator<Item = (&str, &str)> {
        self.fields
            .iter()
            .map(|(key, value)| (key.as_str(), value.as_str()))
    }
}

impl<K, V> FromIterator<(K, V)> for MetadataRecord
where
    K: Into<String>,
    V: Into<String>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut record = Self::new();
        for (key, value) in iter {
            record.insert(key, value);
        }
        record
    }
}

fn value_to_text(value: serde_json::Value) -> String {
    match value {
        serde_json::Value::Null => String::new(),
        serde_json::Value::String(text) => text,
        serde_json::Value::Bool(flag) => flag.to_string(),
        serde_json::Value::Number(number) => number.to_string(),
        other => other.to_string(),
    }
}

struct RecordVisitor;

impl<'de> Visitor<'de> for RecordVisitor {
    type Value = MetadataRecord;

    fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str("a flat metadata object")
    }

    fn visit_map<A>(self, mut map: A) -> Result<Self::Value, A::Error>
    where
        A: MapAccess<'de>,
    {
        let mut record = MetadataRecord::new();
        while let Some((key, value)) = map.next_entry::<String, serde_json::Value>()? {
            record.insert(key, value_to_text(value));
        }
        Ok(record)
    }
}

impl<'de> Deserialize<'de> for MetadataRecord {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        deserializer.deserialize_map(RecordVisitor)
    }
}

/// Best-effort title and artist of a record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DerivedTitle {
    pub title: String,
    pub artist: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decodes_backend_payload_in_key_order() {
        let body = r#"[
            {"filename":"01 - Intro.flac","title":"Intro","album":null,"artist":"Band",
             "album_artist":null,"publisher":null,"disc":"1","track":"1","genre":null,
             "bitrate":320000,"codec":"flac"},
            {"filename":"older.mp3","codec":"mp3"}
        ]"#;
        let history: MetadataHistory = serde_json::from_str(body).unwrap();

        assert_eq!(history.len(), 2);
        let current = &history[0];
        let keys: Vec<&str> = current.entries().map(|(key, _)| key).collect();
        assert_eq!(
            keys,
            [
                "filename",
                "title",
                "album",
                "artist",
                "album_artist",
                "publisher",
                "disc",
                "track",
                "genre",
                "bitrate",
                "codec"
            ]
        );
        assert_eq!(current.field("bitrate"), Some("320000"));
        assert_eq!(current.raw("album"), Some(""));
        assert_eq!(current.field("album"), None);
        assert_eq!(history[1].field("filename"), Some("older.mp3"));
    }

    #[test]
    fn rejects_non_object_records() {
        assert!(serde_json::from_str::<MetadataHistory>(r#"["title"]"#).is_err());
    }

    #[test]
    fn insert_replaces_in_place() {
        let mut record: MetadataRecord = [("title", "A"), ("artist", "B")].into_iter().collect();
        record.insert("title", "C");
        let entries: Vec<_> = record.entries().collect();
        assert_eq!(entries, [("title", "C"), ("artist", "B")]);
    }
}
