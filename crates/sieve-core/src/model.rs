//! Document records and the ordered metadata mapping.
//!
//! The metadata file is a JSON object keyed by save identifier. Its key order
//! is the review order, so [`Metadata`] keeps an explicit id sequence next to
//! the record map instead of relying on the map's enumeration order.

use serde::de::{MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::collections::{BTreeMap, HashMap};
use std::fmt;
use std::path::{Component, Path};

/// Persisted description of one reviewable file.
///
/// Field names on disk follow the acquisition pipeline's format. Fields this
/// engine does not know about are carried in `extra` and written back as-is.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Document {
    /// Identity and on-disk filename inside the data directory.
    #[serde(rename = "save_fname")]
    pub save_id: String,
    #[serde(rename = "url", default)]
    pub source_url: String,
    #[serde(default)]
    pub hostname: String,
    #[serde(rename = "raw_fname", default)]
    pub raw_filename: String,
    #[serde(default)]
    pub notes: Vec<String>,
    #[serde(default)]
    pub reviewed: bool,
    #[serde(default)]
    pub query: Option<String>,
    #[serde(rename = "download_dt", default)]
    pub acquired_at: Option<String>,
    #[serde(flatten)]
    pub extra: BTreeMap<String, serde_json::Value>,
}

impl Document {
    /// Minimal record for `save_id` with empty provenance.
    #[must_use]
    pub fn new(save_id: impl Into<String>) -> Self {
        Self {
            save_id: save_id.into(),
            source_url: String::new(),
            hostname: String::new(),
            raw_filename: String::new(),
            notes: Vec::new(),
            reviewed: false,
            query: None,
            acquired_at: None,
            extra: BTreeMap::new(),
        }
    }

    pub fn add_note(&mut self, note: impl Into<String>) {
        self.notes.push(note.into());
    }
}

/// True when `save_id` names a file directly inside the data directory: a
/// single normal path component, no separators, no `.`/`..`, not absolute.
#[must_use]
pub fn is_bare_file_name(save_id: &str) -> bool {
    let mut components = Path::new(save_id).components();
    matches!(
        (components.next(), components.next()),
        (Some(Component::Normal(name)), None) if name == save_id
    ) && !save_id.contains('\\')
}

/// Ordered mapping `save_id → Document`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Metadata {
    order: Vec<String>,
    records: HashMap<String, Document>,
}

impl Metadata {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Ids in review order.
    #[must_use]
    pub fn ids(&self) -> &[String] {
        &self.order
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.order.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    #[must_use]
    pub fn contains(&self, save_id: &str) -> bool {
        self.records.contains_key(save_id)
    }

    #[must_use]
    pub fn get(&self, save_id: &str) -> Option<&Document> {
        self.records.get(save_id)
    }

    pub fn get_mut(&mut self, save_id: &str) -> Option<&mut Document> {
        self.records.get_mut(save_id)
    }

    /// Insert or replace a record keyed by its `save_id`.
    ///
    /// A new key is appended to the end of the order; replacing an existing
    /// key keeps its position.
    pub fn insert(&mut self, doc: Document) -> Option<Document> {
        let key = doc.save_id.clone();
        let previous = self.records.insert(key.clone(), doc);
        if previous.is_none() {
            self.order.push(key);
        }
        previous
    }

    pub fn remove(&mut self, save_id: &str) -> Option<Document> {
        let removed = self.records.remove(save_id)?;
        self.order.retain(|id| id != save_id);
        Some(removed)
    }

    /// Records in review order.
    pub fn iter(&self) -> impl Iterator<Item = &Document> {
        self.order.iter().filter_map(|id| self.records.get(id))
    }
}

impl Serialize for Metadata {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.order.len()))?;
        for doc in self.iter() {
            map.serialize_entry(&doc.save_id, doc)?;
        }
        map.end()
    }
}

struct MetadataVisitor;

impl<'de> Visitor<'de> for MetadataVisitor {
    type Value = Metadata;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("a JSON object mapping save ids to document records")
    }

    fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<Metadata, A::Error> {
        let mut metadata = Metadata::new();
        while let Some((key, doc)) = access.next_entry::<String, Document>()? {
            if key != doc.save_id {
                return Err(serde::de::Error::custom(format!(
                    "record key '{key}' does not match its save_fname '{}'",
                    doc.save_id
                )));
            }
            if !is_bare_file_name(&key) {
                return Err(serde::de::Error::custom(format!(
                    "save_fname '{key}' must be a bare file name inside the data directory"
                )));
            }
            if metadata.insert(doc).is_some() {
                return Err(serde::de::Error::custom(format!(
                    "duplicate record key '{key}'"
                )));
            }
        }
        Ok(metadata)
    }
}

impl<'de> Deserialize<'de> for Metadata {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_map(MetadataVisitor)
    }
}
