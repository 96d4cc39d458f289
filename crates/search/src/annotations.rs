//! Chapter annotation text
//!
//! Attaches human-authored chapter text to ranked entries. The map is
//! loaded independently of the corpus; a chapter without text gets an
//! empty string, never an error.

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};
use std::path::Path;
use studymatch_core::{DocumentId, RankedEntry, Result, SectionId, SectionKey};

/// One row of the annotation file
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnnotationRecord {
    /// Study identifier
    pub study_id: DocumentId,
    /// Chapter identifier as used in the corpus
    pub chapter: SectionId,
    /// Chapter text
    #[serde(default)]
    pub text: String,
}

/// Chapter text keyed by (study, chapter)
#[derive(Debug, Clone, Default)]
pub struct AnnotationMap {
    texts: FxHashMap<SectionKey, String>,
}

impl AnnotationMap {
    /// Create an empty map
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from annotation rows; a later row replaces an earlier one
    pub fn from_records(records: impl IntoIterator<Item = AnnotationRecord>) -> Self {
        let mut map = Self::new();
        for record in records {
            map.insert(SectionKey::new(record.study_id, record.chapter), record.text);
        }
        map
    }

    /// Load a JSON array of `{"study_id", "chapter", "text"}` rows
    pub fn load_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let records: Vec<AnnotationRecord> = serde_json::from_str(&content)?;
        Ok(Self::from_records(records))
    }

    /// Set the text for a chapter
    pub fn insert(&mut self, key: SectionKey, text: String) {
        self.texts.insert(key, text);
    }

    /// Text for a chapter
    pub fn get(&self, key: &SectionKey) -> Option<&str> {
        self.texts.get(key).map(String::as_str)
    }

    /// Number of annotated chapters
    pub fn len(&self) -> usize {
        self.texts.len()
    }

    /// Whether no chapter is annotated
    pub fn is_empty(&self) -> bool {
        self.texts.is_empty()
    }
}

/// Keep the first `top_n` entries and attach their chapter text
///
/// Every kept entry gets `Some(text)`; a chapter absent from the map (or
/// no map at all) gets `Some("")`.
pub fn attach_annotations(
    mut entries: Vec<RankedEntry>,
    top_n: usize,
    annotations: Option<&AnnotationMap>,
) -> Vec<RankedEntry> {
    entries.truncate(top_n);
    for entry in &mut entries {
        let text = annotations
            .and_then(|map| map.get(&entry.section_key()))
            .unwrap_or_default();
        entry.annotation_text = Some(text.to_string());
    }
    entries
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(doc: &str, section: &str) -> RankedEntry {
        RankedEntry {
            document_id: DocumentId::new(doc),
            section_id: SectionId::new(section),
            average_distance: 1.0,
            distinct_ply_matches: 1,
            total_close_references: 1,
            annotation_text: None,
        }
    }

    #[test]
    fn test_attach_found_and_missing() {
        let mut map = AnnotationMap::new();
        map.insert(SectionKey::new("d1", "s1"), "Control the centre.".to_string());

        let attached = attach_annotations(vec![entry("d1", "s1"), entry("d2", "s1")], 5, Some(&map));
        assert_eq!(attached.len(), 2);
        assert_eq!(attached[0].annotation_text.as_deref(), Some("Control the centre."));
        assert_eq!(attached[1].annotation_text.as_deref(), Some(""));
    }

    #[test]
    fn test_attach_without_map() {
        let attached = attach_annotations(vec![entry("d1", "s1")], 1, None);
        assert_eq!(attached[0].annotation_text.as_deref(), Some(""));
    }

    #[test]
    fn test_attach_truncates_to_top_n() {
        let entries = vec![entry("a", "s"), entry("b", "s"), entry("c", "s")];
        let attached = attach_annotations(entries, 2, None);
        assert_eq!(attached.len(), 2);
        assert_eq!(attached[1].document_id.as_str(), "b");
    }

    #[test]
    fn test_key_needs_both_parts() {
        let map = AnnotationMap::from_records(vec![AnnotationRecord {
            study_id: DocumentId::new("d1"),
            chapter: SectionId::new("s1"),
            text: "text".to_string(),
        }]);
        assert_eq!(map.get(&SectionKey::new("d1", "s1")), Some("text"));
        assert_eq!(map.get(&SectionKey::new("d1", "s2")), None);
        assert_eq!(map.get(&SectionKey::new("d2", "s1")), None);
    }

    #[test]
    fn test_load_file() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("chapters.json");
        std::fs::write(
            &path,
            r#"[
                {"study_id": "d1", "chapter": "Study - Chapter 1", "text": "one"},
                {"study_id": "d1", "chapter": "Study - Chapter 2"}
            ]"#,
        )
        .unwrap();
        let map = AnnotationMap::load_file(&path).unwrap();
        assert_eq!(map.len(), 2);
        assert_eq!(map.get(&SectionKey::new("d1", "Study - Chapter 2")), Some(""));
    }

    #[test]
    fn test_load_file_missing() {
        let dir = tempfile::TempDir::new().unwrap();
        assert!(AnnotationMap::load_file(&dir.path().join("absent.json")).is_err());
    }
}
