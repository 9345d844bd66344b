use crate::types::MetaPath;
use std::collections::HashMap;

/// Build the cache key for a disease/drug pair.
pub fn pair_key(disease_id: &str, drug_id: &str) -> String {
    format!("{}-{}", disease_id, drug_id)
}

/// In-memory cache of grouped explanation paths per disease/drug pair.
///
/// Grouping the raw paths is the expensive part of adding a drug to the
/// comparison view, so the grouped result is kept around for the lifetime
/// of the session and survives deselecting the drug.
#[derive(Debug, Default)]
pub struct MetaPathCache {
    entries: HashMap<String, Vec<MetaPath>>,
}

impl MetaPathCache {
    pub fn new() -> Self {
        Self {
            entries: HashMap::new(),
        }
    }

    /// Store grouped paths for a disease/drug pair, replacing any previous entry.
    pub fn insert(&mut self, disease_id: &str, drug_id: &str, meta_paths: Vec<MetaPath>) {
        self.entries.insert(pair_key(disease_id, drug_id), meta_paths);
    }

    /// Look up grouped paths for a disease/drug pair.
    pub fn get(&self, disease_id: &str, drug_id: &str) -> Option<&Vec<MetaPath>> {
        self.entries.get(&pair_key(disease_id, drug_id))
    }

    pub fn contains(&self, disease_id: &str, drug_id: &str) -> bool {
        self.entries.contains_key(&pair_key(disease_id, drug_id))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
