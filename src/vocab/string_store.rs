use std::collections::HashMap;

use ahash::RandomState;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::vocab::store::VocabularyStore;

/// String keyed store, ids are kept exactly as given.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StringStore {
    senses: IndexMap<String, Vec<String>>,
    labels: HashMap<String, String, RandomState>,
    non_descriptors: HashMap<String, String, RandomState>,
    related: HashMap<String, Vec<String>, RandomState>,
}

impl StringStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl VocabularyStore for StringStore {
    fn add_sense(&mut self, key: &str, id: &str) {
        self.senses.entry(key.to_string()).or_default().push(id.to_string());
    }

    fn add_descriptor(&mut self, id: &str, label: &str) {
        self.labels.insert(id.to_string(), label.to_string());
    }

    fn add_non_descriptor(&mut self, id: &str, descriptor: &str) {
        self.non_descriptors.insert(id.to_string(), descriptor.to_string());
    }

    fn add_related(&mut self, id: &str, related: &str) {
        let list = self.related.entry(id.to_string()).or_default();
        if !list.iter().any(|r| r == related) {
            list.push(related.to_string());
        }
    }

    fn raw_senses(&self, key: &str) -> Vec<String> {
        self.senses.get(key).cloned().unwrap_or_default()
    }

    fn num_senses(&self, key: &str) -> usize {
        self.senses.get(key).map_or(0, Vec::len)
    }

    fn descriptor_of(&self, id: &str) -> Option<String> {
        self.non_descriptors.get(id).cloned()
    }

    fn label(&self, id: &str) -> Option<&str> {
        self.labels.get(id).map(String::as_str)
    }

    fn related(&self, id: &str) -> Option<Vec<String>> {
        self.related.get(id).cloned()
    }

    fn num_terms(&self) -> usize {
        self.labels.len()
    }

    fn num_non_descriptors(&self) -> usize {
        self.non_descriptors.len()
    }

    fn num_related(&self) -> usize {
        self.related.len()
    }
}
