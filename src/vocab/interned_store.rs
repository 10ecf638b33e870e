use std::collections::HashMap;

use ahash::RandomState;
use indexmap::{IndexMap, IndexSet};
use serde::{Deserialize, Serialize};

use crate::vocab::store::{prefer_unqualified, VocabularyStore};

/// Store with concept ids interned to `u32`.
///
/// The namespace of the first URI seen (everything up to the last `/`)
/// becomes the shared prefix, ids in that namespace are kept without it.
/// Large thesauri with long concept URIs shrink considerably.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct InternedStore {
    prefix: Option<String>,
    /// interned id text, index = id
    ids: IndexSet<Box<str>>,
    /// whether `ids[i]` had the prefix stripped
    stripped: Vec<bool>,
    senses: IndexMap<String, Vec<u32>>,
    labels: HashMap<u32, String, RandomState>,
    non_descriptors: HashMap<u32, u32, RandomState>,
    related: HashMap<u32, Vec<u32>, RandomState>,
}

impl InternedStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn prefix(&self) -> Option<&str> {
        self.prefix.as_deref()
    }

    fn split<'a>(&self, uri: &'a str) -> (&'a str, bool) {
        match (&self.prefix, uri.rfind('/')) {
            (Some(prefix), Some(pos)) if &uri[..=pos] == prefix.as_str() => (&uri[pos + 1..], true),
            _ => (uri, false),
        }
    }

    fn intern(&mut self, uri: &str) -> u32 {
        if self.prefix.is_none() {
            if let Some(pos) = uri.rfind('/') {
                self.prefix = Some(uri[..=pos].to_string());
            }
        }
        let (local, stripped) = self.split(uri);
        if let Some(idx) = self.ids.get_index_of(local) {
            return idx as u32;
        }
        let (idx, _) = self.ids.insert_full(local.into());
        self.stripped.push(stripped);
        idx as u32
    }

    fn lookup(&self, uri: &str) -> Option<u32> {
        let (local, _) = self.split(uri);
        self.ids.get_index_of(local).map(|idx| idx as u32)
    }

    fn uri_of(&self, id: u32) -> String {
        let idx = id as usize;
        let local = self.ids.get_index(idx).map_or("", |s| &**s);
        match (&self.prefix, self.stripped.get(idx)) {
            (Some(prefix), Some(true)) => format!("{prefix}{local}"),
            _ => local.to_string(),
        }
    }
}

impl VocabularyStore for InternedStore {
    fn add_sense(&mut self, key: &str, id: &str) {
        let id = self.intern(id);
        self.senses.entry(key.to_string()).or_default().push(id);
    }

    fn add_descriptor(&mut self, id: &str, label: &str) {
        let id = self.intern(id);
        self.labels.insert(id, label.to_string());
    }

    fn add_non_descriptor(&mut self, id: &str, descriptor: &str) {
        let id = self.intern(id);
        let descriptor = self.intern(descriptor);
        self.non_descriptors.insert(id, descriptor);
    }

    fn add_related(&mut self, id: &str, related: &str) {
        let id = self.intern(id);
        let related = self.intern(related);
        let list = self.related.entry(id).or_default();
        if !list.contains(&related) {
            list.push(related);
        }
    }

    fn raw_senses(&self, key: &str) -> Vec<String> {
        self.senses
            .get(key)
            .map(|ids| ids.iter().map(|&id| self.uri_of(id)).collect())
            .unwrap_or_default()
    }

    fn num_senses(&self, key: &str) -> usize {
        self.senses.get(key).map_or(0, Vec::len)
    }

    fn descriptor_of(&self, id: &str) -> Option<String> {
        let id = self.lookup(id)?;
        self.non_descriptors.get(&id).map(|&d| self.uri_of(d))
    }

    fn label(&self, id: &str) -> Option<&str> {
        let id = self.lookup(id)?;
        self.labels.get(&id).map(String::as_str)
    }

    fn related(&self, id: &str) -> Option<Vec<String>> {
        let id = self.lookup(id)?;
        self.related
            .get(&id)
            .map(|list| list.iter().map(|&r| self.uri_of(r)).collect())
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

    /// Resolves on interned ids and only builds strings for the result.
    fn senses_for(&self, key: &str) -> Vec<String> {
        let Some(raw) = self.senses.get(key) else {
            return Vec::new();
        };
        let mut resolved: Vec<(u32, bool)> = Vec::with_capacity(raw.len());
        for &sense in raw {
            let id = self.non_descriptors.get(&sense).copied().unwrap_or(sense);
            let Some(label) = self.labels.get(&id) else {
                continue;
            };
            if resolved.iter().any(|&(seen, _)| seen == id) {
                continue;
            }
            resolved.push((id, label.contains('(')));
        }
        prefer_unqualified(resolved)
            .into_iter()
            .map(|id| self.uri_of(id))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const NS: &str = "http://aims.fao.org/aos/agrovoc/";

    fn uri(local: &str) -> String {
        format!("{NS}{local}")
    }

    #[test]
    fn prefix_is_stripped_and_restored() {
        let mut s = InternedStore::new();
        s.add_descriptor(&uri("c_1"), "Maize");
        s.add_sense("maiz", &uri("c_1"));
        assert_eq!(s.prefix(), Some(NS));
        assert_eq!(s.senses_for("maiz"), vec![uri("c_1")]);
        assert_eq!(s.label(&uri("c_1")), Some("Maize"));
    }

    #[test]
    fn foreign_namespace_kept_whole() {
        let mut s = InternedStore::new();
        s.add_descriptor(&uri("c_1"), "Maize");
        s.add_related(&uri("c_1"), "http://example.org/x/c_1");
        assert_eq!(
            s.related(&uri("c_1")),
            Some(vec!["http://example.org/x/c_1".to_string()])
        );
    }

    #[test]
    fn synthetic_ids_without_namespace() {
        let mut s = InternedStore::new();
        s.add_descriptor(&uri("c_1"), "Maize");
        s.add_descriptor("d_0", "Corn");
        s.add_non_descriptor("d_0", &uri("c_1"));
        s.add_sense("corn", "d_0");
        assert_eq!(s.senses_for("corn"), vec![uri("c_1")]);
        assert_eq!(s.num_non_descriptors(), 1);
    }

    #[test]
    fn matches_string_store_on_ambiguity() {
        let mut s = InternedStore::new();
        s.add_descriptor("C1", "River bank");
        s.add_descriptor("C2", "Bank (finance)");
        s.add_sense("bank", "C2");
        s.add_sense("bank", "C1");
        assert_eq!(s.senses_for("bank"), vec!["C1".to_string()]);
    }
}
