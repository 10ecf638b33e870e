use std::collections::HashMap;

use ahash::RandomState;
use dashmap::DashMap;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::indexer::document::ManualKeyphrases;
use crate::indexer::extract::CandidateSet;

/// Number of training documents each candidate identity occurs in
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GlobalDictionary {
    doc_freq: HashMap<Box<str>, u32, RandomState>,
    num_docs: u32,
}

impl GlobalDictionary {
    pub fn doc_freq(&self, key: &str) -> u32 {
        self.doc_freq.get(key).copied().unwrap_or(0)
    }

    pub fn contains(&self, key: &str) -> bool {
        self.doc_freq.contains_key(key)
    }

    pub fn num_docs(&self) -> u32 {
        self.num_docs
    }

    /// Number of distinct identities
    pub fn len(&self) -> usize {
        self.doc_freq.len()
    }

    pub fn is_empty(&self) -> bool {
        self.doc_freq.is_empty()
    }

    pub fn insert(&mut self, key: &str, doc_freq: u32) {
        self.doc_freq.insert(key.into(), doc_freq);
    }

    pub fn set_num_docs(&mut self, num_docs: u32) {
        self.num_docs = num_docs;
    }
}

/// Summed manual topic counts per label across the training documents
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct KeyphraseDictionary {
    counts: HashMap<Box<str>, u32, RandomState>,
}

impl KeyphraseDictionary {
    pub fn count(&self, label: &str) -> u32 {
        self.counts.get(label).copied().unwrap_or(0)
    }

    pub fn len(&self) -> usize {
        self.counts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }

    pub fn insert(&mut self, label: &str, count: u32) {
        self.counts.insert(label.into(), count);
    }
}

/// Both corpus dictionaries, frozen after one build pass
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CorpusStatistics {
    pub global: GlobalDictionary,
    pub keyphrases: KeyphraseDictionary,
}

impl CorpusStatistics {
    /// Counts over all documents of a training batch. `candidates[i]` and
    /// `manual[i]` belong to the same document.
    pub fn build(candidates: &[CandidateSet], manual: &[Option<ManualKeyphrases>]) -> Self {
        let doc_freq: DashMap<Box<str>, u32, RandomState> = DashMap::with_hasher(RandomState::new());
        candidates.par_iter().for_each(|set| {
            for key in set.keys() {
                doc_freq
                    .entry(key.as_str().into())
                    .and_modify(|count| *count = count.saturating_add(1))
                    .or_insert(1);
            }
        });

        let keyphrase_counts: DashMap<Box<str>, u32, RandomState> = DashMap::with_hasher(RandomState::new());
        manual.par_iter().flatten().for_each(|keyphrases| {
            for (label, count) in keyphrases.iter() {
                keyphrase_counts
                    .entry(label.into())
                    .and_modify(|c| *c = c.saturating_add(count))
                    .or_insert(count);
            }
        });

        let num_docs = u32::try_from(candidates.len()).unwrap_or_else(|_| {
            warn!(documents = candidates.len(), "document count saturated");
            u32::MAX
        });
        let statistics = Self {
            global: GlobalDictionary {
                doc_freq: doc_freq.into_iter().collect(),
                num_docs,
            },
            keyphrases: KeyphraseDictionary {
                counts: keyphrase_counts.into_iter().collect(),
            },
        };
        info!(
            documents = statistics.global.num_docs(),
            identities = statistics.global.len(),
            keyphrases = statistics.keyphrases.len(),
            "dictionaries built"
        );
        statistics
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::indexer::candidate::Candidate;

    fn set(keys: &[&str]) -> CandidateSet {
        keys.iter()
            .map(|k| (k.to_string(), Candidate::new(*k, *k, 0)))
            .collect()
    }

    #[test]
    fn document_frequency_counts_documents() {
        let sets = vec![set(&["fire", "forest"]), set(&["fire"]), set(&[])];
        let stats = CorpusStatistics::build(&sets, &[None, None, None]);
        assert_eq!(stats.global.num_docs(), 3);
        assert_eq!(stats.global.doc_freq("fire"), 2);
        assert_eq!(stats.global.doc_freq("forest"), 1);
        assert_eq!(stats.global.doc_freq("smoke"), 0);
        assert!(stats.keyphrases.is_empty());
    }

    #[test]
    fn keyphrase_counts_are_summed() {
        let manual = vec![
            Some(ManualKeyphrases::from_counts([("fire".to_string(), 2)])),
            None,
            Some(ManualKeyphrases::from_counts([("fire".to_string(), 1), ("soil".to_string(), 1)])),
        ];
        let stats = CorpusStatistics::build(&[set(&[]), set(&[]), set(&[])], &manual);
        assert_eq!(stats.keyphrases.count("fire"), 3);
        assert_eq!(stats.keyphrases.count("soil"), 1);
        assert_eq!(stats.keyphrases.count("rice"), 0);
    }

    #[test]
    fn counts_saturate_instead_of_wrapping() {
        let manual = vec![
            Some(ManualKeyphrases::from_counts([("fire".to_string(), u32::MAX)])),
            Some(ManualKeyphrases::from_counts([("fire".to_string(), 2)])),
        ];
        let stats = CorpusStatistics::build(&[set(&[]), set(&[])], &manual);
        assert_eq!(stats.keyphrases.count("fire"), u32::MAX);
    }
}
