use std::ops::Index;

use serde::{Deserialize, Serialize};

use crate::indexer::candidate::Candidate;
use crate::indexer::corpus::CorpusStatistics;
use crate::indexer::document::ManualKeyphrases;
use crate::indexer::extract::CandidateSet;
use crate::vocab::Vocabulary;

pub const NUM_FEATURES: usize = 10;

/// Feature slots, in vector order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Feature {
    TermFrequency,
    InverseDocumentFrequency,
    TfIdf,
    FirstOccurrence,
    LastOccurrence,
    Spread,
    DomainKeyphraseness,
    Length,
    Generality,
    NodeDegree,
}

impl Feature {
    pub const ALL: [Feature; NUM_FEATURES] = [
        Feature::TermFrequency,
        Feature::InverseDocumentFrequency,
        Feature::TfIdf,
        Feature::FirstOccurrence,
        Feature::LastOccurrence,
        Feature::Spread,
        Feature::DomainKeyphraseness,
        Feature::Length,
        Feature::Generality,
        Feature::NodeDegree,
    ];

    #[inline]
    pub fn index(self) -> usize {
        self as usize
    }

    pub fn name(self) -> &'static str {
        match self {
            Feature::TermFrequency => "term_frequency",
            Feature::InverseDocumentFrequency => "inverse_document_frequency",
            Feature::TfIdf => "tf_idf",
            Feature::FirstOccurrence => "first_occurrence",
            Feature::LastOccurrence => "last_occurrence",
            Feature::Spread => "spread",
            Feature::DomainKeyphraseness => "domain_keyphraseness",
            Feature::Length => "length",
            Feature::Generality => "generality",
            Feature::NodeDegree => "node_degree",
        }
    }
}

/// Which features are computed. Disabled ones stay at 0 and are ignored
/// by the classifier, the vector layout does not change.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FeatureToggles {
    pub term_frequency: bool,
    pub inverse_document_frequency: bool,
    pub tf_idf: bool,
    pub first_occurrence: bool,
    pub last_occurrence: bool,
    pub spread: bool,
    pub domain_keyphraseness: bool,
    pub length: bool,
    /// reserved, always computed as 0
    pub generality: bool,
    pub node_degree: bool,
}

impl Default for FeatureToggles {
    fn default() -> Self {
        Self {
            generality: false,
            ..Self::all()
        }
    }
}

impl FeatureToggles {
    pub fn all() -> Self {
        Self {
            term_frequency: true,
            inverse_document_frequency: true,
            tf_idf: true,
            first_occurrence: true,
            last_occurrence: true,
            spread: true,
            domain_keyphraseness: true,
            length: true,
            generality: true,
            node_degree: true,
        }
    }

    pub fn none() -> Self {
        Self {
            term_frequency: false,
            inverse_document_frequency: false,
            tf_idf: false,
            first_occurrence: false,
            last_occurrence: false,
            spread: false,
            domain_keyphraseness: false,
            length: false,
            generality: false,
            node_degree: false,
        }
    }

    /// tf×idf and first occurrence only
    pub fn basic() -> Self {
        Self {
            tf_idf: true,
            first_occurrence: true,
            ..Self::none()
        }
    }

    pub fn is_enabled(&self, feature: Feature) -> bool {
        match feature {
            Feature::TermFrequency => self.term_frequency,
            Feature::InverseDocumentFrequency => self.inverse_document_frequency,
            Feature::TfIdf => self.tf_idf,
            Feature::FirstOccurrence => self.first_occurrence,
            Feature::LastOccurrence => self.last_occurrence,
            Feature::Spread => self.spread,
            Feature::DomainKeyphraseness => self.domain_keyphraseness,
            Feature::Length => self.length,
            Feature::Generality => self.generality,
            Feature::NodeDegree => self.node_degree,
        }
    }

    pub fn enabled(&self) -> impl Iterator<Item = Feature> + '_ {
        Feature::ALL.into_iter().filter(|f| self.is_enabled(*f))
    }
}

/// How the training target of a candidate is derived from the manual topics
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ClassMode {
    /// 1 when the candidate is a manual topic
    #[default]
    Nominal,
    /// manual count divided by the number of indexers
    Weighted { num_indexers: u32 },
}

/// Fixed width feature vector plus the training target
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct FeatureVector {
    pub values: [f64; NUM_FEATURES],
    pub class_value: f64,
}

impl FeatureVector {
    #[inline]
    pub fn get(&self, feature: Feature) -> f64 {
        self.values[feature.index()]
    }

    #[inline]
    pub fn set(&mut self, feature: Feature, value: f64) {
        self.values[feature.index()] = value;
    }

    pub fn is_positive(&self) -> bool {
        self.class_value > 0.0
    }
}

impl Index<Feature> for FeatureVector {
    type Output = f64;

    fn index(&self, feature: Feature) -> &f64 {
        &self.values[feature.index()]
    }
}

/// Computes feature vectors against frozen corpus statistics.
#[derive(Debug, Clone, Copy)]
pub struct FeatureEngine<'a> {
    toggles: FeatureToggles,
    class_mode: ClassMode,
    statistics: &'a CorpusStatistics,
    vocabulary: Option<&'a Vocabulary>,
}

impl<'a> FeatureEngine<'a> {
    pub fn new(
        toggles: FeatureToggles,
        class_mode: ClassMode,
        statistics: &'a CorpusStatistics,
        vocabulary: Option<&'a Vocabulary>,
    ) -> Self {
        Self {
            toggles,
            class_mode,
            statistics,
            vocabulary,
        }
    }

    /// `-ln((df + 1) / (N + 1))`; while training the document's own
    /// contribution is left out of `df`.
    pub fn idf(&self, key: &str, training: bool) -> f64 {
        let global = &self.statistics.global;
        let mut df = global.doc_freq(key) as f64;
        if training && global.contains(key) {
            df -= 1.0;
        }
        -((df + 1.0) / (global.num_docs() as f64 + 1.0)).ln()
    }

    pub fn compute(
        &self,
        candidate: &Candidate,
        training: bool,
        manual: Option<&ManualKeyphrases>,
        siblings: &CandidateSet,
    ) -> FeatureVector {
        let mut vector = FeatureVector::default();
        let t = &self.toggles;
        let label = candidate.label();

        let tf = candidate.term_frequency();
        let idf = self.idf(candidate.name(), training);
        if t.term_frequency {
            vector.set(Feature::TermFrequency, tf);
        }
        if t.inverse_document_frequency {
            vector.set(Feature::InverseDocumentFrequency, idf);
        }
        if t.tf_idf {
            vector.set(Feature::TfIdf, tf * idf);
        }
        if t.first_occurrence {
            vector.set(Feature::FirstOccurrence, candidate.first_occurrence());
        }
        if t.last_occurrence {
            vector.set(Feature::LastOccurrence, candidate.last_occurrence());
        }
        if t.spread {
            vector.set(Feature::Spread, candidate.spread());
        }

        if t.domain_keyphraseness {
            let count = self.statistics.keyphrases.count(label) as f64;
            let own = training && manual.is_some_and(|m| m.contains(label));
            let value = if own { (count - 1.0).max(0.0) } else { count };
            vector.set(Feature::DomainKeyphraseness, value);
        }

        if t.length {
            let form = if self.vocabulary.is_some() {
                candidate.title()
            } else {
                candidate.best_full_form()
            };
            let words = form.map_or(1, |f| f.split_whitespace().count().max(1));
            vector.set(Feature::Length, words as f64);
        }

        if t.node_degree {
            let degree = self
                .vocabulary
                .and_then(|v| v.related_concepts(candidate.name()))
                .map_or(0, |related| related.iter().filter(|r| siblings.contains_key(r.as_str())).count());
            vector.set(Feature::NodeDegree, degree as f64);
        }

        vector.class_value = match manual.and_then(|m| m.get(label)) {
            None => 0.0,
            Some(count) => match self.class_mode {
                ClassMode::Nominal => 1.0,
                ClassMode::Weighted { num_indexers } => count as f64 / num_indexers.max(1) as f64,
            },
        };
        vector
    }

    /// Vectors for every candidate of one document, in candidate order
    pub fn compute_all(
        &self,
        candidates: &CandidateSet,
        training: bool,
        manual: Option<&ManualKeyphrases>,
    ) -> Vec<FeatureVector> {
        candidates
            .values()
            .map(|c| self.compute(c, training, manual, candidates))
            .collect()
    }
}
