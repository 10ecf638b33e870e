//! Candidate extraction, corpus statistics, features, classification and
//! ranking.

pub mod candidate;
pub mod classifier;
pub mod corpus;
pub mod document;
pub mod extract;
pub mod feature;
pub mod model;
pub mod rank;

use std::sync::Arc;

use rayon::prelude::*;
use tracing::{debug, info, warn};

use crate::config::IndexerConfig;
use crate::error::{ConfigError, Result};
use crate::text::{PhraseNormalizer, PhraseTokenizer};
use crate::vocab::Vocabulary;

use self::classifier::{Classifier, TrainingSet};
use self::corpus::CorpusStatistics;
use self::document::{Document, ManualKeyphrases};
use self::extract::{CandidateExtractor, CandidateSet};
use self::feature::FeatureEngine;
use self::model::TopicModel;

/// Validated configuration bound to its text capabilities and, in term
/// assignment mode, to a vocabulary.
#[derive(Debug, Clone)]
pub struct TopicIndexer {
    config: IndexerConfig,
    normalizer: PhraseNormalizer,
    tokenizer: PhraseTokenizer,
    vocabulary: Option<Arc<Vocabulary>>,
}

impl TopicIndexer {
    /// Fails when the configuration is invalid, when the vocabulary does
    /// not match the one the configuration names, or when it was built for
    /// another document language.
    pub fn new(config: IndexerConfig, vocabulary: Option<Arc<Vocabulary>>) -> Result<Self> {
        config.validate()?;
        match (config.vocabulary_name(), vocabulary.as_deref()) {
            (Some(expected), None) => {
                return Err(ConfigError::MissingVocabulary(expected.to_string()).into());
            }
            (expected, Some(actual)) if expected != Some(actual.name()) => {
                return Err(ConfigError::VocabularyMismatch {
                    expected: expected.map(str::to_string),
                    actual: Some(actual.name().to_string()),
                }
                .into());
            }
            _ => {}
        }
        if let Some(actual) = vocabulary.as_deref() {
            if actual.language() != config.language {
                return Err(ConfigError::LanguageMismatch {
                    expected: config.language.clone(),
                    actual: actual.language().to_string(),
                }
                .into());
            }
        }
        let normalizer = config.normalizer();
        let tokenizer = config.tokenizer();
        Ok(Self {
            config,
            normalizer,
            tokenizer,
            vocabulary,
        })
    }

    /// Replaces the normalizer built from the configured kinds. Its profile
    /// is stored in trained models and checked again at extraction.
    pub fn with_normalizer(mut self, normalizer: PhraseNormalizer) -> Self {
        self.normalizer = normalizer;
        self
    }

    pub fn config(&self) -> &IndexerConfig {
        &self.config
    }

    pub fn normalizer(&self) -> &PhraseNormalizer {
        &self.normalizer
    }

    pub fn vocabulary(&self) -> Option<&Vocabulary> {
        self.vocabulary.as_deref()
    }

    pub fn extractor(&self) -> CandidateExtractor<'_> {
        CandidateExtractor {
            tokenizer: &self.tokenizer,
            normalizer: &self.normalizer,
            vocabulary: self.vocabulary(),
            max_len: self.config.max_phrase_length,
            min_len: self.config.min_phrase_length,
            min_occurrence: self.config.min_occurrence,
        }
    }

    pub fn extract_candidates(&self, text: &str) -> CandidateSet {
        self.extractor().extract(text)
    }

    pub fn resolve_manual(&self, document: &Document) -> Option<ManualKeyphrases> {
        ManualKeyphrases::resolve(document, &self.normalizer, self.vocabulary())
    }

    /// Candidates and resolved manual topics of every document, in input order
    fn prepare(&self, documents: &[Document]) -> (Vec<CandidateSet>, Vec<Option<ManualKeyphrases>>) {
        documents
            .par_iter()
            .map(|document| {
                let candidates = self.extract_candidates(&document.text);
                let manual = self.resolve_manual(document);
                debug!(
                    document = %document.id,
                    candidates = candidates.len(),
                    manual = manual.as_ref().map_or(0, ManualKeyphrases::len),
                    "document prepared"
                );
                (candidates, manual)
            })
            .unzip()
    }

    /// Builds the corpus dictionaries from `documents`, computes training
    /// vectors with the document's own contribution left out and trains
    /// `classifier` on them. Any training failure aborts the batch.
    pub fn train<C: Classifier>(&self, documents: &[Document], classifier: &C) -> Result<TopicModel<C::Model>> {
        let (candidates, manual) = self.prepare(documents);
        for id in without_manual_topics(documents) {
            warn!(document = id, "training document has no manual topics, all its candidates are negatives");
        }
        let statistics = CorpusStatistics::build(&candidates, &manual);

        let engine = FeatureEngine::new(
            self.config.features,
            self.config.class_mode,
            &statistics,
            self.vocabulary(),
        );
        let examples: Vec<_> = candidates
            .par_iter()
            .zip(manual.par_iter())
            .map(|(set, manual)| engine.compute_all(set, true, manual.as_ref()))
            .collect::<Vec<_>>()
            .into_iter()
            .flatten()
            .collect();

        let training = TrainingSet {
            toggles: self.config.features,
            examples,
        };
        info!(
            documents = documents.len(),
            examples = training.len(),
            positive = training.num_positive(),
            "training classifier"
        );
        let trained = classifier.train(&training)?;
        Ok(TopicModel::new(
            self.config.clone(),
            self.normalizer.profile(),
            statistics,
            trained,
        ))
    }
}

/// Ids of documents without any manual topic listing
fn without_manual_topics(documents: &[Document]) -> Vec<&str> {
    documents
        .iter()
        .filter(|d| d.manual_topics.is_none())
        .map(|d| d.id.as_str())
        .collect()
}
