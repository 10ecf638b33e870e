use std::fs::File;
use std::io::{BufReader, BufWriter, Read, Write};
use std::path::Path;
use std::sync::Arc;

use rayon::prelude::*;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tracing::{debug, error, info};

use crate::config::IndexerConfig;
use crate::error::{ConfigError, Result};
use crate::indexer::candidate::Candidate;
use crate::indexer::classifier::ProbabilityModel;
use crate::indexer::corpus::CorpusStatistics;
use crate::indexer::document::Document;
use crate::indexer::feature::FeatureEngine;
use crate::indexer::rank::{rank, select, Scored};
use crate::indexer::TopicIndexer;
use crate::text::{NormalizerProfile, PhraseNormalizer};
use crate::vocab::Vocabulary;

/// Result of a training pass. Holds everything extraction needs except
/// the vocabulary, which is re-attached by [`TopicExtractor::new`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TopicModel<M> {
    config: IndexerConfig,
    normalizer: NormalizerProfile,
    statistics: CorpusStatistics,
    classifier: M,
}

impl<M> TopicModel<M> {
    pub fn new(
        config: IndexerConfig,
        normalizer: NormalizerProfile,
        statistics: CorpusStatistics,
        classifier: M,
    ) -> Self {
        Self {
            config,
            normalizer,
            statistics,
            classifier,
        }
    }

    pub fn config(&self) -> &IndexerConfig {
        &self.config
    }

    /// Profile of the normalizer the training keys were produced with
    pub fn normalizer(&self) -> &NormalizerProfile {
        &self.normalizer
    }

    pub fn statistics(&self) -> &CorpusStatistics {
        &self.statistics
    }

    pub fn classifier(&self) -> &M {
        &self.classifier
    }
}

impl<M: Serialize + DeserializeOwned> TopicModel<M> {
    pub fn save<W: Write>(&self, writer: W) -> Result<()> {
        serde_cbor::to_writer(writer, self)?;
        Ok(())
    }

    pub fn load<R: Read>(reader: R) -> Result<Self> {
        Ok(serde_cbor::from_reader(reader)?)
    }

    pub fn save_to_path(&self, path: impl AsRef<Path>) -> Result<()> {
        let mut writer = BufWriter::new(File::create(path)?);
        self.save(&mut writer)?;
        writer.flush()?;
        Ok(())
    }

    pub fn load_from_path(path: impl AsRef<Path>) -> Result<Self> {
        Self::load(BufReader::new(File::open(path)?))
    }
}

/// One assigned topic
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RankedTopic {
    /// concept id, or the normalized key in free mode
    pub id: String,
    /// preferred label, or the most frequent surface form in free mode
    pub title: String,
    pub probability: f64,
    pub rank: u32,
    /// the topic is among the document's manual topics
    pub is_correct: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DocumentTopics {
    pub id: String,
    pub topics: Vec<RankedTopic>,
}

impl DocumentTopics {
    pub fn num_correct(&self) -> usize {
        self.topics.iter().filter(|t| t.is_correct).count()
    }
}

/// A trained model bound to a vocabulary, ready to index documents.
/// Shared read-only between threads.
#[derive(Debug, Clone)]
pub struct TopicExtractor<M> {
    indexer: TopicIndexer,
    statistics: CorpusStatistics,
    classifier: M,
}

impl<M: ProbabilityModel> TopicExtractor<M> {
    /// Re-binds `model` to `vocabulary`, normalizing with the stemmer and
    /// stopwords named by the model's configuration. Fails when the model
    /// was trained against a vocabulary with another name, against one that
    /// is not given here, or with a different normalizer.
    pub fn new(model: TopicModel<M>, vocabulary: Option<Arc<Vocabulary>>) -> Result<Self> {
        let normalizer = model.config.normalizer();
        Self::bind(model, vocabulary, normalizer)
    }

    /// Same as [`new`](Self::new) with an explicit normalizer, which must
    /// have the profile the model was trained with.
    pub fn bind(
        model: TopicModel<M>,
        vocabulary: Option<Arc<Vocabulary>>,
        normalizer: PhraseNormalizer,
    ) -> Result<Self> {
        let TopicModel {
            config,
            normalizer: expected,
            statistics,
            classifier,
        } = model;
        let actual = normalizer.profile();
        if actual != expected {
            return Err(ConfigError::NormalizerMismatch {
                expected: expected.to_string(),
                actual: actual.to_string(),
            }
            .into());
        }
        Ok(Self {
            indexer: TopicIndexer::new(config, vocabulary)?.with_normalizer(normalizer),
            statistics,
            classifier,
        })
    }

    pub fn indexer(&self) -> &TopicIndexer {
        &self.indexer
    }

    pub fn extract(&self, document: &Document) -> DocumentTopics {
        let config = self.indexer.config();
        let candidates = self.indexer.extract_candidates(&document.text);
        let manual = self.indexer.resolve_manual(document);
        let engine = FeatureEngine::new(
            config.features,
            config.class_mode,
            &self.statistics,
            self.indexer.vocabulary(),
        );

        let mut scored: Vec<Scored<&Candidate>> = Vec::with_capacity(candidates.len());
        for candidate in candidates.values() {
            let vector = engine.compute(candidate, false, manual.as_ref(), &candidates);
            let probability = match self.classifier.predict(&vector) {
                Ok(p) => p,
                Err(err) => {
                    error!(document = %document.id, candidate = candidate.name(), %err, "prediction failed, skipping");
                    continue;
                }
            };
            scored.push(Scored {
                item: candidate,
                tfidf: candidate.term_frequency() * engine.idf(candidate.name(), false),
                probability,
                distance: candidate.first_occurrence(),
            });
        }

        let ranked = select(rank(scored), config.cutoff_probability, config.topics_per_document);
        let topics: Vec<RankedTopic> = ranked
            .into_iter()
            .map(|r| {
                let candidate = r.item;
                let title = candidate
                    .title()
                    .or_else(|| candidate.best_full_form())
                    .unwrap_or(candidate.name());
                RankedTopic {
                    id: candidate.name().to_string(),
                    title: title.to_string(),
                    probability: r.probability,
                    rank: r.rank,
                    is_correct: manual.as_ref().is_some_and(|m| m.contains(candidate.label())),
                }
            })
            .collect();
        debug!(document = %document.id, candidates = candidates.len(), topics = topics.len(), "topics assigned");
        DocumentTopics {
            id: document.id.clone(),
            topics,
        }
    }

    /// Indexes documents in parallel, results in input order
    pub fn extract_all(&self, documents: &[Document]) -> Vec<DocumentTopics> {
        let results: Vec<DocumentTopics> = documents.par_iter().map(|d| self.extract(d)).collect();
        info!(
            documents = results.len(),
            topics = results.iter().map(|r| r.topics.len()).sum::<usize>(),
            "documents indexed"
        );
        results
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{ClassifierError, IndexerError};
    use crate::indexer::feature::{Feature, FeatureVector};

    /// scores candidates by their tf×idf slot
    #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
    struct TfIdfModel;

    impl ProbabilityModel for TfIdfModel {
        fn predict(&self, vector: &FeatureVector) -> std::result::Result<f64, ClassifierError> {
            let value = vector.get(Feature::TfIdf);
            Ok(value.min(1.0))
        }
    }

    #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
    struct FailOnFirst;

    impl ProbabilityModel for FailOnFirst {
        fn predict(&self, vector: &FeatureVector) -> std::result::Result<f64, ClassifierError> {
            if vector.get(Feature::FirstOccurrence) == 0.0 {
                return Err(ClassifierError::TrainingFailed {
                    reason: "rejected".to_string(),
                });
            }
            Ok(0.5)
        }
    }

    fn config() -> IndexerConfig {
        IndexerConfig {
            max_phrase_length: 2,
            stemmer: crate::text::StemmerKind::None,
            ..Default::default()
        }
    }

    fn trained_model<M>(config: IndexerConfig, classifier: M) -> TopicModel<M> {
        let profile = config.normalizer().profile();
        TopicModel::new(config, profile, statistics(), classifier)
    }

    fn statistics() -> CorpusStatistics {
        let mut stats = CorpusStatistics::default();
        stats.global.set_num_docs(4);
        stats.global.insert("rice", 4);
        stats
    }

    #[test]
    fn ranks_and_flags_manual_topics() {
        let extractor = TopicExtractor::new(trained_model(config(), TfIdfModel), None).unwrap();
        let doc = Document::with_topics("d1", "rice paddies and rice terraces", vec![("terraces".into(), 1)]);
        let result = extractor.extract(&doc);

        assert_eq!(result.id, "d1");
        let ids: Vec<&str> = result.topics.iter().map(|t| t.id.as_str()).collect();
        // rice is in every training document, so its idf and probability are 0
        assert!(!ids.contains(&"rice"));
        assert!(ids.contains(&"terraces"));
        assert_eq!(result.topics[0].rank, 1);
        assert!(result.topics.iter().all(|t| t.probability > 0.0));
        assert_eq!(result.num_correct(), 1);
        let terraces = result.topics.iter().find(|t| t.id == "terraces").unwrap();
        assert!(terraces.is_correct);
        assert_eq!(terraces.title, "terraces");
    }

    #[test]
    fn prediction_failures_skip_the_candidate() {
        let extractor = TopicExtractor::new(trained_model(config(), FailOnFirst), None).unwrap();
        let result = extractor.extract(&Document::new("d1", "terraces of rice"));
        assert!(result.topics.iter().all(|t| t.id != "terraces"));
        assert!(result.topics.iter().any(|t| t.id == "rice"));
    }

    #[test]
    fn top_n_limits_output() {
        let mut config = config();
        config.topics_per_document = 1;
        let extractor = TopicExtractor::new(trained_model(config, TfIdfModel), None).unwrap();
        let results = extractor.extract_all(&[
            Document::new("a", "green terraces, wet paddies"),
            Document::new("b", ""),
        ]);
        assert_eq!(results.len(), 2);
        assert_eq!(results[0].topics.len(), 1);
        assert!(results[1].topics.is_empty());
    }

    #[test]
    fn model_round_trips_through_cbor() {
        let model = trained_model(config(), TfIdfModel);
        let mut buf = Vec::new();
        model.save(&mut buf).unwrap();
        let loaded: TopicModel<TfIdfModel> = TopicModel::load(buf.as_slice()).unwrap();
        assert_eq!(loaded, model);

        let err = TopicModel::<TfIdfModel>::load(&b"nope"[..]).unwrap_err();
        assert!(err.is_environment());
    }

    #[test]
    fn extraction_needs_the_training_normalizer() {
        use crate::text::{NoStemmer, SRemovalStemmer, StopwordSet};

        let custom = PhraseNormalizer::new(Arc::new(NoStemmer), Arc::new(StopwordSet::from_words(["of"])));
        let trained = TopicModel::new(config(), custom.profile(), statistics(), TfIdfModel);

        let err = TopicExtractor::new(trained.clone(), None).unwrap_err();
        assert!(matches!(err, IndexerError::Config(ConfigError::NormalizerMismatch { .. })));

        let other = PhraseNormalizer::new(Arc::new(SRemovalStemmer), Arc::new(StopwordSet::from_words(["of"])));
        let err = TopicExtractor::bind(trained.clone(), None, other).unwrap_err();
        assert!(matches!(err, IndexerError::Config(ConfigError::NormalizerMismatch { .. })));

        let extractor = TopicExtractor::bind(trained, None, custom).unwrap();
        let result = extractor.extract(&Document::new("d1", "terraces of rice"));
        assert!(result.topics.iter().any(|t| t.id == "terraces"));
    }
}
