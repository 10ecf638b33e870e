//! This crate assigns ranked topics to documents: free keyphrases picked from
//! the text itself, or terms of a controlled vocabulary.

pub mod config;
pub mod error;
pub mod indexer;
pub mod text;
pub mod utils;
pub mod vocab;

/// Topic Indexer
/// A validated configuration bound to its phrase tokenizer, normalizer and,
/// for term assignment, a vocabulary.
///
/// It extracts candidate phrases from documents and trains a model from
/// documents that carry manual topics:
/// - Candidate extraction with a sliding window of up to `max_phrase_length` words
/// - Resolution of manual topic listings
/// - Corpus statistics (document frequency, keyphrase frequency)
/// - Training vectors with the document's own contribution left out
///
/// Any `Classifier` can be plugged into `train`.
pub use indexer::TopicIndexer;

/// Trained Model
/// Corpus dictionaries, the trained classifier, the configuration they were
/// built with and the profile of the normalizer that produced their keys.
///
/// The vocabulary is not part of the model. It is re-attached when a
/// `TopicExtractor` is created, and the vocabulary name has to match the one
/// the model was trained against. Binding with a normalizer of another
/// profile fails.
///
/// # Serialization
/// Supported, as CBOR via `save` / `load`.
pub use indexer::model::TopicModel;

/// Topic Extractor
/// A `TopicModel` bound to its vocabulary. Ranks the candidates of each
/// document by classifier probability, tf×idf and first occurrence and keeps
/// the best `topics_per_document` above the cutoff probability.
///
/// # Thread Safety
/// Read-only after construction. `extract_all` indexes documents in parallel.
pub use indexer::model::{DocumentTopics, RankedTopic, TopicExtractor};

/// Documents and their manual topics
pub use indexer::document::{Document, ManualKeyphrases};

/// Candidate
/// Occurrence record of one phrase identity within a document: frequency,
/// relative first and last position and the surface forms seen.
pub use indexer::candidate::Candidate;

/// Feature vector layout and toggles
pub use indexer::feature::{ClassMode, Feature, FeatureEngine, FeatureToggles, FeatureVector};

/// Classifier Traits
/// `Classifier` trains a `ProbabilityModel` from a `TrainingSet`.
/// A deterministic logistic regression is provided.
pub use indexer::classifier::{Classifier, LogisticModel, LogisticRegression, ProbabilityModel, TrainingSet};

/// Corpus dictionaries, frozen after one build pass
pub use indexer::corpus::{CorpusStatistics, GlobalDictionary, KeyphraseDictionary};

/// Vocabulary
/// A thesaurus index: normalized phrase keys to concept ids, preferred labels,
/// synonyms and related concepts.
///
/// Built once by `VocabularyBuilder` from a statement graph or from flat
/// tables, with either string keyed or interned storage.
///
/// # Serialization
/// Supported. A saved vocabulary is restored verbatim without re-parsing
/// the source.
pub use vocab::{StoreKind, Vocabulary, VocabularyBuilder, VocabularyStore};

/// Text Capabilities
/// Phrase tokenizer, pseudo-phrase normalizer, stemmers and stopword lists.
pub use text::{
    NormalizerProfile, PhraseNormalizer, PhraseTokenizer, Stemmer, StemmerKind, Stopwords, StopwordsKind,
};

pub use config::{IndexerConfig, VocabularyFormat, VocabularyRef};
pub use error::{ClassifierError, ConfigError, IndexerError, Result, VocabularyError};
