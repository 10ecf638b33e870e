//! Error types.
//!
//! Setup problems (`ConfigError`) and a broken environment (`Io`,
//! `Persistence`) are kept apart from data and classifier problems so the
//! caller can decide what is worth retrying.

/// Invalid settings, detected before any document is processed.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("invalid phrase length bounds: min {min}, max {max}")]
    InvalidPhraseLength { min: usize, max: usize },

    #[error("min_occurrence must be at least 1")]
    InvalidMinOccurrence,

    #[error("weighted class mode needs at least one indexer")]
    InvalidIndexerCount,

    #[error("cutoff probability {0} is outside [0, 1]")]
    InvalidCutoff(f64),

    #[error("unsupported vocabulary format {0:?}, use \"skos\" or \"text\"")]
    UnsupportedVocabularyFormat(String),

    #[error("configuration names vocabulary {0:?} but none was supplied")]
    MissingVocabulary(String),

    #[error("vocabulary mismatch: model expects {expected:?}, got {actual:?}")]
    VocabularyMismatch {
        expected: Option<String>,
        actual: Option<String>,
    },

    #[error("vocabulary language {actual:?} differs from document language {expected:?}")]
    LanguageMismatch { expected: String, actual: String },

    #[error("normalizer mismatch: model was trained with {expected}, got {actual}")]
    NormalizerMismatch { expected: String, actual: String },
}

/// Problems reading a thesaurus source.
#[derive(Debug, thiserror::Error)]
pub enum VocabularyError {
    #[error("malformed statement at line {line}: {reason}")]
    MalformedStatement { line: usize, reason: String },

    #[error("malformed table row at line {line}: {reason}")]
    MalformedTableRow { line: usize, reason: String },
}

/// Failures of the pluggable classifier.
#[derive(Debug, thiserror::Error)]
pub enum ClassifierError {
    #[error("training set is empty")]
    EmptyTrainingSet,

    #[error("feature {feature} is not finite: {value}")]
    NonFiniteFeature { feature: &'static str, value: f64 },

    #[error("training failed: {reason}")]
    TrainingFailed { reason: String },
}

/// Crate level error.
#[derive(Debug, thiserror::Error)]
pub enum IndexerError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Vocabulary(#[from] VocabularyError),

    #[error(transparent)]
    Classifier(#[from] ClassifierError),

    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),

    #[error("persistence error: {0}")]
    Persistence(#[from] serde_cbor::Error),

    #[error("configuration file error: {0}")]
    Toml(#[from] toml::de::Error),
}

impl IndexerError {
    /// True for failures of the surrounding environment (files, encoded
    /// bundles) rather than of the data or the settings.
    pub fn is_environment(&self) -> bool {
        matches!(self, IndexerError::Io(_) | IndexerError::Persistence(_))
    }
}

pub type Result<T> = std::result::Result<T, IndexerError>;
