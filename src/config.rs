//! Indexer settings.
//!
//! Everything a trained model needs to reproduce candidate extraction at
//! inference time lives in [`IndexerConfig`], which is stored inside the
//! model. Settings can be built in code or read from a TOML document:
//!
//! ```toml
//! max_phrase_length = 3
//! stemmer = "sremoval"
//! topics_per_document = 5
//!
//! [vocabulary]
//! name = "agrovoc"
//! format = "skos"
//!
//! [features]
//! node_degree = false
//! ```

use std::fmt;
use std::path::Path;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{ConfigError, Result};
use crate::indexer::feature::{ClassMode, FeatureToggles};
use crate::text::{PhraseNormalizer, PhraseTokenizer, StemmerKind, StopwordsKind};
use crate::vocab::{StoreKind, Vocabulary, VocabularyBuilder};

/// Source format of a thesaurus
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum VocabularyFormat {
    /// statement graph, one triple per line
    Skos,
    /// label, non-descriptor and related tables
    Text,
}

impl FromStr for VocabularyFormat {
    type Err = ConfigError;

    fn from_str(s: &str) -> std::result::Result<Self, ConfigError> {
        match s.trim().to_ascii_lowercase().as_str() {
            "skos" => Ok(VocabularyFormat::Skos),
            "text" => Ok(VocabularyFormat::Text),
            _ => Err(ConfigError::UnsupportedVocabularyFormat(s.to_string())),
        }
    }
}

impl TryFrom<String> for VocabularyFormat {
    type Error = ConfigError;

    fn try_from(s: String) -> std::result::Result<Self, ConfigError> {
        s.parse()
    }
}

impl From<VocabularyFormat> for String {
    fn from(format: VocabularyFormat) -> String {
        format.to_string()
    }
}

impl fmt::Display for VocabularyFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            VocabularyFormat::Skos => f.write_str("skos"),
            VocabularyFormat::Text => f.write_str("text"),
        }
    }
}

/// Names the vocabulary a model was trained against
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VocabularyRef {
    pub name: String,
    pub format: VocabularyFormat,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct IndexerConfig {
    pub max_phrase_length: usize,
    pub min_phrase_length: usize,
    pub min_occurrence: u32,
    /// language tag matched against thesaurus literals
    pub language: String,
    pub allow_internal_periods: bool,
    pub stemmer: StemmerKind,
    pub stopwords: StopwordsKind,
    /// `None` for free keyphrase extraction
    pub vocabulary: Option<VocabularyRef>,
    pub features: FeatureToggles,
    pub class_mode: ClassMode,
    pub topics_per_document: usize,
    pub cutoff_probability: f64,
}

impl Default for IndexerConfig {
    fn default() -> Self {
        Self {
            max_phrase_length: 5,
            min_phrase_length: 1,
            min_occurrence: 1,
            language: "en".to_string(),
            allow_internal_periods: true,
            stemmer: StemmerKind::default(),
            stopwords: StopwordsKind::default(),
            vocabulary: None,
            features: FeatureToggles::default(),
            class_mode: ClassMode::default(),
            topics_per_document: 10,
            cutoff_probability: 0.0,
        }
    }
}

impl IndexerConfig {
    pub fn validate(&self) -> std::result::Result<(), ConfigError> {
        if self.min_phrase_length == 0 || self.max_phrase_length < self.min_phrase_length {
            return Err(ConfigError::InvalidPhraseLength {
                min: self.min_phrase_length,
                max: self.max_phrase_length,
            });
        }
        if self.min_occurrence == 0 {
            return Err(ConfigError::InvalidMinOccurrence);
        }
        if let ClassMode::Weighted { num_indexers: 0 } = self.class_mode {
            return Err(ConfigError::InvalidIndexerCount);
        }
        if !(0.0..=1.0).contains(&self.cutoff_probability) {
            return Err(ConfigError::InvalidCutoff(self.cutoff_probability));
        }
        Ok(())
    }

    /// Parses and validates a TOML document; missing keys take defaults
    pub fn from_toml_str(s: &str) -> Result<Self> {
        let config: IndexerConfig = toml::from_str(s)?;
        config.validate()?;
        Ok(config)
    }

    pub fn vocabulary_name(&self) -> Option<&str> {
        self.vocabulary.as_ref().map(|v| v.name.as_str())
    }

    pub fn normalizer(&self) -> PhraseNormalizer {
        PhraseNormalizer::from_kinds(self.stemmer, self.stopwords)
    }

    pub fn tokenizer(&self) -> PhraseTokenizer {
        PhraseTokenizer::new(self.allow_internal_periods)
    }

    /// Builds the configured vocabulary from its source files in `dir`,
    /// parsed according to its format and filtered to the document language.
    /// `None` in free mode.
    pub fn load_vocabulary(
        &self,
        dir: impl AsRef<Path>,
        kind: StoreKind,
        normalizer: &PhraseNormalizer,
    ) -> Result<Option<Vocabulary>> {
        let Some(reference) = &self.vocabulary else {
            return Ok(None);
        };
        VocabularyBuilder::new(reference.name.as_str(), self.language.as_str(), kind, normalizer)
            .from_directory(dir, reference.format)
            .map(Some)
    }
}
