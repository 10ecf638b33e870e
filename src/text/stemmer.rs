use std::fmt::Debug;

use rust_stemmers::Algorithm;
use serde::{Deserialize, Serialize};

/// Reduces a word to its stem.
/// Must behave identically between training and extraction for one model.
pub trait Stemmer: Debug + Send + Sync {
    fn stem(&self, word: &str) -> String;

    /// Stable identifier, recorded in trained models
    fn name(&self) -> String;
}

/// Leaves every word untouched
#[derive(Debug, Default, Clone, Copy)]
pub struct NoStemmer;

impl Stemmer for NoStemmer {
    fn stem(&self, word: &str) -> String {
        word.to_string()
    }

    fn name(&self) -> String {
        "none".to_string()
    }
}

/// Removes plural endings only.
///
/// Words of three characters or less, and words containing anything other
/// than letters, are returned as they are.
#[derive(Debug, Default, Clone, Copy)]
pub struct SRemovalStemmer;

impl Stemmer for SRemovalStemmer {
    fn stem(&self, word: &str) -> String {
        if word.chars().count() <= 3 || !word.chars().all(char::is_alphabetic) {
            return word.to_string();
        }
        if let Some(base) = word.strip_suffix("sses") {
            format!("{base}ss")
        } else if let Some(base) = word.strip_suffix("ies") {
            format!("{base}i")
        } else if word.ends_with("ss") {
            word.to_string()
        } else if let Some(base) = word.strip_suffix('s') {
            base.to_string()
        } else {
            word.to_string()
        }
    }

    fn name(&self) -> String {
        "sremoval".to_string()
    }
}

/// Languages with a Snowball stemmer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SnowballLanguage {
    English,
    French,
    German,
    Spanish,
}

impl SnowballLanguage {
    pub fn as_str(self) -> &'static str {
        match self {
            SnowballLanguage::English => "english",
            SnowballLanguage::French => "french",
            SnowballLanguage::German => "german",
            SnowballLanguage::Spanish => "spanish",
        }
    }
}

impl From<SnowballLanguage> for Algorithm {
    fn from(lang: SnowballLanguage) -> Self {
        match lang {
            SnowballLanguage::English => Algorithm::English,
            SnowballLanguage::French => Algorithm::French,
            SnowballLanguage::German => Algorithm::German,
            SnowballLanguage::Spanish => Algorithm::Spanish,
        }
    }
}

/// Snowball stemmer backed by `rust_stemmers`
pub struct SnowballStemmer {
    language: SnowballLanguage,
    inner: rust_stemmers::Stemmer,
}

impl SnowballStemmer {
    pub fn new(language: SnowballLanguage) -> Self {
        Self {
            language,
            inner: rust_stemmers::Stemmer::create(language.into()),
        }
    }

    /// Porter style English stemmer
    pub fn porter() -> Self {
        Self::new(SnowballLanguage::English)
    }
}

impl Debug for SnowballStemmer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SnowballStemmer")
            .field("language", &self.language)
            .finish()
    }
}

impl Stemmer for SnowballStemmer {
    fn stem(&self, word: &str) -> String {
        self.inner.stem(word).into_owned()
    }

    fn name(&self) -> String {
        format!("snowball-{}", self.language.as_str())
    }
}

/// Stemmer selection stored in configuration and models.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StemmerKind {
    None,
    SRemoval,
    #[default]
    Porter,
    Snowball(SnowballLanguage),
}

impl StemmerKind {
    pub fn build(self) -> Box<dyn Stemmer> {
        match self {
            StemmerKind::None => Box::new(NoStemmer),
            StemmerKind::SRemoval => Box::new(SRemovalStemmer),
            StemmerKind::Porter => Box::new(SnowballStemmer::porter()),
            StemmerKind::Snowball(lang) => Box::new(SnowballStemmer::new(lang)),
        }
    }
}
