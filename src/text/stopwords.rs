use std::collections::HashSet;
use std::fmt::Debug;

use ahash::RandomState;
use serde::{Deserialize, Serialize};
use stop_words::LANGUAGE;

/// Stopword membership test.
/// Implementations compare case-insensitively.
pub trait Stopwords: Debug + Send + Sync {
    fn is_stopword(&self, word: &str) -> bool;

    /// Stable identifier, recorded in trained models
    fn name(&self) -> String;
}

/// Stopword list held in a hash set of lower-cased words
#[derive(Debug, Clone, Default)]
pub struct StopwordSet {
    words: HashSet<String, RandomState>,
    name: Option<String>,
}

impl StopwordSet {
    /// Empty list: nothing is a stopword
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn from_words<I, T>(words: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: AsRef<str>,
    {
        let words = words
            .into_iter()
            .map(|w| w.as_ref().trim().to_lowercase())
            .filter(|w| !w.is_empty())
            .collect();
        Self { words, name: None }
    }

    /// Names a well known list. Unnamed lists are identified by their words.
    pub fn named(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn for_language(language: LANGUAGE) -> Self {
        Self::from_words(stop_words::get(language))
    }

    pub fn len(&self) -> usize {
        self.words.len()
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }
}

impl Stopwords for StopwordSet {
    #[inline]
    fn is_stopword(&self, word: &str) -> bool {
        if self.words.contains(word) {
            return true;
        }
        // most input is already lower case
        word.chars().any(char::is_uppercase) && self.words.contains(&word.to_lowercase())
    }

    fn name(&self) -> String {
        match &self.name {
            Some(name) => name.clone(),
            None => {
                let mut words: Vec<&str> = self.words.iter().map(String::as_str).collect();
                words.sort_unstable();
                format!("custom[{}]", words.join(","))
            }
        }
    }
}

/// Stopword list selection stored in configuration and models.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StopwordsKind {
    None,
    #[default]
    English,
    French,
    German,
    Spanish,
}

impl StopwordsKind {
    pub fn as_str(self) -> &'static str {
        match self {
            StopwordsKind::None => "none",
            StopwordsKind::English => "english",
            StopwordsKind::French => "french",
            StopwordsKind::German => "german",
            StopwordsKind::Spanish => "spanish",
        }
    }

    pub fn build(self) -> Box<dyn Stopwords> {
        let set = match self {
            StopwordsKind::None => StopwordSet::empty(),
            StopwordsKind::English => StopwordSet::for_language(LANGUAGE::English),
            StopwordsKind::French => StopwordSet::for_language(LANGUAGE::French),
            StopwordsKind::German => StopwordSet::for_language(LANGUAGE::German),
            StopwordsKind::Spanish => StopwordSet::for_language(LANGUAGE::Spanish),
        };
        Box::new(set.named(self.as_str()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn membership_ignores_case() {
        let set = StopwordSet::from_words(["The", "of"]);
        assert!(set.is_stopword("the"));
        assert!(set.is_stopword("THE"));
        assert!(set.is_stopword("Of"));
        assert!(!set.is_stopword("fox"));
        assert_eq!(set.len(), 2);
    }

    #[test]
    fn english_list_contains_articles() {
        let set = StopwordsKind::English.build();
        assert!(set.is_stopword("the"));
        assert!(set.is_stopword("and"));
        assert!(!set.is_stopword("thesaurus"));
    }

    #[test]
    fn none_kind_is_empty() {
        assert!(!StopwordsKind::None.build().is_stopword("the"));
    }

    #[test]
    fn names_identify_the_list() {
        assert_eq!(StopwordsKind::English.build().name(), "english");
        assert_eq!(StopwordSet::from_words(["of", "The"]).name(), "custom[of,the]");
        assert_eq!(StopwordSet::from_words(["the", "of"]).name(), "custom[of,the]");
        assert_eq!(StopwordSet::empty().name(), "custom[]");
    }
}
