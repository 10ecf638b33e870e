use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::text::stemmer::{Stemmer, StemmerKind};
use crate::text::stopwords::{Stopwords, StopwordsKind};

/// Identifies the keys a normalizer produces. Two normalizers with equal
/// profiles normalize every phrase the same way.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NormalizerProfile {
    pub stemmer: String,
    pub stopwords: String,
    pub lowercase: bool,
    pub reorder: bool,
}

impl fmt::Display for NormalizerProfile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "stemmer {}, stopwords {}, lowercase {}, reorder {}",
            self.stemmer, self.stopwords, self.lowercase, self.reorder
        )
    }
}

/// Turns a phrase into its pseudo-phrase: the stopword free, stemmed,
/// alphabetically ordered key used as candidate identity and as the
/// lookup key into a vocabulary.
///
/// Cheap to clone, the stemmer and stopword list are shared.
#[derive(Debug, Clone)]
pub struct PhraseNormalizer {
    stemmer: Arc<dyn Stemmer>,
    stopwords: Arc<dyn Stopwords>,
    lowercase: bool,
    reorder: bool,
}

impl PhraseNormalizer {
    pub fn new(stemmer: Arc<dyn Stemmer>, stopwords: Arc<dyn Stopwords>) -> Self {
        Self {
            stemmer,
            stopwords,
            lowercase: true,
            reorder: true,
        }
    }

    pub fn from_kinds(stemmer: StemmerKind, stopwords: StopwordsKind) -> Self {
        Self::new(Arc::from(stemmer.build()), Arc::from(stopwords.build()))
    }

    /// Keep the letter case of the input
    pub fn with_lowercase(mut self, lowercase: bool) -> Self {
        self.lowercase = lowercase;
        self
    }

    /// Keep the word order of the input
    pub fn with_reorder(mut self, reorder: bool) -> Self {
        self.reorder = reorder;
        self
    }

    pub fn profile(&self) -> NormalizerProfile {
        NormalizerProfile {
            stemmer: self.stemmer.name(),
            stopwords: self.stopwords.name(),
            lowercase: self.lowercase,
            reorder: self.reorder,
        }
    }

    #[inline]
    pub fn is_stopword(&self, word: &str) -> bool {
        self.stopwords.is_stopword(word)
    }

    pub fn stem(&self, word: &str) -> String {
        self.stemmer.stem(word)
    }

    /// Canonical key of `phrase`, `None` when nothing but stopwords and
    /// punctuation is left.
    pub fn normalize(&self, phrase: &str) -> Option<String> {
        self.canonicalize(phrase, self.reorder)
    }

    /// Same as [`normalize`](Self::normalize) but keeps the word order.
    /// Words are stemmed once; normalizing the result again only gives the
    /// original key when the stemmer leaves its own output unchanged and no
    /// stem is a stopword. Plural removal does, Snowball stemmers may not.
    pub fn normalize_as_phrase(&self, phrase: &str) -> Option<String> {
        self.canonicalize(phrase, false)
    }

    fn canonicalize(&self, phrase: &str, reorder: bool) -> Option<String> {
        let cleaned = strip_punctuation(phrase);
        let cleaned = if self.lowercase && !looks_like_abbreviation(&cleaned) {
            cleaned.to_lowercase()
        } else {
            cleaned
        };

        let mut words: Vec<String> = cleaned
            .split_whitespace()
            .filter(|w| !self.stopwords.is_stopword(w))
            .map(strip_possessive)
            .filter(|w| !w.is_empty())
            .map(|w| self.stemmer.stem(w))
            .filter(|w| !w.is_empty())
            .collect();
        if words.is_empty() {
            return None;
        }
        if reorder {
            words.sort_unstable();
        }
        Some(words.join(" "))
    }
}

/// '&' and '.' separate words, '*' and ':' are dropped
fn strip_punctuation(phrase: &str) -> String {
    phrase
        .chars()
        .filter(|c| !matches!(c, '*' | ':'))
        .map(|c| if matches!(c, '&' | '.') { ' ' } else { c })
        .collect()
}

/// Short all-caps tokens such as "FAO" or "UN" keep their case.
pub fn looks_like_abbreviation(phrase: &str) -> bool {
    let (upper, lower) = phrase.chars().fold((0usize, 0usize), |(u, l), c| {
        if c.is_uppercase() {
            (u + 1, l)
        } else if c.is_lowercase() {
            (u, l + 1)
        } else {
            (u, l)
        }
    });
    upper > lower && upper < 5
}

fn strip_possessive(word: &str) -> &str {
    word.strip_suffix("'s")
        .or_else(|| word.strip_suffix('\''))
        .unwrap_or(word)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::text::stemmer::{NoStemmer, SRemovalStemmer};
    use crate::text::stopwords::StopwordSet;

    fn normalizer() -> PhraseNormalizer {
        PhraseNormalizer::new(
            Arc::new(SRemovalStemmer),
            Arc::new(StopwordSet::from_words(["the", "of", "and"])),
        )
    }

    #[test]
    fn word_order_and_stopwords_do_not_matter() {
        let n = normalizer();
        assert_eq!(n.normalize("Forest fires").as_deref(), Some("fire forest"));
        assert_eq!(n.normalize("fires of the forest").as_deref(), Some("fire forest"));
    }

    #[test]
    fn only_stopwords_gives_none() {
        let n = normalizer();
        assert_eq!(n.normalize("the of"), None);
        assert_eq!(n.normalize("  ... "), None);
    }

    #[test]
    fn punctuation_and_possessive() {
        let n = normalizer();
        assert_eq!(n.normalize("farmer's markets").as_deref(), Some("farmer market"));
        assert_eq!(n.normalize("fish&chips").as_deref(), Some("chip fish"));
        assert_eq!(n.normalize("note: *soil*").as_deref(), Some("note soil"));
    }

    #[test]
    fn abbreviations_keep_case() {
        let n = PhraseNormalizer::new(Arc::new(NoStemmer), Arc::new(StopwordSet::empty()));
        assert_eq!(n.normalize("FAO").as_deref(), Some("FAO"));
        assert_eq!(n.normalize("AGROVOC").as_deref(), Some("agrovoc"));
        assert_eq!(n.normalize("Rice").as_deref(), Some("rice"));
        assert!(looks_like_abbreviation("UN"));
        assert!(!looks_like_abbreviation("Un"));
    }

    #[test]
    fn phrase_form_keeps_order() {
        let n = normalizer();
        let phrase = n.normalize_as_phrase("the forest fires").unwrap();
        assert_eq!(phrase, "forest fire");
        assert_eq!(n.normalize(&phrase), n.normalize("the forest fires"));
    }

    #[test]
    fn a_stem_that_is_a_stopword_is_dropped_on_the_second_pass() {
        let n = normalizer();
        let phrase = n.normalize_as_phrase("thes forests").unwrap();
        assert_eq!(phrase, "the forest");
        assert_eq!(n.normalize(&phrase).as_deref(), Some("forest"));
    }

    #[test]
    fn profile_follows_parts_and_flags() {
        let n = normalizer();
        let profile = n.profile();
        assert_eq!(profile.stemmer, "sremoval");
        assert_eq!(profile.stopwords, "custom[and,of,the]");
        assert!(profile.lowercase && profile.reorder);
        assert_ne!(n.clone().with_reorder(false).profile(), profile);
        assert_eq!(
            PhraseNormalizer::from_kinds(StemmerKind::Porter, StopwordsKind::English).profile(),
            NormalizerProfile {
                stemmer: "snowball-english".to_string(),
                stopwords: "english".to_string(),
                lowercase: true,
                reorder: true,
            }
        );
    }
}
