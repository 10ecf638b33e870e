use indexmap::IndexMap;
use tracing::debug;

use crate::indexer::candidate::Candidate;
use crate::text::{PhraseNormalizer, PhraseTokenizer};
use crate::vocab::Vocabulary;

/// Candidates of one document keyed by identity, in order of discovery
pub type CandidateSet = IndexMap<String, Candidate>;

/// Slides a window of up to `max_len` words over every phrase of a
/// document and collects candidate identities.
#[derive(Debug, Clone, Copy)]
pub struct CandidateExtractor<'a> {
    pub tokenizer: &'a PhraseTokenizer,
    pub normalizer: &'a PhraseNormalizer,
    pub vocabulary: Option<&'a Vocabulary>,
    pub max_len: usize,
    pub min_len: usize,
    pub min_occurrence: u32,
}

impl<'a> CandidateExtractor<'a> {
    /// Identities of a surface form: its normalized key, or every sense of
    /// that key when a vocabulary is in use
    fn resolve(&self, form: &str) -> Vec<(String, Option<String>)> {
        let Some(key) = self.normalizer.normalize(form) else {
            return Vec::new();
        };
        match self.vocabulary {
            None => vec![(key, None)],
            Some(vocabulary) => vocabulary
                .senses_for(&key)
                .into_iter()
                .map(|id| {
                    let title = vocabulary.label(&id).map(str::to_string);
                    (id, title)
                })
                .collect(),
        }
    }

    pub fn extract(&self, text: &str) -> CandidateSet {
        let tokenized = self.tokenizer.tokenize(text);
        let mut candidates = CandidateSet::new();
        // word position over the whole document
        let mut pos = 0usize;
        let mut total = 0usize;

        for phrase in self.tokenizer.phrases(&tokenized) {
            for end in 0..phrase.len() {
                pos += 1;
                if self.normalizer.is_stopword(phrase[end]) {
                    continue;
                }
                let longest = (end + 1).min(self.max_len);
                for len in 1..=longest {
                    let start = end + 1 - len;
                    if len > 1 && self.normalizer.is_stopword(phrase[start]) {
                        continue;
                    }
                    if len < self.min_len {
                        continue;
                    }
                    let form = phrase[start..=end].join(" ");
                    let position = pos - len;
                    for (identity, title) in self.resolve(&form) {
                        total += 1;
                        match candidates.get_mut(&identity) {
                            Some(candidate) => candidate.record_occurrence(&form, position),
                            None => {
                                let mut candidate = Candidate::new(identity.as_str(), form.as_str(), position);
                                if let Some(title) = title {
                                    candidate = candidate.with_title(title);
                                }
                                candidates.insert(identity, candidate);
                            }
                        }
                    }
                }
            }
        }

        let seen = candidates.len();
        candidates.retain(|_, c| c.frequency() >= self.min_occurrence);
        for candidate in candidates.values_mut() {
            candidate.normalize_positions(total, pos);
        }
        debug!(words = pos, seen, kept = candidates.len(), "candidates extracted");
        candidates
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::text::{NoStemmer, StopwordSet};
    use crate::vocab::{Store, StoreKind, VocabularyStore};

    fn normalizer() -> PhraseNormalizer {
        PhraseNormalizer::new(Arc::new(NoStemmer), Arc::new(StopwordSet::from_words(["the"])))
    }

    fn extractor<'a>(
        tokenizer: &'a PhraseTokenizer,
        normalizer: &'a PhraseNormalizer,
        vocabulary: Option<&'a Vocabulary>,
    ) -> CandidateExtractor<'a> {
        CandidateExtractor {
            tokenizer,
            normalizer,
            vocabulary,
            max_len: 2,
            min_len: 1,
            min_occurrence: 1,
        }
    }

    #[test]
    fn free_indexing_counts_unigrams_and_bigrams() {
        let (t, n) = (PhraseTokenizer::default(), normalizer());
        let set = extractor(&t, &n, None).extract("the quick brown fox the quick fox");

        assert_eq!(set["quick"].frequency(), 2);
        assert_eq!(set["fox"].frequency(), 2);
        assert_eq!(set["brown"].frequency(), 1);
        assert_eq!(set["brown fox"].frequency(), 1);
        assert_eq!(set["fox quick"].frequency(), 1);
        assert_eq!(set["brown quick"].frequency(), 1);
        assert!(!set.contains_key("the"));
        assert!(set.keys().all(|k| !k.starts_with("the") && !k.ends_with("the")));
        // unigrams quick x2, brown, fox x2 plus bigrams quick brown, brown fox, quick fox
        let total: u32 = set.values().map(|c| c.frequency()).sum();
        assert_eq!(total, 8);
        assert_eq!(set["quick"].term_frequency(), 0.25);
        assert_eq!(set["quick"].first_occurrence(), 1.0 / 7.0);
    }

    #[test]
    fn phrases_do_not_cross_punctuation() {
        let (t, n) = (PhraseTokenizer::default(), normalizer());
        let set = extractor(&t, &n, None).extract("green rice, brown rice");
        assert!(set.contains_key("green rice"));
        assert!(set.contains_key("brown rice"));
        assert!(!set.contains_key("brown green") && !set.contains_key("green rice brown"));
        assert_eq!(set["rice"].frequency(), 2);
    }

    #[test]
    fn min_occurrence_filters_after_counting() {
        let (t, n) = (PhraseTokenizer::default(), normalizer());
        let mut ex = extractor(&t, &n, None);
        ex.min_occurrence = 2;
        let set = ex.extract("the quick brown fox the quick fox");
        assert_eq!(set.keys().collect::<Vec<_>>(), vec!["quick", "fox"]);
        // total still counts the dropped occurrences
        assert_eq!(set["quick"].term_frequency(), 0.25);
    }

    #[test]
    fn vocabulary_mode_records_every_sense() {
        let mut store = Store::new(StoreKind::Strings);
        store.add_descriptor("C1", "Savings bank");
        store.add_descriptor("C2", "Blood bank");
        store.add_sense("bank", "C1");
        store.add_sense("bank", "C2");
        store.add_sense("bank blood", "C2");
        let vocabulary = Vocabulary::from_store("v", "en", store);

        let (t, n) = (PhraseTokenizer::default(), normalizer());
        let set = extractor(&t, &n, Some(&vocabulary)).extract("the blood bank");
        assert_eq!(set.keys().collect::<Vec<_>>(), vec!["C1", "C2"]);
        assert_eq!(set["C1"].frequency(), 1);
        assert_eq!(set["C2"].frequency(), 2);
        assert_eq!(set["C2"].title(), Some("Blood bank"));
        assert_eq!(set["C2"].best_full_form(), Some("bank"));
    }

    #[test]
    fn empty_text() {
        let (t, n) = (PhraseTokenizer::default(), normalizer());
        assert!(extractor(&t, &n, None).extract("").is_empty());
        assert!(extractor(&t, &n, None).extract("the, the.").is_empty());
    }
}
