use std::sync::Arc;

use keyphrase_indexer::indexer::extract::CandidateExtractor;
use keyphrase_indexer::indexer::rank::{rank, Scored, UNRANKED};
use keyphrase_indexer::text::{NoStemmer, SRemovalStemmer, StopwordSet, PHRASE_BOUNDARY};
use keyphrase_indexer::{PhraseNormalizer, PhraseTokenizer};
use proptest::prelude::*;

fn normalizer() -> PhraseNormalizer {
    PhraseNormalizer::new(Arc::new(NoStemmer), Arc::new(StopwordSet::from_words(["the", "of", "and"])))
}

fn words(text: &str) -> Vec<&str> {
    text.split(|c: char| !c.is_alphanumeric())
        .filter(|w| !w.is_empty())
        .collect()
}

fn document() -> impl Strategy<Value = String> {
    prop::collection::vec(
        prop::sample::select(vec!["rice", "soil", "the", "erosion", "of", "water", "and", ",", ".", "\n"]),
        0..60,
    )
    .prop_map(|tokens| tokens.join(" "))
}

proptest! {
    #[test]
    fn tokenizer_keeps_words_in_order(text in "[a-z ,;\n]{0,120}") {
        let tokenizer = PhraseTokenizer::default();
        let out = tokenizer.tokenize(&text);
        let rejoined: Vec<&str> = out
            .split(|c: char| c == PHRASE_BOUNDARY || c == ' ')
            .filter(|w| !w.is_empty())
            .collect();
        prop_assert_eq!(rejoined, words(&text));
    }

    #[test]
    fn normalizing_a_canonical_phrase_is_stable(phrase in "[a-z]{1,8}( [a-z]{1,8}){0,4}") {
        let n = normalizer();
        let key = n.normalize(&phrase);
        let again = n.normalize_as_phrase(&phrase).and_then(|p| n.normalize(&p));
        prop_assert_eq!(again, key.clone());
        if let Some(key) = key {
            prop_assert_eq!(n.normalize(&key), Some(key));
        }
    }

    #[test]
    fn plural_removal_keys_are_stable(phrase in "[a-z]{1,8}( [a-z]{1,8}){0,4}") {
        // stopwords no plural stem can turn into
        let n = PhraseNormalizer::new(Arc::new(SRemovalStemmer), Arc::new(StopwordSet::from_words(["a", "of"])));
        let key = n.normalize(&phrase);
        let again = n.normalize_as_phrase(&phrase).and_then(|p| n.normalize(&p));
        prop_assert_eq!(again, key.clone());
        if let Some(key) = key {
            prop_assert_eq!(n.normalize(&key), Some(key));
        }
    }

    #[test]
    fn candidates_respect_their_invariants(text in document(), max_len in 1usize..4, min_occurrence in 1u32..3) {
        let tokenizer = PhraseTokenizer::default();
        let n = normalizer();
        let extractor = CandidateExtractor {
            tokenizer: &tokenizer,
            normalizer: &n,
            vocabulary: None,
            max_len,
            min_len: 1,
            min_occurrence,
        };
        for (key, candidate) in extractor.extract(&text) {
            prop_assert_eq!(key.as_str(), candidate.name());
            prop_assert!(candidate.frequency() >= min_occurrence);
            prop_assert_eq!(candidate.frequency(), candidate.full_forms().values().sum::<u32>());
            prop_assert!(candidate.first_occurrence() <= candidate.last_occurrence());
            prop_assert!((0.0..=1.0).contains(&candidate.first_occurrence()));
            prop_assert!((0.0..=1.0).contains(&candidate.last_occurrence()));
            prop_assert!(candidate.term_frequency() > 0.0 && candidate.term_frequency() <= 1.0);
            prop_assert!(key.split(' ').count() <= max_len);
        }
    }

    #[test]
    fn ranking_is_deterministic_and_stable(
        keys in prop::collection::vec((0u8..3, 0u8..4, 0u8..3), 0..80)
    ) {
        let input: Vec<Scored<usize>> = keys
            .iter()
            .enumerate()
            .map(|(i, &(t, p, d))| Scored {
                item: i,
                tfidf: t as f64 * 0.5,
                probability: p as f64 * 0.25,
                distance: d as f64 * 0.1,
            })
            .collect();
        let first = rank(input.clone());
        let second = rank(input);
        prop_assert_eq!(&first, &second);
        prop_assert_eq!(first.len(), keys.len());

        let mut last_rank = 0u32;
        for pair in first.windows(2) {
            let (a, b) = (&pair[0], &pair[1]);
            prop_assert!(a.probability >= b.probability);
            let same = a.tfidf == b.tfidf && a.probability == b.probability && a.distance == b.distance;
            if same {
                prop_assert!(a.item < b.item);
            }
        }
        for ranked in &first {
            if ranked.rank == UNRANKED {
                prop_assert!(ranked.probability <= 0.0);
            } else {
                prop_assert!(ranked.rank == last_rank || ranked.rank == last_rank + 1);
                last_rank = ranked.rank;
            }
        }
    }
}
