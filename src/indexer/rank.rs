use serde::{Deserialize, Serialize};

use crate::utils::sort::stable_argsort;

/// Rank given to candidates the classifier considers impossible
pub const UNRANKED: u32 = u32::MAX;

/// A candidate with the three sort keys of the ranker
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Scored<T> {
    pub item: T,
    pub tfidf: f64,
    pub probability: f64,
    pub distance: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Ranked<T> {
    pub item: T,
    pub probability: f64,
    pub tfidf: f64,
    pub distance: f64,
    pub rank: u32,
}

impl<T> Ranked<T> {
    pub fn is_ranked(&self) -> bool {
        self.rank != UNRANKED
    }

    fn same_scores(&self, other: &Scored<T>) -> bool {
        self.tfidf == other.tfidf && self.probability == other.probability && self.distance == other.distance
    }
}

fn reorder<T>(items: Vec<T>, order: &[usize]) -> Vec<T> {
    let mut slots: Vec<Option<T>> = items.into_iter().map(Some).collect();
    order.iter().filter_map(|&i| slots[i].take()).collect()
}

fn stable_pass<T>(items: Vec<Scored<T>>, key: impl Fn(&Scored<T>) -> f64) -> Vec<Scored<T>> {
    let keys: Vec<f64> = items.iter().map(key).collect();
    let order = stable_argsort(&keys);
    reorder(items, &order)
}

/// Orders candidates by probability, then tf×idf, then distance, and
/// assigns ranks.
///
/// Three stable ascending passes run from the least to the most
/// significant key, so equal probabilities fall back to tf×idf and then to
/// distance, and fully equal candidates keep their input order.
///
/// Ranks start at 1. A candidate whose probability is not above 0 gets
/// [`UNRANKED`] and does not use up a rank. A run of candidates with
/// exactly equal keys forms a tie block: all of them share one rank and
/// the next candidate after the block gets that rank plus one.
pub fn rank<T>(candidates: Vec<Scored<T>>) -> Vec<Ranked<T>> {
    let sorted = stable_pass(candidates, |s| s.distance);
    let sorted = stable_pass(sorted, |s| -s.tfidf);
    let sorted = stable_pass(sorted, |s| 1.0 - s.probability);

    let mut out: Vec<Ranked<T>> = Vec::with_capacity(sorted.len());
    let mut next = 1u32;
    let mut previous: Option<usize> = None;
    for scored in sorted {
        let rank = if scored.probability <= 0.0 {
            UNRANKED
        } else {
            match previous.map(|i| &out[i]) {
                Some(prev) if prev.same_scores(&scored) => prev.rank,
                _ => {
                    let rank = next;
                    next += 1;
                    rank
                }
            }
        };
        if rank != UNRANKED {
            previous = Some(out.len());
        }
        out.push(Ranked {
            item: scored.item,
            probability: scored.probability,
            tfidf: scored.tfidf,
            distance: scored.distance,
            rank,
        });
    }
    out
}

/// Keeps ranked candidates above `cutoff`, at most `top_n` of them
pub fn select<T>(ranked: Vec<Ranked<T>>, cutoff: f64, top_n: usize) -> Vec<Ranked<T>> {
    ranked
        .into_iter()
        .filter(|r| r.probability > cutoff)
        .take(top_n)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scored(item: &'static str, tfidf: f64, probability: f64, distance: f64) -> Scored<&'static str> {
        Scored {
            item,
            tfidf,
            probability,
            distance,
        }
    }

    fn items<T: Copy>(ranked: &[Ranked<T>]) -> Vec<T> {
        ranked.iter().map(|r| r.item).collect()
    }

    #[test]
    fn probability_then_tfidf_then_distance() {
        let ranked = rank(vec![
            scored("far", 0.2, 0.5, 0.9),
            scored("low", 0.9, 0.1, 0.0),
            scored("near", 0.2, 0.5, 0.1),
            scored("strong", 0.8, 0.5, 0.5),
        ]);
        assert_eq!(items(&ranked), vec!["strong", "near", "far", "low"]);
        assert_eq!(ranked.iter().map(|r| r.rank).collect::<Vec<_>>(), vec![1, 2, 3, 4]);
    }

    #[test]
    fn tie_block_shares_rank() {
        let ranked = rank(vec![
            scored("a", 0.4, 0.7, 0.2),
            scored("c", 0.1, 0.3, 0.5),
            scored("b", 0.4, 0.7, 0.2),
        ]);
        assert_eq!(items(&ranked), vec!["a", "b", "c"]);
        assert_eq!(ranked[0].rank, 1);
        assert_eq!(ranked[1].rank, 1);
        assert_eq!(ranked[2].rank, 2);
    }

    #[test]
    fn impossible_candidates_take_no_rank() {
        let ranked = rank(vec![
            scored("zero", 0.9, 0.0, 0.0),
            scored("one", 0.1, 0.6, 0.3),
            scored("two", 0.1, 0.2, 0.3),
        ]);
        assert_eq!(items(&ranked), vec!["one", "two", "zero"]);
        assert_eq!(ranked[0].rank, 1);
        assert_eq!(ranked[1].rank, 2);
        assert_eq!(ranked[2].rank, UNRANKED);
        assert!(!ranked[2].is_ranked());
    }

    #[test]
    fn repeated_runs_are_identical() {
        let input: Vec<_> = (0..100)
            .map(|i| Scored {
                item: i,
                tfidf: (i % 7) as f64 * 0.1,
                probability: (i % 5) as f64 * 0.2,
                distance: (i % 3) as f64,
            })
            .collect();
        let a = rank(input.clone());
        let b = rank(input);
        assert_eq!(a, b);
        // equal keys keep input order
        for pair in a.windows(2) {
            if pair[0].rank == pair[1].rank && pair[0].rank != UNRANKED {
                assert!(pair[0].item < pair[1].item);
            }
        }
    }

    #[test]
    fn select_applies_cutoff_then_limit() {
        let ranked = rank(vec![
            scored("a", 0.0, 0.9, 0.0),
            scored("b", 0.0, 0.6, 0.0),
            scored("c", 0.0, 0.4, 0.0),
            scored("d", 0.0, 0.0, 0.0),
        ]);
        assert_eq!(items(&select(ranked.clone(), 0.5, 10)), vec!["a", "b"]);
        assert_eq!(items(&select(ranked.clone(), 0.0, 2)), vec!["a", "b"]);
        assert_eq!(items(&select(ranked, 0.0, 10)), vec!["a", "b", "c"]);
    }
}
