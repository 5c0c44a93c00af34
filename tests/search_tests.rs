//! Property tests for subset search and opponent-combination coverage.

use galaxy_ai::ai::{covering_combos, softmax_target};
use galaxy_ai::search::{best_subset, best_subset_in};
use proptest::prelude::*;

fn binomial(n: usize, k: usize) -> usize {
    (0..k).fold(1, |acc, i| acc * (n - i) / (i + 1))
}

fn distribution(weights: Vec<u8>) -> Vec<f64> {
    let total: f64 = weights.iter().map(|&w| f64::from(w) + 1.0).sum();
    weights.iter().map(|&w| (f64::from(w) + 1.0) / total).collect()
}

proptest! {
    #[test]
    fn prop_additive_best_subset_is_top_k(
        weights in prop::collection::vec(-50i32..50, 1..9),
        k in 0usize..9,
    ) {
        let k = k.min(weights.len());
        let outcome = best_subset(&weights, k, |s| Ok(Some(s.iter().map(|&w| f64::from(w)).sum())))
            .unwrap();

        let mut sorted = weights.clone();
        sorted.sort_unstable_by(|a, b| b.cmp(a));
        let expected: i32 = sorted[..k].iter().sum();

        let (subset, score) = outcome.best.unwrap();
        prop_assert_eq!(subset.len(), k);
        prop_assert_eq!(score, f64::from(expected));
        prop_assert_eq!(outcome.materialized, binomial(weights.len(), k));
    }

    #[test]
    fn prop_range_search_never_worse_than_any_size(
        weights in prop::collection::vec(-20i32..20, 1..7),
    ) {
        let score = |s: &[i32]| Ok(Some(s.iter().map(|&w| f64::from(w)).sum::<f64>()));
        let all = best_subset_in(&weights, 0..=weights.len(), score).unwrap();
        let (_, best) = all.best.unwrap();
        for k in 0..=weights.len() {
            let (_, at_k) = best_subset(&weights, k, score).unwrap().best.unwrap();
            prop_assert!(best >= at_k);
        }
        prop_assert_eq!(all.materialized, 1 << weights.len());
    }

    #[test]
    fn prop_covering_combos_meet_coverage_or_floor(
        raw in prop::collection::vec(prop::collection::vec(any::<u8>(), 2..8), 1..4),
        coverage in 0.1f64..1.0,
    ) {
        let dists: Vec<Vec<f64>> = raw.into_iter().map(distribution).collect();
        let floor = 1.0 / 1024.0;
        let (combos, threshold) = covering_combos(&dists, coverage, floor);

        prop_assert!(!combos.is_empty());
        let mass: f64 = combos.iter().map(|c| c.prob).sum();
        prop_assert!(mass >= coverage || threshold <= floor);
        for combo in &combos {
            prop_assert_eq!(combo.choices.len(), dists.len());
            prop_assert!(combo.prob <= 1.0 + 1e-12);
        }
    }

    #[test]
    fn prop_softmax_target_is_distribution(
        scores in prop::collection::vec(-1.0f64..1.0, 1..10),
        temperature in 0.01f64..2.0,
    ) {
        let target = softmax_target(&scores, temperature);
        prop_assert!((target.iter().sum::<f64>() - 1.0).abs() < 1e-9);

        let best = scores
            .iter()
            .enumerate()
            .fold(0, |b, (i, &s)| if s > scores[b] { i } else { b });
        let top = target.iter().copied().fold(0.0, f64::max);
        prop_assert_eq!(target[best], top);
    }
}

#[test]
fn test_first_of_equal_subsets_wins() {
    let items = ['a', 'b', 'c'];
    let outcome = best_subset(&items, 1, |_| Ok(Some(0.5))).unwrap();
    assert_eq!(outcome.best.unwrap().0, vec!['a']);
}
