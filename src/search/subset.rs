//! Exhaustive search over subsets of a candidate list.
//!
//! Subsets are generated by include/exclude recursion in item order, so the
//! first subset visited is the leading prefix. The caller materializes and
//! scores each subset; `Ok(None)` marks it illegal. Ties keep the subset
//! found first.

use std::ops::RangeInclusive;

use crate::error::Result;

/// Best subset found and how many subsets were scored.
#[derive(Clone, Debug, PartialEq)]
pub struct SubsetOutcome<T> {
    pub best: Option<(Vec<T>, f64)>,
    pub materialized: usize,
}

impl<T> SubsetOutcome<T> {
    fn empty() -> Self {
        Self {
            best: None,
            materialized: 0,
        }
    }

    fn offer(&mut self, subset: &[T], score: f64)
    where
        T: Clone,
    {
        let better = self.best.as_ref().map_or(true, |(_, best)| score > *best);
        if better {
            self.best = Some((subset.to_vec(), score));
        }
    }

    fn merge(&mut self, other: SubsetOutcome<T>) {
        self.materialized += other.materialized;
        if let Some((subset, score)) = other.best {
            let better = self.best.as_ref().map_or(true, |(_, best)| score > *best);
            if better {
                self.best = Some((subset, score));
            }
        }
    }
}

/// Best subset of exactly `count` items.
pub fn best_subset<T, F>(items: &[T], count: usize, mut score: F) -> Result<SubsetOutcome<T>>
where
    T: Clone,
    F: FnMut(&[T]) -> Result<Option<f64>>,
{
    let mut outcome = SubsetOutcome::empty();
    if count > items.len() {
        return Ok(outcome);
    }
    let mut chosen = Vec::with_capacity(count);
    recurse(items, 0, count, &mut chosen, &mut score, &mut outcome)?;
    Ok(outcome)
}

fn recurse<T, F>(
    items: &[T],
    start: usize,
    count: usize,
    chosen: &mut Vec<T>,
    score: &mut F,
    outcome: &mut SubsetOutcome<T>,
) -> Result<()>
where
    T: Clone,
    F: FnMut(&[T]) -> Result<Option<f64>>,
{
    if chosen.len() == count {
        outcome.materialized += 1;
        if let Some(s) = score(chosen)? {
            outcome.offer(chosen, s);
        }
        return Ok(());
    }
    // Not enough items left to fill the remaining slots.
    if items.len() - start < count - chosen.len() {
        return Ok(());
    }

    chosen.push(items[start].clone());
    recurse(items, start + 1, count, chosen, score, outcome)?;
    chosen.pop();
    recurse(items, start + 1, count, chosen, score, outcome)
}

/// Best subset whose size lies in `sizes`, smallest sizes first.
pub fn best_subset_in<T, F>(items: &[T], sizes: RangeInclusive<usize>, mut score: F) -> Result<SubsetOutcome<T>>
where
    T: Clone,
    F: FnMut(&[T]) -> Result<Option<f64>>,
{
    let mut outcome = SubsetOutcome::empty();
    for count in sizes {
        if count > items.len() {
            break;
        }
        outcome.merge(best_subset(items, count, &mut score)?);
    }
    Ok(outcome)
}

/// Result of a search over special abilities and an inner card subset.
#[derive(Clone, Debug, PartialEq)]
pub struct PairedOutcome<S, T> {
    pub best: Option<(Vec<S>, Vec<T>, f64)>,
    pub materialized: usize,
}

/// Enumerate every subset of `specials` (smallest first) and, for each, the
/// best inner subset of `items` with a size in `sizes(specials)`.
pub fn best_with_specials<S, T, Z, F>(
    specials: &[S],
    items: &[T],
    mut sizes: Z,
    mut score: F,
) -> Result<PairedOutcome<S, T>>
where
    S: Clone,
    T: Clone,
    Z: FnMut(&[S]) -> RangeInclusive<usize>,
    F: FnMut(&[S], &[T]) -> Result<Option<f64>>,
{
    let mut result = PairedOutcome {
        best: None,
        materialized: 0,
    };
    for outer_count in 0..=specials.len() {
        let mut inner_best: Vec<(Vec<S>, Vec<T>, f64)> = Vec::new();
        let outer = best_subset(specials, outer_count, |chosen| {
            let inner = best_subset_in(items, sizes(chosen), |cards| score(chosen, cards))?;
            result.materialized += inner.materialized;
            Ok(inner.best.map(|(cards, s)| {
                inner_best.push((chosen.to_vec(), cards, s));
                s
            }))
        })?;
        if let Some((chosen, s)) = outer.best {
            let cards = inner_best
                .into_iter()
                .find(|(sp, _, score)| sp.len() == chosen.len() && *score == s)
                .map(|(_, cards, _)| cards)
                .unwrap_or_default();
            let better = result.best.as_ref().map_or(true, |(_, _, best)| s > *best);
            if better {
                result.best = Some((chosen, cards, s));
            }
        }
    }
    Ok(result)
}
