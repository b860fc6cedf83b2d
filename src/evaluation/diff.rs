// Topic difference between two models.
//
// Topics are compared by their top-n terms as surface strings, so the two
// models don't need to share a dictionary. Distances are in [0, 1]: 0 for
// identical term profiles, 1 for disjoint ones.
//
// The weighted variant compares term weight vectors:
//
//   1 - sum(min(weight_a, weight_b)) / sum(max(weight_a, weight_b))

use std::collections::{HashMap, HashSet};

use anyhow::Result;
use ndarray::Array2;
use serde::{Deserialize, Serialize};

use crate::models::traits::TopicModel;

/// How two topics' top terms are compared.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DiffDistance {
    /// Set Jaccard distance, ignoring weights
    #[default]
    Jaccard,
    /// Jaccard distance over term weights
    WeightedJaccard,
}

/// Distance between every topic of `a` (rows) and every topic of `b`
/// (columns).
pub fn topic_diff<A, B>(a: &A, b: &B, topn: usize, distance: DiffDistance) -> Result<Array2<f64>>
where
    A: TopicModel + ?Sized,
    B: TopicModel + ?Sized,
{
    let weights_a = topic_weights(a, topn)?;
    let weights_b = topic_weights(b, topn)?;

    Ok(Array2::from_shape_fn((weights_a.len(), weights_b.len()), |(i, j)| {
        let (wa, wb) = (&weights_a[i], &weights_b[j]);
        match distance {
            DiffDistance::Jaccard => 1.0 - set_jaccard(wa, wb),
            DiffDistance::WeightedJaccard => 1.0 - jaccard_from_weights(wa, wb),
        }
    }))
}

fn topic_weights<M>(model: &M, topn: usize) -> Result<Vec<HashMap<String, f64>>>
where
    M: TopicModel + ?Sized,
{
    (0..model.num_topics())
        .map(|topic| Ok(model.show_topic(topic, topn)?.into_iter().collect()))
        .collect()
}

/// |A ∩ B| / |A ∪ B| over the term sets. Two empty sets score 0.
fn set_jaccard(a: &HashMap<String, f64>, b: &HashMap<String, f64>) -> f64 {
    let union: HashSet<&String> = a.keys().chain(b.keys()).collect();
    if union.is_empty() {
        return 0.0;
    }
    let shared = a.keys().filter(|k| b.contains_key(*k)).count();
    shared as f64 / union.len() as f64
}

/// Weighted Jaccard similarity from raw term weight maps, 0.0 (no overlap)
/// to 1.0 (identical profiles).
pub fn jaccard_from_weights(weights_a: &HashMap<String, f64>, weights_b: &HashMap<String, f64>) -> f64 {
    let all_keys: HashSet<&String> = weights_a.keys().chain(weights_b.keys()).collect();

    if all_keys.is_empty() {
        return 0.0;
    }

    let mut min_sum = 0.0;
    let mut max_sum = 0.0;

    for key in all_keys {
        let a = weights_a.get(key).copied().unwrap_or(0.0);
        let b = weights_b.get(key).copied().unwrap_or(0.0);
        min_sum += a.min(b);
        max_sum += a.max(b);
    }

    if max_sum == 0.0 {
        0.0
    } else {
        min_sum / max_sum
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn weights(pairs: &[(&str, f64)]) -> HashMap<String, f64> {
        pairs.iter().map(|(t, w)| (t.to_string(), *w)).collect()
    }

    #[test]
    fn test_identical_weights() {
        let w = weights(&[("bank", 0.3), ("loan", 0.2), ("rate", 0.15)]);
        let score = jaccard_from_weights(&w, &w);
        assert!(
            (score - 1.0).abs() < 0.001,
            "Identical weights should score ~1.0, got {score}"
        );
    }

    #[test]
    fn test_no_overlap() {
        let a = weights(&[("bank", 0.3), ("loan", 0.2)]);
        let b = weights(&[("river", 0.4), ("fish", 0.3)]);
        assert!(jaccard_from_weights(&a, &b) < 0.001);
        assert!(set_jaccard(&a, &b) < 0.001);
    }

    #[test]
    fn test_partial_overlap() {
        let a = weights(&[("bank", 0.3), ("loan", 0.2), ("rate", 0.15)]);
        let b = weights(&[("bank", 0.2), ("river", 0.3), ("rate", 0.1)]);
        let score = jaccard_from_weights(&a, &b);
        assert!(score > 0.0 && score < 1.0);
        // 2 shared of 4 distinct terms
        assert!((set_jaccard(&a, &b) - 0.5).abs() < 1e-12);
    }

    #[test]
    fn test_empty_weights() {
        let empty = weights(&[]);
        assert_eq!(jaccard_from_weights(&empty, &empty), 0.0);
        assert_eq!(set_jaccard(&empty, &empty), 0.0);
    }
}
