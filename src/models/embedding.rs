// Shared machinery for the word2vec and doc2vec trainers: the frequency
// vocabulary, the unigram^0.75 negative sampler, and the negative-sampling
// update itself.

use std::collections::HashMap;

use ndarray::{Array1, Array2, ArrayView1};
use rand::Rng;

/// Vocabulary of an embedding model, most frequent word first.
#[derive(Debug, Clone, Default)]
pub struct Vocab {
    word2idx: HashMap<String, usize>,
    words: Vec<String>,
    counts: Vec<u64>,
}

impl Vocab {
    /// Count words across sentences and keep those seen at least
    /// `min_count` times. Equal counts keep first-occurrence order.
    pub fn build<D, S>(sentences: &[D], min_count: u64) -> Self
    where
        D: AsRef<[S]>,
        S: AsRef<str>,
    {
        let mut index: HashMap<&str, usize> = HashMap::new();
        let mut seen: Vec<(&str, u64)> = Vec::new();
        for sentence in sentences {
            for word in sentence.as_ref() {
                let word = word.as_ref();
                match index.get(word) {
                    Some(&i) => seen[i].1 += 1,
                    None => {
                        index.insert(word, seen.len());
                        seen.push((word, 1));
                    }
                }
            }
        }

        seen.retain(|&(_, count)| count >= min_count);
        seen.sort_by(|a, b| b.1.cmp(&a.1));

        let mut vocab = Self::default();
        for (word, count) in seen {
            vocab.word2idx.insert(word.to_string(), vocab.words.len());
            vocab.words.push(word.to_string());
            vocab.counts.push(count);
        }
        vocab
    }

    pub fn index(&self, word: &str) -> Option<usize> {
        self.word2idx.get(word).copied()
    }

    pub fn word(&self, index: usize) -> Option<&str> {
        self.words.get(index).map(String::as_str)
    }

    pub fn count(&self, index: usize) -> Option<u64> {
        self.counts.get(index).copied()
    }

    pub fn len(&self) -> usize {
        self.words.len()
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }

    pub fn words(&self) -> &[String] {
        &self.words
    }

    /// Map a sentence to vocabulary indices, dropping unknown words.
    pub fn encode<S: AsRef<str>>(&self, sentence: &[S]) -> Vec<usize> {
        sentence
            .iter()
            .filter_map(|w| self.index(w.as_ref()))
            .collect()
    }
}

/// Draws negative samples with probability proportional to count^0.75.
#[derive(Debug, Clone)]
pub(crate) struct NegativeSampler {
    cumulative: Vec<f64>,
}

impl NegativeSampler {
    pub fn new(vocab: &Vocab) -> Self {
        let mut total = 0.0;
        let cumulative = vocab
            .counts
            .iter()
            .map(|&c| {
                total += (c as f64).powf(0.75);
                total
            })
            .collect();
        Self { cumulative }
    }

    pub fn sample(&self, rng: &mut impl Rng) -> usize {
        let total = self.cumulative.last().copied().unwrap_or(0.0);
        let u = rng.random::<f64>() * total;
        self.cumulative
            .partition_point(|&c| c <= u)
            .min(self.cumulative.len().saturating_sub(1))
    }
}

pub(crate) fn sigmoid(x: f32) -> f32 {
    1.0 / (1.0 + (-x).exp())
}

/// Small random starting weights, uniform in (-0.5, 0.5) / dim.
pub(crate) fn random_matrix(rows: usize, dim: usize, rng: &mut impl Rng) -> Array2<f32> {
    Array2::from_shape_fn((rows, dim), |_| (rng.random::<f32>() - 0.5) / dim as f32)
}

/// Linearly decayed learning rate for `progress` in [0, 1].
pub(crate) fn decayed_rate(alpha: f32, min_alpha: f32, progress: f64) -> f32 {
    let progress = progress.clamp(0.0, 1.0) as f32;
    (alpha - (alpha - min_alpha) * progress).max(min_alpha)
}

/// One negative-sampling step: push `input` towards predicting `target` and
/// away from `negative` sampled words.
///
/// The input-side gradient is accumulated into `grad`. Output-side updates
/// are returned as (output row, scale) pairs so callers with frozen output
/// weights can drop them; apply them with `apply_output_updates`.
#[allow(clippy::too_many_arguments)]
pub(crate) fn negative_sampling_step(
    input: ArrayView1<f32>,
    target: usize,
    output: &Array2<f32>,
    sampler: &NegativeSampler,
    negative: usize,
    lr: f32,
    rng: &mut impl Rng,
    grad: &mut Array1<f32>,
) -> Vec<(usize, f32)> {
    let mut rows = Vec::with_capacity(negative + 1);
    rows.push((target, 1.0f32));
    for _ in 0..negative {
        let row = sampler.sample(rng);
        if row != target {
            rows.push((row, 0.0));
        }
    }

    rows.into_iter()
        .map(|(row, label)| {
            let weights = output.row(row);
            let g = (label - sigmoid(input.dot(&weights))) * lr;
            grad.scaled_add(g, &weights);
            (row, g)
        })
        .collect()
}

pub(crate) fn apply_output_updates(
    output: &mut Array2<f32>,
    updates: &[(usize, f32)],
    input: ArrayView1<f32>,
) {
    for &(row, g) in updates {
        output.row_mut(row).scaled_add(g, &input);
    }
}

/// Cosine similarity in [-1, 1]. Mismatched or zero vectors score 0.
pub fn cosine_similarity(a: ArrayView1<f32>, b: ArrayView1<f32>) -> f32 {
    if a.len() != b.len() || a.is_empty() {
        return 0.0;
    }

    let denom = a.dot(&a).sqrt() * b.dot(&b).sqrt();
    if denom < f32::EPSILON {
        0.0
    } else {
        (a.dot(&b) / denom).clamp(-1.0, 1.0)
    }
}

/// Rank the rows of `candidates` by cosine similarity to `query`, best
/// first, skipping the row `exclude`.
pub(crate) fn rank_by_similarity(
    query: ArrayView1<f32>,
    candidates: &Array2<f32>,
    exclude: Option<usize>,
    topn: usize,
) -> Vec<(usize, f32)> {
    let mut scored: Vec<(usize, f32)> = candidates
        .outer_iter()
        .enumerate()
        .filter(|&(i, _)| Some(i) != exclude)
        .map(|(i, row)| (i, cosine_similarity(query, row)))
        .collect();
    scored.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(std::cmp::Ordering::Equal));
    scored.truncate(topn);
    scored
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::{aview1, array};
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_vocab_orders_by_frequency_then_first_occurrence() {
        let sentences = vec![vec!["b", "a", "c"], vec!["a", "c", "d"]];
        let vocab = Vocab::build(&sentences, 1);
        assert_eq!(vocab.words(), &["a", "c", "b", "d"]);
        assert_eq!(vocab.count(0), Some(2));
    }

    #[test]
    fn test_vocab_min_count_prunes() {
        let sentences = vec![vec!["a", "a", "b"]];
        let vocab = Vocab::build(&sentences, 2);
        assert_eq!(vocab.len(), 1);
        assert_eq!(vocab.index("b"), None);
        assert_eq!(vocab.encode(&["b", "a", "zzz"]), vec![0]);
    }

    #[test]
    fn test_sampler_stays_in_range() {
        let vocab = Vocab::build(&[vec!["a", "b", "b", "c"]], 1);
        let sampler = NegativeSampler::new(&vocab);
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..1000 {
            assert!(sampler.sample(&mut rng) < vocab.len());
        }
    }

    #[test]
    fn test_decayed_rate_bounds() {
        assert!((decayed_rate(0.025, 0.0001, 0.0) - 0.025).abs() < 1e-9);
        assert!((decayed_rate(0.025, 0.0001, 1.0) - 0.0001).abs() < 1e-9);
    }

    #[test]
    fn test_random_matrix_shape_and_scale() {
        let mut rng = StdRng::seed_from_u64(3);
        let m = random_matrix(4, 10, &mut rng);
        assert_eq!(m.dim(), (4, 10));
        assert!(m.iter().all(|w| w.abs() <= 0.05));
    }

    #[test]
    fn test_cosine_identical_and_opposite() {
        let a = array![1.0f32, 2.0, 3.0];
        let b = -&a;
        assert!((cosine_similarity(a.view(), a.view()) - 1.0).abs() < 1e-6);
        assert!((cosine_similarity(a.view(), b.view()) + 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_cosine_zero_and_mismatched() {
        assert_eq!(cosine_similarity(aview1(&[0.0, 0.0]), aview1(&[1.0, 2.0])), 0.0);
        assert_eq!(cosine_similarity(aview1(&[1.0]), aview1(&[1.0, 2.0])), 0.0);
        assert_eq!(cosine_similarity(aview1(&[]), aview1(&[])), 0.0);
    }

    #[test]
    fn test_negative_sampling_step_moves_towards_target() {
        let vocab = Vocab::build(&[vec!["a", "b", "b", "c"]], 1);
        let sampler = NegativeSampler::new(&vocab);
        let mut rng = StdRng::seed_from_u64(1);
        let input = array![0.5f32, -0.5];
        let mut output = array![[0.1f32, 0.2], [0.0, 0.0], [0.3, -0.1]];
        let mut grad = Array1::zeros(2);

        let before = input.dot(&output.row(0));
        let updates =
            negative_sampling_step(input.view(), 0, &output, &sampler, 0, 0.5, &mut rng, &mut grad);
        assert_eq!(updates.len(), 1);
        apply_output_updates(&mut output, &updates, input.view());
        assert!(input.dot(&output.row(0)) > before);
    }

    #[test]
    fn test_rank_excludes_query_index() {
        let candidates = array![[1.0f32, 0.0], [0.9, 0.1], [0.0, 1.0]];
        let ranked = rank_by_similarity(candidates.row(0), &candidates, Some(0), 5);
        assert_eq!(ranked.len(), 2);
        assert_eq!(ranked[0].0, 1);
    }
}
