//! Word2Vec: skip-gram word embeddings trained with negative sampling.

use anyhow::Result;
use ndarray::{Array1, Array2, ArrayView1};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::info;

use super::embedding::{
    apply_output_updates, cosine_similarity, decayed_rate, negative_sampling_step, random_matrix,
    rank_by_similarity, NegativeSampler, Vocab,
};

/// Word2Vec training parameters.
#[derive(Debug, Clone, PartialEq)]
pub struct Word2VecParams {
    /// Embedding dimension
    pub size: usize,
    /// Maximum distance between the center word and a context word
    pub window: usize,
    /// Words seen fewer times than this are ignored
    pub min_count: u64,
    /// Epochs over the sentences
    pub iterations: usize,
    /// Negative samples per positive pair
    pub negative: usize,
    /// Starting learning rate, decayed linearly to `min_alpha`
    pub alpha: f32,
    pub min_alpha: f32,
    pub random_state: u64,
}

impl Default for Word2VecParams {
    fn default() -> Self {
        Self {
            size: 100,
            window: 5,
            min_count: 5,
            iterations: 5,
            negative: 5,
            alpha: 0.025,
            min_alpha: 0.0001,
            random_state: 0,
        }
    }
}

impl Word2VecParams {
    pub(crate) fn validate(&self) -> Result<()> {
        if self.size == 0 || self.window == 0 || self.iterations == 0 {
            anyhow::bail!(
                "size, window and iterations must be positive (got {}, {}, {})",
                self.size,
                self.window,
                self.iterations
            );
        }
        if !(self.alpha > 0.0 && self.min_alpha >= 0.0 && self.min_alpha <= self.alpha) {
            anyhow::bail!(
                "Learning rates must satisfy 0 <= min_alpha <= alpha, alpha > 0 (got {} and {})",
                self.min_alpha,
                self.alpha
            );
        }
        Ok(())
    }
}

/// Trained word vectors.
#[derive(Debug, Clone)]
pub struct Word2VecModel {
    vocab: Vocab,
    /// vocab_len x size, one row per word in vocabulary order
    vectors: Array2<f32>,
}

impl Word2VecModel {
    pub fn vocab(&self) -> &Vocab {
        &self.vocab
    }

    pub fn vocab_len(&self) -> usize {
        self.vocab.len()
    }

    pub fn vector_size(&self) -> usize {
        self.vectors.ncols()
    }

    pub fn contains(&self, word: &str) -> bool {
        self.vocab.index(word).is_some()
    }

    pub fn vector(&self, word: &str) -> Option<ArrayView1<'_, f32>> {
        self.vocab.index(word).map(|i| self.vectors.row(i))
    }

    /// The full embedding matrix, one row per vocabulary word.
    pub fn vectors(&self) -> &Array2<f32> {
        &self.vectors
    }

    fn require(&self, word: &str) -> Result<usize> {
        self.vocab
            .index(word)
            .ok_or_else(|| anyhow::anyhow!("Word not in vocabulary: {word}"))
    }

    /// Cosine similarity between two words.
    pub fn similarity(&self, a: &str, b: &str) -> Result<f32> {
        let a = self.require(a)?;
        let b = self.require(b)?;
        Ok(cosine_similarity(self.vectors.row(a), self.vectors.row(b)))
    }

    /// The `topn` nearest words by cosine similarity, excluding `word`.
    pub fn most_similar(&self, word: &str, topn: usize) -> Result<Vec<(String, f32)>> {
        let idx = self.require(word)?;
        Ok(rank_by_similarity(self.vectors.row(idx), &self.vectors, Some(idx), topn)
            .into_iter()
            .map(|(i, sim)| (self.vocab.words()[i].clone(), sim))
            .collect())
    }
}

/// Train word embeddings from tokenized sentences.
pub fn build_word2vec<D, S>(sentences: &[D], params: &Word2VecParams) -> Result<Word2VecModel>
where
    D: AsRef<[S]>,
    S: AsRef<str>,
{
    params.validate()?;
    if sentences.is_empty() {
        anyhow::bail!("No sentences to train on");
    }

    let vocab = Vocab::build(sentences, params.min_count);
    if vocab.is_empty() {
        anyhow::bail!(
            "Vocabulary is empty — no word appears at least {} times",
            params.min_count
        );
    }

    let encoded: Vec<Vec<usize>> = sentences.iter().map(|s| vocab.encode(s.as_ref())).collect();
    let total_words: usize = encoded.iter().map(Vec::len).sum();

    info!(
        sentences = sentences.len(),
        vocab = vocab.len(),
        words = total_words,
        size = params.size,
        epochs = params.iterations,
        "Training word2vec"
    );

    let mut rng = StdRng::seed_from_u64(params.random_state);
    let sampler = NegativeSampler::new(&vocab);
    let mut vectors = random_matrix(vocab.len(), params.size, &mut rng);
    let mut output = Array2::<f32>::zeros((vocab.len(), params.size));

    let total_work = (total_words * params.iterations).max(1) as f64;
    let mut processed = 0usize;
    let mut grad = Array1::<f32>::zeros(params.size);

    for _ in 0..params.iterations {
        for sentence in &encoded {
            for (pos, &center) in sentence.iter().enumerate() {
                let lr = decayed_rate(params.alpha, params.min_alpha, processed as f64 / total_work);
                processed += 1;

                // Shrink the window at random, weighting nearby words higher
                let reach = params.window - rng.random_range(0..params.window);
                let start = pos.saturating_sub(reach);
                let end = (pos + reach + 1).min(sentence.len());

                for ctx_pos in start..end {
                    if ctx_pos == pos {
                        continue;
                    }
                    let context = sentence[ctx_pos];

                    grad.fill(0.0);
                    let input = vectors.row(center).to_owned();
                    let updates = negative_sampling_step(
                        input.view(),
                        context,
                        &output,
                        &sampler,
                        params.negative,
                        lr,
                        &mut rng,
                        &mut grad,
                    );
                    apply_output_updates(&mut output, &updates, input.view());
                    let mut row = vectors.row_mut(center);
                    row += &grad;
                }
            }
        }
    }

    info!(vocab = vocab.len(), "Word2vec training complete");

    Ok(Word2VecModel { vocab, vectors })
}
