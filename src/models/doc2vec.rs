//! Doc2Vec: paragraph vectors (PV-DM, mean of context) trained with
//! negative sampling. Each document is tagged with its position in the input.

use anyhow::Result;
use ndarray::{Array1, Array2, ArrayView1};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::info;

use super::embedding::{
    apply_output_updates, cosine_similarity, decayed_rate, negative_sampling_step, random_matrix,
    rank_by_similarity, NegativeSampler, Vocab,
};

/// Doc2Vec training parameters.
#[derive(Debug, Clone, PartialEq)]
pub struct Doc2VecParams {
    pub vector_size: usize,
    pub window: usize,
    pub min_count: u64,
    pub epochs: usize,
    pub negative: usize,
    pub alpha: f32,
    pub min_alpha: f32,
    pub random_state: u64,
}

impl Default for Doc2VecParams {
    fn default() -> Self {
        Self {
            vector_size: 100,
            window: 5,
            min_count: 5,
            epochs: 10,
            negative: 5,
            alpha: 0.025,
            min_alpha: 0.0001,
            random_state: 0,
        }
    }
}

impl Doc2VecParams {
    fn validate(&self) -> Result<()> {
        if self.vector_size == 0 || self.window == 0 || self.epochs == 0 {
            anyhow::bail!(
                "vector_size, window and epochs must be positive (got {}, {}, {})",
                self.vector_size,
                self.window,
                self.epochs
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

/// Trained document vectors, plus the word-side weights needed to infer
/// vectors for unseen documents.
#[derive(Debug, Clone)]
pub struct Doc2VecModel {
    vocab: Vocab,
    word_vectors: Array2<f32>,
    /// One row per training document, indexed by tag
    doc_vectors: Array2<f32>,
    output: Array2<f32>,
    sampler: NegativeSampler,
    params: Doc2VecParams,
}

impl Doc2VecModel {
    pub fn vocab(&self) -> &Vocab {
        &self.vocab
    }

    pub fn vector_size(&self) -> usize {
        self.params.vector_size
    }

    /// Number of tagged training documents.
    pub fn num_documents(&self) -> usize {
        self.doc_vectors.nrows()
    }

    /// Vector of the training document at position `tag`.
    pub fn document_vector(&self, tag: usize) -> Option<ArrayView1<'_, f32>> {
        (tag < self.num_documents()).then(|| self.doc_vectors.row(tag))
    }

    /// All document vectors, one row per tag.
    pub fn document_vectors(&self) -> &Array2<f32> {
        &self.doc_vectors
    }

    pub fn word_vector(&self, word: &str) -> Option<ArrayView1<'_, f32>> {
        self.vocab.index(word).map(|i| self.word_vectors.row(i))
    }

    /// Cosine similarity between two training documents.
    pub fn similarity(&self, a: usize, b: usize) -> Result<f32> {
        match (self.document_vector(a), self.document_vector(b)) {
            (Some(va), Some(vb)) => Ok(cosine_similarity(va, vb)),
            _ => anyhow::bail!(
                "Document tag out of range — model has {} documents",
                self.num_documents()
            ),
        }
    }

    /// The `topn` training documents most similar to document `tag`.
    pub fn most_similar_documents(&self, tag: usize, topn: usize) -> Result<Vec<(usize, f32)>> {
        let query = self.document_vector(tag).ok_or_else(|| {
            anyhow::anyhow!(
                "Document tag {tag} out of range — model has {} documents",
                self.num_documents()
            )
        })?;
        Ok(rank_by_similarity(query, &self.doc_vectors, Some(tag), topn))
    }

    /// Cosine similarity between an unseen document and training document `tag`.
    pub fn similarity_unseen<S: AsRef<str>>(&self, tokens: &[S], tag: usize) -> Result<f32> {
        let known = self.document_vector(tag).ok_or_else(|| {
            anyhow::anyhow!(
                "Document tag {tag} out of range — model has {} documents",
                self.num_documents()
            )
        })?;
        Ok(cosine_similarity(self.infer_vector(tokens, None).view(), known))
    }

    /// Infer a vector for an unseen document, keeping every trained weight
    /// fixed. Deterministic for a given model and token list.
    pub fn infer_vector<S: AsRef<str>>(&self, tokens: &[S], epochs: Option<usize>) -> Array1<f32> {
        let dim = self.params.vector_size;
        let epochs = epochs.unwrap_or(self.params.epochs).max(1);
        let mut rng = StdRng::seed_from_u64(self.params.random_state);
        let mut doc_vector = random_matrix(1, dim, &mut rng).row(0).to_owned();
        let encoded = self.vocab.encode(tokens);

        let mut grad = Array1::<f32>::zeros(dim);

        for epoch in 0..epochs {
            let lr = decayed_rate(
                self.params.alpha,
                self.params.min_alpha,
                epoch as f64 / epochs as f64,
            );
            for (pos, &center) in encoded.iter().enumerate() {
                let context = context_window(&encoded, pos, self.params.window, &mut rng);
                let input = mean_input(doc_vector.view(), &self.word_vectors, &context);

                grad.fill(0.0);
                negative_sampling_step(
                    input.view(),
                    center,
                    &self.output,
                    &self.sampler,
                    self.params.negative,
                    lr,
                    &mut rng,
                    &mut grad,
                );
                doc_vector += &grad;
            }
        }
        doc_vector
    }
}

/// Positions around `pos` within a randomly shrunk window, as token ids.
fn context_window(tokens: &[usize], pos: usize, window: usize, rng: &mut StdRng) -> Vec<usize> {
    let reach = window - rng.random_range(0..window);
    let start = pos.saturating_sub(reach);
    let end = (pos + reach + 1).min(tokens.len());
    (start..end).filter(|&p| p != pos).map(|p| tokens[p]).collect()
}

/// Mean of the document vector and the context word vectors.
fn mean_input(doc_vector: ArrayView1<f32>, words: &Array2<f32>, context: &[usize]) -> Array1<f32> {
    let mut input = doc_vector.to_owned();
    for &w in context {
        input += &words.row(w);
    }
    input / (context.len() + 1) as f32
}

/// Train document embeddings. Document `i` of the input gets tag `i`.
pub fn build_doc2vec<D, S>(documents: &[D], params: &Doc2VecParams) -> Result<Doc2VecModel>
where
    D: AsRef<[S]>,
    S: AsRef<str>,
{
    params.validate()?;
    if documents.is_empty() {
        anyhow::bail!("No documents to train on");
    }

    let vocab = Vocab::build(documents, params.min_count);
    if vocab.is_empty() {
        anyhow::bail!(
            "Vocabulary is empty — no word appears at least {} times",
            params.min_count
        );
    }

    let encoded: Vec<Vec<usize>> = documents.iter().map(|d| vocab.encode(d.as_ref())).collect();
    let total_words: usize = encoded.iter().map(Vec::len).sum();

    info!(
        documents = documents.len(),
        vocab = vocab.len(),
        words = total_words,
        vector_size = params.vector_size,
        epochs = params.epochs,
        "Training doc2vec"
    );

    let dim = params.vector_size;
    let mut rng = StdRng::seed_from_u64(params.random_state);
    let sampler = NegativeSampler::new(&vocab);
    let mut word_vectors = random_matrix(vocab.len(), dim, &mut rng);
    let mut doc_vectors = random_matrix(documents.len(), dim, &mut rng);
    let mut output = Array2::<f32>::zeros((vocab.len(), dim));

    let total_work = (total_words * params.epochs).max(1) as f64;
    let mut processed = 0usize;
    let mut grad = Array1::<f32>::zeros(dim);

    for _ in 0..params.epochs {
        for (tag, tokens) in encoded.iter().enumerate() {
            for (pos, &center) in tokens.iter().enumerate() {
                let lr = decayed_rate(params.alpha, params.min_alpha, processed as f64 / total_work);
                processed += 1;

                let context = context_window(tokens, pos, params.window, &mut rng);
                let input = mean_input(doc_vectors.row(tag), &word_vectors, &context);

                grad.fill(0.0);
                let updates = negative_sampling_step(
                    input.view(),
                    center,
                    &output,
                    &sampler,
                    params.negative,
                    lr,
                    &mut rng,
                    &mut grad,
                );
                apply_output_updates(&mut output, &updates, input.view());

                let mut doc_row = doc_vectors.row_mut(tag);
                doc_row += &grad;
                for &w in &context {
                    let mut word_row = word_vectors.row_mut(w);
                    word_row += &grad;
                }
            }
        }
    }

    info!(documents = doc_vectors.nrows(), "Doc2vec training complete");

    Ok(Doc2VecModel {
        vocab,
        word_vectors,
        doc_vectors,
        output,
        sampler,
        params: params.clone(),
    })
}
