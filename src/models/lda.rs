//! Latent Dirichlet Allocation.
//!
//! Training uses collapsed Gibbs sampling seeded from `random_state`, so the
//! same corpus and parameters always produce the same model. Queries on new
//! documents use a deterministic EM fold-in against the trained topic-term
//! matrix.

use std::fmt;

use anyhow::Result;
use ndarray::{Array1, Array2, Axis};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use super::traits::{TopicModel, TopicTrainer, DEFAULT_MINIMUM_PROBABILITY};
use crate::corpus::dictionary::Dictionary;
use crate::corpus::BowDocument;

/// Fold-in stops after this many iterations even if it hasn't converged.
const INFERENCE_ITERATIONS: usize = 100;
const INFERENCE_TOLERANCE: f64 = 1e-6;

/// A Dirichlet prior, either for document-topic (alpha) or topic-term (eta)
/// distributions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Prior {
    /// 1 / num_topics for every component
    Symmetric,
    /// Component k gets 1 / (k + sqrt(num_topics)), normalized. Alpha only.
    Asymmetric,
    /// The same value for every component
    Scalar(f64),
    /// One value per component
    Vector(Vec<f64>),
}

impl Prior {
    /// Expand into one value per component.
    fn resolve(&self, name: &str, len: usize, num_topics: usize) -> Result<Vec<f64>> {
        let values = match self {
            Prior::Symmetric => vec![1.0 / num_topics as f64; len],
            Prior::Asymmetric => {
                let raw: Vec<f64> = (0..len)
                    .map(|k| 1.0 / (k as f64 + (num_topics as f64).sqrt()))
                    .collect();
                let sum: f64 = raw.iter().sum();
                raw.into_iter().map(|v| v / sum).collect()
            }
            Prior::Scalar(v) => vec![*v; len],
            Prior::Vector(v) => {
                if v.len() != len {
                    anyhow::bail!("{name} has {} values, expected {len}", v.len());
                }
                v.clone()
            }
        };

        if let Some(bad) = values.iter().find(|v| !(v.is_finite() && **v > 0.0)) {
            anyhow::bail!("{name} values must be positive and finite, got {bad}");
        }
        Ok(values)
    }
}

impl fmt::Display for Prior {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Prior::Symmetric => f.write_str("symmetric"),
            Prior::Asymmetric => f.write_str("asymmetric"),
            Prior::Scalar(v) => write!(f, "{v}"),
            Prior::Vector(v) => write!(f, "vector[{}]", v.len()),
        }
    }
}

/// LDA training parameters.
#[derive(Debug, Clone, PartialEq)]
pub struct LdaParams {
    pub num_topics: usize,
    /// Passes over the corpus; training log-likelihood is recorded after each
    pub passes: usize,
    /// Gibbs sweeps per pass
    pub iterations: usize,
    pub alpha: Prior,
    /// `None` means symmetric
    pub eta: Option<Prior>,
    pub random_state: u64,
    /// Reporting threshold for document and term queries
    pub minimum_probability: f64,
}

impl Default for LdaParams {
    fn default() -> Self {
        Self {
            num_topics: 10,
            passes: 10,
            iterations: 50,
            alpha: Prior::Symmetric,
            eta: None,
            random_state: 0,
            minimum_probability: DEFAULT_MINIMUM_PROBABILITY,
        }
    }
}

impl LdaParams {
    pub fn new(num_topics: usize) -> Self {
        Self {
            num_topics,
            ..Default::default()
        }
    }

    pub fn passes(mut self, passes: usize) -> Self {
        self.passes = passes;
        self
    }

    pub fn iterations(mut self, iterations: usize) -> Self {
        self.iterations = iterations;
        self
    }

    pub fn alpha(mut self, alpha: Prior) -> Self {
        self.alpha = alpha;
        self
    }

    pub fn eta(mut self, eta: Prior) -> Self {
        self.eta = Some(eta);
        self
    }

    pub fn random_state(mut self, seed: u64) -> Self {
        self.random_state = seed;
        self
    }

    pub fn minimum_probability(mut self, p: f64) -> Self {
        self.minimum_probability = p;
        self
    }

    fn validate(&self) -> Result<()> {
        if self.num_topics == 0 {
            anyhow::bail!("num_topics must be positive");
        }
        if self.passes == 0 || self.iterations == 0 {
            anyhow::bail!(
                "passes and iterations must be positive (got {} and {})",
                self.passes,
                self.iterations
            );
        }
        if !(0.0..=1.0).contains(&self.minimum_probability) {
            anyhow::bail!(
                "minimum_probability must be between 0 and 1, got {}",
                self.minimum_probability
            );
        }
        if matches!(self.eta, Some(Prior::Asymmetric)) {
            anyhow::bail!("The asymmetric prior can't be used for eta");
        }
        Ok(())
    }
}

/// A trained LDA model.
#[derive(Debug, Clone)]
pub struct LdaModel {
    dictionary: Dictionary,
    alpha: Vec<f64>,
    eta: Vec<f64>,
    /// num_topics x num_terms, each row sums to 1
    topic_term: Array2<f64>,
    minimum_probability: f64,
    random_state: u64,
    log_likelihood_history: Vec<f64>,
}

impl LdaModel {
    pub fn alpha(&self) -> &[f64] {
        &self.alpha
    }

    pub fn eta(&self) -> &[f64] {
        &self.eta
    }

    /// The full topic-term probability matrix.
    pub fn topic_term_matrix(&self) -> &Array2<f64> {
        &self.topic_term
    }

    pub fn random_state(&self) -> u64 {
        self.random_state
    }

    /// Per-word training log-likelihood after each pass.
    pub fn log_likelihood_history(&self) -> &[f64] {
        &self.log_likelihood_history
    }

    /// Infer the full topic distribution of a bag-of-words.
    ///
    /// EM fold-in: responsibilities of each topic for each term, weighted by
    /// counts and smoothed with alpha, iterated to a fixed point. Ids outside
    /// the dictionary are ignored; an empty document gets the normalized prior.
    pub fn infer(&self, bow: &[(usize, u32)]) -> Array1<f64> {
        let alpha = Array1::from(self.alpha.clone());
        let prior = &alpha / alpha.sum();

        let known: Vec<(usize, f64)> = bow
            .iter()
            .filter(|&&(id, count)| id < self.topic_term.ncols() && count > 0)
            .map(|&(id, count)| (id, f64::from(count)))
            .collect();
        if known.is_empty() {
            return prior;
        }

        let mut theta = prior;
        for _ in 0..INFERENCE_ITERATIONS {
            let mut expected = alpha.clone();
            for &(id, count) in &known {
                let responsibility = &theta * &self.topic_term.column(id);
                let norm = responsibility.sum();
                if norm <= 0.0 {
                    continue;
                }
                expected.scaled_add(count / norm, &responsibility);
            }

            let next = &expected / expected.sum();
            let delta = (&next - &theta).fold(0.0, |acc: f64, d| acc.max(d.abs()));
            theta = next;
            if delta < INFERENCE_TOLERANCE {
                break;
            }
        }
        theta
    }
}

impl TopicModel for LdaModel {
    fn num_topics(&self) -> usize {
        self.topic_term.nrows()
    }

    fn id2word(&self) -> &Dictionary {
        &self.dictionary
    }

    fn minimum_probability(&self) -> f64 {
        self.minimum_probability
    }

    fn term_probability(&self, topic_id: usize, term_id: usize) -> f64 {
        self.topic_term
            .get((topic_id, term_id))
            .copied()
            .unwrap_or(0.0)
    }

    fn document_topics(
        &self,
        bow: &[(usize, u32)],
        minimum_probability: Option<f64>,
    ) -> Vec<(usize, f64)> {
        let threshold = self.resolve_threshold(minimum_probability);
        self.infer(bow)
            .iter()
            .copied()
            .enumerate()
            .filter(|&(_, p)| p >= threshold)
            .collect()
    }
}

/// Collapsed Gibbs sampler for LDA.
pub struct GibbsTrainer {
    params: LdaParams,
}

impl GibbsTrainer {
    pub fn new(params: LdaParams) -> Self {
        Self { params }
    }
}

impl TopicTrainer for GibbsTrainer {
    type Model = LdaModel;

    fn train(&self, corpus: &[BowDocument], dictionary: &Dictionary) -> Result<LdaModel> {
        let params = &self.params;
        params.validate()?;

        if corpus.is_empty() {
            anyhow::bail!("Cannot train LDA on an empty corpus");
        }
        if dictionary.is_empty() {
            anyhow::bail!("Cannot train LDA with an empty dictionary — every term was pruned");
        }

        let k = params.num_topics;
        let v = dictionary.len();
        let alpha = params.alpha.resolve("alpha", k, k)?;
        let eta = params
            .eta
            .as_ref()
            .unwrap_or(&Prior::Symmetric)
            .resolve("eta", v, k)?;
        let eta_sum: f64 = eta.iter().sum();

        // Expand each bag-of-words into one entry per token occurrence
        let mut docs: Vec<Vec<usize>> = Vec::with_capacity(corpus.len());
        for (d, bow) in corpus.iter().enumerate() {
            let mut tokens = Vec::new();
            for &(id, count) in bow {
                if id >= v {
                    anyhow::bail!(
                        "Document {d} references term id {id}, outside the dictionary ({v} terms)"
                    );
                }
                tokens.extend(std::iter::repeat_n(id, count as usize));
            }
            docs.push(tokens);
        }

        let total_tokens: usize = docs.iter().map(Vec::len).sum();
        if total_tokens == 0 {
            anyhow::bail!("Cannot train LDA — the corpus contains no tokens");
        }

        info!(
            documents = docs.len(),
            terms = v,
            tokens = total_tokens,
            topics = k,
            passes = params.passes,
            "Training LDA"
        );

        let mut rng = StdRng::seed_from_u64(params.random_state);

        // Random initial assignments
        let mut n_dk = Array2::<usize>::zeros((docs.len(), k));
        let mut n_kw = Array2::<usize>::zeros((k, v));
        let mut n_k = Array1::<usize>::zeros(k);
        let mut z: Vec<Vec<usize>> = Vec::with_capacity(docs.len());
        for (d, tokens) in docs.iter().enumerate() {
            let mut assignments = Vec::with_capacity(tokens.len());
            for &w in tokens {
                let t = rng.random_range(0..k);
                n_dk[[d, t]] += 1;
                n_kw[[t, w]] += 1;
                n_k[t] += 1;
                assignments.push(t);
            }
            z.push(assignments);
        }

        let mut cumulative = vec![0.0f64; k];
        let mut log_likelihood_history = Vec::with_capacity(params.passes);

        for pass in 0..params.passes {
            for _ in 0..params.iterations {
                for (d, tokens) in docs.iter().enumerate() {
                    for (i, &w) in tokens.iter().enumerate() {
                        let old = z[d][i];
                        n_dk[[d, old]] -= 1;
                        n_kw[[old, w]] -= 1;
                        n_k[old] -= 1;

                        let mut total = 0.0;
                        for t in 0..k {
                            total += (n_dk[[d, t]] as f64 + alpha[t])
                                * (n_kw[[t, w]] as f64 + eta[w])
                                / (n_k[t] as f64 + eta_sum);
                            cumulative[t] = total;
                        }
                        let u = rng.random::<f64>() * total;
                        let new = cumulative.iter().position(|&c| c > u).unwrap_or(k - 1);

                        n_dk[[d, new]] += 1;
                        n_kw[[new, w]] += 1;
                        n_k[new] += 1;
                        z[d][i] = new;
                    }
                }
            }

            let ll = per_word_log_likelihood(&docs, &n_dk, &n_kw, &n_k, &alpha, &eta, eta_sum);
            debug!(pass, log_likelihood = ll, "LDA pass complete");
            log_likelihood_history.push(ll);
        }

        let eta_row = Array1::from(eta.clone());
        let mut topic_term = n_kw.mapv(|c| c as f64) + &eta_row;
        for (mut row, &n) in topic_term.axis_iter_mut(Axis(0)).zip(n_k.iter()) {
            row /= n as f64 + eta_sum;
        }

        info!(
            final_log_likelihood = log_likelihood_history.last().copied().unwrap_or(0.0),
            "LDA training complete"
        );

        Ok(LdaModel {
            dictionary: dictionary.clone(),
            alpha,
            eta,
            topic_term,
            minimum_probability: params.minimum_probability,
            random_state: params.random_state,
            log_likelihood_history,
        })
    }
}

/// Average log p(w | d) over every token, using the current point estimates
/// of theta and phi.
fn per_word_log_likelihood(
    docs: &[Vec<usize>],
    n_dk: &Array2<usize>,
    n_kw: &Array2<usize>,
    n_k: &Array1<usize>,
    alpha: &[f64],
    eta: &[f64],
    eta_sum: f64,
) -> f64 {
    let alpha_sum: f64 = alpha.iter().sum();
    let mut ll = 0.0;
    let mut tokens = 0usize;

    for (d, words) in docs.iter().enumerate() {
        let doc_total = words.len() as f64 + alpha_sum;
        for &w in words {
            let p: f64 = (0..alpha.len())
                .map(|t| {
                    let theta = (n_dk[[d, t]] as f64 + alpha[t]) / doc_total;
                    let phi = (n_kw[[t, w]] as f64 + eta[w]) / (n_k[t] as f64 + eta_sum);
                    theta * phi
                })
                .sum();
            ll += p.ln();
            tokens += 1;
        }
    }

    if tokens == 0 {
        0.0
    } else {
        ll / tokens as f64
    }
}

/// Train an LDA model straight from token lists. The dictionary is built
/// without pruning.
pub fn build_lda<D, S>(documents: &[D], params: &LdaParams) -> Result<LdaModel>
where
    D: AsRef<[S]>,
    S: AsRef<str>,
{
    if documents.is_empty() {
        anyhow::bail!("No documents to train on");
    }
    let dictionary = Dictionary::from_documents(documents);
    let corpus: Vec<BowDocument> = documents
        .iter()
        .map(|doc| dictionary.doc2bow(doc.as_ref()))
        .collect();
    build_lda_with_corpus(&corpus, &dictionary, params)
}

/// Train an LDA model from an existing corpus and dictionary.
pub fn build_lda_with_corpus(
    corpus: &[BowDocument],
    dictionary: &Dictionary,
    params: &LdaParams,
) -> Result<LdaModel> {
    GibbsTrainer::new(params.clone()).train(corpus, dictionary)
}
