// Model evaluation: perplexity, topic coherence, topic diff and grid
// comparison of trained topic models.
//
// Coherence measures use document co-occurrence over the evaluation corpus:
// two terms co-occur when they both appear in the same document, regardless
// of counts.

pub mod diff;
pub mod grid;

use std::collections::{HashMap, HashSet};

use anyhow::Result;

use crate::corpus::BowDocument;
use crate::models::traits::TopicModel;

/// Smoothing inside the NPMI logarithms.
const NPMI_EPSILON: f64 = 1e-12;

/// Threshold used to get an effectively dense document-topic distribution.
const DENSE_THRESHOLD: f64 = 0.0;

/// Perplexity of `corpus` under the model: `exp(-log_likelihood / tokens)`.
///
/// Each document's topic mixture comes from the model's own inference.
/// Lower is better.
pub fn perplexity<M>(model: &M, corpus: &[BowDocument]) -> Result<f64>
where
    M: TopicModel + ?Sized,
{
    let mut log_likelihood = 0.0;
    let mut tokens = 0u64;

    for bow in corpus {
        let theta = model.document_topics(bow, Some(DENSE_THRESHOLD));
        for &(term, count) in bow {
            let p: f64 = theta
                .iter()
                .map(|&(topic, weight)| weight * model.term_probability(topic, term))
                .sum();
            log_likelihood += f64::from(count) * p.max(f64::MIN_POSITIVE).ln();
            tokens += u64::from(count);
        }
    }

    if tokens == 0 {
        anyhow::bail!("Cannot compute perplexity — the corpus contains no tokens");
    }
    Ok((-log_likelihood / tokens as f64).exp())
}

/// UMass coherence per topic over the top `topn` terms.
///
/// For every pair of top terms (w_i ranked above w_j) this averages
/// `ln((D(w_i, w_j) + 1) / D(w_i))`. Pairs whose higher-ranked term never
/// appears in the corpus are skipped. Values are <= 0 in practice; higher is
/// better.
pub fn coherence_umass<M>(model: &M, corpus: &[BowDocument], topn: usize) -> Result<Vec<f64>>
where
    M: TopicModel + ?Sized,
{
    per_topic_pairs(model, corpus, topn, |stats, a, b| {
        let d_a = stats.doc_count(a);
        if d_a == 0 {
            return None;
        }
        let joint = stats.co_doc_count(a, b);
        Some(((joint as f64 + 1.0) / d_a as f64).ln())
    })
}

/// Normalized PMI coherence per topic over the top `topn` terms, in [-1, 1].
/// Pairs where either term never appears in the corpus are skipped.
pub fn coherence_npmi<M>(model: &M, corpus: &[BowDocument], topn: usize) -> Result<Vec<f64>>
where
    M: TopicModel + ?Sized,
{
    per_topic_pairs(model, corpus, topn, |stats, a, b| {
        let (d_a, d_b) = (stats.doc_count(a), stats.doc_count(b));
        if d_a == 0 || d_b == 0 {
            return None;
        }
        let n = stats.num_docs as f64;
        let p_a = d_a as f64 / n;
        let p_b = d_b as f64 / n;
        let p_ab = stats.co_doc_count(a, b) as f64 / n + NPMI_EPSILON;

        let pmi = (p_ab / (p_a * p_b)).ln();
        let norm = -p_ab.ln();
        Some(if norm > 0.0 { pmi / norm } else { 1.0 })
    })
}

/// Average `score` over the ordered pairs of each topic's top terms. A topic
/// with no scorable pair gets 0.
fn per_topic_pairs<M, F>(
    model: &M,
    corpus: &[BowDocument],
    topn: usize,
    score: F,
) -> Result<Vec<f64>>
where
    M: TopicModel + ?Sized,
    F: Fn(&Postings, usize, usize) -> Option<f64>,
{
    if corpus.is_empty() {
        anyhow::bail!("Cannot compute coherence on an empty corpus");
    }

    let top_terms: Vec<Vec<usize>> = (0..model.num_topics())
        .map(|topic| {
            model
                .topic_terms(topic, topn)
                .map(|terms| terms.into_iter().map(|(id, _)| id).collect())
        })
        .collect::<Result<_>>()?;

    let wanted: HashSet<usize> = top_terms.iter().flatten().copied().collect();
    let stats = Postings::build(corpus, &wanted);

    Ok(top_terms
        .iter()
        .map(|terms| {
            let mut total = 0.0;
            let mut pairs = 0usize;
            for (i, &a) in terms.iter().enumerate() {
                for &b in &terms[i + 1..] {
                    if let Some(s) = score(&stats, a, b) {
                        total += s;
                        pairs += 1;
                    }
                }
            }
            if pairs == 0 {
                0.0
            } else {
                total / pairs as f64
            }
        })
        .collect())
}

/// Which documents contain each term of interest.
struct Postings {
    docs: HashMap<usize, HashSet<usize>>,
    num_docs: usize,
}

impl Postings {
    fn build(corpus: &[BowDocument], terms: &HashSet<usize>) -> Self {
        let mut docs: HashMap<usize, HashSet<usize>> = HashMap::new();
        for (d, bow) in corpus.iter().enumerate() {
            for &(term, count) in bow {
                if count > 0 && terms.contains(&term) {
                    docs.entry(term).or_default().insert(d);
                }
            }
        }
        Self {
            docs,
            num_docs: corpus.len(),
        }
    }

    fn doc_count(&self, term: usize) -> usize {
        self.docs.get(&term).map_or(0, HashSet::len)
    }

    fn co_doc_count(&self, a: usize, b: usize) -> usize {
        match (self.docs.get(&a), self.docs.get(&b)) {
            (Some(da), Some(db)) => da.intersection(db).count(),
            _ => 0,
        }
    }
}
