// Topic model traits: the swap-ready abstraction behind every extractor.
//
// Result extractors and evaluation only ever see a TopicModel. The shipped
// implementation is the Gibbs-sampled LdaModel, but anything that can
// answer these queries (a model loaded from another toolkit, a fake in
// tests) plugs in the same way.

use anyhow::Result;

use crate::corpus::dictionary::Dictionary;
use crate::corpus::BowDocument;

/// Topics below this probability are not reported unless the caller asks
/// for a different threshold.
pub const DEFAULT_MINIMUM_PROBABILITY: f64 = 0.01;

/// Thresholds are never allowed to reach zero, so a query can't report
/// every topic for every term.
const PROBABILITY_FLOOR: f64 = 1e-8;

/// Query interface of a trained topic model.
pub trait TopicModel: Send + Sync {
    fn num_topics(&self) -> usize;

    /// The dictionary the model was trained against.
    fn id2word(&self) -> &Dictionary;

    /// Reporting threshold used when a query passes `None`.
    fn minimum_probability(&self) -> f64 {
        DEFAULT_MINIMUM_PROBABILITY
    }

    /// `p(term | topic)`. Unknown ids have probability 0.
    fn term_probability(&self, topic_id: usize, term_id: usize) -> f64;

    /// Topic distribution of a bag-of-words, as (topic id, probability)
    /// pairs in topic id order. Topics below the threshold are omitted.
    fn document_topics(&self, bow: &[(usize, u32)], minimum_probability: Option<f64>)
        -> Vec<(usize, f64)>;

    /// Topics associated with a term, strongest first. Topics below the
    /// threshold are omitted.
    fn term_topics(&self, term_id: usize, minimum_probability: Option<f64>) -> Vec<(usize, f64)> {
        let threshold = self.resolve_threshold(minimum_probability);
        let mut topics: Vec<(usize, f64)> = (0..self.num_topics())
            .map(|topic| (topic, self.term_probability(topic, term_id)))
            .filter(|&(_, p)| p >= threshold)
            .collect();
        topics.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(std::cmp::Ordering::Equal));
        topics
    }

    /// The `topn` most probable (term id, probability) pairs of a topic.
    fn topic_terms(&self, topic_id: usize, topn: usize) -> Result<Vec<(usize, f64)>> {
        if topic_id >= self.num_topics() {
            anyhow::bail!(
                "Topic {topic_id} out of range — model has {} topics",
                self.num_topics()
            );
        }
        let mut terms: Vec<(usize, f64)> = (0..self.id2word().len())
            .map(|term| (term, self.term_probability(topic_id, term)))
            .collect();
        terms.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(std::cmp::Ordering::Equal));
        terms.truncate(topn);
        Ok(terms)
    }

    /// Like `topic_terms`, with surface strings instead of ids.
    fn show_topic(&self, topic_id: usize, topn: usize) -> Result<Vec<(String, f64)>> {
        let dictionary = self.id2word();
        self.topic_terms(topic_id, topn)?
            .into_iter()
            .map(|(id, p)| match dictionary.token(id) {
                Some(token) => Ok((token.to_string(), p)),
                None => anyhow::bail!("Term id {id} missing from the model's dictionary"),
            })
            .collect()
    }

    fn resolve_threshold(&self, minimum_probability: Option<f64>) -> f64 {
        minimum_probability
            .unwrap_or_else(|| self.minimum_probability())
            .max(PROBABILITY_FLOOR)
    }
}

/// Trains a topic model from a corpus.
pub trait TopicTrainer {
    type Model: TopicModel;

    fn train(&self, corpus: &[BowDocument], dictionary: &Dictionary) -> Result<Self::Model>;
}
