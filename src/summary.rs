// Result extractors: post-hoc summaries of a trained topic model.
//
// Everything here is read-only over the model and preserves input order:
// one row/element per corpus document or per term, one list per topic.

use anyhow::Result;
use ndarray::Array2;

use crate::corpus::BowDocument;
use crate::models::traits::TopicModel;

/// Topics must clear this probability to count as a document's strongest.
pub const STRONGEST_TOPIC_FLOOR: f64 = 0.01;

/// Dense document-topic matrix: one row per document in corpus order, one
/// column per topic id. Topics the model doesn't report are 0.
pub fn get_doc_topic_matrix<M>(model: &M, corpus: &[BowDocument]) -> Array2<f64>
where
    M: TopicModel + ?Sized,
{
    let mut matrix = Array2::zeros((corpus.len(), model.num_topics()));
    for (mut row, bow) in matrix.rows_mut().into_iter().zip(corpus) {
        for (topic, p) in model.document_topics(bow, None) {
            if let Some(cell) = row.get_mut(topic) {
                *cell = p;
            }
        }
    }
    matrix
}

/// The most probable topic of each document.
///
/// Only topics above `STRONGEST_TOPIC_FLOOR` are considered and ties go to
/// the lower topic id. Fails if some document has no topic above the floor.
pub fn get_strongest_document_topics<M>(model: &M, corpus: &[BowDocument]) -> Result<Vec<usize>>
where
    M: TopicModel + ?Sized,
{
    corpus
        .iter()
        .enumerate()
        .map(|(index, bow)| {
            let topics = model.document_topics(bow, Some(STRONGEST_TOPIC_FLOOR));
            strongest(&topics).ok_or_else(|| {
                anyhow::anyhow!(
                    "Document {index} has no topic above probability {STRONGEST_TOPIC_FLOOR}"
                )
            })
        })
        .collect()
}

/// The highest-weight topic of each term, or `None` when the term isn't in
/// the model's dictionary or the model reports no topic for it.
pub fn get_strongest_term_topics<M, S>(model: &M, terms: &[S]) -> Vec<Option<usize>>
where
    M: TopicModel + ?Sized,
    S: AsRef<str>,
{
    let dictionary = model.id2word();
    terms
        .iter()
        .map(|term| {
            let id = dictionary.id(term.as_ref())?;
            strongest(&model.term_topics(id, None))
        })
        .collect()
}

/// Top `topn` terms of every topic, terms only.
pub fn get_topics<M>(model: &M, topn: usize) -> Result<Vec<Vec<String>>>
where
    M: TopicModel + ?Sized,
{
    Ok(get_topic_terms(model, topn)?
        .into_iter()
        .map(|terms| terms.into_iter().map(|(term, _)| term).collect())
        .collect())
}

/// Top `topn` (term, weight) pairs of every topic.
pub fn get_topic_terms<M>(model: &M, topn: usize) -> Result<Vec<Vec<(String, f64)>>>
where
    M: TopicModel + ?Sized,
{
    (0..model.num_topics())
        .map(|topic| model.show_topic(topic, topn))
        .collect()
}

/// First (topic, weight) pair with the maximum weight.
fn strongest(topics: &[(usize, f64)]) -> Option<usize> {
    let mut best: Option<(usize, f64)> = None;
    for &(topic, p) in topics {
        match best {
            Some((_, top)) if p <= top => {}
            _ => best = Some((topic, p)),
        }
    }
    best.map(|(topic, _)| topic)
}
