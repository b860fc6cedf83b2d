// Corpus construction: token lists to bag-of-words vectors.

pub mod dictionary;

use tracing::info;

use self::dictionary::Dictionary;

/// One document as (term id, count) pairs, sorted by term id.
pub type BowDocument = Vec<(usize, u32)>;

/// Build a dictionary from `documents` and convert each document into a
/// bag-of-words over it.
///
/// Terms that appear in fewer than `min_count` documents are pruned before
/// conversion, and their tokens silently disappear from the corpus.
/// `min_count` of 0 or 1 keeps every term.
pub fn build_corpus_dictionary<D, S>(documents: &[D], min_count: u32) -> (Vec<BowDocument>, Dictionary)
where
    D: AsRef<[S]>,
    S: AsRef<str>,
{
    let mut dictionary = Dictionary::from_documents(documents);
    let before = dictionary.len();
    dictionary.filter_below(min_count);

    let corpus: Vec<BowDocument> = documents
        .iter()
        .map(|doc| dictionary.doc2bow(doc.as_ref()))
        .collect();

    info!(
        documents = corpus.len(),
        terms = dictionary.len(),
        pruned = before - dictionary.len(),
        min_count,
        "Built corpus and dictionary"
    );

    (corpus, dictionary)
}

/// Total number of tokens in a corpus.
pub fn token_count(corpus: &[BowDocument]) -> u64 {
    corpus
        .iter()
        .flat_map(|doc| doc.iter().map(|&(_, count)| u64::from(count)))
        .sum()
}
