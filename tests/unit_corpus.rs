// Unit tests for corpus and dictionary construction.

use topicprep::corpus::dictionary::Dictionary;
use topicprep::corpus::{build_corpus_dictionary, token_count};

fn strings(docs: &[&[&str]]) -> Vec<Vec<String>> {
    docs.iter()
        .map(|d| d.iter().map(|t| t.to_string()).collect())
        .collect()
}

// ============================================================
// build_corpus_dictionary
// ============================================================

#[test]
fn two_document_example() {
    let docs = strings(&[&["a", "b"], &["b", "c"]]);
    let (corpus, dictionary) = build_corpus_dictionary(&docs, 0);

    assert_eq!(dictionary.len(), 3);
    assert_eq!(dictionary.id("a"), Some(0));
    assert_eq!(dictionary.id("b"), Some(1));
    assert_eq!(dictionary.id("c"), Some(2));
    assert_eq!(corpus, vec![vec![(0, 1), (1, 1)], vec![(1, 1), (2, 1)]]);
}

#[test]
fn deterministic_across_calls() {
    let docs = strings(&[
        &["river", "bank", "water", "bank"],
        &["loan", "bank", "rate"],
        &["water", "fish", "river"],
    ]);
    let (corpus_a, dict_a) = build_corpus_dictionary(&docs, 2);
    let (corpus_b, dict_b) = build_corpus_dictionary(&docs, 2);
    assert_eq!(corpus_a, corpus_b);
    assert_eq!(dict_a, dict_b);
}

#[test]
fn min_count_prunes_rare_terms_and_drops_their_tokens() {
    let docs = strings(&[
        &["river", "bank", "water", "bank"],
        &["loan", "bank", "rate"],
        &["water", "fish", "river"],
    ]);
    let (corpus, dictionary) = build_corpus_dictionary(&docs, 2);

    // river, bank and water each appear in 2+ documents
    assert_eq!(dictionary.len(), 3);
    assert_eq!(dictionary.id("river"), Some(0));
    assert_eq!(dictionary.id("bank"), Some(1));
    assert_eq!(dictionary.id("water"), Some(2));
    assert_eq!(dictionary.id("loan"), None);

    assert_eq!(corpus[0], vec![(0, 1), (1, 2), (2, 1)]);
    assert_eq!(corpus[1], vec![(1, 1)]);
    assert_eq!(corpus[2], vec![(0, 1), (2, 1)]);
}

#[test]
fn min_count_zero_and_one_keep_everything() {
    let docs = strings(&[&["x", "y"], &["z"]]);
    assert_eq!(build_corpus_dictionary(&docs, 0).1.len(), 3);
    assert_eq!(build_corpus_dictionary(&docs, 1).1.len(), 3);
}

#[test]
fn empty_documents_become_empty_bows() {
    let docs = strings(&[&[], &["a"], &[]]);
    let (corpus, dictionary) = build_corpus_dictionary(&docs, 0);
    assert_eq!(corpus.len(), 3);
    assert!(corpus[0].is_empty());
    assert!(corpus[2].is_empty());
    assert_eq!(dictionary.num_docs(), 3);
}

#[test]
fn bow_ids_are_within_dictionary() {
    let docs = strings(&[&["a", "b", "a"], &["c", "d"], &["a", "d", "e"]]);
    let (corpus, dictionary) = build_corpus_dictionary(&docs, 2);
    for bow in &corpus {
        assert!(bow.iter().all(|&(id, count)| id < dictionary.len() && count > 0));
        assert!(bow.windows(2).all(|w| w[0].0 < w[1].0), "sorted, no duplicates");
    }
}

#[test]
fn token_count_sums_counts() {
    let corpus = vec![vec![(0, 2), (1, 1)], vec![], vec![(3, 4)]];
    assert_eq!(token_count(&corpus), 7);
}

// ============================================================
// Dictionary
// ============================================================

#[test]
fn dictionary_statistics() {
    let d = Dictionary::from_documents(&[vec!["a", "b", "a"], vec!["b"]]);
    assert_eq!(d.num_docs(), 2);
    assert_eq!(d.num_pos(), 4);
    assert_eq!(d.doc_freq(0), Some(1));
    assert_eq!(d.doc_freq(1), Some(2));
    assert_eq!(d.token(1), Some("b"));
    assert_eq!(d.token(9), None);
}

#[test]
fn add_documents_extends_ids() {
    let mut d = Dictionary::from_documents(&[vec!["a", "b"]]);
    d.add_documents(&[vec!["c", "a"]]);
    assert_eq!(d.id("c"), Some(2));
    assert_eq!(d.doc_freq(0), Some(2));
    assert_eq!(d.num_docs(), 2);
}

#[test]
fn doc2bow_skips_unknown_tokens() {
    let d = Dictionary::from_documents(&[vec!["a", "b"]]);
    assert_eq!(d.doc2bow(&["b", "zzz", "b", "a"]), vec![(0, 1), (1, 2)]);
}

#[test]
fn iter_yields_ids_in_order() {
    let d = Dictionary::from_documents(&[vec!["x", "y", "z"]]);
    let pairs: Vec<(usize, &str)> = d.iter().collect();
    assert_eq!(pairs, vec![(0, "x"), (1, "y"), (2, "z")]);
}

#[test]
fn filter_extremes_drops_common_and_keeps_top_n() {
    let mut d = Dictionary::from_documents(&[
        vec!["common", "a", "b"],
        vec!["common", "a", "c"],
        vec!["common", "b", "d"],
        vec!["common", "a"],
    ]);
    // "common" is in every document (1.0 > 0.75)
    d.filter_extremes(1, 0.75, Some(2)).unwrap();
    assert_eq!(d.id("common"), None);
    assert_eq!(d.len(), 2);
    // a (df 3) and b (df 2) survive; ids are compacted in their old order
    assert_eq!(d.id("a"), Some(0));
    assert_eq!(d.id("b"), Some(1));
}

#[test]
fn filter_extremes_rejects_bad_fraction() {
    let mut d = Dictionary::from_documents(&[vec!["a"]]);
    assert!(d.filter_extremes(1, 1.5, None).is_err());
}

#[test]
fn dictionary_serializes_round_trip() {
    let d = Dictionary::from_documents(&[vec!["a", "b"], vec!["b", "c"]]);
    let json = serde_json::to_string(&d).unwrap();
    let back: Dictionary = serde_json::from_str(&json).unwrap();
    assert_eq!(d, back);
}
