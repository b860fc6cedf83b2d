// Unit tests for text cleaning, sentence splitting and file loading.
//
// Most cleaning tests use explicit stopword sets; the shipped English list
// gets its own section.

use std::collections::HashSet;

use rust_stemmers::Algorithm;
use topicprep::text::io::{load_documents, load_file, load_lines};
use topicprep::text::language::Language;
use topicprep::text::lemmatizer::{IdentityLemmatizer, SnowballLemmatizer};
use topicprep::text::sentences::UnicodeSentenceSplitter;
use topicprep::text::traits::{Lemmatizer, SentenceSplitter};
use topicprep::text::{TextContext, DEFAULT_MIN_LENGTH};

fn ctx(stopwords: &[&str]) -> TextContext {
    TextContext::with_stopwords(stopwords.iter().copied())
}

// ============================================================
// clean
// ============================================================

#[test]
fn clean_strips_punctuation_stopwords_and_keeps_duplicates() {
    let tokens = ctx(&["the"]).clean("The Quick, Quick fox!", 3);
    assert_eq!(tokens, vec!["quick", "quick", "fox"]);
}

#[test]
fn clean_empty_document() {
    let c = ctx(&["the"]);
    for min_length in [0, 1, 3, 10] {
        assert!(c.clean("", min_length).is_empty());
        assert!(c.clean("   \n\t ", min_length).is_empty());
    }
}

#[test]
fn clean_min_length_zero_keeps_short_tokens() {
    let tokens = ctx(&[]).clean("a bb ccc", 0);
    assert_eq!(tokens, vec!["a", "bb", "ccc"]);
}

#[test]
fn clean_min_length_filters_by_chars_not_bytes() {
    // "été" is 3 characters but 5 bytes
    let tokens = ctx(&[]).clean("été ou", 3);
    assert_eq!(tokens, vec!["été"]);
}

#[test]
fn clean_removes_typographic_punctuation() {
    let tokens = ctx(&[]).clean("“quoted” it’s — dash", 0);
    assert_eq!(tokens, vec!["quoted", "its", "dash"]);
}

#[test]
fn clean_never_adds_tokens() {
    let c = ctx(&["and", "the"]);
    let docs = [
        "The cat and the hat",
        "well-known... state-of-the-art!!",
        "one",
        "  spaced   out   words  ",
        "¿Qué? ¡Sí!",
    ];
    for doc in docs {
        for min_length in [0, 2, 3] {
            let cleaned = c.clean(doc, min_length);
            assert!(
                cleaned.len() <= doc.split_whitespace().count(),
                "clean({doc:?}) produced {cleaned:?}"
            );
        }
    }
}

#[test]
fn clean_stopwords_checked_case_insensitively() {
    let tokens = ctx(&["bank"]).clean("BANK Bank bank river", 0);
    assert_eq!(tokens, vec!["river"]);
}

#[test]
fn clean_length_filter_sees_the_lemma() {
    // Snowball turns "running" into "run", which is then too short
    let c = ctx(&[]).with_lemmatizer(Box::new(SnowballLemmatizer::new(Algorithm::English)));
    assert_eq!(c.clean("running cats", 4), Vec::<String>::new());
    assert_eq!(c.clean("running cats", 3), vec!["run", "cat"]);
}

#[test]
fn clean_uses_injected_lemmatizer() {
    struct Upper;
    impl Lemmatizer for Upper {
        fn lemmatize(&self, token: &str) -> String {
            token.to_uppercase()
        }
    }
    let c = ctx(&[]).with_lemmatizer(Box::new(Upper));
    assert_eq!(c.clean("fox den", 0), vec!["FOX", "DEN"]);
}

#[test]
fn preprocess_preserves_document_order() {
    let c = ctx(&["the"]);
    let docs = vec!["The river bank", "", "loan rates"];
    let out = c.preprocess(&docs, DEFAULT_MIN_LENGTH);
    assert_eq!(out.len(), 3);
    assert_eq!(out[0], vec!["river", "bank"]);
    assert!(out[1].is_empty());
    assert_eq!(out[2], vec!["loan", "rates"]);
}

// ============================================================
// English stopword list
// ============================================================

fn english() -> TextContext {
    TextContext::new(
        Language::English.stopwords(),
        Box::new(IdentityLemmatizer),
        Box::new(UnicodeSentenceSplitter),
    )
}

#[test]
fn clean_with_english_stopwords() {
    let tokens = english().clean("The Quick, Quick fox!", 3);
    assert_eq!(tokens, vec!["quick", "quick", "fox"]);
}

#[test]
fn english_stopwords_are_function_words_only() {
    let stop = Language::English.stopwords();
    assert!(stop.len() < 200, "got {} stopwords", stop.len());
    for word in ["the", "and", "not", "during"] {
        assert!(stop.contains(word), "{word} should be a stopword");
    }
    for word in ["know", "new", "world", "said"] {
        assert!(!stop.contains(word), "{word} should be kept");
    }
}

// ============================================================
// Sentences
// ============================================================

#[test]
fn split_sentences_trims_and_drops_empty() {
    let c = ctx(&[]);
    let sentences = c.split_sentences("Hello world. How are you?  ");
    assert_eq!(sentences, vec!["Hello world.", "How are you?"]);
    assert!(c.split_sentences("   ").is_empty());
}

#[test]
fn split_sentences_uses_injected_splitter() {
    struct Semicolons;
    impl SentenceSplitter for Semicolons {
        fn split<'a>(&self, text: &'a str) -> Vec<&'a str> {
            text.split(';').collect()
        }
    }
    let c = ctx(&[]).with_splitter(Box::new(Semicolons));
    assert_eq!(c.split_sentences("a; b;; c"), vec!["a", "b", "c"]);
}

// ============================================================
// Language
// ============================================================

#[test]
fn language_parses_names_and_codes() {
    assert_eq!("english".parse::<Language>().unwrap(), Language::English);
    assert_eq!("DE".parse::<Language>().unwrap(), Language::German);
    assert!("klingon".parse::<Language>().is_err());
}

#[test]
fn language_stopwords_are_lowercase() {
    let stopwords: HashSet<String> = Language::English.stopwords();
    assert!(!stopwords.is_empty());
    assert!(stopwords.iter().all(|w| *w == w.to_lowercase()));
    assert!(stopwords.contains("the"));
}

#[test]
fn for_language_builds_a_working_context() {
    let c = TextContext::for_language(Language::English);
    assert!(c.is_stopword("the"));
    let tokens = c.clean("The foxes were jumping", 3);
    assert!(tokens.contains(&"fox".to_string()));
    assert!(tokens.contains(&"jump".to_string()));
}

// ============================================================
// File loading
// ============================================================

fn temp_file(name: &str, bytes: &[u8]) -> std::path::PathBuf {
    let path = std::env::temp_dir().join(format!("topicprep_{}_{name}", std::process::id()));
    std::fs::write(&path, bytes).unwrap();
    path
}

#[test]
fn load_lines_trims_and_decodes_latin1() {
    let path = temp_file("latin1.txt", b"  caf\xe9 au lait \r\n\nna\xefve\n");
    let lines = load_lines(&path).unwrap();
    assert_eq!(lines, vec!["café au lait", "", "naïve"]);
    std::fs::remove_file(&path).ok();
}

#[test]
fn load_lines_splits_on_bare_carriage_returns() {
    let path = temp_file("classic_mac.txt", b"first line\rsecond line\r\rlast\r");
    let lines = load_lines(&path).unwrap();
    assert_eq!(lines, vec!["first line", "second line", "", "last"]);
    std::fs::remove_file(&path).ok();
}

#[test]
fn load_documents_cleans_each_line_with_the_given_context() {
    let path = temp_file("documents.txt", b"The river bank\r\nA loan, the bank\n");
    let (lines, documents) = load_documents(&path, &ctx(&["the"]), 3).unwrap();
    std::fs::remove_file(&path).ok();

    assert_eq!(lines, vec!["The river bank", "A loan, the bank"]);
    assert_eq!(documents, vec![vec!["river", "bank"], vec!["loan", "bank"]]);
}

#[test]
fn load_file_applies_parse() {
    let path = temp_file("numbers.txt", b"1\n 2 \n3\n");
    let numbers: Vec<i64> = load_file(&path, |line| line.parse().unwrap_or(0)).unwrap();
    assert_eq!(numbers, vec![1, 2, 3]);
    std::fs::remove_file(&path).ok();
}

#[test]
fn load_file_missing_path_names_the_file() {
    let err = load_lines("/nonexistent/topicprep/input.txt").unwrap_err();
    assert!(format!("{err:#}").contains("/nonexistent/topicprep/input.txt"));
}
