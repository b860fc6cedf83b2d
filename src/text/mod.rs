// Text cleaning: punctuation stripping, stopword removal, lemmatization.
//
// Everything the cleaner needs lives in an explicitly constructed
// TextContext: the stopword set, the lemmatizer and the sentence splitter.
// Build one per language up front and pass it to the pipeline.

pub mod io;
pub mod language;
pub mod lemmatizer;
pub mod sentences;
pub mod traits;

use std::collections::HashSet;

use tracing::debug;

use self::language::Language;
use self::lemmatizer::{IdentityLemmatizer, SnowballLemmatizer};
use self::sentences::UnicodeSentenceSplitter;
use self::traits::{Lemmatizer, SentenceSplitter};

/// Tokens shorter than this are dropped unless the caller asks otherwise.
pub const DEFAULT_MIN_LENGTH: usize = 3;

/// Characters removed before tokenizing: ASCII punctuation plus the
/// typographic quotes and dash that show up in scraped text.
pub const PUNCTUATION: &str = "!\"#$%&'()*+,-./:;<=>?@[\\]^_`{|}~“”’—";

/// Shared, read-only state for cleaning and sentence splitting.
pub struct TextContext {
    stopwords: HashSet<String>,
    punctuation: HashSet<char>,
    lemmatizer: Box<dyn Lemmatizer>,
    splitter: Box<dyn SentenceSplitter>,
}

impl TextContext {
    pub fn new(
        stopwords: HashSet<String>,
        lemmatizer: Box<dyn Lemmatizer>,
        splitter: Box<dyn SentenceSplitter>,
    ) -> Self {
        Self {
            stopwords,
            punctuation: PUNCTUATION.chars().collect(),
            lemmatizer,
            splitter,
        }
    }

    /// Load the stopword list and Snowball lemmatizer for `language`.
    pub fn for_language(language: Language) -> Self {
        let stopwords = language.stopwords();
        debug!(%language, stopwords = stopwords.len(), "Initialized text context");
        Self::new(
            stopwords,
            Box::new(SnowballLemmatizer::new(language.stemmer_algorithm())),
            Box::new(UnicodeSentenceSplitter),
        )
    }

    /// A context with the given stopwords, no lemmatization and Unicode
    /// sentence boundaries.
    pub fn with_stopwords<I, S>(stopwords: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::new(
            stopwords.into_iter().map(Into::into).collect(),
            Box::new(IdentityLemmatizer),
            Box::new(UnicodeSentenceSplitter),
        )
    }

    pub fn with_lemmatizer(mut self, lemmatizer: Box<dyn Lemmatizer>) -> Self {
        self.lemmatizer = lemmatizer;
        self
    }

    pub fn with_splitter(mut self, splitter: Box<dyn SentenceSplitter>) -> Self {
        self.splitter = splitter;
        self
    }

    pub fn is_stopword(&self, token: &str) -> bool {
        self.stopwords.contains(token)
    }

    /// Clean one document into normalized tokens.
    ///
    /// Order matters: punctuation goes first so "fox!" and "fox" become the
    /// same token, stopwords are checked on the lowercased surface form, and
    /// the length filter sees the lemma. A `min_length` of 0 keeps everything.
    pub fn clean(&self, document: &str, min_length: usize) -> Vec<String> {
        let punct_free: String = document
            .chars()
            .filter(|c| !self.punctuation.contains(c))
            .collect();

        punct_free
            .to_lowercase()
            .split_whitespace()
            .filter(|word| !self.stopwords.contains(*word))
            .map(|word| self.lemmatizer.lemmatize(word))
            .filter(|lemma| lemma.chars().count() >= min_length)
            .collect()
    }

    /// Clean every document independently, preserving order.
    pub fn preprocess<S: AsRef<str>>(&self, documents: &[S], min_length: usize) -> Vec<Vec<String>> {
        documents
            .iter()
            .map(|doc| self.clean(doc.as_ref(), min_length))
            .collect()
    }

    /// Split text into trimmed, non-empty sentences.
    pub fn split_sentences(&self, text: &str) -> Vec<String> {
        self.splitter
            .split(text)
            .into_iter()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_string)
            .collect()
    }
}

impl Default for TextContext {
    fn default() -> Self {
        Self::for_language(Language::default())
    }
}
